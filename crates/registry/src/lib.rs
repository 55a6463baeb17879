//! Definition metadata, event channels and listener dispatch.
//!
//! This crate is the bus half of the rampart runtime. Guard features react
//! to host events through *listeners*: stateless callback bundles bound to
//! one channel each, registered at link time with [`listener!`] and toggled
//! active/inactive as their owning components come and go.
//!
//! Veto channels call active listeners in activation order and stop at the
//! first [`Verdict::Deny`]; an empty channel allows. The chat channel is a
//! transform chain instead, and the wave channel is pure notification. See
//! [`Channels`] for the dispatch entry points.
//!
//! ```ignore
//! struct PriceCap;
//!
//! impl PurchaseListener for PriceCap {
//!     fn allow_purchase(&self, req: &PurchaseRequest) -> Verdict {
//!         if req.price > req.wallet { Verdict::Deny } else { Verdict::Allow }
//!     }
//! }
//!
//! listener!(price_cap, Purchase, "Deny purchases the wallet cannot cover", &PriceCap);
//! ```

mod channel;
mod events;
/// Builtin diagnostic listeners.
mod impls;
mod index;
mod listener;
mod meta;

pub use channel::{ChannelId, ChannelState, Channels, DispatchPolicy, Verdict};
pub use events::{
	CashTossRequest, ChatLine, PickupClaim, PlayerId, PurchaseRequest, WaveEvent,
};
pub use index::{Collision, DefIndex, DefIndexBuilder, DuplicatePolicy, KeyKind};
pub use listener::{
	CashTossListener, ChatListener, LISTENERS, ListenerDef, ListenerHandler, PickupListener,
	PurchaseListener, WaveListener, listener_index, listeners_for,
};
pub use meta::{RegistryEntry, RegistryMeta, RegistrySource};
