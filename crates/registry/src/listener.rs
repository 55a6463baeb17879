//! Listener contracts and definitions.
//!
//! A listener is a stateless bundle of callbacks bound to one channel. The
//! implementing type is a unit struct that is never constructed at runtime;
//! only its `&'static` identity is toggled active or inactive on its
//! channel. Per-listener state is a bug: anything a callback needs must
//! arrive in the event payload.
//!
//! Listeners are declared with the [`listener!`](crate::listener) macro and
//! collected into the [`LISTENERS`] slice at link time. Declaration makes a
//! listener *known* (it shows up in the admin index); it only runs once a
//! component activates it.

use std::sync::LazyLock;

use linkme::distributed_slice;

use crate::channel::{ChannelId, Verdict};
use crate::events::{CashTossRequest, ChatLine, PickupClaim, PurchaseRequest, WaveEvent};
use crate::index::{DefIndex, DefIndexBuilder};
use crate::meta::RegistryMeta;
use crate::{RegistryEntry, impl_registry_entry};

/// Contract for the trader purchase channel.
///
/// Returning [`Verdict::Deny`] vetoes the purchase; later listeners in the
/// chain are not consulted.
pub trait PurchaseListener: Sync {
	/// Decide whether the purchase may proceed.
	fn allow_purchase(&self, req: &PurchaseRequest) -> Verdict {
		let _ = req;
		Verdict::Allow
	}
}

/// Contract for the cash-toss channel.
pub trait CashTossListener: Sync {
	/// Decide whether the cash throw may proceed.
	fn allow_toss(&self, req: &CashTossRequest) -> Verdict {
		let _ = req;
		Verdict::Allow
	}
}

/// Contract for the pickup channel.
pub trait PickupListener: Sync {
	/// Decide whether the pickup claim may proceed.
	fn allow_claim(&self, claim: &PickupClaim) -> Verdict {
		let _ = claim;
		Verdict::Allow
	}
}

/// Contract for the chat channel.
///
/// Chat is a transform chain, not a veto chain: every active listener runs,
/// each receiving the previous listener's output. Returning `None` drops the
/// line and stops the chain.
pub trait ChatListener: Sync {
	/// Rewrite (or drop) a chat line.
	fn rewrite(&self, line: ChatLine) -> Option<ChatLine> {
		Some(line)
	}
}

/// Contract for the wave channel.
///
/// Pure notification: every active listener runs, there is no verdict.
pub trait WaveListener: Sync {
	/// A wave has started.
	fn wave_started(&self, ev: &WaveEvent) {
		let _ = ev;
	}

	/// A wave has ended.
	fn wave_ended(&self, ev: &WaveEvent) {
		let _ = ev;
	}
}

/// The callback bundle of a listener, tagged by its channel contract.
#[derive(Clone, Copy)]
pub enum ListenerHandler {
	/// Trader purchase veto chain.
	Purchase(&'static dyn PurchaseListener),
	/// Cash-toss veto chain.
	CashToss(&'static dyn CashTossListener),
	/// Pickup veto chain.
	Pickup(&'static dyn PickupListener),
	/// Chat transform chain.
	Chat(&'static dyn ChatListener),
	/// Wave notifications.
	Wave(&'static dyn WaveListener),
}

impl ListenerHandler {
	/// Returns the channel this handler's contract belongs to.
	pub fn channel(&self) -> ChannelId {
		match self {
			Self::Purchase(_) => ChannelId::Purchase,
			Self::CashToss(_) => ChannelId::CashToss,
			Self::Pickup(_) => ChannelId::Pickup,
			Self::Chat(_) => ChannelId::Chat,
			Self::Wave(_) => ChannelId::Wave,
		}
	}
}

/// A listener definition: identity plus its callback bundle.
#[derive(Clone, Copy)]
pub struct ListenerDef {
	/// Common definition metadata.
	pub meta: RegistryMeta,
	/// The channel this listener is bound to.
	pub channel: ChannelId,
	/// The callback bundle invoked by dispatch.
	pub handler: ListenerHandler,
}

impl std::fmt::Debug for ListenerDef {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("ListenerDef")
			.field("name", &self.meta.name)
			.field("channel", &self.channel)
			.field("description", &self.meta.description)
			.finish()
	}
}

impl_registry_entry!(ListenerDef);

/// Registry of all listener definitions.
#[distributed_slice]
pub static LISTENERS: [ListenerDef];

static LISTENER_INDEX: LazyLock<DefIndex<ListenerDef>> = LazyLock::new(|| {
	DefIndexBuilder::new("listeners")
		.extend(LISTENERS.iter())
		.sort_by(|a, b| a.name().cmp(b.name()))
		.build()
});

/// Returns the index of all declared listeners.
pub fn listener_index() -> &'static DefIndex<ListenerDef> {
	&LISTENER_INDEX
}

/// Finds all listener definitions bound to a specific channel.
pub fn listeners_for(channel: ChannelId) -> impl Iterator<Item = &'static ListenerDef> {
	LISTENER_INDEX.iter().filter(move |l| l.channel == channel)
}

/// Define a listener and register it in the [`LISTENERS`] slice.
///
/// The channel name doubles as the [`ListenerHandler`] variant, so a
/// declaration cannot bind a handler to the wrong channel.
///
/// # Example
///
/// ```ignore
/// struct ChatLog;
///
/// impl ChatListener for ChatLog {
///     fn rewrite(&self, line: ChatLine) -> Option<ChatLine> {
///         tracing::info!(player = %line.player, text = %line.text, "chat");
///         Some(line)
///     }
/// }
///
/// listener!(chat_log, Chat, "Log chat lines after transforms", &ChatLog);
/// ```
#[macro_export]
macro_rules! listener {
	($name:ident, $channel:ident, $desc:expr, $imp:expr) => {
		paste::paste! {
			#[allow(non_upper_case_globals)]
			#[linkme::distributed_slice($crate::LISTENERS)]
			static [<LISTENER_ $name>]: $crate::ListenerDef = $crate::ListenerDef {
				meta: $crate::RegistryMeta::new(
					concat!(env!("CARGO_PKG_NAME"), "::", stringify!($name)),
					stringify!($name),
					&[],
					$desc,
					$crate::RegistrySource::Crate(env!("CARGO_PKG_NAME")),
				),
				channel: $crate::ChannelId::$channel,
				handler: $crate::ListenerHandler::$channel($imp),
			};
		}
	};
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn builtin_listeners_are_registered() {
		let index = listener_index();
		assert!(index.get("rampart-registry::chat_log").is_some());
		assert!(index.get("chat_log").is_some());
		assert!(index.get("wave_log").is_some());
	}

	#[test]
	fn listeners_for_filters_by_channel() {
		assert!(listeners_for(ChannelId::Chat).any(|l| l.name() == "chat_log"));
		assert!(listeners_for(ChannelId::Chat).all(|l| l.channel == ChannelId::Chat));
	}

	#[test]
	fn handlers_match_their_declared_channel() {
		for def in listener_index().iter() {
			assert_eq!(def.handler.channel(), def.channel, "{}", def.id());
		}
	}
}
