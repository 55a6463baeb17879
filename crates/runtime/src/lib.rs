//! Component lifecycle, timers and the host bridge.
//!
//! This crate is the lifecycle half of the rampart runtime. Components,
//! meaning admin-facing *features* and internal *services*, are singletons
//! declared statically and toggled at runtime: enabling one builds its
//! instance,
//! activates its required listeners and brings up the services it needs;
//! disabling reverses all of that.
//!
//! The host engine drives everything through one [`Runtime`] value:
//!
//! ```ignore
//! let settings = Settings::load(&path)?;
//! let mut rt = Runtime::with_settings(settings, Some(path));
//! rt.startup();
//!
//! // per engine tick:
//! rt.tick();
//!
//! // per forwarded game event:
//! match rt.deliver(HostEvent::Purchase(req)) {
//!     DeliverOutcome::Verdict(v) => proceed_if(v.is_allow()),
//!     _ => unreachable!(),
//! }
//! ```

mod component;
mod error;
mod runtime;
mod slots;

pub use component::{COMPONENTS, Component, ComponentDef, Role, component_index, features};
pub use error::AdminError;
pub use rampart_config::Settings;
pub use runtime::{ComponentHandle, DeliverOutcome, HostEvent, Runtime};
