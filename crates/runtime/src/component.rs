//! Component definitions and the instance extension points.
//!
//! A component is a toggleable subsystem. *Features* are user-facing guards
//! an admin switches on and off; *services* are internal machinery enabled
//! only as a dependency of something else. Both are singletons: the runtime
//! holds at most one live instance per definition at any time.
//!
//! The definition is static data; the instance is built by the definition's
//! `build` function when the component is enabled and dropped when it is
//! disabled. Anything the component needs to remember between callbacks
//! lives on the instance.

use std::any::Any;
use std::sync::LazyLock;

use linkme::distributed_slice;
use rampart_registry::{
	DefIndex, DefIndexBuilder, RegistryEntry, RegistryMeta, impl_registry_entry,
};

use crate::runtime::Runtime;

/// Instance extension points, invoked by the runtime.
///
/// All methods have empty defaults; implement only what the component needs.
/// The runtime has already activated the component's required listeners when
/// `on_launch` runs, and has already deactivated them when `on_shutdown`
/// runs.
pub trait Component: Any {
	/// The component was just enabled.
	fn on_launch(&mut self, rt: &mut Runtime) {
		let _ = rt;
	}

	/// The component is being disabled; the instance is dropped afterwards.
	fn on_shutdown(&mut self, rt: &mut Runtime) {
		let _ = rt;
	}

	/// A repeating timer set via [`Runtime::set_timer`] came due.
	fn on_timer(&mut self, rt: &mut Runtime) {
		let _ = rt;
	}
}

/// Whether a component is admin-facing or internal machinery.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
	/// Admin-toggleable guard with a persisted auto-enable flag.
	Feature,
	/// Internal machinery, enabled only as a dependency.
	Service,
}

/// A component definition: identity, dependencies and instance factory.
#[derive(Clone, Copy)]
pub struct ComponentDef {
	/// Common definition metadata.
	pub meta: RegistryMeta,
	/// Feature or service.
	pub role: Role,
	/// Listener ids activated while this component is enabled.
	///
	/// Resolved through the listener index at enable time; an id that
	/// resolves to nothing is skipped with a warning. Two components must
	/// not list the same listener: disabling either would deactivate it for
	/// both.
	pub required_listeners: &'static [&'static str],
	/// Services this component needs while enabled.
	///
	/// Enabled (idempotently) when this component is enabled; a service is
	/// torn down once no enabled component lists it anymore.
	pub services: &'static [&'static ComponentDef],
	/// Builds a fresh instance. Plain constructor; it has no runtime access,
	/// so the guarded creation path cannot re-enter itself.
	pub build: fn() -> Box<dyn Component>,
}

impl ComponentDef {
	/// Returns true for admin-facing features.
	pub fn is_feature(&self) -> bool {
		self.role == Role::Feature
	}
}

impl std::fmt::Debug for ComponentDef {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("ComponentDef")
			.field("name", &self.meta.name)
			.field("role", &self.role)
			.field("required_listeners", &self.required_listeners)
			.field("description", &self.meta.description)
			.finish()
	}
}

impl_registry_entry!(ComponentDef);

/// Registry of all component definitions.
#[distributed_slice]
pub static COMPONENTS: [ComponentDef];

static COMPONENT_INDEX: LazyLock<DefIndex<ComponentDef>> = LazyLock::new(|| {
	DefIndexBuilder::new("components")
		.extend(COMPONENTS.iter())
		.sort_by(|a, b| a.name().cmp(b.name()))
		.build()
});

/// Returns the index of all declared components.
pub fn component_index() -> &'static DefIndex<ComponentDef> {
	&COMPONENT_INDEX
}

/// Returns all admin-facing feature definitions.
pub fn features() -> impl Iterator<Item = &'static ComponentDef> {
	component_index().iter().filter(|c| c.is_feature())
}
