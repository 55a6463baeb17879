//! Shared definition metadata.
//!
//! Every statically declared definition (listeners, components) carries a
//! [`RegistryMeta`] and implements [`RegistryEntry`] so the index machinery
//! in [`crate::index`] can treat them generically.

/// Represents where a definition was declared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RegistrySource {
	/// Built directly into the runtime.
	Builtin,
	/// Declared in a library crate.
	Crate(&'static str),
}

impl core::fmt::Display for RegistrySource {
	fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
		match self {
			Self::Builtin => write!(f, "builtin"),
			Self::Crate(name) => write!(f, "crate:{name}"),
		}
	}
}

/// Common metadata for all definition types.
///
/// All definitions have these properties:
/// - `id`: Unique identifier (typically `"crate::name"`)
/// - `name`: Human-readable display name
/// - `aliases`: Alternative names for lookup
/// - `description`: Help text description
/// - `source`: Origin (builtin, crate)
#[derive(Debug, Clone, Copy)]
pub struct RegistryMeta {
	/// Unique identifier (e.g., "rampart-registry::chat_log").
	pub id: &'static str,
	/// Human-readable name for admin display.
	pub name: &'static str,
	/// Alternative names for admin lookup.
	pub aliases: &'static [&'static str],
	/// Description for help text.
	pub description: &'static str,
	/// Where this definition was declared.
	pub source: RegistrySource,
}

impl RegistryMeta {
	/// Creates a new RegistryMeta with all fields specified.
	pub const fn new(
		id: &'static str,
		name: &'static str,
		aliases: &'static [&'static str],
		description: &'static str,
		source: RegistrySource,
	) -> Self {
		Self {
			id,
			name,
			aliases,
			description,
			source,
		}
	}

	/// Creates a minimal RegistryMeta with defaults for optional fields.
	pub const fn minimal(id: &'static str, name: &'static str, description: &'static str) -> Self {
		Self {
			id,
			name,
			aliases: &[],
			description,
			source: RegistrySource::Builtin,
		}
	}
}

/// Trait for accessing definition metadata.
///
/// Implement this trait to enable generic index operations like collision
/// detection, admin listing, and introspection.
pub trait RegistryEntry {
	/// Returns the metadata struct for this definition.
	fn meta(&self) -> &RegistryMeta;

	/// Returns the unique identifier.
	fn id(&self) -> &'static str {
		self.meta().id
	}

	/// Returns the human-readable name.
	fn name(&self) -> &'static str {
		self.meta().name
	}

	/// Returns alternative names for lookup.
	fn aliases(&self) -> &'static [&'static str] {
		self.meta().aliases
	}

	/// Returns the description.
	fn description(&self) -> &'static str {
		self.meta().description
	}

	/// Returns where this definition was declared.
	fn source(&self) -> RegistrySource {
		self.meta().source
	}
}

/// Implements [`RegistryEntry`] for a type with a `meta: RegistryMeta` field.
#[macro_export]
macro_rules! impl_registry_entry {
	($type:ty) => {
		impl $crate::RegistryEntry for $type {
			fn meta(&self) -> &$crate::RegistryMeta {
				&self.meta
			}
		}
	};
}
