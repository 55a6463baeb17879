//! Definition index infrastructure.
//!
//! Provides [`DefIndexBuilder`] and [`DefIndex`] to eliminate boilerplate
//! across definition kinds. Each kind uses the same pattern:
//!
//! ```rust,ignore
//! static LISTENER_INDEX: LazyLock<DefIndex<ListenerDef>> = LazyLock::new(|| {
//!     DefIndexBuilder::new("listeners")
//!         .extend(LISTENERS.iter())
//!         .sort_by(|a, b| a.name().cmp(b.name()))
//!         .build()
//! });
//! ```

use std::cmp::Ordering;

use rustc_hash::FxHashMap;

use crate::RegistryEntry;

/// Distinguishes the type of key that collided.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum KeyKind {
	/// The definition's unique identifier (`meta.id`).
	Id,
	/// The definition's human-readable name (`meta.name`).
	Name,
	/// An alternative lookup name (`meta.aliases`).
	Alias,
}

impl std::fmt::Display for KeyKind {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			KeyKind::Id => write!(f, "id"),
			KeyKind::Name => write!(f, "name"),
			KeyKind::Alias => write!(f, "alias"),
		}
	}
}

/// Records a non-fatal key collision resolved by policy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Collision {
	/// What kind of key collided.
	pub kind: KeyKind,
	/// The colliding key string.
	pub key: &'static str,
	/// The ID of the definition that already held this key.
	pub existing_id: &'static str,
	/// The ID of the new definition trying to claim this key.
	pub new_id: &'static str,
	/// The index label where this collision occurred.
	pub index: &'static str,
}

/// Policy for handling duplicate keys during index construction.
#[derive(Clone, Copy, Debug, Default)]
pub enum DuplicatePolicy {
	/// Panic with a detailed error message.
	#[default]
	Panic,
	/// Keep the first definition seen for a key.
	FirstWins,
	/// Overwrite with the last definition seen.
	LastWins,
}

impl DuplicatePolicy {
	/// Returns the appropriate policy based on build configuration.
	///
	/// - Debug builds: `Panic` for immediate feedback
	/// - Release builds: `FirstWins` for graceful degradation
	#[inline]
	pub fn for_build() -> Self {
		if cfg!(debug_assertions) {
			DuplicatePolicy::Panic
		} else {
			DuplicatePolicy::FirstWins
		}
	}
}

/// Indexed collection of definitions with O(1) lookup.
///
/// Built via [`DefIndexBuilder`], provides lookup by name, id, or alias plus
/// sorted iteration and the collisions recorded during construction.
pub struct DefIndex<T: RegistryEntry + 'static> {
	items: Vec<&'static T>,
	by_key: FxHashMap<&'static str, &'static T>,
	collisions: Vec<Collision>,
}

impl<T: RegistryEntry + 'static> DefIndex<T> {
	/// Looks up a definition by name, id, or alias.
	#[inline]
	pub fn get(&self, key: &str) -> Option<&'static T> {
		self.by_key.get(key).copied()
	}

	/// Returns all definitions in sorted order.
	#[inline]
	pub fn items(&self) -> &[&'static T] {
		&self.items
	}

	/// Returns the number of unique definitions (not keys).
	#[inline]
	pub fn len(&self) -> usize {
		self.items.len()
	}

	/// Returns true if the index contains no definitions.
	#[inline]
	pub fn is_empty(&self) -> bool {
		self.items.is_empty()
	}

	/// Returns an iterator over all definitions.
	#[inline]
	pub fn iter(&self) -> impl Iterator<Item = &'static T> + '_ {
		self.items.iter().copied()
	}

	/// Returns the collisions recorded while building this index.
	#[inline]
	pub fn collisions(&self) -> &[Collision] {
		&self.collisions
	}
}

/// Builder for constructing a [`DefIndex`].
///
/// Collects definitions, applies sorting, validates for duplicates, and
/// produces the final index.
pub struct DefIndexBuilder<T: RegistryEntry + 'static> {
	label: &'static str,
	defs: Vec<&'static T>,
	policy: DuplicatePolicy,
}

impl<T: RegistryEntry + 'static> DefIndexBuilder<T> {
	/// Creates a new builder with the given label for error messages.
	pub fn new(label: &'static str) -> Self {
		Self {
			label,
			defs: Vec::new(),
			policy: DuplicatePolicy::for_build(),
		}
	}

	/// Sets the duplicate key handling policy.
	pub fn duplicate_policy(mut self, policy: DuplicatePolicy) -> Self {
		self.policy = policy;
		self
	}

	/// Adds a single definition to the builder.
	pub fn push(mut self, def: &'static T) -> Self {
		self.defs.push(def);
		self
	}

	/// Adds multiple definitions to the builder.
	pub fn extend<I: IntoIterator<Item = &'static T>>(mut self, defs: I) -> Self {
		self.defs.extend(defs);
		self
	}

	/// Sorts definitions using the provided comparison function.
	pub fn sort_by<F: FnMut(&&'static T, &&'static T) -> Ordering>(mut self, cmp: F) -> Self {
		self.defs.sort_by(cmp);
		self
	}

	/// Builds the index, validating for duplicates according to policy.
	///
	/// # Panics
	///
	/// Panics if duplicate keys are found and policy is [`DuplicatePolicy::Panic`].
	pub fn build(mut self) -> DefIndex<T> {
		let mut seen = std::collections::HashSet::with_capacity(self.defs.len());
		self.defs.retain(|d| seen.insert(*d as *const T as usize));

		let mut by_key = FxHashMap::default();
		by_key.reserve(self.defs.len() * 2);
		let mut collisions = Vec::new();

		for &def in &self.defs {
			let meta = def.meta();
			self.insert_key(&mut by_key, &mut collisions, KeyKind::Id, meta.id, def);
			self.insert_key(&mut by_key, &mut collisions, KeyKind::Name, meta.name, def);
			for &alias in meta.aliases {
				self.insert_key(&mut by_key, &mut collisions, KeyKind::Alias, alias, def);
			}
		}

		DefIndex {
			items: self.defs,
			by_key,
			collisions,
		}
	}

	fn insert_key(
		&self,
		map: &mut FxHashMap<&'static str, &'static T>,
		collisions: &mut Vec<Collision>,
		kind: KeyKind,
		key: &'static str,
		def: &'static T,
	) {
		let Some(&existing) = map.get(key) else {
			map.insert(key, def);
			return;
		};
		if std::ptr::eq(existing, def) {
			return;
		}

		match self.policy {
			DuplicatePolicy::Panic => panic!(
				"duplicate {} key in {}: key={:?} existing_id={} new_id={}",
				kind,
				self.label,
				key,
				existing.id(),
				def.id()
			),
			DuplicatePolicy::FirstWins => {}
			DuplicatePolicy::LastWins => {
				map.insert(key, def);
			}
		}
		collisions.push(Collision {
			kind,
			key,
			existing_id: existing.id(),
			new_id: def.id(),
			index: self.label,
		});
	}
}
