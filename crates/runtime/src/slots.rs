//! The singleton slot table.
//!
//! One slot per component id, holding the live instance and a phase marker.
//! The marker is what makes creation and teardown windows explicit: a slot
//! in `Creating` or `TearingDown` occupies its id, so a second creation
//! attempt for the same id inside either window fails instead of bypassing
//! the singleton guard. Outside the windows a slot either holds a live
//! instance or does not exist at all, so re-creating a component right after
//! disabling it (same tick included) just works.

use rustc_hash::FxHashMap;

use crate::component::Component;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SlotPhase {
	/// Between claiming the slot and committing the built instance.
	Creating,
	/// Instance committed. `instance` is `None` only while checked out for
	/// a lifecycle callback.
	Live,
	/// Teardown in progress within a disable call.
	TearingDown,
}

struct Slot {
	serial: u64,
	phase: SlotPhase,
	instance: Option<Box<dyn Component>>,
}

/// Table mapping component id to at most one live slot.
#[derive(Default)]
pub(crate) struct Slots {
	slots: FxHashMap<&'static str, Slot>,
	next_serial: u64,
}

impl Slots {
	/// Returns the serial of the live instance for `id`, if any.
	pub fn live_serial(&self, id: &str) -> Option<u64> {
		let slot = self.slots.get(id)?;
		(slot.phase == SlotPhase::Live).then_some(slot.serial)
	}

	/// Returns true if `id` has a live instance.
	pub fn is_live(&self, id: &str) -> bool {
		self.live_serial(id).is_some()
	}

	/// Claims the slot for `id` and opens the creation window.
	///
	/// Fails if the slot is occupied: live, mid-creation, or mid-teardown.
	pub fn begin_create(&mut self, id: &'static str) -> Option<u64> {
		if self.slots.contains_key(id) {
			return None;
		}
		self.next_serial += 1;
		let serial = self.next_serial;
		self.slots.insert(
			id,
			Slot {
				serial,
				phase: SlotPhase::Creating,
				instance: None,
			},
		);
		Some(serial)
	}

	/// Commits the built instance, closing the creation window.
	pub fn commit(&mut self, id: &str, instance: Box<dyn Component>) {
		if let Some(slot) = self.slots.get_mut(id) {
			slot.phase = SlotPhase::Live;
			slot.instance = Some(instance);
		}
	}

	/// Opens the teardown window for `id` and takes the instance out.
	///
	/// Fails if the slot is not live, or if the instance is checked out for
	/// a lifecycle callback (the component is inside its own window).
	pub fn begin_teardown(&mut self, id: &str) -> Option<Box<dyn Component>> {
		let slot = self.slots.get_mut(id)?;
		if slot.phase != SlotPhase::Live || slot.instance.is_none() {
			return None;
		}
		slot.phase = SlotPhase::TearingDown;
		slot.instance.take()
	}

	/// Removes the slot, closing the teardown window.
	pub fn finish_teardown(&mut self, id: &str) {
		self.slots.remove(id);
	}

	/// Checks the live instance out for a lifecycle callback.
	pub fn take_instance(&mut self, id: &str) -> Option<Box<dyn Component>> {
		let slot = self.slots.get_mut(id)?;
		if slot.phase != SlotPhase::Live {
			return None;
		}
		slot.instance.take()
	}

	/// Returns a checked-out instance.
	///
	/// Dropped instead if the slot is gone or no longer expects it.
	pub fn put_instance(&mut self, id: &str, instance: Box<dyn Component>) {
		if let Some(slot) = self.slots.get_mut(id)
			&& slot.phase == SlotPhase::Live
			&& slot.instance.is_none()
		{
			slot.instance = Some(instance);
		}
	}

	/// Direct access to the live instance for `id`.
	pub fn instance_mut(&mut self, id: &str) -> Option<&mut Box<dyn Component>> {
		let slot = self.slots.get_mut(id)?;
		if slot.phase != SlotPhase::Live {
			return None;
		}
		slot.instance.as_mut()
	}
}
