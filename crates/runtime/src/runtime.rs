//! The runtime: lifecycle, timers and the host bridge.
//!
//! A dedicated server holds exactly one [`Runtime`]. The integration layer
//! drives it from the engine's cooperative tick loop: [`Runtime::tick`] once
//! per tick, [`Runtime::deliver`] for every forwarded game event. There is
//! no preemption and no suspension point inside a dispatch; everything runs
//! to completion before control returns to the engine.

use std::any::Any;
use std::path::PathBuf;

use rampart_config::Settings;
use rampart_registry::{
	CashTossRequest, ChannelId, Channels, ChatLine, ListenerDef, PickupClaim, PurchaseRequest,
	RegistryEntry, Verdict, WaveEvent, listener_index,
};
use tracing::{debug, warn};

use crate::component::{Component, ComponentDef, Role, component_index};
use crate::error::AdminError;
use crate::slots::Slots;

/// Identity of one live component instance.
///
/// Handles compare equal only for the same instance: enabling an already
/// enabled component returns an equal handle, while disable + enable yields
/// a handle that compares unequal to the old one.
#[derive(Debug, Clone, Copy)]
pub struct ComponentHandle {
	def: &'static ComponentDef,
	serial: u64,
}

impl ComponentHandle {
	/// The definition this instance was built from.
	pub fn def(&self) -> &'static ComponentDef {
		self.def
	}

	/// The instance serial. Serials are never reused within a process.
	pub fn serial(&self) -> u64 {
		self.serial
	}
}

impl PartialEq for ComponentHandle {
	fn eq(&self, other: &Self) -> bool {
		std::ptr::eq(self.def, other.def) && self.serial == other.serial
	}
}

impl Eq for ComponentHandle {}

/// A game event forwarded by the host engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostEvent {
	/// A trader purchase attempt.
	Purchase(PurchaseRequest),
	/// A cash throw attempt.
	CashToss(CashTossRequest),
	/// A dropped-item pickup attempt.
	Pickup(PickupClaim),
	/// A chat line about to broadcast.
	Chat(ChatLine),
	/// A wave started.
	WaveStarted(WaveEvent),
	/// A wave ended.
	WaveEnded(WaveEvent),
}

/// What the integration layer does with a delivered event.
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use]
pub enum DeliverOutcome {
	/// Veto channel result: proceed with the engine default iff `Allow`.
	Verdict(Verdict),
	/// Chat result: broadcast the rewritten line, or nothing if dropped.
	Chat(Option<ChatLine>),
	/// Notification delivered; nothing to decide.
	Done,
}

struct TimerSlot {
	owner: &'static ComponentDef,
	interval: u64,
	next_due: u64,
}

/// The process-wide runtime state: channels, slots, timers and settings.
pub struct Runtime {
	channels: Channels,
	slots: Slots,
	timers: Vec<TimerSlot>,
	now: u64,
	settings: Settings,
	settings_path: Option<PathBuf>,
}

impl Default for Runtime {
	fn default() -> Self {
		Self::new()
	}
}

impl Runtime {
	/// Creates a runtime with default settings and no settings file bound.
	pub fn new() -> Self {
		Self::with_settings(Settings::default(), None)
	}

	/// Creates a runtime with the given settings.
	///
	/// When `settings_path` is set, [`Runtime::set_auto_enable`] persists
	/// changes there.
	pub fn with_settings(settings: Settings, settings_path: Option<PathBuf>) -> Self {
		Self {
			channels: Channels::new(),
			slots: Slots::default(),
			timers: Vec::new(),
			now: 0,
			settings,
			settings_path,
		}
	}

	/// The channel table, for introspection and direct dispatch.
	pub fn channels(&self) -> &Channels {
		&self.channels
	}

	/// The current settings.
	pub fn settings(&self) -> &Settings {
		&self.settings
	}

	/// Host ticks seen so far.
	pub fn tick_count(&self) -> u64 {
		self.now
	}

	/// Listeners currently active on `channel`, in activation order.
	pub fn active_listeners(&self, channel: ChannelId) -> &[&'static ListenerDef] {
		self.channels.channel(channel).active()
	}

	// ---- lifecycle ----------------------------------------------------

	/// Enables `def`, returning a handle to its live instance.
	///
	/// Idempotent: if the component is already enabled, the existing handle
	/// comes back and nothing else happens. Returns `None` if the instance
	/// cannot be created because the slot is inside a creation or teardown
	/// window.
	pub fn enable(&mut self, def: &'static ComponentDef) -> Option<ComponentHandle> {
		if let Some(serial) = self.slots.live_serial(def.id()) {
			return Some(ComponentHandle { def, serial });
		}
		let serial = self.slots.begin_create(def.id())?;
		let instance = (def.build)();
		self.slots.commit(def.id(), instance);

		self.activate_required(def);
		for &service in def.services {
			if self.enable(service).is_none() {
				warn!(
					component = def.meta.name,
					service = service.meta.name,
					"required service could not be enabled"
				);
			}
		}
		debug!(component = def.meta.name, serial, "component enabled");
		self.with_instance(def, |instance, rt| instance.on_launch(rt));
		Some(ComponentHandle { def, serial })
	}

	/// Disables `def`, dropping its instance.
	///
	/// Returns `false` without touching anything if the component is not
	/// enabled, or if it is inside one of its own lifecycle callbacks.
	pub fn disable(&mut self, def: &'static ComponentDef) -> bool {
		let Some(mut instance) = self.slots.begin_teardown(def.id()) else {
			return false;
		};
		self.deactivate_required(def);
		instance.on_shutdown(self);
		drop(instance);
		self.slots.finish_teardown(def.id());
		self.timers.retain(|t| !std::ptr::eq(t.owner, def));
		self.release_services(def);
		debug!(component = def.meta.name, "component disabled");
		true
	}

	/// Returns true if `def` has a live instance.
	pub fn is_enabled(&self, def: &'static ComponentDef) -> bool {
		self.slots.is_live(def.id())
	}

	/// Returns the handle of the live instance of `def`, if any.
	pub fn handle(&self, def: &'static ComponentDef) -> Option<ComponentHandle> {
		self.slots
			.live_serial(def.id())
			.map(|serial| ComponentHandle { def, serial })
	}

	/// Typed access to the live instance of `def`.
	pub fn component_mut<T: Component>(&mut self, def: &'static ComponentDef) -> Option<&mut T> {
		let instance = self.slots.instance_mut(def.id())?;
		let any: &mut dyn Any = &mut **instance;
		any.downcast_mut::<T>()
	}

	fn activate_required(&mut self, def: &'static ComponentDef) {
		for &id in def.required_listeners {
			let Some(listener) = listener_index().get(id) else {
				warn!(
					component = def.meta.name,
					listener = id,
					"unknown required listener; skipping"
				);
				continue;
			};
			self.channels.activate(listener);
		}
	}

	fn deactivate_required(&mut self, def: &'static ComponentDef) {
		for &id in def.required_listeners {
			if let Some(listener) = listener_index().get(id) {
				self.channels.deactivate(listener);
			}
		}
	}

	/// Tears down services of `closing` that no enabled component needs.
	fn release_services(&mut self, closing: &'static ComponentDef) {
		for &service in closing.services {
			if self.slots.is_live(service.id()) && !self.still_required(service) {
				self.disable(service);
			}
		}
	}

	fn still_required(&self, service: &'static ComponentDef) -> bool {
		component_index().iter().any(|c| {
			self.slots.is_live(c.id()) && c.services.iter().any(|&s| std::ptr::eq(s, service))
		})
	}

	/// Runs a lifecycle callback with the instance checked out of its slot,
	/// so the callback can freely call back into the runtime.
	fn with_instance(
		&mut self,
		def: &'static ComponentDef,
		f: impl FnOnce(&mut Box<dyn Component>, &mut Runtime),
	) {
		if let Some(mut instance) = self.slots.take_instance(def.id()) {
			f(&mut instance, self);
			self.slots.put_instance(def.id(), instance);
		}
	}

	// ---- timers -------------------------------------------------------

	/// Sets the repeating timer of `def` to fire every `interval` ticks.
	///
	/// An interval of zero cancels the timer. A component has at most one
	/// timer; setting it again restarts the interval from now.
	pub fn set_timer(&mut self, def: &'static ComponentDef, interval: u64) {
		if interval == 0 {
			self.timers.retain(|t| !std::ptr::eq(t.owner, def));
			return;
		}
		if !self.slots.is_live(def.id()) {
			warn!(component = def.meta.name, "timer for a disabled component; ignoring");
			return;
		}
		let next_due = self.now + interval;
		if let Some(timer) = self.timers.iter_mut().find(|t| std::ptr::eq(t.owner, def)) {
			timer.interval = interval;
			timer.next_due = next_due;
		} else {
			self.timers.push(TimerSlot {
				owner: def,
				interval,
				next_due,
			});
		}
	}

	/// Advances the tick counter and fires due timers.
	///
	/// Due owners are snapshotted before any callback runs, and each owner's
	/// liveness is re-checked right before its `on_timer`: an earlier
	/// callback in the same tick may have disabled it.
	pub fn tick(&mut self) {
		self.now += 1;
		let now = self.now;

		let mut due = Vec::new();
		for timer in &mut self.timers {
			if timer.next_due <= now {
				timer.next_due = now + timer.interval;
				due.push(timer.owner);
			}
		}
		for def in due {
			if self.slots.is_live(def.id()) {
				self.with_instance(def, |instance, rt| instance.on_timer(rt));
			}
		}
	}

	// ---- host bridge --------------------------------------------------

	/// Routes a forwarded game event to its channel's dispatch.
	pub fn deliver(&self, event: HostEvent) -> DeliverOutcome {
		match event {
			HostEvent::Purchase(req) => {
				DeliverOutcome::Verdict(self.channels.dispatch_purchase(&req))
			}
			HostEvent::CashToss(req) => {
				DeliverOutcome::Verdict(self.channels.dispatch_cash_toss(&req))
			}
			HostEvent::Pickup(claim) => {
				DeliverOutcome::Verdict(self.channels.dispatch_pickup(&claim))
			}
			HostEvent::Chat(line) => DeliverOutcome::Chat(self.channels.dispatch_chat(line)),
			HostEvent::WaveStarted(ev) => {
				self.channels.dispatch_wave_started(&ev);
				DeliverOutcome::Done
			}
			HostEvent::WaveEnded(ev) => {
				self.channels.dispatch_wave_ended(&ev);
				DeliverOutcome::Done
			}
		}
	}

	// ---- startup and admin surface ------------------------------------

	/// Enables every feature whose persisted auto-enable flag is set.
	///
	/// Called once at process start, after the engine is up.
	pub fn startup(&mut self) {
		let autos: Vec<&'static ComponentDef> = component_index()
			.iter()
			.filter(|c| c.is_feature() && self.settings.auto_enable(c.meta.name))
			.collect();
		for def in autos {
			if self.enable(def).is_none() {
				warn!(feature = def.meta.name, "auto-enable failed");
			}
		}
	}

	fn feature_by_name(name: &str) -> Result<&'static ComponentDef, AdminError> {
		let def = component_index()
			.get(name)
			.ok_or_else(|| AdminError::UnknownFeature(name.to_string()))?;
		if def.role != Role::Feature {
			return Err(AdminError::NotAFeature(def.meta.name));
		}
		Ok(def)
	}

	/// Enables a feature by name, for the admin command layer.
	pub fn enable_by_name(&mut self, name: &str) -> Result<ComponentHandle, AdminError> {
		let def = Self::feature_by_name(name)?;
		self.enable(def)
			.ok_or(AdminError::EnableFailed(def.meta.name))
	}

	/// Disables a feature by name, for the admin command layer.
	pub fn disable_by_name(&mut self, name: &str) -> Result<(), AdminError> {
		let def = Self::feature_by_name(name)?;
		if self.disable(def) {
			Ok(())
		} else {
			Err(AdminError::NotEnabled(def.meta.name))
		}
	}

	/// Returns whether a feature is enabled, by name.
	pub fn is_enabled_by_name(&self, name: &str) -> Result<bool, AdminError> {
		Ok(self.is_enabled(Self::feature_by_name(name)?))
	}

	/// Sets and persists a feature's auto-enable flag.
	///
	/// The flag is type-scoped: it controls behavior at the next process
	/// start and does not enable or disable anything now.
	pub fn set_auto_enable(&mut self, name: &str, on: bool) -> Result<(), AdminError> {
		let def = Self::feature_by_name(name)?;
		self.settings.set_auto_enable(def.meta.name, on);
		if let Some(path) = &self.settings_path {
			self.settings.save(path)?;
		}
		Ok(())
	}
}
