//! Event channels and dispatch.
//!
//! A channel is a typed event category owning the ordered set of currently
//! active listeners. Activation order is dispatch order: the first listener
//! activated gets first refusal. Re-activating a listener after it was
//! deactivated appends it at the end; no original position is remembered.
//!
//! Dispatch always iterates a snapshot of the active set, so a callback that
//! indirectly mutates channel membership cannot affect the pass already in
//! flight.

use tracing::warn;

use crate::events::{CashTossRequest, ChatLine, PickupClaim, PurchaseRequest, WaveEvent};
use crate::listener::{ListenerDef, ListenerHandler};

/// The event categories the runtime routes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChannelId {
	/// Trader purchases (veto).
	Purchase,
	/// Cash throws (veto).
	CashToss,
	/// Dropped-item pickups (veto).
	Pickup,
	/// Chat broadcast (transform).
	Chat,
	/// Wave boundaries (notify).
	Wave,
}

impl ChannelId {
	/// All channels, in routing order.
	pub const ALL: [ChannelId; 5] = [
		ChannelId::Purchase,
		ChannelId::CashToss,
		ChannelId::Pickup,
		ChannelId::Chat,
		ChannelId::Wave,
	];

	/// Stable name used in logs and admin output.
	pub fn name(self) -> &'static str {
		match self {
			ChannelId::Purchase => "purchase",
			ChannelId::CashToss => "cash-toss",
			ChannelId::Pickup => "pickup",
			ChannelId::Chat => "chat",
			ChannelId::Wave => "wave",
		}
	}

	/// The dispatch policy this channel runs under.
	pub fn policy(self) -> DispatchPolicy {
		match self {
			ChannelId::Purchase | ChannelId::CashToss | ChannelId::Pickup => DispatchPolicy::Veto,
			ChannelId::Chat => DispatchPolicy::Transform,
			ChannelId::Wave => DispatchPolicy::Notify,
		}
	}
}

impl std::fmt::Display for ChannelId {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.write_str(self.name())
	}
}

/// How a channel runs its active listeners.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchPolicy {
	/// Call in activation order; the first [`Verdict::Deny`] stops the chain
	/// and denies the action. An empty set allows.
	Veto,
	/// Every listener runs, each consuming the previous listener's output.
	Transform,
	/// Every listener runs; there is no result.
	Notify,
}

/// Result of a veto-chain dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[must_use]
pub enum Verdict {
	/// Let the host proceed with its default behavior.
	#[default]
	Allow,
	/// Block the action; later listeners are not consulted.
	Deny,
}

impl Verdict {
	/// Returns true for [`Verdict::Allow`].
	pub fn is_allow(self) -> bool {
		self == Verdict::Allow
	}

	/// Returns true for [`Verdict::Deny`].
	pub fn is_deny(self) -> bool {
		self == Verdict::Deny
	}
}

/// The ordered active-listener set of one channel.
///
/// Membership is keyed on definition identity (`&'static ListenerDef`); a
/// listener appears at most once no matter how often it is activated.
pub struct ChannelState {
	id: ChannelId,
	active: Vec<&'static ListenerDef>,
}

impl ChannelState {
	fn new(id: ChannelId) -> Self {
		Self {
			id,
			active: Vec::new(),
		}
	}

	/// Adds `def` to the active set if absent.
	///
	/// Returns true if the set changed. Activating a listener declared for a
	/// different channel is a misconfiguration: skipped with a warning.
	pub fn activate(&mut self, def: &'static ListenerDef) -> bool {
		if def.channel != self.id {
			warn!(
				listener = def.meta.name,
				declared = %def.channel,
				channel = %self.id,
				"listener declared for a different channel; skipping activation"
			);
			return false;
		}
		if self.is_active(def) {
			return false;
		}
		self.active.push(def);
		true
	}

	/// Removes `def` from the active set. No-op if absent.
	pub fn deactivate(&mut self, def: &'static ListenerDef) -> bool {
		let before = self.active.len();
		self.active.retain(|a| !std::ptr::eq(*a, def));
		self.active.len() != before
	}

	/// Returns true if `def` is currently active on this channel.
	pub fn is_active(&self, def: &'static ListenerDef) -> bool {
		self.active.iter().any(|a| std::ptr::eq(*a, def))
	}

	/// The active set in activation order.
	pub fn active(&self) -> &[&'static ListenerDef] {
		&self.active
	}

	fn snapshot(&self) -> Vec<&'static ListenerDef> {
		self.active.clone()
	}
}

/// All channel states plus the typed dispatch entry points.
pub struct Channels {
	purchase: ChannelState,
	cash_toss: ChannelState,
	pickup: ChannelState,
	chat: ChannelState,
	wave: ChannelState,
}

impl Default for Channels {
	fn default() -> Self {
		Self::new()
	}
}

impl Channels {
	/// Creates the channel table with every active set empty.
	pub fn new() -> Self {
		Self {
			purchase: ChannelState::new(ChannelId::Purchase),
			cash_toss: ChannelState::new(ChannelId::CashToss),
			pickup: ChannelState::new(ChannelId::Pickup),
			chat: ChannelState::new(ChannelId::Chat),
			wave: ChannelState::new(ChannelId::Wave),
		}
	}

	/// Returns the state of one channel.
	pub fn channel(&self, id: ChannelId) -> &ChannelState {
		match id {
			ChannelId::Purchase => &self.purchase,
			ChannelId::CashToss => &self.cash_toss,
			ChannelId::Pickup => &self.pickup,
			ChannelId::Chat => &self.chat,
			ChannelId::Wave => &self.wave,
		}
	}

	fn channel_mut(&mut self, id: ChannelId) -> &mut ChannelState {
		match id {
			ChannelId::Purchase => &mut self.purchase,
			ChannelId::CashToss => &mut self.cash_toss,
			ChannelId::Pickup => &mut self.pickup,
			ChannelId::Chat => &mut self.chat,
			ChannelId::Wave => &mut self.wave,
		}
	}

	/// Activates `def` on the channel it is declared for.
	pub fn activate(&mut self, def: &'static ListenerDef) -> bool {
		self.channel_mut(def.channel).activate(def)
	}

	/// Deactivates `def` on the channel it is declared for.
	pub fn deactivate(&mut self, def: &'static ListenerDef) -> bool {
		self.channel_mut(def.channel).deactivate(def)
	}

	/// Returns true if `def` is active on its channel.
	pub fn is_active(&self, def: &'static ListenerDef) -> bool {
		self.channel(def.channel).is_active(def)
	}

	/// Runs the purchase veto chain.
	pub fn dispatch_purchase(&self, req: &PurchaseRequest) -> Verdict {
		for def in self.purchase.snapshot() {
			let ListenerHandler::Purchase(listener) = def.handler else {
				warn!(listener = def.meta.name, "handler does not match channel; skipping");
				continue;
			};
			if listener.allow_purchase(req).is_deny() {
				return Verdict::Deny;
			}
		}
		Verdict::Allow
	}

	/// Runs the cash-toss veto chain.
	pub fn dispatch_cash_toss(&self, req: &CashTossRequest) -> Verdict {
		for def in self.cash_toss.snapshot() {
			let ListenerHandler::CashToss(listener) = def.handler else {
				warn!(listener = def.meta.name, "handler does not match channel; skipping");
				continue;
			};
			if listener.allow_toss(req).is_deny() {
				return Verdict::Deny;
			}
		}
		Verdict::Allow
	}

	/// Runs the pickup veto chain.
	pub fn dispatch_pickup(&self, claim: &PickupClaim) -> Verdict {
		for def in self.pickup.snapshot() {
			let ListenerHandler::Pickup(listener) = def.handler else {
				warn!(listener = def.meta.name, "handler does not match channel; skipping");
				continue;
			};
			if listener.allow_claim(claim).is_deny() {
				return Verdict::Deny;
			}
		}
		Verdict::Allow
	}

	/// Runs the chat transform chain.
	///
	/// Every active listener runs in activation order, each receiving the
	/// previous listener's output. `None` means a listener dropped the line.
	pub fn dispatch_chat(&self, line: ChatLine) -> Option<ChatLine> {
		let mut line = line;
		for def in self.chat.snapshot() {
			let ListenerHandler::Chat(listener) = def.handler else {
				warn!(listener = def.meta.name, "handler does not match channel; skipping");
				continue;
			};
			line = listener.rewrite(line)?;
		}
		Some(line)
	}

	/// Notifies wave listeners that a wave started.
	pub fn dispatch_wave_started(&self, ev: &WaveEvent) {
		for def in self.wave.snapshot() {
			let ListenerHandler::Wave(listener) = def.handler else {
				warn!(listener = def.meta.name, "handler does not match channel; skipping");
				continue;
			};
			listener.wave_started(ev);
		}
	}

	/// Notifies wave listeners that a wave ended.
	pub fn dispatch_wave_ended(&self, ev: &WaveEvent) {
		for def in self.wave.snapshot() {
			let ListenerHandler::Wave(listener) = def.handler else {
				warn!(listener = def.meta.name, "handler does not match channel; skipping");
				continue;
			};
			listener.wave_ended(ev);
		}
	}
}
