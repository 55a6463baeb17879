//! Event payloads forwarded by the host engine.
//!
//! These are plain data carriers: the integration layer fills one in from
//! the engine's own event arguments and hands it to the matching channel
//! dispatch. Listeners only ever see these structs, never engine objects.

/// Stable identifier the host assigns to a connected player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PlayerId(pub u32);

impl std::fmt::Display for PlayerId {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "player#{}", self.0)
	}
}

/// A player attempting to buy an item from the trader.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PurchaseRequest {
	/// The buying player.
	pub player: PlayerId,
	/// Item identifier as the host names it (e.g. "9mm", "armor").
	pub item: String,
	/// Price the host is about to charge.
	pub price: u32,
	/// The player's current cash on hand.
	pub wallet: u32,
}

/// A player attempting to throw cash on the ground.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CashTossRequest {
	/// The throwing player.
	pub player: PlayerId,
	/// Amount being thrown.
	pub amount: u32,
	/// Host tick at which the throw was requested.
	pub tick: u64,
}

/// A player attempting to pick up a dropped item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PickupClaim {
	/// The claiming player.
	pub player: PlayerId,
	/// Item identifier of the pickup.
	pub item: String,
	/// How many items of this kind the player already carries.
	pub carried: u32,
	/// The player's carry capacity for this kind.
	pub capacity: u32,
}

/// A chat message about to be broadcast.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatLine {
	/// The sending player.
	pub player: PlayerId,
	/// Message text, possibly already rewritten by an earlier listener.
	pub text: String,
}

/// A wave boundary in the match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaveEvent {
	/// One-based wave number.
	pub number: u32,
	/// Players still standing when the event fired.
	pub survivors: u32,
}
