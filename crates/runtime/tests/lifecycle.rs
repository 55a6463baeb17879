//! End-to-end lifecycle and dispatch behavior over the public API.

use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use linkme::distributed_slice;
use pretty_assertions::assert_eq;
use rampart_registry::{
	ChannelId, ChatLine, ChatListener, PlayerId, PurchaseListener, PurchaseRequest, RegistryMeta,
	Verdict, listener, listener_index,
};
use rampart_runtime::{
	COMPONENTS, Component, ComponentDef, DeliverOutcome, HostEvent, Role, Runtime, Settings,
	features,
};

fn purchase() -> HostEvent {
	HostEvent::Purchase(PurchaseRequest {
		player: PlayerId(7),
		item: "9mm".into(),
		price: 200,
		wallet: 500,
	})
}

fn chat(text: &str) -> HostEvent {
	HostEvent::Chat(ChatLine {
		player: PlayerId(7),
		text: text.into(),
	})
}

// ---- listeners -------------------------------------------------------

static ORDER: Mutex<Vec<&'static str>> = Mutex::new(Vec::new());
static TAIL_CALLS: AtomicUsize = AtomicUsize::new(0);

struct FirstRefusal;
impl PurchaseListener for FirstRefusal {
	fn allow_purchase(&self, _req: &PurchaseRequest) -> Verdict {
		Verdict::Deny
	}
}
listener!(first_refusal, Purchase, "Denies every purchase", &FirstRefusal);

struct TailAllow;
impl PurchaseListener for TailAllow {
	fn allow_purchase(&self, _req: &PurchaseRequest) -> Verdict {
		TAIL_CALLS.fetch_add(1, Ordering::Relaxed);
		Verdict::Allow
	}
}
listener!(tail_allow, Purchase, "Allows every purchase", &TailAllow);

struct HeadAllow;
impl PurchaseListener for HeadAllow {
	fn allow_purchase(&self, _req: &PurchaseRequest) -> Verdict {
		ORDER.lock().unwrap().push("head_allow");
		Verdict::Allow
	}
}
listener!(head_allow, Purchase, "Allows and records order", &HeadAllow);

struct NextAllow;
impl PurchaseListener for NextAllow {
	fn allow_purchase(&self, _req: &PurchaseRequest) -> Verdict {
		ORDER.lock().unwrap().push("next_allow");
		Verdict::Allow
	}
}
listener!(next_allow, Purchase, "Allows and records order", &NextAllow);

struct Shout;
impl ChatListener for Shout {
	fn rewrite(&self, mut line: ChatLine) -> Option<ChatLine> {
		line.text = line.text.to_uppercase();
		Some(line)
	}
}
listener!(shout, Chat, "Uppercases chat", &Shout);

struct SharedEars;
impl ChatListener for SharedEars {}
listener!(shared_ears, Chat, "Shared between two features", &SharedEars);

fn def(id: &str) -> &'static rampart_registry::ListenerDef {
	listener_index().get(id).unwrap()
}

// ---- components ------------------------------------------------------

struct Nothing;
impl Component for Nothing {}

macro_rules! plain_component {
	($static_name:ident, $name:literal, $role:ident, required: $required:expr, services: $services:expr) => {
		#[distributed_slice(COMPONENTS)]
		static $static_name: ComponentDef = ComponentDef {
			meta: RegistryMeta::minimal(concat!("lifecycle::", $name), $name, "Test component"),
			role: Role::$role,
			required_listeners: $required,
			services: $services,
			build: || Box::new(Nothing),
		};
	};
}

plain_component!(BARE, "bare", Feature, required: &[], services: &[]);
plain_component!(
	DENYING_GUARD,
	"denying-guard",
	Feature,
	required: &["rampart-runtime::first_refusal", "rampart-runtime::tail_allow"],
	services: &[]
);
plain_component!(
	ORDERED_GUARD,
	"ordered-guard",
	Feature,
	required: &["rampart-runtime::head_allow", "rampart-runtime::next_allow"],
	services: &[]
);
plain_component!(
	LOUD_CHAT,
	"loud-chat",
	Feature,
	required: &["rampart-runtime::shout"],
	services: &[]
);
plain_component!(
	HALF_WIRED,
	"half-wired",
	Feature,
	required: &["rampart-runtime::does_not_exist", "rampart-runtime::shout"],
	services: &[]
);
plain_component!(BOOKKEEPER, "bookkeeper", Service, required: &[], services: &[]);
plain_component!(
	LEDGER_GUARD,
	"ledger-guard",
	Feature,
	required: &[],
	services: &[&BOOKKEEPER]
);
plain_component!(
	AUDIT_GUARD,
	"audit-guard",
	Feature,
	required: &[],
	services: &[&BOOKKEEPER]
);
plain_component!(
	EARS_ONE,
	"ears-one",
	Feature,
	required: &["rampart-runtime::shared_ears"],
	services: &[]
);
plain_component!(
	EARS_TWO,
	"ears-two",
	Feature,
	required: &["rampart-runtime::shared_ears"],
	services: &[]
);
plain_component!(AUTO_GUARD, "auto-guard", Feature, required: &[], services: &[]);

// ---- lifecycle properties --------------------------------------------

#[test]
fn enable_is_idempotent() {
	let mut rt = Runtime::new();
	let first = rt.enable(&BARE).unwrap();
	let again = rt.enable(&BARE).unwrap();
	assert_eq!(first, again);
}

#[test]
fn recreation_yields_a_new_instance() {
	let mut rt = Runtime::new();
	let first = rt.enable(&BARE).unwrap();
	assert!(rt.disable(&BARE));
	let second = rt.enable(&BARE).unwrap();
	assert_ne!(first, second);
	assert!(second.serial() > first.serial());
}

#[test]
fn double_disable_is_a_noop() {
	let mut rt = Runtime::new();
	rt.enable(&BARE).unwrap();
	assert!(rt.disable(&BARE));
	assert!(!rt.disable(&BARE));
	assert!(!rt.is_enabled(&BARE));
}

#[test]
fn disable_without_enable_fails() {
	let mut rt = Runtime::new();
	assert!(!rt.disable(&BARE));
}

#[test]
fn listeners_follow_the_component_lifecycle() {
	let mut rt = Runtime::new();
	let deny = def("rampart-runtime::first_refusal");
	let tail = def("rampart-runtime::tail_allow");

	assert!(!rt.channels().is_active(deny));
	assert!(!rt.channels().is_active(tail));

	rt.enable(&DENYING_GUARD).unwrap();
	assert!(rt.channels().is_active(deny));
	assert!(rt.channels().is_active(tail));

	assert!(rt.disable(&DENYING_GUARD));
	assert!(!rt.channels().is_active(deny));
	assert!(!rt.channels().is_active(tail));
}

#[test]
fn unknown_required_listener_is_skipped() {
	let mut rt = Runtime::new();
	rt.enable(&HALF_WIRED).unwrap();

	// The unresolved id did not block the enable and the rest got wired.
	assert!(rt.is_enabled(&HALF_WIRED));
	assert!(rt.channels().is_active(def("rampart-runtime::shout")));
	assert_eq!(rt.active_listeners(ChannelId::Chat).len(), 1);
	assert!(rt.disable(&HALF_WIRED));
}

// ---- dispatch through the host bridge --------------------------------

#[test]
fn veto_short_circuits_later_listeners() {
	let mut rt = Runtime::new();
	rt.enable(&DENYING_GUARD).unwrap();

	let before = TAIL_CALLS.load(Ordering::Relaxed);
	let outcome = rt.deliver(purchase());
	assert_eq!(outcome, DeliverOutcome::Verdict(Verdict::Deny));
	// The listener behind the veto never ran.
	assert_eq!(TAIL_CALLS.load(Ordering::Relaxed), before);
}

#[test]
fn pass_through_runs_in_activation_order() {
	let mut rt = Runtime::new();
	rt.enable(&ORDERED_GUARD).unwrap();

	ORDER.lock().unwrap().clear();
	let outcome = rt.deliver(purchase());
	assert_eq!(outcome, DeliverOutcome::Verdict(Verdict::Allow));
	assert_eq!(*ORDER.lock().unwrap(), vec!["head_allow", "next_allow"]);
}

#[test]
fn empty_channel_allows_by_default() {
	let rt = Runtime::new();
	assert_eq!(rt.deliver(purchase()), DeliverOutcome::Verdict(Verdict::Allow));
}

#[test]
fn chat_is_rewritten_by_the_active_chain() {
	let mut rt = Runtime::new();
	rt.enable(&LOUD_CHAT).unwrap();

	let DeliverOutcome::Chat(Some(line)) = rt.deliver(chat("medic here")) else {
		panic!("chat event must produce a chat outcome");
	};
	assert_eq!(line.text, "MEDIC HERE");

	assert!(rt.disable(&LOUD_CHAT));
	let DeliverOutcome::Chat(Some(line)) = rt.deliver(chat("medic here")) else {
		panic!("chat event must produce a chat outcome");
	};
	assert_eq!(line.text, "medic here");
}

#[test]
fn wave_notifications_complete_without_a_verdict() {
	let rt = Runtime::new();
	let outcome = rt.deliver(HostEvent::WaveStarted(rampart_registry::WaveEvent {
		number: 4,
		survivors: 6,
	}));
	assert_eq!(outcome, DeliverOutcome::Done);
}

// ---- services and sharing --------------------------------------------

#[test]
fn service_stays_while_any_dependent_is_enabled() {
	let mut rt = Runtime::new();
	rt.enable(&LEDGER_GUARD).unwrap();
	rt.enable(&AUDIT_GUARD).unwrap();
	assert!(rt.is_enabled(&BOOKKEEPER));

	assert!(rt.disable(&LEDGER_GUARD));
	assert!(rt.is_enabled(&BOOKKEEPER));

	assert!(rt.disable(&AUDIT_GUARD));
	assert!(!rt.is_enabled(&BOOKKEEPER));
}

#[test]
fn shared_listeners_are_not_reference_counted() {
	let mut rt = Runtime::new();
	let ears = def("rampart-runtime::shared_ears");

	rt.enable(&EARS_ONE).unwrap();
	rt.enable(&EARS_TWO).unwrap();
	assert!(rt.channels().is_active(ears));

	// Disabling one side deactivates the listener even though the other
	// feature still lists it. Components must not share listeners.
	assert!(rt.disable(&EARS_ONE));
	assert!(!rt.channels().is_active(ears));
	assert!(rt.is_enabled(&EARS_TWO));

	assert!(rt.disable(&EARS_TWO));
}

// ---- startup and admin surface ---------------------------------------

#[test]
fn startup_enables_flagged_features_only() {
	let mut settings = Settings::default();
	settings.set_auto_enable("auto-guard", true);
	settings.set_auto_enable("bookkeeper", true); // services carry no flag

	let mut rt = Runtime::with_settings(settings, None);
	rt.startup();

	assert!(rt.is_enabled(&AUTO_GUARD));
	assert!(!rt.is_enabled(&BARE));
	assert!(!rt.is_enabled(&BOOKKEEPER));
}

#[test]
fn feature_listing_excludes_services() {
	assert!(features().any(|f| f.meta.name == "auto-guard"));
	assert!(features().all(|f| f.meta.name != "bookkeeper"));
}

#[test]
fn admin_surface_resolves_features_by_name() {
	let mut rt = Runtime::new();

	let handle = rt.enable_by_name("bare").unwrap();
	assert_eq!(handle.def().meta.name, "bare");
	assert_eq!(Some(handle), rt.handle(&BARE));
	assert!(rt.is_enabled_by_name("bare").unwrap());

	rt.disable_by_name("bare").unwrap();
	assert!(!rt.is_enabled_by_name("bare").unwrap());

	assert!(rt.disable_by_name("bare").is_err());
	assert!(rt.enable_by_name("no-such-guard").is_err());
	// Services are not admin-addressable.
	assert!(rt.enable_by_name("bookkeeper").is_err());
}

#[test]
fn set_auto_enable_persists_to_the_bound_file() {
	let dir = tempfile::tempdir().unwrap();
	let path = dir.path().join("rampart.toml");

	let mut rt = Runtime::with_settings(Settings::default(), Some(path.clone()));
	rt.set_auto_enable("auto-guard", true).unwrap();

	let reloaded = Settings::load(&path).unwrap();
	assert!(reloaded.auto_enable("auto-guard"));
	assert!(!reloaded.auto_enable("bare"));

	rt.set_auto_enable("auto-guard", false).unwrap();
	let reloaded = Settings::load(&path).unwrap();
	assert!(!reloaded.auto_enable("auto-guard"));
}
