//! Global application state using Dioxus signals, plus the signal-backed
//! collaborators the header search session talks to.

use std::time::Duration;

use dioxus::prelude::*;
use searchlaunch_core::form::{Dispose, FormLoad, ModalHost, ModalReply};
use searchlaunch_core::preload::{Preloader, WarmCache};
use searchlaunch_core::route::{MemorySessionStore, Navigator, RouteSnapshot};
use searchlaunch_core::session::HeaderSearchSession;
use searchlaunch_core::types::{LaunchConfig, UserContext};

pub type AppSession = HeaderSearchSession<MemorySessionStore, SignalNavigator, TaskPreloader>;

/// A demo patient shown as a quick pick in the search surfaces.
#[derive(Clone, Copy, PartialEq)]
pub struct RecentPatient {
    pub uuid: &'static str,
    pub name: &'static str,
}

pub const RECENT_PATIENTS: &[RecentPatient] = &[
    RecentPatient { uuid: "a1f0", name: "Amina Otieno" },
    RecentPatient { uuid: "b2c7", name: "Brian Mwangi" },
    RecentPatient { uuid: "c9d3", name: "Chen Li" },
];

/// Signed-in identities the session switcher can toggle between.
#[derive(Clone, Copy, PartialEq, Eq)]
pub enum Persona {
    Clinician,
    SelfRegistration,
}

impl Persona {
    pub fn user(self) -> UserContext {
        match self {
            Persona::Clinician => UserContext::new(Some("clin-01"), ["Clinician", "Provider"]),
            Persona::SelfRegistration => UserContext::new(Some("kiosk-01"), ["Self Registration"]),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Persona::Clinician => "Clinician",
            Persona::SelfRegistration => "Self registration",
        }
    }
}

// ---------------------------------------------------------------------------
// Global signals
// ---------------------------------------------------------------------------

/// Launch configuration, taken from the pre-runtime slot on first read
pub static CONFIG: GlobalSignal<LaunchConfig> = Signal::global(|| {
    crate::INITIAL_CONFIG
        .lock()
        .ok()
        .and_then(|mut slot| slot.take())
        .unwrap_or_default()
});

/// Current location (path + query)
pub static LOCATION: GlobalSignal<String> =
    Signal::global(|| format!("{}/home", CONFIG.peek().spa_base.trim_end_matches('/')));

/// Shell width in CSS pixels, from the resize observer
pub static VIEWPORT_WIDTH: GlobalSignal<u32> = Signal::global(|| 1400);

pub static PERSONA: GlobalSignal<Persona> = Signal::global(|| Persona::Clinician);

/// Session-scoped storage shared with the navigation-entry collaborator
pub static SESSION_STORE: GlobalSignal<MemorySessionStore> = Signal::global(MemorySessionStore::new);

/// Profile cache warmed by the preloader
pub static WARM_CACHE: GlobalSignal<WarmCache> = Signal::global(WarmCache::new);

/// Set by the header boundary during a pointer-down, consumed by the shell
pub static POINTER_IN_HEADER: GlobalSignal<bool> = Signal::global(|| false);

/// Whether the form workspace is open
pub static FORM_OPEN: GlobalSignal<bool> = Signal::global(|| false);

pub static FORM_LOAD: GlobalSignal<FormLoad> = Signal::global(|| FormLoad::Loading);

pub static FORM_DIRTY: GlobalSignal<bool> = Signal::global(|| false);

/// Modal currently shown by [`SignalModalHost`], with its pending reply
pub static ACTIVE_MODAL: GlobalSignal<Option<String>> = Signal::global(|| None);

pub static MODAL_REPLY: GlobalSignal<Option<ModalReply>> = Signal::global(|| None);

pub fn current_snapshot() -> Result<RouteSnapshot, String> {
    let spa_base = CONFIG.read().spa_base.clone();
    RouteSnapshot::parse(&LOCATION.read(), &spa_base)
}

// ---------------------------------------------------------------------------
// Collaborators
// ---------------------------------------------------------------------------

/// Navigates by writing the location signal.
pub struct SignalNavigator;

impl Navigator for SignalNavigator {
    fn navigate(&self, to: &str) {
        tracing::info!(to, "Navigate");
        *LOCATION.write() = to.to_string();
    }
}

/// Warms the profile cache on a spawned task. Results are never observed.
pub struct TaskPreloader {
    cache: WarmCache,
}

impl TaskPreloader {
    pub fn new(cache: WarmCache) -> Self {
        Self { cache }
    }
}

impl Preloader for TaskPreloader {
    fn preload(&self, resource_key: &str) {
        let cache = self.cache.clone();
        let key = resource_key.to_string();
        spawn(async move {
            tokio::time::sleep(Duration::from_millis(50)).await;
            cache.preload(&key);
        });
    }
}

/// Shows modals through the `ACTIVE_MODAL` signal.
pub struct SignalModalHost;

impl ModalHost for SignalModalHost {
    fn show_modal(&self, name: &str, reply: ModalReply) -> Dispose {
        *ACTIVE_MODAL.write() = Some(name.to_string());
        *MODAL_REPLY.write() = Some(reply);
        Box::new(|| {
            *ACTIVE_MODAL.write() = None;
        })
    }
}
