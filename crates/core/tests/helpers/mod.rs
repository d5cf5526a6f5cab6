//! Test harness for header search flows.
//!
//! Builds a `HeaderSearchSession` over an in-memory router, session store and
//! recording preloader, and exposes the steps a user or the router would take.

use std::cell::RefCell;
use std::rc::Rc;

use searchlaunch_core::outside::{PointerEvent, Rect};
use searchlaunch_core::route::{MemoryRouter, MemorySessionStore, SessionStore};
use searchlaunch_core::session::HeaderSearchSession;
use searchlaunch_core::types::*;

/// Where the header's search area sits on screen.
pub const HEADER_BOUNDARY: Rect = Rect { x: 800.0, y: 0.0, width: 400.0, height: 48.0 };

#[derive(Clone, Default)]
pub struct RecordingPreloader {
    pub calls: Rc<RefCell<Vec<String>>>,
}

impl searchlaunch_core::preload::Preloader for RecordingPreloader {
    fn preload(&self, resource_key: &str) {
        self.calls.borrow_mut().push(resource_key.to_string());
    }
}

pub struct Harness {
    pub session: HeaderSearchSession<MemorySessionStore, MemoryRouter, RecordingPreloader>,
    pub store: MemorySessionStore,
    pub preloads: Rc<RefCell<Vec<String>>>,
    pub user: UserContext,
    pub layout: LayoutClass,
    seq: u64,
}

impl Harness {
    pub fn at(location: &str) -> Self {
        let config = LaunchConfig::default();
        let store = MemorySessionStore::new();
        let router = MemoryRouter::new(&config.spa_base, location);
        let preloader = RecordingPreloader::default();
        let preloads = Rc::clone(&preloader.calls);
        Harness {
            session: HeaderSearchSession::new(config, store.clone(), router, preloader),
            store,
            preloads,
            user: UserContext::new(Some("u1"), ["Clinician"]),
            layout: LayoutClass::Wide,
            seq: 0,
        }
    }

    pub fn with_user(mut self, user: UserContext) -> Self {
        self.user = user;
        self
    }

    pub fn with_layout(mut self, layout: LayoutClass) -> Self {
        self.layout = layout;
        self
    }

    /// One render pass with the current route, user and layout.
    pub fn render(&mut self) -> RenderDecision {
        let snap = self.session.navigator().snapshot().expect("router location parses");
        let user = self.user.clone();
        self.session.evaluate(&snap, &user, self.layout)
    }

    /// Address-bar style route change (not a controller navigation).
    pub fn visit(&self, location: &str) {
        self.session.navigator().visit(location);
    }

    pub fn location(&self) -> String {
        self.session.navigator().location()
    }

    pub fn navigations(&self) -> Vec<String> {
        self.session.navigator().history()
    }

    pub fn return_url(&self) -> Option<String> {
        self.store.get(&self.session.config().return_url_key)
    }

    pub fn set_return_url(&self, url: &str) {
        self.store.set(&self.session.config().return_url_key, url);
    }

    pub fn visible(&self) -> bool {
        self.session.controller().state().visible()
    }

    pub fn armed(&self) -> bool {
        self.session.controller().state().armed_for_outside_close()
    }

    /// Pointer-down far below the header.
    pub fn click_outside(&mut self) -> bool {
        self.seq += 1;
        let event = PointerEvent::mouse(self.seq, 100.0, 600.0);
        self.session.pointer_down(&event, &HEADER_BOUNDARY)
    }

    /// Pointer-down inside the header search area.
    pub fn click_inside(&mut self) -> bool {
        self.seq += 1;
        let event = PointerEvent::mouse(self.seq, 900.0, 20.0);
        self.session.pointer_down(&event, &HEADER_BOUNDARY)
    }
}
