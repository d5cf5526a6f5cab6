//! Header search session: wires the controller to its collaborators.
//!
//! The session owns the [`SearchLaunchController`], the [`OutsideClickDetector`]
//! and the route/storage/preload collaborators, and applies the controller's
//! declared effects in order.

use tracing::{debug, info};

use crate::controller::SearchLaunchController;
use crate::outside::{Boundary, OutsideClickDetector, PointerEvent};
use crate::preload::Preloader;
use crate::route::{enter_search_route, route_context, Navigator, ReturnUrlSlot, RouteSnapshot, SessionStore};
use crate::types::*;

pub struct HeaderSearchSession<S, N, P> {
    controller: SearchLaunchController,
    detector: OutsideClickDetector,
    store: S,
    navigator: N,
    preloader: P,
}

impl<S, N, P> HeaderSearchSession<S, N, P>
where
    S: SessionStore,
    N: Navigator,
    P: Preloader,
{
    pub fn new(config: LaunchConfig, store: S, navigator: N, preloader: P) -> Self {
        Self {
            controller: SearchLaunchController::new(config),
            detector: OutsideClickDetector::new(false),
            store,
            navigator,
            preloader,
        }
    }

    pub fn controller(&self) -> &SearchLaunchController {
        &self.controller
    }

    pub fn config(&self) -> &LaunchConfig {
        self.controller.config()
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn navigator(&self) -> &N {
        &self.navigator
    }

    pub fn preloader(&self) -> &P {
        &self.preloader
    }

    pub fn outside_armed(&self) -> bool {
        self.detector.armed()
    }

    /// Evaluate against a parsed route snapshot.
    pub fn evaluate(
        &mut self,
        snapshot: &RouteSnapshot,
        user: &UserContext,
        layout: LayoutClass,
    ) -> RenderDecision {
        let inputs = EvalInputs {
            route: route_context(snapshot, self.controller.config()),
            user: user.clone(),
            layout,
        };
        let evaluation = self.controller.evaluate(&inputs);
        self.apply(evaluation.effects);
        evaluation.render
    }

    pub fn open(&mut self) -> RenderDecision {
        let effects = self.controller.open();
        self.apply(effects);
        self.controller.render()
    }

    pub fn icon_clicked(&mut self) -> RenderDecision {
        let effects = self.controller.toggle_open_from_icon();
        self.apply(effects);
        self.controller.render()
    }

    /// Explicit close: the close button, the overlay's close callback, or the
    /// overlay's post-select side effect.
    pub fn close(&mut self) -> RenderDecision {
        let key = self.controller.config().return_url_key.clone();
        let effects = {
            let slot = ReturnUrlSlot::new(&self.store, &key);
            self.controller.close(&slot)
        };
        self.apply(effects);
        self.controller.render()
    }

    pub fn compact_selected(&mut self) -> RenderDecision {
        let effects = self.controller.on_compact_select();
        self.apply(effects);
        self.controller.render()
    }

    /// Feed a pointer-down into the detector. Returns whether it dismissed the surface.
    pub fn pointer_down(&mut self, event: &PointerEvent, boundary: &dyn Boundary) -> bool {
        if !self.detector.observe(event, boundary) {
            return false;
        }
        let key = self.controller.config().return_url_key.clone();
        let effects = {
            let slot = ReturnUrlSlot::new(&self.store, &key);
            self.controller.on_outside_click(&slot)
        };
        let dismissed = !effects.is_empty();
        self.apply(effects);
        dismissed
    }

    /// Submit a term from the compact variant: remember the return URL and go to
    /// the search route. The surface stays open; the next evaluation disarms it.
    pub fn enter_search(&mut self, current: &RouteSnapshot, term: &str) -> RenderDecision {
        enter_search_route(&self.store, &self.navigator, self.controller.config(), current, term);
        self.controller.render()
    }

    fn apply(&mut self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::Navigate { to } => {
                    info!(to = to.as_str(), "Search session navigating");
                    self.navigator.navigate(&to);
                }
                Effect::ClearReturnUrl { key } => {
                    self.store.remove(&key);
                }
                Effect::Preload { resource_key } => {
                    debug!(key = resource_key.as_str(), "Preloading");
                    self.preloader.preload(&resource_key);
                }
                Effect::ArmOutsideClose { armed } => {
                    self.detector.set_armed(armed);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::outside::DomHit;
    use crate::preload::WarmCache;
    use crate::route::{MemoryRouter, MemorySessionStore};

    fn session(location: &str) -> HeaderSearchSession<MemorySessionStore, MemoryRouter, WarmCache> {
        let config = LaunchConfig::default();
        let router = MemoryRouter::new(&config.spa_base, location);
        HeaderSearchSession::new(config, MemorySessionStore::new(), router, WarmCache::new())
    }

    fn evaluate(s: &mut HeaderSearchSession<MemorySessionStore, MemoryRouter, WarmCache>) -> RenderDecision {
        let snap = s.navigator().snapshot().unwrap();
        let user = UserContext::new(Some("u1"), ["clinician"]);
        s.evaluate(&snap, &user, LayoutClass::Wide)
    }

    #[test]
    fn detector_follows_arming() {
        let mut s = session("/openmrs/spa/home");
        evaluate(&mut s);
        assert!(!s.outside_armed());
        s.icon_clicked();
        assert!(s.outside_armed());
        assert!(s.pointer_down(&PointerEvent::mouse(1, 0.0, 0.0), &DomHit(false)));
        assert!(!s.outside_armed());
        assert!(!s.controller().state().visible());
    }

    #[test]
    fn enter_search_then_close_round_trips() {
        let mut s = session("/openmrs/spa/patient/1/chart");
        evaluate(&mut s);
        s.icon_clicked();

        let snap = s.navigator().snapshot().unwrap();
        s.enter_search(&snap, "mary");
        assert_eq!(s.navigator().location(), "/openmrs/spa/search?query=mary");

        let render = evaluate(&mut s);
        assert!(matches!(render.view, HeaderView::Compact(ref p) if p.initial_query_term == "mary"));

        s.close();
        assert_eq!(s.navigator().location(), "/openmrs/spa/patient/1/chart");
        assert!(s.store().is_empty());
    }

    #[test]
    fn preload_reaches_preloader() {
        let mut s = session("/openmrs/spa/home");
        evaluate(&mut s);
        evaluate(&mut s);
        assert_eq!(s.preloader().requests("/ws/rest/v1/user/u1"), 1);
    }
}
