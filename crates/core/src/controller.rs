//! Search activation controller: the state machine behind the header search
//! affordance.
//!
//! The controller is a pure function of its inputs plus its own [`ActivationState`].
//! It never calls collaborators; navigation, slot clearing, preloads and detector
//! arming are returned as [`Effect`]s for the caller to apply in order.
//!
//! | State          | Entered by                                   | Left by                        |
//! |----------------|----------------------------------------------|--------------------------------|
//! | Closed         | mount off the search route, `close`          | `open`, icon click             |
//! | Open, armed    | `open` off the search route                  | outside click, `close`         |
//! | Open, unarmed  | mount on / entry into the search route       | leaving the route, `close`     |

use tracing::debug;

use crate::preload::{profile_resource_key, PreloadGate};
use crate::route::ReturnUrlSlot;
use crate::types::*;

#[derive(Debug)]
pub struct SearchLaunchController {
    config: LaunchConfig,
    state: ActivationState,
    route: RouteContext,
    layout: LayoutClass,
    suppressed: bool,
    mounted: bool,
    preload: PreloadGate,
}

impl SearchLaunchController {
    pub fn new(config: LaunchConfig) -> Self {
        Self {
            config,
            state: ActivationState::default(),
            route: RouteContext::default(),
            layout: LayoutClass::Wide,
            suppressed: false,
            mounted: false,
            preload: PreloadGate::new(),
        }
    }

    pub fn config(&self) -> &LaunchConfig {
        &self.config
    }

    pub fn state(&self) -> ActivationState {
        self.state
    }

    pub fn route(&self) -> &RouteContext {
        &self.route
    }

    /// Whether the icon is currently rendered non-actionable for a restricted role.
    pub fn suppressed(&self) -> bool {
        self.suppressed
    }

    /// Fold the current inputs into the controller and decide what to render.
    ///
    /// Mounting on the search route, or arriving on it, forces the surface open.
    pub fn evaluate(&mut self, inputs: &EvalInputs) -> Evaluation {
        let was_armed = self.state.armed_for_outside_close();
        let entering_search =
            inputs.route.is_search_route && (!self.mounted || !self.route.is_search_route);

        self.route = inputs.route.clone();
        self.layout = inputs.layout;
        self.suppressed = inputs.user.has_role(&self.config.restricted_role);

        if entering_search {
            debug!(first = !self.mounted, "Search route forces surface open");
            self.state.set_visible(true, true);
        } else {
            self.state.rearm(self.route.is_search_route);
        }
        self.mounted = true;

        let mut effects = Vec::new();
        self.push_arming(was_armed, &mut effects);

        if let Some(id) = self.preload.observe(inputs.user.id.as_deref()) {
            effects.push(Effect::Preload {
                resource_key: profile_resource_key(&self.config.rest_base_url, &id),
            });
        }

        Evaluation { render: self.render(), effects }
    }

    /// Show the search surface. Idempotent.
    pub fn open(&mut self) -> Vec<Effect> {
        if self.state.visible() {
            return Vec::new();
        }
        let was_armed = self.state.armed_for_outside_close();
        self.state.set_visible(true, self.route.is_search_route);
        debug!(armed = self.state.armed_for_outside_close(), "Search opened");

        let mut effects = Vec::new();
        self.push_arming(was_armed, &mut effects);
        effects
    }

    /// Icon click. Ignored while suppressed or while the surface is already open
    /// (the icon is not rendered then).
    pub fn toggle_open_from_icon(&mut self) -> Vec<Effect> {
        if self.suppressed || self.state.visible() {
            return Vec::new();
        }
        self.open()
    }

    /// Dismiss the search surface.
    ///
    /// On the search route this also navigates back to the stored return URL (or
    /// the default destination) even when the surface was already hidden. The
    /// slot is cleared exactly once per call.
    pub fn close(&mut self, slot: &ReturnUrlSlot<'_>) -> Vec<Effect> {
        let was_armed = self.state.armed_for_outside_close();
        self.state.set_visible(false, self.route.is_search_route);

        let mut effects = Vec::new();
        self.push_arming(was_armed, &mut effects);

        if self.route.is_search_route {
            let to = slot.read().unwrap_or_else(|| self.config.default_destination.clone());
            debug!(to = to.as_str(), "Leaving search route");
            effects.push(Effect::Navigate { to });
        }
        effects.push(Effect::ClearReturnUrl { key: slot.key().to_string() });
        effects
    }

    /// Outside-pointer callback. Arming already excludes the search route, so the
    /// navigation branch of `close` cannot run from here.
    pub fn on_outside_click(&mut self, slot: &ReturnUrlSlot<'_>) -> Vec<Effect> {
        if !self.state.armed_for_outside_close() {
            return Vec::new();
        }
        debug!("Outside click dismisses search");
        self.close(slot)
    }

    /// A result picked in the compact variant: hide and disarm without navigating.
    /// The compact variant performs its own navigation.
    pub fn on_compact_select(&mut self) -> Vec<Effect> {
        let was_armed = self.state.armed_for_outside_close();
        self.state.reset();

        let mut effects = Vec::new();
        self.push_arming(was_armed, &mut effects);
        effects
    }

    /// Render decision for the current state. Pure.
    pub fn render(&self) -> RenderDecision {
        let armed = self.state.armed_for_outside_close();
        if !self.state.visible() {
            return RenderDecision {
                view: HeaderView::Icon { actionable: !self.suppressed },
                close_button: false,
                outside_close_armed: armed,
            };
        }

        let initial_query_term = self.route.initial_query.clone();
        let view = match self.layout {
            LayoutClass::Wide => HeaderView::Compact(CompactProps {
                initial_query_term,
                navigate_on_select: true,
                is_search_route: self.route.is_search_route,
            }),
            LayoutClass::Narrow => HeaderView::Overlay(OverlayProps { initial_query_term }),
        };
        RenderDecision { view, close_button: true, outside_close_armed: armed }
    }

    fn push_arming(&self, was_armed: bool, effects: &mut Vec<Effect>) {
        let armed = self.state.armed_for_outside_close();
        if armed != was_armed {
            effects.push(Effect::ArmOutsideClose { armed });
        }
    }
}
