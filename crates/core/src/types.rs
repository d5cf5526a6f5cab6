//! Core types shared across the workspace: activation state, route and user
//! context, render decisions, declared effects, and runtime configuration.

use serde::Serialize;
use std::collections::BTreeSet;

use crate::layout::Breakpoints;

// ---------------------------------------------------------------------------
// Activation state
// ---------------------------------------------------------------------------

/// Visibility of the search surface plus whether outside clicks may dismiss it.
///
/// Both fields change together: every mutator recomputes `armed_for_outside_close`
/// from `visible` and the current route, so `armed ⇒ visible` always holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct ActivationState {
    visible: bool,
    armed_for_outside_close: bool,
}

impl ActivationState {
    pub fn new(visible: bool, is_search_route: bool) -> Self {
        Self {
            visible,
            armed_for_outside_close: visible && !is_search_route,
        }
    }

    pub fn visible(&self) -> bool {
        self.visible
    }

    pub fn armed_for_outside_close(&self) -> bool {
        self.armed_for_outside_close
    }

    /// Set visibility and re-arm in the same step.
    pub fn set_visible(&mut self, visible: bool, is_search_route: bool) {
        *self = Self::new(visible, is_search_route);
    }

    /// Re-derive arming after a route change without touching visibility.
    pub fn rearm(&mut self, is_search_route: bool) {
        *self = Self::new(self.visible, is_search_route);
    }

    /// Hide and disarm regardless of route.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

// ---------------------------------------------------------------------------
// Inputs
// ---------------------------------------------------------------------------

/// Route-derived facts, recomputed on every evaluation.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct RouteContext {
    pub is_search_route: bool,
    /// Only populated on the search route.
    pub initial_query: String,
}

/// The signed-in user as far as the header cares.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct UserContext {
    pub id: Option<String>,
    /// Lowercased role display names.
    pub role_names: BTreeSet<String>,
}

impl UserContext {
    pub fn new<I, S>(id: Option<&str>, roles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            id: id.filter(|s| !s.is_empty()).map(|s| s.to_string()),
            role_names: roles
                .into_iter()
                .map(|r| r.as_ref().trim().to_lowercase())
                .filter(|r| !r.is_empty())
                .collect(),
        }
    }

    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn has_role(&self, name: &str) -> bool {
        self.role_names.contains(&name.trim().to_lowercase())
    }
}

/// Coarse viewport class. Only desktop layouts are `Wide`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LayoutClass {
    Wide,
    Narrow,
}

/// Everything the controller reads on one evaluation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvalInputs {
    pub route: RouteContext,
    pub user: UserContext,
    pub layout: LayoutClass,
}

// ---------------------------------------------------------------------------
// Render decision
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SurfaceVariant {
    CompactInline,
    FullOverlay,
}

/// Props handed to the inline search control on wide layouts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompactProps {
    pub initial_query_term: String,
    pub navigate_on_select: bool,
    pub is_search_route: bool,
}

/// Props handed to the full-screen overlay. Its close and post-select
/// callbacks both route to the controller's `close`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OverlayProps {
    pub initial_query_term: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum HeaderView {
    /// The compact search icon. Stays in the tree when suppressed.
    Icon { actionable: bool },
    Compact(CompactProps),
    Overlay(OverlayProps),
}

impl HeaderView {
    pub fn variant(&self) -> Option<SurfaceVariant> {
        match self {
            HeaderView::Icon { .. } => None,
            HeaderView::Compact(_) => Some(SurfaceVariant::CompactInline),
            HeaderView::Overlay(_) => Some(SurfaceVariant::FullOverlay),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderDecision {
    pub view: HeaderView,
    /// The close action shown next to an open surface.
    pub close_button: bool,
    pub outside_close_armed: bool,
}

// ---------------------------------------------------------------------------
// Effects
// ---------------------------------------------------------------------------

/// Side effects declared by the controller and applied by the session runtime.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "effect", rename_all = "snake_case")]
pub enum Effect {
    Navigate { to: String },
    ClearReturnUrl { key: String },
    Preload { resource_key: String },
    ArmOutsideClose { armed: bool },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Evaluation {
    pub render: RenderDecision,
    pub effects: Vec<Effect>,
}

// ---------------------------------------------------------------------------
// Launch configuration
// ---------------------------------------------------------------------------

/// Runtime configuration. Loaded from `.searchlaunch.toml` or defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LaunchConfig {
    /// Path prefix of the single-page app; the page segment follows it.
    pub spa_base: String,
    pub rest_base_url: String,
    /// Page segment of the dedicated search route.
    pub search_segment: String,
    pub query_param: String,
    /// Session storage key holding the return URL.
    pub return_url_key: String,
    /// Where closing the search route goes when no return URL was stored.
    pub default_destination: String,
    pub restricted_role: String,
    /// Post-submit landing page for restricted-role users.
    pub home_path: String,
    pub breakpoints: Breakpoints,
}

impl Default for LaunchConfig {
    fn default() -> Self {
        let rest_base_url = "/ws/rest/v1".to_string();
        Self {
            spa_base: "/openmrs/spa".to_string(),
            default_destination: format!("{rest_base_url}/"),
            rest_base_url,
            search_segment: "search".to_string(),
            query_param: "query".to_string(),
            return_url_key: "searchReturnUrl".to_string(),
            restricted_role: "self registration".to_string(),
            home_path: "/openmrs/spa/home".to_string(),
            breakpoints: Breakpoints::default(),
        }
    }
}

impl LaunchConfig {
    /// Location of the dedicated search route for a term.
    pub fn search_location(&self, term: &str) -> String {
        let base = self.spa_base.trim_end_matches('/');
        if term.is_empty() {
            return format!("{base}/{}", self.search_segment);
        }
        let query: String = url::form_urlencoded::Serializer::new(String::new())
            .append_pair(&self.query_param, term)
            .finish();
        format!("{base}/{}?{query}", self.search_segment)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn armed_implies_visible() {
        for visible in [false, true] {
            for search in [false, true] {
                let s = ActivationState::new(visible, search);
                assert!(!s.armed_for_outside_close() || s.visible());
            }
        }
    }

    #[test]
    fn rearm_tracks_route_without_touching_visibility() {
        let mut s = ActivationState::new(true, false);
        assert!(s.armed_for_outside_close());
        s.rearm(true);
        assert!(s.visible());
        assert!(!s.armed_for_outside_close());
        s.rearm(false);
        assert!(s.armed_for_outside_close());
    }

    #[test]
    fn user_roles_are_lowercased() {
        let user = UserContext::new(Some("u1"), ["Self Registration", " Clinician "]);
        assert!(user.has_role("self registration"));
        assert!(user.has_role("SELF REGISTRATION"));
        assert!(user.has_role("clinician"));
    }

    #[test]
    fn empty_user_id_is_absent() {
        let user = UserContext::new(Some(""), Vec::<String>::new());
        assert_eq!(user.id, None);
    }

    #[test]
    fn search_location_encodes_term() {
        let config = LaunchConfig::default();
        assert_eq!(config.search_location(""), "/openmrs/spa/search");
        assert_eq!(config.search_location("john doe"), "/openmrs/spa/search?query=john+doe");
    }

    #[test]
    fn default_destination_follows_rest_base() {
        assert_eq!(LaunchConfig::default().default_destination, "/ws/rest/v1/");
    }
}
