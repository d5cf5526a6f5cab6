//! End-to-end header search flows through `HeaderSearchSession`.
//!
//! Each test drives a harness over the in-memory router and session store the
//! same way the header component does: render, user action, render.

mod helpers;

use helpers::Harness;
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use searchlaunch_core::controller::SearchLaunchController;
use searchlaunch_core::types::*;

// ---------------------------------------------------------------------------
// Mount and route entry
// ---------------------------------------------------------------------------

#[test]
fn mount_on_search_route_opens_unarmed() {
    let mut h = Harness::at("/openmrs/spa/search?query=ann");
    let render = h.render();

    assert!(h.visible());
    assert!(!h.armed());
    assert!(!render.outside_close_armed);
    assert_eq!(
        render.view,
        HeaderView::Compact(CompactProps {
            initial_query_term: "ann".into(),
            navigate_on_select: true,
            is_search_route: true,
        })
    );
}

#[test]
fn mount_elsewhere_shows_icon() {
    let mut h = Harness::at("/openmrs/spa/home?query=ignored");
    let render = h.render();
    assert_eq!(render.view, HeaderView::Icon { actionable: true });
    assert!(!render.close_button);
}

#[test]
fn narrow_search_route_uses_overlay() {
    let mut h = Harness::at("/openmrs/spa/search?query=b").with_layout(LayoutClass::Narrow);
    assert_eq!(
        h.render().view,
        HeaderView::Overlay(OverlayProps { initial_query_term: "b".into() })
    );
}

#[test]
fn layout_change_swaps_variant_without_closing() {
    let mut h = Harness::at("/openmrs/spa/home");
    h.render();
    h.session.icon_clicked();
    assert_eq!(h.render().view.variant(), Some(SurfaceVariant::CompactInline));

    h.layout = LayoutClass::Narrow;
    assert_eq!(h.render().view.variant(), Some(SurfaceVariant::FullOverlay));
    assert!(h.armed());
}

// ---------------------------------------------------------------------------
// Outside clicks
// ---------------------------------------------------------------------------

#[test]
fn outside_click_closes_when_armed() {
    let mut h = Harness::at("/openmrs/spa/home");
    h.render();
    h.session.icon_clicked();
    assert!(h.armed());

    assert!(!h.click_inside());
    assert!(h.visible());

    assert!(h.click_outside());
    assert!(!h.visible());
    assert!(h.navigations().is_empty());
}

#[test]
fn outside_click_ignored_on_search_route() {
    let mut h = Harness::at("/openmrs/spa/search");
    h.render();
    assert!(!h.click_outside());
    assert!(h.visible());
    assert!(h.navigations().is_empty());
}

#[test]
fn outside_click_ignored_when_closed() {
    let mut h = Harness::at("/openmrs/spa/home");
    h.render();
    assert!(!h.click_outside());
    assert!(!h.visible());
}

// ---------------------------------------------------------------------------
// Close and the return URL
// ---------------------------------------------------------------------------

#[test]
fn close_on_search_route_returns_to_stored_url() {
    let mut h = Harness::at("/openmrs/spa/search?query=x");
    h.set_return_url("/chart/123");
    h.render();

    h.session.close();

    assert_eq!(h.navigations(), vec!["/chart/123".to_string()]);
    assert_eq!(h.return_url(), None);
    assert!(!h.visible());
}

#[test]
fn close_on_search_route_without_return_url_uses_default() {
    let mut h = Harness::at("/openmrs/spa/search");
    h.render();
    h.session.close();
    assert_eq!(h.navigations(), vec!["/ws/rest/v1/".to_string()]);
}

#[test]
fn close_elsewhere_does_not_navigate_but_clears_slot() {
    let mut h = Harness::at("/openmrs/spa/home");
    h.set_return_url("/stale");
    h.render();
    h.session.icon_clicked();
    h.session.close();
    assert!(h.navigations().is_empty());
    assert_eq!(h.return_url(), None);
}

#[test]
fn full_round_trip_through_search_route() {
    let mut h = Harness::at("/openmrs/spa/patient/42/chart/summary");
    h.render();
    h.session.icon_clicked();

    let here = h.session.navigator().snapshot().unwrap();
    h.session.enter_search(&here, "smith");
    assert_eq!(h.location(), "/openmrs/spa/search?query=smith");
    assert_eq!(h.return_url().as_deref(), Some("/openmrs/spa/patient/42/chart/summary"));

    h.render();
    assert!(h.visible());
    assert!(!h.armed());

    h.session.close();
    assert_eq!(h.location(), "/openmrs/spa/patient/42/chart/summary");
    assert_eq!(h.return_url(), None);

    // back off the search route: the surface stays closed
    let render = h.render();
    assert_eq!(render.view, HeaderView::Icon { actionable: true });
}

#[test]
fn arriving_on_search_route_by_address_bar_opens() {
    let mut h = Harness::at("/openmrs/spa/home");
    h.render();
    assert!(!h.visible());

    h.visit("/openmrs/spa/search?query=z");
    h.render();
    assert!(h.visible());
    assert!(!h.armed());
}

// ---------------------------------------------------------------------------
// Idempotence and preload
// ---------------------------------------------------------------------------

#[test]
fn double_open_has_no_duplicate_effects() {
    let mut c = SearchLaunchController::new(LaunchConfig::default());
    c.evaluate(&EvalInputs {
        route: RouteContext::default(),
        user: UserContext::anonymous(),
        layout: LayoutClass::Wide,
    });
    assert_eq!(c.open().len(), 1);
    assert!(c.open().is_empty());
    assert!(c.state().visible());
}

#[test]
fn preload_follows_user_id_changes() {
    let mut h = Harness::at("/openmrs/spa/home").with_user(UserContext::anonymous());
    h.render();
    assert!(h.preloads.borrow().is_empty());

    h.user = UserContext::new(Some("u1"), Vec::<String>::new());
    h.render();
    assert_eq!(*h.preloads.borrow(), vec!["/ws/rest/v1/user/u1".to_string()]);

    h.render();
    h.session.icon_clicked();
    h.render();
    assert_eq!(h.preloads.borrow().len(), 1);
}

// ---------------------------------------------------------------------------
// Suppression
// ---------------------------------------------------------------------------

#[test]
fn restricted_role_icon_is_never_actionable() {
    let kiosk = UserContext::new(Some("k1"), ["Self Registration"]);
    let mut h = Harness::at("/openmrs/spa/home").with_user(kiosk);
    assert_eq!(h.render().view, HeaderView::Icon { actionable: false });

    h.session.icon_clicked();
    assert!(!h.visible());
}

proptest! {
    #[test]
    fn restricted_role_suppresses_for_any_roles_and_visibility(
        extra in proptest::collection::vec("[a-z ]{1,12}", 0..5),
        open in any::<bool>(),
        search in any::<bool>(),
    ) {
        let mut roles = extra;
        roles.push("Self Registration".to_string());
        let mut c = SearchLaunchController::new(LaunchConfig::default());
        c.evaluate(&EvalInputs {
            route: RouteContext { is_search_route: search, initial_query: String::new() },
            user: UserContext::new(Some("u"), roles),
            layout: LayoutClass::Wide,
        });
        if open {
            c.open();
        }

        prop_assert!(c.suppressed());
        prop_assert!(c.toggle_open_from_icon().is_empty());
        if let HeaderView::Icon { actionable } = c.render().view {
            prop_assert!(!actionable);
        }
        let state = c.state();
        prop_assert!(!state.armed_for_outside_close() || state.visible());
    }
}
