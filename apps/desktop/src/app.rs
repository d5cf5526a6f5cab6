//! Root application component: header, side strip, page area, status bar.

use dioxus::prelude::*;
use searchlaunch_core::layout::LayoutType;
use searchlaunch_core::outside::{DomHit, PointerEvent};
use searchlaunch_core::route::SessionStore;

use crate::search::SearchLaunch;
use crate::sidebar::ActivityBar;
use crate::state::*;
use crate::workspace::FormWorkspacePanel;

static VARIABLES_CSS: Asset = asset!("/assets/styles/variables.css");
static APP_CSS: Asset = asset!("/assets/styles/app.css");

#[component]
pub fn App() -> Element {
    let mut session: Signal<AppSession> = use_context_provider(|| {
        Signal::new(AppSession::new(
            CONFIG.peek().clone(),
            SESSION_STORE.peek().clone(),
            SignalNavigator,
            TaskPreloader::new(WARM_CACHE.peek().clone()),
        ))
    });
    let mut pointer_seq = use_signal(|| 0u64);

    rsx! {
        document::Stylesheet { href: VARIABLES_CSS }
        document::Stylesheet { href: APP_CSS }

        div {
            class: "app-shell",
            onresize: move |e: Event<ResizeData>| {
                if let Ok(size) = e.get_border_box_size() {
                    *VIEWPORT_WIDTH.write() = size.width.max(0.0) as u32;
                }
            },
            // Bubbles after the header boundary's handler has marked inside hits.
            onmousedown: move |e: Event<MouseData>| {
                let inside = std::mem::take(&mut *POINTER_IN_HEADER.write());
                let seq = *pointer_seq.peek() + 1;
                pointer_seq.set(seq);
                let point = e.client_coordinates();
                let event = PointerEvent::mouse(seq, point.x, point.y);
                session.write().pointer_down(&event, &DomHit(inside));
            },

            // Header bar
            header {
                class: "app-header",
                span { class: "app-header-title", "SearchLaunch" }
                div { class: "app-header-spacer" }
                SearchLaunch {}
            }

            ActivityBar {}

            div {
                class: "content-area",
                PageView {}
                if *FORM_OPEN.read() {
                    FormWorkspacePanel {}
                }
            }

            StatusBar {}
        }
    }
}

/// Placeholder page body for the current route.
#[component]
fn PageView() -> Element {
    let location = LOCATION.read().clone();
    let page = current_snapshot()
        .ok()
        .and_then(|s| s.page().map(str::to_string))
        .unwrap_or_else(|| "unknown".to_string());

    rsx! {
        div {
            class: "page-view",
            h1 { class: "page-title", "{page}" }
            p { class: "page-location", "{location}" }
        }
    }
}

/// Status bar at the bottom of the app
#[component]
fn StatusBar() -> Element {
    let session = use_context::<Signal<AppSession>>();
    let width = *VIEWPORT_WIDTH.read();
    let config = CONFIG.read();
    let layout = LayoutType::from_width(width, &config.breakpoints);
    let persona = PERSONA.read().label();
    let warmed = WARM_CACHE.read().keys().len();

    let state = session.read().controller().state();
    let (visible, armed) = (state.visible(), state.armed_for_outside_close());
    let layout_name = layout.as_str();
    let return_url =
        SESSION_STORE.read().get(&config.return_url_key).unwrap_or_else(|| "-".to_string());

    rsx! {
        div {
            class: "statusbar",
            span { class: "statusbar-user", "{persona}" }
            span { class: "statusbar-sep", "|" }
            span { class: "statusbar-layout", "{layout_name} ({width}px)" }
            span { class: "statusbar-sep", "|" }
            span { class: "statusbar-state", "visible={visible} armed={armed}" }
            span { class: "statusbar-sep", "|" }
            span { class: "statusbar-return", "return: {return_url}" }
            span { class: "statusbar-sep", "|" }
            span { class: "statusbar-cache", "{warmed} profiles warm" }
        }
    }
}
