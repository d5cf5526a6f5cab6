//! Header search launch: the icon that opens into an inline search control or a
//! full-screen overlay, driven by the core controller.

mod compact_search;
mod overlay;

use dioxus::prelude::*;
use searchlaunch_core::layout::classify;
use searchlaunch_core::types::HeaderView;
use tracing::warn;

use crate::state::*;
use compact_search::CompactSearch;
use overlay::SearchOverlay;

#[component]
pub fn SearchLaunch() -> Element {
    let mut session = use_context::<Signal<AppSession>>();

    // Re-evaluate whenever the route, the user or the viewport changes.
    use_effect(move || {
        let width = *VIEWPORT_WIDTH.read();
        let user = PERSONA.read().user();
        let snapshot = match current_snapshot() {
            Ok(s) => s,
            Err(e) => {
                warn!(error = %e, "Unparsable location");
                return;
            }
        };
        let layout = classify(width, &CONFIG.read().breakpoints);
        session.write().evaluate(&snapshot, &user, layout);
    });

    let render = session.read().controller().render();

    rsx! {
        div {
            class: "search-launch",
            // Mark pointer-downs that start inside the boundary; the shell consumes the flag.
            onmousedown: move |_| {
                *POINTER_IN_HEADER.write() = true;
            },

            match render.view {
                HeaderView::Icon { actionable } => rsx! {
                    button {
                        class: if actionable { "header-action search-icon-button" } else { "header-action search-icon-button hidden" },
                        title: "Search patient",
                        disabled: !actionable,
                        "data-testid": "searchPatientIcon",
                        onclick: move |_| {
                            session.write().icon_clicked();
                        },
                        SearchGlyph {}
                    }
                },
                HeaderView::Compact(props) => rsx! {
                    CompactSearch {
                        initial_query: props.initial_query_term,
                        navigate_on_select: props.navigate_on_select,
                    }
                },
                HeaderView::Overlay(props) => rsx! {
                    SearchOverlay { initial_query: props.initial_query_term }
                },
            }

            if render.close_button {
                button {
                    class: "header-action close-search-button",
                    title: "Close search panel",
                    "data-testid": "closeSearchIcon",
                    onclick: move |_| {
                        session.write().close();
                    },
                    "\u{00D7}"
                }
            }
        }
    }
}

#[component]
fn SearchGlyph() -> Element {
    rsx! {
        svg {
            class: "search-glyph",
            width: "20",
            height: "20",
            view_box: "0 0 24 24",
            fill: "none",
            stroke: "currentColor",
            stroke_width: "2",
            circle { cx: "11", cy: "11", r: "8" }
            line { x1: "21", y1: "21", x2: "16.65", y2: "16.65" }
        }
    }
}
