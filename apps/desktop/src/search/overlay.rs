//! Full-screen search overlay for narrow layouts.

use dioxus::prelude::*;

use super::compact_search::{matching_patients, open_chart};
use crate::state::*;

#[component]
pub fn SearchOverlay(initial_query: String) -> Element {
    let mut session = use_context::<Signal<AppSession>>();
    let mut term = use_signal(|| initial_query.clone());
    let current = term.read().clone();
    let patients = matching_patients(&current);

    rsx! {
        div {
            class: "search-overlay",

            div {
                class: "search-overlay-header",
                span { class: "search-overlay-title", "Search results" }
                button {
                    class: "header-action",
                    title: "Close",
                    onclick: move |_| {
                        session.write().close();
                    },
                    "\u{00D7}"
                }
            }

            input {
                class: "search-input",
                r#type: "text",
                placeholder: "Search for a patient by name or identifier number",
                value: "{current}",
                autofocus: true,
                oninput: move |e: Event<FormData>| term.set(e.value()),
            }

            if patients.is_empty() {
                div { class: "search-empty", "No patients match" }
            } else {
                ul {
                    class: "search-results",
                    for patient in patients {
                        li {
                            key: "{patient.uuid}",
                            class: "search-result",
                            // Close first so its return-URL navigation runs before the chart.
                            onclick: move |_| {
                                session.write().close();
                                open_chart(patient.uuid);
                            },
                            "{patient.name}"
                        }
                    }
                }
            }
        }
    }
}
