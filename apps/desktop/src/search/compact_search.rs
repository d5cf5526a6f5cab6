//! Inline search control shown in the header on wide layouts.

use dioxus::prelude::*;
use tracing::warn;

use crate::state::*;

#[component]
pub fn CompactSearch(initial_query: String, navigate_on_select: bool) -> Element {
    let mut session = use_context::<Signal<AppSession>>();
    let mut term = use_signal(|| initial_query.clone());
    let has_term = !term.read().trim().is_empty();
    let current = term.read().clone();

    rsx! {
        div {
            class: if has_term { "compact-search has-query" } else { "compact-search" },

            div {
                class: "search-input-row",

                svg {
                    class: "search-icon",
                    width: "16",
                    height: "16",
                    view_box: "0 0 24 24",
                    fill: "none",
                    stroke: "currentColor",
                    stroke_width: "2",
                    circle { cx: "11", cy: "11", r: "8" }
                    line { x1: "21", y1: "21", x2: "16.65", y2: "16.65" }
                }

                input {
                    class: "search-input",
                    r#type: "text",
                    placeholder: "Search for a patient by name or identifier number",
                    value: "{current}",
                    autofocus: true,
                    oninput: move |e: Event<FormData>| {
                        term.set(e.value());
                    },
                    onkeydown: move |e: Event<KeyboardData>| {
                        if e.key() != Key::Enter {
                            return;
                        }
                        let value = term.read().trim().to_string();
                        if value.is_empty() {
                            return;
                        }
                        match current_snapshot() {
                            Ok(snapshot) => {
                                session.write().enter_search(&snapshot, &value);
                            }
                            Err(err) => warn!(error = %err, "Cannot enter search from this location"),
                        }
                    },
                }

                if has_term {
                    button {
                        class: "search-clear",
                        onclick: move |_| term.set(String::new()),
                        "\u{00D7}"
                    }
                }
            }

            if has_term {
                ul {
                    class: "search-results",
                    for patient in matching_patients(&current) {
                        li {
                            key: "{patient.uuid}",
                            class: "search-result",
                            onclick: move |_| {
                                if navigate_on_select {
                                    open_chart(patient.uuid);
                                }
                                session.write().compact_selected();
                            },
                            "{patient.name}"
                        }
                    }
                }
            }
        }
    }
}

/// Recent patients whose name contains `term`, case-insensitively.
pub(super) fn matching_patients(term: &str) -> Vec<RecentPatient> {
    let needle = term.trim().to_lowercase();
    RECENT_PATIENTS
        .iter()
        .filter(|p| needle.is_empty() || p.name.to_lowercase().contains(&needle))
        .copied()
        .collect()
}

/// Navigate to a patient's chart.
pub(super) fn open_chart(uuid: &str) {
    let base = CONFIG.read().spa_base.trim_end_matches('/').to_string();
    *LOCATION.write() = format!("{base}/patient/{uuid}/chart");
}
