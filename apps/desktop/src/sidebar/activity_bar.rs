//! Activity bar: vertical icon strip on the left edge.

use std::time::Duration;

use dioxus::prelude::*;
use searchlaunch_core::form::{FormLoad, FormSchema};
use serde_json::json;

use crate::state::*;

#[component]
pub fn ActivityBar() -> Element {
    let page = current_snapshot().ok().and_then(|s| s.page().map(str::to_string));
    let on_home = page.as_deref() == Some("home");
    let on_chart = page.as_deref() == Some("patient");
    let form_open = *FORM_OPEN.read();
    let persona = *PERSONA.read();
    let persona_label = persona.label();
    let initial = match persona {
        Persona::Clinician => "C",
        Persona::SelfRegistration => "S",
    };

    rsx! {
        nav {
            class: "activity-bar",

            // Home
            button {
                class: if on_home { "activity-btn active" } else { "activity-btn" },
                title: "Home",
                onclick: move |_| go_to("home"),
                svg {
                    width: "22",
                    height: "22",
                    view_box: "0 0 24 24",
                    fill: "none",
                    stroke: "currentColor",
                    stroke_width: "2",
                    path { d: "M3 9l9-7 9 7v11a2 2 0 01-2 2H5a2 2 0 01-2-2z" }
                }
            }

            // First recent patient's chart
            button {
                class: if on_chart { "activity-btn active" } else { "activity-btn" },
                title: "Patient chart",
                onclick: move |_| {
                    if let Some(patient) = RECENT_PATIENTS.first() {
                        go_to(&format!("patient/{}/chart", patient.uuid));
                    }
                },
                svg {
                    width: "22",
                    height: "22",
                    view_box: "0 0 24 24",
                    fill: "none",
                    stroke: "currentColor",
                    stroke_width: "2",
                    circle { cx: "12", cy: "8", r: "4" }
                    path { d: "M4 21v-1a7 7 0 0114 0v1" }
                }
            }

            // Form workspace
            button {
                class: if form_open { "activity-btn active" } else { "activity-btn" },
                title: "Clinical form",
                onclick: move |_| {
                    if *FORM_OPEN.peek() {
                        *FORM_OPEN.write() = false;
                    } else {
                        open_form();
                    }
                },
                svg {
                    width: "22",
                    height: "22",
                    view_box: "0 0 24 24",
                    fill: "none",
                    stroke: "currentColor",
                    stroke_width: "2",
                    path { d: "M14 2H6a2 2 0 00-2 2v16a2 2 0 002 2h12a2 2 0 002-2V8z" }
                    path { d: "M14 2v6h6" }
                }
            }

            div { class: "activity-spacer" }

            // Persona switcher
            button {
                class: "activity-btn persona-btn",
                title: "Signed in as {persona_label}",
                onclick: move |_| {
                    let next = match *PERSONA.peek() {
                        Persona::Clinician => Persona::SelfRegistration,
                        Persona::SelfRegistration => Persona::Clinician,
                    };
                    *PERSONA.write() = next;
                },
                "{initial}"
            }
        }
    }
}

fn go_to(page: &str) {
    let base = CONFIG.read().spa_base.trim_end_matches('/').to_string();
    *LOCATION.write() = format!("{base}/{page}");
}

/// Open the form workspace and simulate fetching its schema.
fn open_form() {
    *FORM_LOAD.write() = FormLoad::Loading;
    *FORM_DIRTY.write() = false;
    *FORM_OPEN.write() = true;

    spawn(async move {
        tokio::time::sleep(Duration::from_millis(400)).await;
        *FORM_LOAD.write() = FormLoad::Ready(FormSchema {
            uuid: "vitals-form".to_string(),
            name: "Vitals".to_string(),
            definition: json!({
                "pages": [{
                    "label": "Vitals",
                    "sections": [{
                        "label": "Measurements",
                        "questions": [
                            { "id": "temperature", "label": "Temperature (°C)" },
                            { "id": "pulse", "label": "Pulse" }
                        ]
                    }]
                }]
            }),
        });
    });
}
