//! Form workspace panel hosting a clinical form beside the page.

use dioxus::prelude::*;
use searchlaunch_core::form::{
    confirm_question_deletion, FormEffect, FormView, FormWorkspace, FormWorkspaceProps,
    RestrictedRoleRedirect,
};
use serde_json::Value;
use tracing::{info, warn};

use crate::state::*;

fn workspace() -> FormWorkspace<RestrictedRoleRedirect> {
    let patient = RECENT_PATIENTS.first().map(|p| p.uuid).unwrap_or_default();
    let mut props = FormWorkspaceProps::new("vitals-form", patient);
    props
        .additional_props
        .insert("openClinicalFormsWorkspaceOnFormClose".to_string(), Value::Bool(true));
    FormWorkspace::new(props, RestrictedRoleRedirect::from_config(&CONFIG.read()))
}

fn apply(effects: Vec<FormEffect>) {
    for effect in effects {
        match effect {
            FormEffect::CloseWorkspace | FormEffect::CloseWorkspaceWithSavedChanges => {
                *FORM_OPEN.write() = false;
                *FORM_DIRTY.write() = false;
            }
            FormEffect::LaunchWorkspace { name } => {
                info!(workspace = name.as_str(), "Launching workspace");
            }
            FormEffect::Navigate { to } => {
                *LOCATION.write() = to;
            }
            FormEffect::PromptBeforeClosing { dirty } => {
                *FORM_DIRTY.write() = dirty;
            }
        }
    }
}

#[component]
pub fn FormWorkspacePanel() -> Element {
    let ws = workspace();
    let view = ws.view(&FORM_LOAD.read());
    let dirty = *FORM_DIRTY.read();

    rsx! {
        aside {
            class: "form-workspace",

            div {
                class: "form-workspace-header",
                span { class: "form-workspace-title", "Clinical form" }
                if dirty {
                    span { class: "form-dirty-badge", "Unsaved changes" }
                }
                button {
                    class: "header-action",
                    title: "Close form",
                    onclick: move |_| apply(workspace().on_close()),
                    "\u{00D7}"
                }
            }

            match view {
                FormView::Loading { label } => rsx! {
                    div { class: "form-loading", "{label}" }
                },
                FormView::Error { message } => rsx! {
                    div {
                        class: "form-error",
                        p { "There was an error with this form" }
                        p { class: "form-error-detail", "{message}" }
                        button {
                            class: "form-btn",
                            onclick: move |_| apply(workspace().on_close()),
                            "Close"
                        }
                    }
                },
                FormView::Engine(engine) => rsx! {
                    FormEngine { questions: schema_questions(&engine.schema.definition), name: engine.schema.name.clone() }
                },
            }

            ConfirmModal {}
        }
    }
}

/// `(id, label)` for each question in the schema's pages and sections.
fn schema_questions(definition: &Value) -> Vec<(String, String)> {
    let pages = definition.get("pages").and_then(Value::as_array).cloned().unwrap_or_default();
    pages
        .iter()
        .filter_map(|page| page.get("sections").and_then(Value::as_array))
        .flatten()
        .filter_map(|section| section.get("questions").and_then(Value::as_array))
        .flatten()
        .filter_map(|q| {
            let id = q.get("id").and_then(Value::as_str)?;
            let label = q.get("label").and_then(Value::as_str).unwrap_or(id);
            Some((id.to_string(), label.to_string()))
        })
        .collect()
}

/// Stand-in for the external form engine.
#[component]
fn FormEngine(questions: Vec<(String, String)>, name: String) -> Element {
    let mut removed = use_signal(Vec::<String>::new);
    let shown: Vec<(String, String)> = questions
        .into_iter()
        .filter(|(id, _)| !removed.read().contains(id))
        .collect();

    rsx! {
        form {
            class: "form-engine",
            onsubmit: move |e: Event<FormData>| {
                e.prevent_default();
                let user = PERSONA.read().user();
                apply(workspace().on_submit(&user));
            },

            h2 { class: "form-name", "{name}" }

            for (id, label) in shown {
                div {
                    key: "{id}",
                    class: "form-question",
                    label { "{label}" }
                    input {
                        r#type: "text",
                        oninput: move |_| apply(vec![workspace().on_dirty_change(true)]),
                    }
                    button {
                        r#type: "button",
                        class: "form-btn subtle",
                        onclick: move |_| {
                            let id = id.clone();
                            let answer = confirm_question_deletion(&SignalModalHost);
                            spawn(async move {
                                match answer.await {
                                    Ok(()) => removed.write().push(id),
                                    Err(reason) => warn!(question = id.as_str(), %reason, "Kept question"),
                                }
                            });
                        },
                        "Delete"
                    }
                }
            }

            button { r#type: "submit", class: "form-btn primary", "Save and close" }
        }
    }
}

/// Renders whichever modal the host has raised.
#[component]
fn ConfirmModal() -> Element {
    let Some(name) = ACTIVE_MODAL.read().clone() else {
        return rsx! {};
    };

    rsx! {
        div {
            class: "modal-backdrop",
            div {
                class: "modal",
                "data-modal": "{name}",
                h3 { "Delete question" }
                p { "Are you sure you want to delete this question?" }
                div {
                    class: "modal-actions",
                    button {
                        class: "form-btn",
                        onclick: move |_| {
                            let reply = MODAL_REPLY.write().take();
                            if let Some(reply) = reply {
                                reply.cancel();
                            }
                        },
                        "Cancel"
                    }
                    button {
                        class: "form-btn danger",
                        onclick: move |_| {
                            let reply = MODAL_REPLY.write().take();
                            if let Some(reply) = reply {
                                reply.confirm();
                            }
                        },
                        "Delete"
                    }
                }
            }
        }
    }
}
