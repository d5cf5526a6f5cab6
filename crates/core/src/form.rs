//! Form workspace policy: what happens around a rendered clinical form.
//!
//! The form engine itself is external. This module decides which view to show
//! while the schema loads, which workspace effects follow close and submit, and
//! delegates question-deletion confirmation to a modal host.
//!
//! The post-submit redirect for restricted-role users is a [`PostSubmitPolicy`]
//! rather than part of the header search controller.

use std::future::Future;
use std::sync::{Arc, Mutex};

use serde::Serialize;
use serde_json::{Map, Value};
use tokio::sync::oneshot;
use tracing::debug;

use crate::types::{LaunchConfig, UserContext};

pub const DEFAULT_CLINICAL_FORMS_WORKSPACE: &str = "clinical-forms-workspace";
pub const DELETE_QUESTION_MODAL: &str = "form-engine-delete-question-confirm-modal";

// ---------------------------------------------------------------------------
// Props and views
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FormSchema {
    pub uuid: String,
    pub name: String,
    pub definition: Value,
}

#[derive(Debug, Clone, PartialEq)]
pub enum FormLoad {
    Loading,
    Failed(String),
    Ready(FormSchema),
}

#[derive(Debug, Clone, PartialEq)]
pub struct FormWorkspaceProps {
    pub form_uuid: String,
    pub patient_uuid: String,
    /// Present when editing an existing encounter.
    pub encounter_uuid: Option<String>,
    pub visit_uuid: Option<String>,
    pub clinical_forms_workspace: String,
    pub additional_props: Map<String, Value>,
}

impl FormWorkspaceProps {
    pub fn new(form_uuid: &str, patient_uuid: &str) -> Self {
        Self {
            form_uuid: form_uuid.to_string(),
            patient_uuid: patient_uuid.to_string(),
            encounter_uuid: None,
            visit_uuid: None,
            clinical_forms_workspace: DEFAULT_CLINICAL_FORMS_WORKSPACE.to_string(),
            additional_props: Map::new(),
        }
    }

    pub fn open_clinical_forms_on_close(&self) -> bool {
        self.additional_props
            .get("openClinicalFormsWorkspaceOnFormClose")
            .and_then(Value::as_bool)
            .unwrap_or(false)
    }

    pub fn session_intent(&self) -> &str {
        self.additional_props
            .get("formSessionIntent")
            .and_then(Value::as_str)
            .unwrap_or("*")
    }

    pub fn mode(&self) -> Option<&str> {
        self.additional_props.get("mode").and_then(Value::as_str)
    }
}

/// Props forwarded to the external form engine.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EngineProps {
    pub schema: FormSchema,
    pub patient_uuid: String,
    pub encounter_uuid: Option<String>,
    pub visit_uuid: Option<String>,
    pub mode: Option<String>,
    pub session_intent: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "view", rename_all = "snake_case")]
pub enum FormView {
    Loading { label: String },
    /// Error panel whose close action runs [`FormWorkspace::on_close`].
    Error { message: String },
    Engine(EngineProps),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "effect", rename_all = "snake_case")]
pub enum FormEffect {
    CloseWorkspace,
    CloseWorkspaceWithSavedChanges,
    LaunchWorkspace { name: String },
    Navigate { to: String },
    PromptBeforeClosing { dirty: bool },
}

// ---------------------------------------------------------------------------
// Post-submit policy
// ---------------------------------------------------------------------------

/// Decides whether a successful submit leaves the patient chart.
pub trait PostSubmitPolicy {
    fn redirect_after_submit(&self, user: &UserContext) -> Option<String>;
}

/// Sends users carrying the restricted role to the home page; everyone else
/// stays with the default return to the chart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RestrictedRoleRedirect {
    pub role: String,
    pub home_path: String,
}

impl RestrictedRoleRedirect {
    pub fn from_config(config: &LaunchConfig) -> Self {
        Self {
            role: config.restricted_role.clone(),
            home_path: config.home_path.clone(),
        }
    }
}

impl PostSubmitPolicy for RestrictedRoleRedirect {
    fn redirect_after_submit(&self, user: &UserContext) -> Option<String> {
        user.has_role(&self.role).then(|| self.home_path.clone())
    }
}

// ---------------------------------------------------------------------------
// Workspace
// ---------------------------------------------------------------------------

pub struct FormWorkspace<P> {
    props: FormWorkspaceProps,
    policy: P,
}

impl<P: PostSubmitPolicy> FormWorkspace<P> {
    pub fn new(props: FormWorkspaceProps, policy: P) -> Self {
        Self { props, policy }
    }

    pub fn props(&self) -> &FormWorkspaceProps {
        &self.props
    }

    pub fn view(&self, load: &FormLoad) -> FormView {
        match load {
            FormLoad::Loading => FormView::Loading { label: "Loading ...".to_string() },
            FormLoad::Failed(message) => FormView::Error { message: message.clone() },
            FormLoad::Ready(schema) => FormView::Engine(EngineProps {
                schema: schema.clone(),
                patient_uuid: self.props.patient_uuid.clone(),
                encounter_uuid: self.props.encounter_uuid.clone(),
                visit_uuid: self.props.visit_uuid.clone(),
                mode: self.props.mode().map(str::to_string),
                session_intent: self.props.session_intent().to_string(),
            }),
        }
    }

    /// Close without saving. New-encounter forms may reopen the forms list.
    pub fn on_close(&self) -> Vec<FormEffect> {
        let mut effects = vec![FormEffect::CloseWorkspace];
        if self.props.encounter_uuid.is_none() && self.props.open_clinical_forms_on_close() {
            effects.push(FormEffect::LaunchWorkspace {
                name: self.props.clinical_forms_workspace.clone(),
            });
        }
        effects
    }

    pub fn on_submit(&self, user: &UserContext) -> Vec<FormEffect> {
        let mut effects = vec![FormEffect::CloseWorkspaceWithSavedChanges];
        if let Some(to) = self.policy.redirect_after_submit(user) {
            debug!(to = to.as_str(), "Post-submit redirect");
            effects.push(FormEffect::Navigate { to });
        }
        effects
    }

    pub fn on_dirty_change(&self, dirty: bool) -> FormEffect {
        FormEffect::PromptBeforeClosing { dirty }
    }
}

// ---------------------------------------------------------------------------
// Modal delegation
// ---------------------------------------------------------------------------

/// The user declined to delete the question.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeletionCancelled;

impl std::fmt::Display for DeletionCancelled {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "question deletion cancelled")
    }
}

impl std::error::Error for DeletionCancelled {}

pub type Dispose = Box<dyn FnOnce()>;

enum DisposeState {
    Pending,
    Registered(Dispose),
    Finished,
}

/// Shows named modals. The host calls exactly one of the reply's methods and
/// returns a function that tears the modal down.
pub trait ModalHost {
    fn show_modal(&self, name: &str, reply: ModalReply) -> Dispose;
}

pub struct ModalReply {
    tx: oneshot::Sender<Result<(), DeletionCancelled>>,
    dispose: Arc<Mutex<DisposeState>>,
}

impl ModalReply {
    pub fn confirm(self) {
        self.finish(Ok(()));
    }

    pub fn cancel(self) {
        self.finish(Err(DeletionCancelled));
    }

    fn finish(self, outcome: Result<(), DeletionCancelled>) {
        if let Ok(mut state) = self.dispose.lock() {
            match std::mem::replace(&mut *state, DisposeState::Finished) {
                DisposeState::Registered(dispose) => dispose(),
                DisposeState::Pending | DisposeState::Finished => {}
            }
        }
        let _ = self.tx.send(outcome);
    }
}

/// Ask the user to confirm deleting a repeated question. Resolves `Ok` on
/// confirm; cancel, or a host that drops the reply, resolves `Err`.
pub fn confirm_question_deletion(
    host: &dyn ModalHost,
) -> impl Future<Output = Result<(), DeletionCancelled>> {
    let (tx, rx) = oneshot::channel();
    let state = Arc::new(Mutex::new(DisposeState::Pending));
    let reply = ModalReply { tx, dispose: Arc::clone(&state) };

    let dispose = host.show_modal(DELETE_QUESTION_MODAL, reply);
    if let Ok(mut guard) = state.lock() {
        match std::mem::replace(&mut *guard, DisposeState::Pending) {
            // The host answered synchronously; tear down now.
            DisposeState::Finished => {
                *guard = DisposeState::Finished;
                dispose();
            }
            _ => *guard = DisposeState::Registered(dispose),
        }
    }

    async move { rx.await.unwrap_or(Err(DeletionCancelled)) }
}
