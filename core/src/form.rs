//! Record form controller.
//!
//! # Design
//! One controller owns one draft for its whole lifetime. It never performs
//! I/O: mounting, submitting and cancelling return `Effect`s, and the host
//! feeds HTTP outcomes back through `Component::on_response`. At most one
//! request is outstanding at a time, and the state says which one it is
//! (`Loading` expects the fetch-by-id, `Submitting` the create or update).

use tracing::{debug, error, warn};

use crate::client::RecordClient;
use crate::effect::{Component, Effect, Notification, Prompt, Route};
use crate::error::{ApiError, FieldError};
use crate::http::HttpResponse;
use crate::types::{FieldValue, Record, RecordId};
use crate::validate::Validation;

pub const SAVE_SUCCESS_MESSAGE: &str = "Dados salvos com sucesso!";
pub const LOAD_FAILURE_MESSAGE: &str = "Não foi possível carregar os dados para edição.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormState {
    /// Fresh draft, nothing mounted yet.
    Blank,
    /// Fetch-by-id in flight.
    Loading,
    Editing,
    /// Create or update in flight; inputs and the submit control are disabled.
    Submitting,
    /// Saved; the host navigates away.
    Submitted,
    /// The record to edit could not be loaded. Nothing is editable.
    LoadFailed,
}

#[derive(Debug, Clone)]
pub struct FormController<R: Record> {
    client: RecordClient,
    target: Option<RecordId>,
    draft: R,
    errors: Validation<R::Field>,
    state: FormState,
    modified: bool,
    pending_prompt: Option<Prompt>,
}

impl<R: Record> FormController<R> {
    /// Form for a new record.
    pub fn create(client: RecordClient) -> Self {
        Self::with_target(client, None)
    }

    /// Form for the existing record `id`; `mount` fetches it.
    pub fn edit(client: RecordClient, id: RecordId) -> Self {
        Self::with_target(client, Some(id))
    }

    fn with_target(client: RecordClient, target: Option<RecordId>) -> Self {
        Self {
            client,
            target,
            draft: R::default(),
            errors: Validation::default(),
            state: FormState::Blank,
            modified: false,
            pending_prompt: None,
        }
    }

    pub fn draft(&self) -> &R {
        &self.draft
    }

    pub fn errors(&self) -> &Validation<R::Field> {
        &self.errors
    }

    pub fn state(&self) -> FormState {
        self.state
    }

    pub fn is_modified(&self) -> bool {
        self.modified
    }

    pub fn title(&self) -> &'static str {
        if self.target.is_some() {
            "Editar registro"
        } else {
            "Cadastrar novo registro"
        }
    }

    /// An edit form only becomes editable once its record has loaded.
    pub fn is_editable(&self) -> bool {
        match self.state {
            FormState::Blank => self.target.is_none(),
            FormState::Editing => true,
            _ => false,
        }
    }

    pub fn can_submit(&self) -> bool {
        self.is_editable()
    }

    pub fn submit_label(&self) -> &'static str {
        if self.state == FormState::Submitting {
            "Enviando..."
        } else {
            "Enviar"
        }
    }

    /// Called once when the form is first displayed.
    pub fn mount(&mut self) -> Vec<Effect> {
        if self.state != FormState::Blank {
            return Vec::new();
        }
        match self.target {
            Some(id) => {
                debug!(resource = %R::RESOURCE, id, "loading record for edit");
                self.state = FormState::Loading;
                vec![Effect::Send(self.client.build_get::<R>(id))]
            }
            None => {
                self.state = FormState::Editing;
                Vec::new()
            }
        }
    }

    /// Apply one edit and re-validate the updated draft.
    ///
    /// Ignored while the form is not editable.
    pub fn set_field(&mut self, field: R::Field, value: impl Into<FieldValue>) -> Result<(), FieldError> {
        if !self.is_editable() {
            debug!(?field, state = ?self.state, "edit ignored");
            return Ok(());
        }
        self.draft.set_field(field, value.into())?;
        self.state = FormState::Editing;
        self.modified = true;
        self.errors = self.draft.validate();
        Ok(())
    }

    /// Validate the current draft and, if it passes, send it.
    pub fn submit(&mut self) -> Vec<Effect> {
        if !self.can_submit() {
            debug!(state = ?self.state, "submit ignored");
            return Vec::new();
        }
        self.errors = self.draft.validate();
        if !self.errors.is_valid() {
            debug!(invalid = ?self.errors.invalid_fields(), "submit blocked by validation");
            return Vec::new();
        }

        let request = match self.target.or(self.draft.id()) {
            Some(id) => self.client.build_update(id, &self.draft),
            None => self.client.build_create(&self.draft),
        };
        match request {
            Ok(request) => {
                debug!(resource = %R::RESOURCE, method = request.method.as_str(), "submitting draft");
                self.state = FormState::Submitting;
                vec![Effect::Send(request)]
            }
            Err(e) => vec![Effect::Notify(save_failure(&e))],
        }
    }

    /// Leave the form, asking first if there are unsaved changes.
    pub fn go_back(&mut self) -> Vec<Effect> {
        if self.modified && self.state != FormState::Submitted {
            self.pending_prompt = Some(Prompt::DiscardChanges);
            return vec![Effect::Confirm(Prompt::DiscardChanges)];
        }
        vec![Effect::Navigate(Route::List(R::RESOURCE))]
    }

    fn on_loaded(&mut self, result: Result<R, ApiError>) -> Vec<Effect> {
        match result {
            Ok(record) => {
                debug!(resource = %R::RESOURCE, id = ?record.id(), "record loaded");
                self.draft = record;
                self.state = FormState::Editing;
                Vec::new()
            }
            Err(e) => {
                error!(resource = %R::RESOURCE, id = ?self.target, error = %e, "failed to load record");
                self.state = FormState::LoadFailed;
                vec![Effect::Notify(Notification::error(LOAD_FAILURE_MESSAGE).persistent())]
            }
        }
    }

    fn on_saved(&mut self, result: Result<R, ApiError>) -> Vec<Effect> {
        match result {
            Ok(record) => {
                debug!(resource = %R::RESOURCE, id = ?record.id(), "draft saved");
                self.draft = record;
                self.state = FormState::Submitted;
                self.modified = false;
                vec![
                    Effect::Notify(Notification::success(SAVE_SUCCESS_MESSAGE)),
                    Effect::Navigate(Route::List(R::RESOURCE)),
                ]
            }
            Err(e) => {
                warn!(resource = %R::RESOURCE, error = %e, "failed to save draft");
                self.state = FormState::Editing;
                vec![Effect::Notify(save_failure(&e))]
            }
        }
    }
}

fn save_failure(e: &ApiError) -> Notification {
    Notification::error(format!("ERRO: {e}"))
}

impl<R: Record> Component for FormController<R> {
    fn on_response(&mut self, response: Result<HttpResponse, ApiError>) -> Vec<Effect> {
        let state = self.state;
        match state {
            FormState::Loading => {
                let result = response.and_then(|r| self.client.parse_get::<R>(r));
                self.on_loaded(result)
            }
            FormState::Submitting => {
                let result = response.and_then(|r| {
                    if self.target.or(self.draft.id()).is_some() {
                        self.client.parse_update::<R>(r)
                    } else {
                        self.client.parse_create::<R>(r)
                    }
                });
                self.on_saved(result)
            }
            _ => {
                warn!(?state, "unexpected response dropped");
                Vec::new()
            }
        }
    }

    fn resolve_prompt(&mut self, accepted: bool) -> Vec<Effect> {
        match self.pending_prompt.take() {
            Some(Prompt::DiscardChanges) if accepted => {
                vec![Effect::Navigate(Route::List(R::RESOURCE))]
            }
            _ => Vec::new(),
        }
    }
}
