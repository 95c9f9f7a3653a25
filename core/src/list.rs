//! Record list view.
//!
//! Fetches the collection once on mount and keeps the rows it got. A failed
//! fetch is logged and leaves the list empty; it never takes the page down.

use tracing::{debug, error, warn};

use crate::client::RecordClient;
use crate::effect::{Component, Effect, Notification, Prompt, Route};
use crate::error::ApiError;
use crate::http::HttpResponse;
use crate::types::{Record, RecordId};

pub const DELETE_SUCCESS_MESSAGE: &str = "Item excluído com sucesso.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListState {
    Idle,
    Fetching,
    Ready,
    Deleting(RecordId),
}

#[derive(Debug, Clone)]
pub struct ListView<R: Record> {
    client: RecordClient,
    order_by: Vec<R::Field>,
    rows: Vec<R>,
    state: ListState,
    pending_delete: Option<RecordId>,
}

impl<R: Record> ListView<R> {
    pub fn new(client: RecordClient) -> Self {
        Self {
            client,
            order_by: Vec::new(),
            rows: Vec::new(),
            state: ListState::Idle,
            pending_delete: None,
        }
    }

    /// Ask the server to sort the collection by these fields.
    pub fn ordered_by(mut self, fields: &[R::Field]) -> Self {
        self.order_by = fields.to_vec();
        self
    }

    pub fn rows(&self) -> &[R] {
        &self.rows
    }

    pub fn state(&self) -> ListState {
        self.state
    }

    pub fn mount(&mut self) -> Vec<Effect> {
        self.refresh()
    }

    pub fn refresh(&mut self) -> Vec<Effect> {
        if matches!(self.state, ListState::Fetching | ListState::Deleting(_)) {
            return Vec::new();
        }
        self.state = ListState::Fetching;
        vec![Effect::Send(self.client.build_list::<R>(&self.order_by))]
    }

    pub fn create(&self) -> Vec<Effect> {
        vec![Effect::Navigate(Route::New(R::RESOURCE))]
    }

    pub fn edit(&self, id: RecordId) -> Vec<Effect> {
        vec![Effect::Navigate(Route::Edit(R::RESOURCE, id))]
    }

    /// Ask for confirmation before deleting row `id`.
    pub fn delete(&mut self, id: RecordId) -> Vec<Effect> {
        if self.state != ListState::Ready {
            return Vec::new();
        }
        self.pending_delete = Some(id);
        vec![Effect::Confirm(Prompt::DeleteRecord(id))]
    }
}

impl<R: Record> Component for ListView<R> {
    fn on_response(&mut self, response: Result<HttpResponse, ApiError>) -> Vec<Effect> {
        let state = self.state;
        match state {
            ListState::Fetching => {
                self.state = ListState::Ready;
                match response.and_then(|r| self.client.parse_list::<R>(r)) {
                    Ok(rows) => {
                        debug!(resource = %R::RESOURCE, count = rows.len(), "list loaded");
                        self.rows = rows;
                    }
                    Err(e) => {
                        error!(resource = %R::RESOURCE, error = %e, "failed to load list");
                        self.rows.clear();
                    }
                }
                Vec::new()
            }
            ListState::Deleting(id) => {
                self.state = ListState::Ready;
                match response.and_then(|r| self.client.parse_delete(r)) {
                    Ok(()) => {
                        debug!(resource = %R::RESOURCE, id, "record deleted");
                        self.rows.retain(|row| row.id() != Some(id));
                        vec![Effect::Notify(Notification::success(DELETE_SUCCESS_MESSAGE))]
                    }
                    Err(e) => {
                        error!(resource = %R::RESOURCE, id, error = %e, "failed to delete record");
                        vec![Effect::Notify(Notification::error(format!("ERRO: {e}")))]
                    }
                }
            }
            _ => {
                warn!(?state, "unexpected response dropped");
                Vec::new()
            }
        }
    }

    fn resolve_prompt(&mut self, accepted: bool) -> Vec<Effect> {
        match self.pending_delete.take() {
            Some(id) if accepted && self.state == ListState::Ready => {
                self.state = ListState::Deleting(id);
                vec![Effect::Send(self.client.build_delete::<R>(id))]
            }
            _ => Vec::new(),
        }
    }
}
