//! What components ask their host to do.
//!
//! Components (`FormController`, `ListView`) are plain state machines. Each
//! input returns a list of `Effect`s; the host executes them and hands HTTP
//! outcomes and prompt answers back through `Component`.

use std::fmt;
use std::time::{Duration, Instant};

use crate::error::ApiError;
use crate::http::{HttpRequest, HttpResponse};
use crate::types::{RecordId, Resource};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Execute this request and return the outcome via `Component::on_response`.
    Send(HttpRequest),
    Navigate(Route),
    Notify(Notification),
    /// Ask the user a yes/no question; answer via `Component::resolve_prompt`.
    Confirm(Prompt),
}

/// Screens the application can show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    List(Resource),
    New(Resource),
    Edit(Resource, RecordId),
}

impl Route {
    pub fn path(&self) -> String {
        match self {
            Route::List(r) => format!("/{}", r.path()),
            Route::New(r) => format!("/{}/new", r.path()),
            Route::Edit(r, id) => format!("/{}/{id}", r.path()),
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub severity: Severity,
    pub message: String,
    /// Persistent notifications stay until dismissed by the user.
    pub persistent: bool,
}

impl Notification {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Success,
            message: message.into(),
            persistent: false,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            message: message.into(),
            persistent: false,
        }
    }

    pub fn persistent(mut self) -> Self {
        self.persistent = true;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Prompt {
    DiscardChanges,
    DeleteRecord(RecordId),
}

impl Prompt {
    pub fn message(&self) -> &'static str {
        match self {
            Prompt::DiscardChanges => "Há dados não salvos. Deseja realmente voltar?",
            Prompt::DeleteRecord(_) => "Deseja realmente excluir este item?",
        }
    }
}

/// Anything that issues requests and consumes their outcomes.
pub trait Component {
    fn on_response(&mut self, response: Result<HttpResponse, ApiError>) -> Vec<Effect>;

    fn resolve_prompt(&mut self, accepted: bool) -> Vec<Effect>;
}

/// Holds the notification currently on screen.
///
/// A newer notification replaces the older one. Non-persistent entries
/// disappear once `timeout` has elapsed since they were shown.
#[derive(Debug, Clone)]
pub struct NotificationSlot {
    timeout: Duration,
    current: Option<(Notification, Instant)>,
}

impl NotificationSlot {
    pub fn new(timeout: Duration) -> Self {
        Self {
            timeout,
            current: None,
        }
    }

    pub fn show(&mut self, notification: Notification, now: Instant) {
        self.current = Some((notification, now));
    }

    /// The notification visible at `now`, dropping it if it has expired.
    pub fn visible(&mut self, now: Instant) -> Option<&Notification> {
        let expired = matches!(
            &self.current,
            Some((n, shown_at)) if !n.persistent && now.saturating_duration_since(*shown_at) >= self.timeout
        );
        if expired {
            self.current = None;
        }
        self.current.as_ref().map(|(n, _)| n)
    }

    pub fn dismiss(&mut self) -> Option<Notification> {
        self.current.take().map(|(n, _)| n)
    }
}
