//! Drives components by executing their effects.
//!
//! # Design
//! A `Session` stands in for the browser shell: it owns the current route,
//! the notification slot and the open confirmation prompt. Requests run on
//! tokio's blocking pool so a slow round-trip suspends only the interaction
//! that issued it. Components stay single-owner; the session borrows one
//! mutably for the duration of a `dispatch`.

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Instant;

use karangos_core::{
    ApiError, Client, ClientField, Component, Effect, FormController, HttpRequest, HttpResponse,
    ListView, Notification, NotificationSlot, Prompt, RecordClient, RecordId, Resource, Route,
    Vehicle, VehicleField,
};

use crate::config::{AppConfig, Theme};
use crate::transport::Transport;

pub struct Session<T: Transport> {
    transport: Arc<T>,
    config: AppConfig,
    client: RecordClient,
    route: Route,
    notifications: NotificationSlot,
    prompt: Option<Prompt>,
    history: Vec<Route>,
}

impl<T: Transport> Session<T> {
    pub fn new(transport: T, config: AppConfig) -> Self {
        let client = RecordClient::new(&config.api_base_url);
        let notifications = NotificationSlot::new(config.notification_timeout);
        Self {
            transport: Arc::new(transport),
            config,
            client,
            route: Route::List(Resource::Vehicles),
            notifications,
            prompt: None,
            history: Vec::new(),
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn theme(&self) -> &Theme {
        &self.config.theme
    }

    pub fn route(&self) -> Route {
        self.route
    }

    /// Routes navigated to, oldest first.
    pub fn history(&self) -> &[Route] {
        &self.history
    }

    pub fn prompt(&self) -> Option<Prompt> {
        self.prompt
    }

    pub fn notification(&mut self) -> Option<&Notification> {
        self.notifications.visible(Instant::now())
    }

    pub fn dismiss_notification(&mut self) -> Option<Notification> {
        self.notifications.dismiss()
    }

    pub fn vehicle_list(&self) -> ListView<Vehicle> {
        ListView::new(self.client.clone()).ordered_by(&[VehicleField::Brand, VehicleField::Model])
    }

    pub fn client_list(&self) -> ListView<Client> {
        ListView::new(self.client.clone()).ordered_by(&[ClientField::Name])
    }

    pub fn vehicle_form(&self, id: Option<RecordId>) -> FormController<Vehicle> {
        match id {
            Some(id) => FormController::edit(self.client.clone(), id),
            None => FormController::create(self.client.clone()),
        }
    }

    pub fn client_form(&self, id: Option<RecordId>) -> FormController<Client> {
        match id {
            Some(id) => FormController::edit(self.client.clone(), id),
            None => FormController::create(self.client.clone()),
        }
    }

    /// Execute `effects`, and everything they lead to, against `component`.
    pub async fn dispatch<C: Component>(&mut self, component: &mut C, effects: Vec<Effect>) {
        let mut queue: VecDeque<Effect> = effects.into();
        while let Some(effect) = queue.pop_front() {
            match effect {
                Effect::Send(request) => {
                    let response = self.execute(request).await;
                    queue.extend(component.on_response(response));
                }
                Effect::Navigate(route) => {
                    tracing::debug!(%route, "navigate");
                    self.history.push(route);
                    self.route = route;
                }
                Effect::Notify(notification) => {
                    self.notifications.show(notification, Instant::now());
                }
                Effect::Confirm(prompt) => {
                    self.prompt = Some(prompt);
                }
            }
        }
    }

    /// Answer the open prompt on behalf of the user.
    pub async fn answer<C: Component>(&mut self, component: &mut C, accepted: bool) {
        if self.prompt.take().is_none() {
            return;
        }
        let effects = component.resolve_prompt(accepted);
        self.dispatch(component, effects).await;
    }

    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        let transport = Arc::clone(&self.transport);
        let outcome = tokio::task::spawn_blocking(move || transport.execute(request))
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;
        outcome.map_err(|e| {
            tracing::warn!(error = %e, "transport failure");
            ApiError::Transport(e.to_string())
        })
    }
}
