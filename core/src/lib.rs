//! Client-side core for the Karangos record manager.
//!
//! # Overview
//! Vehicles ("karangos") and clients live behind a remote REST API. This
//! crate holds everything between the user's keystrokes and that API:
//! typed records, input masks, field validation, the request builder and
//! response parser, and the form and list components that tie them
//! together.
//!
//! # Design
//! - Nothing here touches the network. Components return `Effect`s and the
//!   host executes them, feeding results back through `Component`.
//! - `RecordClient` is stateless and generic over `Record`, so both
//!   resources share one build/parse path.
//! - Validation is a pure function of a draft snapshot.

pub mod client;
pub mod effect;
pub mod error;
pub mod form;
pub mod http;
pub mod list;
pub mod mask;
pub mod types;
pub mod validate;

pub use client::RecordClient;
pub use effect::{Component, Effect, Notification, NotificationSlot, Prompt, Route, Severity};
pub use error::{ApiError, FieldError};
pub use form::{FormController, FormState};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use list::{ListState, ListView};
pub use mask::{CharClass, Mask};
pub use types::{
    Client, ClientField, Color, Field, FieldValue, Flag, Record, RecordId, Resource, Vehicle,
    VehicleField,
};
pub use validate::Validation;
