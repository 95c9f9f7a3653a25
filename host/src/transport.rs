//! Executes the `HttpRequest`s components ask for.

use karangos_core::{HttpMethod, HttpRequest, HttpResponse};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("request to {path} failed: {source}")]
    Request {
        path: String,
        #[source]
        source: ureq::Error,
    },
}

/// A blocking HTTP round-trip.
///
/// Non-2xx statuses are returned as responses, not errors; only failures
/// that produce no response at all are `Err`.
pub trait Transport: Send + Sync + 'static {
    fn execute(&self, request: HttpRequest) -> Result<HttpResponse, TransportError>;
}

#[derive(Debug, Clone)]
pub struct UreqTransport {
    agent: ureq::Agent,
}

impl Default for UreqTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl UreqTransport {
    pub fn new() -> Self {
        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .build()
            .new_agent();
        Self { agent }
    }
}

impl Transport for UreqTransport {
    fn execute(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let HttpRequest {
            method,
            path,
            headers,
            body,
        } = request;
        tracing::debug!(method = method.as_str(), %path, "sending request");

        let result = match method {
            HttpMethod::Get => with_headers(self.agent.get(&path), &headers).call(),
            HttpMethod::Delete => with_headers(self.agent.delete(&path), &headers).call(),
            HttpMethod::Post => send(with_headers(self.agent.post(&path), &headers), body),
            HttpMethod::Put => send(with_headers(self.agent.put(&path), &headers), body),
        };
        let mut response = result.map_err(|source| TransportError::Request {
            path: path.clone(),
            source,
        })?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(k, v)| Some((k.as_str().to_string(), v.to_str().ok()?.to_string())))
            .collect();
        let body = response
            .body_mut()
            .read_to_string()
            .map_err(|source| TransportError::Request { path, source })?;

        tracing::debug!(status, "response received");
        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}

fn with_headers<B>(mut builder: ureq::RequestBuilder<B>, headers: &[(String, String)]) -> ureq::RequestBuilder<B> {
    for (name, value) in headers {
        builder = builder.header(name, value);
    }
    builder
}

fn send(
    builder: ureq::RequestBuilder<ureq::typestate::WithBody>,
    body: Option<String>,
) -> Result<ureq::http::Response<ureq::Body>, ureq::Error> {
    match body {
        Some(body) => builder.send(body.as_bytes()),
        None => builder.send_empty(),
    }
}
