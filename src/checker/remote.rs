// src/checker/remote.rs
// =============================================================================
// This module checks if remote URLs are alive by making HTTP requests.
//
// Key functionality:
// - Makes HTTP HEAD requests (lightweight, no body download)
// - Waits for a slot in the concurrency gate before every request
// - Turns status codes and transport errors into a pass/fail answer
//
// Status code policy:
// - below 400: fine
// - 405 Method Not Allowed, 415 Unsupported Media Type: fine too, the server
//   just doesn't like HEAD requests, which says nothing about the page
// - anything else from 400 up: broken
//
// Redirects are not followed: a 3xx answer is below 400, so the link is
// fine whatever the redirect points at.
//
// A response whose headers are too large for the client's buffer still
// proves the resource exists, so that transport error counts as success.
// =============================================================================

use super::LinkChecker;
use crate::error::CheckError;
use reqwest::{Client, ClientBuilder, StatusCode};
use std::error::Error as _;
use tracing::debug;

/// Message of the transport error raised when response headers do not fit
/// the client's read buffer.
const OVERSIZED_HEADERS: &str = "message head is too large";

// Create an HTTP client with reasonable settings.
// We'll reuse this client for all requests (connection pooling).
pub(super) fn build_client() -> reqwest::Result<Client> {
    client_builder().build()
}

// Settings every probe client shares, tests included.
pub(super) fn client_builder() -> ClientBuilder {
    Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
}

impl LinkChecker {
    pub(super) async fn check_remote(&self, url: &str) -> Result<(), CheckError> {
        let permit = self
            .config
            .gate()
            .acquire()
            .await
            .map_err(|e| CheckError::Network(e.to_string()))?;

        let outcome = self.probe(url).await;
        permit.release();

        debug!(url, ok = outcome.is_ok(), "remote probe finished");
        outcome
    }

    // Sends one HEAD request and interprets the answer. The response has no
    // body to speak of and is dropped straight away.
    async fn probe(&self, url: &str) -> Result<(), CheckError> {
        let mut request = self.client.head(url);
        if let Some(timeout) = self.config.timeout() {
            request = request.timeout(timeout);
        }

        match request.send().await {
            Ok(response) => analyze_status(response.status()),
            Err(e) => categorize_error(&e),
        }
    }
}

/// Applies the status code policy.
pub fn analyze_status(status: StatusCode) -> Result<(), CheckError> {
    if status.as_u16() < 400
        || status == StatusCode::METHOD_NOT_ALLOWED
        || status == StatusCode::UNSUPPORTED_MEDIA_TYPE
    {
        return Ok(());
    }

    Err(CheckError::HttpStatus {
        code: status.as_u16(),
        reason: status.canonical_reason().unwrap_or("Unknown Status").to_string(),
    })
}

// Categorizes transport errors from reqwest.
//
// reqwest errors can happen for many reasons:
// - Network timeout
// - DNS resolution failure / connection refused
// - SSL certificate issues
// - Oversized response headers (tolerated)
fn categorize_error(error: &reqwest::Error) -> Result<(), CheckError> {
    if has_oversized_headers(error) {
        return Ok(());
    }

    let message = if error.is_timeout() {
        "request timed out".to_string()
    } else if error.is_connect() {
        format!("connection failed: {}", root_cause(error))
    } else {
        error_chain(error)
    };

    Err(CheckError::Network(message))
}

fn has_oversized_headers(error: &reqwest::Error) -> bool {
    let mut source: Option<&(dyn std::error::Error + 'static)> = Some(error);
    while let Some(err) = source {
        if err.to_string().contains(OVERSIZED_HEADERS) {
            return true;
        }
        source = err.source();
    }
    false
}

fn root_cause(error: &reqwest::Error) -> String {
    let mut cause: &(dyn std::error::Error + 'static) = error;
    while let Some(next) = cause.source() {
        cause = next;
    }
    cause.to_string()
}

fn error_chain(error: &reqwest::Error) -> String {
    let mut message = error.to_string();
    let mut source = error.source();
    while let Some(err) = source {
        message.push_str(": ");
        message.push_str(&err.to_string());
        source = err.source();
    }
    message
}
