//! Plumbing shared by the login and administration calls.

use crate::constants::*;
use crate::Config;
use bytes::Bytes;
use http::header::{ACCEPT, CONTENT_TYPE};
use http::{Method, Request, Response, StatusCode};
use log::debug;
use serde::{Deserialize, Serialize};
use vaultsign_core::{Context, Error, Result};

/// Build a JSON request against vault.
///
/// `token` is sent as `X-Vault-Token`, the namespace of the config as `X-Vault-Namespace`.
pub(crate) fn build_request<T: Serialize>(
    config: &Config,
    method: Method,
    url: &str,
    token: Option<&str>,
    body: Option<&T>,
) -> Result<Request<Bytes>> {
    let body = match body {
        Some(body) => Bytes::from(serde_json::to_vec(body).map_err(|e| {
            Error::unexpected("failed to serialize vault request body")
                .with_source(e)
                .with_context(format!("url: {url}"))
        })?),
        None => Bytes::new(),
    };

    let mut req = Request::builder()
        .method(method)
        .uri(url)
        .header(ACCEPT, "application/json");
    if !body.is_empty() {
        req = req.header(CONTENT_TYPE, "application/json");
    }
    if let Some(token) = token {
        req = req.header(X_VAULT_TOKEN, token);
    }
    if let Some(namespace) = config.namespace() {
        req = req.header(X_VAULT_NAMESPACE, namespace);
    }

    req.body(body).map_err(|e| {
        Error::request_invalid("failed to build vault request")
            .with_source(e)
            .with_context(format!("url: {url}"))
    })
}

/// Send the request, returning the response as text.
///
/// Only transport failures are errors here, callers decide what a status means.
pub(crate) async fn send(ctx: &Context, req: Request<Bytes>) -> Result<Response<String>> {
    let method = req.method().clone();
    let url = req.uri().to_string();

    let resp = ctx
        .http_send_as_string(req)
        .await
        .map_err(|e| e.with_context(format!("url: {url}")))?;
    debug!("vault responded {} to {method} {url}", resp.status());
    Ok(resp)
}

#[derive(Default, Deserialize)]
#[serde(default)]
struct ErrorResponse {
    errors: Vec<String>,
}

/// Turn a non-success response into a transport error.
///
/// Vault reports failures as `{"errors": [...]}`, those messages are folded into the
/// error message when present. The raw body is always kept.
pub(crate) fn parse_vault_error(op: &str, url: &str, status: StatusCode, content: &str) -> Error {
    let errors = serde_json::from_str::<ErrorResponse>(content)
        .map(|v| v.errors)
        .unwrap_or_default();

    let message = if errors.is_empty() {
        format!("{op} failed with status {status}")
    } else {
        format!("{op} failed with status {status}: {}", errors.join("; "))
    };

    Error::transport(message)
        .with_status(status)
        .with_response_body(content)
        .with_context(format!("url: {url}"))
}
