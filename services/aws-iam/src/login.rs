use crate::vault::{build_request, parse_vault_error, send};
use crate::{Config, Credential, LoginPayload, RequestSigner, UnsignedRequest};
use http::Method;
use log::debug;
use serde::Deserialize;
use std::fmt::{Debug, Formatter};
use vaultsign_core::time::{add_seconds, DateTime};
use vaultsign_core::utils::Redact;
use vaultsign_core::{Context, Error, Result};

/// Token returned by a successful login.
///
/// Tracking the expiry is up to the caller, see [`LoginResult::expires_at`].
#[derive(Clone, PartialEq, Eq)]
pub struct LoginResult {
    /// Vault client token.
    pub session_token: String,
    /// Seconds the token stays valid.
    pub lease_duration_seconds: u64,
}

impl LoginResult {
    /// Deadline after which a new login is needed.
    pub fn expires_at(&self, issued_at: DateTime) -> DateTime {
        add_seconds(issued_at, self.lease_duration_seconds)
    }
}

impl Debug for LoginResult {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginResult")
            .field("session_token", &Redact::from(&self.session_token))
            .field("lease_duration_seconds", &self.lease_duration_seconds)
            .finish()
    }
}

#[derive(Deserialize)]
struct LoginResponse {
    auth: AuthResponse,
}

#[derive(Deserialize)]
struct AuthResponse {
    client_token: String,
    lease_duration: u64,
}

/// Post the payload to `{address}/v1/{mount}/login`.
///
/// A single attempt is made. Non-success statuses are transport errors carrying the
/// status and body, a success without `auth.client_token` and `auth.lease_duration`
/// is an authentication result error.
pub async fn login(ctx: &Context, config: &Config, payload: &LoginPayload) -> Result<LoginResult> {
    let url = config.login_url()?;
    debug!("logging in to vault: {url}");

    let req = build_request(config, Method::POST, &url, None, Some(payload))?;
    let resp = send(ctx, req).await?;

    let status = resp.status();
    if !status.is_success() {
        return Err(parse_vault_error("vault login", &url, status, resp.body()));
    }

    let body = resp.into_body();
    let resp: LoginResponse = serde_json::from_str(&body).map_err(|e| {
        Error::auth_result_invalid("vault login response has no usable token")
            .with_source(e)
            .with_context(format!("url: {url}"))
            .with_context(format!("response_length: {}", body.len()))
    })?;

    Ok(LoginResult {
        session_token: resp.auth.client_token,
        lease_duration_seconds: resp.auth.lease_duration,
    })
}

/// Authenticator runs the whole login for one config.
///
/// Each call builds, signs and packages a fresh caller identity request, then logs in.
/// Nothing is cached between calls.
#[derive(Debug, Clone)]
pub struct Authenticator {
    config: Config,
    signer: RequestSigner,
}

impl Authenticator {
    /// Create a new authenticator signing for the region of the config.
    pub fn new(config: Config) -> Self {
        let signer = RequestSigner::new(config.region());
        Self { config, signer }
    }

    /// Replace the signer, mostly to pin the signing time in tests.
    pub fn with_signer(mut self, signer: RequestSigner) -> Self {
        self.signer = signer;
        self
    }

    /// The config in use.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Log in with the given credential.
    pub async fn authenticate(&self, ctx: &Context, cred: &Credential) -> Result<LoginResult> {
        self.config.validate_for_login()?;
        cred.validate()?;

        let req = UnsignedRequest::get_caller_identity(self.config.server_id());
        let signed = self.signer.sign(req, cred);
        let payload = LoginPayload::new(&signed, self.config.role()?);

        login(ctx, &self.config, &payload).await
    }
}
