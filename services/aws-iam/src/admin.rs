//! Administration of the aws auth method: onboarding accounts and rotating the
//! credentials vault itself uses to call AWS.

use crate::constants::DEFAULT_IAM_ROLE_NAME;
use crate::vault::{build_request, parse_vault_error, send};
use crate::Config;
use futures::future::try_join_all;
use http::{Method, StatusCode};
use log::info;
use serde::{Deserialize, Serialize};
use vaultsign_core::{Context, Error, Result};

/// Parse a line-delimited list of AWS account numbers.
///
/// Whitespace is trimmed and blank lines are skipped.
pub fn parse_account_manifest(content: &str) -> Vec<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(ToString::to_string)
        .collect()
}

/// AWS account numbers are exactly 12 ASCII digits.
fn is_account_number(account: &str) -> bool {
    account.len() == 12 && account.bytes().all(|b| b.is_ascii_digit())
}

/// `arn:aws:iam::{account}:role/{iam_role_name}`
pub fn sts_role_arn(account: &str, iam_role_name: &str) -> String {
    format!("arn:aws:iam::{account}:role/{iam_role_name}")
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
struct StsRole {
    sts_role: String,
    #[serde(default)]
    external_id: String,
}

#[derive(Deserialize)]
struct StsRoleResponse {
    data: StsRole,
}

#[derive(Serialize)]
struct ClientConfig<'a> {
    access_key: &'a str,
    secret_key: &'a str,
}

/// Admin issues the administration calls of the aws auth method.
///
/// Every call is authenticated with the token of the config.
#[derive(Debug, Clone)]
pub struct Admin {
    config: Config,
}

impl Admin {
    /// Create a new admin client.
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Make sure `account` can be assumed through `iam_role_name` with `external_id`.
    ///
    /// `iam_role_name` defaults to `VaultAuth`. Returns `false` if vault already held the
    /// same role and external id, `true` if it has been written.
    pub async fn configure_sts_role(
        &self,
        ctx: &Context,
        account: &str,
        external_id: &str,
        iam_role_name: Option<&str>,
    ) -> Result<bool> {
        self.config.validate_for_admin()?;
        if !is_account_number(account) {
            return Err(Error::config_invalid("aws account number must be 12 digits")
                .with_context(format!("account: {account}")));
        }
        if external_id.is_empty() {
            return Err(Error::config_invalid("external id is empty")
                .with_context(format!("account: {account}")));
        }
        let iam_role_name = iam_role_name.unwrap_or(DEFAULT_IAM_ROLE_NAME);
        if iam_role_name.is_empty() {
            return Err(Error::config_invalid("iam role name is empty"));
        }

        let token = self.config.token()?;
        let url = self.config.mount_url(&format!("config/sts/{account}"))?;
        let expected = StsRole {
            sts_role: sts_role_arn(account, iam_role_name),
            external_id: external_id.to_string(),
        };

        let req = build_request::<()>(&self.config, Method::GET, &url, Some(token), None)?;
        let resp = send(ctx, req).await?;
        let status = resp.status();
        if status != StatusCode::NOT_FOUND {
            if !status.is_success() {
                return Err(parse_vault_error("read sts role", &url, status, resp.body()));
            }

            let current: StsRoleResponse = serde_json::from_str(resp.body()).map_err(|e| {
                Error::unexpected("failed to parse sts role config")
                    .with_source(e)
                    .with_context(format!("url: {url}"))
            })?;
            if current.data == expected {
                info!("sts role for account {account} is already configured");
                return Ok(false);
            }
        }

        let req = build_request(&self.config, Method::POST, &url, Some(token), Some(&expected))?;
        let resp = send(ctx, req).await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(parse_vault_error("write sts role", &url, status, resp.body()));
        }

        info!("configured sts role {} for account {account}", expected.sts_role);
        Ok(true)
    }

    /// Run [`Admin::configure_sts_role`] for every account concurrently.
    ///
    /// Fails with the first error, results are in the order of `accounts`.
    pub async fn configure_sts_roles(
        &self,
        ctx: &Context,
        accounts: &[String],
        external_id: &str,
        iam_role_name: Option<&str>,
    ) -> Result<Vec<bool>> {
        try_join_all(
            accounts
                .iter()
                .map(|account| self.configure_sts_role(ctx, account, external_id, iam_role_name)),
        )
        .await
    }

    /// Hand vault a new IAM user key pair, then let vault rotate it so only vault knows
    /// the secret.
    pub async fn rotate_client_credentials(
        &self,
        ctx: &Context,
        access_key: &str,
        secret_key: &str,
    ) -> Result<()> {
        self.config.validate_for_admin()?;
        if access_key.is_empty() {
            return Err(Error::config_invalid("aws access key id is empty"));
        }
        if secret_key.is_empty() {
            return Err(Error::config_invalid("aws secret access key is empty"));
        }
        let token = self.config.token()?;

        let url = self.config.mount_url("config/client")?;
        let body = ClientConfig {
            access_key,
            secret_key,
        };
        let req = build_request(&self.config, Method::POST, &url, Some(token), Some(&body))?;
        let resp = send(ctx, req).await?;
        if !resp.status().is_success() {
            let status = resp.status();
            return Err(parse_vault_error("write client config", &url, status, resp.body()));
        }
        info!("updated aws client config with user supplied access key");

        let url = self.config.mount_url("config/rotate-root")?;
        let req = build_request::<()>(&self.config, Method::POST, &url, Some(token), None)?;
        let resp = send(ctx, req).await?;
        if !resp.status().is_success() {
            let status = resp.status();
            return Err(parse_vault_error("rotate root credentials", &url, status, resp.body()));
        }
        info!("rotated aws client credentials, the secret key is now only known to vault");

        Ok(())
    }
}
