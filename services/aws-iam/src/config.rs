use crate::constants::*;
use std::fmt::{Debug, Formatter};
use vaultsign_core::utils::{join_url, Redact};
use vaultsign_core::{Context, Error, Result};

/// Config carries all the configuration for the vault aws auth method.
///
/// Nothing in the signing or login path reads the environment, build a `Config`
/// once at the call site and pass it down.
#[derive(Clone, Default)]
pub struct Config {
    /// `address` will be loaded from
    ///
    /// - this field if it's `is_some`
    /// - env value: [`VAULT_ADDR`]
    pub address: Option<String>,
    /// `token` is only used by administration calls, it will be loaded from
    ///
    /// - this field if it's `is_some`
    /// - env value: [`VAULT_TOKEN`]
    pub token: Option<String>,
    /// `role` will be loaded from
    ///
    /// - this field if it's `is_some`
    /// - env value: [`VAULT_AUTH_ROLE`]
    pub role: Option<String>,
    /// `mount` will be loaded from
    ///
    /// - this field if it's `is_some`
    /// - env value: [`VAULT_AUTH_MOUNT`]
    /// - default to `auth/aws`
    pub mount: Option<String>,
    /// `region` will be loaded from
    ///
    /// - this field if it's `is_some`
    /// - env value: [`VAULT_AUTH_REGION`]
    /// - default to `us-east-1`
    pub region: Option<String>,
    /// `server_id` will be loaded from
    ///
    /// - this field if it's `is_some`
    /// - env value: [`VAULT_AWS_IAM_SERVER_ID`]
    pub server_id: Option<String>,
    /// `namespace` will be loaded from
    ///
    /// - this field if it's `is_some`
    /// - env value: [`VAULT_NAMESPACE`]
    pub namespace: Option<String>,
}

impl Debug for Config {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("address", &self.address)
            .field("token", &Redact::from(&self.token))
            .field("role", &self.role)
            .field("mount", &self.mount)
            .field("region", &self.region)
            .field("server_id", &self.server_id)
            .field("namespace", &self.namespace)
            .finish()
    }
}

impl Config {
    /// Load config from env.
    pub fn from_env(mut self, ctx: &Context) -> Self {
        if let Some(v) = ctx.env_var(VAULT_ADDR) {
            self.address.get_or_insert(v);
        }
        if let Some(v) = ctx.env_var(VAULT_TOKEN) {
            self.token.get_or_insert(v);
        }
        if let Some(v) = ctx.env_var(VAULT_AUTH_ROLE) {
            self.role.get_or_insert(v);
        }
        if let Some(v) = ctx.env_var(VAULT_AUTH_MOUNT) {
            self.mount.get_or_insert(v);
        }
        if let Some(v) = ctx.env_var(VAULT_AUTH_REGION) {
            self.region.get_or_insert(v);
        }
        if let Some(v) = ctx.env_var(VAULT_AWS_IAM_SERVER_ID) {
            self.server_id.get_or_insert(v);
        }
        if let Some(v) = ctx.env_var(VAULT_NAMESPACE) {
            self.namespace.get_or_insert(v);
        }

        self
    }

    /// Set the server address.
    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.address = Some(address.into());
        self
    }

    /// Set the bearer token for administration calls.
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Set the role to log in as.
    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.role = Some(role.into());
        self
    }

    /// Set the mount path of the aws auth method.
    pub fn with_mount(mut self, mount: impl Into<String>) -> Self {
        self.mount = Some(mount.into());
        self
    }

    /// Set the signing region.
    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

    /// Set the `X-Vault-AWS-IAM-Server-ID` value.
    pub fn with_server_id(mut self, server_id: impl Into<String>) -> Self {
        self.server_id = Some(server_id.into());
        self
    }

    /// Set the vault namespace.
    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    /// Mount path without surrounding slashes.
    pub fn mount(&self) -> &str {
        self.mount
            .as_deref()
            .unwrap_or(DEFAULT_MOUNT)
            .trim_matches('/')
    }

    /// Region the caller identity request is signed for.
    pub fn region(&self) -> &str {
        self.region.as_deref().unwrap_or(DEFAULT_REGION)
    }

    /// Server id header value, empty values are treated as unset.
    pub fn server_id(&self) -> Option<&str> {
        self.server_id.as_deref().filter(|v| !v.is_empty())
    }

    /// Namespace header value, empty values are treated as unset.
    pub fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref().filter(|v| !v.is_empty())
    }

    /// Check everything a login needs before any request is made.
    pub fn validate_for_login(&self) -> Result<()> {
        self.address()?;
        self.role()?;
        self.validate_mount()?;
        if self.region().is_empty() {
            return Err(Error::config_invalid("vault auth region is empty"));
        }
        Ok(())
    }

    /// Check everything an administration call needs before any request is made.
    pub fn validate_for_admin(&self) -> Result<()> {
        self.address()?;
        self.token()?;
        self.validate_mount()
    }

    /// `{address}/v1/{mount}/login`
    pub fn login_url(&self) -> Result<String> {
        self.mount_url("login")
    }

    /// Url of a path below the mount.
    pub(crate) fn mount_url(&self, path: &str) -> Result<String> {
        let path = format!("{VAULT_API_PREFIX}/{}/{path}", self.mount());
        Ok(join_url(self.address()?, &path))
    }

    pub(crate) fn address(&self) -> Result<&str> {
        non_empty(self.address.as_deref())
            .ok_or_else(|| Error::config_invalid("vault address is empty").with_context(VAULT_ADDR))
    }

    pub(crate) fn role(&self) -> Result<&str> {
        non_empty(self.role.as_deref()).ok_or_else(|| {
            Error::config_invalid("vault auth role is empty").with_context(VAULT_AUTH_ROLE)
        })
    }

    pub(crate) fn token(&self) -> Result<&str> {
        non_empty(self.token.as_deref())
            .ok_or_else(|| Error::config_invalid("vault token is empty").with_context(VAULT_TOKEN))
    }

    fn validate_mount(&self) -> Result<()> {
        if self.mount().is_empty() {
            return Err(
                Error::config_invalid("vault auth mount is empty").with_context(VAULT_AUTH_MOUNT)
            );
        }
        Ok(())
    }
}

fn non_empty(v: Option<&str>) -> Option<&str> {
    v.filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;
    use test_case::test_case;
    use vaultsign_core::StaticEnv;

    fn env_context(envs: &[(&str, &str)]) -> Context {
        Context::new().with_env(StaticEnv {
            envs: envs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect::<HashMap<_, _>>(),
        })
    }

    #[test]
    fn test_from_env() {
        let ctx = env_context(&[
            (VAULT_ADDR, "https://vault.example.com:8200"),
            (VAULT_TOKEN, "hvs.CAESIJlWh7a0xP"),
            (VAULT_AUTH_ROLE, "my-role"),
            (VAULT_AUTH_MOUNT, "auth/aws-prod"),
            (VAULT_AUTH_REGION, "eu-west-1"),
            (VAULT_AWS_IAM_SERVER_ID, "vault.example.com"),
            (VAULT_NAMESPACE, "team-a"),
        ]);

        let config = Config::default().from_env(&ctx);
        assert_eq!(
            config.address.as_deref(),
            Some("https://vault.example.com:8200")
        );
        assert_eq!(config.token.as_deref(), Some("hvs.CAESIJlWh7a0xP"));
        assert_eq!(config.role.as_deref(), Some("my-role"));
        assert_eq!(config.mount(), "auth/aws-prod");
        assert_eq!(config.region(), "eu-west-1");
        assert_eq!(config.server_id(), Some("vault.example.com"));
        assert_eq!(config.namespace(), Some("team-a"));
    }

    #[test]
    fn test_explicit_fields_win_over_env() {
        let ctx = env_context(&[
            (VAULT_ADDR, "https://env.example.com"),
            (VAULT_AUTH_ROLE, "env-role"),
        ]);

        let config = Config::default()
            .with_address("https://vault.example.com")
            .from_env(&ctx);
        assert_eq!(config.address.as_deref(), Some("https://vault.example.com"));
        assert_eq!(config.role.as_deref(), Some("env-role"));
    }

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.mount(), "auth/aws");
        assert_eq!(config.region(), "us-east-1");
        assert_eq!(config.server_id(), None);
        assert_eq!(config.namespace(), None);
    }

    #[test_case("http://127.0.0.1:8200", "auth/aws", "http://127.0.0.1:8200/v1/auth/aws/login"; "plain")]
    #[test_case("http://127.0.0.1:8200/", "/auth/aws/", "http://127.0.0.1:8200/v1/auth/aws/login"; "slashes")]
    #[test_case("https://vault.example.com", "aws-prod", "https://vault.example.com/v1/aws-prod/login"; "custom mount")]
    fn test_login_url(address: &str, mount: &str, expected: &str) -> Result<()> {
        let config = Config::default().with_address(address).with_mount(mount);
        assert_eq!(config.login_url()?, expected);
        Ok(())
    }

    #[test]
    fn test_validate_for_login() {
        let config = Config::default()
            .with_address("http://127.0.0.1:8200")
            .with_role("my-role");
        assert!(config.validate_for_login().is_ok());

        let err = Config::default()
            .with_role("my-role")
            .validate_for_login()
            .unwrap_err();
        assert!(err.is_config_error());

        let err = config.clone().with_role("").validate_for_login().unwrap_err();
        assert!(err.is_config_error());

        let err = config.clone().with_mount("/").validate_for_login().unwrap_err();
        assert!(err.is_config_error());

        let err = config.with_region("").validate_for_login().unwrap_err();
        assert!(err.is_config_error());
    }

    #[test]
    fn test_validate_for_admin() {
        let config = Config::default().with_address("http://127.0.0.1:8200");
        let err = config.validate_for_admin().unwrap_err();
        assert!(err.is_config_error());
        assert_eq!(err.context(), &[VAULT_TOKEN.to_string()]);

        assert!(config.with_token("root").validate_for_admin().is_ok());
    }

    #[test]
    fn test_debug_redacts_token() {
        let config = Config::default().with_token("hvs.CAESIJlWh7a0xP");
        let output = format!("{config:?}");
        assert!(!output.contains("hvs.CAESIJlWh7a0xP"));
        assert!(output.contains("hvs***0xP"));
    }
}
