//! Log in to vault's aws auth method with AWS credentials.
//!
//! The credentials never leave the process. A SigV4 signed `sts:GetCallerIdentity`
//! request is built locally and handed to vault, which replays it against STS to learn
//! who the caller is.
//!
//! ```no_run
//! use vaultsign_aws_iam::{Authenticator, Config, Credential};
//! use vaultsign_core::{Context, OsEnv, Result};
//! use vaultsign_http_send_reqwest::ReqwestHttpSend;
//!
//! # async fn example() -> Result<()> {
//! let ctx = Context::new()
//!     .with_http_send(ReqwestHttpSend::default())
//!     .with_env(OsEnv);
//! let config = Config::default().with_role("my-role").from_env(&ctx);
//!
//! let cred = Credential::new("AKIDEXAMPLE", "wJalrXUtnFEMI/K7MDENG/bPxRfiCYEXAMPLEKEY");
//! let result = Authenticator::new(config).authenticate(&ctx, &cred).await?;
//! println!("token valid for {}s", result.lease_duration_seconds);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod constants;

mod config;
pub use config::Config;

mod credential;
pub use credential::Credential;

mod request;
pub use request::SignedRequest;
pub use request::UnsignedRequest;

mod sign_request;
pub use sign_request::canonical_headers;
pub use sign_request::canonical_request;
pub use sign_request::signed_headers;
pub use sign_request::string_to_sign;
pub use sign_request::RequestSigner;
pub use sign_request::SigningContext;
pub use sign_request::SigningKey;

mod payload;
pub use payload::LoginPayload;

mod vault;

mod login;
pub use login::login;
pub use login::Authenticator;
pub use login::LoginResult;

mod admin;
pub use admin::parse_account_manifest;
pub use admin::sts_role_arn;
pub use admin::Admin;
