//! Log in to vault with AWS credentials taken from the environment.
//!
//! ```shell
//! VAULT_ADDR=http://127.0.0.1:8200 VAULT_AUTH_ROLE=my-role \
//! AWS_ACCESS_KEY_ID=... AWS_SECRET_ACCESS_KEY=... \
//! cargo run --example login
//! ```

use anyhow::Context as _;
use vaultsign_aws_iam::{Authenticator, Config, Credential};
use vaultsign_core::time::{format_rfc3339, now};
use vaultsign_core::{Context, OsEnv};
use vaultsign_http_send_reqwest::ReqwestHttpSend;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = env_logger::builder().try_init();

    let ctx = Context::new()
        .with_http_send(ReqwestHttpSend::default())
        .with_env(OsEnv);
    let config = Config::default().from_env(&ctx);

    let mut cred = Credential::new(
        ctx.env_var("AWS_ACCESS_KEY_ID")
            .context("AWS_ACCESS_KEY_ID must be set")?,
        ctx.env_var("AWS_SECRET_ACCESS_KEY")
            .context("AWS_SECRET_ACCESS_KEY must be set")?,
    );
    if let Some(token) = ctx.env_var("AWS_SESSION_TOKEN") {
        cred = cred.with_session_token(token);
    }

    let issued_at = now();
    let result = Authenticator::new(config).authenticate(&ctx, &cred).await?;

    println!("logged in: {result:?}");
    println!(
        "log in again before {}",
        format_rfc3339(result.expires_at(issued_at))
    );
    Ok(())
}
