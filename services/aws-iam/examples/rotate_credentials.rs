//! Give vault a fresh IAM user key pair and let vault rotate it right away.
//!
//! ```shell
//! VAULT_ADDR=http://127.0.0.1:8200 VAULT_TOKEN=... \
//! AWS_ACCESS_KEY_ID=... AWS_SECRET_ACCESS_KEY=... \
//! cargo run --example rotate_credentials
//! ```

use anyhow::Context as _;
use vaultsign_aws_iam::{Admin, Config};
use vaultsign_core::{Context, OsEnv};
use vaultsign_http_send_reqwest::ReqwestHttpSend;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::builder()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    let ctx = Context::new()
        .with_http_send(ReqwestHttpSend::default())
        .with_env(OsEnv);

    let access_key = ctx
        .env_var("AWS_ACCESS_KEY_ID")
        .context("AWS_ACCESS_KEY_ID must be set")?;
    let secret_key = ctx
        .env_var("AWS_SECRET_ACCESS_KEY")
        .context("AWS_SECRET_ACCESS_KEY must be set")?;

    Admin::new(Config::default().from_env(&ctx))
        .rotate_client_credentials(&ctx, &access_key, &secret_key)
        .await?;
    Ok(())
}
