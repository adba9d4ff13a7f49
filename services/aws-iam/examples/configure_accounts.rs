//! Register every AWS account listed in a manifest with vault's aws auth method.
//!
//! ```shell
//! VAULT_ADDR=http://127.0.0.1:8200 VAULT_TOKEN=... \
//! cargo run --example configure_accounts -- accounts.txt vault.example.com [VaultAuth]
//! ```

use anyhow::Context as _;
use vaultsign_aws_iam::{parse_account_manifest, Admin, Config};
use vaultsign_core::{Context, OsEnv};
use vaultsign_http_send_reqwest::ReqwestHttpSend;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::builder()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    let mut args = std::env::args().skip(1);
    let manifest = args.next().context("path to the accounts manifest is required")?;
    let external_id = args.next().context("external id is required")?;
    let iam_role_name = args.next();

    let content = tokio::fs::read_to_string(&manifest)
        .await
        .with_context(|| format!("failed to read {manifest}"))?;
    let accounts = parse_account_manifest(&content);

    let ctx = Context::new()
        .with_http_send(ReqwestHttpSend::default())
        .with_env(OsEnv);
    let admin = Admin::new(Config::default().from_env(&ctx));

    let changed = admin
        .configure_sts_roles(&ctx, &accounts, &external_id, iam_role_name.as_deref())
        .await?;
    println!(
        "{} of {} accounts updated",
        changed.iter().filter(|v| **v).count(),
        accounts.len()
    );
    Ok(())
}
