use crate::init_vault_test;
use anyhow::Result;
use http::StatusCode;
use serde_json::json;
use vaultsign_aws_iam::{parse_account_manifest, Admin};
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, ResponseTemplate};

#[tokio::test]
async fn test_configure_accounts() -> Result<()> {
    let (server, ctx, config) = init_vault_test().await;

    // 111111111111 is already configured, 222222222222 is not.
    Mock::given(method("GET"))
        .and(path("/v1/auth/aws/config/sts/111111111111"))
        .and(header("x-vault-token", "root"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {
                "sts_role": "arn:aws:iam::111111111111:role/VaultAuth",
                "external_id": "vault.example.com"
            }
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/auth/aws/config/sts/222222222222"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({"errors": []})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/v1/auth/aws/config/sts/222222222222"))
        .and(header("x-vault-token", "root"))
        .and(body_json(json!({
            "sts_role": "arn:aws:iam::222222222222:role/VaultAuth",
            "external_id": "vault.example.com"
        })))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/v1/auth/aws/config/sts/111111111111"))
        .respond_with(ResponseTemplate::new(204))
        .expect(0)
        .mount(&server)
        .await;

    let accounts = parse_account_manifest("111111111111\n\n  222222222222\n");
    let changed = Admin::new(config.with_token("root"))
        .configure_sts_roles(&ctx, &accounts, "vault.example.com", None)
        .await?;

    assert_eq!(changed, vec![false, true]);
    Ok(())
}

#[tokio::test]
async fn test_rotate_client_credentials() -> Result<()> {
    let (server, ctx, config) = init_vault_test().await;
    Mock::given(method("POST"))
        .and(path("/v1/auth/aws/config/client"))
        .and(header("x-vault-token", "root"))
        .and(body_json(json!({
            "access_key": "AKIDEXAMPLE",
            "secret_key": "wJalrXUtnFEMI/K7MDENG/bPxRfiCYEXAMPLEKEY"
        })))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/v1/auth/aws/config/rotate-root"))
        .and(header("x-vault-token", "root"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {"access_key": "AKIANEWKEY"}
        })))
        .expect(1)
        .mount(&server)
        .await;

    Admin::new(config.with_token("root"))
        .rotate_client_credentials(
            &ctx,
            "AKIDEXAMPLE",
            "wJalrXUtnFEMI/K7MDENG/bPxRfiCYEXAMPLEKEY",
        )
        .await?;
    Ok(())
}

#[tokio::test]
async fn test_rotate_root_failure() -> Result<()> {
    let (server, ctx, config) = init_vault_test().await;
    Mock::given(method("POST"))
        .and(path("/v1/auth/aws/config/client"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/v1/auth/aws/config/rotate-root"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({
            "errors": ["error calling iam:CreateAccessKey"]
        })))
        .mount(&server)
        .await;

    let err = Admin::new(config.with_token("root"))
        .rotate_client_credentials(&ctx, "AKIDEXAMPLE", "secret")
        .await
        .expect_err("rotation must fail");

    assert!(err.is_transport_error());
    assert_eq!(err.status(), Some(StatusCode::INTERNAL_SERVER_ERROR));
    assert_eq!(
        err.response_body(),
        Some(r#"{"errors":["error calling iam:CreateAccessKey"]}"#)
    );
    Ok(())
}
