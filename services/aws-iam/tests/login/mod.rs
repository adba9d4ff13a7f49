use crate::init_vault_test;
use anyhow::Result;
use http::StatusCode;
use pretty_assertions::assert_eq;
use serde_json::json;
use std::collections::HashMap;
use vaultsign_aws_iam::{
    login, Authenticator, Credential, LoginPayload, LoginResult, RequestSigner, UnsignedRequest,
};
use vaultsign_core::hash::base64_decode;
use vaultsign_core::time::parse_iso8601;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, ResponseTemplate};

fn credential() -> Credential {
    Credential::new("AKIDEXAMPLE", "wJalrXUtnFEMI/K7MDENG/bPxRfiCYEXAMPLEKEY")
}

fn fixed_signer() -> Result<RequestSigner> {
    Ok(RequestSigner::new("us-east-1").with_time(parse_iso8601("20150830T123600Z")?))
}

#[tokio::test]
async fn test_login() -> Result<()> {
    let (server, ctx, config) = init_vault_test().await;
    Mock::given(method("POST"))
        .and(path("/v1/auth/aws/login"))
        .and(header("accept", "application/json"))
        .and(body_partial_json(json!({
            "iam_http_request_method": "POST",
            "iam_request_url": "aHR0cHM6Ly9zdHMuYW1hem9uYXdzLmNvbS8=",
            "iam_request_body": "QWN0aW9uPUdldENhbGxlcklkZW50aXR5JlZlcnNpb249MjAxMS0wNi0xNQ==",
            "role": "my-role",
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "auth": {"client_token": "t-123", "lease_duration": 1800}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let result = Authenticator::new(config.with_role("my-role").with_mount("auth/aws"))
        .authenticate(&ctx, &credential())
        .await?;

    assert_eq!(
        result,
        LoginResult {
            session_token: "t-123".to_string(),
            lease_duration_seconds: 1800,
        }
    );
    Ok(())
}

#[tokio::test]
async fn test_login_payload_round_trip() -> Result<()> {
    let (server, ctx, config) = init_vault_test().await;
    Mock::given(method("POST"))
        .and(path("/v1/auth/aws/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "auth": {"client_token": "t-123", "lease_duration": 1800}
        })))
        .mount(&server)
        .await;

    let cred = credential().with_session_token("session-token-example");
    let signed = fixed_signer()?.sign(UnsignedRequest::get_caller_identity(None), &cred);
    let payload = LoginPayload::new(&signed, "my-role");
    login(&ctx, &config.with_role("my-role"), &payload).await?;

    let received = server
        .received_requests()
        .await
        .expect("request recording must be enabled");
    assert_eq!(received.len(), 1);
    let body: serde_json::Value = serde_json::from_slice(&received[0].body)?;

    let url = base64_decode(body["iam_request_url"].as_str().unwrap_or_default())?;
    assert_eq!(url, signed.url().as_bytes());

    let req_body = base64_decode(body["iam_request_body"].as_str().unwrap_or_default())?;
    assert_eq!(req_body, signed.body().as_ref());

    let headers: HashMap<String, Vec<String>> = serde_json::from_slice(&base64_decode(
        body["iam_request_headers"].as_str().unwrap_or_default(),
    )?)?;
    assert_eq!(headers.len(), signed.headers().len());
    for (k, v) in signed.headers() {
        assert_eq!(headers[k], vec![v.clone()]);
    }
    assert_eq!(
        headers["X-Amz-Security-Token"],
        vec!["session-token-example".to_string()]
    );
    Ok(())
}

#[tokio::test]
async fn test_login_missing_client_token() -> Result<()> {
    let (server, ctx, config) = init_vault_test().await;
    Mock::given(method("POST"))
        .and(path("/v1/auth/aws/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"auth": {}})))
        .mount(&server)
        .await;

    let err = Authenticator::new(config.with_role("my-role"))
        .authenticate(&ctx, &credential())
        .await
        .expect_err("login must fail");

    assert!(err.is_auth_result_error());
    assert!(!err.is_transport_error());
    Ok(())
}

#[tokio::test]
async fn test_login_forbidden() -> Result<()> {
    let (server, ctx, config) = init_vault_test().await;
    Mock::given(method("POST"))
        .and(path("/v1/auth/aws/login"))
        .respond_with(ResponseTemplate::new(403).set_body_json(json!({
            "errors": ["permission denied"]
        })))
        .mount(&server)
        .await;

    let err = Authenticator::new(config.with_role("my-role"))
        .authenticate(&ctx, &credential())
        .await
        .expect_err("login must fail");

    assert!(err.is_transport_error());
    assert_eq!(err.status(), Some(StatusCode::FORBIDDEN));
    assert!(err.message().contains("permission denied"));
    Ok(())
}

#[tokio::test]
async fn test_login_custom_mount_and_namespace() -> Result<()> {
    let (server, ctx, config) = init_vault_test().await;
    Mock::given(method("POST"))
        .and(path("/v1/auth/aws-prod/login"))
        .and(header("x-vault-namespace", "team-a"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "auth": {"client_token": "t-456", "lease_duration": 600}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let config = config
        .with_role("my-role")
        .with_mount("/auth/aws-prod/")
        .with_namespace("team-a");
    let result = Authenticator::new(config)
        .with_signer(fixed_signer()?)
        .authenticate(&ctx, &credential())
        .await?;

    assert_eq!(result.session_token, "t-456");
    assert_eq!(result.lease_duration_seconds, 600);
    Ok(())
}
