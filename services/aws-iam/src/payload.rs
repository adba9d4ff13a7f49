use crate::SignedRequest;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt::{Debug, Formatter};
use vaultsign_core::hash::base64_encode;
use vaultsign_core::utils::Redact;

/// Body of the `POST {mount}/login` call of vault's aws auth method.
///
/// Everything except the method and role is standard base64.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginPayload {
    /// Method of the signed request, plain text.
    pub iam_http_request_method: String,
    /// Base64 of the signed request url.
    pub iam_request_url: String,
    /// Base64 of the signed request headers as a JSON object of single-element lists.
    pub iam_request_headers: String,
    /// Base64 of the signed request body.
    pub iam_request_body: String,
    /// Role registered on the aws auth method.
    pub role: String,
}

impl LoginPayload {
    /// Package a signed request for the given role.
    pub fn new(signed: &SignedRequest, role: &str) -> Self {
        let headers = list_valued_headers(signed.headers());

        Self {
            iam_http_request_method: signed.method().to_string(),
            iam_request_url: base64_encode(signed.url().as_bytes()),
            iam_request_headers: base64_encode(headers.as_bytes()),
            iam_request_body: base64_encode(signed.body()),
            role: role.to_string(),
        }
    }
}

impl Debug for LoginPayload {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginPayload")
            .field("iam_http_request_method", &self.iam_http_request_method)
            .field("iam_request_url", &self.iam_request_url)
            .field("iam_request_headers", &Redact::from(&self.iam_request_headers))
            .field("iam_request_body", &self.iam_request_body)
            .field("role", &self.role)
            .finish()
    }
}

/// `{"Host": "sts.amazonaws.com"}` is sent as `{"Host": ["sts.amazonaws.com"]}`.
///
/// Keys keep the order of the signed request.
fn list_valued_headers(headers: &[(String, String)]) -> String {
    let map = headers
        .iter()
        .map(|(k, v)| (k.clone(), Value::Array(vec![Value::String(v.clone())])))
        .collect::<Map<String, Value>>();

    Value::Object(map).to_string()
}
