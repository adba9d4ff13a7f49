use crate::constants::*;
use bytes::Bytes;
use http::Method;
use std::fmt::{Debug, Formatter};
use vaultsign_core::utils::Redact;

/// An HTTP request that has not been signed yet.
///
/// Headers keep the casing and order they were inserted with. Names are compared
/// case-insensitively, inserting a header that already exists replaces its value in place.
#[derive(Clone, PartialEq, Eq)]
pub struct UnsignedRequest {
    method: Method,
    url: String,
    headers: Vec<(String, String)>,
    body: Bytes,
}

impl UnsignedRequest {
    /// Create a new request without headers or body.
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            headers: Vec::new(),
            body: Bytes::new(),
        }
    }

    /// Build the request that asks STS who the signing credential belongs to.
    ///
    /// `server_id` sets `X-Vault-AWS-IAM-Server-ID`, only needed when the auth method
    /// on vault is configured to require it.
    ///
    /// The returned request is already normalized.
    pub fn get_caller_identity(server_id: Option<&str>) -> Self {
        let mut req = Self::new(Method::POST, STS_URL).with_body(GET_CALLER_IDENTITY_BODY);

        if let Some(server_id) = server_id {
            req.header_insert(X_VAULT_AWS_IAM_SERVER_ID, server_id);
        }
        req.header_insert(CONTENT_TYPE, STS_CONTENT_TYPE);
        req.header_insert(HOST, STS_HOST);

        req.normalize()
    }

    /// Replace the body.
    ///
    /// Call [`UnsignedRequest::normalize`] afterwards to keep `Content-Length` in sync.
    pub fn with_body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = body.into();
        self
    }

    /// Insert a header and return the request.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.header_insert(name, value);
        self
    }

    /// Insert a header, replacing the value of an existing header with the same name.
    pub fn header_insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();

        match self
            .headers
            .iter_mut()
            .find(|(k, _)| k.eq_ignore_ascii_case(&name))
        {
            Some((_, v)) => *v = value,
            None => self.headers.push((name, value)),
        }
    }

    /// Remove a header by name, ignoring case.
    pub fn header_remove(&mut self, name: &str) -> Option<String> {
        let idx = self
            .headers
            .iter()
            .position(|(k, _)| k.eq_ignore_ascii_case(name))?;
        Some(self.headers.remove(idx).1)
    }

    /// Get header value by name, ignoring case.
    pub fn header_get(&self, name: &str) -> Option<&str> {
        header_get(&self.headers, name)
    }

    /// Compute derived headers.
    pub fn normalize(mut self) -> Self {
        self.calculate_content_length();
        self
    }

    /// Set `Content-Length` to the byte length of the body.
    pub fn calculate_content_length(&mut self) {
        let length = self.body.len().to_string();
        self.header_insert(CONTENT_LENGTH, length);
    }

    /// HTTP method.
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Full request url.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Headers in insertion order.
    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    /// Request body.
    pub fn body(&self) -> &Bytes {
        &self.body
    }

    /// Freeze the request with its authorization header.
    pub(crate) fn into_signed(mut self, authorization: String) -> SignedRequest {
        self.header_insert(AUTHORIZATION, authorization);

        SignedRequest {
            method: self.method,
            url: self.url,
            headers: self.headers,
            body: self.body,
        }
    }
}

/// An HTTP request carrying its `Authorization` header.
///
/// Only [`crate::RequestSigner`] creates this type and it offers no way to mutate
/// the request, so a signature can't drift from the content it covers.
#[derive(Clone, PartialEq, Eq)]
pub struct SignedRequest {
    method: Method,
    url: String,
    headers: Vec<(String, String)>,
    body: Bytes,
}

impl SignedRequest {
    /// HTTP method.
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Full request url.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Headers in insertion order, `Authorization` is the last one.
    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    /// Request body.
    pub fn body(&self) -> &Bytes {
        &self.body
    }

    /// Get header value by name, ignoring case.
    pub fn header_get(&self, name: &str) -> Option<&str> {
        header_get(&self.headers, name)
    }

    /// The `Authorization` header value.
    pub fn authorization(&self) -> &str {
        self.header_get(AUTHORIZATION).unwrap_or_default()
    }
}

impl Debug for UnsignedRequest {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UnsignedRequest")
            .field("method", &self.method)
            .field("url", &self.url)
            .field("headers", &DebugHeaders(&self.headers))
            .field("body", &self.body)
            .finish()
    }
}

impl Debug for SignedRequest {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SignedRequest")
            .field("method", &self.method)
            .field("url", &self.url)
            .field("headers", &DebugHeaders(&self.headers))
            .field("body", &self.body)
            .finish()
    }
}

/// Headers with `Authorization` and `X-Amz-Security-Token` redacted.
struct DebugHeaders<'a>(&'a [(String, String)]);

impl Debug for DebugHeaders<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let mut list = f.debug_list();
        for (k, v) in self.0 {
            if k.eq_ignore_ascii_case(AUTHORIZATION) || k.eq_ignore_ascii_case(X_AMZ_SECURITY_TOKEN)
            {
                list.entry(&(k, Redact::from(v)));
            } else {
                list.entry(&(k, v));
            }
        }
        list.finish()
    }
}

fn header_get<'a>(headers: &'a [(String, String)], name: &str) -> Option<&'a str> {
    headers
        .iter()
        .find(|(k, _)| k.eq_ignore_ascii_case(name))
        .map(|(_, v)| v.as_str())
}
