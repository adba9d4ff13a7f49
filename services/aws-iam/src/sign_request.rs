// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

use crate::constants::{
    ALGORITHM, AUTHORIZATION, AWS4_REQUEST, DEFAULT_REGION, STS_SERVICE, X_AMZ_DATE,
    X_AMZ_SECURITY_TOKEN,
};
use crate::{Credential, SignedRequest, UnsignedRequest};
use log::debug;
use std::fmt::{Debug, Formatter};
use vaultsign_core::hash::{hex_hmac_sha256, hex_sha256, hmac_sha256};
use vaultsign_core::time::{format_date, format_iso8601, now, DateTime};

/// RequestSigner that implement AWS SigV4 for the STS caller identity request.
///
/// - [Signature Version 4 signing process](https://docs.aws.amazon.com/general/latest/gr/signature-version-4.html)
///
/// The region must match the region configured on vault's aws auth method, not the
/// region the workload runs in.
#[derive(Debug, Clone)]
pub struct RequestSigner {
    service: String,
    region: String,

    time: Option<DateTime>,
}

impl Default for RequestSigner {
    fn default() -> Self {
        Self::new(DEFAULT_REGION)
    }
}

impl RequestSigner {
    /// Create a new signer for the given region.
    pub fn new(region: &str) -> Self {
        Self {
            service: STS_SERVICE.to_string(),
            region: region.to_string(),

            time: None,
        }
    }

    /// Specify the signing time.
    ///
    /// # Note
    ///
    /// We should always take current time to sign requests.
    /// Only use this function for testing.
    pub fn with_time(mut self, time: DateTime) -> Self {
        self.time = Some(time);
        self
    }

    #[cfg(test)]
    fn with_service(mut self, service: &str) -> Self {
        self.service = service.to_string();
        self
    }

    /// The signing region.
    pub fn region(&self) -> &str {
        &self.region
    }

    /// Build the signing context for this call.
    pub fn context(&self) -> SigningContext {
        SigningContext {
            time: self.time.unwrap_or_else(now),
            region: self.region.clone(),
            service: self.service.clone(),
        }
    }

    /// Sign the request with given credential.
    ///
    /// Signing is pure computation and can't fail. `X-Amz-Date` and, when the credential
    /// carries a session token, `X-Amz-Security-Token` are added before the headers are
    /// canonicalized so both are covered by the signature.
    pub fn sign(&self, req: UnsignedRequest, cred: &Credential) -> SignedRequest {
        sign_with_context(req, cred, &self.context())
    }
}

/// Time, region and service a signature is bound to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SigningContext {
    time: DateTime,
    region: String,
    service: String,
}

impl SigningContext {
    /// Timestamp in `YYYYMMDD'T'HHMMSS'Z'`.
    pub fn timestamp(&self) -> String {
        format_iso8601(self.time)
    }

    /// Date part of the timestamp: `YYYYMMDD`.
    pub fn date(&self) -> String {
        format_date(self.time)
    }

    /// Signing region.
    pub fn region(&self) -> &str {
        &self.region
    }

    /// Signing service.
    pub fn service(&self) -> &str {
        &self.service
    }

    /// Scope: "20220313/<region>/<service>/aws4_request"
    pub fn credential_scope(&self) -> String {
        format!(
            "{}/{}/{}/{}",
            self.date(),
            self.region,
            self.service,
            AWS4_REQUEST
        )
    }
}

/// Key derived from the secret access key, with every step of the chain kept.
#[derive(Clone)]
pub struct SigningKey {
    date_key: Vec<u8>,
    region_key: Vec<u8>,
    service_key: Vec<u8>,
    signing_key: Vec<u8>,
}

impl SigningKey {
    /// Derive the signing key.
    ///
    /// `AWS4<secret>` keys the date, the date key keys the region, the region key keys the
    /// service and the service key keys the literal `aws4_request`.
    pub fn derive(secret: &str, date: &str, region: &str, service: &str) -> Self {
        let secret = format!("AWS4{secret}");
        let date_key = hmac_sha256(secret.as_bytes(), date.as_bytes());
        let region_key = hmac_sha256(&date_key, region.as_bytes());
        let service_key = hmac_sha256(&region_key, service.as_bytes());
        let signing_key = hmac_sha256(&service_key, AWS4_REQUEST.as_bytes());

        Self {
            date_key,
            region_key,
            service_key,
            signing_key,
        }
    }

    /// HMAC of the date keyed by `AWS4<secret>`.
    pub fn date_key(&self) -> &[u8] {
        &self.date_key
    }

    /// HMAC of the region keyed by the date key.
    pub fn region_key(&self) -> &[u8] {
        &self.region_key
    }

    /// HMAC of the service keyed by the region key.
    pub fn service_key(&self) -> &[u8] {
        &self.service_key
    }

    /// HMAC of `aws4_request` keyed by the service key.
    pub fn signing_key(&self) -> &[u8] {
        &self.signing_key
    }

    /// Hex encoded signature of the string to sign.
    pub fn sign(&self, string_to_sign: &str) -> String {
        hex_hmac_sha256(&self.signing_key, string_to_sign.as_bytes())
    }
}

impl Debug for SigningKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str("SigningKey { .. }")
    }
}

fn sign_with_context(
    mut req: UnsignedRequest,
    cred: &Credential,
    ctx: &SigningContext,
) -> SignedRequest {
    req.header_remove(AUTHORIZATION);
    req.header_insert(X_AMZ_DATE, ctx.timestamp());
    match cred.session_token() {
        Some(token) => req.header_insert(X_AMZ_SECURITY_TOKEN, token),
        None => {
            req.header_remove(X_AMZ_SECURITY_TOKEN);
        }
    }

    let creq = canonical_request(&req);
    let scope = ctx.credential_scope();
    debug!("calculated scope: {scope}");

    let string_to_sign = string_to_sign(ctx, &creq);
    debug!("calculated string to sign: {string_to_sign}");

    let key = SigningKey::derive(
        &cred.secret_access_key,
        &ctx.date(),
        ctx.region(),
        ctx.service(),
    );
    let signature = key.sign(&string_to_sign);

    let authorization = format!(
        "{ALGORITHM} Credential={}/{}, SignedHeaders={}, Signature={}",
        cred.access_key_id,
        scope,
        signed_headers(req.headers()),
        signature
    );

    req.into_signed(authorization)
}

/// Lowercase header names sorted, paired with their untouched values.
fn sorted_headers(headers: &[(String, String)]) -> Vec<(String, &str)> {
    let mut hs = headers
        .iter()
        .map(|(k, v)| (k.to_lowercase(), v.as_str()))
        .collect::<Vec<_>>();
    hs.sort_by(|(l, _), (r, _)| l.cmp(r));
    hs
}

/// Canonical headers block: `name:value\n` for every header, names lowercased and sorted.
pub fn canonical_headers(headers: &[(String, String)]) -> String {
    sorted_headers(headers)
        .into_iter()
        .map(|(k, v)| format!("{k}:{v}\n"))
        .collect()
}

/// Signed headers list: lowercased, sorted header names joined by `;`.
pub fn signed_headers(headers: &[(String, String)]) -> String {
    sorted_headers(headers)
        .into_iter()
        .map(|(k, _)| k)
        .collect::<Vec<_>>()
        .join(";")
}

/// Canonical request string.
///
/// ```text
/// POST
/// /
///
/// content-length:43
/// content-type:application/x-www-form-urlencoded; charset=utf-8
/// host:sts.amazonaws.com
/// x-amz-date:20150830T123600Z
///
/// content-length;content-type;host;x-amz-date
/// <hex_sha256_of_body>
/// ```
///
/// The path is always `/` and the query always empty.
pub fn canonical_request(req: &UnsignedRequest) -> String {
    format!(
        "{}\n/\n\n{}\n{}\n{}",
        req.method(),
        canonical_headers(req.headers()),
        signed_headers(req.headers()),
        hex_sha256(req.body())
    )
}

/// StringToSign:
///
/// ```text
/// AWS4-HMAC-SHA256
/// 20220313T072004Z
/// 20220313/<region>/<service>/aws4_request
/// <hashed_canonical_request>
/// ```
pub fn string_to_sign(ctx: &SigningContext, canonical_request: &str) -> String {
    format!(
        "{ALGORITHM}\n{}\n{}\n{}",
        ctx.timestamp(),
        ctx.credential_scope(),
        hex_sha256(canonical_request.as_bytes())
    )
}
