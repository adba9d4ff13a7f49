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

// Headers used in the caller identity request.
pub const CONTENT_LENGTH: &str = "Content-Length";
pub const CONTENT_TYPE: &str = "Content-Type";
pub const HOST: &str = "Host";
pub const AUTHORIZATION: &str = "Authorization";
pub const X_AMZ_DATE: &str = "X-Amz-Date";
pub const X_AMZ_SECURITY_TOKEN: &str = "X-Amz-Security-Token";
pub const X_VAULT_AWS_IAM_SERVER_ID: &str = "X-Vault-AWS-IAM-Server-ID";

// Headers used in vault calls.
pub const X_VAULT_TOKEN: &str = "X-Vault-Token";
pub const X_VAULT_NAMESPACE: &str = "X-Vault-Namespace";

// The caller identity request.
pub const STS_HOST: &str = "sts.amazonaws.com";
pub const STS_URL: &str = "https://sts.amazonaws.com/";
pub const STS_SERVICE: &str = "sts";
pub const STS_CONTENT_TYPE: &str = "application/x-www-form-urlencoded; charset=utf-8";
pub const GET_CALLER_IDENTITY_BODY: &str = "Action=GetCallerIdentity&Version=2011-06-15";

// SigV4 literals.
pub const ALGORITHM: &str = "AWS4-HMAC-SHA256";
pub const AWS4_REQUEST: &str = "aws4_request";

// Defaults of the vault aws auth method.
pub const DEFAULT_MOUNT: &str = "auth/aws";
pub const DEFAULT_REGION: &str = "us-east-1";
pub const DEFAULT_IAM_ROLE_NAME: &str = "VaultAuth";
pub const VAULT_API_PREFIX: &str = "v1";

// Env values used by callers.
pub const VAULT_ADDR: &str = "VAULT_ADDR";
pub const VAULT_TOKEN: &str = "VAULT_TOKEN";
pub const VAULT_AUTH_ROLE: &str = "VAULT_AUTH_ROLE";
pub const VAULT_AUTH_MOUNT: &str = "VAULT_AUTH_MOUNT";
pub const VAULT_AUTH_REGION: &str = "VAULT_AUTH_REGION";
pub const VAULT_AWS_IAM_SERVER_ID: &str = "VAULT_AWS_IAM_SERVER_ID";
pub const VAULT_NAMESPACE: &str = "VAULT_NAMESPACE";
