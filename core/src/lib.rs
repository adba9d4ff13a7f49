//! Core components for logging in to Vault with signed cloud identity requests.
//!
//! This crate provides the foundational types shared by the vaultsign crates.
//!
//! ## Overview
//!
//! - **Context**: A container that holds implementations for HTTP sending and environment access
//! - **Error**: A single error type whose [`ErrorKind`] separates configuration, transport and
//!   authentication result failures
//!
//! ## Example
//!
//! ```no_run
//! use vaultsign_core::{Context, HttpSend, Result, StaticEnv};
//! use async_trait::async_trait;
//! use bytes::Bytes;
//! use std::collections::HashMap;
//!
//! #[derive(Debug)]
//! struct MyHttpSend;
//!
//! #[async_trait]
//! impl HttpSend for MyHttpSend {
//!     async fn http_send(&self, _req: http::Request<Bytes>) -> Result<http::Response<Bytes>> {
//!         Ok(http::Response::new(Bytes::from_static(b"{}")))
//!     }
//! }
//!
//! let ctx = Context::new()
//!     .with_http_send(MyHttpSend)
//!     .with_env(StaticEnv {
//!         envs: HashMap::from([("VAULT_ADDR".to_string(), "http://127.0.0.1:8200".to_string())]),
//!     });
//!
//! assert_eq!(ctx.env_var("VAULT_ADDR").as_deref(), Some("http://127.0.0.1:8200"));
//! ```
//!
//! ## Utilities
//!
//! - [`hash`]: Cryptographic hashing and base64 utilities
//! - [`time`]: Time formatting utilities
//! - [`utils`]: General utilities including data redaction

// Make sure all our public APIs have docs.
#![warn(missing_docs)]

pub mod hash;
pub mod time;
pub mod utils;

mod context;
pub use context::Context;
pub use context::Env;
pub use context::HttpSend;
pub use context::NoopEnv;
pub use context::NoopHttpSend;
pub use context::OsEnv;
pub use context::StaticEnv;

mod error;
pub use error::Error;
pub use error::ErrorKind;
pub use error::Result;
