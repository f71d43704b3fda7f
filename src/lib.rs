//! Typed Rust client for the NHN Toast Cloud SMS/MMS HTTP API.
//!
//! The crate is split into a schema layer (declarative payload contracts
//! checked before any network call), a client layer orchestrating
//! validate → route → call → decode, and a transport layer for routing and
//! URL details. Payloads are plain [`serde_json::Value`] objects; each
//! operation checks its payload against the matching schema and refuses to
//! touch the network when the check fails.
//!
//! ```rust,no_run
//! use serde_json::json;
//! use toast_sms::ToastSmsClient;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), toast_sms::ToastSmsError> {
//!     let client = ToastSmsClient::new("my-app-key");
//!     let response = client
//!         .send_message(json!({
//!             "sendType": "sms",
//!             "sendNo": "15446859",
//!             "body": "hello",
//!             "templateId": "TemplateId",
//!             "recipientList": [{ "recipientNo": "01012345678" }]
//!         }))
//!         .await?;
//!     println!("{response}");
//!     Ok(())
//! }
//! ```
#![forbid(unsafe_code)]

pub mod client;
pub mod schema;
mod transport;

pub use client::{DEFAULT_API_VERSION, ToastSmsClient, ToastSmsClientBuilder, ToastSmsError};
pub use schema::{Reason, ValidationError, Violation};
