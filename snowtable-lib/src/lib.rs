//! Table API client library
//!
//! A Rust async client for record-oriented REST table APIs: encoded-query
//! filtering, field projection, sorting, and link-driven pagination.
//!
//! # Example
//!
//! ```ignore
//! use futures::TryStreamExt;
//! use snowtable_lib::{TableClient, transport::Auth};
//! use snowtable_lib::api::query::{Filter, RequestOptions};
//!
//! let client = TableClient::builder()
//!     .instance("dev12345")
//!     .auth(Auth::basic("admin", "secret"))
//!     .build()?;
//!
//! let incidents = client.table("incident");
//!
//! let mut open = incidents
//!     .get(
//!         Filter::eq("active", true),
//!         &RequestOptions::new().fields(["number", "short_description"]),
//!     )
//!     .await?
//!     .stream();
//!
//! while let Some(record) = open.try_next().await? {
//!     println!("{:?}", record.get_str("number")?);
//! }
//!
//! incidents
//!     .update("number=INC0010001", &serde_json::json!({"state": 6}))
//!     .await?;
//! ```

pub mod api;
pub mod error;
pub mod model;
pub mod report;
pub mod response;
pub mod transport;

mod client;
mod config;
mod session;

pub use client::*;
pub use config::ClientConfig;
pub use response::Response;
pub use session::Session;
