//! DBSnapper infrastructure provider.
//!
//! This crate lets an infrastructure orchestrator manage DBSnapper targets
//! and storage profiles, and list targets, through the DBSnapper REST API.
//!
//! # Overview
//!
//! - **Resources**: `dbsnapper_target`, `dbsnapper_storage_profile`
//! - **Data sources**: `dbsnapper_targets`
//! - **ProviderService trait**: the lifecycle surface the orchestrator calls
//!   (schema, validate, configure, plan, create, read, update, delete, import,
//!   read data source), with JSON state documents
//! - **Client**: a reqwest-based API client behind the [`client::SnapperApi`]
//!   trait
//! - **Testing**: [`testing::ProviderTester`] and an in-memory service
//!
//! # Quick Start
//!
//! ```
//! use dbsnapper_provider::{DbSnapperProvider, ProviderService};
//! use serde_json::json;
//!
//! # tokio_test::block_on(async {
//! let provider = DbSnapperProvider::new(env!("CARGO_PKG_VERSION"));
//! let diagnostics = provider
//!     .configure(json!({"authtoken": "my-token"}))
//!     .await
//!     .unwrap();
//! assert!(diagnostics.is_empty());
//! # });
//! ```
//!
//! # Configuration
//!
//! | Attribute   | Environment variable  | Default                            |
//! |-------------|-----------------------|------------------------------------|
//! | `authtoken` | `DBSNAPPER_AUTHTOKEN` | required                           |
//! | `base_url`  | `DBSNAPPER_BASE_URL`  | `https://app.dbsnapper.com/api/v3` |
//!
//! Explicit configuration wins over the environment.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod client;
pub mod config;
pub mod data_sources;
pub mod error;
pub mod logging;
pub mod provider;
pub mod resources;
pub mod schema;
pub mod service;
pub mod testing;
pub mod types;
pub mod validation;

// Re-export main types at crate root
pub use client::{HttpClient, SnapperApi};
pub use config::ProviderConfig;
pub use error::ProviderError;
pub use logging::{init_logging, init_logging_with_default, try_init_logging};
pub use provider::DbSnapperProvider;
pub use schema::ProviderSchema;
pub use service::ProviderService;
pub use types::{AttributeChange, ImportedResource, PlanResult, ProviderMetadata};
pub use validation::{is_valid, validate, validate_result};

// Re-export async_trait for convenience
pub use async_trait::async_trait;

// Re-export commonly used external types
pub use serde_json;
pub use tracing;
