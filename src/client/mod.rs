//! Client seam for the DBSnapper REST API.
//!
//! Resources and data sources only see [`SnapperApi`]. The provider builds an
//! [`HttpClient`] at configure time and hands the same `Arc<dyn SnapperApi>`
//! to every controller; tests substitute
//! [`MemorySnapperApi`](crate::testing::MemorySnapperApi).

mod http;
pub mod models;

pub use http::HttpClient;
pub use models::{
    SanitizeConfig, Share, ShareRequest, Snapshot, SnapshotRequest, StorageProfile,
    StorageProfileRef, StorageProfileRequest, Target, TargetRequest,
};

use thiserror::Error;
use uuid::Uuid;

/// Errors returned by the remote API client.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The service has no entity at this path.
    #[error("not found: {0}")]
    NotFound(String),

    /// The service rejected the auth token.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// The service answered with a non-success status.
    #[error("API request failed with status {status}: {body}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Response body, as text.
        body: String,
    },

    /// The request could not be sent or the response could not be read.
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The configured base URL is unusable.
    #[error("invalid base URL {url:?}: {message}")]
    InvalidBaseUrl {
        /// The rejected URL.
        url: String,
        /// Why it was rejected.
        message: String,
    },
}

/// Operations the provider needs from the DBSnapper service.
#[async_trait::async_trait]
pub trait SnapperApi: Send + Sync + 'static {
    /// Create a target.
    async fn create_target(&self, request: &TargetRequest) -> Result<Target, ClientError>;

    /// Fetch a target by identity.
    async fn get_target(&self, id: Uuid) -> Result<Target, ClientError>;

    /// Replace a target's settable fields.
    async fn update_target(&self, id: Uuid, request: &TargetRequest)
        -> Result<Target, ClientError>;

    /// Delete a target.
    async fn delete_target(&self, id: Uuid) -> Result<(), ClientError>;

    /// List all targets visible to the auth token, in service order.
    async fn list_targets(&self) -> Result<Vec<Target>, ClientError>;

    /// Create a storage profile.
    async fn create_storage_profile(
        &self,
        request: &StorageProfileRequest,
    ) -> Result<StorageProfile, ClientError>;

    /// Fetch a storage profile by identity.
    async fn get_storage_profile(&self, id: Uuid) -> Result<StorageProfile, ClientError>;

    /// Replace a storage profile's settable fields.
    async fn update_storage_profile(
        &self,
        id: Uuid,
        request: &StorageProfileRequest,
    ) -> Result<StorageProfile, ClientError>;

    /// Delete a storage profile.
    async fn delete_storage_profile(&self, id: Uuid) -> Result<(), ClientError>;
}
