//! The `dbsnapper_storage_profile` resource: cloud storage credentials and
//! location used to hold snapshot files.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{parse_optional_id, ManagedResource};
use crate::client::{ClientError, SnapperApi, StorageProfile, StorageProfileRequest};
use crate::error::ProviderError;
use crate::schema::{Attribute, Schema};

/// State model of a `dbsnapper_storage_profile`.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageProfileModel {
    /// Identity assigned by the service.
    pub id: Option<String>,
    /// Profile name.
    pub name: Option<String>,
    /// Storage provider kind, e.g. `s3`.
    pub sp_provider: Option<String>,
    /// Storage region.
    pub region: Option<String>,
    /// Storage account ID.
    pub account_id: Option<String>,
    /// Storage access key.
    pub access_key: Option<String>,
    /// Storage secret key.
    pub secret_key: Option<String>,
    /// Bucket name.
    pub bucket: Option<String>,
    /// Key prefix within the bucket.
    pub prefix: Option<String>,
    /// Status reported by the service.
    pub status: Option<String>,
    /// Creation time.
    pub created_at: Option<String>,
    /// Last update time.
    pub updated_at: Option<String>,
}

impl fmt::Debug for StorageProfileModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StorageProfileModel")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("sp_provider", &self.sp_provider)
            .field("bucket", &self.bucket)
            .field("status", &self.status)
            .finish_non_exhaustive()
    }
}

/// Storage profiles have no sub-objects, so there is nothing to fill in.
pub fn normalize(model: StorageProfileModel) -> Result<StorageProfileModel, ProviderError> {
    Ok(model)
}

/// Build a create/update request from the settable fields of `model`.
pub fn to_api_request(model: &StorageProfileModel) -> Result<StorageProfileRequest, ProviderError> {
    let text = |value: &Option<String>| value.clone().unwrap_or_default();

    Ok(StorageProfileRequest {
        id: parse_optional_id("id", model.id.as_deref())?,
        name: text(&model.name),
        provider: text(&model.sp_provider),
        region: text(&model.region),
        account_id: text(&model.account_id),
        access_key: text(&model.access_key),
        secret_key: text(&model.secret_key),
        bucket: text(&model.bucket),
        prefix: text(&model.prefix),
    })
}

/// Copy the service's view of a storage profile into `model`.
pub fn apply_api_response(
    response: StorageProfile,
    mut model: StorageProfileModel,
) -> Result<StorageProfileModel, ProviderError> {
    model.id = Some(response.id.to_string());
    model.name = Some(response.name);
    model.sp_provider = Some(response.provider);
    model.region = Some(response.region);
    model.account_id = Some(response.account_id);
    model.access_key = Some(response.access_key);
    model.secret_key = Some(response.secret_key);
    model.bucket = Some(response.bucket);
    model.prefix = Some(response.prefix);
    model.status = Some(response.status);
    model.created_at = Some(response.created_at);
    model.updated_at = Some(response.updated_at);
    Ok(model)
}

/// Controller for `dbsnapper_storage_profile`.
pub struct StorageProfileResource {
    api: Arc<dyn SnapperApi>,
}

impl StorageProfileResource {
    /// Build the controller over a configured API client.
    pub fn new(api: Arc<dyn SnapperApi>) -> Self {
        Self { api }
    }
}

#[async_trait::async_trait]
impl ManagedResource for StorageProfileResource {
    const KIND: &'static str = "storage_profile";

    type Model = StorageProfileModel;
    type Request = StorageProfileRequest;
    type Response = StorageProfile;

    fn resource_schema() -> Schema {
        Schema::v0()
            .with_description("DBSnapper Storage Profile Resource")
            .with_attribute(
                "id",
                Attribute::computed_string().with_description("Storage profile identifier"),
            )
            .with_attribute(
                "name",
                Attribute::required_string().with_description("The name of the storage profile"),
            )
            .with_attribute(
                "sp_provider",
                Attribute::required_string()
                    .with_description("The storage provider, e.g. s3, r2, gcs"),
            )
            .with_attribute("region", Attribute::optional_string())
            .with_attribute("account_id", Attribute::optional_string())
            .with_attribute(
                "access_key",
                Attribute::required_string()
                    .with_description("The access key of the storage provider")
                    .sensitive(),
            )
            .with_attribute(
                "secret_key",
                Attribute::required_string()
                    .with_description("The secret key of the storage provider")
                    .sensitive(),
            )
            .with_attribute(
                "bucket",
                Attribute::required_string().with_description("The bucket holding snapshots"),
            )
            .with_attribute(
                "prefix",
                Attribute::optional_string().with_description("Key prefix within the bucket"),
            )
            .with_attribute("status", Attribute::computed_string())
            .with_attribute("created_at", Attribute::computed_string())
            .with_attribute("updated_at", Attribute::computed_string())
    }

    fn normalize(model: StorageProfileModel) -> Result<StorageProfileModel, ProviderError> {
        normalize(model)
    }

    fn to_api_request(model: &StorageProfileModel) -> Result<StorageProfileRequest, ProviderError> {
        to_api_request(model)
    }

    fn apply_api_response(
        response: StorageProfile,
        model: StorageProfileModel,
    ) -> Result<StorageProfileModel, ProviderError> {
        apply_api_response(response, model)
    }

    fn id(model: &StorageProfileModel) -> Option<&str> {
        model.id.as_deref()
    }

    fn set_id(model: &mut StorageProfileModel, id: String) {
        model.id = Some(id);
    }

    async fn remote_create(
        &self,
        request: &StorageProfileRequest,
    ) -> Result<StorageProfile, ClientError> {
        self.api.create_storage_profile(request).await
    }

    async fn remote_get(&self, id: Uuid) -> Result<StorageProfile, ClientError> {
        self.api.get_storage_profile(id).await
    }

    async fn remote_update(
        &self,
        id: Uuid,
        request: &StorageProfileRequest,
    ) -> Result<StorageProfile, ClientError> {
        self.api.update_storage_profile(id, request).await
    }

    async fn remote_delete(&self, id: Uuid) -> Result<(), ClientError> {
        self.api.delete_storage_profile(id).await
    }
}
