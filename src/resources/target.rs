//! The `dbsnapper_target` resource.
//!
//! A target pairs a source database with the snapshot, sanitize and share
//! settings DBSnapper applies to it. The state model mirrors the
//! orchestrator's view: every attribute is optional so unknown/null values
//! survive decoding, and the three sub-objects are filled in by
//! [`normalize`] before any mapping runs.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;
use uuid::Uuid;

use super::{parse_optional_id, ManagedResource};
use crate::client::{
    ClientError, SanitizeConfig, ShareRequest, SnapperApi, SnapshotRequest, StorageProfileRef,
    Target, TargetRequest,
};
use crate::error::ProviderError;
use crate::schema::{Attribute, Block, NestedBlock, Schema};

const SSO_GROUPS_PATH: &str = "share.sso_groups";

/// Reference to a storage profile, as held in state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageProfileRefModel {
    /// Identity of the referenced storage profile.
    pub id: Option<String>,
}

/// Snapshot settings, as held in state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SnapshotModel {
    /// Source database URL.
    pub src_url: Option<String>,
    /// Destination database URL.
    pub dst_url: Option<String>,
    /// Size of the source database in bytes, set by the service.
    pub src_bytes: Option<i64>,
    /// Storage profile holding the snapshot files.
    pub storage_profile: Option<StorageProfileRefModel>,
}

/// Sanitize settings, as held in state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SanitizeModel {
    /// Database URL used to sanitize a snapshot.
    pub dst_url: Option<String>,
    /// Sanitization query.
    pub query: Option<String>,
    /// Storage profile holding sanitized snapshot files.
    pub storage_profile: Option<StorageProfileRefModel>,
}

/// Share settings, as held in state.
///
/// The group list stays an untyped value until [`decode_sso_groups`] checks
/// every element is a string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShareModel {
    /// SSO groups, in user order.
    pub sso_groups: Option<Value>,
}

/// State model of a `dbsnapper_target`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TargetModel {
    /// Identity assigned by the service.
    pub id: Option<String>,
    /// Target name.
    pub name: Option<String>,
    /// Status reported by the agent.
    pub status: Option<String>,
    /// Error messages reported by the agent.
    pub messages: Option<String>,
    /// Snapshot settings.
    pub snapshot: Option<SnapshotModel>,
    /// Sanitize settings.
    pub sanitize: Option<SanitizeModel>,
    /// Share settings.
    pub share: Option<ShareModel>,
    /// Creation time.
    pub created_at: Option<String>,
    /// Last update time.
    pub updated_at: Option<String>,
}

/// Decode an SSO group list into names, keeping order.
pub fn decode_sso_groups(value: &Value) -> Result<Vec<String>, ProviderError> {
    let items = match value {
        Value::Null => return Ok(Vec::new()),
        Value::Array(items) => items,
        other => {
            return Err(ProviderError::ListConversion {
                field: SSO_GROUPS_PATH.to_string(),
                message: format!("expected a list of strings, got {}", other),
            })
        }
    };

    items
        .iter()
        .enumerate()
        .map(|(i, item)| {
            item.as_str()
                .map(str::to_string)
                .ok_or_else(|| ProviderError::ListConversion {
                    field: SSO_GROUPS_PATH.to_string(),
                    message: format!("element {} is {}, expected a string", i, item),
                })
        })
        .collect()
}

/// Encode SSO group names back into a state value.
pub fn encode_sso_groups(groups: &[String]) -> Result<Value, ProviderError> {
    serde_json::to_value(groups).map_err(|e| ProviderError::ListConversion {
        field: SSO_GROUPS_PATH.to_string(),
        message: e.to_string(),
    })
}

/// Fill in absent sub-objects and check the share group list decodes.
pub fn normalize(mut model: TargetModel) -> Result<TargetModel, ProviderError> {
    model.snapshot.get_or_insert_with(SnapshotModel::default);
    model.sanitize.get_or_insert_with(SanitizeModel::default);
    let share = model.share.get_or_insert_with(ShareModel::default);

    if let Some(groups) = &share.sso_groups {
        let groups = decode_sso_groups(groups)?;
        debug!(id = ?model.id, ?groups, "Normalized target share groups");
    }

    Ok(model)
}

fn storage_profile_ref(
    field: &str,
    model: Option<&StorageProfileRefModel>,
) -> Result<Option<StorageProfileRef>, ProviderError> {
    let id = parse_optional_id(field, model.and_then(|r| r.id.as_deref()))?;
    Ok(id.map(StorageProfileRef::new))
}

fn storage_profile_ref_model(reference: StorageProfileRef) -> StorageProfileRefModel {
    StorageProfileRefModel {
        id: Some(reference.id.to_string()),
    }
}

/// Build a create/update request from the settable fields of `model`.
pub fn to_api_request(model: &TargetModel) -> Result<TargetRequest, ProviderError> {
    let snapshot = model.snapshot.as_ref();
    let sanitize = model.sanitize.as_ref();

    let sso_groups = match model.share.as_ref().and_then(|s| s.sso_groups.as_ref()) {
        Some(groups) => decode_sso_groups(groups)?,
        None => Vec::new(),
    };

    Ok(TargetRequest {
        id: parse_optional_id("id", model.id.as_deref())?,
        name: model.name.clone().unwrap_or_default(),
        snapshot: SnapshotRequest {
            src_url: snapshot.and_then(|s| s.src_url.clone()).unwrap_or_default(),
            dst_url: snapshot.and_then(|s| s.dst_url.clone()).unwrap_or_default(),
            storage_profile: storage_profile_ref(
                "snapshot.storage_profile.id",
                snapshot.and_then(|s| s.storage_profile.as_ref()),
            )?,
        },
        sanitize: SanitizeConfig {
            dst_url: sanitize.and_then(|s| s.dst_url.clone()).unwrap_or_default(),
            query: sanitize.and_then(|s| s.query.clone()).unwrap_or_default(),
            storage_profile: storage_profile_ref(
                "sanitize.storage_profile.id",
                sanitize.and_then(|s| s.storage_profile.as_ref()),
            )?,
        },
        share: ShareRequest { sso_groups },
    })
}

/// Copy the service's view of a target into `model`.
///
/// Sanitize settings, storage profile references and share groups are only
/// overwritten when the response carries them.
pub fn apply_api_response(
    response: Target,
    mut model: TargetModel,
) -> Result<TargetModel, ProviderError> {
    model.id = Some(response.id.to_string());
    model.name = Some(response.name);
    model.status = Some(response.status);
    model.messages = Some(response.messages);

    let snapshot = model.snapshot.get_or_insert_with(SnapshotModel::default);
    snapshot.src_url = Some(response.snapshot.src_url);
    snapshot.dst_url = Some(response.snapshot.dst_url);
    snapshot.src_bytes = Some(response.snapshot.src_bytes);
    if let Some(reference) = response.snapshot.storage_profile {
        snapshot.storage_profile = Some(storage_profile_ref_model(reference));
    }

    if let Some(remote) = response.sanitize {
        let sanitize = model.sanitize.get_or_insert_with(SanitizeModel::default);
        sanitize.dst_url = Some(remote.dst_url);
        sanitize.query = Some(remote.query);
        if let Some(reference) = remote.storage_profile {
            sanitize.storage_profile = Some(storage_profile_ref_model(reference));
        }
    }

    if let Some(groups) = response.share.and_then(|s| s.sso_groups) {
        model
            .share
            .get_or_insert_with(ShareModel::default)
            .sso_groups = Some(encode_sso_groups(&groups)?);
    }

    model.created_at = Some(response.created_at);
    model.updated_at = Some(response.updated_at);
    Ok(model)
}

fn storage_profile_ref_block() -> NestedBlock {
    NestedBlock::single(
        Block::new()
            .with_attribute(
                "id",
                Attribute::optional_string().with_description("Storage profile ID"),
            )
            .with_description("Storage profile reference"),
    )
}

/// Controller for `dbsnapper_target`.
pub struct TargetResource {
    api: Arc<dyn SnapperApi>,
}

impl TargetResource {
    /// Build the controller over a configured API client.
    pub fn new(api: Arc<dyn SnapperApi>) -> Self {
        Self { api }
    }
}

#[async_trait::async_trait]
impl ManagedResource for TargetResource {
    const KIND: &'static str = "target";

    type Model = TargetModel;
    type Request = TargetRequest;
    type Response = Target;

    fn resource_schema() -> Schema {
        Schema::v0()
            .with_description("DBSnapper Target Resource")
            .with_attribute(
                "id",
                Attribute::computed_string().with_description("Target identifier"),
            )
            .with_attribute(
                "name",
                Attribute::required_string().with_description("The name of the target"),
            )
            .with_attribute(
                "status",
                Attribute::computed_string().with_description("The status of the target"),
            )
            .with_attribute(
                "messages",
                Attribute::computed_string().with_description("Error messages from the agent"),
            )
            .with_attribute("created_at", Attribute::computed_string())
            .with_attribute("updated_at", Attribute::computed_string())
            .with_block(
                "snapshot",
                NestedBlock::required(
                    Block::new()
                        .with_attribute(
                            "src_url",
                            Attribute::required_string()
                                .with_description("The source database URL"),
                        )
                        .with_attribute(
                            "dst_url",
                            Attribute::optional_string()
                                .with_description("The destination database URL"),
                        )
                        .with_attribute(
                            "src_bytes",
                            Attribute::computed_int64()
                                .with_description("The size of the source database in bytes"),
                        )
                        .with_block("storage_profile", storage_profile_ref_block()),
                ),
            )
            .with_block(
                "sanitize",
                NestedBlock::single(
                    Block::new()
                        .with_attribute(
                            "dst_url",
                            Attribute::optional_string()
                                .with_description("The database URL used to sanitize snapshots"),
                        )
                        .with_attribute(
                            "query",
                            Attribute::optional_string()
                                .with_description("The sanitization query"),
                        )
                        .with_block("storage_profile", storage_profile_ref_block()),
                ),
            )
            .with_block(
                "share",
                NestedBlock::single(Block::new().with_attribute(
                    "sso_groups",
                    Attribute::optional_string_list()
                        .with_description("SSO groups to share the target's snapshots with"),
                )),
            )
    }

    fn normalize(model: TargetModel) -> Result<TargetModel, ProviderError> {
        normalize(model)
    }

    fn to_api_request(model: &TargetModel) -> Result<TargetRequest, ProviderError> {
        to_api_request(model)
    }

    fn apply_api_response(
        response: Target,
        model: TargetModel,
    ) -> Result<TargetModel, ProviderError> {
        apply_api_response(response, model)
    }

    fn id(model: &TargetModel) -> Option<&str> {
        model.id.as_deref()
    }

    fn set_id(model: &mut TargetModel, id: String) {
        model.id = Some(id);
    }

    async fn remote_create(&self, request: &TargetRequest) -> Result<Target, ClientError> {
        self.api.create_target(request).await
    }

    async fn remote_get(&self, id: Uuid) -> Result<Target, ClientError> {
        self.api.get_target(id).await
    }

    async fn remote_update(&self, id: Uuid, request: &TargetRequest) -> Result<Target, ClientError> {
        self.api.update_target(id, request).await
    }

    async fn remote_delete(&self, id: Uuid) -> Result<(), ClientError> {
        self.api.delete_target(id).await
    }
}
