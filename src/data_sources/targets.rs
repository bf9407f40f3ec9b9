//! The `dbsnapper_targets` data source: every target visible to the auth
//! token, in service order.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, instrument};

use crate::client::{SnapperApi, Target};
use crate::error::ProviderError;
use crate::resources::target::{encode_sso_groups, ShareModel};
use crate::schema::{Attribute, Block, NestedBlock, Schema};

/// Type name suffix of this data source.
pub const KIND: &str = "targets";

/// Snapshot settings of a listed target.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetSnapshotSummary {
    /// Source database URL.
    pub src_url: String,
    /// Destination database URL.
    pub dst_url: String,
}

/// Sanitize settings of a listed target.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetSanitizeSummary {
    /// Database URL used to sanitize a snapshot.
    pub dst_url: String,
    /// Sanitization query.
    pub query: String,
}

/// One element of the `targets` list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetSummary {
    /// Identity.
    pub id: String,
    /// Target name.
    pub name: String,
    /// Status reported by the agent.
    pub status: String,
    /// Error messages reported by the agent.
    pub messages: String,
    /// Snapshot settings.
    pub snapshot: TargetSnapshotSummary,
    /// Sanitize settings; defaults when the service reports none.
    pub sanitize: TargetSanitizeSummary,
    /// Share settings, only when the service reports a group list.
    pub share: Option<ShareModel>,
    /// Creation time.
    pub created_at: String,
    /// Last update time.
    pub updated_at: String,
}

impl TryFrom<Target> for TargetSummary {
    type Error = ProviderError;

    fn try_from(target: Target) -> Result<Self, Self::Error> {
        let share = match target.share.and_then(|s| s.sso_groups) {
            Some(groups) => Some(ShareModel {
                sso_groups: Some(encode_sso_groups(&groups)?),
            }),
            None => None,
        };
        let sanitize = target.sanitize.unwrap_or_default();

        Ok(Self {
            id: target.id.to_string(),
            name: target.name,
            status: target.status,
            messages: target.messages,
            snapshot: TargetSnapshotSummary {
                src_url: target.snapshot.src_url,
                dst_url: target.snapshot.dst_url,
            },
            sanitize: TargetSanitizeSummary {
                dst_url: sanitize.dst_url,
                query: sanitize.query,
            },
            share,
            created_at: target.created_at,
            updated_at: target.updated_at,
        })
    }
}

/// State of the data source.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetsState {
    /// Listed targets.
    pub targets: Vec<TargetSummary>,
}

/// Controller for `dbsnapper_targets`.
pub struct TargetsDataSource {
    api: Arc<dyn SnapperApi>,
}

impl TargetsDataSource {
    /// Build the controller over a configured API client.
    pub fn new(api: Arc<dyn SnapperApi>) -> Self {
        Self { api }
    }

    /// Attribute schema of this data source.
    pub fn data_source_schema() -> Schema {
        let target = Block::new()
            .with_attribute("id", Attribute::computed_string())
            .with_attribute("name", Attribute::computed_string())
            .with_attribute("status", Attribute::computed_string())
            .with_attribute("messages", Attribute::computed_string())
            .with_attribute("created_at", Attribute::computed_string())
            .with_attribute("updated_at", Attribute::computed_string())
            .with_block(
                "snapshot",
                NestedBlock::single(
                    Block::new()
                        .with_attribute("src_url", Attribute::computed_string())
                        .with_attribute("dst_url", Attribute::computed_string()),
                )
                .computed(),
            )
            .with_block(
                "sanitize",
                NestedBlock::single(
                    Block::new()
                        .with_attribute("dst_url", Attribute::computed_string())
                        .with_attribute("query", Attribute::computed_string()),
                )
                .computed(),
            )
            .with_block(
                "share",
                NestedBlock::single(
                    Block::new().with_attribute("sso_groups", Attribute::computed_string_list()),
                )
                .computed(),
            );

        Schema::v0()
            .with_description("DBSnapper Targets Data Source")
            .with_block("targets", NestedBlock::list(target).computed())
    }

    /// List targets and build the data source state.
    ///
    /// A failed list call or any element that cannot be encoded aborts the
    /// read; no partial list is returned.
    #[instrument(skip_all, fields(data_source = KIND))]
    pub async fn read(&self) -> Result<Value, ProviderError> {
        let targets = self
            .api
            .list_targets()
            .await
            .map_err(|e| ProviderError::client("list", KIND, "-", e))?;
        debug!(count = targets.len(), "Listed targets");

        let state = TargetsState {
            targets: targets
                .into_iter()
                .map(TargetSummary::try_from)
                .collect::<Result<_, _>>()?,
        };
        Ok(serde_json::to_value(state)?)
    }
}
