//! Request and response bodies of the DBSnapper REST API.
//!
//! Requests and responses are separate types: server-owned fields (status,
//! messages, timestamps, sizes) exist only on responses, so a request can
//! never carry them. Optional response sub-objects are `Option`s; `None`
//! means the service did not populate them.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// A weak reference to a storage profile by identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageProfileRef {
    /// The referenced storage profile's identity.
    pub id: Uuid,
}

impl StorageProfileRef {
    /// Reference the storage profile with the given identity.
    pub fn new(id: Uuid) -> Self {
        Self { id }
    }
}

/// Snapshot settings sent on create/update.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotRequest {
    /// Source database URL.
    pub src_url: String,
    /// Destination database URL.
    pub dst_url: String,
    /// Storage profile holding the snapshot files.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storage_profile: Option<StorageProfileRef>,
}

/// Sanitize settings, used both in requests and responses.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SanitizeConfig {
    /// Database URL used to sanitize a snapshot.
    #[serde(default)]
    pub dst_url: String,
    /// Query run against the sanitize database.
    #[serde(default)]
    pub query: String,
    /// Storage profile holding sanitized snapshot files.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storage_profile: Option<StorageProfileRef>,
}

/// Share settings sent on create/update.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShareRequest {
    /// SSO groups granted access to the target's snapshots, in user order.
    pub sso_groups: Vec<String>,
}

/// Body of a target create/update call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetRequest {
    /// Identity, present on update only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Uuid>,
    /// Target name.
    pub name: String,
    /// Snapshot settings.
    pub snapshot: SnapshotRequest,
    /// Sanitize settings.
    pub sanitize: SanitizeConfig,
    /// Share settings.
    pub share: ShareRequest,
}

/// Snapshot settings as reported by the service.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Source database URL.
    #[serde(default)]
    pub src_url: String,
    /// Destination database URL (the service may rewrite it).
    #[serde(default)]
    pub dst_url: String,
    /// Size of the source database in bytes.
    #[serde(default)]
    pub src_bytes: i64,
    /// Storage profile holding the snapshot files, if any.
    #[serde(default)]
    pub storage_profile: Option<StorageProfileRef>,
}

/// Share settings as reported by the service.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Share {
    /// SSO groups, `None` when the service reports no list at all.
    #[serde(default)]
    pub sso_groups: Option<Vec<String>>,
}

/// A target as returned by the service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Target {
    /// Identity assigned by the service.
    pub id: Uuid,
    /// Target name.
    #[serde(default)]
    pub name: String,
    /// Status reported by the agent.
    #[serde(default)]
    pub status: String,
    /// Error messages reported by the agent.
    #[serde(default)]
    pub messages: String,
    /// Snapshot settings.
    #[serde(default)]
    pub snapshot: Snapshot,
    /// Sanitize settings, if configured.
    #[serde(default)]
    pub sanitize: Option<SanitizeConfig>,
    /// Share settings, if configured.
    #[serde(default)]
    pub share: Option<Share>,
    /// Creation time.
    #[serde(default)]
    pub created_at: String,
    /// Last update time.
    #[serde(default)]
    pub updated_at: String,
}

/// Body of a storage profile create/update call.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageProfileRequest {
    /// Identity, present on update only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Uuid>,
    /// Profile name.
    pub name: String,
    /// Storage provider kind, e.g. `s3`.
    pub provider: String,
    /// Storage region.
    pub region: String,
    /// Storage account ID.
    pub account_id: String,
    /// Storage access key.
    pub access_key: String,
    /// Storage secret key.
    pub secret_key: String,
    /// Bucket name.
    pub bucket: String,
    /// Key prefix within the bucket.
    pub prefix: String,
}

/// A storage profile as returned by the service.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageProfile {
    /// Identity assigned by the service.
    pub id: Uuid,
    /// Profile name.
    #[serde(default)]
    pub name: String,
    /// Storage provider kind, e.g. `s3`.
    #[serde(default)]
    pub provider: String,
    /// Storage region.
    #[serde(default)]
    pub region: String,
    /// Storage account ID.
    #[serde(default)]
    pub account_id: String,
    /// Storage access key.
    #[serde(default)]
    pub access_key: String,
    /// Storage secret key.
    #[serde(default)]
    pub secret_key: String,
    /// Bucket name.
    #[serde(default)]
    pub bucket: String,
    /// Key prefix within the bucket.
    #[serde(default)]
    pub prefix: String,
    /// Status reported by the service.
    #[serde(default)]
    pub status: String,
    /// Creation time.
    #[serde(default)]
    pub created_at: String,
    /// Last update time.
    #[serde(default)]
    pub updated_at: String,
}

const REDACTED: &str = "<redacted>";

impl fmt::Debug for StorageProfileRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StorageProfileRequest")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("provider", &self.provider)
            .field("region", &self.region)
            .field("account_id", &self.account_id)
            .field("access_key", &REDACTED)
            .field("secret_key", &REDACTED)
            .field("bucket", &self.bucket)
            .field("prefix", &self.prefix)
            .finish()
    }
}

impl fmt::Debug for StorageProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StorageProfile")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("provider", &self.provider)
            .field("region", &self.region)
            .field("account_id", &self.account_id)
            .field("access_key", &REDACTED)
            .field("secret_key", &REDACTED)
            .field("bucket", &self.bucket)
            .field("prefix", &self.prefix)
            .field("status", &self.status)
            .field("created_at", &self.created_at)
            .field("updated_at", &self.updated_at)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_target_response_optional_sections() {
        let target: Target = serde_json::from_value(json!({
            "id": "0b6f5a6e-1c2d-4e3f-8a9b-0c1d2e3f4a5b",
            "name": "tf_test",
            "status": "ready",
            "snapshot": {"src_url": "postgres://src", "dst_url": "postgres://dst", "src_bytes": 2048}
        }))
        .unwrap();

        assert_eq!(target.snapshot.src_bytes, 2048);
        assert!(target.snapshot.storage_profile.is_none());
        assert!(target.sanitize.is_none());
        assert!(target.share.is_none());
    }

    #[test]
    fn test_empty_sanitize_is_still_present() {
        let target: Target = serde_json::from_value(json!({
            "id": "0b6f5a6e-1c2d-4e3f-8a9b-0c1d2e3f4a5b",
            "sanitize": {},
            "share": {"sso_groups": []}
        }))
        .unwrap();

        assert_eq!(target.sanitize, Some(SanitizeConfig::default()));
        assert_eq!(target.share.unwrap().sso_groups, Some(vec![]));
    }

    #[test]
    fn test_target_request_omits_absent_references() {
        let request = TargetRequest {
            name: "tf_test".to_string(),
            ..Default::default()
        };
        let body = serde_json::to_value(&request).unwrap();

        assert!(body.get("id").is_none());
        assert!(body["snapshot"].get("storage_profile").is_none());
        assert!(body.get("status").is_none());
        assert_eq!(body["share"]["sso_groups"], json!([]));
    }

    #[test]
    fn test_storage_profile_debug_redacts_credentials() {
        let request = StorageProfileRequest {
            access_key: "AKIAxxxxxxxxxxxx".to_string(),
            secret_key: "super-secret".to_string(),
            ..Default::default()
        };
        let debug = format!("{:?}", request);
        assert!(!debug.contains("AKIAxxxxxxxxxxxx"));
        assert!(!debug.contains("super-secret"));
        assert!(debug.contains(REDACTED));
    }
}
