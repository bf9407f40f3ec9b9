//! Managed resources and the lifecycle driver they share.
//!
//! Each resource kind implements [`ManagedResource`]: three pure mapping
//! steps between the state model and the API types, plus the four remote
//! calls. The free functions in this module sequence those steps for every
//! lifecycle call, so create/read/update/delete behave the same way for all
//! kinds:
//!
//! ```text
//! decode state -> normalize -> API request -> remote call -> apply response -> encode state
//! ```
//!
//! Calls hold no state between invocations; everything persistent lives in
//! the orchestrator's stored state.

pub mod storage_profile;
pub mod target;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::{debug, info, instrument};
use uuid::Uuid;

use crate::client::ClientError;
use crate::error::ProviderError;
use crate::schema::{Block, Schema};
use crate::types::{type_name, AttributeChange, ImportedResource, PlanResult};

/// A resource kind the provider manages through the DBSnapper API.
#[async_trait::async_trait]
pub trait ManagedResource: Send + Sync {
    /// Type name suffix, e.g. `target` for `dbsnapper_target`.
    const KIND: &'static str;

    /// The orchestrator-facing state model.
    type Model: Serialize + DeserializeOwned + Send + Sync;
    /// Body sent on create/update.
    type Request: Send + Sync;
    /// Body returned by the service.
    type Response: Send;

    /// Attribute schema of this resource.
    fn resource_schema() -> Schema;

    /// Fill in absent sub-objects and check list attributes decode.
    fn normalize(model: Self::Model) -> Result<Self::Model, ProviderError>;

    /// Build the API request from the settable fields of the model.
    fn to_api_request(model: &Self::Model) -> Result<Self::Request, ProviderError>;

    /// Copy the service's view of the entity into the model.
    fn apply_api_response(
        response: Self::Response,
        model: Self::Model,
    ) -> Result<Self::Model, ProviderError>;

    /// The model's identity attribute, if known.
    fn id(model: &Self::Model) -> Option<&str>;

    /// Set the model's identity attribute.
    fn set_id(model: &mut Self::Model, id: String);

    /// Create the entity remotely.
    async fn remote_create(&self, request: &Self::Request) -> Result<Self::Response, ClientError>;

    /// Fetch the entity remotely.
    async fn remote_get(&self, id: Uuid) -> Result<Self::Response, ClientError>;

    /// Update the entity remotely.
    async fn remote_update(
        &self,
        id: Uuid,
        request: &Self::Request,
    ) -> Result<Self::Response, ClientError>;

    /// Delete the entity remotely.
    async fn remote_delete(&self, id: Uuid) -> Result<(), ClientError>;
}

/// Parse an identity attribute. Empty and malformed values are errors.
pub fn parse_id(field: &str, raw: &str) -> Result<Uuid, ProviderError> {
    Uuid::parse_str(raw).map_err(|_| ProviderError::invalid_id(field, raw))
}

/// Parse an identity that may legitimately be absent (e.g. before create).
pub fn parse_optional_id(field: &str, raw: Option<&str>) -> Result<Option<Uuid>, ProviderError> {
    raw.map(|raw| parse_id(field, raw)).transpose()
}

fn require_id(raw: Option<&str>) -> Result<Uuid, ProviderError> {
    parse_id("id", raw.unwrap_or_default())
}

/// Create: planned state in, new state out.
#[instrument(skip_all, fields(resource_type = %type_name(R::KIND)))]
pub async fn create<R: ManagedResource>(
    resource: &R,
    planned_state: Value,
) -> Result<Value, ProviderError> {
    let plan = R::normalize(serde_json::from_value(planned_state)?)?;
    let request = R::to_api_request(&plan)?;

    let response = resource
        .remote_create(&request)
        .await
        .map_err(|e| ProviderError::client("create", R::KIND, "-", e))?;

    let state = R::apply_api_response(response, plan)?;
    info!(id = R::id(&state).unwrap_or_default(), "Created {}", R::KIND);
    Ok(serde_json::to_value(&state)?)
}

/// Read: refresh stored state from the service. A missing entity is an error.
#[instrument(skip_all, fields(resource_type = %type_name(R::KIND)))]
pub async fn read<R: ManagedResource>(
    resource: &R,
    current_state: Value,
) -> Result<Value, ProviderError> {
    let state = R::normalize(serde_json::from_value(current_state)?)?;
    let id = require_id(R::id(&state))?;

    let response = resource
        .remote_get(id)
        .await
        .map_err(|e| ProviderError::client("read", R::KIND, id.to_string(), e))?;

    let state = R::apply_api_response(response, state)?;
    debug!(%id, "Read {}", R::KIND);
    Ok(serde_json::to_value(&state)?)
}

/// Update: push planned settable fields to the service.
///
/// The identity is taken from the plan, falling back to the prior state when
/// the plan does not carry it.
#[instrument(skip_all, fields(resource_type = %type_name(R::KIND)))]
pub async fn update<R: ManagedResource>(
    resource: &R,
    prior_state: Value,
    planned_state: Value,
) -> Result<Value, ProviderError> {
    let mut plan: R::Model = serde_json::from_value(planned_state)?;
    if R::id(&plan).is_none() {
        let prior: R::Model = serde_json::from_value(prior_state)?;
        if let Some(prior_id) = R::id(&prior) {
            R::set_id(&mut plan, prior_id.to_string());
        }
    }

    let plan = R::normalize(plan)?;
    let id = require_id(R::id(&plan))?;
    let request = R::to_api_request(&plan)?;

    let response = resource
        .remote_update(id, &request)
        .await
        .map_err(|e| ProviderError::client("update", R::KIND, id.to_string(), e))?;

    let state = R::apply_api_response(response, plan)?;
    info!(%id, "Updated {}", R::KIND);
    Ok(serde_json::to_value(&state)?)
}

/// Delete: remove the entity. A missing entity is an error, not a success.
#[instrument(skip_all, fields(resource_type = %type_name(R::KIND)))]
pub async fn delete<R: ManagedResource>(
    resource: &R,
    current_state: Value,
) -> Result<(), ProviderError> {
    let state: R::Model = serde_json::from_value(current_state)?;
    let id = require_id(R::id(&state))?;

    resource
        .remote_delete(id)
        .await
        .map_err(|e| ProviderError::client("delete", R::KIND, id.to_string(), e))?;

    info!(%id, "Deleted {}", R::KIND);
    Ok(())
}

/// Import: the identifier becomes the only known attribute. The
/// orchestrator's follow-up read fills in the rest.
pub fn import<R: ManagedResource>(id: &str) -> ImportedResource {
    info!(resource_type = %type_name(R::KIND), id, "Imported {}", R::KIND);
    ImportedResource::new(type_name(R::KIND), serde_json::json!({ "id": id }))
}

/// Plan: keep the identity from prior state and diff the settable attributes.
///
/// Values only the service sets, nested ones included, never count as changes.
pub fn plan<R: ManagedResource>(prior_state: Option<Value>, proposed_state: Value) -> PlanResult {
    let prior = prior_state.filter(|v| !v.is_null());

    if proposed_state.is_null() {
        let changes = prior
            .as_ref()
            .and_then(|p| p.get("id").cloned())
            .map(|id| vec![AttributeChange::removed("id", id)])
            .unwrap_or_default();
        return PlanResult::with_changes(Value::Null, changes);
    }

    let mut planned = proposed_state;
    if let (Some(prior), Value::Object(map)) = (prior.as_ref(), &mut planned) {
        let planned_id_missing = map.get("id").map_or(true, Value::is_null);
        if let Some(prior_id) = prior.get("id").filter(|_| planned_id_missing) {
            map.insert("id".to_string(), prior_id.clone());
        }
    }

    let schema = R::resource_schema();
    let before = settable_fields(prior.as_ref(), &schema.block);
    let after = settable_fields(Some(&planned), &schema.block);

    let mut keys: Vec<&String> = before.keys().chain(after.keys()).collect();
    keys.sort();
    keys.dedup();

    let mut changes = Vec::new();
    for key in keys {
        match (before.get(key), after.get(key)) {
            (None, Some(a)) => changes.push(AttributeChange::added(key.as_str(), a.clone())),
            (Some(b), None) => changes.push(AttributeChange::removed(key.as_str(), b.clone())),
            (Some(b), Some(a)) if a != b => {
                changes.push(AttributeChange::modified(key.as_str(), b.clone(), a.clone()))
            }
            _ => {}
        }
    }

    PlanResult::with_changes(planned, changes)
}

/// Top-level fields of `state` the user can set, with nested computed-only
/// values and unset leaves stripped.
fn settable_fields(state: Option<&Value>, block: &Block) -> Map<String, Value> {
    match state.and_then(|s| settable_value(s, block)) {
        Some(Value::Object(map)) => map,
        _ => Map::new(),
    }
}

/// An object reduced to nothing counts as absent, so a block the service
/// filled with nulls or empty strings equals a block the user never wrote.
fn settable_value(value: &Value, block: &Block) -> Option<Value> {
    let Value::Object(map) = value else {
        return (!is_unset(value)).then(|| value.clone());
    };

    let mut kept = Map::new();
    for (key, v) in map {
        if block
            .attributes
            .get(key)
            .is_some_and(|attr| attr.flags.is_computed_only())
        {
            continue;
        }
        let stripped = match block.blocks.get(key) {
            Some(nested) if nested.computed => None,
            Some(nested) => match v {
                Value::Array(items) if !items.is_empty() => Some(Value::Array(
                    items
                        .iter()
                        .map(|item| settable_value(item, &nested.block).unwrap_or(Value::Null))
                        .collect(),
                )),
                Value::Array(_) => None,
                _ => settable_value(v, &nested.block),
            },
            None => (!is_unset(v)).then(|| v.clone()),
        };
        if let Some(stripped) = stripped {
            kept.insert(key.clone(), stripped);
        }
    }

    (!kept.is_empty()).then_some(Value::Object(kept))
}

// The service reports unset optional strings as "".
fn is_unset(value: &Value) -> bool {
    value.is_null() || value.as_str().is_some_and(str::is_empty)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resources::target::TargetResource;
    use serde_json::json;

    const ID: &str = "0b6f5a6e-1c2d-4e3f-8a9b-0c1d2e3f4a5b";

    #[test]
    fn test_parse_id() {
        assert_eq!(parse_id("id", ID).unwrap().to_string(), ID);

        let err = parse_id("id", "").unwrap_err();
        assert!(matches!(err, ProviderError::InvalidId { ref field, .. } if field == "id"));

        let err = parse_id("snapshot.storage_profile.id", "not-a-uuid").unwrap_err();
        assert!(format!("{}", err).contains("snapshot.storage_profile.id"));
    }

    #[test]
    fn test_parse_optional_id() {
        assert_eq!(parse_optional_id("id", None).unwrap(), None);
        assert!(parse_optional_id("id", Some(ID)).unwrap().is_some());
        assert!(parse_optional_id("id", Some("")).is_err());
    }

    #[test]
    fn test_import_passthrough() {
        let imported = import::<TargetResource>("anything-goes");
        assert_eq!(imported.resource_type, "dbsnapper_target");
        assert_eq!(imported.state, json!({"id": "anything-goes"}));
    }

    #[test]
    fn test_plan_create_lists_settable_attributes() {
        let result = plan::<TargetResource>(
            None,
            json!({
                "id": null,
                "name": "tf_test",
                "status": null,
                "snapshot": {"src_url": "postgres://src"}
            }),
        );

        let paths: Vec<_> = result.changes.iter().map(|c| c.path.as_str()).collect();
        assert_eq!(paths, vec!["name", "snapshot"]);
        assert!(!result.requires_replace);
    }

    #[test]
    fn test_plan_update_keeps_prior_id_and_ignores_computed() {
        let prior = json!({
            "id": ID,
            "name": "tf_test",
            "status": "ready",
            "share": {"sso_groups": ["group1", "group2", "group3"]}
        });
        let proposed = json!({
            "id": null,
            "name": "tf_test",
            "status": null,
            "share": {"sso_groups": ["group4", "group5", "group6"]}
        });

        let result = plan::<TargetResource>(Some(prior), proposed);
        assert_eq!(result.planned_state["id"], ID);
        assert_eq!(result.changes.len(), 1);
        assert_eq!(result.changes[0].path, "share");
        assert_eq!(
            result.changes[0].after,
            Some(json!({"sso_groups": ["group4", "group5", "group6"]}))
        );
    }

    #[test]
    fn test_plan_no_changes() {
        let state = json!({"id": ID, "name": "tf_test", "status": "ready"});
        let result = plan::<TargetResource>(Some(state.clone()), state);
        assert!(!result.has_changes());
    }

    #[test]
    fn test_plan_ignores_nested_computed_values() {
        let prior = json!({
            "id": ID,
            "name": "tf_test",
            "status": "ready",
            "snapshot": {
                "src_url": "postgres://src",
                "dst_url": "",
                "src_bytes": 1024,
                "storage_profile": {"id": null}
            },
            "sanitize": {"dst_url": null, "query": null, "storage_profile": null},
            "share": null
        });
        let config = json!({
            "name": "tf_test",
            "snapshot": {"src_url": "postgres://src"}
        });

        let result = plan::<TargetResource>(Some(prior.clone()), config);
        assert!(!result.has_changes(), "unexpected changes: {:?}", result.changes);
        assert_eq!(result.planned_state["id"], ID);

        let result = plan::<TargetResource>(
            Some(prior),
            json!({
                "name": "tf_test",
                "snapshot": {"src_url": "postgres://other"}
            }),
        );
        let paths: Vec<_> = result.changes.iter().map(|c| c.path.as_str()).collect();
        assert_eq!(paths, vec!["snapshot"]);
    }

    #[test]
    fn test_plan_dropped_block_is_removed() {
        let prior = json!({
            "id": ID,
            "name": "tf_test",
            "share": {"sso_groups": ["group1"]}
        });
        let result = plan::<TargetResource>(Some(prior), json!({"name": "tf_test"}));
        assert_eq!(
            result.changes,
            vec![AttributeChange::removed("share", json!({"sso_groups": ["group1"]}))]
        );
    }

    #[test]
    fn test_plan_destroy() {
        let result = plan::<TargetResource>(Some(json!({"id": ID})), Value::Null);
        assert!(result.planned_state.is_null());
        assert_eq!(result.changes, vec![AttributeChange::removed("id", json!(ID))]);
    }
}
