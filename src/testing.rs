//! Testing utilities for the provider.
//!
//! [`ProviderTester`] drives a [`ProviderService`] the way the orchestrator
//! would, without any transport. [`MemorySnapperApi`] stands in for the
//! DBSnapper service so lifecycle tests run without network access.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use dbsnapper_provider::testing::{MemorySnapperApi, ProviderTester};
//! use dbsnapper_provider::DbSnapperProvider;
//! use serde_json::json;
//!
//! # tokio_test::block_on(async {
//! let api = Arc::new(MemorySnapperApi::new());
//! let tester = ProviderTester::new(DbSnapperProvider::with_api("test", api.clone()));
//!
//! let state = tester
//!     .lifecycle_create(
//!         "dbsnapper_target",
//!         json!({"name": "tf_test", "snapshot": {"src_url": "postgres://localhost/tf_test"}}),
//!     )
//!     .await
//!     .unwrap();
//!
//! assert_eq!(state["name"], "tf_test");
//! assert_eq!(api.target_count(), 1);
//! # });
//! ```

use std::sync::{Mutex, MutexGuard, PoisonError};

use serde_json::Value;
use uuid::Uuid;

use crate::client::{
    ClientError, SnapperApi, Share, Snapshot, StorageProfile, StorageProfileRequest, Target,
    TargetRequest,
};
use crate::error::ProviderError;
use crate::schema::{Diagnostic, DiagnosticSeverity, ProviderSchema};
use crate::service::ProviderService;
use crate::types::{ImportedResource, PlanResult};

/// A test harness for provider implementations.
pub struct ProviderTester<P: ProviderService> {
    provider: P,
}

impl<P: ProviderService> ProviderTester<P> {
    /// Create a new tester for the given provider.
    pub fn new(provider: P) -> Self {
        Self { provider }
    }

    /// Get a reference to the underlying provider.
    pub fn provider(&self) -> &P {
        &self.provider
    }

    // =========================================================================
    // Schema & Metadata
    // =========================================================================

    /// Get the provider's schema.
    pub fn schema(&self) -> ProviderSchema {
        self.provider.schema()
    }

    /// Get the list of resource type names.
    pub fn resource_types(&self) -> Vec<String> {
        self.provider.metadata().resources
    }

    /// Get the list of data source type names.
    pub fn data_source_types(&self) -> Vec<String> {
        self.provider.metadata().data_sources
    }

    // =========================================================================
    // Provider Lifecycle
    // =========================================================================

    /// Validate provider configuration.
    ///
    /// Returns `Err` with the error diagnostics if there are any.
    pub async fn validate_provider_config(&self, config: Value) -> Result<(), TestError> {
        let diagnostics = self.provider.validate_provider_config(config).await?;
        check_diagnostics(diagnostics)
    }

    /// Configure the provider.
    ///
    /// Returns `Err` with the error diagnostics if there are any.
    pub async fn configure(&self, config: Value) -> Result<(), TestError> {
        let diagnostics = self.provider.configure(config).await?;
        check_diagnostics(diagnostics)
    }

    // =========================================================================
    // Resource Operations
    // =========================================================================

    /// Validate a resource configuration.
    pub async fn validate_resource_config(
        &self,
        resource_type: &str,
        config: Value,
    ) -> Result<(), TestError> {
        let diagnostics = self
            .provider
            .validate_resource_config(resource_type, config)
            .await?;
        check_diagnostics(diagnostics)
    }

    /// Plan a resource creation (no prior state).
    pub async fn plan_create(
        &self,
        resource_type: &str,
        proposed_state: Value,
    ) -> Result<PlanResult, ProviderError> {
        self.provider
            .plan(resource_type, None, proposed_state.clone(), proposed_state)
            .await
    }

    /// Plan a resource update.
    pub async fn plan_update(
        &self,
        resource_type: &str,
        prior_state: Value,
        proposed_state: Value,
    ) -> Result<PlanResult, ProviderError> {
        self.provider
            .plan(
                resource_type,
                Some(prior_state),
                proposed_state.clone(),
                proposed_state,
            )
            .await
    }

    /// Plan a resource deletion.
    pub async fn plan_delete(
        &self,
        resource_type: &str,
        prior_state: Value,
    ) -> Result<PlanResult, ProviderError> {
        self.provider
            .plan(resource_type, Some(prior_state), Value::Null, Value::Null)
            .await
    }

    /// Create a new resource.
    pub async fn create(
        &self,
        resource_type: &str,
        planned_state: Value,
    ) -> Result<Value, ProviderError> {
        self.provider.create(resource_type, planned_state).await
    }

    /// Read the current state of a resource.
    pub async fn read(
        &self,
        resource_type: &str,
        current_state: Value,
    ) -> Result<Value, ProviderError> {
        self.provider.read(resource_type, current_state).await
    }

    /// Update an existing resource.
    pub async fn update(
        &self,
        resource_type: &str,
        prior_state: Value,
        planned_state: Value,
    ) -> Result<Value, ProviderError> {
        self.provider
            .update(resource_type, prior_state, planned_state)
            .await
    }

    /// Delete a resource.
    pub async fn delete(
        &self,
        resource_type: &str,
        current_state: Value,
    ) -> Result<(), ProviderError> {
        self.provider.delete(resource_type, current_state).await
    }

    /// Import an existing resource.
    pub async fn import_resource(
        &self,
        resource_type: &str,
        id: &str,
    ) -> Result<Vec<ImportedResource>, ProviderError> {
        self.provider.import_resource(resource_type, id).await
    }

    // =========================================================================
    // Data Source Operations
    // =========================================================================

    /// Validate a data source configuration.
    pub async fn validate_data_source_config(
        &self,
        data_source_type: &str,
        config: Value,
    ) -> Result<(), TestError> {
        let diagnostics = self
            .provider
            .validate_data_source_config(data_source_type, config)
            .await?;
        check_diagnostics(diagnostics)
    }

    /// Read data from a data source.
    pub async fn read_data_source(
        &self,
        data_source_type: &str,
        config: Value,
    ) -> Result<Value, ProviderError> {
        self.provider
            .read_data_source(data_source_type, config)
            .await
    }

    // =========================================================================
    // Lifecycle Helpers
    // =========================================================================

    /// Run a full create lifecycle: plan → create → read.
    ///
    /// Returns the final state after read.
    pub async fn lifecycle_create(
        &self,
        resource_type: &str,
        config: Value,
    ) -> Result<Value, ProviderError> {
        let plan_result = self.plan_create(resource_type, config).await?;

        let created_state = self
            .create(resource_type, plan_result.planned_state)
            .await?;

        self.read(resource_type, created_state).await
    }

    /// Run a full update lifecycle: plan → update → read.
    ///
    /// Returns the final state after read.
    pub async fn lifecycle_update(
        &self,
        resource_type: &str,
        prior_state: Value,
        proposed_state: Value,
    ) -> Result<Value, ProviderError> {
        let plan_result = self
            .plan_update(resource_type, prior_state.clone(), proposed_state)
            .await?;

        let updated_state = self
            .update(resource_type, prior_state, plan_result.planned_state)
            .await?;

        self.read(resource_type, updated_state).await
    }

    /// Run a full delete lifecycle: plan → delete.
    pub async fn lifecycle_delete(
        &self,
        resource_type: &str,
        current_state: Value,
    ) -> Result<(), ProviderError> {
        let _ = self
            .plan_delete(resource_type, current_state.clone())
            .await?;

        self.delete(resource_type, current_state).await
    }

    /// Run a full CRUD lifecycle: create → read → update → read → delete.
    ///
    /// Returns the state after the update (before delete).
    pub async fn lifecycle_crud(
        &self,
        resource_type: &str,
        initial_config: Value,
        updated_config: Value,
    ) -> Result<Value, ProviderError> {
        let created_state = self.lifecycle_create(resource_type, initial_config).await?;

        let updated_state = self
            .lifecycle_update(resource_type, created_state, updated_config)
            .await?;

        self.lifecycle_delete(resource_type, updated_state.clone())
            .await?;

        Ok(updated_state)
    }
}

/// Error type for test operations that may fail with diagnostics.
#[derive(Debug)]
pub enum TestError {
    /// The operation failed with diagnostics.
    Diagnostics(Vec<Diagnostic>),
    /// The operation failed with a provider error.
    Provider(ProviderError),
}

impl std::fmt::Display for TestError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TestError::Diagnostics(diags) => {
                writeln!(f, "Operation failed with {} diagnostic(s):", diags.len())?;
                for diag in diags {
                    write!(f, "  [{:?}] {}", diag.severity, diag.summary)?;
                    if let Some(detail) = &diag.detail {
                        write!(f, ": {}", detail)?;
                    }
                    if let Some(attr) = &diag.attribute {
                        write!(f, " (at {})", attr)?;
                    }
                    writeln!(f)?;
                }
                Ok(())
            }
            TestError::Provider(e) => write!(f, "Provider error: {}", e),
        }
    }
}

impl std::error::Error for TestError {}

impl From<ProviderError> for TestError {
    fn from(e: ProviderError) -> Self {
        TestError::Provider(e)
    }
}

fn check_diagnostics(diagnostics: Vec<Diagnostic>) -> Result<(), TestError> {
    let errors: Vec<_> = diagnostics
        .into_iter()
        .filter(Diagnostic::is_error)
        .collect();

    if errors.is_empty() {
        Ok(())
    } else {
        Err(TestError::Diagnostics(errors))
    }
}

// =========================================================================
// In-memory DBSnapper service
// =========================================================================

/// Timestamp the in-memory service stamps on every entity it writes.
pub const MEMORY_TIMESTAMP: &str = "2024-01-01T00:00:00Z";

/// Source size the in-memory service reports for every target.
pub const MEMORY_SRC_BYTES: i64 = 1024;

#[derive(Default)]
struct MemoryState {
    targets: Vec<Target>,
    storage_profiles: Vec<StorageProfile>,
    unavailable: bool,
}

/// An in-memory stand-in for the DBSnapper service.
///
/// Assigns random identities, reports targets as `ready` and storage
/// profiles as `active`, and lists targets in insertion order. Unknown
/// identities produce [`ClientError::NotFound`], like the real service.
#[derive(Default)]
pub struct MemorySnapperApi {
    state: Mutex<MemoryState>,
}

impl MemorySnapperApi {
    /// Create an empty service.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, MemoryState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Store a target as-is, bypassing the create call.
    pub fn insert_target(&self, target: Target) -> Uuid {
        let id = target.id;
        self.lock().targets.push(target);
        id
    }

    /// Remove a target behind the provider's back.
    pub fn remove_target(&self, id: Uuid) -> Option<Target> {
        let mut state = self.lock();
        let index = state.targets.iter().position(|t| t.id == id)?;
        Some(state.targets.remove(index))
    }

    /// Look up a stored target.
    pub fn target(&self, id: Uuid) -> Option<Target> {
        self.lock().targets.iter().find(|t| t.id == id).cloned()
    }

    /// Number of stored targets.
    pub fn target_count(&self) -> usize {
        self.lock().targets.len()
    }

    /// Number of stored storage profiles.
    pub fn storage_profile_count(&self) -> usize {
        self.lock().storage_profiles.len()
    }

    /// When set, every call fails with a 503 API error.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.lock().unavailable = unavailable;
    }

    fn check_available(state: &MemoryState) -> Result<(), ClientError> {
        if state.unavailable {
            return Err(ClientError::Api {
                status: 503,
                body: "service unavailable".to_string(),
            });
        }
        Ok(())
    }
}

fn apply_target_request(target: &mut Target, request: &TargetRequest) {
    target.name = request.name.clone();
    target.snapshot.src_url = request.snapshot.src_url.clone();
    target.snapshot.dst_url = request.snapshot.dst_url.clone();
    target.snapshot.storage_profile = request.snapshot.storage_profile;
    target.sanitize = Some(request.sanitize.clone());
    target.share = (!request.share.sso_groups.is_empty()).then(|| Share {
        sso_groups: Some(request.share.sso_groups.clone()),
    });
    target.updated_at = MEMORY_TIMESTAMP.to_string();
}

fn apply_storage_profile_request(profile: &mut StorageProfile, request: &StorageProfileRequest) {
    profile.name = request.name.clone();
    profile.provider = request.provider.clone();
    profile.region = request.region.clone();
    profile.account_id = request.account_id.clone();
    profile.access_key = request.access_key.clone();
    profile.secret_key = request.secret_key.clone();
    profile.bucket = request.bucket.clone();
    profile.prefix = request.prefix.clone();
    profile.updated_at = MEMORY_TIMESTAMP.to_string();
}

#[async_trait::async_trait]
impl SnapperApi for MemorySnapperApi {
    async fn create_target(&self, request: &TargetRequest) -> Result<Target, ClientError> {
        let mut state = self.lock();
        Self::check_available(&state)?;

        let mut target = Target {
            id: Uuid::new_v4(),
            name: String::new(),
            status: "ready".to_string(),
            messages: String::new(),
            snapshot: Snapshot {
                src_bytes: MEMORY_SRC_BYTES,
                ..Default::default()
            },
            sanitize: None,
            share: None,
            created_at: MEMORY_TIMESTAMP.to_string(),
            updated_at: MEMORY_TIMESTAMP.to_string(),
        };
        apply_target_request(&mut target, request);
        state.targets.push(target.clone());
        Ok(target)
    }

    async fn get_target(&self, id: Uuid) -> Result<Target, ClientError> {
        let state = self.lock();
        Self::check_available(&state)?;
        state
            .targets
            .iter()
            .find(|t| t.id == id)
            .cloned()
            .ok_or_else(|| ClientError::NotFound(format!("/targets/{}", id)))
    }

    async fn update_target(
        &self,
        id: Uuid,
        request: &TargetRequest,
    ) -> Result<Target, ClientError> {
        let mut state = self.lock();
        Self::check_available(&state)?;
        let target = state
            .targets
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or_else(|| ClientError::NotFound(format!("/targets/{}", id)))?;
        apply_target_request(target, request);
        Ok(target.clone())
    }

    async fn delete_target(&self, id: Uuid) -> Result<(), ClientError> {
        let mut state = self.lock();
        Self::check_available(&state)?;
        let index = state
            .targets
            .iter()
            .position(|t| t.id == id)
            .ok_or_else(|| ClientError::NotFound(format!("/targets/{}", id)))?;
        state.targets.remove(index);
        Ok(())
    }

    async fn list_targets(&self) -> Result<Vec<Target>, ClientError> {
        let state = self.lock();
        Self::check_available(&state)?;
        Ok(state.targets.clone())
    }

    async fn create_storage_profile(
        &self,
        request: &StorageProfileRequest,
    ) -> Result<StorageProfile, ClientError> {
        let mut state = self.lock();
        Self::check_available(&state)?;

        let mut profile = StorageProfile {
            id: Uuid::new_v4(),
            name: String::new(),
            provider: String::new(),
            region: String::new(),
            account_id: String::new(),
            access_key: String::new(),
            secret_key: String::new(),
            bucket: String::new(),
            prefix: String::new(),
            status: "active".to_string(),
            created_at: MEMORY_TIMESTAMP.to_string(),
            updated_at: MEMORY_TIMESTAMP.to_string(),
        };
        apply_storage_profile_request(&mut profile, request);
        state.storage_profiles.push(profile.clone());
        Ok(profile)
    }

    async fn get_storage_profile(&self, id: Uuid) -> Result<StorageProfile, ClientError> {
        let state = self.lock();
        Self::check_available(&state)?;
        state
            .storage_profiles
            .iter()
            .find(|p| p.id == id)
            .cloned()
            .ok_or_else(|| ClientError::NotFound(format!("/storage_profiles/{}", id)))
    }

    async fn update_storage_profile(
        &self,
        id: Uuid,
        request: &StorageProfileRequest,
    ) -> Result<StorageProfile, ClientError> {
        let mut state = self.lock();
        Self::check_available(&state)?;
        let profile = state
            .storage_profiles
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| ClientError::NotFound(format!("/storage_profiles/{}", id)))?;
        apply_storage_profile_request(profile, request);
        Ok(profile.clone())
    }

    async fn delete_storage_profile(&self, id: Uuid) -> Result<(), ClientError> {
        let mut state = self.lock();
        Self::check_available(&state)?;
        let index = state
            .storage_profiles
            .iter()
            .position(|p| p.id == id)
            .ok_or_else(|| ClientError::NotFound(format!("/storage_profiles/{}", id)))?;
        state.storage_profiles.remove(index);
        Ok(())
    }
}

// =========================================================================
// Assertion Helpers
// =========================================================================

/// Assert that a plan result indicates the resource will be created.
///
/// # Panics
///
/// Panics if the plan has no changes or requires replacement.
pub fn assert_plan_creates(plan: &PlanResult) {
    assert!(
        !plan.changes.is_empty(),
        "Expected plan to have changes for create, but got no changes"
    );
    assert!(
        !plan.requires_replace,
        "Expected plan to create, not replace"
    );
}

/// Assert that a plan result indicates no changes.
///
/// # Panics
///
/// Panics if the plan has any changes.
pub fn assert_plan_no_changes(plan: &PlanResult) {
    assert!(
        plan.changes.is_empty(),
        "Expected no changes, but got {} change(s): {:?}",
        plan.changes.len(),
        plan.changes.iter().map(|c| &c.path).collect::<Vec<_>>()
    );
}

/// Assert that a plan does not require resource replacement.
///
/// # Panics
///
/// Panics if the plan requires replacement.
pub fn assert_plan_updates_in_place(plan: &PlanResult) {
    assert!(
        !plan.requires_replace,
        "Expected plan to update in place, but it requires replacement"
    );
}

/// Assert that a plan has a change for a specific attribute path.
///
/// # Panics
///
/// Panics if the plan does not have a change for the given path.
pub fn assert_plan_changes_attribute(plan: &PlanResult, path: &str) {
    let has_change = plan.changes.iter().any(|c| c.path == path);
    assert!(
        has_change,
        "Expected plan to change attribute '{}', but it was not changed. Changed attributes: {:?}",
        path,
        plan.changes.iter().map(|c| &c.path).collect::<Vec<_>>()
    );
}

/// Assert that a plan does not have a change for a specific attribute path.
///
/// # Panics
///
/// Panics if the plan has a change for the given path.
pub fn assert_plan_does_not_change_attribute(plan: &PlanResult, path: &str) {
    let has_change = plan.changes.iter().any(|c| c.path == path);
    assert!(
        !has_change,
        "Expected plan to not change attribute '{}', but it was changed",
        path
    );
}

/// Assert that diagnostics contain no errors.
///
/// # Panics
///
/// Panics if there are any error diagnostics.
pub fn assert_no_errors(diagnostics: &[Diagnostic]) {
    let errors: Vec<_> = diagnostics.iter().filter(|d| d.is_error()).collect();

    assert!(
        errors.is_empty(),
        "Expected no errors, but got {} error(s): {:?}",
        errors.len(),
        errors.iter().map(|d| &d.summary).collect::<Vec<_>>()
    );
}

/// Assert that diagnostics contain at least one error.
///
/// # Panics
///
/// Panics if there are no error diagnostics.
pub fn assert_has_errors(diagnostics: &[Diagnostic]) {
    assert!(
        crate::schema::has_errors(diagnostics),
        "Expected at least one error, but got none"
    );
}

/// Assert that diagnostics contain an error with the given summary substring.
///
/// # Panics
///
/// Panics if no error diagnostic contains the given substring.
pub fn assert_error_contains(diagnostics: &[Diagnostic], substring: &str) {
    let has_matching_error = diagnostics
        .iter()
        .any(|d| matches!(d.severity, DiagnosticSeverity::Error) && d.summary.contains(substring));

    assert!(
        has_matching_error,
        "Expected an error containing '{}', but no matching error found. Errors: {:?}",
        substring,
        diagnostics
            .iter()
            .filter(|d| d.is_error())
            .map(|d| &d.summary)
            .collect::<Vec<_>>()
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::{SanitizeConfig, ShareRequest, SnapshotRequest};
    use crate::provider::DbSnapperProvider;
    use serde_json::json;
    use std::sync::Arc;

    fn tester() -> ProviderTester<DbSnapperProvider> {
        ProviderTester::new(DbSnapperProvider::with_api(
            "test",
            Arc::new(MemorySnapperApi::new()),
        ))
    }

    fn target_request(name: &str, groups: &[&str]) -> TargetRequest {
        TargetRequest {
            name: name.to_string(),
            snapshot: SnapshotRequest {
                src_url: "postgres://src".to_string(),
                dst_url: "postgres://dst".to_string(),
                storage_profile: None,
            },
            sanitize: SanitizeConfig::default(),
            share: ShareRequest {
                sso_groups: groups.iter().map(|g| g.to_string()).collect(),
            },
            ..Default::default()
        }
    }

    #[test]
    fn test_memory_api_create_and_update() {
        let api = MemorySnapperApi::new();

        let created =
            tokio_test::block_on(api.create_target(&target_request("tf_test", &["group1"])))
                .unwrap();
        assert_eq!(created.status, "ready");
        assert_eq!(created.snapshot.src_bytes, MEMORY_SRC_BYTES);
        assert_eq!(
            created.share.as_ref().and_then(|s| s.sso_groups.clone()),
            Some(vec!["group1".to_string()])
        );

        let updated = tokio_test::block_on(
            api.update_target(created.id, &target_request("tf_test_update", &[])),
        )
        .unwrap();
        assert_eq!(updated.id, created.id);
        assert_eq!(updated.name, "tf_test_update");
        assert!(updated.share.is_none());
        assert_eq!(api.target(created.id), Some(updated));
    }

    #[test]
    fn test_memory_api_not_found() {
        let api = MemorySnapperApi::new();
        let id = Uuid::new_v4();

        let err = tokio_test::block_on(api.get_target(id)).unwrap_err();
        assert!(matches!(err, ClientError::NotFound(_)));

        let err = tokio_test::block_on(api.delete_storage_profile(id)).unwrap_err();
        assert!(matches!(err, ClientError::NotFound(p) if p == format!("/storage_profiles/{}", id)));
    }

    #[test]
    fn test_memory_api_unavailable() {
        let api = MemorySnapperApi::new();
        api.set_unavailable(true);

        let err = tokio_test::block_on(api.list_targets()).unwrap_err();
        assert!(matches!(err, ClientError::Api { status: 503, .. }));

        api.set_unavailable(false);
        assert!(tokio_test::block_on(api.list_targets()).unwrap().is_empty());
    }

    #[test]
    fn test_tester_schema() {
        let tester = tester();
        assert!(tester.schema().resources.contains_key("dbsnapper_target"));
        assert_eq!(tester.data_source_types(), vec!["dbsnapper_targets"]);
        assert!(tester
            .resource_types()
            .contains(&"dbsnapper_storage_profile".to_string()));
    }

    #[tokio::test]
    async fn test_tester_plan_update_no_changes() {
        let tester = tester();
        let config = json!({
            "name": "tf_test",
            "snapshot": {"src_url": "postgres://src"},
            "sanitize": {"dst_url": "postgres://sanitize", "query": "select 1"}
        });
        let state = tester
            .lifecycle_create("dbsnapper_target", config.clone())
            .await
            .unwrap();

        let plan = tester
            .plan_update("dbsnapper_target", state, config)
            .await
            .unwrap();
        assert_plan_no_changes(&plan);
        assert_plan_updates_in_place(&plan);
    }

    #[tokio::test]
    async fn test_tester_lifecycle_crud() {
        let tester = tester();
        let config = json!({
            "name": "tf_test_storage_profile",
            "sp_provider": "s3",
            "access_key": "AKIAxxxxxxxxxxxx",
            "secret_key": "xxxxxxxxxxxxxxxxxxxx",
            "bucket": "tf-test-bucket"
        });
        let mut updated_config = config.clone();
        updated_config["name"] = json!("tf_test_storage_profile_update");
        updated_config["bucket"] = json!("tf-test-bucket-updated");

        let final_state = tester
            .lifecycle_crud("dbsnapper_storage_profile", config, updated_config)
            .await
            .unwrap();

        assert_eq!(final_state["name"], "tf_test_storage_profile_update");
        assert_eq!(final_state["bucket"], "tf-test-bucket-updated");

        let err = tester
            .read("dbsnapper_storage_profile", final_state)
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_assert_no_errors() {
        let diagnostics = vec![Diagnostic::warning("Just a warning")];
        assert_no_errors(&diagnostics);
    }

    #[test]
    #[should_panic(expected = "Expected no errors")]
    fn test_assert_no_errors_fails() {
        let diagnostics = vec![Diagnostic::error("An error")];
        assert_no_errors(&diagnostics);
    }

    #[test]
    fn test_assert_has_errors() {
        let diagnostics = vec![Diagnostic::error("Missing DBSnapper API AuthToken")];
        assert_has_errors(&diagnostics);
        assert_error_contains(&diagnostics, "AuthToken");
    }

    #[test]
    fn test_test_error_display() {
        let err = TestError::Diagnostics(vec![
            Diagnostic::error("First error").with_attribute("field1"),
            Diagnostic::error("Second error").with_detail("More info"),
        ]);

        let display = format!("{}", err);
        assert!(display.contains("First error"));
        assert!(display.contains("Second error"));
        assert!(display.contains("field1"));
        assert!(display.contains("More info"));
    }
}
