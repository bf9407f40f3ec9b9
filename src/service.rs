//! The orchestrator-facing provider trait.
//!
//! The orchestrator drives every lifecycle call through [`ProviderService`]
//! with JSON state documents. Resource and data source calls are addressed by
//! type name, e.g. `dbsnapper_target`.

use crate::error::ProviderError;
use crate::schema::{Diagnostic, ProviderSchema};
use crate::types::{ImportedResource, PlanResult, ProviderMetadata, PROVIDER_TYPE_NAME};

/// Trait that provider implementations must implement.
///
/// # Example
///
/// ```
/// use dbsnapper_provider::{PlanResult, ProviderError, ProviderSchema, ProviderService};
/// use dbsnapper_provider::schema::{Attribute, Diagnostic, Schema};
///
/// struct EchoProvider;
///
/// #[dbsnapper_provider::async_trait]
/// impl ProviderService for EchoProvider {
///     fn schema(&self) -> ProviderSchema {
///         ProviderSchema::new().with_resource(
///             "dbsnapper_echo",
///             Schema::v0().with_attribute("name", Attribute::required_string()),
///         )
///     }
///
///     async fn configure(&self, _config: serde_json::Value) -> Result<Vec<Diagnostic>, ProviderError> {
///         Ok(vec![])
///     }
///
///     async fn plan(
///         &self,
///         _resource_type: &str,
///         _prior_state: Option<serde_json::Value>,
///         proposed_state: serde_json::Value,
///         _config: serde_json::Value,
///     ) -> Result<PlanResult, ProviderError> {
///         Ok(PlanResult::no_change(proposed_state))
///     }
///
///     async fn create(&self, _resource_type: &str, planned_state: serde_json::Value) -> Result<serde_json::Value, ProviderError> {
///         Ok(planned_state)
///     }
///
///     async fn read(&self, _resource_type: &str, current_state: serde_json::Value) -> Result<serde_json::Value, ProviderError> {
///         Ok(current_state)
///     }
///
///     async fn update(&self, _resource_type: &str, _prior_state: serde_json::Value, planned_state: serde_json::Value) -> Result<serde_json::Value, ProviderError> {
///         Ok(planned_state)
///     }
///
///     async fn delete(&self, _resource_type: &str, _current_state: serde_json::Value) -> Result<(), ProviderError> {
///         Ok(())
///     }
/// }
/// ```
#[async_trait::async_trait]
pub trait ProviderService: Send + Sync + 'static {
    // =========================================================================
    // Schema & Metadata
    // =========================================================================

    /// Return the provider's schema including all resources and data sources.
    fn schema(&self) -> ProviderSchema;

    /// Return provider metadata. By default, this is derived from the schema.
    fn metadata(&self) -> ProviderMetadata {
        let schema = self.schema();
        let mut resources: Vec<String> = schema.resources.keys().cloned().collect();
        let mut data_sources: Vec<String> = schema.data_sources.keys().cloned().collect();
        resources.sort();
        data_sources.sort();

        ProviderMetadata {
            type_name: PROVIDER_TYPE_NAME.to_string(),
            version: String::new(),
            resources,
            data_sources,
        }
    }

    // =========================================================================
    // Provider Lifecycle
    // =========================================================================

    /// Validate the provider configuration before configuring.
    async fn validate_provider_config(
        &self,
        config: serde_json::Value,
    ) -> Result<Vec<Diagnostic>, ProviderError> {
        let _ = config;
        Ok(vec![])
    }

    /// Configure the provider with credentials and settings.
    /// Returns diagnostics (errors and warnings).
    async fn configure(&self, config: serde_json::Value) -> Result<Vec<Diagnostic>, ProviderError>;

    // =========================================================================
    // Resource Operations
    // =========================================================================

    /// Validate a resource's configuration before planning.
    async fn validate_resource_config(
        &self,
        resource_type: &str,
        config: serde_json::Value,
    ) -> Result<Vec<Diagnostic>, ProviderError> {
        let _ = (resource_type, config);
        Ok(vec![])
    }

    /// Plan changes for a resource.
    async fn plan(
        &self,
        resource_type: &str,
        prior_state: Option<serde_json::Value>,
        proposed_state: serde_json::Value,
        config: serde_json::Value,
    ) -> Result<PlanResult, ProviderError>;

    /// Create a new resource.
    async fn create(
        &self,
        resource_type: &str,
        planned_state: serde_json::Value,
    ) -> Result<serde_json::Value, ProviderError>;

    /// Read the current state of a resource.
    async fn read(
        &self,
        resource_type: &str,
        current_state: serde_json::Value,
    ) -> Result<serde_json::Value, ProviderError>;

    /// Update an existing resource.
    async fn update(
        &self,
        resource_type: &str,
        prior_state: serde_json::Value,
        planned_state: serde_json::Value,
    ) -> Result<serde_json::Value, ProviderError>;

    /// Delete a resource.
    async fn delete(
        &self,
        resource_type: &str,
        current_state: serde_json::Value,
    ) -> Result<(), ProviderError>;

    /// Bring an existing remote entity under management by identifier.
    async fn import_resource(
        &self,
        resource_type: &str,
        _id: &str,
    ) -> Result<Vec<ImportedResource>, ProviderError> {
        Err(ProviderError::Unimplemented(format!(
            "Import not supported for resource type: {}",
            resource_type
        )))
    }

    // =========================================================================
    // Data Source Operations
    // =========================================================================

    /// Validate a data source's configuration.
    async fn validate_data_source_config(
        &self,
        data_source_type: &str,
        config: serde_json::Value,
    ) -> Result<Vec<Diagnostic>, ProviderError> {
        let _ = (data_source_type, config);
        Ok(vec![])
    }

    /// Read data from the remote service.
    async fn read_data_source(
        &self,
        data_source_type: &str,
        _config: serde_json::Value,
    ) -> Result<serde_json::Value, ProviderError> {
        Err(ProviderError::UnknownResource(data_source_type.to_string()))
    }
}
