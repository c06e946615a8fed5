//! Drug database client for the read-only drug registry API.
//!
//! One method per remote operation. Each method validates its input, runs the
//! retry loop around the executor, and decodes the typed payload.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use tracing::warn;

use crate::config::GatewayConfig;
use crate::correlation::CorrelationId;
use crate::errors::{classify, ClassifiedError, Failure, FailureContext, Result};
use crate::executor::{RequestDescriptor, RequestExecutor};
use crate::models::{
    AdministrationRoute, AdvancedSearch, AtcGroup, AutocompleteItem, DrugRecord, DrugSummary,
    NameSearch, OperationRequest, PackageType, PopularSymptom, SearchPage, SymptomCategory,
    SymptomSearch,
};
use crate::retry::RetryPolicy;
use crate::transport::{ReqwestTransport, Transport};
use crate::validation::validate;

/// Client for the drug database.
///
/// Build one at startup and share it (`Arc<DrugDatabaseClient>` or a
/// reference); it is read-only after construction and safe to use from
/// concurrent tasks.
pub struct DrugDatabaseClient {
    executor: RequestExecutor,
    retry_policy: RetryPolicy,
    images_base_url: String,
}

impl DrugDatabaseClient {
    /// Create a client that talks HTTP via reqwest.
    pub fn new(config: &GatewayConfig) -> Result<Self> {
        let transport = ReqwestTransport::new().map_err(|e| {
            classify(
                Failure::Other {
                    message: e.to_string(),
                },
                FailureContext::default(),
            )
        })?;
        Ok(Self::with_transport(config, Arc::new(transport)))
    }

    /// Create a client from `DRUG_DB_*` environment variables.
    pub fn from_env() -> Result<Self> {
        Self::new(&GatewayConfig::from_env())
    }

    /// Create a client over a custom transport.
    pub fn with_transport(config: &GatewayConfig, transport: Arc<dyn Transport>) -> Self {
        Self {
            executor: RequestExecutor::new(transport, &config.base_url, config.request_timeout),
            retry_policy: config.retry,
            images_base_url: config.images_base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn retry_policy(&self) -> &RetryPolicy {
        &self.retry_policy
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Search
    // ─────────────────────────────────────────────────────────────────────────

    /// Suggest products for a partial name (at least two characters).
    ///
    /// POST /autocomplete
    pub async fn autocomplete(&self, partial_name: &str) -> Result<Vec<AutocompleteItem>> {
        self.call(OperationRequest::Autocomplete {
            query: partial_name.to_string(),
        })
        .await
    }

    /// POST /search/name
    pub async fn search_by_name(&self, search: NameSearch) -> Result<SearchPage<DrugSummary>> {
        self.call(OperationRequest::SearchByName(search)).await
    }

    /// POST /search/symptom
    pub async fn search_by_symptom(
        &self,
        search: SymptomSearch,
    ) -> Result<SearchPage<DrugSummary>> {
        self.call(OperationRequest::SearchBySymptom(search)).await
    }

    /// Search by ATC code, administration route and/or package type.
    ///
    /// POST /search/advanced
    pub async fn advanced_search(
        &self,
        search: AdvancedSearch,
    ) -> Result<SearchPage<DrugSummary>> {
        self.call(OperationRequest::AdvancedSearch(search)).await
    }

    /// Full record for a registration number such as `020 16 20534 00`.
    ///
    /// POST /medicine/detail
    pub async fn get_drug(&self, registration_number: &str) -> Result<DrugRecord> {
        self.call(OperationRequest::DrugDetail {
            registration_number: registration_number.to_string(),
        })
        .await
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Reference lists
    // ─────────────────────────────────────────────────────────────────────────

    /// POST /symptoms/tree
    pub async fn symptom_hierarchy(&self) -> Result<Vec<SymptomCategory>> {
        self.call(OperationRequest::SymptomHierarchy).await
    }

    /// Most searched symptoms, `rows` in 1..=100.
    ///
    /// POST /symptoms/popular
    pub async fn popular_symptoms(&self, rows: i64) -> Result<Vec<PopularSymptom>> {
        self.call(OperationRequest::PopularSymptoms { rows }).await
    }

    /// POST /atc/groups
    pub async fn atc_groups(&self) -> Result<Vec<AtcGroup>> {
        self.call(OperationRequest::AtcGroups).await
    }

    /// POST /packages
    pub async fn package_types(&self) -> Result<Vec<PackageType>> {
        self.call(OperationRequest::Packages).await
    }

    /// POST /routes
    pub async fn administration_routes(&self) -> Result<Vec<AdministrationRoute>> {
        self.call(OperationRequest::AdministrationRoutes).await
    }

    /// Public URL of a product image. No network call.
    pub fn image_url(&self, image_id: &str) -> String {
        format!(
            "{}/{}",
            self.images_base_url,
            image_id.trim().trim_start_matches('/')
        )
    }

    /// Validate, execute with retries, decode.
    async fn call<T: DeserializeOwned>(&self, request: OperationRequest) -> Result<T> {
        let correlation_id = CorrelationId::generate();
        let endpoint = request.endpoint();

        let validated =
            validate(&request).map_err(|e| e.with_correlation_id(correlation_id.clone()))?;

        for warning in validated.warnings() {
            warn!(
                correlation_id = %correlation_id,
                endpoint = endpoint.path(),
                field = warning.field.as_str(),
                "{}",
                warning.message
            );
        }

        let descriptor =
            RequestDescriptor::new(endpoint, validated.into_body(), correlation_id.clone());
        let payload = self
            .retry_policy
            .run(descriptor, |d| self.executor.execute(d))
            .await?;

        serde_json::from_value(payload).map_err(|e| {
            let error: ClassifiedError = classify(
                Failure::UnexpectedShape {
                    message: e.to_string(),
                },
                FailureContext::endpoint(endpoint.path()),
            );
            warn!(
                correlation_id = %correlation_id,
                endpoint = endpoint.path(),
                "unexpected response shape: {}",
                error
            );
            error.with_correlation_id(correlation_id)
        })
    }
}
