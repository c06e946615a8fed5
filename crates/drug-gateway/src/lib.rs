//! Drug Database Gateway
//!
//! Resilient client for a read-only drug registry API. Query handlers build
//! their summaries and documents on top of this crate; everything that talks
//! to the network goes through it.
//!
//! # Overview
//!
//! The gateway provides:
//! - Input validation and normalization for every remote operation
//! - A closed error taxonomy with severity, suggestions and retryability
//! - Per-attempt timeouts with cancellation
//! - Linear-backoff retries for transient failures
//! - Correlation ids shared by all attempts of one logical request
//!
//! # Architecture
//!
//! ```text
//! +--------------------+
//! | DrugDatabaseClient |  (one method per operation)
//! +--------------------+
//!          |
//!          v
//! +------------------+     +------------------+
//! |    validation    | --> | ClassifiedError  |  (InvalidInput family, no network)
//! +------------------+     +------------------+
//!          |                        ^
//!          v                        |
//! +------------------+              |
//! |   RetryPolicy    |  (loop: attempt, delay, attempt ...)
//! +------------------+              |
//!          |                        |
//!          v                        |
//! +------------------+     +------------------+
//! | RequestExecutor  | --> |    classify()    |
//! +------------------+     +------------------+
//!          |
//!          v
//! +------------------+
//! |    Transport     |  (reqwest in production)
//! +------------------+
//! ```
//!
//! # Example
//!
//! ```no_run
//! use drug_gateway::{DrugDatabaseClient, GatewayConfig, NameSearch, PrescriptionFilter};
//!
//! # async fn run() -> drug_gateway::errors::Result<()> {
//! let client = DrugDatabaseClient::new(&GatewayConfig::from_env())?;
//! let page = client
//!     .search_by_name(NameSearch::new("paralen").with_prescription(PrescriptionFilter::OtcOnly))
//!     .await?;
//! for item in page.items {
//!     println!("{} ({})", item.name, item.registration_number);
//! }
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod correlation;
pub mod errors;
pub mod executor;
pub mod models;
pub mod retry;
pub mod transport;
pub mod validation;

pub use client::DrugDatabaseClient;
pub use config::GatewayConfig;
pub use correlation::CorrelationId;
pub use errors::{ClassifiedError, ErrorKind, RetryClass, Severity};
pub use executor::{RequestDescriptor, RequestExecutor};
pub use models::{
    AdministrationRoute, AdvancedSearch, AtcGroup, AutocompleteItem, DrugRecord, DrugSummary,
    Endpoint, NameSearch, OperationRequest, PackageInfo, PackageType, PopularSymptom,
    PrescriptionFilter, SearchPage, SymptomCategory, SymptomSearch,
};
pub use retry::{RetryDecision, RetryPolicy};
pub use transport::{RawResponse, ReqwestTransport, Transport, TransportError};
pub use validation::{normalize_query, validate, ValidatedRequest, ValidationWarning};
