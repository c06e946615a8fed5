//! Request validation and normalization.
//!
//! Turns caller input into the encoding the drug database expects:
//! - 1-based pagination (values below 1 are rejected)
//! - the inverted `otcOnly` flag
//! - level-5 ATC codes shortened to level 4
//! - registration numbers in the `DDD DD DDDDD DD` format
//! - normalized free-text search terms
//!
//! Validation is all-or-nothing and has no side effects: either a complete
//! [`ValidatedRequest`] comes back or an `InvalidInput`-family error does.

pub mod rules;
mod text;

pub use rules::ValidationWarning;
pub use text::{normalize_query, MAX_QUERY_CHARS, MAX_RAW_QUERY_CHARS};

use serde_json::{json, Map, Value};

use crate::errors::{classify, ClassifiedError, Failure, FailureContext, Violation};
use crate::models::{AdvancedSearch, Endpoint, NameSearch, OperationRequest, SymptomSearch};

/// A request body that satisfies the API's format constraints.
///
/// Built fresh for every call; never cached or shared.
#[derive(Clone, Debug, PartialEq)]
pub struct ValidatedRequest {
    endpoint: Endpoint,
    body: Value,
    warnings: Vec<ValidationWarning>,
}

impl ValidatedRequest {
    pub fn endpoint(&self) -> Endpoint {
        self.endpoint
    }

    pub fn body(&self) -> &Value {
        &self.body
    }

    /// Non-fatal notes, e.g. an ATC code that was shortened.
    pub fn warnings(&self) -> &[ValidationWarning] {
        &self.warnings
    }

    pub fn into_body(self) -> Value {
        self.body
    }
}

/// Validate and normalize the input for one operation.
pub fn validate(request: &OperationRequest) -> Result<ValidatedRequest, ClassifiedError> {
    let endpoint = request.endpoint();
    build(request).map_err(|violation| {
        classify(
            Failure::Validation(violation),
            FailureContext::endpoint(endpoint.path()),
        )
    })
}

fn build(request: &OperationRequest) -> Result<ValidatedRequest, Violation> {
    let endpoint = request.endpoint();
    let mut warnings = Vec::new();

    let body = match request {
        OperationRequest::Autocomplete { query } => {
            let query = rules::query("query", query, rules::MIN_AUTOCOMPLETE_CHARS)?;
            json!({ "query": query })
        }
        OperationRequest::SearchByName(search) => name_search_body(search)?,
        OperationRequest::SearchBySymptom(search) => symptom_search_body(search)?,
        OperationRequest::AdvancedSearch(search) => advanced_search_body(search, &mut warnings)?,
        OperationRequest::DrugDetail {
            registration_number,
        } => {
            let registration_number = rules::registration_number(registration_number)?;
            json!({ "registrationNumber": registration_number })
        }
        OperationRequest::PopularSymptoms { rows } => {
            let rows = rules::rows(*rows)?;
            json!({ "rows": rows })
        }
        OperationRequest::SymptomHierarchy
        | OperationRequest::AtcGroups
        | OperationRequest::Packages
        | OperationRequest::AdministrationRoutes => Value::Object(Map::new()),
    };

    Ok(ValidatedRequest {
        endpoint,
        body,
        warnings,
    })
}

fn name_search_body(search: &NameSearch) -> Result<Value, Violation> {
    let name = rules::query("query", &search.query, 1)?;
    let page = rules::page(search.page)?;
    let page_size = rules::page_size(search.page_size)?;

    Ok(json!({
        "name": name,
        "page": page,
        "pageSize": page_size,
        "otcOnly": search.prescription.otc_only_flag(),
    }))
}

fn symptom_search_body(search: &SymptomSearch) -> Result<Value, Violation> {
    rules::required_all(&[
        ("primary_category", search.primary_category.as_str()),
        ("secondary_category", search.secondary_category.as_str()),
    ])?;
    let primary = rules::code_value("primary_category", &search.primary_category)?;
    let secondary = rules::code_value("secondary_category", &search.secondary_category)?;
    let page = rules::page(search.page)?;
    let page_size = rules::page_size(search.page_size)?;

    Ok(json!({
        "primarySymptomId": primary,
        "secondarySymptomId": secondary,
        "page": page,
        "pageSize": page_size,
        "otcOnly": search.prescription.otc_only_flag(),
    }))
}

fn advanced_search_body(
    search: &AdvancedSearch,
    warnings: &mut Vec<ValidationWarning>,
) -> Result<Value, Violation> {
    let atc_code = match rules::optional_criterion(search.atc_code.as_deref()) {
        Some(raw) => {
            let (code, warning) = rules::atc_code(&raw)?;
            warnings.extend(warning);
            Some(code)
        }
        None => None,
    };
    let route = rules::optional_code("route", search.route.as_deref())?;
    let package = rules::optional_code("package", search.package.as_deref())?;
    let page = rules::page(search.page)?;
    let page_size = rules::page_size(search.page_size)?;

    // Cross-field check runs last, once every field is individually valid
    if atc_code.is_none() && route.is_none() && package.is_none() {
        return Err(Violation::input(
            &["atc_code", "route", "package"],
            "At least one search criterion is required",
            "Provide an ATC code, an administration route or a package type.",
        ));
    }

    let mut body = Map::new();
    if let Some(code) = atc_code {
        body.insert("atcCode".into(), Value::String(code));
    }
    if let Some(route) = route {
        body.insert("routeCode".into(), Value::String(route));
    }
    if let Some(package) = package {
        body.insert("packageCode".into(), Value::String(package));
    }
    body.insert("page".into(), json!(page));
    body.insert("pageSize".into(), json!(page_size));
    body.insert(
        "otcOnly".into(),
        Value::Bool(search.prescription.otc_only_flag()),
    );

    Ok(Value::Object(body))
}
