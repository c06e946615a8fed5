//! Caller-facing request parameters.
//!
//! These hold input exactly as the caller supplied it. Nothing here is
//! guaranteed valid; [`crate::validation::validate`] turns them into a
//! wire-ready [`ValidatedRequest`](crate::validation::ValidatedRequest).

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::Endpoint;
use crate::errors::Violation;

/// Prescription access filter.
///
/// The API takes a single `otcOnly` boolean: `true` restricts results to
/// non-prescription products, `false` returns everything. Both
/// `HasPrescription` and `Either` therefore map to `false`.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PrescriptionFilter {
    HasPrescription,
    OtcOnly,
    #[default]
    Either,
}

impl PrescriptionFilter {
    /// Value of the wire `otcOnly` flag.
    pub fn otc_only_flag(self) -> bool {
        matches!(self, Self::OtcOnly)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::HasPrescription => "has_prescription",
            Self::OtcOnly => "otc_only",
            Self::Either => "either",
        }
    }
}

impl FromStr for PrescriptionFilter {
    type Err = Violation;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        [Self::HasPrescription, Self::OtcOnly, Self::Either]
            .into_iter()
            .find(|filter| filter.as_str() == wanted)
            .ok_or_else(|| {
                Violation::input(
                    &["prescription"],
                    format!("Unknown prescription filter '{}'", wanted),
                    "Use one of: has_prescription, otc_only, either.",
                )
            })
    }
}

/// Search by (partial) product name.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NameSearch {
    pub query: String,
    /// 1-based page index.
    pub page: i64,
    pub page_size: Option<i64>,
    #[serde(default)]
    pub prescription: PrescriptionFilter,
}

impl NameSearch {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            page: 1,
            page_size: None,
            prescription: PrescriptionFilter::default(),
        }
    }

    pub fn with_page(mut self, page: i64) -> Self {
        self.page = page;
        self
    }

    pub fn with_page_size(mut self, page_size: i64) -> Self {
        self.page_size = Some(page_size);
        self
    }

    pub fn with_prescription(mut self, prescription: PrescriptionFilter) -> Self {
        self.prescription = prescription;
        self
    }
}

/// Search by symptom. Both the primary and the secondary category are required.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymptomSearch {
    pub primary_category: String,
    pub secondary_category: String,
    pub page: i64,
    pub page_size: Option<i64>,
    #[serde(default)]
    pub prescription: PrescriptionFilter,
}

impl SymptomSearch {
    pub fn new(primary_category: impl Into<String>, secondary_category: impl Into<String>) -> Self {
        Self {
            primary_category: primary_category.into(),
            secondary_category: secondary_category.into(),
            page: 1,
            page_size: None,
            prescription: PrescriptionFilter::default(),
        }
    }

    pub fn with_page(mut self, page: i64) -> Self {
        self.page = page;
        self
    }

    pub fn with_page_size(mut self, page_size: i64) -> Self {
        self.page_size = Some(page_size);
        self
    }

    pub fn with_prescription(mut self, prescription: PrescriptionFilter) -> Self {
        self.prescription = prescription;
        self
    }
}

/// Search by ATC code, administration route and/or package type.
///
/// At least one of the three criteria must be given.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdvancedSearch {
    pub atc_code: Option<String>,
    pub route: Option<String>,
    pub package: Option<String>,
    pub page: i64,
    pub page_size: Option<i64>,
    #[serde(default)]
    pub prescription: PrescriptionFilter,
}

impl AdvancedSearch {
    pub fn new() -> Self {
        Self {
            page: 1,
            ..Self::default()
        }
    }

    pub fn with_atc_code(mut self, code: impl Into<String>) -> Self {
        self.atc_code = Some(code.into());
        self
    }

    pub fn with_route(mut self, route: impl Into<String>) -> Self {
        self.route = Some(route.into());
        self
    }

    pub fn with_package(mut self, package: impl Into<String>) -> Self {
        self.package = Some(package.into());
        self
    }

    pub fn with_page(mut self, page: i64) -> Self {
        self.page = page;
        self
    }

    pub fn with_page_size(mut self, page_size: i64) -> Self {
        self.page_size = Some(page_size);
        self
    }

    pub fn with_prescription(mut self, prescription: PrescriptionFilter) -> Self {
        self.prescription = prescription;
        self
    }
}

/// Raw input for any gateway operation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum OperationRequest {
    Autocomplete { query: String },
    SearchByName(NameSearch),
    SearchBySymptom(SymptomSearch),
    AdvancedSearch(AdvancedSearch),
    DrugDetail { registration_number: String },
    SymptomHierarchy,
    PopularSymptoms { rows: i64 },
    AtcGroups,
    Packages,
    AdministrationRoutes,
}

impl OperationRequest {
    pub fn endpoint(&self) -> Endpoint {
        match self {
            Self::Autocomplete { .. } => Endpoint::Autocomplete,
            Self::SearchByName(_) => Endpoint::SearchByName,
            Self::SearchBySymptom(_) => Endpoint::SearchBySymptom,
            Self::AdvancedSearch(_) => Endpoint::AdvancedSearch,
            Self::DrugDetail { .. } => Endpoint::DrugDetail,
            Self::SymptomHierarchy => Endpoint::SymptomHierarchy,
            Self::PopularSymptoms { .. } => Endpoint::PopularSymptoms,
            Self::AtcGroups => Endpoint::AtcGroups,
            Self::Packages => Endpoint::Packages,
            Self::AdministrationRoutes => Endpoint::AdministrationRoutes,
        }
    }
}
