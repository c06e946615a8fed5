//! Typed payloads returned by the drug database.
//!
//! Deserialization is lenient: optional attributes default when absent. Only
//! the identifying fields are required, so a payload missing them is reported
//! as an invalid response shape.

use serde::{Deserialize, Serialize};

/// One autocomplete suggestion.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AutocompleteItem {
    pub registration_number: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strength: Option<String>,
}

/// Short product entry in a search result page.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DrugSummary {
    pub registration_number: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strength: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub form: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub holder: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub atc_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prescription_required: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_id: Option<String>,
}

/// One page of search results.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchPage<T> {
    #[serde(default = "Vec::new")]
    pub items: Vec<T>,
    /// Total number of matches across all pages.
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub page: u32,
    #[serde(default)]
    pub page_size: u32,
}

impl<T> SearchPage<T> {
    /// Whether more pages follow this one.
    pub fn has_more(&self) -> bool {
        (self.page as u64) * (self.page_size as u64) < self.total
    }
}

/// Package presentation of a product.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PackageInfo {
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub description: String,
}

/// Full product record.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DrugRecord {
    pub registration_number: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strength: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub form: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub holder: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub atc_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub route: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prescription_required: Option<bool>,
    #[serde(default)]
    pub active_substances: Vec<String>,
    #[serde(default)]
    pub packages: Vec<PackageInfo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub indications: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub leaflet_url: Option<String>,
    #[serde(default)]
    pub image_ids: Vec<String>,
}

/// Node of the symptom hierarchy. Top-level nodes are primary categories,
/// their children the secondary ones.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SymptomCategory {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub children: Vec<SymptomCategory>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PopularSymptom {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub search_count: u64,
}

/// Level-4 ATC group.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AtcGroup {
    pub code: String,
    pub name: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PackageType {
    pub code: String,
    pub name: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdministrationRoute {
    pub code: String,
    pub name: String,
}
