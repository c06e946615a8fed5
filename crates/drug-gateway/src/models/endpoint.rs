use std::fmt;

/// One operation exposed by the drug database API.
///
/// Every operation is an HTTP POST to `base_url + path()`.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum Endpoint {
    Autocomplete,
    SearchByName,
    SearchBySymptom,
    AdvancedSearch,
    DrugDetail,
    SymptomHierarchy,
    PopularSymptoms,
    AtcGroups,
    Packages,
    AdministrationRoutes,
}

impl Endpoint {
    pub fn path(&self) -> &'static str {
        match self {
            Self::Autocomplete => "/autocomplete",
            Self::SearchByName => "/search/name",
            Self::SearchBySymptom => "/search/symptom",
            Self::AdvancedSearch => "/search/advanced",
            Self::DrugDetail => "/medicine/detail",
            Self::SymptomHierarchy => "/symptoms/tree",
            Self::PopularSymptoms => "/symptoms/popular",
            Self::AtcGroups => "/atc/groups",
            Self::Packages => "/packages",
            Self::AdministrationRoutes => "/routes",
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}
