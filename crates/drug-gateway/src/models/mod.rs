//! Request and response models for the drug database gateway.

mod endpoint;
mod request;
mod response;

pub use endpoint::Endpoint;
pub use request::{AdvancedSearch, NameSearch, OperationRequest, PrescriptionFilter, SymptomSearch};
pub use response::{
    AdministrationRoute, AtcGroup, AutocompleteItem, DrugRecord, DrugSummary, PackageInfo,
    PackageType, PopularSymptom, SearchPage, SymptomCategory,
};
