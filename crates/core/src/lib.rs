pub mod catalog;
pub mod config;
pub mod domain;
pub mod errors;
pub mod estimate;
pub mod runtime;
pub mod scoring;

pub use catalog::{CatalogError, LineItem, RateCatalog, RateEntry, RoomTemplate};
pub use domain::lead::{Lead, LeadId, LeadIntake};
pub use errors::{ApplicationError, DomainError, InterfaceError};
pub use estimate::{
    CatalogCostEstimator, CostEstimator, EstimateRequest, EstimateResult, PackageTier,
};
pub use runtime::{LeadQuote, QuotationRuntime, StandardQuotationRuntime};
pub use scoring::{LeadCategory, LeadScorer, RuleBasedLeadScorer, ScoringRequest, ScoringResult};
