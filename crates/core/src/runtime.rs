use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::catalog::RateCatalog;
use crate::domain::lead::{
    Lead, LeadId, LeadIntake, DEFAULT_POSSESSION_STATUS, DEFAULT_RECOMMENDATION,
};
use crate::errors::DomainError;
use crate::estimate::rounding::round_currency;
use crate::estimate::{
    CatalogCostEstimator, CostEstimator, EstimateRequest, EstimateResult,
};
use crate::scoring::{LeadScorer, RuleBasedLeadScorer, ScoringRequest, ScoringResult};

/// A lead record together with the engine outputs it was built from.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeadQuote {
    pub lead: Lead,
    pub estimate: EstimateResult,
    pub scoring: ScoringResult,
}

pub type StandardQuotationRuntime = QuotationRuntime<CatalogCostEstimator, RuleBasedLeadScorer>;

pub struct QuotationRuntime<E, S> {
    estimator: E,
    scorer: S,
}

impl<E, S> QuotationRuntime<E, S> {
    pub fn new(estimator: E, scorer: S) -> Self {
        Self { estimator, scorer }
    }
}

impl StandardQuotationRuntime {
    pub fn with_catalog(catalog: Arc<RateCatalog>) -> Self {
        Self::new(CatalogCostEstimator::new(catalog), RuleBasedLeadScorer)
    }
}

impl<E, S> QuotationRuntime<E, S>
where
    E: CostEstimator,
    S: LeadScorer,
{
    pub fn estimate(&self, request: &EstimateRequest) -> Result<EstimateResult, DomainError> {
        self.estimator.estimate(request)
    }

    pub fn score(&self, request: &ScoringRequest) -> ScoringResult {
        self.scorer.score(request)
    }

    pub fn quote_lead(&self, intake: &LeadIntake) -> Result<LeadQuote, DomainError> {
        self.quote_lead_at(intake, LeadId::generate(), Utc::now())
    }

    /// Builds the lead with a caller-supplied id and timestamp.
    pub fn quote_lead_at(
        &self,
        intake: &LeadIntake,
        id: LeadId,
        created_at: DateTime<Utc>,
    ) -> Result<LeadQuote, DomainError> {
        intake.validate_contact()?;

        let estimate = self.estimator.estimate(&intake.estimate_request())?;
        let scoring = self.scorer.score(&intake.scoring_request());
        let cost_per_sq_ft = round_currency(estimate.estimated_cost / intake.carpet_area);

        let possession_status = if intake.possession_status.trim().is_empty() {
            DEFAULT_POSSESSION_STATUS.to_string()
        } else {
            intake.possession_status.clone()
        };
        let ai_recommendation = intake
            .ai_recommendation
            .clone()
            .filter(|text| !text.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_RECOMMENDATION.to_string());

        let lead = Lead {
            id,
            name: intake.name.clone(),
            phone: intake.phone.clone(),
            email: intake.email.clone(),
            property_type: intake.property_type.clone(),
            carpet_area: intake.carpet_area,
            city: intake.city.clone(),
            budget: intake.budget,
            timeline: intake.timeline.clone(),
            rooms: intake.rooms.clone(),
            style: intake.style.clone(),
            possession_status,
            package_type: estimate.package_type,
            cost_per_sq_ft,
            estimated_cost: estimate.estimated_cost,
            cost_breakdown: estimate.cost_breakdown.clone(),
            lead_score: scoring.lead_score,
            lead_category: scoring.lead_category,
            ai_recommendation,
            created_at,
        };

        Ok(LeadQuote { lead, estimate, scoring })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::{TimeZone, Utc};
    use rust_decimal::Decimal;

    use super::{QuotationRuntime, StandardQuotationRuntime};
    use crate::catalog::RateCatalog;
    use crate::domain::lead::{LeadId, LeadIntake, DEFAULT_POSSESSION_STATUS};
    use crate::errors::DomainError;
    use crate::estimate::{CostEstimator, EstimateRequest, EstimateResult, PackageTier};
    use crate::scoring::{LeadCategory, LeadScorer, ScoringRequest, ScoringResult};

    fn runtime() -> StandardQuotationRuntime {
        StandardQuotationRuntime::with_catalog(Arc::new(
            RateCatalog::standard().expect("standard catalog"),
        ))
    }

    fn kitchen_intake() -> LeadIntake {
        LeadIntake {
            name: "Meera Iyer".to_string(),
            phone: "9845012345".to_string(),
            email: "meera@example.com".to_string(),
            property_type: "3BHK".to_string(),
            carpet_area: Decimal::from(1300),
            city: "Bengaluru".to_string(),
            budget: Decimal::from(700_000),
            timeline: "1-3 months".to_string(),
            rooms: vec!["Kitchen".to_string()],
            ..LeadIntake::default()
        }
    }

    #[test]
    fn quote_lead_combines_estimate_and_score() {
        let created_at = Utc.with_ymd_and_hms(2026, 3, 14, 9, 30, 0).single().expect("timestamp");
        let quote = runtime()
            .quote_lead_at(&kitchen_intake(), LeadId("lead-1".to_string()), created_at)
            .expect("lead quote");

        assert_eq!(quote.lead.id, LeadId("lead-1".to_string()));
        assert_eq!(quote.lead.created_at, created_at);
        assert_eq!(quote.lead.estimated_cost, Decimal::from(643_465));
        // 643465 / 1300 = 494.97
        assert_eq!(quote.lead.cost_per_sq_ft, Decimal::from(495));
        assert_eq!(quote.lead.package_type, PackageTier::Essential);
        assert_eq!(quote.lead.cost_breakdown, quote.estimate.cost_breakdown);
        // 15 budget + 5 rooms + 20 timeline + 15 area + 5 property
        assert_eq!(quote.lead.lead_score, 60);
        assert_eq!(quote.lead.lead_category, LeadCategory::Medium);
        assert_eq!(quote.lead.possession_status, DEFAULT_POSSESSION_STATUS);
        assert!(!quote.lead.ai_recommendation.is_empty());
    }

    #[test]
    fn quote_lead_keeps_supplied_recommendation() {
        let mut intake = kitchen_intake();
        intake.ai_recommendation = Some("Go with warm oak laminates.".to_string());
        intake.possession_status = "Under construction".to_string();

        let quote = runtime().quote_lead(&intake).expect("lead quote");

        assert_eq!(quote.lead.ai_recommendation, "Go with warm oak laminates.");
        assert_eq!(quote.lead.possession_status, "Under construction");
    }

    #[test]
    fn lead_amounts_serialize_as_json_numbers() {
        let quote = runtime().quote_lead(&kitchen_intake()).expect("lead quote");
        let json = serde_json::to_value(&quote.lead).expect("serialize lead");

        assert_eq!(json["estimatedCost"].as_f64(), Some(643_465.0));
        assert_eq!(json["costPerSqFt"].as_f64(), Some(495.0));
        assert_eq!(json["carpetArea"].as_f64(), Some(1300.0));
        assert_eq!(json["budget"].as_f64(), Some(700_000.0));
        assert!(json["costBreakdown"]["Kitchen"].is_number());
    }

    #[test]
    fn quote_lead_rejects_missing_contact_before_estimating() {
        let mut intake = kitchen_intake();
        intake.phone.clear();
        intake.carpet_area = Decimal::ZERO;

        let error = runtime().quote_lead(&intake).expect_err("missing phone");
        assert_eq!(
            error,
            DomainError::InvalidArgument("name, phone, and email are required".to_string())
        );
    }

    #[test]
    fn quote_lead_propagates_estimate_errors() {
        let mut intake = kitchen_intake();
        intake.budget = Decimal::ZERO;

        let error = runtime().quote_lead(&intake).expect_err("missing budget");
        assert!(matches!(error, DomainError::InvalidArgument(_)));
    }

    #[test]
    fn runtime_supports_explicit_engine_interfaces() {
        struct FailingEstimator;

        impl CostEstimator for FailingEstimator {
            fn estimate(&self, _request: &EstimateRequest) -> Result<EstimateResult, DomainError> {
                Err(DomainError::InvariantViolation("estimator offline".to_string()))
            }
        }

        struct FixedScorer;

        impl LeadScorer for FixedScorer {
            fn score(&self, _request: &ScoringRequest) -> ScoringResult {
                ScoringResult {
                    lead_score: 88,
                    lead_category: LeadCategory::High,
                    factors: vec!["Fixed: +88".to_string()],
                }
            }
        }

        let runtime = QuotationRuntime::new(FailingEstimator, FixedScorer);

        assert_eq!(runtime.score(&ScoringRequest::default()).lead_score, 88);
        assert!(matches!(
            runtime.quote_lead(&kitchen_intake()),
            Err(DomainError::InvariantViolation(_))
        ));
    }
}
