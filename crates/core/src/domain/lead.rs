use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::DomainError;
use crate::estimate::model::money_breakdown;
use crate::estimate::{EstimateRequest, OrderedBreakdown, PackageTier};
use crate::scoring::{LeadCategory, ScoringRequest};

pub const DEFAULT_POSSESSION_STATUS: &str = "Ready to move";
pub const DEFAULT_RECOMMENDATION: &str =
    "Our design team will provide personalized suggestions shortly.";

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LeadId(pub String);

impl LeadId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }
}

/// Everything a prospect submits when asking for a quotation.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LeadIntake {
    pub name: String,
    pub phone: String,
    pub email: String,
    pub property_type: String,
    pub carpet_area: Decimal,
    pub city: String,
    pub budget: Decimal,
    pub timeline: String,
    pub rooms: Vec<String>,
    pub style: String,
    pub possession_status: String,
    pub ai_recommendation: Option<String>,
}

impl LeadIntake {
    pub fn validate_contact(&self) -> Result<(), DomainError> {
        let missing = [&self.name, &self.phone, &self.email]
            .iter()
            .any(|value| value.trim().is_empty());
        if missing {
            return Err(DomainError::InvalidArgument(
                "name, phone, and email are required".to_string(),
            ));
        }
        Ok(())
    }

    pub fn estimate_request(&self) -> EstimateRequest {
        EstimateRequest {
            carpet_area: self.carpet_area,
            budget: self.budget,
            rooms: self.rooms.clone(),
        }
    }

    pub fn scoring_request(&self) -> ScoringRequest {
        ScoringRequest {
            budget: self.budget,
            rooms: self.rooms.clone(),
            timeline: self.timeline.clone(),
            carpet_area: self.carpet_area,
            property_type: self.property_type.clone(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Lead {
    pub id: LeadId,
    pub name: String,
    pub phone: String,
    pub email: String,
    pub property_type: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub carpet_area: Decimal,
    pub city: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub budget: Decimal,
    pub timeline: String,
    pub rooms: Vec<String>,
    pub style: String,
    pub possession_status: String,
    pub package_type: PackageTier,
    #[serde(with = "rust_decimal::serde::float")]
    pub cost_per_sq_ft: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub estimated_cost: Decimal,
    #[serde(with = "money_breakdown")]
    pub cost_breakdown: OrderedBreakdown<Decimal>,
    pub lead_score: u8,
    pub lead_category: LeadCategory,
    pub ai_recommendation: String,
    pub created_at: DateTime<Utc>,
}
