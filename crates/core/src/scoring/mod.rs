//! Additive lead-quality scoring over budget, room coverage, timeline urgency,
//! carpet area and property type.

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

pub const MAX_LEAD_SCORE: u8 = 100;
pub const HIGH_CATEGORY_MIN: u8 = 70;
pub const MEDIUM_CATEGORY_MIN: u8 = 40;

const FULL_HOME_ROOMS: [&str; 4] = ["living room", "kitchen", "master bedroom", "bedroom"];
const URGENT_TIMELINE_MARKERS: [&str; 6] =
    ["immediate", "1 month", "asap", "< 3 months", "within 3 months", "1-3 months"];
const MEDIUM_TIMELINE_MARKERS: [&str; 2] = ["3-6", "6 months"];
const PREMIUM_PROPERTY_TYPES: [&str; 4] = ["Villa", "Penthouse", "4BHK", "3BHK"];
const PROPERTY_TYPE_BONUS: u8 = 5;

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ScoringRequest {
    pub budget: Decimal,
    pub rooms: Vec<String>,
    pub timeline: String,
    pub carpet_area: Decimal,
    pub property_type: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LeadCategory {
    High,
    Medium,
    Low,
}

impl LeadCategory {
    pub fn from_score(score: u8) -> Self {
        if score >= HIGH_CATEGORY_MIN {
            Self::High
        } else if score >= MEDIUM_CATEGORY_MIN {
            Self::Medium
        } else {
            Self::Low
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::High => "High",
            Self::Medium => "Medium",
            Self::Low => "Low",
        }
    }
}

impl fmt::Display for LeadCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for LeadCategory {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "high" => Ok(Self::High),
            "medium" => Ok(Self::Medium),
            "low" => Ok(Self::Low),
            other => Err(format!("unsupported lead category `{other}` (expected high|medium|low)")),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoringResult {
    pub lead_score: u8,
    pub lead_category: LeadCategory,
    pub factors: Vec<String>,
}

pub trait LeadScorer: Send + Sync {
    fn score(&self, request: &ScoringRequest) -> ScoringResult;
}

#[derive(Clone, Copy, Debug, Default)]
pub struct RuleBasedLeadScorer;

impl LeadScorer for RuleBasedLeadScorer {
    fn score(&self, request: &ScoringRequest) -> ScoringResult {
        score_lead(request)
    }
}

/// A rule's contribution: points plus the factor line explaining them.
struct Contribution {
    points: u8,
    factor: &'static str,
}

impl Contribution {
    const fn new(points: u8, factor: &'static str) -> Self {
        Self { points, factor }
    }
}

pub fn score_lead(request: &ScoringRequest) -> ScoringResult {
    let mut contributions = vec![
        budget_contribution(request.budget),
        room_contribution(&request.rooms),
        timeline_contribution(&request.timeline),
        area_contribution(request.carpet_area),
    ];
    if PREMIUM_PROPERTY_TYPES.contains(&request.property_type.as_str()) {
        contributions.push(Contribution::new(PROPERTY_TYPE_BONUS, "Premium property type"));
    }

    let total: u32 = contributions.iter().map(|contribution| u32::from(contribution.points)).sum();
    let lead_score = total.min(u32::from(MAX_LEAD_SCORE)) as u8;
    let factors = contributions
        .iter()
        .map(|contribution| format!("{}: +{}", contribution.factor, contribution.points))
        .collect();

    ScoringResult { lead_score, lead_category: LeadCategory::from_score(lead_score), factors }
}

fn budget_contribution(budget: Decimal) -> Contribution {
    if budget > Decimal::from(1_500_000) {
        Contribution::new(35, "High budget (>15L)")
    } else if budget > Decimal::from(800_000) {
        Contribution::new(30, "Good budget (>8L)")
    } else if budget > Decimal::from(400_000) {
        Contribution::new(15, "Moderate budget (>4L)")
    } else {
        Contribution::new(5, "Low budget")
    }
}

fn room_contribution(rooms: &[String]) -> Contribution {
    let lowered: Vec<String> = rooms.iter().map(|room| room.to_lowercase()).collect();
    let full_home = FULL_HOME_ROOMS
        .iter()
        .all(|wanted| lowered.iter().any(|room| room.contains(wanted)));

    if full_home || rooms.len() >= 4 {
        Contribution::new(20, "Full home design")
    } else if rooms.len() >= 2 {
        Contribution::new(10, "Multiple rooms")
    } else {
        Contribution::new(5, "Single room")
    }
}

fn timeline_contribution(timeline: &str) -> Contribution {
    let timeline = timeline.to_lowercase();
    let mentions = |markers: &[&str]| markers.iter().any(|marker| timeline.contains(marker));

    if mentions(&URGENT_TIMELINE_MARKERS) {
        Contribution::new(20, "Urgent timeline (<3 months)")
    } else if mentions(&MEDIUM_TIMELINE_MARKERS) {
        Contribution::new(10, "Medium timeline (3-6 months)")
    } else {
        Contribution::new(5, "Flexible timeline")
    }
}

fn area_contribution(carpet_area: Decimal) -> Contribution {
    if carpet_area > Decimal::from(2000) {
        Contribution::new(20, "Large area (>2000 sqft)")
    } else if carpet_area > Decimal::from(1000) {
        Contribution::new(15, "Good area (>1000 sqft)")
    } else if carpet_area > Decimal::from(500) {
        Contribution::new(10, "Medium area (>500 sqft)")
    } else {
        Contribution::new(5, "Small area")
    }
}
