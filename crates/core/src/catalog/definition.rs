use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateEntry {
    pub rate: Decimal,
    pub label: String,
}

impl RateEntry {
    pub fn new(rate: Decimal, label: impl Into<String>) -> Self {
        Self { rate, label: label.into() }
    }
}

/// A template line item as declared, before its rate key is resolved.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LineItemSpec {
    Area { name: String, material: String, base_area: Decimal },
    Unit { name: String, fixed: String, quantity: u32 },
}

impl LineItemSpec {
    pub fn area(name: impl Into<String>, material: impl Into<String>, base_area: Decimal) -> Self {
        Self::Area { name: name.into(), material: material.into(), base_area }
    }

    pub fn unit(name: impl Into<String>, fixed: impl Into<String>, quantity: u32) -> Self {
        Self::Unit { name: name.into(), fixed: fixed.into(), quantity }
    }

    pub fn name(&self) -> &str {
        match self {
            Self::Area { name, .. } | Self::Unit { name, .. } => name,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomDefinition {
    pub name: String,
    pub items: Vec<LineItemSpec>,
}

/// Keys of the rates priced outside any room: paint and hardware allowances,
/// electrical work and the one-off site services.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AncillaryKeys {
    pub paint: String,
    pub soft_closing_channel: String,
    pub soft_closing_hinge: String,
    pub full_house_electrical: String,
    pub debris_removal: String,
    pub floor_covering: String,
    pub deep_cleaning: String,
}

impl Default for AncillaryKeys {
    fn default() -> Self {
        Self {
            paint: "paintTractorEmulsion".to_string(),
            soft_closing_channel: "softClosingChannel".to_string(),
            soft_closing_hinge: "softClosingHinge".to_string(),
            full_house_electrical: "fullHouseElectrical".to_string(),
            debris_removal: "debrisRemoval".to_string(),
            floor_covering: "floorCovering".to_string(),
            deep_cleaning: "deepCleaning".to_string(),
        }
    }
}

/// Raw catalog shape, as built in code or read from a TOML file.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogDefinition {
    #[serde(default)]
    pub materials: BTreeMap<String, RateEntry>,
    #[serde(default)]
    pub fixed_items: BTreeMap<String, RateEntry>,
    #[serde(default)]
    pub rooms: Vec<RoomDefinition>,
    #[serde(default)]
    pub ancillary: AncillaryKeys,
}
