//! Rate catalog: material and fixed-item rates plus per-room bills of materials.
//!
//! A catalog is only obtainable through [`RateCatalog::new`], which resolves every
//! rate key up front. Estimation never looks a key up by name, so a catalog that
//! exists is a catalog that prices.

pub mod definition;
pub mod standard;

use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};

use rust_decimal::Decimal;
use serde::Serialize;
use thiserror::Error;

use crate::estimate::{OTHERS_LABEL, SERVICES_LABEL};

pub use definition::{AncillaryKeys, CatalogDefinition, LineItemSpec, RateEntry, RoomDefinition};

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("room `{room}` item `{item}` references unknown material rate `{key}`")]
    UnknownMaterialKey { room: String, item: String, key: String },
    #[error("room `{room}` item `{item}` references unknown fixed-item rate `{key}`")]
    UnknownFixedKey { room: String, item: String, key: String },
    #[error("ancillary `{role}` references unknown rate `{key}`")]
    UnknownAncillaryKey { role: &'static str, key: String },
    #[error("material rate `{0}` is not registered")]
    MaterialRateNotFound(String),
    #[error("fixed-item rate `{0}` is not registered")]
    FixedRateNotFound(String),
    #[error("room `{0}` is declared more than once")]
    DuplicateRoom(String),
    #[error("room `{0}` has no line items")]
    EmptyRoom(String),
    #[error("room `{0}` uses a reserved breakdown label")]
    ReservedRoomName(String),
    #[error("rate `{key}` must be positive, got {rate}")]
    InvalidRate { key: String, rate: Decimal },
    #[error("room `{room}` item `{item}` must have a positive base area")]
    InvalidBaseArea { room: String, item: String },
    #[error("room `{room}` item `{item}` must have a non-zero quantity")]
    ZeroQuantity { room: String, item: String },
    #[error("could not read catalog file `{path}`: {source}")]
    ReadFile { path: PathBuf, source: std::io::Error },
    #[error("could not parse catalog: {0}")]
    Parse(#[from] toml::de::Error),
}

/// A template line item with its rate already resolved.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LineItem {
    Area { name: String, rate: RateEntry, base_area: Decimal },
    Unit { name: String, rate: RateEntry, quantity: u32 },
}

impl LineItem {
    pub fn name(&self) -> &str {
        match self {
            Self::Area { name, .. } | Self::Unit { name, .. } => name,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct RoomTemplate {
    pub name: String,
    pub items: Vec<LineItem>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct AncillaryRates {
    pub paint: RateEntry,
    pub soft_closing_channel: RateEntry,
    pub soft_closing_hinge: RateEntry,
    pub full_house_electrical: RateEntry,
    pub debris_removal: RateEntry,
    pub floor_covering: RateEntry,
    pub deep_cleaning: RateEntry,
}

#[derive(Clone, Debug)]
pub struct RateCatalog {
    materials: BTreeMap<String, RateEntry>,
    fixed_items: BTreeMap<String, RateEntry>,
    rooms: Vec<RoomTemplate>,
    ancillary: AncillaryRates,
}

impl RateCatalog {
    pub fn new(definition: CatalogDefinition) -> Result<Self, CatalogError> {
        let CatalogDefinition { materials, fixed_items, rooms, ancillary } = definition;

        for (key, entry) in materials.iter().chain(fixed_items.iter()) {
            if entry.rate <= Decimal::ZERO {
                return Err(CatalogError::InvalidRate { key: key.clone(), rate: entry.rate });
            }
        }

        let mut seen = HashSet::new();
        let mut templates = Vec::with_capacity(rooms.len());
        for room in rooms {
            if !seen.insert(room.name.clone()) {
                return Err(CatalogError::DuplicateRoom(room.name));
            }
            if room.items.is_empty() {
                return Err(CatalogError::EmptyRoom(room.name));
            }
            if [OTHERS_LABEL, SERVICES_LABEL].contains(&room.name.trim()) {
                return Err(CatalogError::ReservedRoomName(room.name));
            }

            let items = room
                .items
                .into_iter()
                .map(|spec| resolve_line_item(&room.name, spec, &materials, &fixed_items))
                .collect::<Result<Vec<_>, _>>()?;
            templates.push(RoomTemplate { name: room.name, items });
        }

        let ancillary = resolve_ancillary(&ancillary, &materials, &fixed_items)?;

        Ok(Self { materials, fixed_items, rooms: templates, ancillary })
    }

    pub fn standard() -> Result<Self, CatalogError> {
        Self::new(standard::standard_definition())
    }

    pub fn from_toml_str(raw: &str) -> Result<Self, CatalogError> {
        let definition = toml::from_str::<CatalogDefinition>(raw)?;
        Self::new(definition)
    }

    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let raw = fs::read_to_string(path)
            .map_err(|source| CatalogError::ReadFile { path: path.to_path_buf(), source })?;
        Self::from_toml_str(&raw)
    }

    /// Loads the catalog file when one is configured, else the standard catalog.
    pub fn load_or_standard(path: Option<&Path>) -> Result<Self, CatalogError> {
        match path {
            Some(path) => Self::load(path),
            None => Self::standard(),
        }
    }

    pub fn resolve_material_rate(&self, key: &str) -> Result<&RateEntry, CatalogError> {
        self.materials.get(key).ok_or_else(|| CatalogError::MaterialRateNotFound(key.to_string()))
    }

    pub fn resolve_fixed_rate(&self, key: &str) -> Result<&RateEntry, CatalogError> {
        self.fixed_items.get(key).ok_or_else(|| CatalogError::FixedRateNotFound(key.to_string()))
    }

    pub fn room_template(&self, name: &str) -> Option<&RoomTemplate> {
        self.rooms.iter().find(|room| room.name == name)
    }

    /// Templates in declaration order.
    pub fn rooms(&self) -> &[RoomTemplate] {
        &self.rooms
    }

    pub fn ancillary(&self) -> &AncillaryRates {
        &self.ancillary
    }

    pub fn material_count(&self) -> usize {
        self.materials.len()
    }

    pub fn fixed_item_count(&self) -> usize {
        self.fixed_items.len()
    }
}

fn resolve_line_item(
    room: &str,
    spec: LineItemSpec,
    materials: &BTreeMap<String, RateEntry>,
    fixed_items: &BTreeMap<String, RateEntry>,
) -> Result<LineItem, CatalogError> {
    match spec {
        LineItemSpec::Area { name, material, base_area } => {
            if base_area <= Decimal::ZERO {
                return Err(CatalogError::InvalidBaseArea { room: room.to_string(), item: name });
            }
            let rate = materials.get(&material).cloned().ok_or_else(|| {
                CatalogError::UnknownMaterialKey {
                    room: room.to_string(),
                    item: name.clone(),
                    key: material.clone(),
                }
            })?;
            Ok(LineItem::Area { name, rate, base_area })
        }
        LineItemSpec::Unit { name, fixed, quantity } => {
            if quantity == 0 {
                return Err(CatalogError::ZeroQuantity { room: room.to_string(), item: name });
            }
            let rate = fixed_items.get(&fixed).cloned().ok_or_else(|| {
                CatalogError::UnknownFixedKey {
                    room: room.to_string(),
                    item: name.clone(),
                    key: fixed.clone(),
                }
            })?;
            Ok(LineItem::Unit { name, rate, quantity })
        }
    }
}

fn resolve_ancillary(
    keys: &AncillaryKeys,
    materials: &BTreeMap<String, RateEntry>,
    fixed_items: &BTreeMap<String, RateEntry>,
) -> Result<AncillaryRates, CatalogError> {
    let lookup = |table: &BTreeMap<String, RateEntry>, role: &'static str, key: &str| {
        table
            .get(key)
            .cloned()
            .ok_or_else(|| CatalogError::UnknownAncillaryKey { role, key: key.to_string() })
    };

    Ok(AncillaryRates {
        paint: lookup(materials, "paint", &keys.paint)?,
        soft_closing_channel: lookup(
            fixed_items,
            "soft_closing_channel",
            &keys.soft_closing_channel,
        )?,
        soft_closing_hinge: lookup(fixed_items, "soft_closing_hinge", &keys.soft_closing_hinge)?,
        full_house_electrical: lookup(
            fixed_items,
            "full_house_electrical",
            &keys.full_house_electrical,
        )?,
        debris_removal: lookup(fixed_items, "debris_removal", &keys.debris_removal)?,
        floor_covering: lookup(fixed_items, "floor_covering", &keys.floor_covering)?,
        deep_cleaning: lookup(fixed_items, "deep_cleaning", &keys.deep_cleaning)?,
    })
}
