use interiq_core::catalog::LineItem;
use serde::Serialize;

use crate::commands::{load_catalog, CommandResult};

#[derive(Debug, Serialize)]
struct RoomSummary {
    name: String,
    area_items: usize,
    unit_items: usize,
}

#[derive(Debug, Serialize)]
struct CatalogSummary {
    source: String,
    materials: usize,
    fixed_items: usize,
    rooms: Vec<RoomSummary>,
}

pub fn run() -> CommandResult {
    let (config, catalog) = match load_catalog("catalog") {
        Ok(loaded) => loaded,
        Err(failure) => return failure,
    };

    let rooms: Vec<RoomSummary> = catalog
        .rooms()
        .iter()
        .map(|room| {
            let area_items =
                room.items.iter().filter(|item| matches!(item, LineItem::Area { .. })).count();
            RoomSummary {
                name: room.name.clone(),
                area_items,
                unit_items: room.items.len() - area_items,
            }
        })
        .collect();

    let summary = CatalogSummary {
        source: config
            .catalog
            .path
            .as_ref()
            .map(|path| path.display().to_string())
            .unwrap_or_else(|| "standard".to_string()),
        materials: catalog.material_count(),
        fixed_items: catalog.fixed_item_count(),
        rooms,
    };

    CommandResult::with_result(
        "catalog",
        format!("rate catalog valid: {} room templates", summary.rooms.len()),
        &summary,
    )
}
