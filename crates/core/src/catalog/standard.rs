//! Built-in reference rate card. Area rates are per sq ft, unit rates per piece.

use std::collections::BTreeMap;

use rust_decimal::Decimal;

use super::definition::{
    AncillaryKeys, CatalogDefinition, LineItemSpec, RateEntry, RoomDefinition,
};

pub fn standard_definition() -> CatalogDefinition {
    CatalogDefinition {
        materials: material_rates(),
        fixed_items: fixed_item_rates(),
        rooms: room_definitions(),
        ancillary: AncillaryKeys::default(),
    }
}

fn material_rates() -> BTreeMap<String, RateEntry> {
    rate_table(&[
        ("plywoodLaminate", Decimal::from(1394), "Plywood + Laminate Finish"),
        ("plywoodLaminateKitchen", Decimal::from(1498), "Kitchen Grade Plywood + Laminate"),
        ("plywoodLaminateWardrobe", Decimal::from(1297), "Wardrobe Grade Plywood + Laminate"),
        ("aluminiumFrameGlass", Decimal::from(2594), "Aluminium Frame with Tinted/Fluted Glass"),
        ("paneling", Decimal::from(818), "Wall Paneling / Ledge"),
        ("loft", Decimal::from(891), "Loft (Frame + Shutter)"),
        ("extendedLoft", Decimal::from(991), "Extended Loft"),
        ("cncJali", Decimal::from(840), "CNC Jali with Acrylic Backing"),
        ("mirror", Decimal::from(268), "Mirror Fixed with Studs"),
        ("glassPartition", Decimal::from(800), "Glass Partition with Hinged Door"),
        (
            "paintTractorEmulsion",
            Decimal::new(3540, 2),
            "Tractor Emulsion (2 Putty + 1 Primer + 2 Paint)",
        ),
    ])
}

fn fixed_item_rates() -> BTreeMap<String, RateEntry> {
    rate_table(&[
        ("drawer", Decimal::from(2000), "Standard Drawer"),
        ("externalDrawer", Decimal::from(5000), "External Drawer with Fittings"),
        ("dresserDrawer", Decimal::from(4000), "Dresser Drawer"),
        ("kingBedHydraulic", Decimal::from(41_500), "King Size Bed with Hydraulic Storage"),
        ("queenBedHydraulic", Decimal::from(35_000), "Queen Size Bed with Hydraulic Storage"),
        ("sideTable", Decimal::from(7300), "Side Table (1 Drawer)"),
        ("baySittingCushion", Decimal::from(7468), "Bay Sitting Cushion"),
        ("ssBaskets600", Decimal::from(3150), "SS Finish Baskets 600mm (Hettich)"),
        ("orgaTray600", Decimal::from(1000), "Orga Tray 600mm (Hettich)"),
        ("thaliInlet600", Decimal::from(1000), "Thali Inlet 600mm (Hettich)"),
        ("bottlePullOut", Decimal::from(4250), "Bottle Pull Out 2-Tier 150mm (Hettich)"),
        ("tandemBox", Decimal::from(5200), "Tandem Box (Hettich)"),
        ("softClosingChannel", Decimal::from(1000), "Soft Closing Channel (Hettich)"),
        ("softClosingHinge", Decimal::from(400), "Soft Closing Hinge (Hettich)"),
        ("debrisRemoval", Decimal::from(5000), "Debris Removal"),
        ("floorCovering", Decimal::from(9144), "Floor Covering with Floor Mat"),
        ("deepCleaning", Decimal::from(9144), "Deep Cleaning of Furnitures"),
        ("fullHouseElectrical", Decimal::from(128_000), "Full House Electrical Work"),
    ])
}

fn room_definitions() -> Vec<RoomDefinition> {
    vec![
        room("Foyer", vec![area("Shoe Unit", "plywoodLaminate", 12)]),
        room(
            "Living Room",
            vec![
                area("TV Unit Paneling", "paneling", 28),
                area("TV Unit Below Storage", "plywoodLaminate", 6),
                area("TV Unit Side Storage", "aluminiumFrameGlass", 14),
                LineItemSpec::unit("Drawers", "drawer", 2),
            ],
        ),
        room(
            "Dining Area",
            vec![
                area("Crockery Unit Bottom", "plywoodLaminate", 9),
                area("Crockery Unit Top (Glass)", "aluminiumFrameGlass", 6),
            ],
        ),
        room(
            "Kitchen",
            vec![
                area("Kitchen Bottom Cabinet", "plywoodLaminateKitchen", 43),
                area("Kitchen Top Cabinet (Glass)", "aluminiumFrameGlass", 26),
                area("Loft", "loft", 26),
                area("Extended Loft", "extendedLoft", 6),
                area("Kitchen Tall Unit", "plywoodLaminateKitchen", 14),
                LineItemSpec::unit("SS Baskets 600mm", "ssBaskets600", 3),
                LineItemSpec::unit("Orga Tray 600mm", "orgaTray600", 1),
                LineItemSpec::unit("Thali Inlet 600mm", "thaliInlet600", 1),
                LineItemSpec::unit("Bottle Pull Out", "bottlePullOut", 1),
                LineItemSpec::unit("Tandem Box", "tandemBox", 2),
                LineItemSpec::unit("Soft Closing Channels", "softClosingChannel", 5),
                LineItemSpec::unit("Soft Closing Hinges", "softClosingHinge", 14),
            ],
        ),
        room(
            "Master Bedroom",
            vec![
                area("Wardrobe", "plywoodLaminateWardrobe", 42),
                area("Loft", "loft", 12),
                LineItemSpec::area("Dresser with Storage", "plywoodLaminate", Decimal::new(75, 1)),
                LineItemSpec::area("Mirror", "mirror", Decimal::new(75, 1)),
                LineItemSpec::unit("Dresser Drawer", "dresserDrawer", 1),
                LineItemSpec::unit("Side Table", "sideTable", 1),
                area("Custom Headboard with Cushion", "plywoodLaminate", 12),
                LineItemSpec::unit("King Size Bed with Hydraulic", "kingBedHydraulic", 1),
            ],
        ),
        room(
            "Bedroom",
            vec![
                area("Study Unit Ledge", "paneling", 12),
                area("Study Table Top Storage", "plywoodLaminate", 8),
                area("Study Unit Tall Unit", "plywoodLaminate", 14),
                LineItemSpec::unit("External Drawers", "externalDrawer", 2),
            ],
        ),
        room(
            "Kids Room",
            vec![
                area("Study Unit Ledge", "paneling", 12),
                area("Study Table Top Storage", "plywoodLaminate", 8),
                area("Wardrobe", "plywoodLaminateWardrobe", 30),
                area("Loft", "loft", 8),
                LineItemSpec::unit("External Drawers", "externalDrawer", 2),
            ],
        ),
        room(
            "Pooja Room",
            vec![
                area("Custom Pooja Unit", "plywoodLaminate", 9),
                area("CNC Jali with Acrylic", "cncJali", 4),
                area("Bottom Storage", "plywoodLaminate", 6),
                area("Pooja Ledges", "paneling", 4),
                LineItemSpec::unit("Drawers", "drawer", 2),
            ],
        ),
        room(
            "Balcony",
            vec![
                area("Bay Sitting Storage", "plywoodLaminate", 12),
                LineItemSpec::unit("Bay Sitting Cushion", "baySittingCushion", 1),
            ],
        ),
        room(
            "Bathroom",
            vec![
                area("Bottom Cabinets", "plywoodLaminateKitchen", 4),
                area("Top Cabinet with Storage", "plywoodLaminateKitchen", 4),
                area("Mirror", "mirror", 4),
                area("Glass Partition with Door", "glassPartition", 28),
            ],
        ),
    ]
}

fn rate_table(rows: &[(&str, Decimal, &str)]) -> BTreeMap<String, RateEntry> {
    rows.iter().map(|(key, rate, label)| ((*key).to_string(), RateEntry::new(*rate, *label))).collect()
}

fn room(name: &str, items: Vec<LineItemSpec>) -> RoomDefinition {
    RoomDefinition { name: name.to_string(), items }
}

fn area(name: &str, material: &str, sq_ft: i64) -> LineItemSpec {
    LineItemSpec::area(name, material, Decimal::from(sq_ft))
}
