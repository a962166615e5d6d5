use std::fmt;
use std::marker::PhantomData;

use rust_decimal::Decimal;
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EstimateRequest {
    pub carpet_area: Decimal,
    pub budget: Decimal,
    #[serde(default)]
    pub rooms: Vec<String>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PackageTier {
    Essential,
    Premium,
    Luxury,
}

impl PackageTier {
    /// Budget bands: below 8 lakh, 8 to 15 lakh inclusive, above 15 lakh.
    pub fn from_budget(budget: Decimal) -> Self {
        if budget < Decimal::from(800_000) {
            Self::Essential
        } else if budget <= Decimal::from(1_500_000) {
            Self::Premium
        } else {
            Self::Luxury
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Essential => "Essential",
            Self::Premium => "Premium",
            Self::Luxury => "Luxury",
        }
    }
}

impl fmt::Display for PackageTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for PackageTier {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "essential" => Ok(Self::Essential),
            "premium" => Ok(Self::Premium),
            "luxury" => Ok(Self::Luxury),
            other => Err(format!(
                "unsupported package type `{other}` (expected essential|premium|luxury)"
            )),
        }
    }
}

/// One priced line of a breakdown bucket.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "basis", rename_all = "snake_case")]
pub enum LineCost {
    #[serde(rename_all = "camelCase")]
    Area {
        name: String,
        material: String,
        #[serde(with = "rust_decimal::serde::float")]
        area: Decimal,
        #[serde(with = "rust_decimal::serde::float")]
        rate_per_sq_ft: Decimal,
        #[serde(with = "rust_decimal::serde::float")]
        cost: Decimal,
    },
    #[serde(rename_all = "camelCase")]
    Unit {
        name: String,
        material: String,
        quantity: u32,
        #[serde(with = "rust_decimal::serde::float")]
        rate_per_unit: Decimal,
        #[serde(with = "rust_decimal::serde::float")]
        cost: Decimal,
    },
}

impl LineCost {
    pub fn name(&self) -> &str {
        match self {
            Self::Area { name, .. } | Self::Unit { name, .. } => name,
        }
    }

    pub fn cost(&self) -> Decimal {
        match self {
            Self::Area { cost, .. } | Self::Unit { cost, .. } => *cost,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BucketBreakdown {
    #[serde(with = "rust_decimal::serde::float")]
    pub total: Decimal,
    pub items: Vec<LineCost>,
}

/// String-keyed map that keeps insertion order, serialized as a JSON object.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OrderedBreakdown<V> {
    entries: Vec<(String, V)>,
}

impl<V> Default for OrderedBreakdown<V> {
    fn default() -> Self {
        Self { entries: Vec::new() }
    }
}

impl<V> OrderedBreakdown<V> {
    /// Inserts or replaces; a replaced key keeps its original position.
    pub fn insert(&mut self, label: impl Into<String>, value: V) {
        let label = label.into();
        match self.entries.iter_mut().find(|(existing, _)| *existing == label) {
            Some((_, slot)) => *slot = value,
            None => self.entries.push((label, value)),
        }
    }

    pub fn get(&self, label: &str) -> Option<&V> {
        self.entries.iter().find(|(existing, _)| existing == label).map(|(_, value)| value)
    }

    pub fn contains(&self, label: &str) -> bool {
        self.get(label).is_some()
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(label, _)| label.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &V)> {
        self.entries.iter().map(|(label, value)| (label.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<V: Serialize> Serialize for OrderedBreakdown<V> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (label, value) in &self.entries {
            map.serialize_entry(label, value)?;
        }
        map.end()
    }
}

impl<'de, V: Deserialize<'de>> Deserialize<'de> for OrderedBreakdown<V> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct BreakdownVisitor<V>(PhantomData<V>);

        impl<'de, V: Deserialize<'de>> Visitor<'de> for BreakdownVisitor<V> {
            type Value = OrderedBreakdown<V>;

            fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
                formatter.write_str("a map of breakdown labels")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut breakdown = OrderedBreakdown::default();
                while let Some((label, value)) = access.next_entry::<String, V>()? {
                    breakdown.insert(label, value);
                }
                Ok(breakdown)
            }
        }

        deserializer.deserialize_map(BreakdownVisitor(PhantomData))
    }
}

/// Field adapter writing breakdown amounts as JSON numbers. Reading accepts
/// numbers or strings.
pub mod money_breakdown {
    use rust_decimal::Decimal;
    use serde::ser::SerializeMap;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    use super::OrderedBreakdown;

    struct Amount(Decimal);

    impl Serialize for Amount {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            rust_decimal::serde::float::serialize(&self.0, serializer)
        }
    }

    pub fn serialize<S: Serializer>(
        breakdown: &OrderedBreakdown<Decimal>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(breakdown.len()))?;
        for (label, amount) in breakdown.iter() {
            map.serialize_entry(label, &Amount(*amount))?;
        }
        map.end()
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<OrderedBreakdown<Decimal>, D::Error> {
        OrderedBreakdown::deserialize(deserializer)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EstimateSummary {
    #[serde(with = "rust_decimal::serde::float")]
    pub modular_work_total: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub others_cost: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub services_cost: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub subtotal_before_discount: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub discount: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub discount_percent: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub subtotal: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub gst: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub gst_percent: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub total: Decimal,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaterialsSpecification {
    pub brand: String,
    pub plywood: String,
    pub laminate: String,
    pub fittings: String,
    pub glass: String,
}

impl MaterialsSpecification {
    pub fn standard() -> Self {
        Self {
            brand: "Interiq Standard".to_string(),
            plywood: "303 MR Grade (Dry) / Green Ply 710 BWP (Wet)".to_string(),
            laminate: "Stylam / Airolam (1mm)".to_string(),
            fittings: "Hettich".to_string(),
            glass: "Modiguard / AIS / Saint Gobain".to_string(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EstimateResult {
    pub package_type: PackageTier,
    #[serde(with = "rust_decimal::serde::float")]
    pub estimated_cost: Decimal,
    #[serde(with = "money_breakdown")]
    pub cost_breakdown: OrderedBreakdown<Decimal>,
    pub room_breakdown: OrderedBreakdown<BucketBreakdown>,
    pub summary: EstimateSummary,
    pub materials: MaterialsSpecification,
    pub warranty: String,
    #[serde(with = "money_breakdown")]
    pub payment_schedule: OrderedBreakdown<Decimal>,
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use super::{
        money_breakdown, BucketBreakdown, EstimateResult, EstimateSummary, LineCost,
        MaterialsSpecification, OrderedBreakdown, PackageTier,
    };

    #[test]
    fn tier_boundaries_are_inclusive_for_premium() {
        assert_eq!(PackageTier::from_budget(Decimal::ZERO), PackageTier::Essential);
        assert_eq!(PackageTier::from_budget(Decimal::from(799_999)), PackageTier::Essential);
        assert_eq!(PackageTier::from_budget(Decimal::from(800_000)), PackageTier::Premium);
        assert_eq!(PackageTier::from_budget(Decimal::from(1_500_000)), PackageTier::Premium);
        assert_eq!(PackageTier::from_budget(Decimal::new(150_000_001, 2)), PackageTier::Luxury);
    }

    #[test]
    fn ordered_breakdown_serializes_in_insertion_order() {
        let mut breakdown = OrderedBreakdown::default();
        breakdown.insert("Kitchen", Decimal::from(3));
        breakdown.insert("Bathroom", Decimal::from(2));
        breakdown.insert("Services", Decimal::from(1));

        let json = serde_json::to_string(&breakdown).expect("serialize");
        assert_eq!(json, r#"{"Kitchen":"3","Bathroom":"2","Services":"1"}"#);

        let parsed: OrderedBreakdown<Decimal> = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(parsed.labels().collect::<Vec<_>>(), vec!["Kitchen", "Bathroom", "Services"]);
    }

    #[test]
    fn reinserting_a_label_keeps_its_position() {
        let mut breakdown = OrderedBreakdown::default();
        breakdown.insert("Foyer", 1);
        breakdown.insert("Balcony", 2);
        breakdown.insert("Foyer", 5);

        assert_eq!(breakdown.len(), 2);
        assert_eq!(breakdown.get("Foyer"), Some(&5));
        assert_eq!(breakdown.labels().next(), Some("Foyer"));
    }

    #[test]
    fn estimate_amounts_serialize_as_json_numbers() {
        let mut schedule = OrderedBreakdown::default();
        schedule.insert("Design & Booking (10%)", Decimal::from(100));
        schedule.insert("Contract Signing (50%)", Decimal::from(500));
        schedule.insert("Before Delivery (40%)", Decimal::from(400));
        let mut cost_breakdown = OrderedBreakdown::default();
        cost_breakdown.insert("Kitchen", Decimal::new(7505, 1));
        let mut room_breakdown = OrderedBreakdown::default();
        room_breakdown.insert(
            "Kitchen",
            BucketBreakdown {
                total: Decimal::new(7505, 1),
                items: vec![LineCost::Area {
                    name: "Base Cabinets".to_string(),
                    material: "Laminate".to_string(),
                    area: Decimal::new(25, 1),
                    rate_per_sq_ft: Decimal::from(300),
                    cost: Decimal::new(7505, 1),
                }],
            },
        );
        let result = EstimateResult {
            package_type: PackageTier::Essential,
            estimated_cost: Decimal::from(1000),
            cost_breakdown,
            room_breakdown,
            summary: EstimateSummary {
                modular_work_total: Decimal::from(750),
                others_cost: Decimal::ZERO,
                services_cost: Decimal::ZERO,
                subtotal_before_discount: Decimal::from(750),
                discount: Decimal::ZERO,
                discount_percent: Decimal::from(5),
                subtotal: Decimal::from(750),
                gst: Decimal::from(135),
                gst_percent: Decimal::from(18),
                total: Decimal::from(1000),
            },
            materials: MaterialsSpecification::standard(),
            warranty: "10 years on all woodwork".to_string(),
            payment_schedule: schedule,
        };

        let json = serde_json::to_value(&result).expect("serialize");
        assert_eq!(json["estimatedCost"].as_f64(), Some(1000.0));
        assert_eq!(json["costBreakdown"]["Kitchen"].as_f64(), Some(750.5));
        assert_eq!(json["roomBreakdown"]["Kitchen"]["total"].as_f64(), Some(750.5));
        let line = &json["roomBreakdown"]["Kitchen"]["items"][0];
        assert_eq!(line["ratePerSqFt"].as_f64(), Some(300.0));
        assert_eq!(line["basis"], "area");
        assert_eq!(json["summary"]["gstPercent"].as_f64(), Some(18.0));
        assert_eq!(json["paymentSchedule"]["Before Delivery (40%)"].as_f64(), Some(400.0));
        assert_eq!(
            json["paymentSchedule"].as_object().map(|entries| entries.keys().count()),
            Some(3)
        );

        let parsed: EstimateResult = serde_json::from_value(json).expect("deserialize");
        assert_eq!(
            parsed.payment_schedule.get("Contract Signing (50%)"),
            Some(&Decimal::from(500))
        );
        assert_eq!(parsed.cost_breakdown, result.cost_breakdown);
    }

    #[test]
    fn money_breakdown_accepts_string_amounts() {
        let raw = r#"{"Kitchen":"12.5","Services":3}"#;
        let mut deserializer = serde_json::Deserializer::from_str(raw);
        let parsed = money_breakdown::deserialize(&mut deserializer).expect("deserialize");

        assert_eq!(parsed.get("Kitchen"), Some(&Decimal::new(125, 1)));
        assert_eq!(parsed.get("Services"), Some(&Decimal::from(3)));
    }
}
