pub mod model;
pub mod rounding;

use std::collections::HashSet;
use std::sync::Arc;

use rust_decimal::Decimal;

use crate::catalog::{AncillaryRates, LineItem, RateCatalog, RateEntry, RoomTemplate};
use crate::errors::DomainError;

pub use model::{
    BucketBreakdown, EstimateRequest, EstimateResult, EstimateSummary, LineCost,
    MaterialsSpecification, OrderedBreakdown, PackageTier,
};
use rounding::{checked_product, checked_total, percent_of, round_area, round_currency};

pub const OTHERS_LABEL: &str = "Others (Paint, Electrical, Hardware)";
pub const SERVICES_LABEL: &str = "Services";
pub const WARRANTY: &str = "10 years on all woodwork";

const REFERENCE_CARPET_AREA: u32 = 1300;
const PAINTABLE_AREA_MULTIPLIER: u32 = 4;
const HARDWARE_CHANNEL_UNITS: u32 = 10;
const HARDWARE_HINGE_UNITS: u32 = 25;
const DISCOUNT_PERCENT: u32 = 5;
const GST_PERCENT: u32 = 18;

const PAYMENT_MILESTONES: [(&str, u32); 3] =
    [("Design & Booking", 10), ("Contract Signing", 50), ("Before Delivery", 40)];

pub trait CostEstimator: Send + Sync {
    fn estimate(&self, request: &EstimateRequest) -> Result<EstimateResult, DomainError>;
}

#[derive(Clone, Debug)]
pub struct CatalogCostEstimator {
    catalog: Arc<RateCatalog>,
}

impl CatalogCostEstimator {
    pub fn new(catalog: Arc<RateCatalog>) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &RateCatalog {
        &self.catalog
    }
}

impl CostEstimator for CatalogCostEstimator {
    fn estimate(&self, request: &EstimateRequest) -> Result<EstimateResult, DomainError> {
        estimate_cost(&self.catalog, request)
    }
}

/// Ratio of carpet area to the reference unit, clamped to `[0.6, 2.0]`.
pub fn scale_factor(carpet_area: Decimal) -> Decimal {
    let ratio = carpet_area / Decimal::from(REFERENCE_CARPET_AREA);
    ratio.clamp(Decimal::new(6, 1), Decimal::TWO)
}

pub fn estimate_cost(
    catalog: &RateCatalog,
    request: &EstimateRequest,
) -> Result<EstimateResult, DomainError> {
    if request.carpet_area <= Decimal::ZERO || request.budget <= Decimal::ZERO {
        return Err(DomainError::InvalidArgument(
            "carpet area and budget are required".to_string(),
        ));
    }

    let scale = scale_factor(request.carpet_area);
    let mut room_breakdown = OrderedBreakdown::default();

    for template in selected_rooms(catalog, &request.rooms) {
        let bucket = price_room(template, scale)?;
        room_breakdown.insert(template.name.clone(), bucket);
    }
    let modular_work_total = checked_total(room_breakdown.iter().map(|(_, bucket)| bucket.total))?;

    let others = price_others(catalog.ancillary(), request.carpet_area)?;
    let services = price_services(catalog.ancillary())?;
    let others_cost = others.total;
    let services_cost = services.total;
    room_breakdown.insert(OTHERS_LABEL, others);
    room_breakdown.insert(SERVICES_LABEL, services);

    let summary = summarize(modular_work_total, others_cost, services_cost)?;
    let payment_schedule = payment_schedule(summary.total)?;

    let mut cost_breakdown = OrderedBreakdown::default();
    for (label, bucket) in room_breakdown.iter() {
        cost_breakdown.insert(label, bucket.total);
    }

    Ok(EstimateResult {
        package_type: PackageTier::from_budget(request.budget),
        estimated_cost: summary.total,
        cost_breakdown,
        room_breakdown,
        summary,
        materials: MaterialsSpecification::standard(),
        warranty: WARRANTY.to_string(),
        payment_schedule,
    })
}

/// An empty request means every catalog room; otherwise requested rooms with a
/// template, in request order, each at most once.
fn selected_rooms<'a>(catalog: &'a RateCatalog, requested: &[String]) -> Vec<&'a RoomTemplate> {
    if requested.is_empty() {
        return catalog.rooms().iter().collect();
    }

    let mut seen = HashSet::new();
    requested
        .iter()
        .map(|name| name.trim())
        .filter(|name| seen.insert(*name))
        .filter_map(|name| catalog.room_template(name))
        .collect()
}

fn price_room(template: &RoomTemplate, scale: Decimal) -> Result<BucketBreakdown, DomainError> {
    let items = template
        .items
        .iter()
        .map(|item| match item {
            LineItem::Area { name, rate, base_area } => {
                let area = round_area(checked_product(*base_area, scale)?);
                area_line(name, rate, area)
            }
            LineItem::Unit { name, rate, quantity } => unit_line(name, rate, *quantity),
        })
        .collect::<Result<Vec<_>, _>>()?;
    bucket(items)
}

fn price_others(
    rates: &AncillaryRates,
    carpet_area: Decimal,
) -> Result<BucketBreakdown, DomainError> {
    let paint_area = checked_product(carpet_area, Decimal::from(PAINTABLE_AREA_MULTIPLIER))?;
    bucket(vec![
        area_line("Paint - Tractor Emulsion", &rates.paint, paint_area)?,
        unit_line("Soft Closing Channels", &rates.soft_closing_channel, HARDWARE_CHANNEL_UNITS)?,
        unit_line("Soft Closing Hinges", &rates.soft_closing_hinge, HARDWARE_HINGE_UNITS)?,
        unit_line("Full House Electrical Work", &rates.full_house_electrical, 1)?,
    ])
}

fn price_services(rates: &AncillaryRates) -> Result<BucketBreakdown, DomainError> {
    bucket(vec![
        unit_line("Debris Removal", &rates.debris_removal, 1)?,
        unit_line("Floor Covering", &rates.floor_covering, 1)?,
        unit_line("Deep Cleaning", &rates.deep_cleaning, 1)?,
    ])
}

fn bucket(items: Vec<LineCost>) -> Result<BucketBreakdown, DomainError> {
    let total = checked_total(items.iter().map(LineCost::cost))?;
    Ok(BucketBreakdown { total, items })
}

fn area_line(name: &str, rate: &RateEntry, area: Decimal) -> Result<LineCost, DomainError> {
    Ok(LineCost::Area {
        name: name.to_string(),
        material: rate.label.clone(),
        area,
        rate_per_sq_ft: rate.rate,
        cost: round_currency(checked_product(area, rate.rate)?),
    })
}

fn unit_line(name: &str, rate: &RateEntry, quantity: u32) -> Result<LineCost, DomainError> {
    Ok(LineCost::Unit {
        name: name.to_string(),
        material: rate.label.clone(),
        quantity,
        rate_per_unit: rate.rate,
        cost: round_currency(checked_product(rate.rate, Decimal::from(quantity))?),
    })
}

fn summarize(
    modular_work_total: Decimal,
    others_cost: Decimal,
    services_cost: Decimal,
) -> Result<EstimateSummary, DomainError> {
    let discount_percent = Decimal::from(DISCOUNT_PERCENT);
    let gst_percent = Decimal::from(GST_PERCENT);

    let subtotal_before_discount = checked_total([modular_work_total, others_cost, services_cost])?;
    let discount = percent_of(subtotal_before_discount, discount_percent)?;
    let subtotal = subtotal_before_discount - discount;
    let gst = percent_of(subtotal, gst_percent)?;

    Ok(EstimateSummary {
        modular_work_total,
        others_cost,
        services_cost,
        subtotal_before_discount,
        discount,
        discount_percent,
        subtotal,
        gst,
        gst_percent,
        total: checked_total([subtotal, gst])?,
    })
}

/// Milestones keyed `"<stage> (<percent>%)"`. The last one absorbs rounding so
/// the schedule sums to `total` exactly.
fn payment_schedule(total: Decimal) -> Result<OrderedBreakdown<Decimal>, DomainError> {
    let mut schedule = OrderedBreakdown::default();
    let mut allocated = Decimal::ZERO;
    let last = PAYMENT_MILESTONES.len() - 1;

    for (index, (stage, percent)) in PAYMENT_MILESTONES.iter().enumerate() {
        let amount = if index == last {
            total - allocated
        } else {
            percent_of(total, Decimal::from(*percent))?
        };
        allocated += amount;
        schedule.insert(format!("{stage} ({percent}%)"), amount);
    }
    Ok(schedule)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use rust_decimal::Decimal;

    use super::{
        estimate_cost, scale_factor, CatalogCostEstimator, CostEstimator, EstimateRequest,
        LineCost, PackageTier, OTHERS_LABEL, SERVICES_LABEL,
    };
    use crate::catalog::{LineItem, RateCatalog};
    use crate::errors::DomainError;

    fn catalog() -> RateCatalog {
        RateCatalog::standard().expect("standard catalog")
    }

    fn request(carpet_area: i64, budget: i64, rooms: &[&str]) -> EstimateRequest {
        EstimateRequest {
            carpet_area: Decimal::from(carpet_area),
            budget: Decimal::from(budget),
            rooms: rooms.iter().map(|room| room.to_string()).collect(),
        }
    }

    #[test]
    fn scale_factor_is_clamped() {
        assert_eq!(scale_factor(Decimal::from(1300)), Decimal::ONE);
        assert_eq!(scale_factor(Decimal::from(100)), Decimal::new(6, 1));
        assert_eq!(scale_factor(Decimal::from(5000)), Decimal::TWO);
        assert_eq!(scale_factor(Decimal::from(1950)), Decimal::new(15, 1));
    }

    #[test]
    fn rejects_non_positive_inputs() {
        let catalog = catalog();

        for bad in [request(0, 1_000_000, &[]), request(1200, 0, &[]), request(-5, 10, &[])] {
            let error = estimate_cost(&catalog, &bad).expect_err("must reject");
            assert_eq!(
                error,
                DomainError::InvalidArgument("carpet area and budget are required".to_string())
            );
        }
    }

    #[test]
    fn kitchen_at_reference_area_matches_unscaled_template() {
        let catalog = catalog();
        let result =
            estimate_cost(&catalog, &request(1300, 1_000_000, &["Kitchen"])).expect("estimate");

        let template = catalog.room_template("Kitchen").expect("kitchen");
        let manual: Decimal = template
            .items
            .iter()
            .map(|item| match item {
                LineItem::Area { rate, base_area, .. } => *base_area * rate.rate,
                LineItem::Unit { rate, quantity, .. } => rate.rate * Decimal::from(*quantity),
            })
            .sum();

        let kitchen = result.room_breakdown.get("Kitchen").expect("kitchen bucket");
        assert_eq!(kitchen.total, manual);
        assert_eq!(kitchen.total, Decimal::from(218_642));
        assert_eq!(result.summary.modular_work_total, Decimal::from(218_642));
    }

    #[test]
    fn reference_kitchen_summary_matches_hand_calculation() {
        let result = estimate_cost(&catalog(), &request(1300, 1_000_000, &["Kitchen"]))
            .expect("estimate");
        let summary = &result.summary;

        assert_eq!(summary.others_cost, Decimal::from(332_080));
        assert_eq!(summary.services_cost, Decimal::from(23_288));
        assert_eq!(summary.subtotal_before_discount, Decimal::from(574_010));
        assert_eq!(summary.discount, Decimal::from(28_701));
        assert_eq!(summary.subtotal, Decimal::from(545_309));
        assert_eq!(summary.gst, Decimal::from(98_156));
        assert_eq!(summary.total, Decimal::from(643_465));
        assert_eq!(result.estimated_cost, summary.total);
        assert_eq!(result.package_type, PackageTier::Premium);
    }

    #[test]
    fn payment_schedule_sums_exactly_to_total() {
        let result = estimate_cost(&catalog(), &request(1300, 1_000_000, &["Kitchen"]))
            .expect("estimate");
        let amounts: Vec<Decimal> =
            result.payment_schedule.iter().map(|(_, amount)| *amount).collect();

        assert_eq!(
            amounts,
            vec![Decimal::from(64_347), Decimal::from(321_733), Decimal::from(257_385)]
        );
        assert_eq!(amounts.iter().copied().sum::<Decimal>(), result.summary.total);
        assert_eq!(
            result.payment_schedule.labels().collect::<Vec<_>>(),
            vec!["Design & Booking (10%)", "Contract Signing (50%)", "Before Delivery (40%)"]
        );
    }

    #[test]
    fn empty_rooms_estimates_every_template() {
        let catalog = catalog();
        let result =
            estimate_cost(&catalog, &request(1300, 1_000_000, &[])).expect("estimate");

        for template in catalog.rooms() {
            assert!(
                result.cost_breakdown.contains(&template.name),
                "missing {} from breakdown",
                template.name
            );
        }
        assert_eq!(result.cost_breakdown.len(), catalog.rooms().len() + 2);
    }

    #[test]
    fn unknown_room_is_dropped_not_errored() {
        let result = estimate_cost(&catalog(), &request(1000, 500_000, &["NonexistentRoom"]))
            .expect("unknown rooms are not errors");

        assert_eq!(result.summary.modular_work_total, Decimal::ZERO);
        assert_eq!(
            result.cost_breakdown.labels().collect::<Vec<_>>(),
            vec![OTHERS_LABEL, SERVICES_LABEL]
        );
        assert_eq!(result.summary.others_cost, Decimal::from(289_600));
        assert_eq!(result.summary.total, Decimal::from(350_748));
        assert_eq!(result.package_type, PackageTier::Essential);
    }

    #[test]
    fn duplicate_and_padded_room_names_are_priced_once() {
        let catalog = catalog();
        let single = estimate_cost(&catalog, &request(1300, 900_000, &["Kitchen"]))
            .expect("estimate");
        let repeated =
            estimate_cost(&catalog, &request(1300, 900_000, &["Kitchen", " Kitchen ", "Kitchen"]))
                .expect("estimate");

        assert_eq!(repeated.summary, single.summary);
        assert_eq!(repeated.room_breakdown.len(), single.room_breakdown.len());
    }

    #[test]
    fn breakdown_follows_request_order_then_ancillaries() {
        let result = estimate_cost(
            &catalog(),
            &request(1200, 1_200_000, &["Bathroom", "Garage", "Foyer"]),
        )
        .expect("estimate");

        assert_eq!(
            result.cost_breakdown.labels().collect::<Vec<_>>(),
            vec!["Bathroom", "Foyer", OTHERS_LABEL, SERVICES_LABEL]
        );
    }

    #[test]
    fn area_items_share_the_room_scale_factor() {
        let result = estimate_cost(&catalog(), &request(1950, 2_000_000, &["Master Bedroom"]))
            .expect("estimate");
        let bedroom = result.room_breakdown.get("Master Bedroom").expect("bucket");

        let areas: Vec<Decimal> = bedroom
            .items
            .iter()
            .filter_map(|item| match item {
                LineCost::Area { area, .. } => Some(*area),
                LineCost::Unit { .. } => None,
            })
            .collect();
        assert_eq!(
            areas,
            vec![
                Decimal::from(63),
                Decimal::from(18),
                Decimal::new(113, 1),
                Decimal::new(113, 1),
                Decimal::from(18),
            ]
        );

        let king_bed = bedroom
            .items
            .iter()
            .find(|item| item.name() == "King Size Bed with Hydraulic")
            .expect("bed line");
        assert_eq!(king_bed.cost(), Decimal::from(41_500));
    }

    #[test]
    fn aggregation_identities_hold_across_inputs() {
        let catalog = catalog();
        for carpet_area in [300, 780, 1000, 1299, 1301, 1777, 2600, 9000] {
            let room_sets =
                [&[][..], &["Kitchen"][..], &["Living Room", "Pooja Room", "Balcony"][..]];
            for rooms in room_sets {
                let result = estimate_cost(&catalog, &request(carpet_area, 750_000, rooms))
                    .expect("estimate");
                let summary = &result.summary;

                assert_eq!(summary.subtotal + summary.gst, summary.total);
                assert_eq!(summary.subtotal_before_discount - summary.discount, summary.subtotal);
                assert_eq!(
                    summary.modular_work_total + summary.others_cost + summary.services_cost,
                    summary.subtotal_before_discount
                );
                assert_eq!(
                    result.payment_schedule.iter().map(|(_, amount)| *amount).sum::<Decimal>(),
                    summary.total
                );
                assert_eq!(summary.total.scale(), 0, "totals are whole currency units");
            }
        }
    }

    #[test]
    fn modular_total_is_monotonic_in_carpet_area() {
        let catalog = catalog();
        let mut previous = Decimal::ZERO;

        for carpet_area in (780..=2600).step_by(13) {
            let result = estimate_cost(&catalog, &request(carpet_area, 1_000_000, &[]))
                .expect("estimate");
            assert!(
                result.summary.modular_work_total >= previous,
                "modular total decreased at {carpet_area}"
            );
            previous = result.summary.modular_work_total;
        }
    }

    #[test]
    fn estimates_are_deterministic() {
        let estimator = CatalogCostEstimator::new(Arc::new(catalog()));
        let input = request(1437, 1_650_000, &["Kitchen", "Kids Room", "Dining Area"]);

        let first = estimator.estimate(&input).expect("estimate");
        let second = estimator.estimate(&input).expect("estimate");

        assert_eq!(first, second);
        assert_eq!(
            serde_json::to_string(&first).expect("json"),
            serde_json::to_string(&second).expect("json")
        );
        assert_eq!(first.package_type, PackageTier::Luxury);
    }

    #[test]
    fn oversized_carpet_area_is_rejected_instead_of_overflowing() {
        let catalog = catalog();
        let too_large =
            DomainError::InvalidArgument("carpet area is too large to estimate".to_string());

        for carpet_area in [Decimal::from_i128_with_scale(10_i128.pow(27), 0), Decimal::MAX] {
            let request = EstimateRequest {
                carpet_area,
                budget: Decimal::from(1_000_000),
                rooms: vec!["Kitchen".to_string()],
            };
            assert_eq!(estimate_cost(&catalog, &request), Err(too_large.clone()));
        }
    }
}
