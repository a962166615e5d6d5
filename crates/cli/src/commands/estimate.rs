use std::sync::Arc;

use interiq_core::errors::DomainError;
use interiq_core::estimate::EstimateRequest;
use interiq_core::runtime::StandardQuotationRuntime;

use crate::commands::{load_catalog, CommandResult, EXIT_INVALID_INPUT};
use crate::EstimateArgs;

pub fn run(args: &EstimateArgs) -> CommandResult {
    let (_, catalog) = match load_catalog("estimate") {
        Ok(loaded) => loaded,
        Err(failure) => return failure,
    };
    let runtime = StandardQuotationRuntime::with_catalog(Arc::new(catalog));

    let request = EstimateRequest {
        carpet_area: args.carpet_area,
        budget: args.budget,
        rooms: args.rooms.clone(),
    };

    match runtime.estimate(&request) {
        Ok(estimate) => CommandResult::with_result(
            "estimate",
            format!(
                "{} package estimated at {}",
                estimate.package_type, estimate.estimated_cost
            ),
            &estimate,
        ),
        Err(DomainError::InvalidArgument(message)) => {
            CommandResult::failure("estimate", "invalid_argument", message, EXIT_INVALID_INPUT)
        }
        Err(error) => CommandResult::failure("estimate", "estimate_failed", error.to_string(), 1),
    }
}
