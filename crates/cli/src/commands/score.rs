use interiq_core::scoring::{score_lead, ScoringRequest};

use crate::commands::CommandResult;
use crate::ScoreArgs;

pub fn run(args: &ScoreArgs) -> CommandResult {
    let request = ScoringRequest {
        budget: args.budget,
        rooms: args.rooms.clone(),
        timeline: args.timeline.clone(),
        carpet_area: args.carpet_area,
        property_type: args.property_type.clone(),
    };

    let scoring = score_lead(&request);
    CommandResult::with_result(
        "score",
        format!("lead scored {} ({})", scoring.lead_score, scoring.lead_category),
        &scoring,
    )
}
