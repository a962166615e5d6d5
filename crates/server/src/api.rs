use std::sync::Arc;

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use interiq_core::domain::lead::{Lead, LeadId, LeadIntake};
use interiq_core::errors::{ApplicationError, DomainError, InterfaceError};
use interiq_core::estimate::{EstimateRequest, EstimateResult};
use interiq_core::runtime::StandardQuotationRuntime;
use interiq_core::scoring::LeadCategory;
use interiq_db::{LeadQuery, LeadRepository};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::health;

#[derive(Clone)]
pub struct ApiState {
    runtime: Arc<StandardQuotationRuntime>,
    leads: Arc<dyn LeadRepository>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EstimateBody {
    pub carpet_area: Option<Decimal>,
    pub budget: Option<Decimal>,
    pub rooms: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    pub category: Option<String>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

#[derive(Debug, Serialize)]
pub struct LeadCreated {
    pub success: bool,
    pub lead: Lead,
}

#[derive(Debug, Serialize)]
pub struct Pagination {
    pub total: u64,
    pub page: u32,
    pub pages: u64,
}

#[derive(Debug, Serialize)]
pub struct LeadList {
    pub leads: Vec<Lead>,
    pub pagination: Pagination,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorBody {
    pub error: String,
    pub correlation_id: String,
}

/// HTTP face of [`InterfaceError`].
#[derive(Debug)]
pub struct ApiError(pub InterfaceError);

impl ApiError {
    fn bad_request(message: impl Into<String>, correlation_id: &str) -> Self {
        Self(InterfaceError::BadRequest {
            message: message.into(),
            correlation_id: correlation_id.to_string(),
        })
    }

    fn from_application(error: ApplicationError, correlation_id: &str) -> Self {
        Self(error.into_interface(correlation_id))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            InterfaceError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            InterfaceError::NotFound { .. } => StatusCode::NOT_FOUND,
            InterfaceError::ServiceUnavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
            InterfaceError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if status.is_server_error() {
            warn!(
                event_name = "api.request.failed",
                correlation_id = self.0.correlation_id(),
                lead_id = "unknown",
                error = %self.0,
                "request failed"
            );
        }
        let body = ErrorBody {
            error: self.0.client_message().to_string(),
            correlation_id: self.0.correlation_id().to_string(),
        };
        (status, Json(body)).into_response()
    }
}

pub fn app(runtime: Arc<StandardQuotationRuntime>, leads: Arc<dyn LeadRepository>) -> Router {
    Router::new()
        .route("/api/estimate", post(estimate))
        .route("/api/lead", post(create_lead))
        .route("/api/lead/{id}", get(get_lead))
        .route("/api/leads", get(list_leads))
        .with_state(ApiState { runtime, leads: Arc::clone(&leads) })
        .merge(health::router(leads))
        .fallback(not_found)
}

fn correlation_id() -> String {
    format!("req-{}", uuid::Uuid::new_v4())
}

async fn estimate(
    State(state): State<ApiState>,
    body: Result<Json<EstimateBody>, JsonRejection>,
) -> Result<Json<EstimateResult>, ApiError> {
    let correlation_id = correlation_id();
    let Json(body) =
        body.map_err(|rejection| ApiError::bad_request(rejection.body_text(), &correlation_id))?;

    let request = EstimateRequest {
        carpet_area: body.carpet_area.unwrap_or_default(),
        budget: body.budget.unwrap_or_default(),
        rooms: body.rooms,
    };
    let result = state
        .runtime
        .estimate(&request)
        .map_err(|error| ApiError::from_application(error.into(), &correlation_id))?;

    info!(
        event_name = "api.estimate.computed",
        correlation_id = %correlation_id,
        lead_id = "unknown",
        package_type = result.package_type.as_str(),
        estimated_cost = %result.estimated_cost,
        "estimate computed"
    );
    Ok(Json(result))
}

async fn create_lead(
    State(state): State<ApiState>,
    body: Result<Json<LeadIntake>, JsonRejection>,
) -> Result<(StatusCode, Json<LeadCreated>), ApiError> {
    let correlation_id = correlation_id();
    let Json(intake) =
        body.map_err(|rejection| ApiError::bad_request(rejection.body_text(), &correlation_id))?;

    let quote = state.runtime.quote_lead(&intake).map_err(|error: DomainError| {
        info!(
            event_name = "api.lead.rejected",
            correlation_id = %correlation_id,
            lead_id = "unknown",
            reason = %error,
            "lead intake rejected"
        );
        ApiError::from_application(error.into(), &correlation_id)
    })?;
    let lead = quote.lead;

    state
        .leads
        .save(lead.clone())
        .await
        .map_err(|error| ApiError::from_application(error.into(), &correlation_id))?;

    info!(
        event_name = "api.lead.created",
        correlation_id = %correlation_id,
        lead_id = %lead.id.0,
        lead_score = lead.lead_score,
        lead_category = lead.lead_category.as_str(),
        package_type = lead.package_type.as_str(),
        storage = state.leads.storage_kind(),
        "lead captured"
    );
    Ok((StatusCode::CREATED, Json(LeadCreated { success: true, lead })))
}

async fn get_lead(
    State(state): State<ApiState>,
    Path(id): Path<String>,
) -> Result<Json<Lead>, ApiError> {
    let correlation_id = correlation_id();
    let lead_id = LeadId(id);

    let lead = state
        .leads
        .find_by_id(&lead_id)
        .await
        .map_err(|error| ApiError::from_application(error.into(), &correlation_id))?
        .ok_or_else(|| {
            let missing = ApplicationError::NotFound(format!("no lead with id `{}`", lead_id.0));
            ApiError::from_application(missing, &correlation_id)
        })?;
    Ok(Json(lead))
}

async fn list_leads(
    State(state): State<ApiState>,
    params: Result<Query<ListParams>, QueryRejection>,
) -> Result<Json<LeadList>, ApiError> {
    let correlation_id = correlation_id();
    let Query(params) =
        params.map_err(|rejection| ApiError::bad_request(rejection.body_text(), &correlation_id))?;

    let category = match params.category.as_deref().map(str::trim) {
        None | Some("") => None,
        Some(raw) => Some(
            raw.parse::<LeadCategory>()
                .map_err(|message| ApiError::bad_request(message, &correlation_id))?,
        ),
    };
    let query = LeadQuery::new(category, params.page, params.limit);
    let page = state
        .leads
        .list(&query)
        .await
        .map_err(|error| ApiError::from_application(error.into(), &correlation_id))?;

    Ok(Json(LeadList {
        pagination: Pagination { total: page.total, page: page.page, pages: page.pages },
        leads: page.leads,
    }))
}

async fn not_found() -> (StatusCode, Json<ErrorBody>) {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorBody { error: "Not found".to_string(), correlation_id: correlation_id() }),
    )
}
