use std::sync::Arc;

use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use chrono::Utc;
use interiq_db::LeadRepository;
use serde::Serialize;
use tracing::warn;

#[derive(Clone)]
pub struct HealthState {
    leads: Arc<dyn LeadRepository>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct StorageCheck {
    pub kind: &'static str,
    pub status: &'static str,
    pub detail: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: &'static str,
    pub storage: StorageCheck,
    pub checked_at: String,
}

pub fn router(leads: Arc<dyn LeadRepository>) -> Router {
    Router::new().route("/api/health", get(health)).with_state(HealthState { leads })
}

pub async fn health(State(state): State<HealthState>) -> (StatusCode, Json<HealthResponse>) {
    let storage = storage_check(state.leads.as_ref()).await;
    let ready = storage.status == "ok";

    let payload = HealthResponse {
        status: if ready { "ok" } else { "degraded" },
        storage,
        checked_at: Utc::now().to_rfc3339(),
    };

    let status_code = if ready { StatusCode::OK } else { StatusCode::SERVICE_UNAVAILABLE };
    (status_code, Json(payload))
}

async fn storage_check(leads: &dyn LeadRepository) -> StorageCheck {
    let kind = leads.storage_kind();
    match leads.ping().await {
        Ok(()) => StorageCheck { kind, status: "ok", detail: "lead store reachable".to_string() },
        Err(error) => {
            warn!(
                event_name = "system.health.storage_degraded",
                correlation_id = "health",
                lead_id = "unknown",
                storage = kind,
                error = %error,
                "lead store health check failed"
            );
            StorageCheck {
                kind,
                status: "degraded",
                detail: format!("lead store check failed: {error}"),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{extract::State, http::StatusCode, Json};
    use interiq_db::{connect_with_settings, InMemoryLeadRepository, SqlLeadRepository};

    use crate::health::{health, HealthState};

    #[tokio::test]
    async fn health_reports_memory_store_ready() {
        let state = HealthState { leads: Arc::new(InMemoryLeadRepository::default()) };

        let (status, Json(payload)) = health(State(state)).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(payload.status, "ok");
        assert_eq!(payload.storage.kind, "memory");
    }

    #[tokio::test]
    async fn health_returns_service_unavailable_when_database_is_unavailable() {
        let pool =
            connect_with_settings("sqlite::memory:", 1, 5).await.expect("pool should connect");
        pool.close().await;
        let state = HealthState { leads: Arc::new(SqlLeadRepository::new(pool)) };

        let (status, Json(payload)) = health(State(state)).await;

        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(payload.status, "degraded");
        assert_eq!(payload.storage.kind, "sqlite");
        assert_eq!(payload.storage.status, "degraded");
    }
}
