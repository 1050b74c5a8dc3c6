//! Health check endpoint.

use actix_web::{HttpResponse, web};
use serde::Serialize;

use crate::state::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub store: &'static str,
    pub timestamp: String,
}

/// Health check endpoint - returns server status.
///
/// GET /api/health
pub async fn health_check(state: web::Data<AppState>) -> HttpResponse {
    let healthy = store_reachable(&state).await;

    let response = HealthResponse {
        status: if healthy { "ok" } else { "degraded" },
        version: env!("CARGO_PKG_VERSION"),
        store: state.store_kind(),
        timestamp: chrono::Utc::now().to_rfc3339(),
    };

    if healthy {
        HttpResponse::Ok().json(response)
    } else {
        HttpResponse::ServiceUnavailable().json(response)
    }
}

async fn store_reachable(state: &AppState) -> bool {
    #[cfg(feature = "postgres")]
    if let Some(store) = &state.store {
        if let Err(e) = store.ping().await {
            tracing::warn!(error = %e, "Document store ping failed");
            return false;
        }
    }
    #[cfg(not(feature = "postgres"))]
    let _ = state;
    true
}
