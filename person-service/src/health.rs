//! Health check handlers

use std::collections::HashMap;

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::{Deserialize, Serialize};

use crate::repository::PersonStore;
use crate::state::AppState;

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,

    pub service: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ReadinessResponse {
    pub ready: bool,

    pub service: String,

    pub dependencies: HashMap<String, DependencyStatus>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DependencyStatus {
    pub healthy: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Liveness: always 200 while the process serves requests
pub async fn health<S: PersonStore>(State(state): State<AppState<S>>) -> impl IntoResponse {
    let response = HealthResponse {
        status: "healthy".to_string(),
        service: state.config().service.name.clone(),
        version: Some(env!("CARGO_PKG_VERSION").to_string()),
    };

    (StatusCode::OK, Json(response))
}

/// Readiness: 200 when the store answers a `count` probe, 503 otherwise
pub async fn readiness<S: PersonStore>(State(state): State<AppState<S>>) -> impl IntoResponse {
    let mut dependencies = HashMap::new();

    let store_status = match state.store().count().await {
        Ok(count) => DependencyStatus {
            healthy: true,
            message: Some(format!("{} people stored", count)),
        },
        Err(e) => {
            tracing::error!(error = %e, "Store readiness check failed");
            DependencyStatus {
                healthy: false,
                message: Some("Store unavailable".to_string()),
            }
        }
    };
    let ready = store_status.healthy;
    dependencies.insert("store".to_string(), store_status);

    let response = ReadinessResponse {
        ready,
        service: state.config().service.name.clone(),
        dependencies,
    };

    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (status, Json(response))
}
