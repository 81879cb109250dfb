//! HTTP endpoint handlers for the stage-execution API

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use std::{sync::Arc, time::SystemTime};
use tracing::{error, info, warn};

use crate::execution::{templates, ShellExecutor};
use crate::http::responses::*;
use crate::state::ConfigStore;
use crate::types::Error;

/// Application state shared across handlers
///
/// Holds the store handle, not a cached record: every request reads the
/// config fresh from disk.
#[derive(Clone)]
pub struct AppState {
    pub store: ConfigStore,
    pub executor: ShellExecutor,
    pub start_time: SystemTime,
}

#[derive(Debug, Deserialize)]
pub struct StageParams {
    pub stage: Option<String>,
}

fn is_valid_stage(stage: &str) -> bool {
    !stage.is_empty()
        && stage
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-'))
}

/// GET /api/test - Run the persisted test command for a stage
pub async fn handle_stage(
    State(state): State<Arc<AppState>>,
    Query(params): Query<StageParams>,
) -> Response {
    let stage = match params.stage {
        Some(stage) if is_valid_stage(&stage) => stage,
        Some(stage) => {
            warn!(stage = %stage, "Rejected stage token");
            return Error::Validation {
                field: "stage".to_string(),
                message: "stage may only contain letters, digits, '_' and '-'".to_string(),
            }
            .into_response();
        }
        None => {
            return Error::Validation {
                field: "stage".to_string(),
                message: "stage query parameter is required".to_string(),
            }
            .into_response();
        }
    };

    // Span guard stays inside this block; the subprocess await below must
    // not hold it.
    let command = {
        let _span = crate::logging::stage_span(&stage).entered();

        // Fresh snapshot on every request; a concurrent scaffold may have
        // replaced the record since the last call.
        let config = match state.store.read() {
            Ok(config) => config,
            Err(e) => {
                warn!(error = %e, "No usable codelab config");
                return e.into_response();
            }
        };

        // Narrow the run to tests named for this stage. This prefix is a
        // naming convention, not something the catalog enforces.
        let filter = format!("stage_{stage}_");
        match templates::resolve_marker(&config.testing.command, &filter) {
            Ok(command) => command,
            Err(e) => {
                error!(error = %e, "Stored command template failed to resolve");
                return e.into_response();
            }
        }
    };

    info!(stage = %stage, command = %command, "Executing stage tests");

    match state.executor.run(&command).await {
        Ok(outcome) => {
            if outcome.success() {
                info!(
                    stage = %stage,
                    duration_ms = outcome.duration_ms,
                    stdout = %outcome.stdout,
                    "Stage tests passed"
                );
            } else {
                warn!(
                    stage = %stage,
                    exit_code = ?outcome.exit_code,
                    stdout = %outcome.stdout,
                    stderr = %outcome.stderr,
                    "Stage tests failed"
                );
            }

            let response = StageResponse {
                name: TEMPLATE_NAME,
                stage,
                success: outcome.success(),
                exit_code: outcome.exit_code,
                duration_ms: outcome.duration_ms,
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => {
            error!(error = %e, "Stage test command did not complete");
            e.into_response()
        }
    }
}

/// GET /health - Health check endpoint
pub async fn handle_health(State(state): State<Arc<AppState>>) -> Response {
    let uptime = state
        .start_time
        .elapsed()
        .unwrap_or_default()
        .as_secs();

    let response = HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
        uptime_seconds: uptime,
        config_present: state.store.exists(),
    };

    (StatusCode::OK, Json(response)).into_response()
}

/// Fallback for unknown routes
pub async fn handle_not_found() -> Response {
    let body = serde_json::json!({
        "error": "Not found",
        "code": "NOT_FOUND",
        "timestamp": chrono::Utc::now().to_rfc3339(),
    });
    (StatusCode::NOT_FOUND, Json(body)).into_response()
}
