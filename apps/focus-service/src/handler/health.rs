//! # ヘルスチェックハンドラ
//!
//! ```text
//! GET /health        {"status": "healthy", "version": "0.1.0"}
//! GET /health/ready  {"status": "ready", "checks": {"session_store": "ok"}}
//! ```
//!
//! readiness はセッションストアへの `ping` が失敗すると 503 を返す。
//! インメモリストアでは常に ready になる。

use std::sync::Arc;

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use focuspulse_infra::repository::FocusSessionRepository;
use serde::Serialize;

/// readiness チェックの State
pub struct ReadinessState {
    pub repository: Arc<dyn FocusSessionRepository>,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status:  &'static str,
    pub version: &'static str,
}

/// 依存先ごとの疎通結果
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckStatus {
    Ok,
    Error,
}

#[derive(Debug, Serialize)]
pub struct ReadinessChecks {
    pub session_store: CheckStatus,
}

#[derive(Debug, Serialize)]
pub struct ReadinessResponse {
    /// `"ready"` または `"not_ready"`
    pub status: &'static str,
    pub checks: ReadinessChecks,
}

/// GET /health
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status:  "healthy",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// GET /health/ready
pub async fn readiness_check(State(state): State<Arc<ReadinessState>>) -> impl IntoResponse {
    let session_store = match state.repository.ping().await {
        Ok(()) => CheckStatus::Ok,
        Err(e) => {
            tracing::warn!(error = %e, "セッションストアの疎通確認に失敗");
            CheckStatus::Error
        }
    };

    let (status_code, status) = match session_store {
        CheckStatus::Ok => (StatusCode::OK, "ready"),
        CheckStatus::Error => (StatusCode::SERVICE_UNAVAILABLE, "not_ready"),
    };

    (
        status_code,
        Json(ReadinessResponse {
            status,
            checks: ReadinessChecks { session_store },
        }),
    )
}
