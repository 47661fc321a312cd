//! # ルーター構築
//!
//! ハンドラの State を受け取り、ルーティングとミドルウェアを組み立てる。
//! `main` と統合テストの双方から同じ構成で使う。
//!
//! ## レイヤー構成
//!
//! ```text
//! SetRequestIdLayer → PropagateRequestIdLayer → ┬ /health, /health/ready
//!                                               └ TraceLayer（Canonical Log Line）→ API ルート
//! ```
//!
//! ヘルスチェックは TraceLayer の外に置き、リクエストログを出さない。

use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};
use focuspulse_shared::observability::{CanonicalLogLine, MakeRequestUuidV7, make_request_span};
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

use crate::handler::{
    FocusSessionState,
    ReadinessState,
    enable_daily_summary,
    get_daily_summary,
    get_integration,
    get_status,
    health_check,
    readiness_check,
    start_focus,
    stop_focus,
};

/// アプリケーションのルーターを構築する
pub fn build_router(
    focus_state: Arc<FocusSessionState>,
    readiness_state: Arc<ReadinessState>,
) -> Router {
    let api = Router::new()
        .route("/start_focus", post(start_focus))
        .route("/stop_focus", post(stop_focus))
        .route("/status/{user_id}", get(get_status))
        .route("/enable_daily_summary", post(enable_daily_summary))
        .route("/daily_summary/{user_id}", get(get_daily_summary))
        .with_state(focus_state)
        .route("/integration.json", get(get_integration))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(make_request_span)
                .on_response(CanonicalLogLine),
        );

    let health = Router::new()
        .route("/health", get(health_check))
        .route("/health/ready", get(readiness_check))
        .with_state(readiness_state);

    // 下に書いたものが外側
    Router::new()
        .merge(health)
        .merge(api)
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuidV7))
}
