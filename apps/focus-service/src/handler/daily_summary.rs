//! # デイリーサマリー API ハンドラ
//!
//! ## エンドポイント
//!
//! - `POST /enable_daily_summary` - デイリーサマリーの有効化（冪等）
//! - `GET /daily_summary/{user_id}` - 当日（UTC）の実績

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
};
use focuspulse_domain::{
    daily_summary::{DailySummary, SummaryTime},
    notification::daily_summary_enabled_text,
};
use focuspulse_shared::ApiResponse;
use serde::{Deserialize, Serialize};

use super::{FocusSessionState, parse_channel_id, parse_user_id};
use crate::error::CoreError;

/// デイリーサマリー有効化リクエスト
#[derive(Debug, Deserialize)]
pub struct EnableDailySummaryRequest {
    pub user_id:    String,
    #[serde(default)]
    pub channel_id: Option<String>,
    /// 配信時刻（`HH:MM`、UTC）。未指定・空文字列なら `21:00`
    #[serde(default)]
    pub time:       Option<String>,
}

/// デイリーサマリー有効化のレスポンス
#[derive(Debug, Serialize)]
pub struct EnableDailySummaryResponse {
    pub message:               String,
    pub user_id:               String,
    pub channel_id:            Option<String>,
    pub daily_summary_enabled: bool,
    pub time:                  String,
}

/// 当日サマリーのレスポンス
#[derive(Debug, Serialize)]
pub struct DailySummaryDto {
    pub message:       String,
    pub user_id:       String,
    pub date:          String,
    pub enabled:       bool,
    pub time:          String,
    pub sessions:      u32,
    pub total_minutes: u64,
    pub total_seconds: u64,
}

impl DailySummaryDto {
    fn new(user_id: String, summary: &DailySummary) -> Self {
        Self {
            message: summary.message(),
            user_id,
            date: summary.date.to_string(),
            enabled: summary.enabled,
            time: summary.time.to_string(),
            sessions: summary.sessions,
            total_minutes: summary.total_minutes(),
            total_seconds: summary.total_seconds,
        }
    }
}

/// POST /enable_daily_summary
///
/// ## レスポンス
///
/// - `200 OK`: 有効化後の設定
/// - `400 Bad Request`: `user_id` の欠落・不正、`time` が `HH:MM` でない、不正な JSON
/// - `409 Conflict`: 並行更新との競合
#[tracing::instrument(skip_all)]
pub async fn enable_daily_summary(
    State(state): State<Arc<FocusSessionState>>,
    payload: Result<Json<EnableDailySummaryRequest>, JsonRejection>,
) -> Result<impl IntoResponse, CoreError> {
    let Json(req) = payload?;
    let user_id = parse_user_id(&req.user_id)?;
    let channel_id = parse_channel_id(req.channel_id.as_deref())?;
    let time = match req.time.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        Some(value) => value.parse::<SummaryTime>()?,
        None => SummaryTime::default(),
    };

    let session = state
        .usecase
        .enable_daily_summary(user_id, channel_id, time)
        .await?;

    let setting = session.daily_summary();
    let response = ApiResponse::new(EnableDailySummaryResponse {
        message:               daily_summary_enabled_text(session.user_id(), setting.time),
        user_id:               session.user_id().to_string(),
        channel_id:            session.channel_id().map(ToString::to_string),
        daily_summary_enabled: setting.enabled,
        time:                  setting.time.to_string(),
    });

    Ok((StatusCode::OK, Json(response)))
}

/// GET /daily_summary/{user_id}
///
/// プラットフォームのスケジューラから呼ばれ、返された `message` がチャンネルに投稿される。
///
/// ## レスポンス
///
/// - `200 OK`: 当日の実績（未登録ユーザーは実績ゼロ）
/// - `400 Bad Request`: `user_id` が不正
#[tracing::instrument(skip_all, fields(%user_id))]
pub async fn get_daily_summary(
    State(state): State<Arc<FocusSessionState>>,
    Path(user_id): Path<String>,
) -> Result<impl IntoResponse, CoreError> {
    let user_id = parse_user_id(&user_id)?;

    let summary = state.usecase.get_daily_summary(&user_id).await?;

    let response = ApiResponse::new(DailySummaryDto::new(user_id.into_string(), &summary));
    Ok((StatusCode::OK, Json(response)))
}
