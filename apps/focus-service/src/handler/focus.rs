//! # フォーカスセッション API ハンドラ
//!
//! ## エンドポイント
//!
//! - `POST /start_focus` - フォーカス開始
//! - `POST /stop_focus` - フォーカス停止
//! - `GET /status/{user_id}` - 現在の状態

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::{DateTime, Utc};
use focuspulse_domain::{
    focus_session::{FocusRecord, FocusSession, FocusSessionStatus, FocusState, StartFocusOptions},
    notification::{focus_started_text, focus_status_text, focus_stopped_text},
    value_objects::{BreakMinutes, PlannedMinutes},
};
use focuspulse_shared::ApiResponse;
use serde::{Deserialize, Deserializer, Serialize, de};

use super::{FocusSessionState, parse_channel_id, parse_user_id};
use crate::error::CoreError;

// --- リクエスト型 ---

/// フォーカス開始リクエスト
///
/// `duration` と `break` はチャットコマンドの引数がそのまま渡されるため、
/// 数値と数字文字列の両方を受け付ける。空文字列は未指定として扱う。
#[derive(Debug, Deserialize)]
pub struct StartFocusRequest {
    pub user_id:       String,
    #[serde(default)]
    pub channel_id:    Option<String>,
    /// フォーカス時間（分）
    #[serde(default, deserialize_with = "deserialize_optional_minutes")]
    pub duration:      Option<u32>,
    /// 休憩時間（分）
    #[serde(default, rename = "break", deserialize_with = "deserialize_optional_minutes")]
    pub break_minutes: Option<u32>,
}

/// フォーカス停止リクエスト
#[derive(Debug, Deserialize)]
pub struct StopFocusRequest {
    pub user_id: String,
}

// --- レスポンス型 ---

/// フォーカスセッション DTO
#[derive(Debug, Serialize)]
pub struct FocusSessionDto {
    pub user_id:                    String,
    pub channel_id:                 Option<String>,
    pub status:                     FocusSessionStatus,
    pub started_at:                 Option<String>,
    pub planned_end_at:             Option<String>,
    pub planned_minutes:            Option<u32>,
    pub break_minutes:              Option<u32>,
    pub active_elapsed_seconds:     u64,
    pub accumulated_active_seconds: u64,
    pub completed_sessions:         u32,
    pub daily_summary_enabled:      bool,
    pub daily_summary_time:         String,
    /// 保持期間内に完了したフォーカス（古い順）
    pub history:                    Vec<FocusRecordDto>,
    pub version:                    u32,
}

/// 完了したフォーカスの DTO
#[derive(Debug, Serialize)]
pub struct FocusRecordDto {
    pub started_at:      String,
    pub ended_at:        String,
    pub elapsed_seconds: u64,
}

impl From<&FocusRecord> for FocusRecordDto {
    fn from(record: &FocusRecord) -> Self {
        Self {
            started_at:      record.started_at.to_rfc3339(),
            ended_at:        record.ended_at.to_rfc3339(),
            elapsed_seconds: record.elapsed_seconds,
        }
    }
}

impl FocusSessionDto {
    /// `as_of` 時点の経過時間を含めて DTO に変換する
    pub fn from_session(session: &FocusSession, as_of: DateTime<Utc>) -> Self {
        let active = match session.state() {
            FocusState::Active(active) => Some(active),
            FocusState::Inactive(_) => None,
        };

        Self {
            user_id:                    session.user_id().to_string(),
            channel_id:                 session.channel_id().map(ToString::to_string),
            status:                     session.status(),
            started_at:                 session.started_at().map(|t| t.to_rfc3339()),
            planned_end_at:             session.planned_end_at().map(|t| t.to_rfc3339()),
            planned_minutes:            active.map(|a| a.planned_minutes.as_u32()),
            break_minutes:              active.map(|a| a.break_minutes.as_u32()),
            active_elapsed_seconds:     session.active_elapsed_seconds(as_of),
            accumulated_active_seconds: session.accumulated_active_seconds(),
            completed_sessions:         session.completed_sessions(),
            daily_summary_enabled:      session.daily_summary().enabled,
            daily_summary_time:         session.daily_summary().time.to_string(),
            history:                    session
                .history()
                .iter()
                .map(FocusRecordDto::from)
                .collect(),
            version:                    session.version().as_u32(),
        }
    }
}

/// フォーカス開始・状態照会のレスポンス
#[derive(Debug, Serialize)]
pub struct FocusSessionResponse {
    /// チャットに返す応答文
    pub message: String,
    pub session: FocusSessionDto,
}

/// フォーカス停止のレスポンス
#[derive(Debug, Serialize)]
pub struct StopFocusResponse {
    pub message:         String,
    /// 今回のフォーカスの経過秒数
    pub elapsed_seconds: u64,
    pub session:         FocusSessionDto,
}

// --- ハンドラ ---

/// POST /start_focus
///
/// ## レスポンス
///
/// - `200 OK`: 開始したセッション
/// - `400 Bad Request`: `user_id` の欠落・不正、分数が範囲外、不正な JSON
/// - `409 Conflict`: 既にフォーカス中、または並行更新との競合
#[tracing::instrument(skip_all)]
pub async fn start_focus(
    State(state): State<Arc<FocusSessionState>>,
    payload: Result<Json<StartFocusRequest>, JsonRejection>,
) -> Result<impl IntoResponse, CoreError> {
    let Json(req) = payload?;
    let user_id = parse_user_id(&req.user_id)?;
    let options = StartFocusOptions {
        channel_id:      parse_channel_id(req.channel_id.as_deref())?,
        planned_minutes: req
            .duration
            .map(PlannedMinutes::new)
            .transpose()?
            .unwrap_or_default(),
        break_minutes:   req
            .break_minutes
            .map(BreakMinutes::new)
            .transpose()?
            .unwrap_or_default(),
    };

    let session = state.usecase.start_focus(user_id, options).await?;

    let FocusState::Active(active) = session.state() else {
        return Err(CoreError::Internal(
            "開始後のセッションが ACTIVE ではありません".to_string(),
        ));
    };
    let response = ApiResponse::new(FocusSessionResponse {
        message: focus_started_text(session.user_id(), active),
        session: FocusSessionDto::from_session(&session, active.started_at),
    });

    Ok((StatusCode::OK, Json(response)))
}

/// POST /stop_focus
///
/// ## レスポンス
///
/// - `200 OK`: 停止後のセッションと今回の経過秒数
/// - `400 Bad Request`: `user_id` の欠落・不正、不正な JSON
/// - `404 Not Found`: 実行中のセッションがない
/// - `409 Conflict`: 並行更新との競合
#[tracing::instrument(skip_all)]
pub async fn stop_focus(
    State(state): State<Arc<FocusSessionState>>,
    payload: Result<Json<StopFocusRequest>, JsonRejection>,
) -> Result<impl IntoResponse, CoreError> {
    let Json(req) = payload?;
    let user_id = parse_user_id(&req.user_id)?;

    let output = state.usecase.stop_focus(user_id).await?;

    let response = ApiResponse::new(StopFocusResponse {
        message:         focus_stopped_text(output.session.user_id(), output.record.elapsed_seconds),
        elapsed_seconds: output.record.elapsed_seconds,
        session:         FocusSessionDto::from_session(&output.session, output.record.ended_at),
    });

    Ok((StatusCode::OK, Json(response)))
}

/// GET /status/{user_id}
///
/// 未登録ユーザーには停止状態・累計 0 を返す。
///
/// ## レスポンス
///
/// - `200 OK`: 現在の状態
/// - `400 Bad Request`: `user_id` が不正
#[tracing::instrument(skip_all, fields(%user_id))]
pub async fn get_status(
    State(state): State<Arc<FocusSessionState>>,
    Path(user_id): Path<String>,
) -> Result<impl IntoResponse, CoreError> {
    let user_id = parse_user_id(&user_id)?;

    let status = state.usecase.get_status(user_id).await?;

    let response = ApiResponse::new(FocusSessionResponse {
        message: focus_status_text(&status.session, status.as_of),
        session: FocusSessionDto::from_session(&status.session, status.as_of),
    });

    Ok((StatusCode::OK, Json(response)))
}

/// 数値・数字文字列・空文字列・null を `Option<u32>` として読み取る
///
/// `45.0` のように小数部が 0 の数値は整数として扱う。
fn deserialize_optional_minutes<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum MinutesInput {
        Number(f64),
        Text(String),
        Other(de::IgnoredAny),
    }

    let invalid = |value: &dyn std::fmt::Display| -> D::Error {
        de::Error::custom(format!("分数は 0 以上の整数である必要があります: {value}"))
    };

    match Option::<MinutesInput>::deserialize(deserializer)? {
        None => Ok(None),
        Some(MinutesInput::Number(n)) => {
            if n.fract() == 0.0 && (0.0..=f64::from(u32::MAX)).contains(&n) {
                Ok(Some(n as u32))
            } else {
                Err(invalid(&n))
            }
        }
        Some(MinutesInput::Text(text)) => {
            let text = text.trim();
            if text.is_empty() {
                return Ok(None);
            }
            text.parse().map(Some).map_err(|_| invalid(&text))
        }
        Some(MinutesInput::Other(_)) => Err(invalid(&"数値でも文字列でもない値")),
    }
}
