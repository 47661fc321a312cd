//! # チャンネル通知
//!
//! チャットチャンネルへ投稿するメッセージ、通知文の組み立て、送信時のエラーを定義する。
//! 送信手段（Webhook など）はインフラ層の `NotificationSender` が担う。

use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;

use crate::{
    daily_summary::SummaryTime,
    focus_session::{ActiveState, FocusSession, FocusState},
    user::{ChannelId, UserId},
};

/// 通知送信エラー
#[derive(Debug, Error)]
pub enum NotificationError {
    /// 送信先への接続・送信に失敗
    #[error("通知の送信に失敗: {0}")]
    SendFailed(String),

    /// 送信先がエラーステータスを返した
    #[error("通知先がエラーを返しました: status={status}")]
    Rejected {
        /// HTTP ステータスコード
        status: u16,
    },
}

/// チャンネルに投稿するメッセージ
///
/// Webhook へは `{"channel_id": ..., "text": ...}` の JSON として送られる。
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChannelMessage {
    pub channel_id: ChannelId,
    pub text:       String,
}

impl ChannelMessage {
    pub fn new(channel_id: ChannelId, text: impl Into<String>) -> Self {
        Self {
            channel_id,
            text: text.into(),
        }
    }
}

/// チャット上のメンション表記（`<@user>`）
pub fn mention(user_id: &UserId) -> String {
    format!("<@{}>", user_id.as_str())
}

/// フォーカス開始の通知文
pub fn focus_started_text(user_id: &UserId, active: &ActiveState) -> String {
    format!(
        "🚀 {} started a {}-minute focus session with a {}-minute break to follow.",
        mention(user_id),
        active.planned_minutes.as_u32(),
        active.break_minutes.as_u32()
    )
}

/// フォーカス停止の通知文
pub fn focus_stopped_text(user_id: &UserId, elapsed_seconds: u64) -> String {
    format!(
        "🛑 Focus session stopped for {} after {}.",
        mention(user_id),
        format_elapsed(elapsed_seconds)
    )
}

/// 現在の状態を表す応答文
pub fn focus_status_text(session: &FocusSession, as_of: DateTime<Utc>) -> String {
    match session.state() {
        FocusState::Active(active) => {
            let elapsed = session.active_elapsed_seconds(as_of);
            let planned = u64::from(active.planned_minutes.as_u32()) * 60;
            format!(
                "🟢 {} is focusing: {} elapsed, {} remaining.",
                mention(session.user_id()),
                format_elapsed(elapsed),
                format_elapsed(planned.saturating_sub(elapsed))
            )
        }
        FocusState::Inactive(_) => format!(
            "⚪ {} is not in a focus session. Total focused time: {}.",
            mention(session.user_id()),
            format_elapsed(session.accumulated_active_seconds())
        ),
    }
}

/// デイリーサマリー有効化の通知文
pub fn daily_summary_enabled_text(user_id: &UserId, time: SummaryTime) -> String {
    format!(
        "📅 Daily focus summary enabled for {} at {time} UTC.",
        mention(user_id)
    )
}

/// 経過秒数を `1h 2m 3s` 形式にする（0 の単位は省略、ただし秒のみの場合は常に出力）
pub fn format_elapsed(seconds: u64) -> String {
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    let secs = seconds % 60;

    let mut parts = Vec::new();
    if hours > 0 {
        parts.push(format!("{hours}h"));
    }
    if minutes > 0 {
        parts.push(format!("{minutes}m"));
    }
    if secs > 0 || parts.is_empty() {
        parts.push(format!("{secs}s"));
    }
    parts.join(" ")
}
