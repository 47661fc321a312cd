//! # HTTP リクエストハンドラ
//!
//! axum のルートに対応するハンドラ関数を定義する。
//!
//! ## 設計方針
//!
//! - 各ハンドラはサブモジュールに配置し、ここで re-export する
//! - ハンドラは薄く保ち、ロジックはユースケース層に委譲
//! - JSON ボディは `Result<Json<T>, JsonRejection>` で受け取り、
//!   パース失敗を 400 の `ErrorResponse` に変換する

pub mod daily_summary;
pub mod focus;
pub mod health;
pub mod integration;

pub use daily_summary::{enable_daily_summary, get_daily_summary};
pub use focus::{get_status, start_focus, stop_focus};
pub use health::{ReadinessState, health_check, readiness_check};
pub use integration::get_integration;

use focuspulse_domain::user::{ChannelId, UserId};

use crate::{error::CoreError, usecase::FocusUseCaseImpl};

/// フォーカスセッション API の共有状態
pub struct FocusSessionState {
    pub usecase: FocusUseCaseImpl,
}

/// リクエストの `user_id` を検証する
pub(crate) fn parse_user_id(raw: &str) -> Result<UserId, CoreError> {
    Ok(UserId::new(raw)?)
}

/// 任意の `channel_id` を検証する（空文字列は未指定として扱う）
pub(crate) fn parse_channel_id(raw: Option<&str>) -> Result<Option<ChannelId>, CoreError> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        Some(value) => Ok(Some(ChannelId::new(value)?)),
        None => Ok(None),
    }
}
