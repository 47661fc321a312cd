//! # エラーレスポンス（RFC 9457 Problem Details）
//!
//! FocusPulse の API が返す問題の種類は [`ProblemKind`] の 4 つに限られる。
//! `type` / `title` / `status` は種類から決まり、呼び出し側は `detail` だけを渡す。
//!
//! axum の `IntoResponse` への変換はサービス側で行う。

use serde::{Deserialize, Serialize};

/// 問題の種類
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProblemKind {
    /// 入力不備（`user_id` 欠落、範囲外の分数、不正な時刻、不正な JSON）
    BadRequest,
    /// 停止対象のセッションがない
    NotFound,
    /// 二重開始、楽観的ロック競合
    Conflict,
    /// ストア障害など
    Internal,
}

impl ProblemKind {
    /// HTTP ステータスコード
    pub fn status(self) -> u16 {
        match self {
            Self::BadRequest => 400,
            Self::NotFound => 404,
            Self::Conflict => 409,
            Self::Internal => 500,
        }
    }

    fn slug(self) -> &'static str {
        match self {
            Self::BadRequest => "bad-request",
            Self::NotFound => "not-found",
            Self::Conflict => "conflict",
            Self::Internal => "internal-error",
        }
    }

    fn title(self) -> &'static str {
        match self {
            Self::BadRequest => "Bad Request",
            Self::NotFound => "Not Found",
            Self::Conflict => "Conflict",
            Self::Internal => "Internal Server Error",
        }
    }
}

/// エラーレスポンス本文
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// `https://focuspulse.example.com/errors/{slug}`
    #[serde(rename = "type")]
    pub error_type: String,
    pub title:      String,
    pub status:     u16,
    pub detail:     String,
}

impl ErrorResponse {
    pub fn new(kind: ProblemKind, detail: impl Into<String>) -> Self {
        Self {
            error_type: format!("https://focuspulse.example.com/errors/{}", kind.slug()),
            title:      kind.title().to_string(),
            status:     kind.status(),
            detail:     detail.into(),
        }
    }

    /// 500 用。原因はログにのみ出し、`detail` は固定文言にする
    pub fn internal_error() -> Self {
        Self::new(ProblemKind::Internal, "内部エラーが発生しました")
    }
}
