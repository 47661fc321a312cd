//! # Focus Service エラー定義
//!
//! Focus Service 固有のエラーと、HTTP レスポンスへの変換を定義する。
//!
//! | バリアント | HTTP ステータス |
//! |-----------|----------------|
//! | `BadRequest` | 400 |
//! | `NotFound` | 404 |
//! | `Conflict` | 409 |
//! | `Internal` | 500（detail は固定文言） |

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use focuspulse_domain::DomainError;
use focuspulse_shared::{
    ErrorResponse,
    ProblemKind,
    event_log::error::{category, kind},
};
use thiserror::Error;

/// Focus Service で発生するエラー
#[derive(Debug, Error)]
pub enum CoreError {
    /// 不正なリクエスト（入力値の検証失敗、不正な JSON）
    #[error("不正なリクエスト: {0}")]
    BadRequest(String),

    /// 操作対象が存在しない
    #[error("リソースが見つかりません: {0}")]
    NotFound(String),

    /// 競合（二重開始、楽観的ロック失敗）
    #[error("競合が発生しました: {0}")]
    Conflict(String),

    /// 内部エラー
    #[error("内部エラー: {0}")]
    Internal(String),
}

impl From<DomainError> for CoreError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::Validation(msg) => CoreError::BadRequest(msg),
            DomainError::AlreadyActive { .. } => CoreError::Conflict(err.to_string()),
            DomainError::NoActiveSession { .. } => CoreError::NotFound(err.to_string()),
        }
    }
}

impl From<JsonRejection> for CoreError {
    fn from(rejection: JsonRejection) -> Self {
        CoreError::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for CoreError {
    fn into_response(self) -> Response {
        let body = match &self {
            CoreError::BadRequest(msg) => ErrorResponse::new(ProblemKind::BadRequest, msg),
            CoreError::NotFound(msg) => ErrorResponse::new(ProblemKind::NotFound, msg),
            CoreError::Conflict(msg) => ErrorResponse::new(ProblemKind::Conflict, msg),
            CoreError::Internal(msg) => {
                tracing::error!(
                    error.category = category::INFRASTRUCTURE,
                    error.kind = kind::INTERNAL,
                    "内部エラー: {}",
                    msg
                );
                ErrorResponse::internal_error()
            }
        };

        let status =
            StatusCode::from_u16(body.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;

    async fn into_parts(err: CoreError) -> (StatusCode, ErrorResponse) {
        let response = err.into_response();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&body).unwrap())
    }

    #[rstest]
    #[case::validation(DomainError::Validation("ユーザー ID は必須です".to_string()), StatusCode::BAD_REQUEST)]
    #[case::already_active(DomainError::AlreadyActive { user_id: "u1".to_string() }, StatusCode::CONFLICT)]
    #[case::no_active_session(DomainError::NoActiveSession { user_id: "u1".to_string() }, StatusCode::NOT_FOUND)]
    #[tokio::test]
    async fn test_ドメインエラーが対応するステータスに変換される(
        #[case] err: DomainError,
        #[case] expected: StatusCode,
    ) {
        let (status, body) = into_parts(CoreError::from(err)).await;

        assert_eq!(status, expected);
        assert_eq!(body.status, expected.as_u16());
    }

    #[tokio::test]
    async fn test_二重開始のdetailにユーザーidが含まれる() {
        let err = CoreError::from(DomainError::AlreadyActive {
            user_id: "u1".to_string(),
        });

        let (_, body) = into_parts(err).await;

        assert_eq!(body.title, "Conflict");
        assert_eq!(body.detail, "フォーカスセッションは既に実行中です: u1");
    }

    #[tokio::test]
    async fn test_内部エラーのdetailは固定文言になる() {
        let (status, body) = into_parts(CoreError::Internal("redis down".to_string())).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body.detail, "内部エラーが発生しました");
    }
}
