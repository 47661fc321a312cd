//! ユースケース層の共通ヘルパー

use focuspulse_infra::{InfraError, InfraErrorKind};

use crate::error::CoreError;

/// 保存時の `InfraError` を `CoreError` に変換する
///
/// 楽観的ロック競合は `Conflict`、それ以外は `Internal` になる。
pub(crate) fn map_version_conflict(e: InfraError) -> CoreError {
    match e.kind() {
        InfraErrorKind::Conflict { .. } => CoreError::Conflict(
            "フォーカスセッションは他のリクエストによって更新されました。再試行してください。"
                .to_string(),
        ),
        _ => CoreError::Internal(format!("フォーカスセッションの保存に失敗: {e}")),
    }
}

/// 読み取り時の `InfraError` を `CoreError::Internal` に変換する
pub(crate) fn map_load_error(e: InfraError) -> CoreError {
    CoreError::Internal(format!("フォーカスセッションの取得に失敗: {e}"))
}
