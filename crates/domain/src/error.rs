//! # ドメイン層エラー定義
//!
//! ビジネスルール違反やドメイン固有の例外状態を表現するエラー型。
//!
//! ## エラーの種類と HTTP ステータスの対応
//!
//! | エラー種別 | HTTP ステータス | 用途 |
//! |-----------|----------------|------|
//! | `Validation` | 400 Bad Request | 入力値の検証失敗 |
//! | `AlreadyActive` | 409 Conflict | 実行中のセッションを再開始しようとした |
//! | `NoActiveSession` | 404 Not Found | 停止対象のセッションが存在しない |
//!
//! ## 使用例
//!
//! ```rust
//! use focuspulse_domain::DomainError;
//!
//! fn validate_minutes(minutes: u32) -> Result<(), DomainError> {
//!     if minutes == 0 {
//!         return Err(DomainError::Validation("分数は 1 以上です".to_string()));
//!     }
//!     Ok(())
//! }
//!
//! assert!(validate_minutes(0).is_err());
//! ```

use thiserror::Error;

/// ドメイン層で発生するエラー
///
/// API 層でこのエラーを受け取り、適切な HTTP レスポンスに変換する。
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DomainError {
    /// バリデーションエラー
    ///
    /// 入力値がビジネスルールに違反している場合に使用する。
    ///
    /// # 例
    ///
    /// - 必須フィールドが未入力
    /// - 文字数制限の超過
    /// - 不正なフォーマット（`HH:MM` 以外の時刻など）
    #[error("バリデーションエラー: {0}")]
    Validation(String),

    /// フォーカスセッションが既に実行中
    ///
    /// 二重開始は冪等に扱わず、明示的に拒否する。
    #[error("フォーカスセッションは既に実行中です: {user_id}")]
    AlreadyActive {
        /// 対象ユーザーの識別子
        user_id: String,
    },

    /// 停止できるフォーカスセッションが存在しない
    ///
    /// レコードが存在しない場合と、既に停止済みの場合の両方で使用する。
    #[error("実行中のフォーカスセッションがありません: {user_id}")]
    NoActiveSession {
        /// 対象ユーザーの識別子
        user_id: String,
    },
}
