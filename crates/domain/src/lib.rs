//! # FocusPulse ドメイン層
//!
//! フォーカスセッションのライフサイクルを担うドメインモデルを定義する。
//!
//! ## 設計方針
//!
//! - **エンティティ**: 一意の識別子を持つオブジェクト（例: FocusSession）
//! - **値オブジェクト**: 識別子を持たない不変オブジェクト（例: UserId,
//!   SummaryTime）
//! - **ステートマシン**: ACTIVE / INACTIVE を ADT で表現し、不正な状態を型で排除
//! - **ドメインエラー**: ビジネスルール違反を表現するエラー型
//!
//! ## 依存関係の方向
//!
//! ```text
//! service → infra → domain
//! ```
//!
//! ドメイン層はインフラ層（Redis、Webhook）には一切依存しない。
//!
//! ## モジュール構成
//!
//! - [`clock`] - 時刻プロバイダ
//! - [`daily_summary`] - デイリーサマリー設定と集計
//! - [`error`] - ドメイン層で発生するエラーの定義
//! - [`focus_session`] - フォーカスセッションエンティティ
//! - [`notification`] - チャンネル通知メッセージ
//! - [`user`] - ユーザー・チャンネル識別子
//! - [`value_objects`] - 共通値オブジェクト
//!
//! ## 使用例
//!
//! ```rust
//! use focuspulse_domain::{DomainError, user::UserId};
//!
//! let user_id = UserId::new("u123").unwrap();
//! assert_eq!(user_id.as_str(), "u123");
//!
//! let error = UserId::new("   ").unwrap_err();
//! assert!(matches!(error, DomainError::Validation(_)));
//! ```

#[macro_use]
mod macros;

pub mod clock;
pub mod daily_summary;
pub mod error;
pub mod focus_session;
pub mod notification;
pub mod user;
pub mod value_objects;

pub use error::DomainError;
