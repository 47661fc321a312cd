//! # FocusPulse インフラストラクチャ層
//!
//! 外部システムとの接続を担当するクレート。
//!
//! ## 責務
//!
//! - **セッションストア**: フォーカスセッションの保存と楽観的ロック
//!   （インメモリ / Redis）
//! - **チャンネル通知**: チャットプラットフォームの Webhook への投稿
//!
//! ## 設計方針
//!
//! - **依存性逆転**: ユースケース層はトレイトにのみ依存し、具体実装は起動時に注入する
//! - **エラー変換**: 外部ライブラリのエラーは [`InfraError`] に集約する
//!
//! ## モジュール構成
//!
//! - [`error`]: インフラ層エラー定義
//! - [`notification`]: 通知送信トレイトと実装
//! - [`repository`]: フォーカスセッションリポジトリ

pub mod error;
pub mod notification;
pub mod repository;

pub use error::{InfraError, InfraErrorKind};
