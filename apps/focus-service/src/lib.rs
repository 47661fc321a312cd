//! # Focus Service ライブラリ
//!
//! チャットプラットフォームからの Webhook を受けて、ユーザーごとの
//! フォーカスセッションを管理する HTTP サービス。
//!
//! バイナリ（`main.rs`）と統合テストから使うため、各層をライブラリとして公開する。

pub mod app_builder;
pub mod config;
pub mod error;
pub mod handler;
pub mod usecase;
