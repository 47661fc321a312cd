//! # チャンネル通知送信
//!
//! チャットチャンネルへのメッセージ送信を担当するインフラストラクチャモジュール。
//!
//! ## 設計方針
//!
//! - **trait による抽象化**: `NotificationSender` trait で送信手段を抽象化
//! - **2 つの実装**: Webhook（本番用）、Noop（Webhook URL 未設定時・テスト用）
//! - **環境変数切替**: `TELEX_WEBHOOK_URL` の有無でランタイム選択

mod noop;
mod webhook;

use async_trait::async_trait;
use focuspulse_domain::notification::{ChannelMessage, NotificationError};
pub use noop::NoopNotificationSender;
pub use webhook::WebhookNotificationSender;

/// チャンネル通知送信トレイト
#[async_trait]
pub trait NotificationSender: Send + Sync {
    /// メッセージを送信する
    async fn send(&self, message: &ChannelMessage) -> Result<(), NotificationError>;
}
