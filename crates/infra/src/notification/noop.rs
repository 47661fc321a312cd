//! Noop 通知送信実装
//!
//! メッセージを実際に送信せず、ログ出力のみ行う。
//! Webhook URL 未設定時やテスト環境で使用する。

use async_trait::async_trait;
use focuspulse_domain::notification::{ChannelMessage, NotificationError};

use super::NotificationSender;

/// Noop 通知送信（ログ出力のみ）
#[derive(Debug, Clone)]
pub struct NoopNotificationSender;

#[async_trait]
impl NotificationSender for NoopNotificationSender {
    async fn send(&self, message: &ChannelMessage) -> Result<(), NotificationError> {
        tracing::info!(
            channel_id = %message.channel_id,
            text = %message.text,
            "Noop: TELEX_WEBHOOK_URL 未設定のため送信をスキップ"
        );
        Ok(())
    }
}
