//! Webhook 通知送信実装
//!
//! チャットプラットフォームの受信 Webhook に
//! `{"channel_id": ..., "text": ...}` を JSON で POST する。

use std::time::Duration;

use async_trait::async_trait;
use focuspulse_domain::notification::{ChannelMessage, NotificationError};

use super::NotificationSender;

/// Webhook 経由の通知送信
#[derive(Debug, Clone)]
pub struct WebhookNotificationSender {
    client:      reqwest::Client,
    webhook_url: String,
}

impl WebhookNotificationSender {
    /// 新しい送信者を作成する
    ///
    /// # 引数
    ///
    /// - `webhook_url`: 送信先 URL
    /// - `timeout`: 1 リクエストあたりのタイムアウト
    pub fn new(webhook_url: impl Into<String>, timeout: Duration) -> Result<Self, NotificationError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| NotificationError::SendFailed(e.to_string()))?;

        Ok(Self {
            client,
            webhook_url: webhook_url.into(),
        })
    }
}

#[async_trait]
impl NotificationSender for WebhookNotificationSender {
    #[tracing::instrument(skip_all, fields(channel_id = %message.channel_id))]
    async fn send(&self, message: &ChannelMessage) -> Result<(), NotificationError> {
        let response = self
            .client
            .post(&self.webhook_url)
            .json(message)
            .send()
            .await
            .map_err(|e| NotificationError::SendFailed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(NotificationError::Rejected {
                status: status.as_u16(),
            });
        }

        tracing::debug!(status = status.as_u16(), "Webhook 送信完了");
        Ok(())
    }
}
