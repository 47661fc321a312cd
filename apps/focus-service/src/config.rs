//! # Focus Service 設定
//!
//! 環境変数から Focus Service サーバーの設定を読み込む。
//!
//! | 変数 | 既定値 | 用途 |
//! |------|--------|------|
//! | `FOCUS_HOST` | `0.0.0.0` | バインドアドレス |
//! | `FOCUS_PORT` | `5000` | ポート番号 |
//! | `TELEX_WEBHOOK_URL` | なし | 通知 Webhook（未設定で Noop） |
//! | `NOTIFICATION_TIMEOUT_SECS` | `5` | Webhook のタイムアウト秒数 |
//! | `REDIS_URL` | なし | 設定時は Redis、未設定はインメモリ |

use std::{env, time::Duration};

use anyhow::Context as _;

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 5000;
const DEFAULT_NOTIFICATION_TIMEOUT_SECS: u64 = 5;

/// Focus Service サーバーの設定
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FocusConfig {
    /// バインドアドレス
    pub host:         String,
    /// ポート番号
    pub port:         u16,
    /// セッションストアの接続先（None ならインメモリ）
    pub redis_url:    Option<String>,
    /// 通知設定
    pub notification: NotificationConfig,
}

/// 通知機能の設定
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationConfig {
    /// 送信先 Webhook URL（None なら送信せずログ出力のみ）
    pub webhook_url: Option<String>,
    /// 1 リクエストあたりのタイムアウト
    pub timeout:     Duration,
}

impl FocusConfig {
    /// 環境変数から設定を読み込む
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// 任意のキー検索関数から設定を読み込む
    ///
    /// 空文字列は未設定として扱う。
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let port = match get("FOCUS_PORT") {
            Some(value) => value
                .parse()
                .with_context(|| format!("FOCUS_PORT は有効なポート番号である必要があります: {value}"))?,
            None => DEFAULT_PORT,
        };

        let timeout_secs = match get("NOTIFICATION_TIMEOUT_SECS") {
            Some(value) => value.parse().with_context(|| {
                format!("NOTIFICATION_TIMEOUT_SECS は秒数である必要があります: {value}")
            })?,
            None => DEFAULT_NOTIFICATION_TIMEOUT_SECS,
        };

        Ok(Self {
            host: get("FOCUS_HOST").unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port,
            redis_url: get("REDIS_URL"),
            notification: NotificationConfig {
                webhook_url: get("TELEX_WEBHOOK_URL"),
                timeout:     Duration::from_secs(timeout_secs),
            },
        })
    }
}
