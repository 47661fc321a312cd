//! # ビジネスイベントログとエラーコンテキストの構造化ヘルパー
//!
//! `jq` でログを調査しやすいよう、ログフィールドの命名規約とヘルパーマクロを提供する。
//!
//! ## ビジネスイベント
//!
//! [`log_business_event!`] マクロで出力する。`event.kind = "business_event"` マーカーが
//! 自動付与され、`jq 'select(.["event.kind"] == "business_event")'` でフィルタできる。
//!
//! ## エラーコンテキスト
//!
//! `tracing::error!` に `error.category` + `error.kind` フィールドを直接追加する。
//! 定数は [`error`] モジュールで提供。

/// ビジネスイベントを構造化ログとして出力する。
///
/// `event.kind = "business_event"` マーカーを自動付与し、
/// `tracing::info!` レベルで出力する。
///
/// ## 必須フィールド（慣例）
///
/// - `event.category`: [`event::category`] の定数
/// - `event.action`: [`event::action`] の定数
/// - `event.entity_type` / `event.entity_id`: 対象エンティティ
/// - `event.result`: [`event::result`] の定数
///
/// ```ignore
/// log_business_event!(
///     event.category = event::category::FOCUS,
///     event.action = event::action::FOCUS_STARTED,
///     event.entity_type = event::entity_type::FOCUS_SESSION,
///     event.entity_id = %user_id,
///     event.result = event::result::SUCCESS,
///     "フォーカスセッション開始"
/// );
/// ```
#[macro_export]
macro_rules! log_business_event {
    ($($args:tt)*) => {
        ::tracing::info!(
            event.kind = "business_event",
            $($args)*
        )
    };
}

/// イベントフィールドの定数
pub mod event {
    /// イベントカテゴリ
    pub mod category {
        pub const FOCUS: &str = "focus";
        pub const DAILY_SUMMARY: &str = "daily_summary";
        pub const NOTIFICATION: &str = "notification";
    }

    /// イベントアクション
    pub mod action {
        // フォーカスセッション
        pub const FOCUS_STARTED: &str = "focus.started";
        pub const FOCUS_STOPPED: &str = "focus.stopped";

        // デイリーサマリー
        pub const DAILY_SUMMARY_ENABLED: &str = "daily_summary.enabled";

        // 通知
        pub const NOTIFICATION_SENT: &str = "notification.sent";
        pub const NOTIFICATION_FAILED: &str = "notification.failed";
    }

    /// エンティティ種別
    pub mod entity_type {
        pub const FOCUS_SESSION: &str = "focus_session";
        pub const CHANNEL: &str = "channel";
    }

    /// イベント結果
    pub mod result {
        pub const SUCCESS: &str = "success";
        pub const FAILURE: &str = "failure";
    }
}

/// エラーコンテキストフィールドの定数
pub mod error {
    /// エラーカテゴリ
    pub mod category {
        /// インフラストラクチャ（セッションストア）
        pub const INFRASTRUCTURE: &str = "infrastructure";
        /// 外部サービス呼び出し（通知 Webhook）
        pub const EXTERNAL_SERVICE: &str = "external_service";
    }

    /// エラー種別
    pub mod kind {
        pub const SESSION_STORE: &str = "session_store";
        pub const WEBHOOK: &str = "webhook";
        pub const INTERNAL: &str = "internal";
    }
}
