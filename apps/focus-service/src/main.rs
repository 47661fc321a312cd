//! # Focus Service サーバー
//!
//! ## 起動方法
//!
//! ```bash
//! cargo run -p focuspulse-service
//! ```
//!
//! 設定は環境変数（または `.env`）から読み込む。

use std::{net::SocketAddr, sync::Arc};

use anyhow::Context as _;
use focuspulse_domain::clock::SystemClock;
use focuspulse_infra::{
    notification::{NoopNotificationSender, NotificationSender, WebhookNotificationSender},
    repository::{
        FocusSessionRepository,
        InMemoryFocusSessionRepository,
        RedisFocusSessionRepository,
    },
};
use focuspulse_service::{
    app_builder::build_router,
    config::{FocusConfig, NotificationConfig},
    handler::{FocusSessionState, ReadinessState},
    usecase::FocusUseCaseImpl,
};
use focuspulse_shared::observability::{TracingConfig, init_tracing};
use tokio::net::TcpListener;

const SERVICE_NAME: &str = "focus-service";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    init_tracing(TracingConfig::from_env(SERVICE_NAME));
    let _app_span = tracing::info_span!("app", service = SERVICE_NAME).entered();

    let config = FocusConfig::from_env().context("設定の読み込みに失敗しました")?;

    let repository = build_repository(&config).await?;
    let notifier = build_notifier(&config.notification)?;

    let usecase = FocusUseCaseImpl::new(repository.clone(), notifier, Arc::new(SystemClock));
    let app = build_router(
        Arc::new(FocusSessionState { usecase }),
        Arc::new(ReadinessState { repository }),
    );

    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .with_context(|| format!("不正なバインドアドレス: {}:{}", config.host, config.port))?;
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("{addr} への bind に失敗しました"))?;
    tracing::info!("Focus Service サーバーを起動します: {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("サーバーが異常終了しました")?;

    tracing::info!("Focus Service サーバーを停止しました");
    Ok(())
}

/// `REDIS_URL` があれば Redis、なければインメモリのリポジトリを作る
async fn build_repository(config: &FocusConfig) -> anyhow::Result<Arc<dyn FocusSessionRepository>> {
    match &config.redis_url {
        Some(url) => {
            let repository = RedisFocusSessionRepository::new(url)
                .await
                .context("Redis への接続に失敗しました")?;
            tracing::info!("セッションストア: Redis");
            Ok(Arc::new(repository))
        }
        None => {
            tracing::info!("セッションストア: インメモリ（プロセス終了でデータは失われます）");
            Ok(Arc::new(InMemoryFocusSessionRepository::new()))
        }
    }
}

/// `TELEX_WEBHOOK_URL` があれば Webhook、なければ Noop の通知送信を作る
fn build_notifier(
    config: &NotificationConfig,
) -> anyhow::Result<Arc<dyn NotificationSender>> {
    match &config.webhook_url {
        Some(url) => {
            let sender = WebhookNotificationSender::new(url.clone(), config.timeout)
                .context("Webhook クライアントの作成に失敗しました")?;
            tracing::info!("通知: Webhook");
            Ok(Arc::new(sender))
        }
        None => {
            tracing::info!("通知: Noop（TELEX_WEBHOOK_URL 未設定）");
            Ok(Arc::new(NoopNotificationSender))
        }
    }
}

/// Ctrl+C を待つ
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "シグナルハンドラの登録に失敗");
    }
}
