//! フォーカスセッション API 統合テスト
//!
//! `build_router` で組み立てた本番と同じルーターに対して `oneshot` でリクエストを送り、
//! 複数操作を横断したレスポンスの整合性を検証する。
//!
//! ## テストケース
//!
//! - 開始 → 状態照会で ACTIVE、10 秒後に停止 → 累計 10 秒
//! - 二重開始は 409、未開始の停止は 404
//! - 未登録ユーザーの状態は INACTIVE / 累計 0
//! - デイリーサマリーの二重有効化は冪等
//! - 入力不備（user_id 欠落・空、不正な JSON、範囲外の分数、不正な時刻）は 400
//! - 同一ユーザーへの並行開始は一方のみ成功
//! - 通知 Webhook が失敗してもリクエストは成功
//! - 通知の送信が遅くてもレスポンスは待たされない

use std::{
    sync::{Arc, Mutex},
    time::{Duration, Instant},
};

use async_trait::async_trait;
use axum::{
    Json,
    Router,
    body::Body,
    extract::State,
    http::{Method, Request, StatusCode, header},
    routing::post,
};
use chrono::{DateTime, TimeZone, Utc};
use focuspulse_domain::{
    clock::ManualClock,
    notification::{ChannelMessage, NotificationError},
};
use focuspulse_infra::{
    notification::{NoopNotificationSender, NotificationSender, WebhookNotificationSender},
    repository::InMemoryFocusSessionRepository,
};
use focuspulse_service::{
    app_builder::build_router,
    handler::{FocusSessionState, ReadinessState},
    usecase::FocusUseCaseImpl,
};
use pretty_assertions::assert_eq;
use rstest::rstest;
use serde_json::{Value as JsonValue, json};
use tokio::net::TcpListener;
use tower::ServiceExt;

// --- テストヘルパー ---

fn start_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 2, 9, 0, 0).unwrap()
}

struct TestApp {
    router: Router,
    clock:  Arc<ManualClock>,
}

fn create_test_app() -> TestApp {
    create_test_app_with_notifier(Arc::new(NoopNotificationSender))
}

fn create_test_app_with_notifier(notifier: Arc<dyn NotificationSender>) -> TestApp {
    let repository = Arc::new(InMemoryFocusSessionRepository::new());
    let clock = Arc::new(ManualClock::new(start_time()));
    let usecase = FocusUseCaseImpl::new(repository.clone(), notifier, clock.clone());
    let router = build_router(
        Arc::new(FocusSessionState { usecase }),
        Arc::new(ReadinessState { repository }),
    );
    TestApp { router, clock }
}

fn post_json(uri: &str, body: JsonValue) -> Request<Body> {
    post_raw(uri, body.to_string())
}

fn post_raw(uri: &str, body: impl Into<String>) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.into()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

/// リクエストを送り、ステータスと JSON ボディを返す
async fn send(app: &Router, request: Request<Body>) -> (StatusCode, JsonValue) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if body.is_empty() {
        JsonValue::Null
    } else {
        serde_json::from_slice(&body).unwrap()
    };
    (status, json)
}

// --- ライフサイクル ---

#[tokio::test]
async fn test_開始から停止までで累計時間が加算される() {
    let app = create_test_app();

    let (status, body) = send(
        &app.router,
        post_json("/start_focus", json!({"user_id": "u1", "channel_id": "c1"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["session"]["status"], "ACTIVE");
    assert_eq!(
        body["data"]["message"],
        "🚀 <@u1> started a 25-minute focus session with a 5-minute break to follow."
    );

    let (status, body) = send(&app.router, get("/status/u1")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["session"]["status"], "ACTIVE");
    assert_eq!(
        body["data"]["session"]["started_at"],
        start_time().to_rfc3339()
    );

    app.clock.advance_seconds(10);
    let (status, body) = send(&app.router, post_json("/stop_focus", json!({"user_id": "u1"}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["elapsed_seconds"], 10);
    assert_eq!(
        body["data"]["message"],
        "🛑 Focus session stopped for <@u1> after 10s."
    );

    let (_, body) = send(&app.router, get("/status/u1")).await;
    let session = &body["data"]["session"];
    assert_eq!(session["status"], "INACTIVE");
    assert_eq!(session["accumulated_active_seconds"], 10);
    assert_eq!(session["completed_sessions"], 1);
    assert_eq!(session["started_at"], start_time().to_rfc3339());
    assert_eq!(
        session["history"],
        json!([{
            "started_at": start_time().to_rfc3339(),
            "ended_at": (start_time() + chrono::Duration::seconds(10)).to_rfc3339(),
            "elapsed_seconds": 10
        }])
    );
}

#[tokio::test]
async fn test_開始時に指定した分数がセッションに反映される() {
    let app = create_test_app();

    let (status, body) = send(
        &app.router,
        post_json(
            "/start_focus",
            json!({"user_id": "u1", "duration": "45", "break": 10}),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let session = &body["data"]["session"];
    assert_eq!(session["planned_minutes"], 45);
    assert_eq!(session["break_minutes"], 10);
    assert_eq!(
        session["planned_end_at"],
        (start_time() + chrono::Duration::minutes(45)).to_rfc3339()
    );
}

#[tokio::test]
async fn test_二重開始は409になる() {
    let app = create_test_app();
    send(&app.router, post_json("/start_focus", json!({"user_id": "u1"}))).await;

    let (status, body) = send(&app.router, post_json("/start_focus", json!({"user_id": "u1"}))).await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["type"], "https://focuspulse.example.com/errors/conflict");
    assert_eq!(body["status"], 409);
}

#[tokio::test]
async fn test_開始していないユーザーの停止は404になる() {
    let app = create_test_app();

    let (status, body) = send(&app.router, post_json("/stop_focus", json!({"user_id": "u1"}))).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["title"], "Not Found");
}

#[tokio::test]
async fn test_未登録ユーザーの状態は停止中で累計0になる() {
    let app = create_test_app();

    let (status, body) = send(&app.router, get("/status/nobody")).await;

    assert_eq!(status, StatusCode::OK);
    let session = &body["data"]["session"];
    assert_eq!(session["status"], "INACTIVE");
    assert_eq!(session["accumulated_active_seconds"], 0);
    assert_eq!(session["started_at"], JsonValue::Null);
    assert_eq!(session["daily_summary_enabled"], false);
    assert_eq!(session["history"], json!([]));
}

// --- デイリーサマリー ---

#[tokio::test]
async fn test_デイリーサマリーの二重有効化は冪等になる() {
    let app = create_test_app();
    let request = || {
        post_json(
            "/enable_daily_summary",
            json!({"user_id": "u1", "channel_id": "c1", "time": "07:30"}),
        )
    };

    let (first_status, first) = send(&app.router, request()).await;
    let (second_status, second) = send(&app.router, request()).await;

    assert_eq!(first_status, StatusCode::OK);
    assert_eq!(second_status, StatusCode::OK);
    assert_eq!(first, second);
    assert_eq!(second["data"]["daily_summary_enabled"], true);
    assert_eq!(second["data"]["time"], "07:30");

    let (_, status) = send(&app.router, get("/status/u1")).await;
    assert_eq!(status["data"]["session"]["daily_summary_enabled"], true);
    assert_eq!(status["data"]["session"]["status"], "INACTIVE");
    assert_eq!(status["data"]["session"]["version"], 2);
}

#[tokio::test]
async fn test_時刻未指定なら21時で有効化される() {
    let app = create_test_app();

    let (status, body) = send(
        &app.router,
        post_json("/enable_daily_summary", json!({"user_id": "u1"})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["time"], "21:00");
    assert_eq!(body["data"]["channel_id"], JsonValue::Null);
}

#[tokio::test]
async fn test_デイリーサマリーは当日の実績を返す() {
    let app = create_test_app();
    send(&app.router, post_json("/enable_daily_summary", json!({"user_id": "u1"}))).await;
    send(&app.router, post_json("/start_focus", json!({"user_id": "u1"}))).await;
    app.clock.advance_seconds(25 * 60);
    send(&app.router, post_json("/stop_focus", json!({"user_id": "u1"}))).await;

    let (status, body) = send(&app.router, get("/daily_summary/u1")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body["data"],
        json!({
            "message": "📊 Daily Focus Summary: You completed 1 session today, totaling 25 minutes. Keep it up!",
            "user_id": "u1",
            "date": "2026-03-02",
            "enabled": true,
            "time": "21:00",
            "sessions": 1,
            "total_minutes": 25,
            "total_seconds": 1500
        })
    );
}

// --- 入力検証 ---

#[tokio::test]
async fn test_user_idが欠落していると400になる() {
    let app = create_test_app();

    let (status, body) = send(&app.router, post_json("/start_focus", json!({"channel_id": "c1"}))).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["type"], "https://focuspulse.example.com/errors/bad-request");
}

#[tokio::test]
async fn test_user_idが空白のみだと400になる() {
    let app = create_test_app();

    let (status, body) = send(&app.router, post_json("/stop_focus", json!({"user_id": "   "}))).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["detail"], "ユーザー IDは必須です");
}

#[tokio::test]
async fn test_不正なjsonは400になる() {
    let app = create_test_app();

    let (status, body) = send(&app.router, post_raw("/start_focus", "{not json")).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["status"], 400);
}

#[tokio::test]
async fn test_範囲外の分数は400になる() {
    let app = create_test_app();

    let (status, _) = send(
        &app.router,
        post_json("/start_focus", json!({"user_id": "u1", "duration": 0})),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let (_, body) = send(&app.router, get("/status/u1")).await;
    assert_eq!(body["data"]["session"]["status"], "INACTIVE");
}

#[rstest]
#[case::text("9pm")]
#[case::signed_hour("+9:00")]
#[tokio::test]
async fn test_不正な時刻は400になる(#[case] time: &str) {
    let app = create_test_app();

    let (status, _) = send(
        &app.router,
        post_json("/enable_daily_summary", json!({"user_id": "u1", "time": time})),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let (_, body) = send(&app.router, get("/status/u1")).await;
    assert_eq!(body["data"]["session"]["daily_summary_enabled"], false);
}

// --- 並行性 ---

#[tokio::test]
async fn test_同一ユーザーへの並行開始は一方のみ成功する() {
    let app = create_test_app();

    let (a, b) = tokio::join!(
        send(&app.router, post_json("/start_focus", json!({"user_id": "u1"}))),
        send(&app.router, post_json("/start_focus", json!({"user_id": "u1"}))),
    );

    let mut statuses = vec![a.0, b.0];
    statuses.sort();
    assert_eq!(statuses, vec![StatusCode::OK, StatusCode::CONFLICT]);
}

// --- 通知 ---

type Received = Arc<Mutex<Vec<JsonValue>>>;

/// 受信したペイロードを記録し、指定のステータスを返す Webhook を起動する
async fn spawn_webhook(status: StatusCode) -> (String, Received) {
    let received: Received = Arc::new(Mutex::new(Vec::new()));
    let hook = Router::new()
        .route(
            "/hook",
            post(
                move |State(received): State<Received>, Json(body): Json<JsonValue>| async move {
                    received.lock().unwrap().push(body);
                    status
                },
            ),
        )
        .with_state(received.clone());

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, hook).await.unwrap();
    });

    (format!("http://{addr}/hook"), received)
}

/// バックグラウンド送信が `expected` 件届くまで待ち、受信したペイロードを返す
async fn received_eventually(received: &Received, expected: usize) -> Vec<JsonValue> {
    for _ in 0..100 {
        if received.lock().unwrap().len() >= expected {
            break;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    received.lock().unwrap().clone()
}

/// 送信に時間のかかるチャットプラットフォームを模した通知送信
struct SlowSender {
    delay: Duration,
}

#[async_trait]
impl NotificationSender for SlowSender {
    async fn send(&self, _message: &ChannelMessage) -> Result<(), NotificationError> {
        tokio::time::sleep(self.delay).await;
        Ok(())
    }
}

#[tokio::test]
async fn test_開始時にチャンネルへwebhookで通知される() {
    let (url, received) = spawn_webhook(StatusCode::OK).await;
    let sender = WebhookNotificationSender::new(url, Duration::from_secs(5)).unwrap();
    let app = create_test_app_with_notifier(Arc::new(sender));

    let (status, _) = send(
        &app.router,
        post_json("/start_focus", json!({"user_id": "u1", "channel_id": "c1"})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        received_eventually(&received, 1).await,
        vec![json!({
            "channel_id": "c1",
            "text": "🚀 <@u1> started a 25-minute focus session with a 5-minute break to follow."
        })]
    );
}

#[tokio::test]
async fn test_webhookが失敗してもリクエストは成功する() {
    let (url, received) = spawn_webhook(StatusCode::INTERNAL_SERVER_ERROR).await;
    let sender = WebhookNotificationSender::new(url, Duration::from_secs(5)).unwrap();
    let app = create_test_app_with_notifier(Arc::new(sender));

    let (status, body) = send(
        &app.router,
        post_json("/start_focus", json!({"user_id": "u1", "channel_id": "c1"})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["session"]["status"], "ACTIVE");
    assert_eq!(received_eventually(&received, 1).await.len(), 1);
}

#[tokio::test]
async fn test_通知の送信完了を待たずにレスポンスを返す() {
    let app = create_test_app_with_notifier(Arc::new(SlowSender {
        delay: Duration::from_secs(3),
    }));

    for request in [
        post_json("/start_focus", json!({"user_id": "u1", "channel_id": "c1"})),
        post_json("/stop_focus", json!({"user_id": "u1"})),
        post_json("/enable_daily_summary", json!({"user_id": "u1"})),
    ] {
        let started = Instant::now();
        let (status, _) = send(&app.router, request).await;

        assert_eq!(status, StatusCode::OK);
        assert!(
            started.elapsed() < Duration::from_secs(1),
            "レスポンスが通知送信で遅延しないこと: {:?}",
            started.elapsed()
        );
    }
}

// --- 付帯エンドポイント ---

#[tokio::test]
async fn test_ヘルスチェックがバージョンを返す() {
    let app = create_test_app();

    let (status, body) = send(&app.router, get("/health")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
}

#[tokio::test]
async fn test_readinessはインメモリストアでready() {
    let app = create_test_app();

    let (status, body) = send(&app.router, get("/health/ready")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ready");
    assert_eq!(body["checks"]["session_store"], "ok");
}

#[tokio::test]
async fn test_integration_jsonがそのまま返される() {
    let app = create_test_app();

    let response = app
        .router
        .clone()
        .oneshot(get("/integration.json"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get(header::CONTENT_TYPE).unwrap(),
        "application/json"
    );
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    assert_eq!(
        std::str::from_utf8(&body).unwrap(),
        include_str!("../integration.json")
    );
}
