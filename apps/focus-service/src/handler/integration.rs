//! # ワークフロー記述子ハンドラ
//!
//! チャットプラットフォームが読み込む `integration.json` をそのまま返す。
//! 内容はビルド時に埋め込まれ、サービスは解釈しない。

use axum::{http::header, response::IntoResponse};

const INTEGRATION_JSON: &str = include_str!("../../integration.json");

/// GET /integration.json
pub async fn get_integration() -> impl IntoResponse {
    ([(header::CONTENT_TYPE, "application/json")], INTEGRATION_JSON)
}
