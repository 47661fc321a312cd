//! # FocusPulse 共有ユーティリティ
//!
//! サービスとインフラ層の双方から使われる、ビジネスロジックを含まない
//! ユーティリティを提供する。
//!
//! ## 設計方針
//!
//! - レスポンスエンベロープ・エラーレスポンスなどの純粋なデータ構造を配置
//! - tracing / tower-http に依存するものは `observability` feature の背後に置く

pub mod api_response;
pub mod error_response;
#[cfg(feature = "observability")]
pub mod event_log;
pub mod observability;

pub use api_response::ApiResponse;
pub use error_response::{ErrorResponse, ProblemKind};
