//! # リポジトリ実装
//!
//! フォーカスセッションの永続化を担当する。
//!
//! ## 設計方針
//!
//! - **トレイトによる抽象化**: ユースケースは `Arc<dyn FocusSessionRepository>` に依存する
//! - **楽観的ロック**: 挿入は既存レコードとの衝突、更新はバージョン不一致で `Conflict` を返す
//! - **2 つの実装**: インメモリ（既定・テスト用）と Redis（`REDIS_URL` 設定時）

pub mod focus_session_repository;
pub mod redis_focus_session_repository;

pub use focus_session_repository::{FocusSessionRepository, InMemoryFocusSessionRepository};
pub use redis_focus_session_repository::RedisFocusSessionRepository;
