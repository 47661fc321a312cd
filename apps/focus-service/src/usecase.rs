//! # ユースケース層
//!
//! Focus Service のビジネスロジックを実装する。
//!
//! ## 設計方針
//!
//! - **依存性注入**: リポジトリ・通知送信・時計を `Arc<dyn Trait>` で外部から注入
//! - **薄いハンドラ**: ハンドラは薄く保ち、ロジックはユースケースに集約
//! - **楽観的ロック**: 読み取り → 状態遷移 → バージョン付き保存

pub(crate) mod helpers;

pub mod focus;

pub use focus::{FocusStatus, FocusUseCaseImpl, StopFocusOutput};
