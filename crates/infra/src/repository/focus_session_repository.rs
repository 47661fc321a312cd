//! # FocusSessionRepository
//!
//! フォーカスセッションの取得・保存を行うリポジトリトレイトと、
//! プロセス内メモリに保持するインメモリ実装。
//!
//! インメモリ実装はプロセス終了とともにデータを失う。
//! 永続化が必要な場合は [`RedisFocusSessionRepository`](super::RedisFocusSessionRepository)
//! を使用する。

use std::collections::HashMap;

use async_trait::async_trait;
use focuspulse_domain::{focus_session::FocusSession, user::UserId, value_objects::Version};
use tokio::sync::RwLock;

use crate::error::InfraError;

/// 楽観的ロック競合時のエンティティ名
pub(crate) const ENTITY_NAME: &str = "FocusSession";

/// フォーカスセッションリポジトリトレイト
///
/// ユースケース層はこのトレイトに依存し、具体的な保存先を知らない。
#[async_trait]
pub trait FocusSessionRepository: Send + Sync {
    /// ユーザー ID でセッションを検索する
    ///
    /// # 戻り値
    ///
    /// - `Ok(Some(session))`: レコードが存在する
    /// - `Ok(None)`: 一度もアクセスのないユーザー
    async fn find_by_user(&self, user_id: &UserId) -> Result<Option<FocusSession>, InfraError>;

    /// 新しいセッションを保存する
    ///
    /// 同じユーザーのレコードが既に存在する場合は `Conflict` を返す。
    async fn insert(&self, session: &FocusSession) -> Result<(), InfraError>;

    /// 楽観的ロック付きでセッションを更新する
    ///
    /// 保存済みレコードのバージョンが `expected_version` と一致しない場合、
    /// またはレコードが存在しない場合は `Conflict` を返す。
    async fn update_with_version_check(
        &self,
        session: &FocusSession,
        expected_version: Version,
    ) -> Result<(), InfraError>;

    /// ストアの疎通確認（readiness チェック用）
    ///
    /// プロセス内で完結する実装は常に成功する。
    async fn ping(&self) -> Result<(), InfraError> {
        Ok(())
    }
}

/// インメモリのフォーカスセッションリポジトリ
///
/// `RwLock` で保護された `HashMap` にセッションを保持する。
/// 書き込みロック内で存在確認・バージョン比較と保存を行うため、
/// 同一ユーザーへの並行更新は一方のみが成功する。
#[derive(Default)]
pub struct InMemoryFocusSessionRepository {
    sessions: RwLock<HashMap<UserId, FocusSession>>,
}

impl InMemoryFocusSessionRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// 保持しているセッション数（テスト・デバッグ用）
    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }
}

#[async_trait]
impl FocusSessionRepository for InMemoryFocusSessionRepository {
    async fn find_by_user(&self, user_id: &UserId) -> Result<Option<FocusSession>, InfraError> {
        Ok(self.sessions.read().await.get(user_id).cloned())
    }

    async fn insert(&self, session: &FocusSession) -> Result<(), InfraError> {
        let mut sessions = self.sessions.write().await;
        if sessions.contains_key(session.user_id()) {
            return Err(InfraError::conflict(ENTITY_NAME, session.user_id().as_str()));
        }
        sessions.insert(session.user_id().clone(), session.clone());
        Ok(())
    }

    async fn update_with_version_check(
        &self,
        session: &FocusSession,
        expected_version: Version,
    ) -> Result<(), InfraError> {
        let mut sessions = self.sessions.write().await;
        match sessions.get_mut(session.user_id()) {
            Some(current) if current.version() == expected_version => {
                *current = session.clone();
                Ok(())
            }
            _ => Err(InfraError::conflict(ENTITY_NAME, session.user_id().as_str())),
        }
    }
}
