//! # Redis フォーカスセッションリポジトリ
//!
//! フォーカスセッションを Redis に JSON で保存する。
//!
//! ## Redis キー設計
//!
//! | キー | 値 | TTL |
//! |-----|-----|-----|
//! | `focus_session:{user_id}` | FocusSessionRecord (JSON) | なし |
//!
//! ## 楽観的ロック
//!
//! - 挿入: `SET ... NX` で既存キーがあれば失敗させる
//! - 更新: Lua スクリプトで保存済み JSON の `version` を比較し、一致した場合のみ `SET` する
//!
//! どちらも Redis 上で原子的に実行されるため、複数プロセスから同一ユーザーを
//! 同時に更新しても一方のみが成功する。

use async_trait::async_trait;
use focuspulse_domain::{
    focus_session::{FocusSession, FocusSessionRecord},
    user::UserId,
    value_objects::Version,
};
use redis::{AsyncCommands, Script, aio::ConnectionManager};

use super::focus_session_repository::{ENTITY_NAME, FocusSessionRepository};
use crate::error::InfraError;

/// バージョン一致時のみ値を置き換える Lua スクリプト
///
/// 戻り値: 1 = 更新成功、0 = キーなしまたはバージョン不一致
const COMPARE_AND_SET_SCRIPT: &str = r"
local current = redis.call('GET', KEYS[1])
if not current then
    return 0
end
local decoded = cjson.decode(current)
if tonumber(decoded['version']) ~= tonumber(ARGV[1]) then
    return 0
end
redis.call('SET', KEYS[1], ARGV[2])
return 1
";

/// Redis を使用したフォーカスセッションリポジトリ
pub struct RedisFocusSessionRepository {
    conn:            ConnectionManager,
    compare_and_set: Script,
}

impl RedisFocusSessionRepository {
    /// 新しい RedisFocusSessionRepository を作成する
    ///
    /// # 引数
    ///
    /// - `redis_url`: Redis 接続 URL（例: `redis://localhost:6379`）
    pub async fn new(redis_url: &str) -> Result<Self, InfraError> {
        let client = redis::Client::open(redis_url)?;
        let conn = ConnectionManager::new(client).await?;
        Ok(Self::from_connection(conn))
    }

    /// 既存の接続マネージャから作成する
    pub fn from_connection(conn: ConnectionManager) -> Self {
        Self {
            conn,
            compare_and_set: Script::new(COMPARE_AND_SET_SCRIPT),
        }
    }

    /// セッションキーを生成する
    fn session_key(user_id: &UserId) -> String {
        format!("focus_session:{}", user_id.as_str())
    }
}

#[async_trait]
impl FocusSessionRepository for RedisFocusSessionRepository {
    #[tracing::instrument(skip_all, fields(user_id = %user_id), level = "debug")]
    async fn find_by_user(&self, user_id: &UserId) -> Result<Option<FocusSession>, InfraError> {
        let key = Self::session_key(user_id);
        let mut conn = self.conn.clone();

        let result: Option<String> = conn.get(&key).await?;

        match result {
            Some(json) => {
                let record: FocusSessionRecord = serde_json::from_str(&json)?;
                let session = FocusSession::from_record(record)
                    .map_err(|e| InfraError::corrupted_record(e.to_string()))?;
                Ok(Some(session))
            }
            None => Ok(None),
        }
    }

    #[tracing::instrument(skip_all, fields(user_id = %session.user_id()), level = "debug")]
    async fn insert(&self, session: &FocusSession) -> Result<(), InfraError> {
        let key = Self::session_key(session.user_id());
        let json = serde_json::to_string(&session.to_record())?;
        let mut conn = self.conn.clone();

        let reply: Option<String> = redis::cmd("SET")
            .arg(&key)
            .arg(json)
            .arg("NX")
            .query_async(&mut conn)
            .await?;

        match reply {
            Some(_) => Ok(()),
            None => Err(InfraError::conflict(ENTITY_NAME, session.user_id().as_str())),
        }
    }

    #[tracing::instrument(
        skip_all,
        fields(user_id = %session.user_id(), expected_version = %expected_version),
        level = "debug"
    )]
    async fn update_with_version_check(
        &self,
        session: &FocusSession,
        expected_version: Version,
    ) -> Result<(), InfraError> {
        let key = Self::session_key(session.user_id());
        let json = serde_json::to_string(&session.to_record())?;
        let mut conn = self.conn.clone();

        let updated: i32 = self
            .compare_and_set
            .key(&key)
            .arg(expected_version.as_u32())
            .arg(json)
            .invoke_async(&mut conn)
            .await?;

        if updated == 1 {
            Ok(())
        } else {
            Err(InfraError::conflict(ENTITY_NAME, session.user_id().as_str()))
        }
    }

    async fn ping(&self) -> Result<(), InfraError> {
        let mut conn = self.conn.clone();
        let _: String = redis::cmd("PING").query_async(&mut conn).await?;
        Ok(())
    }
}
