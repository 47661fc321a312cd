//! # フォーカスセッションユースケース
//!
//! フォーカスの開始・停止・状態照会と、デイリーサマリーの設定・集計を実装する。
//!
//! ## 処理の流れ（更新系）
//!
//! 1. リポジトリから現在のセッションを取得（未登録なら新規作成）
//! 2. ドメインの状態遷移メソッドで新しいセッションを得る
//! 3. 新規なら `insert`、既存なら `update_with_version_check` で保存
//! 4. ビジネスイベントをログ出力し、チャンネルが登録されていれば通知する
//!
//! 同一ユーザーへの並行リクエストは 3 の時点で競合として検出され、
//! 後着側は `CoreError::Conflict` になる。通知は `tokio::spawn` したタスクで送り、
//! レスポンスは送信の完了を待たない。送信の失敗はリクエストを失敗させない。

use std::sync::Arc;

use chrono::{DateTime, Utc};
use focuspulse_domain::{
    DomainError,
    clock::Clock,
    daily_summary::{DailySummary, SummaryTime},
    focus_session::{FocusRecord, FocusSession, FocusState, StartFocusOptions},
    notification::{
        ChannelMessage,
        daily_summary_enabled_text,
        focus_started_text,
        focus_stopped_text,
    },
    user::{ChannelId, UserId},
    value_objects::Version,
};
use focuspulse_infra::{notification::NotificationSender, repository::FocusSessionRepository};
use focuspulse_shared::{
    event_log::{
        error::{category, kind},
        event,
    },
    log_business_event,
};
use tracing::Instrument as _;

use super::helpers::{map_load_error, map_version_conflict};
use crate::error::CoreError;

/// フォーカス停止の結果
#[derive(Debug, Clone)]
pub struct StopFocusOutput {
    /// 停止後のセッション
    pub session: FocusSession,
    /// 今回完了したフォーカスの記録
    pub record:  FocusRecord,
}

/// 状態照会の結果
///
/// `as_of` は照会時刻。ACTIVE セッションの経過時間はこの時刻で計算する。
#[derive(Debug, Clone)]
pub struct FocusStatus {
    pub session: FocusSession,
    pub as_of:   DateTime<Utc>,
}

/// フォーカスセッションユースケース
pub struct FocusUseCaseImpl {
    repository: Arc<dyn FocusSessionRepository>,
    notifier:   Arc<dyn NotificationSender>,
    clock:      Arc<dyn Clock>,
}

impl FocusUseCaseImpl {
    pub fn new(
        repository: Arc<dyn FocusSessionRepository>,
        notifier: Arc<dyn NotificationSender>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            repository,
            notifier,
            clock,
        }
    }

    /// フォーカスセッションを開始する
    ///
    /// 未登録ユーザーの場合はレコードを作成してから開始する。
    ///
    /// ## エラー
    ///
    /// - `Conflict`: 既にフォーカス中、または並行更新に負けた
    pub async fn start_focus(
        &self,
        user_id: UserId,
        options: StartFocusOptions,
    ) -> Result<FocusSession, CoreError> {
        let now = self.clock.now();
        let (current, expected_version) = self.load_or_new(user_id, now).await?;

        let started = current.started(options, now)?;
        self.save(&started, expected_version).await?;

        if let FocusState::Active(active) = started.state() {
            log_business_event!(
                event.category = event::category::FOCUS,
                event.action = event::action::FOCUS_STARTED,
                event.entity_type = event::entity_type::FOCUS_SESSION,
                event.entity_id = %started.user_id(),
                event.result = event::result::SUCCESS,
                focus.planned_minutes = active.planned_minutes.as_u32(),
                focus.break_minutes = active.break_minutes.as_u32(),
                "フォーカスセッション開始"
            );
            self.notify(&started, focus_started_text(started.user_id(), active));
        }

        Ok(started)
    }

    /// フォーカスセッションを停止し、経過時間を累計に加算する
    ///
    /// ## エラー
    ///
    /// - `NotFound`: レコードが存在しない、または既に停止している
    /// - `Conflict`: 並行更新に負けた
    pub async fn stop_focus(&self, user_id: UserId) -> Result<StopFocusOutput, CoreError> {
        let now = self.clock.now();
        let current = self
            .repository
            .find_by_user(&user_id)
            .await
            .map_err(map_load_error)?
            .ok_or_else(|| DomainError::NoActiveSession {
                user_id: user_id.to_string(),
            })?;

        let expected_version = current.version();
        let (stopped, record) = current.stopped(now)?;
        self.save(&stopped, Some(expected_version)).await?;

        log_business_event!(
            event.category = event::category::FOCUS,
            event.action = event::action::FOCUS_STOPPED,
            event.entity_type = event::entity_type::FOCUS_SESSION,
            event.entity_id = %stopped.user_id(),
            event.result = event::result::SUCCESS,
            focus.elapsed_seconds = record.elapsed_seconds,
            focus.accumulated_active_seconds = stopped.accumulated_active_seconds(),
            "フォーカスセッション停止"
        );
        self.notify(
            &stopped,
            focus_stopped_text(stopped.user_id(), record.elapsed_seconds),
        );

        Ok(StopFocusOutput {
            session: stopped,
            record,
        })
    }

    /// 現在の状態を取得する
    ///
    /// 未登録ユーザーには停止状態・累計 0 のセッションを返す（保存はしない）。
    pub async fn get_status(&self, user_id: UserId) -> Result<FocusStatus, CoreError> {
        let as_of = self.clock.now();
        let session = self
            .repository
            .find_by_user(&user_id)
            .await
            .map_err(map_load_error)?
            .unwrap_or_else(|| FocusSession::new(user_id, as_of));

        Ok(FocusStatus { session, as_of })
    }

    /// デイリーサマリーを有効化する
    ///
    /// 同じ設定で再度呼び出した場合は保存も通知も行わない。
    pub async fn enable_daily_summary(
        &self,
        user_id: UserId,
        channel_id: Option<ChannelId>,
        time: SummaryTime,
    ) -> Result<FocusSession, CoreError> {
        let now = self.clock.now();
        let (current, expected_version) = self.load_or_new(user_id, now).await?;
        let version_before = current.version();

        let updated = current.daily_summary_enabled(channel_id, time, now);
        if expected_version.is_some() && updated.version() == version_before {
            tracing::debug!(user_id = %updated.user_id(), "デイリーサマリー設定に変更なし");
            return Ok(updated);
        }

        self.save(&updated, expected_version).await?;

        log_business_event!(
            event.category = event::category::DAILY_SUMMARY,
            event.action = event::action::DAILY_SUMMARY_ENABLED,
            event.entity_type = event::entity_type::FOCUS_SESSION,
            event.entity_id = %updated.user_id(),
            event.result = event::result::SUCCESS,
            daily_summary.time = %time,
            "デイリーサマリー有効化"
        );
        self.notify(&updated, daily_summary_enabled_text(updated.user_id(), time));

        Ok(updated)
    }

    /// 当日（UTC）のフォーカス実績を集計する
    ///
    /// 未登録ユーザーには実績ゼロ・無効のサマリーを返す。
    pub async fn get_daily_summary(&self, user_id: &UserId) -> Result<DailySummary, CoreError> {
        let today = self.clock.now().date_naive();
        let summary = self
            .repository
            .find_by_user(user_id)
            .await
            .map_err(map_load_error)?
            .map_or_else(|| DailySummary::empty(today), |s| s.summary_for(today));

        Ok(summary)
    }

    /// 既存セッションとそのバージョンを取得する（未登録なら新規作成し、バージョンは None）
    async fn load_or_new(
        &self,
        user_id: UserId,
        now: DateTime<Utc>,
    ) -> Result<(FocusSession, Option<Version>), CoreError> {
        let existing = self
            .repository
            .find_by_user(&user_id)
            .await
            .map_err(map_load_error)?;

        Ok(match existing {
            Some(session) => {
                let version = session.version();
                (session, Some(version))
            }
            None => (FocusSession::new(user_id, now), None),
        })
    }

    /// `expected_version` が None なら新規挿入、Some ならバージョン付き更新
    async fn save(
        &self,
        session: &FocusSession,
        expected_version: Option<Version>,
    ) -> Result<(), CoreError> {
        let result = match expected_version {
            Some(version) => {
                self.repository
                    .update_with_version_check(session, version)
                    .await
            }
            None => self.repository.insert(session).await,
        };
        result.map_err(map_version_conflict)
    }

    /// チャンネルが登録されていれば通知をバックグラウンドで送信する
    ///
    /// 送信の完了を待たずに戻る。結果はタスク内でログに残し、呼び出し元には返さない。
    fn notify(&self, session: &FocusSession, text: String) {
        let Some(channel_id) = session.channel_id() else {
            tracing::debug!(user_id = %session.user_id(), "チャンネル未登録のため通知をスキップ");
            return;
        };

        let notifier = self.notifier.clone();
        let message = ChannelMessage::new(channel_id.clone(), text);
        tokio::spawn(
            async move {
                match notifier.send(&message).await {
                    Ok(()) => {
                        log_business_event!(
                            event.category = event::category::NOTIFICATION,
                            event.action = event::action::NOTIFICATION_SENT,
                            event.entity_type = event::entity_type::CHANNEL,
                            event.entity_id = %message.channel_id,
                            event.result = event::result::SUCCESS,
                            "チャンネル通知送信成功"
                        );
                    }
                    Err(e) => {
                        log_business_event!(
                            event.category = event::category::NOTIFICATION,
                            event.action = event::action::NOTIFICATION_FAILED,
                            event.entity_type = event::entity_type::CHANNEL,
                            event.entity_id = %message.channel_id,
                            event.result = event::result::FAILURE,
                            error.category = category::EXTERNAL_SERVICE,
                            error.kind = kind::WEBHOOK,
                            error.message = %e,
                            "チャンネル通知送信失敗"
                        );
                    }
                }
            }
            .in_current_span(),
        );
    }
}
