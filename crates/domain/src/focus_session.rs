//! # フォーカスセッション
//!
//! ユーザーごとに 1 件保持されるフォーカスセッションのライフサイクルを管理する。
//!
//! 状態遷移は ADT（代数的データ型）で表現し、不正な状態を型レベルで防止する。
//! ACTIVE 状態は `started_at` を必ず持つため、「ACTIVE なのに開始時刻がない」
//! レコードは構築できない。
//!
//! ```text
//!            started()                stopped()
//!  INACTIVE ──────────────▶ ACTIVE ──────────────▶ INACTIVE
//!     ▲                      │  started() → AlreadyActive
//!     └─ stopped() → NoActiveSession
//! ```
//!
//! ## 楽観的ロック
//!
//! 状態を変更するメソッドは `version` をインクリメントした新しいインスタンスを返す。
//! リポジトリは保存時に期待バージョンと比較し、同一ユーザーへの並行更新を検出する。

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use strum::IntoStaticStr;

use crate::{
    DomainError,
    daily_summary::{DailySummary, DailySummarySetting, SummaryTime},
    user::{ChannelId, UserId},
    value_objects::{BreakMinutes, PlannedMinutes, Version},
};

/// 完了済みセッション履歴の保持日数
pub const HISTORY_RETENTION_DAYS: i64 = 7;

/// フォーカスセッションステータス
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, IntoStaticStr, strum::Display,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum FocusSessionStatus {
    /// 停止中（未開始を含む）
    Inactive,
    /// フォーカス中
    Active,
}

/// フォーカスセッションの状態（ADT ベースステートマシン）
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FocusState {
    /// 停止中
    Inactive(InactiveState),
    /// フォーカス中
    Active(ActiveState),
}

/// Inactive 状態の固有フィールド
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct InactiveState {
    /// 直近のセッション開始日時（一度も開始していなければ None）
    pub last_started_at: Option<DateTime<Utc>>,
}

/// Active 状態の固有フィールド
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveState {
    /// 開始日時
    pub started_at:      DateTime<Utc>,
    /// 予定フォーカス時間
    pub planned_minutes: PlannedMinutes,
    /// 予定休憩時間
    pub break_minutes:   BreakMinutes,
}

impl ActiveState {
    /// 予定終了日時
    pub fn planned_end_at(&self) -> DateTime<Utc> {
        self.started_at + Duration::minutes(i64::from(self.planned_minutes.as_u32()))
    }
}

/// 完了したフォーカスの記録
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FocusRecord {
    pub started_at:      DateTime<Utc>,
    pub ended_at:        DateTime<Utc>,
    pub elapsed_seconds: u64,
}

/// セッション開始時のオプション
///
/// 未指定の項目は既定値（25 分フォーカス / 5 分休憩）で補われる。
/// `channel_id` が未指定の場合は、以前に登録されたチャンネルを引き継ぐ。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StartFocusOptions {
    pub channel_id:      Option<ChannelId>,
    pub planned_minutes: PlannedMinutes,
    pub break_minutes:   BreakMinutes,
}

/// フォーカスセッションエンティティ
///
/// [`UserId`] をキーとして 1 ユーザー 1 件保持される。
/// 共通フィールドを外側に、状態固有フィールドを `state` に分離する。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FocusSession {
    user_id: UserId,
    channel_id: Option<ChannelId>,
    state: FocusState,
    accumulated_active_seconds: u64,
    completed_sessions: u32,
    history: Vec<FocusRecord>,
    daily_summary: DailySummarySetting,
    version: Version,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// フォーカスセッションの永続化表現
///
/// ストレージ上のフラット構造。`FocusSession::from_record()` で不変条件を検証して
/// ADT に変換する。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FocusSessionRecord {
    pub user_id: UserId,
    pub channel_id: Option<ChannelId>,
    pub status: FocusSessionStatus,
    pub started_at: Option<DateTime<Utc>>,
    pub planned_minutes: Option<PlannedMinutes>,
    pub break_minutes: Option<BreakMinutes>,
    pub accumulated_active_seconds: u64,
    pub completed_sessions: u32,
    #[serde(default)]
    pub history: Vec<FocusRecord>,
    pub daily_summary_enabled: bool,
    pub daily_summary_time: SummaryTime,
    pub version: Version,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl FocusSession {
    /// 停止状態の新しいセッションを作成する
    ///
    /// 初回アクセス時にレコードを作るために使用する。
    pub fn new(user_id: UserId, now: DateTime<Utc>) -> Self {
        Self {
            user_id,
            channel_id: None,
            state: FocusState::Inactive(InactiveState::default()),
            accumulated_active_seconds: 0,
            completed_sessions: 0,
            history: Vec::new(),
            daily_summary: DailySummarySetting::default(),
            version: Version::initial(),
            created_at: now,
            updated_at: now,
        }
    }

    /// 永続化表現から復元する
    ///
    /// # Errors
    ///
    /// - `DomainError::Validation`: ACTIVE なのに `started_at` がない
    pub fn from_record(record: FocusSessionRecord) -> Result<Self, DomainError> {
        let state = match record.status {
            FocusSessionStatus::Inactive => FocusState::Inactive(InactiveState {
                last_started_at: record.started_at,
            }),
            FocusSessionStatus::Active => {
                let started_at = record.started_at.ok_or_else(|| {
                    DomainError::Validation(
                        "Active セッションには started_at が必要です".to_string(),
                    )
                })?;
                FocusState::Active(ActiveState {
                    started_at,
                    planned_minutes: record.planned_minutes.unwrap_or_default(),
                    break_minutes: record.break_minutes.unwrap_or_default(),
                })
            }
        };

        Ok(Self {
            user_id: record.user_id,
            channel_id: record.channel_id,
            state,
            accumulated_active_seconds: record.accumulated_active_seconds,
            completed_sessions: record.completed_sessions,
            history: record.history,
            daily_summary: DailySummarySetting {
                enabled: record.daily_summary_enabled,
                time:    record.daily_summary_time,
            },
            version: record.version,
            created_at: record.created_at,
            updated_at: record.updated_at,
        })
    }

    /// 永続化表現に変換する
    pub fn to_record(&self) -> FocusSessionRecord {
        let (planned_minutes, break_minutes) = match &self.state {
            FocusState::Active(active) => (Some(active.planned_minutes), Some(active.break_minutes)),
            FocusState::Inactive(_) => (None, None),
        };

        FocusSessionRecord {
            user_id: self.user_id.clone(),
            channel_id: self.channel_id.clone(),
            status: self.status(),
            started_at: self.started_at(),
            planned_minutes,
            break_minutes,
            accumulated_active_seconds: self.accumulated_active_seconds,
            completed_sessions: self.completed_sessions,
            history: self.history.clone(),
            daily_summary_enabled: self.daily_summary.enabled,
            daily_summary_time: self.daily_summary.time,
            version: self.version,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }

    // Getter メソッド

    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }

    pub fn channel_id(&self) -> Option<&ChannelId> {
        self.channel_id.as_ref()
    }

    pub fn status(&self) -> FocusSessionStatus {
        match &self.state {
            FocusState::Inactive(_) => FocusSessionStatus::Inactive,
            FocusState::Active(_) => FocusSessionStatus::Active,
        }
    }

    pub fn is_active(&self) -> bool {
        matches!(self.state, FocusState::Active(_))
    }

    /// 開始日時
    ///
    /// ACTIVE なら現在のセッションの開始日時、INACTIVE なら直近の開始日時。
    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        match &self.state {
            FocusState::Active(active) => Some(active.started_at),
            FocusState::Inactive(inactive) => inactive.last_started_at,
        }
    }

    /// 予定終了日時（ACTIVE のときのみ）
    pub fn planned_end_at(&self) -> Option<DateTime<Utc>> {
        match &self.state {
            FocusState::Active(active) => Some(active.planned_end_at()),
            FocusState::Inactive(_) => None,
        }
    }

    /// 実行中セッションの経過秒数（INACTIVE なら 0）
    pub fn active_elapsed_seconds(&self, now: DateTime<Utc>) -> u64 {
        match &self.state {
            FocusState::Active(active) => elapsed_seconds(active.started_at, now),
            FocusState::Inactive(_) => 0,
        }
    }

    pub fn accumulated_active_seconds(&self) -> u64 {
        self.accumulated_active_seconds
    }

    pub fn completed_sessions(&self) -> u32 {
        self.completed_sessions
    }

    pub fn history(&self) -> &[FocusRecord] {
        &self.history
    }

    pub fn daily_summary(&self) -> &DailySummarySetting {
        &self.daily_summary
    }

    pub fn version(&self) -> Version {
        self.version
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// 状態への直接アクセス（パターンマッチ用）
    pub fn state(&self) -> &FocusState {
        &self.state
    }

    // 状態遷移メソッド

    /// セッションを開始した新しいインスタンスを返す
    ///
    /// # Errors
    ///
    /// - `DomainError::AlreadyActive`: 既にフォーカス中
    pub fn started(self, options: StartFocusOptions, now: DateTime<Utc>) -> Result<Self, DomainError> {
        match self.state {
            FocusState::Active(_) => Err(DomainError::AlreadyActive {
                user_id: self.user_id.into_string(),
            }),
            FocusState::Inactive(_) => Ok(Self {
                channel_id: options.channel_id.or(self.channel_id),
                state: FocusState::Active(ActiveState {
                    started_at:      now,
                    planned_minutes: options.planned_minutes,
                    break_minutes:   options.break_minutes,
                }),
                version: self.version.next(),
                updated_at: now,
                ..self
            }),
        }
    }

    /// セッションを停止した新しいインスタンスと、今回の記録を返す
    ///
    /// 経過時間を累計に加算し、保持期間を過ぎた履歴を削除する。
    /// 時計が巻き戻った場合の経過時間は 0 とする。
    ///
    /// # Errors
    ///
    /// - `DomainError::NoActiveSession`: フォーカス中ではない
    pub fn stopped(self, now: DateTime<Utc>) -> Result<(Self, FocusRecord), DomainError> {
        let FocusState::Active(active) = self.state else {
            return Err(DomainError::NoActiveSession {
                user_id: self.user_id.into_string(),
            });
        };

        let record = FocusRecord {
            started_at:      active.started_at,
            ended_at:        now,
            elapsed_seconds: elapsed_seconds(active.started_at, now),
        };

        let retention_start = now - Duration::days(HISTORY_RETENTION_DAYS);
        let mut history = self.history;
        history.retain(|r| r.ended_at >= retention_start);
        history.push(record.clone());

        let stopped = Self {
            state: FocusState::Inactive(InactiveState {
                last_started_at: Some(active.started_at),
            }),
            accumulated_active_seconds: self
                .accumulated_active_seconds
                .saturating_add(record.elapsed_seconds),
            completed_sessions: self.completed_sessions.saturating_add(1),
            history,
            version: self.version.next(),
            updated_at: now,
            ..self
        };

        Ok((stopped, record))
    }

    /// デイリーサマリーを有効化した新しいインスタンスを返す
    ///
    /// 設定とチャンネルが既に同じ値なら、バージョンを含めて何も変更しない。
    pub fn daily_summary_enabled(
        self,
        channel_id: Option<ChannelId>,
        time: SummaryTime,
        now: DateTime<Utc>,
    ) -> Self {
        let setting = DailySummarySetting::enabled_at(time);
        let channel_id = channel_id.or_else(|| self.channel_id.clone());

        if self.daily_summary == setting && self.channel_id == channel_id {
            return self;
        }

        Self {
            channel_id,
            daily_summary: setting,
            version: self.version.next(),
            updated_at: now,
            ..self
        }
    }

    /// 指定日（UTC）に完了したセッションを集計する
    pub fn summary_for(&self, date: NaiveDate) -> DailySummary {
        let (sessions, total_seconds) = self
            .history
            .iter()
            .filter(|r| r.ended_at.date_naive() == date)
            .fold((0u32, 0u64), |(count, total), r| {
                (count + 1, total.saturating_add(r.elapsed_seconds))
            });

        DailySummary {
            date,
            enabled: self.daily_summary.enabled,
            time: self.daily_summary.time,
            sessions,
            total_seconds,
        }
    }
}

/// `from` から `to` までの経過秒数（負の場合は 0）
fn elapsed_seconds(from: DateTime<Utc>, to: DateTime<Utc>) -> u64 {
    u64::try_from((to - from).num_seconds()).unwrap_or(0)
}
