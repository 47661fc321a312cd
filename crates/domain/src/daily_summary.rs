//! # デイリーサマリー
//!
//! デイリーサマリーの配信設定と、1 日分のフォーカス実績の集計結果を定義する。
//!
//! 配信そのもの（いつ・どこへ送るか）はチャットプラットフォームのスケジューラが担い、
//! このモジュールは設定の保持と集計結果のテキスト化のみを行う。

use std::str::FromStr;

use chrono::NaiveDate;
use derive_more::Display;
use serde::{Deserialize, Serialize};

use crate::DomainError;

/// サマリー配信時刻（UTC の `HH:MM`）
///
/// # 使用例
///
/// ```rust
/// use focuspulse_domain::daily_summary::SummaryTime;
///
/// let time: SummaryTime = "07:30".parse().unwrap();
/// assert_eq!(time.to_string(), "07:30");
/// assert_eq!(SummaryTime::default().to_string(), "21:00");
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display, Serialize, Deserialize,
)]
#[display("{hour:02}:{minute:02}")]
#[serde(try_from = "String", into = "String")]
pub struct SummaryTime {
    hour:   u8,
    minute: u8,
}

impl SummaryTime {
    pub fn new(hour: u8, minute: u8) -> Result<Self, DomainError> {
        if hour > 23 || minute > 59 {
            return Err(DomainError::Validation(format!(
                "サマリー時刻が範囲外です: {hour:02}:{minute:02}"
            )));
        }
        Ok(Self { hour, minute })
    }

    pub fn hour(&self) -> u8 {
        self.hour
    }

    pub fn minute(&self) -> u8 {
        self.minute
    }
}

impl Default for SummaryTime {
    fn default() -> Self {
        Self {
            hour:   21,
            minute: 0,
        }
    }
}

impl FromStr for SummaryTime {
    type Err = DomainError;

    /// `HH:MM` 形式（時・分とも 2 桁）のみ受け付ける
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || {
            DomainError::Validation(format!(
                "サマリー時刻は HH:MM 形式で指定してください: {s:?}"
            ))
        };

        let (hour, minute) = s.trim().split_once(':').ok_or_else(invalid)?;
        let two_digits = |part: &str| part.len() == 2 && part.bytes().all(|b| b.is_ascii_digit());
        if !two_digits(hour) || !two_digits(minute) {
            return Err(invalid());
        }
        let hour: u8 = hour.parse().map_err(|_| invalid())?;
        let minute: u8 = minute.parse().map_err(|_| invalid())?;

        Self::new(hour, minute)
    }
}

impl TryFrom<String> for SummaryTime {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<SummaryTime> for String {
    fn from(time: SummaryTime) -> Self {
        time.to_string()
    }
}

/// デイリーサマリーの配信設定
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DailySummarySetting {
    pub enabled: bool,
    pub time:    SummaryTime,
}

impl DailySummarySetting {
    /// 指定時刻で有効化された設定を作成する
    pub fn enabled_at(time: SummaryTime) -> Self {
        Self {
            enabled: true,
            time,
        }
    }
}

/// 1 日分のフォーカス実績
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DailySummary {
    /// 集計対象日（UTC）
    pub date:          NaiveDate,
    /// 配信設定が有効か
    pub enabled:       bool,
    /// 配信時刻
    pub time:          SummaryTime,
    /// 対象日に完了したセッション数
    pub sessions:      u32,
    /// 対象日に完了したセッションの合計秒数
    pub total_seconds: u64,
}

impl DailySummary {
    /// 実績ゼロのサマリーを作成する（未登録ユーザー用）
    pub fn empty(date: NaiveDate) -> Self {
        let setting = DailySummarySetting::default();
        Self {
            date,
            enabled: setting.enabled,
            time: setting.time,
            sessions: 0,
            total_seconds: 0,
        }
    }

    /// 合計時間（分、切り捨て）
    pub fn total_minutes(&self) -> u64 {
        self.total_seconds / 60
    }

    /// チャンネルに投稿するサマリーテキスト
    pub fn message(&self) -> String {
        let noun = if self.sessions == 1 {
            "session"
        } else {
            "sessions"
        };
        format!(
            "📊 Daily Focus Summary: You completed {} {noun} today, totaling {} minutes. Keep it up!",
            self.sessions,
            self.total_minutes()
        )
    }
}
