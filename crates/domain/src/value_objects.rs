//! # 共通値オブジェクト
//!
//! 複数のエンティティで共有される値オブジェクトを定義する。
//!
//! ## 設計方針
//!
//! - **Newtype パターン**: プリミティブ型をラップし、型安全性を確保
//! - **バリデーション**: 生成時に検証し、不正な値の存在を型レベルで排除
//! - **不変性**: 一度作成したら変更不可
//!
//! ## 含まれる型
//!
//! | 型 | ラップ対象 | 用途 |
//! |---|-----------|------|
//! | [`Version`] | `u32` | エンティティのバージョン番号（楽観的ロック） |
//! | [`PlannedMinutes`] | `u32` | 予定フォーカス時間（分） |
//! | [`BreakMinutes`] | `u32` | 休憩時間（分） |

use serde::{Deserialize, Serialize};

use crate::DomainError;

// =========================================================================
// Version（バージョン番号）
// =========================================================================

/// バージョン番号（値オブジェクト）
///
/// 1 から始まり、更新のたびにインクリメントされる。
/// 同一ユーザーへの並行更新を検出するために使用する。
///
/// # 使用例
///
/// ```rust
/// use focuspulse_domain::value_objects::Version;
///
/// let v1 = Version::initial();
/// assert_eq!(v1.as_u32(), 1);
///
/// let v2 = v1.next();
/// assert_eq!(v2.as_u32(), 2);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct Version(u32);

impl Version {
    /// 初期バージョン（1）を作成する
    pub fn initial() -> Self {
        Self(1)
    }

    /// 指定した値からバージョンを作成する
    ///
    /// # エラー
    ///
    /// 0 を指定した場合は `DomainError::Validation` を返す。
    pub fn new(value: u32) -> Result<Self, DomainError> {
        if value == 0 {
            return Err(DomainError::Validation(
                "バージョン番号は 1 以上である必要があります".to_string(),
            ));
        }
        Ok(Self(value))
    }

    /// 次のバージョンを返す
    ///
    /// u32 の上限に達した場合は上限に張り付く。実運用では到達しない。
    pub fn next(&self) -> Self {
        Self(self.0.saturating_add(1))
    }

    /// 内部の u32 値を取得する
    pub fn as_u32(&self) -> u32 {
        self.0
    }
}

impl TryFrom<u32> for Version {
    type Error = DomainError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Version> for u32 {
    fn from(version: Version) -> Self {
        version.0
    }
}

impl Default for Version {
    fn default() -> Self {
        Self::initial()
    }
}

impl std::fmt::Display for Version {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "v{}", self.0)
    }
}

// =========================================================================
// PlannedMinutes（予定フォーカス時間）
// =========================================================================

/// 予定フォーカス時間（分）
///
/// # 不変条件
///
/// - 1 以上 [`PlannedMinutes::MAX`] 以下
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct PlannedMinutes(u32);

impl PlannedMinutes {
    /// 既定値（ポモドーロの 25 分）
    pub const DEFAULT: u32 = 25;
    /// 上限（8 時間）
    pub const MAX: u32 = 480;

    pub fn new(value: u32) -> Result<Self, DomainError> {
        if value == 0 || value > Self::MAX {
            return Err(DomainError::Validation(format!(
                "フォーカス時間は 1 〜 {} 分の範囲で指定してください",
                Self::MAX
            )));
        }
        Ok(Self(value))
    }

    pub fn as_u32(&self) -> u32 {
        self.0
    }
}

impl Default for PlannedMinutes {
    fn default() -> Self {
        Self(Self::DEFAULT)
    }
}

impl TryFrom<u32> for PlannedMinutes {
    type Error = DomainError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<PlannedMinutes> for u32 {
    fn from(minutes: PlannedMinutes) -> Self {
        minutes.0
    }
}

// =========================================================================
// BreakMinutes（休憩時間）
// =========================================================================

/// 休憩時間（分）
///
/// # 不変条件
///
/// - 0 以上 [`BreakMinutes::MAX`] 以下（0 は休憩なし）
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct BreakMinutes(u32);

impl BreakMinutes {
    pub const DEFAULT: u32 = 5;
    pub const MAX: u32 = 120;

    pub fn new(value: u32) -> Result<Self, DomainError> {
        if value > Self::MAX {
            return Err(DomainError::Validation(format!(
                "休憩時間は 0 〜 {} 分の範囲で指定してください",
                Self::MAX
            )));
        }
        Ok(Self(value))
    }

    pub fn as_u32(&self) -> u32 {
        self.0
    }
}

impl Default for BreakMinutes {
    fn default() -> Self {
        Self(Self::DEFAULT)
    }
}

impl TryFrom<u32> for BreakMinutes {
    type Error = DomainError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<BreakMinutes> for u32 {
    fn from(minutes: BreakMinutes) -> Self {
        minutes.0
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;

    // ===== Version =====

    #[test]
    fn test_version_0は拒否される() {
        assert!(Version::new(0).is_err());
    }

    #[test]
    fn test_version_nextで1増える() {
        let v = Version::new(41).unwrap();
        assert_eq!(v.next().as_u32(), 42);
    }

    #[test]
    fn test_version_上限でオーバーフローしない() {
        let v = Version::new(u32::MAX).unwrap();
        assert_eq!(v.next().as_u32(), u32::MAX);
    }

    #[test]
    fn test_version_0のデシリアライズは失敗する() {
        let result: Result<Version, _> = serde_json::from_str("0");
        assert!(result.is_err());
    }

    // ===== PlannedMinutes =====

    #[rstest]
    #[case(1)]
    #[case(25)]
    #[case(480)]
    fn test_planned_minutes_範囲内は受け付ける(#[case] value: u32) {
        assert_eq!(PlannedMinutes::new(value).unwrap().as_u32(), value);
    }

    #[rstest]
    #[case(0)]
    #[case(481)]
    fn test_planned_minutes_範囲外は拒否される(#[case] value: u32) {
        assert!(matches!(
            PlannedMinutes::new(value),
            Err(DomainError::Validation(_))
        ));
    }

    #[test]
    fn test_planned_minutes_既定値は25分() {
        assert_eq!(PlannedMinutes::default().as_u32(), 25);
    }

    // ===== BreakMinutes =====

    #[rstest]
    #[case(0)]
    #[case(5)]
    #[case(120)]
    fn test_break_minutes_範囲内は受け付ける(#[case] value: u32) {
        assert_eq!(BreakMinutes::new(value).unwrap().as_u32(), value);
    }

    #[test]
    fn test_break_minutes_上限超過は拒否される() {
        assert!(BreakMinutes::new(121).is_err());
    }

    #[test]
    fn test_break_minutes_既定値は5分() {
        assert_eq!(BreakMinutes::default().as_u32(), 5);
    }
}
