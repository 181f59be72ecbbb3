use serde::{Deserialize, Serialize};
use std::fmt;

/// 書籍ID - 永続化時にストレージが採番する識別子
///
/// 採番後は変更されない。値は常に正の整数。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BookId(i64);

impl BookId {
    pub fn from_i64(value: i64) -> Self {
        Self(value)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for BookId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// バージョン - 楽観排他制御のトークン
///
/// 不変条件：新規作成時は0、更新成功ごとに1ずつ増加し、減少しない。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Version(i64);

impl Version {
    /// 初期バージョン（0）
    pub fn initial() -> Self {
        Self(0)
    }

    pub fn from_i64(value: i64) -> Self {
        Self(value)
    }

    /// 次のバージョン
    pub fn next(self) -> Self {
        Self(self.0 + 1)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}

impl Default for Version {
    fn default() -> Self {
        Self::initial()
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
