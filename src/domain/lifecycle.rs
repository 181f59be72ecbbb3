use chrono::{DateTime, Duration, DurationRound, Utc};
use serde::{Deserialize, Serialize};

use super::Version;

/// タイムスタンプの保存精度（PostgreSQL TIMESTAMPTZ はマイクロ秒）
fn timestamp_precision() -> Duration {
    Duration::microseconds(1)
}

/// 永続化エンティティのライフサイクル情報
///
/// すべての永続化エンティティに埋め込まれる監査情報。
/// リポジトリの保存処理から`on_create` / `on_update`が呼ばれる。
///
/// 不変条件：
/// - `created_at`は作成時に一度だけ設定される
/// - `updated_at >= created_at`
/// - `version`はストレージ層の条件付き更新でのみ増加する
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lifecycle {
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    version: Version,
}

impl Lifecycle {
    /// 初回永続化時のライフサイクル
    ///
    /// `created_at`と`updated_at`は同じ値、バージョンは0。
    pub fn on_create(now: DateTime<Utc>) -> Self {
        let now = truncate(now);
        Self {
            created_at: now,
            updated_at: now,
            version: Version::initial(),
        }
    }

    /// 更新時のライフサイクル
    ///
    /// `updated_at`のみを更新する。時計が戻った場合や同一マイクロ秒内の
    /// 連続更新でも、前回値より必ず後の時刻になる。
    pub fn on_update(&mut self, now: DateTime<Utc>) {
        let now = truncate(now);
        let floor = self.updated_at + timestamp_precision();
        self.updated_at = now.max(floor);
    }

    /// ストレージから読み込んだ値で復元する
    pub fn restore(created_at: DateTime<Utc>, updated_at: DateTime<Utc>, version: Version) -> Self {
        Self {
            created_at,
            updated_at,
            version,
        }
    }

    /// 条件付き更新が成功した後のバージョンを反映する
    pub(crate) fn bump_version(&mut self) {
        self.version = self.version.next();
    }

    pub(crate) fn set_version(&mut self, version: Version) {
        self.version = version;
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    pub fn version(&self) -> Version {
        self.version
    }
}

fn truncate(dt: DateTime<Utc>) -> DateTime<Utc> {
    dt.duration_trunc(timestamp_precision()).unwrap_or(dt)
}
