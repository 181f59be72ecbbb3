use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{BookId, Lifecycle, Version};

/// 未永続化の書籍（状態：NEW）
///
/// IDとライフサイクル情報はまだ持たない。
/// リポジトリの`insert`で永続化されると`Book`になる。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewBook {
    pub title: String,
    pub author: String,
}

impl NewBook {
    pub fn new(title: impl Into<String>, author: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            author: author.into(),
        }
    }

    /// 永続化する（初回保存時にリポジトリから呼ばれる）
    ///
    /// ライフサイクルの`on_create`を適用し、採番済みIDを割り当てる。
    pub fn into_persisted(self, id: BookId, now: DateTime<Utc>) -> Book {
        Book {
            id,
            title: self.title,
            author: self.author,
            lifecycle: Lifecycle::on_create(now),
        }
    }
}

/// 永続化済みの書籍（状態：PERSISTED）
///
/// IDは採番後に変更できないため、フィールドは非公開とし
/// タイトルと著者名のみ変更メソッドを提供する。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    id: BookId,
    title: String,
    author: String,
    lifecycle: Lifecycle,
}

impl Book {
    /// ストレージの行から復元する
    pub fn restore(id: BookId, title: String, author: String, lifecycle: Lifecycle) -> Self {
        Self {
            id,
            title,
            author,
            lifecycle,
        }
    }

    pub fn id(&self) -> BookId {
        self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn author(&self) -> &str {
        &self.author
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.lifecycle.created_at()
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.lifecycle.updated_at()
    }

    pub fn version(&self) -> Version {
        self.lifecycle.version()
    }

    pub fn lifecycle(&self) -> &Lifecycle {
        &self.lifecycle
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    pub fn set_author(&mut self, author: impl Into<String>) {
        self.author = author.into();
    }

    /// 書き込み時に期待するバージョンを設定する
    ///
    /// リポジトリの条件付き更新はこの値と保存済みバージョンを比較する。
    pub fn expect_version(&mut self, version: Version) {
        self.lifecycle.set_version(version);
    }

    /// 更新前処理（リポジトリの更新パスから呼ばれる）
    pub fn touch(&mut self, now: DateTime<Utc>) {
        self.lifecycle.on_update(now);
    }

    /// 条件付き更新の成功を反映する
    pub fn mark_updated(&mut self) {
        self.lifecycle.bump_version();
    }
}
