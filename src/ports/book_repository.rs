use crate::domain::{Book, BookId, NewBook, Version};
use async_trait::async_trait;
use thiserror::Error;

/// ストレージ層のエラー
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// 条件付き更新で保存済みバージョンが一致しなかった
    ///
    /// 他のトランザクションが先に更新（または削除）した。
    #[error("Book {id} was modified concurrently (expected version {expected})")]
    VersionConflict { id: BookId, expected: Version },

    /// ストレージ障害、行データの変換失敗など
    #[error("Storage error")]
    Storage(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl From<sqlx::Error> for RepositoryError {
    fn from(err: sqlx::Error) -> Self {
        RepositoryError::Storage(Box::new(err))
    }
}

pub type Result<T> = std::result::Result<T, RepositoryError>;

/// 書籍リポジトリポート
///
/// 書籍テーブルへの永続化境界。永続化済みレコードの所有者。
/// 不在は`None` / `false`で返し、NotFoundの判定はサービス層の責務とする。
#[async_trait]
pub trait BookRepository: Send + Sync {
    /// 全件をID順（登録順）で取得する
    async fn find_all(&self) -> Result<Vec<Book>>;

    /// IDで書籍を取得する
    async fn find_by_id(&self, id: BookId) -> Result<Option<Book>>;

    /// 書籍が存在するか確認する
    async fn exists_by_id(&self, id: BookId) -> Result<bool>;

    /// 新規書籍を保存する
    ///
    /// IDを採番し、ライフサイクルの`on_create`を適用する（version = 0）。
    async fn insert(&self, book: NewBook) -> Result<Book>;

    /// 既存書籍をバージョン条件付きで更新する
    ///
    /// `book.version()`が保存済みバージョンと一致する場合のみ書き込み、
    /// バージョンを1増やし`updated_at`を更新したレコードを返す。
    /// 一致しない（または行が存在しない）場合は`VersionConflict`。
    /// 比較と書き込みはアトミックに行われる。
    async fn update(&self, book: Book) -> Result<Book>;

    /// IDで書籍を削除する
    ///
    /// 削除した場合は`true`、対象が存在しなかった場合は`false`。
    async fn delete_by_id(&self, id: BookId) -> Result<bool>;
}
