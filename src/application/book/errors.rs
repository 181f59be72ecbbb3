use crate::domain::BookId;
use crate::ports::RepositoryError;
use thiserror::Error;

/// 楽観排他エラーで報告するエンティティ種別
pub const BOOK_ENTITY: &str = "Book";

/// 書籍管理アプリケーション層のエラー
///
/// `BookNotFound`と`OptimisticLockFailure`は通常の同時利用で起こりうる
/// 想定内の結果であり、呼び出し側で画面を再表示して回復する。
#[derive(Debug, Error)]
pub enum BookApplicationError {
    /// 書籍が見つからない
    #[error("Book not found: id={0}")]
    BookNotFound(BookId),

    /// 画面表示後に他の利用者が書籍を更新した
    #[error("Optimistic lock failure: {entity} id={id}")]
    OptimisticLockFailure { entity: &'static str, id: BookId },

    /// リポジトリのエラー（回復不能）
    #[error("Repository error")]
    RepositoryError(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl From<RepositoryError> for BookApplicationError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::VersionConflict { id, .. } => {
                BookApplicationError::OptimisticLockFailure {
                    entity: BOOK_ENTITY,
                    id,
                }
            }
            RepositoryError::Storage(e) => BookApplicationError::RepositoryError(e),
        }
    }
}

/// アプリケーション層の Result型
pub type Result<T> = std::result::Result<T, BookApplicationError>;
