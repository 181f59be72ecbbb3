use crate::domain::{Book, BookId};
use crate::ports::BookRepository;
use std::sync::Arc;
use std::time::Instant;

use super::errors::{BOOK_ENTITY, BookApplicationError, Result};
use super::form::{BookForm, copy_book_to_form, copy_form_to_book, form_to_new_book};

/// サービスの依存関係
///
/// 振る舞いは持たず、各ユースケース関数に明示的に渡す。
#[derive(Clone)]
pub struct ServiceDependencies {
    pub book_repository: Arc<dyn BookRepository>,
}

/// 処理時間をtraceレベルで記録する
///
/// 各ユースケースのspan内で生成し、span終了前に破棄される。
struct Stopwatch {
    operation: &'static str,
    started_at: Instant,
}

impl Stopwatch {
    fn start(operation: &'static str) -> Self {
        Self {
            operation,
            started_at: Instant::now(),
        }
    }
}

impl Drop for Stopwatch {
    fn drop(&mut self) {
        tracing::trace!(
            operation = self.operation,
            elapsed_ms = self.started_at.elapsed().as_millis() as u64,
            "book service call finished"
        );
    }
}

async fn find_all_books(deps: &ServiceDependencies) -> Result<Vec<Book>> {
    Ok(deps.book_repository.find_all().await?)
}

/// 書籍一覧画面の初期表示
///
/// 新規登録用の空フォームに全書籍を添えて返す。
#[tracing::instrument(skip(deps))]
pub async fn init_books(deps: &ServiceDependencies) -> Result<BookForm> {
    let _stopwatch = Stopwatch::start("init_books");

    let books = find_all_books(deps).await?;
    Ok(BookForm::new(true, books))
}

/// 書籍を1件取得し、編集用フォームを返す
///
/// # エラー
/// - BookNotFound: 指定IDの書籍が存在しない
#[tracing::instrument(skip(deps, id), fields(book_id = %id))]
pub async fn read_one_book(deps: &ServiceDependencies, id: BookId) -> Result<BookForm> {
    let _stopwatch = Stopwatch::start("read_one_book");

    let book = deps
        .book_repository
        .find_by_id(id)
        .await?
        .ok_or(BookApplicationError::BookNotFound(id))?;

    let books = find_all_books(deps).await?;
    let mut form = BookForm::new(false, books);
    copy_book_to_form(&book, &mut form);

    Ok(form)
}

/// 書籍を新規登録する
///
/// IDとライフサイクル情報はリポジトリが設定する。
#[tracing::instrument(skip(deps, form))]
pub async fn create_book(deps: &ServiceDependencies, form: &BookForm) -> Result<Book> {
    let _stopwatch = Stopwatch::start("create_book");

    let book = deps.book_repository.insert(form_to_new_book(form)).await?;
    tracing::debug!(book_id = %book.id(), "book created");

    Ok(book)
}

/// 書籍を更新する
///
/// 1. 書籍を取得（存在しなければBookNotFound）
/// 2. 保存済みバージョンとフォームのバージョンを比較（早期の楽観排他チェック）
/// 3. フォームの内容を書籍へ写し、バージョン条件付きで保存
///
/// 2と3の間に他の更新が割り込んだ場合は、3の条件付き更新が失敗し
/// 同じくOptimisticLockFailureになる。
///
/// # エラー
/// - BookNotFound: 指定IDの書籍が存在しない
/// - OptimisticLockFailure: フォーム表示後に書籍が更新された
#[tracing::instrument(skip(deps, id, form), fields(book_id = %id, version = %form.version))]
pub async fn update_book(deps: &ServiceDependencies, id: BookId, form: &BookForm) -> Result<Book> {
    let _stopwatch = Stopwatch::start("update_book");

    let mut book = deps
        .book_repository
        .find_by_id(id)
        .await?
        .ok_or(BookApplicationError::BookNotFound(id))?;

    if book.version() != form.version {
        return Err(BookApplicationError::OptimisticLockFailure {
            entity: BOOK_ENTITY,
            id,
        });
    }

    copy_form_to_book(form, &mut book);
    let updated = deps.book_repository.update(book).await?;
    tracing::debug!(book_id = %id, version = %updated.version(), "book updated");

    Ok(updated)
}

/// 書籍を削除する
///
/// バージョンは確認しない。
///
/// # エラー
/// - BookNotFound: 指定IDの書籍が存在しない（確認後に削除された場合も含む）
#[tracing::instrument(skip(deps, id), fields(book_id = %id))]
pub async fn delete_book(deps: &ServiceDependencies, id: BookId) -> Result<()> {
    let _stopwatch = Stopwatch::start("delete_book");

    if !deps.book_repository.exists_by_id(id).await? {
        return Err(BookApplicationError::BookNotFound(id));
    }

    if !deps.book_repository.delete_by_id(id).await? {
        return Err(BookApplicationError::BookNotFound(id));
    }
    tracing::debug!(book_id = %id, "book deleted");

    Ok(())
}
