use crate::domain::{Book, BookId, NewBook};
use crate::ports::book_repository::{BookRepository as BookRepositoryTrait, RepositoryError, Result};
use async_trait::async_trait;
use chrono::Utc;
use std::collections::BTreeMap;
use std::sync::Mutex;

#[derive(Default)]
struct State {
    books: BTreeMap<BookId, Book>,
    last_id: i64,
}

/// BookRepositoryのインメモリ実装
///
/// テストおよび`BOOK_STORAGE=memory`での起動時に使用する。
/// すべての書き込みはMutex内で行うため、バージョン比較と書き込みはアトミック。
pub struct BookRepository {
    state: Mutex<State>,
}

impl BookRepository {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(State::default()),
        }
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, State>> {
        self.state
            .lock()
            .map_err(|e| RepositoryError::Storage(e.to_string().into()))
    }
}

impl Default for BookRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BookRepositoryTrait for BookRepository {
    async fn find_all(&self) -> Result<Vec<Book>> {
        Ok(self.lock()?.books.values().cloned().collect())
    }

    async fn find_by_id(&self, id: BookId) -> Result<Option<Book>> {
        Ok(self.lock()?.books.get(&id).cloned())
    }

    async fn exists_by_id(&self, id: BookId) -> Result<bool> {
        Ok(self.lock()?.books.contains_key(&id))
    }

    async fn insert(&self, book: NewBook) -> Result<Book> {
        let mut state = self.lock()?;
        state.last_id += 1;
        let id = BookId::from_i64(state.last_id);

        let book = book.into_persisted(id, Utc::now());
        state.books.insert(id, book.clone());

        Ok(book)
    }

    async fn update(&self, book: Book) -> Result<Book> {
        let mut state = self.lock()?;
        let id = book.id();
        let expected = book.version();

        let stored = state
            .books
            .get_mut(&id)
            .filter(|stored| stored.version() == expected)
            .ok_or(RepositoryError::VersionConflict { id, expected })?;

        stored.set_title(book.title());
        stored.set_author(book.author());
        stored.touch(Utc::now());
        stored.mark_updated();

        Ok(stored.clone())
    }

    async fn delete_by_id(&self, id: BookId) -> Result<bool> {
        Ok(self.lock()?.books.remove(&id).is_some())
    }
}
