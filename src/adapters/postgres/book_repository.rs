use crate::domain::{Book, BookId, Lifecycle, NewBook, Version};
use crate::ports::book_repository::{BookRepository as BookRepositoryTrait, RepositoryError, Result};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::{PgPool, Row, postgres::PgRow};

/// PostgreSQLの行データをBookに変換する
fn map_row_to_book(row: &PgRow) -> Result<Book> {
    let lifecycle = Lifecycle::restore(
        row.try_get("created_at")?,
        row.try_get("updated_at")?,
        Version::from_i64(row.try_get("version")?),
    );

    Ok(Book::restore(
        BookId::from_i64(row.try_get("id")?),
        row.try_get("title")?,
        row.try_get("author")?,
        lifecycle,
    ))
}

/// BookRepositoryのPostgreSQL実装
///
/// 楽観排他は`UPDATE ... WHERE id = $n AND version = $m`の条件付き更新で行う。
/// 比較と書き込みが単一の文で実行されるため、サービス層の事前チェックと
/// 書き込みの間に他の更新が割り込んでも、古いバージョンの書き込みは拒否される。
pub struct BookRepository {
    pool: PgPool,
}

impl BookRepository {
    /// PostgreSQLコネクションプールから新しいBookRepositoryを作成
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BookRepositoryTrait for BookRepository {
    async fn find_all(&self) -> Result<Vec<Book>> {
        let rows = sqlx::query(
            r#"
            SELECT id, title, author, created_at, updated_at, version
            FROM books
            ORDER BY id ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(map_row_to_book).collect()
    }

    async fn find_by_id(&self, id: BookId) -> Result<Option<Book>> {
        let row = sqlx::query(
            r#"
            SELECT id, title, author, created_at, updated_at, version
            FROM books
            WHERE id = $1
            "#,
        )
        .bind(id.value())
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(map_row_to_book).transpose()
    }

    async fn exists_by_id(&self, id: BookId) -> Result<bool> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM books WHERE id = $1)")
            .bind(id.value())
            .fetch_one(&self.pool)
            .await?;

        Ok(exists)
    }

    /// 新規書籍をINSERTする
    ///
    /// IDはBIGSERIALで採番される。ライフサイクルは`on_create`で決まり、
    /// 採番結果のみRETURNINGで受け取る。
    async fn insert(&self, book: NewBook) -> Result<Book> {
        let lifecycle = Lifecycle::on_create(Utc::now());

        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO books (title, author, created_at, updated_at, version)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id
            "#,
        )
        .bind(&book.title)
        .bind(&book.author)
        .bind(lifecycle.created_at())
        .bind(lifecycle.updated_at())
        .bind(lifecycle.version().value())
        .fetch_one(&self.pool)
        .await?;

        Ok(Book::restore(
            BookId::from_i64(id),
            book.title,
            book.author,
            lifecycle,
        ))
    }

    /// バージョン条件付きUPDATE
    ///
    /// 0行更新の場合はバージョン不一致または削除済み。どちらも
    /// `VersionConflict`として扱う。
    /// `updated_at`は`GREATEST`で保存済みの値より後になることを保証する。
    async fn update(&self, mut book: Book) -> Result<Book> {
        let id = book.id();
        let expected = book.version();
        book.touch(Utc::now());

        let row = sqlx::query(
            r#"
            UPDATE books
            SET title = $1,
                author = $2,
                updated_at = GREATEST($3, updated_at + INTERVAL '1 microsecond'),
                version = version + 1
            WHERE id = $4 AND version = $5
            RETURNING id, title, author, created_at, updated_at, version
            "#,
        )
        .bind(book.title())
        .bind(book.author())
        .bind(book.updated_at())
        .bind(id.value())
        .bind(expected.value())
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => map_row_to_book(&row),
            None => Err(RepositoryError::VersionConflict { id, expected }),
        }
    }

    async fn delete_by_id(&self, id: BookId) -> Result<bool> {
        let result = sqlx::query("DELETE FROM books WHERE id = $1")
            .bind(id.value())
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
