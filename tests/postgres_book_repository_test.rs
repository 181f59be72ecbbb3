mod common;

use rusty_bookmanage::adapters::postgres::PostgresBookRepository;
use rusty_bookmanage::domain::{BookId, NewBook, Version};
use rusty_bookmanage::ports::{BookRepository, RepositoryError};
use serial_test::serial;
use sqlx::PgPool;
use std::sync::Arc;

/// テストデータをクリーンアップ
async fn cleanup_book(pool: &PgPool, id: BookId) {
    sqlx::query("DELETE FROM books WHERE id = $1")
        .bind(id.value())
        .execute(pool)
        .await
        .expect("Failed to cleanup test book");
}

#[tokio::test]
#[serial]
#[ignore = "requires PostgreSQL (DATABASE_URL)"]
async fn test_insert_sets_lifecycle_and_id() {
    let pool = common::create_test_pool().await;
    let repository = PostgresBookRepository::new(pool.clone());

    let book = repository
        .insert(NewBook::new("testタイトル", "test著者名"))
        .await
        .expect("Failed to insert book");

    assert!(book.id().value() > 0);
    assert_eq!(book.version(), Version::initial());
    assert_eq!(book.created_at(), book.updated_at());

    // 保存した値がそのまま読み出せる（マイクロ秒精度）
    let stored = repository
        .find_by_id(book.id())
        .await
        .expect("Failed to find book")
        .expect("Book should exist");
    assert_eq!(stored, book);

    cleanup_book(&pool, book.id()).await;
}

#[tokio::test]
#[serial]
#[ignore = "requires PostgreSQL (DATABASE_URL)"]
async fn test_update_increments_version_and_updated_at() {
    let pool = common::create_test_pool().await;
    let repository = PostgresBookRepository::new(pool.clone());
    let book = repository
        .insert(NewBook::new("testタイトル", "test著者名"))
        .await
        .unwrap();

    let mut changed = book.clone();
    changed.set_title("testタイトル(更新)");
    changed.set_author("test著者名(更新)");
    let updated = repository.update(changed).await.expect("Failed to update");

    assert_eq!(updated.id(), book.id());
    assert_eq!(updated.title(), "testタイトル(更新)");
    assert_eq!(updated.author(), "test著者名(更新)");
    assert_eq!(updated.version().value(), 1);
    assert_eq!(updated.created_at(), book.created_at());
    assert!(updated.updated_at() > book.updated_at());

    cleanup_book(&pool, book.id()).await;
}

#[tokio::test]
#[serial]
#[ignore = "requires PostgreSQL (DATABASE_URL)"]
async fn test_update_with_stale_version_is_rejected() {
    let pool = common::create_test_pool().await;
    let repository = PostgresBookRepository::new(pool.clone());
    let book = repository.insert(NewBook::new("T1", "A1")).await.unwrap();
    repository.update(book.clone()).await.unwrap();

    let mut stale = book.clone();
    stale.set_title("lost update");
    let result = repository.update(stale).await;

    assert!(matches!(
        result,
        Err(RepositoryError::VersionConflict { id, expected }) if id == book.id() && expected == Version::initial()
    ));
    let stored = repository.find_by_id(book.id()).await.unwrap().unwrap();
    assert_eq!(stored.title(), "T1");
    assert_eq!(stored.version().value(), 1);

    cleanup_book(&pool, book.id()).await;
}

#[tokio::test]
#[serial]
#[ignore = "requires PostgreSQL (DATABASE_URL)"]
async fn test_concurrent_conditional_updates() {
    let pool = common::create_test_pool().await;
    let repository = Arc::new(PostgresBookRepository::new(pool.clone()));
    let book = repository.insert(NewBook::new("T1", "A1")).await.unwrap();

    let handles: Vec<_> = (0..5)
        .map(|i| {
            let repository = repository.clone();
            let mut candidate = book.clone();
            candidate.set_title(format!("writer {}", i));
            tokio::spawn(async move { repository.update(candidate).await })
        })
        .collect();

    let mut succeeded = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(updated) => {
                succeeded += 1;
                assert_eq!(updated.version().value(), 1);
            }
            Err(RepositoryError::VersionConflict { .. }) => {}
            Err(e) => panic!("unexpected error: {}", e),
        }
    }
    assert_eq!(succeeded, 1);

    cleanup_book(&pool, book.id()).await;
}

#[tokio::test]
#[serial]
#[ignore = "requires PostgreSQL (DATABASE_URL)"]
async fn test_exists_and_delete() {
    let pool = common::create_test_pool().await;
    let repository = PostgresBookRepository::new(pool.clone());
    let book = repository.insert(NewBook::new("T1", "A1")).await.unwrap();

    assert!(repository.exists_by_id(book.id()).await.unwrap());
    assert!(repository.delete_by_id(book.id()).await.unwrap());
    assert!(!repository.exists_by_id(book.id()).await.unwrap());
    assert!(!repository.delete_by_id(book.id()).await.unwrap());
    assert!(repository.find_by_id(book.id()).await.unwrap().is_none());
}

#[tokio::test]
#[serial]
#[ignore = "requires PostgreSQL (DATABASE_URL)"]
async fn test_find_all_is_ordered_by_id() {
    let pool = common::create_test_pool().await;
    let repository = PostgresBookRepository::new(pool.clone());
    let first = repository.insert(NewBook::new("T1", "A1")).await.unwrap();
    let second = repository.insert(NewBook::new("T2", "A2")).await.unwrap();

    let ids: Vec<BookId> = repository
        .find_all()
        .await
        .unwrap()
        .iter()
        .map(|b| b.id())
        .filter(|id| *id == first.id() || *id == second.id())
        .collect();

    assert_eq!(ids, vec![first.id(), second.id()]);

    cleanup_book(&pool, first.id()).await;
    cleanup_book(&pool, second.id()).await;
}
