use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::application::book::BookForm;
use crate::domain::{Book, BookId, Version};

/// 書籍フォームの送信内容（POST /books, PUT /books/:id）
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BookFormRequest {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub author: String,
    /// 画面表示時点のバージョン（新規登録では無視される）
    #[serde(default)]
    pub version: i64,
    /// HTMLフォーム向けのメソッド上書き（POST /books/:id で PUT / DELETE を指定）
    #[serde(default, rename = "_method")]
    pub method: Option<String>,
}

impl BookFormRequest {
    pub fn to_form(&self, new_book: bool) -> BookForm {
        BookForm {
            new_book,
            ..BookForm::input(
                self.title.as_str(),
                self.author.as_str(),
                Version::from_i64(self.version),
            )
        }
    }
}

/// 書籍一覧の1行
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookResponse {
    pub id: i64,
    pub title: String,
    pub author: String,
    pub version: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&Book> for BookResponse {
    fn from(book: &Book) -> Self {
        Self {
            id: book.id().value(),
            title: book.title().to_string(),
            author: book.author().to_string(),
            version: book.version().value(),
            created_at: book.created_at(),
            updated_at: book.updated_at(),
        }
    }
}

/// 画面に渡すフォーム
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookFormResponse {
    pub title: String,
    pub author: String,
    pub new_book: bool,
    pub version: i64,
    pub books: Vec<BookResponse>,
}

impl From<BookForm> for BookFormResponse {
    fn from(form: BookForm) -> Self {
        Self {
            books: form.books.iter().map(BookResponse::from).collect(),
            title: form.title,
            author: form.author,
            new_book: form.new_book,
            version: form.version.value(),
        }
    }
}

/// 項目単位の入力エラー
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldErrorResponse {
    pub field: String,
    pub message: String,
}

/// 書籍画面のモデル（GET /books, GET /books/:id, およびエラー時の再表示）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookPageResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub book_id: Option<i64>,
    pub form: BookFormResponse,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    #[serde(default)]
    pub field_errors: Vec<FieldErrorResponse>,
}

impl BookPageResponse {
    pub fn new(form: BookForm, book_id: Option<BookId>) -> Self {
        Self {
            book_id: book_id.map(|id| id.value()),
            form: form.into(),
            error_message: None,
            field_errors: Vec::new(),
        }
    }

    pub fn with_error_message(mut self, message: impl Into<String>) -> Self {
        self.error_message = Some(message.into());
        self
    }

    pub fn with_field_errors(mut self, field_errors: Vec<FieldErrorResponse>) -> Self {
        self.field_errors = field_errors;
        self
    }
}

/// エラーレスポンス
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
        }
    }
}
