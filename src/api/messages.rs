use std::collections::HashMap;

use crate::application::book::{FieldError, FieldErrorKind};

/// 書籍が見つからない
pub const BOOK_NOT_FOUND: &str = "error.booknotfound";
/// 楽観排他エラー
pub const OPTIMISTIC_LOCK_FAILURE: &str = "error.optlockfailure";
/// 必須入力
pub const NOT_BLANK: &str = "validation.not-blank";
/// 最大文字数超過（`{max}`は上限値に置換される）
pub const MAX_SIZE: &str = "validation.max-size";

/// 画面に表示するメッセージのリソース
///
/// キーからメッセージを引く。未登録のキーはキー自体を返す。
#[derive(Debug, Clone)]
pub struct Messages {
    entries: HashMap<&'static str, String>,
}

impl Messages {
    pub fn new() -> Self {
        let entries = [
            (BOOK_NOT_FOUND, "The specified book was not found."),
            (
                OPTIMISTIC_LOCK_FAILURE,
                "The book was updated by another user. Please reload and try again.",
            ),
            (NOT_BLANK, "must not be blank"),
            (MAX_SIZE, "must be at most {max} characters"),
        ]
        .into_iter()
        .map(|(key, message)| (key, message.to_string()))
        .collect();

        Self { entries }
    }

    /// メッセージを差し替える
    pub fn with(mut self, key: &'static str, message: impl Into<String>) -> Self {
        self.entries.insert(key, message.into());
        self
    }

    pub fn get(&self, key: &str) -> String {
        self.entries
            .get(key)
            .cloned()
            .unwrap_or_else(|| key.to_string())
    }

    /// 項目エラーのメッセージ
    pub fn field_error(&self, error: &FieldError) -> String {
        match error.kind {
            FieldErrorKind::NotBlank => self.get(NOT_BLANK),
            FieldErrorKind::MaxSize { max } => self.get(MAX_SIZE).replace("{max}", &max.to_string()),
        }
    }
}

impl Default for Messages {
    fn default() -> Self {
        Self::new()
    }
}
