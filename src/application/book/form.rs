use crate::domain::{Book, NewBook, Version};

/// タイトルの最大文字数
pub const TITLE_MAX_LENGTH: usize = 30;

/// 著者名の最大文字数
pub const AUTHOR_MAX_LENGTH: usize = 40;

/// 書籍管理フォーム
///
/// 画面の入力値と、エラー時の再表示に使う書籍一覧を運ぶ。
/// リクエストごとに生成され、永続化されない。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookForm {
    pub title: String,
    pub author: String,
    /// 新規登録画面（true）か編集画面（false）か
    pub new_book: bool,
    /// 画面表示時点のバージョン（楽観排他のトークン）
    pub version: Version,
    pub books: Vec<Book>,
}

impl BookForm {
    /// 入力値を持たないフォーム
    pub fn new(new_book: bool, books: Vec<Book>) -> Self {
        Self {
            new_book,
            books,
            ..Default::default()
        }
    }

    /// 利用者の入力値からフォームを作成する
    pub fn input(title: impl Into<String>, author: impl Into<String>, version: Version) -> Self {
        Self {
            title: title.into(),
            author: author.into(),
            version,
            ..Default::default()
        }
    }

    /// 入力値の検証
    ///
    /// タイトル・著者名ともに空白のみは不可、最大文字数は文字単位で数える。
    pub fn validate(&self) -> Vec<FieldError> {
        let mut errors = Vec::new();
        check_field(FormField::Title, &self.title, TITLE_MAX_LENGTH, &mut errors);
        check_field(FormField::Author, &self.author, AUTHOR_MAX_LENGTH, &mut errors);
        errors
    }
}

fn check_field(field: FormField, value: &str, max: usize, errors: &mut Vec<FieldError>) {
    if value.trim().is_empty() {
        errors.push(FieldError {
            field,
            kind: FieldErrorKind::NotBlank,
        });
    } else if value.chars().count() > max {
        errors.push(FieldError {
            field,
            kind: FieldErrorKind::MaxSize { max },
        });
    }
}

/// 検証対象の項目
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Title,
    Author,
}

impl FormField {
    pub fn as_str(&self) -> &'static str {
        match self {
            FormField::Title => "title",
            FormField::Author => "author",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldErrorKind {
    NotBlank,
    MaxSize { max: usize },
}

/// 項目単位の検証エラー
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldError {
    pub field: FormField,
    pub kind: FieldErrorKind,
}

// ============================================================================
// Book <-> BookForm の写像
//
// 境界を越えるのは title / author / version のみ。
// id, created_at, updated_at はどちらの方向でも変更しない。
// ============================================================================

/// 書籍の内容をフォームへ写す
pub fn copy_book_to_form(book: &Book, form: &mut BookForm) {
    form.title = book.title().to_string();
    form.author = book.author().to_string();
    form.version = book.version();
}

/// フォームの内容を書籍へ写す
///
/// フォームのバージョンは書き込み時の期待バージョンになるため、
/// ストレージの条件付き更新はこの値で判定される。
pub fn copy_form_to_book(form: &BookForm, book: &mut Book) {
    book.set_title(form.title.as_str());
    book.set_author(form.author.as_str());
    book.expect_version(form.version);
}

/// フォームから新規書籍を作る
pub fn form_to_new_book(form: &BookForm) -> NewBook {
    NewBook::new(form.title.as_str(), form.author.as_str())
}
