mod book_service;
mod errors;
mod form;

pub use book_service::{
    ServiceDependencies, create_book, delete_book, init_books, read_one_book, update_book,
};
pub use errors::{BOOK_ENTITY, BookApplicationError, Result};
pub use form::{
    AUTHOR_MAX_LENGTH, BookForm, FieldError, FieldErrorKind, FormField, TITLE_MAX_LENGTH,
    copy_book_to_form, copy_form_to_book, form_to_new_book,
};
