use crate::application::book::{
    BookApplicationError, BookForm, ServiceDependencies, create_book as execute_create_book,
    delete_book as execute_delete_book, init_books as execute_init_books,
    read_one_book as execute_read_one_book, update_book as execute_update_book,
};
use crate::domain::BookId;
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use std::sync::Arc;

use super::{
    error::ApiError,
    messages::{self, Messages},
    types::{BookFormRequest, BookPageResponse, ErrorResponse, FieldErrorResponse},
};

/// 登録・更新・削除の成功後の遷移先
const REDIRECT_TO: &str = "/books";

// ============================================================================
// State
// ============================================================================

/// ハンドラー間で共有されるアプリケーション状態
#[derive(Clone)]
pub struct AppState {
    pub service_deps: ServiceDependencies,
    pub messages: Messages,
}

// ============================================================================
// Query handlers (GET)
// ============================================================================

/// GET /books - 書籍一覧（新規登録フォーム付き）
pub async fn read_books(State(state): State<Arc<AppState>>) -> Result<Response, ApiError> {
    let form = execute_init_books(&state.service_deps).await?;

    Ok(Json(BookPageResponse::new(form, None)).into_response())
}

/// GET /books/:id - 書籍1件の編集フォーム
///
/// 見つからない場合は一覧を再表示し、エラーメッセージを添える。
pub async fn read_one_book(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Response, ApiError> {
    let id = BookId::from_i64(id);

    match execute_read_one_book(&state.service_deps, id).await {
        Ok(form) => Ok(Json(BookPageResponse::new(form, Some(id))).into_response()),
        Err(e) => render_error(&state, BookForm::new(true, Vec::new()), None, e).await,
    }
}

// ============================================================================
// Command handlers (POST / PUT / DELETE)
// ============================================================================

/// POST /books - 書籍を新規登録
pub async fn create_book(
    State(state): State<Arc<AppState>>,
    Json(req): Json<BookFormRequest>,
) -> Result<Response, ApiError> {
    let form = req.to_form(true);

    if !form.validate().is_empty() {
        return render_validation_errors(&state, form, None).await;
    }

    match execute_create_book(&state.service_deps, &form).await {
        Ok(_) => Ok(Redirect::to(REDIRECT_TO).into_response()),
        Err(e) => render_error(&state, form, None, e).await,
    }
}

/// PUT /books/:id - 書籍を更新
///
/// フォームのバージョンが保存済みバージョンと異なる場合は、
/// 入力内容を保ったままフォームを再表示する。
pub async fn update_book(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Json(req): Json<BookFormRequest>,
) -> Result<Response, ApiError> {
    update(&state, BookId::from_i64(id), &req).await
}

/// DELETE /books/:id - 書籍を削除
pub async fn delete_book(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Response, ApiError> {
    delete(&state, BookId::from_i64(id)).await
}

/// POST /books/:id - `_method`によるPUT / DELETEの振り分け
///
/// HTMLフォームはGET / POSTしか送れないため、送信内容の`_method`で
/// 実際のメソッドを指定する。
pub async fn override_method(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Json(req): Json<BookFormRequest>,
) -> Result<Response, ApiError> {
    let id = BookId::from_i64(id);

    match req.method.as_deref().map(str::to_ascii_uppercase).as_deref() {
        Some("PUT") => update(&state, id, &req).await,
        Some("DELETE") => delete(&state, id).await,
        other => {
            tracing::debug!("Unsupported method override: {:?}", other);
            Ok((
                StatusCode::METHOD_NOT_ALLOWED,
                Json(ErrorResponse::new("method not allowed")),
            )
                .into_response())
        }
    }
}

async fn update(state: &AppState, id: BookId, req: &BookFormRequest) -> Result<Response, ApiError> {
    let form = req.to_form(false);

    if !form.validate().is_empty() {
        return render_validation_errors(state, form, Some(id)).await;
    }

    match execute_update_book(&state.service_deps, id, &form).await {
        Ok(_) => Ok(Redirect::to(REDIRECT_TO).into_response()),
        Err(e) => render_error(state, form, Some(id), e).await,
    }
}

async fn delete(state: &AppState, id: BookId) -> Result<Response, ApiError> {
    match execute_delete_book(&state.service_deps, id).await {
        Ok(()) => Ok(Redirect::to(REDIRECT_TO).into_response()),
        Err(e) => render_error(state, BookForm::new(true, Vec::new()), None, e).await,
    }
}

// ============================================================================
// Error rendering
// ============================================================================

/// 想定内のエラーを画面の再表示に変換する
///
/// 書籍一覧を取得し直し、送信されたフォームとエラーメッセージを添えて返す。
/// 想定外のエラーはApiErrorとして上位に渡す。
async fn render_error(
    state: &AppState,
    mut form: BookForm,
    book_id: Option<BookId>,
    err: BookApplicationError,
) -> Result<Response, ApiError> {
    let (status, key) = match err {
        BookApplicationError::BookNotFound(_) => (StatusCode::NOT_FOUND, messages::BOOK_NOT_FOUND),
        BookApplicationError::OptimisticLockFailure { .. } => {
            (StatusCode::CONFLICT, messages::OPTIMISTIC_LOCK_FAILURE)
        }
        BookApplicationError::RepositoryError(_) => return Err(ApiError::from(err)),
    };

    let message = state.messages.get(key);
    tracing::warn!(error = %err, "{}", message);

    form.books = execute_init_books(&state.service_deps).await?.books;
    let page = BookPageResponse::new(form, book_id).with_error_message(message);

    Ok((status, Json(page)).into_response())
}

/// 入力エラーのあるフォームを再表示する
async fn render_validation_errors(
    state: &AppState,
    mut form: BookForm,
    book_id: Option<BookId>,
) -> Result<Response, ApiError> {
    let field_errors = form
        .validate()
        .iter()
        .map(|e| FieldErrorResponse {
            field: e.field.as_str().to_string(),
            message: state.messages.field_error(e),
        })
        .collect();

    form.books = execute_init_books(&state.service_deps).await?.books;
    let page = BookPageResponse::new(form, book_id).with_field_errors(field_errors);

    Ok((StatusCode::UNPROCESSABLE_ENTITY, Json(page)).into_response())
}
