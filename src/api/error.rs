use crate::application::book::BookApplicationError;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};

use super::types::ErrorResponse;

/// クライアントに返すシステムエラーのメッセージ
const SYSTEM_ERROR_MESSAGE: &str = "system error";

/// API層のエラー型
///
/// 画面の再表示で回復できなかったエラーをHTTPレスポンスへ写す。
/// 書籍の不在と楽観排他はハンドラー側で再表示されるため、ここでは
/// すべてシステム障害として扱う。
#[derive(Debug)]
pub struct ApiError(BookApplicationError);

impl From<BookApplicationError> for ApiError {
    fn from(err: BookApplicationError) -> Self {
        ApiError(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        // 内部エラーの詳細はログに記録し、クライアントには一般的なメッセージのみを返す
        tracing::error!("system error! {}", self.0);

        let body = Json(ErrorResponse::new(SYSTEM_ERROR_MESSAGE));
        (StatusCode::INTERNAL_SERVER_ERROR, body).into_response()
    }
}
