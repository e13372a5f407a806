use axum::http::StatusCode;

pub mod todos;

pub async fn health_check() -> StatusCode {
    StatusCode::OK
}
