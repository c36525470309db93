use axum::http::{StatusCode, header};
use axum::response::IntoResponse;

pub async fn liveness() -> impl IntoResponse {
    (StatusCode::OK, [(header::CONTENT_TYPE, "text/plain")], "OK")
}
