use axum::{Json, http::StatusCode, response::IntoResponse};
use tracing::info;

use crate::domain::value_objects::iam::MessageModel;

pub async fn root() -> impl IntoResponse {
    info!("router: root handler invoked");
    (StatusCode::OK, Json(MessageModel::new("Application is up!"))).into_response()
}

pub async fn not_found() -> impl IntoResponse {
    info!("router: not_found handler invoked");
    (StatusCode::NOT_FOUND, "NOT_FOUND").into_response()
}

pub async fn health_check() -> impl IntoResponse {
    info!("router: health_check handler invoked");
    (StatusCode::OK, "OK").into_response()
}
