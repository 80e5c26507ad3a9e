use axum::{http::StatusCode, response::IntoResponse, routing::post, Extension, Json, Router};
use serde::Deserialize;

use crate::app_module::AppState;

#[derive(Debug, Deserialize)]
pub struct TransformRequest {
    pub text: String,
    pub prompt: String,
}

pub fn transform_router() -> axum::Router {
    Router::new()
        .route("/transform", post(transform))
        .with_state(())
}

pub async fn transform(
    Extension(ctx): Extension<AppState>,
    Json(request): Json<TransformRequest>,
) -> impl IntoResponse {
    match ctx
        .service
        .transform_service
        .transform(&request.text, &request.prompt)
        .await
    {
        Ok(result) => match serde_json::to_value(result) {
            Ok(json_value) => (StatusCode::OK, Json(json_value)),
            Err(e) => {
                tracing::error!("Error serializing response: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(serde_json::json!({
                        "error": format!("Failed to serialize response: {}", e)
                    })),
                )
            }
        },
        Err(e) => {
            tracing::error!("Error transforming text: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({
                    "error": format!("Failed to transform text: {}", e)
                })),
            )
        }
    }
}
