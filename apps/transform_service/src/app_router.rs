use axum::{routing::get, Router};

use crate::{
    health::health_controller, transform::transform_controller::transform_router,
};

pub fn application_router() -> Router {
    Router::new()
        .route("/v1/health", get(health_controller::health))
        .nest("/v1/ai", transform_router())
}
