// HTTP routes configuration

use crate::core::state::AppState;
use axum::{
    routing::{delete, get},
    Router,
};
use std::sync::Arc;

pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        // Public endpoints
        .route("/health", get(crate::handlers::health::health_handler))
        .route(
            "/reservations",
            get(crate::handlers::reservations::list_handler)
                .post(crate::handlers::reservations::create_handler),
        )
        .route(
            "/reservations/{id}",
            delete(crate::handlers::reservations::cancel_handler),
        )
        .route("/blocks", get(crate::handlers::blocks::blocks_handler))
        .route("/grid", get(crate::handlers::grid::grid_handler))

        // Admin endpoints (cancel requires the admin code)
        .route("/admin/reservations", get(crate::handlers::admin::admin_list_handler))
        .route(
            "/admin/reservations/{id}",
            delete(crate::handlers::admin::admin_cancel_handler),
        )
        .route("/metrics", get(crate::handlers::metrics::metrics_handler))

        // 404 fallback for all unmatched routes
        .fallback(crate::handlers::fallback::fallback_handler)

        .with_state(state)
}
