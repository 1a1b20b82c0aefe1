mod v1;

use axum::{Router, routing::get};
use utoipa_axum::router::OpenApiRouter;

use crate::handlers;
use crate::state::AppState;

pub fn api_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new().nest("/v1", v1::routes())
}

/// HTML admin page. Kept out of the OpenAPI document.
pub fn admin_routes() -> Router<AppState> {
    Router::new().route(
        "/icons",
        get(handlers::admin::upload_form).post(handlers::admin::upload_submit),
    )
}
