pub mod config;
pub mod database;
pub mod entity;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod models;
pub mod render;
pub mod routes;
pub mod state;
pub mod store;

use axum::extract::DefaultBodyLimit;
use utoipa::OpenApi;
use utoipa_axum::router::OpenApiRouter;
use utoipa_scalar::{Scalar, Servable as ScalarServable};

use crate::state::AppState;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Icon Uploader API",
        version = "1.0.0",
        description = "Turns ZIP archives of PNG icons into categorized, tagged content entries"
    ),
    tags(
        (name = "Uploads", description = "Archive upload and processing"),
        (name = "Categories", description = "Categories created from archive names"),
        (name = "Entries", description = "Entries created from uploaded images"),
    ),
)]
struct ApiDoc;

/// Build the application router.
pub fn build_router(state: AppState) -> axum::Router {
    let body_limit = DefaultBodyLimit::max(state.config.server.max_upload_size);

    let (router, api) = OpenApiRouter::with_openapi(ApiDoc::openapi())
        .nest("/api", routes::api_routes())
        .split_for_parts();

    router
        .nest("/admin", routes::admin_routes())
        .with_state(state)
        .route(
            "/api-docs/openapi.json",
            axum::routing::get({
                let api = api.clone();
                move || async move { axum::Json(api) }
            }),
        )
        .merge(Scalar::with_url("/scalar", api))
        .layer(body_limit)
}
