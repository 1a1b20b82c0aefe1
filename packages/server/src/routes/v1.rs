use utoipa_axum::{router::OpenApiRouter, routes};

use crate::handlers;
use crate::state::AppState;

pub fn routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .nest("/uploads", upload_routes())
        .nest("/categories", category_routes())
        .nest("/entries", entry_routes())
}

fn upload_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new().routes(routes!(handlers::upload::upload_archive))
}

fn category_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new().routes(routes!(handlers::content::list_categories))
}

fn entry_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(handlers::content::list_entries))
        .routes(routes!(handlers::content::get_entry))
}
