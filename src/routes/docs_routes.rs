use axum::{Router, routing::get};
use crate::{AppState, controllers::docs_controller};

pub fn add_routes(router: Router<AppState>) -> Router<AppState> {
    router.route("/api-docs/openapi.json", get(docs_controller::get_openapi))
}
