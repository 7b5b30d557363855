use axum::Router;
use tower_http::trace::TraceLayer;

use crate::{controllers::home_controller, AppState};

pub mod home_routes;
pub mod prices_routes;
pub mod alerts_routes;
pub mod docs_routes;

pub fn app(state: AppState) -> Router {
    let router = Router::<AppState>::new();

    let router = home_routes::add_routes(router);
    let router = prices_routes::add_routes(router);
    let router = alerts_routes::add_routes(router);
    let router = docs_routes::add_routes(router);

    router
        .fallback(home_controller::not_found)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
