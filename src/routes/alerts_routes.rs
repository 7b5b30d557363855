use axum::{Router, routing::post};
use crate::{AppState, controllers::alerts_controller};

pub fn add_routes(router: Router<AppState>) -> Router<AppState> {
    router.route("/alerts", post(alerts_controller::post_create_alert))
}
