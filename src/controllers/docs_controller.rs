use axum::Json;
use utoipa::OpenApi;

use crate::{
    controllers::{alerts_controller, home_controller, prices_controller},
    models::{AlertView, CreateAlertPayload, HourlyPrice, PricePage, PriceTickView},
};

#[derive(OpenApi)]
#[openapi(
    info(title = "Blockchain Price Tracker", description = "Token price history and email price alerts"),
    paths(
        home_controller::home,
        prices_controller::get_prices,
        prices_controller::get_hourly_prices,
        alerts_controller::post_create_alert,
    ),
    components(schemas(AlertView, CreateAlertPayload, HourlyPrice, PricePage, PriceTickView)),
    tags(
        (name = "health", description = "Health check"),
        (name = "prices", description = "Saved token prices"),
        (name = "alerts", description = "Target price alerts"),
    )
)]
pub struct ApiDoc;

// GET /api-docs/openapi.json
pub async fn get_openapi() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
