use axum::{
    extract::{Query, State},
    Json,
};
use chrono::Utc;
use serde::Deserialize;
use utoipa::IntoParams;

use crate::{
    error::AppError,
    models::{HourlyPrice, PricePage},
    services::price_service::{self, DEFAULT_CHAIN, DEFAULT_LIMIT, DEFAULT_PAGE},
    AppState,
};

// raw strings: junk values fall back to defaults instead of a 400
#[derive(Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PageQuery {
    /// Page number, defaults to 1
    #[param(value_type = Option<u64>, example = 1)]
    pub page: Option<String>,
    /// Results per page, defaults to 10
    #[param(value_type = Option<u64>, example = 10)]
    pub limit: Option<String>,
}

#[derive(Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct HourlyQuery {
    /// Chain name, defaults to ethereum
    #[param(example = "ethereum")]
    pub chain: Option<String>,
}

#[utoipa::path(
    get,
    path = "/prices",
    tag = "prices",
    params(PageQuery),
    responses(
        (status = 200, description = "Saved prices, newest first", body = PricePage),
        (status = 500, description = "Store unavailable"),
    )
)]
pub async fn get_prices(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> Result<Json<PricePage>, AppError> {
    let page = price_service::coerce_positive(query.page.as_deref(), DEFAULT_PAGE);
    let limit = price_service::coerce_positive(query.limit.as_deref(), DEFAULT_LIMIT);

    Ok(Json(price_service::find_all(&state, page, limit).await?))
}

#[utoipa::path(
    get,
    path = "/prices/hourly",
    tag = "prices",
    params(HourlyQuery),
    responses(
        (status = 200, description = "Latest price of each hour in the last 24 hours", body = [HourlyPrice]),
        (status = 500, description = "Store unavailable"),
    )
)]
pub async fn get_hourly_prices(
    State(state): State<AppState>,
    Query(query): Query<HourlyQuery>,
) -> Result<Json<Vec<HourlyPrice>>, AppError> {
    let chain = query
        .chain
        .filter(|c| !c.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_CHAIN.to_string());

    Ok(Json(
        price_service::hourly_prices(&state, &chain, Utc::now()).await?,
    ))
}
