use std::collections::BTreeMap;

use chrono::{DateTime, Duration, Utc};

use crate::{
    error::StoreError,
    models::{chain_key, HourlyPrice, PricePage, PriceTick, PriceTickView, TRACKED_TOKENS},
    AppState,
};

pub const DEFAULT_PAGE: u64 = 1;
pub const DEFAULT_LIMIT: u64 = 10;
pub const DEFAULT_CHAIN: &str = "ethereum";

// the driver sends skip/limit as i64
const MAX_OFFSET: u64 = i64::MAX as u64;

/// Fetches every tracked token once and stores a tick per successful quote.
/// A failing token is logged and skipped; returns how many ticks were saved.
pub async fn fetch_and_store(state: &AppState) -> usize {
    tracing::debug!("fetching prices for {} tokens", TRACKED_TOKENS.len());

    let mut saved = 0;
    for token in TRACKED_TOKENS {
        let price = match state.source.usd_price(token).await {
            Ok(p) => p,
            Err(e) => {
                tracing::error!("failed to fetch price for {}: {}", token.name, e);
                continue;
            }
        };

        match save_price(state, token.name, price, Utc::now()).await {
            Ok(tick) => {
                tracing::info!("saved price for {}: ${}", token.name, tick.price);
                saved += 1;
            }
            Err(e) => tracing::error!("failed to save price for {}: {}", token.name, e),
        }
    }

    saved
}

pub async fn save_price(
    state: &AppState,
    chain: &str,
    price: f64,
    at: DateTime<Utc>,
) -> Result<PriceTick, StoreError> {
    let tick = PriceTick::new(chain_key(chain), price, at);
    state.prices.insert(&tick).await?;
    Ok(tick)
}

pub async fn find_all(state: &AppState, page: u64, limit: u64) -> Result<PricePage, StoreError> {
    let limit = limit.min(MAX_OFFSET);
    let skip = page.saturating_sub(1).saturating_mul(limit).min(MAX_OFFSET);
    let (ticks, total) = state.prices.page(skip, limit).await?;

    Ok(PricePage {
        data: ticks.into_iter().map(PriceTickView::from).collect(),
        total,
    })
}

pub async fn hourly_prices(
    state: &AppState,
    chain: &str,
    now: DateTime<Utc>,
) -> Result<Vec<HourlyPrice>, StoreError> {
    let from = now - Duration::hours(24);
    let ticks = state.prices.since(&chain_key(chain), from).await?;
    Ok(latest_per_hour(ticks))
}

/// Query-string coercion for page/limit: anything missing, non-numeric or
/// below 1 becomes `default`. Fractions are truncated.
pub fn coerce_positive(raw: Option<&str>, default: u64) -> u64 {
    raw.and_then(|s| s.trim().parse::<f64>().ok())
        .filter(|n| n.is_finite() && *n >= 1.0)
        .map(|n| n.trunc() as u64)
        .unwrap_or(default)
}

pub fn truncate_to_hour(ts: DateTime<Utc>) -> DateTime<Utc> {
    let secs = ts.timestamp();
    DateTime::from_timestamp(secs - secs.rem_euclid(3600), 0).unwrap_or(ts)
}

/// One entry per hour bucket holding that bucket's newest sample, newest
/// bucket first.
pub fn latest_per_hour(ticks: Vec<PriceTick>) -> Vec<HourlyPrice> {
    let mut buckets: BTreeMap<DateTime<Utc>, PriceTick> = BTreeMap::new();

    for tick in ticks {
        let hour = truncate_to_hour(tick.timestamp);
        match buckets.get(&hour) {
            Some(kept) if kept.timestamp >= tick.timestamp => {}
            _ => {
                buckets.insert(hour, tick);
            }
        }
    }

    buckets
        .into_iter()
        .rev()
        .map(|(hour, tick)| HourlyPrice {
            timestamp: hour,
            price: tick.price,
        })
        .collect()
}
