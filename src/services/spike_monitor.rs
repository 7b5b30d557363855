use chrono::Duration;

use crate::{error::StoreError, models::tracked_chains, services::mailer, AppState};

/// Percentage change from `old` to `new`. None when it can't be computed.
pub fn increase_pct(old: f64, new: f64) -> Option<f64> {
    if old == 0.0 {
        return None;
    }

    let pct = (new - old) / old * 100.0;
    pct.is_finite().then_some(pct)
}

/// One pass of the hourly spike check. Returns how many chains notified.
///
/// Nothing is recorded between passes, so a spike that persists is reported
/// again on every run.
pub async fn check_price_increase(state: &AppState) -> usize {
    tracing::debug!(
        "checking for price increases over {}%",
        state.settings.price_increase_threshold
    );

    let mut notified = 0;
    for chain in tracked_chains() {
        match check_chain(state, &chain).await {
            Ok(true) => notified += 1,
            Ok(false) => {}
            Err(e) => tracing::error!("error checking price increase for {}: {}", chain, e),
        }
    }

    notified
}

async fn check_chain(state: &AppState, chain: &str) -> Result<bool, StoreError> {
    let Some(latest) = state.prices.latest(chain).await? else {
        tracing::warn!("no latest price found for {}", chain);
        return Ok(false);
    };

    let one_hour_ago = latest.timestamp - Duration::hours(1);
    let Some(old) = state.prices.latest_at_or_before(chain, one_hour_ago).await? else {
        tracing::warn!("no price found for {} one hour ago", chain);
        return Ok(false);
    };

    let Some(pct) = increase_pct(old.price, latest.price) else {
        tracing::warn!("cannot compute increase for {} from {}", chain, old.price);
        return Ok(false);
    };

    tracing::debug!("{} price increase: {:.2}%", chain, pct);

    if pct <= state.settings.price_increase_threshold {
        return Ok(false);
    }

    send_increase_email(state, chain, old.price, latest.price, pct).await;
    Ok(true)
}

async fn send_increase_email(state: &AppState, chain: &str, old: f64, new: f64, pct: f64) {
    let to = &state.settings.recipient_email;

    let mail = match mailer::spike_alert_mail(&state.hbs, chain, old, new, pct) {
        Ok(m) => m,
        Err(e) => {
            tracing::error!("failed to render price increase email for {}: {}", chain, e);
            return;
        }
    };

    match state.notifier.send(to, &mail).await {
        Ok(()) => tracing::debug!("price increase email sent to {} for {}", to, chain),
        Err(e) => tracing::error!(
            "failed to send price increase email to {} for {}: {}",
            to,
            chain,
            e
        ),
    }
}
