use std::sync::LazyLock;

use chrono::Utc;
use lettre::{message::Mailbox, Address};
use mongodb::bson::oid::ObjectId;
use regex::Regex;
use serde_json::Value;

use crate::{
    error::{FieldErrors, StoreError},
    models::{chain_key, tracked_chains, Alert, CreateAlertPayload},
    services::mailer,
    AppState,
};

#[derive(Debug, Clone, PartialEq)]
pub struct NewAlert {
    pub chain: String,
    pub target_price: f64,
    pub email: String,
}

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern"));

// must also be an address the mailer can deliver to
fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
        && email.parse::<Address>().is_ok()
        && email.parse::<Mailbox>().is_ok()
}

pub fn validate_alert(payload: &CreateAlertPayload) -> Result<NewAlert, FieldErrors> {
    let mut errs = FieldErrors::new();

    let chain = match payload.chain.as_ref() {
        Some(Value::String(s)) if !s.trim().is_empty() => Some(chain_key(s)),
        Some(Value::String(_)) | None | Some(Value::Null) => {
            errs.insert("chain".into(), "chain should not be empty".into());
            None
        }
        Some(_) => {
            errs.insert("chain".into(), "chain must be a string".into());
            None
        }
    };

    let target_price = match payload.target_price.as_ref().and_then(Value::as_f64) {
        Some(v) if v.is_finite() => Some(v),
        _ => {
            errs.insert("targetPrice".into(), "targetPrice must be a number".into());
            None
        }
    };

    let email = match payload.email.as_ref().and_then(Value::as_str) {
        Some(s) if is_valid_email(s.trim()) => Some(s.trim().to_string()),
        _ => {
            errs.insert("email".into(), "email must be an email".into());
            None
        }
    };

    match (chain, target_price, email) {
        (Some(chain), Some(target_price), Some(email)) if errs.is_empty() => Ok(NewAlert {
            chain,
            target_price,
            email,
        }),
        _ => Err(errs),
    }
}

pub async fn create_alert(state: &AppState, new_alert: NewAlert) -> Result<Alert, StoreError> {
    let alert = Alert {
        id: ObjectId::new(),
        chain: new_alert.chain,
        target_price: new_alert.target_price,
        email: new_alert.email,
        created_at: Utc::now(),
        triggered: false,
    };

    state.alerts.insert(&alert).await?;

    tracing::info!(
        "alert created: {} <= ${} for {}",
        alert.chain,
        alert.target_price,
        alert.email
    );

    Ok(alert)
}

/// One pass of the threshold check over every tracked chain. Returns how many
/// alerts were fired (and marked) in this pass.
pub async fn check_alerts(state: &AppState) -> usize {
    tracing::debug!("checking alerts");

    let mut fired = 0;
    for chain in tracked_chains() {
        match check_chain_alerts(state, &chain).await {
            Ok(n) => fired += n,
            Err(e) => tracing::error!("alert check failed for {}: {}", chain, e),
        }
    }

    if fired > 0 {
        tracing::info!("{} alert(s) triggered", fired);
    }

    fired
}

async fn check_chain_alerts(state: &AppState, chain: &str) -> Result<usize, StoreError> {
    let Some(latest) = state.prices.latest(chain).await? else {
        tracing::debug!("no price yet for {}, skipping alerts", chain);
        return Ok(0);
    };

    let alerts = state
        .alerts
        .pending_at_or_above(chain, latest.price)
        .await?;

    let mut fired = 0;
    for alert in alerts {
        // delivery is attempted once; the alert is marked either way
        send_alert_email(state, &alert, latest.price).await;

        match state.alerts.mark_triggered(alert.id).await {
            Ok(true) => fired += 1,
            Ok(false) => tracing::debug!("alert {} was already triggered", alert.id),
            Err(e) => tracing::error!("failed to mark alert {} triggered: {}", alert.id, e),
        }
    }

    Ok(fired)
}

async fn send_alert_email(state: &AppState, alert: &Alert, current_price: f64) {
    let mail = match mailer::threshold_alert_mail(
        &state.hbs,
        &alert.chain,
        alert.target_price,
        current_price,
    ) {
        Ok(m) => m,
        Err(e) => {
            tracing::error!("failed to render alert email for {}: {}", alert.email, e);
            return;
        }
    };

    match state.notifier.send(&alert.email, &mail).await {
        Ok(()) => tracing::debug!(
            "alert email sent to {} for {} at ${}",
            alert.email,
            alert.chain,
            alert.target_price
        ),
        Err(e) => tracing::error!("failed to send alert email to {}: {}", alert.email, e),
    }
}
