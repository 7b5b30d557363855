use std::env;

use crate::error::AppError;

pub const DEFAULT_PRICE_INCREASE_THRESHOLD: f64 = 3.0;
pub const DEFAULT_JOB_INTERVAL_SECS: u64 = 300;

#[derive(Debug, Clone)]
pub struct Settings {
    pub mongodb_uri: String,
    pub mongodb_db: String,
    pub host: String,
    pub port: u16,

    pub moralis_api_key: String,
    pub moralis_base_url: String,

    pub mail: MailSettings,

    // operator address for spike notifications
    pub recipient_email: String,
    pub price_increase_threshold: f64,
    pub job_interval_secs: u64,
}

#[derive(Debug, Clone)]
pub struct MailSettings {
    // None => log-only notifier
    pub host: Option<String>,
    pub port: u16,
    pub user: String,
    pub pass: String,
    pub from: String,
}

pub fn load() -> Result<Settings, AppError> {
    // Loads .env if present (no crash if missing)
    dotenvy::dotenv().ok();

    Settings::from_vars(|key| env::var(key).ok())
}

impl Settings {
    /// Builds settings from any key lookup, so tests don't have to touch the
    /// process environment.
    pub fn from_vars<F>(var: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let or = |key: &str, default: &str| var(key).unwrap_or_else(|| default.to_string());

        let port = var("PORT")
            .and_then(|s| s.parse::<u16>().ok())
            .unwrap_or(3000);

        let recipient_email = var("NOTIFICATION_RECIPIENT_EMAIL")
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .ok_or_else(|| AppError::Config("NOTIFICATION_RECIPIENT_EMAIL is required".into()))?;

        let price_increase_threshold = var("PRICE_INCREASE_THRESHOLD")
            .and_then(|s| s.trim().parse::<f64>().ok())
            .filter(|t| t.is_finite())
            .unwrap_or(DEFAULT_PRICE_INCREASE_THRESHOLD);

        let job_interval_secs = var("JOB_INTERVAL_SECS")
            .and_then(|s| s.parse::<u64>().ok())
            .filter(|s| *s > 0)
            .unwrap_or(DEFAULT_JOB_INTERVAL_SECS);

        let mail = MailSettings {
            host: var("EMAIL_HOST").filter(|h| !h.trim().is_empty()),
            port: var("EMAIL_PORT")
                .and_then(|s| s.parse::<u16>().ok())
                .unwrap_or(587),
            user: or("EMAIL_USER", ""),
            pass: or("EMAIL_PASS", ""),
            from: or("EMAIL_FROM", "No Reply <no-reply@example.com>"),
        };

        Ok(Settings {
            mongodb_uri: or("MONGODB_URI", "mongodb://localhost:27017"),
            mongodb_db: or("MONGODB_DB", "price_tracker_db"),
            host: or("HOST", "127.0.0.1"),
            port,
            moralis_api_key: or("MORALIS_API_KEY", ""),
            moralis_base_url: or("MORALIS_BASE_URL", "https://deep-index.moralis.io/api/v2.2"),
            mail,
            recipient_email,
            price_increase_threshold,
            job_interval_secs,
        })
    }
}
