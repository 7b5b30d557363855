#![allow(dead_code)]

use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc, Mutex,
    },
};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use http_body_util::BodyExt;
use mongodb::bson::oid::ObjectId;
use price_tracker::{
    config::{MailSettings, Settings},
    error::{FetchError, NotifyError, StoreError},
    models::{Alert, PriceTick, Token},
    services::{
        mailer::{Mail, Notifier},
        moralis::PriceSource,
        store::{AlertStore, PriceStore},
    },
    templates, AppState,
};

#[derive(Default)]
pub struct MemoryPrices {
    pub ticks: Mutex<Vec<PriceTick>>,
    // (skip, take) of every page() call
    pub page_calls: Mutex<Vec<(u64, u64)>>,
    // reads for these chains fail
    pub failing_chains: Mutex<Vec<String>>,
    // every read fails
    pub down: AtomicBool,
}

pub fn store_down() -> StoreError {
    let io = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "store unavailable");
    StoreError::Db(mongodb::error::Error::from(io))
}

impl MemoryPrices {
    pub fn fail_chain(&self, chain: &str) {
        self.failing_chains.lock().unwrap().push(chain.to_string());
    }

    fn check(&self, chain: Option<&str>) -> Result<(), StoreError> {
        let chain_down = chain.is_some_and(|c| self.failing_chains.lock().unwrap().iter().any(|f| f == c));
        if self.down.load(Ordering::SeqCst) || chain_down {
            return Err(store_down());
        }
        Ok(())
    }

    fn sorted_desc(&self, keep: impl Fn(&PriceTick) -> bool) -> Vec<PriceTick> {
        let mut out: Vec<PriceTick> = self.ticks.lock().unwrap().iter().filter(|t| keep(*t)).cloned().collect();
        out.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        out
    }
}

#[async_trait]
impl PriceStore for MemoryPrices {
    async fn insert(&self, tick: &PriceTick) -> Result<(), StoreError> {
        self.ticks.lock().unwrap().push(tick.clone());
        Ok(())
    }

    async fn latest(&self, chain: &str) -> Result<Option<PriceTick>, StoreError> {
        self.check(Some(chain))?;
        Ok(self.sorted_desc(|t| t.chain == chain).into_iter().next())
    }

    async fn latest_at_or_before(
        &self,
        chain: &str,
        at: DateTime<Utc>,
    ) -> Result<Option<PriceTick>, StoreError> {
        self.check(Some(chain))?;
        Ok(self
            .sorted_desc(|t| t.chain == chain && t.timestamp <= at)
            .into_iter()
            .next())
    }

    async fn page(&self, skip: u64, take: u64) -> Result<(Vec<PriceTick>, u64), StoreError> {
        self.page_calls.lock().unwrap().push((skip, take));
        self.check(None)?;
        let all = self.sorted_desc(|_| true);
        let total = all.len() as u64;
        let data = all.into_iter().skip(skip as usize).take(take as usize).collect();
        Ok((data, total))
    }

    async fn since(&self, chain: &str, from: DateTime<Utc>) -> Result<Vec<PriceTick>, StoreError> {
        self.check(Some(chain))?;
        Ok(self.sorted_desc(|t| t.chain == chain && t.timestamp >= from))
    }

    async fn ping(&self) -> Result<(), StoreError> {
        self.check(None)
    }
}

#[derive(Default)]
pub struct MemoryAlerts {
    pub alerts: Mutex<Vec<Alert>>,
}

impl MemoryAlerts {
    pub fn get(&self, id: ObjectId) -> Option<Alert> {
        self.alerts.lock().unwrap().iter().find(|a| a.id == id).cloned()
    }
}

#[async_trait]
impl AlertStore for MemoryAlerts {
    async fn insert(&self, alert: &Alert) -> Result<(), StoreError> {
        self.alerts.lock().unwrap().push(alert.clone());
        Ok(())
    }

    async fn pending_at_or_above(&self, chain: &str, price: f64) -> Result<Vec<Alert>, StoreError> {
        Ok(self
            .alerts
            .lock()
            .unwrap()
            .iter()
            .filter(|a| a.chain == chain && !a.triggered && a.target_price >= price)
            .cloned()
            .collect())
    }

    async fn mark_triggered(&self, id: ObjectId) -> Result<bool, StoreError> {
        let mut alerts = self.alerts.lock().unwrap();
        match alerts.iter_mut().find(|a| a.id == id && !a.triggered) {
            Some(a) => {
                a.triggered = true;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

/// Quotes keyed by token display name; missing names fail like a bad response.
#[derive(Default)]
pub struct FixedQuotes {
    pub quotes: HashMap<&'static str, f64>,
}

#[async_trait]
impl PriceSource for FixedQuotes {
    async fn usd_price(&self, token: &Token) -> Result<f64, FetchError> {
        self.quotes
            .get(token.name)
            .copied()
            .ok_or_else(|| FetchError::InvalidPrice(token.name.to_string()))
    }
}

#[derive(Default)]
pub struct RecordingNotifier {
    pub sent: Mutex<Vec<(String, Mail)>>,
    pub fail: bool,
}

impl RecordingNotifier {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Default::default()
        }
    }

    pub fn count(&self) -> usize {
        self.sent.lock().unwrap().len()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn send(&self, to: &str, mail: &Mail) -> Result<(), NotifyError> {
        // attempts are recorded even when delivery "fails"
        self.sent.lock().unwrap().push((to.to_string(), mail.clone()));
        if self.fail {
            return Err(NotifyError::Transport("connection refused".into()));
        }
        Ok(())
    }
}

pub struct TestApp {
    pub state: AppState,
    pub prices: Arc<MemoryPrices>,
    pub alerts: Arc<MemoryAlerts>,
    pub notifier: Arc<RecordingNotifier>,
}

pub fn test_settings() -> Settings {
    Settings {
        mongodb_uri: "mongodb://localhost:27017".into(),
        mongodb_db: "price_tracker_test".into(),
        host: "127.0.0.1".into(),
        port: 3000,
        moralis_api_key: String::new(),
        moralis_base_url: "http://127.0.0.1:1".into(),
        mail: MailSettings {
            host: None,
            port: 587,
            user: String::new(),
            pass: String::new(),
            from: "No Reply <no-reply@example.com>".into(),
        },
        recipient_email: "ops@example.com".into(),
        price_increase_threshold: 3.0,
        job_interval_secs: 300,
    }
}

pub fn build(settings: Settings, quotes: FixedQuotes, notifier: RecordingNotifier) -> TestApp {
    let prices = Arc::new(MemoryPrices::default());
    let alerts = Arc::new(MemoryAlerts::default());
    let notifier = Arc::new(notifier);

    let state = AppState {
        hbs: templates::build_handlebars().expect("templates"),
        settings,
        prices: prices.clone(),
        alerts: alerts.clone(),
        source: Arc::new(quotes),
        notifier: notifier.clone(),
    };

    TestApp {
        state,
        prices,
        alerts,
        notifier,
    }
}

pub fn test_app() -> TestApp {
    build(test_settings(), FixedQuotes::default(), RecordingNotifier::default())
}

pub fn tick(chain: &str, price: f64, at: DateTime<Utc>) -> PriceTick {
    PriceTick::new(chain.to_string(), price, at)
}

pub fn alert(chain: &str, target_price: f64, email: &str) -> Alert {
    Alert {
        id: ObjectId::new(),
        chain: chain.to_string(),
        target_price,
        email: email.to_string(),
        created_at: Utc::now(),
        triggered: false,
    }
}

pub async fn response_body_string(res: axum::response::Response) -> String {
    let bytes = res.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8_lossy(&bytes).to_string()
}

pub async fn response_json(res: axum::response::Response) -> serde_json::Value {
    serde_json::from_str(&response_body_string(res).await).expect("json body")
}
