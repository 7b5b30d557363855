//! Library entrypoint for the price tracker.
//!
//! Everything the binary wires together lives here so integration tests under
//! `tests/` can build an [`AppState`] with in-memory stores and drive the
//! routers, controllers and background jobs directly.

use std::sync::Arc;

pub mod config;
pub mod error;
pub mod models;
pub mod templates;

pub mod services;

pub mod controllers;
pub mod routes;

use services::{
    mailer::Notifier,
    moralis::PriceSource,
    store::{AlertStore, PriceStore},
};

#[derive(Clone)]
pub struct AppState {
    pub hbs: templates::Hbs,
    pub settings: config::Settings,
    pub prices: Arc<dyn PriceStore>,
    pub alerts: Arc<dyn AlertStore>,
    pub source: Arc<dyn PriceSource>,
    pub notifier: Arc<dyn Notifier>,
}
