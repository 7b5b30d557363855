use std::{net::SocketAddr, sync::Arc};

use mongodb::Client;
use tracing_subscriber::EnvFilter;

use price_tracker::{
    config,
    error::{AppError, StoreError},
    routes,
    services::{
        db_init, jobs, mailer,
        moralis::MoralisClient,
        mongo_store::{MongoAlertStore, MongoPriceStore},
    },
    templates, AppState,
};

#[tokio::main]
async fn main() -> Result<(), AppError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let settings = config::load()?;

    // Mongo connection
    let client = Client::with_uri_str(&settings.mongodb_uri)
        .await
        .map_err(StoreError::from)?;
    let db = client.database(&settings.mongodb_db);

    if let Err(e) = db_init::ensure_indexes(&db).await {
        tracing::warn!("could not ensure indexes: {}", e);
    }

    let hbs = templates::build_handlebars().map_err(|e| AppError::Config(e.to_string()))?;
    let notifier = mailer::build_notifier(&settings.mail).map_err(|e| AppError::Config(e.to_string()))?;
    let source = MoralisClient::new(
        settings.moralis_api_key.clone(),
        settings.moralis_base_url.clone(),
    );

    let state = AppState {
        hbs,
        settings: settings.clone(),
        prices: Arc::new(MongoPriceStore::new(db.clone())),
        alerts: Arc::new(MongoAlertStore::new(db)),
        source: Arc::new(source),
        notifier,
    };

    jobs::spawn_jobs(state.clone());

    let ip = settings
        .host
        .parse::<std::net::IpAddr>()
        .map_err(|e| AppError::Config(format!("HOST: {e}")))?;
    let addr = SocketAddr::from((ip, settings.port));
    tracing::info!("listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, routes::app(state)).await?;

    Ok(())
}
