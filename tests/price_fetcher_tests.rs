mod common;

use std::collections::HashMap;

use price_tracker::services::price_service;

use common::{build, test_settings, FixedQuotes, RecordingNotifier};

#[tokio::test]
async fn stores_one_tick_per_quoted_token() {
    let quotes = FixedQuotes {
        quotes: HashMap::from([("Ethereum", 2650.123456789), ("Polygon", 2649.5)]),
    };
    let t = build(test_settings(), quotes, RecordingNotifier::default());

    assert_eq!(price_service::fetch_and_store(&t.state).await, 2);

    let ticks = t.prices.ticks.lock().unwrap();
    let chains: Vec<&str> = ticks.iter().map(|t| t.chain.as_str()).collect();
    assert_eq!(chains, vec!["ethereum", "polygon"]);
    assert_eq!(ticks[0].price, 2650.12345679);
}

#[tokio::test]
async fn failed_token_is_skipped_others_saved() {
    let quotes = FixedQuotes {
        quotes: HashMap::from([("Polygon", 0.42)]),
    };
    let t = build(test_settings(), quotes, RecordingNotifier::default());

    assert_eq!(price_service::fetch_and_store(&t.state).await, 1);

    let ticks = t.prices.ticks.lock().unwrap();
    assert_eq!(ticks.len(), 1);
    assert_eq!(ticks[0].chain, "polygon");
}
