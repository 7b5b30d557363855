//! Persistence seams. The MongoDB implementations live in `mongo_store`;
//! tests plug in-memory versions into [`crate::AppState`].

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use mongodb::bson::oid::ObjectId;

use crate::{
    error::StoreError,
    models::{Alert, PriceTick},
};

#[async_trait]
pub trait PriceStore: Send + Sync {
    async fn insert(&self, tick: &PriceTick) -> Result<(), StoreError>;

    /// Most recent tick for `chain`.
    async fn latest(&self, chain: &str) -> Result<Option<PriceTick>, StoreError>;

    /// Most recent tick for `chain` with `timestamp <= at`.
    async fn latest_at_or_before(
        &self,
        chain: &str,
        at: DateTime<Utc>,
    ) -> Result<Option<PriceTick>, StoreError>;

    /// One page of ticks across all chains, newest first, plus the total count.
    async fn page(&self, skip: u64, take: u64) -> Result<(Vec<PriceTick>, u64), StoreError>;

    /// Ticks for `chain` with `timestamp >= from`, newest first.
    async fn since(&self, chain: &str, from: DateTime<Utc>) -> Result<Vec<PriceTick>, StoreError>;

    async fn ping(&self) -> Result<(), StoreError>;
}

#[async_trait]
pub trait AlertStore: Send + Sync {
    async fn insert(&self, alert: &Alert) -> Result<(), StoreError>;

    /// Untriggered alerts on `chain` whose target is at or above `price`.
    async fn pending_at_or_above(&self, chain: &str, price: f64) -> Result<Vec<Alert>, StoreError>;

    /// Returns true if the alert was newly triggered, false if it was already triggered.
    async fn mark_triggered(&self, id: ObjectId) -> Result<bool, StoreError>;
}
