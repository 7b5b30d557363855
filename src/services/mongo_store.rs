use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures_util::StreamExt;
use mongodb::{
    bson::{self, doc, oid::ObjectId, Document},
    options::{FindOneOptions, FindOptions},
    Collection, Cursor, Database,
};
use serde::de::DeserializeOwned;

use crate::{
    error::StoreError,
    models::{Alert, PriceTick},
};

use super::store::{AlertStore, PriceStore};

pub const PRICES: &str = "prices";
pub const ALERTS: &str = "alerts";

async fn drain<T>(mut cursor: Cursor<T>) -> Result<Vec<T>, StoreError>
where
    T: DeserializeOwned + Unpin + Send + Sync,
{
    let mut items: Vec<T> = Vec::new();
    while let Some(res) = cursor.next().await {
        items.push(res?);
    }
    Ok(items)
}

fn newest_first() -> Document {
    doc! { "timestamp": -1 }
}

#[derive(Clone)]
pub struct MongoPriceStore {
    db: Database,
}

impl MongoPriceStore {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    fn prices(&self) -> Collection<PriceTick> {
        self.db.collection::<PriceTick>(PRICES)
    }
}

#[async_trait]
impl PriceStore for MongoPriceStore {
    async fn insert(&self, tick: &PriceTick) -> Result<(), StoreError> {
        self.prices().insert_one(tick, None).await?;
        Ok(())
    }

    async fn latest(&self, chain: &str) -> Result<Option<PriceTick>, StoreError> {
        let opts = FindOneOptions::builder().sort(newest_first()).build();
        Ok(self.prices().find_one(doc! { "chain": chain }, opts).await?)
    }

    async fn latest_at_or_before(
        &self,
        chain: &str,
        at: DateTime<Utc>,
    ) -> Result<Option<PriceTick>, StoreError> {
        let opts = FindOneOptions::builder().sort(newest_first()).build();
        let filter = doc! {
            "chain": chain,
            "timestamp": { "$lte": bson::DateTime::from_chrono(at) },
        };
        Ok(self.prices().find_one(filter, opts).await?)
    }

    async fn page(&self, skip: u64, take: u64) -> Result<(Vec<PriceTick>, u64), StoreError> {
        let opts = FindOptions::builder()
            .sort(newest_first())
            .skip(skip.min(i64::MAX as u64))
            .limit(i64::try_from(take).unwrap_or(i64::MAX))
            .build();

        let cursor = self.prices().find(doc! {}, opts).await?;
        let data = drain(cursor).await?;
        let total = self.prices().count_documents(doc! {}, None).await?;

        Ok((data, total))
    }

    async fn since(&self, chain: &str, from: DateTime<Utc>) -> Result<Vec<PriceTick>, StoreError> {
        let opts = FindOptions::builder().sort(newest_first()).build();
        let filter = doc! {
            "chain": chain,
            "timestamp": { "$gte": bson::DateTime::from_chrono(from) },
        };

        let cursor = self.prices().find(filter, opts).await?;
        drain(cursor).await
    }

    async fn ping(&self) -> Result<(), StoreError> {
        self.db.run_command(doc! { "ping": 1 }, None).await?;
        Ok(())
    }
}

#[derive(Clone)]
pub struct MongoAlertStore {
    db: Database,
}

impl MongoAlertStore {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    fn alerts(&self) -> Collection<Alert> {
        self.db.collection::<Alert>(ALERTS)
    }
}

#[async_trait]
impl AlertStore for MongoAlertStore {
    async fn insert(&self, alert: &Alert) -> Result<(), StoreError> {
        self.alerts().insert_one(alert, None).await?;
        Ok(())
    }

    async fn pending_at_or_above(&self, chain: &str, price: f64) -> Result<Vec<Alert>, StoreError> {
        let filter = doc! {
            "chain": chain,
            "triggered": false,
            "target_price": { "$gte": price },
        };

        let cursor = self.alerts().find(filter, None).await?;
        drain(cursor).await
    }

    async fn mark_triggered(&self, id: ObjectId) -> Result<bool, StoreError> {
        let res = self
            .alerts()
            .update_one(
                doc! { "_id": id, "triggered": false },
                doc! { "$set": { "triggered": true } },
                None,
            )
            .await?;

        Ok(res.matched_count > 0)
    }
}
