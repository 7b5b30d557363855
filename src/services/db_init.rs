use mongodb::{bson::doc, Database, IndexModel};

use crate::error::StoreError;

use super::mongo_store::{ALERTS, PRICES};

pub async fn ensure_indexes(db: &Database) -> Result<(), StoreError> {
    // prices: latest-per-chain lookups and hourly window scans
    {
        let col = db.collection::<mongodb::bson::Document>(PRICES);
        let model = IndexModel::builder()
            .keys(doc! { "chain": 1, "timestamp": -1 })
            .build();

        col.create_index(model, None).await?;
    }

    // prices: global newest-first pagination
    {
        let col = db.collection::<mongodb::bson::Document>(PRICES);
        let model = IndexModel::builder().keys(doc! { "timestamp": -1 }).build();

        col.create_index(model, None).await?;
    }

    // alerts: helpful for threshold scan (triggered + chain)
    {
        let col = db.collection::<mongodb::bson::Document>(ALERTS);
        let model = IndexModel::builder()
            .keys(doc! { "triggered": 1, "chain": 1 })
            .build();

        col.create_index(model, None).await?;
    }

    Ok(())
}
