use chrono::{DateTime, Utc};
use mongodb::bson::{oid::ObjectId, serde_helpers::chrono_datetime_as_bson_datetime};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceTick {
    #[serde(rename = "_id")]
    pub id: ObjectId,

    pub chain: String,

    // USD, rounded to 8 decimals
    pub price: f64,

    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub timestamp: DateTime<Utc>,
}

impl PriceTick {
    pub fn new(chain: String, price: f64, timestamp: DateTime<Utc>) -> Self {
        Self {
            id: ObjectId::new(),
            chain,
            price: round8(price),
            timestamp,
        }
    }
}

fn round8(x: f64) -> f64 {
    (x * 1e8).round() / 1e8
}

/// JSON shape returned by the read API.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PriceTickView {
    #[schema(example = "670e3c5f8a1b2c3d4e5f6a7b")]
    pub id: String,
    #[schema(example = "ethereum")]
    pub chain: String,
    #[schema(example = 3000.12345678)]
    pub price: f64,
    pub timestamp: DateTime<Utc>,
}

impl From<PriceTick> for PriceTickView {
    fn from(t: PriceTick) -> Self {
        Self {
            id: t.id.to_hex(),
            chain: t.chain,
            price: t.price,
            timestamp: t.timestamp,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PricePage {
    pub data: Vec<PriceTickView>,
    pub total: u64,
}

/// Latest sample of one hour bucket. `timestamp` is the start of the hour.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct HourlyPrice {
    pub timestamp: DateTime<Utc>,
    #[schema(example = 3000.12345678)]
    pub price: f64,
}
