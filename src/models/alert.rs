use chrono::{DateTime, Utc};
use mongodb::bson::{oid::ObjectId, serde_helpers::chrono_datetime_as_bson_datetime};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Alert {
    #[serde(rename = "_id")]
    pub id: ObjectId,

    pub chain: String,
    pub target_price: f64,
    pub email: String,

    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,

    // flipped once by the threshold check, never reset
    pub triggered: bool,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AlertView {
    pub id: String,
    #[schema(example = "ethereum")]
    pub chain: String,
    #[schema(example = 3500.0)]
    pub target_price: f64,
    #[schema(example = "user@example.com")]
    pub email: String,
    pub created_at: DateTime<Utc>,
    pub triggered: bool,
}

impl From<Alert> for AlertView {
    fn from(a: Alert) -> Self {
        Self {
            id: a.id.to_hex(),
            chain: a.chain,
            target_price: a.target_price,
            email: a.email,
            created_at: a.created_at,
            triggered: a.triggered,
        }
    }
}

/// Raw `POST /alerts` body. Fields stay untyped so wrong types surface as
/// field errors instead of extractor rejections.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct CreateAlertPayload {
    #[schema(value_type = String, example = "ethereum")]
    pub chain: Option<serde_json::Value>,

    #[serde(rename = "targetPrice")]
    #[schema(value_type = f64, example = 3500.0)]
    pub target_price: Option<serde_json::Value>,

    #[schema(value_type = String, example = "user@example.com")]
    pub email: Option<serde_json::Value>,
}
