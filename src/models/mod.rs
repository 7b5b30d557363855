pub mod alert;
pub mod price;
pub mod token;

pub use alert::{Alert, AlertView, CreateAlertPayload};
pub use price::{HourlyPrice, PricePage, PriceTick, PriceTickView};
pub use token::{chain_key, tracked_chains, Token, TRACKED_TOKENS};
