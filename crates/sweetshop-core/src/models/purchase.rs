use serde::{Deserialize, Serialize};

use super::Sweet;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct Purchase {
    #[cfg_attr(feature = "ts", ts(type = "number"))]
    pub id: i64,
    #[cfg_attr(feature = "ts", ts(type = "number"))]
    pub user_id: i64,
    #[cfg_attr(feature = "ts", ts(type = "number"))]
    pub sweet_id: i64,
    pub quantity: i32,
    pub total_price: f64,
    pub created_at: String,
    pub sweet: Sweet,
}

/// Body for the purchase and restock routes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuantityRequest {
    pub quantity: i32,
}
