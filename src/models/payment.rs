use rust_decimal::Decimal;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, JsonSchema)]
pub struct CreateOrderRequest {
    /// Amount in currency units (rupees), not minor units.
    #[schemars(with = "String")]
    pub amount: Decimal,
}

/// The order object returned by the payment gateway. Extra gateway fields
/// are ignored.
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct PaymentOrder {
    pub id: String,
    /// Minor units (paise).
    pub amount: i64,
    pub currency: String,
    #[serde(default)]
    pub receipt: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}
