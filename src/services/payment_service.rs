use crate::models::payment::PaymentOrder;
use crate::utils::config::PaymentConfig;
use crate::utils::error::{AppError, AppResult};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde_json::json;

/// Relay to the payment gateway's order API. Creating an order is the only
/// thing this does; the charge itself happens in the gateway's own checkout
/// widget, which calls back with a payment id.
pub struct PaymentService {
    http: reqwest::Client,
    key_id: String,
    key_secret: String,
    base_url: String,
}

/// Gateway amounts are integer minor units (paise). Rejects non-positive
/// amounts before anything leaves the process.
pub fn to_minor_units(amount: Decimal) -> AppResult<i64> {
    if amount <= Decimal::ZERO {
        return Err(AppError::BadRequest("Invalid payment amount".into()));
    }
    (amount * Decimal::from(100))
        .round()
        .to_i64()
        .ok_or_else(|| AppError::BadRequest("Payment amount out of range".into()))
}

pub fn new_receipt() -> String {
    format!("rcpt_{}", chrono::Utc::now().timestamp_millis())
}

impl PaymentService {
    pub fn new(config: &PaymentConfig) -> Self {
        PaymentService {
            http: reqwest::Client::new(),
            key_id: config.key_id.clone(),
            key_secret: config.key_secret.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
        }
    }

    pub async fn create_order(&self, amount: Decimal) -> AppResult<PaymentOrder> {
        let minor_units = to_minor_units(amount)?;
        let receipt = new_receipt();

        let response = self
            .http
            .post(format!("{}/v1/orders", self.base_url))
            .basic_auth(&self.key_id, Some(&self.key_secret))
            .json(&json!({
                "amount": minor_units,
                "currency": "INR",
                "receipt": receipt,
            }))
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalService(format!(
                "payment gateway returned {}: {}",
                status, body
            )));
        }

        let order = response.json::<PaymentOrder>().await?;
        log::info!("payment order created: {}", order.id);
        Ok(order)
    }
}
