use crate::utils::error::{AppError, AppResult};
use std::env;

/// Environment-backed configuration, read once at startup.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub payment: PaymentConfig,
    pub catalog: CatalogConfig,
}

#[derive(Debug, Clone)]
pub struct PaymentConfig {
    pub key_id: String,
    pub key_secret: String,
    pub base_url: String,
}

#[derive(Debug, Clone)]
pub struct CatalogConfig {
    pub api_key: String,
    pub base_url: String,
}

fn required(name: &str) -> AppResult<String> {
    env::var(name).map_err(|_| AppError::ConfigError(format!("{} must be set", name)))
}

fn with_default(name: &str, default: &str) -> String {
    env::var(name).unwrap_or_else(|_| default.to_string())
}

impl AppConfig {
    pub fn from_env() -> AppResult<Self> {
        Ok(AppConfig {
            database_url: required("DATABASE_URL")?,
            payment: PaymentConfig {
                key_id: required("PAYMENT_KEY_ID")?,
                key_secret: required("PAYMENT_KEY_SECRET")?,
                base_url: with_default("PAYMENT_API_BASE", "https://api.razorpay.com"),
            },
            catalog: CatalogConfig {
                api_key: required("CATALOG_API_KEY")?,
                base_url: with_default("CATALOG_API_BASE", "https://api.themoviedb.org/3"),
            },
        })
    }
}
