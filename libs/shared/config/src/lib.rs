use std::env;
use tracing::warn;

/// Flat fee charged for every consultation before the doctor's discount.
pub const DEFAULT_CONSULTATION_FEE: f64 = 1000.0;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub store_url: String,
    pub store_service_key: String,
    pub consultation_fee: f64,
    pub port: u16,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let config = Self {
            store_url: env::var("STORE_URL")
                .unwrap_or_else(|_| {
                    warn!("STORE_URL not set, using empty value");
                    String::new()
                }),
            store_service_key: env::var("STORE_SERVICE_KEY")
                .unwrap_or_else(|_| {
                    warn!("STORE_SERVICE_KEY not set, using empty value");
                    String::new()
                }),
            consultation_fee: env::var("CONSULTATION_FEE")
                .ok()
                .and_then(|raw| match raw.parse() {
                    Ok(fee) => Some(fee),
                    Err(_) => {
                        warn!("CONSULTATION_FEE is not a number, using default");
                        None
                    }
                })
                .unwrap_or(DEFAULT_CONSULTATION_FEE),
            port: env::var("PORT")
                .ok()
                .and_then(|raw| match raw.parse() {
                    Ok(port) => Some(port),
                    Err(_) => {
                        warn!("PORT is not a valid port number, using default");
                        None
                    }
                })
                .unwrap_or(3000),
        };

        if !config.is_configured() {
            warn!("Application not fully configured - missing environment variables");
        }

        config
    }

    pub fn is_configured(&self) -> bool {
        !self.store_url.is_empty() && !self.store_service_key.is_empty()
    }
}
