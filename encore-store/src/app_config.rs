use serde::Deserialize;
use std::env;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub business_rules: BusinessRules,
    pub travel: TravelConfig,
    pub sync: SyncConfig,
    /// Absent when gateway credentials are not configured; the payment
    /// feature is disabled and the rest of the flow keeps working.
    #[serde(default)]
    pub payment: Option<PaymentConfig>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct BusinessRules {
    pub deposit_percent: u32,
    pub base_fee_pence: i64,
    #[serde(default = "default_currency")]
    pub currency: String,
    pub base_postcode: String,
}

fn default_currency() -> String {
    "GBP".to_string()
}

#[derive(Debug, Deserialize, Clone)]
pub struct TravelConfig {
    pub free_miles: f64,
    pub pence_per_mile: i64,
    pub cache_ttl_seconds: i64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SyncConfig {
    pub interval_seconds: u64,
    pub max_attempts: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct PaymentConfig {
    pub secret_key: String,
}

impl Config {
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let s = config::Config::builder()
            .add_source(config::File::with_name("config/default"))
            .add_source(config::File::with_name(&format!("config/{}", run_mode)).required(false))
            .add_source(config::File::with_name("config/local").required(false))
            // Eg. `ENCORE__SERVER__PORT=8080` overrides server.port.
            .add_source(config::Environment::with_prefix("ENCORE").separator("__"))
            .build()?;

        s.try_deserialize()
    }
}
