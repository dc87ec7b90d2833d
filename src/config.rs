use dotenv::dotenv;
use once_cell::sync::Lazy;
use std::env;
use std::fmt;
use std::time::Duration;

pub struct Config {
    pub port: u16,
    pub log_level: String,
    pub balance_cache_ttl_secs: u64,
    pub password_hash_cost: u32,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("port", &self.port)
            .field("log_level", &self.log_level)
            .field("balance_cache_ttl_secs", &self.balance_cache_ttl_secs)
            .field("password_hash_cost", &self.password_hash_cost)
            .finish()
    }
}

impl Config {
    fn from_env() -> Self {
        dotenv().ok();

        Self {
            port: env::var("PORT").ok().and_then(|v| v.parse().ok()).unwrap_or(3000),
            log_level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            balance_cache_ttl_secs: env::var("BALANCE_CACHE_TTL_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3600),
            password_hash_cost: env::var("PASSWORD_HASH_COST")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(bcrypt::DEFAULT_COST),
        }
    }

    pub fn balance_cache_ttl(&self) -> Duration {
        Duration::from_secs(self.balance_cache_ttl_secs)
    }
}

pub static CONFIG: Lazy<Config> = Lazy::new(Config::from_env);
