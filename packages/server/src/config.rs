use anyhow::{Context, Result};
use dotenvy::dotenv;
use std::env;
use std::time::Duration;

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    pub apify_api_token: String,
    /// Apify actor used for storefront product crawls.
    pub apify_actor_id: String,
    /// Delay inserted between consecutive scrape submissions.
    pub dispatch_pacing: Duration,
    /// Upper bound on a single scrape invocation before it counts as failed.
    pub invoke_timeout: Duration,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();

        let pacing_ms: u64 = env::var("DISPATCH_PACING_MS")
            .unwrap_or_else(|_| "500".to_string())
            .parse()
            .context("DISPATCH_PACING_MS must be a valid number of milliseconds")?;

        let invoke_timeout_secs: u64 = env::var("INVOKE_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".to_string())
            .parse()
            .context("INVOKE_TIMEOUT_SECS must be a valid number of seconds")?;

        Ok(Self {
            database_url: env::var("DATABASE_URL").context("DATABASE_URL must be set")?,
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .context("PORT must be a valid number")?,
            apify_api_token: env::var("APIFY_API_TOKEN")
                .context("APIFY_API_TOKEN must be set")?,
            apify_actor_id: env::var("APIFY_ACTOR_ID")
                .unwrap_or_else(|_| "acme~storefront-product-crawler".to_string()),
            dispatch_pacing: Duration::from_millis(pacing_ms),
            invoke_timeout: Duration::from_secs(invoke_timeout_secs),
        })
    }
}
