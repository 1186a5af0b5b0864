//! Pure Apify REST API client.
//!
//! A minimal client for the Apify platform API. Supports starting actor runs
//! and fetching run status. The caller decides which actor to run; this crate
//! only speaks the platform's run API.
//!
//! # Example
//!
//! ```rust,ignore
//! use apify_client::{ApifyClient, ProductCrawlerInput};
//!
//! let client = ApifyClient::new("your-api-token".into());
//!
//! let input = ProductCrawlerInput::for_storefront("https://shop.example.com", 50);
//! let run = client.start_actor_run("acme~product-crawler", &input).await?;
//! println!("run {} is {}", run.id, run.status);
//! ```

pub mod error;
pub mod types;

pub use error::{ApifyError, Result};
pub use types::{ApiResponse, ProductCrawlerInput, RunData, StartUrl};

use serde::Serialize;

const BASE_URL: &str = "https://api.apify.com/v2";

pub struct ApifyClient {
    client: reqwest::Client,
    token: String,
}

impl ApifyClient {
    pub fn new(token: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            token,
        }
    }

    /// Start an actor run. Returns immediately with run metadata; the run
    /// continues on the Apify platform.
    pub async fn start_actor_run<I: Serialize>(
        &self,
        actor_id: &str,
        input: &I,
    ) -> Result<RunData> {
        let url = format!("{}/acts/{}/runs", BASE_URL, actor_id);
        let resp = self
            .client
            .post(&url)
            .bearer_auth(&self.token)
            .json(input)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(ApifyError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let api_resp: ApiResponse<RunData> = resp.json().await?;
        tracing::debug!(run_id = %api_resp.data.id, actor_id, "Apify run started");
        Ok(api_resp.data)
    }

    /// Fetch current metadata for a run. A single snapshot, no waiting.
    pub async fn get_run(&self, run_id: &str) -> Result<RunData> {
        let url = format!("{}/actor-runs/{}", BASE_URL, run_id);
        let resp = self
            .client
            .get(&url)
            .bearer_auth(&self.token)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(ApifyError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let api_resp: ApiResponse<RunData> = resp.json().await?;
        Ok(api_resp.data)
    }
}
