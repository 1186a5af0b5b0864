use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single start URL entry, as the crawler actors expect them.
#[derive(Debug, Clone, Serialize)]
pub struct StartUrl {
    pub url: String,
}

/// Input for a storefront product-crawler actor.
#[derive(Debug, Clone, Serialize)]
pub struct ProductCrawlerInput {
    #[serde(rename = "startUrls")]
    pub start_urls: Vec<StartUrl>,
    #[serde(rename = "maxItems")]
    pub max_items: u32,
}

impl ProductCrawlerInput {
    pub fn for_storefront(url: &str, max_items: u32) -> Self {
        Self {
            start_urls: vec![StartUrl {
                url: url.to_string(),
            }],
            max_items,
        }
    }
}

/// Wrapper for Apify API responses.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiResponse<T> {
    pub data: T,
}

/// Apify actor run metadata.
#[derive(Debug, Clone, Deserialize)]
pub struct RunData {
    pub id: String,
    pub status: String,
    #[serde(rename = "defaultDatasetId")]
    pub default_dataset_id: String,
    #[serde(rename = "startedAt")]
    pub started_at: Option<DateTime<Utc>>,
    #[serde(rename = "finishedAt")]
    pub finished_at: Option<DateTime<Utc>>,
}

impl RunData {
    /// Whether the run reached a state the platform will not leave.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self.status.as_str(),
            "SUCCEEDED" | "FAILED" | "ABORTED" | "TIMED-OUT"
        )
    }
}
