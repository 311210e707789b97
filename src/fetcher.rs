use std::time::Duration;

use reqwest::{Client, StatusCode, Url};
use tracing::{error, info};

use crate::error::{Result, ScrapeError};

const USER_AGENT: &str = concat!("movie_scraper/", env!("CARGO_PKG_VERSION"));

/// Thin GET wrapper around a shared reqwest client.
#[derive(Clone)]
pub struct PageFetcher {
    client: Client,
    base_url: Url,
}

impl PageFetcher {
    pub fn new(base_url: Url, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .map_err(|e| ScrapeError::Http {
                url: base_url.to_string(),
                source: e,
            })?;
        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Fetch `url` and return its body, or `None` after logging the failure.
    pub async fn fetch(&self, url: &str) -> Option<String> {
        info!("scraping {}...", url);
        match self.try_fetch(url).await {
            Ok(body) => Some(body),
            Err(e @ ScrapeError::Status { .. }) => {
                error!("{}", e);
                None
            }
            Err(e) => {
                error!(error = ?e, "error occurred while scraping {}", url);
                None
            }
        }
    }

    pub async fn fetch_index(&self, page: usize) -> Option<String> {
        self.fetch(&self.index_url(page)).await
    }

    pub fn index_url(&self, page: usize) -> String {
        format!("{}/page/{}", self.base_url.as_str().trim_end_matches('/'), page)
    }

    async fn try_fetch(&self, url: &str) -> Result<String> {
        let http_err = |source: reqwest::Error| ScrapeError::Http {
            url: url.to_string(),
            source,
        };

        let response = self.client.get(url).send().await.map_err(http_err)?;
        let status = response.status();
        if status != StatusCode::OK {
            return Err(ScrapeError::Status {
                url: url.to_string(),
                status,
            });
        }
        response.text().await.map_err(http_err)
    }
}
