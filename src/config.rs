use std::num::NonZeroUsize;
use std::path::PathBuf;
use std::time::Duration;

use config::{Config, Environment};
use reqwest::Url;
use serde::Deserialize;

use crate::error::{Result, ScrapeError};

pub const BASE_URL: &str = "https://ssr1.scrape.center";
pub const TOTAL_PAGE: usize = 10;
pub const RESULTS_DIR: &str = "results";
pub const TIMEOUT_SECS: u64 = 10;
const ENV_PREFIX: &str = "SCRAPER";

/// Settings for one scrape run.
///
/// Built from defaults, then `SCRAPER_*` environment variables, then CLI flags.
#[derive(Debug, Clone, Deserialize)]
pub struct ScrapeConfig {
    pub base_url: String,
    pub total_pages: usize,
    pub workers: usize,
    pub results_dir: PathBuf,
    pub timeout_secs: u64,
}

impl Default for ScrapeConfig {
    fn default() -> Self {
        Self {
            base_url: BASE_URL.to_string(),
            total_pages: TOTAL_PAGE,
            workers: default_workers(),
            results_dir: PathBuf::from(RESULTS_DIR),
            timeout_secs: TIMEOUT_SECS,
        }
    }
}

impl ScrapeConfig {
    /// Defaults overlaid with `SCRAPER_BASE_URL`, `SCRAPER_TOTAL_PAGES`,
    /// `SCRAPER_WORKERS`, `SCRAPER_RESULTS_DIR` and `SCRAPER_TIMEOUT_SECS`.
    pub fn from_env() -> Result<Self> {
        Self::from_source(Environment::with_prefix(ENV_PREFIX).try_parsing(true))
    }

    fn from_source(env: Environment) -> Result<Self> {
        let defaults = Self::default();
        let settings = Config::builder()
            .set_default("base_url", defaults.base_url)?
            .set_default("total_pages", defaults.total_pages as i64)?
            .set_default("workers", defaults.workers as i64)?
            .set_default(
                "results_dir",
                defaults.results_dir.to_string_lossy().into_owned(),
            )?
            .set_default("timeout_secs", defaults.timeout_secs as i64)?
            .add_source(env)
            .build()?;
        Ok(settings.try_deserialize()?)
    }

    pub fn validate(&self) -> Result<()> {
        if self.workers == 0 {
            return Err(ScrapeError::Config("workers must be at least 1".into()));
        }
        if self.timeout_secs == 0 {
            return Err(ScrapeError::Config("timeout must be at least 1s".into()));
        }
        self.base_url()?;
        Ok(())
    }

    pub fn base_url(&self) -> Result<Url> {
        Url::parse(&self.base_url).map_err(|e| ScrapeError::Url {
            url: self.base_url.clone(),
            reason: e.to_string(),
        })
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

fn default_workers() -> usize {
    std::thread::available_parallelism()
        .map(NonZeroUsize::get)
        .unwrap_or(1)
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn env_from(pairs: &[(&str, &str)]) -> Environment {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Environment::with_prefix(ENV_PREFIX)
            .try_parsing(true)
            .source(Some(map))
    }

    #[test]
    fn defaults_without_env() {
        let cfg = ScrapeConfig::from_source(env_from(&[])).unwrap();
        assert_eq!(cfg.base_url, BASE_URL);
        assert_eq!(cfg.total_pages, TOTAL_PAGE);
        assert_eq!(cfg.results_dir, PathBuf::from(RESULTS_DIR));
        assert!(cfg.workers >= 1);
        cfg.validate().unwrap();
    }

    #[test]
    fn env_overrides_defaults() {
        let cfg = ScrapeConfig::from_source(env_from(&[
            ("SCRAPER_TOTAL_PAGES", "3"),
            ("SCRAPER_WORKERS", "2"),
            ("SCRAPER_RESULTS_DIR", "out"),
        ]))
        .unwrap();
        assert_eq!(cfg.total_pages, 3);
        assert_eq!(cfg.workers, 2);
        assert_eq!(cfg.results_dir, PathBuf::from("out"));
        assert_eq!(cfg.timeout(), Duration::from_secs(TIMEOUT_SECS));
    }

    #[test]
    fn rejects_zero_workers_and_bad_url() {
        let cfg = ScrapeConfig {
            workers: 0,
            ..ScrapeConfig::default()
        };
        assert!(matches!(cfg.validate(), Err(ScrapeError::Config(_))));

        let cfg = ScrapeConfig {
            base_url: "not a url".into(),
            ..ScrapeConfig::default()
        };
        assert!(matches!(cfg.validate(), Err(ScrapeError::Url { .. })));
    }
}
