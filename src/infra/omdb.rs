use crate::app::ports::{MetadataLookup, MetadataProvider};
use crate::config::OmdbConfig;
use crate::error::{CatalogError, Result};
use crate::types::MovieRecord;
use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, instrument, warn};

/// Raw OMDb `?t=` response. Only the fields the catalog keeps.
#[derive(Debug, Deserialize)]
struct OmdbResponse {
    #[serde(rename = "Response")]
    response: String,
    #[serde(rename = "Title")]
    title: Option<String>,
    #[serde(rename = "Year")]
    year: Option<String>,
    #[serde(rename = "imdbRating")]
    imdb_rating: Option<String>,
    #[serde(rename = "Poster")]
    poster: Option<String>,
    #[serde(rename = "Error")]
    error: Option<String>,
}

pub struct OmdbProvider {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl OmdbProvider {
    pub fn new(config: &OmdbConfig, api_key: impl Into<String>) -> Result<Self> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(CatalogError::Config("OMDb API key is empty".to_string()));
        }
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;
        Ok(Self {
            client,
            base_url: config.base_url.clone(),
            api_key,
        })
    }

    /// Build from configuration, reading the key from `OMDB_API_KEY`.
    pub fn from_env(config: &OmdbConfig) -> Result<Self> {
        let api_key = std::env::var(crate::constants::OMDB_API_KEY_ENV).map_err(|_| {
            CatalogError::Config(format!(
                "{} environment variable not set",
                crate::constants::OMDB_API_KEY_ENV
            ))
        })?;
        Self::new(config, api_key)
    }
}

#[async_trait]
impl MetadataProvider for OmdbProvider {
    #[instrument(skip(self))]
    async fn fetch(&self, title: &str) -> MetadataLookup {
        let response = match self
            .client
            .get(&self.base_url)
            .query(&[("apikey", self.api_key.as_str()), ("t", title)])
            .send()
            .await
        {
            Ok(resp) => resp,
            Err(e) => {
                warn!("OMDb request failed: {}", e);
                return MetadataLookup::ConnectionError(e.to_string());
            }
        };

        let status = response.status();
        if !status.is_success() {
            warn!("OMDb returned status {}", status);
            return MetadataLookup::ConnectionError(format!("OMDb returned status {status}"));
        }

        match response.json::<OmdbResponse>().await {
            Ok(body) => lookup_from_response(body),
            Err(e) => {
                warn!("OMDb response could not be decoded: {}", e);
                MetadataLookup::ConnectionError(e.to_string())
            }
        }
    }
}

/// Stand-in used when no OMDb key is configured. Every lookup reports the
/// provider as unavailable.
pub struct OfflineProvider {
    reason: String,
}

impl OfflineProvider {
    pub fn new(reason: impl Into<String>) -> Self {
        Self { reason: reason.into() }
    }
}

#[async_trait]
impl MetadataProvider for OfflineProvider {
    async fn fetch(&self, _title: &str) -> MetadataLookup {
        MetadataLookup::ConnectionError(self.reason.clone())
    }
}

fn lookup_from_response(body: OmdbResponse) -> MetadataLookup {
    if body.response != "True" {
        debug!("OMDb has no match: {}", body.error.as_deref().unwrap_or("unknown"));
        return MetadataLookup::NotFound;
    }

    let Some(title) = body.title.filter(|t| !t.is_empty()) else {
        return MetadataLookup::ConnectionError("OMDb response is missing Title".to_string());
    };
    let Some(year) = body.year.as_deref().and_then(parse_year) else {
        return MetadataLookup::ConnectionError(format!(
            "OMDb returned an unusable Year for \"{title}\""
        ));
    };
    let rating = body.imdb_rating.as_deref().map(parse_rating).unwrap_or(0.0);
    let poster = body.poster.unwrap_or_else(|| "N/A".to_string());

    MetadataLookup::Found(MovieRecord::new(title, year, rating, poster))
}

/// Leading digits of an OMDb year. Series come back as ranges like `2005–2008`.
fn parse_year(raw: &str) -> Option<i64> {
    let digits: String = raw.trim().chars().take_while(|c| c.is_ascii_digit()).collect();
    digits.parse().ok()
}

/// `N/A` and other non-numeric ratings count as unrated.
fn parse_rating(raw: &str) -> f64 {
    raw.trim().parse().unwrap_or(0.0)
}
