//! Catalog metrics
//!
//! Counters are recorded through the `metrics` facade and are no-ops until a
//! recorder is installed with [`init`].

use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use std::fmt;
use tracing::info;

/// Every metric name used by the catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MetricName {
    MoviesAdded,
    MoviesDuplicate,
    ProviderNotFound,
    ProviderErrors,
    StoreErrors,
    MoviesDeleted,
    RatingsUpdated,
}

impl MetricName {
    pub fn as_str(&self) -> &'static str {
        match self {
            MetricName::MoviesAdded => "moviedb_movies_added_total",
            MetricName::MoviesDuplicate => "moviedb_movies_duplicate_total",
            MetricName::ProviderNotFound => "moviedb_provider_not_found_total",
            MetricName::ProviderErrors => "moviedb_provider_errors_total",
            MetricName::StoreErrors => "moviedb_store_errors_total",
            MetricName::MoviesDeleted => "moviedb_movies_deleted_total",
            MetricName::RatingsUpdated => "moviedb_ratings_updated_total",
        }
    }
}

impl fmt::Display for MetricName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Install the Prometheus recorder and return a handle for rendering.
pub fn init() -> Result<PrometheusHandle, Box<dyn std::error::Error + Send + Sync>> {
    let handle = PrometheusBuilder::new()
        .install_recorder()
        .map_err(|e| format!("Failed to install Prometheus recorder: {}", e))?;
    info!("Metrics recorder installed");
    Ok(handle)
}

fn increment(name: MetricName) {
    ::metrics::counter!(name.as_str()).increment(1);
}

pub mod catalog {
    use super::{increment, MetricName};

    pub fn movie_added() {
        increment(MetricName::MoviesAdded);
    }

    pub fn duplicate_rejected() {
        increment(MetricName::MoviesDuplicate);
    }

    pub fn provider_not_found() {
        increment(MetricName::ProviderNotFound);
    }

    pub fn provider_error() {
        increment(MetricName::ProviderErrors);
    }

    pub fn store_error() {
        increment(MetricName::StoreErrors);
    }

    pub fn movie_deleted() {
        increment(MetricName::MoviesDeleted);
    }

    pub fn rating_updated() {
        increment(MetricName::RatingsUpdated);
    }
}
