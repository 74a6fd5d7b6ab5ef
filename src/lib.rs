pub mod config;
pub mod constants;
pub mod error;
pub mod logging;
pub mod query;
pub mod render;
pub mod storage;
pub mod types;

// Application use cases and the ports they depend on
pub mod app;
// Adapters for external systems
pub mod infra;
pub mod observability;

pub use app::catalog_service::{AddOutcome, CatalogService};
pub use app::ports::{MetadataLookup, MetadataProvider};
pub use error::{CatalogError, Result};
pub use storage::{CatalogStore, InMemoryCatalogStore, SqliteCatalogStore};
pub use types::{CatalogSnapshot, MovieRecord, MovieSummary};
