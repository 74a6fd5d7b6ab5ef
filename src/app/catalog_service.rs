use std::sync::Arc;

use tracing::{info, instrument, warn};

use crate::app::ports::{MetadataLookup, MetadataProvider};
use crate::error::{CatalogError, Result};
use crate::observability::metrics::catalog as catalog_metrics;
use crate::storage::CatalogStore;
use crate::types::{CatalogSnapshot, MovieRecord};

/// Result of adding a movie by title
#[derive(Debug)]
pub enum AddOutcome {
    Added(MovieRecord),
    /// The provider has no match for the title as typed.
    NotFound { title: String },
    /// The canonical title is already cataloged; nothing was written.
    Duplicate { title: String },
    ProviderError { detail: String },
    /// The store refused or failed the write. A racing duplicate shows up
    /// here as `CatalogError::ConstraintViolation`.
    StoreError(CatalogError),
}

impl AddOutcome {
    pub fn is_added(&self) -> bool {
        matches!(self, AddOutcome::Added(_))
    }
}

/// Orchestrates writes to the catalog and owns the title-uniqueness rule
pub struct CatalogService {
    store: Arc<dyn CatalogStore>,
    provider: Arc<dyn MetadataProvider>,
}

impl CatalogService {
    pub fn new(store: Arc<dyn CatalogStore>, provider: Arc<dyn MetadataProvider>) -> Self {
        Self { store, provider }
    }

    /// Look the title up with the provider and insert the canonical record
    /// unless that canonical title is already cataloged.
    ///
    /// The snapshot check is best-effort; the store's uniqueness constraint
    /// is what finally rejects a duplicate written by someone else in
    /// between.
    #[instrument(skip(self))]
    pub async fn add_movie(&self, title: &str) -> AddOutcome {
        let movie = match self.provider.fetch(title).await {
            MetadataLookup::Found(movie) => movie,
            MetadataLookup::NotFound => {
                catalog_metrics::provider_not_found();
                info!("Provider has no match for '{}'", title);
                return AddOutcome::NotFound {
                    title: title.to_string(),
                };
            }
            MetadataLookup::ConnectionError(detail) => {
                catalog_metrics::provider_error();
                warn!("Metadata provider failed: {}", detail);
                return AddOutcome::ProviderError { detail };
            }
        };

        let snapshot = match self.store.list_all() {
            Ok(snapshot) => snapshot,
            Err(e) => {
                catalog_metrics::store_error();
                return AddOutcome::StoreError(e);
            }
        };
        if snapshot.contains(&movie.title) {
            catalog_metrics::duplicate_rejected();
            info!("'{}' is already cataloged", movie.title);
            return AddOutcome::Duplicate { title: movie.title };
        }

        match self.store.insert(&movie) {
            Ok(()) => {
                catalog_metrics::movie_added();
                info!("Added '{}' ({}) rated {}", movie.title, movie.year, movie.rating);
                AddOutcome::Added(movie)
            }
            Err(e) => {
                catalog_metrics::store_error();
                if e.is_constraint_violation() {
                    warn!("Insert of '{}' lost a race with another writer: {}", movie.title, e);
                } else {
                    warn!("Insert of '{}' failed: {}", movie.title, e);
                }
                AddOutcome::StoreError(e)
            }
        }
    }

    /// True iff a movie with exactly this title existed and was removed.
    pub fn delete_movie(&self, title: &str) -> Result<bool> {
        let deleted = self.store.delete_by_title(title)?;
        if deleted {
            catalog_metrics::movie_deleted();
            info!("Deleted '{}'", title);
        }
        Ok(deleted)
    }

    /// True iff a movie with exactly this title existed and now carries
    /// `rating`.
    pub fn update_rating(&self, title: &str, rating: f64) -> Result<bool> {
        let updated = self.store.update_rating(title, rating)?;
        if updated {
            catalog_metrics::rating_updated();
            info!("Updated rating of '{}' to {}", title, rating);
        }
        Ok(updated)
    }

    pub fn snapshot(&self) -> Result<CatalogSnapshot> {
        self.store.list_all()
    }

    /// Every record with all fields, for page rendering.
    pub fn full_listing(&self) -> Result<Vec<MovieRecord>> {
        self.store.list_all_full()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::InMemoryCatalogStore;
    use async_trait::async_trait;
    use std::collections::HashMap;

    struct FakeProvider {
        responses: HashMap<String, MetadataLookup>,
    }

    impl FakeProvider {
        fn new(responses: Vec<(&str, MetadataLookup)>) -> Self {
            Self {
                responses: responses
                    .into_iter()
                    .map(|(k, v)| (k.to_string(), v))
                    .collect(),
            }
        }
    }

    #[async_trait]
    impl MetadataProvider for FakeProvider {
        async fn fetch(&self, title: &str) -> MetadataLookup {
            self.responses
                .get(title)
                .cloned()
                .unwrap_or(MetadataLookup::NotFound)
        }
    }

    /// Store whose pre-check snapshot misses a row another writer inserted.
    struct RacingStore {
        inner: InMemoryCatalogStore,
    }

    impl CatalogStore for RacingStore {
        fn initialize(&self) -> Result<()> {
            Ok(())
        }
        fn list_all(&self) -> Result<CatalogSnapshot> {
            Ok(CatalogSnapshot::new())
        }
        fn list_all_full(&self) -> Result<Vec<MovieRecord>> {
            self.inner.list_all_full()
        }
        fn insert(&self, movie: &MovieRecord) -> Result<()> {
            self.inner.insert(movie)
        }
        fn delete_by_title(&self, title: &str) -> Result<bool> {
            self.inner.delete_by_title(title)
        }
        fn update_rating(&self, title: &str, rating: f64) -> Result<bool> {
            self.inner.update_rating(title, rating)
        }
    }

    fn matrix() -> MovieRecord {
        MovieRecord::new("The Matrix", 1999, 8.7, "matrix.jpg")
    }

    fn service_with(store: Arc<dyn CatalogStore>, provider: FakeProvider) -> CatalogService {
        CatalogService::new(store, Arc::new(provider))
    }

    #[tokio::test]
    async fn same_canonical_title_is_added_once() {
        let store = Arc::new(InMemoryCatalogStore::new());
        let provider = FakeProvider::new(vec![
            ("matrix", MetadataLookup::Found(matrix())),
            ("the matrix", MetadataLookup::Found(matrix())),
        ]);
        let service = service_with(store.clone(), provider);

        let first = service.add_movie("matrix").await;
        let second = service.add_movie("the matrix").await;

        assert!(first.is_added());
        match second {
            AddOutcome::Duplicate { title } => assert_eq!(title, "The Matrix"),
            other => panic!("expected duplicate, got {other:?}"),
        }
        assert_eq!(store.list_all_full().unwrap(), vec![matrix()]);
    }

    #[tokio::test]
    async fn not_found_reports_the_query_title() {
        let service = service_with(Arc::new(InMemoryCatalogStore::new()), FakeProvider::new(vec![]));

        match service.add_movie("Nope").await {
            AddOutcome::NotFound { title } => assert_eq!(title, "Nope"),
            other => panic!("expected not found, got {other:?}"),
        }
        assert!(service.snapshot().unwrap().is_empty());
    }

    #[tokio::test]
    async fn connection_error_becomes_provider_error() {
        let provider = FakeProvider::new(vec![(
            "Up",
            MetadataLookup::ConnectionError("timed out".to_string()),
        )]);
        let service = service_with(Arc::new(InMemoryCatalogStore::new()), provider);

        match service.add_movie("Up").await {
            AddOutcome::ProviderError { detail } => assert_eq!(detail, "timed out"),
            other => panic!("expected provider error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn racing_insert_surfaces_constraint_violation() {
        let inner = InMemoryCatalogStore::new();
        inner.insert(&matrix()).unwrap();
        let store = Arc::new(RacingStore { inner });
        let provider = FakeProvider::new(vec![("matrix", MetadataLookup::Found(matrix()))]);
        let service = service_with(store.clone(), provider);

        match service.add_movie("matrix").await {
            AddOutcome::StoreError(e) => assert!(e.is_constraint_violation()),
            other => panic!("expected store error, got {other:?}"),
        }
        assert_eq!(store.list_all_full().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn update_rating_writes_the_supplied_value() {
        let store = Arc::new(InMemoryCatalogStore::new());
        let provider = FakeProvider::new(vec![("matrix", MetadataLookup::Found(matrix()))]);
        let service = service_with(store, provider);
        service.add_movie("matrix").await;

        assert!(service.update_rating("The Matrix", 9.5).unwrap());
        assert!(!service.update_rating("matrix", 1.0).unwrap());
        assert_eq!(service.snapshot().unwrap().get("The Matrix").unwrap().rating, 9.5);
    }

    #[tokio::test]
    async fn delete_requires_exact_title() {
        let store = Arc::new(InMemoryCatalogStore::new());
        let provider = FakeProvider::new(vec![("matrix", MetadataLookup::Found(matrix()))]);
        let service = service_with(store, provider);
        service.add_movie("matrix").await;

        assert!(!service.delete_movie("the matrix").unwrap());
        assert!(service.delete_movie("The Matrix").unwrap());
        assert!(!service.delete_movie("The Matrix").unwrap());
    }
}
