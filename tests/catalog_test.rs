use anyhow::Result;
use async_trait::async_trait;
use moviedb::config::SiteConfig;
use moviedb::query::{self, YearOrder};
use moviedb::render::generate_landing_page;
use moviedb::{
    AddOutcome, CatalogService, CatalogStore, MetadataLookup, MetadataProvider, MovieRecord,
    SqliteCatalogStore,
};
use std::sync::Arc;
use tempfile::tempdir;

/// Resolves any query containing "matrix" (any case) to the same canonical
/// record, everything else to not-found.
struct CanonicalizingProvider;

#[async_trait]
impl MetadataProvider for CanonicalizingProvider {
    async fn fetch(&self, title: &str) -> MetadataLookup {
        if title.to_lowercase().contains("matrix") {
            MetadataLookup::Found(MovieRecord::new("The Matrix", 1999, 8.7, "matrix.jpg"))
        } else if title == "offline" {
            MetadataLookup::ConnectionError("connection refused".to_string())
        } else {
            MetadataLookup::NotFound
        }
    }
}

fn open_store(dir: &tempfile::TempDir) -> Result<Arc<SqliteCatalogStore>> {
    Ok(Arc::new(SqliteCatalogStore::open(dir.path().join("movies.db"))?))
}

#[test]
fn insert_list_delete_round_trip() -> Result<()> {
    let dir = tempdir()?;
    let store = open_store(&dir)?;

    store.insert(&MovieRecord::new("Matrix", 1999, 8.7, "url"))?;
    let snapshot = store.list_all()?;
    let entry = snapshot.get("Matrix").expect("Matrix should be listed");
    assert_eq!(entry.year, 1999);
    assert_eq!(entry.rating, 8.7);

    assert!(store.delete_by_title("Matrix")?);
    assert!(!store.list_all()?.contains("Matrix"));

    store.insert(&MovieRecord::new("Up", 2009, 8.3, "up.jpg"))?;
    let before = store.list_all()?;
    assert!(!store.delete_by_title("Nonexistent")?);
    assert_eq!(store.list_all()?, before);
    Ok(())
}

#[tokio::test]
async fn two_queries_for_one_canonical_title_add_once() -> Result<()> {
    let dir = tempdir()?;
    let store = open_store(&dir)?;
    let service = CatalogService::new(store.clone(), Arc::new(CanonicalizingProvider));

    let first = service.add_movie("matrix").await;
    let second = service.add_movie("THE MATRIX").await;

    assert!(first.is_added());
    assert!(matches!(second, AddOutcome::Duplicate { ref title } if title == "The Matrix"));
    let full = store.list_all_full()?;
    assert_eq!(full.len(), 1);
    assert_eq!(full[0].title, "The Matrix");
    Ok(())
}

#[tokio::test]
async fn failed_lookups_write_nothing() -> Result<()> {
    let dir = tempdir()?;
    let store = open_store(&dir)?;
    let service = CatalogService::new(store.clone(), Arc::new(CanonicalizingProvider));

    assert!(matches!(service.add_movie("Up").await, AddOutcome::NotFound { .. }));
    assert!(matches!(service.add_movie("offline").await, AddOutcome::ProviderError { .. }));
    assert!(store.list_all()?.is_empty());
    Ok(())
}

#[test]
fn scenario_queries_over_stored_catalog() -> Result<()> {
    let dir = tempdir()?;
    let store = open_store(&dir)?;
    store.insert(&MovieRecord::new("A", 2000, 5.0, "a.jpg"))?;
    store.insert(&MovieRecord::new("B", 2010, 9.0, "b.jpg"))?;
    store.insert(&MovieRecord::new("C", 2010, 9.0, "c.jpg"))?;

    let snapshot = store.list_all()?;
    let by_year: Vec<String> = query::sort_by_year(&snapshot, YearOrder::Descending)
        .into_iter()
        .map(|m| m.title)
        .collect();
    assert_eq!(by_year, vec!["B", "C", "A"]);
    assert_eq!(query::median_rating(&snapshot)?, 9.0);
    let best: Vec<String> = query::best_rated(&snapshot).into_iter().map(|m| m.title).collect();
    assert_eq!(best, vec!["B", "C"]);
    Ok(())
}

#[tokio::test]
async fn landing_page_lists_every_movie() -> Result<()> {
    let dir = tempdir()?;
    let store = open_store(&dir)?;
    let service = CatalogService::new(store, Arc::new(CanonicalizingProvider));
    service.add_movie("matrix").await;

    let template_path = dir.path().join("index_template.html");
    std::fs::write(
        &template_path,
        "<title>__TEMPLATE_TITLE__</title>\n<ol>\n__TEMPLATE_MOVIE_GRID__\n</ol>\n",
    )?;
    let site = SiteConfig {
        template_path,
        output_path: dir.path().join("site").join("index.html"),
        title: "MOVIE-DB".to_string(),
    };

    let written = generate_landing_page(&service, &site)?;
    let page = std::fs::read_to_string(written)?;
    assert!(page.contains("<title>MOVIE-DB</title>"));
    assert!(page.contains("<p class=\"movie-title\">The Matrix</p>"));
    assert!(page.contains("src=\"matrix.jpg\""));
    Ok(())
}
