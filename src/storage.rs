use crate::error::{CatalogError, Result};
use crate::types::{CatalogSnapshot, MovieRecord};
use std::sync::Mutex;
use tracing::debug;

pub mod sqlite;

pub use sqlite::SqliteCatalogStore;

/// Persistence contract for the movie catalog, keyed by title
pub trait CatalogStore: Send + Sync {
    /// Ensure the backing table exists. Safe to call on every startup.
    fn initialize(&self) -> Result<()>;

    /// Every record projected to year/rating, keyed by title.
    fn list_all(&self) -> Result<CatalogSnapshot>;

    /// Every record with all fields, in storage order.
    fn list_all_full(&self) -> Result<Vec<MovieRecord>>;

    /// Append one record. A second record with the same title fails with
    /// `CatalogError::ConstraintViolation`.
    fn insert(&self, movie: &MovieRecord) -> Result<()>;

    fn delete_by_title(&self, title: &str) -> Result<bool>;

    fn update_rating(&self, title: &str, rating: f64) -> Result<bool>;
}

pub(crate) fn ensure_title(movie: &MovieRecord) -> Result<()> {
    if movie.title.is_empty() {
        return Err(CatalogError::ConstraintViolation {
            title: movie.title.clone(),
            detail: "title must not be empty".to_string(),
        });
    }
    Ok(())
}

/// In-memory storage implementation for development/testing
#[derive(Default)]
pub struct InMemoryCatalogStore {
    movies: Mutex<Vec<MovieRecord>>,
}

impl InMemoryCatalogStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn movies(&self) -> std::sync::MutexGuard<'_, Vec<MovieRecord>> {
        self.movies.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl CatalogStore for InMemoryCatalogStore {
    fn initialize(&self) -> Result<()> {
        Ok(())
    }

    fn list_all(&self) -> Result<CatalogSnapshot> {
        Ok(self.movies().iter().map(MovieRecord::summary).collect())
    }

    fn list_all_full(&self) -> Result<Vec<MovieRecord>> {
        Ok(self.movies().clone())
    }

    fn insert(&self, movie: &MovieRecord) -> Result<()> {
        ensure_title(movie)?;
        let mut movies = self.movies();
        if movies.iter().any(|m| m.title == movie.title) {
            return Err(CatalogError::ConstraintViolation {
                title: movie.title.clone(),
                detail: "UNIQUE constraint failed: movies.title".to_string(),
            });
        }
        movies.push(movie.clone());
        debug!("Inserted movie: {}", movie.title);
        Ok(())
    }

    fn delete_by_title(&self, title: &str) -> Result<bool> {
        let mut movies = self.movies();
        let before = movies.len();
        movies.retain(|m| m.title != title);
        Ok(movies.len() != before)
    }

    fn update_rating(&self, title: &str, rating: f64) -> Result<bool> {
        let mut movies = self.movies();
        match movies.iter_mut().find(|m| m.title == title) {
            Some(movie) => {
                movie.rating = rating;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}
