use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// A fully populated catalog entry. `title` is the identity key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieRecord {
    pub title: String,
    pub year: i64,
    pub rating: f64,
    pub poster_url: String,
}

impl MovieRecord {
    pub fn new(title: impl Into<String>, year: i64, rating: f64, poster_url: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            year,
            rating,
            poster_url: poster_url.into(),
        }
    }

    pub fn summary(&self) -> MovieSummary {
        MovieSummary {
            title: self.title.clone(),
            year: self.year,
            rating: self.rating,
        }
    }
}

/// Light projection used by listing, search, sorting and stats.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieSummary {
    pub title: String,
    pub year: i64,
    pub rating: f64,
}

/// Year and rating for one title, as stored in a snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct YearRating {
    pub year: i64,
    pub rating: f64,
}

/// Point-in-time view of the catalog: `title -> {year, rating}` kept in
/// storage order so that ties resolve to first-seen.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CatalogSnapshot {
    entries: IndexMap<String, YearRating>,
}

impl CatalogSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a snapshot from rows in storage order. A repeated title keeps
    /// its first position and takes the later values.
    pub fn from_rows<I>(rows: I) -> Self
    where
        I: IntoIterator<Item = MovieSummary>,
    {
        let entries = rows
            .into_iter()
            .map(|row| (row.title, YearRating { year: row.year, rating: row.rating }))
            .collect();
        Self { entries }
    }

    pub fn get(&self, title: &str) -> Option<YearRating> {
        self.entries.get(title).copied()
    }

    pub fn contains(&self, title: &str) -> bool {
        self.entries.contains_key(title)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entry at a storage position.
    pub fn get_index(&self, index: usize) -> Option<MovieSummary> {
        self.entries
            .get_index(index)
            .map(|(title, entry)| summary_of(title, entry))
    }

    pub fn iter(&self) -> impl Iterator<Item = MovieSummary> + '_ {
        self.entries.iter().map(|(title, entry)| summary_of(title, entry))
    }

    pub fn ratings(&self) -> impl Iterator<Item = f64> + '_ {
        self.entries.values().map(|entry| entry.rating)
    }

    /// Every entry as a summary, in storage order.
    pub fn to_vec(&self) -> Vec<MovieSummary> {
        self.iter().collect()
    }
}

fn summary_of(title: &str, entry: &YearRating) -> MovieSummary {
    MovieSummary {
        title: title.to_string(),
        year: entry.year,
        rating: entry.rating,
    }
}

impl FromIterator<MovieSummary> for CatalogSnapshot {
    fn from_iter<T: IntoIterator<Item = MovieSummary>>(iter: T) -> Self {
        Self::from_rows(iter)
    }
}
