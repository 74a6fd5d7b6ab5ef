//! Read-only queries over a [`CatalogSnapshot`].
//!
//! Every function here is pure. Sorts are stable, so entries that compare
//! equal keep their snapshot order.

use crate::error::{CatalogError, Result};
use crate::types::{CatalogSnapshot, MovieSummary};
use rand::Rng;
use serde::Serialize;
use std::cmp::Ordering;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum YearOrder {
    Ascending,
    Descending,
}

/// Aggregate view shown on the stats screen.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CatalogStats {
    pub average: f64,
    pub median: f64,
    pub best: Vec<MovieSummary>,
    pub worst: Vec<MovieSummary>,
}

/// Case-insensitive substring match on titles.
pub fn search(snapshot: &CatalogSnapshot, needle: &str) -> Vec<MovieSummary> {
    let needle = needle.to_lowercase();
    snapshot
        .iter()
        .filter(|m| m.title.to_lowercase().contains(&needle))
        .collect()
}

pub fn sort_by_rating_desc(snapshot: &CatalogSnapshot) -> Vec<MovieSummary> {
    let mut movies = snapshot.to_vec();
    movies.sort_by(|a, b| b.rating.total_cmp(&a.rating));
    movies
}

pub fn sort_by_year(snapshot: &CatalogSnapshot, order: YearOrder) -> Vec<MovieSummary> {
    let mut movies = snapshot.to_vec();
    match order {
        YearOrder::Ascending => movies.sort_by_key(|m| m.year),
        YearOrder::Descending => movies.sort_by(|a, b| b.year.cmp(&a.year)),
    }
    movies
}

/// Mean rating rounded to one decimal place, halves to even.
pub fn average_rating(snapshot: &CatalogSnapshot) -> Result<f64> {
    if snapshot.is_empty() {
        return Err(CatalogError::EmptyCatalog);
    }
    let sum: f64 = snapshot.ratings().sum();
    let mean = sum / snapshot.len() as f64;
    Ok((mean * 10.0).round_ties_even() / 10.0)
}

/// Rating at index `n / 2` of the ascending ratings. For an even count this
/// is the upper of the two middle values, not their average.
pub fn median_rating(snapshot: &CatalogSnapshot) -> Result<f64> {
    if snapshot.is_empty() {
        return Err(CatalogError::EmptyCatalog);
    }
    let mut ratings: Vec<f64> = snapshot.ratings().collect();
    ratings.sort_by(|a, b| a.total_cmp(b));
    Ok(ratings[ratings.len() / 2])
}

/// Every movie sharing the highest rating, in snapshot order.
pub fn best_rated(snapshot: &CatalogSnapshot) -> Vec<MovieSummary> {
    rated_at_extreme(snapshot, Ordering::Greater)
}

/// Every movie sharing the lowest rating, in snapshot order.
pub fn worst_rated(snapshot: &CatalogSnapshot) -> Vec<MovieSummary> {
    rated_at_extreme(snapshot, Ordering::Less)
}

fn rated_at_extreme(snapshot: &CatalogSnapshot, wanted: Ordering) -> Vec<MovieSummary> {
    let extreme = snapshot.ratings().reduce(|acc, r| {
        if r.total_cmp(&acc) == wanted {
            r
        } else {
            acc
        }
    });
    match extreme {
        Some(target) => snapshot
            .iter()
            .filter(|m| m.rating == target)
            .collect(),
        None => Vec::new(),
    }
}

pub fn pick_random(snapshot: &CatalogSnapshot) -> Result<MovieSummary> {
    pick_random_with(snapshot, &mut rand::thread_rng())
}

/// Uniform pick using the caller's RNG.
pub fn pick_random_with<R: Rng + ?Sized>(snapshot: &CatalogSnapshot, rng: &mut R) -> Result<MovieSummary> {
    if snapshot.is_empty() {
        return Err(CatalogError::EmptyCatalog);
    }
    let index = rng.gen_range(0..snapshot.len());
    snapshot.get_index(index).ok_or(CatalogError::EmptyCatalog)
}

pub fn stats(snapshot: &CatalogSnapshot) -> Result<CatalogStats> {
    Ok(CatalogStats {
        average: average_rating(snapshot)?,
        median: median_rating(snapshot)?,
        best: best_rated(snapshot),
        worst: worst_rated(snapshot),
    })
}
