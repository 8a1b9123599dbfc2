use std::collections::HashMap;

use serde::Serialize;

use crate::models::{ItemId, Movie, MovieSummary};
use crate::services::popularity::PopularityIndex;

/// One page of the popularity-ordered movie listing
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CatalogPage {
    pub items: Vec<MovieSummary>,
    pub page: usize,
    pub total_pages: usize,
    pub total_items: usize,
}

/// Read-only browsing over the popularity ranking
pub struct CatalogView<'a> {
    popularity: &'a PopularityIndex,
    movies: &'a HashMap<ItemId, Movie>,
}

impl<'a> CatalogView<'a> {
    pub fn new(popularity: &'a PopularityIndex, movies: &'a HashMap<ItemId, Movie>) -> Self {
        Self { popularity, movies }
    }

    /// The `k` most popular movies
    pub fn top_k(&self, k: usize) -> Vec<MovieSummary> {
        self.summarize(0, k)
    }

    /// Page `page` (1-based) of `per_page` movies
    ///
    /// Pages past the end come back empty. `per_page` must be non-zero.
    pub fn page(&self, page: usize, per_page: usize) -> CatalogPage {
        let total_items = self.popularity.len();
        let start = page.saturating_sub(1).saturating_mul(per_page);

        CatalogPage {
            items: self.summarize(start, per_page),
            page,
            total_pages: total_items.div_ceil(per_page),
            total_items,
        }
    }

    fn summarize(&self, start: usize, count: usize) -> Vec<MovieSummary> {
        self.popularity
            .ranked()
            .iter()
            .skip(start)
            .take(count)
            .map(|stats| {
                let movie = self.movies.get(&stats.item_id);
                MovieSummary {
                    movie_id: stats.item_id,
                    title: movie.map(|m| m.title.clone()).unwrap_or_default(),
                    genres: movie.map(|m| m.genres.clone()).unwrap_or_default(),
                    poster_url: movie.and_then(|m| m.poster_url.clone()),
                    popularity_score: stats.popularity_score,
                }
            })
            .collect()
    }
}
