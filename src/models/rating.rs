use chrono::{DateTime, Utc};
use serde::Serialize;

use super::ItemId;

/// A single rating from the MovieLens ratings file
#[derive(Debug, Clone, PartialEq)]
pub struct RatingEvent {
    pub user_id: u32,
    pub item_id: ItemId,
    pub rating: f64,
    pub timestamp: DateTime<Utc>,
}

/// Closed interval of valid rating values
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RatingScale {
    pub min: f64,
    pub max: f64,
}

impl RatingScale {
    /// MovieLens 1M uses whole stars from 1 to 5
    pub const MOVIELENS: RatingScale = RatingScale { min: 1.0, max: 5.0 };

    /// Rescales a rating into [0, 1]
    pub fn normalize(&self, rating: f64) -> f64 {
        (rating - self.min) / (self.max - self.min)
    }

    pub fn contains(&self, rating: f64) -> bool {
        rating >= self.min && rating <= self.max
    }
}

impl Default for RatingScale {
    fn default() -> Self {
        Self::MOVIELENS
    }
}

/// Popularity statistics for one movie with at least one rating
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ItemStats {
    pub item_id: ItemId,
    pub num_ratings: usize,
    pub avg_rating: f64,
    /// Mean rating rescaled into [0, 1]
    pub normalized_rating: f64,
    /// `num_ratings * normalized_rating`
    pub popularity_score: f64,
}
