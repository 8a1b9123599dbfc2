use std::collections::{BTreeMap, HashMap};

use crate::{
    error::{AppError, AppResult},
    models::{ItemId, Movie, MovieSummary, RatingEvent, RatingScale, Recommendation, UserVector},
    services::{
        catalog::{CatalogPage, CatalogView},
        fallback,
        popularity::{self, PopularityIndex},
        prediction,
        similarity::{FullSimilarityMatrix, TruncatedSimilarityMatrix},
    },
};

/// Tunables fixed at startup
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RecommenderSettings {
    /// Neighbors kept per similarity row
    pub similarity_top_n: usize,
    /// Length of a recommendation list
    pub recommendation_count: usize,
    /// Length of the top-K listing
    pub top_k: usize,
    pub rating_scale: RatingScale,
}

impl Default for RecommenderSettings {
    fn default() -> Self {
        Self {
            similarity_top_n: 30,
            recommendation_count: 10,
            top_k: 10,
            rating_scale: RatingScale::MOVIELENS,
        }
    }
}

/// Everything computed once at startup and shared, read-only, by all requests
#[derive(Debug, Clone)]
pub struct RecommenderContext {
    movies: HashMap<ItemId, Movie>,
    popularity: PopularityIndex,
    similarity: TruncatedSimilarityMatrix,
    settings: RecommenderSettings,
}

impl RecommenderContext {
    /// Aggregates popularity and truncates the similarity matrix
    pub fn build(
        ratings: &[RatingEvent],
        movies: Vec<Movie>,
        similarity: &FullSimilarityMatrix,
        settings: RecommenderSettings,
    ) -> Self {
        let movies: HashMap<ItemId, Movie> = movies.into_iter().map(|m| (m.id, m)).collect();

        let stats = popularity::aggregate(ratings, &movies, settings.rating_scale);
        let popularity = PopularityIndex::new(stats);

        let similarity = similarity.truncate(settings.similarity_top_n);

        tracing::info!(
            movies = movies.len(),
            ratings = ratings.len(),
            rated_movies = popularity.len(),
            similarity_items = similarity.len(),
            retained_neighbors = similarity.retained(),
            top_n = settings.similarity_top_n,
            "Recommender context built"
        );

        Self {
            movies,
            popularity,
            similarity,
            settings,
        }
    }

    pub fn settings(&self) -> &RecommenderSettings {
        &self.settings
    }

    pub fn popularity(&self) -> &PopularityIndex {
        &self.popularity
    }

    pub fn similarity(&self) -> &TruncatedSimilarityMatrix {
        &self.similarity
    }

    pub fn movie(&self, item_id: ItemId) -> Option<&Movie> {
        self.movies.get(&item_id)
    }

    pub fn catalog(&self) -> CatalogView<'_> {
        CatalogView::new(&self.popularity, &self.movies)
    }

    /// Turns client-submitted ratings into a user vector, dropping movies the
    /// similarity matrix does not cover
    pub fn user_vector(&self, submitted: &BTreeMap<String, f64>) -> AppResult<UserVector> {
        UserVector::from_submitted(submitted, |id| self.similarity.contains(id))
            .map_err(|err| AppError::InvalidInput(err.to_string()))
    }

    /// Personalized recommendations, topped up from the popularity ranking
    pub fn recommend(&self, user: &UserVector) -> Vec<Recommendation> {
        let limit = self.settings.recommendation_count;
        let predictions = prediction::predict(user, &self.similarity, limit);
        let predicted = predictions.len();

        let recommendations: Vec<Recommendation> =
            fallback::complete(predictions, &self.popularity, user, limit)
                .into_iter()
                .map(|p| {
                    let movie = self.movie(p.item_id);
                    Recommendation {
                        movie_id: p.item_id,
                        predicted_rating: p.predicted_rating,
                        title: movie.map(|m| m.title.clone()),
                        genres: movie.map(|m| m.genres.clone()).unwrap_or_default(),
                        poster_url: movie.and_then(|m| m.poster_url.clone()),
                    }
                })
                .collect();

        tracing::info!(
            rated = user.len(),
            predicted,
            returned = recommendations.len(),
            "Recommendations generated"
        );

        recommendations
    }

    /// The most popular movies
    pub fn top_k(&self) -> Vec<MovieSummary> {
        self.catalog().top_k(self.settings.top_k)
    }

    /// A page of the popularity-ordered catalog
    pub fn list_catalog(&self, page: usize, per_page: usize) -> AppResult<CatalogPage> {
        if page == 0 {
            return Err(AppError::InvalidInput("page must be at least 1".to_string()));
        }
        if per_page == 0 {
            return Err(AppError::InvalidInput(
                "per_page must be at least 1".to_string(),
            ));
        }
        Ok(self.catalog().page(page, per_page))
    }
}
