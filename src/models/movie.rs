use serde::Serialize;

use super::ItemId;

/// Movie metadata from `movies.dat`
#[derive(Debug, Clone, PartialEq)]
pub struct Movie {
    pub id: ItemId,
    pub title: String,
    pub genres: Vec<String>,
    /// Relative URL of the poster image, when one exists in the assets directory
    pub poster_url: Option<String>,
}

impl Movie {
    pub fn new(id: ItemId, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            genres: Vec::new(),
            poster_url: None,
        }
    }

    pub fn with_genres(mut self, genres: Vec<String>) -> Self {
        self.genres = genres;
        self
    }

    pub fn with_poster(mut self, poster_url: Option<String>) -> Self {
        self.poster_url = poster_url;
        self
    }
}

/// A movie as listed by the popularity endpoints
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MovieSummary {
    pub movie_id: ItemId,
    pub title: String,
    pub genres: Vec<String>,
    pub poster_url: Option<String>,
    pub popularity_score: f64,
}

/// A single entry of a recommendation list returned to the client
///
/// `predicted_rating` is `None` for entries filled in from the popularity
/// ranking rather than predicted from the user's ratings.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recommendation {
    pub movie_id: ItemId,
    pub predicted_rating: Option<f64>,
    pub title: Option<String>,
    pub genres: Vec<String>,
    pub poster_url: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recommendation_serializes_missing_prediction_as_null() {
        let rec = Recommendation {
            movie_id: ItemId(260),
            predicted_rating: None,
            title: Some("Star Wars: Episode IV - A New Hope (1977)".to_string()),
            genres: vec!["Action".to_string(), "Sci-Fi".to_string()],
            poster_url: None,
        };

        let json = serde_json::to_value(&rec).unwrap();
        assert_eq!(json["movie_id"], "m260");
        assert!(json["predicted_rating"].is_null());
        assert!(json["poster_url"].is_null());
        assert_eq!(json["genres"], serde_json::json!(["Action", "Sci-Fi"]));
    }

    #[test]
    fn test_movie_builder() {
        let movie = Movie::new(ItemId(1), "Toy Story (1995)")
            .with_genres(vec!["Animation".to_string(), "Comedy".to_string()])
            .with_poster(Some("/assets/images/1.jpg".to_string()));

        assert_eq!(movie.genres.len(), 2);
        assert_eq!(movie.poster_url.as_deref(), Some("/assets/images/1.jpg"));
    }
}
