use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use anyhow::Context;

use crate::config::Config;
use crate::services::similarity::MatrixShapeError;
use crate::services::{RecommenderContext, RecommenderSettings};

pub mod movielens;
pub mod posters;

pub use posters::PosterResolver;

pub const RATINGS_FILE: &str = "ratings.dat";
pub const MOVIES_FILE: &str = "movies.dat";
pub const SIMILARITY_FILE: &str = "s_matrix.csv";

/// Errors raised while reading the MovieLens data files
#[derive(thiserror::Error, Debug)]
pub enum DataError {
    #[error("{file}:{line}: {message}")]
    Parse {
        file: &'static str,
        line: usize,
        message: String,
    },

    #[error("failed to read {file}: {source}")]
    Read {
        file: &'static str,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed {file}: {source}")]
    Csv {
        file: &'static str,
        #[source]
        source: csv::Error,
    },

    #[error("similarity matrix does not match the rated movies: {0}")]
    Shape(#[from] MatrixShapeError),
}

fn open(dir: &Path, name: &str) -> anyhow::Result<BufReader<File>> {
    let path = dir.join(name);
    let file = File::open(&path).with_context(|| format!("Failed to open {}", path.display()))?;
    Ok(BufReader::new(file))
}

/// Loads the data files and builds the recommender context
///
/// Blocking; fails if any file is missing or malformed. The similarity
/// matrix is never recomputed here.
pub fn load_context(config: &Config) -> anyhow::Result<RecommenderContext> {
    let settings: RecommenderSettings = config.recommender_settings();
    let data_dir = config.data_dir.as_path();

    let similarity_path = data_dir.join(SIMILARITY_FILE);
    if !similarity_path.is_file() {
        anyhow::bail!(
            "{} not found. Precompute it before running the server.",
            similarity_path.display()
        );
    }

    let ratings = movielens::parse_ratings(open(data_dir, RATINGS_FILE)?, settings.rating_scale)?;
    tracing::info!(count = ratings.len(), "Loaded ratings");

    let posters = PosterResolver::new(&config.assets_dir);
    let movies: Vec<_> = movielens::parse_movies(open(data_dir, MOVIES_FILE)?)?
        .into_iter()
        .map(|movie| {
            let poster = posters.resolve(movie.id);
            movie.with_poster(poster)
        })
        .collect();
    tracing::info!(
        count = movies.len(),
        with_poster = movies.iter().filter(|m| m.poster_url.is_some()).count(),
        "Loaded movies"
    );

    let items = movielens::rated_items(&ratings);
    let similarity = movielens::parse_similarity(open(data_dir, SIMILARITY_FILE)?, items)
        .context("Failed to load similarity matrix")?;
    tracing::info!(items = similarity.len(), "Loaded similarity matrix");

    Ok(RecommenderContext::build(&ratings, movies, &similarity, settings))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn scratch_dir() -> PathBuf {
        let dir = std::env::temp_dir().join(format!("movie-recs-{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn config_for(dir: &Path) -> Config {
        envy::from_iter(vec![
            ("DATA_DIR".to_string(), dir.display().to_string()),
            ("ASSETS_DIR".to_string(), dir.join("assets").display().to_string()),
        ])
        .unwrap()
    }

    #[test]
    fn test_missing_similarity_is_fatal() {
        let dir = scratch_dir();
        std::fs::write(dir.join(RATINGS_FILE), "1::1::5::978300760\n").unwrap();
        std::fs::write(dir.join(MOVIES_FILE), "1::Toy Story (1995)::Comedy\n").unwrap();

        let err = load_context(&config_for(&dir)).unwrap_err();

        assert!(err.to_string().contains("s_matrix.csv not found"));
        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_load_context() {
        let dir = scratch_dir();
        std::fs::write(
            dir.join(RATINGS_FILE),
            "1::1::5::978300760\n1::2::3::978300761\n2::1::4::978300762\n",
        )
        .unwrap();
        std::fs::write(
            dir.join(MOVIES_FILE),
            "1::Toy Story (1995)::Animation|Comedy\n2::Jumanji (1995)::Adventure\n3::Heat (1995)::Action\n",
        )
        .unwrap();
        std::fs::write(dir.join(SIMILARITY_FILE), ",1,2\n1,,0.9\n2,0.9,\n").unwrap();
        std::fs::create_dir_all(dir.join("assets").join("images")).unwrap();
        std::fs::write(dir.join("assets").join("images").join("2.jpg"), b"jpeg").unwrap();

        let ctx = load_context(&config_for(&dir)).unwrap();

        assert_eq!(ctx.similarity().len(), 2);
        assert_eq!(ctx.popularity().len(), 2);
        assert_eq!(
            ctx.movie(crate::models::ItemId(2)).and_then(|m| m.poster_url.clone()),
            Some("/assets/images/2.jpg".to_string())
        );
        std::fs::remove_dir_all(&dir).unwrap();
    }
}
