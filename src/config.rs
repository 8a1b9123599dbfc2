use std::path::PathBuf;

use serde::Deserialize;

use crate::services::RecommenderSettings;

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Directory holding ratings.dat, movies.dat and s_matrix.csv
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Directory whose images/ subdirectory holds poster files
    #[serde(default = "default_assets_dir")]
    pub assets_dir: PathBuf,

    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Neighbors kept per row of the similarity matrix
    #[serde(default = "default_similarity_top_n")]
    pub similarity_top_n: usize,

    /// Number of movies in a recommendation list
    #[serde(default = "default_list_len")]
    pub recommendation_count: usize,

    /// Number of movies in the top listing
    #[serde(default = "default_list_len")]
    pub top_k: usize,

    /// Page size used when the client does not pass one
    #[serde(default = "default_per_page")]
    pub default_per_page: usize,
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("data")
}

fn default_assets_dir() -> PathBuf {
    PathBuf::from("assets")
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8008
}

fn default_similarity_top_n() -> usize {
    30
}

fn default_list_len() -> usize {
    10
}

fn default_per_page() -> usize {
    24
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        let config = envy::from_env::<Config>()
            .map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;
        config.validate()?;
        Ok(config)
    }

    /// Rejects counts that would leave the service with empty results
    pub fn validate(&self) -> anyhow::Result<()> {
        let counts = [
            ("SIMILARITY_TOP_N", self.similarity_top_n),
            ("RECOMMENDATION_COUNT", self.recommendation_count),
            ("TOP_K", self.top_k),
            ("DEFAULT_PER_PAGE", self.default_per_page),
        ];
        for (name, value) in counts {
            if value == 0 {
                anyhow::bail!("Invalid config: {name} must be at least 1");
            }
        }
        Ok(())
    }

    pub fn recommender_settings(&self) -> RecommenderSettings {
        RecommenderSettings {
            similarity_top_n: self.similarity_top_n,
            recommendation_count: self.recommendation_count,
            top_k: self.top_k,
            ..RecommenderSettings::default()
        }
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
