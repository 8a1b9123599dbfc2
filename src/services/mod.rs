pub mod catalog;
pub mod fallback;
pub mod popularity;
pub mod prediction;
pub mod recommendations;
pub mod similarity;

pub use recommendations::{RecommenderContext, RecommenderSettings};
