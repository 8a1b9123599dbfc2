use std::sync::Arc;

use crate::services::RecommenderContext;

/// Shared application state
///
/// The recommender context is built before the server starts and never
/// changes, so handlers read it without locking.
#[derive(Clone)]
pub struct AppState {
    pub context: Arc<RecommenderContext>,
    /// Page size for catalog listings that do not ask for one
    pub default_per_page: usize,
}

impl AppState {
    pub fn new(context: RecommenderContext, default_per_page: usize) -> Self {
        Self {
            context: Arc::new(context),
            default_per_page,
        }
    }
}
