use std::collections::HashSet;

use crate::models::{ItemId, UserVector};
use crate::services::popularity::PopularityIndex;
use crate::services::prediction::Prediction;

/// Tops up a prediction list with the most popular movies until it holds
/// `limit` entries
///
/// Filled-in entries carry no predicted rating. Movies the user rated and
/// movies already predicted are skipped. The list stays shorter than `limit`
/// only when the catalog runs out.
pub fn complete(
    mut predictions: Vec<Prediction>,
    popularity: &PopularityIndex,
    user: &UserVector,
    limit: usize,
) -> Vec<Prediction> {
    if predictions.len() >= limit {
        predictions.truncate(limit);
        return predictions;
    }

    let needed = limit - predictions.len();
    let chosen: HashSet<ItemId> = predictions.iter().map(|p| p.item_id).collect();

    let filler: Vec<Prediction> = popularity
        .ranked()
        .iter()
        .filter(|stats| !user.contains(stats.item_id) && !chosen.contains(&stats.item_id))
        .take(needed)
        .map(|stats| Prediction {
            item_id: stats.item_id,
            predicted_rating: None,
        })
        .collect();

    tracing::debug!(
        predicted = predictions.len(),
        filled = filler.len(),
        "Completed recommendations from popularity"
    );

    predictions.extend(filler);
    predictions
}
