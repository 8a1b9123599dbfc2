use std::cmp::Ordering;

use crate::models::{ItemId, UserVector};
use crate::services::similarity::{Neighbor, TruncatedSimilarityMatrix};

/// A candidate movie and its predicted rating
///
/// `predicted_rating` is `None` when the user's ratings say nothing about the
/// movie (or when the movie was filled in from the popularity ranking).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Prediction {
    pub item_id: ItemId,
    pub predicted_rating: Option<f64>,
}

/// Similarity-weighted average of the user's ratings over a row's retained
/// neighbors
///
/// Returns `None` if no retained neighbor was rated or the weights do not sum
/// to a positive value.
pub fn weighted_rating(neighbors: &[Neighbor], known: &[Option<f64>]) -> Option<f64> {
    let (numerator, denominator) = neighbors
        .iter()
        .filter_map(|n| known[n.column].map(|rating| (n.similarity, rating)))
        .fold((0.0, 0.0), |(num, den), (sim, rating)| {
            (num + sim * rating, den + sim)
        });

    (denominator > 0.0).then(|| numerator / denominator)
}

/// Highest predicted rating first, then ascending movie id
fn by_prediction(a: &Prediction, b: &Prediction) -> Ordering {
    let a_score = a.predicted_rating.unwrap_or(f64::NEG_INFINITY);
    let b_score = b.predicted_rating.unwrap_or(f64::NEG_INFINITY);
    b_score
        .total_cmp(&a_score)
        .then_with(|| a.item_id.cmp(&b.item_id))
}

/// Predicts ratings for every movie the user has not rated and returns the
/// best `limit` of them
///
/// Movies without a prediction are left out; the result may be shorter than
/// `limit` (and is empty for an empty user vector).
pub fn predict(
    user: &UserVector,
    similarity: &TruncatedSimilarityMatrix,
    limit: usize,
) -> Vec<Prediction> {
    let mut known = vec![None; similarity.len()];
    for (item_id, rating) in user.iter() {
        if let Some(pos) = similarity.position(item_id) {
            known[pos] = Some(rating);
        }
    }

    let mut predictions: Vec<Prediction> = similarity
        .items()
        .iter()
        .enumerate()
        .filter(|(row, _)| known[*row].is_none())
        .filter_map(|(row, &item_id)| {
            weighted_rating(similarity.neighbors(row), &known).map(|score| Prediction {
                item_id,
                predicted_rating: Some(score),
            })
        })
        .collect();

    tracing::debug!(
        rated = user.len(),
        scored = predictions.len(),
        "Computed item-based predictions"
    );

    predictions.sort_by(by_prediction);
    predictions.truncate(limit);
    predictions
}

#[cfg(test)]
mod tests {
    use super::*;

    fn n(column: usize, similarity: f64) -> Neighbor {
        Neighbor { column, similarity }
    }

    /// m1..m4 where m3 keeps {m1: 0.8, m2: 0.5} and m4 keeps {m1: 0.2}
    fn scenario_matrix() -> TruncatedSimilarityMatrix {
        TruncatedSimilarityMatrix::from_rows(
            (1..=4).map(ItemId).collect(),
            vec![
                vec![n(0, 1.0), n(2, 0.8)],
                vec![n(1, 1.0), n(2, 0.5)],
                vec![n(0, 0.8), n(1, 0.5)],
                vec![n(0, 0.2)],
            ],
        )
    }

    #[test]
    fn test_weighted_rating() {
        let known = vec![Some(5.0), Some(3.0), None];
        let score = weighted_rating(&[n(0, 0.8), n(1, 0.5), n(2, 0.9)], &known).unwrap();
        assert!((score - 5.5 / 1.3).abs() < 1e-12);
    }

    #[test]
    fn test_weighted_rating_without_overlap_is_none() {
        let known = vec![None, None, Some(4.0)];
        assert_eq!(weighted_rating(&[n(0, 0.8), n(1, 0.5)], &known), None);
        assert_eq!(weighted_rating(&[], &known), None);
    }

    #[test]
    fn test_weighted_rating_non_positive_weights_is_none() {
        let known = vec![Some(4.0), Some(2.0)];
        assert_eq!(weighted_rating(&[n(0, 0.0)], &known), None);
        assert_eq!(weighted_rating(&[n(0, 0.3), n(1, -0.5)], &known), None);
    }

    #[test]
    fn test_predict_scenario() {
        let user: UserVector = [(ItemId(1), 5.0), (ItemId(2), 3.0)].into_iter().collect();

        let predictions = predict(&user, &scenario_matrix(), 10);

        assert_eq!(predictions.len(), 2);
        assert_eq!(predictions[0].item_id, ItemId(4));
        assert_eq!(predictions[0].predicted_rating, Some(5.0));
        assert_eq!(predictions[1].item_id, ItemId(3));
        let m3 = predictions[1].predicted_rating.unwrap();
        assert!((m3 - 4.2307692).abs() < 1e-6);
    }

    #[test]
    fn test_predict_never_returns_rated_items() {
        // m1 is strongly similar to itself and to m3, but it is rated
        let user: UserVector = [(ItemId(1), 5.0), (ItemId(3), 4.0)].into_iter().collect();

        let predictions = predict(&user, &scenario_matrix(), 10);

        assert!(predictions.iter().all(|p| !user.contains(p.item_id)));
        let ids: Vec<ItemId> = predictions.iter().map(|p| p.item_id).collect();
        assert_eq!(ids, vec![ItemId(4), ItemId(2)]);
    }

    #[test]
    fn test_diagonal_does_not_score_own_item() {
        // m2's row keeps its own diagonal; m2 is unrated, so only m1 counts
        let matrix = TruncatedSimilarityMatrix::from_rows(
            vec![ItemId(1), ItemId(2)],
            vec![vec![n(0, 1.0)], vec![n(0, 0.3), n(1, 1.0)]],
        );
        let user: UserVector = [(ItemId(1), 2.0)].into_iter().collect();

        let predictions = predict(&user, &matrix, 10);

        assert_eq!(
            predictions,
            vec![Prediction {
                item_id: ItemId(2),
                predicted_rating: Some(2.0)
            }]
        );
    }

    #[test]
    fn test_predict_empty_user_has_no_predictions() {
        assert!(predict(&UserVector::new(), &scenario_matrix(), 10).is_empty());
    }

    #[test]
    fn test_predict_respects_limit_and_breaks_ties_by_id() {
        let items: Vec<ItemId> = (1..=6).map(ItemId).collect();
        let rows = vec![
            vec![n(0, 1.0)],
            vec![n(0, 0.4)],
            vec![n(0, 0.9)],
            vec![n(0, 0.1)],
            vec![n(0, 0.7)],
            vec![],
        ];
        let matrix = TruncatedSimilarityMatrix::from_rows(items, rows);
        let user: UserVector = [(ItemId(1), 4.0)].into_iter().collect();

        let predictions = predict(&user, &matrix, 3);

        // Every scored movie predicts 4.0, so the order is by id
        let ids: Vec<ItemId> = predictions.iter().map(|p| p.item_id).collect();
        assert_eq!(ids, vec![ItemId(2), ItemId(3), ItemId(4)]);
        assert!(predictions.iter().all(|p| p.predicted_rating == Some(4.0)));
    }

    #[test]
    fn test_predict_is_deterministic() {
        let user: UserVector = [(ItemId(2), 2.0)].into_iter().collect();
        let matrix = scenario_matrix();

        assert_eq!(predict(&user, &matrix, 10), predict(&user, &matrix, 10));
    }
}
