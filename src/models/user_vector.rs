use std::collections::BTreeMap;

use super::ItemId;

/// The same movie was submitted twice with different ratings
#[derive(Debug, thiserror::Error, PartialEq)]
#[error("conflicting ratings submitted for {item_id}")]
pub struct ConflictingRating {
    pub item_id: ItemId,
}

/// Known ratings of a single (anonymous) user
///
/// Items that are not present are unknown, which is not the same thing as
/// a rating of zero.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UserVector {
    ratings: BTreeMap<ItemId, f64>,
}

impl UserVector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a user vector from ratings submitted by a client
    ///
    /// Keys that are not valid movie ids, or that `is_known` rejects, are
    /// dropped without error. Two keys naming the same movie ("m1" and "1")
    /// must agree on the rating.
    pub fn from_submitted<F>(
        submitted: &BTreeMap<String, f64>,
        is_known: F,
    ) -> Result<Self, ConflictingRating>
    where
        F: Fn(ItemId) -> bool,
    {
        let mut vector = Self::new();
        for (key, &rating) in submitted {
            match key.parse::<ItemId>() {
                Ok(id) if is_known(id) => match vector.rating(id) {
                    Some(existing) if existing != rating => {
                        return Err(ConflictingRating { item_id: id });
                    }
                    _ => vector.rate(id, rating),
                },
                _ => tracing::debug!(item = %key, "Ignoring rating for unknown movie"),
            }
        }
        Ok(vector)
    }

    /// Records (or overwrites) a rating
    pub fn rate(&mut self, item_id: ItemId, rating: f64) {
        self.ratings.insert(item_id, rating);
    }

    pub fn rating(&self, item_id: ItemId) -> Option<f64> {
        self.ratings.get(&item_id).copied()
    }

    pub fn contains(&self, item_id: ItemId) -> bool {
        self.ratings.contains_key(&item_id)
    }

    pub fn len(&self) -> usize {
        self.ratings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ratings.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (ItemId, f64)> + '_ {
        self.ratings.iter().map(|(id, rating)| (*id, *rating))
    }
}

impl FromIterator<(ItemId, f64)> for UserVector {
    fn from_iter<T: IntoIterator<Item = (ItemId, f64)>>(iter: T) -> Self {
        Self {
            ratings: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_vector_is_empty() {
        let vector = UserVector::new();
        assert!(vector.is_empty());
        assert_eq!(vector.rating(ItemId(1)), None);
    }

    #[test]
    fn test_rate_overwrites() {
        let mut vector = UserVector::new();
        vector.rate(ItemId(1), 3.0);
        vector.rate(ItemId(1), 5.0);
        assert_eq!(vector.len(), 1);
        assert_eq!(vector.rating(ItemId(1)), Some(5.0));
    }

    #[test]
    fn test_from_submitted_drops_unknown_and_invalid_ids() {
        let submitted: BTreeMap<String, f64> = [
            ("m1".to_string(), 5.0),
            ("2".to_string(), 4.0),
            ("m999".to_string(), 3.0),
            ("not-a-movie".to_string(), 1.0),
        ]
        .into_iter()
        .collect();

        let vector = UserVector::from_submitted(&submitted, |id| id.0 < 100).unwrap();

        assert_eq!(vector.len(), 2);
        assert_eq!(vector.rating(ItemId(1)), Some(5.0));
        assert_eq!(vector.rating(ItemId(2)), Some(4.0));
        assert!(!vector.contains(ItemId(999)));
    }

    #[test]
    fn test_from_submitted_rejects_conflicting_forms() {
        let submitted: BTreeMap<String, f64> =
            [("m1".to_string(), 5.0), ("1".to_string(), 1.0)].into_iter().collect();

        let err = UserVector::from_submitted(&submitted, |_| true).unwrap_err();

        assert_eq!(err, ConflictingRating { item_id: ItemId(1) });
        assert_eq!(err.to_string(), "conflicting ratings submitted for m1");
    }

    #[test]
    fn test_from_submitted_accepts_agreeing_forms() {
        let submitted: BTreeMap<String, f64> =
            [("m1".to_string(), 4.0), ("1".to_string(), 4.0)].into_iter().collect();

        let vector = UserVector::from_submitted(&submitted, |_| true).unwrap();

        assert_eq!(vector.len(), 1);
        assert_eq!(vector.rating(ItemId(1)), Some(4.0));
    }

    #[test]
    fn test_zero_rating_is_known() {
        let vector: UserVector = [(ItemId(7), 0.0)].into_iter().collect();
        assert!(vector.contains(ItemId(7)));
        assert_eq!(vector.rating(ItemId(7)), Some(0.0));
    }
}
