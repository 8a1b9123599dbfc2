use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};

use crate::models::{ItemId, ItemStats, Movie, RatingEvent, RatingScale};

#[derive(Default)]
struct Accumulator {
    count: usize,
    sum: f64,
}

/// Derives per-movie popularity statistics from raw rating events
///
/// Only movies present in `catalog` are kept, and movies without a single
/// rating get no record at all. Output is ordered by movie id.
pub fn aggregate(
    events: &[RatingEvent],
    catalog: &HashMap<ItemId, Movie>,
    scale: RatingScale,
) -> Vec<ItemStats> {
    let mut per_item: BTreeMap<ItemId, Accumulator> = BTreeMap::new();
    for event in events {
        let acc = per_item.entry(event.item_id).or_default();
        acc.count += 1;
        acc.sum += event.rating;
    }

    per_item
        .into_iter()
        .filter(|(item_id, _)| catalog.contains_key(item_id))
        .map(|(item_id, acc)| {
            let avg_rating = acc.sum / acc.count as f64;
            let normalized_rating = scale.normalize(avg_rating);
            ItemStats {
                item_id,
                num_ratings: acc.count,
                avg_rating,
                normalized_rating,
                popularity_score: acc.count as f64 * normalized_rating,
            }
        })
        .collect()
}

/// Orders stats by popularity score, highest first, then by ascending movie id
pub fn by_popularity(a: &ItemStats, b: &ItemStats) -> Ordering {
    b.popularity_score
        .total_cmp(&a.popularity_score)
        .then_with(|| a.item_id.cmp(&b.item_id))
}

/// Popularity statistics ranked once at startup
#[derive(Debug, Clone, Default)]
pub struct PopularityIndex {
    ranked: Vec<ItemStats>,
    positions: HashMap<ItemId, usize>,
}

impl PopularityIndex {
    pub fn new(mut stats: Vec<ItemStats>) -> Self {
        stats.sort_by(by_popularity);
        let positions = stats
            .iter()
            .enumerate()
            .map(|(pos, s)| (s.item_id, pos))
            .collect();

        Self {
            ranked: stats,
            positions,
        }
    }

    /// All stats, most popular first
    pub fn ranked(&self) -> &[ItemStats] {
        &self.ranked
    }

    pub fn get(&self, item_id: ItemId) -> Option<&ItemStats> {
        self.positions.get(&item_id).map(|&pos| &self.ranked[pos])
    }

    pub fn len(&self) -> usize {
        self.ranked.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ranked.is_empty()
    }
}
