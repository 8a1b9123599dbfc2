use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::{fmt::Display, str::FromStr};

pub mod movie;
pub mod rating;
pub mod user_vector;

pub use movie::{Movie, MovieSummary, Recommendation};
pub use rating::{ItemStats, RatingEvent, RatingScale};
pub use user_vector::{ConflictingRating, UserVector};

/// Identifier for a movie, as found in the MovieLens data files
///
/// Rendered as `m{id}` on the wire (e.g., "m1613"), which is the form
/// the frontend submits ratings in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ItemId(pub u32);

impl Display for ItemId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "m{}", self.0)
    }
}

#[derive(Debug, thiserror::Error)]
#[error("invalid movie id: {0:?}")]
pub struct ParseItemIdError(String);

impl FromStr for ItemId {
    type Err = ParseItemIdError;

    /// Accepts both the prefixed ("m1613") and the bare ("1613") form
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let digits = trimmed.strip_prefix('m').unwrap_or(trimmed);
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(ParseItemIdError(s.to_string()));
        }
        digits
            .parse::<u32>()
            .map(ItemId)
            .map_err(|_| ParseItemIdError(s.to_string()))
    }
}

impl Serialize for ItemId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ItemId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Number(u32),
            Text(String),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Number(n) => Ok(ItemId(n)),
            Raw::Text(s) => s.parse().map_err(serde::de::Error::custom),
        }
    }
}
