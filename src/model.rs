use serde::{Deserialize, Serialize};

use crate::vectorizer::tag::normalize_tags;

pub type ArtworkId = u64;
pub type UserId = u64;

/// Tags as they come out of the catalog.
/// Older rows store a comma joined string, newer ones a list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawTags {
    List(Vec<String>),
    Joined(String),
}

impl Default for RawTags {
    fn default() -> Self {
        RawTags::List(Vec::new())
    }
}

impl RawTags {
    /// Trimmed, lowercase, non-empty tokens in their original order.
    /// Duplicates are kept; they count towards term frequency.
    pub fn tokens(&self) -> Vec<String> {
        match self {
            RawTags::List(list) => normalize_tags(list.iter().map(String::as_str)),
            RawTags::Joined(joined) => normalize_tags(joined.split(',')),
        }
    }
}

impl From<Vec<String>> for RawTags {
    fn from(list: Vec<String>) -> Self {
        RawTags::List(list)
    }
}

impl From<&str> for RawTags {
    fn from(joined: &str) -> Self {
        RawTags::Joined(joined.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Artwork {
    pub id: ArtworkId,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub tags: RawTags,
    pub owner_id: UserId,
    /// soft-deleted artworks never take part in any computation
    #[serde(default)]
    pub deleted: bool,
}

impl Artwork {
    pub fn new(
        id: ArtworkId,
        owner_id: UserId,
        title: &str,
        category: &str,
        tags: impl Into<RawTags>,
    ) -> Self {
        Self {
            id,
            title: title.to_string(),
            category: category.to_string(),
            tags: tags.into(),
            owner_id,
            deleted: false,
        }
    }

    pub fn is_live(&self) -> bool {
        !self.deleted
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Review {
    pub reviewer_id: UserId,
    pub artist_id: UserId,
    /// 1..=5
    pub rating: u8,
    #[serde(default)]
    pub comment: String,
}

impl Review {
    pub const MIN_RATING: u8 = 1;
    pub const MAX_RATING: u8 = 5;

    #[inline]
    pub fn rating_in_range(rating: u8) -> bool {
        (Self::MIN_RATING..=Self::MAX_RATING).contains(&rating)
    }
}

/// Feed entry handed back to the API layer.
/// `like_count` is computed at response time and never stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArtworkSummary {
    pub id: ArtworkId,
    pub title: String,
    pub category: String,
    pub tags: Vec<String>,
    pub owner_id: UserId,
    pub like_count: u64,
}

impl ArtworkSummary {
    pub fn from_artwork(artwork: &Artwork, like_count: u64) -> Self {
        Self {
            id: artwork.id,
            title: artwork.title.clone(),
            category: artwork.category.clone(),
            tags: artwork.tags.tokens(),
            owner_id: artwork.owner_id,
            like_count,
        }
    }
}
