use std::path::Path;

use indexmap::{IndexMap, IndexSet};
use serde::Deserialize;

use crate::error::{RecommendError, Result};
use crate::model::{Artwork, ArtworkId, Review, UserId};
use crate::store::{ArtworkReader, FollowReader, LikeReader, ReviewReader};

/// Owned catalog snapshot implementing every reader trait.
///
/// Used by the demo binary and the tests; an API layer would implement the
/// traits over its own database instead.
///
/// # Snapshot format
/// ```json
/// {
///   "artworks": [{"id": 1, "owner_id": 7, "title": "Sunset Bay",
///                 "category": "painting", "tags": "ocean, blue"}],
///   "likes":    [[2, 1]],
///   "follows":  [[2, 7]],
///   "reviews":  [{"reviewer_id": 2, "artist_id": 7, "rating": 5}],
///   "sellers":  [7]
/// }
/// ```
/// `likes` are `(user, artwork)` pairs and `follows` are `(follower, followed)`.
/// When `sellers` is absent it is derived from artwork owners and reviewed artists.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    artworks: IndexMap<ArtworkId, Artwork>,
    likes: IndexSet<(UserId, ArtworkId)>,
    follows: IndexSet<(UserId, UserId)>,
    reviews: Vec<Review>,
    sellers: IndexSet<UserId>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Snapshot {
    artworks: Vec<Artwork>,
    likes: Vec<(UserId, ArtworkId)>,
    follows: Vec<(UserId, UserId)>,
    reviews: Vec<Review>,
    sellers: Option<Vec<UserId>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        let snapshot: Snapshot = serde_json::from_str(json)?;
        let mut store = MemoryStore::new();
        for art in snapshot.artworks {
            store.add_artwork(art);
        }
        for (user, artwork) in snapshot.likes {
            store.add_like(user, artwork);
        }
        for (follower, followed) in snapshot.follows {
            store.add_follow(follower, followed);
        }
        for review in snapshot.reviews {
            store.add_review(review);
        }
        if let Some(sellers) = snapshot.sellers {
            store.sellers = sellers.into_iter().collect();
        }
        Ok(store)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path.as_ref()).map_err(RecommendError::store)?;
        Self::from_json_str(&json)
    }

    /// Insert or replace an artwork; its owner becomes a seller
    pub fn add_artwork(&mut self, artwork: Artwork) -> &mut Self {
        self.sellers.insert(artwork.owner_id);
        self.artworks.insert(artwork.id, artwork);
        self
    }

    /// Mark an artwork soft-deleted. Returns false when the id is unknown.
    pub fn soft_delete(&mut self, id: ArtworkId) -> bool {
        match self.artworks.get_mut(&id) {
            Some(art) => {
                art.deleted = true;
                true
            }
            None => false,
        }
    }

    pub fn add_like(&mut self, user: UserId, artwork: ArtworkId) -> &mut Self {
        self.likes.insert((user, artwork));
        self
    }

    pub fn add_follow(&mut self, follower: UserId, followed: UserId) -> &mut Self {
        self.follows.insert((follower, followed));
        self
    }

    /// Add a review; the reviewed artist becomes a seller
    pub fn add_review(&mut self, review: Review) -> &mut Self {
        self.sellers.insert(review.artist_id);
        self.reviews.push(review);
        self
    }

    pub fn add_seller(&mut self, seller: UserId) -> &mut Self {
        self.sellers.insert(seller);
        self
    }
}

impl ArtworkReader for MemoryStore {
    fn list_artworks(&self) -> Result<Vec<Artwork>> {
        Ok(self.artworks.values().filter(|art| art.is_live()).cloned().collect())
    }

    fn get_artwork(&self, id: ArtworkId) -> Result<Option<Artwork>> {
        Ok(self.artworks.get(&id).cloned())
    }

    fn list_artworks_by_owners(&self, owners: &[UserId]) -> Result<Vec<Artwork>> {
        Ok(self
            .artworks
            .values()
            .filter(|art| art.is_live() && owners.contains(&art.owner_id))
            .cloned()
            .collect())
    }
}

impl LikeReader for MemoryStore {
    fn liked_artworks(&self, user: UserId) -> Result<Vec<ArtworkId>> {
        Ok(self
            .likes
            .iter()
            .filter(|(u, _)| *u == user)
            .map(|&(_, artwork)| artwork)
            .collect())
    }

    fn like_count(&self, artwork: ArtworkId) -> Result<u64> {
        Ok(self.likes.iter().filter(|(_, a)| *a == artwork).count() as u64)
    }
}

impl FollowReader for MemoryStore {
    fn followed_users(&self, user: UserId) -> Result<Vec<UserId>> {
        Ok(self
            .follows
            .iter()
            .filter(|(follower, _)| *follower == user)
            .map(|&(_, followed)| followed)
            .collect())
    }
}

impl ReviewReader for MemoryStore {
    fn all_reviews(&self) -> Result<Vec<Review>> {
        Ok(self.reviews.clone())
    }

    fn list_sellers(&self) -> Result<Vec<UserId>> {
        Ok(self.sellers.iter().copied().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SNAPSHOT: &str = r#"{
        "artworks": [
            {"id": 1, "owner_id": 7, "title": "Sunset Bay", "category": "painting",
             "tags": "ocean, blue"},
            {"id": 2, "owner_id": 8, "title": "Bay View", "category": "Painting",
             "tags": ["harbor"]},
            {"id": 3, "owner_id": 8, "title": "Old", "category": "sketch", "tags": [],
             "deleted": true}
        ],
        "likes": [[2, 1], [3, 1], [2, 1]],
        "follows": [[2, 7]],
        "reviews": [{"reviewer_id": 2, "artist_id": 9, "rating": 4}]
    }"#;

    #[test]
    fn loads_snapshot_and_derives_sellers() {
        let store = MemoryStore::from_json_str(SNAPSHOT).unwrap();
        let live: Vec<ArtworkId> = store.list_artworks().unwrap().iter().map(|a| a.id).collect();
        assert_eq!(live, vec![1, 2]);
        assert!(store.get_artwork(3).unwrap().unwrap().deleted);
        assert_eq!(store.list_sellers().unwrap(), vec![7, 8, 9]);
    }

    #[test]
    fn duplicate_likes_count_once() {
        let store = MemoryStore::from_json_str(SNAPSHOT).unwrap();
        assert_eq!(store.like_count(1).unwrap(), 2);
        assert_eq!(store.liked_artworks(2).unwrap(), vec![1]);
    }

    #[test]
    fn owner_listing_skips_deleted() {
        let store = MemoryStore::from_json_str(SNAPSHOT).unwrap();
        let by_8: Vec<ArtworkId> =
            store.list_artworks_by_owners(&[8]).unwrap().iter().map(|a| a.id).collect();
        assert_eq!(by_8, vec![2]);
        assert_eq!(store.followed_users(2).unwrap(), vec![7]);
    }

    #[test]
    fn explicit_sellers_override_derivation() {
        let store = MemoryStore::from_json_str(r#"{"sellers": [5, 4]}"#).unwrap();
        assert_eq!(store.list_sellers().unwrap(), vec![5, 4]);
    }

    #[test]
    fn bad_json_is_a_config_error() {
        let err = MemoryStore::from_json_str("{not json").unwrap_err();
        assert!(matches!(err, RecommendError::Config(_)));
    }

    #[test]
    fn soft_delete_hides_artwork() {
        let mut store = MemoryStore::from_json_str(SNAPSHOT).unwrap();
        assert!(store.soft_delete(1));
        assert!(!store.soft_delete(42));
        assert_eq!(store.list_artworks().unwrap().len(), 1);
    }
}
