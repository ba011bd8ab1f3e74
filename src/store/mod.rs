//! Data-access seams.
//!
//! The recommender never owns data; it reads a snapshot through these traits
//! on every call. Implementations report failures as
//! [`RecommendError::Store`](crate::error::RecommendError::Store), which the
//! operations propagate unchanged.

pub mod memory;

use crate::error::Result;
use crate::model::{Artwork, ArtworkId, Review, UserId};

pub trait ArtworkReader {
    /// Every non-deleted artwork, in the store's stable catalog order
    fn list_artworks(&self) -> Result<Vec<Artwork>>;

    /// One artwork by id, soft-deleted rows included
    fn get_artwork(&self, id: ArtworkId) -> Result<Option<Artwork>>;

    /// Non-deleted artworks owned by any of `owners`
    fn list_artworks_by_owners(&self, owners: &[UserId]) -> Result<Vec<Artwork>> {
        Ok(self
            .list_artworks()?
            .into_iter()
            .filter(|art| owners.contains(&art.owner_id))
            .collect())
    }
}

pub trait LikeReader {
    /// Artwork ids liked by `user`
    fn liked_artworks(&self, user: UserId) -> Result<Vec<ArtworkId>>;

    fn like_count(&self, artwork: ArtworkId) -> Result<u64>;
}

pub trait FollowReader {
    /// Users that `user` follows
    fn followed_users(&self, user: UserId) -> Result<Vec<UserId>>;
}

pub trait ReviewReader {
    fn all_reviews(&self) -> Result<Vec<Review>>;

    /// Every seller in the system, reviewed or not
    fn list_sellers(&self) -> Result<Vec<UserId>>;
}

/// Everything the recommender reads
pub trait DataSource: ArtworkReader + LikeReader + FollowReader + ReviewReader {}

impl<T> DataSource for T where T: ArtworkReader + LikeReader + FollowReader + ReviewReader {}

impl<T: ArtworkReader + ?Sized> ArtworkReader for &T {
    fn list_artworks(&self) -> Result<Vec<Artwork>> {
        (**self).list_artworks()
    }

    fn get_artwork(&self, id: ArtworkId) -> Result<Option<Artwork>> {
        (**self).get_artwork(id)
    }

    fn list_artworks_by_owners(&self, owners: &[UserId]) -> Result<Vec<Artwork>> {
        (**self).list_artworks_by_owners(owners)
    }
}

impl<T: LikeReader + ?Sized> LikeReader for &T {
    fn liked_artworks(&self, user: UserId) -> Result<Vec<ArtworkId>> {
        (**self).liked_artworks(user)
    }

    fn like_count(&self, artwork: ArtworkId) -> Result<u64> {
        (**self).like_count(artwork)
    }
}

impl<T: FollowReader + ?Sized> FollowReader for &T {
    fn followed_users(&self, user: UserId) -> Result<Vec<UserId>> {
        (**self).followed_users(user)
    }
}

impl<T: ReviewReader + ?Sized> ReviewReader for &T {
    fn all_reviews(&self) -> Result<Vec<Review>> {
        (**self).all_reviews()
    }

    fn list_sellers(&self) -> Result<Vec<UserId>> {
        (**self).list_sellers()
    }
}
