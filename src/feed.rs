//! Home feed composition.
//!
//! Three stages fill a fixed budget, each skipping anything already picked:
//! 1. artworks by followed users, random order
//! 2. tag-similarity recommendations from the user's likes
//! 3. uniform random fill from the rest of the catalog
//!
//! The requester's own artworks never appear.

use std::collections::HashSet;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{ensure_limit, Result};
use crate::model::{Artwork, ArtworkId, ArtworkSummary, UserId};
use crate::recommend::likes::recommend_from_matrix;
use crate::store::{ArtworkReader, FollowReader, LikeReader};
use crate::utils::sampler::Sampler;
use crate::vectorizer::TagMatrix;

/// Size budget of a home feed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedBudget {
    pub total: usize,
    pub following_slice: usize,
    pub tag_slice: usize,
}

impl Default for FeedBudget {
    fn default() -> Self {
        Self {
            total: 10,
            following_slice: 6,
            tag_slice: 4,
        }
    }
}

impl FeedBudget {
    /// `total` must be positive; a zero slice just skips that stage
    pub fn validate(&self) -> Result<()> {
        ensure_limit("feed total", self.total)
    }
}

/// Composed feed, items ordered following → tag-based → random fill
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct HomeFeed {
    pub items: Vec<ArtworkSummary>,
    pub following_count: usize,
    pub tag_count: usize,
    pub random_count: usize,
}

impl HomeFeed {
    pub fn ids(&self) -> Vec<ArtworkId> {
        self.items.iter().map(|item| item.id).collect()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Build the home feed of `user`.
///
/// Never longer than `budget.total`, never repeats an id. Shorter only when
/// the catalog cannot fill the budget.
pub fn compose_home_feed<S, R>(
    source: &S,
    user: UserId,
    budget: FeedBudget,
    sampler: &mut R,
) -> Result<HomeFeed>
where
    S: ArtworkReader + LikeReader + FollowReader + ?Sized,
    R: Sampler,
{
    budget.validate()?;

    let mut seen: HashSet<ArtworkId> = HashSet::new();
    let mut picked: Vec<Artwork> = Vec::with_capacity(budget.total);

    // 1. following slice
    let followed: Vec<UserId> = source
        .followed_users(user)?
        .into_iter()
        .filter(|&id| id != user)
        .collect();
    let following_take = budget.following_slice.min(budget.total);
    if following_take > 0 && !followed.is_empty() {
        let pool: Vec<Artwork> = source
            .list_artworks_by_owners(&followed)?
            .into_iter()
            .filter(|art| art.is_live() && art.owner_id != user)
            .collect();
        for art in sampler.sample_from(&pool, following_take) {
            if seen.insert(art.id) {
                picked.push(art);
            }
        }
    }
    let following_count = picked.len();

    let catalog: IndexMap<ArtworkId, Artwork> = source
        .list_artworks()?
        .into_iter()
        .map(|art| (art.id, art))
        .collect();

    // 2. tag slice
    let tag_take = budget.tag_slice.min(budget.total - picked.len());
    if tag_take > 0 {
        let liked = source.liked_artworks(user)?;
        if !liked.is_empty() {
            let matrix = TagMatrix::build(catalog.values());
            let pool_size = budget.tag_slice.saturating_mul(2);
            let candidates = recommend_from_matrix(&matrix, &liked, pool_size)?;
            for id in candidates {
                if picked.len() - following_count >= tag_take {
                    break;
                }
                match catalog.get(&id) {
                    Some(art) if art.owner_id != user && !seen.contains(&id) => {
                        seen.insert(id);
                        picked.push(art.clone());
                    }
                    _ => {}
                }
            }
        }
    }
    let tag_count = picked.len() - following_count;

    // 3. random fill
    let remaining = budget.total - picked.len();
    if remaining > 0 {
        let pool: Vec<&Artwork> = catalog
            .values()
            .filter(|art| art.owner_id != user && !seen.contains(&art.id))
            .collect();
        for art in sampler.sample_from(&pool, remaining) {
            seen.insert(art.id);
            picked.push(art.clone());
        }
    }
    let random_count = picked.len() - following_count - tag_count;

    let items = picked
        .iter()
        .map(|art| Ok(ArtworkSummary::from_artwork(art, source.like_count(art.id)?)))
        .collect::<Result<Vec<_>>>()?;

    debug!(
        user,
        following_count,
        tag_count,
        random_count,
        total = items.len(),
        "composed home feed"
    );
    Ok(HomeFeed {
        items,
        following_count,
        tag_count,
        random_count,
    })
}
