use tracing::instrument;

use crate::config::RecommendConfig;
use crate::error::Result;
use crate::feed::{compose_home_feed, FeedBudget};
use crate::model::{ArtworkId, ArtworkSummary, UserId};
use crate::recommend::{likes, similar};
use crate::reputation::{self, RankedArtist, RatingInfo};
use crate::store::DataSource;
use crate::utils::sampler::Sampler;

/// Entry point for the API layer.
///
/// Holds a data source and a validated config; no other state. Every call
/// reads a fresh snapshot, so one `Recommender` can serve concurrent requests
/// when `S: Sync`.
///
/// Methods without a `_with` suffix draw randomness from `rand::thread_rng()`.
/// Pass a seeded RNG to the `_with` variants for reproducible output.
#[derive(Debug, Clone)]
pub struct Recommender<S> {
    source: S,
    config: RecommendConfig,
}

impl<S> Recommender<S>
where
    S: DataSource,
{
    pub fn new(source: S) -> Self {
        Self {
            source,
            config: RecommendConfig::default(),
        }
    }

    pub fn with_config(source: S, config: RecommendConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { source, config })
    }

    pub fn config(&self) -> &RecommendConfig {
        &self.config
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Artworks whose tags resemble what `user` liked
    #[instrument(level = "debug", skip(self))]
    pub fn recommend_by_likes(&self, user: UserId, limit: usize) -> Result<Vec<ArtworkId>> {
        likes::recommend_by_likes(&self.source, user, limit)
    }

    /// [`Self::recommend_by_likes`] with the configured default limit
    pub fn recommend_by_likes_default(&self, user: UserId) -> Result<Vec<ArtworkId>> {
        self.recommend_by_likes(user, self.config.likes.default_limit)
    }

    pub fn recommend_similar(&self, artwork: ArtworkId, limit: usize) -> Result<Vec<ArtworkId>> {
        self.recommend_similar_with(artwork, limit, &mut rand::thread_rng())
    }

    /// [`Self::recommend_similar`] with the configured default limit
    pub fn recommend_similar_default(&self, artwork: ArtworkId) -> Result<Vec<ArtworkId>> {
        self.recommend_similar(artwork, self.config.similar.default_limit)
    }

    #[instrument(level = "debug", skip(self, sampler))]
    pub fn recommend_similar_with<R: Sampler>(
        &self,
        artwork: ArtworkId,
        limit: usize,
        sampler: &mut R,
    ) -> Result<Vec<ArtworkId>> {
        similar::recommend_similar(&self.source, artwork, limit, sampler)
    }

    /// Rating info with the configured smoothing constant
    pub fn artist_rating_info(&self, artist: UserId) -> Result<RatingInfo> {
        self.get_artist_rating_info(artist, self.config.reputation.smoothing)
    }

    #[instrument(level = "debug", skip(self))]
    pub fn get_artist_rating_info(&self, artist: UserId, m: f64) -> Result<RatingInfo> {
        reputation::get_artist_rating_info(&self.source, artist, m)
    }

    pub fn artist_leaderboard(&self) -> Result<Vec<RankedArtist>> {
        reputation::rank_artists(&self.source, self.config.reputation.smoothing)
    }

    /// Home feed with the configured budget
    pub fn home_feed(&self, user: UserId) -> Result<Vec<ArtworkSummary>> {
        self.get_home_feed(user, self.config.feed)
    }

    pub fn get_home_feed(&self, user: UserId, budget: FeedBudget) -> Result<Vec<ArtworkSummary>> {
        self.get_home_feed_with(user, budget, &mut rand::thread_rng())
    }

    #[instrument(level = "debug", skip(self, sampler))]
    pub fn get_home_feed_with<R: Sampler>(
        &self,
        user: UserId,
        budget: FeedBudget,
        sampler: &mut R,
    ) -> Result<Vec<ArtworkSummary>> {
        Ok(compose_home_feed(&self.source, user, budget, sampler)?.items)
    }
}
