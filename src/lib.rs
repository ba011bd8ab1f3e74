//! This crate is the recommendation and reputation core of an artwork marketplace.
//! It reads a catalog snapshot through the traits in [`store`] and never writes.

pub mod config;
pub mod engine;
pub mod error;
pub mod feed;
pub mod model;
pub mod recommend;
pub mod reputation;
pub mod store;
pub mod utils;
pub mod vectorizer;

/// Recommender facade
/// The top-level struct of this crate, exposing the four marketplace operations:
/// - `recommend_by_likes`: tag-vector similarity against the user's liked artworks
/// - `recommend_similar`: artworks resembling one artwork (title, category or tag match)
/// - `get_artist_rating_info`: Bayesian-smoothed seller rating and global rank
/// - `get_home_feed`: following slice, tag slice and random fill under a size budget
///
/// `Recommender<S>` is generic over the data source `S`, which must implement
/// every reader trait in [`store`]. A borrowed source (`&S`) works as well.
///
/// Randomized operations have `_with` variants that take any [`Sampler`],
/// e.g. a seeded `rand::rngs::StdRng`.
pub use engine::Recommender;

/// Configuration
/// Feed budget, smoothing constant and default limits, loadable from JSON.
/// Every field has a default; `validate()` rejects non-positive values.
pub use config::RecommendConfig;

/// Error type
/// - `InvalidInput`: zero limit, non-positive smoothing constant
/// - `Store`: failure reported by a data collaborator, propagated unchanged
/// - `Config`: unparsable config or snapshot
pub use error::{RecommendError, Result};

/// Tag matrix
/// Vocabulary plus one L2-normalized term-frequency vector per live artwork,
/// rebuilt from the catalog on every call.
pub use vectorizer::{TagMatrix, TagVector};

/// Data model shared with the API layer
pub use model::{Artwork, ArtworkId, ArtworkSummary, RawTags, Review, UserId};

/// Feed budget and composed feed
pub use feed::{FeedBudget, HomeFeed};

/// Seller reputation results
pub use reputation::{RankedArtist, RatingInfo};

/// Collaborator traits and the in-memory snapshot store
pub use store::{
    memory::MemoryStore, ArtworkReader, DataSource, FollowReader, LikeReader, ReviewReader,
};

/// Injected randomness
pub use utils::sampler::Sampler;
