//! Bayesian-smoothed seller reputation.
//!
//! W = v / (v + m) × R + m / (v + m) × C
//!
//! - R: seller's own mean rating, v: seller's review count
//! - C: mean of every rating in the system
//! - m: smoothing constant, how many "phantom" reviews at C every seller starts with
//!
//! A seller with no reviews gets exactly C. Everything is recomputed from the
//! review store on each call.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{RecommendError, Result};
use crate::model::{Review, UserId};
use crate::recommend::scoring::Hits;
use crate::store::ReviewReader;

pub const DEFAULT_SMOOTHING: f64 = 5.0;

/// Result of [`get_artist_rating_info`]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RatingInfo {
    pub avg_rating: f64,
    pub review_count: u64,
    pub weighted_rating: f64,
    /// 1-based; `None` when the artist is not a known seller
    pub rank: Option<usize>,
}

/// One row of the seller leaderboard
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedArtist {
    pub artist_id: UserId,
    pub avg_rating: f64,
    pub review_count: u64,
    pub weighted_rating: f64,
    /// 1-based
    pub rank: usize,
}

pub fn validate_smoothing(m: f64) -> Result<()> {
    if !(m.is_finite() && m > 0.0) {
        return Err(RecommendError::invalid(format!(
            "smoothing constant must be positive and finite, got {m}"
        )));
    }
    Ok(())
}

/// Shrink `avg` towards `global` by the weight of `count` reviews against `m`.
/// `count == 0` yields `global` exactly.
#[inline]
pub fn weighted_rating(avg: f64, count: u64, global: f64, m: f64) -> f64 {
    if count == 0 {
        return global;
    }
    let v = count as f64;
    (v / (v + m)) * avg + (m / (v + m)) * global
}

/// Running sum of ratings
#[derive(Debug, Clone, Copy, Default)]
struct RatingAcc {
    sum: u64,
    count: u64,
}

impl RatingAcc {
    fn push(&mut self, rating: u8) {
        self.sum += rating as u64;
        self.count += 1;
    }

    /// 0.0 for no ratings
    fn mean(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.sum as f64 / self.count as f64
        }
    }
}

fn valid_rating(rating: u8, artist: UserId) -> bool {
    let ok = Review::rating_in_range(rating);
    if !ok {
        warn!(artist, rating, "skipping out of range rating");
    }
    ok
}

/// Leaderboard over one snapshot of sellers and reviews, plus the global mean C
fn leaderboard(sellers: &[UserId], reviews: &[Review], m: f64) -> (Vec<RankedArtist>, f64) {
    let mut global = RatingAcc::default();
    let mut per_artist: IndexMap<UserId, RatingAcc> =
        sellers.iter().map(|&id| (id, RatingAcc::default())).collect();
    for review in reviews {
        if !valid_rating(review.rating, review.artist_id) {
            continue;
        }
        global.push(review.rating);
        // reviews of users that are not sellers still count towards C
        if let Some(acc) = per_artist.get_mut(&review.artist_id) {
            acc.push(review.rating);
        }
    }
    let c = global.mean();

    let mut hits = Hits::new(
        per_artist
            .iter()
            .map(|(&id, acc)| (id, weighted_rating(acc.mean(), acc.count, c, m)))
            .collect(),
    );
    hits.sort_by_score();

    let ranked: Vec<RankedArtist> = hits
        .list
        .into_iter()
        .enumerate()
        .map(|(pos, (artist_id, weighted))| {
            let acc = per_artist[&artist_id];
            RankedArtist {
                artist_id,
                avg_rating: acc.mean(),
                review_count: acc.count,
                weighted_rating: weighted,
                rank: pos + 1,
            }
        })
        .collect();

    debug!(sellers = ranked.len(), reviews = global.count, global_avg = c, m, "ranked artists");
    (ranked, c)
}

/// Full leaderboard: every seller, best first.
/// Equal weighted ratings keep the store's seller order.
pub fn rank_artists<S>(source: &S, m: f64) -> Result<Vec<RankedArtist>>
where
    S: ReviewReader + ?Sized,
{
    validate_smoothing(m)?;
    let sellers = source.list_sellers()?;
    let reviews = source.all_reviews()?;
    Ok(leaderboard(&sellers, &reviews, m).0)
}

/// Rating summary and global rank of one artist.
///
/// Reads sellers and reviews once; R, v, W and rank all come from that read.
pub fn get_artist_rating_info<S>(source: &S, artist: UserId, m: f64) -> Result<RatingInfo>
where
    S: ReviewReader + ?Sized,
{
    validate_smoothing(m)?;
    let sellers = source.list_sellers()?;
    let reviews = source.all_reviews()?;
    let (board, c) = leaderboard(&sellers, &reviews, m);

    if let Some(row) = board.iter().find(|row| row.artist_id == artist) {
        return Ok(RatingInfo {
            avg_rating: row.avg_rating,
            review_count: row.review_count,
            weighted_rating: row.weighted_rating,
            rank: Some(row.rank),
        });
    }

    // not a seller: still summarize whatever reviews it has
    let mut own = RatingAcc::default();
    reviews
        .iter()
        .filter(|r| r.artist_id == artist && Review::rating_in_range(r.rating))
        .for_each(|r| own.push(r.rating));
    Ok(RatingInfo {
        avg_rating: own.mean(),
        review_count: own.count,
        weighted_rating: weighted_rating(own.mean(), own.count, c, m),
        rank: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::MemoryStore;
    use std::cell::Cell;

    fn review(artist: UserId, rating: u8) -> Review {
        Review { reviewer_id: 1000, artist_id: artist, rating, comment: String::new() }
    }

    fn store(ratings: &[(UserId, u8)]) -> MemoryStore {
        let mut store = MemoryStore::new();
        for &(artist, rating) in ratings {
            store.add_review(review(artist, rating));
        }
        store
    }

    #[test]
    fn three_fives_against_global_three_and_a_half() {
        let store = store(&[(1, 5), (1, 5), (1, 5), (2, 2), (2, 2), (2, 2)]);
        let info = get_artist_rating_info(&store, 1, DEFAULT_SMOOTHING).unwrap();
        assert_eq!(info.review_count, 3);
        assert_eq!(info.avg_rating, 5.0);
        assert!((info.weighted_rating - 4.0625).abs() < 1e-12);
        assert_eq!(info.rank, Some(1));
    }

    #[test]
    fn unreviewed_seller_gets_global_average_exactly() {
        let mut store = store(&[(1, 5), (1, 4), (2, 1)]);
        store.add_seller(3);
        let global = 10.0 / 3.0;
        let info = get_artist_rating_info(&store, 3, 7.0).unwrap();
        assert_eq!(info.review_count, 0);
        assert_eq!(info.avg_rating, 0.0);
        assert_eq!(info.weighted_rating, global);
        assert!(info.rank.is_some());
    }

    #[test]
    fn unknown_artist_has_no_rank() {
        let store = store(&[(1, 5)]);
        let info = get_artist_rating_info(&store, 42, DEFAULT_SMOOTHING).unwrap();
        assert_eq!(info.rank, None);
        assert_eq!(info.weighted_rating, 5.0);
    }

    #[test]
    fn empty_system_is_all_zero() {
        let mut store = MemoryStore::new();
        store.add_seller(1);
        let info = get_artist_rating_info(&store, 1, DEFAULT_SMOOTHING).unwrap();
        let expected =
            RatingInfo { avg_rating: 0.0, review_count: 0, weighted_rating: 0.0, rank: Some(1) };
        assert_eq!(info, expected);
    }

    #[test]
    fn non_positive_smoothing_is_rejected() {
        let store = store(&[(1, 5)]);
        for m in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            let err = get_artist_rating_info(&store, 1, m).unwrap_err();
            assert!(matches!(err, RecommendError::InvalidInput(_)));
        }
    }

    #[test]
    fn weighted_rating_monotonicity() {
        let (c, m) = (3.0, 5.0);
        // non-decreasing in R for fixed v
        let mut prev = f64::MIN;
        for r in [1.0, 2.0, 3.5, 5.0] {
            let w = weighted_rating(r, 4, c, m);
            assert!(w >= prev);
            prev = w;
        }
        // more evidence pulls further from C in the direction of R
        let mut prev_hi = weighted_rating(4.5, 0, c, m);
        let mut prev_lo = weighted_rating(1.5, 0, c, m);
        for v in 1..50u64 {
            let hi = weighted_rating(4.5, v, c, m);
            let lo = weighted_rating(1.5, v, c, m);
            assert!(hi >= prev_hi);
            assert!(lo <= prev_lo);
            prev_hi = hi;
            prev_lo = lo;
        }
    }

    #[test]
    fn leaderboard_orders_by_weighted_rating() {
        // 1: one 5-star, 2: many 5-stars, 3: one 1-star
        let mut ratings = vec![(1, 5), (3, 1)];
        ratings.extend(std::iter::repeat((2, 5)).take(10));
        let board = rank_artists(&store(&ratings), DEFAULT_SMOOTHING).unwrap();
        let order: Vec<UserId> = board.iter().map(|r| r.artist_id).collect();
        assert_eq!(order, vec![2, 1, 3]);
        assert_eq!(board.iter().map(|r| r.rank).collect::<Vec<_>>(), vec![1, 2, 3]);
    }

    #[test]
    fn ties_keep_seller_order() {
        let mut store = MemoryStore::new();
        store.add_seller(9).add_seller(4).add_seller(6);
        let board = rank_artists(&store, DEFAULT_SMOOTHING).unwrap();
        assert_eq!(board.iter().map(|r| r.artist_id).collect::<Vec<_>>(), vec![9, 4, 6]);
    }

    #[test]
    fn out_of_range_ratings_are_skipped() {
        let store = store(&[(1, 5), (1, 0), (1, 9)]);
        let info = get_artist_rating_info(&store, 1, DEFAULT_SMOOTHING).unwrap();
        assert_eq!(info.review_count, 1);
        assert_eq!(info.avg_rating, 5.0);
    }

    /// Counts review reads and serves a different rating on every read
    struct Drifting {
        inner: MemoryStore,
        reads: Cell<u8>,
    }

    impl ReviewReader for Drifting {
        fn all_reviews(&self) -> Result<Vec<Review>> {
            let n = self.reads.get() + 1;
            self.reads.set(n);
            let mut reviews = self.inner.all_reviews()?;
            reviews.push(review(2, n.min(5)));
            Ok(reviews)
        }

        fn list_sellers(&self) -> Result<Vec<UserId>> {
            self.inner.list_sellers()
        }
    }

    #[test]
    fn rating_info_comes_from_one_review_read() {
        let source = Drifting { inner: store(&[(1, 5), (1, 4), (2, 3)]), reads: Cell::new(0) };
        let info = get_artist_rating_info(&source, 1, DEFAULT_SMOOTHING).unwrap();
        assert_eq!(source.reads.get(), 1);

        // same data as the leaderboard the rank was taken from
        source.reads.set(0);
        let board = rank_artists(&source, DEFAULT_SMOOTHING).unwrap();
        let row = board.iter().find(|r| r.artist_id == 1).unwrap();
        assert_eq!(info.weighted_rating, row.weighted_rating);
        assert_eq!(info.rank, Some(row.rank));
    }

    #[test]
    fn non_seller_is_summarized_without_rank() {
        // artist 7 is reviewed but left out of the seller listing
        let store = MemoryStore::from_json_str(
            r#"{"sellers":[1],"reviews":[
                {"reviewer_id":9,"artist_id":1,"rating":5},
                {"reviewer_id":9,"artist_id":7,"rating":1}
            ]}"#,
        )
        .unwrap();
        let info = get_artist_rating_info(&store, 7, 1.0).unwrap();
        assert_eq!(info.review_count, 1);
        assert_eq!(info.avg_rating, 1.0);
        // C = 3.0, W = 0.5 * 1 + 0.5 * 3
        assert_eq!(info.weighted_rating, 2.0);
        assert_eq!(info.rank, None);
        assert_eq!(get_artist_rating_info(&store, 1, 1.0).unwrap().rank, Some(1));
    }

    #[test]
    fn serializes_camel_case() {
        let info =
            RatingInfo { avg_rating: 4.0, review_count: 2, weighted_rating: 3.5, rank: None };
        let json = serde_json::to_string(&info).unwrap();
        assert_eq!(json, r#"{"avgRating":4.0,"reviewCount":2,"weightedRating":3.5,"rank":null}"#);
    }
}
