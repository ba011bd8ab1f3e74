use indexmap::IndexSet;
use rayon::prelude::*;
use tracing::debug;

use crate::error::{ensure_limit, Result};
use crate::model::{ArtworkId, UserId};
use crate::recommend::scoring::Hits;
use crate::store::{ArtworkReader, LikeReader};
use crate::vectorizer::{TagMatrix, TagVector};

/// Mean similarity of every catalog artwork against the liked rows.
///
/// Rows are the liked ids that exist in the matrix; ids missing from it
/// (deleted, unknown) are ignored. Liked artworks themselves are not scored.
/// Scores come back in catalog order, unsorted.
/// Empty when no liked id is present in the matrix.
pub fn score_by_likes(matrix: &TagMatrix, liked: &[ArtworkId]) -> Hits<ArtworkId> {
    let liked: IndexSet<ArtworkId> = liked.iter().copied().collect();
    let rows: Vec<&TagVector> = liked.iter().filter_map(|id| matrix.get(*id)).collect();
    if rows.is_empty() {
        return Hits::new(Vec::new());
    }
    let row_num = rows.len() as f64;

    // O(L × V): one dot per (liked row, catalog column)
    let scores: Vec<(ArtworkId, f64)> = matrix
        .par_iter()
        .filter(|(id, _)| !liked.contains(*id))
        .map(|(id, column)| {
            let sum: f64 = rows.iter().map(|row| row.dot(column)).sum();
            (*id, sum / row_num)
        })
        .collect();

    Hits::new(scores)
}

/// Top `limit` artworks by mean tag similarity to `liked`.
///
/// Ties keep catalog order. Returns an empty list when nothing can be
/// recommended (no likes, every liked artwork gone, empty catalog).
pub fn recommend_from_matrix(
    matrix: &TagMatrix,
    liked: &[ArtworkId],
    limit: usize,
) -> Result<Vec<ArtworkId>> {
    ensure_limit("limit", limit)?;
    let mut hits = score_by_likes(matrix, liked);
    hits.sort_by_score();
    Ok(hits.top_keys(limit))
}

/// Like-based recommendation for `user`, reading a fresh catalog snapshot
pub fn recommend_by_likes<S>(source: &S, user: UserId, limit: usize) -> Result<Vec<ArtworkId>>
where
    S: ArtworkReader + LikeReader + ?Sized,
{
    ensure_limit("limit", limit)?;
    let liked = source.liked_artworks(user)?;
    if liked.is_empty() {
        debug!(user, "no likes, nothing to recommend");
        return Ok(Vec::new());
    }
    let catalog = source.list_artworks()?;
    let matrix = TagMatrix::build(&catalog);
    let ids = recommend_from_matrix(&matrix, &liked, limit)?;
    debug!(
        user,
        liked = liked.len(),
        catalog = matrix.len(),
        vocab = matrix.vocab_size(),
        returned = ids.len(),
        "recommend_by_likes"
    );
    Ok(ids)
}
