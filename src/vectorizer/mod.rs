pub mod compare;
pub mod tag;

use indexmap::{IndexMap, IndexSet};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::model::{Artwork, ArtworkId};
use crate::vectorizer::compare::{l2_norm, l2_normalize, sparse_dot};
use crate::vectorizer::tag::TagFrequency;

/// L2-normalized term-frequency vector of one artwork over the matrix vocabulary.
///
/// Stored sparse as `(dim, value)` entries sorted by dim.
/// Norm is 1 unless the artwork has no tags, in which case it is the zero
/// vector and has similarity 0 with everything.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TagVector {
    entries: Vec<(usize, f64)>,
}

impl TagVector {
    /// Build from raw counts. `counts` must be sorted by dim.
    fn from_counts(counts: Vec<(usize, u32)>) -> Self {
        let dims: Vec<usize> = counts.iter().map(|&(dim, _)| dim).collect();
        let mut values: Vec<f64> = counts.iter().map(|&(_, count)| count as f64).collect();
        l2_normalize(&mut values);
        Self {
            entries: dims.into_iter().zip(values).collect(),
        }
    }

    #[inline]
    pub fn entries(&self) -> &[(usize, f64)] {
        &self.entries
    }

    #[inline]
    pub fn get(&self, dim: usize) -> f64 {
        self.entries
            .binary_search_by_key(&dim, |&(d, _)| d)
            .map(|pos| self.entries[pos].1)
            .unwrap_or(0.0)
    }

    #[inline]
    pub fn is_zero(&self) -> bool {
        self.entries.is_empty()
    }

    #[inline]
    pub fn norm(&self) -> f64 {
        l2_norm(self.entries.iter().map(|&(_, v)| v))
    }

    /// Cosine similarity, since both sides are already unit length
    #[inline]
    pub fn dot(&self, other: &TagVector) -> f64 {
        sparse_dot(self.entries.iter().copied(), other.entries.iter().copied())
    }
}

/// Tag vectors for a whole catalog snapshot.
///
/// The vocabulary holds every distinct tag token across the catalog in first
/// appearance order, and `vectors` keeps artworks in catalog iteration order.
/// Both orders are what similarity ties are broken on, so they are stable
/// for a given input sequence.
///
/// Built fresh per call and dropped afterwards; there is no incremental update.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TagMatrix {
    vocabulary: IndexSet<Box<str>>,
    vectors: IndexMap<ArtworkId, TagVector>,
}

impl TagMatrix {
    /// Build from catalog rows. Soft-deleted artworks are skipped.
    pub fn build<'a, I>(artworks: I) -> Self
    where
        I: IntoIterator<Item = &'a Artwork>,
    {
        Self::from_frequencies(
            artworks
                .into_iter()
                .filter(|art| art.is_live())
                .map(|art| (art.id, art.tags.tokens().into_iter().collect::<TagFrequency>())),
        )
    }

    /// Build from already counted tags
    pub fn from_frequencies<I>(docs: I) -> Self
    where
        I: IntoIterator<Item = (ArtworkId, TagFrequency)>,
    {
        let mut vocabulary: IndexSet<Box<str>> = IndexSet::new();
        let mut counted: Vec<(ArtworkId, Vec<(usize, u32)>)> = Vec::new();

        for (id, freq) in docs {
            let mut counts: Vec<(usize, u32)> = freq
                .iter()
                .map(|(tag, count)| {
                    let (dim, _) = vocabulary.insert_full(Box::from(tag));
                    (dim, count)
                })
                .collect();
            counts.sort_unstable_by_key(|&(dim, _)| dim);
            counted.push((id, counts));
        }

        let mut vectors = IndexMap::with_capacity(counted.len());
        for (id, counts) in counted {
            vectors.insert(id, TagVector::from_counts(counts));
        }

        trace!(artworks = vectors.len(), vocab = vocabulary.len(), "built tag matrix");
        Self { vocabulary, vectors }
    }

    #[inline]
    pub fn vocabulary(&self) -> &IndexSet<Box<str>> {
        &self.vocabulary
    }

    #[inline]
    pub fn vocab_size(&self) -> usize {
        self.vocabulary.len()
    }

    /// dim of a tag token, if it is in the vocabulary
    #[inline]
    pub fn dim_of(&self, tag: &str) -> Option<usize> {
        self.vocabulary.get_index_of(tag)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.vectors.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }

    #[inline]
    pub fn contains(&self, id: ArtworkId) -> bool {
        self.vectors.contains_key(&id)
    }

    #[inline]
    pub fn get(&self, id: ArtworkId) -> Option<&TagVector> {
        self.vectors.get(&id)
    }

    /// `(id, vector)` in catalog order
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = (ArtworkId, &TagVector)> {
        self.vectors.iter().map(|(&id, vec)| (id, vec))
    }

    /// Parallel `(id, vector)` scan; indexed, so collecting keeps catalog order
    #[inline]
    pub fn par_iter(&self) -> impl IndexedParallelIterator<Item = (&ArtworkId, &TagVector)> + '_ {
        self.vectors.par_iter()
    }
}
