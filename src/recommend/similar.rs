use tracing::debug;

use crate::error::{ensure_limit, Result};
use crate::model::{Artwork, ArtworkId};
use crate::store::ArtworkReader;
use crate::utils::sampler::Sampler;

/// Lowercased view of the target artwork used for candidate matching.
///
/// A candidate matches when ANY of these holds:
/// - a whitespace token of the target title is a substring of the candidate title
/// - the categories are equal, ignoring case
/// - a target tag is a substring of the candidate's comma joined tag field
///
/// Matching is all case-insensitive and deliberately favors recall.
#[derive(Debug, Clone)]
pub struct MatchProfile {
    id: ArtworkId,
    title_tokens: Vec<String>,
    category: String,
    tags: Vec<String>,
}

impl MatchProfile {
    pub fn new(target: &Artwork) -> Self {
        Self {
            id: target.id,
            title_tokens: target.title.split_whitespace().map(str::to_lowercase).collect(),
            category: target.category.to_lowercase(),
            tags: target.tags.tokens(),
        }
    }

    pub fn title_matches(&self, candidate: &Artwork) -> bool {
        if self.title_tokens.is_empty() {
            return false;
        }
        let title = candidate.title.to_lowercase();
        self.title_tokens.iter().any(|tok| title.contains(tok.as_str()))
    }

    /// Exact comparison after lowercasing; two blank categories are equal
    pub fn category_matches(&self, candidate: &Artwork) -> bool {
        candidate.category.to_lowercase() == self.category
    }

    pub fn tags_match(&self, candidate: &Artwork) -> bool {
        if self.tags.is_empty() {
            return false;
        }
        let field = candidate.tags.tokens().join(",");
        self.tags.iter().any(|tag| field.contains(tag.as_str()))
    }

    /// The target itself and deleted artworks never match
    pub fn matches(&self, candidate: &Artwork) -> bool {
        candidate.id != self.id
            && candidate.is_live()
            && (self.title_matches(candidate)
                || self.category_matches(candidate)
                || self.tags_match(candidate))
    }
}

/// Matching candidate ids in catalog order
pub fn similar_candidates<'a, I>(target: &Artwork, catalog: I) -> Vec<ArtworkId>
where
    I: IntoIterator<Item = &'a Artwork>,
{
    let profile = MatchProfile::new(target);
    catalog
        .into_iter()
        .filter(|cand| profile.matches(cand))
        .map(|cand| cand.id)
        .collect()
}

/// Up to `limit` artworks resembling `artwork`, sampled uniformly from the
/// matching pool. Results are not ranked by match strength.
///
/// Empty when the target is unknown or soft-deleted.
pub fn recommend_similar<S, R>(
    source: &S,
    artwork: ArtworkId,
    limit: usize,
    sampler: &mut R,
) -> Result<Vec<ArtworkId>>
where
    S: ArtworkReader + ?Sized,
    R: Sampler,
{
    ensure_limit("limit", limit)?;
    let target = match source.get_artwork(artwork)? {
        Some(target) if target.is_live() => target,
        _ => {
            debug!(artwork, "target missing or deleted");
            return Ok(Vec::new());
        }
    };
    let catalog = source.list_artworks()?;
    let pool = similar_candidates(&target, &catalog);
    let picked = sampler.sample_from(&pool, limit);
    debug!(artwork, pool = pool.len(), returned = picked.len(), "recommend_similar");
    Ok(picked)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RecommendError;
    use crate::store::memory::MemoryStore;
    use rand::{rngs::StdRng, SeedableRng};

    fn catalog() -> MemoryStore {
        let mut store = MemoryStore::new();
        store
            .add_artwork(Artwork::new(1, 10, "Sunset Bay", "painting", "ocean"))
            .add_artwork(Artwork::new(2, 11, "Bay View", "Painting", "harbor"))
            .add_artwork(Artwork::new(3, 12, "Portrait of Ann", "photo", "people"))
            .add_artwork(Artwork::new(4, 13, "Waves", "sculpture", "deep ocean, blue"))
            .add_artwork(Artwork::new(5, 14, "SUNSETS", "digital", "sky"))
            .add_artwork(Artwork::new(6, 15, "Gone", "painting", "ocean"));
        store.soft_delete(6);
        store
    }

    #[test]
    fn pool_matches_by_title_category_or_tag() {
        let store = catalog();
        let target = store.get_artwork(1).unwrap().unwrap();
        let all = store.list_artworks().unwrap();
        // 2: title + category, 4: tag substring, 5: title substring
        assert_eq!(similar_candidates(&target, &all), vec![2, 4, 5]);
    }

    #[test]
    fn bay_view_matches_two_rules() {
        let store = catalog();
        let target = store.get_artwork(1).unwrap().unwrap();
        let cand = store.get_artwork(2).unwrap().unwrap();
        let profile = MatchProfile::new(&target);
        assert!(profile.title_matches(&cand));
        assert!(profile.category_matches(&cand));
        assert!(!profile.tags_match(&cand));
    }

    #[test]
    fn never_returns_target_or_deleted() {
        let store = catalog();
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..20 {
            let ids = recommend_similar(&store, 1, 10, &mut rng).unwrap();
            assert!(!ids.contains(&1));
            assert!(!ids.contains(&6));
            assert_eq!(ids.len(), 3);
        }
    }

    #[test]
    fn limit_caps_sample_size() {
        let store = catalog();
        let mut rng = StdRng::seed_from_u64(11);
        let ids = recommend_similar(&store, 1, 2, &mut rng).unwrap();
        assert_eq!(ids.len(), 2);
        assert!(ids.iter().all(|id| [2, 4, 5].contains(id)));
    }

    #[test]
    fn seeded_sampler_is_reproducible() {
        let store = catalog();
        let a = recommend_similar(&store, 1, 2, &mut StdRng::seed_from_u64(5)).unwrap();
        let b = recommend_similar(&store, 1, 2, &mut StdRng::seed_from_u64(5)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn missing_or_deleted_target_is_empty() {
        let store = catalog();
        let mut rng = StdRng::seed_from_u64(0);
        assert!(recommend_similar(&store, 99, 5, &mut rng).unwrap().is_empty());
        assert!(recommend_similar(&store, 6, 5, &mut rng).unwrap().is_empty());
    }

    #[test]
    fn zero_limit_is_invalid() {
        let mut rng = StdRng::seed_from_u64(0);
        let err = recommend_similar(&catalog(), 1, 0, &mut rng).unwrap_err();
        assert!(matches!(err, RecommendError::InvalidInput(_)));
    }

    #[test]
    fn blank_categories_match_each_other() {
        let target = Artwork::new(1, 1, "Alpha", "", "x");
        let cand = Artwork::new(2, 2, "Beta", "", "y");
        assert!(MatchProfile::new(&target).category_matches(&cand));
        assert_eq!(similar_candidates(&target, [&cand]), vec![2]);
    }

    #[test]
    fn category_is_not_trimmed() {
        let target = Artwork::new(1, 1, "Alpha", "painting", "x");
        let cand = Artwork::new(2, 2, "Beta", " Painting ", "y");
        assert!(!MatchProfile::new(&target).category_matches(&cand));
        assert!(similar_candidates(&target, [&cand]).is_empty());
    }
}
