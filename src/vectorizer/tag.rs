use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Normalize raw tag pieces into tokens.
/// Each piece is trimmed and lowercased; empty pieces are dropped.
pub fn normalize_tags<'a, I>(pieces: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    pieces
        .into_iter()
        .map(|piece| piece.trim().to_lowercase())
        .filter(|tok| !tok.is_empty())
        .collect()
}

///  TagFrequency 構造体
/// Occurrence counts of the tags attached to one artwork.
/// Insertion order of first appearance is kept, so building a vocabulary
/// from several frequencies is deterministic.
///
/// # Examples
/// ```
/// use artwork_recommender::vectorizer::tag::TagFrequency;
/// let mut freq = TagFrequency::new();
/// freq.add_tag("ocean").add_tag("blue").add_tag("ocean");
/// assert_eq!(freq.tag_count("ocean"), 2);
/// assert_eq!(freq.tag_sum(), 3);
/// ```
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct TagFrequency {
    #[serde(with = "indexmap::map::serde_seq")]
    tag_count: IndexMap<String, u32>,
    total_tag_count: u64,
}

impl TagFrequency {
    pub fn new() -> Self {
        TagFrequency {
            tag_count: IndexMap::new(),
            total_tag_count: 0,
        }
    }

    /// tagを追加する
    #[inline]
    pub fn add_tag(&mut self, tag: &str) -> &mut Self {
        let count = self.tag_count.entry(tag.to_string()).or_insert(0);
        *count += 1;
        self.total_tag_count += 1;
        self
    }

    #[inline]
    pub fn tag_count(&self, tag: &str) -> u32 {
        self.tag_count.get(tag).copied().unwrap_or(0)
    }

    /// total number of tag occurrences
    #[inline]
    pub fn tag_sum(&self) -> u64 {
        self.total_tag_count
    }

    /// `(tag, count)` in first appearance order
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = (&str, u32)> {
        self.tag_count.iter().map(|(tag, &count)| (tag.as_str(), count))
    }
}

impl<T: AsRef<str>> FromIterator<T> for TagFrequency {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut freq = TagFrequency::new();
        for tag in iter {
            freq.add_tag(tag.as_ref());
        }
        freq
    }
}
