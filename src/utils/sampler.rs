use rand::Rng;

/// Source of randomness for sampling steps.
///
/// Every randomized step (similar-item sampling, feed following slice and
/// random fill) goes through this trait, so callers can inject a seeded RNG
/// and get reproducible output. Any [`rand::Rng`] is a `Sampler`.
///
/// ```
/// use rand::{rngs::StdRng, SeedableRng};
/// use artwork_recommender::utils::sampler::Sampler;
///
/// let mut a = StdRng::seed_from_u64(7);
/// let mut b = StdRng::seed_from_u64(7);
/// assert_eq!(a.sample_indices(10, 3), b.sample_indices(10, 3));
/// ```
pub trait Sampler {
    /// `min(amount, len)` distinct indices in `0..len`, uniformly chosen,
    /// in random order
    fn sample_indices(&mut self, len: usize, amount: usize) -> Vec<usize>;

    /// Uniform sample without replacement from `pool`
    fn sample_from<T: Clone>(&mut self, pool: &[T], amount: usize) -> Vec<T>
    where
        Self: Sized,
    {
        self.sample_indices(pool.len(), amount)
            .into_iter()
            .map(|idx| pool[idx].clone())
            .collect()
    }
}

impl<R: Rng + ?Sized> Sampler for R {
    fn sample_indices(&mut self, len: usize, amount: usize) -> Vec<usize> {
        let amount = amount.min(len);
        if amount == 0 {
            return Vec::new();
        }
        rand::seq::index::sample(self, len, amount).into_vec()
    }
}
