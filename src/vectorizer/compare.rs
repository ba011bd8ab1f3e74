use std::cmp::Ordering;

use num::Float;

/// dot積 over two sparse vectors given as index-sorted `(dim, value)` entries
/// d(a, b) = Σ(a_i * b_i)
#[inline]
pub fn sparse_dot<N>(
    vec: impl Iterator<Item = (usize, N)>,
    other: impl Iterator<Item = (usize, N)>,
) -> N
where
    N: Float,
{
    let mut a_it = vec.fuse();
    let mut b_it = other.fuse();
    let mut a_next = a_it.next();
    let mut b_next = b_it.next();
    let mut dot = N::zero();
    while let (Some((ia, va)), Some((ib, vb))) = (a_next, b_next) {
        match ia.cmp(&ib) {
            Ordering::Equal => {
                dot = va.mul_add(vb, dot);
                a_next = a_it.next();
                b_next = b_it.next();
            }
            Ordering::Less => a_next = a_it.next(),
            Ordering::Greater => b_next = b_it.next(),
        }
    }
    dot
}

/// ||a|| = sqrt(Σ(a_i^2))
#[inline]
pub fn l2_norm<N>(values: impl Iterator<Item = N>) -> N
where
    N: Float,
{
    values.fold(N::zero(), |acc, v| v.mul_add(v, acc)).sqrt()
}

/// Scale the values in place to unit length.
/// A zero vector stays zero; that is the "no signal" state, not an error.
#[inline]
pub fn l2_normalize<N>(values: &mut [N])
where
    N: Float,
{
    let norm = l2_norm(values.iter().copied());
    if norm == N::zero() || !norm.is_finite() {
        return;
    }
    for v in values.iter_mut() {
        *v = *v / norm;
    }
}
