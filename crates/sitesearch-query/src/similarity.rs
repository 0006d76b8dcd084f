use std::cmp::Ordering;

/// Dot product of two sparse vectors by a two-pointer merge over their
/// ascending index lists.
pub fn sparse_dot(a_idx: &[u32], a_val: &[f64], b_idx: &[u32], b_val: &[f64]) -> f64 {
    let (mut i, mut j) = (0, 0);
    let mut dot = 0.0;
    while i < a_idx.len() && j < b_idx.len() {
        match a_idx[i].cmp(&b_idx[j]) {
            Ordering::Less => i += 1,
            Ordering::Greater => j += 1,
            Ordering::Equal => {
                dot += a_val[i] * b_val[j];
                i += 1;
                j += 1;
            }
        }
    }
    dot
}

/// Cosine similarity from a dot product and precomputed norms; 0 when either
/// norm is not positive.
pub fn cosine(dot: f64, norm_a: f64, norm_b: f64) -> f64 {
    let denom = norm_a * norm_b;
    if denom > 0.0 { dot / denom } else { 0.0 }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_shared_indices_contribute() {
        let dot = sparse_dot(&[1, 3, 7], &[1.0, 2.0, 3.0], &[0, 3, 7, 9], &[5.0, 0.5, 2.0, 4.0]);
        assert!((dot - (2.0 * 0.5 + 3.0 * 2.0)).abs() < 1e-12);
    }

    #[test]
    fn disjoint_vectors_are_orthogonal() {
        assert_eq!(sparse_dot(&[0, 2], &[1.0, 1.0], &[1, 3], &[1.0, 1.0]), 0.0);
        assert_eq!(sparse_dot(&[], &[], &[1], &[1.0]), 0.0);
    }

    #[test]
    fn zero_norm_is_not_a_division() {
        assert_eq!(cosine(1.0, 0.0, 2.0), 0.0);
        assert!((cosine(2.0, 1.0, 2.0) - 1.0).abs() < 1e-12);
    }
}
