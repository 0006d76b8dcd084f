//! TF-IDF weighting shared by the builder and the query engine.

use std::collections::BTreeMap;

use crate::types::round6;

/// `ln((N + 1) / (df + 1)) + 1`, with `N` floored at 1.
pub fn idf(df: u32, chunk_count: usize) -> f64 {
    let n = chunk_count.max(1) as f64;
    ((n + 1.0) / (f64::from(df) + 1.0)).ln() + 1.0
}

pub fn idf_table(document_frequency: &[u32], chunk_count: usize) -> Vec<f64> {
    document_frequency.iter().map(|&df| idf(df, chunk_count)).collect()
}

/// Sparse vector with strictly ascending `indices` aligned to `values`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SparseVector {
    pub indices: Vec<u32>,
    pub values: Vec<f64>,
}

impl SparseVector {
    /// Weight each distinct term as `count / total_tokens * idf[term]`.
    ///
    /// `term_ids` may repeat and come in any order. `total_tokens` counts every
    /// token of the text, including ones outside the vocabulary. Ids without an
    /// idf entry are ignored.
    pub fn tf_idf(term_ids: impl IntoIterator<Item = u32>, total_tokens: usize, idf: &[f64]) -> Self {
        let mut counts: BTreeMap<u32, u32> = BTreeMap::new();
        for id in term_ids {
            *counts.entry(id).or_insert(0) += 1;
        }
        let total = total_tokens.max(1) as f64;
        let mut vector = Self::default();
        for (id, count) in counts {
            if let Some(&w) = idf.get(id as usize) {
                vector.indices.push(id);
                vector.values.push(f64::from(count) / total * w);
            }
        }
        vector
    }

    /// Round weights to six decimals, dropping any that become zero.
    pub fn rounded(self) -> Self {
        let mut out = Self::default();
        for (id, v) in self.indices.into_iter().zip(self.values) {
            let v = round6(v);
            if v != 0.0 {
                out.indices.push(id);
                out.values.push(v);
            }
        }
        out
    }

    pub fn norm(&self) -> f64 {
        self.values.iter().map(|v| v * v).sum::<f64>().sqrt()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }
}
