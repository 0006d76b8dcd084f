use chrono::{SecondsFormat, Utc};
use std::collections::{HashMap, HashSet};
use tracing::{debug, info};

use sitesearch_core::config::IndexSettings;
use sitesearch_core::tokenize;
use sitesearch_core::types::{DocumentChunk, IndexSnapshot, TextChunk, METHOD_BOW_TFIDF, SNAPSHOT_VERSION};
use sitesearch_core::vector::{idf_table, SparseVector};

/// Turns text chunks into a TF-IDF snapshot over a capped vocabulary.
#[derive(Debug, Clone)]
pub struct IndexBuilder {
    max_vocab: usize,
}

/// Terms in first-seen order with the number of chunks containing each.
#[derive(Debug, Default)]
struct Vocabulary {
    terms: Vec<String>,
    df: Vec<u32>,
}

impl IndexBuilder {
    pub fn new(max_vocab: usize) -> Self {
        Self { max_vocab }
    }

    pub fn from_settings(settings: &IndexSettings) -> Self {
        Self::new(settings.max_vocab)
    }

    pub fn build(&self, chunks: &[TextChunk]) -> IndexSnapshot {
        self.build_at(chunks, Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true))
    }

    /// Same as [`build`](Self::build) with a caller-supplied timestamp, so output
    /// is a pure function of the input.
    pub fn build_at(&self, chunks: &[TextChunk], built_at: impl Into<String>) -> IndexSnapshot {
        let tokenized: Vec<Vec<String>> = chunks.iter().map(|c| tokenize(&c.text)).collect();

        let full = collect_vocabulary(&tokenized);
        let seen_terms = full.terms.len();
        let (vocabulary, document_frequency) = cap_vocabulary(full, self.max_vocab);
        let term_ids: HashMap<&str, u32> =
            vocabulary.iter().enumerate().map(|(i, t)| (t.as_str(), i as u32)).collect();
        let idf = idf_table(&document_frequency, chunks.len());

        let chunks: Vec<DocumentChunk> = chunks
            .iter()
            .zip(&tokenized)
            .map(|(chunk, tokens)| {
                let ids = tokens.iter().filter_map(|t| term_ids.get(t.as_str()).copied());
                let vector = SparseVector::tf_idf(ids, tokens.len(), &idf).rounded();
                let norm = vector.norm();
                DocumentChunk {
                    id: chunk.id.clone(),
                    source_path: chunk.source_path.clone(),
                    title: chunk.title.clone(),
                    category: chunk.category.clone(),
                    text: chunk.text.clone(),
                    indices: vector.indices,
                    values: vector.values,
                    norm: if norm > 0.0 { norm } else { 1.0 },
                }
            })
            .collect();

        if seen_terms > vocabulary.len() {
            debug!(dropped = seen_terms - vocabulary.len(), "vocabulary capped");
        }
        info!(chunks = chunks.len(), vocab = vocabulary.len(), "built index");

        IndexSnapshot {
            version: SNAPSHOT_VERSION,
            method: METHOD_BOW_TFIDF.to_string(),
            built_at: built_at.into(),
            vocabulary,
            document_frequency,
            chunks,
        }
    }
}

/// First-seen term gets the next id; df counts distinct chunks, not occurrences.
fn collect_vocabulary(tokenized: &[Vec<String>]) -> Vocabulary {
    let mut vocab = Vocabulary::default();
    let mut ids: HashMap<&str, usize> = HashMap::new();
    for tokens in tokenized {
        let mut in_chunk: HashSet<usize> = HashSet::new();
        for token in tokens {
            let id = *ids.entry(token.as_str()).or_insert_with(|| {
                vocab.terms.push(token.clone());
                vocab.df.push(0);
                vocab.terms.len() - 1
            });
            if in_chunk.insert(id) {
                vocab.df[id] += 1;
            }
        }
    }
    vocab
}

/// Keep the `max_vocab` highest-df terms, reassigning ids in descending df
/// order. Ties keep first-seen order.
fn cap_vocabulary(vocab: Vocabulary, max_vocab: usize) -> (Vec<String>, Vec<u32>) {
    let mut order: Vec<usize> = (0..vocab.terms.len()).collect();
    order.sort_by(|&a, &b| vocab.df[b].cmp(&vocab.df[a]));
    order.truncate(max_vocab);
    let terms = order.iter().map(|&i| vocab.terms[i].clone()).collect();
    let df = order.iter().map(|&i| vocab.df[i]).collect();
    (terms, df)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn toks(words: &[&str]) -> Vec<String> {
        words.iter().map(|w| w.to_string()).collect()
    }

    #[test]
    fn df_counts_chunks_not_occurrences() {
        let vocab = collect_vocabulary(&[toks(&["seo", "seo", "local"]), toks(&["seo"])]);
        assert_eq!(vocab.terms, vec!["seo", "local"]);
        assert_eq!(vocab.df, vec![2, 1]);
    }

    #[test]
    fn cap_keeps_highest_df_with_stable_ties() {
        let vocab = Vocabulary { terms: toks(&["a1", "b2", "c3", "d4"]), df: vec![1, 3, 1, 2] };
        let (terms, df) = cap_vocabulary(vocab, 3);
        assert_eq!(terms, vec!["b2", "d4", "a1"]);
        assert_eq!(df, vec![3, 2, 1]);
    }
}
