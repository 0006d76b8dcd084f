use proptest::prelude::*;

use sitesearch_core::types::TextChunk;
use sitesearch_index::IndexBuilder;

fn chunks_from(texts: &[String]) -> Vec<TextChunk> {
    texts
        .iter()
        .enumerate()
        .map(|(i, text)| TextChunk {
            id: format!("blog/doc{}.md#1", i),
            source_path: format!("content/blog/doc{}.md", i),
            category: "blogPost".to_string(),
            title: format!("Doc {}", i),
            text: text.clone(),
        })
        .collect()
}

proptest! {
    #[test]
    fn vocabulary_never_exceeds_cap(texts in prop::collection::vec("[a-z ]{0,80}", 0..12), cap in 1usize..20) {
        let snapshot = IndexBuilder::new(cap).build_at(&chunks_from(&texts), "t");
        prop_assert!(snapshot.vocabulary.len() <= cap);
        prop_assert_eq!(snapshot.vocabulary.len(), snapshot.document_frequency.len());
    }

    #[test]
    fn sparse_vectors_are_consistent(texts in prop::collection::vec("[a-z0-9 ]{0,120}", 1..10), cap in 1usize..50) {
        let snapshot = IndexBuilder::new(cap).build_at(&chunks_from(&texts), "t");
        prop_assert!(snapshot.validate().is_ok());
        for chunk in &snapshot.chunks {
            prop_assert_eq!(chunk.indices.len(), chunk.values.len());
            prop_assert!(chunk.indices.windows(2).all(|w| w[0] < w[1]));
            prop_assert!(chunk.indices.iter().all(|&i| (i as usize) < snapshot.vocabulary.len()));
            prop_assert!(chunk.norm > 0.0);
        }
    }
}
