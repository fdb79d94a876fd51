//! Property-based tests for sampling and ranking.
//!
//! # Running Property Tests
//!
//! ```bash
//! cargo test -p lexuse --test property_tests
//!
//! # More cases
//! PROPTEST_CASES=10000 cargo test -p lexuse --test property_tests
//! ```

use std::collections::HashSet;

use proptest::prelude::*;

use lexuse::curation::rank_candidates;
use lexuse::services::{SentenceBatch, SentenceSource};
use lexuse::{CandidateSampler, ExclusionRecord, ExclusionStore, LexicalForm};

// =============================================================================
// Test Strategies
// =============================================================================

/// Query results, possibly with structurally equal rows.
fn query_rows() -> impl Strategy<Value = Vec<LexicalForm>> {
    prop::collection::vec((1u32..20, 1u32..4), 0..40).prop_map(|ids| {
        ids.into_iter()
            .map(|(l, f)| {
                LexicalForm::new(
                    format!("L{}", l),
                    format!("L{}-F{}", l, f),
                    format!("ord{}", l),
                    "noun",
                )
            })
            .collect()
    })
}

/// Sentences of 1 to 12 words.
fn sentences() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec(prop::collection::vec("[a-zåäö]{1,8}", 1..12), 0..20)
        .prop_map(|sentences| sentences.into_iter().map(|words| words.join(" ")).collect())
}

// =============================================================================
// Sampler
// =============================================================================

proptest! {
    /// Every row is drawn exactly once, whatever the exclusions.
    #[test]
    fn sampler_draws_each_row_once(rows in query_rows(), seed in any::<u64>(), excluded in prop::collection::vec(any::<bool>(), 40)) {
        let mut store = ExclusionStore::in_memory();
        for (row, exclude) in rows.iter().zip(&excluded) {
            if *exclude {
                store.add(ExclusionRecord::now(row.form_id.clone(), row.word.clone(), "sv"));
            }
        }

        let n = rows.len();
        let mut sampler = CandidateSampler::with_seed(rows, seed);
        let mut eligible = 0;
        while sampler.next_eligible(&store, "sv").is_some() {
            eligible += 1;
        }

        prop_assert_eq!(sampler.drawn(), n);
        prop_assert_eq!(eligible + sampler.skipped_excluded(), n);
        prop_assert!(sampler.is_exhausted());
    }

    /// Raw draws return each row index exactly once.
    #[test]
    fn sampler_draws_are_a_permutation(rows in query_rows(), seed in any::<u64>()) {
        let n = rows.len();
        let mut sampler = CandidateSampler::with_seed(rows, seed);
        let mut seen = HashSet::new();
        while let Some((index, _)) = sampler.draw() {
            prop_assert!(seen.insert(index));
        }
        prop_assert_eq!(seen.len(), n);
    }

    // =========================================================================
    // Ranking
    // =========================================================================

    /// Candidates come out shortest first, ties in corpus order.
    #[test]
    fn ranking_is_stable_by_word_count(texts in sentences()) {
        let mut batch = SentenceBatch::new();
        for (i, text) in texts.iter().enumerate() {
            batch.insert(text.clone(), SentenceSource::new(format!("D{}", i), None));
        }
        let order: Vec<String> = batch.keys().cloned().collect();

        let ranked = rank_candidates(batch);
        for pair in ranked.windows(2) {
            let (a, b) = (&pair[0], &pair[1]);
            prop_assert!(a.word_count() <= b.word_count());
            if a.word_count() == b.word_count() {
                let pos_a = order.iter().position(|t| *t == a.text);
                let pos_b = order.iter().position(|t| *t == b.text);
                prop_assert!(pos_a < pos_b);
            }
        }
    }
}
