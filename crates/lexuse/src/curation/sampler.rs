//! Random draw of forms without replacement.

use tracing::debug;

use crate::exclusion::ExclusionStore;
use crate::lexeme::LexicalForm;

/// Draws the forms of one query result in random order, each exactly once.
///
/// The order is a permutation of row indices fixed at construction, so
/// structurally equal rows are still drawn once per row.
#[derive(Debug)]
pub struct CandidateSampler {
    forms: Vec<LexicalForm>,
    order: Vec<usize>,
    cursor: usize,
    skipped_excluded: usize,
}

impl CandidateSampler {
    /// Create a sampler with a randomly seeded order.
    pub fn new(forms: Vec<LexicalForm>) -> Self {
        Self::with_rng(forms, fastrand::Rng::new())
    }

    /// Create a sampler with a reproducible order.
    pub fn with_seed(forms: Vec<LexicalForm>, seed: u64) -> Self {
        Self::with_rng(forms, fastrand::Rng::with_seed(seed))
    }

    fn with_rng(forms: Vec<LexicalForm>, mut rng: fastrand::Rng) -> Self {
        let mut order: Vec<usize> = (0..forms.len()).collect();
        rng.shuffle(&mut order);
        Self {
            forms,
            order,
            cursor: 0,
            skipped_excluded: 0,
        }
    }

    /// Draw the next row, returning its index in the query result.
    pub fn draw(&mut self) -> Option<(usize, &LexicalForm)> {
        let index = *self.order.get(self.cursor)?;
        self.cursor += 1;
        Some((index, &self.forms[index]))
    }

    /// Draw until a form that is not excluded for `language` comes up.
    ///
    /// Excluded draws are used up like any other, so a result of N rows is
    /// exhausted after exactly N draws.
    pub fn next_eligible(&mut self, store: &ExclusionStore, language: &str) -> Option<LexicalForm> {
        loop {
            let (index, form) = self.draw()?;
            if store.is_excluded(&form.form_id, language) {
                debug!(row = index, word = %form.word, "skipping form found in exclusion list");
                self.skipped_excluded += 1;
                continue;
            }
            debug!(row = index, word = %form.word, "random choice");
            return Some(form.clone());
        }
    }

    /// Number of rows in the query result.
    pub fn len(&self) -> usize {
        self.forms.len()
    }

    /// Whether the query result was empty.
    pub fn is_empty(&self) -> bool {
        self.forms.is_empty()
    }

    /// Rows drawn so far.
    pub fn drawn(&self) -> usize {
        self.cursor
    }

    /// Rows not drawn yet.
    pub fn remaining(&self) -> usize {
        self.order.len() - self.cursor
    }

    /// Whether every row has been drawn.
    pub fn is_exhausted(&self) -> bool {
        self.remaining() == 0
    }

    /// Draws skipped because the form was excluded.
    pub fn skipped_excluded(&self) -> usize {
        self.skipped_excluded
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exclusion::ExclusionRecord;

    fn forms(n: usize) -> Vec<LexicalForm> {
        (0..n)
            .map(|i| LexicalForm::new(format!("L{}", i), format!("L{}-F1", i), format!("ord{}", i), "noun"))
            .collect()
    }

    #[test]
    fn test_same_seed_same_order() {
        let mut a = CandidateSampler::with_seed(forms(10), 42);
        let mut b = CandidateSampler::with_seed(forms(10), 42);
        for _ in 0..10 {
            assert_eq!(a.draw().map(|(i, _)| i), b.draw().map(|(i, _)| i));
        }
        assert!(a.draw().is_none());
    }

    #[test]
    fn test_duplicate_rows_drawn_once_each() {
        let row = LexicalForm::new("L1", "L1-F1", "bank", "noun");
        let mut sampler = CandidateSampler::with_seed(vec![row.clone(), row.clone(), row], 7);
        let mut indices = Vec::new();
        while let Some((i, _)) = sampler.draw() {
            indices.push(i);
        }
        indices.sort();
        assert_eq!(indices, vec![0, 1, 2]);
    }

    #[test]
    fn test_excluded_draws_count_towards_exhaustion() {
        let mut store = ExclusionStore::in_memory();
        for form in forms(5) {
            store.add(ExclusionRecord::now(form.form_id, form.word, "sv"));
        }

        let mut sampler = CandidateSampler::with_seed(forms(5), 1);
        assert!(sampler.next_eligible(&store, "sv").is_none());
        assert_eq!(sampler.drawn(), 5);
        assert_eq!(sampler.skipped_excluded(), 5);
        assert!(sampler.is_exhausted());
    }

    #[test]
    fn test_exclusion_is_per_language() {
        let mut store = ExclusionStore::in_memory();
        store.add(ExclusionRecord::now("L0-F1", "ord0", "da"));

        let mut sampler = CandidateSampler::with_seed(forms(1), 3);
        let form = sampler.next_eligible(&store, "sv").unwrap();
        assert_eq!(form.form_id, "L0-F1");
    }

    #[test]
    fn test_empty_result() {
        let mut sampler = CandidateSampler::new(Vec::new());
        assert!(sampler.is_empty());
        assert!(sampler.is_exhausted());
        assert!(sampler.draw().is_none());
    }
}
