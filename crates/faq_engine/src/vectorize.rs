//! TF-IDF vector space over the normalized corpus.
//!
//! Weighting mirrors the usual vectorizer defaults: raw term counts, smoothed
//! inverse document frequency `ln((1 + n) / (1 + df)) + 1`, and L2-normalized
//! rows. Dimensions are assigned in lexicographic term order.
//!
//! The model is refit from scratch on every [`VectorSpaceModel::rebuild`]: a
//! new document shifts every term's idf, so earlier vectors go stale. That
//! makes each learned interaction cost O(corpus size).

use std::collections::{BTreeSet, HashMap};

use lazy_static::lazy_static;
use regex::Regex;
use tracing::debug;

use crate::normalize::Normalizer;

lazy_static! {
    static ref TERM_PATTERN: Regex = Regex::new(r"\b\w\w+\b").expect("term pattern is valid");
}

fn terms(text: &str) -> impl Iterator<Item = String> + '_ {
    TERM_PATTERN
        .find_iter(text)
        .map(|m| m.as_str().to_lowercase())
}

/// Sparse, L2-normalized term vector. Entries are sorted by dimension.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SparseVector {
    entries: Vec<(usize, f32)>,
}

impl SparseVector {
    /// Builds a unit vector from raw weights; all-zero input stays zero.
    pub fn normalized(mut entries: Vec<(usize, f32)>) -> Self {
        entries.retain(|(_, w)| *w != 0.0);
        entries.sort_by_key(|(idx, _)| *idx);

        let norm = entries.iter().map(|(_, w)| w * w).sum::<f32>().sqrt();
        if norm > 0.0 {
            for (_, w) in &mut entries {
                *w /= norm;
            }
        }

        Self { entries }
    }

    pub fn entries(&self) -> &[(usize, f32)] {
        &self.entries
    }

    pub fn is_zero(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn norm(&self) -> f32 {
        self.entries.iter().map(|(_, w)| w * w).sum::<f32>().sqrt()
    }

    pub fn dot(&self, other: &SparseVector) -> f32 {
        let (mut i, mut j) = (0, 0);
        let mut dot = 0.0f32;

        while i < self.entries.len() && j < other.entries.len() {
            let (a_idx, a_w) = self.entries[i];
            let (b_idx, b_w) = other.entries[j];
            match a_idx.cmp(&b_idx) {
                std::cmp::Ordering::Less => i += 1,
                std::cmp::Ordering::Greater => j += 1,
                std::cmp::Ordering::Equal => {
                    dot += a_w * b_w;
                    i += 1;
                    j += 1;
                }
            }
        }

        dot
    }
}

#[derive(Debug, Clone, Default)]
pub struct VectorSpaceModel {
    vocabulary: HashMap<String, usize>,
    idf: Vec<f32>,
    faq_vectors: Vec<SparseVector>,
    interaction_vectors: Vec<SparseVector>,
    fitted: bool,
}

impl VectorSpaceModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Refits vocabulary and idf over the normalized curated questions
    /// followed by the normalized interaction questions, then re-projects
    /// both batches.
    pub fn rebuild<'a, C, I>(&mut self, normalizer: &Normalizer, curated: C, interactions: I)
    where
        C: IntoIterator<Item = &'a str>,
        I: IntoIterator<Item = &'a str>,
    {
        let faq_docs: Vec<String> = curated.into_iter().map(|q| normalizer.normalize(q)).collect();
        let interaction_docs: Vec<String> = interactions
            .into_iter()
            .map(|q| normalizer.normalize(q))
            .collect();

        self.fit(faq_docs.iter().chain(interaction_docs.iter()).map(String::as_str));

        self.faq_vectors = faq_docs.iter().map(|d| self.project(d)).collect();
        self.interaction_vectors = interaction_docs.iter().map(|d| self.project(d)).collect();

        debug!(
            vocabulary = self.vocabulary.len(),
            faq_docs = self.faq_vectors.len(),
            interaction_docs = self.interaction_vectors.len(),
            "vector space rebuilt"
        );
    }

    fn fit<'a>(&mut self, documents: impl Iterator<Item = &'a str>) {
        let mut doc_freq: HashMap<String, usize> = HashMap::new();
        let mut n_docs = 0usize;

        for doc in documents {
            n_docs += 1;
            let unique: BTreeSet<String> = terms(doc).collect();
            for term in unique {
                *doc_freq.entry(term).or_insert(0) += 1;
            }
        }

        let ordered: BTreeSet<&String> = doc_freq.keys().collect();
        self.vocabulary = ordered
            .iter()
            .enumerate()
            .map(|(idx, term)| ((*term).clone(), idx))
            .collect();

        self.idf = vec![0.0; self.vocabulary.len()];
        for (term, &idx) in &self.vocabulary {
            let df = doc_freq[term] as f64;
            let idf = ((1.0 + n_docs as f64) / (1.0 + df)).ln() + 1.0;
            self.idf[idx] = idf as f32;
        }

        self.fitted = true;
    }

    /// Projects already-normalized text into the current space. Unknown terms
    /// are ignored, so text with no known terms yields the zero vector.
    pub fn project(&self, normalized: &str) -> SparseVector {
        let mut counts: HashMap<usize, f32> = HashMap::new();
        for term in terms(normalized) {
            if let Some(&idx) = self.vocabulary.get(&term) {
                *counts.entry(idx).or_insert(0.0) += 1.0;
            }
        }

        SparseVector::normalized(
            counts
                .into_iter()
                .map(|(idx, tf)| (idx, tf * self.idf[idx]))
                .collect(),
        )
    }

    pub fn is_fitted(&self) -> bool {
        self.fitted
    }

    pub fn vocabulary_len(&self) -> usize {
        self.vocabulary.len()
    }

    pub fn term_index(&self, term: &str) -> Option<usize> {
        self.vocabulary.get(term).copied()
    }

    pub fn idf(&self, term: &str) -> Option<f32> {
        self.term_index(term).map(|idx| self.idf[idx])
    }

    pub fn faq_vectors(&self) -> &[SparseVector] {
        &self.faq_vectors
    }

    pub fn interaction_vectors(&self) -> &[SparseVector] {
        &self.interaction_vectors
    }
}
