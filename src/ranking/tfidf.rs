//! Character n-gram TF-IDF.
//!
//! Each whitespace separated word is padded with one space on both sides and
//! cut into n-grams for every `n` in `ngram_min..=ngram_max`; a padded word
//! shorter than `n` contributes itself once and stops the expansion. Term
//! weights are raw counts times a smoothed idf `ln((1 + N) / (1 + df)) + 1`,
//! and every row is L2 normalized.

use std::collections::HashMap;

use super::RankingError;

/// Norms below this are treated as zero vectors.
const NORM_EPSILON: f64 = 1e-12;

#[derive(Debug, Clone)]
pub struct CharNgramVectorizer {
    ngram_min: usize,
    ngram_max: usize,
}

impl CharNgramVectorizer {
    pub fn new(ngram_min: usize, ngram_max: usize) -> Result<Self, RankingError> {
        if ngram_min == 0 || ngram_min > ngram_max {
            return Err(RankingError::InvalidNgramRange {
                min: ngram_min,
                max: ngram_max,
            });
        }

        Ok(Self {
            ngram_min,
            ngram_max,
        })
    }

    /// Word-bounded character n-grams of `text`, lower-cased.
    pub fn analyze(&self, text: &str) -> Vec<String> {
        let lowered = text.to_lowercase();
        let mut ngrams = Vec::new();

        for word in lowered.split_whitespace() {
            let padded: Vec<char> = std::iter::once(' ')
                .chain(word.chars())
                .chain(std::iter::once(' '))
                .collect();
            let len = padded.len();

            for n in self.ngram_min..=self.ngram_max {
                let mut offset = 0;
                ngrams.push(padded[..n.min(len)].iter().collect());

                while offset + n < len {
                    offset += 1;
                    ngrams.push(padded[offset..offset + n].iter().collect());
                }

                if offset == 0 {
                    break;
                }
            }
        }

        ngrams
    }

    /// Fits the vocabulary and idf on `documents` and returns one normalized
    /// row per document, in input order.
    pub fn fit_transform(&self, documents: &[String]) -> Result<TfIdfMatrix, RankingError> {
        let mut vocabulary: HashMap<String, usize> = HashMap::new();
        let mut counts: Vec<HashMap<usize, f64>> = Vec::with_capacity(documents.len());

        for document in documents {
            let mut tf: HashMap<usize, f64> = HashMap::new();
            for ngram in self.analyze(document) {
                let next_id = vocabulary.len();
                let id = *vocabulary.entry(ngram).or_insert(next_id);
                *tf.entry(id).or_insert(0.0) += 1.0;
            }
            counts.push(tf);
        }

        if vocabulary.is_empty() {
            return Err(RankingError::EmptyVocabulary);
        }

        let mut df = vec![0usize; vocabulary.len()];
        for tf in &counts {
            for id in tf.keys() {
                df[*id] += 1;
            }
        }

        let n_documents = documents.len() as f64;
        let idf: Vec<f64> = df
            .iter()
            .map(|&df| ((1.0 + n_documents) / (1.0 + df as f64)).ln() + 1.0)
            .collect();

        let rows = counts
            .into_iter()
            .map(|tf| {
                SparseVector::from_entries(
                    tf.into_iter()
                        .map(|(id, count)| (id, count * idf[id]))
                        .collect(),
                )
                .normalized()
            })
            .collect();

        Ok(TfIdfMatrix { rows })
    }
}

/// Sparse vector with entries sorted by term id.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SparseVector {
    entries: Vec<(usize, f64)>,
}

impl SparseVector {
    pub fn from_entries(mut entries: Vec<(usize, f64)>) -> Self {
        entries.sort_by_key(|(id, _)| *id);
        entries.dedup_by(|next, prev| {
            if next.0 == prev.0 {
                prev.1 += next.1;
                true
            } else {
                false
            }
        });
        Self { entries }
    }

    pub fn norm(&self) -> f64 {
        self.entries.iter().map(|(_, w)| w * w).sum::<f64>().sqrt()
    }

    pub fn is_zero(&self) -> bool {
        self.norm() < NORM_EPSILON
    }

    pub fn normalized(self) -> Self {
        if self.is_zero() {
            return self;
        }
        let norm = self.norm();
        Self {
            entries: self
                .entries
                .into_iter()
                .map(|(id, w)| (id, w / norm))
                .collect(),
        }
    }

    pub fn dot(&self, other: &SparseVector) -> f64 {
        let (mut i, mut j) = (0, 0);
        let mut sum = 0.0;

        while i < self.entries.len() && j < other.entries.len() {
            let (a_id, a_w) = self.entries[i];
            let (b_id, b_w) = other.entries[j];
            match a_id.cmp(&b_id) {
                std::cmp::Ordering::Less => i += 1,
                std::cmp::Ordering::Greater => j += 1,
                std::cmp::Ordering::Equal => {
                    sum += a_w * b_w;
                    i += 1;
                    j += 1;
                }
            }
        }

        sum
    }
}

/// Cosine similarity clamped to `[0, 1]`; zero when either side is a zero vector.
pub fn cosine_similarity(a: &SparseVector, b: &SparseVector) -> f64 {
    let (norm_a, norm_b) = (a.norm(), b.norm());
    if norm_a < NORM_EPSILON || norm_b < NORM_EPSILON {
        return 0.0;
    }
    (a.dot(b) / (norm_a * norm_b)).clamp(0.0, 1.0)
}

#[derive(Debug, Clone)]
pub struct TfIdfMatrix {
    rows: Vec<SparseVector>,
}

impl TfIdfMatrix {
    pub fn row(&self, index: usize) -> Option<&SparseVector> {
        self.rows.get(index)
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.rows.len()
    }
}
