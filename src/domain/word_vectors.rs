// ============================================================
// Layer 3 — Word Vectors
// ============================================================
// Dense vectors learned by the word-vector model, keyed by word.
// Used once: to seed the decoder's embedding matrix when no
// trained decoder checkpoint exists.

use rand::Rng;
use std::collections::HashMap;

use crate::domain::dictionary::Dictionary;

#[derive(Debug, Clone, PartialEq)]
pub struct WordVectors {
    dim:     usize,
    words:   Vec<String>,
    index:   HashMap<String, usize>,
    /// Row-major `[words.len(), dim]`
    vectors: Vec<f32>,
}

/// Initial embedding matrix for a dictionary, plus the tokens that
/// had no learned vector.
#[derive(Debug, Clone)]
pub struct EmbeddingInit {
    pub weights:   Vec<f32>,
    pub rows:      usize,
    pub cols:      usize,
    pub not_found: Vec<String>,
}

impl WordVectors {
    /// `vectors` must hold `words.len() * dim` values.
    pub fn new(dim: usize, words: Vec<String>, vectors: Vec<f32>) -> Self {
        assert_eq!(
            vectors.len(),
            words.len() * dim,
            "word vector matrix does not match {} words x {} dims",
            words.len(),
            dim
        );
        let index = words
            .iter()
            .enumerate()
            .map(|(i, w)| (w.clone(), i))
            .collect();
        Self { dim, words, index, vectors }
    }

    pub fn dim(&self) -> usize {
        self.dim
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn contains(&self, word: &str) -> bool {
        self.index.contains_key(word)
    }

    pub fn get(&self, word: &str) -> Option<&[f32]> {
        self.index
            .get(word)
            .map(|&i| &self.vectors[i * self.dim..(i + 1) * self.dim])
    }

    /// Words paired with their vectors, in training-vocabulary order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[f32])> {
        self.words
            .iter()
            .zip(self.vectors.chunks(self.dim.max(1)))
            .map(|(w, v)| (w.as_str(), v))
    }

    /// Build a `[dictionary.len(), dim]` matrix. Row `id` holds the
    /// learned vector of `dictionary[id]`, or uniform noise in
    /// `[0, 1)` when the word was never seen.
    pub fn embedding_matrix<R: Rng>(&self, dictionary: &Dictionary, rng: &mut R) -> EmbeddingInit {
        let rows = dictionary.len();
        let mut weights   = Vec::with_capacity(rows * self.dim);
        let mut not_found = Vec::new();

        for token in dictionary.tokens() {
            match self.get(token) {
                Some(v) => weights.extend_from_slice(v),
                None => {
                    weights.extend((0..self.dim).map(|_| rng.gen::<f32>()));
                    not_found.push(token.to_string());
                }
            }
        }

        EmbeddingInit { weights, rows, cols: self.dim, not_found }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::dictionary::{EOS_TOKEN, PAD_TOKEN, UNK_TOKEN};
    use rand::{rngs::StdRng, SeedableRng};

    fn vectors() -> WordVectors {
        WordVectors::new(
            2,
            vec!["hello".into(), "world".into()],
            vec![-1.0, -2.0, -3.0, -4.0],
        )
    }

    #[test]
    fn test_lookup() {
        let wv = vectors();
        assert_eq!(wv.get("world"), Some(&[-3.0, -4.0][..]));
        assert!(wv.get("missing").is_none());
        assert!(wv.contains("hello"));
    }

    #[test]
    fn test_embedding_matrix_copies_known_rows() {
        let wv   = vectors();
        let dict = Dictionary::build(&[vec!["hello", "world", "hello"]], 1);
        let mut rng = StdRng::seed_from_u64(7);
        let init = wv.embedding_matrix(&dict, &mut rng);

        assert_eq!(init.rows, dict.len());
        assert_eq!(init.cols, 2);
        assert_eq!(init.weights.len(), dict.len() * 2);

        let hello = dict.id("hello").unwrap() as usize;
        assert_eq!(&init.weights[hello * 2..hello * 2 + 2], &[-1.0, -2.0]);
    }

    #[test]
    fn test_embedding_matrix_reports_unmatched_tokens() {
        let wv   = vectors();
        let dict = Dictionary::build(&[vec!["hello", "world", "unseen"]], 1);
        let mut rng = StdRng::seed_from_u64(7);
        let init = wv.embedding_matrix(&dict, &mut rng);

        assert_eq!(init.not_found, vec![PAD_TOKEN, UNK_TOKEN, EOS_TOKEN, "unseen"]);

        let unseen = dict.id("unseen").unwrap() as usize;
        for &x in &init.weights[unseen * 2..unseen * 2 + 2] {
            assert!((0.0..1.0).contains(&x));
        }
    }
}
