// ============================================================
// Layer 5 — Word2Vec (skip-gram, negative sampling)
// ============================================================
// Learns one vector per word from raw sentences. For every word
// w_i and every neighbour w_j inside a randomly shrunk window:
//
//   loss = −log σ(u_i · v_j) − Σ_k log σ(−u_i · v_k)
//
// where u are input ("word") vectors, v output ("context")
// vectors and v_k noise words drawn from unigram^0.75.
// Only the input vectors are kept afterwards.

use anyhow::{bail, Result};
use burn::{
    data::dataloader::DataLoaderBuilder,
    nn::{Embedding, EmbeddingConfig, Initializer},
    optim::{AdamConfig, GradientsParams, Optimizer},
    prelude::*,
    tensor::{activation::log_sigmoid, backend::AutodiffBackend},
};
use rand::{distributions::WeightedIndex, Rng};
use std::collections::HashMap;

use crate::data::batcher::SkipGramBatcher;
use crate::data::dataset::{SkipGramDataset, SkipGramSample};
use crate::domain::word_vectors::WordVectors;

#[derive(Config, Debug)]
pub struct Word2VecConfig {
    /// Vector size
    pub dim: usize,
    /// Maximum distance between a word and its context word
    #[config(default = 5)]
    pub window: usize,
    /// Words seen fewer times are dropped from the vocabulary
    #[config(default = 1)]
    pub min_count: usize,
    /// Noise words per positive pair
    #[config(default = 5)]
    pub negative: usize,
    #[config(default = 5)]
    pub epochs: usize,
    #[config(default = 0.01)]
    pub learning_rate: f64,
    #[config(default = 128)]
    pub batch_size: usize,
}

#[derive(Module, Debug)]
pub struct SkipGramModel<B: Backend> {
    pub input:  Embedding<B>,
    pub output: Embedding<B>,
}

impl<B: Backend> SkipGramModel<B> {
    pub fn new(vocab_size: usize, dim: usize, device: &B::Device) -> Self {
        let bound = 0.5 / dim as f64;
        Self {
            input: EmbeddingConfig::new(vocab_size, dim)
                .with_initializer(Initializer::Uniform { min: -bound, max: bound })
                .init(device),
            output: EmbeddingConfig::new(vocab_size, dim)
                .with_initializer(Initializer::Zeros)
                .init(device),
        }
    }

    /// centers, contexts: `[batch]`; negatives: `[batch, k]`
    pub fn forward_loss(
        &self,
        centers:   Tensor<B, 1, Int>,
        contexts:  Tensor<B, 1, Int>,
        negatives: Tensor<B, 2, Int>,
    ) -> Tensor<B, 1> {
        let [batch_size] = centers.dims();
        let [_, k]       = negatives.dims();

        let u = self.input.forward(centers.reshape([batch_size, 1])); // [b, 1, d]
        let v = self.output.forward(contexts.reshape([batch_size, 1])); // [b, 1, d]
        let noise = self.output.forward(negatives); // [b, k, d]

        let positive = (u.clone() * v).sum_dim(2).reshape([batch_size]);
        let negative = (u * noise).sum_dim(2).reshape([batch_size, k]);

        let positive = log_sigmoid(positive).mean();
        let negative = log_sigmoid(negative.neg()).sum_dim(1).mean();
        (positive + negative).neg()
    }
}

/// Training vocabulary: words in descending frequency order.
struct Vocab {
    words:  Vec<String>,
    counts: Vec<usize>,
    index:  HashMap<String, u32>,
}

impl Vocab {
    fn build(sentences: &[Vec<String>], min_count: usize) -> Self {
        let mut freq: HashMap<&str, usize> = HashMap::new();
        for token in sentences.iter().flatten() {
            *freq.entry(token.as_str()).or_insert(0) += 1;
        }
        let mut entries: Vec<(&str, usize)> =
            freq.into_iter().filter(|(_, n)| *n >= min_count).collect();
        entries.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));

        let words: Vec<String> = entries.iter().map(|(w, _)| w.to_string()).collect();
        let counts = entries.iter().map(|(_, n)| *n).collect();
        let index  = words
            .iter()
            .enumerate()
            .map(|(i, w)| (w.clone(), i as u32))
            .collect();
        Self { words, counts, index }
    }

    fn len(&self) -> usize {
        self.words.len()
    }

    fn noise_distribution(&self) -> Result<WeightedIndex<f64>> {
        let weights = self.counts.iter().map(|&c| (c as f64).powf(0.75));
        Ok(WeightedIndex::new(weights)?)
    }
}

/// (center, context) pairs with gensim-style dynamic windows:
/// each position samples an effective window in `1..=window`.
fn skipgram_pairs<R: Rng>(
    sentences: &[Vec<String>],
    vocab:     &Vocab,
    window:    usize,
    rng:       &mut R,
) -> Vec<SkipGramSample> {
    let mut pairs = Vec::new();
    for sentence in sentences {
        let ids: Vec<u32> = sentence
            .iter()
            .filter_map(|w| vocab.index.get(w).copied())
            .collect();

        for (i, &center) in ids.iter().enumerate() {
            let reach = rng.gen_range(1..=window.max(1));
            let lo    = i.saturating_sub(reach);
            let hi    = (i + reach + 1).min(ids.len());
            for (j, &context) in ids.iter().enumerate().take(hi).skip(lo) {
                if j != i {
                    pairs.push(SkipGramSample { center, context });
                }
            }
        }
    }
    pairs
}

pub struct Word2Vec {
    config: Word2VecConfig,
}

impl Word2Vec {
    pub fn new(config: Word2VecConfig) -> Self {
        Self { config }
    }

    /// Train on `sentences` and return the learned input vectors.
    pub fn train<B: AutodiffBackend>(
        &self,
        sentences: &[Vec<String>],
        device:    &B::Device,
    ) -> Result<WordVectors> {
        let cfg   = &self.config;
        let vocab = Vocab::build(sentences, cfg.min_count);
        if vocab.words.is_empty() {
            bail!("word2vec: no word occurs at least {} times", cfg.min_count);
        }

        let pairs = skipgram_pairs(sentences, &vocab, cfg.window, &mut rand::thread_rng());
        tracing::info!(
            "word2vec: {} words, {} training pairs, dim={}, window={}, negative={}",
            vocab.len(),
            pairs.len(),
            cfg.dim,
            cfg.window,
            cfg.negative
        );

        let mut model = SkipGramModel::<B>::new(vocab.len(), cfg.dim, device);

        if pairs.is_empty() {
            tracing::warn!("word2vec: corpus has no context pairs, vectors stay at their initial values");
        } else {
            let batcher = SkipGramBatcher::<B>::new(
                device.clone(),
                vocab.noise_distribution()?,
                cfg.negative.max(1),
            );
            let loader = DataLoaderBuilder::new(batcher)
                .batch_size(cfg.batch_size)
                .shuffle(42)
                .num_workers(1)
                .build(SkipGramDataset::new(pairs));

            let mut optim = AdamConfig::new().init();
            for epoch in 1..=cfg.epochs {
                let mut loss_sum = 0.0f64;
                let mut batches  = 0usize;
                for batch in loader.iter() {
                    let loss = model.forward_loss(batch.centers, batch.contexts, batch.negatives);
                    loss_sum += loss.clone().into_scalar().elem::<f64>();
                    batches  += 1;

                    let grads = GradientsParams::from_grads(loss.backward(), &model);
                    model = optim.step(cfg.learning_rate, model, grads);
                }
                tracing::info!(
                    "word2vec epoch {}/{} | loss={:.4}",
                    epoch,
                    cfg.epochs,
                    loss_sum / batches.max(1) as f64
                );
            }
        }

        let vectors = model
            .input
            .weight
            .val()
            .into_data()
            .convert::<f32>()
            .to_vec::<f32>()
            .map_err(|e| anyhow::anyhow!("word2vec: cannot read embedding weights: {e:?}"))?;

        Ok(WordVectors::new(cfg.dim, vocab.words, vectors))
    }
}
