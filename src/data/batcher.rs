// ============================================================
// Layer 4 — Batchers
// ============================================================
// Implement Burn's Batcher trait for the three training tasks.
//
// Sequences inside one batch have different lengths, so every
// row is right-padded with <pad> (id 0) to the longest row:
//
//   [w1, w2, w3]        [w1, w2, w3]
//   [w1]           →    [w1, <pad>, <pad>]
//
// The loss ignores <pad> targets, and the encoder freezes each
// row's state once it has consumed that row's real tokens.

use burn::{
    data::dataloader::batcher::Batcher,
    prelude::*,
};
use rand::{distributions::WeightedIndex, prelude::Distribution};

use crate::data::dataset::{PairSample, SentenceSample, SkipGramSample};
use crate::domain::dictionary::{EOS_ID, PAD_ID};

/// Flatten `rows` into a `[rows.len(), width]` padded id buffer.
fn pad_rows(rows: &[Vec<u32>]) -> (Vec<i32>, usize) {
    let width = rows.iter().map(Vec::len).max().unwrap_or(0).max(1);
    let mut flat = Vec::with_capacity(rows.len() * width);
    for row in rows {
        flat.extend(row.iter().map(|&x| x as i32));
        flat.extend(std::iter::repeat(PAD_ID as i32).take(width - row.len()));
    }
    (flat, width)
}

fn int_tensor<B: Backend>(rows: &[Vec<u32>], device: &B::Device) -> Tensor<B, 2, Int> {
    let (flat, width) = pad_rows(rows);
    Tensor::<B, 1, Int>::from_ints(flat.as_slice(), device).reshape([rows.len(), width])
}

/// `[<eos>, w1..wn]` → `[w1..wn, <eos>]`
fn shift_with_eos(tokens: &[u32]) -> (Vec<u32>, Vec<u32>) {
    let mut input = Vec::with_capacity(tokens.len() + 1);
    input.push(EOS_ID);
    input.extend_from_slice(tokens);

    let mut target = tokens.to_vec();
    target.push(EOS_ID);
    (input, target)
}

// ─── PairBatcher ──────────────────────────────────────────────────────────────
#[derive(Debug, Clone)]
pub struct PairBatch<B: Backend> {
    /// Utterance ids — `[batch, src_len]`
    pub source: Tensor<B, 2, Int>,
    /// True (unpadded) length of each utterance
    pub source_lengths: Vec<usize>,
    /// `[<eos>, reply]` — `[batch, tgt_len]`
    pub decoder_input: Tensor<B, 2, Int>,
    /// `[reply, <eos>]` — `[batch, tgt_len]`
    pub decoder_target: Tensor<B, 2, Int>,
}

#[derive(Clone, Debug)]
pub struct PairBatcher<B: Backend> {
    pub device: B::Device,
}

impl<B: Backend> PairBatcher<B> {
    pub fn new(device: B::Device) -> Self {
        Self { device }
    }
}

impl<B: Backend> Batcher<PairSample, PairBatch<B>> for PairBatcher<B> {
    fn batch(&self, items: Vec<PairSample>) -> PairBatch<B> {
        let sources: Vec<Vec<u32>> = items.iter().map(|s| s.source.clone()).collect();
        let source_lengths = sources.iter().map(Vec::len).collect();

        let (inputs, targets): (Vec<_>, Vec<_>) =
            items.iter().map(|s| shift_with_eos(&s.target)).unzip();

        PairBatch {
            source:         int_tensor(&sources, &self.device),
            source_lengths,
            decoder_input:  int_tensor(&inputs, &self.device),
            decoder_target: int_tensor(&targets, &self.device),
        }
    }
}

// ─── SentenceBatcher ──────────────────────────────────────────────────────────
#[derive(Debug, Clone)]
pub struct SentenceBatch<B: Backend> {
    pub input:  Tensor<B, 2, Int>,
    pub target: Tensor<B, 2, Int>,
}

#[derive(Clone, Debug)]
pub struct SentenceBatcher<B: Backend> {
    pub device: B::Device,
}

impl<B: Backend> SentenceBatcher<B> {
    pub fn new(device: B::Device) -> Self {
        Self { device }
    }
}

impl<B: Backend> Batcher<SentenceSample, SentenceBatch<B>> for SentenceBatcher<B> {
    fn batch(&self, items: Vec<SentenceSample>) -> SentenceBatch<B> {
        let (inputs, targets): (Vec<_>, Vec<_>) =
            items.iter().map(|s| shift_with_eos(&s.tokens)).unzip();

        SentenceBatch {
            input:  int_tensor(&inputs, &self.device),
            target: int_tensor(&targets, &self.device),
        }
    }
}

// ─── SkipGramBatcher ──────────────────────────────────────────────────────────
#[derive(Debug, Clone)]
pub struct SkipGramBatch<B: Backend> {
    /// `[batch]`
    pub centers: Tensor<B, 1, Int>,
    /// `[batch]`
    pub contexts: Tensor<B, 1, Int>,
    /// Noise words drawn per pair — `[batch, negative]`
    pub negatives: Tensor<B, 2, Int>,
}

/// Draws `negative` noise words per pair from the smoothed unigram
/// distribution.
#[derive(Clone, Debug)]
pub struct SkipGramBatcher<B: Backend> {
    pub device: B::Device,
    noise:      WeightedIndex<f64>,
    negative:   usize,
}

impl<B: Backend> SkipGramBatcher<B> {
    pub fn new(device: B::Device, noise: WeightedIndex<f64>, negative: usize) -> Self {
        Self { device, noise, negative }
    }
}

impl<B: Backend> Batcher<SkipGramSample, SkipGramBatch<B>> for SkipGramBatcher<B> {
    fn batch(&self, items: Vec<SkipGramSample>) -> SkipGramBatch<B> {
        let batch_size = items.len();
        let centers: Vec<i32>  = items.iter().map(|s| s.center as i32).collect();
        let contexts: Vec<i32> = items.iter().map(|s| s.context as i32).collect();

        let mut rng = rand::thread_rng();
        let negatives: Vec<i32> = (0..batch_size * self.negative)
            .map(|_| self.noise.sample(&mut rng) as i32)
            .collect();

        SkipGramBatch {
            centers:   Tensor::<B, 1, Int>::from_ints(centers.as_slice(), &self.device),
            contexts:  Tensor::<B, 1, Int>::from_ints(contexts.as_slice(), &self.device),
            negatives: Tensor::<B, 1, Int>::from_ints(negatives.as_slice(), &self.device)
                .reshape([batch_size, self.negative]),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use burn::backend::NdArray;

    type TestBackend = NdArray;

    fn ids<const D: usize>(t: Tensor<TestBackend, D, Int>) -> Vec<i64> {
        t.into_data().convert::<i64>().to_vec::<i64>().unwrap()
    }

    #[test]
    fn test_pad_rows_right_pads_with_pad_id() {
        let (flat, width) = pad_rows(&[vec![5, 6, 7], vec![8]]);
        assert_eq!(width, 3);
        assert_eq!(flat, vec![5, 6, 7, 8, 0, 0]);
    }

    #[test]
    fn test_shift_with_eos() {
        let (input, target) = shift_with_eos(&[5, 6]);
        assert_eq!(input, vec![EOS_ID, 5, 6]);
        assert_eq!(target, vec![5, 6, EOS_ID]);
    }

    #[test]
    fn test_pair_batch_shapes_and_lengths() {
        let batcher = PairBatcher::<TestBackend>::new(Default::default());
        let batch = batcher.batch(vec![
            PairSample { source: vec![3, 4, 5], target: vec![6] },
            PairSample { source: vec![7], target: vec![8, 9] },
        ]);

        assert_eq!(batch.source.dims(), [2, 3]);
        assert_eq!(batch.source_lengths, vec![3, 1]);
        assert_eq!(batch.decoder_input.dims(), [2, 3]);
        assert_eq!(ids(batch.decoder_input), vec![2, 6, 0, 2, 8, 9]);
        assert_eq!(ids(batch.decoder_target), vec![6, 2, 0, 8, 9, 2]);
    }

    #[test]
    fn test_skipgram_batch_negatives_shape() {
        let noise   = WeightedIndex::new(vec![0.0, 0.0, 0.0, 1.0, 1.0]).unwrap();
        let batcher = SkipGramBatcher::<TestBackend>::new(Default::default(), noise, 4);
        let batch = batcher.batch(vec![
            SkipGramSample { center: 3, context: 4 },
            SkipGramSample { center: 4, context: 3 },
        ]);

        assert_eq!(batch.negatives.dims(), [2, 4]);
        assert!(ids(batch.negatives).iter().all(|&id| id == 3 || id == 4));
    }
}
