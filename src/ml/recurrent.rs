// ============================================================
// Layer 5 — Recurrent Language Model Abstraction
// ============================================================
// Encoder and decoder share one shape:
//
//   token id ─► Embedding ─► Dropout ─► cell(state) ─► Dropout ─► Linear ─► logits
//
// Only the cell differs between the two model types, so the
// trainer is written once against this trait.

use burn::prelude::*;

/// Hyper-parameters shared by every recurrent model
#[derive(Config, Debug)]
pub struct RecurrentLmConfig {
    pub vocab_size: usize,
    pub n_units:    usize,
    #[config(default = 0.5)]
    pub dropout:    f64,
}

/// Hidden state carried between time steps.
/// `cell` is only present for LSTM models.
#[derive(Debug, Clone)]
pub struct RnnState<B: Backend> {
    pub hidden: Tensor<B, 2>,
    pub cell:   Option<Tensor<B, 2>>,
}

impl<B: Backend> RnnState<B> {
    pub fn zeros(batch_size: usize, n_units: usize, with_cell: bool, device: &B::Device) -> Self {
        let hidden = Tensor::zeros([batch_size, n_units], device);
        let cell   = with_cell.then(|| Tensor::zeros([batch_size, n_units], device));
        Self { hidden, cell }
    }

    /// Row-wise select: rows where `keep` is 1 take `next`, rows
    /// where it is 0 keep `self`. `keep` is `[batch, 1]`.
    pub fn blend(self, next: Self, keep: Tensor<B, 2>) -> Self {
        let drop = keep.ones_like() - keep.clone();
        let mix  = |old: Tensor<B, 2>, new: Tensor<B, 2>| new * keep.clone() + old * drop.clone();

        let hidden = mix(self.hidden, next.hidden);
        let cell   = match (self.cell, next.cell) {
            (Some(old), Some(new)) => Some(mix(old, new)),
            (_, new) => new,
        };
        Self { hidden, cell }
    }
}

/// A recurrent language model usable as encoder or decoder.
pub trait RecurrentLm<B: Backend>: Module<B> {
    fn init(config: &RecurrentLmConfig, device: &B::Device) -> Self;

    fn vocab_size(&self) -> usize;

    fn n_units(&self) -> usize;

    fn initial_state(&self, batch_size: usize, device: &B::Device) -> RnnState<B>;

    /// Advance one time step. `tokens` is `[batch]`; returns
    /// vocabulary logits `[batch, vocab]` and the next state.
    fn step(&self, tokens: Tensor<B, 1, Int>, state: RnnState<B>) -> (Tensor<B, 2>, RnnState<B>);

    /// Replace the word embedding matrix (`[vocab, n_units]`).
    fn with_word_embedding(self, weights: Tensor<B, 2>) -> Self;
}

#[cfg(test)]
mod tests {
    use super::*;
    use burn::backend::NdArray;

    type TestBackend = NdArray;

    #[test]
    fn test_blend_keeps_frozen_rows() {
        let device = Default::default();
        let old = RnnState::<TestBackend>::zeros(2, 3, true, &device);
        let new = RnnState {
            hidden: Tensor::ones([2, 3], &device),
            cell:   Some(Tensor::ones([2, 3], &device)),
        };
        let keep = Tensor::<TestBackend, 1>::from_floats([1.0, 0.0], &device).reshape([2, 1]);

        let out = old.blend(new, keep);
        let hidden: Vec<f32> = out.hidden.into_data().to_vec().unwrap();
        assert_eq!(hidden, vec![1.0, 1.0, 1.0, 0.0, 0.0, 0.0]);
        let cell: Vec<f32> = out.cell.unwrap().into_data().to_vec().unwrap();
        assert_eq!(cell, vec![1.0, 1.0, 1.0, 0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_zeros_without_cell() {
        let state = RnnState::<TestBackend>::zeros(4, 2, false, &Default::default());
        assert_eq!(state.hidden.dims(), [4, 2]);
        assert!(state.cell.is_none());
    }

    #[test]
    fn test_config_default_dropout() {
        let cfg = RecurrentLmConfig::new(10, 4);
        assert_eq!(cfg.dropout, 0.5);
        assert_eq!(cfg.with_dropout(0.0).dropout, 0.0);
    }
}
