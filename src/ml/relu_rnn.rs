// ============================================================
// Layer 5 — ReLU RNN Language Model
// ============================================================
// Elman recurrence with a rectifier:
//
//   x_t = dropout(E[w_t])
//   h_t = relu(W_x x_t + W_h h_{t-1})
//   y_t = W_o dropout(h_t)

use burn::{
    module::Param,
    nn::{Dropout, DropoutConfig, Embedding, EmbeddingConfig, Linear, LinearConfig},
    prelude::*,
    tensor::activation::relu,
};

use crate::ml::recurrent::{RecurrentLm, RecurrentLmConfig, RnnState};

#[derive(Module, Debug)]
pub struct ReluRnnLm<B: Backend> {
    pub embed:      Embedding<B>,
    pub input:      Linear<B>,
    pub recurrent:  Linear<B>,
    pub output:     Linear<B>,
    pub dropout:    Dropout,
    pub vocab_size: usize,
    pub n_units:    usize,
}

impl<B: Backend> RecurrentLm<B> for ReluRnnLm<B> {
    fn init(config: &RecurrentLmConfig, device: &B::Device) -> Self {
        let n = config.n_units;
        Self {
            embed:      EmbeddingConfig::new(config.vocab_size, n).init(device),
            input:      LinearConfig::new(n, n).init(device),
            recurrent:  LinearConfig::new(n, n).with_bias(false).init(device),
            output:     LinearConfig::new(n, config.vocab_size).init(device),
            dropout:    DropoutConfig::new(config.dropout).init(),
            vocab_size: config.vocab_size,
            n_units:    n,
        }
    }

    fn vocab_size(&self) -> usize {
        self.vocab_size
    }

    fn n_units(&self) -> usize {
        self.n_units
    }

    fn initial_state(&self, batch_size: usize, device: &B::Device) -> RnnState<B> {
        RnnState::zeros(batch_size, self.n_units, false, device)
    }

    fn step(&self, tokens: Tensor<B, 1, Int>, state: RnnState<B>) -> (Tensor<B, 2>, RnnState<B>) {
        let [batch_size] = tokens.dims();
        let x = self
            .embed
            .forward(tokens.reshape([batch_size, 1]))
            .reshape([batch_size, self.n_units]);
        let x = self.dropout.forward(x);

        let hidden = relu(self.input.forward(x) + self.recurrent.forward(state.hidden));
        let logits = self.output.forward(self.dropout.forward(hidden.clone()));

        (logits, RnnState { hidden, cell: None })
    }

    fn with_word_embedding(mut self, weights: Tensor<B, 2>) -> Self {
        self.embed.weight = Param::from_tensor(weights);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use burn::backend::NdArray;

    type TestBackend = NdArray;

    fn model() -> ReluRnnLm<TestBackend> {
        let cfg = RecurrentLmConfig::new(7, 4).with_dropout(0.0);
        ReluRnnLm::init(&cfg, &Default::default())
    }

    #[test]
    fn test_step_shapes() {
        let model  = model();
        let device = Default::default();
        let state  = model.initial_state(3, &device);
        let tokens = Tensor::<TestBackend, 1, Int>::from_ints([0, 3, 6], &device);

        let (logits, state) = model.step(tokens, state);
        assert_eq!(logits.dims(), [3, 7]);
        assert_eq!(state.hidden.dims(), [3, 4]);
        assert!(state.cell.is_none());
    }

    #[test]
    fn test_hidden_state_is_non_negative() {
        let model  = model();
        let device = Default::default();
        let tokens = Tensor::<TestBackend, 1, Int>::from_ints([1, 2], &device);
        let (_, state) = model.step(tokens, model.initial_state(2, &device));

        let hidden: Vec<f32> = state.hidden.into_data().to_vec().unwrap();
        assert!(hidden.iter().all(|&h| h >= 0.0));
    }

    #[test]
    fn test_with_word_embedding_replaces_weights() {
        let device  = Default::default();
        let weights = Tensor::<TestBackend, 2>::ones([7, 4], &device);
        let model   = model().with_word_embedding(weights);

        let row: Vec<f32> = model.embed.weight.val().into_data().to_vec().unwrap();
        assert!(row.iter().all(|&w| w == 1.0));
    }
}
