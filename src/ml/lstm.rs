// ============================================================
// Layer 5 — LSTM Language Model
// ============================================================
//   [i, f, g, o] = W_x x_t + W_h h_{t-1}
//   c_t = σ(f) ⊙ c_{t-1} + σ(i) ⊙ tanh(g)
//   h_t = σ(o) ⊙ tanh(c_t)

use burn::{
    module::Param,
    nn::{Dropout, DropoutConfig, Embedding, EmbeddingConfig, Linear, LinearConfig},
    prelude::*,
    tensor::activation::sigmoid,
};

use crate::ml::recurrent::{RecurrentLm, RecurrentLmConfig, RnnState};

#[derive(Module, Debug)]
pub struct LstmLm<B: Backend> {
    pub embed:      Embedding<B>,
    /// Input-to-gates projection, `n_units → 4·n_units`
    pub input:      Linear<B>,
    /// Hidden-to-gates projection, `n_units → 4·n_units`
    pub recurrent:  Linear<B>,
    pub output:     Linear<B>,
    pub dropout:    Dropout,
    pub vocab_size: usize,
    pub n_units:    usize,
}

impl<B: Backend> RecurrentLm<B> for LstmLm<B> {
    fn init(config: &RecurrentLmConfig, device: &B::Device) -> Self {
        let n = config.n_units;
        Self {
            embed:      EmbeddingConfig::new(config.vocab_size, n).init(device),
            input:      LinearConfig::new(n, 4 * n).init(device),
            recurrent:  LinearConfig::new(n, 4 * n).with_bias(false).init(device),
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
        RnnState::zeros(batch_size, self.n_units, true, device)
    }

    fn step(&self, tokens: Tensor<B, 1, Int>, state: RnnState<B>) -> (Tensor<B, 2>, RnnState<B>) {
        let [batch_size] = tokens.dims();
        let x = self
            .embed
            .forward(tokens.reshape([batch_size, 1]))
            .reshape([batch_size, self.n_units]);
        let x = self.dropout.forward(x);

        let prev_cell = match state.cell {
            Some(c) => c,
            None => Tensor::zeros([batch_size, self.n_units], &x.device()),
        };

        let n     = self.n_units;
        let gates = self.input.forward(x) + self.recurrent.forward(state.hidden);
        let i = gates.clone().narrow(1, 0, n);
        let f = gates.clone().narrow(1, n, n);
        let g = gates.clone().narrow(1, 2 * n, n);
        let o = gates.narrow(1, 3 * n, n);

        let cell   = sigmoid(f) * prev_cell + sigmoid(i) * g.tanh();
        let hidden = sigmoid(o) * cell.clone().tanh();
        let logits = self.output.forward(self.dropout.forward(hidden.clone()));

        (logits, RnnState { hidden, cell: Some(cell) })
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

    fn model() -> LstmLm<TestBackend> {
        let cfg = RecurrentLmConfig::new(6, 5).with_dropout(0.0);
        LstmLm::init(&cfg, &Default::default())
    }

    #[test]
    fn test_step_shapes_and_cell_state() {
        let model  = model();
        let device = Default::default();
        let tokens = Tensor::<TestBackend, 1, Int>::from_ints([0, 5], &device);

        let (logits, state) = model.step(tokens, model.initial_state(2, &device));
        assert_eq!(logits.dims(), [2, 6]);
        assert_eq!(state.hidden.dims(), [2, 5]);
        assert_eq!(state.cell.map(|c| c.dims()), Some([2, 5]));
    }

    #[test]
    fn test_hidden_is_bounded() {
        let model  = model();
        let device = Default::default();
        let mut state = model.initial_state(1, &device);
        for tok in [1, 2, 3, 4] {
            let tokens = Tensor::<TestBackend, 1, Int>::from_ints([tok], &device);
            state = model.step(tokens, state).1;
        }
        let hidden: Vec<f32> = state.hidden.into_data().to_vec().unwrap();
        assert!(hidden.iter().all(|h| h.abs() < 1.0));
    }

    #[test]
    fn test_step_accepts_state_without_cell() {
        let model  = model();
        let device = Default::default();
        let state  = RnnState::zeros(1, 5, false, &device);
        let tokens = Tensor::<TestBackend, 1, Int>::from_ints([2], &device);
        let (_, state) = model.step(tokens, state);
        assert!(state.cell.is_some());
    }
}
