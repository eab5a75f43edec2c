// ============================================================
// Layer 5 — Sequence Classifier
// ============================================================
// Wraps a RecurrentLm with the two operations the trainers need:
//
//   encode        — consume a padded batch, return the final state
//                   of every row (frozen after its true length)
//   sequence_loss — teacher-forced softmax cross-entropy, averaged
//                   over non-<pad> target tokens

use burn::{prelude::*, tensor::activation::log_softmax};

use crate::domain::dictionary::PAD_ID;
use crate::ml::recurrent::{RecurrentLm, RnnState};

fn column<B: Backend>(ids: &Tensor<B, 2, Int>, t: usize) -> Tensor<B, 1, Int> {
    let [batch_size, _] = ids.dims();
    ids.clone().slice([0..batch_size, t..t + 1]).reshape([batch_size])
}

/// Run `source` (`[batch, len]`) through `model` from a zero state.
pub fn encode<B: Backend, M: RecurrentLm<B>>(
    model:   &M,
    source:  Tensor<B, 2, Int>,
    lengths: &[usize],
) -> RnnState<B> {
    let [batch_size, seq_len] = source.dims();
    let device    = source.device();
    let mut state = model.initial_state(batch_size, &device);

    for t in 0..seq_len {
        let (_, next) = model.step(column(&source, t), state.clone());

        if lengths.iter().all(|&len| t < len) {
            state = next;
            continue;
        }
        let keep: Vec<f32> = lengths
            .iter()
            .map(|&len| if t < len { 1.0 } else { 0.0 })
            .collect();
        let keep = Tensor::<B, 1>::from_floats(keep.as_slice(), &device).reshape([batch_size, 1]);
        state = state.blend(next, keep);
    }
    state
}

/// Step `model` over every column of `inputs`, collecting logits
/// into `[batch, len, vocab]`.
pub fn unroll<B: Backend, M: RecurrentLm<B>>(
    model:     &M,
    inputs:    Tensor<B, 2, Int>,
    mut state: RnnState<B>,
) -> (Tensor<B, 3>, RnnState<B>) {
    let [batch_size, seq_len] = inputs.dims();
    let vocab = model.vocab_size();

    let mut steps = Vec::with_capacity(seq_len);
    for t in 0..seq_len {
        let (logits, next) = model.step(column(&inputs, t), state);
        steps.push(logits.reshape([batch_size, 1, vocab]));
        state = next;
    }
    (Tensor::cat(steps, 1), state)
}

/// Mean negative log-likelihood of `targets` given `inputs`,
/// ignoring <pad> targets. Returns a one-element tensor.
pub fn sequence_loss<B: Backend, M: RecurrentLm<B>>(
    model:   &M,
    inputs:  Tensor<B, 2, Int>,
    targets: Tensor<B, 2, Int>,
    state:   RnnState<B>,
) -> Tensor<B, 1> {
    let [batch_size, seq_len] = targets.dims();
    let n     = batch_size * seq_len;
    let vocab = model.vocab_size();

    let (logits, _) = unroll(model, inputs, state);
    let targets = targets.reshape([n]);

    let log_probs = log_softmax(logits.reshape([n, vocab]), 1);
    let picked    = log_probs.gather(1, targets.clone().reshape([n, 1])).reshape([n]);
    let mask      = targets.not_equal_elem(PAD_ID as i32).float();

    let count = mask.clone().sum().clamp_min(1.0);
    (picked * mask).sum().neg() / count
}
