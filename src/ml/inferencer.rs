// ============================================================
// Layer 5 — Inferencer
// ============================================================
// Greedy reply generation:
//
//   utterance ──encoder──► state ──decoder──► argmax ─┐
//                             ▲                       │
//                             └──── previous token ◄──┘
//
// Decoding starts from <eos> and stops when the decoder emits
// <eos> again or after `max_len` tokens.

use burn::prelude::*;

use crate::domain::dictionary::EOS_ID;
use crate::ml::classifier::encode;
use crate::ml::recurrent::RecurrentLm;

pub fn generate_reply<B, E, D>(
    encoder: &E,
    decoder: &D,
    source:  &[u32],
    max_len: usize,
    device:  &B::Device,
) -> Vec<u32>
where
    B: Backend,
    E: RecurrentLm<B>,
    D: RecurrentLm<B>,
{
    let mut state = if source.is_empty() {
        decoder.initial_state(1, device)
    } else {
        let ids: Vec<i32> = source.iter().map(|&x| x as i32).collect();
        let ids = Tensor::<B, 1, Int>::from_ints(ids.as_slice(), device).reshape([1, ids.len()]);
        encode(encoder, ids, &[source.len()])
    };

    let mut reply = Vec::with_capacity(max_len);
    let mut token = EOS_ID;
    for _ in 0..max_len {
        let input = Tensor::<B, 1, Int>::from_ints([token as i32], device);
        let (logits, next) = decoder.step(input, state);
        state = next;

        token = logits.argmax(1).reshape([1]).into_scalar().elem::<i64>() as u32;
        if token == EOS_ID {
            break;
        }
        reply.push(token);
    }

    tracing::trace!("greedy reply for {:?}: {:?}", source, reply);
    reply
}
