// ============================================================
// Layer 5 — ML / Model Layer (Burn)
// ============================================================
// All model code lives here:
//
//   recurrent.rs  — RecurrentLm trait, RnnState, model config
//   relu_rnn.rs   — Elman RNN with ReLU
//   lstm.rs       — LSTM
//   classifier.rs — batch encoding and masked cross-entropy
//   trainer.rs    — decoder and encoder training loops
//   inferencer.rs — greedy reply generation
//   word2vec.rs   — skip-gram word vectors for embedding init

/// Shared recurrent language-model interface
pub mod recurrent;

pub mod relu_rnn;

pub mod lstm;

/// Encoding and loss over padded batches
pub mod classifier;

/// Training loops with checkpointing
pub mod trainer;

/// Greedy decoding
pub mod inferencer;

/// Word-vector model
pub mod word2vec;
