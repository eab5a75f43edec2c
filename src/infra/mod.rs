// ============================================================
// Layer 6 — Infrastructure Layer
// ============================================================
// Everything that touches the filesystem:
//
//   config_file.rs        — INI config → TrainConfig
//   dictionary_store.rs   — Dictionary ↔ tokenizer JSON
//   word_vectors_store.rs — WordVectors ↔ word2vec text file
//   checkpoint.rs         — model weights and run settings
//   metrics.rs            — per-epoch CSV log

/// INI configuration reader
pub mod config_file;

/// Dictionary persistence
pub mod dictionary_store;

/// Word vector persistence
pub mod word_vectors_store;

/// Model checkpoint saving and loading
pub mod checkpoint;

/// Training metrics CSV logger
pub mod metrics;
