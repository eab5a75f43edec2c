// ============================================================
// Layer 3 — Domain Layer
// ============================================================
// Plain Rust types with no Burn and no file I/O.

/// Token ↔ id vocabulary with reserved <pad>/<unk>/<eos>
pub mod dictionary;

/// relu | lstm selector
pub mod cell_type;

/// One (utterance, reply) exchange
pub mod conversation;

/// Learned word vectors and embedding-matrix bootstrap
pub mod word_vectors;

/// Corpus source abstractions
pub mod traits;
