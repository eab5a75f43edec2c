// ============================================================
// Layer 3 — Core Traits (Abstractions)
// ============================================================
// The application layer reads corpora through these traits, so a
// different on-disk format only needs a new implementation.

use anyhow::Result;

use crate::domain::conversation::ConversationPair;

// ─── SentenceSource ───────────────────────────────────────────────────────────
/// Anything that yields tokenised sentences.
///
/// Implementations:
///   - SentenceLoader → one sentence per line of a text file
pub trait SentenceSource {
    fn load_all(&self) -> Result<Vec<Vec<String>>>;
}

// ─── ConversationSource ───────────────────────────────────────────────────────
/// Anything that yields (utterance, reply) pairs.
///
/// Implementations:
///   - ConversationLoader → one tab-separated pair per line
pub trait ConversationSource {
    fn load_all(&self) -> Result<Vec<ConversationPair>>;
}
