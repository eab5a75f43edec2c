// ============================================================
// Layer 3 — Conversation Pair
// ============================================================
// One exchange of a dialogue corpus: what was said, and the reply
// the decoder should learn to produce. Both sides are already
// split into tokens.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationPair {
    pub utterance: Vec<String>,
    pub reply:     Vec<String>,
}

impl ConversationPair {
    pub fn new(utterance: Vec<String>, reply: Vec<String>) -> Self {
        Self { utterance, reply }
    }

    /// Both sides carry at least one token
    pub fn is_usable(&self) -> bool {
        !self.utterance.is_empty() && !self.reply.is_empty()
    }
}
