// ============================================================
// Layer 4 — Data Pipeline
// ============================================================
// From text files to padded tensor batches:
//
//   sent_file / conv_file
//       │
//       ▼
//   SentenceLoader / ConversationLoader   → token lists
//       │
//       ▼
//   Dictionary::encode                     → id lists
//       │
//       ▼
//   PairDataset / SentenceDataset / SkipGramDataset
//       │
//       ▼
//   *Batcher                               → padded Int tensors
//       │
//       ▼
//   DataLoader                             → training loop

/// Sentence and conversation file readers
pub mod loader;

/// Line normalisation and whitespace tokenisation
pub mod preprocessor;

/// Burn Dataset implementations
pub mod dataset;

/// Burn Batcher implementations
pub mod batcher;
