// ============================================================
// Layer 2 — Application / Use Cases
// ============================================================
// Workflow coordination only: each use case calls into the data,
// ml and infra layers in a fixed order and reports the outcome.
//
//   train_decoder_use_case.rs — decoder training (main binary)
//   train_encoder_use_case.rs — encoder pre-training
//   config.rs                 — TrainConfig
//   backend.rs                — CPU / GPU backend choice

pub mod config;

pub mod backend;

/// Decoder training workflow
pub mod train_decoder_use_case;

/// Encoder training workflow
pub mod train_encoder_use_case;
