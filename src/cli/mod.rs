// ============================================================
// Layer 1 — CLI / Presentation Layer
// ============================================================
// One clap parser per binary. Both take the same arguments
// (see commands.rs) and hand off to a Layer 2 use case.

pub mod commands;

use anyhow::Result;
use clap::Parser;
use commands::TrainArgs;

use crate::application::{
    train_decoder_use_case::{DecoderOrigin, TrainDecoderUseCase},
    train_encoder_use_case::TrainEncoderUseCase,
};

/// Train the decoder of an encoder/decoder conversation model.
#[derive(Parser, Debug)]
#[command(name = "train_decoder", version, about)]
pub struct DecoderCli {
    #[command(flatten)]
    pub args: TrainArgs,
}

impl DecoderCli {
    pub fn run(self) -> Result<()> {
        let r = self.args.resolve()?;
        tracing::info!("Training {} decoder from '{}'", r.cell_type, self.args.config_file.display());

        let report = TrainDecoderUseCase::new(r.config, r.cell_type, r.accelerator).execute()?;

        match &report.origin {
            DecoderOrigin::Loaded => tracing::info!("Decoder resumed from checkpoint"),
            DecoderOrigin::Bootstrapped { not_found } => tracing::info!(
                "Decoder embedding seeded from word2vec ({} tokens without a vector)",
                not_found.len()
            ),
        }
        if let Some(loss) = report.final_loss {
            tracing::info!("Final decoder loss: {:.4}", loss);
        }
        Ok(())
    }
}

/// Train the encoder as a language model over the sentence corpus.
#[derive(Parser, Debug)]
#[command(name = "train_encoder", version, about)]
pub struct EncoderCli {
    #[command(flatten)]
    pub args: TrainArgs,
}

impl EncoderCli {
    pub fn run(self) -> Result<()> {
        let r = self.args.resolve()?;
        tracing::info!("Training {} encoder from '{}'", r.cell_type, self.args.config_file.display());

        let report = TrainEncoderUseCase::new(r.config, r.cell_type, r.accelerator).execute()?;
        if let Some(loss) = report.final_loss {
            tracing::info!("Final encoder loss: {:.4}", loss);
        }
        Ok(())
    }
}
