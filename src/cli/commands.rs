// ============================================================
// Layer 1 — CLI Arguments
// ============================================================
// Arguments shared by `train_decoder` and `train_encoder`:
//
//   <config_file>            INI file with a [CONFIG] section
//   -g, --gpu <int>          GPU index, negative for CPU (default -1)
//   -t, --type <relu|lstm>   recurrent cell type (default relu)

use anyhow::Result;
use clap::Args;
use std::path::PathBuf;

use crate::application::{backend::Accelerator, config::TrainConfig};
use crate::domain::cell_type::CellType;
use crate::infra::config_file::load_train_config;

#[derive(Args, Debug, Clone)]
pub struct TrainArgs {
    /// INI config file
    pub config_file: PathBuf,

    /// GPU index; a negative value trains on the CPU
    #[arg(short, long, default_value_t = -1, allow_negative_numbers = true)]
    pub gpu: i32,

    /// Recurrent cell type: relu or lstm
    #[arg(short = 't', long = "type", default_value = "relu")]
    pub model_type: String,
}

/// Everything a use case needs, resolved from the arguments.
#[derive(Debug, Clone)]
pub struct Resolved {
    pub config:      TrainConfig,
    pub cell_type:   CellType,
    pub accelerator: Accelerator,
}

impl TrainArgs {
    /// The cell type is checked before the config file is read.
    pub fn resolve(&self) -> Result<Resolved> {
        let cell_type: CellType = self.model_type.parse()?;
        let config = load_train_config(&self.config_file)?;
        Ok(Resolved {
            config,
            cell_type,
            accelerator: Accelerator::from_gpu_flag(self.gpu),
        })
    }
}
