// ============================================================
// Layer 2 — TrainEncoderUseCase
// ============================================================
// Trains the encoder as a next-token language model over the
// sentence corpus, producing the checkpoint decoder training
// requires:
//
//   Step 1: Load or build the dictionary   (Layer 6 - infra)
//   Step 2: Pick the backend device        (Layer 2)
//   Step 3: Build the encoder, resuming from its checkpoint
//   Step 4: Encode the sentence corpus     (Layer 4 - data)
//   Step 5: Run the training loop          (Layer 5 - ml)

use anyhow::{bail, Result};
use burn::{module::AutodiffModule, tensor::backend::AutodiffBackend};

use crate::application::{
    backend::{Accelerator, CpuBackend, GpuBackend},
    config::TrainConfig,
};
use crate::data::{dataset::SentenceDataset, loader::SentenceLoader};
use crate::domain::{cell_type::CellType, dictionary::Dictionary, traits::SentenceSource};
use crate::infra::{checkpoint::CheckpointManager, dictionary_store::DictionaryStore};
use crate::ml::{lstm::LstmLm, recurrent::RecurrentLm, relu_rnn::ReluRnnLm, trainer::train_encoder};

#[derive(Debug, Clone, PartialEq)]
pub struct EncoderReport {
    /// True when training continued from an existing checkpoint
    pub resumed:    bool,
    pub final_loss: Option<f64>,
}

pub struct TrainEncoderUseCase {
    config:      TrainConfig,
    cell_type:   CellType,
    accelerator: Accelerator,
}

impl TrainEncoderUseCase {
    pub fn new(config: TrainConfig, cell_type: CellType, accelerator: Accelerator) -> Self {
        Self { config, cell_type, accelerator }
    }

    pub fn execute(&self) -> Result<EncoderReport> {
        let cfg = &self.config;

        // ── Step 1: Dictionary ────────────────────────────────────────────────
        let dictionary = DictionaryStore::new(&cfg.dict_file)
            .load_or_build(&cfg.sent_file, cfg.min_freq)?;

        // ── Step 2: Backend ───────────────────────────────────────────────────
        match self.accelerator {
            Accelerator::Cpu => {
                tracing::info!("Using CPU (ndarray) backend");
                self.run_on::<CpuBackend>(&dictionary, &Accelerator::cpu_device())
            }
            Accelerator::Gpu(index) => {
                let device = Accelerator::gpu_device(index);
                tracing::info!("Using WGPU device: {:?}", device);
                self.run_on::<GpuBackend>(&dictionary, &device)
            }
        }
    }

    fn run_on<B: AutodiffBackend>(&self, dictionary: &Dictionary, device: &B::Device) -> Result<EncoderReport> {
        match self.cell_type {
            CellType::Relu => self.run_with::<B, ReluRnnLm<B>>(dictionary, device),
            CellType::Lstm => self.run_with::<B, LstmLm<B>>(dictionary, device),
        }
    }

    fn run_with<B, M>(&self, dictionary: &Dictionary, device: &B::Device) -> Result<EncoderReport>
    where
        B: AutodiffBackend,
        M: RecurrentLm<B> + AutodiffModule<B>,
    {
        let cfg = &self.config;

        // ── Step 3: Model ─────────────────────────────────────────────────────
        let encoder = M::init(&cfg.model_config(dictionary.len()), device);
        let ckpt    = CheckpointManager::new(&cfg.encoder_model_dir);
        let resumed = ckpt.exists();
        let encoder = if resumed {
            tracing::info!("load encoder model {}", ckpt.model_path().display());
            ckpt.load_model(encoder, device)?
        } else {
            encoder
        };

        // ── Step 4: Corpus ────────────────────────────────────────────────────
        let sentences = SentenceLoader::new(&cfg.sent_file).load_all()?;
        if sentences.is_empty() {
            bail!("'{}' holds no sentences", cfg.sent_file.display());
        }
        tracing::info!("Loaded {} sentences", sentences.len());
        let dataset = SentenceDataset::from_sentences(&sentences, dictionary);

        // ── Step 5: Train ─────────────────────────────────────────────────────
        let trained = train_encoder(cfg, encoder, dataset, device)?;
        Ok(EncoderReport { resumed, final_loss: trained.final_loss })
    }
}
