// ============================================================
// Layer 2 — TrainDecoderUseCase
// ============================================================
// Orchestrates decoder training in order:
//
//   Step 1: Load or build the dictionary   (Layer 6 - infra)
//   Step 2: Pick the backend device        (Layer 2)
//   Step 3: Build encoder and decoder      (Layer 5 - ml)
//   Step 4: Load the encoder checkpoint    (Layer 6 - infra)
//   Step 5: Load the decoder checkpoint, or seed its word
//           embedding from freshly trained word2vec vectors
//   Step 6: Load conversation pairs        (Layer 4 - data)
//   Step 7: Run the decoder training loop  (Layer 5 - ml)
//
// The cell type is parsed by the caller before this use case
// exists, so an invalid --type never touches the filesystem.

use anyhow::{bail, Result};
use burn::{module::AutodiffModule, prelude::*, tensor::backend::AutodiffBackend};

use crate::application::{
    backend::{Accelerator, CpuBackend, GpuBackend},
    config::TrainConfig,
};
use crate::data::{dataset::PairDataset, loader::{ConversationLoader, SentenceLoader}};
use crate::domain::{
    cell_type::CellType,
    dictionary::Dictionary,
    traits::{ConversationSource, SentenceSource},
};
use crate::infra::{
    checkpoint::CheckpointManager,
    dictionary_store::DictionaryStore,
    word_vectors_store::WordVectorsStore,
};
use crate::ml::{
    lstm::LstmLm,
    recurrent::RecurrentLm,
    relu_rnn::ReluRnnLm,
    trainer::train_decoder,
    word2vec::Word2Vec,
};

/// Where the decoder weights came from before training.
#[derive(Debug, Clone, PartialEq)]
pub enum DecoderOrigin {
    /// Restored from `<decoder_model_dir>/model.mpk`
    Loaded,
    /// Fresh model with a word2vec-seeded embedding; `not_found`
    /// lists the dictionary tokens that got random rows.
    Bootstrapped { not_found: Vec<String> },
}

#[derive(Debug, Clone, PartialEq)]
pub struct DecoderReport {
    pub origin:     DecoderOrigin,
    /// Mean loss of the last epoch, `None` if epoch_size is 0
    pub final_loss: Option<f64>,
}

pub struct TrainDecoderUseCase {
    config:      TrainConfig,
    cell_type:   CellType,
    accelerator: Accelerator,
}

impl TrainDecoderUseCase {
    pub fn new(config: TrainConfig, cell_type: CellType, accelerator: Accelerator) -> Self {
        Self { config, cell_type, accelerator }
    }

    pub fn execute(&self) -> Result<DecoderReport> {
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

    fn run_on<B: AutodiffBackend>(&self, dictionary: &Dictionary, device: &B::Device) -> Result<DecoderReport> {
        match self.cell_type {
            CellType::Relu => self.run_with::<B, ReluRnnLm<B>>(dictionary, device),
            CellType::Lstm => self.run_with::<B, LstmLm<B>>(dictionary, device),
        }
    }

    fn run_with<B, M>(&self, dictionary: &Dictionary, device: &B::Device) -> Result<DecoderReport>
    where
        B: AutodiffBackend,
        M: RecurrentLm<B> + AutodiffModule<B>,
        M::InnerModule: RecurrentLm<B::InnerBackend>,
    {
        let cfg = &self.config;

        // ── Step 3: Models ────────────────────────────────────────────────────
        let model_cfg = cfg.model_config(dictionary.len());
        let encoder   = M::init(&model_cfg, device);
        let decoder   = M::init(&model_cfg, device);
        tracing::info!(
            "{} encoder/decoder: vocab={}, n_units={}, dropout={}",
            self.cell_type,
            model_cfg.vocab_size,
            model_cfg.n_units,
            model_cfg.dropout
        );

        // ── Step 4: Encoder checkpoint ────────────────────────────────────────
        let encoder_ckpt = CheckpointManager::new(&cfg.encoder_model_dir);
        if !encoder_ckpt.exists() {
            bail!(
                "learn encoder model first ('{}' not found)",
                encoder_ckpt.model_path().display()
            );
        }
        let encoder = encoder_ckpt.load_model(encoder, device)?;
        tracing::info!("load encoder model {}", encoder_ckpt.model_path().display());

        // ── Step 5: Decoder checkpoint or word2vec bootstrap ──────────────────
        let decoder_ckpt = CheckpointManager::new(&cfg.decoder_model_dir);
        let (decoder, origin) = if decoder_ckpt.exists() {
            let decoder = decoder_ckpt.load_model(decoder, device)?;
            tracing::info!("load decoder model {}", decoder_ckpt.model_path().display());
            (decoder, DecoderOrigin::Loaded)
        } else {
            let (decoder, not_found) = bootstrap_embedding(cfg, decoder, dictionary, device)?;
            (decoder, DecoderOrigin::Bootstrapped { not_found })
        };

        // ── Step 6: Conversation pairs ────────────────────────────────────────
        let pairs = ConversationLoader::new(&cfg.conv_file).load_all()?;
        if pairs.is_empty() {
            bail!("'{}' holds no usable conversation pairs", cfg.conv_file.display());
        }
        tracing::info!("Loaded {} conversation pairs", pairs.len());
        let dataset = PairDataset::from_pairs(&pairs, dictionary);

        // ── Step 7: Train ─────────────────────────────────────────────────────
        let trained = train_decoder(cfg, &encoder, decoder, dataset, dictionary, device)?;

        Ok(DecoderReport { origin, final_loss: trained.final_loss })
    }
}

/// Train word vectors on `sent_file`, save them, and install them
/// as the word embedding of `decoder`. Returns the decoder and the
/// dictionary tokens that had no vector.
pub fn bootstrap_embedding<B, M>(
    cfg:        &TrainConfig,
    decoder:    M,
    dictionary: &Dictionary,
    device:     &B::Device,
) -> Result<(M, Vec<String>)>
where
    B: AutodiffBackend,
    M: RecurrentLm<B>,
{
    tracing::info!("learning word2vec model");
    let sentences = SentenceLoader::new(&cfg.sent_file).load_all()?;
    let vectors   = Word2Vec::new(cfg.word2vec_config()).train::<B>(&sentences, device)?;
    WordVectorsStore::new(&cfg.word2vec.file).save(&vectors)?;

    tracing::info!("initializing word embedding by word2vec");
    let init = vectors.embedding_matrix(dictionary, &mut rand::thread_rng());
    tracing::info!("{:?} are not found in word2vec model", init.not_found);
    tracing::info!("embedding shape: ({}, {})", init.rows, init.cols);

    let weights = Tensor::<B, 1>::from_floats(init.weights.as_slice(), device)
        .reshape([init.rows, init.cols]);
    Ok((decoder.with_word_embedding(weights), init.not_found))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::config::tests::config_in;
    use crate::domain::dictionary::{EOS_TOKEN, PAD_TOKEN, UNK_TOKEN};
    use std::fs;

    /// Writes the corpora and returns a config plus its dictionary.
    fn workspace(root: &std::path::Path) -> (TrainConfig, Dictionary) {
        let cfg = config_in(root);
        fs::write(&cfg.sent_file, "hello there\nhow are you\nfine thanks\n").unwrap();
        fs::write(&cfg.conv_file, "hello there\thow are you\nhow are you\tfine thanks\n").unwrap();
        let dict = DictionaryStore::new(&cfg.dict_file)
            .load_or_build(&cfg.sent_file, cfg.min_freq)
            .unwrap();
        (cfg, dict)
    }

    fn save_model<M: RecurrentLm<CpuBackend>>(cfg: &TrainConfig, dict: &Dictionary, dir: &std::path::Path) {
        let model = M::init(&cfg.model_config(dict.len()), &Accelerator::cpu_device());
        CheckpointManager::new(dir).save_model(&model).unwrap();
    }

    #[test]
    fn test_missing_encoder_checkpoint_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let (cfg, _) = workspace(dir.path());

        let err = TrainDecoderUseCase::new(cfg.clone(), CellType::Relu, Accelerator::Cpu)
            .execute()
            .unwrap_err();
        assert!(err.to_string().contains("learn encoder model first"));
        assert!(!cfg.word2vec.file.exists());
        assert!(!cfg.decoder_model_dir.join("model.mpk").exists());
    }

    #[test]
    fn test_existing_decoder_is_loaded_without_word2vec() {
        let dir = tempfile::tempdir().unwrap();
        let (cfg, dict) = workspace(dir.path());
        save_model::<LstmLm<CpuBackend>>(&cfg, &dict, &cfg.encoder_model_dir);
        save_model::<LstmLm<CpuBackend>>(&cfg, &dict, &cfg.decoder_model_dir);

        let report = TrainDecoderUseCase::new(cfg.clone(), CellType::Lstm, Accelerator::Cpu)
            .execute()
            .unwrap();
        assert_eq!(report.origin, DecoderOrigin::Loaded);
        assert!(report.final_loss.is_some());
        assert!(!cfg.word2vec.file.exists());
    }

    #[test]
    fn test_absent_decoder_is_bootstrapped_from_word2vec() {
        let dir = tempfile::tempdir().unwrap();
        let (cfg, dict) = workspace(dir.path());
        save_model::<ReluRnnLm<CpuBackend>>(&cfg, &dict, &cfg.encoder_model_dir);

        let report = TrainDecoderUseCase::new(cfg.clone(), CellType::Relu, Accelerator::Cpu)
            .execute()
            .unwrap();

        let DecoderOrigin::Bootstrapped { not_found } = report.origin else {
            panic!("decoder should have been bootstrapped");
        };
        for token in [PAD_TOKEN, UNK_TOKEN, EOS_TOKEN] {
            assert!(not_found.iter().any(|t| t == token), "{token} should be reported");
        }
        assert!(!not_found.iter().any(|t| t == "hello"));
        assert!(cfg.word2vec.file.is_file());
        assert!(cfg.decoder_model_dir.join("model.mpk").is_file());
    }

    #[test]
    fn test_bootstrap_rows_for_unmatched_tokens() {
        let dir = tempfile::tempdir().unwrap();
        let (cfg, dict) = workspace(dir.path());
        let device  = Accelerator::cpu_device();
        let decoder = ReluRnnLm::<CpuBackend>::init(&cfg.model_config(dict.len()), &device);

        let (decoder, not_found) = bootstrap_embedding(&cfg, decoder, &dict, &device).unwrap();

        let weights: Vec<f32> = decoder.embed.weight.val().into_data().to_vec().unwrap();
        assert_eq!(weights.len(), dict.len() * cfg.n_units);
        for token in &not_found {
            let row = dict.id(token).unwrap() as usize;
            for &x in &weights[row * cfg.n_units..(row + 1) * cfg.n_units] {
                assert!((0.0..1.0).contains(&x), "{token}: {x}");
            }
        }
    }
}
