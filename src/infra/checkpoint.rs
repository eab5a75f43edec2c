// ============================================================
// Layer 6 — Checkpoint Manager
// ============================================================
// Saves and restores model weights with Burn's named MessagePack
// recorder at full precision.
//
// File layout per model directory:
//   <model_dir>/
//     model.mpk           ← weights (overwritten every epoch)
//     train_config.json   ← settings of the run that wrote them
//     metrics.csv         ← see metrics.rs
//
// The recorder appends the extension itself, so it is handed
// `<model_dir>/model` while existence checks use `model.mpk`.

use anyhow::{Context, Result};
use burn::{
    prelude::*,
    record::{FullPrecisionSettings, NamedMpkFileRecorder},
};
use std::{fs, path::{Path, PathBuf}};

use crate::application::config::TrainConfig;

pub const MODEL_STEM: &str = "model";
pub const MODEL_FILE: &str = "model.mpk";

type ModelRecorder = NamedMpkFileRecorder<FullPrecisionSettings>;

/// Weights and run metadata for one model directory.
pub struct CheckpointManager {
    dir: PathBuf,
}

impl CheckpointManager {
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self { dir: dir.as_ref().to_path_buf() }
    }

    /// `<dir>/model.mpk`
    pub fn model_path(&self) -> PathBuf {
        self.dir.join(MODEL_FILE)
    }

    pub fn exists(&self) -> bool {
        self.model_path().is_file()
    }

    /// Write the weights of `model`, replacing any previous file.
    pub fn save_model<B: Backend, M: Module<B>>(&self, model: &M) -> Result<()> {
        fs::create_dir_all(&self.dir)
            .with_context(|| format!("Cannot create '{}'", self.dir.display()))?;

        model
            .clone()
            .save_file(self.dir.join(MODEL_STEM), &ModelRecorder::new())
            .with_context(|| {
                format!("Failed to save checkpoint to '{}'", self.model_path().display())
            })?;

        tracing::debug!("Saved checkpoint '{}'", self.model_path().display());
        Ok(())
    }

    /// Restore weights into `model`. The architecture of `model`
    /// must match the one that was saved.
    pub fn load_model<B: Backend, M: Module<B>>(&self, model: M, device: &B::Device) -> Result<M> {
        model
            .load_file(self.dir.join(MODEL_STEM), &ModelRecorder::new(), device)
            .with_context(|| {
                format!("Cannot load checkpoint '{}'", self.model_path().display())
            })
    }

    /// Record the settings used to produce these weights.
    pub fn save_config(&self, cfg: &TrainConfig) -> Result<()> {
        fs::create_dir_all(&self.dir)
            .with_context(|| format!("Cannot create '{}'", self.dir.display()))?;
        let path = self.dir.join("train_config.json");
        fs::write(&path, serde_json::to_string_pretty(cfg)?)
            .with_context(|| format!("Cannot write config to '{}'", path.display()))?;

        tracing::debug!("Saved training config to '{}'", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ml::{
        recurrent::{RecurrentLm, RecurrentLmConfig},
        relu_rnn::ReluRnnLm,
    };
    use burn::backend::NdArray;

    type TestBackend = NdArray;

    #[test]
    fn test_missing_checkpoint() {
        let dir  = tempfile::tempdir().unwrap();
        let ckpt = CheckpointManager::new(dir.path().join("decoder"));
        assert!(!ckpt.exists());
        assert_eq!(ckpt.model_path(), dir.path().join("decoder/model.mpk"));
    }

    #[test]
    fn test_save_then_load_restores_weights() {
        let dir    = tempfile::tempdir().unwrap();
        let device = Default::default();
        let cfg    = RecurrentLmConfig::new(5, 3);
        let ckpt   = CheckpointManager::new(dir.path().join("m"));

        let saved = ReluRnnLm::<TestBackend>::init(&cfg, &device);
        ckpt.save_model(&saved).unwrap();
        assert!(ckpt.exists());

        let fresh  = ReluRnnLm::<TestBackend>::init(&cfg, &device);
        let loaded = ckpt.load_model(fresh, &device).unwrap();

        let a: Vec<f32> = saved.embed.weight.val().into_data().to_vec().unwrap();
        let b: Vec<f32> = loaded.embed.weight.val().into_data().to_vec().unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_load_without_file_is_an_error() {
        let dir  = tempfile::tempdir().unwrap();
        let ckpt = CheckpointManager::new(dir.path());
        let model = ReluRnnLm::<TestBackend>::init(&RecurrentLmConfig::new(5, 3), &Default::default());
        assert!(ckpt.load_model(model, &Default::default()).is_err());
    }
}
