// ============================================================
// Layer 2 — Training Configuration
// ============================================================
// Typed view of the [CONFIG] section of the INI file passed on
// the command line. The first block of fields is required; the
// rest fall back to the defaults in `TrainConfig::DEFAULTS`.
//
// Serialisable so the exact settings of a run can be written next
// to the model weights.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::ml::{recurrent::RecurrentLmConfig, word2vec::Word2VecConfig};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainConfig {
    pub encoder_model_dir: PathBuf,
    pub decoder_model_dir: PathBuf,
    pub dict_file:         PathBuf,
    pub sent_file:         PathBuf,
    pub conv_file:         PathBuf,
    pub min_freq:          usize,
    pub n_units:           usize,
    pub epoch_size:        usize,
    pub batch_size:        usize,
    /// Whether dropout is applied during training
    pub dropout:           bool,

    pub dropout_ratio:     f64,
    pub learning_rate:     f64,
    /// Global gradient-norm clip
    pub grad_clip:         f32,
    /// Length cap for the sample reply logged after each epoch
    pub max_reply_len:     usize,
    pub word2vec:          Word2VecSettings,
}

/// Settings of the word-vector model used to seed the decoder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Word2VecSettings {
    /// Where the trained vectors are written
    pub file:          PathBuf,
    pub window:        usize,
    pub negative:      usize,
    pub epochs:        usize,
    pub min_count:     usize,
    pub learning_rate: f64,
    pub batch_size:    usize,
}

impl Default for Word2VecSettings {
    fn default() -> Self {
        Self {
            file:          PathBuf::from("word2vec.model"),
            window:        5,
            negative:      5,
            epochs:        5,
            min_count:     1,
            learning_rate: 0.01,
            batch_size:    128,
        }
    }
}

/// Defaults for the optional keys.
pub struct OptionalDefaults {
    pub dropout_ratio: f64,
    pub learning_rate: f64,
    pub grad_clip:     f32,
    pub max_reply_len: usize,
}

impl TrainConfig {
    pub const DEFAULTS: OptionalDefaults = OptionalDefaults {
        dropout_ratio: 0.5,
        learning_rate: 1e-3,
        grad_clip:     5.0,
        max_reply_len: 30,
    };

    /// Model hyper-parameters for a vocabulary of `vocab_size`.
    /// A disabled `dropout` flag means a ratio of 0.
    pub fn model_config(&self, vocab_size: usize) -> RecurrentLmConfig {
        let ratio = if self.dropout { self.dropout_ratio } else { 0.0 };
        RecurrentLmConfig::new(vocab_size, self.n_units).with_dropout(ratio)
    }

    /// Word-vector model whose vectors match the embedding width.
    pub fn word2vec_config(&self) -> Word2VecConfig {
        let w = &self.word2vec;
        Word2VecConfig::new(self.n_units)
            .with_window(w.window)
            .with_negative(w.negative)
            .with_epochs(w.epochs)
            .with_min_count(w.min_count)
            .with_learning_rate(w.learning_rate)
            .with_batch_size(w.batch_size)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// A config with every path under `root`.
    pub(crate) fn config_in(root: &std::path::Path) -> TrainConfig {
        TrainConfig {
            encoder_model_dir: root.join("encoder"),
            decoder_model_dir: root.join("decoder"),
            dict_file:         root.join("dict.json"),
            sent_file:         root.join("sentences.txt"),
            conv_file:         root.join("conversations.txt"),
            min_freq:          1,
            n_units:           8,
            epoch_size:        1,
            batch_size:        2,
            dropout:           false,
            dropout_ratio:     TrainConfig::DEFAULTS.dropout_ratio,
            learning_rate:     TrainConfig::DEFAULTS.learning_rate,
            grad_clip:         TrainConfig::DEFAULTS.grad_clip,
            max_reply_len:     5,
            word2vec: Word2VecSettings {
                file:   root.join("word2vec.model"),
                epochs: 1,
                ..Word2VecSettings::default()
            },
        }
    }

    #[test]
    fn test_dropout_flag_controls_ratio() {
        let mut cfg = config_in(std::path::Path::new("/tmp"));
        assert_eq!(cfg.model_config(10).dropout, 0.0);
        cfg.dropout = true;
        assert_eq!(cfg.model_config(10).dropout, 0.5);
    }

    #[test]
    fn test_word2vec_dim_follows_n_units() {
        let cfg = config_in(std::path::Path::new("/tmp"));
        let w2v = cfg.word2vec_config();
        assert_eq!(w2v.dim, 8);
        assert_eq!(w2v.window, 5);
        assert_eq!(w2v.epochs, 1);
    }
}
