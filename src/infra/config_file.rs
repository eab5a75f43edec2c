// ============================================================
// Layer 6 — INI Config Reader
// ============================================================
// Reads the [CONFIG] section of an INI file into a TrainConfig.
//
//   [CONFIG]
//   encoder_model_dir = models/encoder
//   decoder_model_dir = models/decoder
//   dict_file         = data/dict.json
//   sent_file         = data/sentences.txt
//   conv_file         = data/conversations.txt
//   min_freq          = 2
//   n_units           = 256
//   epoch_size        = 20
//   batch_size        = 32
//   dropout           = true
//
// Keys are case-sensitive. Boolean values accept
// 1/yes/true/on and 0/no/false/off in any letter case.

use anyhow::{anyhow, bail, Context, Result};
use ini::{Ini, Properties};
use std::{fmt::Display, path::{Path, PathBuf}, str::FromStr};

use crate::application::config::{TrainConfig, Word2VecSettings};

pub const SECTION: &str = "CONFIG";

/// Load and validate a config file.
pub fn load_train_config(path: impl AsRef<Path>) -> Result<TrainConfig> {
    let path = path.as_ref();
    let ini  = Ini::load_from_file(path)
        .with_context(|| format!("Cannot read config file '{}'", path.display()))?;
    parse_train_config(&ini)
        .with_context(|| format!("Invalid config file '{}'", path.display()))
}

pub fn parse_train_config(ini: &Ini) -> Result<TrainConfig> {
    let section = ini
        .section(Some(SECTION))
        .ok_or_else(|| anyhow!("missing [{SECTION}] section"))?;
    let s = SectionReader { props: section };

    let defaults = TrainConfig::DEFAULTS;
    let w2v      = Word2VecSettings::default();

    let config = TrainConfig {
        encoder_model_dir: s.path("encoder_model_dir")?,
        decoder_model_dir: s.path("decoder_model_dir")?,
        dict_file:         s.path("dict_file")?,
        sent_file:         s.path("sent_file")?,
        conv_file:         s.path("conv_file")?,
        min_freq:          s.parse("min_freq")?,
        n_units:           s.parse("n_units")?,
        epoch_size:        s.parse("epoch_size")?,
        batch_size:        s.parse("batch_size")?,
        dropout:           s.boolean("dropout")?,

        dropout_ratio: s.optional("dropout_ratio", defaults.dropout_ratio)?,
        learning_rate: s.optional("learning_rate", defaults.learning_rate)?,
        grad_clip:     s.optional("grad_clip", defaults.grad_clip)?,
        max_reply_len: s.optional("max_reply_len", defaults.max_reply_len)?,
        word2vec: Word2VecSettings {
            file:          s.optional("word2vec_file", w2v.file)?,
            window:        s.optional("word2vec_window", w2v.window)?,
            negative:      s.optional("word2vec_negative", w2v.negative)?,
            epochs:        s.optional("word2vec_epochs", w2v.epochs)?,
            min_count:     s.optional("word2vec_min_count", w2v.min_count)?,
            learning_rate: s.optional("word2vec_learning_rate", w2v.learning_rate)?,
            batch_size:    s.optional("word2vec_batch_size", w2v.batch_size)?,
        },
    };

    if config.n_units == 0 {
        bail!("n_units must be positive");
    }
    if config.batch_size == 0 {
        bail!("batch_size must be positive");
    }
    if !(0.0..1.0).contains(&config.dropout_ratio) {
        bail!("dropout_ratio must be in [0, 1), got {}", config.dropout_ratio);
    }

    tracing::debug!("Parsed config: {:?}", config);
    Ok(config)
}

struct SectionReader<'a> {
    props: &'a Properties,
}

impl SectionReader<'_> {
    fn raw(&self, key: &str) -> Result<&str> {
        self.props
            .get(key)
            .map(str::trim)
            .ok_or_else(|| anyhow!("missing key '{key}' in [{SECTION}]"))
    }

    fn path(&self, key: &str) -> Result<PathBuf> {
        Ok(PathBuf::from(self.raw(key)?))
    }

    fn parse<T>(&self, key: &str) -> Result<T>
    where
        T: FromStr,
        T::Err: Display,
    {
        let raw = self.raw(key)?;
        raw.parse()
            .map_err(|e| anyhow!("key '{key}': cannot parse '{raw}': {e}"))
    }

    fn optional<T>(&self, key: &str, default: T) -> Result<T>
    where
        T: FromStr,
        T::Err: Display,
    {
        if self.props.contains_key(key) {
            self.parse(key)
        } else {
            Ok(default)
        }
    }

    fn boolean(&self, key: &str) -> Result<bool> {
        let raw = self.raw(key)?;
        match raw.to_ascii_lowercase().as_str() {
            "1" | "yes" | "true" | "on" => Ok(true),
            "0" | "no" | "false" | "off" => Ok(false),
            _ => bail!("key '{key}': '{raw}' is not a boolean"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = "\
[CONFIG]
encoder_model_dir = models/encoder
decoder_model_dir = models/decoder
dict_file = data/dict.json
sent_file = data/sentences.txt
conv_file = data/conversations.txt
min_freq = 2
n_units = 64
epoch_size = 3
batch_size = 16
dropout = True
";

    fn parse(text: &str) -> Result<TrainConfig> {
        parse_train_config(&Ini::load_from_str(text).unwrap())
    }

    #[test]
    fn test_required_keys() {
        let cfg = parse(MINIMAL).unwrap();
        assert_eq!(cfg.encoder_model_dir, PathBuf::from("models/encoder"));
        assert_eq!(cfg.conv_file, PathBuf::from("data/conversations.txt"));
        assert_eq!(cfg.min_freq, 2);
        assert_eq!(cfg.n_units, 64);
        assert_eq!(cfg.epoch_size, 3);
        assert_eq!(cfg.batch_size, 16);
        assert!(cfg.dropout);
    }

    #[test]
    fn test_optional_keys_default() {
        let cfg = parse(MINIMAL).unwrap();
        assert_eq!(cfg.dropout_ratio, 0.5);
        assert_eq!(cfg.word2vec.file, PathBuf::from("word2vec.model"));
        assert_eq!(cfg.word2vec.window, 5);
    }

    #[test]
    fn test_optional_keys_override() {
        let text = format!("{MINIMAL}word2vec_file = out/w2v.txt\nlearning_rate = 0.01\n");
        let cfg  = parse(&text).unwrap();
        assert_eq!(cfg.word2vec.file, PathBuf::from("out/w2v.txt"));
        assert_eq!(cfg.learning_rate, 0.01);
    }

    #[test]
    fn test_dropout_false_values() {
        for value in ["false", "0", "no", "OFF"] {
            let text = MINIMAL.replace("dropout = True", &format!("dropout = {value}"));
            assert!(!parse(&text).unwrap().dropout, "{value}");
        }
    }

    #[test]
    fn test_missing_key_is_reported() {
        let text = MINIMAL.replace("n_units = 64\n", "");
        let err  = parse(&text).unwrap_err();
        assert!(err.to_string().contains("n_units"));
    }

    #[test]
    fn test_bad_number_is_reported() {
        let text = MINIMAL.replace("min_freq = 2", "min_freq = two");
        let err  = parse(&text).unwrap_err();
        assert!(err.to_string().contains("min_freq"));
    }

    #[test]
    fn test_missing_section() {
        let err = parse("[OTHER]\nx = 1\n").unwrap_err();
        assert!(err.to_string().contains("[CONFIG]"));
    }

    #[test]
    fn test_load_from_file_reports_path() {
        let err = load_train_config("/nonexistent/train.ini").unwrap_err();
        assert!(format!("{err:#}").contains("/nonexistent/train.ini"));
    }
}
