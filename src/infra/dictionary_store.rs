// ============================================================
// Layer 6 — Dictionary Store
// ============================================================
// Persists the Dictionary as a HuggingFace tokenizer document
// (WordLevel model, whitespace pre-tokenizer), so the vocabulary
// file can be opened by any `tokenizers` consumer.
//
// load_or_build:
//   dict_file exists  → load it
//   otherwise         → build from sent_file with min_freq, save

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tokenizers::Tokenizer;

use crate::data::loader::SentenceLoader;
use crate::domain::dictionary::{Dictionary, PAD_TOKEN, UNK_TOKEN, EOS_TOKEN};
use crate::domain::traits::SentenceSource;

pub struct DictionaryStore {
    path: PathBuf,
}

impl DictionaryStore {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self { path: path.as_ref().to_path_buf() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load an existing dictionary or build one from `sent_file`.
    pub fn load_or_build(&self, sent_file: &Path, min_freq: usize) -> Result<Dictionary> {
        if self.path.exists() {
            tracing::info!("Loading dictionary from '{}'", self.path.display());
            return self.load();
        }

        tracing::info!(
            "Building dictionary from '{}' (min_freq={})",
            sent_file.display(),
            min_freq
        );
        let sentences  = SentenceLoader::new(sent_file).load_all()?;
        let dictionary = Dictionary::build(&sentences, min_freq);
        self.save(&dictionary)?;
        Ok(dictionary)
    }

    pub fn load(&self) -> Result<Dictionary> {
        let tokenizer = Tokenizer::from_file(&self.path).map_err(|e| {
            anyhow::anyhow!("Cannot load dictionary from '{}': {}", self.path.display(), e)
        })?;
        let dictionary = Dictionary::from_vocab(tokenizer.get_vocab(true))
            .with_context(|| format!("Inconsistent dictionary '{}'", self.path.display()))?;

        tracing::info!("Dictionary has {} tokens", dictionary.len());
        Ok(dictionary)
    }

    pub fn save(&self, dictionary: &Dictionary) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Cannot create '{}'", parent.display()))?;
        }

        let special = |id: u32, content: &str| {
            serde_json::json!({
                "id": id, "content": content,
                "single_word": false, "lstrip": false, "rstrip": false,
                "normalized": false, "special": true
            })
        };
        let added_tokens: Vec<serde_json::Value> = [PAD_TOKEN, UNK_TOKEN, EOS_TOKEN]
            .iter()
            .filter_map(|&t| dictionary.id(t).map(|id| special(id, t)))
            .collect();

        let document = serde_json::json!({
            "version": "1.0",
            "truncation": null,
            "padding": null,
            "added_tokens": added_tokens,
            "normalizer": null,
            "pre_tokenizer": { "type": "WhitespaceSplit" },
            "post_processor": null,
            "decoder": null,
            "model": {
                "type": "WordLevel",
                "vocab": dictionary.vocab(),
                "unk_token": UNK_TOKEN
            }
        });

        std::fs::write(&self.path, serde_json::to_string_pretty(&document)?)
            .with_context(|| format!("Cannot write dictionary '{}'", self.path.display()))?;

        tracing::info!(
            "Dictionary with {} tokens saved to '{}'",
            dictionary.len(),
            self.path.display()
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_build_then_load_gives_same_ids() {
        let dir  = tempfile::tempdir().unwrap();
        let sent = dir.path().join("sent.txt");
        fs::write(&sent, "hello world\nhello again\n").unwrap();

        let store = DictionaryStore::new(dir.path().join("nested/dict.json"));
        let built = store.load_or_build(&sent, 1).unwrap();
        assert!(store.path().exists());

        let loaded = store.load().unwrap();
        assert_eq!(built, loaded);
        assert_eq!(loaded.id("hello"), Some(3));
    }

    #[test]
    fn test_existing_file_wins_over_corpus() {
        let dir  = tempfile::tempdir().unwrap();
        let sent = dir.path().join("sent.txt");
        fs::write(&sent, "alpha beta\n").unwrap();

        let store = DictionaryStore::new(dir.path().join("dict.json"));
        store.load_or_build(&sent, 1).unwrap();

        fs::write(&sent, "gamma delta epsilon\n").unwrap();
        let again = store.load_or_build(&sent, 1).unwrap();
        assert!(again.id("alpha").is_some());
        assert!(again.id("gamma").is_none());
    }

    #[test]
    fn test_saved_file_is_a_working_tokenizer() {
        let dir  = tempfile::tempdir().unwrap();
        let sent = dir.path().join("sent.txt");
        fs::write(&sent, "good morning\n").unwrap();

        let store = DictionaryStore::new(dir.path().join("dict.json"));
        let dict  = store.load_or_build(&sent, 1).unwrap();

        let tokenizer = Tokenizer::from_file(store.path()).unwrap();
        let encoding  = tokenizer.encode("good night", false).unwrap();
        assert_eq!(
            encoding.get_ids(),
            &[dict.id("good").unwrap(), dict.id(UNK_TOKEN).unwrap()]
        );
    }

    #[test]
    fn test_missing_corpus_is_an_error() {
        let dir   = tempfile::tempdir().unwrap();
        let store = DictionaryStore::new(dir.path().join("dict.json"));
        assert!(store.load_or_build(&dir.path().join("absent.txt"), 1).is_err());
        assert!(!store.path().exists());
    }
}
