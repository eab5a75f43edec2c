// ============================================================
// Layer 4 — Corpus Loaders
// ============================================================
// Reads the two text corpora named in the config file.
//
//   sent_file  — one sentence per line, tokens separated by spaces
//   conv_file  — one exchange per line: utterance<TAB>reply
//
// Both loaders skip blank lines. A malformed conversation line is
// logged and skipped rather than aborting the run.

use anyhow::{Context, Result};
use std::{
    fs::File,
    io::{BufRead, BufReader},
    path::{Path, PathBuf},
};

use crate::data::preprocessor::Preprocessor;
use crate::domain::conversation::ConversationPair;
use crate::domain::traits::{ConversationSource, SentenceSource};

/// Loads a sentence-per-line corpus.
pub struct SentenceLoader {
    path: PathBuf,
}

impl SentenceLoader {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self { path: path.as_ref().to_path_buf() }
    }
}

impl SentenceSource for SentenceLoader {
    fn load_all(&self) -> Result<Vec<Vec<String>>> {
        let prep = Preprocessor::new();
        let mut sentences = Vec::new();

        for line in open_lines(&self.path)? {
            let line = line.with_context(|| {
                format!("Cannot read line from '{}'", self.path.display())
            })?;
            let tokens = prep.tokens(&line);
            if !tokens.is_empty() {
                sentences.push(tokens);
            }
        }

        tracing::info!(
            "Loaded {} sentences from '{}'",
            sentences.len(),
            self.path.display()
        );
        Ok(sentences)
    }
}

/// Loads a tab-separated conversation corpus.
pub struct ConversationLoader {
    path: PathBuf,
}

impl ConversationLoader {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self { path: path.as_ref().to_path_buf() }
    }
}

impl ConversationSource for ConversationLoader {
    fn load_all(&self) -> Result<Vec<ConversationPair>> {
        let prep = Preprocessor::new();
        let mut pairs   = Vec::new();
        let mut skipped = 0usize;

        for (lineno, line) in open_lines(&self.path)?.enumerate() {
            let line = line.with_context(|| {
                format!("Cannot read line from '{}'", self.path.display())
            })?;
            if line.trim().is_empty() {
                continue;
            }

            let Some((utterance, reply)) = line.split_once('\t') else {
                tracing::warn!(
                    "{}:{}: no tab separator, skipping",
                    self.path.display(),
                    lineno + 1
                );
                skipped += 1;
                continue;
            };

            let pair = ConversationPair::new(prep.tokens(utterance), prep.tokens(reply));
            if pair.is_usable() {
                pairs.push(pair);
            } else {
                tracing::warn!(
                    "{}:{}: empty utterance or reply, skipping",
                    self.path.display(),
                    lineno + 1
                );
                skipped += 1;
            }
        }

        tracing::info!(
            "Loaded {} conversation pairs from '{}' ({} skipped)",
            pairs.len(),
            self.path.display(),
            skipped
        );
        Ok(pairs)
    }
}

fn open_lines(path: &Path) -> Result<std::io::Lines<BufReader<File>>> {
    let file = File::open(path)
        .with_context(|| format!("Cannot open '{}'", path.display()))?;
    Ok(BufReader::new(file).lines())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_sentences_skip_blank_lines() {
        let dir  = tempfile::tempdir().unwrap();
        let path = dir.path().join("sent.txt");
        fs::write(&path, "hello world\n\n  good  morning \n").unwrap();

        let sentences = SentenceLoader::new(&path).load_all().unwrap();
        assert_eq!(
            sentences,
            vec![vec!["hello", "world"], vec!["good", "morning"]]
        );
    }

    #[test]
    fn test_missing_sentence_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = SentenceLoader::new(dir.path().join("nope.txt"))
            .load_all()
            .unwrap_err();
        assert!(err.to_string().contains("nope.txt"));
    }

    #[test]
    fn test_conversations_split_on_tab() {
        let dir  = tempfile::tempdir().unwrap();
        let path = dir.path().join("conv.txt");
        fs::write(
            &path,
            "how are you\ti am fine\nno separator here\n\t only reply\nhi\thello\n",
        )
        .unwrap();

        let pairs = ConversationLoader::new(&path).load_all().unwrap();
        assert_eq!(pairs.len(), 2);
        assert_eq!(pairs[0].utterance, vec!["how", "are", "you"]);
        assert_eq!(pairs[0].reply, vec!["i", "am", "fine"]);
        assert_eq!(pairs[1].reply, vec!["hello"]);
    }
}
