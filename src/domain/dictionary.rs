// ============================================================
// Layer 3 — Dictionary
// ============================================================
// Bidirectional mapping between vocabulary tokens and integer ids.
//
// Ids are contiguous from 0. The first three ids are reserved:
//
//   0  <pad>   right-padding inside a batch
//   1  <unk>   any token not in the vocabulary
//   2  <eos>   sentence boundary / decoder start symbol
//
// Remaining tokens follow in descending frequency, ties broken
// lexicographically so that two builds over the same corpus
// always assign the same ids.

use anyhow::{bail, Result};
use std::collections::HashMap;

pub const PAD_TOKEN: &str = "<pad>";
pub const UNK_TOKEN: &str = "<unk>";
pub const EOS_TOKEN: &str = "<eos>";

pub const PAD_ID: u32 = 0;
pub const UNK_ID: u32 = 1;
pub const EOS_ID: u32 = 2;

const RESERVED: [&str; 3] = [PAD_TOKEN, UNK_TOKEN, EOS_TOKEN];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dictionary {
    id_to_token: Vec<String>,
    token_to_id: HashMap<String, u32>,
}

impl Dictionary {
    /// Count whitespace-separated tokens and keep those seen at
    /// least `min_freq` times.
    pub fn build<S: AsRef<str>>(sentences: &[Vec<S>], min_freq: usize) -> Self {
        let mut freq: HashMap<&str, usize> = HashMap::new();
        for sentence in sentences {
            for token in sentence {
                *freq.entry(token.as_ref()).or_insert(0) += 1;
            }
        }

        let mut words: Vec<(&str, usize)> = freq
            .into_iter()
            .filter(|(w, n)| *n >= min_freq && !RESERVED.contains(w))
            .collect();
        words.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));

        let tokens = RESERVED
            .iter()
            .map(|t| t.to_string())
            .chain(words.into_iter().map(|(w, _)| w.to_string()));
        Self::from_ordered(tokens)
    }

    /// Rebuild a dictionary from a persisted token → id map.
    /// The ids must be exactly `0..n` and the reserved tokens must
    /// sit at their fixed ids.
    pub fn from_vocab(vocab: HashMap<String, u32>) -> Result<Self> {
        let n = vocab.len();
        let mut slots: Vec<Option<String>> = vec![None; n];
        for (token, id) in vocab {
            let idx = id as usize;
            if idx >= n {
                bail!("token '{token}' has id {id}, outside 0..{n}");
            }
            if let Some(other) = &slots[idx] {
                bail!("tokens '{other}' and '{token}' share id {id}");
            }
            slots[idx] = Some(token);
        }
        let tokens: Vec<String> = slots.into_iter().flatten().collect();

        for (id, reserved) in RESERVED.iter().enumerate() {
            if tokens.get(id).map(String::as_str) != Some(*reserved) {
                bail!("dictionary must map '{reserved}' to id {id}");
            }
        }
        Ok(Self::from_ordered(tokens))
    }

    fn from_ordered(tokens: impl IntoIterator<Item = String>) -> Self {
        let id_to_token: Vec<String> = tokens.into_iter().collect();
        let token_to_id = id_to_token
            .iter()
            .enumerate()
            .map(|(i, t)| (t.clone(), i as u32))
            .collect();
        Self { id_to_token, token_to_id }
    }

    pub fn len(&self) -> usize {
        self.id_to_token.len()
    }

    pub fn is_empty(&self) -> bool {
        self.id_to_token.is_empty()
    }

    pub fn token(&self, id: u32) -> Option<&str> {
        self.id_to_token.get(id as usize).map(String::as_str)
    }

    pub fn id(&self, token: &str) -> Option<u32> {
        self.token_to_id.get(token).copied()
    }

    /// Tokens in id order.
    pub fn tokens(&self) -> impl Iterator<Item = &str> {
        self.id_to_token.iter().map(String::as_str)
    }

    /// Map tokens to ids, unknown tokens become `<unk>`.
    pub fn encode<S: AsRef<str>>(&self, tokens: &[S]) -> Vec<u32> {
        tokens
            .iter()
            .map(|t| self.id(t.as_ref()).unwrap_or(UNK_ID))
            .collect()
    }

    /// Map ids back to tokens. Stops at the first `<eos>` and drops
    /// padding.
    pub fn decode(&self, ids: &[u32]) -> Vec<String> {
        ids.iter()
            .take_while(|&&id| id != EOS_ID)
            .filter(|&&id| id != PAD_ID)
            .map(|&id| self.token(id).unwrap_or(UNK_TOKEN).to_string())
            .collect()
    }

    pub fn vocab(&self) -> HashMap<String, u32> {
        self.token_to_id.clone()
    }
}
