use burn::data::dataset::Dataset;
use serde::{Deserialize, Serialize};

use crate::domain::{conversation::ConversationPair, dictionary::Dictionary};

/// One encoded exchange: utterance ids for the encoder, reply ids
/// for the decoder. Neither side carries <eos>; the batcher adds it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PairSample {
    pub source: Vec<u32>,
    pub target: Vec<u32>,
}

impl PairSample {
    pub fn encode(pair: &ConversationPair, dictionary: &Dictionary) -> Self {
        Self {
            source: dictionary.encode(&pair.utterance),
            target: dictionary.encode(&pair.reply),
        }
    }
}

pub struct PairDataset {
    samples: Vec<PairSample>,
}

impl PairDataset {
    pub fn new(samples: Vec<PairSample>) -> Self { Self { samples } }

    pub fn from_pairs(pairs: &[ConversationPair], dictionary: &Dictionary) -> Self {
        Self::new(pairs.iter().map(|p| PairSample::encode(p, dictionary)).collect())
    }

    pub fn first(&self) -> Option<&PairSample> { self.samples.first() }
}

impl Dataset<PairSample> for PairDataset {
    fn get(&self, index: usize) -> Option<PairSample> {
        self.samples.get(index).cloned()
    }

    fn len(&self) -> usize {
        self.samples.len()
    }
}

/// One encoded sentence for language-model training.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SentenceSample {
    pub tokens: Vec<u32>,
}

pub struct SentenceDataset {
    samples: Vec<SentenceSample>,
}

impl SentenceDataset {
    pub fn from_sentences(sentences: &[Vec<String>], dictionary: &Dictionary) -> Self {
        let samples = sentences
            .iter()
            .map(|s| SentenceSample { tokens: dictionary.encode(s) })
            .collect();
        Self { samples }
    }
}

impl Dataset<SentenceSample> for SentenceDataset {
    fn get(&self, index: usize) -> Option<SentenceSample> {
        self.samples.get(index).cloned()
    }

    fn len(&self) -> usize {
        self.samples.len()
    }
}

/// A (center, context) word pair for skip-gram training.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkipGramSample {
    pub center:  u32,
    pub context: u32,
}

pub struct SkipGramDataset {
    samples: Vec<SkipGramSample>,
}

impl SkipGramDataset {
    pub fn new(samples: Vec<SkipGramSample>) -> Self { Self { samples } }
}

impl Dataset<SkipGramSample> for SkipGramDataset {
    fn get(&self, index: usize) -> Option<SkipGramSample> {
        self.samples.get(index).copied()
    }

    fn len(&self) -> usize {
        self.samples.len()
    }
}
