//! Phoneme token and sequence value objects
//!
//! Transcriptions arrive as IPA-like strings with phonemes separated by
//! whitespace. Both the reference and the learner attempt are normalized
//! to Unicode NFKC before splitting so that visually identical phonemes
//! compare equal regardless of how the provider encoded them.

use std::fmt;

use serde::{Deserialize, Serialize};
use unicode_normalization::UnicodeNormalization;

/// A single normalized phonetic unit
///
/// Never empty and never contains whitespace.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PhonemeToken(String);

impl PhonemeToken {
    /// Create a token from a raw fragment
    ///
    /// Returns `None` when the normalized fragment is empty or would
    /// split into more than one token.
    #[must_use]
    pub fn new(raw: &str) -> Option<Self> {
        let normalized: String = raw.nfkc().collect();
        let trimmed = normalized.trim();
        if trimmed.is_empty() || trimmed.chars().any(char::is_whitespace) {
            return None;
        }
        Some(Self(trimmed.to_string()))
    }

    /// Get the token as a string slice
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for PhonemeToken {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PhonemeToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Ordered sequence of phoneme tokens
///
/// Built once per request from the raw output of a phonemizer or recognizer
/// and never mutated afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PhonemeSequence {
    tokens: Vec<PhonemeToken>,
}

impl PhonemeSequence {
    /// Tokenize a raw transcription
    ///
    /// Applies NFKC normalization, splits on whitespace and drops empty
    /// fragments. Empty input yields an empty sequence.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        let normalized: String = raw.nfkc().collect();
        let tokens = normalized
            .split_whitespace()
            .map(|fragment| PhonemeToken(fragment.to_string()))
            .collect();
        Self { tokens }
    }

    /// Build a sequence from already-validated tokens
    #[must_use]
    pub fn from_tokens(tokens: Vec<PhonemeToken>) -> Self {
        Self { tokens }
    }

    /// Number of tokens
    #[must_use]
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    /// Whether the sequence has no tokens
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Borrow the tokens
    #[must_use]
    pub fn tokens(&self) -> &[PhonemeToken] {
        &self.tokens
    }

    /// Get the token at `index`
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&PhonemeToken> {
        self.tokens.get(index)
    }

    /// Iterate over the tokens in order
    pub fn iter(&self) -> std::slice::Iter<'_, PhonemeToken> {
        self.tokens.iter()
    }
}

impl<'a> IntoIterator for &'a PhonemeSequence {
    type Item = &'a PhonemeToken;
    type IntoIter = std::slice::Iter<'a, PhonemeToken>;

    fn into_iter(self) -> Self::IntoIter {
        self.tokens.iter()
    }
}

impl From<&str> for PhonemeSequence {
    fn from(raw: &str) -> Self {
        Self::parse(raw)
    }
}

impl fmt::Display for PhonemeSequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, token) in self.tokens.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            f.write_str(token.as_str())?;
        }
        Ok(())
    }
}
