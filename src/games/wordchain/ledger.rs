//! Append-only chain of accepted words.
//!
//! Invariants enforced on every append:
//! - no two entries share the same spelling (case-sensitive)
//! - each entry starts with the previous entry's last character

use super::word::{ChainEntry, Word};
use serde::Serialize;
use std::collections::HashSet;
use tracing::{debug, instrument};

/// Reasons an append is refused.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum LedgerError {
    /// The word has no characters.
    #[display("Word is empty")]
    EmptyWord,

    /// The word was already played this match.
    #[display("'{}' was already played", _0)]
    DuplicateWord(#[error(not(source))] String),

    /// The word does not start with the previous word's last character.
    #[display("'{}' must start with '{}'", found, expected)]
    BrokenChain {
        /// Character the word had to start with.
        expected: char,
        /// The offending word.
        found: String,
    },
}

/// Ordered, append-only list of accepted words.
///
/// Membership is backed by a set mirror of the sequence.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ChainLedger {
    entries: Vec<ChainEntry>,
    #[serde(skip)]
    seen: HashSet<String>,
}

impl ChainLedger {
    /// Creates an empty ledger.
    #[instrument]
    pub fn new() -> Self {
        Self::default()
    }

    /// Checks whether `word` could be appended, without appending it.
    #[instrument(skip(self), fields(word = %word, len = self.entries.len()))]
    pub fn check(&self, word: &Word) -> Result<(), LedgerError> {
        let Some(first) = word.first_char() else {
            return Err(LedgerError::EmptyWord);
        };

        if self.contains(word.text()) {
            return Err(LedgerError::DuplicateWord(word.text().to_string()));
        }

        if let Some(expected) = self.required_start()
            && first != expected
        {
            return Err(LedgerError::BrokenChain {
                expected,
                found: word.text().to_string(),
            });
        }

        Ok(())
    }

    /// Appends an entry. The only mutator.
    #[instrument(skip(self, entry), fields(word = %entry.word(), source = %entry.source()))]
    pub fn append(&mut self, entry: ChainEntry) -> Result<(), LedgerError> {
        self.check(entry.word())?;
        self.seen.insert(entry.word().text().to_string());
        self.entries.push(entry);
        debug!(len = self.entries.len(), "Appended to chain");
        Ok(())
    }

    /// Most recent word, if any.
    pub fn last_word(&self) -> Option<&Word> {
        self.entries.last().map(ChainEntry::word)
    }

    /// Character the next word must start with, or `None` for an empty chain.
    pub fn required_start(&self) -> Option<char> {
        self.last_word().and_then(Word::last_char)
    }

    /// O(1) membership test on spelling.
    pub fn contains(&self, text: &str) -> bool {
        self.seen.contains(text)
    }

    /// All entries in play order.
    pub fn entries(&self) -> &[ChainEntry] {
        &self.entries
    }

    /// Number of accepted words.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if nothing has been accepted yet.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drops every entry. Only used when a match restarts.
    #[instrument(skip(self), fields(len = self.entries.len()))]
    pub(crate) fn clear(&mut self) {
        self.entries.clear();
        self.seen.clear();
    }
}
