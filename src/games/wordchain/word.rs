//! Word tokens and chain entries.
//!
//! A [`Word`] is immutable once created. Only the computer's replies carry a
//! definition; human submissions never do.

use serde::{Deserialize, Serialize};
use tracing::instrument;

/// A word played in the chain.
///
/// Equality and hashing consider only the text; two words with the same
/// spelling are the same word regardless of definition.
#[derive(Debug, Clone, Eq, Serialize, Deserialize)]
pub struct Word {
    text: String,
    definition: Option<String>,
}

impl Word {
    /// Creates a word without a definition.
    #[instrument(skip(text))]
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            definition: None,
        }
    }

    /// Creates a word with an optional definition attached.
    #[instrument(skip(text, definition))]
    pub fn with_definition(text: impl Into<String>, definition: Option<String>) -> Self {
        Self {
            text: text.into(),
            definition,
        }
    }

    /// Returns the spelling.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Returns the definition, if the dictionary supplied one.
    pub fn definition(&self) -> Option<&str> {
        self.definition.as_deref()
    }

    /// First character (syllable for Hangul).
    pub fn first_char(&self) -> Option<char> {
        self.text.chars().next()
    }

    /// Last character (syllable for Hangul).
    pub fn last_char(&self) -> Option<char> {
        self.text.chars().next_back()
    }

    /// Length in characters, not bytes.
    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }

    /// Returns true if the spelling is empty.
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

impl PartialEq for Word {
    fn eq(&self, other: &Self) -> bool {
        self.text == other.text
    }
}

impl std::hash::Hash for Word {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.text.hash(state);
    }
}

impl std::fmt::Display for Word {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.text)
    }
}

/// Who supplied a chain entry.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display,
)]
pub enum Source {
    /// Typed by the human player.
    Human,
    /// Chosen by the computer from dictionary candidates.
    Computer,
}

/// One accepted word in the chain, tagged with its source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, derive_new::new)]
pub struct ChainEntry {
    word: Word,
    source: Source,
}

impl ChainEntry {
    /// Returns the accepted word.
    pub fn word(&self) -> &Word {
        &self.word
    }

    /// Returns who supplied the word.
    pub fn source(&self) -> Source {
        self.source
    }
}
