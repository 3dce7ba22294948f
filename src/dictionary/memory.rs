//! Offline dictionary backed by a word list.

use super::gateway::{Candidate, DictionaryGateway, LookupError};
use std::collections::HashMap;
use std::path::Path;
use tracing::{debug, info, instrument};

/// In-memory dictionary answering both lookups locally.
///
/// Candidate order follows insertion order.
#[derive(Debug, Clone, Default)]
pub struct MemoryDictionary {
    words: Vec<Candidate>,
    index: HashMap<String, usize>,
    candidate_limit: usize,
}

impl MemoryDictionary {
    /// Creates an empty dictionary returning at most `candidate_limit` candidates.
    #[instrument]
    pub fn new(candidate_limit: usize) -> Self {
        Self {
            words: Vec::new(),
            index: HashMap::new(),
            candidate_limit,
        }
    }

    /// Adds a word. Re-adding a word replaces its definition.
    #[instrument(skip(self, definition))]
    pub fn insert(&mut self, word: &str, definition: Option<&str>) {
        let candidate = Candidate::new(word.to_string(), definition.map(str::to_string));
        match self.index.get(word) {
            Some(&pos) => self.words[pos] = candidate,
            None => {
                self.index.insert(word.to_string(), self.words.len());
                self.words.push(candidate);
            }
        }
    }

    /// Parses `word<TAB>definition` lines. Blank lines and `#` comments are skipped.
    #[instrument(skip(text))]
    pub fn from_word_list(text: &str, candidate_limit: usize) -> Self {
        let mut dictionary = Self::new(candidate_limit);
        for line in text.lines().map(str::trim) {
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let (word, definition) = match line.split_once('\t') {
                Some((word, definition)) => (word.trim(), Some(definition.trim())),
                None => (line, None),
            };
            dictionary.insert(word, definition.filter(|d| !d.is_empty()));
        }
        debug!(words = dictionary.len(), "Parsed word list");
        dictionary
    }

    /// Loads a word list file.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>, candidate_limit: usize) -> std::io::Result<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        let dictionary = Self::from_word_list(&text, candidate_limit);
        info!(words = dictionary.len(), "Loaded offline dictionary");
        Ok(dictionary)
    }

    /// Number of known words.
    pub fn len(&self) -> usize {
        self.words.len()
    }

    /// Returns true if no words are known.
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

#[async_trait::async_trait]
impl DictionaryGateway for MemoryDictionary {
    #[instrument(skip(self))]
    async fn check_exists(&self, word: &str) -> Result<bool, LookupError> {
        Ok(self.index.contains_key(word))
    }

    #[instrument(skip(self))]
    async fn list_candidates(&self, start: char) -> Result<Vec<Candidate>, LookupError> {
        Ok(self
            .words
            .iter()
            .filter(|c| c.word.starts_with(start))
            .take(self.candidate_limit)
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WORDS: &str = "# sample\n사과\t과일의 하나\n과자\n\n과일\t\n자동차\t바퀴 달린 탈것\n";

    #[tokio::test]
    async fn test_word_list_lookup() {
        let dictionary = MemoryDictionary::from_word_list(WORDS, 10);
        assert_eq!(dictionary.len(), 4);
        assert!(dictionary.check_exists("사과").await.unwrap());
        assert!(!dictionary.check_exists("바나나").await.unwrap());
    }

    #[tokio::test]
    async fn test_candidates_respect_prefix_and_limit() {
        let dictionary = MemoryDictionary::from_word_list(WORDS, 1);
        let candidates = dictionary.list_candidates('과').await.unwrap();
        assert_eq!(candidates, vec![Candidate::new("과자".to_string(), None)]);

        let dictionary = MemoryDictionary::from_word_list(WORDS, 10);
        let candidates = dictionary.list_candidates('과').await.unwrap();
        assert_eq!(candidates.len(), 2);
        assert_eq!(candidates[1].definition, None);
    }
}
