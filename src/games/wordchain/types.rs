//! Core domain types for the word-chain match.

use super::word::{ChainEntry, Word};
use serde::{Deserialize, Serialize};

/// Where the match currently stands.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, strum::Display,
)]
pub enum Phase {
    /// Human's turn; waiting for a word.
    #[default]
    AwaitingSubmission,
    /// Existence lookup for the human's word is in flight.
    ValidatingSubmission,
    /// Candidate lookup for the computer's reply is in flight.
    SelectingReply,
    /// Computer found no reply. Terminal.
    Won,
    /// Turn clock expired. Terminal.
    Lost,
}

impl Phase {
    /// Returns true for `Won` and `Lost`.
    pub fn is_terminal(self) -> bool {
        matches!(self, Phase::Won | Phase::Lost)
    }
}

/// Result of a finished match, from the human's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display)]
pub enum Outcome {
    /// The computer could not continue the chain.
    Win,
    /// The human ran out of time.
    Loss,
}

/// Why a submission was refused. All are recoverable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, derive_more::Display)]
pub enum RejectionReason {
    /// Nothing was typed.
    #[display("Enter a word first")]
    EmptyWord,
    /// The dictionary does not know the word.
    #[display("That word is not in the dictionary")]
    NotAWord,
    /// The word was already played this match.
    #[display("That word was already played")]
    DuplicateWord,
    /// The word does not start with the previous word's last character.
    #[display("The word must start with the last character of the previous word")]
    BrokenChain,
    /// The dictionary could not be reached or answered nonsense.
    #[display("Dictionary lookup failed; submit again")]
    LookupFailure,
    /// The match already ended; restart to play again.
    #[display("The match is over; restart to play again")]
    MatchOver,
    /// The computer is still choosing its reply.
    #[display("Wait for the computer's reply")]
    AwaitingReply,
}

/// Which kind of dictionary query a request is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display)]
pub enum LookupKind {
    /// Does this exact word exist?
    Existence,
    /// Which words start with this character?
    CandidateList,
}

/// Monotonic per-engine request identifier.
pub type RequestId = u64;

/// A dictionary query the engine wants performed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LookupRequest {
    /// Query kind.
    pub kind: LookupKind,
    /// Word to check, or the single starting character for candidates.
    pub query: String,
    /// Identifier the response must echo to be applied.
    pub id: RequestId,
}

impl LookupRequest {
    /// Starting character of a candidate query.
    pub fn start_char(&self) -> Option<char> {
        self.query.chars().next()
    }
}

/// Request ids the engine is currently waiting on, one per kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PendingRequests {
    /// Outstanding existence lookup.
    pub existence: Option<RequestId>,
    /// Outstanding candidate lookup.
    pub candidates: Option<RequestId>,
}

/// What an incoming event did to the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    /// State changed; the caller must perform this lookup next.
    Lookup(LookupRequest),
    /// State changed; nothing further to do.
    Applied,
    /// The event was stale or irrelevant; state is untouched.
    Ignored,
}

/// Read-only view of the match for the presentation surface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, derive_getters::Getters)]
pub struct MatchSnapshot {
    phase: Phase,
    entries: Vec<ChainEntry>,
    remaining_seconds: u32,
    clock_running: bool,
    last_rejection: Option<RejectionReason>,
    outcome: Option<Outcome>,
    last_reply: Option<Word>,
}

impl MatchSnapshot {
    pub(crate) fn new(
        phase: Phase,
        entries: Vec<ChainEntry>,
        remaining_seconds: u32,
        clock_running: bool,
        last_rejection: Option<RejectionReason>,
        outcome: Option<Outcome>,
        last_reply: Option<Word>,
    ) -> Self {
        Self {
            phase,
            entries,
            remaining_seconds,
            clock_running,
            last_rejection,
            outcome,
            last_reply,
        }
    }
}
