//! Word-chain game: ledger, turn clock, and the human-vs-computer engine.

mod clock;
mod engine;
mod ledger;
mod picker;
mod practice;
mod types;
mod word;

pub use clock::{DEFAULT_TURN_SECONDS, Expiry, Tick, TurnClock};
pub use engine::MatchEngine;
pub use ledger::{ChainLedger, LedgerError};
pub use picker::{CandidatePicker, FixedPicker, RandomPicker};
pub use practice::{PracticeMatch, PracticeSnapshot, Seat};
pub use types::{
    LookupKind, LookupRequest, MatchSnapshot, Outcome, PendingRequests, Phase, RejectionReason,
    RequestId, Step,
};
pub use word::{ChainEntry, Source, Word};
