//! Strictly Wordchain - Korean word-chain game engine
//!
//! Players alternate words; each must start with the last character of the
//! previous word, must not repeat, and must exist in the dictionary.
//!
//! # Architecture
//!
//! - **Dictionary**: existence and prefix-candidate lookups (remote or offline)
//! - **Games**: chain ledger, generation-tagged turn clock, match engine
//! - **Session**: async driver feeding lookups and ticks into the engine
//! - **Config**: TOML configuration and API key resolution
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use strictly_wordchain::{MatchEngine, MatchSession, MemoryDictionary};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let dictionary = MemoryDictionary::from_word_list("사과\n과자\n", 10);
//! let handle = MatchSession::new(MatchEngine::new(10), Arc::new(dictionary)).spawn();
//! handle.submit("사과")?;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Private module declarations
mod config;
mod dictionary;
mod games;
mod session;

// Crate-level exports - Configuration
pub use config::{ConfigError, GameConfig};

// Crate-level exports - Dictionary gateway
pub use dictionary::{
    Candidate, DictionaryGateway, LookupError, LookupErrorKind, MemoryDictionary, OpenDictConfig,
    OpenDictGateway, normalize_headword,
};

// Crate-level exports - Session driver
pub use session::{MatchCommand, MatchHandle, MatchSession};

// Crate-level exports - Game types (word chain)
pub use games::wordchain::{
    CandidatePicker, ChainEntry, ChainLedger, DEFAULT_TURN_SECONDS, Expiry, FixedPicker,
    LedgerError, LookupKind, LookupRequest, MatchEngine, MatchSnapshot, Outcome, PendingRequests,
    Phase, PracticeMatch, PracticeSnapshot, RandomPicker, RejectionReason, RequestId, Seat,
    Source, Step, Tick, TurnClock, Word,
};
