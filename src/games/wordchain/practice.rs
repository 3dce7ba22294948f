//! Single-device practice mode.
//!
//! Two people (or one person practicing alone) share a device. There is no
//! dictionary: a word is accepted when it is non-empty, new, and continues
//! the chain. The first accepted word starts the clock; each accepted word
//! resets it and passes the turn.

use super::clock::{Tick, TurnClock};
use super::ledger::{ChainLedger, LedgerError};
use super::types::{RejectionReason, Step};
use super::word::{ChainEntry, Source, Word};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};

/// Which side of the device is to move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display)]
pub enum Seat {
    /// Player who opened the match.
    #[strum(to_string = "1st")]
    First,
    /// The other player.
    #[strum(to_string = "2nd")]
    Second,
}

impl Seat {
    /// Returns the other seat.
    pub fn opponent(self) -> Self {
        match self {
            Seat::First => Seat::Second,
            Seat::Second => Seat::First,
        }
    }
}

/// Read-only view of a practice match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, derive_getters::Getters)]
pub struct PracticeSnapshot {
    entries: Vec<ChainEntry>,
    remaining_seconds: u32,
    clock_running: bool,
    to_move: Seat,
    last_rejection: Option<RejectionReason>,
    loser: Option<Seat>,
}

/// Human-vs-human match without external validation.
#[derive(Debug, Clone)]
pub struct PracticeMatch {
    ledger: ChainLedger,
    clock: TurnClock,
    to_move: Seat,
    last_rejection: Option<RejectionReason>,
    loser: Option<Seat>,
}

impl PracticeMatch {
    /// Creates a practice match with the given turn duration.
    #[instrument]
    pub fn new(turn_seconds: u32) -> Self {
        Self {
            ledger: ChainLedger::new(),
            clock: TurnClock::new(turn_seconds),
            to_move: Seat::First,
            last_rejection: None,
            loser: None,
        }
    }

    /// Plays a word for the seat to move.
    ///
    /// # Errors
    ///
    /// `MatchOver`, `EmptyWord`, `DuplicateWord` or `BrokenChain`. A refused
    /// word neither passes the turn nor resets the clock.
    #[instrument(skip(self), fields(to_move = %self.to_move))]
    pub fn submit(&mut self, text: &str) -> Result<(), RejectionReason> {
        if self.loser.is_some() {
            return Err(self.reject(RejectionReason::MatchOver));
        }

        let entry = ChainEntry::new(Word::new(text), Source::Human);
        if let Err(e) = self.ledger.append(entry) {
            let reason = match e {
                LedgerError::EmptyWord => RejectionReason::EmptyWord,
                LedgerError::DuplicateWord(_) => RejectionReason::DuplicateWord,
                LedgerError::BrokenChain { .. } => RejectionReason::BrokenChain,
            };
            return Err(self.reject(reason));
        }

        self.clock.start();
        self.clock.reset();
        self.last_rejection = None;
        self.to_move = self.to_move.opponent();
        info!(len = self.ledger.len(), next = %self.to_move, "Practice word accepted");
        Ok(())
    }

    /// Delivers one elapsed second scheduled under `generation`.
    #[instrument(skip(self))]
    pub fn tick(&mut self, generation: u64) -> Step {
        match self.clock.tick(generation) {
            Tick::Stale => Step::Ignored,
            Tick::Counted { .. } => Step::Applied,
            Tick::Expired(expiry) => {
                if !self.clock.is_current(expiry) || self.loser.is_some() {
                    return Step::Ignored;
                }
                self.loser = Some(self.to_move);
                self.clock.cancel();
                info!(loser = %self.to_move, "Practice match timed out");
                Step::Applied
            }
        }
    }

    /// Clears the chain and stops the clock at full duration.
    #[instrument(skip(self))]
    pub fn restart(&mut self) {
        self.ledger.clear();
        self.clock.reset();
        self.clock.cancel();
        self.to_move = Seat::First;
        self.last_rejection = None;
        self.loser = None;
    }

    /// The turn clock.
    pub fn clock(&self) -> &TurnClock {
        &self.clock
    }

    /// Accepted words so far.
    pub fn ledger(&self) -> &ChainLedger {
        &self.ledger
    }

    /// Seat that lost on time, once the match is over.
    pub fn loser(&self) -> Option<Seat> {
        self.loser
    }

    /// Copies the presentation-facing state.
    pub fn snapshot(&self) -> PracticeSnapshot {
        PracticeSnapshot {
            entries: self.ledger.entries().to_vec(),
            remaining_seconds: self.clock.remaining(),
            clock_running: self.clock.is_running(),
            to_move: self.to_move,
            last_rejection: self.last_rejection,
            loser: self.loser,
        }
    }

    fn reject(&mut self, reason: RejectionReason) -> RejectionReason {
        warn!(%reason, "Practice word rejected");
        self.last_rejection = Some(reason);
        reason
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_turn_passes_on_accept_only() {
        let mut practice = PracticeMatch::new(10);
        practice.submit("사과").unwrap();
        assert_eq!(practice.snapshot().to_move(), &Seat::Second);

        assert_eq!(practice.submit("바나나"), Err(RejectionReason::BrokenChain));
        assert_eq!(practice.snapshot().to_move(), &Seat::Second);

        practice.submit("과자").unwrap();
        assert_eq!(practice.snapshot().to_move(), &Seat::First);
    }

    #[test]
    fn test_clock_starts_with_first_word() {
        let mut practice = PracticeMatch::new(10);
        assert!(!practice.clock().is_running());
        assert_eq!(practice.submit(""), Err(RejectionReason::EmptyWord));
        assert!(!practice.clock().is_running());
        practice.submit("사과").unwrap();
        assert!(practice.clock().is_running());
    }

    #[test]
    fn test_timeout_loses_for_seat_to_move() {
        let mut practice = PracticeMatch::new(2);
        practice.submit("사과").unwrap();
        let generation = practice.clock().generation();
        practice.tick(generation);
        assert_eq!(practice.tick(generation), Step::Applied);
        assert_eq!(practice.loser(), Some(Seat::Second));
        assert_eq!(practice.submit("과자"), Err(RejectionReason::MatchOver));

        practice.restart();
        assert!(practice.ledger().is_empty());
        assert_eq!(practice.loser(), None);
        assert_eq!(practice.clock().remaining(), 2);
    }
}
