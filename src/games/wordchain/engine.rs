//! Match engine: the turn/validation/timer state machine.
//!
//! The engine is synchronous and performs no I/O. Every input (a command,
//! a lookup result, a clock tick) is applied by one method call and the
//! caller learns from the returned [`Step`] whether it must start a lookup.
//! Lookup results carry the request id they answer; only the latest id per
//! kind is honored, anything older is dropped without touching state.
//!
//! ```text
//! AwaitingSubmission --submit--> ValidatingSubmission
//! ValidatingSubmission --rejected--> AwaitingSubmission
//! ValidatingSubmission --accepted--> SelectingReply
//! SelectingReply --reply--> AwaitingSubmission
//! SelectingReply --no reply--> Won
//! (any non-terminal) --expiry--> Lost
//! (any) --restart--> AwaitingSubmission
//! ```

use super::clock::{DEFAULT_TURN_SECONDS, Expiry, Tick, TurnClock};
use super::ledger::{ChainLedger, LedgerError};
use super::picker::{CandidatePicker, RandomPicker};
use super::types::{
    LookupKind, LookupRequest, MatchSnapshot, Outcome, PendingRequests, Phase, RejectionReason,
    RequestId, Step,
};
use super::word::{ChainEntry, Source, Word};
use crate::dictionary::{Candidate, LookupError};
use tracing::{debug, info, instrument, warn};

/// Human-vs-computer match state machine.
#[derive(Debug)]
pub struct MatchEngine<P = RandomPicker> {
    phase: Phase,
    ledger: ChainLedger,
    clock: TurnClock,
    pending: PendingRequests,
    pending_word: Option<Word>,
    next_request_id: RequestId,
    last_rejection: Option<RejectionReason>,
    outcome: Option<Outcome>,
    last_reply: Option<Word>,
    picker: P,
}

impl MatchEngine<RandomPicker> {
    /// Creates an engine that picks replies with an entropy-seeded RNG.
    #[instrument]
    pub fn new(turn_seconds: u32) -> Self {
        Self::with_picker(turn_seconds, RandomPicker::from_entropy())
    }
}

impl Default for MatchEngine<RandomPicker> {
    fn default() -> Self {
        Self::new(DEFAULT_TURN_SECONDS)
    }
}

impl<P: CandidatePicker> MatchEngine<P> {
    /// Creates an engine with an explicit reply picker.
    #[instrument(skip(picker))]
    pub fn with_picker(turn_seconds: u32, picker: P) -> Self {
        Self {
            phase: Phase::AwaitingSubmission,
            ledger: ChainLedger::new(),
            clock: TurnClock::new(turn_seconds),
            pending: PendingRequests::default(),
            pending_word: None,
            next_request_id: 0,
            last_rejection: None,
            outcome: None,
            last_reply: None,
            picker,
        }
    }

    // ─────────────────────────────────────────────────────────────
    //  Commands
    // ─────────────────────────────────────────────────────────────

    /// Submits the human's word.
    ///
    /// On success the returned existence lookup must be performed and its
    /// result fed to [`resolve_existence`](Self::resolve_existence). A newer
    /// submission supersedes one still being validated.
    ///
    /// # Errors
    ///
    /// - `MatchOver` once the match is won or lost
    /// - `AwaitingReply` while the computer is choosing
    /// - `EmptyWord` for an empty string; clock and ledger stay untouched
    #[instrument(skip(self), fields(phase = %self.phase))]
    pub fn submit(&mut self, text: &str) -> Result<LookupRequest, RejectionReason> {
        if self.phase.is_terminal() {
            return Err(self.reject(RejectionReason::MatchOver));
        }
        if self.phase == Phase::SelectingReply {
            return Err(self.reject(RejectionReason::AwaitingReply));
        }
        if text.is_empty() {
            return Err(self.reject(RejectionReason::EmptyWord));
        }

        self.clock.start();
        self.pending_word = Some(Word::new(text));
        let request = self.issue(LookupKind::Existence, text.to_string());
        self.phase = Phase::ValidatingSubmission;
        info!(request_id = request.id, "Validating submission");
        Ok(request)
    }

    /// Abandons the current match and returns to a fresh, stopped state.
    ///
    /// Valid in every phase. Request ids keep counting, so lookups issued
    /// before the restart can never match afterwards.
    #[instrument(skip(self), fields(phase = %self.phase, len = self.ledger.len()))]
    pub fn restart(&mut self) {
        self.ledger.clear();
        self.clock.reset();
        self.clock.cancel();
        self.pending = PendingRequests::default();
        self.pending_word = None;
        self.last_rejection = None;
        self.outcome = None;
        self.last_reply = None;
        self.phase = Phase::AwaitingSubmission;
        info!("Match restarted");
    }

    // ─────────────────────────────────────────────────────────────
    //  Lookup results
    // ─────────────────────────────────────────────────────────────

    /// Applies the answer to an existence lookup.
    #[instrument(skip(self, result), fields(phase = %self.phase, pending = ?self.pending.existence))]
    pub fn resolve_existence(
        &mut self,
        id: RequestId,
        result: Result<bool, LookupError>,
    ) -> Step {
        if self.pending.existence != Some(id) {
            debug!("Dropping stale existence result");
            return Step::Ignored;
        }
        self.pending.existence = None;

        let Some(word) = self.pending_word.take() else {
            return Step::Ignored;
        };

        match result {
            Err(e) => {
                warn!(error = %e, "Existence lookup failed");
                self.reject_to_turn(RejectionReason::LookupFailure);
                Step::Applied
            }
            Ok(false) => {
                self.reject_to_turn(RejectionReason::NotAWord);
                Step::Applied
            }
            Ok(true) => self.accept(word),
        }
    }

    /// Applies the answer to a candidate lookup and plays the computer's reply.
    #[instrument(skip(self, result), fields(phase = %self.phase, pending = ?self.pending.candidates))]
    pub fn resolve_candidates(
        &mut self,
        id: RequestId,
        result: Result<Vec<Candidate>, LookupError>,
    ) -> Step {
        if self.pending.candidates != Some(id) {
            debug!("Dropping stale candidate result");
            return Step::Ignored;
        }
        self.pending.candidates = None;

        let candidates = match result {
            Ok(candidates) => candidates,
            Err(e) => {
                warn!(error = %e, "Candidate lookup failed");
                self.reject_to_turn(RejectionReason::LookupFailure);
                return Step::Applied;
            }
        };

        let mut playable = self.playable(candidates);
        if playable.is_empty() {
            self.finish(Outcome::Win);
            return Step::Applied;
        }

        let index = self.picker.pick(playable.len()).min(playable.len() - 1);
        let chosen = playable.swap_remove(index);
        let word = Word::with_definition(chosen.word, chosen.definition);

        let appended = self
            .ledger
            .append(ChainEntry::new(word.clone(), Source::Computer));
        assert!(
            appended.is_ok(),
            "filtered candidate rejected by ledger: {:?}",
            appended
        );

        info!(reply = %word, "Computer replied");
        self.last_reply = Some(word);
        self.clock.reset();
        self.phase = Phase::AwaitingSubmission;
        Step::Applied
    }

    // ─────────────────────────────────────────────────────────────
    //  Clock
    // ─────────────────────────────────────────────────────────────

    /// Delivers one elapsed second scheduled under `generation`.
    #[instrument(skip(self), fields(phase = %self.phase))]
    pub fn tick(&mut self, generation: u64) -> Step {
        match self.clock.tick(generation) {
            Tick::Stale => Step::Ignored,
            Tick::Counted { .. } => Step::Applied,
            Tick::Expired(expiry) => self.expire(expiry),
        }
    }

    /// Handles a clock expiry. Expiries from an older generation are ignored.
    #[instrument(skip(self), fields(phase = %self.phase, current = self.clock.generation()))]
    fn expire(&mut self, expiry: Expiry) -> Step {
        if self.phase.is_terminal() || !self.clock.is_current(expiry) {
            debug!("Dropping stale expiry");
            return Step::Ignored;
        }
        self.finish(Outcome::Loss);
        Step::Applied
    }

    // ─────────────────────────────────────────────────────────────
    //  Accessors
    // ─────────────────────────────────────────────────────────────

    /// Current phase.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Accepted words so far.
    pub fn ledger(&self) -> &ChainLedger {
        &self.ledger
    }

    /// The turn clock.
    pub fn clock(&self) -> &TurnClock {
        &self.clock
    }

    /// Request ids currently awaited.
    pub fn pending(&self) -> PendingRequests {
        self.pending
    }

    /// Most recent rejection, cleared when a word is accepted.
    pub fn last_rejection(&self) -> Option<RejectionReason> {
        self.last_rejection
    }

    /// Final result, once terminal.
    pub fn outcome(&self) -> Option<Outcome> {
        self.outcome
    }

    /// The computer's most recent word, with its definition.
    pub fn last_reply(&self) -> Option<&Word> {
        self.last_reply.as_ref()
    }

    /// Copies the presentation-facing state.
    #[instrument(skip(self))]
    pub fn snapshot(&self) -> MatchSnapshot {
        MatchSnapshot::new(
            self.phase,
            self.ledger.entries().to_vec(),
            self.clock.remaining(),
            self.clock.is_running(),
            self.last_rejection,
            self.outcome,
            self.last_reply.clone(),
        )
    }

    // ─────────────────────────────────────────────────────────────
    //  Internals
    // ─────────────────────────────────────────────────────────────

    fn issue(&mut self, kind: LookupKind, query: String) -> LookupRequest {
        self.next_request_id += 1;
        let id = self.next_request_id;
        match kind {
            LookupKind::Existence => self.pending.existence = Some(id),
            LookupKind::CandidateList => self.pending.candidates = Some(id),
        }
        debug!(%kind, id, query = %query, "Issued lookup");
        LookupRequest { kind, query, id }
    }

    fn reject(&mut self, reason: RejectionReason) -> RejectionReason {
        warn!(%reason, "Submission rejected");
        self.last_rejection = Some(reason);
        reason
    }

    /// Rejects and hands the turn back without touching the clock.
    fn reject_to_turn(&mut self, reason: RejectionReason) {
        self.reject(reason);
        self.phase = Phase::AwaitingSubmission;
    }

    fn accept(&mut self, word: Word) -> Step {
        let Some(start) = word.last_char() else {
            self.reject_to_turn(RejectionReason::EmptyWord);
            return Step::Applied;
        };

        match self.ledger.append(ChainEntry::new(word, Source::Human)) {
            Ok(()) => {}
            Err(e) => {
                let reason = match e {
                    LedgerError::DuplicateWord(_) => RejectionReason::DuplicateWord,
                    LedgerError::BrokenChain { .. } => RejectionReason::BrokenChain,
                    LedgerError::EmptyWord => RejectionReason::EmptyWord,
                };
                self.reject_to_turn(reason);
                return Step::Applied;
            }
        }

        self.last_rejection = None;
        self.clock.reset();
        let request = self.issue(LookupKind::CandidateList, start.to_string());
        self.phase = Phase::SelectingReply;
        info!(request_id = request.id, "Submission accepted, selecting reply");
        Step::Lookup(request)
    }

    /// Keeps candidates the computer may legally play.
    fn playable(&self, candidates: Vec<Candidate>) -> Vec<Candidate> {
        let required = self.ledger.required_start();
        candidates
            .into_iter()
            .filter(|c| c.word.chars().count() > 1)
            .filter(|c| !self.ledger.contains(&c.word))
            .filter(|c| required.is_none_or(|ch| c.word.starts_with(ch)))
            .collect()
    }

    fn finish(&mut self, outcome: Outcome) {
        self.outcome = Some(outcome);
        self.phase = match outcome {
            Outcome::Win => Phase::Won,
            Outcome::Loss => Phase::Lost,
        };
        self.pending = PendingRequests::default();
        self.pending_word = None;
        self.clock.cancel();
        info!(%outcome, len = self.ledger.len(), "Match finished");
    }
}
