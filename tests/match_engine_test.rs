//! Tests for the match engine state machine.

use strictly_wordchain::{
    Candidate, FixedPicker, LookupError, LookupErrorKind, LookupKind, LookupRequest,
    MatchEngine, Outcome, Phase, RejectionReason, Source, Step,
};

fn engine() -> MatchEngine<FixedPicker> {
    MatchEngine::with_picker(10, FixedPicker(0))
}

fn candidate(word: &str, definition: Option<&str>) -> Candidate {
    Candidate::new(word.to_string(), definition.map(str::to_string))
}

fn transport_error() -> LookupError {
    LookupError::new(LookupErrorKind::Transport, "connection refused")
}

fn expect_lookup(step: Step) -> LookupRequest {
    match step {
        Step::Lookup(request) => request,
        other => panic!("Expected a lookup, got {:?}", other),
    }
}

fn words(engine: &MatchEngine<FixedPicker>) -> Vec<String> {
    engine
        .ledger()
        .entries()
        .iter()
        .map(|e| e.word().text().to_string())
        .collect()
}

/// Plays 사과 (human) and 과자 (computer).
fn play_opening(engine: &mut MatchEngine<FixedPicker>) {
    let existence = engine.submit("사과").expect("Valid submission");
    let candidates = expect_lookup(engine.resolve_existence(existence.id, Ok(true)));
    let step = engine.resolve_candidates(
        candidates.id,
        Ok(vec![candidate("과자", Some("밀가루나 쌀가루 따위로 만든 음식"))]),
    );
    assert_eq!(step, Step::Applied);
}

fn tick_current(engine: &mut MatchEngine<FixedPicker>, times: usize) -> Step {
    let mut last = Step::Ignored;
    for _ in 0..times {
        let generation = engine.clock().generation();
        last = engine.tick(generation);
    }
    last
}

#[test]
fn test_human_word_then_computer_reply() {
    let mut engine = engine();

    let existence = engine.submit("사과").expect("Valid submission");
    assert_eq!(existence.kind, LookupKind::Existence);
    assert_eq!(existence.query, "사과");
    assert_eq!(engine.phase(), Phase::ValidatingSubmission);
    assert!(engine.clock().is_running());

    let candidates = expect_lookup(engine.resolve_existence(existence.id, Ok(true)));
    assert_eq!(candidates.kind, LookupKind::CandidateList);
    assert_eq!(candidates.start_char(), Some('과'));
    assert_eq!(engine.phase(), Phase::SelectingReply);
    assert_eq!(words(&engine), vec!["사과"]);
    assert_eq!(engine.ledger().entries()[0].source(), Source::Human);

    let step = engine.resolve_candidates(candidates.id, Ok(vec![candidate("과자", Some("snack"))]));
    assert_eq!(step, Step::Applied);
    assert_eq!(words(&engine), vec!["사과", "과자"]);
    assert_eq!(engine.ledger().entries()[1].source(), Source::Computer);
    assert_eq!(engine.clock().remaining(), 10);
    assert_eq!(engine.phase(), Phase::AwaitingSubmission);
    assert_eq!(engine.last_reply().and_then(|w| w.definition()), Some("snack"));
}

#[test]
fn test_no_candidates_is_a_win() {
    let mut engine = engine();
    play_opening(&mut engine);

    let existence = engine.submit("자동차").expect("Valid submission");
    let candidates = expect_lookup(engine.resolve_existence(existence.id, Ok(true)));
    assert_eq!(candidates.start_char(), Some('차'));

    let step = engine.resolve_candidates(candidates.id, Ok(vec![candidate("차", None)]));
    assert_eq!(step, Step::Applied);
    assert_eq!(engine.outcome(), Some(Outcome::Win));
    assert_eq!(engine.phase(), Phase::Won);
    assert!(!engine.clock().is_running());
    assert_eq!(engine.ledger().len(), 3);
}

#[test]
fn test_expiry_loses_and_blocks_submissions() {
    let mut engine = engine();
    play_opening(&mut engine);

    assert_eq!(tick_current(&mut engine, 9), Step::Applied);
    assert_eq!(engine.phase(), Phase::AwaitingSubmission);
    assert_eq!(engine.clock().remaining(), 1);

    assert_eq!(tick_current(&mut engine, 1), Step::Applied);
    assert_eq!(engine.outcome(), Some(Outcome::Loss));
    assert_eq!(engine.phase(), Phase::Lost);
    assert!(!engine.clock().is_running());

    assert_eq!(engine.submit("자두"), Err(RejectionReason::MatchOver));
    assert_eq!(engine.last_rejection(), Some(RejectionReason::MatchOver));
}

#[test]
fn test_restart_from_lost() {
    let mut engine = engine();
    play_opening(&mut engine);
    tick_current(&mut engine, 10);
    assert_eq!(engine.phase(), Phase::Lost);

    engine.restart();
    assert!(engine.ledger().is_empty());
    assert_eq!(engine.clock().remaining(), 10);
    assert!(!engine.clock().is_running());
    assert_eq!(engine.phase(), Phase::AwaitingSubmission);
    assert_eq!(engine.outcome(), None);
    assert_eq!(engine.last_rejection(), None);
    assert!(engine.last_reply().is_none());
}

#[test]
fn test_superseded_existence_result_is_dropped() {
    let mut engine = engine();
    let first = engine.submit("사과").expect("Valid submission");
    let second = engine.submit("기차").expect("Valid submission");
    assert!(second.id > first.id);

    let before = engine.snapshot();
    assert_eq!(engine.resolve_existence(first.id, Ok(true)), Step::Ignored);
    assert_eq!(engine.snapshot(), before);

    let candidates = expect_lookup(engine.resolve_existence(second.id, Ok(true)));
    assert_eq!(candidates.start_char(), Some('차'));
    assert_eq!(words(&engine), vec!["기차"]);
}

#[test]
fn test_candidate_result_after_restart_is_dropped() {
    let mut engine = engine();
    let existence = engine.submit("사과").expect("Valid submission");
    let candidates = expect_lookup(engine.resolve_existence(existence.id, Ok(true)));

    engine.restart();
    let before = engine.snapshot();
    let step = engine.resolve_candidates(candidates.id, Ok(vec![candidate("과자", None)]));
    assert_eq!(step, Step::Ignored);
    assert_eq!(engine.snapshot(), before);
    assert!(engine.ledger().is_empty());
}

#[test]
fn test_old_generation_expiry_never_loses() {
    let mut engine = engine();
    let existence = engine.submit("사과").expect("Valid submission");
    let old_generation = engine.clock().generation();
    tick_current(&mut engine, 9);
    assert_eq!(engine.clock().remaining(), 1);

    // Acceptance resets the clock; the tick that would have expired the old turn must not count.
    expect_lookup(engine.resolve_existence(existence.id, Ok(true)));
    assert_eq!(engine.tick(old_generation), Step::Ignored);
    assert_eq!(engine.phase(), Phase::SelectingReply);
    assert_eq!(engine.outcome(), None);
    assert_eq!(engine.clock().remaining(), 10);
}

#[test]
fn test_expiry_while_validating_loses_and_drops_late_result() {
    let mut engine = engine();
    let existence = engine.submit("사과").expect("Valid submission");

    assert_eq!(tick_current(&mut engine, 10), Step::Applied);
    assert_eq!(engine.phase(), Phase::Lost);
    assert_eq!(engine.outcome(), Some(Outcome::Loss));
    assert_eq!(engine.pending().existence, None);

    assert_eq!(engine.resolve_existence(existence.id, Ok(true)), Step::Ignored);
    assert!(engine.ledger().is_empty());
    assert_eq!(engine.phase(), Phase::Lost);
}

#[test]
fn test_expiry_while_selecting_reply_loses_and_drops_late_reply() {
    let mut engine = engine();
    let existence = engine.submit("사과").expect("Valid submission");
    let candidates = expect_lookup(engine.resolve_existence(existence.id, Ok(true)));

    assert_eq!(tick_current(&mut engine, 10), Step::Applied);
    assert_eq!(engine.phase(), Phase::Lost);

    let step = engine.resolve_candidates(candidates.id, Ok(vec![candidate("과자", None)]));
    assert_eq!(step, Step::Ignored);
    assert_eq!(words(&engine), vec!["사과"]);
    assert_eq!(engine.outcome(), Some(Outcome::Loss));
    assert!(engine.last_reply().is_none());
}

#[test]
fn test_tick_scheduled_before_reset_is_dropped() {
    let mut engine = engine();
    let existence = engine.submit("사과").expect("Valid submission");
    let armed = engine.clock().generation();
    engine.tick(armed);
    assert_eq!(engine.clock().remaining(), 9);

    // Acceptance resets the clock; the old ticker's next tick must not count.
    expect_lookup(engine.resolve_existence(existence.id, Ok(true)));
    assert_eq!(engine.tick(armed), Step::Ignored);
    assert_eq!(engine.clock().remaining(), 10);
}

#[test]
fn test_rejected_guess_keeps_turn_and_clock() {
    let mut engine = engine();
    play_opening(&mut engine);
    tick_current(&mut engine, 3);
    let generation = engine.clock().generation();

    let existence = engine.submit("바나나").expect("Valid submission");
    assert_eq!(engine.resolve_existence(existence.id, Ok(true)), Step::Applied);

    assert_eq!(engine.last_rejection(), Some(RejectionReason::BrokenChain));
    assert_eq!(engine.phase(), Phase::AwaitingSubmission);
    assert_eq!(engine.clock().remaining(), 7);
    assert_eq!(engine.clock().generation(), generation);
    assert_eq!(engine.ledger().len(), 2);
}

#[test]
fn test_duplicate_word_rejected() {
    let mut engine = engine();
    play_opening(&mut engine);

    let existence = engine.submit("사과").expect("Valid submission");
    engine.resolve_existence(existence.id, Ok(true));
    assert_eq!(engine.last_rejection(), Some(RejectionReason::DuplicateWord));
    assert_eq!(engine.ledger().len(), 2);
}

#[test]
fn test_unknown_word_rejected() {
    let mut engine = engine();
    let existence = engine.submit("사과사과").expect("Valid submission");
    assert_eq!(engine.resolve_existence(existence.id, Ok(false)), Step::Applied);
    assert_eq!(engine.last_rejection(), Some(RejectionReason::NotAWord));
    assert_eq!(engine.phase(), Phase::AwaitingSubmission);
    assert!(engine.ledger().is_empty());
}

#[test]
fn test_empty_word_changes_nothing() {
    let mut engine = engine();
    assert_eq!(engine.submit(""), Err(RejectionReason::EmptyWord));
    assert!(!engine.clock().is_running());
    assert_eq!(engine.phase(), Phase::AwaitingSubmission);
    assert_eq!(engine.pending().existence, None);
}

#[test]
fn test_existence_failure_is_recoverable() {
    let mut engine = engine();
    let existence = engine.submit("사과").expect("Valid submission");
    engine.resolve_existence(existence.id, Err(transport_error()));
    assert_eq!(engine.last_rejection(), Some(RejectionReason::LookupFailure));
    assert_eq!(engine.phase(), Phase::AwaitingSubmission);

    let retry = engine.submit("사과").expect("Resubmission allowed");
    expect_lookup(engine.resolve_existence(retry.id, Ok(true)));
    assert_eq!(engine.last_rejection(), None);
}

#[test]
fn test_candidate_failure_keeps_human_word() {
    let mut engine = engine();
    let existence = engine.submit("사과").expect("Valid submission");
    let candidates = expect_lookup(engine.resolve_existence(existence.id, Ok(true)));

    engine.resolve_candidates(candidates.id, Err(transport_error()));
    assert_eq!(engine.last_rejection(), Some(RejectionReason::LookupFailure));
    assert_eq!(engine.phase(), Phase::AwaitingSubmission);
    assert_eq!(words(&engine), vec!["사과"]);
    assert_eq!(engine.outcome(), None);
}

#[test]
fn test_submission_refused_while_computer_chooses() {
    let mut engine = engine();
    let existence = engine.submit("사과").expect("Valid submission");
    let candidates = expect_lookup(engine.resolve_existence(existence.id, Ok(true)));

    assert_eq!(engine.submit("과일"), Err(RejectionReason::AwaitingReply));
    assert_eq!(engine.phase(), Phase::SelectingReply);
    assert_eq!(engine.pending().candidates, Some(candidates.id));
}

#[test]
fn test_reply_skips_used_and_off_chain_candidates() {
    let mut engine = MatchEngine::with_picker(10, FixedPicker(0));
    let existence = engine.submit("기러기").expect("Valid submission");
    let candidates = expect_lookup(engine.resolve_existence(existence.id, Ok(true)));

    engine.resolve_candidates(
        candidates.id,
        Ok(vec![
            candidate("기러기", None),
            candidate("기", None),
            candidate("나비", None),
            candidate("기차", None),
        ]),
    );
    assert_eq!(words(&engine), vec!["기러기", "기차"]);
}

#[test]
fn test_picker_chooses_among_playable() {
    let mut engine = MatchEngine::with_picker(10, FixedPicker(1));
    let existence = engine.submit("사과").expect("Valid submission");
    let candidates = expect_lookup(engine.resolve_existence(existence.id, Ok(true)));

    engine.resolve_candidates(
        candidates.id,
        Ok(vec![
            candidate("과자", None),
            candidate("과일", Some("fruit")),
            candidate("과학", None),
        ]),
    );
    assert_eq!(words(&engine), vec!["사과", "과일"]);
    assert_eq!(engine.last_reply().and_then(|w| w.definition()), Some("fruit"));
}
