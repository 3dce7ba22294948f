//! Line-based terminal presentation for both game modes.

use anyhow::Result;
use std::io::Write;
use std::time::Duration;
use strictly_wordchain::{
    MatchHandle, MatchSnapshot, Outcome, Phase, PracticeMatch, PracticeSnapshot, RejectionReason,
    Source,
};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, info, instrument};

const RESTART: &str = "/restart";
const QUIT: &str = "/quit";

/// What the user typed.
enum Input {
    Word(String),
    Restart,
    Quit,
}

fn parse_input(line: Option<String>) -> Input {
    let Some(line) = line else {
        return Input::Quit;
    };
    match line.trim() {
        RESTART => Input::Restart,
        QUIT => Input::Quit,
        word => Input::Word(word.to_string()),
    }
}

fn print_help() {
    println!("단어를 입력하세요. {} 다시 시작, {} 종료", RESTART, QUIT);
}

fn print_countdown(remaining: u32) {
    print!("\r남은 시간: {:>2}초 ", remaining);
    let _ = std::io::stdout().flush();
}

/// Runs a human-vs-computer match until the user quits.
#[instrument(skip(handle))]
pub async fn run_match(handle: MatchHandle) -> Result<()> {
    info!("Starting console match");
    print_help();

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut snapshots = handle.subscribe();
    let mut previous = handle.snapshot();
    render_match(None, &previous);

    loop {
        tokio::select! {
            line = lines.next_line() => match parse_input(line?) {
                Input::Word(word) => {
                    if let Some(reason) = refusal_notice(&handle.snapshot()) {
                        println!("\n  ✗ {}", reason);
                    }
                    handle.submit(word)?
                }
                Input::Restart => handle.restart()?,
                Input::Quit => break,
            },
            changed = snapshots.changed() => {
                if changed.is_err() {
                    break;
                }
                let current = snapshots.borrow_and_update().clone();
                render_match(Some(&previous), &current);
                previous = current;
            }
        }
    }

    println!();
    handle.shutdown().await
}

/// A finished match that already refused once publishes no new snapshot
/// for further submissions, so the refusal is echoed here.
fn refusal_notice(snapshot: &MatchSnapshot) -> Option<RejectionReason> {
    let repeated = snapshot.phase().is_terminal()
        && *snapshot.last_rejection() == Some(RejectionReason::MatchOver);
    repeated.then_some(RejectionReason::MatchOver)
}

fn render_match(previous: Option<&MatchSnapshot>, current: &MatchSnapshot) {
    let only_clock = previous.is_some_and(|p| {
        p.phase() == current.phase()
            && p.entries() == current.entries()
            && p.last_rejection() == current.last_rejection()
    });
    if only_clock {
        print_countdown(*current.remaining_seconds());
        return;
    }

    println!();
    if let Some(last) = current.entries().last() {
        let marker = match last.source() {
            Source::Human => "나",
            Source::Computer => "컴퓨터",
        };
        println!("[{}] {}", marker, last.word());
    }
    if let Some(reply) = current.last_reply()
        && current.entries().last().map(|e| e.word()) == Some(reply)
        && let Some(definition) = reply.definition()
    {
        println!("  {} : {}", reply, definition);
    }
    if let Some(reason) = current.last_rejection() {
        println!("  ✗ {}", reason);
    }
    match current.phase() {
        Phase::ValidatingSubmission => println!("  사전 확인 중..."),
        Phase::SelectingReply => println!("  컴퓨터가 생각 중..."),
        _ => {}
    }
    match current.outcome() {
        Some(Outcome::Win) => println!("승리! 다음 단어를 찾을 수 없습니다. ({} 다시 시작)", RESTART),
        Some(Outcome::Loss) => println!("패배! 시간을 초과했습니다. ({} 다시 시작)", RESTART),
        None => print_countdown(*current.remaining_seconds()),
    }
}

/// Runs a practice match until the user quits.
#[instrument]
pub async fn run_practice(seconds: u32, two_player: bool) -> Result<()> {
    info!("Starting console practice");
    print_help();

    let mut practice = PracticeMatch::new(seconds);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut interval = tokio::time::interval(Duration::from_secs(1));
    let mut armed: Option<u64> = None;
    let mut previous = practice.snapshot();
    render_practice(None, &previous, two_player);

    loop {
        tokio::select! {
            line = lines.next_line() => match parse_input(line?) {
                Input::Word(word) => {
                    if let Err(reason) = practice.submit(&word) {
                        debug!(%reason, "Practice word refused");
                    }
                }
                Input::Restart => practice.restart(),
                Input::Quit => break,
            },
            _ = interval.tick() => {
                if let Some(generation) = armed {
                    practice.tick(generation);
                }
            }
        }

        let clock = practice.clock();
        let wanted = clock.is_running().then(|| clock.generation());
        if wanted != armed {
            interval.reset();
            armed = wanted;
        }

        let current = practice.snapshot();
        if current != previous {
            render_practice(Some(&previous), &current, two_player);
            previous = current;
        }
    }

    println!();
    Ok(())
}

fn render_practice(previous: Option<&PracticeSnapshot>, current: &PracticeSnapshot, two_player: bool) {
    let only_clock = previous.is_some_and(|p| {
        p.entries() == current.entries()
            && p.last_rejection() == current.last_rejection()
            && p.loser() == current.loser()
    });
    if only_clock {
        print_countdown(*current.remaining_seconds());
        return;
    }

    println!();
    if let Some(last) = current.entries().last() {
        println!("  {}", last.word());
    }
    if let Some(reason) = current.last_rejection() {
        println!("  ✗ {}", reason);
    }
    if current.loser().is_some() {
        println!("패배! 시간을 초과했습니다. ({} 다시 시작)", RESTART);
        return;
    }
    if two_player {
        println!("{} 순서", current.to_move());
    }
    print_countdown(*current.remaining_seconds());
}

#[cfg(test)]
mod tests {
    use super::*;
    use strictly_wordchain::{FixedPicker, MatchEngine};

    #[test]
    fn test_refusal_notice_only_for_repeated_refusal() {
        let mut engine = MatchEngine::with_picker(1, FixedPicker(0));
        assert_eq!(refusal_notice(&engine.snapshot()), None);

        engine.submit("사과").expect("Valid submission");
        assert_eq!(refusal_notice(&engine.snapshot()), None);

        let generation = engine.clock().generation();
        engine.tick(generation);
        assert_eq!(engine.phase(), Phase::Lost);
        // The first refusal changes the snapshot and renders normally.
        assert_eq!(refusal_notice(&engine.snapshot()), None);

        assert_eq!(engine.submit("과자"), Err(RejectionReason::MatchOver));
        assert_eq!(
            refusal_notice(&engine.snapshot()),
            Some(RejectionReason::MatchOver)
        );
    }
}
