//! Generation-tagged countdown for the active turn.
//!
//! The clock itself does no scheduling. Whoever drives it delivers one tick
//! per elapsed second, tagged with the generation the tick was scheduled
//! under. Every `reset` and `cancel` bumps the generation, so a tick that was
//! already in flight when the turn moved on is recognized and dropped.

use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

/// Per-turn duration used by the original game.
pub const DEFAULT_TURN_SECONDS: u32 = 10;

/// Fired once when the countdown reaches zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Expiry {
    generation: u64,
}

impl Expiry {
    /// Clock generation at the moment of firing.
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// What a delivered tick did to the clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tick {
    /// One second elapsed; time remains.
    Counted {
        /// Seconds left after this tick.
        remaining: u32,
    },
    /// The countdown hit zero and the clock stopped.
    Expired(Expiry),
    /// Tick was scheduled under an old generation, or the clock is stopped.
    Stale,
}

/// Countdown bound to the active turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnClock {
    duration: u32,
    remaining: u32,
    running: bool,
    generation: u64,
}

impl TurnClock {
    /// Creates a stopped clock at full duration.
    #[instrument]
    pub fn new(duration_secs: u32) -> Self {
        let duration = duration_secs.max(1);
        Self {
            duration,
            remaining: duration,
            running: false,
            generation: 0,
        }
    }

    /// Starts counting down. No-op if already running.
    #[instrument(skip(self), fields(generation = self.generation))]
    pub fn start(&mut self) {
        if self.running {
            return;
        }
        self.running = true;
        info!(remaining = self.remaining, "Turn clock started");
    }

    /// Rewinds to full duration without changing whether the clock runs.
    #[instrument(skip(self), fields(generation = self.generation))]
    pub fn reset(&mut self) {
        self.remaining = self.duration;
        self.generation += 1;
        debug!(generation = self.generation, "Turn clock reset");
    }

    /// Stops counting down.
    #[instrument(skip(self), fields(generation = self.generation))]
    pub fn cancel(&mut self) {
        self.running = false;
        self.generation += 1;
        debug!(generation = self.generation, "Turn clock cancelled");
    }

    /// Applies one elapsed second scheduled under `generation`.
    #[instrument(skip(self), fields(current = self.generation, remaining = self.remaining))]
    pub fn tick(&mut self, generation: u64) -> Tick {
        if generation != self.generation || !self.running {
            debug!("Dropping stale tick");
            return Tick::Stale;
        }

        self.remaining = self.remaining.saturating_sub(1);
        if self.remaining == 0 {
            self.running = false;
            info!(generation, "Turn clock expired");
            return Tick::Expired(Expiry { generation });
        }

        Tick::Counted {
            remaining: self.remaining,
        }
    }

    /// Returns true if `expiry` was fired under the current generation.
    pub fn is_current(&self, expiry: Expiry) -> bool {
        expiry.generation == self.generation
    }

    /// Seconds left in the current turn.
    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    /// Full turn duration in seconds.
    pub fn duration(&self) -> u32 {
        self.duration
    }

    /// Whether the countdown is active.
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Current generation.
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

impl Default for TurnClock {
    fn default() -> Self {
        Self::new(DEFAULT_TURN_SECONDS)
    }
}
