//! Async driver that runs a [`MatchEngine`] against a dictionary gateway.
//!
//! The engine lives on a single task. Commands from the presentation
//! surface, lookup completions and clock ticks all arrive on channels and
//! are applied one at a time, so no transition ever runs concurrently with
//! another. Lookups run on their own tasks and are never aborted; a result
//! for a superseded request is simply dropped by the engine. The ticker is
//! re-armed whenever the clock's generation changes, and ticks already
//! queued under the old generation are dropped the same way.

use crate::dictionary::{DictionaryGateway, LookupError, LookupErrorKind};
use crate::games::wordchain::{
    CandidatePicker, LookupKind, LookupRequest, MatchEngine, MatchSnapshot, RandomPicker,
    RequestId, Step,
};
use anyhow::{Context, Result};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info, instrument, warn};

/// Commands the presentation surface may issue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchCommand {
    /// Play a word.
    Submit(String),
    /// Start over.
    Restart,
}

/// Internal inputs produced by lookups and the ticker.
#[derive(Debug)]
enum SessionEvent {
    Existence {
        id: RequestId,
        result: Result<bool, LookupError>,
    },
    Candidates {
        id: RequestId,
        result: Result<Vec<crate::dictionary::Candidate>, LookupError>,
    },
    Tick {
        generation: u64,
    },
}

/// Owns the engine and everything that feeds it.
pub struct MatchSession<P = RandomPicker> {
    engine: MatchEngine<P>,
    gateway: Arc<dyn DictionaryGateway>,
    tick_period: Duration,
}

impl<P: CandidatePicker + 'static> MatchSession<P> {
    /// Creates a session with one-second ticks.
    #[instrument(skip_all)]
    pub fn new(engine: MatchEngine<P>, gateway: Arc<dyn DictionaryGateway>) -> Self {
        Self {
            engine,
            gateway,
            tick_period: Duration::from_secs(1),
        }
    }

    /// Overrides the wall-clock length of one countdown second.
    pub fn with_tick_period(mut self, tick_period: Duration) -> Self {
        self.tick_period = tick_period;
        self
    }

    /// Starts the driver task and returns the handle used to talk to it.
    #[instrument(skip(self), fields(tick_period = ?self.tick_period))]
    pub fn spawn(self) -> MatchHandle {
        let (command_tx, command_rx) = mpsc::unbounded_channel();
        let (snapshot_tx, snapshot_rx) = watch::channel(self.engine.snapshot());
        let (event_tx, event_rx) = mpsc::unbounded_channel();

        let driver = Driver {
            engine: self.engine,
            gateway: self.gateway,
            tick_period: self.tick_period,
            event_tx,
            event_rx,
            snapshot_tx,
            ticker: None,
        };

        let task = tokio::spawn(driver.run(command_rx));
        info!("Match session started");

        MatchHandle {
            commands: command_tx,
            snapshots: snapshot_rx,
            task,
        }
    }
}

/// Presentation-side handle: send commands, read snapshots.
#[derive(Debug)]
pub struct MatchHandle {
    commands: mpsc::UnboundedSender<MatchCommand>,
    snapshots: watch::Receiver<MatchSnapshot>,
    task: JoinHandle<()>,
}

impl MatchHandle {
    /// Submits a word for the human.
    #[instrument(skip(self, word))]
    pub fn submit(&self, word: impl Into<String>) -> Result<()> {
        self.send(MatchCommand::Submit(word.into()))
    }

    /// Restarts the match.
    #[instrument(skip(self))]
    pub fn restart(&self) -> Result<()> {
        self.send(MatchCommand::Restart)
    }

    /// Sends a raw command.
    pub fn send(&self, command: MatchCommand) -> Result<()> {
        self.commands
            .send(command)
            .ok()
            .context("Match session has stopped")
    }

    /// Latest published state.
    pub fn snapshot(&self) -> MatchSnapshot {
        self.snapshots.borrow().clone()
    }

    /// A receiver notified on every state change.
    pub fn subscribe(&self) -> watch::Receiver<MatchSnapshot> {
        self.snapshots.clone()
    }

    /// Stops accepting commands and waits for the driver to finish.
    #[instrument(skip(self))]
    pub async fn shutdown(self) -> Result<()> {
        drop(self.commands);
        self.task.await.context("Match session task failed")?;
        info!("Match session stopped");
        Ok(())
    }
}

struct Driver<P> {
    engine: MatchEngine<P>,
    gateway: Arc<dyn DictionaryGateway>,
    tick_period: Duration,
    event_tx: mpsc::UnboundedSender<SessionEvent>,
    event_rx: mpsc::UnboundedReceiver<SessionEvent>,
    snapshot_tx: watch::Sender<MatchSnapshot>,
    ticker: Option<(u64, JoinHandle<()>)>,
}

impl<P: CandidatePicker + 'static> Driver<P> {
    async fn run(mut self, mut commands: mpsc::UnboundedReceiver<MatchCommand>) {
        loop {
            tokio::select! {
                command = commands.recv() => match command {
                    Some(command) => self.handle_command(command),
                    None => break,
                },
                Some(event) = self.event_rx.recv() => self.handle_event(event),
            }
            self.sync_ticker();
            self.publish();
        }

        if let Some((_, handle)) = self.ticker.take() {
            handle.abort();
        }
        debug!("Driver loop exited");
    }

    #[instrument(skip(self))]
    fn handle_command(&mut self, command: MatchCommand) {
        match command {
            MatchCommand::Submit(word) => match self.engine.submit(&word) {
                Ok(request) => self.dispatch(request),
                Err(reason) => debug!(%reason, "Submission refused"),
            },
            MatchCommand::Restart => self.engine.restart(),
        }
    }

    #[instrument(skip(self))]
    fn handle_event(&mut self, event: SessionEvent) {
        let step = match event {
            SessionEvent::Existence { id, result } => self.engine.resolve_existence(id, result),
            SessionEvent::Candidates { id, result } => self.engine.resolve_candidates(id, result),
            SessionEvent::Tick { generation } => self.engine.tick(generation),
        };
        if let Step::Lookup(request) = step {
            self.dispatch(request);
        }
    }

    /// Runs a lookup on its own task and routes the answer back.
    #[instrument(skip(self), fields(kind = %request.kind, id = request.id))]
    fn dispatch(&self, request: LookupRequest) {
        let gateway = Arc::clone(&self.gateway);
        let tx = self.event_tx.clone();

        tokio::spawn(async move {
            let event = match request.kind {
                LookupKind::Existence => SessionEvent::Existence {
                    id: request.id,
                    result: gateway.check_exists(&request.query).await,
                },
                LookupKind::CandidateList => {
                    let result = match request.start_char() {
                        Some(start) => gateway.list_candidates(start).await,
                        None => Err(LookupError::new(
                            LookupErrorKind::Malformed,
                            "Candidate query without a start character",
                        )),
                    };
                    SessionEvent::Candidates {
                        id: request.id,
                        result,
                    }
                }
            };
            if tx.send(event).is_err() {
                warn!("Lookup finished after session stopped");
            }
        });
    }

    /// Keeps exactly one ticker alive for the running clock's generation.
    fn sync_ticker(&mut self) {
        let clock = self.engine.clock();
        let wanted = clock.is_running().then(|| clock.generation());
        let armed = self.ticker.as_ref().map(|(generation, _)| *generation);
        if wanted == armed {
            return;
        }

        if let Some((_, handle)) = self.ticker.take() {
            handle.abort();
        }

        if let Some(generation) = wanted {
            let tx = self.event_tx.clone();
            let period = self.tick_period;
            let handle = tokio::spawn(async move {
                let start = tokio::time::Instant::now() + period;
                let mut interval = tokio::time::interval_at(start, period);
                loop {
                    interval.tick().await;
                    if tx.send(SessionEvent::Tick { generation }).is_err() {
                        break;
                    }
                }
            });
            debug!(generation, "Ticker armed");
            self.ticker = Some((generation, handle));
        }
    }

    fn publish(&self) {
        let next = self.engine.snapshot();
        self.snapshot_tx.send_if_modified(|current| {
            if *current == next {
                false
            } else {
                *current = next;
                true
            }
        });
    }
}
