//! The dispatcher actor.
//!
//! One task owns the [`ModeController`]. Every other part of the process
//! (tracking callbacks, speech, the console) talks to it through a cloneable
//! [`DispatcherHandle`], so the current mode is never shared across threads
//! and robot commands leave in the order requests arrive.
//!
//! The actor stops when the shutdown signal is raised, when every handle is
//! dropped, after a [`ManualCommand::Shutdown`], or on the first
//! [`AsimovError::LinkBroken`]. In the last two cases it raises the shutdown
//! signal itself. A link failure is kept and returned to every later caller.

use std::sync::{Arc, OnceLock};
use std::time::Instant;

use async_trait::async_trait;
use asimov_types::{AsimovError, ManualCommand, Mode, Observation};
use tokio::sync::{mpsc, oneshot, watch};
use tracing::{debug, error, info, warn};

use crate::mode_controller::ModeController;

/// Pending requests buffered before senders wait (observations are dropped
/// instead).
pub const REQUEST_QUEUE: usize = 64;

// ─────────────────────────────────────────────────────────────────────────────
// Commands
// ─────────────────────────────────────────────────────────────────────────────

/// An operator request, whatever channel it came in on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Enter(Mode),
    ExitMode,
    Manual(ManualCommand),
}

impl Command {
    /// Map a recognized voice-command word (case-insensitive).
    ///
    /// ```
    /// use asimov_runtime::dispatcher::Command;
    /// use asimov_types::{ManualCommand, Mode};
    ///
    /// assert_eq!(Command::from_word("follow"), Some(Command::Enter(Mode::Follow)));
    /// assert_eq!(Command::from_word("LEFT"), Some(Command::Manual(ManualCommand::TurnLeft)));
    /// assert_eq!(Command::from_word("dance"), None);
    /// ```
    pub fn from_word(word: &str) -> Option<Self> {
        let command = match word.trim().to_ascii_uppercase().as_str() {
            "FORWARD" => Command::Manual(ManualCommand::MoveForward),
            "BACKWARD" => Command::Manual(ManualCommand::MoveBackward),
            "LEFT" => Command::Manual(ManualCommand::TurnLeft),
            "RIGHT" => Command::Manual(ManualCommand::TurnRight),
            "TURNAROUND" => Command::Manual(ManualCommand::TurnAround),
            "SHUTDOWN" => Command::Manual(ManualCommand::Shutdown),
            "FOLLOW" => Command::Enter(Mode::Follow),
            "AVOID" => Command::Enter(Mode::Avoid),
            "CENTER" => Command::Enter(Mode::Center),
            "DRINK" => Command::Enter(Mode::Drinking),
            "EXIT" => Command::ExitMode,
            _ => return None,
        };
        Some(command)
    }
}

enum Request {
    Observe(Observation),
    Command(Command),
    Status(oneshot::Sender<Mode>),
}

// ─────────────────────────────────────────────────────────────────────────────
// Observer capability
// ─────────────────────────────────────────────────────────────────────────────

/// What a tracking collaborator may do: report where the subject is and ask
/// for a mode change.
#[async_trait]
pub trait Observer: Send + Sync {
    async fn on_observation(&self, observation: Observation) -> Result<(), AsimovError>;

    async fn request_mode_transition(&self, mode: Mode) -> Result<(), AsimovError>;
}

// ─────────────────────────────────────────────────────────────────────────────
// Handle
// ─────────────────────────────────────────────────────────────────────────────

/// Sending side of the dispatcher.
#[derive(Clone)]
pub struct DispatcherHandle {
    requests: mpsc::Sender<Request>,
    failure: Arc<OnceLock<AsimovError>>,
}

impl DispatcherHandle {
    pub async fn request_exit_mode(&self) -> Result<(), AsimovError> {
        self.submit(Command::ExitMode).await
    }

    pub async fn request_manual_command(&self, command: ManualCommand) -> Result<(), AsimovError> {
        self.submit(Command::Manual(command)).await
    }

    pub async fn submit(&self, command: Command) -> Result<(), AsimovError> {
        self.send(Request::Command(command)).await
    }

    /// Current mode, as seen after every earlier request was handled.
    pub async fn status(&self) -> Result<Mode, AsimovError> {
        let (tx, rx) = oneshot::channel();
        self.send(Request::Status(tx)).await?;
        rx.await.map_err(|_| self.stopped())
    }

    pub fn is_closed(&self) -> bool {
        self.requests.is_closed()
    }

    async fn send(&self, request: Request) -> Result<(), AsimovError> {
        self.requests.send(request).await.map_err(|_| self.stopped())
    }

    /// The link failure that stopped the actor, or a plain channel error.
    fn stopped(&self) -> AsimovError {
        self.failure
            .get()
            .cloned()
            .unwrap_or_else(|| AsimovError::Channel("dispatcher stopped".to_string()))
    }
}

#[async_trait]
impl Observer for DispatcherHandle {
    /// Observations are only useful while fresh, so one that finds the
    /// queue full is dropped rather than waiting.
    async fn on_observation(&self, observation: Observation) -> Result<(), AsimovError> {
        match self.requests.try_send(Request::Observe(observation)) {
            Ok(()) => Ok(()),
            Err(mpsc::error::TrySendError::Full(_)) => {
                debug!("dispatcher busy; observation dropped");
                Ok(())
            }
            Err(mpsc::error::TrySendError::Closed(_)) => Err(self.stopped()),
        }
    }

    async fn request_mode_transition(&self, mode: Mode) -> Result<(), AsimovError> {
        self.submit(Command::Enter(mode)).await
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Actor
// ─────────────────────────────────────────────────────────────────────────────

pub struct Dispatcher {
    modes: ModeController,
    requests: mpsc::Receiver<Request>,
    failure: Arc<OnceLock<AsimovError>>,
    shutdown_tx: watch::Sender<bool>,
    shutdown_rx: watch::Receiver<bool>,
}

impl Dispatcher {
    /// Build the actor and its first handle. `shutdown` is observed to stop
    /// the actor and raised by it on a shutdown command or broken link.
    pub fn new(modes: ModeController, shutdown: watch::Sender<bool>) -> (Self, DispatcherHandle) {
        let (tx, rx) = mpsc::channel(REQUEST_QUEUE);
        let shutdown_rx = shutdown.subscribe();
        let failure = Arc::new(OnceLock::new());
        let dispatcher = Self {
            modes,
            requests: rx,
            failure: failure.clone(),
            shutdown_tx: shutdown,
            shutdown_rx,
        };
        (
            dispatcher,
            DispatcherHandle {
                requests: tx,
                failure,
            },
        )
    }

    /// Handle requests until told to stop. Returns the link failure that
    /// ended the loop, if any.
    pub async fn run(mut self) -> Result<(), AsimovError> {
        info!("dispatcher started");
        loop {
            if *self.shutdown_rx.borrow_and_update() {
                break;
            }
            tokio::select! {
                biased;
                changed = self.shutdown_rx.changed() => {
                    if changed.is_err() {
                        break;
                    }
                }
                request = self.requests.recv() => {
                    let Some(request) = request else { break };
                    match self.handle(request).await {
                        Ok(true) => {}
                        Ok(false) => {
                            self.shutdown_tx.send_replace(true);
                            break;
                        }
                        Err(e) => {
                            let mode = self.modes.abort();
                            error!(error = %e, mode = %mode, "robot link lost; dispatcher stopping");
                            // Set before the request receiver drops.
                            let _ = self.failure.set(e.clone());
                            self.shutdown_tx.send_replace(true);
                            return Err(e);
                        }
                    }
                }
            }
        }
        info!("dispatcher stopped");
        Ok(())
    }

    /// `Ok(false)` once the process should shut down.
    async fn handle(&mut self, request: Request) -> Result<bool, AsimovError> {
        match request {
            Request::Observe(observation) => {
                let actions = self.modes.on_observation(&observation).await?;
                if !actions.is_empty() {
                    debug!(count = actions.len(), "observation handled");
                }
            }
            Request::Command(Command::Enter(mode)) => {
                if !self.modes.enter(mode).await? {
                    warn!(current = %self.modes.mode(), requested = %mode, "mode change ignored");
                }
            }
            Request::Command(Command::ExitMode) => {
                self.modes.exit().await?;
            }
            Request::Command(Command::Manual(command)) => {
                self.modes.perform(command, Instant::now()).await?;
                if command == ManualCommand::Shutdown {
                    info!("shutdown requested by operator");
                    return Ok(false);
                }
            }
            Request::Status(reply) => {
                let _ = reply.send(self.modes.mode());
            }
        }
        Ok(true)
    }
}
