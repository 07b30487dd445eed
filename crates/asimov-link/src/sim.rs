//! [`SimTransport`] – an in-process stand-in for the robot server.
//!
//! Every command is logged and recorded, and answered with `ACK` unless a
//! different reply was scripted. Used when no robot is attached and as the
//! test double for everything above the link.

use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use asimov_types::AsimovError;
use tracing::info;

use crate::response::{END_COMMAND, Response};
use crate::transport::CommandTransport;

enum SimReply {
    Line(String),
    Break,
}

#[derive(Default)]
struct SimState {
    sent: Vec<String>,
    script: VecDeque<SimReply>,
    broken: bool,
    closed: bool,
}

/// Simulated robot link.
///
/// # Example
///
/// ```
/// use asimov_link::{CommandTransport, Response, SimTransport};
///
/// # tokio_test_block_on(async {
/// let sim = SimTransport::new();
/// sim.script("ERR");
/// assert_eq!(sim.execute("BEEP").await.unwrap(), Response::Err);
/// assert_eq!(sim.execute("BEEP").await.unwrap(), Response::Ack);
/// assert_eq!(sim.sent(), vec!["BEEP", "BEEP"]);
/// # });
/// # fn tokio_test_block_on<F: std::future::Future>(f: F) -> F::Output {
/// #     tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(f)
/// # }
/// ```
#[derive(Default)]
pub struct SimTransport {
    state: Mutex<SimState>,
}

impl SimTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer the next unanswered command with `reply` instead of `ACK`.
    /// Scripted replies are consumed in order.
    pub fn script(&self, reply: impl Into<String>) {
        self.lock().script.push_back(SimReply::Line(reply.into()));
    }

    /// Fail the next unanswered command as if the socket died.
    pub fn script_break(&self) {
        self.lock().script.push_back(SimReply::Break);
    }

    /// Every line received so far, `END` included.
    pub fn sent(&self) -> Vec<String> {
        self.lock().sent.clone()
    }

    /// Drain the recorded lines.
    pub fn take_sent(&self) -> Vec<String> {
        std::mem::take(&mut self.lock().sent)
    }

    pub fn is_closed(&self) -> bool {
        self.lock().closed
    }

    fn lock(&self) -> MutexGuard<'_, SimState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl CommandTransport for SimTransport {
    async fn execute(&self, line: &str) -> Result<Response, AsimovError> {
        let mut state = self.lock();
        if state.closed {
            return Err(AsimovError::LinkBroken("link closed".to_string()));
        }
        if state.broken {
            return Err(AsimovError::LinkBroken("simulated link failure".to_string()));
        }

        state.sent.push(line.to_string());
        match state.script.pop_front() {
            Some(SimReply::Break) => {
                state.broken = true;
                Err(AsimovError::LinkBroken("simulated link failure".to_string()))
            }
            Some(SimReply::Line(reply)) => {
                info!(command = line, response = %reply, "sim robot");
                Ok(Response::parse(&reply))
            }
            None => {
                info!(command = line, "sim robot");
                Ok(Response::Ack)
            }
        }
    }

    async fn close(&self) {
        let mut state = self.lock();
        if !state.closed {
            state.sent.push(END_COMMAND.to_string());
            state.closed = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn acknowledges_by_default_and_records() {
        let sim = SimTransport::new();
        assert_eq!(sim.execute("DRIVE STOP").await.unwrap(), Response::Ack);
        assert_eq!(sim.sent(), vec!["DRIVE STOP"]);
        assert_eq!(sim.take_sent(), vec!["DRIVE STOP"]);
        assert!(sim.sent().is_empty());
    }

    #[tokio::test]
    async fn scripted_replies_are_consumed_in_order() {
        let sim = SimTransport::new();
        sim.script("ERR");
        sim.script("WHAT");
        assert_eq!(sim.execute("A").await.unwrap(), Response::Err);
        assert_eq!(sim.execute("B").await.unwrap(), Response::Other("WHAT".into()));
        assert_eq!(sim.execute("C").await.unwrap(), Response::Ack);
    }

    #[tokio::test]
    async fn scripted_break_is_sticky() {
        let sim = SimTransport::new();
        sim.script_break();
        assert!(matches!(sim.execute("A").await, Err(AsimovError::LinkBroken(_))));
        assert!(matches!(sim.execute("B").await, Err(AsimovError::LinkBroken(_))));
        assert_eq!(sim.sent(), vec!["A"]);
    }

    #[tokio::test]
    async fn close_records_end_once() {
        let sim = SimTransport::new();
        sim.close().await;
        sim.close().await;
        assert!(sim.is_closed());
        assert_eq!(sim.sent(), vec!["END"]);
        assert!(sim.execute("BEEP").await.is_err());
    }
}
