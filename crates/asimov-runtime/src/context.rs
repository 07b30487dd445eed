//! [`RuntimeContext`] – everything the running process needs, built once.

use std::sync::Arc;

use asimov_hal::RobotController;
use asimov_link::CommandTransport;
use asimov_types::{AsimovError, RobotMode};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::dispatcher::{Dispatcher, DispatcherHandle};
use crate::mode_controller::{BehaviorConfig, ModeController};

/// Owns the robot controller, the dispatcher task and the shutdown signal.
///
/// Built by [`RuntimeContext::start`] and torn down by
/// [`RuntimeContext::shutdown`]; nothing here lives in a global.
pub struct RuntimeContext {
    robot: RobotController,
    dispatcher: DispatcherHandle,
    shutdown: watch::Sender<bool>,
    task: JoinHandle<Result<(), AsimovError>>,
}

impl RuntimeContext {
    pub async fn start(
        link: Arc<dyn CommandTransport>,
        config: BehaviorConfig,
    ) -> Result<Self, AsimovError> {
        Self::start_with(RobotController::new(link), config).await
    }

    /// Greet the robot (one beep, then `MODE FULL`) and spawn the dispatcher.
    ///
    /// A rejected greeting is logged; a broken link aborts startup.
    pub async fn start_with(
        robot: RobotController,
        config: BehaviorConfig,
    ) -> Result<Self, AsimovError> {
        greeting(robot.beep().await)?;
        greeting(robot.set_mode(RobotMode::Full).await)?;

        let (shutdown, _) = watch::channel(false);
        let modes = ModeController::new(robot.clone(), config);
        let (dispatcher, handle) = Dispatcher::new(modes, shutdown.clone());
        let task = tokio::spawn(dispatcher.run());
        info!("runtime started");

        Ok(Self {
            robot,
            dispatcher: handle,
            shutdown,
            task,
        })
    }

    pub fn robot(&self) -> &RobotController {
        &self.robot
    }

    pub fn dispatcher(&self) -> DispatcherHandle {
        self.dispatcher.clone()
    }

    /// Resolves once shutdown has been requested, by anyone.
    pub fn shutdown_signal(&self) -> watch::Receiver<bool> {
        self.shutdown.subscribe()
    }

    pub fn request_shutdown(&self) {
        self.shutdown.send_replace(true);
    }

    /// A sender for raising shutdown from outside the runtime, e.g. a
    /// signal handler thread.
    pub fn shutdown_trigger(&self) -> watch::Sender<bool> {
        self.shutdown.clone()
    }

    /// Stop the dispatcher, wait for it, then send `END` and close the link.
    ///
    /// Returns the link failure that stopped the dispatcher, if there was one.
    pub async fn shutdown(self) -> Result<(), AsimovError> {
        self.shutdown.send_replace(true);
        let outcome = match self.task.await {
            Ok(result) => result,
            Err(e) => Err(AsimovError::Channel(format!("dispatcher task failed: {e}"))),
        };
        self.robot.link().close().await;
        info!("runtime stopped");
        outcome
    }
}

fn greeting(result: Result<(), AsimovError>) -> Result<(), AsimovError> {
    match result {
        Err(e) if e.is_fatal() => Err(e),
        Err(e) => {
            warn!(error = %e, "startup command rejected");
            Ok(())
        }
        Ok(()) => Ok(()),
    }
}
