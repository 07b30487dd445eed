//! [`ModeController`] – the autonomous behavior state machine.
//!
//! Holds the current [`Mode`] and turns each [`Observation`] into at most a
//! couple of [`RobotController`] calls, throttled by two cooldowns: one for
//! centering corrections and one for every other action.
//!
//! # Transitions
//!
//! ```text
//!            enter(m)                 exit()
//!   None ─────────────▶ m   ,   m ─────────────▶ None
//! ```
//!
//! `enter` is refused unless the current mode is `None`; `exit` is refused
//! while the mode is already `None`. Refusals are ordinary `false` results.
//! Every accepted transition is confirmed with two beeps.
//!
//! # Failure semantics
//!
//! A rejected or invalid command during an autonomous action is logged and
//! the mode carries on; the next tick past the cooldown tries again. Only
//! [`AsimovError::LinkBroken`] is returned to the caller.

use std::time::{Duration, Instant};

use asimov_hal::RobotController;
use asimov_hal::units::{sign, within_tolerance};
use asimov_types::{AsimovError, ManualCommand, Mode, Observation};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::cooldown::Cooldown;

/// Divisor applied to the bearing offset when centering, so each tick turns
/// about half the measured offset.
pub const CENTER_DAMPING: f64 = 2.0;

/// Beeps played by [`ManualCommand::Shutdown`].
pub const SHUTDOWN_BEEPS: usize = 5;

// ─────────────────────────────────────────────────────────────────────────────
// Configuration
// ─────────────────────────────────────────────────────────────────────────────

/// Tuning constants for the autonomous behaviors and manual moves.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BehaviorConfig {
    /// Speed for every autonomous and manual move, in m/s.
    #[serde(default = "default_velocity")]
    pub velocity: f64,

    /// Bearing offset in degrees tolerated before a centering spin.
    #[serde(default = "default_centered_tolerance")]
    pub centered_tolerance_deg: f64,

    /// Standoff distance kept from the subject in Follow mode, in metres.
    #[serde(default = "default_desired_distance")]
    pub desired_distance_m: f64,

    #[serde(default = "default_distance_tolerance")]
    pub distance_tolerance_m: f64,

    /// Largest distance driven per tick or manual move, in metres.
    #[serde(default = "default_drive_step")]
    pub drive_step_m: f64,

    /// Angle turned by a manual left/right, in degrees.
    #[serde(default = "default_spin_step")]
    pub spin_step_deg: f64,

    #[serde(default = "default_action_cooldown")]
    pub action_cooldown_ms: u64,

    #[serde(default = "default_center_cooldown")]
    pub center_cooldown_ms: u64,
}

fn default_velocity() -> f64 {
    0.25
}
fn default_centered_tolerance() -> f64 {
    10.0
}
fn default_desired_distance() -> f64 {
    1.5
}
fn default_distance_tolerance() -> f64 {
    0.25
}
fn default_drive_step() -> f64 {
    0.1
}
fn default_spin_step() -> f64 {
    30.0
}
fn default_action_cooldown() -> u64 {
    500
}
fn default_center_cooldown() -> u64 {
    1000
}

impl Default for BehaviorConfig {
    fn default() -> Self {
        Self {
            velocity: default_velocity(),
            centered_tolerance_deg: default_centered_tolerance(),
            desired_distance_m: default_desired_distance(),
            distance_tolerance_m: default_distance_tolerance(),
            drive_step_m: default_drive_step(),
            spin_step_deg: default_spin_step(),
            action_cooldown_ms: default_action_cooldown(),
            center_cooldown_ms: default_center_cooldown(),
        }
    }
}

impl BehaviorConfig {
    pub fn action_cooldown(&self) -> Duration {
        Duration::from_millis(self.action_cooldown_ms)
    }

    pub fn center_cooldown(&self) -> Duration {
        Duration::from_millis(self.center_cooldown_ms)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Actions
// ─────────────────────────────────────────────────────────────────────────────

/// A command issued by the state machine, in public units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ModeAction {
    /// `spin_angle(velocity, degrees)`.
    Spin { velocity: f64, degrees: f64 },
    /// `drive_distance(velocity, distance)`.
    Drive { velocity: f64, distance: f64 },
}

impl ModeAction {
    async fn apply(self, robot: &RobotController) -> Result<(), AsimovError> {
        match self {
            ModeAction::Spin { velocity, degrees } => robot.spin_angle(velocity, degrees).await,
            ModeAction::Drive { velocity, distance } => {
                robot.drive_distance(velocity, distance).await
            }
        }
    }
}

/// Keep link failures, log and drop everything else.
fn tolerate(result: Result<(), AsimovError>, what: &str) -> Result<(), AsimovError> {
    match result {
        Err(e @ AsimovError::LinkBroken(_)) => Err(e),
        Err(e) => {
            warn!(error = %e, "{what} failed");
            Ok(())
        }
        Ok(()) => Ok(()),
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// ModeController
// ─────────────────────────────────────────────────────────────────────────────

pub struct ModeController {
    robot: RobotController,
    config: BehaviorConfig,
    mode: Mode,
    action: Cooldown,
    center: Cooldown,
}

impl ModeController {
    pub fn new(robot: RobotController, config: BehaviorConfig) -> Self {
        let action = Cooldown::new(config.action_cooldown());
        let center = Cooldown::new(config.center_cooldown());
        Self {
            robot,
            config,
            mode: Mode::None,
            action,
            center,
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn is_in_mode(&self) -> bool {
        self.mode.is_active()
    }

    pub fn config(&self) -> &BehaviorConfig {
        &self.config
    }

    pub fn robot(&self) -> &RobotController {
        &self.robot
    }

    /// Switch from `None` into `mode`.
    ///
    /// Returns `Ok(false)` without side effects when a mode is already
    /// active or `mode` is `None`.
    pub async fn enter(&mut self, mode: Mode) -> Result<bool, AsimovError> {
        if self.is_in_mode() || !mode.is_active() {
            debug!(current = %self.mode, requested = %mode, "mode transition refused");
            return Ok(false);
        }
        self.mode = mode;
        self.action.reset();
        self.center.reset();
        info!(mode = %mode, "entered mode");
        self.confirm().await?;
        Ok(true)
    }

    /// Return to `None`. `Ok(false)` when no mode is active.
    pub async fn exit(&mut self) -> Result<bool, AsimovError> {
        if !self.is_in_mode() {
            debug!("exit refused: no mode active");
            return Ok(false);
        }
        let previous = std::mem::take(&mut self.mode);
        info!(mode = %previous, "exited mode");
        self.confirm().await?;
        Ok(true)
    }

    /// Drop to `None` silently, e.g. once the link is gone.
    pub fn abort(&mut self) -> Mode {
        std::mem::take(&mut self.mode)
    }

    async fn confirm(&self) -> Result<(), AsimovError> {
        for _ in 0..2 {
            tolerate(self.robot.beep().await, "confirmation beep")?;
        }
        Ok(())
    }

    /// React to one observation. Returns the actions issued on this tick,
    /// whether or not the robot accepted them.
    pub async fn on_observation(
        &mut self,
        obs: &Observation,
    ) -> Result<Vec<ModeAction>, AsimovError> {
        let mut issued = Vec::new();
        if !obs.bearing_deg.is_finite() {
            debug!(bearing = obs.bearing_deg, "ignoring non-finite bearing");
            return Ok(issued);
        }

        match self.mode {
            Mode::Center => self.center_on(obs, &mut issued).await?,
            Mode::Follow => {
                self.center_on(obs, &mut issued).await?;
                self.keep_distance(obs, &mut issued).await?;
            }
            Mode::Avoid => self.turn_away(obs, &mut issued).await?,
            Mode::Drinking | Mode::None => {}
        }
        Ok(issued)
    }

    async fn center_on(
        &mut self,
        obs: &Observation,
        issued: &mut Vec<ModeAction>,
    ) -> Result<(), AsimovError> {
        let angle = obs.bearing_deg;
        if angle.abs() <= self.config.centered_tolerance_deg || !self.center.is_ready(obs.timestamp)
        {
            return Ok(());
        }
        self.center.stamp(obs.timestamp);
        let action = ModeAction::Spin {
            velocity: -sign(angle) * self.config.velocity,
            degrees: angle.abs() / CENTER_DAMPING,
        };
        self.issue(action, issued).await
    }

    async fn keep_distance(
        &mut self,
        obs: &Observation,
        issued: &mut Vec<ModeAction>,
    ) -> Result<(), AsimovError> {
        let Some(range) = obs.range_m.filter(|r| r.is_finite()) else {
            return Ok(());
        };
        let desired = self.config.desired_distance_m;
        if within_tolerance(range, desired, self.config.distance_tolerance_m)
            || !self.action.is_ready(obs.timestamp)
        {
            return Ok(());
        }
        self.action.stamp(obs.timestamp);
        let step = self.config.drive_step_m;
        let action = if range > desired {
            ModeAction::Drive {
                velocity: self.config.velocity,
                distance: (range - desired).min(step),
            }
        } else {
            ModeAction::Drive {
                velocity: -self.config.velocity,
                distance: (desired - range).min(step),
            }
        };
        self.issue(action, issued).await
    }

    async fn turn_away(
        &mut self,
        obs: &Observation,
        issued: &mut Vec<ModeAction>,
    ) -> Result<(), AsimovError> {
        if !self.action.is_ready(obs.timestamp) {
            return Ok(());
        }
        self.action.stamp(obs.timestamp);
        let angle = obs.bearing_deg;
        // Dead ahead turns clockwise.
        let velocity = if angle < 0.0 {
            -self.config.velocity
        } else {
            self.config.velocity
        };
        let action = ModeAction::Spin {
            velocity,
            degrees: 180.0 - angle.abs(),
        };
        self.issue(action, issued).await
    }

    async fn issue(
        &self,
        action: ModeAction,
        issued: &mut Vec<ModeAction>,
    ) -> Result<(), AsimovError> {
        debug!(mode = %self.mode, action = ?action, "autonomous action");
        issued.push(action);
        tolerate(action.apply(&self.robot).await, "autonomous action")
    }

    /// Carry out an operator command issued at `now`.
    ///
    /// Returns `Ok(false)` when a motion command is refused, either because
    /// a mode is active or because the action cooldown has not elapsed.
    /// Accepted commands restart the action cooldown.
    pub async fn perform(
        &mut self,
        command: ManualCommand,
        now: Instant,
    ) -> Result<bool, AsimovError> {
        if command.is_motion() {
            if self.is_in_mode() {
                info!(command = ?command, mode = %self.mode, "manual motion ignored while in mode");
                return Ok(false);
            }
            if !self.action.is_ready(now) {
                debug!(command = ?command, "manual motion inside action cooldown");
                return Ok(false);
            }
        }
        self.action.stamp(now);
        info!(command = ?command, "manual command");

        let v = self.config.velocity;
        let result = match command {
            ManualCommand::MoveForward => self.robot.drive_distance(v, self.config.drive_step_m).await,
            ManualCommand::MoveBackward => {
                self.robot.drive_distance(-v, self.config.drive_step_m).await
            }
            ManualCommand::TurnLeft => self.robot.spin_angle(-v, self.config.spin_step_deg).await,
            ManualCommand::TurnRight => self.robot.spin_angle(v, self.config.spin_step_deg).await,
            ManualCommand::TurnAround => self.robot.spin_angle(v, 180.0).await,
            ManualCommand::Stop => self.robot.stop().await,
            ManualCommand::Beep => self.robot.beep().await,
            ManualCommand::Shutdown => {
                for _ in 0..SHUTDOWN_BEEPS {
                    tolerate(self.robot.beep().await, "shutdown beep")?;
                }
                Ok(())
            }
        };
        tolerate(result, "manual command")?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use asimov_link::SimTransport;

    fn controller() -> (ModeController, Arc<SimTransport>) {
        controller_with(BehaviorConfig::default())
    }

    fn controller_with(config: BehaviorConfig) -> (ModeController, Arc<SimTransport>) {
        let sim = Arc::new(SimTransport::new());
        let robot = RobotController::new(sim.clone()).with_beep_settle(Duration::ZERO);
        (ModeController::new(robot, config), sim)
    }

    async fn in_mode(mode: Mode) -> (ModeController, Arc<SimTransport>) {
        let (mut mc, sim) = controller();
        assert!(mc.enter(mode).await.unwrap());
        sim.take_sent();
        (mc, sim)
    }

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    // ── Transitions ─────────────────────────────────────────────────────────

    #[tokio::test]
    async fn second_enter_without_exit_is_a_no_op() {
        let (mut mc, sim) = controller();
        assert!(mc.enter(Mode::Follow).await.unwrap());
        assert!(!mc.enter(Mode::Avoid).await.unwrap());
        assert_eq!(mc.mode(), Mode::Follow);
        assert_eq!(sim.sent(), vec!["BEEP", "BEEP"]);
    }

    #[tokio::test]
    async fn exit_requires_an_active_mode() {
        let (mut mc, sim) = controller();
        assert!(!mc.exit().await.unwrap());
        assert!(sim.sent().is_empty());

        mc.enter(Mode::Center).await.unwrap();
        assert!(mc.exit().await.unwrap());
        assert_eq!(mc.mode(), Mode::None);
        assert_eq!(sim.sent().len(), 4);

        assert!(mc.enter(Mode::Avoid).await.unwrap());
        assert_eq!(mc.mode(), Mode::Avoid);
    }

    #[tokio::test]
    async fn entering_none_is_refused() {
        let (mut mc, sim) = controller();
        assert!(!mc.enter(Mode::None).await.unwrap());
        assert!(sim.sent().is_empty());
    }

    #[tokio::test]
    async fn rejected_beep_still_transitions() {
        let (mut mc, sim) = controller();
        sim.script("ERR");
        assert!(mc.enter(Mode::Drinking).await.unwrap());
        assert_eq!(mc.mode(), Mode::Drinking);
    }

    #[tokio::test]
    async fn abort_is_silent() {
        let (mut mc, sim) = in_mode(Mode::Follow).await;
        assert_eq!(mc.abort(), Mode::Follow);
        assert_eq!(mc.mode(), Mode::None);
        assert!(sim.sent().is_empty());
    }

    // ── Center ──────────────────────────────────────────────────────────────

    #[tokio::test]
    async fn bearing_inside_tolerance_issues_nothing() {
        let (mut mc, sim) = in_mode(Mode::Center).await;
        let actions = mc.on_observation(&Observation::new(9.9, None)).await.unwrap();
        assert!(actions.is_empty());
        assert!(sim.sent().is_empty());
    }

    #[tokio::test]
    async fn bearing_past_tolerance_spins_half_the_offset_back() {
        let (mut mc, sim) = in_mode(Mode::Center).await;
        let actions = mc.on_observation(&Observation::new(10.1, None)).await.unwrap();
        assert_eq!(actions.len(), 1);
        match actions[0] {
            ModeAction::Spin { velocity, degrees } => {
                assert_eq!(velocity, -0.25);
                assert!((degrees - 5.05).abs() < 1e-9);
            }
            other => panic!("expected spin, got {other:?}"),
        }
        assert_eq!(sim.sent(), vec!["DRIVE SPIN ANGLE -250 5"]);
    }

    #[tokio::test]
    async fn negative_bearing_spins_clockwise() {
        let (mut mc, sim) = in_mode(Mode::Center).await;
        mc.on_observation(&Observation::new(-40.0, None)).await.unwrap();
        assert_eq!(sim.sent(), vec!["DRIVE SPIN ANGLE 250 -20"]);
    }

    #[tokio::test]
    async fn centering_respects_its_cooldown() {
        let (mut mc, sim) = in_mode(Mode::Center).await;
        let t0 = Instant::now();
        mc.on_observation(&Observation::at(30.0, None, t0)).await.unwrap();
        mc.on_observation(&Observation::at(30.0, None, t0 + ms(600))).await.unwrap();
        assert_eq!(sim.sent().len(), 1);
        mc.on_observation(&Observation::at(30.0, None, t0 + ms(1100))).await.unwrap();
        assert_eq!(sim.sent().len(), 2);
    }

    #[tokio::test]
    async fn non_finite_bearing_is_ignored() {
        let (mut mc, sim) = in_mode(Mode::Center).await;
        let actions = mc.on_observation(&Observation::new(f64::NAN, None)).await.unwrap();
        assert!(actions.is_empty());
        assert!(sim.sent().is_empty());
    }

    // ── Avoid ───────────────────────────────────────────────────────────────

    #[tokio::test]
    async fn avoid_turns_to_face_away() {
        let (mut mc, sim) = in_mode(Mode::Avoid).await;
        let actions = mc.on_observation(&Observation::new(30.0, None)).await.unwrap();
        assert_eq!(
            actions,
            vec![ModeAction::Spin {
                velocity: 0.25,
                degrees: 150.0
            }]
        );
        assert_eq!(sim.sent(), vec!["DRIVE SPIN ANGLE 250 -150"]);
    }

    #[tokio::test]
    async fn avoid_fires_once_inside_cooldown() {
        let (mut mc, sim) = in_mode(Mode::Avoid).await;
        let t0 = Instant::now();
        mc.on_observation(&Observation::at(-20.0, None, t0)).await.unwrap();
        let second = mc
            .on_observation(&Observation::at(-20.0, None, t0 + ms(100)))
            .await
            .unwrap();
        assert!(second.is_empty());
        assert_eq!(sim.sent(), vec!["DRIVE SPIN ANGLE -250 160"]);

        mc.on_observation(&Observation::at(-20.0, None, t0 + ms(600))).await.unwrap();
        assert_eq!(sim.sent().len(), 2);
    }

    #[tokio::test]
    async fn rejected_action_keeps_mode_and_still_starts_cooldown() {
        let (mut mc, sim) = in_mode(Mode::Avoid).await;
        let t0 = Instant::now();
        sim.script("ERR");
        let actions = mc.on_observation(&Observation::at(10.0, None, t0)).await.unwrap();
        assert_eq!(actions.len(), 1);
        assert_eq!(mc.mode(), Mode::Avoid);

        mc.on_observation(&Observation::at(10.0, None, t0 + ms(200))).await.unwrap();
        assert_eq!(sim.sent().len(), 1);
        mc.on_observation(&Observation::at(10.0, None, t0 + ms(700))).await.unwrap();
        assert_eq!(sim.sent().len(), 2);
    }

    #[tokio::test]
    async fn broken_link_is_returned() {
        let (mut mc, sim) = in_mode(Mode::Avoid).await;
        sim.script_break();
        let err = mc.on_observation(&Observation::new(10.0, None)).await.unwrap_err();
        assert!(matches!(err, AsimovError::LinkBroken(_)));
    }

    // ── Follow ──────────────────────────────────────────────────────────────

    #[tokio::test]
    async fn follow_steps_toward_a_distant_subject() {
        let (mut mc, sim) = in_mode(Mode::Follow).await;
        mc.on_observation(&Observation::new(0.0, Some(3.0))).await.unwrap();
        assert_eq!(sim.sent(), vec!["DRIVE STRAIGHT DISTANCE 250 100"]);
    }

    #[tokio::test]
    async fn follow_backs_away_from_a_close_subject() {
        let (mut mc, sim) = in_mode(Mode::Follow).await;
        mc.on_observation(&Observation::new(0.0, Some(0.5))).await.unwrap();
        assert_eq!(sim.sent(), vec!["DRIVE STRAIGHT DISTANCE -250 -100"]);
    }

    #[tokio::test]
    async fn follow_holds_inside_distance_tolerance() {
        let (mut mc, sim) = in_mode(Mode::Follow).await;
        let t0 = Instant::now();
        mc.on_observation(&Observation::at(0.0, Some(1.7), t0)).await.unwrap();
        mc.on_observation(&Observation::at(0.0, Some(1.3), t0 + ms(600))).await.unwrap();
        mc.on_observation(&Observation::at(0.0, None, t0 + ms(1200))).await.unwrap();
        assert!(sim.sent().is_empty());
    }

    #[tokio::test]
    async fn follow_step_is_the_smaller_of_offset_and_step() {
        let config = BehaviorConfig {
            drive_step_m: 0.5,
            ..BehaviorConfig::default()
        };
        let (mut mc, sim) = controller_with(config);
        mc.enter(Mode::Follow).await.unwrap();
        sim.take_sent();
        mc.on_observation(&Observation::new(0.0, Some(1.8))).await.unwrap();
        assert_eq!(sim.sent(), vec!["DRIVE STRAIGHT DISTANCE 250 300"]);
    }

    #[tokio::test]
    async fn follow_centers_then_drives_on_one_tick() {
        let (mut mc, sim) = in_mode(Mode::Follow).await;
        let actions = mc.on_observation(&Observation::new(20.0, Some(3.0))).await.unwrap();
        assert_eq!(actions.len(), 2);
        assert_eq!(
            sim.sent(),
            vec!["DRIVE SPIN ANGLE -250 10", "DRIVE STRAIGHT DISTANCE 250 100"]
        );
    }

    #[tokio::test]
    async fn idle_modes_issue_nothing() {
        let (mut mc, sim) = in_mode(Mode::Drinking).await;
        assert!(mc.on_observation(&Observation::new(45.0, Some(4.0))).await.unwrap().is_empty());
        mc.exit().await.unwrap();
        sim.take_sent();
        assert!(mc.on_observation(&Observation::new(45.0, Some(4.0))).await.unwrap().is_empty());
        assert!(sim.sent().is_empty());
    }

    // ── Manual commands ─────────────────────────────────────────────────────

    #[tokio::test]
    async fn manual_moves_use_configured_steps() {
        let (mut mc, sim) = controller();
        let t0 = Instant::now();
        let commands = [
            ManualCommand::MoveForward,
            ManualCommand::MoveBackward,
            ManualCommand::TurnLeft,
            ManualCommand::TurnRight,
            ManualCommand::TurnAround,
            ManualCommand::Stop,
        ];
        for (i, cmd) in (0u64..).zip(commands) {
            assert!(mc.perform(cmd, t0 + ms(600 * i)).await.unwrap());
        }
        assert_eq!(
            sim.sent(),
            vec![
                "DRIVE STRAIGHT DISTANCE 250 100",
                "DRIVE STRAIGHT DISTANCE -250 -100",
                "DRIVE SPIN ANGLE -250 30",
                "DRIVE SPIN ANGLE 250 -30",
                "DRIVE SPIN ANGLE 250 -180",
                "DRIVE STOP",
            ]
        );
    }

    #[tokio::test]
    async fn manual_motion_is_ignored_in_mode() {
        let (mut mc, sim) = in_mode(Mode::Follow).await;
        let now = Instant::now();
        assert!(!mc.perform(ManualCommand::MoveForward, now).await.unwrap());
        assert!(sim.sent().is_empty());
        assert!(mc.perform(ManualCommand::Stop, now).await.unwrap());
        assert_eq!(sim.sent(), vec!["DRIVE STOP"]);
    }

    #[tokio::test]
    async fn repeated_manual_motion_waits_for_the_action_cooldown() {
        let (mut mc, sim) = controller();
        let t0 = Instant::now();
        assert!(mc.perform(ManualCommand::MoveForward, t0).await.unwrap());
        assert!(!mc.perform(ManualCommand::MoveForward, t0 + ms(100)).await.unwrap());
        assert!(!mc.perform(ManualCommand::TurnLeft, t0 + ms(400)).await.unwrap());
        assert_eq!(sim.sent(), vec!["DRIVE STRAIGHT DISTANCE 250 100"]);

        // Non-motion commands are never throttled.
        assert!(mc.perform(ManualCommand::Stop, t0 + ms(450)).await.unwrap());
        assert!(!mc.perform(ManualCommand::MoveForward, t0 + ms(900)).await.unwrap());
        assert!(mc.perform(ManualCommand::MoveForward, t0 + ms(1000)).await.unwrap());
        assert_eq!(sim.sent().len(), 3);
    }

    #[tokio::test]
    async fn shutdown_beeps_five_times() {
        let (mut mc, sim) = controller();
        assert!(mc.perform(ManualCommand::Shutdown, Instant::now()).await.unwrap());
        assert_eq!(sim.sent(), vec!["BEEP"; SHUTDOWN_BEEPS]);
    }

    #[test]
    fn behavior_config_fills_missing_fields() {
        let cfg: BehaviorConfig = serde_json::from_str(r#"{ "velocity": 0.3 }"#).unwrap();
        assert_eq!(cfg.velocity, 0.3);
        assert_eq!(cfg.centered_tolerance_deg, 10.0);
        assert_eq!(cfg.action_cooldown(), Duration::from_millis(500));
        assert_eq!(cfg.center_cooldown(), Duration::from_secs(1));
    }
}
