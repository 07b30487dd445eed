//! [`RobotController`] – one method per robot command.
//!
//! Each method validates its arguments, converts them to wire units, formats
//! exactly one command line and sends it through the shared link. An invalid
//! argument returns [`AsimovError::InvalidArgument`] before anything is
//! written. A reply other than `ACK` returns [`AsimovError::CommandRejected`]
//! and leaves the link usable.

use std::sync::Arc;
use std::time::Duration;

use asimov_link::CommandTransport;
use asimov_types::{AsimovError, Led, RobotMode, WaitEvent};
use tracing::{info, warn};

use crate::limits::{self, Degrees, Distance, Radius, Seconds, Velocity};

/// Pause after every `BEEP` so back-to-back beeps stay audibly distinct.
pub const DEFAULT_BEEP_SETTLE: Duration = Duration::from_millis(40);

/// Typed command surface over a [`CommandTransport`].
///
/// Cheap to clone; clones share the same link, which serializes their
/// commands.
#[derive(Clone)]
pub struct RobotController {
    link: Arc<dyn CommandTransport>,
    beep_settle: Duration,
}

impl RobotController {
    pub fn new(link: Arc<dyn CommandTransport>) -> Self {
        Self {
            link,
            beep_settle: DEFAULT_BEEP_SETTLE,
        }
    }

    /// Override the pause taken after each beep.
    pub fn with_beep_settle(mut self, settle: Duration) -> Self {
        self.beep_settle = settle;
        self
    }

    /// The underlying link, e.g. to close it on shutdown.
    pub fn link(&self) -> &Arc<dyn CommandTransport> {
        &self.link
    }

    async fn send(&self, command: String) -> Result<(), AsimovError> {
        let response = self.link.execute(&command).await?;
        if response.is_ack() {
            Ok(())
        } else {
            warn!(command = %command, response = %response, "robot rejected command");
            Err(AsimovError::CommandRejected {
                command,
                response: response.to_string(),
            })
        }
    }

    pub async fn set_mode(&self, mode: RobotMode) -> Result<(), AsimovError> {
        info!(mode = ?mode, "set robot mode");
        self.send(format!("MODE {}", mode.as_wire())).await
    }

    // ─────────────────────────────────────────────────────────────────────
    // Driving
    // ─────────────────────────────────────────────────────────────────────

    /// Drive straight until superseded. Positive is forward.
    pub async fn drive(&self, velocity: f64) -> Result<(), AsimovError> {
        let v = Velocity::new(velocity)?;
        info!(velocity_mps = v.get(), "drive");
        self.send(format!("DRIVE STRAIGHT NORMAL {}", v.to_wire())).await
    }

    /// Drive along an arc of `radius` metres until superseded.
    pub async fn drive_radius(&self, velocity: f64, radius: f64) -> Result<(), AsimovError> {
        let v = Velocity::new(velocity)?;
        let r = Radius::new(radius)?;
        info!(velocity_mps = v.get(), radius_m = r.get(), "drive");
        self.send(format!("DRIVE NORMAL {} {}", v.to_wire(), r.to_wire()))
            .await
    }

    /// Drive straight for `distance` metres.
    ///
    /// Only the magnitude of `distance` is used; the direction comes from the
    /// sign of `velocity`.
    pub async fn drive_distance(&self, velocity: f64, distance: f64) -> Result<(), AsimovError> {
        let v = Velocity::new(velocity)?;
        let d = Distance::new(distance)?.aligned_with(v);
        info!(velocity_mps = v.get(), distance_m = d.get(), "drive distance");
        self.send(format!(
            "DRIVE STRAIGHT DISTANCE {} {}",
            v.to_wire(),
            d.to_wire()
        ))
        .await
    }

    /// Arc variant of [`drive_distance`](Self::drive_distance).
    pub async fn drive_distance_radius(
        &self,
        velocity: f64,
        radius: f64,
        distance: f64,
    ) -> Result<(), AsimovError> {
        let v = Velocity::new(velocity)?;
        let r = Radius::new(radius)?;
        let d = Distance::new(distance)?.aligned_with(v);
        info!(
            velocity_mps = v.get(),
            radius_m = r.get(),
            distance_m = d.get(),
            "drive distance"
        );
        self.send(format!(
            "DRIVE DISTANCE {} {} {}",
            v.to_wire(),
            r.to_wire(),
            d.to_wire()
        ))
        .await
    }

    pub async fn drive_time(&self, velocity: f64, seconds: f64) -> Result<(), AsimovError> {
        let v = Velocity::new(velocity)?;
        let t = Seconds::new(seconds)?;
        info!(velocity_mps = v.get(), time_s = t.get(), "drive time");
        self.send(format!("DRIVE STRAIGHT TIME {} {}", v.to_wire(), t.to_wire()))
            .await
    }

    pub async fn drive_time_radius(
        &self,
        velocity: f64,
        radius: f64,
        seconds: f64,
    ) -> Result<(), AsimovError> {
        let v = Velocity::new(velocity)?;
        let r = Radius::new(radius)?;
        let t = Seconds::new(seconds)?;
        info!(
            velocity_mps = v.get(),
            radius_m = r.get(),
            time_s = t.get(),
            "drive time"
        );
        self.send(format!(
            "DRIVE TIME {} {} {}",
            v.to_wire(),
            r.to_wire(),
            t.to_wire()
        ))
        .await
    }

    /// Set each wheel's velocity independently.
    pub async fn drive_direct(&self, left: f64, right: f64) -> Result<(), AsimovError> {
        let l = Velocity::named("left_velocity", left)?;
        let r = Velocity::named("right_velocity", right)?;
        info!(left_mps = l.get(), right_mps = r.get(), "drive direct");
        self.send(format!("DRIVE DIRECT {} {}", l.to_wire(), r.to_wire()))
            .await
    }

    /// Spin in place until superseded. Positive is clockwise.
    pub async fn spin(&self, velocity: f64) -> Result<(), AsimovError> {
        let v = Velocity::new(velocity)?;
        info!(velocity_mps = v.get(), "spin");
        self.send(format!("DRIVE SPIN NORMAL {}", v.to_wire())).await
    }

    /// Spin in place by `degrees`.
    ///
    /// Only the magnitude of `degrees` is used; the direction comes from the
    /// sign of `velocity`.
    pub async fn spin_angle(&self, velocity: f64, degrees: f64) -> Result<(), AsimovError> {
        let v = Velocity::new(velocity)?;
        let deg = Degrees::new(degrees)?;
        info!(velocity_mps = v.get(), degrees = deg.get().abs(), "spin angle");
        self.send(format!(
            "DRIVE SPIN ANGLE {} {}",
            v.to_wire(),
            deg.opposing(v).to_wire()
        ))
        .await
    }

    pub async fn spin_time(&self, velocity: f64, seconds: f64) -> Result<(), AsimovError> {
        let v = Velocity::new(velocity)?;
        let t = Seconds::new(seconds)?;
        info!(velocity_mps = v.get(), time_s = t.get(), "spin time");
        self.send(format!("DRIVE SPIN TIME {} {}", v.to_wire(), t.to_wire()))
            .await
    }

    pub async fn stop(&self) -> Result<(), AsimovError> {
        info!("stop");
        self.send("DRIVE STOP".to_string()).await
    }

    // ─────────────────────────────────────────────────────────────────────
    // LEDs and sound
    // ─────────────────────────────────────────────────────────────────────

    /// Switch an LED on or off. The power LED has no on/off form, so "off"
    /// is sent as zero colour at zero intensity.
    pub async fn set_led(&self, led: Led, on: bool) -> Result<(), AsimovError> {
        info!(led = ?led, on, "set led");
        let command = match (led, on) {
            (Led::Power, false) => "LED POWER 0 0".to_string(),
            (_, true) => format!("LED {} ON", led.as_wire()),
            (_, false) => format!("LED {} OFF", led.as_wire()),
        };
        self.send(command).await
    }

    /// `color` runs from green (0) to red (255).
    pub async fn set_power_led(&self, color: u8, intensity: u8) -> Result<(), AsimovError> {
        info!(color, intensity, "set power led");
        self.send(format!("LED POWER {color} {intensity}")).await
    }

    /// Flash `led` `count` times, each on-phase lasting `duration`.
    pub async fn flash_led(&self, led: Led, count: u8, duration: Duration) -> Result<(), AsimovError> {
        let t = Seconds::named("flash_duration", duration.as_secs_f64())?;
        info!(led = ?led, count, duration_s = t.get(), "flash led");
        self.send(format!(
            "LED FLASH {} {} {}",
            led.as_wire(),
            count,
            t.to_wire()
        ))
        .await
    }

    /// Beep, then pause for the settle delay. The pause is taken even when
    /// the robot rejects the beep.
    pub async fn beep(&self) -> Result<(), AsimovError> {
        info!("beep");
        let result = self.send("BEEP".to_string()).await;
        if !self.beep_settle.is_zero() {
            tokio::time::sleep(self.beep_settle).await;
        }
        result
    }

    /// Store a song in slot `number`. Notes are MIDI numbers; durations are
    /// in 1/64 s.
    pub async fn define_song(
        &self,
        number: u8,
        notes: &[u8],
        durations: &[u8],
    ) -> Result<(), AsimovError> {
        limits::check_song(number, notes, durations)?;
        info!(number, notes = notes.len(), "define song");
        self.send(format!(
            "SONG DEFINE {} {} {}",
            number,
            join(notes),
            join(durations)
        ))
        .await
    }

    pub async fn play_song(&self, number: u8) -> Result<(), AsimovError> {
        limits::check_range(
            "song_number",
            f64::from(number),
            0.0,
            f64::from(limits::SONG_NUMBER_MAX),
        )?;
        info!(number, "play song");
        self.send(format!("SONG PLAY {number}")).await
    }

    // ─────────────────────────────────────────────────────────────────────
    // Waits (block the robot's script, not this process)
    // ─────────────────────────────────────────────────────────────────────

    pub async fn wait_time(&self, seconds: f64) -> Result<(), AsimovError> {
        let t = Seconds::new(seconds)?;
        info!(time_s = t.get(), "wait time");
        self.send(format!("WAIT TIME {}", t.to_wire())).await
    }

    pub async fn wait_distance(&self, distance: f64) -> Result<(), AsimovError> {
        let d = Distance::new(distance)?;
        info!(distance_m = d.get(), "wait distance");
        self.send(format!("WAIT DISTANCE {}", d.to_wire())).await
    }

    /// Wait until the robot has turned `degrees` clockwise.
    pub async fn wait_angle(&self, degrees: f64) -> Result<(), AsimovError> {
        let deg = Degrees::new(degrees)?;
        info!(degrees = deg.get(), "wait angle");
        // The robot counts counter-clockwise as positive.
        self.send(format!("WAIT ANGLE {}", -deg.to_wire())).await
    }

    pub async fn wait_event(&self, event: WaitEvent) -> Result<(), AsimovError> {
        info!(event = ?event, "wait event");
        self.send(format!("WAIT EVENT {}", event.code())).await
    }
}

fn join(values: &[u8]) -> String {
    values
        .iter()
        .map(u8::to_string)
        .collect::<Vec<_>>()
        .join(",")
}
