//! `asimov-types` – vocabulary shared by every Asimov crate.
//!
//! Holds the enums that name things on the wire (robot modes, LEDs, wait
//! events), the autonomous [`Mode`] set, the [`Observation`] handed in by
//! tracking collaborators, operator [`ManualCommand`]s and the single
//! [`AsimovError`] taxonomy.

use std::fmt;
use std::time::Instant;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Autonomous behavior currently driving the robot.
///
/// Exactly one mode is active at a time. Every transition goes through
/// [`Mode::None`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Idle; observations produce no motion.
    #[default]
    None,
    /// Keep the subject centered and at a fixed standoff distance.
    Follow,
    /// Turn to face directly away from the subject.
    Avoid,
    /// Keep the subject centered.
    Center,
    /// Reserved; observations produce no motion.
    Drinking,
}

impl Mode {
    /// `true` for every mode except [`Mode::None`].
    pub fn is_active(self) -> bool {
        self != Mode::None
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Mode::None => "none",
            Mode::Follow => "follow",
            Mode::Avoid => "avoid",
            Mode::Center => "center",
            Mode::Drinking => "drinking",
        };
        f.write_str(name)
    }
}

/// Open-interface operating mode of the robot itself (`MODE ...`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RobotMode {
    /// Sensors readable, actuators locked out.
    Passive,
    /// Cliff, wheel-drop and charger safety features stay armed.
    Safe,
    /// Complete control; all safety features off.
    #[default]
    Full,
}

impl RobotMode {
    /// Token used in the `MODE` command.
    pub fn as_wire(self) -> &'static str {
        match self {
            RobotMode::Passive => "PASSIVE",
            RobotMode::Safe => "SAFE",
            RobotMode::Full => "FULL",
        }
    }
}

/// Controllable LEDs on the robot's top panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Led {
    Power,
    Advance,
    Play,
}

impl Led {
    /// Token used in the `LED` commands.
    pub fn as_wire(self) -> &'static str {
        match self {
            Led::Power => "POWER",
            Led::Advance => "ADVANCE",
            Led::Play => "PLAY",
        }
    }
}

/// Events the robot can block on with `WAIT EVENT {code}`.
///
/// The discriminant is the code sent on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[repr(u8)]
pub enum WaitEvent {
    WheelDrop = 0,
    FrontWheelDrop = 1,
    LeftWheelDrop = 2,
    RightWheelDrop = 3,
    Bump = 4,
    LeftBump = 5,
    RightBump = 6,
    VirtualWall = 7,
    Wall = 8,
    Cliff = 9,
    LeftCliff = 10,
    FrontLeftCliff = 11,
    FrontRightCliff = 12,
    RightCliff = 13,
    HomeBase = 14,
    AdvanceButton = 15,
    PlayButton = 16,
    DigitalInput0 = 17,
    DigitalInput1 = 18,
    DigitalInput2 = 19,
    DigitalInput3 = 20,
    PassiveMode = 21,
}

impl WaitEvent {
    pub fn code(self) -> u8 {
        self as u8
    }
}

/// Where a tracked subject is relative to the robot's forward axis.
///
/// Positive bearings are to the robot's left (counter-clockwise), matching
/// the depth sensor's frame. Observations are ephemeral and are not retained
/// past one mode update.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Observation {
    /// Signed bearing in degrees; 0 is straight ahead.
    pub bearing_deg: f64,
    /// Distance to the subject in metres, when the sensor provides one.
    pub range_m: Option<f64>,
    pub timestamp: Instant,
}

impl Observation {
    /// Observation stamped with the current instant.
    pub fn new(bearing_deg: f64, range_m: Option<f64>) -> Self {
        Self::at(bearing_deg, range_m, Instant::now())
    }

    pub fn at(bearing_deg: f64, range_m: Option<f64>, timestamp: Instant) -> Self {
        Self {
            bearing_deg,
            range_m,
            timestamp,
        }
    }

    /// Build an observation from a sensor-frame position: `x` lateral
    /// (left positive) and `z` forward, both in metres.
    ///
    /// The bearing is `atan2(x, z)`; the range is the planar distance.
    pub fn from_position(x: f64, z: f64, timestamp: Instant) -> Self {
        Self {
            bearing_deg: x.atan2(z).to_degrees(),
            range_m: Some(x.hypot(z)),
            timestamp,
        }
    }
}

/// One-shot operator commands (gestures, voice, console).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ManualCommand {
    MoveForward,
    MoveBackward,
    /// Counter-clockwise by one spin step.
    TurnLeft,
    /// Clockwise by one spin step.
    TurnRight,
    TurnAround,
    Stop,
    Beep,
    /// Five beeps, then process shutdown.
    Shutdown,
}

impl ManualCommand {
    /// Commands that move the robot are refused while a mode is active.
    pub fn is_motion(self) -> bool {
        matches!(
            self,
            ManualCommand::MoveForward
                | ManualCommand::MoveBackward
                | ManualCommand::TurnLeft
                | ManualCommand::TurnRight
                | ManualCommand::TurnAround
        )
    }
}

/// Error taxonomy for the whole command stack.
#[derive(Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AsimovError {
    /// The TCP connection could not be opened.
    #[error("could not connect to {addr}: {reason}")]
    Connect { addr: String, reason: String },

    /// The server answered the `HELO` greeting with something other than `REDY`.
    #[error("handshake failed: expected REDY, got {response:?}")]
    HandshakeFailed { response: String },

    /// A command argument is outside its physical range. Nothing was sent.
    #[error("invalid argument {field} = {value}: must be {bound}")]
    InvalidArgument {
        field: String,
        bound: String,
        value: f64,
    },

    /// The robot answered a command with something other than `ACK`.
    #[error("command {command:?} rejected: {response:?}")]
    CommandRejected { command: String, response: String },

    /// The link failed and cannot carry further commands.
    #[error("link broken: {0}")]
    LinkBroken(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("channel error: {0}")]
    Channel(String),
}

impl AsimovError {
    /// Errors after which no further command can reach the robot.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            AsimovError::Connect { .. } | AsimovError::HandshakeFailed { .. } | AsimovError::LinkBroken(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mode_serialization_roundtrip() {
        let json = serde_json::to_string(&Mode::Follow).unwrap();
        assert_eq!(json, "\"follow\"");
        let back: Mode = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Mode::Follow);
    }

    #[test]
    fn only_none_is_inactive() {
        assert!(!Mode::None.is_active());
        for mode in [Mode::Follow, Mode::Avoid, Mode::Center, Mode::Drinking] {
            assert!(mode.is_active(), "{mode} should be active");
        }
    }

    #[test]
    fn wait_event_codes_follow_declaration_order() {
        assert_eq!(WaitEvent::WheelDrop.code(), 0);
        assert_eq!(WaitEvent::Bump.code(), 4);
        assert_eq!(WaitEvent::PassiveMode.code(), 21);
    }

    #[test]
    fn wire_tokens_are_upper_case() {
        assert_eq!(RobotMode::Full.as_wire(), "FULL");
        assert_eq!(Led::Advance.as_wire(), "ADVANCE");
    }

    #[test]
    fn observation_from_position_computes_bearing_and_range() {
        let now = Instant::now();
        let ahead = Observation::from_position(0.0, 2.0, now);
        assert!(ahead.bearing_deg.abs() < 1e-9);
        assert!((ahead.range_m.unwrap() - 2.0).abs() < 1e-9);

        let left = Observation::from_position(1.0, 1.0, now);
        assert!((left.bearing_deg - 45.0).abs() < 1e-9);
        assert!((left.range_m.unwrap() - 2f64.sqrt()).abs() < 1e-9);

        let right = Observation::from_position(-1.0, 1.0, now);
        assert!((right.bearing_deg + 45.0).abs() < 1e-9);
    }

    #[test]
    fn manual_motion_commands() {
        assert!(ManualCommand::TurnAround.is_motion());
        assert!(!ManualCommand::Stop.is_motion());
        assert!(!ManualCommand::Shutdown.is_motion());
    }

    #[test]
    fn asimov_error_display() {
        let err = AsimovError::InvalidArgument {
            field: "velocity".to_string(),
            bound: "between -0.5 and 0.5".to_string(),
            value: 0.7,
        };
        let msg = err.to_string();
        assert!(msg.contains("velocity"));
        assert!(msg.contains("0.7"));
        assert!(msg.contains("between -0.5 and 0.5"));

        let err = AsimovError::HandshakeFailed {
            response: "NOPE".to_string(),
        };
        assert!(err.to_string().contains("NOPE"));
        assert!(err.is_fatal());
    }

    #[test]
    fn rejected_command_is_not_fatal() {
        let err = AsimovError::CommandRejected {
            command: "BEEP".to_string(),
            response: "ERR".to_string(),
        };
        assert!(!err.is_fatal());
    }
}
