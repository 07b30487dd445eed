//! `asimov-hal` – typed command surface for the robot.
//!
//! The only place protocol command strings are formatted. Callers speak in
//! metres, seconds and degrees; this crate validates the values against the
//! robot's physical limits, converts them to wire units and hands the line to
//! an [`asimov_link::CommandTransport`].
//!
//! # Modules
//!
//! - [`units`] – public-unit ↔ wire-unit conversion.
//! - [`limits`] – range-checked value types ([`Velocity`], [`Radius`],
//!   [`Distance`], [`Seconds`], [`Degrees`]) and song limits.
//! - [`controller`] – [`RobotController`], one method per robot command.

pub mod controller;
pub mod limits;
pub mod units;

pub use controller::{DEFAULT_BEEP_SETTLE, RobotController};
pub use limits::{Degrees, Distance, Radius, Seconds, Velocity};
