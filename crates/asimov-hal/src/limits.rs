//! Physical limits of the robot and the range-checked values built on them.
//!
//! A value type can only be constructed inside its range, so a formatted
//! command can never carry an out-of-range or overflowing field. Violations
//! surface as [`AsimovError::InvalidArgument`] naming the field, the bound
//! that was crossed and the offending value.

use asimov_types::AsimovError;

use crate::units;

/// Minimum velocity in metres/second.
pub const VELOCITY_MIN: f64 = -0.5;
/// Maximum velocity in metres/second.
pub const VELOCITY_MAX: f64 = 0.5;
/// Minimum turning radius in metres.
pub const RADIUS_MIN: f64 = -2.0;
/// Maximum turning radius in metres.
pub const RADIUS_MAX: f64 = 2.0;
/// Minimum drivable distance in metres.
pub const DISTANCE_MIN: f64 = -2.0;
/// Maximum drivable distance in metres.
pub const DISTANCE_MAX: f64 = 2.0;
/// Minimum duration in seconds.
pub const TIME_MIN: f64 = 0.0;
/// Longest duration whose millisecond count still fits the wire `int`.
pub const TIME_MAX: f64 = i32::MAX as f64 / units::MILLI_PER_BASE;
/// Largest angle magnitude whose whole-degree count fits the wire `int`.
pub const ANGLE_LIMIT: f64 = i32::MAX as f64;

/// Highest song slot.
pub const SONG_NUMBER_MAX: u8 = 15;
/// Most notes a song may hold.
pub const SONG_LENGTH_MAX: usize = 16;
/// Lowest playable MIDI note.
pub const NOTE_MIN: u8 = 31;
/// Highest playable MIDI note.
pub const NOTE_MAX: u8 = 127;

/// Check `value` against `[min, max]`, naming the bound it violates.
pub fn check_range(field: &str, value: f64, min: f64, max: f64) -> Result<f64, AsimovError> {
    let bound = if value.is_nan() {
        format!("a number between {min} and {max}")
    } else if value < min {
        format!("at least {min}")
    } else if value > max {
        format!("at most {max}")
    } else {
        return Ok(value);
    };
    Err(AsimovError::InvalidArgument {
        field: field.to_string(),
        bound,
        value,
    })
}

macro_rules! bounded_quantity {
    ($(#[$doc:meta])* $name:ident, $field:literal, $min:expr, $max:expr) => {
        $(#[$doc])*
        #[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
        pub struct $name(f64);

        impl $name {
            pub const MIN: f64 = $min;
            pub const MAX: f64 = $max;

            pub fn new(value: f64) -> Result<Self, AsimovError> {
                Self::named($field, value)
            }

            /// Like [`new`](Self::new), reporting violations under `field`.
            pub fn named(field: &str, value: f64) -> Result<Self, AsimovError> {
                check_range(field, value, Self::MIN, Self::MAX).map(Self)
            }

            pub fn get(self) -> f64 {
                self.0
            }
        }

        impl TryFrom<f64> for $name {
            type Error = AsimovError;

            fn try_from(value: f64) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }
    };
}

bounded_quantity!(
    /// Wheel velocity in metres/second; positive is forward (or clockwise
    /// when spinning).
    Velocity, "velocity", VELOCITY_MIN, VELOCITY_MAX
);
bounded_quantity!(
    /// Turning radius in metres.
    Radius, "radius", RADIUS_MIN, RADIUS_MAX
);
bounded_quantity!(
    /// Travel distance in metres.
    Distance, "distance", DISTANCE_MIN, DISTANCE_MAX
);
bounded_quantity!(
    /// Duration in seconds.
    Seconds, "time", TIME_MIN, TIME_MAX
);
bounded_quantity!(
    /// Rotation in degrees; positive is clockwise.
    Degrees, "degrees", -ANGLE_LIMIT, ANGLE_LIMIT
);

impl Velocity {
    /// Millimetres/second.
    pub fn to_wire(self) -> i32 {
        units::to_wire(self.0)
    }
}

impl Radius {
    /// Millimetres.
    pub fn to_wire(self) -> i32 {
        units::to_wire(self.0)
    }
}

impl Distance {
    /// Millimetres.
    pub fn to_wire(self) -> i32 {
        units::to_wire(self.0)
    }

    /// Same magnitude, pointing the way `velocity` drives.
    ///
    /// The robot only stops once the travelled distance reaches the target,
    /// so a target behind a forward-driving robot is never reached.
    pub fn aligned_with(self, velocity: Velocity) -> Self {
        Self(units::sign(velocity.get()) * self.0.abs())
    }
}

impl Seconds {
    /// Milliseconds.
    pub fn to_wire(self) -> i32 {
        units::to_wire(self.0)
    }
}

impl Degrees {
    pub fn to_wire(self) -> i32 {
        units::degrees_to_wire(self.0)
    }

    /// The robot counts counter-clockwise as positive and a spin only ends
    /// once the counted angle is reached, so the target must run against
    /// the spin velocity.
    pub fn opposing(self, velocity: Velocity) -> Self {
        Self(-units::sign(velocity.get()) * self.0.abs())
    }
}

/// Validate a song definition against the open-interface song limits.
pub fn check_song(number: u8, notes: &[u8], durations: &[u8]) -> Result<(), AsimovError> {
    check_range("song_number", f64::from(number), 0.0, f64::from(SONG_NUMBER_MAX))?;
    check_range("notes.len", notes.len() as f64, 1.0, SONG_LENGTH_MAX as f64)?;
    for &note in notes {
        check_range("note", f64::from(note), f64::from(NOTE_MIN), f64::from(NOTE_MAX))?;
    }
    if durations.len() != notes.len() {
        return Err(AsimovError::InvalidArgument {
            field: "durations.len".to_string(),
            bound: format!("equal to the note count {}", notes.len()),
            value: durations.len() as f64,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn invalid(result: Result<impl std::fmt::Debug, AsimovError>) -> (String, String, f64) {
        match result {
            Err(AsimovError::InvalidArgument { field, bound, value }) => (field, bound, value),
            other => panic!("expected InvalidArgument, got {other:?}"),
        }
    }

    #[test]
    fn velocity_bounds_are_inclusive() {
        assert!(Velocity::new(0.5).is_ok());
        assert!(Velocity::new(-0.5).is_ok());
        assert!(Velocity::new(0.0).is_ok());
    }

    #[test]
    fn velocity_over_max_names_field_bound_and_value() {
        let (field, bound, value) = invalid(Velocity::new(0.7));
        assert_eq!(field, "velocity");
        assert_eq!(bound, "at most 0.5");
        assert!((value - 0.7).abs() < 1e-12);
    }

    #[test]
    fn named_constructor_reports_custom_field() {
        let (field, bound, _) = invalid(Velocity::named("left_velocity", -0.9));
        assert_eq!(field, "left_velocity");
        assert_eq!(bound, "at least -0.5");
    }

    #[test]
    fn radius_and_distance_limits() {
        assert!(Radius::new(2.0).is_ok());
        assert!(Radius::new(-2.01).is_err());
        assert!(Distance::new(-2.0).is_ok());
        assert!(Distance::new(2.5).is_err());
    }

    #[test]
    fn negative_time_rejected() {
        let (field, bound, _) = invalid(Seconds::new(-0.1));
        assert_eq!(field, "time");
        assert_eq!(bound, "at least 0");
        assert!(Seconds::new(0.0).is_ok());
    }

    #[test]
    fn time_that_would_overflow_the_wire_is_rejected() {
        assert!(Seconds::new(TIME_MAX).is_ok());
        assert!(Seconds::new(TIME_MAX + 1.0).is_err());
        assert_eq!(Seconds::new(TIME_MAX).unwrap().to_wire(), i32::MAX);
    }

    #[test]
    fn nan_and_infinity_rejected() {
        assert!(Velocity::new(f64::NAN).is_err());
        assert!(Degrees::new(f64::INFINITY).is_err());
        assert!(Seconds::new(f64::INFINITY).is_err());
    }

    #[test]
    fn distance_follows_velocity_sign() {
        let back = Velocity::new(-0.3).unwrap();
        let fwd = Velocity::new(0.3).unwrap();
        let d = Distance::new(0.5).unwrap();
        assert_eq!(d.aligned_with(back).to_wire(), -500);
        assert_eq!(d.aligned_with(fwd).to_wire(), 500);
        assert_eq!(Distance::new(-0.5).unwrap().aligned_with(fwd).to_wire(), 500);
    }

    #[test]
    fn degrees_oppose_velocity_sign() {
        let cw = Velocity::new(0.3).unwrap();
        let ccw = Velocity::new(-0.3).unwrap();
        let d = Degrees::new(30.0).unwrap();
        assert_eq!(d.opposing(cw).to_wire(), -30);
        assert_eq!(d.opposing(ccw).to_wire(), 30);
        assert_eq!(Degrees::new(-30.0).unwrap().opposing(cw).to_wire(), -30);
    }

    #[test]
    fn song_validation() {
        assert!(check_song(0, &[60, 62, 64], &[16, 16, 32]).is_ok());

        let (field, _, _) = invalid(check_song(16, &[60], &[16]));
        assert_eq!(field, "song_number");

        let (field, _, _) = invalid(check_song(1, &[], &[]));
        assert_eq!(field, "notes.len");

        let (field, _, value) = invalid(check_song(1, &[60, 20], &[16, 16]));
        assert_eq!(field, "note");
        assert_eq!(value, 20.0);

        let (field, _, _) = invalid(check_song(1, &[60, 62], &[16]));
        assert_eq!(field, "durations.len");
    }
}
