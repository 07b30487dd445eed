//! Conversion between public units (metres, seconds, degrees) and the wire
//! units (millimetres, milliseconds, whole degrees).
//!
//! Every numeric wire field is an `int`. Callers must range-check first; the
//! conversions saturate rather than wrap if they do not.

/// Wire units per public unit (mm per m, ms per s).
pub const MILLI_PER_BASE: f64 = 1000.0;

/// Metres (or seconds) to millimetres (or milliseconds), rounded.
pub fn to_wire(value: f64) -> i32 {
    (value * MILLI_PER_BASE).round() as i32
}

/// Millimetres (or milliseconds) back to metres (or seconds).
pub fn from_wire(value: i32) -> f64 {
    f64::from(value) / MILLI_PER_BASE
}

/// Degrees rounded to the whole degrees the wire carries.
pub fn degrees_to_wire(degrees: f64) -> i32 {
    degrees.round() as i32
}

/// `-1`, `0` or `1`. Unlike [`f64::signum`], zero maps to zero.
pub fn sign(value: f64) -> f64 {
    if value > 0.0 {
        1.0
    } else if value < 0.0 {
        -1.0
    } else {
        0.0
    }
}

pub fn within_tolerance(value: f64, target: f64, tolerance: f64) -> bool {
    (value - target).abs() <= tolerance
}
