//! `asimov-runtime` – the autonomous layer and the process wiring around it.
//!
//! # Modules
//!
//! - [`cooldown`] – [`Cooldown`]: per-category action rate limiting.
//! - [`mode_controller`] – [`ModeController`]: the Follow / Avoid / Center /
//!   Drinking state machine and manual moves.
//! - [`dispatcher`] – the actor that owns the mode controller, its
//!   [`DispatcherHandle`] and the [`Observer`] capability handed to tracking
//!   collaborators.
//! - [`context`] – [`RuntimeContext`]: startup, shutdown and ownership of
//!   all of the above.

pub mod context;
pub mod cooldown;
pub mod dispatcher;
pub mod mode_controller;

pub use context::RuntimeContext;
pub use cooldown::Cooldown;
pub use dispatcher::{Command, Dispatcher, DispatcherHandle, Observer};
pub use mode_controller::{BehaviorConfig, CENTER_DAMPING, ModeAction, ModeController};
