//! `asimov-link` – the robot command link.
//!
//! Carries one command line to the robot server and brings one response line
//! back. Nothing here knows what a command means.
//!
//! # Protocol
//!
//! ```text
//! client                      server
//!   HELO            ──────▶
//!                   ◀──────    REDY          (handshake, exactly once)
//!   DRIVE STOP      ──────▶
//!                   ◀──────    ACK | other   (one reply per command)
//!   END             ──────▶                  (no reply awaited)
//! ```
//!
//! # Modules
//!
//! - [`transport`] – [`CommandTransport`]: the seam every link implements.
//! - [`response`] – [`Response`]: classification of a reply line.
//! - [`tcp`] – [`TcpCommandLink`]: the real TCP client.
//! - [`sim`] – [`SimTransport`]: in-process robot that records commands.

pub mod response;
pub mod sim;
pub mod tcp;
pub mod transport;

pub use response::Response;
pub use sim::SimTransport;
pub use tcp::{DEFAULT_PORT, DEFAULT_READ_TIMEOUT, TcpCommandLink};
pub use transport::CommandTransport;
