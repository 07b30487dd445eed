//! The transport seam.
//!
//! The controller never speaks to a socket directly. It hands formatted
//! command lines to a [`CommandTransport`], so the TCP client and the
//! in-process simulator are interchangeable.

use async_trait::async_trait;
use asimov_types::AsimovError;

use crate::response::Response;

/// A strictly request-then-response line link.
///
/// # Contract
///
/// * `execute` – sends one line (without terminator) and returns the one
///   line the peer answers with. Concurrent callers are serialized; their
///   writes and reads never interleave. An I/O failure returns
///   [`AsimovError::LinkBroken`] and every later call fails the same way.
///
/// * `close` – sends `END`, releases the connection, and is safe to call any
///   number of times.
#[async_trait]
pub trait CommandTransport: Send + Sync {
    async fn execute(&self, line: &str) -> Result<Response, AsimovError>;

    async fn close(&self);
}
