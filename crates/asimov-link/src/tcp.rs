//! [`TcpCommandLink`] – the TCP client side of the robot protocol.
//!
//! One instance owns one connection for its whole life:
//!
//! 1. [`TcpCommandLink::connect`] opens the socket and performs the
//!    `HELO`/`REDY` handshake. Any failure here is fatal to startup.
//! 2. [`CommandTransport::execute`] sends a line and waits for the reply
//!    under an async mutex, so callers on different tasks never interleave
//!    partial writes or reads.
//! 3. [`CommandTransport::close`] sends `END` and shuts the socket down.
//!    Dropping an unclosed link does the same on a best-effort basis.
//!
//! # Safety Features
//!
//! - **Read deadline**: every reply must arrive within the configured
//!   timeout; a wedged peer breaks the link instead of stalling the caller.
//! - **Line limit**: replies longer than [`MAX_LINE_BYTES`] break the link.
//! - **Sticky failure**: after an I/O failure the link refuses every further
//!   command without touching the socket.

use std::io;
use std::time::Duration;

use async_trait::async_trait;
use asimov_types::AsimovError;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;
use tokio::sync::Mutex;
use tokio::time::timeout;
use tracing::{debug, error, info, warn};

use crate::response::{END_COMMAND, HANDSHAKE_GREETING, Response};
use crate::transport::CommandTransport;

/// Port the robot server listens on by default.
pub const DEFAULT_PORT: u16 = 4545;

/// How long to wait for a reply line before declaring the link broken.
pub const DEFAULT_READ_TIMEOUT: Duration = Duration::from_secs(5);

/// Longest reply line accepted, terminator included.
pub const MAX_LINE_BYTES: usize = 1024;

enum LinkState {
    Connected(BufReader<TcpStream>),
    Broken(String),
    Closed,
}

/// TCP connection to the robot server.
pub struct TcpCommandLink {
    peer: String,
    read_timeout: Duration,
    state: Mutex<LinkState>,
}

impl TcpCommandLink {
    /// Connect to `host:port` and complete the handshake, using
    /// [`DEFAULT_READ_TIMEOUT`] for every reply.
    ///
    /// # Errors
    ///
    /// - [`AsimovError::Connect`] – the socket could not be opened.
    /// - [`AsimovError::HandshakeFailed`] – the server did not answer `REDY`.
    /// - [`AsimovError::LinkBroken`] – the connection failed mid-handshake.
    pub async fn connect(host: &str, port: u16) -> Result<Self, AsimovError> {
        Self::connect_with_timeout(host, port, DEFAULT_READ_TIMEOUT).await
    }

    /// Like [`connect`][Self::connect] with an explicit reply deadline.
    pub async fn connect_with_timeout(
        host: &str,
        port: u16,
        read_timeout: Duration,
    ) -> Result<Self, AsimovError> {
        let peer = format!("{host}:{port}");
        info!(peer = %peer, "connecting to robot server");

        let socket = TcpStream::connect(&peer)
            .await
            .map_err(|e| AsimovError::Connect {
                addr: peer.clone(),
                reason: e.to_string(),
            })?;
        if let Err(e) = socket.set_nodelay(true) {
            debug!(error = %e, "could not disable Nagle on robot link");
        }
        let mut stream = BufReader::new(socket);

        info!(peer = %peer, "connected; attempting handshake");
        let reply = round_trip(&mut stream, HANDSHAKE_GREETING, read_timeout)
            .await
            .map_err(AsimovError::LinkBroken)?;
        if Response::parse(&reply) != Response::Ready {
            error!(peer = %peer, response = %reply, "handshake rejected");
            return Err(AsimovError::HandshakeFailed { response: reply });
        }
        info!(peer = %peer, "handshake completed; ready to execute commands");

        Ok(Self {
            peer,
            read_timeout,
            state: Mutex::new(LinkState::Connected(stream)),
        })
    }

    /// `host:port` this link was opened against.
    pub fn peer(&self) -> &str {
        &self.peer
    }
}

#[async_trait]
impl CommandTransport for TcpCommandLink {
    async fn execute(&self, line: &str) -> Result<Response, AsimovError> {
        let mut state = self.state.lock().await;
        let stream = match &mut *state {
            LinkState::Connected(stream) => stream,
            LinkState::Broken(reason) => return Err(AsimovError::LinkBroken(reason.clone())),
            LinkState::Closed => return Err(AsimovError::LinkBroken("link closed".to_string())),
        };

        debug!(command = line, "sending command");
        match round_trip(stream, line, self.read_timeout).await {
            Ok(reply) => {
                debug!(command = line, response = %reply, "received response");
                Ok(Response::parse(&reply))
            }
            Err(reason) => {
                error!(peer = %self.peer, command = line, reason = %reason, "robot link broken");
                *state = LinkState::Broken(reason.clone());
                Err(AsimovError::LinkBroken(reason))
            }
        }
    }

    async fn close(&self) {
        let mut state = self.state.lock().await;
        if let LinkState::Connected(stream) = &mut *state {
            info!(peer = %self.peer, "sending END and closing link");
            if let Err(e) = write_line(stream, END_COMMAND).await {
                warn!(error = %e, "could not send END");
            }
            if let Err(e) = stream.get_mut().shutdown().await {
                debug!(error = %e, "socket shutdown failed");
            }
        }
        *state = LinkState::Closed;
    }
}

impl Drop for TcpCommandLink {
    fn drop(&mut self) {
        let state = std::mem::replace(self.state.get_mut(), LinkState::Closed);
        let LinkState::Connected(stream) = state else {
            return;
        };
        warn!(peer = %self.peer, "link dropped without close(); sending END best-effort");
        match stream.into_inner().into_std() {
            Ok(mut socket) => {
                use std::io::Write;
                if let Err(e) = socket.write_all(format!("{END_COMMAND}\n").as_bytes()) {
                    debug!(error = %e, "could not send END on drop");
                }
                if let Err(e) = socket.shutdown(std::net::Shutdown::Both) {
                    debug!(error = %e, "socket shutdown failed on drop");
                }
            }
            Err(e) => debug!(error = %e, "could not detach socket on drop"),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Line I/O
// ─────────────────────────────────────────────────────────────────────────────

/// Send `line` and read back one reply within `deadline`.
///
/// The error is a human-readable reason, ready for [`AsimovError::LinkBroken`].
async fn round_trip<S>(stream: &mut S, line: &str, deadline: Duration) -> Result<String, String>
where
    S: AsyncBufRead + AsyncWrite + Unpin,
{
    write_line(stream, line)
        .await
        .map_err(|e| format!("send failed: {e}"))?;
    match timeout(deadline, read_line(stream)).await {
        Ok(Ok(reply)) => Ok(reply),
        Ok(Err(e)) => Err(format!("receive failed: {e}")),
        Err(_) => Err(format!("no response within {} ms", deadline.as_millis())),
    }
}

async fn write_line<S: AsyncWrite + Unpin>(stream: &mut S, line: &str) -> io::Result<()> {
    let mut data = Vec::with_capacity(line.len() + 1);
    data.extend_from_slice(line.as_bytes());
    data.push(b'\n');
    stream.write_all(&data).await?;
    stream.flush().await
}

/// Read bytes up to and including `\n`, then strip trailing `\r`/`\n`.
///
/// End-of-stream before a full line is an error, as is a line that does not
/// fit in [`MAX_LINE_BYTES`].
async fn read_line<S: AsyncBufRead + Unpin>(stream: &mut S) -> io::Result<String> {
    let mut buf = Vec::new();
    let n = (&mut *stream)
        .take(MAX_LINE_BYTES as u64)
        .read_until(b'\n', &mut buf)
        .await?;
    if n == 0 {
        return Err(io::Error::new(
            io::ErrorKind::UnexpectedEof,
            "connection closed by peer",
        ));
    }
    if buf.last() != Some(&b'\n') {
        let reason = if n >= MAX_LINE_BYTES {
            format!("response line exceeds {MAX_LINE_BYTES} bytes")
        } else {
            "connection closed mid-line".to_string()
        };
        return Err(io::Error::new(io::ErrorKind::InvalidData, reason));
    }
    while matches!(buf.last(), Some(b'\n' | b'\r')) {
        buf.pop();
    }
    String::from_utf8(buf)
        .map_err(|_| io::Error::new(io::ErrorKind::InvalidData, "response is not ASCII"))
}
