//! A single persistent TCP connection with exact-transfer semantics.
//!
//! Each channel of the link (AV, Input) runs over its own [`Session`]:
//! one long-lived TCP stream, exclusively owned by the one pipeline
//! loop that drives it. The session exposes all-or-nothing primitives
//! — [`read_exact`](Session::read_exact) and
//! [`write_all`](Session::write_all) loop internally until the full
//! count is moved or an error occurs; callers never see partial I/O.
//!
//! Any I/O failure (reset, EOF before the requested count, OS error)
//! transitions the session to its terminal `Closed` state. There is no
//! reconnect: a closed session stays closed for the process lifetime.

use std::fmt;
use std::net::SocketAddr;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tracing::{debug, info};

use crate::error::CastError;

// ── Role / channel tags ──────────────────────────────────────────

/// Which end of a channel this session is: the side producing framed
/// units or the side consuming them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionRole {
    /// Transmits framed units (host on AV, viewer on Input).
    Source,
    /// Receives framed units (viewer on AV, host on Input).
    Sink,
}

/// Which of the two link channels a session carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    /// Video frames, host → viewer.
    Av,
    /// Input event batches, viewer → host.
    Input,
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Channel::Av => write!(f, "av"),
            Channel::Input => write!(f, "input"),
        }
    }
}

// ── Session state ────────────────────────────────────────────────

/// Lifecycle of a session. `Closed` is terminal and never left.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SessionState {
    Established,
    Closed,
}

// ── Session ──────────────────────────────────────────────────────

/// One exclusively-owned TCP connection for one channel.
pub struct Session {
    stream: TcpStream,
    role: SessionRole,
    channel: Channel,
    state: SessionState,
    peer: SocketAddr,
}

impl Session {
    /// Connect to a listening peer (viewer side of the link).
    pub async fn connect(
        addr: &str,
        port: u16,
        role: SessionRole,
        channel: Channel,
    ) -> Result<Self, CastError> {
        let stream = TcpStream::connect((addr, port)).await?;
        let peer = stream.peer_addr()?;
        info!(%channel, %peer, "session connected");
        Ok(Self {
            stream,
            role,
            channel,
            state: SessionState::Established,
            peer,
        })
    }

    /// Bind `addr:port`, accept exactly one peer, and drop the
    /// listener (host side of the link).
    ///
    /// The listener is consumed before this returns, so a second
    /// accept on the same binding is impossible by construction — one
    /// accepted connection per port per process run.
    pub async fn accept_once(
        addr: &str,
        port: u16,
        role: SessionRole,
        channel: Channel,
    ) -> Result<Self, CastError> {
        let listener = TcpListener::bind((addr, port)).await?;
        info!(%channel, addr, port, "waiting for peer");
        let (stream, peer) = listener.accept().await?;
        info!(%channel, %peer, "session accepted");
        Ok(Self {
            stream,
            role,
            channel,
            state: SessionState::Established,
            peer,
        })
    }

    /// Wrap an already-established TCP stream.
    pub fn from_stream(
        stream: TcpStream,
        role: SessionRole,
        channel: Channel,
    ) -> Result<Self, CastError> {
        let peer = stream.peer_addr()?;
        Ok(Self {
            stream,
            role,
            channel,
            state: SessionState::Established,
            peer,
        })
    }

    /// This session's end of the channel.
    pub fn role(&self) -> SessionRole {
        self.role
    }

    /// Which channel this session carries.
    pub fn channel(&self) -> Channel {
        self.channel
    }

    /// Remote peer address.
    pub fn peer(&self) -> SocketAddr {
        self.peer
    }

    /// Whether the session has reached its terminal state.
    pub fn is_closed(&self) -> bool {
        self.state == SessionState::Closed
    }

    /// Read exactly `buf.len()` bytes, or fail.
    ///
    /// EOF before the full count is an error ([`CastError::Io`] with
    /// `UnexpectedEof`), and any failure closes the session.
    pub async fn read_exact(&mut self, buf: &mut [u8]) -> Result<(), CastError> {
        if self.is_closed() {
            return Err(CastError::SessionClosed);
        }
        match self.stream.read_exact(buf).await {
            Ok(_) => Ok(()),
            Err(e) => {
                self.close();
                Err(e.into())
            }
        }
    }

    /// Write all of `buf`, or fail. Any failure closes the session.
    pub async fn write_all(&mut self, buf: &[u8]) -> Result<(), CastError> {
        if self.is_closed() {
            return Err(CastError::SessionClosed);
        }
        match self.stream.write_all(buf).await {
            Ok(()) => Ok(()),
            Err(e) => {
                self.close();
                Err(e.into())
            }
        }
    }

    /// Transition to the terminal `Closed` state.
    pub fn close(&mut self) {
        if self.state != SessionState::Closed {
            debug!(channel = %self.channel, peer = %self.peer, "session closed");
            self.state = SessionState::Closed;
        }
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("role", &self.role)
            .field("channel", &self.channel)
            .field("state", &self.state)
            .field("peer", &self.peer)
            .finish()
    }
}
