//! Error types for macseek.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Main error type for macseek operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Malformed target hardware address
    #[error("MAC address error: {0}")]
    Mac(#[from] MacParseError),

    /// Transport-level errors (TCP/SSH connection, authentication)
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    /// Interactive session errors (prompt negotiation, command capture)
    #[error("Session error: {0}")]
    Session(#[from] SessionError),

    /// Device inventory errors
    #[error("Inventory error: {0}")]
    Inventory(#[from] InventoryError),
}

/// Transport layer errors (connection, authentication).
#[derive(Error, Debug)]
pub enum TransportError {
    /// Failed to connect to host
    #[error("Connection failed to {host}:{port}: {source}")]
    ConnectionFailed {
        host: String,
        port: u16,
        #[source]
        source: io::Error,
    },

    /// SSH handshake or protocol error
    #[error("SSH error: {0}")]
    Ssh(#[from] russh::Error),

    /// Authentication failed
    #[error("Authentication failed for user '{user}'")]
    AuthenticationFailed { user: String },

    /// Connection was closed unexpectedly
    #[error("Connection disconnected")]
    Disconnected,

    /// Operation timed out
    #[error("Operation timed out after {0:?}")]
    Timeout(std::time::Duration),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Session layer errors (prompt detection, output collection).
#[derive(Error, Debug)]
pub enum SessionError {
    /// The device sent no new bytes for the whole poll budget
    #[error("Timed out waiting for {waiting_for} ({polls} empty polls)")]
    Timeout { waiting_for: &'static str, polls: u32 },

    /// The session produced something we cannot drive a command through
    #[error("Protocol error: {message}")]
    Protocol { message: String },
}

/// Hardware address parse errors.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum MacParseError {
    /// Input is not six colon-separated 2-digit hex groups
    #[error("Invalid MAC address format: {input:?}")]
    InvalidFormat { input: String },
}

/// Device inventory loading errors.
#[derive(Error, Debug)]
pub enum InventoryError {
    /// Failed to read the inventory file
    #[error("Failed to read inventory {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Inventory file is not valid JSON of the expected shape
    #[error("Failed to parse inventory {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Result type alias using macseek's Error.
pub type Result<T> = std::result::Result<T, Error>;
