//! Raw Telnet byte stream over TCP.
//!
//! Telnet offers no framing: the negotiator above this layer only needs
//! "read whatever is available right now" and "write bytes". In-band
//! IAC option negotiation is filtered out of the read path without
//! replying — the target devices run fine with an entirely passive
//! peer, and the prompt substrings must never be split by negotiation
//! bytes.

use std::io;
use std::time::Duration;

use async_trait::async_trait;
use log::{debug, trace};
use tokio::io::AsyncWriteExt;
use tokio::net::TcpStream;

use crate::error::{Result, TransportError};

const IAC: u8 = 255;
const SB: u8 = 250;
const SE: u8 = 240;
const WILL: u8 = 251;
const DONT: u8 = 254;

/// Byte-oriented duplex stream primitive the Telnet negotiator runs on.
///
/// `read_available` must never block waiting for data: an empty return
/// means the device sent nothing since the last poll, which is exactly
/// the signal the negotiator's stall budget counts.
#[async_trait]
pub trait TelnetStream: Send {
    /// Read all bytes currently available, possibly none.
    async fn read_available(&mut self) -> Result<Vec<u8>>;

    /// Write bytes to the device.
    async fn write_all(&mut self, data: &[u8]) -> Result<()>;
}

/// Telnet stream over a tokio TCP connection.
pub struct TcpTelnetStream {
    stream: TcpStream,

    /// Trailing bytes of an IAC sequence cut off by a read boundary.
    iac_carry: Vec<u8>,
}

impl TcpTelnetStream {
    /// Connect to the device with an explicit connect timeout.
    pub async fn connect(host: &str, port: u16, timeout: Duration) -> Result<Self> {
        debug!("Connecting to {}:{} via Telnet", host, port);

        let stream = tokio::time::timeout(timeout, TcpStream::connect((host, port)))
            .await
            .map_err(|_| TransportError::Timeout(timeout))?
            .map_err(|source| TransportError::ConnectionFailed {
                host: host.to_string(),
                port,
                source,
            })?;

        Ok(Self {
            stream,
            iac_carry: Vec::new(),
        })
    }
}

#[async_trait]
impl TelnetStream for TcpTelnetStream {
    async fn read_available(&mut self) -> Result<Vec<u8>> {
        let mut raw = Vec::new();
        let mut chunk = [0u8; 4096];
        let mut closed = false;

        loop {
            match self.stream.try_read(&mut chunk) {
                Ok(0) => {
                    closed = true;
                    break;
                }
                Ok(n) => raw.extend_from_slice(&chunk[..n]),
                Err(ref e) if e.kind() == io::ErrorKind::WouldBlock => break,
                Err(e) => return Err(TransportError::Io(e).into()),
            }
        }

        if closed && raw.is_empty() && self.iac_carry.is_empty() {
            return Err(TransportError::Disconnected.into());
        }

        let cleaned = strip_iac(&mut self.iac_carry, &raw);
        trace!("Read {} bytes ({} after IAC filtering)", raw.len(), cleaned.len());
        Ok(cleaned)
    }

    async fn write_all(&mut self, data: &[u8]) -> Result<()> {
        self.stream
            .write_all(data)
            .await
            .map_err(TransportError::Io)?;
        self.stream.flush().await.map_err(TransportError::Io)?;
        Ok(())
    }
}

/// Remove IAC command sequences from raw Telnet bytes.
///
/// `carry` holds the tail of a sequence split across reads; it is
/// consumed on entry and refilled if this read ends mid-sequence.
/// Escaped 0xFF data bytes (IAC IAC) are preserved as a single 0xFF.
fn strip_iac(carry: &mut Vec<u8>, raw: &[u8]) -> Vec<u8> {
    let mut data = std::mem::take(carry);
    data.extend_from_slice(raw);

    let mut out = Vec::with_capacity(data.len());
    let mut i = 0;
    while i < data.len() {
        if data[i] != IAC {
            out.push(data[i]);
            i += 1;
            continue;
        }

        let Some(&cmd) = data.get(i + 1) else {
            *carry = data[i..].to_vec();
            break;
        };

        match cmd {
            IAC => {
                out.push(IAC);
                i += 2;
            }
            WILL..=DONT => {
                // Three-byte option negotiation; dropped, never answered.
                if data.get(i + 2).is_none() {
                    *carry = data[i..].to_vec();
                    break;
                }
                i += 3;
            }
            SB => {
                // Subnegotiation runs until IAC SE.
                match find_subnegotiation_end(&data[i..]) {
                    Some(len) => i += len,
                    None => {
                        *carry = data[i..].to_vec();
                        break;
                    }
                }
            }
            _ => i += 2,
        }
    }

    out
}

fn find_subnegotiation_end(data: &[u8]) -> Option<usize> {
    let mut i = 2;
    while i + 1 < data.len() {
        if data[i] == IAC && data[i + 1] == SE {
            return Some(i + 2);
        }
        i += 1;
    }
    None
}
