//! Command sessions: one abstraction over SSH and Telnet.
//!
//! The sweep never cares which transport a device speaks. A
//! [`CommandSession`] is "send one command, get its full textual
//! output"; the [`Connector`] seam decides how to build one for a given
//! device, and lets tests drive the sweep with scripted sessions.

mod ssh;
mod telnet;

pub use ssh::SshSession;
pub use telnet::{PromptSet, SessionState, TelnetConfig, TelnetNegotiator, TelnetSession};

use std::time::Duration;

use async_trait::async_trait;

use crate::error::{Result, SessionError};
use crate::inventory::{AccessMethod, Device};

/// A transport-agnostic command/response session.
#[async_trait]
pub trait CommandSession: Send {
    /// Execute one command and return its textual output.
    ///
    /// The returned text is the command's output with the echoed
    /// command line removed, whichever transport produced it.
    async fn execute(&mut self, command: &str) -> Result<String>;

    /// Close the session, releasing the underlying connection.
    async fn close(self: Box<Self>) -> Result<()>;
}

/// Opens a [`CommandSession`] for a device.
#[async_trait]
pub trait Connector: Send + Sync {
    /// Connect and authenticate to the device.
    async fn connect(&self, device: &Device) -> Result<Box<dyn CommandSession>>;
}

/// The real connector: dispatches on the device's declared access method.
#[derive(Debug, Clone)]
pub struct NetworkConnector {
    /// Connect and per-command timeout for SSH and the Telnet TCP connect.
    pub timeout: Duration,

    /// Telnet negotiation tuning.
    pub telnet: TelnetConfig,
}

impl Default for NetworkConnector {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            telnet: TelnetConfig::default(),
        }
    }
}

#[async_trait]
impl Connector for NetworkConnector {
    async fn connect(&self, device: &Device) -> Result<Box<dyn CommandSession>> {
        match device.access {
            AccessMethod::Ssh => Ok(Box::new(SshSession::connect(device, self.timeout).await?)),
            AccessMethod::Telnet => Ok(Box::new(
                TelnetSession::connect(device, self.telnet.clone(), self.timeout).await?,
            )),
            AccessMethod::Unsupported => Err(SessionError::Protocol {
                message: format!("no supported access method for {}", device.display_name()),
            }
            .into()),
        }
    }
}
