//! SSH command session.
//!
//! SSH already gives a structured "run command, collect output"
//! exchange, so this is a thin adapter over the transport. Any
//! transport failure is terminal for the device's attempt; the sweep
//! does not need finer granularity here.

use std::time::Duration;

use async_trait::async_trait;

use super::CommandSession;
use crate::error::Result;
use crate::inventory::Device;
use crate::transport::{AuthMethod, SshConfig, SshTransport};

/// Command session over an authenticated SSH connection.
pub struct SshSession {
    transport: SshTransport,
}

impl SshSession {
    /// Connect and authenticate to the device over SSH.
    pub async fn connect(device: &Device, timeout: Duration) -> Result<Self> {
        let config = SshConfig {
            host: device.host.clone(),
            port: 22,
            username: device.username.clone(),
            auth: AuthMethod::Password(device.password.clone()),
            timeout,
        };

        Ok(Self {
            transport: SshTransport::connect(config).await?,
        })
    }
}

#[async_trait]
impl CommandSession for SshSession {
    async fn execute(&mut self, command: &str) -> Result<String> {
        self.transport.exec(command).await
    }

    async fn close(self: Box<Self>) -> Result<()> {
        self.transport.close().await
    }
}
