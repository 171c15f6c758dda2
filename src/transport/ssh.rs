//! SSH transport implementation using russh.
//!
//! One authenticated connection per device attempt; each command runs
//! on its own exec channel and the output is drained to EOF. The
//! negotiation internals belong to russh — this layer only maps them
//! onto the crate's transport errors and timeout budget.

use std::sync::Arc;

use log::{debug, trace};
use russh::ChannelMsg;
use russh::client::{self, Handle};
use secrecy::ExposeSecret;

use super::config::{AuthMethod, SshConfig};
use crate::error::{Result, TransportError};

/// SSH transport wrapping a russh client session.
pub struct SshTransport {
    /// The russh session handle.
    session: Handle<SshHandler>,

    /// Configuration used for this connection.
    config: SshConfig,
}

impl SshTransport {
    /// Connect to the SSH server and authenticate.
    pub async fn connect(config: SshConfig) -> Result<Self> {
        let ssh_config = Arc::new(client::Config {
            inactivity_timeout: Some(config.timeout),
            ..Default::default()
        });

        debug!("Connecting to {} via SSH", config.socket_addr());

        let mut session = tokio::time::timeout(
            config.timeout,
            client::connect(
                ssh_config,
                (config.host.as_str(), config.port),
                SshHandler,
            ),
        )
        .await
        .map_err(|_| TransportError::Timeout(config.timeout))?
        .map_err(TransportError::Ssh)?;

        Self::authenticate(&mut session, &config).await?;

        Ok(Self { session, config })
    }

    /// Authenticate with the server.
    async fn authenticate(session: &mut Handle<SshHandler>, config: &SshConfig) -> Result<()> {
        let success = match &config.auth {
            AuthMethod::None => session
                .authenticate_none(&config.username)
                .await
                .map_err(TransportError::Ssh)?
                .success(),
            AuthMethod::Password(password) => session
                .authenticate_password(&config.username, password.expose_secret())
                .await
                .map_err(TransportError::Ssh)?
                .success(),
        };

        if !success {
            return Err(TransportError::AuthenticationFailed {
                user: config.username.clone(),
            }
            .into());
        }

        Ok(())
    }

    /// Run one command on a fresh exec channel and capture its output.
    pub async fn exec(&self, command: &str) -> Result<String> {
        let mut channel = self
            .session
            .channel_open_session()
            .await
            .map_err(TransportError::Ssh)?;

        debug!("Executing command: {}", command);
        channel
            .exec(true, command)
            .await
            .map_err(TransportError::Ssh)?;

        let mut output = Vec::new();

        tokio::time::timeout(self.config.timeout, async {
            while let Some(msg) = channel.wait().await {
                match msg {
                    ChannelMsg::Data { ref data } => {
                        trace!("Read {} bytes", data.len());
                        output.extend_from_slice(data);
                    }
                    ChannelMsg::ExtendedData { ref data, ext: 1 } => {
                        trace!("Read {} stderr bytes", data.len());
                        output.extend_from_slice(data);
                    }
                    ChannelMsg::Eof | ChannelMsg::Close => break,
                    ChannelMsg::ExitStatus { exit_status } => {
                        debug!("Command exited with status {}", exit_status);
                    }
                    _ => {}
                }
            }
        })
        .await
        .map_err(|_| TransportError::Timeout(self.config.timeout))?;

        Ok(String::from_utf8_lossy(&output).into_owned())
    }

    /// Close the connection.
    pub async fn close(self) -> Result<()> {
        self.session
            .disconnect(russh::Disconnect::ByApplication, "", "en")
            .await
            .map_err(TransportError::Ssh)?;
        Ok(())
    }
}

/// SSH client handler for russh.
///
/// Host keys are accepted without verification: the sweep targets a
/// closed management network and the lookup is read-only.
struct SshHandler;

impl client::Handler for SshHandler {
    type Error = russh::Error;

    async fn check_server_key(
        &mut self,
        _server_public_key: &russh::keys::PublicKey,
    ) -> std::result::Result<bool, Self::Error> {
        Ok(true)
    }
}
