//! Telnet command session driven by a prompt-detection state machine.
//!
//! Raw Telnet offers no framing and no prompt signaling. The negotiator
//! repeatedly reads whatever bytes are available at a short poll
//! interval, accumulates them, and watches for literal trigger
//! substrings: the platform's login words ("User", "Password") and the
//! device's own name followed by the prompt suffix. Five consecutive
//! polls with no new bytes in any awaiting state is the terminal
//! failure signal — unreachable device, wrong credentials, or a hung
//! session all look the same from here, and none may hang the sweep.
//!
//! The trigger matching is deliberately best-effort: there is no
//! guarantee of negotiation completion order and the device name is
//! used as an unescaped substring. It matches the documented behavior
//! of the target devices and must not be silently strengthened.

use std::time::Duration;

use async_trait::async_trait;
use log::{debug, trace};
use secrecy::{ExposeSecret, SecretString};
use tokio::time::sleep;

use super::CommandSession;
use crate::channel::PromptBuffer;
use crate::error::{Result, SessionError};
use crate::inventory::Device;
use crate::transport::{TcpTelnetStream, TelnetStream};

const DEFAULT_TELNET_PORT: u16 = 23;

/// Where the negotiator is in the login/command exchange.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Init,
    AwaitLoginPrompt,
    AwaitPasswordPrompt,
    AwaitCommandPrompt,
    CommandSent,
    CollectingOutput,
    Done,
    Failed,
}

/// Trigger substrings for one device family's login sequence.
///
/// The command prompt is `{device name}{suffix}`. These are literal
/// words, not patterns; different device families substitute their own.
#[derive(Debug, Clone)]
pub struct PromptSet {
    /// Substring announcing the login prompt.
    pub login: String,

    /// Substring announcing the password prompt.
    pub password: String,

    /// Suffix appended to the device name to form the command prompt.
    pub command_suffix: String,
}

impl Default for PromptSet {
    fn default() -> Self {
        Self {
            login: "User".to_string(),
            password: "Password".to_string(),
            command_suffix: "#".to_string(),
        }
    }
}

impl PromptSet {
    /// The full command-prompt substring for a device.
    pub fn command_prompt(&self, device_name: &str) -> String {
        format!("{}{}", device_name, self.command_suffix)
    }
}

/// Tuning for the Telnet negotiation loop.
#[derive(Debug, Clone)]
pub struct TelnetConfig {
    /// Pause between polls of the stream.
    pub poll_interval: Duration,

    /// Consecutive empty polls tolerated before giving up.
    pub poll_budget: u32,

    /// Fixed delay after command submission before draining output.
    pub settle_delay: Duration,

    /// Tail window searched for prompt substrings.
    pub search_depth: usize,

    /// Trigger substrings for the login sequence.
    pub prompts: PromptSet,
}

impl Default for TelnetConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(2),
            poll_budget: 5,
            settle_delay: Duration::from_secs(10),
            search_depth: 1000,
            prompts: PromptSet::default(),
        }
    }
}

/// Drives a raw byte stream through login, command submission, and
/// output collection.
///
/// One negotiator drives exactly one device attempt; its state is
/// discarded with it, success or not.
pub struct TelnetNegotiator<S> {
    stream: S,
    config: TelnetConfig,
    state: SessionState,
    buffer: PromptBuffer,
    command_prompt: String,
    username: String,
    password: SecretString,
}

impl<S: TelnetStream> TelnetNegotiator<S> {
    /// Create a negotiator over an already-connected stream.
    pub fn new(
        stream: S,
        device_name: &str,
        username: &str,
        password: SecretString,
        config: TelnetConfig,
    ) -> Self {
        Self {
            buffer: PromptBuffer::new(config.search_depth),
            command_prompt: config.prompts.command_prompt(device_name),
            config,
            stream,
            state: SessionState::Init,
            username: username.to_string(),
            password,
        }
    }

    /// Current state, for diagnostics and tests.
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Log in, submit the command, and collect its output.
    ///
    /// Returns the captured block with the echoed command line removed.
    /// A negotiator drives one command; a second call is a protocol
    /// error.
    pub async fn execute(&mut self, command: &str) -> Result<String> {
        if self.state != SessionState::Init {
            return Err(SessionError::Protocol {
                message: format!("session already driven to {:?}", self.state),
            }
            .into());
        }

        self.state = SessionState::AwaitLoginPrompt;
        let login = self.config.prompts.login.clone();
        self.wait_for(&login, "login prompt").await?;
        let username = self.username.clone();
        self.send_line(&username).await?;

        self.state = SessionState::AwaitPasswordPrompt;
        let password_prompt = self.config.prompts.password.clone();
        self.wait_for(&password_prompt, "password prompt").await?;
        let password = self.password.expose_secret().to_string();
        self.send_line(&password).await?;

        self.state = SessionState::AwaitCommandPrompt;
        let command_prompt = self.command_prompt.clone();
        self.wait_for(&command_prompt, "command prompt").await?;
        self.send_line(command).await?;
        self.state = SessionState::CommandSent;

        // No prompt marks the end of output; wait a fixed settle delay,
        // then take everything the device has produced.
        sleep(self.config.settle_delay).await;
        self.state = SessionState::CollectingOutput;
        self.drain().await?;

        let captured = self.buffer.take_string();
        self.state = SessionState::Done;
        debug!("Captured {} bytes of command output", captured.len());

        // First line of the capture is the command echo.
        let mut lines = captured.lines();
        lines.next();
        Ok(lines.collect::<Vec<_>>().join("\n"))
    }

    /// Poll until the accumulated buffer contains `needle`.
    ///
    /// Any data resets the stall counter; `poll_budget` consecutive
    /// empty reads fails the session.
    async fn wait_for(&mut self, needle: &str, waiting_for: &'static str) -> Result<()> {
        let mut stalled = 0u32;
        loop {
            sleep(self.config.poll_interval).await;

            let data = self.stream.read_available().await?;
            if data.is_empty() {
                stalled += 1;
                trace!("No new bytes waiting for {} ({}/{})", waiting_for, stalled, self.config.poll_budget);
                if stalled >= self.config.poll_budget {
                    self.state = SessionState::Failed;
                    return Err(SessionError::Timeout {
                        waiting_for,
                        polls: stalled,
                    }
                    .into());
                }
                continue;
            }

            stalled = 0;
            self.buffer.push(&data);
            if self.buffer.contains(needle) {
                trace!("Matched {}", waiting_for);
                return Ok(());
            }
        }
    }

    /// Clear the buffer and send a newline-terminated line.
    ///
    /// Clearing first keeps bytes that matched the previous trigger
    /// from re-triggering the next one.
    async fn send_line(&mut self, line: &str) -> Result<()> {
        self.buffer.clear();
        let mut data = line.as_bytes().to_vec();
        data.push(b'\n');
        self.stream.write_all(&data).await
    }

    /// Read everything currently available into the buffer.
    async fn drain(&mut self) -> Result<()> {
        loop {
            let data = self.stream.read_available().await?;
            if data.is_empty() {
                return Ok(());
            }
            self.buffer.push(&data);
        }
    }
}

/// Command session over a negotiated Telnet login.
pub struct TelnetSession {
    negotiator: TelnetNegotiator<TcpTelnetStream>,
}

impl TelnetSession {
    /// Connect to the device and prepare a negotiator.
    ///
    /// Login itself is deferred to `execute`, which drives the whole
    /// exchange; a connect here only establishes the TCP stream.
    pub async fn connect(
        device: &Device,
        config: TelnetConfig,
        connect_timeout: Duration,
    ) -> Result<Self> {
        let port = device.port.unwrap_or(DEFAULT_TELNET_PORT);
        let stream = TcpTelnetStream::connect(&device.host, port, connect_timeout).await?;

        Ok(Self {
            negotiator: TelnetNegotiator::new(
                stream,
                &device.name,
                &device.username,
                device.password.clone(),
                config,
            ),
        })
    }
}

#[async_trait]
impl CommandSession for TelnetSession {
    async fn execute(&mut self, command: &str) -> Result<String> {
        self.negotiator.execute(command).await
    }

    async fn close(self: Box<Self>) -> Result<()> {
        // Dropping the TCP stream closes the connection; the device
        // reaps the half-open session on its own idle timer.
        Ok(())
    }
}
