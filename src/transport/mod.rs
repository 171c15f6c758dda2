//! Transport layer: SSH connections and raw Telnet byte streams.

pub mod config;
mod ssh;
mod telnet;

pub use config::{AuthMethod, SshConfig};
pub use ssh::SshTransport;
pub use telnet::{TcpTelnetStream, TelnetStream};
