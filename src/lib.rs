//! # Macseek
//!
//! Locate the switch and interface a host is connected to, by MAC
//! address, across a fleet of network devices reachable over SSH or
//! Telnet.
//!
//! Each device's forwarding table is queried with a filtered
//! `show mac address-table` lookup; the matching line names the VLAN
//! and port the address was last seen on. SSH devices get a structured
//! command/response exchange, Telnet devices a prompt-driven
//! interactive login — both behind the same [`CommandSession`]
//! abstraction, so the sweep never cares which transport it is talking
//! through.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use macseek::{MacAddress, NetworkConnector, load_inventory, search};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), macseek::Error> {
//!     let inventory = load_inventory("devices.json".as_ref())?;
//!     let target = MacAddress::parse("00:1a:2b:3c:4d:5e")?;
//!
//!     let result = search(&NetworkConnector::default(), &inventory, &target).await;
//!     if let Some(hit) = result.hit {
//!         println!(
//!             "Found in vlan {} on {}'s interface {}",
//!             hit.entry.vlan,
//!             hit.device.display_name(),
//!             hit.entry.port
//!         );
//!     }
//!     Ok(())
//! }
//! ```

pub mod channel;
pub mod error;
pub mod inventory;
pub mod mac;
pub mod search;
pub mod session;
pub mod table;
pub mod transport;

// Re-export main types for convenience
pub use error::Error;
pub use inventory::{AccessMethod, Device, load_inventory};
pub use mac::MacAddress;
pub use search::{AttemptOutcome, DeviceAttempt, SearchHit, SearchResult, lookup_command, search};
pub use session::{
    CommandSession, Connector, NetworkConnector, PromptSet, SshSession, TelnetConfig,
    TelnetNegotiator, TelnetSession,
};
pub use table::TableEntry;
pub use transport::{AuthMethod, SshConfig};
