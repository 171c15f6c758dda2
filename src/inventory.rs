//! Device inventory records.
//!
//! The inventory is an ordered JSON array of device records; order
//! matters, the sweep visits devices in inventory order and stops at
//! the first match. Records are immutable once loaded.

use std::path::Path;

use secrecy::SecretString;
use serde::{Deserialize, Deserializer};

use crate::error::InventoryError;

/// How a device is reachable for command execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessMethod {
    /// Structured command/response over SSH.
    Ssh,

    /// Raw interactive terminal over Telnet.
    Telnet,

    /// Anything else declared in the inventory; skipped with a notice.
    Unsupported,
}

impl<'de> Deserialize<'de> for AccessMethod {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        // The access column is matched case-insensitively; unknown
        // values are carried as Unsupported rather than rejected, so a
        // single odd row cannot block the rest of the sweep.
        let raw = String::deserialize(deserializer)?;
        Ok(match raw.to_lowercase().as_str() {
            "ssh" => AccessMethod::Ssh,
            "telnet" => AccessMethod::Telnet,
            _ => AccessMethod::Unsupported,
        })
    }
}

/// One device record from the inventory.
#[derive(Debug, Clone, Deserialize)]
pub struct Device {
    /// Device name, as configured on the device itself. Used both as
    /// identity and as the Telnet command-prompt substring.
    pub name: String,

    /// Hostname or IP address.
    pub host: String,

    /// Telnet port. Ignored for SSH devices (which use 22).
    #[serde(default)]
    pub port: Option<u16>,

    /// Declared access method.
    pub access: AccessMethod,

    /// Login username.
    pub username: String,

    /// Login password. Redacted from Debug output.
    pub password: SecretString,
}

impl Device {
    /// Display name used in reports: `{name}_{host}`.
    pub fn display_name(&self) -> String {
        format!("{}_{}", self.name, self.host)
    }
}

/// Load an ordered device inventory from a JSON file.
pub fn load_inventory(path: &Path) -> Result<Vec<Device>, InventoryError> {
    let raw = std::fs::read_to_string(path).map_err(|source| InventoryError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    serde_json::from_str(&raw).map_err(|source| InventoryError::Parse {
        path: path.to_path_buf(),
        source,
    })
}
