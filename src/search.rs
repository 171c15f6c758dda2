//! Fleet sweep: find the device and port a MAC address is connected to.
//!
//! Devices are attempted strictly in inventory order, one fully opened,
//! queried, and closed before the next — the target can only live on
//! one segment, so the first validated match wins and ends the sweep.
//! Per-device failures are diagnostics, never fatal: a dead switch in
//! the middle of the list must not stop the search behind it.

use log::{debug, info, warn};

use crate::error::Result;
use crate::inventory::{AccessMethod, Device};
use crate::mac::MacAddress;
use crate::session::Connector;
use crate::table::TableEntry;

/// Build the vendor lookup command for a target address.
///
/// The `| in` filter leaves one matching table line, or none.
pub fn lookup_command(target: &MacAddress) -> String {
    format!("show mac address-table | in {}", target.dotted())
}

/// What happened on one device during the sweep.
#[derive(Debug, Clone)]
pub enum AttemptOutcome {
    /// The device returned a validated table line.
    Found(TableEntry),

    /// The device answered but no line matched.
    NoMatch,

    /// The device was not attempted.
    Skipped { reason: String },

    /// Connect, login, or command execution failed.
    Failed { error: String },
}

/// Per-device diagnostic record.
#[derive(Debug, Clone)]
pub struct DeviceAttempt {
    /// The device's display name.
    pub device: String,

    /// Outcome of the attempt.
    pub outcome: AttemptOutcome,
}

/// The winning device and entry of a sweep.
#[derive(Debug, Clone)]
pub struct SearchHit {
    /// Device the address was found on.
    pub device: Device,

    /// The decoded table entry.
    pub entry: TableEntry,

    /// The output block the entry was decoded from.
    pub raw_output: String,
}

/// Result of one full sweep.
#[derive(Debug)]
pub struct SearchResult {
    /// The first match, if any device produced one.
    pub hit: Option<SearchHit>,

    /// Every device attempted, in order, with its outcome.
    pub attempts: Vec<DeviceAttempt>,
}

impl SearchResult {
    /// Whether the sweep located the target.
    pub fn found(&self) -> bool {
        self.hit.is_some()
    }
}

/// Sweep the inventory for the device and port holding `target`.
///
/// Stops at the first device whose output validates and parses; devices
/// after it are never attempted.
pub async fn search(
    connector: &dyn Connector,
    inventory: &[Device],
    target: &MacAddress,
) -> SearchResult {
    let command = lookup_command(target);
    let mut attempts = Vec::with_capacity(inventory.len());

    for device in inventory {
        let name = device.display_name();
        info!("Checking on {} ...", name);

        if device.access == AccessMethod::Unsupported {
            warn!("{}: only SSH and Telnet are supported, check manually", name);
            attempts.push(DeviceAttempt {
                device: name,
                outcome: AttemptOutcome::Skipped {
                    reason: "only SSH and Telnet are supported".to_string(),
                },
            });
            continue;
        }

        match attempt_device(connector, device, &command).await {
            Ok(Some((entry, raw_output))) => {
                info!(
                    "Found {} in vlan {} on {}'s interface {}",
                    target, entry.vlan, name, entry.port
                );
                attempts.push(DeviceAttempt {
                    device: name,
                    outcome: AttemptOutcome::Found(entry.clone()),
                });
                return SearchResult {
                    hit: Some(SearchHit {
                        device: device.clone(),
                        entry,
                        raw_output,
                    }),
                    attempts,
                };
            }
            Ok(None) => {
                debug!("{}: no matching table line", name);
                attempts.push(DeviceAttempt {
                    device: name,
                    outcome: AttemptOutcome::NoMatch,
                });
            }
            Err(e) => {
                warn!("Failed to run command on {}: {}", name, e);
                attempts.push(DeviceAttempt {
                    device: name,
                    outcome: AttemptOutcome::Failed {
                        error: e.to_string(),
                    },
                });
            }
        }
    }

    SearchResult {
        hit: None,
        attempts,
    }
}

/// One device attempt: open, execute, close, scan for a table line.
async fn attempt_device(
    connector: &dyn Connector,
    device: &Device,
    command: &str,
) -> Result<Option<(TableEntry, String)>> {
    let mut session = connector.connect(device).await?;

    let output = match session.execute(command).await {
        Ok(output) => output,
        Err(e) => {
            // Best effort; the attempt already failed.
            let _ = session.close().await;
            return Err(e);
        }
    };

    if let Err(e) = session.close().await {
        debug!("Close failed for {}: {}", device.display_name(), e);
    }

    Ok(TableEntry::first_in(&output).map(|entry| (entry, output)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    use async_trait::async_trait;
    use secrecy::SecretString;

    use crate::error::{Error, TransportError};
    use crate::session::CommandSession;

    const MATCH_LINE: &str = "   10   001a.2b3c.4d5e   DYNAMIC   Gi1/0/5";

    #[derive(Clone)]
    enum Script {
        Output(&'static str),
        ConnectFail,
        ExecFail,
    }

    struct ScriptedSession {
        output: &'static str,
        fail: bool,
    }

    #[async_trait]
    impl CommandSession for ScriptedSession {
        async fn execute(&mut self, _command: &str) -> Result<String> {
            if self.fail {
                Err(TransportError::Disconnected.into())
            } else {
                Ok(self.output.to_string())
            }
        }

        async fn close(self: Box<Self>) -> Result<()> {
            Ok(())
        }
    }

    struct ScriptedConnector {
        scripts: HashMap<String, Script>,
        connected: Mutex<Vec<String>>,
    }

    impl ScriptedConnector {
        fn new(scripts: Vec<(&str, Script)>) -> Self {
            Self {
                scripts: scripts
                    .into_iter()
                    .map(|(name, script)| (name.to_string(), script))
                    .collect(),
                connected: Mutex::new(Vec::new()),
            }
        }

        fn connected(&self) -> Vec<String> {
            self.connected.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Connector for ScriptedConnector {
        async fn connect(&self, device: &Device) -> Result<Box<dyn CommandSession>> {
            self.connected.lock().unwrap().push(device.name.clone());
            match self.scripts.get(&device.name).expect("unscripted device").clone() {
                Script::Output(output) => Ok(Box::new(ScriptedSession {
                    output,
                    fail: false,
                })),
                Script::ConnectFail => Err(Error::Transport(TransportError::AuthenticationFailed {
                    user: device.username.clone(),
                })),
                Script::ExecFail => Ok(Box::new(ScriptedSession { output: "", fail: true })),
            }
        }
    }

    fn device(name: &str, access: AccessMethod) -> Device {
        Device {
            name: name.to_string(),
            host: "10.0.0.1".to_string(),
            port: Some(23),
            access,
            username: "admin".to_string(),
            password: SecretString::from("pw".to_string()),
        }
    }

    fn target() -> MacAddress {
        MacAddress::parse("00:1a:2b:3c:4d:5e").unwrap()
    }

    #[test]
    fn test_lookup_command_embeds_dotted_form() {
        assert_eq!(
            lookup_command(&target()),
            "show mac address-table | in 001a.2b3c.4d5e"
        );
    }

    #[tokio::test]
    async fn test_first_match_wins_and_stops_the_sweep() {
        let inventory = vec![
            device("sw1", AccessMethod::Ssh),
            device("sw2", AccessMethod::Telnet),
            device("sw3", AccessMethod::Ssh),
        ];
        let connector = ScriptedConnector::new(vec![
            ("sw1", Script::Output("sw1#\n")),
            ("sw2", Script::Output(MATCH_LINE)),
            ("sw3", Script::Output(MATCH_LINE)),
        ]);

        let result = search(&connector, &inventory, &target()).await;

        assert!(result.found());
        let hit = result.hit.unwrap();
        assert_eq!(hit.device.name, "sw2");
        assert_eq!(hit.entry.vlan, "10");
        assert_eq!(hit.entry.port, "Gi1/0/5");

        // sw3 was never touched.
        assert_eq!(connector.connected(), vec!["sw1", "sw2"]);
        assert_eq!(result.attempts.len(), 2);
        assert!(matches!(result.attempts[0].outcome, AttemptOutcome::NoMatch));
        assert!(matches!(result.attempts[1].outcome, AttemptOutcome::Found(_)));
    }

    #[tokio::test]
    async fn test_failures_do_not_abort_the_sweep() {
        let inventory = vec![
            device("sw1", AccessMethod::Ssh),
            device("sw2", AccessMethod::Ssh),
            device("sw3", AccessMethod::Telnet),
        ];
        let connector = ScriptedConnector::new(vec![
            ("sw1", Script::ConnectFail),
            ("sw2", Script::Output("sw2#\n")),
            ("sw3", Script::ExecFail),
        ]);

        let result = search(&connector, &inventory, &target()).await;

        assert!(!result.found());
        assert_eq!(connector.connected(), vec!["sw1", "sw2", "sw3"]);
        assert_eq!(result.attempts.len(), 3);
        assert!(matches!(
            result.attempts[0].outcome,
            AttemptOutcome::Failed { .. }
        ));
        assert!(matches!(result.attempts[1].outcome, AttemptOutcome::NoMatch));
        assert!(matches!(
            result.attempts[2].outcome,
            AttemptOutcome::Failed { .. }
        ));
    }

    #[tokio::test]
    async fn test_failure_diagnostics_carry_the_cause() {
        let inventory = vec![device("sw1", AccessMethod::Ssh)];
        let connector = ScriptedConnector::new(vec![("sw1", Script::ConnectFail)]);

        let result = search(&connector, &inventory, &target()).await;

        match &result.attempts[0].outcome {
            AttemptOutcome::Failed { error } => {
                assert!(error.contains("Authentication failed"), "got: {error}");
            }
            other => panic!("expected Failed, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_unsupported_access_is_skipped_without_connecting() {
        let inventory = vec![
            device("sw1", AccessMethod::Unsupported),
            device("sw2", AccessMethod::Ssh),
        ];
        let connector = ScriptedConnector::new(vec![("sw2", Script::Output(MATCH_LINE))]);

        let result = search(&connector, &inventory, &target()).await;

        assert!(result.found());
        assert_eq!(connector.connected(), vec!["sw2"]);
        assert!(matches!(
            result.attempts[0].outcome,
            AttemptOutcome::Skipped { .. }
        ));
    }

    #[tokio::test]
    async fn test_match_inside_multi_line_telnet_capture() {
        let output = "   10   001a.2b3c.4d5e   DYNAMIC   Gi1/0/5\nsw1#";
        let inventory = vec![device("sw1", AccessMethod::Telnet)];
        let connector = ScriptedConnector::new(vec![("sw1", Script::Output(output))]);

        let result = search(&connector, &inventory, &target()).await;

        assert!(result.found());
        assert_eq!(result.hit.unwrap().entry.port, "Gi1/0/5");
    }
}
