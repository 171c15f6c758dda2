//! Forwarding-table line validation and decoding.
//!
//! A filtered `show mac address-table` lookup yields at most one line of
//! interest, but devices pad the capture with the command echo, blank
//! lines, and the trailing prompt. Lines are therefore validated against
//! the exact table shape before anything is decoded from them.

use std::sync::OnceLock;

use regex::Regex;

/// Anchored shape of one MAC table line: VLAN, dotted MAC, entry type, port.
fn table_line_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^ *\d{1,4} +([0-9a-fA-F]{4}\.){2}[0-9a-fA-F]{4} +[a-zA-Z]+ +[0-9a-zA-Z/]+ *$")
            .expect("table line pattern is valid")
    })
}

/// One decoded forwarding-table entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableEntry {
    /// VLAN the address was learned on.
    pub vlan: String,

    /// The address in the device's dotted form.
    pub mac: String,

    /// Entry type as reported by the device (e.g. `DYNAMIC`, `STATIC`).
    pub entry_type: String,

    /// Interface the address was last seen on.
    pub port: String,
}

impl TableEntry {
    /// Check whether a line has exactly the documented table shape.
    pub fn is_table_line(line: &str) -> bool {
        table_line_pattern().is_match(line)
    }

    /// Decode a single line, or `None` if it is not a table line.
    ///
    /// Validate-then-split: the four whitespace-separated tokens are
    /// assigned positionally once the shape check has passed.
    pub fn parse_line(line: &str) -> Option<Self> {
        if !Self::is_table_line(line) {
            return None;
        }

        let mut tokens = line.split_whitespace();
        Some(Self {
            vlan: tokens.next()?.to_string(),
            mac: tokens.next()?.to_string(),
            entry_type: tokens.next()?.to_string(),
            port: tokens.next()?.to_string(),
        })
    }

    /// Scan a captured output block for the first valid table line.
    pub fn first_in(output: &str) -> Option<Self> {
        output.lines().find_map(Self::parse_line)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LINE: &str = "   10   001a.2b3c.4d5e   DYNAMIC   Gi1/0/5";

    #[test]
    fn test_valid_line_parses() {
        let entry = TableEntry::parse_line(LINE).unwrap();
        assert_eq!(entry.vlan, "10");
        assert_eq!(entry.mac, "001a.2b3c.4d5e");
        assert_eq!(entry.entry_type, "DYNAMIC");
        assert_eq!(entry.port, "Gi1/0/5");
    }

    #[test]
    fn test_valid_line_without_leading_spaces() {
        assert!(TableEntry::is_table_line("1 aabb.ccdd.ee0f STATIC Po1"));
    }

    #[test]
    fn test_rejects_extra_trailing_token() {
        assert!(!TableEntry::is_table_line(
            "   10   001a.2b3c.4d5e   DYNAMIC   Gi1/0/5   extra"
        ));
    }

    #[test]
    fn test_rejects_five_digit_vlan() {
        assert!(!TableEntry::is_table_line(
            "   12345   001a.2b3c.4d5e   DYNAMIC   Gi1/0/5"
        ));
    }

    #[test]
    fn test_rejects_short_and_long_mac_groups() {
        assert!(!TableEntry::is_table_line("   10   01a.2b3c.4d5e   DYNAMIC   Gi1/0/5"));
        assert!(!TableEntry::is_table_line("   10   001aa.2b3c.4d5e   DYNAMIC   Gi1/0/5"));
    }

    #[test]
    fn test_rejects_punctuated_port_token() {
        assert!(!TableEntry::is_table_line(
            "   10   001a.2b3c.4d5e   DYNAMIC   Gi1:0.5"
        ));
    }

    #[test]
    fn test_rejects_command_echo_and_prompt_lines() {
        assert!(!TableEntry::is_table_line(
            "show mac address-table | in 001a.2b3c.4d5e"
        ));
        assert!(!TableEntry::is_table_line("core-sw1#"));
        assert!(!TableEntry::is_table_line(""));
    }

    #[test]
    fn test_parse_invalid_line_is_none() {
        assert!(TableEntry::parse_line("garbage").is_none());
    }

    #[test]
    fn test_first_in_skips_echo_and_prompt() {
        let output = "show mac address-table | in 001a.2b3c.4d5e\n   10   001a.2b3c.4d5e   DYNAMIC   Gi1/0/5\ncore-sw1#";
        let entry = TableEntry::first_in(output).unwrap();
        assert_eq!(entry.port, "Gi1/0/5");
    }

    #[test]
    fn test_first_in_no_match() {
        assert!(TableEntry::first_in("core-sw1#\n\n").is_none());
    }
}
