//! Hardware address value type.
//!
//! The canonical representation is the colon-delimited lowercase form
//! (`00:1a:2b:3c:4d:5e`). Catalyst-style CLIs render and filter the MAC
//! table in a dotted three-group form (`001a.2b3c.4d5e`), so a dotted
//! projection is derived on demand for command construction.

use std::fmt;
use std::str::FromStr;

use crate::error::MacParseError;

/// A validated six-octet hardware address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MacAddress {
    octets: [u8; 6],
}

impl MacAddress {
    /// Parse a colon-delimited MAC address.
    ///
    /// Accepts exactly six colon-separated 2-digit hex groups, case
    /// insensitive. Whitespace around the whole string is tolerated,
    /// none inside.
    pub fn parse(input: &str) -> Result<Self, MacParseError> {
        let trimmed = input.trim();

        let invalid = || MacParseError::InvalidFormat {
            input: input.to_string(),
        };

        let mut octets = [0u8; 6];
        let mut count = 0;
        for group in trimmed.split(':') {
            if count == 6 || group.len() != 2 || !group.bytes().all(|b| b.is_ascii_hexdigit()) {
                return Err(invalid());
            }
            octets[count] = u8::from_str_radix(group, 16).map_err(|_| invalid())?;
            count += 1;
        }
        if count != 6 {
            return Err(invalid());
        }

        Ok(Self { octets })
    }

    /// The raw octets, in address order.
    pub fn octets(&self) -> [u8; 6] {
        self.octets
    }

    /// The dotted vendor form: three 4-hex-digit groups joined by dots.
    ///
    /// Octets are concatenated two at a time preserving address order,
    /// e.g. `00:1a:2b:3c:4d:5e` becomes `001a.2b3c.4d5e`. This grouping
    /// is a fixed contract of the target CLI family.
    pub fn dotted(&self) -> String {
        let o = &self.octets;
        format!(
            "{:02x}{:02x}.{:02x}{:02x}.{:02x}{:02x}",
            o[0], o[1], o[2], o[3], o[4], o[5]
        )
    }
}

impl FromStr for MacAddress {
    type Err = MacParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for MacAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let o = &self.octets;
        write!(
            f,
            "{:02x}:{:02x}:{:02x}:{:02x}:{:02x}:{:02x}",
            o[0], o[1], o[2], o[3], o[4], o[5]
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_and_dotted() {
        let mac = MacAddress::parse("00:1a:2b:3c:4d:5e").unwrap();
        assert_eq!(mac.dotted(), "001a.2b3c.4d5e");
        assert_eq!(mac.to_string(), "00:1a:2b:3c:4d:5e");
    }

    #[test]
    fn test_parse_mixed_case_normalizes() {
        let mac = MacAddress::parse("AA:bB:Cc:DD:ee:0F").unwrap();
        assert_eq!(mac.to_string(), "aa:bb:cc:dd:ee:0f");
        assert_eq!(mac.dotted(), "aabb.ccdd.ee0f");
    }

    #[test]
    fn test_parse_tolerates_surrounding_whitespace() {
        let mac = MacAddress::parse("  00:1a:2b:3c:4d:5e \n").unwrap();
        assert_eq!(mac.dotted(), "001a.2b3c.4d5e");
    }

    #[test]
    fn test_parse_rejects_five_groups() {
        assert!(MacAddress::parse("00:1a:2b:3c:4d").is_err());
    }

    #[test]
    fn test_parse_rejects_seven_groups() {
        assert!(MacAddress::parse("00:1a:2b:3c:4d:5e:6f").is_err());
    }

    #[test]
    fn test_parse_rejects_non_hex() {
        assert!(MacAddress::parse("00:1a:2b:3c:4d:5g").is_err());
        assert!(MacAddress::parse("zz:1a:2b:3c:4d:5e").is_err());
    }

    #[test]
    fn test_parse_rejects_missing_separators() {
        assert!(MacAddress::parse("001a2b3c4d5e").is_err());
        assert!(MacAddress::parse("00-1a-2b-3c-4d-5e").is_err());
    }

    #[test]
    fn test_parse_rejects_wrong_group_width() {
        assert!(MacAddress::parse("0:1a:2b:3c:4d:5e").is_err());
        assert!(MacAddress::parse("000:1a:2b:3c:4d:5e").is_err());
    }

    #[test]
    fn test_parse_rejects_inner_whitespace() {
        assert!(MacAddress::parse("00 :1a:2b:3c:4d:5e").is_err());
    }

    #[test]
    fn test_parse_error_is_invalid_format() {
        let err = MacAddress::parse("nonsense").unwrap_err();
        assert_eq!(
            err,
            MacParseError::InvalidFormat {
                input: "nonsense".to_string()
            }
        );
    }
}
