//! Component identifiers shared between the server tree and the client DOM.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Unique identifier for a component within one session.
///
/// The id doubles as the DOM `id` attribute of the component's outermost
/// element, which is how the browser runtime addresses components.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ComponentId(pub u64);

impl ComponentId {
    /// Get the raw numeric value.
    pub const fn raw(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for ComponentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ComponentId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(ComponentId)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_with_surrounding_whitespace() {
        assert_eq!(" 42 ".parse::<ComponentId>(), Ok(ComponentId(42)));
    }

    #[test]
    fn rejects_non_numeric() {
        assert!("x7".parse::<ComponentId>().is_err());
        assert!("".parse::<ComponentId>().is_err());
        assert!("-3".parse::<ComponentId>().is_err());
    }

    #[test]
    fn display_matches_dom_id() {
        assert_eq!(ComponentId(9).to_string(), "9");
    }
}
