//! Actor identity.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::AgoraError;

/// Identity of the actor performing an operation (owner or voter).
///
/// Authentication happens outside this workspace; a `Principal` is whatever
/// opaque, non-empty identity text the environment hands us.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Principal(String);

impl Principal {
    /// Longest identity text accepted at the boundary.
    pub const MAX_LEN: usize = 128;

    /// Validate and wrap a raw identity string.
    ///
    /// Rejects empty text, text longer than [`Principal::MAX_LEN`], and any
    /// whitespace or control characters.
    pub fn parse(raw: impl Into<String>) -> Result<Self, AgoraError> {
        let s = raw.into();
        if s.is_empty() || s.len() > Self::MAX_LEN {
            return Err(AgoraError::InvalidPrincipal(s));
        }
        if s.chars().any(|c| c.is_whitespace() || c.is_control()) {
            return Err(AgoraError::InvalidPrincipal(s));
        }
        Ok(Self(s))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Principal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Principal {
    type Err = AgoraError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Principal {
    type Error = AgoraError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(s)
    }
}

impl From<Principal> for String {
    fn from(p: Principal) -> Self {
        p.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_opaque_identities() {
        let p = Principal::parse("rrkah-fqaaa-aaaaa-aaaaq-cai").unwrap();
        assert_eq!(p.as_str(), "rrkah-fqaaa-aaaaa-aaaaq-cai");
        assert_eq!(p.to_string(), "rrkah-fqaaa-aaaaa-aaaaq-cai");
    }

    #[test]
    fn rejects_empty_and_whitespace() {
        assert!(Principal::parse("").is_err());
        assert!(Principal::parse("alice bob").is_err());
        assert!(Principal::parse("alice\n").is_err());
    }

    #[test]
    fn rejects_overlong() {
        let raw = "a".repeat(Principal::MAX_LEN + 1);
        assert!(Principal::parse(raw).is_err());
    }

    #[test]
    fn serde_validates_on_the_way_in() {
        let ok: Principal = serde_json::from_str("\"alice\"").unwrap();
        assert_eq!(ok.as_str(), "alice");
        assert!(serde_json::from_str::<Principal>("\"\"").is_err());
    }
}
