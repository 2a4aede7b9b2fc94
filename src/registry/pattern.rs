//! Route pattern compilation.
//!
//! `:name` segments become named `[^/]+` captures, everything else is
//! matched literally. Patterns are anchored and tolerate a single trailing
//! slash. Compilation happens at generation time — a malformed path is a
//! generation error, never a lookup-time surprise. What gets persisted is
//! the regex source; the matcher is rebuilt from it on load.

use std::fmt;

use regex::Regex;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::RegistryError;

/// A compiled route path matcher.
#[derive(Debug, Clone)]
pub struct RoutePattern {
    source: String,
    regex: Regex,
}

impl RoutePattern {
    /// Compile a route path such as `/api/hello/:name`.
    pub fn compile(path: &str) -> Result<Self, RegistryError> {
        let source = pattern_source(path)?;
        Self::from_source(&source).map_err(|reason| RegistryError::InvalidPattern {
            path: path.to_string(),
            reason,
        })
    }

    /// Rebuild a pattern from a previously persisted regex source.
    pub fn from_source(source: &str) -> Result<Self, String> {
        let regex = Regex::new(source).map_err(|e| e.to_string())?;
        Ok(Self {
            source: source.to_string(),
            regex,
        })
    }

    pub fn matches(&self, path: &str) -> bool {
        self.regex.is_match(path)
    }

    pub fn source(&self) -> &str {
        &self.source
    }
}

impl PartialEq for RoutePattern {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source
    }
}

impl fmt::Display for RoutePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

impl Serialize for RoutePattern {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.source)
    }
}

impl<'de> Deserialize<'de> for RoutePattern {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let source = String::deserialize(deserializer)?;
        Self::from_source(&source)
            .map_err(|reason| D::Error::custom(format!("invalid route pattern source: {reason}")))
    }
}

fn pattern_source(path: &str) -> Result<String, RegistryError> {
    let mut out = String::from("^");
    let mut chars = path.chars().peekable();

    while let Some(c) = chars.next() {
        if c == ':' {
            let mut name = String::new();
            while let Some(&next) = chars.peek() {
                if next.is_ascii_alphanumeric() || next == '_' {
                    name.push(next);
                    chars.next();
                } else {
                    break;
                }
            }
            if name.is_empty() {
                return Err(RegistryError::InvalidPattern {
                    path: path.to_string(),
                    reason: "missing parameter name after ':'".to_string(),
                });
            }
            out.push_str("(?P<");
            out.push_str(&name);
            out.push_str(">[^/]+)");
        } else {
            let mut buf = [0u8; 4];
            out.push_str(&regex::escape(c.encode_utf8(&mut buf)));
        }
    }

    out.push_str("/?$");
    Ok(out)
}
