//! Semantic versions and the range expressions used to gate validators,
//! enhancers and generators, built on the `semver` crate.
//!
//! Versions have one to three numeric segments; missing segments are zero.
//! Ranges are whitespace-separated comparators (all must hold), optionally
//! joined by `||` (any alternative may hold). A comparator is `*`, an exact
//! version, a wildcard such as `2.x` or `2.1.x`, or one of `>=`, `<=`, `>`,
//! `<`, `=` followed by a version. Each alternative becomes one
//! [`semver::VersionReq`]; short versions are padded first, so `>3` means
//! above `3.0.0` and a bare `3.1` means exactly `3.1.0`.

use derive_more::Display;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::{fmt, str::FromStr};
use thiserror::Error as ThisError;

///
/// VersionError
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum VersionError {
    #[error("invalid version '{0}'")]
    InvalidVersion(String),

    #[error("invalid version range '{range}': {reason}")]
    InvalidRange { range: String, reason: String },
}

///
/// SemVer
///
/// A release version. Pre-release and build metadata are not accepted.
///

#[derive(Clone, Copy, Debug, Default, Display, Eq, Hash, Ord, PartialEq, PartialOrd)]
#[display("{major}.{minor}.{patch}")]
pub struct SemVer {
    pub major: u64,
    pub minor: u64,
    pub patch: u64,
}

impl SemVer {
    #[must_use]
    pub const fn new(major: u64, minor: u64, patch: u64) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }

    pub fn parse(text: &str) -> Result<Self, VersionError> {
        let invalid = || VersionError::InvalidVersion(text.to_string());

        let trimmed = text.trim();
        let body = trimmed.strip_prefix(['v', 'V']).unwrap_or(trimmed);
        let padded = match body.matches('.').count() {
            0 => format!("{body}.0.0"),
            1 => format!("{body}.0"),
            _ => body.to_string(),
        };

        let version = semver::Version::parse(&padded).map_err(|_| invalid())?;
        if !version.pre.is_empty() || !version.build.is_empty() {
            return Err(invalid());
        }

        Ok(Self::new(version.major, version.minor, version.patch))
    }
}

impl From<SemVer> for semver::Version {
    fn from(v: SemVer) -> Self {
        Self::new(v.major, v.minor, v.patch)
    }
}

impl FromStr for SemVer {
    type Err = VersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for SemVer {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for SemVer {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;

        Self::parse(&text).map_err(serde::de::Error::custom)
    }
}

///
/// VersionReq
///
/// A parsed range expression: any alternative may hold.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct VersionReq {
    text: String,
    alternatives: Vec<semver::VersionReq>,
}

impl VersionReq {
    /// The range that matches every version.
    #[must_use]
    pub fn any() -> Self {
        Self {
            text: "*".to_string(),
            alternatives: vec![semver::VersionReq::STAR],
        }
    }

    pub fn parse(range: &str) -> Result<Self, VersionError> {
        let invalid = |reason: String| VersionError::InvalidRange {
            range: range.to_string(),
            reason,
        };

        let mut alternatives = Vec::new();
        for alternative in range.split("||") {
            let tokens = join_operator_tokens(alternative.split_whitespace());
            if tokens.is_empty() {
                return Err(invalid("empty comparator set".to_string()));
            }

            let mut comparators = Vec::with_capacity(tokens.len());
            for token in &tokens {
                if let Some(comparator) = comparator(token).map_err(&invalid)? {
                    comparators.push(comparator);
                }
            }

            let req = if comparators.is_empty() {
                semver::VersionReq::STAR
            } else {
                semver::VersionReq::parse(&comparators.join(", "))
                    .map_err(|err| invalid(err.to_string()))?
            };
            alternatives.push(req);
        }

        Ok(Self {
            text: range.trim().to_string(),
            alternatives,
        })
    }

    #[must_use]
    pub fn matches(&self, version: &SemVer) -> bool {
        let version = semver::Version::from(*version);

        self.alternatives.iter().any(|req| req.matches(&version))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.text
    }
}

impl fmt::Display for VersionReq {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

impl FromStr for VersionReq {
    type Err = VersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

fn is_wild(segment: &str) -> bool {
    matches!(segment, "x" | "X" | "*")
}

// One token rewritten as a `semver` comparator. `None` for a token that
// matches everything, which `semver` only allows on its own.
fn comparator(token: &str) -> Result<Option<String>, String> {
    const OPERATORS: [&str; 5] = [">=", "<=", ">", "<", "="];

    if token.split('.').all(is_wild) {
        return Ok(None);
    }

    for op in OPERATORS {
        if let Some(rest) = token.strip_prefix(op) {
            let version = SemVer::parse(rest).map_err(|err| err.to_string())?;

            return Ok(Some(format!("{op}{version}")));
        }
    }

    if token.split('.').any(is_wild) {
        return Ok(Some(token.to_string()));
    }

    let version = SemVer::parse(token).map_err(|_| format!("unrecognised comparator '{token}'"))?;

    Ok(Some(format!("={version}")))
}

// Allow `>= 3.0.0` as well as `>=3.0.0`.
fn join_operator_tokens<'a>(tokens: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    let mut pending: Option<&str> = None;

    for token in tokens {
        if let Some(op) = pending.take() {
            out.push(format!("{op}{token}"));
        } else if matches!(token, ">=" | "<=" | ">" | "<" | "=") {
            pending = Some(token);
        } else {
            out.push(token.to_string());
        }
    }
    if let Some(op) = pending {
        out.push(op.to_string());
    }

    out
}

/// True when `version` falls inside `range`.
/// A malformed range matches nothing.
#[must_use]
pub fn satisfies(version: &SemVer, range: &str) -> bool {
    VersionReq::parse(range).is_ok_and(|req| req.matches(version))
}

///
/// TESTS
///
