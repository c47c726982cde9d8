//! Version parsing, ordering and range constraints for packages.
//!
//! Versions follow semantic versioning precedence: major, minor and patch
//! compare numerically and a pre-release sorts before its release. Build
//! metadata is ignored: `1.0.0` and `1.0.0+build.1` are the same release.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use semver::{Comparator, Op, VersionReq};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::CatalogError;

/// A parsed semantic version of a package or of the target platform.
#[derive(Debug, Clone)]
pub struct Version(semver::Version);

impl Version {
    pub fn new(major: u64, minor: u64, patch: u64) -> Self {
        Version(semver::Version::new(major, minor, patch))
    }

    /// Parse a version string, rejecting anything that is not strict semver.
    pub fn parse(input: &str) -> Result<Self, CatalogError> {
        semver::Version::parse(input)
            .map(Version)
            .map_err(|source| CatalogError::MalformedVersion {
                input: input.to_string(),
                source,
            })
    }

    pub fn is_prerelease(&self) -> bool {
        !self.0.pre.is_empty()
    }

    pub fn as_semver(&self) -> &semver::Version {
        &self.0
    }
}

/// Total order over two versions by semver precedence.
pub fn compare(a: &Version, b: &Version) -> Ordering {
    a.0.cmp_precedence(&b.0)
}

impl PartialEq for Version {
    fn eq(&self, other: &Self) -> bool {
        compare(self, other) == Ordering::Equal
    }
}

impl Eq for Version {}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        compare(self, other)
    }
}

impl Hash for Version {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.major.hash(state);
        self.0.minor.hash(state);
        self.0.patch.hash(state);
        self.0.pre.hash(state);
    }
}

/// Returns true when `a` sorts strictly after `b`.
pub fn is_newer(a: &Version, b: &Version) -> bool {
    compare(a, b) == Ordering::Greater
}

impl FromStr for Version {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Version::parse(s)
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl Serialize for Version {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Version {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Version::parse(&raw).map_err(serde::de::Error::custom)
    }
}

/// A version range such as `^7.0.0`, `>=7.2.0 <8.0.0` or `^6.8.0 || ^7.0.0`.
///
/// Conjunctions may be written with commas or whitespace, alternatives are
/// separated by `||`. An empty expression accepts every version.
#[derive(Debug, Clone, Default)]
pub struct VersionConstraint {
    raw: String,
    alternatives: Vec<VersionReq>,
}

impl VersionConstraint {
    pub fn parse(input: &str) -> Result<Self, CatalogError> {
        let raw = input.trim().to_string();
        if raw.is_empty() {
            return Ok(Self::default());
        }

        let alternatives = raw
            .split("||")
            .map(|alt| {
                VersionReq::parse(&normalize_conjunction(alt)).map_err(|source| {
                    CatalogError::InvalidConstraint {
                        input: raw.clone(),
                        source,
                    }
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { raw, alternatives })
    }

    pub fn is_empty(&self) -> bool {
        self.alternatives.is_empty()
    }

    /// Pre-releases are ordered by precedence like any other version, so
    /// `7.6.0-SNAPSHOT` satisfies `^7.0.0` while `7.0.0-rc1` does not.
    pub fn matches(&self, version: &Version) -> bool {
        self.is_empty()
            || self.alternatives.iter().any(|req| {
                req.comparators
                    .iter()
                    .all(|cmp| comparator_matches(cmp, version.as_semver()))
            })
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }
}

/// Evaluate one comparator by semver precedence.
///
/// Lower bounds include pre-release tags; the implicit upper bound of a
/// caret, tilde or partial version is exclusive on major.minor.patch.
fn comparator_matches(cmp: &Comparator, version: &semver::Version) -> bool {
    let mut base = semver::Version::new(cmp.major, cmp.minor.unwrap_or(0), cmp.patch.unwrap_or(0));
    base.pre = cmp.pre.clone();

    let order = version.cmp_precedence(&base);
    let at_least = order != Ordering::Less;
    let triple = (version.major, version.minor, version.patch);

    let next_partial = match (cmp.minor, cmp.patch) {
        (None, _) => (cmp.major + 1, 0, 0),
        (Some(minor), None) => (cmp.major, minor + 1, 0),
        (Some(minor), Some(patch)) => (cmp.major, minor, patch + 1),
    };

    match cmp.op {
        Op::Exact | Op::Wildcard => {
            if cmp.patch.is_some() {
                order == Ordering::Equal
            } else {
                at_least && triple < next_partial
            }
        }
        Op::Greater => {
            if cmp.patch.is_some() {
                order == Ordering::Greater
            } else {
                triple >= next_partial
            }
        }
        Op::GreaterEq => at_least,
        Op::Less => order == Ordering::Less,
        Op::LessEq => {
            if cmp.patch.is_some() {
                order != Ordering::Greater
            } else {
                triple < next_partial
            }
        }
        Op::Tilde => {
            let upper = match cmp.minor {
                Some(minor) => (cmp.major, minor + 1, 0),
                None => (cmp.major + 1, 0, 0),
            };
            at_least && triple < upper
        }
        Op::Caret => at_least && triple < caret_upper(cmp),
        _ => false,
    }
}

fn caret_upper(cmp: &Comparator) -> (u64, u64, u64) {
    match (cmp.major, cmp.minor, cmp.patch) {
        (0, None, _) => (1, 0, 0),
        (0, Some(0), Some(patch)) => (0, 0, patch + 1),
        (0, Some(minor), _) => (0, minor + 1, 0),
        (major, _, _) => (major + 1, 0, 0),
    }
}

/// Turn `>=7.0.0 <8.0.0` into `>=7.0.0, <8.0.0`; a dangling operator such as
/// `>= 7.0.0` stays attached to its version.
fn normalize_conjunction(expr: &str) -> String {
    if expr.contains(',') {
        return expr.trim().to_string();
    }

    let mut comparators: Vec<String> = Vec::new();
    let mut pending_op = String::new();
    for token in expr.split_whitespace() {
        if token.chars().all(|c| "<>=~^".contains(c)) {
            pending_op.push_str(token);
        } else {
            comparators.push(format!("{}{}", pending_op, token));
            pending_op.clear();
        }
    }
    if !pending_op.is_empty() {
        comparators.push(pending_op);
    }
    comparators.join(", ")
}

impl PartialEq for VersionConstraint {
    fn eq(&self, other: &Self) -> bool {
        self.raw == other.raw
    }
}

impl fmt::Display for VersionConstraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl Serialize for VersionConstraint {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.raw)
    }
}

impl<'de> Deserialize<'de> for VersionConstraint {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        VersionConstraint::parse(&raw).map_err(serde::de::Error::custom)
    }
}
