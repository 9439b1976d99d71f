use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use semver::{BuildMetadata, Prerelease};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

// `1.0.0.0` and `1.0.0` are the same version: a zero revision is dropped.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PackageVersion {
    semver: semver::Version,
    revision: Option<u64>,
}

impl PackageVersion {
    pub fn new(major: u64, minor: u64, patch: u64) -> Self {
        Self {
            semver: semver::Version::new(major, minor, patch),
            revision: None,
        }
    }

    pub fn parse(input: &str) -> Result<Self> {
        let invalid = |reason: &str| Error::InvalidVersion {
            input: input.to_string(),
            reason: reason.to_string(),
        };

        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(invalid("version must not be empty"));
        }

        let (rest, build) = match trimmed.split_once('+') {
            Some((rest, build)) => (rest, Some(build)),
            None => (trimmed, None),
        };
        let (core, pre) = match rest.split_once('-') {
            Some((core, pre)) => (core, Some(pre)),
            None => (rest, None),
        };

        let mut numbers = Vec::with_capacity(4);
        for part in core.split('.') {
            if part.is_empty() || !part.chars().all(|ch| ch.is_ascii_digit()) {
                return Err(invalid("version components must be numeric"));
            }
            let value = part
                .parse::<u64>()
                .map_err(|_| invalid("version component is out of range"))?;
            numbers.push(value);
        }
        if numbers.len() > 4 {
            return Err(invalid("at most four version components are allowed"));
        }
        numbers.resize(4, 0);

        let mut semver = semver::Version::new(numbers[0], numbers[1], numbers[2]);
        if pre == Some("") || build == Some("") {
            return Err(invalid("empty prerelease or build label"));
        }
        if let Some(pre) = pre {
            semver.pre = Prerelease::new(pre).map_err(|err| invalid(&err.to_string()))?;
        }
        if let Some(build) = build {
            semver.build = BuildMetadata::new(build).map_err(|err| invalid(&err.to_string()))?;
        }

        Ok(Self {
            semver,
            revision: (numbers[3] != 0).then_some(numbers[3]),
        })
    }

    pub fn revision(&self) -> u64 {
        self.revision.unwrap_or(0)
    }

    pub fn is_prerelease(&self) -> bool {
        !self.semver.pre.is_empty()
    }
}

impl Ord for PackageVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        let left = &self.semver;
        let right = &other.semver;
        (left.major, left.minor, left.patch, self.revision())
            .cmp(&(right.major, right.minor, right.patch, other.revision()))
            .then_with(|| left.pre.cmp(&right.pre))
            .then_with(|| left.build.cmp(&right.build))
    }
}

impl PartialOrd for PackageVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for PackageVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let version = &self.semver;
        write!(f, "{}.{}.{}", version.major, version.minor, version.patch)?;
        if let Some(revision) = self.revision {
            write!(f, ".{revision}")?;
        }
        if !version.pre.is_empty() {
            write!(f, "-{}", version.pre)?;
        }
        if !version.build.is_empty() {
            write!(f, "+{}", version.build)?;
        }
        Ok(())
    }
}

impl FromStr for PackageVersion {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl TryFrom<String> for PackageVersion {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(&value)
    }
}

impl From<PackageVersion> for String {
    fn from(value: PackageVersion) -> Self {
        value.to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VersionBound {
    pub version: PackageVersion,
    pub inclusive: bool,
    /// Set for floating minimums (`1.*`, `1.0.0-*`); `version` is the lowest
    /// version the float admits.
    pub floating: Option<String>,
}

impl VersionBound {
    fn fixed(version: PackageVersion, inclusive: bool) -> Self {
        Self {
            version,
            inclusive,
            floating: None,
        }
    }
}

impl fmt::Display for VersionBound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.floating {
            Some(floating) => f.write_str(floating),
            None => write!(f, "{}", self.version),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct VersionRange {
    pub min: Option<VersionBound>,
    pub max: Option<VersionBound>,
}

impl VersionRange {
    pub fn all() -> Self {
        Self {
            min: None,
            max: None,
        }
    }

    pub fn at_least(version: PackageVersion) -> Self {
        Self {
            min: Some(VersionBound::fixed(version, true)),
            max: None,
        }
    }

    pub fn exact(version: PackageVersion) -> Self {
        Self {
            min: Some(VersionBound::fixed(version.clone(), true)),
            max: Some(VersionBound::fixed(version, true)),
        }
    }

    pub fn parse(input: &str) -> Result<Self> {
        let invalid = |reason: &str| Error::InvalidVersionRange {
            input: input.to_string(),
            reason: reason.to_string(),
        };
        let parse_bound =
            |raw: &str, inclusive: bool, may_float: bool| -> Result<Option<VersionBound>> {
                let raw = raw.trim();
                if raw.is_empty() {
                    return Ok(None);
                }
                if !raw.contains('*') {
                    let version =
                        PackageVersion::parse(raw).map_err(|err| invalid(&err.to_string()))?;
                    return Ok(Some(VersionBound::fixed(version, inclusive)));
                }
                if !may_float {
                    return Err(invalid("only the minimum version may float"));
                }
                let version = floating_floor(raw).map_err(|err| invalid(&err.to_string()))?;
                Ok(Some(VersionBound {
                    version,
                    inclusive,
                    floating: Some(raw.to_string()),
                }))
            };

        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(invalid("range must not be empty"));
        }

        let Some(open) = trimmed.chars().next().filter(|ch| *ch == '[' || *ch == '(') else {
            return Ok(Self {
                min: parse_bound(trimmed, true, true)?,
                max: None,
            });
        };
        let close = trimmed.chars().last().unwrap_or(open);
        if trimmed.len() < 2 || (close != ']' && close != ')') {
            return Err(invalid("interval must end with ']' or ')'"));
        }
        let inner = &trimmed[1..trimmed.len() - 1];

        let Some((low, high)) = inner.split_once(',') else {
            if open != '[' || close != ']' {
                return Err(invalid("a single-version interval must be written as [x]"));
            }
            let bound = parse_bound(inner, true, false)?
                .ok_or_else(|| invalid("a single-version interval needs a version"))?;
            return Ok(Self::exact(bound.version));
        };

        let range = Self {
            min: parse_bound(low, open == '[', true)?,
            max: parse_bound(high, close == ']', false)?,
        };

        if let (Some(min), Some(max)) = (&range.min, &range.max) {
            match min.version.cmp(&max.version) {
                Ordering::Greater => return Err(invalid("minimum is greater than maximum")),
                Ordering::Equal if !(min.inclusive && max.inclusive) => {
                    return Err(invalid("interval is empty"));
                }
                _ => {}
            }
        }

        Ok(range)
    }

    pub fn is_exact(&self) -> bool {
        matches!(
            (&self.min, &self.max),
            (Some(min), Some(max))
                if min.floating.is_none()
                    && min.inclusive
                    && max.inclusive
                    && min.version == max.version
        )
    }

    pub fn contains(&self, version: &PackageVersion) -> bool {
        let above_min = self.min.as_ref().map_or(true, |min| {
            if min.inclusive {
                version >= &min.version
            } else {
                version > &min.version
            }
        });
        let below_max = self.max.as_ref().map_or(true, |max| {
            if max.inclusive {
                version <= &max.version
            } else {
                version < &max.version
            }
        });
        above_min && below_max
    }
}

impl fmt::Display for VersionRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_exact() {
            if let Some(min) = &self.min {
                return write!(f, "[{min}]");
            }
        }

        match &self.min {
            Some(min) if min.inclusive => write!(f, "[{min}")?,
            Some(min) => write!(f, "({min}")?,
            None => f.write_str("(")?,
        }
        f.write_str(",")?;
        match &self.max {
            Some(max) if max.inclusive => write!(f, "{max}]"),
            Some(max) => write!(f, "{max})"),
            None => f.write_str(")"),
        }
    }
}

impl FromStr for VersionRange {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl TryFrom<String> for VersionRange {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(&value)
    }
}

impl From<VersionRange> for String {
    fn from(value: VersionRange) -> Self {
        value.to_string()
    }
}

// `*` may replace the last numeric component (`1.*`, `1.2.*`, `*`) or end the
// prerelease label (`1.0.0-*`, `1.0.0-beta.*`, `1.*-*`).
fn floating_floor(raw: &str) -> Result<PackageVersion> {
    let invalid = |reason: &str| Error::InvalidVersion {
        input: raw.to_string(),
        reason: reason.to_string(),
    };

    let (core, pre) = match raw.split_once('-') {
        Some((core, pre)) => (core, Some(pre)),
        None => (raw, None),
    };
    let (core, core_floats) = match core.strip_suffix('*') {
        Some("") => ("0", true),
        Some(prefix) => match prefix.strip_suffix('.') {
            Some(prefix) => (prefix, true),
            None => return Err(invalid("'*' must replace a whole version component")),
        },
        None => (core, false),
    };
    if core.contains('*') {
        return Err(invalid("only the last version component may float"));
    }

    let floor = match pre {
        None => core.to_string(),
        Some(pre) => {
            let Some(label) = pre.strip_suffix('*') else {
                if core_floats || pre.contains('*') {
                    return Err(invalid("a floating prerelease label must end with '*'"));
                }
                return PackageVersion::parse(raw);
            };
            let label = label.trim_end_matches(['.', '-']);
            if label.contains('*') {
                return Err(invalid("only the end of the prerelease label may float"));
            }
            if label.is_empty() {
                format!("{core}-0")
            } else {
                format!("{core}-{label}")
            }
        }
    };
    PackageVersion::parse(&floor).map_err(|err| match err {
        Error::InvalidVersion { reason, .. } => invalid(&reason),
        other => other,
    })
}
