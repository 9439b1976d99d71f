use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

#[derive(Clone, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TargetFramework(String);

impl TargetFramework {
    // Accepts `net8.0` as well as `.NETCoreApp,Version=v8.0`.
    pub fn parse(input: &str) -> Result<Self> {
        let trimmed = input.trim();
        let invalid = || Error::InvalidFramework {
            input: input.to_string(),
        };

        if trimmed.starts_with('.') {
            return parse_long_form(trimmed).ok_or_else(invalid);
        }

        let mut chars = trimmed.chars();
        let Some(first) = chars.next() else {
            return Err(invalid());
        };
        if !first.is_ascii_alphabetic() {
            return Err(invalid());
        }
        if chars.any(|ch| !(ch.is_ascii_alphanumeric() || ch == '.' || ch == '-' || ch == '_')) {
            return Err(invalid());
        }

        Ok(Self(trimmed.to_string()))
    }

    pub fn label(&self) -> &str {
        &self.0
    }
}

fn parse_long_form(input: &str) -> Option<TargetFramework> {
    let mut parts = input.split(',').map(str::trim);
    let identifier = parts.next()?;
    let version = parts
        .find_map(|part| {
            part.split_once('=')
                .filter(|(key, _)| key.trim().eq_ignore_ascii_case("version"))
                .map(|(_, value)| value.trim())
        })?
        .trim_start_matches(['v', 'V']);

    let numbers = version
        .split('.')
        .map(|part| part.parse::<u32>().ok())
        .collect::<Option<Vec<_>>>()?;
    let major = *numbers.first()?;
    let minor = numbers.get(1).copied().unwrap_or(0);

    let short = match identifier.to_ascii_lowercase().as_str() {
        ".netcoreapp" if major >= 5 => format!("net{major}.{minor}"),
        ".netcoreapp" => format!("netcoreapp{major}.{minor}"),
        ".netstandard" => format!("netstandard{major}.{minor}"),
        ".netframework" => {
            let digits = numbers
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .concat();
            format!("net{digits}")
        }
        _ => return None,
    };
    Some(TargetFramework(short))
}

impl PartialEq for TargetFramework {
    fn eq(&self, other: &Self) -> bool {
        self.0.eq_ignore_ascii_case(&other.0)
    }
}

impl Eq for TargetFramework {}

impl Hash for TargetFramework {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.to_ascii_lowercase().hash(state);
    }
}

impl fmt::Debug for TargetFramework {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.0, f)
    }
}

impl fmt::Display for TargetFramework {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for TargetFramework {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl TryFrom<String> for TargetFramework {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(&value)
    }
}

impl From<TargetFramework> for String {
    fn from(value: TargetFramework) -> Self {
        value.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameworkSelector {
    pub framework: TargetFramework,
    pub runtime_identifier: Option<String>,
}

impl FrameworkSelector {
    pub fn parse(input: &str) -> Result<Self> {
        let parts = input
            .split('/')
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>();

        match parts.as_slice() {
            [framework] => Ok(Self {
                framework: TargetFramework::parse(framework)?,
                runtime_identifier: None,
            }),
            [framework, rid] => Ok(Self {
                framework: TargetFramework::parse(framework)?,
                runtime_identifier: Some((*rid).to_string()),
            }),
            _ => Err(Error::InvalidFramework {
                input: input.to_string(),
            }),
        }
    }

    /// A framework-only selector matches the runtime-independent target; a
    /// selector with a runtime identifier matches exactly that target.
    pub fn matches(&self, framework: &TargetFramework, runtime_identifier: Option<&str>) -> bool {
        if &self.framework != framework {
            return false;
        }
        match (&self.runtime_identifier, runtime_identifier) {
            (None, None) => true,
            (Some(wanted), Some(actual)) => wanted.eq_ignore_ascii_case(actual),
            _ => false,
        }
    }
}

impl FromStr for FrameworkSelector {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}
