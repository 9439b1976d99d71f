use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LibraryKind {
    #[default]
    Package,
    Project,
}

impl fmt::Display for LibraryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Package => f.write_str("package"),
            Self::Project => f.write_str("project"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error("no {kind} named '{name}' found in the restore output")]
    NotFound { kind: LibraryKind, name: String },
    #[error("multiple {kind} entries named '{name}' found in the restore output")]
    Ambiguous { kind: LibraryKind, name: String },
    #[error(
        "package '{name}' is restored as top-level for '{framework}' but the project does not reference it; re-run restore"
    )]
    OutOfSync { name: String, framework: String },
    #[error("central package management is enabled but no central version is declared for '{name}'")]
    CentralVersionMissing { name: String },
    #[error("dependency cycle detected: {}", path.join(" -> "))]
    CycleDetected { path: Vec<String> },
    #[error("restore output has no target without a runtime identifier")]
    MissingTarget,
    #[error(
        "restore output has several targets without a runtime identifier ({}); select a framework",
        frameworks.join(", ")
    )]
    MultipleTargets { frameworks: Vec<String> },
    #[error("restore output has no dependency section for framework '{framework}'")]
    MissingFrameworkInfo { framework: String },
    #[error("invalid version '{input}': {reason}")]
    InvalidVersion { input: String, reason: String },
    #[error("invalid version range '{input}': {reason}")]
    InvalidVersionRange { input: String, reason: String },
    #[error("invalid target framework '{input}'")]
    InvalidFramework { input: String },
}

pub type Result<T> = std::result::Result<T, Error>;
