use std::collections::HashSet;
use std::fs;
use std::path::Path;

use anyhow::{anyhow, Context};
use serde::{Deserialize, Serialize};

use crate::framework::TargetFramework;
use crate::identity::{names_match, PackageName};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeclaredReference {
    pub name: PackageName,
    pub requested_version: Option<String>,
    pub is_version_override: bool,
}

pub trait ProjectDeclarations {
    fn declared_references(&self, framework: &TargetFramework) -> Vec<DeclaredReference>;

    fn central_package_management_enabled(&self) -> bool;

    fn central_version_for(&self, name: &str) -> Option<String>;
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CentralPackageKind {
    #[default]
    PackageVersion,
    GlobalPackageReference,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CentralPackageVersion {
    pub name: PackageName,
    pub version: String,
    #[serde(default)]
    pub kind: CentralPackageKind,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectReferenceEntry {
    pub name: PackageName,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub version_override: Option<String>,
    /// Frameworks the reference applies to; empty means every framework.
    #[serde(default)]
    pub frameworks: Vec<TargetFramework>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectDeclarationsFile {
    #[serde(default)]
    pub central_package_management: bool,
    #[serde(default, rename = "reference")]
    pub references: Vec<ProjectReferenceEntry>,
    #[serde(default, rename = "central")]
    pub central_versions: Vec<CentralPackageVersion>,
}

impl ProjectDeclarationsFile {
    pub fn from_toml_str(input: &str) -> anyhow::Result<Self> {
        let file: Self = toml::from_str(input).context("failed to parse project declarations")?;

        let mut seen_central = HashSet::new();
        for entry in &file.central_versions {
            if entry.name.as_str().trim().is_empty() {
                return Err(anyhow!("central version entry name must not be empty"));
            }
            if !seen_central.insert(entry.name.key()) {
                return Err(anyhow!(
                    "duplicate central version entry for '{}'",
                    entry.name
                ));
            }
        }
        for reference in &file.references {
            if reference.name.as_str().trim().is_empty() {
                return Err(anyhow!("package reference name must not be empty"));
            }
        }

        Ok(file)
    }

    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let raw = fs::read_to_string(path).with_context(|| {
            format!("failed to read project declarations: {}", path.display())
        })?;
        Self::from_toml_str(&raw)
            .with_context(|| format!("invalid project declarations: {}", path.display()))
    }
}

impl ProjectDeclarations for ProjectDeclarationsFile {
    fn declared_references(&self, framework: &TargetFramework) -> Vec<DeclaredReference> {
        self.references
            .iter()
            .filter(|entry| entry.frameworks.is_empty() || entry.frameworks.contains(framework))
            .map(|entry| {
                let is_version_override = entry.version_override.is_some();
                DeclaredReference {
                    name: entry.name.clone(),
                    requested_version: entry
                        .version_override
                        .clone()
                        .or_else(|| entry.version.clone()),
                    is_version_override,
                }
            })
            .collect()
    }

    fn central_package_management_enabled(&self) -> bool {
        self.central_package_management
    }

    fn central_version_for(&self, name: &str) -> Option<String> {
        self.central_versions
            .iter()
            .find(|entry| names_match(entry.name.as_str(), name))
            .map(|entry| entry.version.clone())
    }
}
