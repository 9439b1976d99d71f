use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::error::{Error, LibraryKind, Result};
use crate::framework::TargetFramework;
use crate::identity::{PackageId, PackageName};
use crate::version::{PackageVersion, VersionRange};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RestoreOutput {
    pub project: ProjectSpec,
    #[serde(default)]
    pub targets: Vec<Target>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectSpec {
    pub name: PackageName,
    pub version: PackageVersion,
    #[serde(default)]
    pub frameworks: Vec<TargetFrameworkInfo>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetFrameworkInfo {
    pub framework: TargetFramework,
    #[serde(default)]
    pub dependencies: Vec<FrameworkDependency>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameworkDependency {
    pub name: PackageName,
    #[serde(default)]
    pub version_range: Option<VersionRange>,
    #[serde(default)]
    pub auto_referenced: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Target {
    pub framework: TargetFramework,
    #[serde(default)]
    pub runtime_identifier: Option<String>,
    #[serde(default)]
    pub libraries: Vec<TargetLibrary>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetLibrary {
    pub name: PackageName,
    pub version: PackageVersion,
    #[serde(rename = "type", default)]
    pub kind: LibraryKind,
    #[serde(default)]
    pub dependencies: Vec<LibraryDependency>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LibraryDependency {
    pub name: PackageName,
    #[serde(default = "VersionRange::all")]
    pub version_range: VersionRange,
}

impl RestoreOutput {
    pub fn from_json_str(input: &str) -> anyhow::Result<Self> {
        let output: Self = serde_json::from_str(input).context("failed to parse restore output")?;
        output.validate()?;
        Ok(output)
    }

    pub fn validate(&self) -> Result<()> {
        if self.targets.is_empty() {
            return Err(Error::MissingTarget);
        }
        for target in &self.targets {
            if self.framework_info(&target.framework).is_none() {
                return Err(Error::MissingFrameworkInfo {
                    framework: target.framework.to_string(),
                });
            }
        }
        Ok(())
    }

    pub fn targets(&self) -> &[Target] {
        &self.targets
    }

    pub fn target_frameworks(&self) -> &[TargetFrameworkInfo] {
        &self.project.frameworks
    }

    pub fn package_spec_name(&self) -> &PackageName {
        &self.project.name
    }

    pub fn package_spec_version(&self) -> &PackageVersion {
        &self.project.version
    }

    pub fn framework_info(&self, framework: &TargetFramework) -> Option<&TargetFrameworkInfo> {
        self.project
            .frameworks
            .iter()
            .find(|info| &info.framework == framework)
    }

    pub fn primary_target(&self) -> Result<&Target> {
        let mut candidates = self
            .targets
            .iter()
            .filter(|target| !target.is_runtime_specific());
        let Some(first) = candidates.next() else {
            return Err(Error::MissingTarget);
        };
        let rest = candidates.collect::<Vec<_>>();
        if rest.is_empty() {
            return Ok(first);
        }

        Err(Error::MultipleTargets {
            frameworks: std::iter::once(first)
                .chain(rest)
                .map(|target| target.framework.to_string())
                .collect(),
        })
    }

    pub fn target_for(&self, framework: &TargetFramework) -> Result<&Target> {
        self.targets
            .iter()
            .find(|target| !target.is_runtime_specific() && &target.framework == framework)
            .ok_or(Error::MissingTarget)
    }
}

impl Target {
    pub fn is_runtime_specific(&self) -> bool {
        self.runtime_identifier.is_some()
    }

    pub fn libraries_of_kind(&self, kind: LibraryKind) -> impl Iterator<Item = &TargetLibrary> {
        self.libraries
            .iter()
            .filter(move |library| library.kind == kind)
    }
}

impl TargetLibrary {
    pub fn is_project(&self) -> bool {
        self.kind == LibraryKind::Project
    }

    pub fn id(&self) -> PackageId {
        PackageId::new(self.name.clone(), self.version.clone())
    }
}
