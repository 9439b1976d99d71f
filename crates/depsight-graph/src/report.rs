use depsight_core::{PackageId, PackageName, PackageVersion, TargetLibrary};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InstalledPackageReference {
    pub name: PackageName,
    pub original_requested_version: Option<String>,
    pub resolved_version: PackageVersion,
    pub auto_referenced: bool,
    pub is_version_override: bool,
}

impl InstalledPackageReference {
    pub(crate) fn transitive(library: &TargetLibrary) -> Self {
        Self {
            name: library.name.clone(),
            original_requested_version: None,
            resolved_version: library.version.clone(),
            auto_referenced: false,
            is_version_override: false,
        }
    }

    pub fn package_id(&self) -> PackageId {
        PackageId::new(self.name.clone(), self.resolved_version.clone())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FrameworkPackages {
    pub framework: String,
    pub top_level: Vec<InstalledPackageReference>,
    pub transitive: Vec<InstalledPackageReference>,
}
