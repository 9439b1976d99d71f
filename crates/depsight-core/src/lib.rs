mod declarations;
mod error;
mod framework;
mod identity;
mod restore;
mod version;

pub use declarations::{
    CentralPackageKind, CentralPackageVersion, DeclaredReference, ProjectDeclarations,
    ProjectDeclarationsFile, ProjectReferenceEntry,
};
pub use error::{Error, LibraryKind, Result};
pub use framework::{FrameworkSelector, TargetFramework};
pub use identity::{names_match, PackageId, PackageName};
pub use restore::{
    FrameworkDependency, LibraryDependency, ProjectSpec, RestoreOutput, Target,
    TargetFrameworkInfo, TargetLibrary,
};
pub use version::{PackageVersion, VersionBound, VersionRange};

#[cfg(test)]
mod tests;
