use depsight_core::{
    DeclaredReference, Error, FrameworkDependency, ProjectDeclarations, Result, TargetFramework,
    TargetLibrary,
};

use crate::report::InstalledPackageReference;

pub fn reconcile<D>(
    top_level: &FrameworkDependency,
    library: &TargetLibrary,
    declared: &[DeclaredReference],
    declarations: &D,
    framework: &TargetFramework,
) -> Result<InstalledPackageReference>
where
    D: ProjectDeclarations + ?Sized,
{
    let (original_requested_version, is_version_override) = if top_level.auto_referenced {
        (
            top_level.version_range.as_ref().map(ToString::to_string),
            false,
        )
    } else {
        let reference = declared
            .iter()
            .find(|reference| reference.name == top_level.name)
            .ok_or_else(|| Error::OutOfSync {
                name: top_level.name.to_string(),
                framework: framework.to_string(),
            })?;

        if declarations.central_package_management_enabled() && !reference.is_version_override {
            let central = declarations
                .central_version_for(top_level.name.as_str())
                .ok_or_else(|| Error::CentralVersionMissing {
                    name: top_level.name.to_string(),
                })?;
            (Some(central), false)
        } else {
            (
                reference.requested_version.clone(),
                reference.is_version_override,
            )
        }
    };

    Ok(InstalledPackageReference {
        name: library.name.clone(),
        original_requested_version,
        resolved_version: library.version.clone(),
        auto_referenced: top_level.auto_referenced,
        is_version_override,
    })
}
