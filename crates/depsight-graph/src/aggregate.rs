use std::collections::HashSet;

use depsight_core::{
    Error, FrameworkDependency, FrameworkSelector, LibraryKind, PackageName, ProjectDeclarations,
    Result, RestoreOutput, Target,
};
use tracing::debug;

use crate::reconcile::reconcile;
use crate::report::{FrameworkPackages, InstalledPackageReference};

pub fn aggregate<D>(
    restore: &RestoreOutput,
    declarations: &D,
    selectors: &[String],
    include_transitive: bool,
) -> Result<Vec<FrameworkPackages>>
where
    D: ProjectDeclarations + ?Sized,
{
    let targets = select_targets(restore, selectors);
    let mut result = Vec::with_capacity(targets.len());

    for target in targets {
        let info = restore
            .framework_info(&target.framework)
            .ok_or_else(|| Error::MissingFrameworkInfo {
                framework: target.framework.to_string(),
            })?;
        let declared = declarations.declared_references(&target.framework);

        let mut top_level = Vec::new();
        let mut transitive = Vec::new();
        for library in &target.libraries {
            match top_level_declaration(&info.dependencies, &library.name)? {
                Some(_) if library.is_project() => {}
                Some(declaration) => top_level.push(reconcile(
                    declaration,
                    library,
                    &declared,
                    declarations,
                    &target.framework,
                )?),
                None if include_transitive && !library.is_project() => {
                    transitive.push(InstalledPackageReference::transitive(library));
                }
                None => {}
            }
        }

        debug!(
            framework = %target.framework,
            top_level = top_level.len(),
            transitive = transitive.len(),
            "classified restored packages"
        );
        result.push(FrameworkPackages {
            framework: target.framework.label().to_string(),
            top_level,
            transitive,
        });
    }

    Ok(result)
}

// At most one target per framework, first in restore order.
fn select_targets<'a>(restore: &'a RestoreOutput, selectors: &[String]) -> Vec<&'a Target> {
    let parsed = selectors
        .iter()
        .filter_map(|raw| match FrameworkSelector::parse(raw) {
            Ok(selector) => Some(selector),
            Err(err) => {
                debug!(selector = %raw, error = %err, "skipping framework selector");
                None
            }
        })
        .collect::<Vec<_>>();

    let mut seen = HashSet::new();
    restore
        .targets()
        .iter()
        .filter(|target| {
            let wanted = if selectors.is_empty() {
                !target.is_runtime_specific()
            } else {
                parsed.iter().any(|selector| {
                    selector.matches(&target.framework, target.runtime_identifier.as_deref())
                })
            };
            wanted && seen.insert(target.framework.clone())
        })
        .collect()
}

fn top_level_declaration<'a>(
    dependencies: &'a [FrameworkDependency],
    name: &PackageName,
) -> Result<Option<&'a FrameworkDependency>> {
    let mut matching = dependencies
        .iter()
        .filter(|dependency| &dependency.name == name);
    let first = matching.next();
    if first.is_some() && matching.next().is_some() {
        return Err(Error::Ambiguous {
            kind: LibraryKind::Package,
            name: name.to_string(),
        });
    }
    Ok(first)
}
