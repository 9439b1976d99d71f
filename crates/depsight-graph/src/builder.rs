use std::collections::HashMap;

use depsight_core::{
    Error, LibraryKind, PackageId, PackageName, Result, RestoreOutput, Target, TargetFramework,
    TargetLibrary, VersionRange,
};
use tracing::{debug, trace};

use crate::graph::{DependencyGraph, Node, NodeId, PackageEdge, PackageNode, ProjectNode};

pub fn build_graph(restore: &RestoreOutput) -> Result<DependencyGraph> {
    let target = restore.primary_target()?;
    build_graph_for_target(restore, target)
}

pub fn build_graph_for(
    restore: &RestoreOutput,
    framework: &TargetFramework,
) -> Result<DependencyGraph> {
    let target = restore.target_for(framework)?;
    build_graph_for_target(restore, target)
}

fn build_graph_for_target(restore: &RestoreOutput, target: &Target) -> Result<DependencyGraph> {
    let info = restore
        .framework_info(&target.framework)
        .ok_or_else(|| Error::MissingFrameworkInfo {
            framework: target.framework.to_string(),
        })?;
    debug!(
        project = %restore.package_spec_name(),
        framework = %target.framework,
        libraries = target.libraries.len(),
        "building dependency graph"
    );

    let mut builder = GraphBuilder::new(target);

    // The root's first layer is the direct declarations; everything below is
    // filled in by recursive expansion.
    let mut packages = Vec::with_capacity(info.dependencies.len());
    for dependency in &info.dependencies {
        let node = builder.package(&dependency.name)?;
        packages.push(PackageEdge {
            target: node,
            range: dependency
                .version_range
                .clone()
                .unwrap_or_else(VersionRange::all),
        });
    }

    let mut projects = Vec::new();
    for library in target.libraries_of_kind(LibraryKind::Project) {
        projects.push(builder.project(&library.name)?);
    }

    let root = builder.push(Node::Project(ProjectNode {
        id: PackageId::new(
            restore.package_spec_name().clone(),
            restore.package_spec_version().clone(),
        ),
        packages,
        projects,
    }));

    let graph = builder.finish(root);
    debug!(nodes = graph.len(), "dependency graph built");
    Ok(graph)
}

struct GraphBuilder<'a> {
    package_libraries: HashMap<String, Vec<&'a TargetLibrary>>,
    project_libraries: HashMap<String, Vec<&'a TargetLibrary>>,
    nodes: Vec<Node>,
    package_nodes: HashMap<String, NodeId>,
    project_nodes: HashMap<String, NodeId>,
    in_progress: Vec<(LibraryKind, String, PackageName)>,
}

impl<'a> GraphBuilder<'a> {
    fn new(target: &'a Target) -> Self {
        let mut package_libraries: HashMap<String, Vec<&'a TargetLibrary>> = HashMap::new();
        let mut project_libraries: HashMap<String, Vec<&'a TargetLibrary>> = HashMap::new();
        for library in &target.libraries {
            let index = match library.kind {
                LibraryKind::Package => &mut package_libraries,
                LibraryKind::Project => &mut project_libraries,
            };
            index.entry(library.name.key()).or_default().push(library);
        }

        Self {
            package_libraries,
            project_libraries,
            nodes: Vec::new(),
            package_nodes: HashMap::new(),
            project_nodes: HashMap::new(),
            in_progress: Vec::new(),
        }
    }

    fn package(&mut self, name: &PackageName) -> Result<NodeId> {
        let key = name.key();
        if let Some(id) = self.package_nodes.get(&key) {
            return Ok(*id);
        }

        let library = lookup(&self.package_libraries, LibraryKind::Package, name)?;
        self.enter(LibraryKind::Package, key.clone(), name)?;
        trace!(package = %library.name, version = %library.version, "expanding package");

        let mut dependencies = Vec::with_capacity(library.dependencies.len());
        for dependency in &library.dependencies {
            dependencies.push(PackageEdge {
                target: self.package(&dependency.name)?,
                range: dependency.version_range.clone(),
            });
        }

        self.in_progress.pop();
        let id = self.push(Node::Package(PackageNode {
            id: library.id(),
            dependencies,
        }));
        self.package_nodes.insert(key, id);
        Ok(id)
    }

    fn project(&mut self, name: &PackageName) -> Result<NodeId> {
        let key = name.key();
        if let Some(id) = self.project_nodes.get(&key) {
            return Ok(*id);
        }

        let library = lookup(&self.project_libraries, LibraryKind::Project, name)?;
        self.enter(LibraryKind::Project, key.clone(), name)?;
        trace!(project = %library.name, version = %library.version, "expanding project");

        let mut packages = Vec::new();
        let mut projects = Vec::new();
        for dependency in &library.dependencies {
            if self.project_libraries.contains_key(&dependency.name.key()) {
                projects.push(self.project(&dependency.name)?);
            } else {
                packages.push(PackageEdge {
                    target: self.package(&dependency.name)?,
                    range: dependency.version_range.clone(),
                });
            }
        }

        self.in_progress.pop();
        let id = self.push(Node::Project(ProjectNode {
            id: library.id(),
            packages,
            projects,
        }));
        self.project_nodes.insert(key, id);
        Ok(id)
    }

    fn enter(&mut self, kind: LibraryKind, key: String, name: &PackageName) -> Result<()> {
        if let Some(start) = self
            .in_progress
            .iter()
            .position(|(open_kind, open_key, _)| *open_kind == kind && *open_key == key)
        {
            let mut path = self.in_progress[start..]
                .iter()
                .map(|(_, _, open_name)| open_name.to_string())
                .collect::<Vec<_>>();
            path.push(name.to_string());
            return Err(Error::CycleDetected { path });
        }
        self.in_progress.push((kind, key, name.clone()));
        Ok(())
    }

    fn push(&mut self, node: Node) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(node);
        id
    }

    fn finish(self, root: NodeId) -> DependencyGraph {
        DependencyGraph {
            nodes: self.nodes,
            root,
        }
    }
}

fn lookup<'a>(
    index: &HashMap<String, Vec<&'a TargetLibrary>>,
    kind: LibraryKind,
    name: &PackageName,
) -> Result<&'a TargetLibrary> {
    match index.get(&name.key()).map(Vec::as_slice) {
        Some([library]) => Ok(*library),
        Some([_, _, ..]) => Err(Error::Ambiguous {
            kind,
            name: name.to_string(),
        }),
        _ => Err(Error::NotFound {
            kind,
            name: name.to_string(),
        }),
    }
}
