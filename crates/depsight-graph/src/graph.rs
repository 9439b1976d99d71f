use depsight_core::{LibraryKind, PackageId, PackageName, VersionRange};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageEdge {
    pub target: NodeId,
    pub range: VersionRange,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageNode {
    pub id: PackageId,
    pub dependencies: Vec<PackageEdge>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectNode {
    pub id: PackageId,
    pub packages: Vec<PackageEdge>,
    pub projects: Vec<NodeId>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Package(PackageNode),
    Project(ProjectNode),
}

impl Node {
    pub fn id(&self) -> &PackageId {
        match self {
            Self::Package(node) => &node.id,
            Self::Project(node) => &node.id,
        }
    }

    pub fn name(&self) -> &PackageName {
        &self.id().name
    }

    pub fn kind(&self) -> LibraryKind {
        match self {
            Self::Package(_) => LibraryKind::Package,
            Self::Project(_) => LibraryKind::Project,
        }
    }

    pub fn package_edges(&self) -> &[PackageEdge] {
        match self {
            Self::Package(node) => &node.dependencies,
            Self::Project(node) => &node.packages,
        }
    }

    pub fn project_edges(&self) -> &[NodeId] {
        match self {
            Self::Package(_) => &[],
            Self::Project(node) => &node.projects,
        }
    }

    pub fn children(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.package_edges()
            .iter()
            .map(|edge| edge.target)
            .chain(self.project_edges().iter().copied())
    }
}

// One node per distinct package name and per distinct project name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencyGraph {
    pub(crate) nodes: Vec<Node>,
    pub(crate) root: NodeId,
}

impl DependencyGraph {
    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn root_node(&self) -> &Node {
        self.node(self.root)
    }

    /// Panics when `id` was not produced by this graph.
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    pub fn edge_range(&self, from: NodeId, to: NodeId) -> Option<&VersionRange> {
        self.node(from)
            .package_edges()
            .iter()
            .find(|edge| edge.target == to)
            .map(|edge| &edge.range)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &Node)> {
        self.nodes
            .iter()
            .enumerate()
            .map(|(index, node)| (NodeId(index), node))
    }

    pub fn find_package(&self, name: &str) -> Option<NodeId> {
        self.iter()
            .find(|(_, node)| node.kind() == LibraryKind::Package && node.name().matches(name))
            .map(|(id, _)| id)
    }

    /// One path per route from the root to a node named `name`, in edge order.
    pub fn paths_to(&self, name: &str) -> Vec<Vec<NodeId>> {
        let mut paths = Vec::new();
        let mut current = vec![self.root];
        self.collect_paths(name, &mut current, &mut paths);
        paths
    }

    fn collect_paths(&self, name: &str, current: &mut Vec<NodeId>, paths: &mut Vec<Vec<NodeId>>) {
        let Some(&last) = current.last() else {
            return;
        };
        for child in self.node(last).children() {
            current.push(child);
            if self.node(child).name().matches(name) {
                paths.push(current.clone());
            } else {
                self.collect_paths(name, current, paths);
            }
            current.pop();
        }
    }
}
