mod aggregate;
mod builder;
mod graph;
mod reconcile;
mod report;

pub use aggregate::aggregate;
pub use builder::{build_graph, build_graph_for};
pub use graph::{DependencyGraph, Node, NodeId, PackageEdge, PackageNode, ProjectNode};
pub use reconcile::reconcile;
pub use report::{FrameworkPackages, InstalledPackageReference};
