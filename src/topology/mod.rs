mod graph;
mod load;
mod snapshot;

pub use graph::{TopologyGraph, TrafficEdge};
pub use load::{SnapshotSource, load_snapshot};
pub use snapshot::{EdgeDirection, NodeKind, NodeRecord, Snapshot, TrafficStats};
