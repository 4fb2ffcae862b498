use std::collections::HashMap;

use tracing::{debug, info};

use super::snapshot::{EdgeDirection, NodeRecord, Snapshot, TrafficStats};

/// An edge whose endpoints are indices into [`TopologyGraph::nodes`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TrafficEdge {
    pub from: usize,
    pub to: usize,
    pub message_count: u64,
    pub direction: EdgeDirection,
}

impl TrafficEdge {
    pub fn touches(&self, index: usize) -> bool {
        self.from == index || self.to == index
    }
}

/// Indexed node set plus the edges that survived endpoint validation.
#[derive(Clone, Debug, Default)]
pub struct TopologyGraph {
    nodes: Vec<NodeRecord>,
    edges: Vec<TrafficEdge>,
    index_by_id: HashMap<String, usize>,
    stats: TrafficStats,
    stats_derived: bool,
    dropped_edges: usize,
}

impl TopologyGraph {
    pub fn build(snapshot: &Snapshot) -> Self {
        let mut nodes = Vec::with_capacity(snapshot.nodes.len());
        let mut index_by_id = HashMap::with_capacity(snapshot.nodes.len());
        for node in &snapshot.nodes {
            if index_by_id.contains_key(&node.id) {
                debug!(id = %node.id, "skipping duplicate node id");
                continue;
            }
            index_by_id.insert(node.id.clone(), nodes.len());
            nodes.push(node.clone());
        }

        let mut edges = Vec::with_capacity(snapshot.edges.len());
        let mut derived_stats = TrafficStats::default();
        let mut dropped_edges = 0usize;
        for edge in &snapshot.edges {
            let (Some(&from), Some(&to)) = (index_by_id.get(&edge.from), index_by_id.get(&edge.to))
            else {
                debug!(from = %edge.from, to = %edge.to, "dropping edge with unknown endpoint");
                dropped_edges += 1;
                continue;
            };

            derived_stats.record(edge.direction, edge.message_count);
            edges.push(TrafficEdge {
                from,
                to,
                message_count: edge.message_count,
                direction: edge.direction,
            });
        }

        let stats_derived = snapshot.stats.is_none();
        let stats = snapshot.stats.unwrap_or(derived_stats);

        info!(
            nodes = nodes.len(),
            edges = edges.len(),
            dropped_edges,
            "built topology graph"
        );

        Self {
            nodes,
            edges,
            index_by_id,
            stats,
            stats_derived,
            dropped_edges,
        }
    }

    pub fn nodes(&self) -> &[NodeRecord] {
        &self.nodes
    }

    pub fn edges(&self) -> &[TrafficEdge] {
        &self.edges
    }

    pub fn node(&self, index: usize) -> Option<&NodeRecord> {
        self.nodes.get(index)
    }

    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.index_by_id.get(id).copied()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index_by_id.contains_key(id)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn stats(&self) -> TrafficStats {
        self.stats
    }

    /// True when the snapshot carried no `stats` block and the totals were
    /// summed from the valid edges instead.
    pub fn stats_derived(&self) -> bool {
        self.stats_derived
    }

    pub fn dropped_edge_count(&self) -> usize {
        self.dropped_edges
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn snapshot(value: serde_json::Value) -> Snapshot {
        Snapshot::from_value(&value)
    }

    #[test]
    fn drops_edges_with_missing_endpoints() {
        let graph = TopologyGraph::build(&snapshot(json!({
            "nodes": [{"id": "x"}, {"id": "z"}],
            "edges": [
                {"from": "x", "to": "y", "messageCount": 4},
                {"from": "ghost", "to": "z", "messageCount": 1},
                {"from": "x", "to": "z", "messageCount": 2}
            ]
        })));

        assert_eq!(graph.edge_count(), 1);
        assert_eq!(graph.dropped_edge_count(), 2);
        let edge = graph.edges()[0];
        assert_eq!((edge.from, edge.to), (0, 1));
        assert!(graph.edges().iter().all(|edge| {
            edge.from < graph.node_count() && edge.to < graph.node_count()
        }));
    }

    #[test]
    fn empty_snapshot_builds_empty_graph() {
        let graph = TopologyGraph::build(&Snapshot::default());
        assert_eq!(graph.node_count(), 0);
        assert_eq!(graph.edge_count(), 0);
        assert_eq!(graph.stats(), TrafficStats::default());
    }

    #[test]
    fn keeps_first_of_duplicate_ids() {
        let graph = TopologyGraph::build(&snapshot(json!({
            "nodes": [{"id": "a", "name": "first"}, {"id": "a", "name": "second"}]
        })));

        assert_eq!(graph.node_count(), 1);
        assert_eq!(graph.node(0).map(|node| node.name.as_str()), Some("first"));
        assert_eq!(graph.index_of("a"), Some(0));
    }

    #[test]
    fn derives_stats_from_valid_edges_only() {
        let graph = TopologyGraph::build(&snapshot(json!({
            "nodes": [{"id": "a"}, {"id": "b"}, {"id": "mail", "kind": "external"}],
            "edges": [
                {"from": "a", "to": "b", "messageCount": 3, "direction": "internal"},
                {"from": "a", "to": "mail", "messageCount": 5, "direction": "external_outbound"},
                {"from": "mail", "to": "b", "messageCount": 2, "direction": "external_inbound"},
                {"from": "a", "to": "gone", "messageCount": 100, "direction": "internal"}
            ]
        })));

        assert!(graph.stats_derived());
        let stats = graph.stats();
        assert_eq!(stats.total_messages, 10);
        assert_eq!(stats.internal_messages, 3);
        assert_eq!(stats.external_outbound, 5);
        assert_eq!(stats.external_inbound, 2);
    }

    #[test]
    fn supplied_stats_are_kept() {
        let graph = TopologyGraph::build(&snapshot(json!({
            "nodes": [{"id": "a"}],
            "edges": [],
            "stats": {"totalMessages": 40, "internalMessages": 40}
        })));

        assert!(!graph.stats_derived());
        assert_eq!(graph.stats().total_messages, 40);
    }

    #[test]
    fn does_not_mutate_snapshot() {
        let input = snapshot(json!({
            "nodes": [{"id": "a"}],
            "edges": [{"from": "a", "to": "missing", "messageCount": 1}]
        }));
        let copy = input.clone();
        let _graph = TopologyGraph::build(&input);
        assert_eq!(input, copy);
    }
}
