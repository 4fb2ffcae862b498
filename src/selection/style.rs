use std::collections::HashSet;

use crate::topology::TrafficEdge;

const BASE_EDGE_OPACITY: f32 = 0.6;
const FOCUSED_OPACITY: f32 = 1.0;
const DIMMED_EDGE_OPACITY: f32 = 0.15;
const DIMMED_NODE_OPACITY: f32 = 0.25;
const MAX_STROKE_WIDTH: f32 = 6.0;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EdgeStyle {
    pub opacity: f32,
    pub emphasis: bool,
    pub width: f32,
}

fn stroke_width(message_count: u64) -> f32 {
    (message_count as f32).clamp(1.0, MAX_STROKE_WIDTH)
}

pub fn edge_style_for(edge: &TrafficEdge, selected: Option<usize>) -> EdgeStyle {
    let width = stroke_width(edge.message_count);
    match selected {
        None => EdgeStyle {
            opacity: BASE_EDGE_OPACITY,
            emphasis: false,
            width,
        },
        Some(index) if edge.touches(index) => EdgeStyle {
            opacity: FOCUSED_OPACITY,
            emphasis: true,
            width,
        },
        Some(_) => EdgeStyle {
            opacity: DIMMED_EDGE_OPACITY,
            emphasis: false,
            width,
        },
    }
}

/// Emphasis derived from the selection for one paint. Built fresh from the
/// edge list each time; never kept across selection changes.
#[derive(Clone, Debug, Default)]
pub struct Highlight {
    selected: Option<usize>,
    related_nodes: HashSet<usize>,
}

impl Highlight {
    pub fn build(edges: &[TrafficEdge], selected: Option<usize>) -> Self {
        let mut related_nodes = HashSet::new();
        if let Some(index) = selected {
            related_nodes.insert(index);
            for edge in edges.iter().filter(|edge| edge.touches(index)) {
                related_nodes.insert(edge.from);
                related_nodes.insert(edge.to);
            }
        }

        Self {
            selected,
            related_nodes,
        }
    }

    pub fn is_active(&self) -> bool {
        self.selected.is_some()
    }

    pub fn is_related(&self, index: usize) -> bool {
        self.related_nodes.contains(&index)
    }

    pub fn node_opacity(&self, index: usize) -> f32 {
        if !self.is_active() || self.is_related(index) {
            FOCUSED_OPACITY
        } else {
            DIMMED_NODE_OPACITY
        }
    }

    pub fn edge_style(&self, edge: &TrafficEdge) -> EdgeStyle {
        edge_style_for(edge, self.selected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::topology::EdgeDirection;

    fn edge(from: usize, to: usize, message_count: u64) -> TrafficEdge {
        TrafficEdge {
            from,
            to,
            message_count,
            direction: EdgeDirection::Internal,
        }
    }

    #[test]
    fn no_selection_uses_baseline() {
        let style = edge_style_for(&edge(0, 1, 3), None);
        assert_eq!(style.opacity, 0.6);
        assert!(!style.emphasis);
        assert_eq!(style.width, 3.0);
    }

    #[test]
    fn stroke_width_is_capped() {
        assert_eq!(edge_style_for(&edge(0, 1, 1000), None).width, 6.0);
        assert_eq!(edge_style_for(&edge(0, 1, 0), None).width, 1.0);
        assert_eq!(edge_style_for(&edge(0, 1, u64::MAX), Some(0)).width, 6.0);
    }

    #[test]
    fn selection_focuses_touching_edges() {
        let touching = edge_style_for(&edge(0, 1, 2), Some(1));
        let other = edge_style_for(&edge(2, 3, 2), Some(1));

        assert_eq!(touching.opacity, 1.0);
        assert!(touching.emphasis);
        assert_eq!(other.opacity, 0.15);
        assert!(!other.emphasis);
    }

    #[test]
    fn highlight_dims_unconnected_nodes() {
        let edges = [edge(0, 1, 1), edge(2, 0, 1), edge(3, 4, 1)];

        let idle = Highlight::build(&edges, None);
        assert!((0..5).all(|index| idle.node_opacity(index) == 1.0));

        let focused = Highlight::build(&edges, Some(0));
        assert_eq!(focused.node_opacity(0), 1.0);
        assert_eq!(focused.node_opacity(1), 1.0);
        assert_eq!(focused.node_opacity(2), 1.0);
        assert_eq!(focused.node_opacity(3), 0.25);
        assert_eq!(focused.node_opacity(4), 0.25);
        assert_eq!(focused.edge_style(&edges[2]).opacity, 0.15);
    }

    #[test]
    fn isolated_selection_dims_everything_else() {
        let edges = [edge(1, 2, 1)];
        let highlight = Highlight::build(&edges, Some(0));

        assert_eq!(highlight.node_opacity(0), 1.0);
        assert_eq!(highlight.node_opacity(1), 0.25);
        assert_eq!(highlight.edge_style(&edges[0]).opacity, 0.15);
    }
}
