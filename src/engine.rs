use rand::Rng;

use crate::layout::{LayoutConfig, LayoutState, Viewport, compute_layout};
use crate::render::{Click, PositionedNode, RenderEdge, RenderFrame, RenderNode, Renderer};
use crate::selection::{Highlight, NodeDetail, Selection, detail_for};
use crate::topology::{Snapshot, TopologyGraph};

/// Graph, layout and selection for the snapshot currently on screen.
pub struct TopologyView {
    graph: TopologyGraph,
    layout: LayoutState,
    selection: Selection,
    config: LayoutConfig,
}

impl TopologyView {
    pub fn new<R: Rng + ?Sized>(
        snapshot: &Snapshot,
        viewport: Viewport,
        config: LayoutConfig,
        rng: &mut R,
    ) -> Self {
        let graph = TopologyGraph::build(snapshot);
        let layout = compute_layout(&graph, viewport, &config, rng);
        Self {
            graph,
            layout,
            selection: Selection::default(),
            config,
        }
    }

    /// Swaps in a new snapshot. The previous selection never survives.
    pub fn replace_snapshot<R: Rng + ?Sized>(
        &mut self,
        snapshot: &Snapshot,
        viewport: Viewport,
        rng: &mut R,
    ) {
        self.graph = TopologyGraph::build(snapshot);
        self.layout = compute_layout(&self.graph, viewport, &self.config, rng);
        self.selection.clear();
    }

    /// Lays the same graph out again from scratch.
    pub fn relayout<R: Rng + ?Sized>(&mut self, viewport: Viewport, rng: &mut R) {
        self.layout = compute_layout(&self.graph, viewport, &self.config, rng);
    }

    pub fn graph(&self) -> &TopologyGraph {
        &self.graph
    }

    pub fn layout(&self) -> &LayoutState {
        &self.layout
    }

    pub fn selected_id(&self) -> Option<&str> {
        self.selection.selected_id()
    }

    pub fn select(&mut self, id: Option<&str>) {
        self.selection.select(&self.graph, id);
    }

    pub fn detail_for(&self, id: &str) -> Option<NodeDetail> {
        detail_for(&self.graph, id)
    }

    pub fn selected_detail(&self) -> Option<NodeDetail> {
        self.selected_id().and_then(|id| self.detail_for(id))
    }

    pub fn positioned_nodes(&self) -> Vec<PositionedNode<'_>> {
        self.graph
            .nodes()
            .iter()
            .zip(self.layout.bodies())
            .map(|(node, body)| PositionedNode {
                node,
                x: body.position.x,
                y: body.position.y,
                vx: body.velocity.x,
                vy: body.velocity.y,
            })
            .collect()
    }

    pub fn frame(&self) -> RenderFrame<'_> {
        let selected_index = self.selection.selected_index(&self.graph);
        let highlight = Highlight::build(self.graph.edges(), selected_index);

        let nodes = self
            .positioned_nodes()
            .into_iter()
            .enumerate()
            .map(|(index, placed)| RenderNode {
                placed,
                opacity: highlight.node_opacity(index),
                selected: selected_index == Some(index),
                related: highlight.is_active() && highlight.is_related(index),
            })
            .collect();

        let edges = self
            .graph
            .edges()
            .iter()
            .filter_map(|edge| {
                Some(RenderEdge {
                    from: edge.from,
                    to: edge.to,
                    start: self.layout.position(edge.from)?,
                    end: self.layout.position(edge.to)?,
                    message_count: edge.message_count,
                    direction: edge.direction,
                    style: highlight.edge_style(edge),
                })
            })
            .collect();

        RenderFrame {
            viewport: self.layout.viewport(),
            nodes,
            edges,
            selected: self.selected_id(),
        }
    }

    pub fn apply_click(&mut self, click: Click) {
        match click {
            Click::Node(id) => self.select(Some(&id)),
            Click::Background => self.select(None),
        }
    }

    pub fn paint<R: Renderer + ?Sized>(&mut self, renderer: &mut R) {
        let click = renderer.render(&self.frame());
        if let Some(click) = click {
            self.apply_click(click);
        }
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use serde_json::json;

    use super::*;

    fn snapshot(value: serde_json::Value) -> Snapshot {
        Snapshot::from_value(&value)
    }

    fn view(value: serde_json::Value) -> TopologyView {
        TopologyView::new(
            &snapshot(value),
            Viewport::default(),
            LayoutConfig::default(),
            &mut StdRng::seed_from_u64(99),
        )
    }

    #[test]
    fn empty_snapshot_yields_empty_layout() {
        let view = view(json!({"nodes": [], "edges": []}));
        assert!(view.positioned_nodes().is_empty());
        assert!(view.frame().nodes.is_empty());
        assert_eq!(view.selected_detail(), None);
    }

    #[test]
    fn build_layout_detail_never_references_missing_ids() {
        let view = view(json!({
            "nodes": [{"id": "X"}, {"id": "Z"}],
            "edges": [
                {"from": "X", "to": "Y", "messageCount": 3},
                {"from": "Z", "to": "X", "messageCount": 1}
            ]
        }));

        let placed = view.positioned_nodes();
        assert_eq!(placed.len(), 2);
        for node in &placed {
            let detail = view.detail_for(&node.node.id).expect("placed node has detail");
            assert!(detail.partners.iter().all(|partner| view.graph().contains(&partner.id)));
        }

        let detail = view.detail_for("X").expect("X exists");
        assert_eq!(detail.sent, 0);
        assert_eq!(detail.received, 1);
    }

    #[test]
    fn replacing_snapshot_clears_selection() {
        let mut view = view(json!({"nodes": [{"id": "a"}, {"id": "b"}]}));
        view.select(Some("a"));
        assert_eq!(view.selected_id(), Some("a"));

        view.replace_snapshot(
            &snapshot(json!({"nodes": [{"id": "a"}, {"id": "c"}]})),
            Viewport::default(),
            &mut StdRng::seed_from_u64(1),
        );
        assert_eq!(view.selected_id(), None);
        assert_eq!(view.positioned_nodes().len(), 2);
    }

    #[test]
    fn relayout_keeps_selection() {
        let mut view = view(json!({"nodes": [{"id": "a"}, {"id": "b"}]}));
        view.select(Some("b"));
        view.relayout(Viewport::measured(1200.0, 900.0), &mut StdRng::seed_from_u64(2));

        assert_eq!(view.selected_id(), Some("b"));
        assert_eq!(view.layout().viewport().width, 1200.0);
        assert_eq!(view.layout().iterations(), 200);
    }

    #[test]
    fn positioned_nodes_follow_node_order() {
        let view = view(json!({
            "nodes": [
                {"id": "first", "name": "First", "kind": "agent", "state": "idle"},
                {"id": "second", "kind": "external", "email": "ops@example.com"}
            ]
        }));

        let placed = view.positioned_nodes();
        assert_eq!(placed[0].node.id, "first");
        assert_eq!(placed[1].node.email.as_deref(), Some("ops@example.com"));
        assert_eq!(placed[0].position(), view.layout().bodies()[0].position);
    }
}
