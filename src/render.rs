//! The boundary between the layout engine and whatever draws it.
//!
//! A [`Renderer`] is handed a [`RenderFrame`] on every paint and may report a
//! single [`Click`] back. Clicks only ever change the selection.

use eframe::egui::Vec2;
use serde::Serialize;

use crate::layout::Viewport;
use crate::selection::EdgeStyle;
use crate::topology::{EdgeDirection, NodeRecord};

/// A node with its final layout position and velocity, in node order.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct PositionedNode<'a> {
    #[serde(flatten)]
    pub node: &'a NodeRecord,
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
}

impl PositionedNode<'_> {
    pub fn position(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }
}

#[derive(Clone, Copy, Debug)]
pub struct RenderNode<'a> {
    pub placed: PositionedNode<'a>,
    pub opacity: f32,
    pub selected: bool,
    pub related: bool,
}

#[derive(Clone, Copy, Debug)]
pub struct RenderEdge {
    pub from: usize,
    pub to: usize,
    pub start: Vec2,
    pub end: Vec2,
    pub message_count: u64,
    pub direction: EdgeDirection,
    pub style: EdgeStyle,
}

#[derive(Clone, Debug)]
pub struct RenderFrame<'a> {
    pub viewport: Viewport,
    pub nodes: Vec<RenderNode<'a>>,
    pub edges: Vec<RenderEdge>,
    pub selected: Option<&'a str>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Click {
    Node(String),
    Background,
}

pub trait Renderer {
    fn render(&mut self, frame: &RenderFrame<'_>) -> Option<Click>;
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;

    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use serde_json::json;

    use super::*;
    use crate::engine::TopologyView;
    use crate::layout::LayoutConfig;
    use crate::topology::Snapshot;

    /// Replays queued clicks and remembers what each paint looked like.
    #[derive(Default)]
    struct RecordingRenderer {
        clicks: VecDeque<Click>,
        painted: Vec<(Option<String>, Vec<f32>, Vec<f32>)>,
    }

    impl Renderer for RecordingRenderer {
        fn render(&mut self, frame: &RenderFrame<'_>) -> Option<Click> {
            self.painted.push((
                frame.selected.map(str::to_owned),
                frame.nodes.iter().map(|node| node.opacity).collect(),
                frame.edges.iter().map(|edge| edge.style.opacity).collect(),
            ));
            self.clicks.pop_front()
        }
    }

    fn view() -> TopologyView {
        let snapshot = Snapshot::from_value(&json!({
            "nodes": [{"id": "a"}, {"id": "b"}, {"id": "c"}, {"id": "d"}],
            "edges": [
                {"from": "a", "to": "b", "messageCount": 2},
                {"from": "c", "to": "d", "messageCount": 2},
                {"from": "a", "to": "nowhere", "messageCount": 2}
            ]
        }));
        TopologyView::new(
            &snapshot,
            Viewport::default(),
            LayoutConfig::default(),
            &mut StdRng::seed_from_u64(21),
        )
    }

    #[test]
    fn clicks_drive_selection_between_paints() {
        let mut view = view();
        let mut renderer = RecordingRenderer {
            clicks: VecDeque::from([
                Click::Node("a".to_owned()),
                Click::Node("a".to_owned()),
                Click::Node("c".to_owned()),
                Click::Background,
            ]),
            ..RecordingRenderer::default()
        };

        for _ in 0..5 {
            view.paint(&mut renderer);
        }

        let selections = renderer
            .painted
            .iter()
            .map(|(selected, _, _)| selected.as_deref())
            .collect::<Vec<_>>();
        assert_eq!(selections, vec![None, Some("a"), None, Some("c"), None]);

        let (_, node_opacity, edge_opacity) = &renderer.painted[1];
        assert_eq!(node_opacity, &vec![1.0, 1.0, 0.25, 0.25]);
        assert_eq!(edge_opacity, &vec![1.0, 0.15]);

        let (_, node_opacity, edge_opacity) = &renderer.painted[0];
        assert!(node_opacity.iter().all(|opacity| *opacity == 1.0));
        assert!(edge_opacity.iter().all(|opacity| *opacity == 0.6));
    }

    #[test]
    fn frame_edges_only_reference_known_nodes() {
        let view = view();
        let frame = view.frame();

        assert_eq!(frame.nodes.len(), 4);
        assert_eq!(frame.edges.len(), 2);
        for edge in &frame.edges {
            assert_eq!(edge.start, frame.nodes[edge.from].placed.position());
            assert_eq!(edge.end, frame.nodes[edge.to].placed.position());
        }
    }

    #[test]
    fn click_on_unknown_node_clears_selection() {
        let mut view = view();
        view.select(Some("b"));
        let mut renderer = RecordingRenderer {
            clicks: VecDeque::from([Click::Node("ghost".to_owned())]),
            ..RecordingRenderer::default()
        };

        view.paint(&mut renderer);
        assert_eq!(view.selected_id(), None);
    }
}
