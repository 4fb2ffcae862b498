mod detail;
mod style;

use tracing::warn;

use crate::topology::TopologyGraph;

pub use detail::{NodeDetail, Partner, detail_for};
pub use style::{EdgeStyle, Highlight, edge_style_for};

/// The currently selected node, held by id so it can be checked against
/// whichever graph is current.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Selection {
    selected: Option<String>,
}

impl Selection {
    pub fn selected_id(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn selected_index(&self, graph: &TopologyGraph) -> Option<usize> {
        self.selected
            .as_deref()
            .and_then(|id| graph.index_of(id))
    }

    /// Selecting the node that is already selected deselects it. Ids that are
    /// not in `graph` resolve to no selection.
    pub fn select(&mut self, graph: &TopologyGraph, id: Option<&str>) {
        let Some(id) = id else {
            self.selected = None;
            return;
        };

        if !graph.contains(id) {
            warn!(id, "selection names a node that is not in the current graph");
            self.selected = None;
            return;
        }

        if self.selected.as_deref() == Some(id) {
            self.selected = None;
        } else {
            self.selected = Some(id.to_owned());
        }
    }

    pub fn clear(&mut self) {
        self.selected = None;
    }
}
