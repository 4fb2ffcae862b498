use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

use crate::engine::TopologyView;

pub fn layout_json(view: &TopologyView) -> Result<String> {
    serde_json::to_string_pretty(&view.positioned_nodes()).context("failed to encode layout")
}

/// Writes the positioned node list to `target`, or stdout for `-`.
pub fn export_layout(view: &TopologyView, target: &Path) -> Result<()> {
    let mut encoded = layout_json(view)?;
    encoded.push('\n');

    if target == Path::new("-") {
        let mut stdout = std::io::stdout().lock();
        stdout
            .write_all(encoded.as_bytes())
            .context("failed to write layout to stdout")?;
        return Ok(());
    }

    std::fs::write(target, encoded)
        .with_context(|| format!("failed to write layout to {}", target.display()))?;
    info!(target = %target.display(), nodes = view.graph().node_count(), "exported layout");
    Ok(())
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use serde_json::{Value, json};

    use super::*;
    use crate::layout::{LayoutConfig, Viewport};
    use crate::topology::Snapshot;

    #[test]
    fn encodes_positions_with_original_fields() {
        let snapshot = Snapshot::from_value(&json!({
            "nodes": [
                {"id": "a", "name": "Alpha", "kind": "agent", "state": "active"},
                {"id": "ext", "kind": "external", "email": "x@example.com"}
            ],
            "edges": [{"from": "a", "to": "ext", "messageCount": 3, "direction": "external_outbound"}]
        }));
        let view = TopologyView::new(
            &snapshot,
            Viewport::default(),
            LayoutConfig::default(),
            &mut StdRng::seed_from_u64(4),
        );

        let encoded: Value = serde_json::from_str(&layout_json(&view).expect("encode")).expect("json");
        let entries = encoded.as_array().expect("array");
        assert_eq!(entries.len(), 2);

        assert_eq!(entries[0]["id"], "a");
        assert_eq!(entries[0]["name"], "Alpha");
        assert_eq!(entries[0]["kind"], "agent");
        assert_eq!(entries[0]["state"], "active");
        assert!(entries[0].get("email").is_none());
        for key in ["x", "y", "vx", "vy"] {
            assert!(entries[0][key].is_number(), "{key} missing");
        }

        assert_eq!(entries[1]["kind"], "external");
        assert_eq!(entries[1]["name"], "ext");
        assert_eq!(entries[1]["email"], "x@example.com");
    }

    #[test]
    fn empty_view_exports_empty_list() {
        let view = TopologyView::new(
            &Snapshot::default(),
            Viewport::default(),
            LayoutConfig::default(),
            &mut StdRng::seed_from_u64(4),
        );
        assert_eq!(layout_json(&view).expect("encode").trim(), "[]");
    }
}
