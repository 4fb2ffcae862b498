use eframe::egui::{RichText, Ui};

use crate::util::{format_count, short_label};

use super::super::ViewModel;
use super::super::render_utils::node_color;

impl ViewModel {
    pub(in crate::app) fn draw_details(&mut self, ui: &mut Ui) {
        ui.heading("Selection Details");
        ui.add_space(6.0);

        let Some(detail) = self.view.selected_detail() else {
            ui.label("Select a node from the graph or the node list.");
            return;
        };

        let graph = self.view.graph();
        let Some(node) = graph.index_of(&detail.id).and_then(|index| graph.node(index)) else {
            ui.label("Selected node no longer exists in this snapshot.");
            return;
        };

        ui.label(
            RichText::new(node.name.as_str())
                .strong()
                .color(node_color(node.kind, node.state.as_deref())),
        );
        ui.small(node.id.as_str());
        ui.add_space(6.0);

        ui.label(format!("Kind: {}", node.kind.label()));
        if let Some(state) = &node.state {
            ui.label(format!("State: {state}"));
        }
        if let Some(email) = &node.email {
            ui.label(format!("Email: {email}"));
        }

        ui.separator();
        ui.label(format!("Sent: {}", format_count(detail.sent)));
        ui.label(format!("Received: {}", format_count(detail.received)));

        ui.separator();
        ui.label(RichText::new("Top partners").strong());
        let mut clicked = None;
        if detail.partners.is_empty() {
            ui.label("No traffic with other nodes.");
        } else {
            for partner in &detail.partners {
                let label = format!(
                    "{}  ({} messages)",
                    short_label(&partner.name, 28),
                    format_count(partner.messages)
                );
                if ui.link(label).on_hover_text(partner.id.as_str()).clicked() {
                    clicked = Some(partner.id.clone());
                }
            }
        }

        ui.add_space(8.0);
        if ui.button("Clear selection").clicked() {
            self.view.select(None);
        }
        if let Some(id) = clicked {
            self.view.select(Some(&id));
        }
    }
}
