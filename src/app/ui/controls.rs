use std::collections::HashSet;

use eframe::egui::{self, RichText, Ui};
use fuzzy_matcher::FuzzyMatcher;
use fuzzy_matcher::skim::SkimMatcherV2;

use crate::topology::{EdgeDirection, NodeKind, NodeRecord};
use crate::util::short_label;

use super::super::ViewModel;
use super::super::render_utils::{direction_color, node_color};

fn fuzzy_match_score(matcher: &SkimMatcherV2, node: &NodeRecord, query: &str) -> Option<i64> {
    let by_name = matcher
        .fuzzy_match(&node.name, query)
        .or_else(|| matcher.fuzzy_match(&node.name.to_lowercase(), &query.to_lowercase()));
    let by_id = matcher.fuzzy_match(&node.id, query);
    by_name.max(by_id)
}

impl ViewModel {
    /// Node indices ordered for the side list: best fuzzy score first, then
    /// by name. An empty query lists every node.
    pub(in crate::app) fn ranked_search_results(&self) -> Vec<usize> {
        let nodes = self.view.graph().nodes();
        let query = self.search.trim();

        if query.is_empty() {
            let mut all = (0..nodes.len()).collect::<Vec<_>>();
            all.sort_by(|a, b| nodes[*a].name.cmp(&nodes[*b].name));
            return all;
        }

        let matcher = SkimMatcherV2::default();
        let mut scored = nodes
            .iter()
            .enumerate()
            .filter_map(|(index, node)| {
                fuzzy_match_score(&matcher, node, query).map(|score| (score, index))
            })
            .collect::<Vec<_>>();
        scored.sort_by(|a, b| {
            b.0.cmp(&a.0)
                .then_with(|| nodes[a.1].name.cmp(&nodes[b.1].name))
        });
        scored.into_iter().map(|(_score, index)| index).collect()
    }

    pub(in crate::app) fn search_matches(&self) -> HashSet<usize> {
        if self.search.trim().is_empty() {
            return HashSet::new();
        }
        self.ranked_search_results().into_iter().collect()
    }

    pub(in crate::app) fn draw_controls(&mut self, ui: &mut Ui) {
        ui.heading("Nodes");
        ui.separator();
        ui.add_space(4.0);

        ui.label("Search (name or id)")
            .on_hover_text("Fuzzy-highlight matching nodes while nothing is selected.");
        ui.text_edit_singleline(&mut self.search);
        ui.add_space(6.0);

        let results = self.ranked_search_results();
        let mut clicked = None;
        egui::ScrollArea::vertical()
            .id_salt("node_list_scroll")
            .max_height((ui.available_height() - 150.0).max(120.0))
            .auto_shrink([false, false])
            .show_rows(ui, 22.0, results.len(), |ui, row_range| {
                for row in row_range {
                    let Some(node) = results
                        .get(row)
                        .and_then(|index| self.view.graph().node(*index))
                    else {
                        continue;
                    };

                    let is_selected = self.view.selected_id() == Some(node.id.as_str());
                    let text = RichText::new(format!("● {}", short_label(&node.name, 32)))
                        .color(node_color(node.kind, node.state.as_deref()));
                    if ui
                        .selectable_label(is_selected, text)
                        .on_hover_text(node.id.as_str())
                        .clicked()
                    {
                        clicked = Some(node.id.clone());
                    }
                }
            });

        if let Some(id) = clicked {
            self.view.select(Some(&id));
        }

        ui.separator();
        self.draw_legend(ui);
    }

    fn draw_legend(&self, ui: &mut Ui) {
        ui.label(RichText::new("Legend").strong());
        ui.horizontal_wrapped(|ui| {
            for (label, color) in [
                ("active", node_color(NodeKind::Agent, Some("active"))),
                ("idle", node_color(NodeKind::Agent, Some("idle"))),
                ("error", node_color(NodeKind::Agent, Some("error"))),
                ("agent", node_color(NodeKind::Agent, None)),
                ("external", node_color(NodeKind::External, None)),
            ] {
                ui.label(RichText::new(format!("● {label}")).color(color));
            }
        });
        ui.horizontal_wrapped(|ui| {
            for direction in [
                EdgeDirection::Internal,
                EdgeDirection::ExternalOutbound,
                EdgeDirection::ExternalInbound,
            ] {
                ui.label(
                    RichText::new(format!("— {}", direction.label()))
                        .color(direction_color(direction)),
                );
            }
        });
    }
}
