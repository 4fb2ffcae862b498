use eframe::egui::{self, Align, Context, Layout, Vec2};

use crate::engine::TopologyView;
use crate::layout::{LayoutConfig, Viewport, jitter_rng};
use crate::topology::{Snapshot, SnapshotSource};
use crate::util::format_count;

use super::super::ViewModel;

impl ViewModel {
    pub(in crate::app) fn new(snapshot: &Snapshot, seed: Option<u64>) -> Self {
        let mut rng = jitter_rng(seed);
        let view = TopologyView::new(snapshot, Viewport::default(), LayoutConfig::default(), &mut rng);

        Self {
            view,
            rng,
            search: String::new(),
            pan: Vec2::ZERO,
            zoom: 1.0,
            canvas_viewport: None,
            relayout_requested: false,
        }
    }

    pub(in crate::app) fn replace_snapshot(&mut self, snapshot: &Snapshot) {
        let viewport = self.canvas_viewport.unwrap_or_default();
        self.view.replace_snapshot(snapshot, viewport, &mut self.rng);
        self.pan = Vec2::ZERO;
        self.zoom = 1.0;
    }

    pub(in crate::app) fn relayout(&mut self) {
        let viewport = self.canvas_viewport.unwrap_or_default();
        self.view.relayout(viewport, &mut self.rng);
        self.relayout_requested = false;
    }

    pub(in crate::app) fn show(
        &mut self,
        ctx: &Context,
        source: &SnapshotSource,
        reload_requested: &mut bool,
        is_loading: bool,
    ) {
        if self.relayout_requested {
            self.relayout();
        }

        egui::TopBottomPanel::top("top_bar")
            .resizable(false)
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.heading("Agent topology");
                    ui.separator();
                    ui.label(format!("source: {source}"));
                    ui.label(format!("nodes: {}", self.view.graph().node_count()));
                    ui.label(format!("edges: {}", self.view.graph().edge_count()));
                    let dropped = self.view.graph().dropped_edge_count();
                    if dropped > 0 {
                        ui.label(format!("dropped: {dropped}")).on_hover_text(
                            "Edges whose endpoints are missing from the node list are not drawn.",
                        );
                    }

                    let reload_button = ui.add_enabled(
                        !is_loading && source.is_reloadable(),
                        egui::Button::new("Reload snapshot"),
                    );
                    if reload_button.clicked() {
                        *reload_requested = true;
                    }
                    if ui.button("Re-layout").clicked() {
                        self.relayout_requested = true;
                    }
                    if ui.button("Reset view").clicked() {
                        self.pan = Vec2::ZERO;
                        self.zoom = 1.0;
                    }

                    ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                        ui.label(self.traffic_text());
                    });
                });
            });

        egui::SidePanel::left("controls")
            .resizable(true)
            .default_width(300.0)
            .show(ctx, |ui| self.draw_controls(ui));

        egui::SidePanel::right("details")
            .resizable(true)
            .default_width(320.0)
            .show(ctx, |ui| self.draw_details(ui));

        egui::CentralPanel::default().show(ctx, |ui| {
            if is_loading {
                ui.vertical_centered(|ui| {
                    ui.add_space(120.0);
                    ui.heading("Reloading agent topology...");
                    ui.add_space(8.0);
                    ui.spinner();
                });
            } else {
                self.draw_graph(ui);
            }
        });
    }

    fn traffic_text(&self) -> String {
        let stats = self.view.graph().stats();
        let origin = if self.view.graph().stats_derived() {
            " (from edges)"
        } else {
            ""
        };
        format!(
            "messages {}  |  internal {}  |  outbound {}  |  inbound {}{origin}",
            format_count(stats.total_messages),
            format_count(stats.internal_messages),
            format_count(stats.external_outbound),
            format_count(stats.external_inbound),
        )
    }
}
