use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;

use eframe::egui::{self, Context, Vec2};
use rand::rngs::StdRng;
use tracing::{error, info};

use crate::engine::TopologyView;
use crate::layout::Viewport;
use crate::topology::{Snapshot, SnapshotSource, load_snapshot};

mod graph;
mod render_utils;
mod ui;

pub struct TopologyApp {
    source: SnapshotSource,
    seed: Option<u64>,
    state: AppState,
    reload_rx: Option<Receiver<Result<Snapshot, String>>>,
}

enum AppState {
    Loading {
        rx: Receiver<Result<Snapshot, String>>,
    },
    Ready(Box<ViewModel>),
    Error(String),
}

struct ViewModel {
    view: TopologyView,
    rng: StdRng,
    search: String,
    pan: Vec2,
    zoom: f32,
    canvas_viewport: Option<Viewport>,
    relayout_requested: bool,
}

impl TopologyApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, source: SnapshotSource, seed: Option<u64>) -> Self {
        let state = Self::start_load(source.clone());
        Self {
            source,
            seed,
            state,
            reload_rx: None,
        }
    }

    fn spawn_load(source: SnapshotSource) -> Receiver<Result<Snapshot, String>> {
        let (tx, rx) = mpsc::channel();

        thread::spawn(move || {
            let result = load_snapshot(&source).map_err(|error| format!("{error:#}"));
            let _ = tx.send(result);
        });

        rx
    }

    fn start_load(source: SnapshotSource) -> AppState {
        AppState::Loading {
            rx: Self::spawn_load(source),
        }
    }

    fn failed(message: String) -> AppState {
        error!(%message, "failed to load topology snapshot");
        AppState::Error(message)
    }
}

impl eframe::App for TopologyApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        let mut transition = None;

        match &mut self.state {
            AppState::Loading { rx } => {
                if let Ok(result) = rx.try_recv() {
                    transition = Some(match result {
                        Ok(snapshot) => {
                            AppState::Ready(Box::new(ViewModel::new(&snapshot, self.seed)))
                        }
                        Err(message) => Self::failed(message),
                    });
                }

                egui::CentralPanel::default().show(ctx, |ui| {
                    ui.vertical_centered(|ui| {
                        ui.add_space(120.0);
                        ui.heading("Loading agent topology...");
                        ui.add_space(8.0);
                        ui.spinner();
                    });
                });
                ctx.request_repaint();
            }
            AppState::Error(message) => {
                egui::CentralPanel::default().show(ctx, |ui| {
                    ui.heading("Failed to load topology snapshot");
                    ui.add_space(6.0);
                    ui.label(message.as_str());
                    ui.add_space(10.0);
                    if ui.button("Retry").clicked() {
                        transition = Some(Self::start_load(self.source.clone()));
                    }
                });
            }
            AppState::Ready(model) => {
                let mut reload_requested = false;
                let is_reloading = self.reload_rx.is_some();
                model.show(ctx, &self.source, &mut reload_requested, is_reloading);

                if reload_requested && self.reload_rx.is_none() && self.source.is_reloadable() {
                    info!(source = %self.source, "reloading topology snapshot");
                    self.reload_rx = Some(Self::spawn_load(self.source.clone()));
                }

                if let Some(rx) = self.reload_rx.take() {
                    match rx.try_recv() {
                        Ok(Ok(snapshot)) => model.replace_snapshot(&snapshot),
                        Ok(Err(message)) => transition = Some(Self::failed(message)),
                        Err(TryRecvError::Empty) => {
                            self.reload_rx = Some(rx);
                            ctx.request_repaint();
                        }
                        Err(TryRecvError::Disconnected) => {
                            transition = Some(Self::failed(
                                "Background load worker disconnected".to_owned(),
                            ));
                        }
                    }
                }
            }
        }

        if let Some(next_state) = transition {
            self.reload_rx = None;
            self.state = next_state;
        }
    }
}
