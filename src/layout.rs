use std::f32::consts::TAU;

use eframe::egui::{Vec2, vec2};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::info;

use crate::topology::{TopologyGraph, TrafficEdge};

pub const FALLBACK_WIDTH: f32 = 800.0;
pub const FALLBACK_HEIGHT: f32 = 500.0;

/// Size of the render surface in pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: FALLBACK_WIDTH,
            height: FALLBACK_HEIGHT,
        }
    }
}

impl Viewport {
    /// A surface that has not been measured yet reports zero (or garbage); such
    /// dimensions fall back to 800x500.
    pub fn measured(width: f32, height: f32) -> Self {
        let usable = |value: f32, fallback: f32| {
            if value.is_finite() && value > 0.0 {
                value
            } else {
                fallback
            }
        };

        Self {
            width: usable(width, FALLBACK_WIDTH),
            height: usable(height, FALLBACK_HEIGHT),
        }
    }

    pub fn center(self) -> Vec2 {
        vec2(self.width * 0.5, self.height * 0.5)
    }

    fn clamp(self, position: Vec2, margin: f32) -> Vec2 {
        let max_x = (self.width - margin).max(margin);
        let max_y = (self.height - margin).max(margin);
        vec2(
            position.x.clamp(margin, max_x),
            position.y.clamp(margin, max_y),
        )
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LayoutConfig {
    pub iterations: usize,
    pub initial_radius: f32,
    pub jitter: f32,
    pub repulsion: f32,
    pub spring_length: f32,
    pub spring_strength: f32,
    pub gravity: f32,
    pub damping: f32,
    pub margin: f32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            iterations: 200,
            initial_radius: 150.0,
            jitter: 20.0,
            repulsion: 3000.0,
            spring_length: 120.0,
            spring_strength: 0.05,
            gravity: 0.01,
            damping: 0.6,
            margin: 40.0,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Body {
    pub position: Vec2,
    pub velocity: Vec2,
}

/// Positions for one layout run, index-aligned with [`TopologyGraph::nodes`].
///
/// The state is owned by the caller: it is seeded, handed to [`layout`], and
/// handed back. Nothing carries over from one snapshot to the next.
#[derive(Clone, Debug, Default)]
pub struct LayoutState {
    viewport: Viewport,
    bodies: Vec<Body>,
    iterations: usize,
}

impl LayoutState {
    /// Circle of radius `initial_radius` around the viewport center, evenly
    /// spaced by index, each node jittered independently on both axes.
    pub fn seeded<R: Rng + ?Sized>(
        node_count: usize,
        viewport: Viewport,
        config: &LayoutConfig,
        rng: &mut R,
    ) -> Self {
        let center = viewport.center();
        let jitter = config.jitter.abs();
        let bodies = (0..node_count)
            .map(|index| {
                let angle = TAU * index as f32 / node_count as f32;
                let radial = vec2(angle.cos(), angle.sin()) * config.initial_radius;
                let offset = vec2(
                    rng.gen_range(-jitter..=jitter),
                    rng.gen_range(-jitter..=jitter),
                );
                Body {
                    position: center + radial + offset,
                    velocity: Vec2::ZERO,
                }
            })
            .collect();

        Self {
            viewport,
            bodies,
            iterations: 0,
        }
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn bodies(&self) -> &[Body] {
        &self.bodies
    }

    pub fn position(&self, index: usize) -> Option<Vec2> {
        self.bodies.get(index).map(|body| body.position)
    }

    pub fn iterations(&self) -> usize {
        self.iterations
    }

    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }
}

/// Source of the placement jitter: reproducible with a seed, otherwise
/// different on every run.
pub fn jitter_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

/// Runs the full fixed-length simulation. There is no early exit: every
/// non-empty layout takes exactly `config.iterations` steps.
pub fn layout(mut state: LayoutState, edges: &[TrafficEdge], config: &LayoutConfig) -> LayoutState {
    if state.is_empty() {
        return state;
    }

    for _ in 0..config.iterations {
        step(&mut state.bodies, edges, state.viewport, config);
        state.iterations += 1;
    }

    state
}

pub fn compute_layout<R: Rng + ?Sized>(
    graph: &TopologyGraph,
    viewport: Viewport,
    config: &LayoutConfig,
    rng: &mut R,
) -> LayoutState {
    let seeded = LayoutState::seeded(graph.node_count(), viewport, config, rng);
    let state = layout(seeded, graph.edges(), config);
    info!(
        nodes = state.len(),
        iterations = state.iterations(),
        width = viewport.width,
        height = viewport.height,
        "computed topology layout"
    );
    state
}

fn step(bodies: &mut [Body], edges: &[TrafficEdge], viewport: Viewport, config: &LayoutConfig) {
    let node_count = bodies.len();

    for i in 0..node_count {
        for j in (i + 1)..node_count {
            let delta = bodies[i].position - bodies[j].position;
            let distance = delta.length().max(1.0);
            let push = delta / distance * (config.repulsion / (distance * distance));
            bodies[i].velocity += push;
            bodies[j].velocity -= push;
        }
    }

    for edge in edges {
        if edge.from >= node_count || edge.to >= node_count {
            continue;
        }

        let delta = bodies[edge.to].position - bodies[edge.from].position;
        let distance = delta.length().max(1.0);
        let pull = delta / distance * ((distance - config.spring_length) * config.spring_strength);
        bodies[edge.from].velocity += pull;
        bodies[edge.to].velocity -= pull;
    }

    let center = viewport.center();
    for body in bodies.iter_mut() {
        body.velocity += (center - body.position) * config.gravity;
    }

    for body in bodies.iter_mut() {
        body.velocity *= config.damping;
        body.position = viewport.clamp(body.position + body.velocity, config.margin);
    }
}
