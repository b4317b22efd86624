//! Game state and world lifecycle
//!
//! `GameState` owns everything a session needs: the body store, the lists of
//! balls and force-field materials, the task scheduler and the score
//! aggregator. The host drives it through `tick` and reads results back
//! through `drain_events`.

use std::collections::BTreeSet;

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::body::{Body, BodyId, BodyKind, Shape};
use super::drag::DragState;
use super::materials::{self, Material, MaterialKind, MaterialSnapshot};
use super::scheduler::{Scheduled, Scheduler, Task};
use super::scoring::{Resolution, ScoreAggregator, ScoringParams};
use super::spawner;
use super::store::BodyStore;
use crate::consts::*;
use crate::tuning::{TargetZoneRect, Tuning};

/// Walls sit this far outside the visible arena edge
const WALL_OVERHANG: f32 = 20.0;

/// Notifications for the host, drained once per frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    /// A ball reached the target zone
    BallScored { ball: BodyId, at_ms: f64 },
    /// A scoring window closed
    ScoreResolved { resolution: Resolution, score: f64 },
}

/// Complete simulation state for one session
#[derive(Debug, Clone)]
pub struct GameState {
    /// Seed for the spawn-cadence RNG
    pub seed: u64,
    /// Balance knobs, fixed at construction
    pub tuning: Tuning,
    /// Simulation clock
    pub time_ms: f64,
    pub time_ticks: u64,
    pub bodies: BodyStore,
    /// Live balls (ascending id)
    pub balls: Vec<BodyId>,
    /// Fan roots
    pub fans: Vec<BodyId>,
    /// Vortex roots
    pub vortices: Vec<BodyId>,
    /// Placed materials in placement order
    pub materials: Vec<Material>,
    pub scheduler: Scheduler,
    pub scoring: ScoreAggregator,
    /// Material currently held by the pointer
    pub drag: Option<DragState>,
    /// Unordered pairs (low id first) touching at the end of the last tick
    pub contacts: BTreeSet<(BodyId, BodyId)>,
    events: Vec<GameEvent>,
    rng: Pcg32,
    next_id: BodyId,
}

impl GameState {
    /// Create a new session: walls, target zone and running spawners
    pub fn new(seed: u64, tuning: Tuning) -> Self {
        let scoring = ScoreAggregator::new(ScoringParams::from_tuning(&tuning));
        let mut state = Self {
            seed,
            tuning,
            time_ms: 0.0,
            time_ticks: 0,
            bodies: BodyStore::new(),
            balls: Vec::new(),
            fans: Vec::new(),
            vortices: Vec::new(),
            materials: Vec::new(),
            scheduler: Scheduler::new(),
            scoring,
            drag: None,
            contacts: BTreeSet::new(),
            events: Vec::new(),
            rng: Pcg32::seed_from_u64(seed),
            next_id: 1,
        };

        state.populate();
        log::info!(
            "Session started (seed {seed}, {} spawn points)",
            state.tuning.spawn_points.len()
        );
        state
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> BodyId {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    fn populate(&mut self) {
        self.create_walls();
        let zone = self.tuning.target_zone;
        self.create_target_zone(zone);
        self.start_spawners();
    }

    /// Invisible static walls just outside each arena edge
    pub fn create_walls(&mut self) {
        let t = WALL_THICKNESS;
        let (w, h) = (ARENA_WIDTH, ARENA_HEIGHT);
        let walls = [
            (Vec2::new(w / 2.0, -WALL_OVERHANG), Vec2::new(w, t)),
            (Vec2::new(w / 2.0, h + WALL_OVERHANG), Vec2::new(w, t)),
            (Vec2::new(w + WALL_OVERHANG, h / 2.0), Vec2::new(t, h)),
            (Vec2::new(-WALL_OVERHANG, h / 2.0), Vec2::new(t, h)),
        ];

        for (pos, size) in walls {
            let id = self.next_entity_id();
            self.bodies.add(
                Body::new(id, BodyKind::Wall, Shape::rectangle(size.x, size.y), pos).with_static(),
            );
        }
    }

    pub fn create_target_zone(&mut self, zone: TargetZoneRect) -> BodyId {
        let id = self.next_entity_id();
        self.bodies.add(
            Body::new(
                id,
                BodyKind::TargetZone,
                Shape::rectangle(zone.width, zone.height),
                Vec2::new(zone.x, zone.y),
            )
            .with_static()
            .with_sensor(),
        );
        id
    }

    /// Schedule the first spawn of every spawn point
    pub fn start_spawners(&mut self) {
        for spawn_index in 0..self.tuning.spawn_points.len() {
            let due = self.time_ms + spawner::next_interval(&mut self.rng, &self.tuning);
            self.scheduler.schedule(due, Task::SpawnBall { spawn_index });
        }
    }

    /// Place a material by palette name. Unknown names create nothing.
    pub fn add_material(&mut self, kind: &str, x: f32, y: f32) -> Option<BodyId> {
        let Some(kind) = MaterialKind::from_str(kind) else {
            log::debug!("Ignoring unknown material type {kind:?}");
            return None;
        };
        Some(self.place_material(kind, Vec2::new(x, y)))
    }

    pub fn place_material(&mut self, kind: MaterialKind, pos: Vec2) -> BodyId {
        let built = materials::build(kind, pos, || self.next_entity_id());
        let id = built.root.id;

        self.bodies.add(built.root);
        for part in built.parts {
            self.bodies.add(part);
        }
        match kind {
            MaterialKind::Fan => self.fans.push(id),
            MaterialKind::Vortex => self.vortices.push(id),
            _ => {}
        }
        self.materials.push(Material {
            id,
            kind,
            x: pos.x,
            y: pos.y,
        });

        log::info!("Placed {} at ({:.0}, {:.0})", kind.as_str(), pos.x, pos.y);
        id
    }

    /// Current material layout, with positions as they are now (after drags)
    pub fn material_snapshot(&self) -> Vec<MaterialSnapshot> {
        self.materials
            .iter()
            .filter_map(|m| {
                self.bodies.get(m.id).map(|body| MaterialSnapshot {
                    id: m.id,
                    kind: m.kind,
                    pos: body.pos,
                })
            })
            .collect()
    }

    /// Emit a ball from a spawn point and queue its expiry and the point's
    /// next spawn. `at_ms` is the scheduled spawn time.
    pub fn spawn_ball(&mut self, spawn_index: usize, at_ms: f64) -> Option<BodyId> {
        let point = *self.tuning.spawn_points.get(spawn_index)?;
        let id = self.next_entity_id();
        let ball = spawner::make_ball(id, &point, &self.tuning);

        if !self.bodies.add(ball) {
            return None;
        }
        self.balls.push(id);
        self.scheduler
            .schedule(at_ms + self.tuning.ball_lifetime_ms, Task::ExpireBall { ball: id });

        let next = at_ms + spawner::next_interval(&mut self.rng, &self.tuning);
        self.scheduler.schedule(next, Task::SpawnBall { spawn_index });

        log::debug!("Spawned ball {id} at spawn point {spawn_index}");
        Some(id)
    }

    /// Remove a ball and everything that refers to it
    pub fn remove_ball(&mut self, id: BodyId) -> bool {
        let Ok(index) = self.balls.binary_search(&id) else {
            return false;
        };
        self.balls.remove(index);
        self.bodies.remove(id);
        self.scheduler.cancel_body(id);
        true
    }

    /// Ball reached the target zone
    pub fn capture_ball(&mut self, id: BodyId) {
        if !self.remove_ball(id) {
            return;
        }
        log::debug!("Ball {id} captured at {:.0} ms", self.time_ms);
        self.events.push(GameEvent::BallScored {
            ball: id,
            at_ms: self.time_ms,
        });

        if self.scoring.record_clear() {
            let due = self.time_ms + self.tuning.score_window_ms;
            self.scheduler.schedule(due, Task::ResolveScoreWindow);
        }
    }

    pub fn resolve_score_window(&mut self) {
        let layout = self.material_snapshot();
        let Some(resolution) = self.scoring.resolve(&layout) else {
            return;
        };

        let score = self.scoring.score();
        match resolution {
            Resolution::Stalled { cleared } => {
                log::warn!("Scoring window stalled after {cleared} clears")
            }
            _ => log::info!("Score window closed: {resolution:?}, score {score:.0}"),
        }
        self.events.push(GameEvent::ScoreResolved { resolution, score });
    }

    /// Fire one scheduled task. Tasks for bodies that no longer exist are no-ops.
    pub fn run_task(&mut self, scheduled: Scheduled) {
        match scheduled.task {
            Task::SpawnBall { spawn_index } => {
                self.spawn_ball(spawn_index, scheduled.due_ms);
            }
            Task::ExpireBall { ball } => {
                if self.remove_ball(ball) {
                    log::debug!("Ball {ball} expired");
                }
            }
            Task::ResolveScoreWindow => self.resolve_score_window(),
        }
    }

    /// Tear down every body and timer, then rebuild the starting world.
    /// The displayed score survives.
    pub fn clear(&mut self) {
        self.scheduler.cancel_all();
        self.scoring.cancel_window();
        self.drag = None;
        self.bodies.clear();
        self.balls.clear();
        self.fans.clear();
        self.vortices.clear();
        self.materials.clear();
        self.contacts.clear();

        self.populate();
        log::info!("World cleared");
    }

    /// Take all events produced since the last call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn score(&self) -> f64 {
        self.scoring.score()
    }

    pub fn display_score(&self) -> i64 {
        self.scoring.display_score()
    }
}
