//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (by body ID)
//! - No rendering or platform dependencies

pub mod body;
pub mod collision;
pub mod drag;
pub mod forces;
pub mod materials;
pub mod rules;
pub mod scheduler;
pub mod scoring;
pub mod spawner;
pub mod state;
pub mod store;
pub mod tick;

pub use body::{Body, BodyId, BodyKind, Shape};
pub use collision::CollisionResult;
pub use drag::DragState;
pub use materials::{Material, MaterialKind, MaterialSnapshot};
pub use scheduler::{Scheduler, Task};
pub use scoring::{Resolution, ScoreAggregator, WindowState};
pub use spawner::{Direction, SpawnPoint};
pub use state::{GameEvent, GameState};
pub use store::BodyStore;
pub use tick::{MaterialDrop, PointerEvent, TickInput, tick};
