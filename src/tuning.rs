//! Game balance knobs
//!
//! Everything a level designer might want to tweak without recompiling.
//! Loaded once at startup; missing fields fall back to defaults.

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::sim::spawner::{SpawnPoint, default_spawn_points};

/// Axis-aligned rectangle of the ball-capturing zone (centre + size)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TargetZoneRect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Default for TargetZoneRect {
    fn default() -> Self {
        Self {
            x: 750.0,
            y: 50.0,
            width: 50.0,
            height: 50.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Downward acceleration (px/ms²)
    pub gravity: f32,
    /// Launch speed of new balls (px/tick)
    pub ball_speed: f32,
    pub ball_lifetime_ms: f64,
    pub spawn_interval_min_ms: f64,
    pub spawn_interval_max_ms: f64,
    pub score_window_ms: f64,
    /// Materials placed for free before the penalty applies
    pub free_materials: usize,
    /// Points deducted per material beyond the free allowance
    pub material_penalty: f64,
    pub base_points: f64,
    pub spawn_points: Vec<SpawnPoint>,
    pub target_zone: TargetZoneRect,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            gravity: GRAVITY,
            ball_speed: BALL_SPEED,
            ball_lifetime_ms: BALL_LIFETIME_MS,
            spawn_interval_min_ms: SPAWN_INTERVAL_MIN_MS,
            spawn_interval_max_ms: SPAWN_INTERVAL_MAX_MS,
            score_window_ms: SCORE_WINDOW_MS,
            free_materials: FREE_MATERIALS,
            material_penalty: MATERIAL_PENALTY,
            base_points: SCORE_BASE_POINTS,
            spawn_points: default_spawn_points(),
            target_zone: TargetZoneRect::default(),
        }
    }
}

impl Tuning {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Non-fatal sanity checks. The game still runs with these values.
    pub fn validate(&self) -> Vec<String> {
        let mut warnings = Vec::new();

        if self.gravity < 0.0 {
            warnings.push(format!("gravity {} points upward", self.gravity));
        }
        if self.ball_speed <= 0.0 {
            warnings.push(format!("ball_speed {} leaves balls at rest", self.ball_speed));
        }
        if self.ball_lifetime_ms <= 0.0 {
            warnings.push(format!(
                "ball_lifetime_ms {} removes balls immediately",
                self.ball_lifetime_ms
            ));
        }
        if self.spawn_interval_min_ms <= 0.0 {
            warnings.push(format!(
                "spawn_interval_min_ms {} must be positive",
                self.spawn_interval_min_ms
            ));
        }
        if self.spawn_interval_max_ms < self.spawn_interval_min_ms {
            warnings.push(format!(
                "spawn_interval_max_ms {} is below spawn_interval_min_ms {}",
                self.spawn_interval_max_ms, self.spawn_interval_min_ms
            ));
        }
        if self.score_window_ms < self.spawn_interval_max_ms {
            warnings.push(format!(
                "score_window_ms {} is shorter than one spawn interval",
                self.score_window_ms
            ));
        }
        if self.spawn_points.is_empty() {
            warnings.push("no spawn points: no balls will appear".to_string());
        }
        for (i, point) in self.spawn_points.iter().enumerate() {
            if !in_arena(point.x, point.y) {
                warnings.push(format!(
                    "spawn point {i} at ({}, {}) is outside the arena",
                    point.x, point.y
                ));
            }
        }
        let zone = &self.target_zone;
        if zone.width <= 0.0 || zone.height <= 0.0 {
            warnings.push("target zone has no area".to_string());
        }
        if !in_arena(zone.x, zone.y) {
            warnings.push(format!(
                "target zone centre ({}, {}) is outside the arena",
                zone.x, zone.y
            ));
        }

        warnings
    }

    /// Log every validation warning
    pub fn report(&self) {
        for warning in self.validate() {
            log::warn!("Tuning: {warning}");
        }
    }

    /// LocalStorage key
    #[cfg(target_arch = "wasm32")]
    const STORAGE_KEY: &'static str = "ballworks_tuning";

    /// Load tuning from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match Self::from_json(&json) {
                    Ok(tuning) => {
                        log::info!("Loaded tuning from LocalStorage");
                        return tuning;
                    }
                    Err(e) => log::warn!("Ignoring stored tuning: {e}"),
                }
            }
        }

        log::info!("Using default tuning");
        Self::default()
    }

    /// Environment variable naming a JSON tuning file (native only)
    #[cfg(not(target_arch = "wasm32"))]
    pub const ENV_VAR: &'static str = "BALLWORKS_TUNING";

    /// Load tuning from the file named by `BALLWORKS_TUNING` (native only)
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        let Ok(path) = std::env::var(Self::ENV_VAR) else {
            log::info!("Using default tuning");
            return Self::default();
        };

        let parsed = std::fs::read_to_string(&path)
            .map_err(|e| e.to_string())
            .and_then(|json| Self::from_json(&json).map_err(|e| e.to_string()));

        match parsed {
            Ok(tuning) => {
                log::info!("Loaded tuning from {path}");
                tuning
            }
            Err(e) => {
                log::warn!("Ignoring tuning file {path}: {e}");
                Self::default()
            }
        }
    }
}

fn in_arena(x: f32, y: f32) -> bool {
    (0.0..=ARENA_WIDTH).contains(&x) && (0.0..=ARENA_HEIGHT).contains(&y)
}
