//! Windowed, hysteretic scoring
//!
//! Ball clears arrive as a noisy stream. They are batched into a fixed
//! window; at the end of the window the clear count is compared with how many
//! balls the spawners could have produced, and turned into points. The score
//! only goes down when the player has changed the material layout since the
//! last accepted score, or when a window is poor enough to reset it.

use serde::{Deserialize, Serialize};

use super::materials::MaterialSnapshot;
use crate::tuning::Tuning;

/// Above this share of the theoretical maximum the window never resolves
const STALL_RATIO: f64 = 3.0;
/// Below this share of the theoretical minimum the score resets
const RESET_RATIO: f64 = 0.5;

/// Inputs to the points formula, fixed for a session
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoringParams {
    pub window_ms: f64,
    pub min_interval_ms: f64,
    pub max_interval_ms: f64,
    pub spawn_points: usize,
    pub free_materials: usize,
    pub material_penalty: f64,
    pub base_points: f64,
}

impl ScoringParams {
    pub fn from_tuning(tuning: &Tuning) -> Self {
        Self {
            window_ms: tuning.score_window_ms,
            min_interval_ms: tuning.spawn_interval_min_ms,
            max_interval_ms: tuning.spawn_interval_max_ms,
            spawn_points: tuning.spawn_points.len(),
            free_materials: tuning.free_materials,
            material_penalty: tuning.material_penalty,
            base_points: tuning.base_points,
        }
    }

    /// Most balls the spawners can emit in one window
    pub fn max_balls(&self) -> f64 {
        self.window_ms / self.min_interval_ms * self.spawn_points as f64
    }

    /// Fewest balls the spawners emit in one window (at least one)
    pub fn min_balls(&self) -> f64 {
        (self.window_ms / self.max_interval_ms * self.spawn_points as f64)
            .floor()
            .max(1.0)
    }

    /// Points for a window with ratio `min_ratio` of the guaranteed ball
    /// count, less the per-material penalty. May be negative.
    pub fn points_for(&self, min_ratio: f64, material_count: usize) -> f64 {
        let base = if min_ratio > 1.0 {
            self.base_points * (1.0 + min_ratio.ln())
        } else {
            self.base_points.powf(min_ratio)
        };
        let extra = material_count.saturating_sub(self.free_materials) as f64;
        base - self.material_penalty * extra
    }
}

/// Progress of the current scoring window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WindowState {
    /// No window open; the next clear opens one
    Idle,
    /// Window open and collecting clears
    Counting { cleared: u32 },
    /// Too many clears to be plausible; the window never resolves
    Stalled { cleared: u32 },
}

/// Outcome of closing a window
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Resolution {
    /// Too few clears: score reset to zero
    Rejected { cleared: u32 },
    /// Too many clears: window left open indefinitely
    Stalled { cleared: u32 },
    /// Score replaced by `points` (clamped at zero)
    Accepted { cleared: u32, points: f64 },
    /// Lower points on an unchanged layout: previous score kept
    Held { cleared: u32, points: f64 },
}

#[derive(Debug, Clone)]
pub struct ScoreAggregator {
    params: ScoringParams,
    state: WindowState,
    score: f64,
    /// Layout seen at the last accepted or reset score (`None` until then)
    snapshot: Option<Vec<MaterialSnapshot>>,
}

impl ScoreAggregator {
    pub fn new(params: ScoringParams) -> Self {
        Self {
            params,
            state: WindowState::Idle,
            score: 0.0,
            snapshot: None,
        }
    }

    /// Count one ball clear. Returns true when this clear opened a new
    /// window, in which case the caller schedules its resolution.
    pub fn record_clear(&mut self) -> bool {
        match self.state {
            WindowState::Idle => {
                self.state = WindowState::Counting { cleared: 1 };
                true
            }
            WindowState::Counting {
                ref mut cleared,
            }
            | WindowState::Stalled {
                ref mut cleared,
            } => {
                *cleared += 1;
                false
            }
        }
    }

    /// Close the open window against the current layout. Returns `None` if
    /// no window is counting.
    pub fn resolve(&mut self, layout: &[MaterialSnapshot]) -> Option<Resolution> {
        let WindowState::Counting { cleared } = self.state else {
            return None;
        };

        let count = cleared as f64;
        let min_ratio = count / self.params.min_balls();
        let max_ratio = count / self.params.max_balls();

        if min_ratio < RESET_RATIO {
            self.score = 0.0;
            self.snapshot = Some(layout.to_vec());
            self.state = WindowState::Idle;
            return Some(Resolution::Rejected { cleared });
        }

        if max_ratio > STALL_RATIO {
            self.state = WindowState::Stalled { cleared };
            return Some(Resolution::Stalled { cleared });
        }

        let points = self.params.points_for(min_ratio, layout.len());
        self.state = WindowState::Idle;

        let unchanged = self.snapshot.as_deref() == Some(layout);
        if points < self.score && unchanged {
            return Some(Resolution::Held { cleared, points });
        }

        self.score = points.max(0.0);
        self.snapshot = Some(layout.to_vec());
        Some(Resolution::Accepted { cleared, points })
    }

    /// Abandon any open window (world cleared). Score and snapshot survive.
    pub fn cancel_window(&mut self) {
        self.state = WindowState::Idle;
    }

    pub fn state(&self) -> WindowState {
        self.state
    }

    pub fn score(&self) -> f64 {
        self.score
    }

    /// Score as shown in the HUD
    pub fn display_score(&self) -> i64 {
        self.score.round() as i64
    }
}
