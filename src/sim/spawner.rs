//! Ball spawn points and cadence

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::body::{Body, BodyId, BodyKind, Shape};
use crate::consts::*;
use crate::tuning::Tuning;

/// Launch direction of a spawn point (screen coordinates, y down)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub fn unit(&self) -> Vec2 {
        match self {
            Direction::Up => Vec2::NEG_Y,
            Direction::Down => Vec2::Y,
            Direction::Left => Vec2::NEG_X,
            Direction::Right => Vec2::X,
        }
    }

    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "up" => Some(Direction::Up),
            "down" => Some(Direction::Down),
            "left" => Some(Direction::Left),
            "right" => Some(Direction::Right),
            _ => None,
        }
    }
}

/// Fixed location that emits balls
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpawnPoint {
    pub x: f32,
    pub y: f32,
    pub direction: Direction,
}

impl SpawnPoint {
    pub fn new(x: f32, y: f32, direction: Direction) -> Self {
        Self { x, y, direction }
    }

    pub fn pos(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }
}

/// Default layout: one chute dropping from the top left, one firing right
/// from the bottom left
pub fn default_spawn_points() -> Vec<SpawnPoint> {
    vec![
        SpawnPoint::new(160.0, 20.0, Direction::Down),
        SpawnPoint::new(40.0, 460.0, Direction::Right),
    ]
}

/// Delay until a spawn point fires again, uniform in `[min, max)`
pub fn next_interval(rng: &mut impl Rng, tuning: &Tuning) -> f64 {
    let min = tuning.spawn_interval_min_ms;
    let max = tuning.spawn_interval_max_ms;
    if max <= min {
        return min;
    }
    rng.random_range(min..max)
}

/// A fresh ball at `point`, moving along its direction
pub fn make_ball(id: BodyId, point: &SpawnPoint, tuning: &Tuning) -> Body {
    Body::new(
        id,
        BodyKind::Ball,
        Shape::Circle {
            radius: BALL_RADIUS,
        },
        point.pos(),
    )
    .with_velocity(point.direction.unit() * tuning.ball_speed)
    .with_restitution(BALL_RESTITUTION)
    .with_friction(BALL_FRICTION, BALL_FRICTION_AIR)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_direction_units_are_screen_space() {
        assert_eq!(Direction::Up.unit(), Vec2::new(0.0, -1.0));
        assert_eq!(Direction::Down.unit(), Vec2::new(0.0, 1.0));
        assert_eq!(Direction::Right.unit(), Vec2::new(1.0, 0.0));
    }

    #[test]
    fn test_direction_from_str() {
        assert_eq!(Direction::from_str("down"), Some(Direction::Down));
        assert_eq!(Direction::from_str("LEFT"), Some(Direction::Left));
        assert_eq!(Direction::from_str("sideways"), None);
    }

    #[test]
    fn test_direction_serde_lowercase() {
        let point: SpawnPoint =
            serde_json::from_str(r#"{"x": 1.0, "y": 2.0, "direction": "right"}"#).unwrap();
        assert_eq!(point, SpawnPoint::new(1.0, 2.0, Direction::Right));
    }

    #[test]
    fn test_make_ball_velocity_and_material() {
        let tuning = Tuning::default();
        let ball = make_ball(9, &SpawnPoint::new(40.0, 460.0, Direction::Right), &tuning);
        assert_eq!(ball.kind(), BodyKind::Ball);
        assert_eq!(ball.vel, Vec2::new(BALL_SPEED, 0.0));
        assert_eq!(ball.restitution, BALL_RESTITUTION);
        assert_eq!(ball.friction_air, BALL_FRICTION_AIR);
        assert!(!ball.is_static);
    }

    #[test]
    fn test_next_interval_within_bounds() {
        let tuning = Tuning::default();
        let mut rng = Pcg32::seed_from_u64(7);
        for _ in 0..1000 {
            let dt = next_interval(&mut rng, &tuning);
            assert!((SPAWN_INTERVAL_MIN_MS..SPAWN_INTERVAL_MAX_MS).contains(&dt));
        }
    }

    #[test]
    fn test_next_interval_degenerate_range() {
        let tuning = Tuning {
            spawn_interval_min_ms: 800.0,
            spawn_interval_max_ms: 800.0,
            ..Tuning::default()
        };
        let mut rng = Pcg32::seed_from_u64(7);
        assert_eq!(next_interval(&mut rng, &tuning), 800.0);
    }
}
