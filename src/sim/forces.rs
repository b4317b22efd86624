//! Custom force fields applied to balls each tick
//!
//! Forces go into each ball's accumulator and are consumed by the next
//! integration step, so the field strength is independent of tick order.

use glam::Vec2;

use crate::angle_between;
use crate::consts::*;

/// Fan thrust on a ball, if the ball sits inside the fan's cone.
///
/// The cone is the open box `0 < dx < FAN_REACH`, `|dy| < FAN_HALF_WIDTH`
/// measured from the fan centre; all of its edges are excluded.
pub fn fan_force(fan_pos: Vec2, ball_pos: Vec2) -> Option<Vec2> {
    let dx = ball_pos.x - fan_pos.x;
    let dy = ball_pos.y - fan_pos.y;

    if dx > 0.0 && dx < FAN_REACH && dy.abs() < FAN_HALF_WIDTH {
        Some(Vec2::new(FAN_FORCE, 0.0))
    } else {
        None
    }
}

/// Vortex pull on a ball.
///
/// Zero beyond `VORTEX_RANGE`. Inside, the magnitude grows with squared
/// distance from a dead core of radius `VORTEX_CORE`, and the vertical
/// component is doubled.
pub fn vortex_force(vortex_pos: Vec2, ball_pos: Vec2) -> Vec2 {
    let to_vortex = vortex_pos - ball_pos;
    let distance_sq = to_vortex.length_squared();
    let range_sq = VORTEX_RANGE * VORTEX_RANGE;

    if distance_sq >= range_sq {
        return Vec2::ZERO;
    }

    let scale = (distance_sq - VORTEX_CORE * VORTEX_CORE)
        / (range_sq - VORTEX_FALLOFF_BASE * VORTEX_FALLOFF_BASE);
    let magnitude = VORTEX_STRENGTH * scale.max(0.0);
    let angle = angle_between(ball_pos, vortex_pos);

    Vec2::new(magnitude * angle.cos(), magnitude * angle.sin() * 2.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const FAN: Vec2 = Vec2::new(200.0, 300.0);
    const VORTEX: Vec2 = Vec2::new(400.0, 300.0);

    #[test]
    fn test_fan_pushes_right_inside_cone() {
        let force = fan_force(FAN, FAN + Vec2::new(50.0, 10.0));
        assert_eq!(force, Some(Vec2::new(FAN_FORCE, 0.0)));
    }

    #[test]
    fn test_fan_cone_boundaries_are_excluded() {
        assert_eq!(fan_force(FAN, FAN + Vec2::new(0.0, 0.0)), None);
        assert_eq!(fan_force(FAN, FAN + Vec2::new(100.0, 0.0)), None);
        assert_eq!(fan_force(FAN, FAN + Vec2::new(50.0, 50.0)), None);
        assert_eq!(fan_force(FAN, FAN + Vec2::new(50.0, -50.0)), None);
    }

    #[test]
    fn test_fan_ignores_balls_behind() {
        assert_eq!(fan_force(FAN, FAN + Vec2::new(-10.0, 0.0)), None);
    }

    #[test]
    fn test_vortex_zero_at_range() {
        let force = vortex_force(VORTEX, VORTEX + Vec2::new(VORTEX_RANGE, 0.0));
        assert_eq!(force, Vec2::ZERO);
    }

    #[test]
    fn test_vortex_positive_just_inside_range() {
        let force = vortex_force(VORTEX, VORTEX + Vec2::new(VORTEX_RANGE - 0.01, 0.0));
        assert!(force.length() > 0.0);
        // Ball is to the right, so the pull is leftward
        assert!(force.x < 0.0);
    }

    #[test]
    fn test_vortex_dead_core() {
        let force = vortex_force(VORTEX, VORTEX + Vec2::new(10.0, 0.0));
        assert_eq!(force, Vec2::ZERO);
    }

    #[test]
    fn test_vortex_vertical_pull_is_doubled() {
        let horizontal = vortex_force(VORTEX, VORTEX + Vec2::new(100.0, 0.0));
        let vertical = vortex_force(VORTEX, VORTEX + Vec2::new(0.0, 100.0));
        assert!((vertical.y.abs() - 2.0 * horizontal.x.abs()).abs() < 1e-7);
        // Ball below the vortex (y down) is pulled up
        assert!(vertical.y < 0.0);
    }

    proptest! {
        #[test]
        fn prop_fan_applies_iff_inside_open_cone(dx in -150.0f32..150.0, dy in -80.0f32..80.0) {
            let applied = fan_force(FAN, FAN + Vec2::new(dx, dy)).is_some();
            let ball = FAN + Vec2::new(dx, dy);
            let (rdx, rdy) = (ball.x - FAN.x, ball.y - FAN.y);
            prop_assert_eq!(applied, rdx > 0.0 && rdx < FAN_REACH && rdy.abs() < FAN_HALF_WIDTH);
        }

        #[test]
        fn prop_vortex_silent_outside_range(angle in 0.0f32..std::f32::consts::TAU, extra in 0.0f32..500.0) {
            let offset = Vec2::from_angle(angle) * (VORTEX_RANGE + 1.0 + extra);
            prop_assert_eq!(vortex_force(VORTEX, VORTEX + offset), Vec2::ZERO);
        }

        #[test]
        fn prop_vortex_points_toward_centre(angle in 0.0f32..std::f32::consts::TAU, dist in 30.0f32..190.0) {
            let offset = Vec2::from_angle(angle) * dist;
            let force = vortex_force(VORTEX, VORTEX + offset);
            // Anisotropic, but never pushes away
            prop_assert!(force.dot(-offset) > 0.0);
        }
    }
}
