//! Fixed timestep simulation tick
//!
//! Core loop that advances the world by one step: input, timers, then
//! physics.

use std::collections::BTreeSet;

use glam::Vec2;

use super::body::{Body, BodyId, BodyKind};
use super::collision::{body_contact, can_collide, resolve_contact};
use super::drag::DragState;
use super::forces::{fan_force, vortex_force};
use super::rules::{self, Participant, RuleOutcome};
use super::state::GameState;

/// Pointer activity since the previous tick, in arena coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    Down(Vec2),
    Move(Vec2),
    Up,
}

/// A palette item dropped onto the arena
#[derive(Debug, Clone, PartialEq)]
pub struct MaterialDrop {
    /// Palette type name, e.g. "Fan"
    pub kind: String,
    pub pos: Vec2,
}

/// Input commands for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    pub pointer: Vec<PointerEvent>,
    pub drops: Vec<MaterialDrop>,
    /// Clear button pressed
    pub clear: bool,
}

/// Advance the game state by one fixed timestep of `dt_ms`
pub fn tick(state: &mut GameState, input: &TickInput, dt_ms: f64) {
    apply_input(state, input);

    state.time_ms += dt_ms;
    state.time_ticks += 1;

    for scheduled in state.scheduler.take_due(state.time_ms) {
        state.run_task(scheduled);
    }

    integrate(state, dt_ms as f32);
    apply_fans(state);
    apply_vortices(state);

    // Held materials stay where the pointer put them
    for body in state.bodies.iter_mut().filter(|b| b.dragged) {
        body.vel = Vec2::ZERO;
    }

    process_contacts(state);
}

fn apply_input(state: &mut GameState, input: &TickInput) {
    if input.clear {
        state.clear();
    }

    for drop in &input.drops {
        state.add_material(&drop.kind, drop.pos.x, drop.pos.y);
    }

    for event in &input.pointer {
        match *event {
            PointerEvent::Down(point) => {
                if state.drag.is_none() {
                    state.drag = DragState::begin(&mut state.bodies, point);
                }
            }
            PointerEvent::Move(point) => {
                if let Some(drag) = state.drag {
                    drag.update(&mut state.bodies, point);
                }
            }
            PointerEvent::Up => {
                if let Some(drag) = state.drag.take() {
                    drag.end(&mut state.bodies);
                }
            }
        }
    }
}

/// Semi-implicit Euler: forces and gravity are accelerations in px/ms²,
/// velocities are px per tick
fn integrate(state: &mut GameState, dt: f32) {
    let gravity = Vec2::new(0.0, state.tuning.gravity);
    let dt_sq = dt * dt;

    for body in state.bodies.iter_mut() {
        if body.is_static {
            body.force = Vec2::ZERO;
            continue;
        }
        let accel = gravity + body.force * body.inverse_mass();
        body.vel = body.vel * (1.0 - body.friction_air) + accel * dt_sq;
        body.pos += body.vel;
        body.force = Vec2::ZERO;
    }
}

fn apply_fans(state: &mut GameState) {
    let fans: Vec<Vec2> = state
        .fans
        .iter()
        .filter_map(|id| state.bodies.get(*id))
        .map(|fan| fan.pos)
        .collect();

    for fan_pos in fans {
        for &ball_id in &state.balls {
            let Some(ball) = state.bodies.get_mut(ball_id) else {
                continue;
            };
            if let Some(force) = fan_force(fan_pos, ball.pos) {
                ball.force += force;
            }
        }
    }
}

fn apply_vortices(state: &mut GameState) {
    let vortices: Vec<Vec2> = state
        .vortices
        .iter()
        .filter_map(|id| state.bodies.get(*id))
        .filter(|vortex| !vortex.dragged)
        .map(|vortex| vortex.pos)
        .collect();

    for vortex_pos in vortices {
        for &ball_id in &state.balls {
            if let Some(ball) = state.bodies.get_mut(ball_id) {
                ball.force += vortex_force(vortex_pos, ball.pos);
            }
        }
    }
}

/// Handle every touching pair that involves a ball.
///
/// A pair that was not touching on the previous tick goes through the rule
/// table first, on the ball's incoming velocity; the contact impulse then
/// acts on whatever velocity the rule left. At most one rule fires per ball
/// per tick, and a captured ball is gone before any impulse.
fn process_contacts(state: &mut GameState) {
    let others: Vec<(BodyId, BodyKind)> = state
        .bodies
        .all_bodies()
        .iter()
        .map(|b| (b.id, b.kind()))
        .collect();
    let balls = state.balls.clone();
    let mut touching = BTreeSet::new();

    for ball_id in balls {
        let mut ruled = false;

        for &(other_id, other_kind) in &others {
            // Ball pairs are visited once, from the lower id
            if other_id == ball_id || (other_kind == BodyKind::Ball && other_id < ball_id) {
                continue;
            }
            let Some((ball, other)) = state.bodies.pair_mut(ball_id, other_id) else {
                continue;
            };
            if !can_collide(ball, other) {
                continue;
            }
            let contact = body_contact(ball, other);
            if !contact.hit {
                continue;
            }

            let key = (ball_id.min(other_id), ball_id.max(other_id));
            touching.insert(key);

            let mut outcome = None;
            if !ruled && !state.contacts.contains(&key) {
                outcome =
                    rules::respond(&participant(ball), &participant(other)).map(|m| m.outcome);
                ruled = outcome.is_some();
            }

            match outcome {
                Some(RuleOutcome::Capture) => {
                    state.capture_ball(ball_id);
                    break;
                }
                Some(RuleOutcome::SetVelocity(vel)) => ball.vel = vel,
                None => {}
            }

            if !ball.is_sensor && !other.is_sensor {
                resolve_contact(ball, other, &contact);
            }
        }
    }

    state.contacts = touching;
}

fn participant(body: &Body) -> Participant {
    Participant {
        id: body.id,
        kind: body.kind(),
        pos: body.pos,
        vel: body.vel,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;
    use crate::sim::scheduler::Task;
    use crate::sim::scoring::WindowState;
    use crate::sim::spawner::{Direction, SpawnPoint, make_ball};
    use crate::sim::state::GameEvent;
    use crate::tuning::Tuning;

    fn place_ball(state: &mut GameState, pos: Vec2, vel: Vec2) -> BodyId {
        let id = state.next_entity_id();
        let ball = make_ball(id, &SpawnPoint::new(pos.x, pos.y, Direction::Down), &state.tuning)
            .with_velocity(vel);
        state.bodies.add(ball);
        state.balls.push(id);
        id
    }

    fn quiet_state() -> GameState {
        let mut state = GameState::new(42, Tuning::default());
        state.scheduler.cancel_all();
        state
    }

    #[test]
    fn test_ball_lives_exactly_its_lifetime() {
        let mut state = GameState::new(7, Tuning::default());
        let spawned_at = state.time_ms;
        let id = state.spawn_ball(0, spawned_at).unwrap();
        let expires_at = spawned_at + BALL_LIFETIME_MS;

        let input = TickInput::default();
        loop {
            tick(&mut state, &input, TICK_MS);
            if state.time_ms < expires_at {
                assert!(state.bodies.contains(id), "removed early at {}", state.time_ms);
            } else {
                assert!(!state.bodies.contains(id));
                assert!(!state.balls.contains(&id));
                break;
            }
        }
        assert!(state.time_ms - expires_at < TICK_MS);
    }

    #[test]
    fn test_capture_emits_exactly_one_event() {
        let mut state = quiet_state();
        let id = place_ball(&mut state, Vec2::new(750.0, 50.0), Vec2::ZERO);

        tick(&mut state, &TickInput::default(), TICK_MS);
        let events = state.drain_events();
        assert_eq!(
            events,
            vec![GameEvent::BallScored {
                ball: id,
                at_ms: state.time_ms
            }]
        );
        assert!(!state.bodies.contains(id));
        assert_eq!(state.scoring.state(), WindowState::Counting { cleared: 1 });
        assert_eq!(state.scheduler.due_of(Task::ExpireBall { ball: id }), None);

        tick(&mut state, &TickInput::default(), TICK_MS);
        assert!(state.drain_events().is_empty());
    }

    #[test]
    fn test_window_resolves_after_window_length() {
        let mut state = quiet_state();
        place_ball(&mut state, Vec2::new(750.0, 50.0), Vec2::ZERO);

        let input = TickInput::default();
        tick(&mut state, &input, TICK_MS);
        state.drain_events();

        let mut resolved = None;
        for _ in 0..400 {
            tick(&mut state, &input, TICK_MS);
            if let Some(GameEvent::ScoreResolved { resolution, score }) =
                state.drain_events().into_iter().next()
            {
                resolved = Some((resolution, score));
                break;
            }
        }
        // A single clear is far below the guaranteed ball count
        let (resolution, score) = resolved.unwrap();
        assert!(matches!(
            resolution,
            crate::sim::scoring::Resolution::Rejected { cleared: 1 }
        ));
        assert_eq!(score, 0.0);
    }

    /// Incoming vertical speed after one integration step
    fn incoming_vy(vy: f32) -> f32 {
        vy * (1.0 - BALL_FRICTION_AIR) + GRAVITY * (TICK_MS * TICK_MS) as f32
    }

    #[test]
    fn test_bouncer_top_launches_ball() {
        let mut state = quiet_state();
        state.add_material("Bouncer", 400.0, 300.0);
        let id = place_ball(&mut state, Vec2::new(400.0, 268.0), Vec2::new(0.0, 10.0));

        tick(&mut state, &TickInput::default(), TICK_MS);
        // Floor of 30 into the surface, then the ball's own restitution
        let ball = state.bodies.get(id).unwrap();
        assert!((ball.vel.y + BALL_RESTITUTION * 30.0).abs() < 1e-3, "vy = {}", ball.vel.y);
    }

    #[test]
    fn test_bouncer_top_doubles_incoming_speed_before_bounce() {
        let mut state = quiet_state();
        state.add_material("Bouncer", 400.0, 300.0);
        let id = place_ball(&mut state, Vec2::new(400.0, 258.0), Vec2::new(0.0, 20.0));

        tick(&mut state, &TickInput::default(), TICK_MS);
        let launched = BALL_RESTITUTION * 2.0 * incoming_vy(20.0);
        let ball = state.bodies.get(id).unwrap();
        assert!(ball.vel.y < 0.0, "ball pushed into the bouncer: vy = {}", ball.vel.y);
        assert!((ball.vel.y + launched).abs() < 1e-2, "vy = {}", ball.vel.y);

        // Clears the top strip instead of sinking through it
        for _ in 0..5 {
            tick(&mut state, &TickInput::default(), TICK_MS);
            assert!(state.bodies.get(id).unwrap().pos.y < 268.0);
        }
    }

    #[test]
    fn test_bumper_rule_sees_incoming_velocity() {
        let mut state = quiet_state();
        let bumper = state.add_material("Bumper", 400.0, 300.0).unwrap();
        // Upper-right of the bumper centre, moving down-left onto it
        let id = place_ball(&mut state, Vec2::new(405.0, 270.0), Vec2::new(-4.0, 8.0));

        let mut hit = false;
        for _ in 0..10 {
            tick(&mut state, &TickInput::default(), TICK_MS);
            if state.contacts.contains(&(bumper.min(id), bumper.max(id))) {
                hit = true;
                break;
            }
        }
        assert!(hit, "ball never reached the bumper");
        let ball = state.bodies.get(id).unwrap();
        assert!(ball.vel.x >= 10.0, "vx = {}", ball.vel.x);
        assert!(ball.vel.y <= -5.0, "vy = {}", ball.vel.y);
    }

    #[test]
    fn test_rule_fires_once_per_contact() {
        let mut state = quiet_state();
        state.add_material("Bouncer", 400.0, 300.0);
        let id = place_ball(&mut state, Vec2::new(400.0, 268.0), Vec2::new(0.0, 10.0));

        tick(&mut state, &TickInput::default(), TICK_MS);
        assert_eq!(state.contacts.len(), 1);
        // Still touching next tick: no second boost
        state.bodies.get_mut(id).unwrap().vel = Vec2::new(0.0, 1.0);
        state.bodies.get_mut(id).unwrap().pos.y = 275.0;
        tick(&mut state, &TickInput::default(), TICK_MS);
        assert!(state.bodies.get(id).unwrap().vel.y < 30.0);
    }

    #[test]
    fn test_fan_force_accumulates_for_next_tick() {
        let mut state = quiet_state();
        state.add_material("Fan", 200.0, 300.0);
        state.add_material("Fan", 190.0, 300.0);
        let id = place_ball(&mut state, Vec2::new(250.0, 300.0), Vec2::ZERO);

        tick(&mut state, &TickInput::default(), TICK_MS);
        let ball = state.bodies.get(id).unwrap();
        assert!((ball.force.x - 2.0 * FAN_FORCE).abs() < 1e-9);
        assert_eq!(ball.vel.x, 0.0);

        tick(&mut state, &TickInput::default(), TICK_MS);
        assert!(state.bodies.get(id).unwrap().vel.x > 0.0);
    }

    #[test]
    fn test_dragged_vortex_exerts_no_force() {
        let mut state = quiet_state();
        let vortex = state.add_material("Vortex", 400.0, 300.0).unwrap();
        let id = place_ball(&mut state, Vec2::new(500.0, 300.0), Vec2::ZERO);

        let grab = TickInput {
            pointer: vec![PointerEvent::Down(Vec2::new(400.0, 300.0))],
            ..Default::default()
        };
        tick(&mut state, &grab, TICK_MS);
        assert_eq!(state.drag.map(|d| d.body), Some(vortex));
        assert_eq!(state.bodies.get(id).unwrap().force, Vec2::ZERO);

        let release = TickInput {
            pointer: vec![
                PointerEvent::Move(Vec2::new(420.0, 300.0)),
                PointerEvent::Up,
            ],
            ..Default::default()
        };
        tick(&mut state, &release, TICK_MS);
        assert!(state.drag.is_none());
        assert_eq!(state.bodies.get(vortex).unwrap().pos, Vec2::new(420.0, 300.0));
        assert!(state.bodies.get(id).unwrap().force.x < 0.0);
    }

    #[test]
    fn test_drops_place_known_materials_only() {
        let mut state = quiet_state();
        let input = TickInput {
            drops: vec![
                MaterialDrop {
                    kind: "Bumper".to_string(),
                    pos: Vec2::new(300.0, 300.0),
                },
                MaterialDrop {
                    kind: "Wheel".to_string(),
                    pos: Vec2::new(350.0, 300.0),
                },
            ],
            ..Default::default()
        };
        tick(&mut state, &input, TICK_MS);
        assert_eq!(state.materials.len(), 1);
    }

    #[test]
    fn test_clear_input_cancels_everything() {
        let mut state = GameState::new(3, Tuning::default());
        state.add_material("Fan", 300.0, 300.0);
        let input = TickInput::default();
        for _ in 0..120 {
            tick(&mut state, &input, TICK_MS);
        }
        assert!(!state.balls.is_empty());

        tick(
            &mut state,
            &TickInput {
                clear: true,
                ..Default::default()
            },
            TICK_MS,
        );
        assert!(state.balls.is_empty());
        assert!(state.materials.is_empty());
        assert_eq!(state.scheduler.len(), state.tuning.spawn_points.len());
    }

    #[test]
    fn test_determinism() {
        // Two states with same seed should produce identical results
        let mut state1 = GameState::new(99999, Tuning::default());
        let mut state2 = GameState::new(99999, Tuning::default());
        state1.add_material("PlankRight", 200.0, 250.0);
        state2.add_material("PlankRight", 200.0, 250.0);

        let input = TickInput::default();
        for _ in 0..600 {
            tick(&mut state1, &input, TICK_MS);
            tick(&mut state2, &input, TICK_MS);
        }

        assert_eq!(state1.time_ticks, state2.time_ticks);
        assert_eq!(state1.balls, state2.balls);
        for (a, b) in state1
            .bodies
            .all_bodies()
            .iter()
            .zip(state2.bodies.all_bodies())
        {
            assert_eq!(a.pos, b.pos);
        }
    }

    #[test]
    fn test_balls_stay_inside_arena() {
        let mut state = GameState::new(11, Tuning::default());
        let input = TickInput::default();
        for _ in 0..900 {
            tick(&mut state, &input, TICK_MS);
        }
        for &id in &state.balls {
            let ball = state.bodies.get(id).unwrap();
            assert!(ball.pos.x > -BALL_RADIUS && ball.pos.x < ARENA_WIDTH + BALL_RADIUS);
            assert!(ball.pos.y < ARENA_HEIGHT + BALL_RADIUS);
        }
    }
}
