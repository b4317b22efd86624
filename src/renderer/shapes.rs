//! Shape generation for 2D primitives
//!
//! Everything is emitted as a flat triangle list in arena coordinates; the
//! pipeline maps it to clip space.

use glam::Vec2;
use std::f32::consts::PI;

use super::vertex::{Vertex, body_color, colors};
use crate::consts::{FAN_HALF_WIDTH, FAN_REACH};
use crate::sim::{Body, BodyKind, GameState, Shape, SpawnPoint};

/// Segments used for ball and vortex outlines
const CIRCLE_SEGMENTS: u32 = 24;
const ARROW_LENGTH: f32 = 24.0;
const ARROW_HEAD: f32 = 8.0;
const ARROW_SHAFT: f32 = 2.0;

/// Generate vertices for a filled circle
pub fn circle(center: Vec2, radius: f32, color: [f32; 4], segments: u32) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity((segments * 3) as usize);

    for i in 0..segments {
        let theta1 = (i as f32 / segments as f32) * 2.0 * PI;
        let theta2 = ((i + 1) as f32 / segments as f32) * 2.0 * PI;

        // Triangle from center to edge
        vertices.push(Vertex::new(center.x, center.y, color));
        vertices.push(Vertex::new(
            center.x + radius * theta1.cos(),
            center.y + radius * theta1.sin(),
            color,
        ));
        vertices.push(Vertex::new(
            center.x + radius * theta2.cos(),
            center.y + radius * theta2.sin(),
            color,
        ));
    }

    vertices
}

/// Generate vertices for a ring (hollow circle)
pub fn ring(
    center: Vec2,
    inner_radius: f32,
    outer_radius: f32,
    color: [f32; 4],
    segments: u32,
) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity((segments * 6) as usize);

    for i in 0..segments {
        let theta1 = (i as f32 / segments as f32) * 2.0 * PI;
        let theta2 = ((i + 1) as f32 / segments as f32) * 2.0 * PI;

        let inner1 = center + Vec2::from_angle(theta1) * inner_radius;
        let outer1 = center + Vec2::from_angle(theta1) * outer_radius;
        let inner2 = center + Vec2::from_angle(theta2) * inner_radius;
        let outer2 = center + Vec2::from_angle(theta2) * outer_radius;

        // Two triangles per segment
        vertices.push(Vertex::new(inner1.x, inner1.y, color));
        vertices.push(Vertex::new(outer1.x, outer1.y, color));
        vertices.push(Vertex::new(inner2.x, inner2.y, color));

        vertices.push(Vertex::new(inner2.x, inner2.y, color));
        vertices.push(Vertex::new(outer1.x, outer1.y, color));
        vertices.push(Vertex::new(outer2.x, outer2.y, color));
    }

    vertices
}

/// Filled convex polygon (triangle fan from the first vertex)
pub fn polygon(points: &[Vec2], color: [f32; 4]) -> Vec<Vertex> {
    if points.len() < 3 {
        return Vec::new();
    }
    let mut vertices = Vec::with_capacity((points.len() - 2) * 3);
    let first = points[0];
    for pair in points[1..].windows(2) {
        vertices.push(Vertex::new(first.x, first.y, color));
        vertices.push(Vertex::new(pair[0].x, pair[0].y, color));
        vertices.push(Vertex::new(pair[1].x, pair[1].y, color));
    }
    vertices
}

/// Axis-aligned rectangle from its top-left and bottom-right corners
pub fn rect(min: Vec2, max: Vec2, color: [f32; 4]) -> Vec<Vertex> {
    polygon(
        &[
            min,
            Vec2::new(max.x, min.y),
            max,
            Vec2::new(min.x, max.y),
        ],
        color,
    )
}

/// Arrow starting at `origin` pointing along `dir` (unit vector)
pub fn arrow(origin: Vec2, dir: Vec2, color: [f32; 4]) -> Vec<Vertex> {
    let side = dir.perp();
    let shaft_end = origin + dir * (ARROW_LENGTH - ARROW_HEAD);
    let tip = origin + dir * ARROW_LENGTH;

    let mut vertices = polygon(
        &[
            origin + side * ARROW_SHAFT,
            shaft_end + side * ARROW_SHAFT,
            shaft_end - side * ARROW_SHAFT,
            origin - side * ARROW_SHAFT,
        ],
        color,
    );
    vertices.extend(polygon(
        &[
            shaft_end + side * ARROW_HEAD * 0.5,
            tip,
            shaft_end - side * ARROW_HEAD * 0.5,
        ],
        color,
    ));
    vertices
}

/// Vertices for one body, or nothing for invisible bodies
pub fn body_vertices(body: &Body) -> Vec<Vertex> {
    let Some(color) = body_color(body.kind()) else {
        return Vec::new();
    };

    let mut vertices = match &body.shape {
        Shape::Circle { radius } => circle(body.pos, *radius, color, CIRCLE_SEGMENTS),
        Shape::Polygon { .. } => polygon(&body.world_vertices(), color),
    };

    if body.dragged {
        let highlight = match &body.shape {
            Shape::Circle { radius } => {
                circle(body.pos, *radius, colors::DRAG_HIGHLIGHT, CIRCLE_SEGMENTS)
            }
            Shape::Polygon { .. } => polygon(&body.world_vertices(), colors::DRAG_HIGHLIGHT),
        };
        vertices.extend(highlight);
    }

    vertices
}

/// Faint overlays showing where fans push and vortices pull
fn field_hints(state: &GameState) -> Vec<Vertex> {
    let mut vertices = Vec::new();

    for fan in state.fans.iter().filter_map(|id| state.bodies.get(*id)) {
        vertices.extend(rect(
            fan.pos + Vec2::new(0.0, -FAN_HALF_WIDTH),
            fan.pos + Vec2::new(FAN_REACH, FAN_HALF_WIDTH),
            colors::FAN_BREEZE,
        ));
    }
    for vortex in state.vortices.iter().filter_map(|id| state.bodies.get(*id)) {
        if let Shape::Circle { radius } = vortex.shape {
            vertices.extend(ring(
                vortex.pos,
                radius,
                radius * 1.6,
                colors::VORTEX_RING,
                CIRCLE_SEGMENTS,
            ));
        }
    }

    vertices
}

fn spawn_arrows(points: &[SpawnPoint]) -> Vec<Vertex> {
    points
        .iter()
        .flat_map(|p| arrow(p.pos(), p.direction.unit(), colors::SPAWN_ARROW))
        .collect()
}

/// Every vertex of a frame: field hints, then materials and the target zone,
/// then balls on top, then spawn markers
pub fn scene_vertices(state: &GameState) -> Vec<Vertex> {
    let mut vertices = field_hints(state);

    let (balls, rest): (Vec<&Body>, Vec<&Body>) = state
        .bodies
        .all_bodies()
        .iter()
        .partition(|b| b.kind() == BodyKind::Ball);

    for body in rest.into_iter().chain(balls) {
        vertices.extend(body_vertices(body));
    }
    vertices.extend(spawn_arrows(&state.tuning.spawn_points));

    vertices
}
