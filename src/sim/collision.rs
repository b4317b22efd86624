//! Collision detection and response
//!
//! Only balls move, so every contact involves at least one circle: circles
//! are tested against circles and against convex polygons (walls, planks,
//! bouncer strips, bumpers, fans, the target zone).

use glam::Vec2;

use super::body::{Body, Shape};

/// Share of the penetration removed per contact
const POSITION_CORRECTION: f32 = 0.8;
/// Approach speeds (px/tick) below this bounce without restitution
const RESTING_SPEED: f32 = 1.0;

/// Result of a collision check
#[derive(Debug, Clone)]
pub struct CollisionResult {
    /// Whether a collision occurred
    pub hit: bool,
    /// Contact point (if hit)
    pub point: Vec2,
    /// Contact normal, pointing from the second shape toward the first
    pub normal: Vec2,
    /// Penetration depth (for position correction)
    pub penetration: f32,
}

impl CollisionResult {
    pub fn miss() -> Self {
        Self {
            hit: false,
            point: Vec2::ZERO,
            normal: Vec2::ZERO,
            penetration: 0.0,
        }
    }
}

/// Circle vs circle. Normal points from `b` toward `a`.
pub fn circle_circle(pos_a: Vec2, radius_a: f32, pos_b: Vec2, radius_b: f32) -> CollisionResult {
    let delta = pos_a - pos_b;
    let dist_sq = delta.length_squared();
    let sum_r = radius_a + radius_b;

    if dist_sq >= sum_r * sum_r {
        return CollisionResult::miss();
    }

    let dist = dist_sq.sqrt();
    // Coincident centres: pick an arbitrary but stable axis
    let normal = if dist > f32::EPSILON { delta / dist } else { Vec2::NEG_Y };

    CollisionResult {
        hit: true,
        point: pos_b + normal * radius_b,
        normal,
        penetration: sum_r - dist,
    }
}

/// Circle vs convex polygon (world-space vertices, either winding).
///
/// Finds the edge of greatest separation, then classifies the circle centre
/// into that edge's Voronoi region (edge or one of its end vertices).
/// Normal points from the polygon toward the circle.
pub fn circle_polygon(center: Vec2, radius: f32, vertices: &[Vec2]) -> CollisionResult {
    let n = vertices.len();
    if n < 3 {
        return CollisionResult::miss();
    }

    let centroid = vertices.iter().copied().sum::<Vec2>() / n as f32;

    let mut best_dist = f32::NEG_INFINITY;
    let mut best_normal = Vec2::ZERO;
    let mut best_idx = 0;

    for i in 0..n {
        let a = vertices[i];
        let b = vertices[(i + 1) % n];
        let mut normal = (b - a).perp().normalize_or_zero();
        // Orient outward regardless of winding
        if normal.dot((a + b) * 0.5 - centroid) < 0.0 {
            normal = -normal;
        }
        let d = (center - a).dot(normal);
        if d > best_dist {
            best_dist = d;
            best_normal = normal;
            best_idx = i;
        }
    }

    if best_dist >= radius {
        return CollisionResult::miss();
    }

    let a = vertices[best_idx];
    let b = vertices[(best_idx + 1) % n];
    let edge = b - a;
    let edge_len_sq = edge.length_squared();
    let t = if edge_len_sq > f32::EPSILON {
        (center - a).dot(edge) / edge_len_sq
    } else {
        0.0
    };

    if best_dist > 0.0 && (t < 0.0 || t > 1.0) {
        // Vertex region: closest feature is a corner
        let corner = if t < 0.0 { a } else { b };
        let delta = center - corner;
        let dist = delta.length();
        if dist >= radius || dist <= f32::EPSILON {
            return CollisionResult::miss();
        }
        return CollisionResult {
            hit: true,
            point: corner,
            normal: delta / dist,
            penetration: radius - dist,
        };
    }

    // Edge region (also covers a centre inside the polygon)
    CollisionResult {
        hit: true,
        point: center - best_normal * best_dist,
        normal: best_normal,
        penetration: radius - best_dist,
    }
}

/// Contact between two bodies. Normal points from `b` toward `a`.
pub fn body_contact(a: &Body, b: &Body) -> CollisionResult {
    // Cheap bounding-circle rejection first
    let reach = a.bounding_radius() + b.bounding_radius();
    if a.pos.distance_squared(b.pos) > reach * reach {
        return CollisionResult::miss();
    }

    match (&a.shape, &b.shape) {
        (Shape::Circle { radius: ra }, Shape::Circle { radius: rb }) => {
            circle_circle(a.pos, *ra, b.pos, *rb)
        }
        (Shape::Circle { radius }, Shape::Polygon { .. }) => {
            circle_polygon(a.pos, *radius, &b.world_vertices())
        }
        (Shape::Polygon { .. }, Shape::Circle { radius }) => {
            let mut result = circle_polygon(b.pos, *radius, &a.world_vertices());
            result.normal = -result.normal;
            result
        }
        // Polygons are always static, and static pairs are never tested
        (Shape::Polygon { .. }, Shape::Polygon { .. }) => CollisionResult::miss(),
    }
}

/// Whether two bodies are allowed to generate contacts
pub fn can_collide(a: &Body, b: &Body) -> bool {
    if !a.collidable || !b.collidable {
        return false;
    }
    if a.is_static && b.is_static {
        return false;
    }
    if a.group != 0 && a.group == b.group {
        return a.group > 0;
    }
    true
}

/// Push two bodies apart and exchange a restitution + friction impulse.
///
/// `contact.normal` must point from `b` toward `a`. Sensors never reach here.
pub fn resolve_contact(a: &mut Body, b: &mut Body, contact: &CollisionResult) {
    let inv_a = a.inverse_mass();
    let inv_b = b.inverse_mass();
    let inv_sum = inv_a + inv_b;
    if inv_sum <= 0.0 {
        return;
    }
    let n = contact.normal;

    let correction = n * (contact.penetration * POSITION_CORRECTION / inv_sum);
    a.pos += correction * inv_a;
    b.pos -= correction * inv_b;

    let rel = a.vel - b.vel;
    let vn = rel.dot(n);
    if vn >= 0.0 {
        // Already separating
        return;
    }

    let restitution = if -vn < RESTING_SPEED {
        0.0
    } else {
        a.restitution.max(b.restitution)
    };
    let j = -(1.0 + restitution) * vn / inv_sum;
    a.vel += n * (j * inv_a);
    b.vel -= n * (j * inv_b);

    // Coulomb friction along the contact tangent
    let tangent = rel - n * vn;
    if tangent.length_squared() > f32::EPSILON {
        let t = tangent.normalize();
        let vt = rel.dot(t);
        let mu = a.friction.min(b.friction);
        let jt = (-vt / inv_sum).clamp(-j * mu, j * mu);
        a.vel += t * (jt * inv_a);
        b.vel -= t * (jt * inv_b);
    }
}
