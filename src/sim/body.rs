//! Rigid bodies and their collision labels
//!
//! Every simulated shape (walls, balls, materials, the target zone) is a
//! `Body`. Composites such as the bouncer are a root body plus child parts
//! that move together but keep their own labels for collision dispatch.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::BODY_DENSITY;
use crate::rotate;

/// Stable body identifier (monotonic, never reused within a session)
pub type BodyId = u32;

/// Collision label of a body
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum BodyKind {
    Ball,
    Wall,
    PlankLeft,
    PlankRight,
    Fan,
    BouncerComposite,
    BouncerTop,
    BouncerBottom,
    BouncerSide,
    Bumper,
    Vortex,
    TargetZone,
}

impl BodyKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            BodyKind::Ball => "Ball",
            BodyKind::Wall => "Wall",
            BodyKind::PlankLeft => "PlankLeft",
            BodyKind::PlankRight => "PlankRight",
            BodyKind::Fan => "Fan",
            BodyKind::BouncerComposite => "BouncerComposite",
            BodyKind::BouncerTop => "BouncerTop",
            BodyKind::BouncerBottom => "BouncerBottom",
            BodyKind::BouncerSide => "BouncerSide",
            BodyKind::Bumper => "Bumper",
            BodyKind::Vortex => "Vortex",
            BodyKind::TargetZone => "TargetZone",
        }
    }

    /// Whether the player may pick this body up with the pointer
    pub fn is_draggable(&self) -> bool {
        matches!(
            self,
            BodyKind::PlankLeft
                | BodyKind::PlankRight
                | BodyKind::Fan
                | BodyKind::BouncerComposite
                | BodyKind::Bumper
                | BodyKind::Vortex
        )
    }
}

/// Body geometry in local space (centered on the body position)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Shape {
    Circle { radius: f32 },
    /// Convex polygon; winding may be either direction
    Polygon { vertices: Vec<Vec2> },
}

impl Shape {
    /// Axis-aligned rectangle centered on the origin
    pub fn rectangle(width: f32, height: f32) -> Self {
        let hw = width / 2.0;
        let hh = height / 2.0;
        Shape::Polygon {
            vertices: vec![
                Vec2::new(-hw, -hh),
                Vec2::new(hw, -hh),
                Vec2::new(hw, hh),
                Vec2::new(-hw, hh),
            ],
        }
    }

    /// Convex polygon re-centred so its centroid sits at the origin
    pub fn centered_polygon(vertices: &[Vec2]) -> Self {
        let centroid = polygon_centroid(vertices);
        Shape::Polygon {
            vertices: vertices.iter().map(|v| *v - centroid).collect(),
        }
    }

    pub fn area(&self) -> f32 {
        match self {
            Shape::Circle { radius } => std::f32::consts::PI * radius * radius,
            Shape::Polygon { vertices } => polygon_area(vertices),
        }
    }

    /// Radius of the smallest origin-centred circle containing the shape
    pub fn bounding_radius(&self) -> f32 {
        match self {
            Shape::Circle { radius } => *radius,
            Shape::Polygon { vertices } => vertices
                .iter()
                .map(|v| v.length())
                .fold(0.0, f32::max),
        }
    }
}

/// Signed-area-independent polygon area (shoelace formula)
pub fn polygon_area(vertices: &[Vec2]) -> f32 {
    let n = vertices.len();
    if n < 3 {
        return 0.0;
    }
    let mut twice = 0.0;
    for i in 0..n {
        let a = vertices[i];
        let b = vertices[(i + 1) % n];
        twice += a.perp_dot(b);
    }
    (twice / 2.0).abs()
}

/// Area centroid of a simple polygon
pub fn polygon_centroid(vertices: &[Vec2]) -> Vec2 {
    let n = vertices.len();
    let mut twice_area = 0.0;
    let mut acc = Vec2::ZERO;
    for i in 0..n {
        let a = vertices[i];
        let b = vertices[(i + 1) % n];
        let cross = a.perp_dot(b);
        twice_area += cross;
        acc += (a + b) * cross;
    }
    if twice_area.abs() < f32::EPSILON {
        // Degenerate: fall back to the vertex average
        return vertices.iter().copied().sum::<Vec2>() / n.max(1) as f32;
    }
    acc / (3.0 * twice_area)
}

/// A simulated body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Body {
    pub id: BodyId,
    kind: BodyKind,
    pub shape: Shape,
    pub pos: Vec2,
    /// Rotation (radians, clockwise on screen since y grows downward)
    pub angle: f32,
    /// Velocity in pixels per tick
    pub vel: Vec2,
    /// Force accumulated this tick, consumed by the next integration
    pub force: Vec2,
    pub mass: f32,
    pub is_static: bool,
    /// Sensors report overlaps but exert no contact force
    pub is_sensor: bool,
    /// Visual-only bodies (composite roots) take no part in collisions
    pub collidable: bool,
    /// Collision group: bodies sharing a negative group never collide
    pub group: i32,
    pub restitution: f32,
    pub friction: f32,
    pub friction_air: f32,
    /// Pointer drag pins the body and suspends its physics
    pub dragged: bool,
    /// Composite root this body belongs to
    pub parent: Option<BodyId>,
    /// Child parts (composite roots only)
    pub parts: Vec<BodyId>,
}

impl Body {
    pub fn new(id: BodyId, kind: BodyKind, shape: Shape, pos: Vec2) -> Self {
        let mass = shape.area() * BODY_DENSITY;
        Self {
            id,
            kind,
            shape,
            pos,
            angle: 0.0,
            vel: Vec2::ZERO,
            force: Vec2::ZERO,
            mass,
            is_static: false,
            is_sensor: false,
            collidable: true,
            group: 0,
            restitution: 0.0,
            friction: 0.1,
            friction_air: 0.01,
            dragged: false,
            parent: None,
            parts: Vec::new(),
        }
    }

    pub fn with_static(mut self) -> Self {
        self.is_static = true;
        self.vel = Vec2::ZERO;
        self
    }

    pub fn with_sensor(mut self) -> Self {
        self.is_sensor = true;
        self
    }

    pub fn with_angle(mut self, angle: f32) -> Self {
        self.angle = angle;
        self
    }

    pub fn with_velocity(mut self, vel: Vec2) -> Self {
        self.vel = vel;
        self
    }

    pub fn with_restitution(mut self, restitution: f32) -> Self {
        self.restitution = restitution;
        self
    }

    pub fn with_friction(mut self, friction: f32, friction_air: f32) -> Self {
        self.friction = friction;
        self.friction_air = friction_air;
        self
    }

    pub fn with_group(mut self, group: i32) -> Self {
        self.group = group;
        self
    }

    pub fn non_colliding(mut self) -> Self {
        self.collidable = false;
        self
    }

    #[inline]
    pub fn kind(&self) -> BodyKind {
        self.kind
    }

    /// Inverse mass (0 for static bodies)
    #[inline]
    pub fn inverse_mass(&self) -> f32 {
        if self.is_static || self.mass <= 0.0 {
            0.0
        } else {
            1.0 / self.mass
        }
    }

    /// Polygon vertices in world space (empty for circles)
    pub fn world_vertices(&self) -> Vec<Vec2> {
        match &self.shape {
            Shape::Circle { .. } => Vec::new(),
            Shape::Polygon { vertices } => vertices
                .iter()
                .map(|v| self.pos + rotate(*v, self.angle))
                .collect(),
        }
    }

    /// Check if a world-space point lies inside the body
    pub fn contains_point(&self, point: Vec2) -> bool {
        match &self.shape {
            Shape::Circle { radius } => point.distance_squared(self.pos) <= radius * radius,
            Shape::Polygon { .. } => polygon_contains_point(&self.world_vertices(), point),
        }
    }

    pub fn bounding_radius(&self) -> f32 {
        self.shape.bounding_radius()
    }
}

/// Point-in-convex-polygon test that accepts either winding
pub fn polygon_contains_point(vertices: &[Vec2], point: Vec2) -> bool {
    let n = vertices.len();
    if n < 3 {
        return false;
    }
    let mut sign = 0.0f32;
    for i in 0..n {
        let a = vertices[i];
        let b = vertices[(i + 1) % n];
        let cross = (b - a).perp_dot(point - a);
        if cross.abs() < f32::EPSILON {
            continue;
        }
        if sign == 0.0 {
            sign = cross.signum();
        } else if cross.signum() != sign {
            return false;
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rectangle_area_and_mass() {
        let body = Body::new(1, BodyKind::Wall, Shape::rectangle(20.0, 10.0), Vec2::ZERO);
        assert!((body.shape.area() - 200.0).abs() < 1e-4);
        assert!((body.mass - 0.2).abs() < 1e-6);
    }

    #[test]
    fn test_static_body_has_no_inverse_mass() {
        let body = Body::new(1, BodyKind::Wall, Shape::rectangle(20.0, 10.0), Vec2::ZERO)
            .with_static();
        assert_eq!(body.inverse_mass(), 0.0);
    }

    #[test]
    fn test_centered_triangle_centroid_is_origin() {
        let shape = Shape::centered_polygon(&[
            Vec2::new(0.0, -30.0),
            Vec2::new(-20.0, 30.0),
            Vec2::new(20.0, 30.0),
        ]);
        let Shape::Polygon { vertices } = shape else {
            panic!("expected polygon");
        };
        assert!(polygon_centroid(&vertices).length() < 1e-4);
        // Apex moves up by a sixth of the height
        assert!((vertices[0].y - -40.0).abs() < 1e-4);
    }

    #[test]
    fn test_rotated_rectangle_contains_point() {
        let body = Body::new(1, BodyKind::PlankLeft, Shape::rectangle(100.0, 10.0), Vec2::new(50.0, 50.0))
            .with_angle(std::f32::consts::FRAC_PI_2);
        // After a quarter turn the long axis is vertical
        assert!(body.contains_point(Vec2::new(50.0, 90.0)));
        assert!(!body.contains_point(Vec2::new(90.0, 50.0)));
    }

    #[test]
    fn test_circle_contains_point() {
        let body = Body::new(1, BodyKind::Vortex, Shape::Circle { radius: 5.0 }, Vec2::ZERO);
        assert!(body.contains_point(Vec2::new(3.0, 4.0)));
        assert!(!body.contains_point(Vec2::new(4.0, 4.0)));
    }

    #[test]
    fn test_draggable_kinds() {
        assert!(BodyKind::Bumper.is_draggable());
        assert!(BodyKind::BouncerComposite.is_draggable());
        assert!(!BodyKind::BouncerTop.is_draggable());
        assert!(!BodyKind::Ball.is_draggable());
        assert!(!BodyKind::TargetZone.is_draggable());
    }
}
