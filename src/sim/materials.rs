//! Material catalogue and factory
//!
//! Turns a placed material type into the bodies that simulate it.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::body::{Body, BodyId, BodyKind, Shape};
use crate::consts::*;
use crate::deg_to_rad;

/// Collision group shared by the parts of one bouncer
const BOUNCER_GROUP: i32 = -1;

/// Placeable material types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MaterialKind {
    PlankLeft,
    PlankRight,
    Fan,
    Bouncer,
    Bumper,
    Vortex,
}

impl MaterialKind {
    /// Palette order
    pub const ALL: [MaterialKind; 6] = [
        MaterialKind::PlankLeft,
        MaterialKind::PlankRight,
        MaterialKind::Fan,
        MaterialKind::Bouncer,
        MaterialKind::Bumper,
        MaterialKind::Vortex,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MaterialKind::PlankLeft => "PlankLeft",
            MaterialKind::PlankRight => "PlankRight",
            MaterialKind::Fan => "Fan",
            MaterialKind::Bouncer => "Bouncer",
            MaterialKind::Bumper => "Bumper",
            MaterialKind::Vortex => "Vortex",
        }
    }

    /// Parse a palette type name (exact match)
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        MaterialKind::ALL.into_iter().find(|k| k.as_str() == s)
    }

    /// Label carried by the material's root body
    pub fn root_kind(&self) -> BodyKind {
        match self {
            MaterialKind::PlankLeft => BodyKind::PlankLeft,
            MaterialKind::PlankRight => BodyKind::PlankRight,
            MaterialKind::Fan => BodyKind::Fan,
            MaterialKind::Bouncer => BodyKind::BouncerComposite,
            MaterialKind::Bumper => BodyKind::Bumper,
            MaterialKind::Vortex => BodyKind::Vortex,
        }
    }
}

/// A placed material. `id` is the id of its root body.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Material {
    pub id: BodyId,
    pub kind: MaterialKind,
    pub x: f32,
    pub y: f32,
}

/// One entry of the material configuration compared by scoring hysteresis
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MaterialSnapshot {
    pub id: BodyId,
    pub kind: MaterialKind,
    pub pos: Vec2,
}

/// Bodies produced for one material: the root first, then any parts
#[derive(Debug, Clone)]
pub struct MaterialBodies {
    pub root: Body,
    pub parts: Vec<Body>,
}

impl MaterialBodies {
    fn single(root: Body) -> Self {
        Self {
            root,
            parts: Vec::new(),
        }
    }
}

/// Build the bodies for `kind` centred at `pos`. `next_id` hands out fresh ids.
pub fn build(kind: MaterialKind, pos: Vec2, mut next_id: impl FnMut() -> BodyId) -> MaterialBodies {
    match kind {
        MaterialKind::PlankLeft | MaterialKind::PlankRight => {
            let tilt = if kind == MaterialKind::PlankLeft {
                -PLANK_TILT_DEG
            } else {
                PLANK_TILT_DEG
            };
            MaterialBodies::single(
                Body::new(
                    next_id(),
                    kind.root_kind(),
                    Shape::rectangle(PLANK_WIDTH, PLANK_HEIGHT),
                    pos,
                )
                .with_static()
                .with_angle(deg_to_rad(tilt)),
            )
        }
        MaterialKind::Fan => MaterialBodies::single(
            Body::new(
                next_id(),
                BodyKind::Fan,
                Shape::rectangle(FAN_WIDTH, FAN_HEIGHT),
                pos,
            )
            .with_static()
            .with_sensor(),
        ),
        MaterialKind::Bouncer => build_bouncer(pos, &mut next_id),
        MaterialKind::Bumper => {
            let hw = BUMPER_WIDTH / 2.0;
            let hh = BUMPER_HEIGHT / 2.0;
            let shape = Shape::centered_polygon(&[
                Vec2::new(0.0, -hh),
                Vec2::new(-hw, hh),
                Vec2::new(hw, hh),
            ]);
            MaterialBodies::single(
                Body::new(next_id(), BodyKind::Bumper, shape, pos)
                    .with_static()
                    .with_restitution(BUMPER_RESTITUTION),
            )
        }
        MaterialKind::Vortex => MaterialBodies::single(
            Body::new(
                next_id(),
                BodyKind::Vortex,
                Shape::Circle {
                    radius: VORTEX_DIAMETER / 2.0,
                },
                pos,
            )
            .with_static()
            .with_sensor(),
        ),
    }
}

/// Visual root plus four collision strips: top, bottom and two springless sides
fn build_bouncer(pos: Vec2, next_id: &mut impl FnMut() -> BodyId) -> MaterialBodies {
    let w = BOUNCER_WIDTH;
    let h = BOUNCER_HEIGHT;
    let strip = BOUNCER_STRIP;
    let inset = strip / 2.0;

    let mut root = Body::new(
        next_id(),
        BodyKind::BouncerComposite,
        Shape::rectangle(w, h),
        pos,
    )
    .with_static()
    .with_group(BOUNCER_GROUP)
    .non_colliding();

    let part = |id: BodyId, kind: BodyKind, offset: Vec2, size: Vec2| {
        let mut body = Body::new(id, kind, Shape::rectangle(size.x, size.y), pos + offset)
            .with_static()
            .with_group(BOUNCER_GROUP);
        body.parent = Some(root.id);
        body
    };

    let parts = vec![
        part(
            next_id(),
            BodyKind::BouncerTop,
            Vec2::new(0.0, -h / 2.0 + inset),
            Vec2::new(w - strip, strip),
        ),
        part(
            next_id(),
            BodyKind::BouncerBottom,
            Vec2::new(0.0, h / 2.0 - inset),
            Vec2::new(w - strip, strip),
        ),
        part(
            next_id(),
            BodyKind::BouncerSide,
            Vec2::new(-w / 2.0 + inset, 0.0),
            Vec2::new(strip, h - 2.0 * strip),
        )
        .with_restitution(0.0),
        part(
            next_id(),
            BodyKind::BouncerSide,
            Vec2::new(w / 2.0 - inset, 0.0),
            Vec2::new(strip, h - 2.0 * strip),
        )
        .with_restitution(0.0),
    ];

    root.parts = parts.iter().map(|p| p.id).collect();
    MaterialBodies { root, parts }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids() -> impl FnMut() -> BodyId {
        let mut next = 0;
        move || {
            next += 1;
            next
        }
    }

    #[test]
    fn test_from_str_round_trips_palette_names() {
        for kind in MaterialKind::ALL {
            assert_eq!(MaterialKind::from_str(kind.as_str()), Some(kind));
        }
        assert_eq!(MaterialKind::from_str("Wheel"), None);
        assert_eq!(MaterialKind::from_str("fan"), None);
        assert_eq!(MaterialKind::from_str(""), None);
    }

    #[test]
    fn test_planks_tilt_opposite_ways() {
        let left = build(MaterialKind::PlankLeft, Vec2::new(100.0, 100.0), ids()).root;
        let right = build(MaterialKind::PlankRight, Vec2::new(100.0, 100.0), ids()).root;
        assert!(left.angle < 0.0);
        assert!((left.angle + right.angle).abs() < 1e-6);
        assert!(left.is_static && !left.is_sensor);
        assert_eq!(left.kind(), BodyKind::PlankLeft);
    }

    #[test]
    fn test_fan_and_vortex_are_static_sensors() {
        for kind in [MaterialKind::Fan, MaterialKind::Vortex] {
            let bodies = build(kind, Vec2::ZERO, ids());
            assert!(bodies.root.is_static);
            assert!(bodies.root.is_sensor);
            assert!(bodies.parts.is_empty());
        }
    }

    #[test]
    fn test_bouncer_composite_layout() {
        let bodies = build(MaterialKind::Bouncer, Vec2::new(300.0, 300.0), ids());
        let root = &bodies.root;
        assert_eq!(root.kind(), BodyKind::BouncerComposite);
        assert!(!root.collidable);
        assert_eq!(root.parts.len(), 4);

        let kinds: Vec<_> = bodies.parts.iter().map(|p| p.kind()).collect();
        assert_eq!(
            kinds,
            vec![
                BodyKind::BouncerTop,
                BodyKind::BouncerBottom,
                BodyKind::BouncerSide,
                BodyKind::BouncerSide,
            ]
        );
        for part in &bodies.parts {
            assert_eq!(part.parent, Some(root.id));
            assert_eq!(part.group, BOUNCER_GROUP);
            assert!(part.is_static && part.collidable);
        }
        // Top strip sits above the centre, bottom strip below (y down)
        assert!(bodies.parts[0].pos.y < 300.0);
        assert!(bodies.parts[1].pos.y > 300.0);
        assert_eq!(bodies.parts[2].restitution, 0.0);
    }

    #[test]
    fn test_bumper_is_bouncy_triangle_around_centroid() {
        let bodies = build(MaterialKind::Bumper, Vec2::new(50.0, 50.0), ids());
        let root = bodies.root;
        assert_eq!(root.restitution, BUMPER_RESTITUTION);
        let Shape::Polygon { vertices } = &root.shape else {
            panic!("bumper should be a polygon");
        };
        assert_eq!(vertices.len(), 3);
        let centroid = vertices.iter().copied().sum::<Vec2>() / 3.0;
        assert!(centroid.length() < 1e-3);
    }

    #[test]
    fn test_each_kind_builds_its_own_root() {
        let mut roots = Vec::new();
        for kind in MaterialKind::ALL {
            let root = build(kind, Vec2::new(300.0, 300.0), || 1).root;
            assert_eq!(root.kind(), kind.root_kind());
            assert!(root.kind().is_draggable());
            assert!(!roots.contains(&root.kind()));
            roots.push(root.kind());
        }
    }
}
