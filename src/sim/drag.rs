//! Pointer dragging of placed materials
//!
//! A dragged body is pinned to the pointer: its velocity is zeroed every
//! tick and (for vortices) its force field is suspended. Composite parts
//! follow their root.

use glam::Vec2;

use super::body::BodyId;
use super::store::BodyStore;

/// An active drag: which root body, and where it was grabbed
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragState {
    pub body: BodyId,
    /// Body position minus the grab point
    pub offset: Vec2,
}

impl DragState {
    /// Pick up the most recently added draggable body under `point`
    pub fn begin(store: &mut BodyStore, point: Vec2) -> Option<Self> {
        let (id, kind, pos) = store
            .all_bodies()
            .iter()
            .rev()
            .find(|b| b.kind().is_draggable() && b.contains_point(point))
            .map(|b| (b.id, b.kind(), b.pos))?;

        set_dragged(store, id, true);
        log::debug!("Drag start on {} {id}", kind.as_str());
        Some(Self {
            body: id,
            offset: pos - point,
        })
    }

    /// Follow the pointer
    pub fn update(&self, store: &mut BodyStore, point: Vec2) {
        move_to(store, self.body, point + self.offset);
    }

    /// Release the body
    pub fn end(self, store: &mut BodyStore) {
        set_dragged(store, self.body, false);
        log::debug!("Drag end on body {}", self.body);
    }
}

/// Move a root body and its parts so the root lands on `target`
pub fn move_to(store: &mut BodyStore, id: BodyId, target: Vec2) {
    let Some(root) = store.get_mut(id) else {
        return;
    };
    let delta = target - root.pos;
    root.pos = target;
    root.vel = Vec2::ZERO;
    let parts = root.parts.clone();

    for part_id in parts {
        if let Some(part) = store.get_mut(part_id) {
            part.pos += delta;
            part.vel = Vec2::ZERO;
        }
    }
}

fn set_dragged(store: &mut BodyStore, id: BodyId, dragged: bool) {
    let Some(root) = store.get_mut(id) else {
        return;
    };
    root.dragged = dragged;
    let parts = root.parts.clone();

    for part_id in parts {
        if let Some(part) = store.get_mut(part_id) {
            part.dragged = dragged;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::body::{Body, BodyKind, Shape};
    use crate::sim::materials::{self, MaterialKind};

    fn store_with(kind: MaterialKind, pos: Vec2, first_id: BodyId) -> BodyStore {
        let mut store = BodyStore::new();
        let mut next = first_id;
        let bodies = materials::build(kind, pos, || {
            let id = next;
            next += 1;
            id
        });
        store.add(bodies.root);
        for part in bodies.parts {
            store.add(part);
        }
        store
    }

    #[test]
    fn test_begin_picks_draggable_under_pointer() {
        let mut store = store_with(MaterialKind::Fan, Vec2::new(100.0, 100.0), 1);
        let drag = DragState::begin(&mut store, Vec2::new(105.0, 110.0)).unwrap();
        assert_eq!(drag.body, 1);
        assert_eq!(drag.offset, Vec2::new(-5.0, -10.0));
        assert!(store.get(1).unwrap().dragged);

        assert!(DragState::begin(&mut store, Vec2::new(300.0, 300.0)).is_none());
    }

    #[test]
    fn test_begin_ignores_balls_and_walls() {
        let mut store = BodyStore::new();
        store.add(Body::new(1, BodyKind::Ball, Shape::Circle { radius: 10.0 }, Vec2::ZERO));
        store.add(Body::new(2, BodyKind::Wall, Shape::rectangle(50.0, 50.0), Vec2::ZERO).with_static());
        assert!(DragState::begin(&mut store, Vec2::ZERO).is_none());
    }

    #[test]
    fn test_topmost_body_wins() {
        let mut store = store_with(MaterialKind::Vortex, Vec2::new(100.0, 100.0), 1);
        let vortex = materials::build(MaterialKind::Vortex, Vec2::new(110.0, 100.0), || 2).root;
        store.add(vortex);
        let drag = DragState::begin(&mut store, Vec2::new(105.0, 100.0)).unwrap();
        assert_eq!(drag.body, 2);
    }

    #[test]
    fn test_bouncer_parts_follow_root() {
        let mut store = store_with(MaterialKind::Bouncer, Vec2::new(200.0, 200.0), 10);
        let top_before = store.get(11).unwrap().pos;

        let drag = DragState::begin(&mut store, Vec2::new(200.0, 200.0)).unwrap();
        assert_eq!(drag.body, 10);
        assert!(store.get(11).unwrap().dragged);

        drag.update(&mut store, Vec2::new(250.0, 180.0));
        assert_eq!(store.get(10).unwrap().pos, Vec2::new(250.0, 180.0));
        assert_eq!(store.get(11).unwrap().pos, top_before + Vec2::new(50.0, -20.0));

        drag.end(&mut store);
        assert!(!store.get(10).unwrap().dragged);
        assert!(!store.get(14).unwrap().dragged);
    }
}
