//! Rigid body store
//!
//! Bodies are kept in a vector sorted by id. Everything outside this module
//! refers to bodies by id, so removal while a tick is in flight is safe: a
//! lookup for a removed body simply returns `None`.

use super::body::{Body, BodyId};

#[derive(Debug, Clone, Default)]
pub struct BodyStore {
    bodies: Vec<Body>,
}

impl BodyStore {
    pub fn new() -> Self {
        Self { bodies: Vec::new() }
    }

    /// Insert a body. Returns false (and leaves the store untouched) if a
    /// body with the same id is already present.
    pub fn add(&mut self, body: Body) -> bool {
        match self.bodies.binary_search_by_key(&body.id, |b| b.id) {
            Ok(_) => {
                log::warn!("Rejected duplicate body id {}", body.id);
                false
            }
            Err(index) => {
                self.bodies.insert(index, body);
                true
            }
        }
    }

    /// Remove a body by id. Removing a missing body is a no-op.
    pub fn remove(&mut self, id: BodyId) -> Option<Body> {
        let index = self.index_of(id)?;
        Some(self.bodies.remove(index))
    }

    pub fn get(&self, id: BodyId) -> Option<&Body> {
        self.index_of(id).map(|i| &self.bodies[i])
    }

    pub fn get_mut(&mut self, id: BodyId) -> Option<&mut Body> {
        self.index_of(id).map(move |i| &mut self.bodies[i])
    }

    /// Mutable access to two distinct bodies at once
    pub fn pair_mut(&mut self, a: BodyId, b: BodyId) -> Option<(&mut Body, &mut Body)> {
        if a == b {
            return None;
        }
        let ia = self.index_of(a)?;
        let ib = self.index_of(b)?;
        if ia < ib {
            let (left, right) = self.bodies.split_at_mut(ib);
            Some((&mut left[ia], &mut right[0]))
        } else {
            let (left, right) = self.bodies.split_at_mut(ia);
            Some((&mut right[0], &mut left[ib]))
        }
    }

    pub fn contains(&self, id: BodyId) -> bool {
        self.index_of(id).is_some()
    }

    /// All bodies in id order
    pub fn all_bodies(&self) -> &[Body] {
        &self.bodies
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Body> {
        self.bodies.iter_mut()
    }

    pub fn clear(&mut self) {
        self.bodies.clear();
    }

    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    fn index_of(&self, id: BodyId) -> Option<usize> {
        self.bodies.binary_search_by_key(&id, |b| b.id).ok()
    }
}
