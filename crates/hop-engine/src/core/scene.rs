use crate::api::types::EntityId;
use crate::components::object::PhysicsObject;

/// Physics objects in update order, stored in a flat Vec.
/// Designed for level-sized counts (hundreds, not millions).
#[derive(Debug, Default)]
pub struct ObjectSet {
    objects: Vec<PhysicsObject>,
}

impl ObjectSet {
    pub fn new() -> Self {
        Self {
            objects: Vec::with_capacity(64),
        }
    }

    /// Add an object; it updates after everything already present.
    pub fn spawn(&mut self, object: PhysicsObject) {
        self.objects.push(object);
    }

    /// Remove an object by ID, keeping the update order of the rest.
    pub fn despawn(&mut self, id: EntityId) -> Option<PhysicsObject> {
        let idx = self.index_of(id)?;
        Some(self.objects.remove(idx))
    }

    pub fn index_of(&self, id: EntityId) -> Option<usize> {
        self.objects.iter().position(|o| o.id() == id)
    }

    pub fn get(&self, id: EntityId) -> Option<&PhysicsObject> {
        self.objects.iter().find(|o| o.id() == id)
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut PhysicsObject> {
        self.objects.iter_mut().find(|o| o.id() == id)
    }

    pub fn get_index(&self, idx: usize) -> Option<&PhysicsObject> {
        self.objects.get(idx)
    }

    pub fn get_index_mut(&mut self, idx: usize) -> Option<&mut PhysicsObject> {
        self.objects.get_mut(idx)
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.index_of(id).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = &PhysicsObject> {
        self.objects.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut PhysicsObject> {
        self.objects.iter_mut()
    }

    pub fn ids(&self) -> Vec<EntityId> {
        self.objects.iter().map(|o| o.id()).collect()
    }

    /// Find the first object with the given tag.
    pub fn find_by_tag(&self, tag: &str) -> Option<&PhysicsObject> {
        self.objects.iter().find(|o| o.tag() == tag)
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn clear(&mut self) {
        self.objects.clear();
    }
}
