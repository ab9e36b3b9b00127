//! Component Storage
//!
//! `ComponentStorage<T>` is a sparse array from entity slot index to data.
//! The puzzle scene holds a few dozen entities at most, so holes are cheap.

use super::entity::Entity;

/// Sparse storage for a single component type.
#[derive(Debug)]
pub struct ComponentStorage<T> {
    /// Indexed by entity.index()
    data: Vec<Option<T>>,
}

impl<T> ComponentStorage<T> {
    pub fn new() -> Self {
        Self { data: Vec::new() }
    }

    /// Insert a component for an entity, replacing any existing one.
    pub fn insert(&mut self, entity: Entity, component: T) {
        let idx = entity.index() as usize;
        if idx >= self.data.len() {
            self.data.resize_with(idx + 1, || None);
        }
        self.data[idx] = Some(component);
    }

    pub fn remove(&mut self, entity: Entity) -> Option<T> {
        self.data.get_mut(entity.index() as usize).and_then(Option::take)
    }

    pub fn get(&self, entity: Entity) -> Option<&T> {
        self.data.get(entity.index() as usize).and_then(|opt| opt.as_ref())
    }

    pub fn get_mut(&mut self, entity: Entity) -> Option<&mut T> {
        self.data.get_mut(entity.index() as usize).and_then(|opt| opt.as_mut())
    }

    pub fn contains(&self, entity: Entity) -> bool {
        self.get(entity).is_some()
    }

    /// Iterate over (slot index, component) pairs.
    /// Liveness is the caller's job; despawn clears slots eagerly.
    pub fn iter(&self) -> impl Iterator<Item = (u32, &T)> {
        self.data
            .iter()
            .enumerate()
            .filter_map(|(idx, opt)| opt.as_ref().map(|c| (idx as u32, c)))
    }

    /// Drop whatever is stored in a slot (despawn cleanup).
    pub fn clear_slot(&mut self, index: u32) {
        if let Some(slot) = self.data.get_mut(index as usize) {
            *slot = None;
        }
    }

    /// Number of entities that have this component.
    pub fn count(&self) -> usize {
        self.data.iter().filter(|opt| opt.is_some()).count()
    }
}

impl<T> Default for ComponentStorage<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_get_remove() {
        let mut storage: ComponentStorage<&str> = ComponentStorage::new();
        let entity = Entity::new(5, 0);

        storage.insert(entity, "slab");
        assert_eq!(storage.get(entity), Some(&"slab"));
        assert_eq!(storage.remove(entity), Some("slab"));
        assert!(!storage.contains(entity));
        assert_eq!(storage.remove(Entity::new(99, 0)), None);
    }

    #[test]
    fn test_sparse_iteration_and_count() {
        let mut storage: ComponentStorage<i32> = ComponentStorage::new();
        storage.insert(Entity::new(0, 0), 1);
        storage.insert(Entity::new(7, 0), 2);

        let items: Vec<_> = storage.iter().collect();
        assert_eq!(items, vec![(0, &1), (7, &2)]);
        storage.clear_slot(7);
        assert_eq!(storage.count(), 1);
    }
}
