//! Entity handles with generational indices
//!
//! A drag proxy or thumbnail rig is spawned and destroyed every few seconds,
//! so slots get reused constantly. The generation counter makes a stale
//! handle to a destroyed proxy fail `is_alive` instead of aliasing whatever
//! reused its slot.

/// A unique identifier for a scene entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Entity {
    index: u32,
    generation: u32,
}

impl Entity {
    /// Only the allocator mints entities.
    pub(crate) fn new(index: u32, generation: u32) -> Self {
        Self { index, generation }
    }

    /// Slot index (for component array access).
    pub fn index(&self) -> u32 {
        self.index
    }
}

/// Allocates and tracks entity lifetimes.
#[derive(Debug, Default)]
pub struct EntityAllocator {
    /// Current generation of each slot
    generations: Vec<u32>,
    /// Freed slots, reused LIFO
    free_indices: Vec<u32>,
    alive_count: u32,
}

impl EntityAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn allocate(&mut self) -> Entity {
        self.alive_count += 1;

        if let Some(index) = self.free_indices.pop() {
            // Generation was already bumped on free
            Entity::new(index, self.generations[index as usize])
        } else {
            let index = self.generations.len() as u32;
            self.generations.push(0);
            Entity::new(index, 0)
        }
    }

    /// Free an entity. Returns false if it was already dead.
    pub fn free(&mut self, entity: Entity) -> bool {
        if !self.is_alive(entity) {
            return false;
        }

        self.generations[entity.index as usize] += 1;
        self.free_indices.push(entity.index);
        self.alive_count -= 1;
        true
    }

    pub fn is_alive(&self, entity: Entity) -> bool {
        self.generations.get(entity.index as usize) == Some(&entity.generation)
            && !self.free_indices.contains(&entity.index)
    }

    pub fn alive_count(&self) -> u32 {
        self.alive_count
    }

    /// Live entity handle for a slot index, if that slot is occupied
    pub fn entity_at(&self, index: u32) -> Option<Entity> {
        let generation = *self.generations.get(index as usize)?;
        let entity = Entity::new(index, generation);
        self.is_alive(entity).then_some(entity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allocate_and_free() {
        let mut alloc = EntityAllocator::new();

        let e1 = alloc.allocate();
        let e2 = alloc.allocate();
        assert_eq!(alloc.alive_count(), 2);

        assert!(alloc.free(e1));
        assert_eq!(alloc.alive_count(), 1);
        assert!(!alloc.is_alive(e1));
        assert!(alloc.is_alive(e2));
        assert!(!alloc.free(e1));
    }

    #[test]
    fn test_generation_prevents_reuse_collision() {
        let mut alloc = EntityAllocator::new();

        let proxy = alloc.allocate();
        alloc.free(proxy);

        let next = alloc.allocate();
        assert_eq!(next.index(), proxy.index());
        assert_ne!(next.generation, proxy.generation);
        assert!(!alloc.is_alive(proxy));
        assert!(alloc.is_alive(next));
    }

    #[test]
    fn test_entity_at_skips_free_slots() {
        let mut alloc = EntityAllocator::new();
        let a = alloc.allocate();
        let b = alloc.allocate();
        alloc.free(a);

        assert_eq!(alloc.entity_at(a.index()), None);
        assert_eq!(alloc.entity_at(b.index()), Some(b));
    }
}
