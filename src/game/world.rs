//! Scene World
//!
//! The World owns every entity of the puzzle scene:
//! - Entity allocation and lifetime tracking
//! - Typed component storage
//! - Parent/child hierarchy with recursive despawn
//! - Layer-filtered ray casts against box colliders
//!
//! Component types are fixed at compile time, one storage field each.

use std::sync::Arc;

use image::RgbaImage;
use tracing::{debug, info};

use super::component::ComponentStorage;
use super::components::{Collider, Layer, LayerMask, Lens, Renderable};
use super::entity::{Entity, EntityAllocator};
use super::transform::{GlobalTransform, Transform};
use crate::asset::{Mesh, Model};
use crate::puzzle::PlacementTarget;
use crate::rasterizer::{ray_aabb_hit_t, Color, Light, Ray, Texture, Vec3};

/// Look of a drop target before and after it is solved
#[derive(Debug, Clone, Copy)]
pub struct TargetStyle {
    pub idle: Color,
    pub solved: Color,
}

/// Closest collider hit by a ray cast
#[derive(Debug, Clone, Copy)]
pub struct RayHit {
    pub entity: Entity,
    pub distance: f32,
}

/// The scene containing all entities and their components.
#[derive(Default)]
pub struct World {
    entities: EntityAllocator,

    // =========================================================================
    // Core
    // =========================================================================

    /// Local transform (relative to parent)
    pub transforms: ComponentStorage<Transform>,
    pub parents: ComponentStorage<Entity>,
    pub children: ComponentStorage<Vec<Entity>>,
    /// Debug names, shown in logs
    pub names: ComponentStorage<String>,

    // =========================================================================
    // Rendering
    // =========================================================================

    pub renderables: ComponentStorage<Renderable>,
    pub lights: ComponentStorage<Light>,
    pub lenses: ComponentStorage<Lens>,

    // =========================================================================
    // Puzzle
    // =========================================================================

    pub colliders: ComponentStorage<Collider>,
    pub targets: ComponentStorage<PlacementTarget>,
    pub target_styles: ComponentStorage<TargetStyle>,
}

impl World {
    pub fn new() -> Self {
        Self::default()
    }

    // =========================================================================
    // Entity Management
    // =========================================================================

    /// Spawn a new entity with an identity transform.
    pub fn spawn(&mut self) -> Entity {
        self.spawn_with(Transform::IDENTITY)
    }

    pub fn spawn_with(&mut self, transform: Transform) -> Entity {
        let entity = self.entities.allocate();
        self.transforms.insert(entity, transform);
        entity
    }

    /// Despawn an entity, its children, and all of their components.
    pub fn despawn(&mut self, entity: Entity) {
        if !self.entities.free(entity) {
            return;
        }

        if let Some(parent) = self.parents.remove(entity) {
            if let Some(siblings) = self.children.get_mut(parent) {
                siblings.retain(|&e| e != entity);
            }
        }

        if let Some(child_list) = self.children.remove(entity) {
            for child in child_list {
                self.despawn(child);
            }
        }

        let idx = entity.index();
        self.transforms.clear_slot(idx);
        self.names.clear_slot(idx);
        self.renderables.clear_slot(idx);
        self.lights.clear_slot(idx);
        self.lenses.clear_slot(idx);
        self.colliders.clear_slot(idx);
        self.targets.clear_slot(idx);
        self.target_styles.clear_slot(idx);
    }

    pub fn is_alive(&self, entity: Entity) -> bool {
        self.entities.is_alive(entity)
    }

    pub fn entity_count(&self) -> u32 {
        self.entities.alive_count()
    }

    /// Live handle for a storage slot index
    pub fn entity_at(&self, index: u32) -> Option<Entity> {
        self.entities.entity_at(index)
    }

    pub fn name(&self, entity: Entity) -> &str {
        self.names.get(entity).map(String::as_str).unwrap_or("<unnamed>")
    }

    // =========================================================================
    // Hierarchy
    // =========================================================================

    /// Set an entity's parent, updating both sides of the link.
    pub fn set_parent(&mut self, child: Entity, parent: Entity) {
        if let Some(old_parent) = self.parents.get(child).copied() {
            if let Some(siblings) = self.children.get_mut(old_parent) {
                siblings.retain(|&e| e != child);
            }
        }

        self.parents.insert(child, parent);

        if let Some(children) = self.children.get_mut(parent) {
            children.push(child);
        } else {
            self.children.insert(parent, vec![child]);
        }
    }

    pub fn get_children(&self, entity: Entity) -> &[Entity] {
        self.children.get(entity).map(|v| v.as_slice()).unwrap_or(&[])
    }

    /// The entity and all of its descendants, parents first
    pub fn subtree(&self, root: Entity) -> Vec<Entity> {
        let mut out = Vec::new();
        let mut stack = vec![root];
        while let Some(e) = stack.pop() {
            if !self.is_alive(e) {
                continue;
            }
            out.push(e);
            stack.extend(self.get_children(e).iter().rev().copied());
        }
        out
    }

    /// World-space transform, composed through all ancestors
    pub fn global_transform(&self, entity: Entity) -> GlobalTransform {
        let local = self.transforms.get(entity).copied().unwrap_or_default();
        match self.parents.get(entity) {
            Some(&parent) => GlobalTransform::from_parent_and_local(&self.global_transform(parent), &local),
            None => GlobalTransform::from_transform(&local),
        }
    }

    // =========================================================================
    // Spawners
    // =========================================================================

    /// Instantiate a model: a root entity with one child per part.
    /// Parts flagged for collision get a fitted collider on the scene layer.
    pub fn instantiate_model(&mut self, model: &Model, transform: Transform) -> Entity {
        let root = self.spawn_with(transform);
        self.names.insert(root, model.name.clone());

        for part in &model.parts {
            let child = self.spawn_with(Transform::from_position_rotation(part.offset, part.rotation));
            self.renderables.insert(child, Renderable::new(Arc::clone(&part.mesh), part.color));
            if part.collider {
                if let Some((lo, hi)) = part.mesh.bounds() {
                    self.colliders.insert(child, Collider::from_bounds(lo, hi, Layer::Scene));
                }
            }
            self.set_parent(child, root);
        }
        root
    }

    /// Spawn a textured quad showing a sprite, `height` world units tall
    pub fn spawn_sprite(&mut self, sprite: Arc<RgbaImage>, height: f32, transform: Transform) -> Entity {
        let aspect = if sprite.height() > 0 {
            sprite.width() as f32 / sprite.height() as f32
        } else {
            1.0
        };
        let mesh = Arc::new(Mesh::quad(height * aspect, height, Some(0)));
        let entity = self.spawn_with(transform);
        self.renderables.insert(entity, Renderable::textured(mesh, Texture::new(sprite)));
        entity
    }

    /// Spawn a drop target: a visible box with a collider on the target layer
    pub fn spawn_target(&mut self, target: PlacementTarget, size: Vec3, style: TargetStyle, transform: Transform) -> Entity {
        let entity = self.spawn_with(transform);
        self.names.insert(entity, format!("target:{}", target.expected_id()));
        self.renderables.insert(entity, Renderable::new(Arc::new(Mesh::cuboid(size)), style.idle));
        self.colliders.insert(entity, Collider::cuboid(size.scale(0.5), Layer::Target));
        self.targets.insert(entity, target);
        self.target_styles.insert(entity, style);
        entity
    }

    /// Enable or disable every collider in a subtree
    pub fn set_colliders_enabled(&mut self, root: Entity, enabled: bool) {
        for e in self.subtree(root) {
            if let Some(c) = self.colliders.get_mut(e) {
                c.enabled = enabled;
            }
        }
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// World-space bounds of the visible geometry in a subtree
    pub fn world_bounds(&self, root: Entity) -> Option<(Vec3, Vec3)> {
        let mut result: Option<(Vec3, Vec3)> = None;
        for e in self.subtree(root) {
            let Some(r) = self.renderables.get(e).filter(|r| r.visible) else {
                continue;
            };
            let global = self.global_transform(e);
            for v in &r.mesh.vertices {
                let p = global.transform_point(v.pos);
                result = Some(match result {
                    Some((lo, hi)) => (lo.min(p), hi.max(p)),
                    None => (p, p),
                });
            }
        }
        result
    }

    /// Nearest enabled collider on `mask` within `max_distance` along the ray
    pub fn raycast(&self, ray: &Ray, max_distance: f32, mask: LayerMask) -> Option<RayHit> {
        let mut best: Option<RayHit> = None;
        for (idx, collider) in self.colliders.iter() {
            if !collider.enabled || !mask.contains(collider.layer) {
                continue;
            }
            let Some(entity) = self.entity_at(idx) else {
                continue;
            };
            let global = self.global_transform(entity);
            let origin = global.inverse_transform_point(ray.origin);
            let dir = global.inverse_transform_vector(ray.direction);
            let min = collider.center - collider.half_extents;
            let max = collider.center + collider.half_extents;

            let Some(t) = ray_aabb_hit_t(origin, dir, min, max) else {
                continue;
            };
            if t > max_distance || best.is_some_and(|b| b.distance <= t) {
                continue;
            }
            best = Some(RayHit { entity, distance: t });
        }
        best
    }

    /// Offer a piece id to the target on `entity`.
    ///
    /// On a match the target turns solved, switches to its solved tint and
    /// stops taking part in ray casts. Non-target entities always reject.
    pub fn check_target(&mut self, entity: Entity, candidate: &str) -> bool {
        let Some(target) = self.targets.get_mut(entity) else {
            return false;
        };
        if !target.check(candidate) {
            debug!(target = target.expected_id(), candidate, "target rejected piece");
            return false;
        }

        info!(target = target.expected_id(), "target solved");
        if let (Some(style), Some(r)) = (self.target_styles.get(entity), self.renderables.get_mut(entity)) {
            r.tint = style.solved;
        }
        if let Some(c) = self.colliders.get_mut(entity) {
            c.enabled = false;
        }
        true
    }

    /// Targets that have not been solved yet
    pub fn unsolved_target_count(&self) -> usize {
        self.targets.iter().filter(|(_, t)| !t.is_solved()).count()
    }

    pub fn target_count(&self) -> usize {
        self.targets.count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::asset::ModelPart;

    fn style() -> TargetStyle {
        TargetStyle { idle: Color::new(80, 80, 80), solved: Color::new(40, 200, 90) }
    }

    fn target_at(world: &mut World, label: &str, position: Vec3) -> Entity {
        world.spawn_target(
            PlacementTarget::from_label(label),
            Vec3::new(2.0, 0.5, 2.0),
            style(),
            Transform::from_position(position),
        )
    }

    #[test]
    fn test_hierarchy_despawn() {
        let mut world = World::new();
        let parent = world.spawn();
        let child1 = world.spawn();
        let child2 = world.spawn();
        world.set_parent(child1, parent);
        world.set_parent(child2, child1);

        assert_eq!(world.entity_count(), 3);
        world.despawn(parent);
        assert_eq!(world.entity_count(), 0);
        assert!(!world.is_alive(child2));
    }

    #[test]
    fn test_global_transform_through_parents() {
        let mut world = World::new();
        let parent = world.spawn_with(Transform::from_position(Vec3::new(0.0, 10.0, 0.0)).with_scale(2.0));
        let child = world.spawn_with(Transform::from_position(Vec3::new(1.0, 0.0, 0.0)));
        world.set_parent(child, parent);

        let p = world.global_transform(child).position();
        assert!((p - Vec3::new(2.0, 10.0, 0.0)).len() < 0.001);
    }

    #[test]
    fn test_raycast_picks_nearest_on_mask() {
        let mut world = World::new();
        let near = target_at(&mut world, "near", Vec3::new(0.0, 0.0, 5.0));
        let _far = target_at(&mut world, "far", Vec3::new(0.0, 0.0, 10.0));
        let scenery = world.spawn_with(Transform::from_position(Vec3::new(0.0, 0.0, 2.0)));
        world.colliders.insert(scenery, Collider::cuboid(Vec3::new(1.0, 1.0, 1.0), Layer::Scene));

        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, 0.0, 1.0));
        let hit = world.raycast(&ray, 20.0, LayerMask::TARGETS).expect("hit");
        assert_eq!(hit.entity, near);
        assert!((hit.distance - 4.0).abs() < 0.001);

        let any = world.raycast(&ray, 20.0, Layer::Scene.mask()).expect("hit");
        assert_eq!(any.entity, scenery);
    }

    #[test]
    fn test_raycast_respects_max_distance() {
        let mut world = World::new();
        target_at(&mut world, "far", Vec3::new(0.0, 0.0, 30.0));
        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, 0.0, 1.0));
        assert!(world.raycast(&ray, 20.0, LayerMask::TARGETS).is_none());
    }

    #[test]
    fn test_raycast_rotated_scaled_box() {
        let mut world = World::new();
        let e = world.spawn_with(
            Transform::from_position_rotation(Vec3::new(0.0, 0.0, 10.0), Vec3::new(0.0, 90.0, 0.0)).with_scale(2.0),
        );
        // 4 wide along local X; after 90 deg yaw that extent lies along world Z
        world.colliders.insert(e, Collider::cuboid(Vec3::new(2.0, 0.5, 0.5), Layer::Target));

        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, 0.0, 1.0));
        let hit = world.raycast(&ray, 20.0, LayerMask::TARGETS).expect("hit");
        assert!((hit.distance - 6.0).abs() < 0.01, "distance {}", hit.distance);
    }

    #[test]
    fn test_check_target_solves_and_disables() {
        let mut world = World::new();
        let t = target_at(&mut world, "  Aster ", Vec3::new(0.0, 0.0, 5.0));

        assert!(!world.check_target(t, "Borage"));
        assert!(world.check_target(t, "Aster"));
        assert!(!world.check_target(t, "Aster"));
        assert_eq!(world.renderables.get(t).unwrap().tint, style().solved);
        assert_eq!(world.unsolved_target_count(), 0);

        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, 0.0, 1.0));
        assert!(world.raycast(&ray, 20.0, LayerMask::TARGETS).is_none());
    }

    #[test]
    fn test_instantiate_model_and_bounds() {
        let mut world = World::new();
        let model = Model::new(
            "slab",
            vec![ModelPart::new(Mesh::cuboid(Vec3::new(2.0, 0.25, 1.0)), Color::WHITE)],
        );
        let root = world.instantiate_model(&model, Transform::from_position(Vec3::new(5.0, 0.0, 0.0)));
        assert_eq!(world.subtree(root).len(), 2);

        let (lo, hi) = world.world_bounds(root).unwrap();
        assert!((lo.x - 4.0).abs() < 1e-4 && (hi.x - 6.0).abs() < 1e-4);

        world.set_colliders_enabled(root, false);
        let ray = Ray::new(Vec3::new(5.0, 0.0, -5.0), Vec3::new(0.0, 0.0, 1.0));
        assert!(world.raycast(&ray, 20.0, Layer::Scene.mask()).is_none());
    }
}
