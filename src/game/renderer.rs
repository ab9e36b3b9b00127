//! Scene Renderer
//!
//! Draws World renderables into a software framebuffer. Meshes are stored in
//! local space; each draw transforms vertices by the entity's global
//! transform before handing them to the rasterizer.

use crate::rasterizer::{render_mesh, Camera, Framebuffer, Light, RasterSettings, ShadingMode, Vertex};

use super::entity::Entity;
use super::world::World;

/// Lights placed in the scene, in world space
pub fn collect_lights(world: &World, entities: impl Iterator<Item = Entity>) -> Vec<Light> {
    let mut lights = Vec::new();
    for e in entities {
        let Some(light) = world.lights.get(e) else {
            continue;
        };
        let global = world.global_transform(e);
        lights.push(Light::directional(global.transform_vector(light.direction), light.intensity));
    }
    lights
}

/// Draw the listed entities that carry a visible renderable.
/// Unlit renderables skip shading and keep their texture colors.
pub fn render_entities(
    world: &World,
    fb: &mut Framebuffer,
    camera: &Camera,
    entities: &[Entity],
    settings: &RasterSettings,
) {
    let unlit = RasterSettings {
        shading: ShadingMode::None,
        ..settings.clone()
    };
    for &e in entities {
        let Some(r) = world.renderables.get(e).filter(|r| r.visible) else {
            continue;
        };
        let global = world.global_transform(e);
        let vertices: Vec<Vertex> = r
            .mesh
            .vertices
            .iter()
            .map(|v| Vertex::new(global.transform_point(v.pos), v.uv, global.transform_vector(v.normal).normalize()))
            .collect();
        let textures = r.texture.as_slice();
        let settings = if r.unlit { &unlit } else { settings };
        render_mesh(fb, &vertices, &r.mesh.faces, textures, r.tint, camera, settings);
    }
}

/// Draw the whole scene. Scene lights replace the default rig when present.
pub fn render_scene(world: &World, fb: &mut Framebuffer, camera: &Camera, base: &RasterSettings) {
    let all: Vec<Entity> = world
        .transforms
        .iter()
        .filter_map(|(idx, _)| world.entity_at(idx))
        .collect();

    let lights = collect_lights(world, all.iter().copied());
    if lights.is_empty() {
        render_entities(world, fb, camera, &all, base);
    } else {
        let settings = RasterSettings { lights, ..base.clone() };
        render_entities(world, fb, camera, &all, &settings);
    }
}

/// Draw one subtree alone, lit only by lights inside it
pub fn render_subtree(world: &World, fb: &mut Framebuffer, camera: &Camera, root: Entity, base: &RasterSettings) {
    let entities = world.subtree(root);
    let settings = RasterSettings {
        lights: collect_lights(world, entities.iter().copied()),
        ..base.clone()
    };
    render_entities(world, fb, camera, &entities, &settings);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{Transform, TargetStyle};
    use crate::puzzle::PlacementTarget;
    use crate::rasterizer::{Color, Vec3};
    use image::{Rgba, RgbaImage};
    use std::sync::Arc;

    #[test]
    fn test_render_scene_draws_target() {
        let mut world = World::new();
        world.spawn_target(
            PlacementTarget::from_label("Aster"),
            Vec3::new(1.0, 1.0, 1.0),
            TargetStyle { idle: Color::new(200, 50, 50), solved: Color::WHITE },
            Transform::from_position(Vec3::new(0.0, 0.0, 5.0)),
        );
        let camera = Camera::looking_at(Vec3::ZERO, Vec3::new(0.0, 0.0, 5.0), 60.0);
        let mut fb = Framebuffer::new(64, 64);
        fb.clear_transparent();

        render_scene(&world, &mut fb, &camera, &RasterSettings::default());
        assert_eq!(fb.pixel(32, 32)[3], 255);
        assert_eq!(fb.pixel(0, 0)[3], 0);
    }

    #[test]
    fn test_subtree_excludes_other_entities() {
        let mut world = World::new();
        let style = TargetStyle { idle: Color::WHITE, solved: Color::WHITE };
        world.spawn_target(
            PlacementTarget::from_label("Aster"),
            Vec3::new(1.0, 1.0, 1.0),
            style,
            Transform::from_position(Vec3::new(0.0, 0.0, 5.0)),
        );
        let lone = world.spawn();
        let camera = Camera::looking_at(Vec3::ZERO, Vec3::new(0.0, 0.0, 5.0), 60.0);
        let mut fb = Framebuffer::new(32, 32);
        fb.clear_transparent();

        render_subtree(&world, &mut fb, &camera, lone, &RasterSettings::default());
        assert_eq!(fb.covered_pixels(), 0);
    }

    #[test]
    fn test_collect_lights_follows_parent() {
        let mut world = World::new();
        // Yaw 90 degrees: local +Z ends up pointing along world +X
        let parent = world.spawn_with(Transform::from_position_rotation(Vec3::new(0.0, 5.0, 0.0), Vec3::new(0.0, 90.0, 0.0)));
        let lamp = world.spawn();
        world.lights.insert(lamp, Light::directional(Vec3::new(0.0, 0.0, 1.0), 0.7));
        world.set_parent(lamp, parent);

        let lights = collect_lights(&world, world.subtree(parent).into_iter());
        assert_eq!(lights.len(), 1);
        assert!((lights[0].direction - Vec3::new(1.0, 0.0, 0.0)).len() < 1e-4);
        assert_eq!(lights[0].intensity, 0.7);
    }

    #[test]
    fn test_sprites_ignore_lighting() {
        let mut world = World::new();
        let sprite = Arc::new(RgbaImage::from_pixel(4, 4, Rgba([40, 160, 220, 255])));
        world.spawn_sprite(sprite, 2.0, Transform::from_position(Vec3::new(0.0, 0.0, 5.0)));
        let camera = Camera::looking_at(Vec3::ZERO, Vec3::new(0.0, 0.0, 5.0), 60.0);
        let dark = RasterSettings { lights: Vec::new(), ambient: 0.1, ..RasterSettings::default() };
        let mut fb = Framebuffer::new(32, 32);
        fb.clear_transparent();

        render_scene(&world, &mut fb, &camera, &dark);
        assert_eq!(fb.pixel(16, 16), [40, 160, 220, 255]);
    }
}
