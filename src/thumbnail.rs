//! Procedural thumbnails
//!
//! Model pieces need a 2D image for their inventory slot. The renderer builds
//! a temporary rig far below the play area, frames the model with a camera
//! fitted to its bounds, rasterizes it alone onto a transparent square and
//! tears the rig down again before returning.
//!
//! ```text
//! root (isolation_origin)
//! ├── model instance   (colliders disabled)
//! ├── camera           (Lens)
//! └── key light
//! ```

use std::path::Path;
use std::sync::Arc;

use image::RgbaImage;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::asset::{Model, PieceAsset, PieceVisual};
use crate::game::{render_subtree, Lens, Transform, World};
use crate::puzzle::{SlotImage, SlotImageSource};
use crate::rasterizer::{Camera, Framebuffer, Light, RasterSettings, ShadingMode, Vec3};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThumbnailConfig {
    /// Side length of the square output, in pixels
    pub size: u32,
    /// Vertical field of view (degrees), clamped to 1..=179
    pub fov_degrees: f32,
    /// Padding factor applied to the fitted distance
    pub buffer: f32,
    /// Closest the camera is allowed to get
    pub min_distance: f32,
    /// Camera elevation above the model (degrees)
    pub view_pitch_degrees: f32,
    /// Camera angle around the model's vertical axis (degrees)
    pub view_yaw_degrees: f32,
    /// Where the temporary rig is built
    pub isolation_origin: Vec3,
}

impl Default for ThumbnailConfig {
    fn default() -> Self {
        Self {
            size: 256,
            fov_degrees: 45.0,
            buffer: 1.5,
            min_distance: 0.1,
            view_pitch_degrees: 20.0,
            view_yaw_degrees: 30.0,
            isolation_origin: Vec3::new(0.0, -10000.0, 0.0),
        }
    }
}

/// Camera distance at which an object of `max_dim` fills the view.
/// Zero-sized objects get `min_distance`.
pub fn fit_distance(max_dim: f32, fov_degrees: f32, buffer: f32, min_distance: f32) -> f32 {
    let half_fov = fov_degrees.clamp(1.0, 179.0).to_radians() * 0.5;
    let d = (max_dim.max(0.0) * 0.5) / half_fov.tan() * buffer;
    if d.is_finite() {
        d.max(min_distance)
    } else {
        min_distance
    }
}

/// A finished thumbnail. Cloning shares the pixels.
#[derive(Debug, Clone)]
pub struct ThumbnailImage(Arc<RgbaImage>);

impl ThumbnailImage {
    pub fn image(&self) -> &RgbaImage {
        &self.0
    }

    pub fn into_shared(self) -> Arc<RgbaImage> {
        self.0
    }

    pub fn save_png(&self, path: &Path) -> Result<(), image::ImageError> {
        self.0.save_with_format(path, image::ImageFormat::Png)
    }
}

pub struct ThumbnailRenderer {
    config: ThumbnailConfig,
}

impl ThumbnailRenderer {
    pub fn new(config: ThumbnailConfig) -> Self {
        Self { config }
    }

    /// Unit vector from the model toward the camera
    fn view_direction(&self) -> Vec3 {
        let pitch = self.config.view_pitch_degrees.to_radians();
        let yaw = self.config.view_yaw_degrees.to_radians();
        Vec3::new(yaw.sin() * pitch.cos(), pitch.sin(), -yaw.cos() * pitch.cos())
    }

    /// Render a model alone onto a transparent square.
    ///
    /// Everything spawned here is despawned before returning, so the scene
    /// is left exactly as it was found.
    pub fn render(&self, world: &mut World, model: &Model) -> ThumbnailImage {
        let cfg = &self.config;
        let size = cfg.size.max(1);

        let root = world.spawn_with(Transform::from_position(cfg.isolation_origin));
        world.names.insert(root, format!("thumbnail:{}", model.name));
        let instance = world.instantiate_model(model, Transform::IDENTITY);
        world.set_parent(instance, root);
        world.set_colliders_enabled(instance, false);

        let (center, max_dim) = match world.world_bounds(instance) {
            Some((lo, hi)) => ((lo + hi).scale(0.5), (hi - lo).max_element()),
            None => (cfg.isolation_origin, 0.0),
        };
        let distance = fit_distance(max_dim, cfg.fov_degrees, cfg.buffer, cfg.min_distance);
        let toward_camera = self.view_direction();

        let lens = Lens { fov_degrees: cfg.fov_degrees.clamp(1.0, 179.0) };
        let camera_entity = world.spawn_with(Transform::from_position(center + toward_camera.scale(distance) - cfg.isolation_origin));
        world.lenses.insert(camera_entity, lens);
        world.set_parent(camera_entity, root);

        // Key light from over the camera's shoulder
        let light = world.spawn();
        let key = Vec3::new(-toward_camera.x, -1.0, -toward_camera.z);
        world.lights.insert(light, Light::directional(key, 0.9));
        world.set_parent(light, root);

        let camera = Camera::looking_at(world.global_transform(camera_entity).position(), center, lens.fov_degrees);
        let settings = RasterSettings {
            use_zbuffer: true,
            shading: ShadingMode::Flat,
            backface_cull: false,
            lights: Vec::new(),
            ambient: 0.45,
        };

        let mut fb = Framebuffer::new(size as usize, size as usize);
        fb.clear_transparent();
        render_subtree(world, &mut fb, &camera, root, &settings);
        let image = fb.to_image().unwrap_or_else(|| RgbaImage::new(size, size));

        world.despawn(root);

        debug!(model = %model.name, size, distance, covered = fb.covered_pixels(), "thumbnail rendered");
        ThumbnailImage(Arc::new(image))
    }
}

/// Slot images backed by the scene: sprites as-is, models through a
/// freshly rendered thumbnail
pub struct SceneThumbnails<'a> {
    renderer: &'a ThumbnailRenderer,
    world: &'a mut World,
}

impl<'a> SceneThumbnails<'a> {
    pub fn new(renderer: &'a ThumbnailRenderer, world: &'a mut World) -> Self {
        Self { renderer, world }
    }
}

impl SlotImageSource for SceneThumbnails<'_> {
    fn slot_image(&mut self, piece: &PieceAsset) -> SlotImage {
        match &piece.visual {
            PieceVisual::Image(sprite) => Arc::clone(sprite),
            PieceVisual::Model(model) => self.renderer.render(self.world, model).into_shared(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::asset::{Mesh, ModelPart};
    use crate::game::TargetStyle;
    use crate::puzzle::PlacementTarget;
    use crate::rasterizer::Color;

    fn slab() -> Model {
        Model::new(
            "slab",
            vec![ModelPart::new(Mesh::cuboid(Vec3::new(2.0, 0.25, 1.0)), Color::new(180, 120, 60))],
        )
    }

    fn renderer(size: u32) -> ThumbnailRenderer {
        ThumbnailRenderer::new(ThumbnailConfig { size, ..Default::default() })
    }

    #[test]
    fn test_fit_distance_monotonic_in_size() {
        let mut last = 0.0;
        for dim in [0.5, 1.0, 2.0, 10.0] {
            let d = fit_distance(dim, 45.0, 1.5, 0.1);
            assert!(d > last);
            last = d;
        }
    }

    #[test]
    fn test_fit_distance_decreases_with_fov() {
        assert!(fit_distance(1.0, 30.0, 1.5, 0.1) > fit_distance(1.0, 60.0, 1.5, 0.1));
    }

    #[test]
    fn test_fit_distance_degenerate_inputs() {
        assert_eq!(fit_distance(0.0, 45.0, 1.5, 0.1), 0.1);
        assert!(fit_distance(1.0, 0.0, 1.5, 0.1).is_finite());
        assert!(fit_distance(1.0, 180.0, 1.5, 0.1).is_finite());
        assert_eq!(fit_distance(f32::INFINITY, 45.0, 1.5, 0.1), 0.1);
    }

    #[test]
    fn test_fit_distance_formula() {
        let expected = 1.0 / (22.5f32.to_radians()).tan() * 1.5;
        assert!((fit_distance(2.0, 45.0, 1.5, 0.1) - expected).abs() < 1e-4);
    }

    #[test]
    fn test_slab_thumbnail_transparent_background() {
        let mut world = World::new();
        let thumb = renderer(64).render(&mut world, &slab());
        let img = thumb.image();

        assert_eq!((img.width(), img.height()), (64, 64));
        assert_eq!(img.get_pixel(0, 0)[3], 0);
        assert_eq!(img.get_pixel(63, 63)[3], 0);
        assert_eq!(img.get_pixel(32, 32)[3], 255);
    }

    #[test]
    fn test_render_is_deterministic() {
        let mut world = World::new();
        let r = renderer(48);
        let a = r.render(&mut world, &slab());
        let b = r.render(&mut world, &slab());
        assert_eq!(a.image().as_raw(), b.image().as_raw());
    }

    #[test]
    fn test_render_leaves_scene_untouched() {
        let mut world = World::new();
        let target = world.spawn_target(
            PlacementTarget::from_label("A"),
            Vec3::new(1.0, 1.0, 1.0),
            TargetStyle { idle: Color::WHITE, solved: Color::BLACK },
            Transform::from_position(Vec3::new(0.0, 0.0, 5.0)),
        );
        let entities = world.entity_count();
        let colliders = world.colliders.count();
        let renderables = world.renderables.count();

        renderer(32).render(&mut world, &slab());

        assert_eq!(world.entity_count(), entities);
        assert_eq!(world.colliders.count(), colliders);
        assert_eq!(world.renderables.count(), renderables);
        assert_eq!(world.lights.count(), 0);
        assert_eq!(world.lenses.count(), 0);
        assert!(world.colliders.get(target).unwrap().enabled);
    }

    #[test]
    fn test_scene_geometry_not_in_thumbnail() {
        let mut world = World::new();
        // A big box sitting right where the thumbnail camera would look
        let origin = ThumbnailConfig::default().isolation_origin;
        world.spawn_target(
            PlacementTarget::from_label("A"),
            Vec3::new(50.0, 50.0, 50.0),
            TargetStyle { idle: Color::WHITE, solved: Color::WHITE },
            Transform::from_position(origin),
        );

        let thumb = renderer(32).render(&mut world, &slab());
        assert_eq!(thumb.image().get_pixel(0, 0)[3], 0);
    }

    #[test]
    fn test_empty_model_renders_blank() {
        let mut world = World::new();
        let thumb = renderer(16).render(&mut world, &Model::new("empty", Vec::new()));
        assert!(thumb.image().pixels().all(|p| p[3] == 0));
        assert_eq!(world.entity_count(), 0);
    }

    #[test]
    fn test_scene_thumbnails_share_sprites() {
        let mut world = World::new();
        let r = renderer(16);
        let sprite = PieceAsset::image("A", crate::asset::swatch(8, 8, Color::WHITE));
        let PieceVisual::Image(original) = &sprite.visual else {
            panic!("expected image piece");
        };

        let mut source = SceneThumbnails::new(&r, &mut world);
        let image = source.slot_image(&sprite);
        assert!(Arc::ptr_eq(&image, original));

        let model = PieceAsset::model("M", slab());
        assert_eq!(source.slot_image(&model).width(), 16);
    }
}
