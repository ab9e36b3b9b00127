//! Drag-and-drop placement
//!
//! ```text
//!            pickup(slot)                 release edge
//!   Idle ──────────────────▶ Dragging ──────────────────▶ Idle
//!                              │  tick: proxy follows pointer
//!                              ▼
//!                       ray from camera through proxy
//!                       ├── target accepts  → consume, refill, +score
//!                       ├── target rejects  → restore, -score
//!                       └── nothing hit     → restore
//! ```
//!
//! The session owns at most one drag. The proxy entity lives exactly as long
//! as the drag does.

use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};

use crate::asset::{PieceAsset, PieceVisual};
use crate::game::{Entity, LayerMask, Transform, World};
use crate::input::PointerSample;
use crate::rasterizer::{Camera, Ray, Vec3};
use crate::thumbnail::{SceneThumbnails, ThumbnailRenderer};

use super::inventory::{SlotError, SlotInventory};
use super::score::ScoreSink;

/// Tuning for the drag proxy and drop ray
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DragConfig {
    /// Depth in front of the camera the proxy is held at
    pub distance_from_camera: f32,
    /// Smoothing rate `k` in `1 - exp(-k * dt)`
    pub follow_rate: f32,
    /// Longest drop ray
    pub max_ray_distance: f32,
    /// Turn model proxies to face the camera like sprites do
    pub billboard_models: bool,
    /// Count a drop onto nothing as a wrong answer
    pub penalize_miss: bool,
    /// World height of a sprite proxy
    pub sprite_height: f32,
    /// Uniform scale applied to model proxies
    pub model_scale: f32,
}

impl Default for DragConfig {
    fn default() -> Self {
        Self {
            distance_from_camera: 0.4,
            follow_rate: 15.0,
            max_ray_distance: 20.0,
            billboard_models: true,
            penalize_miss: false,
            sprite_height: 0.08,
            model_scale: 0.05,
        }
    }
}

/// How a drag ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropOutcome {
    /// Target accepted the piece; the slot was consumed and refilled
    Placed { slot: usize, target: Entity },
    /// Target refused the piece; it went back to its slot
    Rejected { slot: usize, target: Entity },
    /// No target under the proxy; the piece went back to its slot
    Missed { slot: usize },
    /// Release without a drag in progress
    Ignored,
}

/// Everything a placement step touches besides the session itself
pub struct PlacementContext<'a> {
    pub world: &'a mut World,
    pub inventory: &'a mut SlotInventory,
    pub thumbnails: &'a ThumbnailRenderer,
    pub camera: &'a Camera,
    /// Framebuffer size the pointer coordinates refer to
    pub viewport: (usize, usize),
}

impl PlacementContext<'_> {
    /// World point under the pointer at `depth` in front of the camera
    fn pointer_world(&self, pointer: &PointerSample, depth: f32) -> Vec3 {
        let (w, h) = self.viewport;
        self.camera.screen_to_world(pointer.x, pointer.y, w, h, depth)
    }

    /// Deal the deck into empty slots, rendering thumbnails as needed
    pub fn refill(&mut self) -> usize {
        let mut images = SceneThumbnails::new(self.thumbnails, self.world);
        self.inventory.fill(&mut images)
    }
}

/// A piece in flight
#[derive(Debug)]
struct DragState {
    source_slot: usize,
    piece: PieceAsset,
    proxy: Entity,
}

/// Drives pickup, follow and drop for one inventory
pub struct PlacementSession<S: ScoreSink> {
    config: DragConfig,
    sink: S,
    drag: Option<DragState>,
}

impl<S: ScoreSink> PlacementSession<S> {
    pub fn new(config: DragConfig, sink: S) -> Self {
        Self { config, sink, drag: None }
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    /// Proxy entity of the drag in progress
    pub fn proxy(&self) -> Option<Entity> {
        self.drag.as_ref().map(|d| d.proxy)
    }

    /// Start dragging the piece in `slot`.
    ///
    /// Returns `Ok(false)` without side effects when a drag is already active
    /// or the slot holds nothing. An out-of-range slot is an error.
    pub fn pickup(&mut self, slot: usize, pointer: &PointerSample, ctx: &mut PlacementContext) -> Result<bool, SlotError> {
        if self.drag.is_some() {
            debug!(slot, "pickup ignored, drag already active");
            return Ok(false);
        }

        let piece = match ctx.inventory.take(slot) {
            Ok(piece) => piece,
            Err(SlotError::Empty(_)) => {
                debug!(slot, "pickup ignored, slot empty");
                return Ok(false);
            }
            Err(e) => {
                error!(slot, error = %e, "pickup failed");
                return Err(e);
            }
        };

        let position = ctx.pointer_world(pointer, self.config.distance_from_camera);
        let proxy = self.spawn_proxy(ctx.world, &piece, position);
        if let Some(t) = ctx.world.transforms.get_mut(proxy) {
            t.face_towards(ctx.camera.position);
        }

        info!(slot, piece = %piece.id, kind = piece.visual.kind(), "picked up piece");
        self.drag = Some(DragState { source_slot: slot, piece, proxy });
        Ok(true)
    }

    fn spawn_proxy(&self, world: &mut World, piece: &PieceAsset, position: Vec3) -> Entity {
        let proxy = match &piece.visual {
            PieceVisual::Image(sprite) => {
                world.spawn_sprite(sprite.clone(), self.config.sprite_height, Transform::from_position(position))
            }
            PieceVisual::Model(model) => {
                let transform = Transform::from_position(position).with_scale(self.config.model_scale);
                let root = world.instantiate_model(model, transform);
                world.set_colliders_enabled(root, false);
                root
            }
        };
        world.names.insert(proxy, format!("proxy:{}", piece.id));
        proxy
    }

    /// Advance one frame. The proxy eases toward the pointer; a release edge
    /// drops the piece and reports how it went.
    pub fn tick(&mut self, dt: f32, pointer: &PointerSample, ctx: &mut PlacementContext) -> Option<DropOutcome> {
        let drag = self.drag.as_ref()?;

        let target = ctx.pointer_world(pointer, self.config.distance_from_camera);
        let alpha = follow_alpha(self.config.follow_rate, dt);
        let billboard = match drag.piece.visual {
            PieceVisual::Image(_) => true,
            PieceVisual::Model(_) => self.config.billboard_models,
        };

        if let Some(t) = ctx.world.transforms.get_mut(drag.proxy) {
            t.position = t.position.lerp(target, alpha);
            if billboard {
                t.face_towards(ctx.camera.position);
            }
        }

        if pointer.released {
            Some(self.release(ctx))
        } else {
            None
        }
    }

    /// Drop the held piece where the proxy is. Always ends the drag.
    pub fn release(&mut self, ctx: &mut PlacementContext) -> DropOutcome {
        let Some(DragState { source_slot, piece, proxy }) = self.drag.take() else {
            error!("release without an active drag");
            debug_assert!(false, "release without an active drag");
            return DropOutcome::Ignored;
        };

        let proxy_position = ctx.world.global_transform(proxy).position();
        let ray = Ray::through(ctx.camera.position, proxy_position, ctx.camera.forward());
        let hit = ctx
            .world
            .raycast(&ray, self.config.max_ray_distance, LayerMask::TARGETS)
            .filter(|hit| ctx.world.targets.contains(hit.entity));
        ctx.world.despawn(proxy);

        match hit {
            Some(hit) => {
                let target = hit.entity;
                if ctx.world.check_target(target, &piece.id) {
                    if let Err(e) = ctx.inventory.consume(source_slot) {
                        error!(slot = source_slot, error = %e, "consume failed");
                    }
                    let dealt = ctx.refill();
                    self.sink.increase();
                    info!(slot = source_slot, piece = %piece.id, target = ctx.world.name(target), dealt, "piece placed");
                    DropOutcome::Placed { slot: source_slot, target }
                } else {
                    info!(slot = source_slot, piece = %piece.id, target = ctx.world.name(target), "piece rejected");
                    self.put_back(ctx, source_slot, piece);
                    self.sink.decrease();
                    DropOutcome::Rejected { slot: source_slot, target }
                }
            }
            None => {
                info!(slot = source_slot, piece = %piece.id, "piece dropped on nothing");
                self.put_back(ctx, source_slot, piece);
                if self.config.penalize_miss {
                    self.sink.decrease();
                }
                DropOutcome::Missed { slot: source_slot }
            }
        }
    }

    fn put_back(&self, ctx: &mut PlacementContext, slot: usize, piece: PieceAsset) {
        if let Err(e) = ctx.inventory.restore(slot, piece) {
            warn!(slot, error = %e, "could not return piece to its slot");
        }
    }
}

/// Fraction of the remaining distance covered in `dt` seconds
pub fn follow_alpha(rate: f32, dt: f32) -> f32 {
    if !dt.is_finite() || dt <= 0.0 {
        return 0.0;
    }
    1.0 - (-rate * dt).exp()
}
