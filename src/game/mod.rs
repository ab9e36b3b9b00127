//! Scene Module
//!
//! A lightweight ECS-inspired scene for the placement puzzle.
//!
//! Key concepts:
//! - Entity: Generational index for safe entity references
//! - Component: Plain data structs attached to entities
//! - World: Container for all entities and their components
//!
//! Design philosophy:
//! - Simple over flexible (we know what game we're making)
//! - No runtime type registration (compile-time known components)

pub mod component;
pub mod components;
pub mod entity;
pub mod renderer;
pub mod transform;
pub mod world;

pub use components::{LayerMask, Lens};
pub use entity::Entity;
pub use renderer::{render_scene, render_subtree};
pub use transform::Transform;
pub use world::{TargetStyle, World};
