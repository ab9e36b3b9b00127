//! Puzzle definitions
//!
//! A puzzle is a RON file describing the deck, the targets, the camera and
//! the tuning of drag and thumbnails. The demo puzzle is compiled in so the
//! game always has something to load.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

use crate::asset::{load_sprite, swatch, AssetCatalog, AssetError, Mesh, Model, ModelPart, PieceAsset};
use crate::game::{Entity, TargetStyle, Transform, World};
use crate::puzzle::{DragConfig, PlacementTarget};
use crate::quiz::QuizEntry;
use crate::rasterizer::{Camera, Color, Vec3};
use crate::thumbnail::ThumbnailConfig;

/// The bundled demo puzzle
pub const DEMO_PUZZLE: &str = include_str!("../assets/puzzles/demo.ron");

/// Limits that keep a hostile file from exhausting memory
pub mod limits {
    pub const MAX_SLOTS: usize = 16;
    pub const MAX_PIECES: usize = 512;
    pub const MAX_TARGETS: usize = 512;
    pub const MAX_SPRITE_SIDE: u32 = 2048;
    pub const MAX_THUMBNAIL_SIZE: u32 = 2048;
    pub const MAX_COORD: f32 = 1_000_000.0;
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("parse error: {0}")]
    Parse(#[from] ron::error::SpannedError),
    #[error("invalid puzzle: {0}")]
    Invalid(String),
    #[error(transparent)]
    Asset(#[from] AssetError),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub position: Vec3,
    pub look_at: Vec3,
    pub fov_degrees: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            position: Vec3::new(0.0, 4.0, -6.0),
            look_at: Vec3::ZERO,
            fov_degrees: 60.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ShapeDef {
    Cuboid { size: Vec3 },
    Pyramid { base: f32, height: f32 },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PartDef {
    pub shape: ShapeDef,
    #[serde(default)]
    pub offset: Vec3,
    #[serde(default)]
    pub rotation: Vec3,
    pub color: Color,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum PieceVisualDef {
    /// Generated flat-color sprite
    Swatch { color: Color, width: u32, height: u32 },
    /// Image file, relative to the puzzle file
    Sprite { path: String },
    Model { parts: Vec<PartDef> },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PieceDef {
    pub id: String,
    pub visual: PieceVisualDef,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TargetDef {
    /// Id of the piece this target accepts (whitespace is trimmed)
    pub label: String,
    /// Name shown in quiz mode; defaults to the label
    #[serde(default)]
    pub display_name: Option<String>,
    pub position: Vec3,
    #[serde(default)]
    pub rotation: Vec3,
    pub size: Vec3,
    pub idle_color: Color,
    pub solved_color: Color,
}

fn default_slots() -> usize {
    3
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PuzzleDefinition {
    pub map_id: String,
    pub display_name: String,
    #[serde(default = "default_slots")]
    pub slots: usize,
    /// Shuffle the deck with this seed; dealt in file order when absent
    #[serde(default)]
    pub shuffle_seed: Option<u64>,
    #[serde(default)]
    pub drag: DragConfig,
    #[serde(default)]
    pub thumbnails: ThumbnailConfig,
    #[serde(default)]
    pub camera: CameraConfig,
    /// Static board geometry (not a drop target)
    #[serde(default)]
    pub scenery: Vec<PartDef>,
    pub pieces: Vec<PieceDef>,
    pub targets: Vec<TargetDef>,
    /// Directory sprite paths are resolved against (not serialized)
    #[serde(skip)]
    pub base_dir: PathBuf,
}

impl PuzzleDefinition {
    /// Load and validate a puzzle file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let mut def = Self::from_ron(&contents)?;
        def.base_dir = path.parent().map(Path::to_path_buf).unwrap_or_default();
        info!(path = %path.display(), map_id = %def.map_id, "puzzle loaded");
        Ok(def)
    }

    /// Parse and validate a puzzle from a RON string
    pub fn from_ron(s: &str) -> Result<Self, ConfigError> {
        let def: Self = ron::from_str(s)?;
        def.validate()?;
        Ok(def)
    }

    pub fn bundled() -> Result<Self, ConfigError> {
        Self::from_ron(DEMO_PUZZLE)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |msg: String| Err(ConfigError::Invalid(msg));

        if self.map_id.trim().is_empty() {
            return invalid("map_id is empty".into());
        }
        if self.slots == 0 || self.slots > limits::MAX_SLOTS {
            return invalid(format!("slots must be 1..={}, got {}", limits::MAX_SLOTS, self.slots));
        }
        if self.pieces.len() > limits::MAX_PIECES {
            return invalid(format!("too many pieces: {}", self.pieces.len()));
        }
        if self.targets.len() > limits::MAX_TARGETS {
            return invalid(format!("too many targets: {}", self.targets.len()));
        }

        let mut ids = HashSet::new();
        for piece in &self.pieces {
            if piece.id.is_empty() {
                return invalid("piece with empty id".into());
            }
            if !ids.insert(piece.id.as_str()) {
                return invalid(format!("duplicate piece id '{}'", piece.id));
            }
            match &piece.visual {
                PieceVisualDef::Swatch { width, height, .. } => {
                    if *width == 0 || *height == 0 || *width > limits::MAX_SPRITE_SIDE || *height > limits::MAX_SPRITE_SIDE {
                        return invalid(format!("piece '{}': swatch size {}x{}", piece.id, width, height));
                    }
                }
                PieceVisualDef::Sprite { path } => {
                    if path.is_empty() {
                        return invalid(format!("piece '{}': empty sprite path", piece.id));
                    }
                }
                PieceVisualDef::Model { parts } => {
                    for part in parts {
                        validate_part(part).map_err(|e| ConfigError::Invalid(format!("piece '{}': {e}", piece.id)))?;
                    }
                }
            }
        }

        for target in &self.targets {
            if target.label.trim().is_empty() {
                return invalid("target with empty label".into());
            }
            if !positive(target.size) || !finite(target.position) || !finite(target.rotation) {
                return invalid(format!("target '{}': bad size or placement", target.label));
            }
            if !ids.contains(target.label.trim()) {
                warn!(label = %target.label, "target has no matching piece");
            }
        }
        for part in &self.scenery {
            validate_part(part).map_err(|e| ConfigError::Invalid(format!("scenery: {e}")))?;
        }

        let d = &self.drag;
        if !(d.distance_from_camera > 0.0 && d.follow_rate > 0.0 && d.max_ray_distance > 0.0) {
            return invalid("drag distances and follow rate must be positive".into());
        }
        if !(d.sprite_height > 0.0 && d.model_scale > 0.0) || !d.sprite_height.is_finite() || !d.model_scale.is_finite() {
            return invalid("drag proxy sizes must be positive".into());
        }
        let t = &self.thumbnails;
        if t.size == 0 || t.size > limits::MAX_THUMBNAIL_SIZE {
            return invalid(format!("thumbnail size must be 1..={}", limits::MAX_THUMBNAIL_SIZE));
        }
        if !(t.buffer > 0.0 && t.min_distance > 0.0 && t.fov_degrees.is_finite()) {
            return invalid("thumbnail buffer and min_distance must be positive".into());
        }
        if !finite(self.camera.position) || !finite(self.camera.look_at) {
            return invalid("camera placement is not finite".into());
        }
        Ok(())
    }

    /// Build the deck, decoding sprites from disk where needed
    pub fn build_catalog(&self) -> Result<AssetCatalog, ConfigError> {
        let mut pieces = Vec::with_capacity(self.pieces.len());
        for def in &self.pieces {
            let piece = match &def.visual {
                PieceVisualDef::Swatch { color, width, height } => PieceAsset::image(&def.id, swatch(*width, *height, *color)),
                PieceVisualDef::Sprite { path } => PieceAsset::image(&def.id, load_sprite(&self.base_dir.join(path))?),
                PieceVisualDef::Model { parts } => PieceAsset::model(&def.id, build_model(&def.id, parts)),
            };
            pieces.push(piece);
        }
        Ok(match self.shuffle_seed {
            Some(seed) => AssetCatalog::shuffled(pieces, seed),
            None => AssetCatalog::new(pieces),
        })
    }

    /// Spawn the board and every target into the scene
    pub fn populate(&self, world: &mut World) -> Vec<Entity> {
        if !self.scenery.is_empty() {
            let board = build_model("board", &self.scenery);
            world.instantiate_model(&board, Transform::IDENTITY);
        }
        self.targets
            .iter()
            .map(|t| {
                world.spawn_target(
                    PlacementTarget::from_label(&t.label),
                    t.size,
                    TargetStyle { idle: t.idle_color, solved: t.solved_color },
                    Transform::from_position_rotation(t.position, t.rotation),
                )
            })
            .collect()
    }

    pub fn camera(&self) -> Camera {
        Camera::looking_at(self.camera.position, self.camera.look_at, self.camera.fov_degrees)
    }

    /// Answer list for quiz mode, in target order
    pub fn quiz_entries(&self) -> Vec<QuizEntry> {
        self.targets
            .iter()
            .map(|t| QuizEntry {
                id: t.label.trim().to_string(),
                display_name: t.display_name.clone().unwrap_or_else(|| t.label.trim().to_string()),
            })
            .collect()
    }

    /// Model pieces by id
    pub fn models(&self) -> impl Iterator<Item = (&str, Model)> {
        self.pieces.iter().filter_map(|p| match &p.visual {
            PieceVisualDef::Model { parts } => Some((p.id.as_str(), build_model(&p.id, parts))),
            _ => None,
        })
    }
}

fn finite(v: Vec3) -> bool {
    v.is_finite() && v.x.abs() <= limits::MAX_COORD && v.y.abs() <= limits::MAX_COORD && v.z.abs() <= limits::MAX_COORD
}

fn positive(v: Vec3) -> bool {
    finite(v) && v.x > 0.0 && v.y > 0.0 && v.z > 0.0
}

fn validate_part(part: &PartDef) -> Result<(), String> {
    let ok = match part.shape {
        ShapeDef::Cuboid { size } => positive(size),
        ShapeDef::Pyramid { base, height } => base.is_finite() && height.is_finite() && base > 0.0 && height > 0.0,
    };
    if !ok {
        return Err("part size must be finite and positive".into());
    }
    if !finite(part.offset) || !finite(part.rotation) {
        return Err("part placement is not finite".into());
    }
    Ok(())
}

fn build_model(name: &str, parts: &[PartDef]) -> Model {
    let parts = parts
        .iter()
        .map(|p| {
            let mesh = match p.shape {
                ShapeDef::Cuboid { size } => Mesh::cuboid(size),
                ShapeDef::Pyramid { base, height } => Mesh::pyramid(base, height),
            };
            ModelPart::new(mesh, p.color).with_offset(p.offset).with_rotation(p.rotation)
        })
        .collect();
    Model::new(name, parts)
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = r#"(
        map_id: "tiny",
        display_name: "Tiny",
        slots: 2,
        pieces: [
            (id: "A", visual: Swatch(color: (r: 255, g: 0, b: 0), width: 8, height: 8)),
            (id: "B", visual: Model(parts: [(shape: Cuboid(size: (x: 1.0, y: 1.0, z: 1.0)), color: (r: 0, g: 0, b: 255))])),
        ],
        targets: [
            (
                label: " A ",
                position: (x: 0.0, y: 0.0, z: 0.0),
                size: (x: 1.0, y: 0.2, z: 1.0),
                idle_color: (r: 90, g: 90, b: 90),
                solved_color: (r: 0, g: 200, b: 0),
            ),
        ],
    )"#;

    #[test]
    fn test_bundled_demo_is_valid() {
        let def = PuzzleDefinition::bundled().unwrap();
        assert!(!def.pieces.is_empty());
        assert!(!def.targets.is_empty());
        let catalog = def.build_catalog().unwrap();
        assert_eq!(catalog.len(), def.pieces.len());
    }

    #[test]
    fn test_minimal_defaults() {
        let def = PuzzleDefinition::from_ron(MINIMAL).unwrap();
        assert_eq!(def.drag, DragConfig::default());
        assert_eq!(def.thumbnails.size, 256);
        assert_eq!(def.shuffle_seed, None);
        assert_eq!(def.quiz_entries()[0].id, "A");
        assert_eq!(def.models().count(), 1);

        let ids: Vec<String> = def.build_catalog().unwrap().ids().map(String::from).collect();
        assert_eq!(ids, vec!["A", "B"]);
    }

    #[test]
    fn test_populate_spawns_targets() {
        let def = PuzzleDefinition::from_ron(MINIMAL).unwrap();
        let mut world = World::new();
        let targets = def.populate(&mut world);
        assert_eq!(targets.len(), 1);
        assert_eq!(world.targets.get(targets[0]).unwrap().expected_id(), "A");
    }

    #[test]
    fn test_rejects_zero_slots() {
        let src = MINIMAL.replace("slots: 2", "slots: 0");
        assert!(matches!(PuzzleDefinition::from_ron(&src), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_rejects_duplicate_ids() {
        let src = MINIMAL.replace(r#"(id: "B""#, r#"(id: "A""#);
        assert!(matches!(PuzzleDefinition::from_ron(&src), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_rejects_flat_target() {
        let src = MINIMAL.replace("y: 0.2", "y: 0.0");
        assert!(matches!(PuzzleDefinition::from_ron(&src), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_parse_error() {
        assert!(matches!(PuzzleDefinition::from_ron("(map_id: "), Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_missing_sprite_is_asset_error() {
        let src = MINIMAL.replace(
            "Swatch(color: (r: 255, g: 0, b: 0), width: 8, height: 8)",
            r#"Sprite(path: "does/not/exist.png")"#,
        );
        let def = PuzzleDefinition::from_ron(&src).unwrap();
        assert!(matches!(def.build_catalog(), Err(ConfigError::Asset(_))));
    }

    #[test]
    fn test_load_from_file_sets_base_dir() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("tiny.ron");
        std::fs::write(&path, MINIMAL).unwrap();

        let def = PuzzleDefinition::load(&path).unwrap();
        assert_eq!(def.base_dir, dir.path());
        assert!(matches!(
            PuzzleDefinition::load(&dir.path().join("missing.ron")),
            Err(ConfigError::Io { .. })
        ));
    }
}
