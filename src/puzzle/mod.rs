//! Placement Puzzle
//!
//! Pieces are dealt from a deck into a few inventory slots. The player drags
//! one into the scene and drops it on a target; the target either accepts it
//! (slot consumed, deck deals again, score up) or the piece returns home.
//!
//! ```text
//! AssetCatalog ─fill─▶ SlotInventory ─take─▶ PlacementSession ─ray─▶ PlacementTarget
//!                          ▲                        │
//!                          └──── restore/consume ───┴──▶ ScoreSink
//! ```

pub mod inventory;
pub mod run;
pub mod score;
pub mod session;
pub mod target;
pub mod timer;

pub use inventory::{SlotImage, SlotImageSource, SlotInventory, SlotView};
pub use run::PuzzleRun;
pub use score::{ScoreBoard, ScoreSink};
pub use session::{DragConfig, DropOutcome, PlacementContext, PlacementSession};
pub use target::PlacementTarget;
pub use timer::{format_time, Flash};
