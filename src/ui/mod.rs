//! Immediate-mode UI for the puzzle screen
//!
//! - Rectangle-based layout (`Rect`)
//! - Slot bar and quiz list layout with hit testing (`slots`)
//! - Macroquad drawing of the HUD (`hud`)

mod rect;
mod theme;
pub mod hud;
pub mod slots;

pub use rect::*;
pub use theme::*;
pub use slots::{ListLayout, SlotAction, SlotBar, SlotDispatch, SlotEvent};
