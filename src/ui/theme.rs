//! UI Theme - Shared colors and styling constants

use macroquad::prelude::Color;

// =============================================================================
// Base UI Colors
// =============================================================================

/// Window background behind the letterboxed scene
pub const BG_COLOR: Color = Color::new(0.11, 0.11, 0.13, 1.0);

/// Slot bar and side panel background
pub const PANEL_COLOR: Color = Color::new(0.15, 0.15, 0.18, 0.92);

/// Primary text color
pub const TEXT_COLOR: Color = Color::new(0.8, 0.8, 0.85, 1.0);

/// Dimmed/secondary text
pub const TEXT_DIM: Color = Color::new(0.4, 0.4, 0.45, 1.0);

// =============================================================================
// Font Sizes
// =============================================================================

pub const FONT_SIZE_HEADER: f32 = 28.0;
pub const FONT_SIZE_CONTENT: f32 = 20.0;

// =============================================================================
// Slots & feedback
// =============================================================================

pub const SLOT_BG: Color = Color::new(0.2, 0.2, 0.24, 1.0);
pub const SLOT_BORDER: Color = Color::new(0.31, 0.31, 0.31, 1.0);
pub const SLOT_HOVER: Color = Color::new(0.235, 0.314, 0.392, 1.0);

/// Selected entry in the quiz list
pub const SELECTED_COLOR: Color = Color::new(0.3, 0.5, 0.8, 0.8);

pub const WRONG_MARK_COLOR: Color = Color::new(0.9, 0.2, 0.2, 1.0);

/// End screen overlay
pub const OVERLAY_COLOR: Color = Color::new(0.0, 0.0, 0.0, 0.6);
