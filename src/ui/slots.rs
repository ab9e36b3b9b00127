//! Slot bar layout and slot input routing
//!
//! Slot input goes through a lookup table instead of per-widget callbacks:
//! the bar reports `(slot, event)` and the table says what it means.

use std::collections::HashMap;

use super::Rect;

const SLOT_GAP: f32 = 12.0;
const BAR_PADDING: f32 = 10.0;

/// Pointer events a slot can receive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SlotEvent {
    PointerDown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotAction {
    BeginDrag(usize),
}

/// `(slot, event) -> action` table, one row per slot
#[derive(Debug, Clone)]
pub struct SlotDispatch {
    table: HashMap<(usize, SlotEvent), SlotAction>,
}

impl SlotDispatch {
    pub fn new(slot_count: usize) -> Self {
        let table = (0..slot_count)
            .map(|i| ((i, SlotEvent::PointerDown), SlotAction::BeginDrag(i)))
            .collect();
        Self { table }
    }

    pub fn dispatch(&self, slot: usize, event: SlotEvent) -> Option<SlotAction> {
        self.table.get(&(slot, event)).copied()
    }
}

/// Row of square slots centered in a bar
#[derive(Debug, Clone, Copy)]
pub struct SlotBar {
    pub rect: Rect,
    pub count: usize,
}

impl SlotBar {
    pub fn new(rect: Rect, count: usize) -> Self {
        Self { rect, count }
    }

    /// Screen rect of each slot, left to right
    pub fn slot_rects(&self) -> Vec<Rect> {
        if self.count == 0 {
            return Vec::new();
        }
        let inner = self.rect.pad(BAR_PADDING);
        let n = self.count as f32;
        let by_width = (inner.w - SLOT_GAP * (n - 1.0)) / n;
        let side = by_width.min(inner.h).max(0.0);
        let total = side * n + SLOT_GAP * (n - 1.0);
        let start_x = inner.center_x() - total * 0.5;
        let y = inner.center_y() - side * 0.5;

        (0..self.count)
            .map(|i| Rect::new(start_x + i as f32 * (side + SLOT_GAP), y, side, side))
            .collect()
    }

    /// Slot under a screen point
    pub fn hit(&self, x: f32, y: f32) -> Option<usize> {
        self.slot_rects().iter().position(|r| r.contains(x, y))
    }
}

/// Vertical list of quiz answers
#[derive(Debug, Clone, Copy)]
pub struct ListLayout {
    pub rect: Rect,
    pub row_height: f32,
}

impl ListLayout {
    pub fn row(&self, index: usize) -> Rect {
        Rect::new(self.rect.x, self.rect.y + index as f32 * self.row_height, self.rect.w, self.row_height)
    }

    pub fn hit(&self, x: f32, y: f32, rows: usize) -> Option<usize> {
        if !self.rect.contains(x, y) || self.row_height <= 0.0 {
            return None;
        }
        let index = ((y - self.rect.y) / self.row_height) as usize;
        (index < rows).then_some(index)
    }
}
