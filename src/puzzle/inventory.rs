//! Slot inventory
//!
//! A fixed row of slots dealt from the front of the deck. A slot moves
//! between three states:
//!
//! ```text
//!            fill                 take
//!   Empty ─────────▶ Occupied ─────────▶ Lent
//!     ▲                  ▲                │
//!     │                  └──── restore ───┤
//!     └─────────────── consume ───────────┘
//! ```
//!
//! Only one slot can be lent at a time. A lent slot keeps its image so a
//! failed drop can put the piece back exactly as it was.

use std::sync::Arc;

use image::RgbaImage;
use thiserror::Error;
use tracing::{debug, info};

use crate::asset::{AssetCatalog, PieceAsset};

/// Image shown in a slot
pub type SlotImage = Arc<RgbaImage>;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SlotError {
    #[error("slot {index} out of range (inventory has {len} slots)")]
    InvalidSlot { index: usize, len: usize },
    #[error("slot {0} holds no piece")]
    Empty(usize),
    #[error("slot {requested} requested while slot {lent} is already lent")]
    Busy { requested: usize, lent: usize },
    #[error("slot {0} is not lent")]
    NotLent(usize),
}

/// Produces the image a slot displays for a piece
pub trait SlotImageSource {
    fn slot_image(&mut self, piece: &PieceAsset) -> SlotImage;
}

#[derive(Debug, Clone)]
enum Slot {
    Empty,
    Occupied { piece: PieceAsset, image: SlotImage },
    Lent { image: SlotImage },
}

/// What the slot bar should draw for one slot
#[derive(Debug, Clone, Copy)]
pub struct SlotView<'a> {
    pub visible: bool,
    pub image: Option<&'a SlotImage>,
}

/// Fixed set of slots fed from a deck
#[derive(Debug)]
pub struct SlotInventory {
    slots: Vec<Slot>,
    catalog: AssetCatalog,
}

impl SlotInventory {
    /// Inventory with `slot_count` empty slots. Call `fill` to deal.
    pub fn new(slot_count: usize, catalog: AssetCatalog) -> Self {
        Self {
            slots: vec![Slot::Empty; slot_count],
            catalog,
        }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Deal the deck front into every empty slot. Lent slots are skipped.
    /// Running it again without an intervening take or consume changes
    /// nothing. Returns how many pieces were dealt.
    pub fn fill(&mut self, images: &mut dyn SlotImageSource) -> usize {
        let mut dealt = 0;
        for (index, slot) in self.slots.iter_mut().enumerate() {
            if !matches!(slot, Slot::Empty) {
                continue;
            }
            let Some(piece) = self.catalog.dequeue_front() else {
                break;
            };
            let image = images.slot_image(&piece);
            debug!(slot = index, piece = %piece.id, kind = piece.visual.kind(), "slot filled");
            *slot = Slot::Occupied { piece, image };
            dealt += 1;
        }
        if dealt > 0 && self.catalog.is_empty() {
            info!("deck exhausted");
        }
        dealt
    }

    /// Lend the piece in `index` to a drag. The slot hides but keeps its image.
    pub fn take(&mut self, index: usize) -> Result<PieceAsset, SlotError> {
        let len = self.slots.len();
        if index >= len {
            return Err(SlotError::InvalidSlot { index, len });
        }
        if let Some(lent) = self.lent_slot() {
            return Err(SlotError::Busy { requested: index, lent });
        }

        match std::mem::replace(&mut self.slots[index], Slot::Empty) {
            Slot::Occupied { piece, image } => {
                self.slots[index] = Slot::Lent { image };
                Ok(piece)
            }
            other => {
                self.slots[index] = other;
                Err(SlotError::Empty(index))
            }
        }
    }

    /// Return a lent piece to its slot, visible again with the same image.
    pub fn restore(&mut self, index: usize, piece: PieceAsset) -> Result<(), SlotError> {
        let slot = self.lent_mut(index)?;
        if let Slot::Lent { image } = slot {
            let image = Arc::clone(image);
            *slot = Slot::Occupied { piece, image };
        }
        Ok(())
    }

    /// The lent piece was placed; the slot becomes empty and drops its image.
    pub fn consume(&mut self, index: usize) -> Result<(), SlotError> {
        let slot = self.lent_mut(index)?;
        *slot = Slot::Empty;
        Ok(())
    }

    /// Index of the slot currently lent to a drag
    pub fn lent_slot(&self) -> Option<usize> {
        self.slots.iter().position(|s| matches!(s, Slot::Lent { .. }))
    }

    pub fn views(&self) -> impl Iterator<Item = SlotView<'_>> {
        self.slots.iter().map(|slot| match slot {
            Slot::Empty => SlotView { visible: false, image: None },
            Slot::Occupied { image, .. } => SlotView { visible: true, image: Some(image) },
            Slot::Lent { image } => SlotView { visible: false, image: Some(image) },
        })
    }

    fn lent_mut(&mut self, index: usize) -> Result<&mut Slot, SlotError> {
        let len = self.slots.len();
        match self.slots.get_mut(index) {
            None => Err(SlotError::InvalidSlot { index, len }),
            Some(slot @ Slot::Lent { .. }) => Ok(slot),
            Some(_) => Err(SlotError::NotLent(index)),
        }
    }
}
