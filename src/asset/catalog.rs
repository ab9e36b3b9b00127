//! Piece deck
//!
//! Pieces come out strictly front to back. The deck only shrinks; once empty
//! it stays empty for the rest of the session.

use std::collections::VecDeque;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use super::piece::PieceAsset;

/// FIFO deck of pieces not yet dealt into a slot
#[derive(Debug, Default)]
pub struct AssetCatalog {
    pieces: VecDeque<PieceAsset>,
}

impl AssetCatalog {
    pub fn new(pieces: impl IntoIterator<Item = PieceAsset>) -> Self {
        Self {
            pieces: pieces.into_iter().collect(),
        }
    }

    /// Deck in a reproducible shuffled order
    pub fn shuffled(pieces: impl IntoIterator<Item = PieceAsset>, seed: u64) -> Self {
        let mut catalog = Self::new(pieces);
        let mut rng = StdRng::seed_from_u64(seed);
        catalog.pieces.make_contiguous().shuffle(&mut rng);
        catalog
    }

    /// Remove and return the front piece
    pub fn dequeue_front(&mut self) -> Option<PieceAsset> {
        self.pieces.pop_front()
    }

    pub fn len(&self) -> usize {
        self.pieces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pieces.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::asset::piece::swatch;
    use crate::rasterizer::Color;

    impl AssetCatalog {
        /// Ids in deal order
        pub(crate) fn ids(&self) -> impl Iterator<Item = &str> {
            self.pieces.iter().map(|p| p.id.as_str())
        }
    }

    fn pieces(ids: &[&str]) -> Vec<PieceAsset> {
        ids.iter().map(|id| PieceAsset::image(*id, swatch(2, 2, Color::WHITE))).collect()
    }

    #[test]
    fn test_fifo_order() {
        let mut catalog = AssetCatalog::new(pieces(&["A", "B", "C"]));
        assert_eq!(catalog.dequeue_front().unwrap().id, "A");
        assert_eq!(catalog.dequeue_front().unwrap().id, "B");
        assert_eq!(catalog.len(), 1);
    }

    #[test]
    fn test_empty_is_terminal() {
        let mut catalog = AssetCatalog::new(pieces(&["A"]));
        assert!(catalog.dequeue_front().is_some());
        assert!(catalog.dequeue_front().is_none());
        assert!(catalog.dequeue_front().is_none());
        assert!(catalog.is_empty());
    }

    #[test]
    fn test_shuffle_is_reproducible_permutation() {
        let ids = ["A", "B", "C", "D", "E", "F"];
        let a = AssetCatalog::shuffled(pieces(&ids), 7);
        let b = AssetCatalog::shuffled(pieces(&ids), 7);
        let order_a: Vec<_> = a.ids().collect();
        let order_b: Vec<_> = b.ids().collect();
        assert_eq!(order_a, order_b);

        let mut sorted = order_a.clone();
        sorted.sort();
        assert_eq!(sorted, ids.to_vec());
    }
}
