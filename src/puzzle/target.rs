//! Drop targets

/// A spot in the scene that accepts exactly one piece.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlacementTarget {
    expected_id: String,
    solved: bool,
}

impl PlacementTarget {
    /// Target for the piece named by `label`; surrounding whitespace is ignored.
    pub fn from_label(label: &str) -> Self {
        Self {
            expected_id: label.trim().to_string(),
            solved: false,
        }
    }

    pub fn expected_id(&self) -> &str {
        &self.expected_id
    }

    pub fn is_solved(&self) -> bool {
        self.solved
    }

    /// Offer a piece. A solved target rejects everything; otherwise the id
    /// must match exactly (case-sensitive) and a match is final.
    pub fn check(&mut self, candidate: &str) -> bool {
        if self.solved || candidate != self.expected_id {
            return false;
        }
        self.solved = true;
        true
    }
}
