//! Scoring

use tracing::debug;

/// Receives placement feedback
pub trait ScoreSink {
    fn increase(&mut self);
    fn decrease(&mut self);
}

/// Running score. Can go negative; nothing clamps it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreBoard {
    score: i32,
    /// Points for a correct placement
    reward: i32,
    /// Points taken for a wrong one
    penalty: i32,
}

impl ScoreBoard {
    pub fn new(reward: i32, penalty: i32) -> Self {
        Self { score: 0, reward, penalty }
    }

    pub fn score(&self) -> i32 {
        self.score
    }
}

impl Default for ScoreBoard {
    fn default() -> Self {
        Self::new(1, 1)
    }
}

impl ScoreSink for ScoreBoard {
    fn increase(&mut self) {
        self.score += self.reward;
        debug!(score = self.score, "score increased");
    }

    fn decrease(&mut self) {
        self.score -= self.penalty;
        debug!(score = self.score, "score decreased");
    }
}
