//! One play-through of a map: timer plus the one-shot completion save.

use tracing::{error, info};

use crate::game::World;
use crate::storage::ResultSink;

use super::timer::PuzzleTimer;

#[derive(Debug)]
pub struct PuzzleRun {
    map_id: String,
    /// Runs until the last target is solved
    timer: PuzzleTimer,
}

impl PuzzleRun {
    /// Start a run with the timer already counting
    pub fn start(map_id: impl Into<String>) -> Self {
        let mut timer = PuzzleTimer::new();
        timer.start();
        Self { map_id: map_id.into(), timer }
    }

    pub fn elapsed(&self) -> f32 {
        self.timer.elapsed()
    }

    pub fn is_finished(&self) -> bool {
        !self.timer.is_running()
    }

    pub fn tick(&mut self, dt: f32) {
        self.timer.tick(dt);
    }

    /// Finish the run once every target is solved: stop the clock and save
    /// the result. Returns true only on the call that finished it.
    pub fn check_complete(&mut self, world: &World, score: i32, results: &mut dyn ResultSink) -> bool {
        if self.is_finished() || world.target_count() == 0 || world.unsolved_target_count() > 0 {
            return false;
        }

        self.timer.stop();
        let elapsed = self.timer.elapsed();
        info!(map_id = %self.map_id, score, elapsed, "puzzle complete");
        if let Err(e) = results.save_result(&self.map_id, score, elapsed) {
            error!(map_id = %self.map_id, error = %e, "failed to save result");
        }
        true
    }
}
