//! Quiz mode
//!
//! Instead of dragging pieces, the player picks a name from a list and then
//! clicks the target it belongs to. Correct picks score, wrong ones only
//! flash the wrong mark.

use tracing::{debug, info};

use crate::game::{Entity, World};
use crate::puzzle::{Flash, ScoreBoard, ScoreSink};

/// Points for a correct answer
pub const POINTS_PER_CORRECT: i32 = 10;
/// How long the wrong mark stays up (seconds)
pub const WRONG_MARK_SECONDS: f32 = 1.2;

/// One selectable name in the answer list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizEntry {
    pub id: String,
    pub display_name: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuizOutcome {
    /// The selected name matched; `complete` is set when nothing is left
    Solved { target: Entity, complete: bool },
    Wrong { target: Entity },
    /// Clicked a target with nothing selected
    NoSelection,
}

#[derive(Debug)]
pub struct QuizSession {
    entries: Vec<QuizEntry>,
    selected: Option<String>,
    board: ScoreBoard,
    wrong_mark: Flash,
    total: usize,
    correct: usize,
}

impl QuizSession {
    pub fn new(entries: Vec<QuizEntry>) -> Self {
        let total = entries.len();
        Self {
            entries,
            selected: None,
            board: ScoreBoard::new(POINTS_PER_CORRECT, 0),
            wrong_mark: Flash::default(),
            total,
            correct: 0,
        }
    }

    /// Names still waiting to be placed
    pub fn entries(&self) -> &[QuizEntry] {
        &self.entries
    }

    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    /// Select a name from the list. Unknown ids are ignored.
    pub fn select(&mut self, id: &str) -> bool {
        if !self.entries.iter().any(|e| e.id == id) {
            return false;
        }
        debug!(id, "quiz selection");
        self.selected = Some(id.to_string());
        true
    }

    pub fn score(&self) -> i32 {
        self.board.score()
    }

    pub fn wrong_mark_visible(&self) -> bool {
        self.wrong_mark.is_active()
    }

    pub fn is_complete(&self) -> bool {
        self.correct >= self.total
    }

    pub fn tick(&mut self, dt: f32) {
        self.wrong_mark.tick(dt);
    }

    /// Try the current selection on a clicked target
    pub fn target_clicked(&mut self, world: &mut World, target: Entity) -> QuizOutcome {
        let Some(selected) = self.selected.clone() else {
            return QuizOutcome::NoSelection;
        };

        if !world.check_target(target, &selected) {
            self.wrong_mark.trigger(WRONG_MARK_SECONDS);
            debug!(selected, target = world.name(target), "wrong answer");
            return QuizOutcome::Wrong { target };
        }

        self.correct += 1;
        self.board.increase();
        self.entries.retain(|e| e.id != selected);
        self.selected = None;
        let complete = self.is_complete();
        info!(id = %selected, score = self.board.score(), complete, "quiz answer correct");
        QuizOutcome::Solved { target, complete }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{TargetStyle, Transform};
    use crate::puzzle::PlacementTarget;
    use crate::rasterizer::{Color, Vec3};

    fn setup(ids: &[&str]) -> (World, Vec<Entity>, QuizSession) {
        let mut world = World::new();
        let style = TargetStyle { idle: Color::WHITE, solved: Color::new(0, 255, 0) };
        let targets = ids
            .iter()
            .enumerate()
            .map(|(i, id)| {
                world.spawn_target(
                    PlacementTarget::from_label(id),
                    Vec3::new(1.0, 1.0, 1.0),
                    style,
                    Transform::from_position(Vec3::new(i as f32 * 2.0, 0.0, 5.0)),
                )
            })
            .collect();
        let entries = ids
            .iter()
            .map(|id| QuizEntry { id: id.to_string(), display_name: id.to_uppercase() })
            .collect();
        (world, targets, QuizSession::new(entries))
    }

    #[test]
    fn test_no_selection() {
        let (mut world, targets, mut quiz) = setup(&["north"]);
        assert_eq!(quiz.target_clicked(&mut world, targets[0]), QuizOutcome::NoSelection);
        assert!(!quiz.wrong_mark_visible());
    }

    #[test]
    fn test_wrong_answer_flashes_without_penalty() {
        let (mut world, targets, mut quiz) = setup(&["north", "south"]);
        assert!(quiz.select("north"));
        assert_eq!(quiz.target_clicked(&mut world, targets[1]), QuizOutcome::Wrong { target: targets[1] });
        assert!(quiz.wrong_mark_visible());
        assert_eq!(quiz.score(), 0);
        assert_eq!(quiz.selected(), Some("north"));

        quiz.tick(WRONG_MARK_SECONDS + 0.01);
        assert!(!quiz.wrong_mark_visible());
    }

    #[test]
    fn test_correct_answers_complete_quiz() {
        let (mut world, targets, mut quiz) = setup(&["north", "south"]);

        quiz.select("north");
        assert_eq!(
            quiz.target_clicked(&mut world, targets[0]),
            QuizOutcome::Solved { target: targets[0], complete: false }
        );
        assert_eq!(quiz.selected(), None);
        assert_eq!(quiz.entries().len(), 1);
        assert!(!quiz.select("north"));

        quiz.select("south");
        assert_eq!(
            quiz.target_clicked(&mut world, targets[1]),
            QuizOutcome::Solved { target: targets[1], complete: true }
        );
        assert_eq!(quiz.score(), 20);
        assert!(quiz.is_complete());
        assert_eq!(world.unsolved_target_count(), 0);
    }

    #[test]
    fn test_solved_target_rejects_again() {
        let (mut world, targets, mut quiz) = setup(&["north", "south"]);
        quiz.select("north");
        quiz.target_clicked(&mut world, targets[0]);
        quiz.select("south");
        assert!(matches!(quiz.target_clicked(&mut world, targets[0]), QuizOutcome::Wrong { .. }));
    }
}
