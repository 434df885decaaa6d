use crate::core::{Game, Move, TreePath};
use crate::error::ReviewResult;
use crate::review::ReviewSession;
use tracing::debug;

/// In-memory review of a single recorded game
pub struct GameReview {
    game: Game,
    path: TreePath,
    redraws: u64,
}

impl GameReview {
    pub fn new(game: Game) -> Self {
        Self {
            game,
            path: TreePath::start(),
            redraws: 0,
        }
    }

    /// Move that led to the current position, if any
    pub fn current_move(&self) -> Option<&Move> {
        self.game.move_at(&self.path)
    }

    /// Take the pending redraw count, resetting it
    pub fn take_redraws(&mut self) -> u64 {
        std::mem::take(&mut self.redraws)
    }
}

impl ReviewSession for GameReview {
    fn can_advance(&self) -> bool {
        let Some(last) = self.path.last() else {
            return false;
        };
        match self.game.resolve(&self.path) {
            Ok(line) => line.contains(last.ply + 1),
            Err(_) => false,
        }
    }

    fn path(&self) -> &TreePath {
        &self.path
    }

    fn jump(&mut self, path: TreePath) -> ReviewResult<()> {
        self.game.resolve(&path)?;
        debug!("Jumping to {}", path);
        self.path = path;
        Ok(())
    }

    fn move_time(&self, ply: usize) -> Option<u32> {
        self.game.move_time(ply)
    }

    fn redraw(&mut self) {
        self.redraws += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Line, PathMarker};
    use crate::error::ReviewError;

    fn review() -> GameReview {
        let mut game = Game::from_mainline(
            "t",
            vec![Move::new("d4", Some(5)), Move::new("d5", None)],
        );
        game.mainline.moves[0]
            .variations
            .push(Line::new(0, vec![Move::new("e4", None)]));
        GameReview::new(game)
    }

    #[test]
    fn test_starts_at_initial_position() {
        let review = review();
        assert_eq!(review.path(), &TreePath::start());
        assert!(review.current_move().is_none());
        assert!(review.can_advance());
    }

    #[test]
    fn test_can_advance_until_line_ends() {
        let mut review = review();
        review.jump(TreePath::new(vec![PathMarker::new(2)])).unwrap();
        assert!(!review.can_advance());
        assert_eq!(review.current_move().map(|m| m.san.as_str()), Some("d5"));

        review
            .jump(TreePath::new(vec![PathMarker::branch(1, 0), PathMarker::new(1)]))
            .unwrap();
        assert!(!review.can_advance());
        assert_eq!(review.current_move().map(|m| m.san.as_str()), Some("e4"));
    }

    #[test]
    fn test_jump_rejects_unknown_path_and_keeps_position() {
        let mut review = review();
        let err = review.jump(TreePath::new(vec![PathMarker::new(9)])).unwrap_err();
        assert!(matches!(err, ReviewError::PathNotFound { .. }));
        assert_eq!(review.path(), &TreePath::start());
    }

    #[test]
    fn test_redraw_counter() {
        let mut review = review();
        review.redraw();
        review.redraw();
        assert_eq!(review.take_redraws(), 2);
        assert_eq!(review.take_redraws(), 0);
    }

    #[test]
    fn test_move_time_from_mainline() {
        let review = review();
        assert_eq!(review.move_time(0), Some(5));
        assert_eq!(review.move_time(1), None);
    }
}
