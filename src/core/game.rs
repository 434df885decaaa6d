use crate::core::{PathMarker, TreePath};
use crate::error::{ReviewError, ReviewResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single recorded move
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Move {
    /// Move in standard algebraic notation
    pub san: String,

    /// Time spent on this move, in tenths of a second
    #[serde(default)]
    pub move_time: Option<u32>,

    /// Alternatives to this move, each starting from the position before it
    #[serde(default)]
    pub variations: Vec<Line>,
}

impl Move {
    pub fn new(san: impl Into<String>, move_time: Option<u32>) -> Self {
        Self {
            san: san.into(),
            move_time,
            variations: Vec::new(),
        }
    }
}

/// A line of consecutive moves starting after `start_ply`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Line {
    #[serde(default)]
    pub start_ply: usize,
    pub moves: Vec<Move>,
}

impl Line {
    pub fn new(start_ply: usize, moves: Vec<Move>) -> Self {
        Self { start_ply, moves }
    }

    /// Ply reached after the last move of this line
    pub fn last_ply(&self) -> usize {
        self.start_ply + self.moves.len()
    }

    /// Whether the position at `ply` belongs to this line
    pub fn contains(&self, ply: usize) -> bool {
        ply >= self.start_ply && ply <= self.last_ply()
    }

    /// The move that reaches `ply`
    pub fn move_at(&self, ply: usize) -> Option<&Move> {
        if ply <= self.start_ply {
            return None;
        }
        self.moves.get(ply - self.start_ply - 1)
    }
}

/// A recorded game with its analysis tree
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Game {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub white: Option<String>,
    #[serde(default)]
    pub black: Option<String>,
    #[serde(default)]
    pub played_at: Option<DateTime<Utc>>,
    pub mainline: Line,
}

impl Game {
    /// Create a game from mainline moves only
    pub fn from_mainline(id: impl Into<String>, moves: Vec<Move>) -> Self {
        Self {
            id: id.into(),
            mainline: Line::new(0, moves),
            ..Default::default()
        }
    }

    /// Find the line the last marker of `path` points into.
    ///
    /// Every marker but the last must name a variation of the move reaching
    /// its ply. Each ply must lie within its line.
    pub fn resolve(&self, path: &TreePath) -> ReviewResult<&Line> {
        let (last, parents) = path
            .markers()
            .split_last()
            .ok_or(ReviewError::EmptyPath)?;

        let mut line = &self.mainline;
        for marker in parents {
            check_ply(path, line, marker)?;
            let variation = marker.variation.ok_or_else(|| {
                not_found(path, format!("marker at ply {} has no variation", marker.ply))
            })?;
            line = line
                .move_at(marker.ply)
                .and_then(|m| m.variations.get(variation))
                .ok_or_else(|| {
                    not_found(path, format!("no variation {} at ply {}", variation, marker.ply))
                })?;
        }

        check_ply(path, line, last)?;
        Ok(line)
    }

    /// Recorded time of the mainline move played from `ply`
    pub fn move_time(&self, ply: usize) -> Option<u32> {
        self.mainline.move_at(ply + 1).and_then(|m| m.move_time)
    }

    /// Move that led to the position at the end of `path`
    pub fn move_at(&self, path: &TreePath) -> Option<&Move> {
        let last = path.last()?;
        self.resolve(path).ok()?.move_at(last.ply)
    }

    /// Number of mainline moves
    pub fn len(&self) -> usize {
        self.mainline.moves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mainline.moves.is_empty()
    }
}

fn check_ply(path: &TreePath, line: &Line, marker: &PathMarker) -> ReviewResult<()> {
    if line.contains(marker.ply) {
        Ok(())
    } else {
        let reason = format!(
            "ply {} outside line {}..={}",
            marker.ply,
            line.start_ply,
            line.last_ply()
        );
        Err(not_found(path, reason))
    }
}

fn not_found(path: &TreePath, reason: String) -> ReviewError {
    ReviewError::PathNotFound {
        path: path.to_string(),
        reason,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 1. e4 e5 2. Nf3 with 1... c5 as a variation to 1... e5
    fn sample_game() -> Game {
        let mut game = Game::from_mainline(
            "sample",
            vec![
                Move::new("e4", Some(12)),
                Move::new("e5", Some(30)),
                Move::new("Nf3", None),
            ],
        );
        game.mainline.moves[1]
            .variations
            .push(Line::new(1, vec![Move::new("c5", None), Move::new("Nf3", None)]));
        game
    }

    #[test]
    fn test_line_bounds() {
        let line = Line::new(1, vec![Move::new("c5", None), Move::new("Nf3", None)]);
        assert_eq!(line.last_ply(), 3);
        assert!(line.contains(1));
        assert!(!line.contains(0));
        assert!(!line.contains(4));
        assert!(line.move_at(1).is_none());
        assert_eq!(line.move_at(2).map(|m| m.san.as_str()), Some("c5"));
    }

    #[test]
    fn test_resolve_mainline() {
        let game = sample_game();
        let line = game.resolve(&TreePath::new(vec![PathMarker::new(3)])).unwrap();
        assert_eq!(line.start_ply, 0);
    }

    #[test]
    fn test_resolve_variation() {
        let game = sample_game();
        let path = TreePath::new(vec![PathMarker::branch(2, 0), PathMarker::new(2)]);
        let line = game.resolve(&path).unwrap();
        assert_eq!(line.start_ply, 1);
        assert_eq!(game.move_at(&path).map(|m| m.san.as_str()), Some("c5"));
    }

    #[test]
    fn test_resolve_rejects_bad_paths() {
        let game = sample_game();
        assert_eq!(game.resolve(&TreePath::new(Vec::new())), Err(ReviewError::EmptyPath));
        assert!(game.resolve(&TreePath::new(vec![PathMarker::new(4)])).is_err());
        let missing = TreePath::new(vec![PathMarker::branch(2, 3), PathMarker::new(2)]);
        assert!(game.resolve(&missing).is_err());
        let no_branch = TreePath::new(vec![PathMarker::new(2), PathMarker::new(2)]);
        assert!(game.resolve(&no_branch).is_err());
    }

    #[test]
    fn test_move_time_reads_move_played_from_ply() {
        let game = sample_game();
        assert_eq!(game.move_time(0), Some(12));
        assert_eq!(game.move_time(1), Some(30));
        assert_eq!(game.move_time(2), None);
        assert_eq!(game.move_time(10), None);
    }
}
