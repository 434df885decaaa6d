use serde::{Deserialize, Serialize};
use std::fmt;

/// One step of a path through the game tree
///
/// `ply` is the position within the current line. When `variation` is set,
/// the path leaves this line at `ply` and continues inside that variation of
/// the move reaching `ply`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathMarker {
    pub ply: usize,
    pub variation: Option<usize>,
}

impl PathMarker {
    pub fn new(ply: usize) -> Self {
        Self { ply, variation: None }
    }

    pub fn branch(ply: usize, variation: usize) -> Self {
        Self {
            ply,
            variation: Some(variation),
        }
    }
}

/// Ordered list of markers from the mainline down to the current line
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreePath(Vec<PathMarker>);

impl TreePath {
    pub fn new(markers: Vec<PathMarker>) -> Self {
        Self(markers)
    }

    /// Path to the initial position of the mainline
    pub fn start() -> Self {
        Self(vec![PathMarker::new(0)])
    }

    pub fn markers(&self) -> &[PathMarker] {
        &self.0
    }

    /// First marker, which always addresses the mainline
    pub fn root(&self) -> Option<&PathMarker> {
        self.0.first()
    }

    pub fn last(&self) -> Option<&PathMarker> {
        self.0.last()
    }

    /// Whether the path has left the mainline
    pub fn in_variation(&self) -> bool {
        self.0.len() > 1
    }

    /// Move one ply forward within the current line.
    ///
    /// Only the last marker changes, so the active line stays the same.
    pub fn advance(&mut self) {
        if let Some(last) = self.0.last_mut() {
            last.ply += 1;
        }
    }
}

impl Default for TreePath {
    fn default() -> Self {
        Self::start()
    }
}

impl fmt::Display for TreePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .0
            .iter()
            .map(|m| match m.variation {
                Some(v) => format!("{}:{}", m.ply, v),
                None => m.ply.to_string(),
            })
            .collect();
        write!(f, "{}", parts.join("/"))
    }
}
