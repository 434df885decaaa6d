pub mod game;
pub mod path;

pub use game::{Game, Line, Move};
pub use path::{PathMarker, TreePath};
