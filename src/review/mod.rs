pub mod session;

pub use session::GameReview;

use crate::core::TreePath;
use crate::error::ReviewResult;

/// Playback position and data an autoplay controller steps through
///
/// Implementations own the cursor. The controller only reads it, asks for a
/// jump to the next ply and requests redraws.
pub trait ReviewSession {
    /// Whether a further ply exists in the current line
    fn can_advance(&self) -> bool;

    /// Current playback position
    fn path(&self) -> &TreePath;

    /// Move the playback position to `path`
    fn jump(&mut self, path: TreePath) -> ReviewResult<()>;

    /// Recorded time of the move played from `ply`, in tenths of a second
    fn move_time(&self, ply: usize) -> Option<u32>;

    /// Notify observers that the position changed
    fn redraw(&mut self);
}
