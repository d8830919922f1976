//! Integer grid coordinates

use serde::{Deserialize, Serialize};

/// A 2D grid coordinate with value semantics.
///
/// Coordinates are plain integers so callers can express positions outside
/// the grid extent (e.g., a scan that walked past an edge); whether such a
/// coordinate is usable is decided by [`crate::MultiTileGridLayer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TileCoord {
    pub x: i32,
    pub y: i32,
}

impl TileCoord {
    /// Create a coordinate
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl From<(i32, i32)> for TileCoord {
    fn from((x, y): (i32, i32)) -> Self {
        Self { x, y }
    }
}

impl std::fmt::Display for TileCoord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}
