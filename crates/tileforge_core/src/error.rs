//! Grid error types

use crate::TileCoord;

/// Errors raised by grid mutation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GridError {
    /// A write targeted a coordinate outside the layer extent
    OutOfBounds {
        coord: TileCoord,
        width: u32,
        height: u32,
    },
}

impl std::fmt::Display for GridError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GridError::OutOfBounds {
                coord,
                width,
                height,
            } => write!(
                f,
                "coordinate {} is outside the {}x{} layer extent",
                coord, width, height
            ),
        }
    }
}

impl std::error::Error for GridError {}
