//! Core data structures for the tileforge level editor
//!
//! This crate provides the fundamental types for representing one tile layer
//! of a level:
//! - `TileCoord` - Integer grid coordinate, used as a map key
//! - `TileId` - Opaque identity of an externally-owned tile definition
//! - `TileStack` - Ordered sequence of tiles occupying one cell
//! - `MultiTileGridLayer` - Sparse, fixed-extent grid of tile stacks
//! - `GridEvent` - Structural change notifications raised by the grid

mod coord;
mod error;
mod layer;
mod tile;

pub use coord::TileCoord;
pub use error::GridError;
pub use layer::{GridEvent, MultiTileGridLayer};
pub use tile::{stack_content_eq, TileId, TileStack};
