//! # tileforge
//!
//! Tile grid mutation engine for level editors.
//!
//! A level's tile layer is a sparse grid of tile stacks. Editing tools
//! mutate it through commands that record a reversible diff, a two-stack
//! history drives undo/redo, and a scanline flood fill produces whole-fill
//! commands in a single pass.
//!
//! ## Quick Start
//!
//! ```
//! use tileforge::{
//!     CommandHistory, FloodFill, MultiTileGridLayer, StackPainter, TileCoord, TileId, TileStack,
//! };
//!
//! # fn main() -> Result<(), tileforge::GridError> {
//! let mut layer = MultiTileGridLayer::new(32, 32);
//! let mut history = CommandHistory::new();
//!
//! let grass = TileId::new();
//! let painter = StackPainter::new(Some(TileStack::from_tiles([grass])));
//! if let Some(command) = FloodFill::new(&mut layer, painter).fill(TileCoord::new(4, 4))? {
//!     // The fill already mutated the layer; the history keeps its inverse
//!     history.push(Box::new(command));
//! }
//!
//! history.undo(&mut layer)?;
//! assert_eq!(layer.occupied_count(), 0);
//! # Ok(())
//! # }
//! ```
//!
//! ## Crate Structure
//!
//! This umbrella crate re-exports the tileforge sub-crates:
//!
//! - [`core`] - Grid data model (coordinates, tile stacks, the layer)
//! - [`edit`] - Mutation engine (commands, history, flood fill)

// =============================================================================
// Core module - grid data model
// =============================================================================

/// Grid data model: coordinates, tile identity, stacks, and the layer.
pub mod core {
    pub use tileforge_core::*;
}

pub use tileforge_core::{
    stack_content_eq, GridError, GridEvent, MultiTileGridLayer, TileCoord, TileId, TileStack,
};

// =============================================================================
// Edit module - undoable mutation engine
// =============================================================================

/// Mutation engine: commands, undo/redo history, and flood fill.
pub mod edit {
    pub use tileforge_edit::*;
}

pub use tileforge_edit::{
    BrushPainter, Command, CommandHistory, CommandObserver, FillOptions, FillRange,
    FillRangeQueue, FloodFill, StackPainter, TilePainter, TileReplace2DCommand,
};
