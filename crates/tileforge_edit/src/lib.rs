//! Undoable mutation engine for tileforge grid layers
//!
//! This crate provides the editing layer on top of `tileforge_core`:
//! - `Command` - Reversible unit of grid mutation
//! - `TileReplace2DCommand` - Coordinate-indexed diff with collapsed writes
//! - `CommandHistory` - Two-stack undo/redo manager
//! - `FloodFill` - Scanline flood fill that records into a command
//! - `TilePainter` - Strategy routing flat and brush writes through the
//!   same recording path

mod command;
mod fill;
mod history;

pub use command::{Command, CommandObserver, TileReplace2DCommand};
pub use fill::{
    BrushPainter, FillOptions, FillRange, FillRangeQueue, FloodFill, StackPainter, TilePainter,
};
pub use history::CommandHistory;
