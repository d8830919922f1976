//! Two-stack undo/redo manager

use log::debug;

use tileforge_core::{GridError, MultiTileGridLayer};

use crate::Command;

const DEFAULT_LIMIT: usize = 256;

/// Undo/redo history over boxed [`Command`]s.
///
/// Executing or pushing a new command clears the redo stack. Undo and redo
/// on an empty stack are defined no-ops. When the undo stack outgrows the
/// configured limit the oldest entry is evicted.
///
/// Change notification follows the editor's dirty-flag convention: every
/// mutation marks the history changed and a UI layer polls
/// [`CommandHistory::take_changed`] once per frame.
pub struct CommandHistory {
    undo_stack: Vec<Box<dyn Command>>,
    redo_stack: Vec<Box<dyn Command>>,
    limit: usize,
    changed: bool,
}

impl CommandHistory {
    /// Create a history with the default depth limit
    pub fn new() -> Self {
        Self::with_limit(DEFAULT_LIMIT)
    }

    /// Create a history keeping at most `limit` undoable commands
    pub fn with_limit(limit: usize) -> Self {
        Self {
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            limit: limit.max(1),
            changed: false,
        }
    }

    /// Run `command.execute` against `layer`, then retain it for undo.
    ///
    /// Used for commands authored without live-applying; commands built by
    /// a `queue_*` authoring pass or a flood fill have already mutated the
    /// layer and go through [`CommandHistory::push`] instead.
    pub fn execute(
        &mut self,
        mut command: Box<dyn Command>,
        layer: &mut MultiTileGridLayer,
    ) -> Result<(), GridError> {
        command.execute(layer)?;
        self.push(command);
        Ok(())
    }

    /// Retain an already live-applied command for undo
    pub fn push(&mut self, command: Box<dyn Command>) {
        debug!("history: push '{}'", command.description());
        if self.undo_stack.len() >= self.limit {
            self.undo_stack.remove(0);
        }
        self.undo_stack.push(command);
        self.redo_stack.clear();
        self.changed = true;
    }

    /// Undo the most recent command. Returns `Ok(false)` when there is
    /// nothing to undo.
    pub fn undo(&mut self, layer: &mut MultiTileGridLayer) -> Result<bool, GridError> {
        let Some(mut command) = self.undo_stack.pop() else {
            return Ok(false);
        };
        debug!("history: undo '{}'", command.description());
        match command.undo(layer) {
            Ok(()) => {
                self.redo_stack.push(command);
                self.changed = true;
                Ok(true)
            }
            Err(e) => {
                self.undo_stack.push(command);
                Err(e)
            }
        }
    }

    /// Redo the most recently undone command. Returns `Ok(false)` when
    /// there is nothing to redo.
    pub fn redo(&mut self, layer: &mut MultiTileGridLayer) -> Result<bool, GridError> {
        let Some(mut command) = self.redo_stack.pop() else {
            return Ok(false);
        };
        debug!("history: redo '{}'", command.description());
        match command.redo(layer) {
            Ok(()) => {
                self.undo_stack.push(command);
                self.changed = true;
                Ok(true)
            }
            Err(e) => {
                self.redo_stack.push(command);
                Err(e)
            }
        }
    }

    /// Drop both stacks (document load/close)
    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
        self.changed = true;
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Description of the command `undo` would apply next
    pub fn undo_description(&self) -> Option<&str> {
        self.undo_stack.last().map(|c| c.description())
    }

    /// Description of the command `redo` would apply next
    pub fn redo_description(&self) -> Option<&str> {
        self.redo_stack.last().map(|c| c.description())
    }

    /// Whether the history changed since the last call
    pub fn take_changed(&mut self) -> bool {
        std::mem::take(&mut self.changed)
    }
}

impl Default for CommandHistory {
    fn default() -> Self {
        Self::new()
    }
}
