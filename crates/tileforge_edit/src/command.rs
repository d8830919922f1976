//! Reversible grid mutation commands

use std::collections::HashMap;
use std::rc::Weak;

use tileforge_core::{GridError, MultiTileGridLayer, TileCoord, TileId, TileStack};

/// A self-contained, exactly reversible unit of grid mutation.
///
/// A command holds exactly enough state to apply its effect and to take it
/// back; `execute` and `undo` are symmetric. `redo` defaults to `execute`.
pub trait Command {
    fn execute(&mut self, layer: &mut MultiTileGridLayer) -> Result<(), GridError>;
    fn undo(&mut self, layer: &mut MultiTileGridLayer) -> Result<(), GridError>;
    fn redo(&mut self, layer: &mut MultiTileGridLayer) -> Result<(), GridError> {
        self.execute(layer)
    }
    fn description(&self) -> &str;
}

/// Hook notified after a command applies, undoes, or redoes.
///
/// An editor uses this to refresh whatever display state depends on the
/// grid (e.g., the active selection). Commands hold only a weak reference,
/// so the observer's lifetime is never extended by the history.
pub trait CommandObserver {
    fn command_applied(&self, command: &TileReplace2DCommand);
}

/// One cell's recorded change: the stack before the command first touched
/// the cell, and after its last touch.
#[derive(Debug, Clone)]
struct CellChange {
    old: Option<TileStack>,
    new: Option<TileStack>,
}

/// A diff-recording command over one grid layer.
///
/// The `queue_*` methods are the authoring pass: each one live-applies a
/// mutation to the layer and records it. Repeated writes to the same
/// coordinate collapse into a single (old, new) pair, where `old` is the
/// state before the first touch and `new` the state after the last, so
/// undo restores the pre-command baseline no matter how many intermediate
/// writes happened.
///
/// Because authoring live-applies, `execute` is only invoked when the
/// command is replayed: by [`crate::CommandHistory::execute`] for a command
/// authored without a layer at hand, or on redo after an undo.
pub struct TileReplace2DCommand {
    description: String,
    changes: HashMap<TileCoord, CellChange>,
    observer: Option<Weak<dyn CommandObserver>>,
}

impl TileReplace2DCommand {
    /// Create an empty command
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            changes: HashMap::new(),
            observer: None,
        }
    }

    /// Attach an observer notified after every apply/undo/redo
    pub fn with_observer(mut self, observer: Weak<dyn CommandObserver>) -> Self {
        self.observer = Some(observer);
        self
    }

    /// Push `tile` onto the cell at `coord` and record the write
    pub fn queue_add(
        &mut self,
        layer: &mut MultiTileGridLayer,
        coord: TileCoord,
        tile: TileId,
    ) -> Result<(), GridError> {
        self.record(layer, coord, |layer| layer.add_tile(coord, tile))
    }

    /// Remove `tile` from the cell at `coord` and record the write
    pub fn queue_remove(
        &mut self,
        layer: &mut MultiTileGridLayer,
        coord: TileCoord,
        tile: TileId,
    ) -> Result<(), GridError> {
        self.record(layer, coord, |layer| {
            layer.remove_tile(coord, tile).map(|_| ())
        })
    }

    /// Replace the whole cell at `coord` and record the write
    pub fn queue_replacement(
        &mut self,
        layer: &mut MultiTileGridLayer,
        coord: TileCoord,
        stack: Option<TileStack>,
    ) -> Result<(), GridError> {
        self.record(layer, coord, |layer| layer.set_stack(coord, stack))
    }

    /// First-touch/last-touch bookkeeping shared by the `queue_*` methods.
    /// The mutation runs before anything is recorded, so a rejected write
    /// leaves the diff untouched.
    fn record<F>(
        &mut self,
        layer: &mut MultiTileGridLayer,
        coord: TileCoord,
        mutate: F,
    ) -> Result<(), GridError>
    where
        F: FnOnce(&mut MultiTileGridLayer) -> Result<(), GridError>,
    {
        let first_touch = !self.changes.contains_key(&coord);
        let old = if first_touch {
            layer.stack(coord).cloned()
        } else {
            None
        };

        mutate(layer)?;

        let new = layer.stack(coord).cloned();
        if first_touch {
            self.changes.insert(coord, CellChange { old, new });
        } else if let Some(change) = self.changes.get_mut(&coord) {
            change.new = new;
        }
        Ok(())
    }

    /// Number of coordinates this command touches
    pub fn len(&self) -> usize {
        self.changes.len()
    }

    /// Whether the command touches no coordinate at all
    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    /// Coordinates this command touches, in no particular order
    pub fn touched(&self) -> impl Iterator<Item = TileCoord> + '_ {
        self.changes.keys().copied()
    }

    /// The recorded (old, new) pair for `coord`, if touched
    pub fn change(&self, coord: TileCoord) -> Option<(Option<&TileStack>, Option<&TileStack>)> {
        self.changes
            .get(&coord)
            .map(|c| (c.old.as_ref(), c.new.as_ref()))
    }

    fn notify(&self) {
        if let Some(observer) = self.observer.as_ref().and_then(|o| o.upgrade()) {
            observer.command_applied(self);
        }
    }
}

impl Command for TileReplace2DCommand {
    fn execute(&mut self, layer: &mut MultiTileGridLayer) -> Result<(), GridError> {
        for (coord, change) in &self.changes {
            layer.set_stack(*coord, change.new.clone())?;
        }
        self.notify();
        Ok(())
    }

    fn undo(&mut self, layer: &mut MultiTileGridLayer) -> Result<(), GridError> {
        for (coord, change) in &self.changes {
            layer.set_stack(*coord, change.old.clone())?;
        }
        self.notify();
        Ok(())
    }

    fn description(&self) -> &str {
        &self.description
    }
}

impl std::fmt::Debug for TileReplace2DCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TileReplace2DCommand")
            .field("description", &self.description)
            .field("changes", &self.changes)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    fn layer() -> MultiTileGridLayer {
        MultiTileGridLayer::new(10, 10)
    }

    #[test]
    fn test_collapsed_diff_single_pair_per_coord() {
        let mut layer = layer();
        let coord = TileCoord::new(3, 3);
        let a = TileId::new();
        let b = TileId::new();
        let c = TileId::new();
        layer.add_tile(coord, a).unwrap();

        let mut cmd = TileReplace2DCommand::new("Paint");
        cmd.queue_add(&mut layer, coord, b).unwrap();
        cmd.queue_add(&mut layer, coord, c).unwrap();
        cmd.queue_remove(&mut layer, coord, b).unwrap();

        assert_eq!(cmd.len(), 1);
        let (old, new) = cmd.change(coord).unwrap();
        assert_eq!(old, Some(&TileStack::from_tiles([a])));
        assert_eq!(new, Some(&TileStack::from_tiles([a, c])));
    }

    #[test]
    fn test_undo_restores_pre_command_baseline() {
        let mut layer = layer();
        let coord = TileCoord::new(1, 1);
        let a = TileId::new();
        let b = TileId::new();
        layer.add_tile(coord, a).unwrap();

        let mut cmd = TileReplace2DCommand::new("Paint");
        cmd.queue_replacement(&mut layer, coord, Some(TileStack::from_tiles([b])))
            .unwrap();
        cmd.queue_add(&mut layer, coord, a).unwrap();
        assert_eq!(layer.stack(coord), Some(&TileStack::from_tiles([b, a])));

        cmd.undo(&mut layer).unwrap();
        assert_eq!(layer.stack(coord), Some(&TileStack::from_tiles([a])));

        cmd.redo(&mut layer).unwrap();
        assert_eq!(layer.stack(coord), Some(&TileStack::from_tiles([b, a])));
    }

    #[test]
    fn test_undo_restores_vacant_cell() {
        let mut layer = layer();
        let coord = TileCoord::new(0, 9);

        let mut cmd = TileReplace2DCommand::new("Paint");
        cmd.queue_add(&mut layer, coord, TileId::new()).unwrap();
        assert_eq!(layer.occupied_count(), 1);

        cmd.undo(&mut layer).unwrap();
        assert_eq!(layer.stack(coord), None);
        assert_eq!(layer.occupied_count(), 0);
    }

    #[test]
    fn test_rejected_write_is_not_recorded() {
        let mut layer = layer();
        let mut cmd = TileReplace2DCommand::new("Paint");

        let err = cmd.queue_add(&mut layer, TileCoord::new(10, 0), TileId::new());
        assert!(matches!(err, Err(GridError::OutOfBounds { .. })));
        assert!(cmd.is_empty());
    }

    struct CountingObserver {
        applied: Cell<usize>,
    }

    impl CommandObserver for CountingObserver {
        fn command_applied(&self, _command: &TileReplace2DCommand) {
            self.applied.set(self.applied.get() + 1);
        }
    }

    #[test]
    fn test_observer_notified_without_ownership() {
        let mut layer = layer();
        let observer = Rc::new(CountingObserver {
            applied: Cell::new(0),
        });
        let weak: Weak<dyn CommandObserver> = Rc::<CountingObserver>::downgrade(&observer);

        let mut cmd = TileReplace2DCommand::new("Paint").with_observer(weak);
        cmd.queue_add(&mut layer, TileCoord::new(2, 2), TileId::new())
            .unwrap();

        cmd.undo(&mut layer).unwrap();
        cmd.redo(&mut layer).unwrap();
        assert_eq!(observer.applied.get(), 2);

        // A dropped observer degrades to a silent no-op
        drop(observer);
        cmd.undo(&mut layer).unwrap();
    }
}
