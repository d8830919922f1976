//! Sparse multi-tile grid layer

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::{GridError, TileCoord, TileId, TileStack};

/// Structural change notification raised by [`MultiTileGridLayer`].
///
/// `TileAdding`/`TileRemoving` fire before the mutation, `TileAdded`/
/// `TileRemoved` after it; painting tools use the pre/post pair as hook
/// points. Events accumulate inside the layer and are consumed with
/// [`MultiTileGridLayer::drain_events`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GridEvent {
    TileAdding { coord: TileCoord, tile: TileId },
    TileAdded { coord: TileCoord, tile: TileId },
    TileRemoving { coord: TileCoord, tile: TileId },
    TileRemoved { coord: TileCoord, tile: TileId },
    /// A whole cell was assigned or cleared
    CellReplaced { coord: TileCoord },
}

/// One layer of a level: a fixed-extent, sparse mapping from coordinates to
/// tile stacks.
///
/// The logical extent is `[0, width) x [0, height)`. Cells are created
/// lazily on first write and dropped again when a write leaves them empty,
/// so an absent key and an empty stack are the same "no content" state.
/// Writes outside the extent are rejected with [`GridError::OutOfBounds`];
/// the layer is the single bounds enforcement point, callers do not need to
/// pre-validate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MultiTileGridLayer {
    width: u32,
    height: u32,
    #[serde(with = "cells_serde")]
    cells: HashMap<TileCoord, TileStack>,
    #[serde(skip)]
    events: Vec<GridEvent>,
}

impl MultiTileGridLayer {
    /// Create an empty layer with the given extent
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            cells: HashMap::new(),
            events: Vec::new(),
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Whether `coord` lies inside the layer extent
    pub fn contains(&self, coord: TileCoord) -> bool {
        coord.x >= 0
            && coord.y >= 0
            && (coord.x as u32) < self.width
            && (coord.y as u32) < self.height
    }

    fn check_bounds(&self, coord: TileCoord) -> Result<(), GridError> {
        if self.contains(coord) {
            Ok(())
        } else {
            Err(GridError::OutOfBounds {
                coord,
                width: self.width,
                height: self.height,
            })
        }
    }

    /// Get the stack at `coord`.
    ///
    /// Returns `None` both for an empty cell and for a coordinate outside
    /// the extent; reads are infallible.
    pub fn stack(&self, coord: TileCoord) -> Option<&TileStack> {
        self.cells.get(&coord)
    }

    /// Assign a whole cell. `None` or an empty stack clears it.
    pub fn set_stack(
        &mut self,
        coord: TileCoord,
        stack: Option<TileStack>,
    ) -> Result<(), GridError> {
        self.check_bounds(coord)?;
        match stack {
            Some(s) if !s.is_empty() => {
                self.cells.insert(coord, s);
            }
            _ => {
                self.cells.remove(&coord);
            }
        }
        self.events.push(GridEvent::CellReplaced { coord });
        Ok(())
    }

    /// Push `tile` onto the stack at `coord`, creating the stack if absent
    pub fn add_tile(&mut self, coord: TileCoord, tile: TileId) -> Result<(), GridError> {
        self.check_bounds(coord)?;
        self.events.push(GridEvent::TileAdding { coord, tile });
        self.cells.entry(coord).or_default().push(tile);
        self.events.push(GridEvent::TileAdded { coord, tile });
        Ok(())
    }

    /// Remove every occurrence of `tile` from the stack at `coord`,
    /// returning how many were removed
    pub fn remove_tile(&mut self, coord: TileCoord, tile: TileId) -> Result<usize, GridError> {
        self.check_bounds(coord)?;
        let Some(stack) = self.cells.get_mut(&coord) else {
            return Ok(0);
        };
        if !stack.contains(tile) {
            return Ok(0);
        }
        self.events.push(GridEvent::TileRemoving { coord, tile });
        let removed = stack.remove(tile);
        if stack.is_empty() {
            self.cells.remove(&coord);
        }
        self.events.push(GridEvent::TileRemoved { coord, tile });
        Ok(removed)
    }

    /// Remove `tile` from every cell in the layer, returning how many
    /// entries were removed.
    ///
    /// Scans every occupied cell; used for "delete this tile definition
    /// everywhere" operations, not for per-gesture editing.
    pub fn remove_all_matching_tiles(&mut self, tile: TileId) -> usize {
        let coords: Vec<TileCoord> = self
            .cells
            .iter()
            .filter(|(_, stack)| stack.contains(tile))
            .map(|(coord, _)| *coord)
            .collect();

        let mut removed = 0;
        for coord in coords {
            self.events.push(GridEvent::TileRemoving { coord, tile });
            if let Some(stack) = self.cells.get_mut(&coord) {
                removed += stack.remove(tile);
                if stack.is_empty() {
                    self.cells.remove(&coord);
                }
            }
            self.events.push(GridEvent::TileRemoved { coord, tile });
        }
        removed
    }

    /// Iterate over occupied cells in no particular order
    pub fn occupied(&self) -> impl Iterator<Item = (TileCoord, &TileStack)> {
        self.cells.iter().map(|(coord, stack)| (*coord, stack))
    }

    /// Number of occupied cells
    pub fn occupied_count(&self) -> usize {
        self.cells.len()
    }

    /// Take all structural events accumulated since the last drain
    pub fn drain_events(&mut self) -> Vec<GridEvent> {
        std::mem::take(&mut self.events)
    }
}

/// Serialize the sparse cell map as a sequence of (coord, stack) pairs so
/// text formats with string-only map keys can represent it.
mod cells_serde {
    use super::*;
    use serde::ser::SerializeSeq;
    use serde::{Deserializer, Serializer};

    pub fn serialize<S: Serializer>(
        cells: &HashMap<TileCoord, TileStack>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(cells.len()))?;
        for entry in cells {
            seq.serialize_element(&entry)?;
        }
        seq.end()
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<HashMap<TileCoord, TileStack>, D::Error> {
        let pairs = Vec::<(TileCoord, TileStack)>::deserialize(deserializer)?;
        Ok(pairs.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stack_content_eq;

    #[test]
    fn test_set_get_round_trip() {
        let mut layer = MultiTileGridLayer::new(10, 10);
        let stack = TileStack::from_tiles([TileId::new(), TileId::new()]);
        let coord = TileCoord::new(5, 5);

        layer.set_stack(coord, Some(stack.clone())).unwrap();
        assert_eq!(layer.stack(coord), Some(&stack));

        layer.set_stack(coord, None).unwrap();
        assert_eq!(layer.stack(coord), None);
    }

    #[test]
    fn test_empty_stack_clears_cell() {
        let mut layer = MultiTileGridLayer::new(4, 4);
        let coord = TileCoord::new(1, 2);

        layer
            .set_stack(coord, Some(TileStack::from_tiles([TileId::new()])))
            .unwrap();
        assert_eq!(layer.occupied_count(), 1);

        layer.set_stack(coord, Some(TileStack::new())).unwrap();
        assert_eq!(layer.occupied_count(), 0);
        assert!(stack_content_eq(layer.stack(coord), None));
    }

    #[test]
    fn test_out_of_bounds_write_rejected() {
        let mut layer = MultiTileGridLayer::new(3, 3);
        let tile = TileId::new();

        for coord in [
            TileCoord::new(-1, 0),
            TileCoord::new(0, -1),
            TileCoord::new(3, 0),
            TileCoord::new(0, 3),
        ] {
            assert!(matches!(
                layer.add_tile(coord, tile),
                Err(GridError::OutOfBounds { .. })
            ));
            assert!(layer.set_stack(coord, None).is_err());
        }
        assert_eq!(layer.occupied_count(), 0);

        // Reads stay infallible
        assert_eq!(layer.stack(TileCoord::new(-1, 0)), None);
    }

    #[test]
    fn test_add_tile_creates_and_stacks() {
        let mut layer = MultiTileGridLayer::new(8, 8);
        let coord = TileCoord::new(2, 3);
        let a = TileId::new();
        let b = TileId::new();

        layer.add_tile(coord, a).unwrap();
        layer.add_tile(coord, b).unwrap();

        let stack = layer.stack(coord).unwrap();
        assert_eq!(stack.len(), 2);
        assert_eq!(stack.top(), Some(b));
    }

    #[test]
    fn test_add_tile_event_order() {
        let mut layer = MultiTileGridLayer::new(8, 8);
        let coord = TileCoord::new(0, 0);
        let tile = TileId::new();

        layer.add_tile(coord, tile).unwrap();
        let events = layer.drain_events();
        assert_eq!(
            events,
            vec![
                GridEvent::TileAdding { coord, tile },
                GridEvent::TileAdded { coord, tile },
            ]
        );
        assert!(layer.drain_events().is_empty());
    }

    #[test]
    fn test_remove_tile_drops_empty_cell() {
        let mut layer = MultiTileGridLayer::new(8, 8);
        let coord = TileCoord::new(4, 4);
        let tile = TileId::new();

        layer.add_tile(coord, tile).unwrap();
        assert_eq!(layer.remove_tile(coord, tile).unwrap(), 1);
        assert_eq!(layer.occupied_count(), 0);

        // Removing from an empty cell is a no-op, not an error
        assert_eq!(layer.remove_tile(coord, tile).unwrap(), 0);
    }

    #[test]
    fn test_remove_all_matching_tiles() {
        let mut layer = MultiTileGridLayer::new(8, 8);
        let doomed = TileId::new();
        let keep = TileId::new();

        layer.add_tile(TileCoord::new(0, 0), doomed).unwrap();
        layer.add_tile(TileCoord::new(1, 0), doomed).unwrap();
        layer.add_tile(TileCoord::new(1, 0), keep).unwrap();
        layer.add_tile(TileCoord::new(2, 0), doomed).unwrap();
        layer.add_tile(TileCoord::new(2, 0), doomed).unwrap();
        layer.add_tile(TileCoord::new(3, 0), keep).unwrap();

        assert_eq!(layer.remove_all_matching_tiles(doomed), 4);
        assert_eq!(layer.occupied_count(), 2);
        assert_eq!(layer.stack(TileCoord::new(1, 0)).unwrap().top(), Some(keep));
        assert_eq!(layer.stack(TileCoord::new(2, 0)), None);
    }

    #[test]
    fn test_serde_snapshot_round_trip() {
        let mut layer = MultiTileGridLayer::new(6, 6);
        let a = TileId::new();
        let b = TileId::new();
        layer.add_tile(TileCoord::new(1, 1), a).unwrap();
        layer.add_tile(TileCoord::new(1, 1), b).unwrap();
        layer.add_tile(TileCoord::new(4, 2), a).unwrap();

        let json = serde_json::to_string(&layer).unwrap();
        let restored: MultiTileGridLayer = serde_json::from_str(&json).unwrap();

        assert_eq!(restored.width(), 6);
        assert_eq!(restored.height(), 6);
        assert_eq!(restored.occupied_count(), 2);
        assert_eq!(
            restored.stack(TileCoord::new(1, 1)),
            layer.stack(TileCoord::new(1, 1))
        );
        assert_eq!(
            restored.stack(TileCoord::new(4, 2)),
            layer.stack(TileCoord::new(4, 2))
        );
    }
}
