//! Scanline flood fill over a grid layer
//!
//! The fill replaces a maximal 4-connected region of cells whose content
//! matches the start cell with the painter's output, mutating the layer and
//! recording every write into one [`TileReplace2DCommand`] so the whole
//! fill undoes as a unit.

use std::collections::{HashSet, VecDeque};

use log::debug;

use tileforge_core::{stack_content_eq, GridError, MultiTileGridLayer, TileCoord, TileStack};

use crate::TileReplace2DCommand;

/// Per-cell write strategy for [`FloodFill`].
///
/// Every write, flat or brushed, routes through `paint` and therefore
/// through the command's recording path. `already_painted` is the scan stop
/// condition that keeps the fill from re-entering cells it has produced.
pub trait TilePainter {
    /// Write this painter's output to `coord`, recording into `command`
    fn paint(
        &mut self,
        layer: &mut MultiTileGridLayer,
        command: &mut TileReplace2DCommand,
        coord: TileCoord,
    ) -> Result<(), GridError>;

    /// Whether `cell` already holds this painter's output for `coord`
    fn already_painted(&self, coord: TileCoord, cell: Option<&TileStack>) -> bool;
}

/// Flat painter: assigns one stack value to every filled cell.
///
/// The source stack is cloned per cell, so a caller can hand in a shared
/// stack value without the filled cells aliasing each other.
pub struct StackPainter {
    stack: Option<TileStack>,
}

impl StackPainter {
    /// Paint with a whole-cell stack; `None` erases
    pub fn new(stack: Option<TileStack>) -> Self {
        Self { stack }
    }
}

impl TilePainter for StackPainter {
    fn paint(
        &mut self,
        layer: &mut MultiTileGridLayer,
        command: &mut TileReplace2DCommand,
        coord: TileCoord,
    ) -> Result<(), GridError> {
        command.queue_replacement(layer, coord, self.stack.clone())
    }

    fn already_painted(&self, _coord: TileCoord, cell: Option<&TileStack>) -> bool {
        stack_content_eq(cell, self.stack.as_ref())
    }
}

/// Brush painter: delegates each cell write to an arbitrary function.
///
/// The brush must route its writes through the command's `queue_*` methods;
/// everything it does to a cell then rides the same undo record as a flat
/// fill. Painted coordinates are tracked explicitly because a brush output
/// has no single value to compare cells against.
pub struct BrushPainter<F> {
    brush: F,
    painted: HashSet<TileCoord>,
}

impl<F> BrushPainter<F>
where
    F: FnMut(
        &mut MultiTileGridLayer,
        &mut TileReplace2DCommand,
        TileCoord,
    ) -> Result<(), GridError>,
{
    pub fn new(brush: F) -> Self {
        Self {
            brush,
            painted: HashSet::new(),
        }
    }
}

impl<F> TilePainter for BrushPainter<F>
where
    F: FnMut(
        &mut MultiTileGridLayer,
        &mut TileReplace2DCommand,
        TileCoord,
    ) -> Result<(), GridError>,
{
    fn paint(
        &mut self,
        layer: &mut MultiTileGridLayer,
        command: &mut TileReplace2DCommand,
        coord: TileCoord,
    ) -> Result<(), GridError> {
        (self.brush)(layer, command, coord)?;
        self.painted.insert(coord);
        Ok(())
    }

    fn already_painted(&self, coord: TileCoord, _cell: Option<&TileStack>) -> bool {
        self.painted.contains(&coord)
    }
}

/// A contiguous horizontal span of freshly filled cells in one row, queued
/// for vertical expansion
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FillRange {
    pub start_x: i32,
    pub end_x: i32,
    pub y: i32,
}

/// FIFO work queue of [`FillRange`]s driving the fill.
#[derive(Debug, Default)]
pub struct FillRangeQueue {
    ranges: VecDeque<FillRange>,
}

impl FillRangeQueue {
    /// Pre-size for a fill over a `width` x `height` extent
    pub fn for_extent(width: u32, height: u32) -> Self {
        // Heuristic start capacity; the deque grows as needed
        Self::with_capacity(((width + height) / 2 * 5) as usize)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            ranges: VecDeque::with_capacity(capacity),
        }
    }

    pub fn enqueue(&mut self, range: FillRange) {
        self.ranges.push_back(range);
    }

    pub fn dequeue(&mut self) -> Option<FillRange> {
        self.ranges.pop_front()
    }

    pub fn len(&self) -> usize {
        self.ranges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }
}

/// Fill behavior switches
#[derive(Debug, Clone, Copy, Default)]
pub struct FillOptions {
    /// When the start cell already holds the painter's output the fill
    /// writes nothing; this decides whether the caller still gets an empty
    /// command to push onto the history (`false`: it gets `None`).
    pub record_noop_fills: bool,
}

/// Scanline stack-based flood fill engine.
///
/// Match decisions compare against a snapshot of the start cell frozen
/// before the first write, never against the partially filled grid. The
/// fill runs to completion before returning, so the history only ever sees
/// whole fills. Iterative by construction; region size is bounded by the
/// extent, not by a call stack.
pub struct FloodFill<'a, P: TilePainter> {
    layer: &'a mut MultiTileGridLayer,
    painter: P,
    options: FillOptions,
}

impl<'a, P: TilePainter> FloodFill<'a, P> {
    pub fn new(layer: &'a mut MultiTileGridLayer, painter: P) -> Self {
        Self {
            layer,
            painter,
            options: FillOptions::default(),
        }
    }

    pub fn with_options(mut self, options: FillOptions) -> Self {
        self.options = options;
        self
    }

    /// Fill the region 4-connected to `start`, returning the command that
    /// reverses it.
    ///
    /// Returns `Ok(None)` for a fill that had nothing to do, unless
    /// [`FillOptions::record_noop_fills`] asks for the empty command.
    ///
    /// # Errors
    ///
    /// `GridError::OutOfBounds` when `start` lies outside the layer
    /// extent. Interior scans bounds-check before touching any cell, so an
    /// in-bounds start never produces an out-of-bounds write.
    pub fn fill(mut self, start: TileCoord) -> Result<Option<TileReplace2DCommand>, GridError> {
        if !self.layer.contains(start) {
            return Err(GridError::OutOfBounds {
                coord: start,
                width: self.layer.width(),
                height: self.layer.height(),
            });
        }

        // Frozen match basis for the entire fill
        let snapshot = self.layer.stack(start).cloned();

        if self.painter.already_painted(start, snapshot.as_ref()) {
            debug!("flood fill at {}: target already painted", start);
            return Ok(self
                .options
                .record_noop_fills
                .then(|| TileReplace2DCommand::new("Flood Fill")));
        }

        let mut command = TileReplace2DCommand::new("Flood Fill");
        let mut queue = FillRangeQueue::for_extent(self.layer.width(), self.layer.height());

        self.linear_fill(&mut command, &mut queue, snapshot.as_ref(), start.x, start.y)?;

        while let Some(range) = queue.dequeue() {
            for y in [range.y - 1, range.y + 1] {
                for x in range.start_x..=range.end_x {
                    let coord = TileCoord::new(x, y);
                    if self.matches(snapshot.as_ref(), coord) {
                        self.linear_fill(&mut command, &mut queue, snapshot.as_ref(), x, y)?;
                    }
                }
            }
        }

        debug!("flood fill at {}: {} cells", start, command.len());
        Ok(Some(command))
    }

    /// Whether the cell at `coord` is in-bounds, still matches the
    /// snapshot, and has not already been painted
    fn matches(&self, snapshot: Option<&TileStack>, coord: TileCoord) -> bool {
        if !self.layer.contains(coord) {
            return false;
        }
        let cell = self.layer.stack(coord);
        !self.painter.already_painted(coord, cell) && stack_content_eq(cell, snapshot)
    }

    /// Paint leftward from `(x, y)` then rightward from `(x + 1, y)` while
    /// cells match, producing one contiguous range. The caller guarantees
    /// `(x, y)` itself matches.
    fn linear_fill(
        &mut self,
        command: &mut TileReplace2DCommand,
        queue: &mut FillRangeQueue,
        snapshot: Option<&TileStack>,
        x: i32,
        y: i32,
    ) -> Result<(), GridError> {
        let mut left = x;
        loop {
            self.painter
                .paint(self.layer, command, TileCoord::new(left, y))?;
            if !self.matches(snapshot, TileCoord::new(left - 1, y)) {
                break;
            }
            left -= 1;
        }

        let mut right = x;
        while self.matches(snapshot, TileCoord::new(right + 1, y)) {
            right += 1;
            self.painter
                .paint(self.layer, command, TileCoord::new(right, y))?;
        }

        queue.enqueue(FillRange {
            start_x: left,
            end_x: right,
            y,
        });
        Ok(())
    }
}
