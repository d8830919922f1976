//! Tile identity and per-cell tile stacks

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Opaque identity of a tile definition.
///
/// Tile definitions (texture, properties, collision) live outside this
/// crate; the grid only ever compares ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TileId(Uuid);

impl TileId {
    /// Mint a fresh tile id
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for TileId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for TileId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An ordered stack of tiles occupying one grid cell, bottom-to-top.
///
/// Equality is content-based: two stacks are equal when they hold the same
/// tile ids in the same order. The same stack value can be shared across
/// many cells by a brush, so callers must never rely on pointer identity.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileStack {
    tiles: Vec<TileId>,
}

impl TileStack {
    /// Create an empty stack
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a stack from bottom-to-top tile ids
    pub fn from_tiles(tiles: impl IntoIterator<Item = TileId>) -> Self {
        Self {
            tiles: tiles.into_iter().collect(),
        }
    }

    /// Push a tile on top of the stack
    pub fn push(&mut self, id: TileId) {
        self.tiles.push(id);
    }

    /// Remove every occurrence of `id`, returning how many were removed
    pub fn remove(&mut self, id: TileId) -> usize {
        let before = self.tiles.len();
        self.tiles.retain(|t| *t != id);
        before - self.tiles.len()
    }

    /// The top-most tile, rendered last
    pub fn top(&self) -> Option<TileId> {
        self.tiles.last().copied()
    }

    /// Whether the stack contains `id`
    pub fn contains(&self, id: TileId) -> bool {
        self.tiles.contains(&id)
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    /// Iterate tiles bottom-to-top
    pub fn iter(&self) -> impl Iterator<Item = TileId> + '_ {
        self.tiles.iter().copied()
    }
}

impl FromIterator<TileId> for TileStack {
    fn from_iter<I: IntoIterator<Item = TileId>>(iter: I) -> Self {
        Self::from_tiles(iter)
    }
}

/// Content equality over optional stacks, treating `None` and an empty
/// stack as the same "no content" value.
///
/// A vacant grid cell reads as `None` while an erased-then-touched cell can
/// momentarily hold an empty stack; flood fill match decisions must not
/// distinguish the two.
pub fn stack_content_eq(a: Option<&TileStack>, b: Option<&TileStack>) -> bool {
    match (a, b) {
        (Some(a), Some(b)) => a == b,
        (Some(s), None) | (None, Some(s)) => s.is_empty(),
        (None, None) => true,
    }
}
