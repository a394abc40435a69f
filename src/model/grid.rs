use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::entity::{Entity, EntityId, EntityKind};

pub const GRID_WIDTH: i32 = 50;
pub const GRID_HEIGHT: i32 = 50;

/// Scan order for the eight tiles surrounding a coordinate. Crane arms take
/// the first match in this order.
pub const NEIGHBOR_OFFSETS: [(i32, i32); 8] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (-1, 0),
    (1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TileCoord {
    pub x: i32,
    pub y: i32,
}

impl TileCoord {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn offset(self, dx: i32, dy: i32) -> Self {
        Self::new(self.x.saturating_add(dx), self.y.saturating_add(dy))
    }
}

impl fmt::Display for TileCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum GridError {
    #[error("tile {0} is outside the grid")]
    OutOfBounds(TileCoord),
    #[error("tile {0} is already occupied")]
    Occupied(TileCoord),
}

/// Fixed-size tile grid holding at most one entity per coordinate.
///
/// Iteration is row-major (`y`, then `x`), which is the order every tick phase
/// uses when a rule says "first" or "in iteration order".
#[derive(Debug, Clone, PartialEq)]
pub struct FactoryGrid {
    pub width: i32,
    pub height: i32,
    cells: Vec<Option<Entity>>,
}

impl Default for FactoryGrid {
    fn default() -> Self {
        Self::new(GRID_WIDTH, GRID_HEIGHT)
    }
}

impl FactoryGrid {
    pub fn new(width: i32, height: i32) -> Self {
        let width = width.max(1);
        let height = height.max(1);
        Self {
            width,
            height,
            cells: vec![None; (width * height) as usize],
        }
    }

    pub fn in_bounds(&self, coord: TileCoord) -> bool {
        coord.x >= 0 && coord.y >= 0 && coord.x < self.width && coord.y < self.height
    }

    pub fn get(&self, coord: TileCoord) -> Option<&Entity> {
        let index = self.index(coord)?;
        self.cells[index].as_ref()
    }

    pub fn get_mut(&mut self, coord: TileCoord) -> Option<&mut Entity> {
        let index = self.index(coord)?;
        self.cells[index].as_mut()
    }

    pub fn is_occupied(&self, coord: TileCoord) -> bool {
        self.get(coord).is_some()
    }

    /// Places `entity` at its own coordinate. Never overwrites.
    pub fn set(&mut self, entity: Entity) -> Result<(), GridError> {
        let coord = entity.coord;
        let index = self.index(coord).ok_or(GridError::OutOfBounds(coord))?;
        if self.cells[index].is_some() {
            return Err(GridError::Occupied(coord));
        }
        self.cells[index] = Some(entity);
        Ok(())
    }

    pub fn remove(&mut self, coord: TileCoord) -> Option<Entity> {
        let index = self.index(coord)?;
        self.cells[index].take()
    }

    pub fn clear(&mut self) {
        self.cells.iter_mut().for_each(|cell| *cell = None);
    }

    pub fn len(&self) -> usize {
        self.cells.iter().filter(|cell| cell.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.iter().all(Option::is_none)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Entity> {
        self.cells.iter().filter_map(Option::as_ref)
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Entity> {
        self.cells.iter_mut().filter_map(Option::as_mut)
    }

    /// Coordinates of every entity of `kind`, in iteration order. Tick phases
    /// snapshot this list before mutating so they can borrow tiles one at a time.
    pub fn coords_of(&self, kind: EntityKind) -> Vec<TileCoord> {
        self.iter()
            .filter(|entity| entity.kind() == kind)
            .map(|entity| entity.coord)
            .collect()
    }

    /// Occupied tiles among the eight surrounding `coord`. Off-grid positions
    /// are skipped; there is no wraparound.
    pub fn neighbors8(&self, coord: TileCoord) -> impl Iterator<Item = &Entity> + '_ {
        NEIGHBOR_OFFSETS
            .iter()
            .filter_map(move |&(dx, dy)| self.get(coord.offset(dx, dy)))
    }

    pub fn find(&self, id: EntityId) -> Option<&Entity> {
        self.iter().find(|entity| entity.id == id)
    }

    pub fn find_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.iter_mut().find(|entity| entity.id == id)
    }

    fn index(&self, coord: TileCoord) -> Option<usize> {
        if !self.in_bounds(coord) {
            return None;
        }
        Some((coord.y * self.width + coord.x) as usize)
    }
}
