//! Spatial indexing for efficient neighbor queries.
//!
//! A uniform grid buckets keys by the cell their position falls into. The index
//! is rebuilt once per tick; [`SpatialIndex::relocate`] offers an incremental
//! alternative that yields the same query results.

use std::collections::HashMap;
use std::hash::Hash;

use geo::Point;

use super::locatable::Locatable;

/// Integer `(column, row)` coordinates of a grid cell.
pub type Cell = (i32, i32);

/// Uniform grid mapping cells to the keys located inside them.
#[derive(Debug, Clone)]
pub struct SpatialIndex<K = usize> {
    cell_size: f32,
    cells: HashMap<Cell, Vec<K>>,
    /// Last known cell of every key, used by incremental updates.
    locations: HashMap<K, Cell>,
}

impl<K: Copy + Eq + Hash> SpatialIndex<K> {
    /// Creates an empty index.
    ///
    /// # Panics
    ///
    /// Panics if `cell_size` is not positive.
    pub fn new(cell_size: f32) -> Self {
        assert!(
            cell_size > 0.0 && cell_size.is_finite(),
            "cell_size must be positive, got {cell_size}"
        );
        Self {
            cell_size,
            cells: HashMap::new(),
            locations: HashMap::new(),
        }
    }

    /// Edge length of a cell.
    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    /// Number of keys currently indexed.
    pub fn len(&self) -> usize {
        self.locations.len()
    }

    /// Returns `true` if nothing is indexed.
    pub fn is_empty(&self) -> bool {
        self.locations.is_empty()
    }

    /// Removes all entries.
    pub fn clear(&mut self) {
        self.cells.clear();
        self.locations.clear();
    }

    /// Cell containing `pos`.
    pub fn cell_of(&self, pos: Point<f32>) -> Cell {
        (
            (pos.x() / self.cell_size).floor() as i32,
            (pos.y() / self.cell_size).floor() as i32,
        )
    }

    /// Places `key` into the cell that `item`'s position maps to.
    ///
    /// Intended for full rebuilds after [`clear`](Self::clear); use
    /// [`relocate`](Self::relocate) for keys that may already be indexed.
    pub fn insert(&mut self, key: K, item: &impl Locatable) {
        let cell = self.cell_of(item.pos());
        self.cells.entry(cell).or_default().push(key);
        self.locations.insert(key, cell);
    }

    /// Moves `key` to the cell of `item`'s current position, inserting it if absent.
    ///
    /// Keys whose cell did not change are left untouched.
    pub fn relocate(&mut self, key: K, item: &impl Locatable) {
        let cell = self.cell_of(item.pos());
        match self.locations.get(&key).copied() {
            Some(previous) if previous == cell => {}
            Some(previous) => {
                self.detach(key, previous);
                self.cells.entry(cell).or_default().push(key);
                self.locations.insert(key, cell);
            }
            None => self.insert(key, item),
        }
    }

    /// Removes `key` from the index. Removing an absent key is a no-op.
    pub fn remove(&mut self, key: K) {
        if let Some(cell) = self.locations.remove(&key) {
            self.detach(key, cell);
        }
    }

    fn detach(&mut self, key: K, cell: Cell) {
        if let Some(bucket) = self.cells.get_mut(&cell) {
            bucket.retain(|k| *k != key);
            if bucket.is_empty() {
                self.cells.remove(&cell);
            }
        }
    }

    /// Query keys around a locatable item.
    ///
    /// See [`neighbors_at`](Self::neighbors_at). The result may include the
    /// item's own key; callers filter it out.
    pub fn neighbors(&self, item: &impl Locatable, radius: Option<f32>) -> Vec<K> {
        self.neighbors_at(item.pos(), radius)
    }

    /// Query keys in every cell within `ceil(radius / cell_size)` cells of `pos`.
    ///
    /// # Arguments
    ///
    /// * `pos` - Center position for the query
    /// * `radius` - Search radius, defaults to 1.5 cell sizes
    ///
    /// # Returns
    ///
    /// Keys in column-major cell order, insertion order within a cell.
    pub fn neighbors_at(&self, pos: Point<f32>, radius: Option<f32>) -> Vec<K> {
        let radius = radius.unwrap_or(self.cell_size * 1.5).max(0.0);
        let reach = (radius / self.cell_size).ceil() as i32;
        let (cx, cy) = self.cell_of(pos);

        let mut found = Vec::new();
        for dx in -reach..=reach {
            for dy in -reach..=reach {
                if let Some(bucket) = self.cells.get(&(cx + dx, cy + dy)) {
                    found.extend_from_slice(bucket);
                }
            }
        }
        found
    }
}
