use bevy::log::warn;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::error::CollectionError;
use super::persist::Persist;

/// Grid axis, used by [`Grid::extent`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
}

/// Fixed-size 2D grid stored as one row-major buffer.
///
/// The buffer doubles as the persisted record, so there is no second copy to
/// keep in sync. The only invariant is `cells.len() == width * height`, which
/// [`Grid::rehydrate`](Persist::rehydrate) restores whenever a record breaks it.
///
/// # Example
///
/// ```rust
/// use persisted_collections::collections::Grid;
///
/// let mut grid = Grid::<u8>::new(3, 2).unwrap();
/// grid.set(2, 1, 7).unwrap();
/// assert_eq!(grid.index_of(&7), Some((2, 1)));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Grid<T> {
    width: usize,
    height: usize,
    cells: Vec<T>,
}

/// Persisted form of a [`Grid`].
///
/// `cells` is optional so a record whose buffer was never written (or was
/// stripped) still deserializes and can be healed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridRecord<T> {
    pub width: usize,
    pub height: usize,
    #[serde(default)]
    pub cells: Option<Vec<T>>,
}

#[derive(Serialize)]
struct GridRecordRef<'a, T> {
    width: usize,
    height: usize,
    cells: Option<&'a [T]>,
}

impl<T> Default for Grid<T> {
    fn default() -> Self {
        Self {
            width: 0,
            height: 0,
            cells: Vec::new(),
        }
    }
}

impl<T> Grid<T> {
    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn extent(&self, axis: Axis) -> usize {
        match axis {
            Axis::X => self.width,
            Axis::Y => self.height,
        }
    }

    /// Total number of cells.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Row-major view of every cell.
    pub fn cells(&self) -> &[T] {
        &self.cells
    }

    fn offset(&self, x: usize, y: usize) -> Result<usize, CollectionError> {
        if x >= self.width || y >= self.height {
            return Err(CollectionError::CellOutOfRange {
                x,
                y,
                width: self.width,
                height: self.height,
            });
        }
        Ok(y * self.width + x)
    }

    pub fn get(&self, x: usize, y: usize) -> Result<&T, CollectionError> {
        let idx = self.offset(x, y)?;
        Ok(&self.cells[idx])
    }

    pub fn get_mut(&mut self, x: usize, y: usize) -> Result<&mut T, CollectionError> {
        let idx = self.offset(x, y)?;
        Ok(&mut self.cells[idx])
    }

    /// Store `value` at `(x, y)` and return what was there.
    pub fn set(&mut self, x: usize, y: usize, value: T) -> Result<T, CollectionError> {
        let idx = self.offset(x, y)?;
        Ok(std::mem::replace(&mut self.cells[idx], value))
    }

    /// Iterate `(x, y, cell)` in row-major order (y outer, x inner).
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, &T)> + '_ {
        let width = self.width.max(1);
        self.cells
            .iter()
            .enumerate()
            .map(move |(idx, cell)| (idx % width, idx / width, cell))
    }

    /// First cell in row-major order matching `predicate`.
    pub fn find(&self, mut predicate: impl FnMut(&T) -> bool) -> Option<&T> {
        self.cells.iter().find(|cell| predicate(cell))
    }

    pub fn exists(&self, predicate: impl FnMut(&T) -> bool) -> bool {
        self.cells.iter().any(predicate)
    }

    /// Coordinate of the first cell equal to `value`.
    pub fn index_of(&self, value: &T) -> Option<(usize, usize)>
    where
        T: PartialEq,
    {
        self.iter()
            .find(|(_, _, cell)| *cell == value)
            .map(|(x, y, _)| (x, y))
    }

    pub fn fill(&mut self, value: T)
    where
        T: Clone,
    {
        self.cells.fill(value);
    }
}

impl<T: Default> Grid<T> {
    /// Allocate a `width` x `height` grid of default cells.
    ///
    /// Zero dimensions are accepted and produce an empty grid. Dimensions whose
    /// buffer cannot be allocated are rejected.
    pub fn new(width: usize, height: usize) -> Result<Self, CollectionError> {
        let cells = width
            .checked_mul(height)
            .and_then(defaulted)
            .ok_or(CollectionError::InvalidDimension { width, height })?;
        Ok(Self { width, height, cells })
    }
}

/// `len` default cells, or `None` if the buffer cannot be allocated.
fn defaulted<T: Default>(len: usize) -> Option<Vec<T>> {
    let mut cells = Vec::new();
    cells.try_reserve_exact(len).ok()?;
    cells.extend(std::iter::repeat_with(T::default).take(len));
    Some(cells)
}

impl<T: Clone + Default> Persist for Grid<T> {
    type Record = GridRecord<T>;

    fn flatten(&self) -> GridRecord<T> {
        GridRecord {
            width: self.width,
            height: self.height,
            cells: Some(self.cells.clone()),
        }
    }

    fn rehydrate(&mut self, record: GridRecord<T>) {
        *self = Grid::healed(record);
    }
}

impl<T: Default> Grid<T> {
    fn healed(record: GridRecord<T>) -> Self {
        let GridRecord { width, height, cells } = record;

        let Some(expected) = width.checked_mul(height) else {
            warn!(
                "Grid: persisted dimensions {}x{} overflow, resetting to an empty grid",
                width, height
            );
            return Self::default();
        };

        match cells {
            Some(cells) if cells.len() == expected => return Self { width, height, cells },
            Some(cells) => warn!(
                "Grid: buffer holds {} cells but {}x{} needs {}, reallocating",
                cells.len(),
                width,
                height,
                expected
            ),
            None => warn!("Grid: persisted buffer missing, reallocating {}x{}", width, height),
        }

        match defaulted(expected) {
            Some(cells) => Self { width, height, cells },
            None => {
                warn!(
                    "Grid: cannot allocate {}x{} cells, resetting to an empty grid",
                    width, height
                );
                Self::default()
            }
        }
    }
}

impl<T: Serialize> Serialize for Grid<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        GridRecordRef {
            width: self.width,
            height: self.height,
            cells: Some(self.cells.as_slice()),
        }
        .serialize(serializer)
    }
}

impl<'de, T> Deserialize<'de> for Grid<T>
where
    T: Deserialize<'de> + Default,
{
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        GridRecord::<T>::deserialize(deserializer).map(Grid::healed)
    }
}
