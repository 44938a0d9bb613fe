use std::iter::FusedIterator;

use super::coord::Coord;

/// Dense, fixed-size 2D container.
///
/// Only coordinates inside `[0, width) x [0, height)` are addressable. Reading
/// or writing outside that range is a programming error and panics; callers
/// that need edge semantics (walls, open sky) layer them on top.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid<T> {
    width: i32,
    height: i32,
    cells: Vec<T>,
}

impl<T: Clone> Grid<T> {
    /// Creates a grid with every cell set to `fill`.
    ///
    /// # Panics
    ///
    /// Panics if either dimension is not positive or the cell count overflows.
    #[must_use]
    pub fn new(width: i32, height: i32, fill: T) -> Self {
        assert!(
            width > 0 && height > 0,
            "grid dimensions must be positive, got {width}x{height}"
        );
        let len = width
            .checked_mul(height)
            .and_then(|area| usize::try_from(area).ok())
            .unwrap_or_else(|| panic!("grid {width}x{height} has too many cells"));
        Self {
            width,
            height,
            cells: vec![fill; len],
        }
    }
}

impl<T> Grid<T> {
    #[must_use]
    pub fn width(&self) -> i32 {
        self.width
    }

    #[must_use]
    pub fn height(&self) -> i32 {
        self.height
    }

    #[must_use]
    pub fn contains(&self, x: i32, y: i32) -> bool {
        (0..self.width).contains(&x) && (0..self.height).contains(&y)
    }

    #[inline]
    fn index(&self, x: i32, y: i32) -> usize {
        assert!(
            self.contains(x, y),
            "grid coordinate ({x}, {y}) outside {}x{}",
            self.width,
            self.height
        );
        #[expect(clippy::cast_sign_loss)]
        let index = (y * self.width + x) as usize;
        index
    }

    #[must_use]
    pub fn get(&self, x: i32, y: i32) -> &T {
        &self.cells[self.index(x, y)]
    }

    pub fn set(&mut self, x: i32, y: i32, value: T) {
        let index = self.index(x, y);
        self.cells[index] = value;
    }

    /// Enumerates every coordinate exactly once.
    ///
    /// Order is column-major: columns left to right, and within each column
    /// from the bottom row (`height - 1`) up to row 0. Shadow detection in
    /// [`PieceDescriptor`](super::piece::PieceDescriptor) depends on this order.
    #[must_use]
    pub fn coordinates(&self) -> Coordinates {
        Coordinates::new(self.width, self.height)
    }
}

/// Iterator returned by [`Grid::coordinates`].
///
/// It only holds the grid dimensions, so the grid can be mutated while
/// iterating. Clone it to restart from the current position.
#[derive(Debug, Clone)]
pub struct Coordinates {
    width: i32,
    height: i32,
    x: i32,
    y: i32,
}

impl Coordinates {
    fn new(width: i32, height: i32) -> Self {
        Self {
            width,
            height,
            x: 0,
            y: height - 1,
        }
    }

    fn remaining(&self) -> usize {
        if self.x >= self.width {
            return 0;
        }
        let rest_of_column = self.y + 1;
        let later_columns = (self.width - self.x - 1) * self.height;
        usize::try_from(rest_of_column + later_columns).unwrap_or(0)
    }
}

impl Iterator for Coordinates {
    type Item = Coord;

    fn next(&mut self) -> Option<Coord> {
        if self.x >= self.width {
            return None;
        }
        let coord = Coord::new(self.x, self.y);
        if self.y == 0 {
            self.x += 1;
            self.y = self.height - 1;
        } else {
            self.y -= 1;
        }
        Some(coord)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.remaining();
        (n, Some(n))
    }
}

impl ExactSizeIterator for Coordinates {}

impl FusedIterator for Coordinates {}
