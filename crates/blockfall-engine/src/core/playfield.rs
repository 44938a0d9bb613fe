use super::{grid::Grid, piece::BlockColor};

/// A single cell of the stack.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct FieldCell {
    pub solid: bool,
    pub color: BlockColor,
}

/// The stack (well) that locked pieces are merged into.
///
/// # Edge semantics
///
/// Coordinates outside the grid are still answerable by
/// [`is_block_solid`](Self::is_block_solid): the left wall, right wall and
/// floor are solid, while everything above row 0 is open sky. Pieces spawn
/// partly above the field and may rotate through that space.
///
/// ```text
///   x:  -1  0 .. W-1  W
/// y=-1   #  .  ..  .  #    <- open above the field
/// y=0    #  .  ..  .  #
///  ...
/// y=H-1  #  .  ..  .  #
/// y=H    #  #  ..  #  #    <- floor
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Playfield {
    cells: Grid<FieldCell>,
}

impl Default for Playfield {
    fn default() -> Self {
        Self::new(Self::STANDARD_WIDTH, Self::STANDARD_HEIGHT)
    }
}

impl Playfield {
    pub const STANDARD_WIDTH: i32 = 10;
    pub const STANDARD_HEIGHT: i32 = 20;

    #[must_use]
    pub fn new(width: i32, height: i32) -> Self {
        Self {
            cells: Grid::new(width, height, FieldCell::default()),
        }
    }

    #[must_use]
    pub fn width(&self) -> i32 {
        self.cells.width()
    }

    #[must_use]
    pub fn height(&self) -> i32 {
        self.cells.height()
    }

    /// Collision query with edge semantics (see the type docs).
    #[must_use]
    pub fn is_block_solid(&self, x: i32, y: i32) -> bool {
        if self.cells.contains(x, y) {
            return self.cells.get(x, y).solid;
        }
        x < 0 || x >= self.width() || y >= self.height()
    }

    /// Color of the cell at `(x, y)`, or [`BlockColor::Black`] outside the grid.
    #[must_use]
    pub fn color(&self, x: i32, y: i32) -> BlockColor {
        if self.cells.contains(x, y) {
            self.cells.get(x, y).color
        } else {
            BlockColor::Black
        }
    }

    /// Sets the solid flag of a cell. Writes outside the grid are ignored.
    pub fn set_block(&mut self, x: i32, y: i32, solid: bool) {
        if self.cells.contains(x, y) {
            let cell = *self.cells.get(x, y);
            self.cells.set(x, y, FieldCell { solid, ..cell });
        }
    }

    /// Sets the color of a cell. Writes outside the grid are ignored.
    pub fn set_color(&mut self, x: i32, y: i32, color: BlockColor) {
        if self.cells.contains(x, y) {
            let cell = *self.cells.get(x, y);
            self.cells.set(x, y, FieldCell { color, ..cell });
        }
    }

    /// Marks a cell solid with the given color.
    pub fn place_block(&mut self, x: i32, y: i32, color: BlockColor) {
        if self.cells.contains(x, y) {
            self.cells.set(x, y, FieldCell { solid: true, color });
        }
    }

    /// Scans from row `y` toward the floor for the first cell whose solidity
    /// equals `state`.
    ///
    /// Returns `y` itself if it already matches, or [`height`](Self::height)
    /// when nothing in the column matches.
    #[must_use]
    pub fn cast_down(&self, x: i32, y: i32, state: bool) -> i32 {
        if self.is_block_solid(x, y) == state {
            return y;
        }
        (y + 1..self.height())
            .find(|&row| self.is_block_solid(x, row) == state)
            .unwrap_or(self.height())
    }

    /// Mirror of [`cast_down`](Self::cast_down), scanning toward row 0.
    ///
    /// Returns 0 when nothing matches.
    #[must_use]
    pub fn cast_up(&self, x: i32, y: i32, state: bool) -> i32 {
        if self.is_block_solid(x, y) == state {
            return y;
        }
        (0..y)
            .rev()
            .find(|&row| self.is_block_solid(x, row) == state)
            .unwrap_or(0)
    }

    /// Whether every column of row `y` is solid.
    #[must_use]
    pub fn is_row_full(&self, y: i32) -> bool {
        (0..self.width()).all(|x| self.is_block_solid(x, y))
    }

    /// Yields the index of every full row, from row 0 toward the floor.
    ///
    /// Read-only: collect the rows, then pass each to
    /// [`clear_row`](Self::clear_row) in the yielded order.
    pub fn detect_clears(&self) -> impl Iterator<Item = i32> + '_ {
        (0..self.height()).filter(|&y| self.is_row_full(y))
    }

    /// Removes `row`, shifting every row above it down by one and leaving an
    /// empty row 0. Rows below `row` are untouched.
    ///
    /// Clearing several rows detected in one pass must go in ascending order:
    /// each call only moves content at or above its row, so indices further
    /// down stay valid.
    pub fn clear_row(&mut self, row: i32) {
        assert!(
            (0..self.height()).contains(&row),
            "cleared row {row} outside 0..{}",
            self.height()
        );
        for y in (1..=row).rev() {
            for x in 0..self.width() {
                let above = *self.cells.get(x, y - 1);
                self.cells.set(x, y, above);
            }
        }
        for x in 0..self.width() {
            self.cells.set(x, 0, FieldCell::default());
        }
    }

    /// Creates a standard-width field from ASCII art, for tests and fixtures.
    ///
    /// `#` is a solid cell, `.` an empty one. Rows are given top to bottom and
    /// are aligned to the floor, so art shorter than `height` describes the
    /// bottom of the field.
    ///
    /// # Panics
    ///
    /// Panics if a row is not exactly `width` cells wide or there are more
    /// rows than `height`.
    #[must_use]
    pub fn from_ascii(width: i32, height: i32, art: &str) -> Self {
        let mut field = Self::new(width, height);
        let lines: Vec<&str> = art.lines().filter(|line| !line.trim().is_empty()).collect();
        let row_count = i32::try_from(lines.len()).unwrap_or(i32::MAX);
        assert!(
            row_count <= height,
            "art has {row_count} rows, field is {height} tall"
        );

        let top = height - row_count;
        for (y, line) in (top..).zip(&lines) {
            let chars: Vec<char> = line.chars().filter(|c| *c == '#' || *c == '.').collect();
            assert_eq!(
                i32::try_from(chars.len()).ok(),
                Some(width),
                "Each row must have exactly {width} cells, got {} at row {y}",
                chars.len(),
            );
            for (x, &ch) in (0..).zip(&chars) {
                if ch == '#' {
                    field.place_block(x, y, BlockColor::Gray);
                }
            }
        }
        field
    }
}
