use arrayvec::ArrayVec;
use serde::{Deserialize, Serialize};

use crate::PieceDefinitionError;

use super::{
    coord::Coord,
    grid::Grid,
    kick::{I_KICKS, JLSTZ_KICKS, KickTable, O_KICKS},
};

/// Enum representing the type of piece.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[repr(u8)]
pub enum PieceKind {
    /// I-piece.
    I = 0,
    /// O-piece.
    O = 1,
    /// S-piece.
    S = 2,
    /// Z-piece.
    Z = 3,
    /// J-piece.
    J = 4,
    /// L-piece.
    L = 5,
    /// T-piece.
    T = 6,
}

impl PieceKind {
    /// Number of piece types (7).
    pub const LEN: usize = 7;

    /// Every piece kind, in catalog slot order.
    pub const ALL: [Self; Self::LEN] = [
        PieceKind::I,
        PieceKind::O,
        PieceKind::S,
        PieceKind::Z,
        PieceKind::J,
        PieceKind::L,
        PieceKind::T,
    ];

    /// Catalog slot of this kind.
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Returns the single character representation of this piece kind.
    ///
    /// # Examples
    ///
    /// ```
    /// use blockfall_engine::PieceKind;
    ///
    /// assert_eq!(PieceKind::I.as_char(), 'I');
    /// assert_eq!(PieceKind::T.as_char(), 'T');
    /// ```
    #[must_use]
    pub const fn as_char(self) -> char {
        match self {
            PieceKind::I => 'I',
            PieceKind::O => 'O',
            PieceKind::S => 'S',
            PieceKind::Z => 'Z',
            PieceKind::J => 'J',
            PieceKind::L => 'L',
            PieceKind::T => 'T',
        }
    }

    /// Parses a piece kind from a single character.
    ///
    /// # Examples
    ///
    /// ```
    /// use blockfall_engine::PieceKind;
    ///
    /// assert_eq!(PieceKind::from_char('I'), Some(PieceKind::I));
    /// assert_eq!(PieceKind::from_char('X'), None);
    /// ```
    #[must_use]
    pub const fn from_char(c: char) -> Option<Self> {
        match c {
            'I' => Some(PieceKind::I),
            'O' => Some(PieceKind::O),
            'S' => Some(PieceKind::S),
            'Z' => Some(PieceKind::Z),
            'J' => Some(PieceKind::J),
            'L' => Some(PieceKind::L),
            'T' => Some(PieceKind::T),
            _ => None,
        }
    }
}

/// Color tag of a block, for the renderer to map onto its own palette.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub enum BlockColor {
    /// Empty cell.
    #[default]
    Black,
    Cyan,
    Magenta,
    Orange,
    Blue,
    Green,
    Red,
    Yellow,
    /// Blocks not placed by a piece (test fixtures, garbage rows).
    Gray,
}

/// Per-cell state of a rotation grid: solid, and optionally shadow-casting.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
struct CellState(u8);

impl CellState {
    const EMPTY: Self = Self(0);
    const SOLID: Self = Self(1 << 0);
    const SHADOW: Self = Self(1 << 1);

    fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0 && other.0 != 0
    }

    fn with(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }
}

/// Immutable description of one piece shape.
///
/// Holds one grid per rotation state (1, 2 or 4 of them), each marking the
/// solid cells and, among those, the shadow casters: the lowest solid cell of
/// every column in that orientation. Shadow casters are the only cells that
/// need to be ray-cast when measuring how far the piece can fall.
#[derive(Debug, Clone)]
pub struct PieceDescriptor {
    kind: PieceKind,
    color: BlockColor,
    width: i32,
    height: i32,
    rotations: ArrayVec<Grid<CellState>, { KickTable::STATES }>,
    kicks: KickTable,
}

impl PieceDescriptor {
    /// Builds a descriptor from literal rotation maps.
    ///
    /// Each rotation is a list of rows, top row first; `'X'` marks a solid
    /// cell and `' '` or `'.'` an empty one. All rotations must share the
    /// same bounding box.
    pub fn new(
        kind: PieceKind,
        color: BlockColor,
        kicks: KickTable,
        rotations: &[&[&str]],
    ) -> Result<Self, PieceDefinitionError> {
        if !matches!(rotations.len(), 1 | 2 | 4) {
            return Err(PieceDefinitionError::InvalidRotationCount {
                kind,
                count: rotations.len(),
            });
        }

        let height = rotations[0].len();
        let width = rotations[0].first().map_or(0, |row| row.chars().count());
        let dimension_error = |rotation| PieceDefinitionError::MismatchedDimensions {
            kind,
            rotation,
            width,
            height,
        };
        let (Ok(w), Ok(h)) = (i32::try_from(width), i32::try_from(height)) else {
            return Err(dimension_error(0));
        };
        if w == 0 || h == 0 {
            return Err(dimension_error(0));
        }

        let mut grids = ArrayVec::new();
        for (rotation, rows) in rotations.iter().enumerate() {
            if rows.len() != height || rows.iter().any(|row| row.chars().count() != width) {
                return Err(dimension_error(rotation));
            }

            let mut grid = Grid::new(w, h, CellState::EMPTY);
            for (y, row) in (0..).zip(rows.iter()) {
                for (x, symbol) in (0..).zip(row.chars()) {
                    match symbol {
                        'X' => grid.set(x, y, CellState::SOLID),
                        ' ' | '.' => {}
                        _ => {
                            return Err(PieceDefinitionError::InvalidCell {
                                kind,
                                rotation,
                                symbol,
                            });
                        }
                    }
                }
            }
            if !grid.coordinates().any(|c| grid.get(c.x, c.y).contains(CellState::SOLID)) {
                return Err(PieceDefinitionError::EmptyShape { kind, rotation });
            }

            // A solid cell casts a shadow when nothing solid sits directly below it.
            for c in grid.coordinates() {
                let state = *grid.get(c.x, c.y);
                if !state.contains(CellState::SOLID) {
                    continue;
                }
                let below_open =
                    !grid.contains(c.x, c.y + 1) || *grid.get(c.x, c.y + 1) == CellState::EMPTY;
                if below_open {
                    grid.set(c.x, c.y, state.with(CellState::SHADOW));
                }
            }
            grids.push(grid);
        }

        Ok(Self {
            kind,
            color,
            width: w,
            height: h,
            rotations: grids,
            kicks,
        })
    }

    #[must_use]
    pub fn kind(&self) -> PieceKind {
        self.kind
    }

    #[must_use]
    pub fn color(&self) -> BlockColor {
        self.color
    }

    /// Width of the bounding box shared by every rotation.
    #[must_use]
    pub fn width(&self) -> i32 {
        self.width
    }

    /// Height of the bounding box shared by every rotation.
    #[must_use]
    pub fn height(&self) -> i32 {
        self.height
    }

    #[must_use]
    pub fn rotation_count(&self) -> usize {
        self.rotations.len()
    }

    #[must_use]
    pub fn kicks(&self) -> &KickTable {
        &self.kicks
    }

    fn cell(&self, x: i32, y: i32, rotation: usize) -> CellState {
        let grid = &self.rotations[rotation % self.rotations.len()];
        if grid.contains(x, y) {
            *grid.get(x, y)
        } else {
            CellState::EMPTY
        }
    }

    /// Whether the cell at `(x, y)` of the bounding box is solid.
    ///
    /// Coordinates outside the bounding box are legal and report `false`.
    /// `rotation` is reduced modulo [`Self::rotation_count`].
    #[must_use]
    pub fn is_solid(&self, x: i32, y: i32, rotation: usize) -> bool {
        self.cell(x, y, rotation).contains(CellState::SOLID)
    }

    /// Whether the cell at `(x, y)` is the lowest solid cell of its column.
    #[must_use]
    pub fn is_shadow_block(&self, x: i32, y: i32, rotation: usize) -> bool {
        self.cell(x, y, rotation).contains(CellState::SHADOW)
    }

    /// Solid cells of a rotation, relative to the bounding box.
    ///
    /// Cells come out in [`Grid::coordinates`] order.
    pub fn solid_cells(&self, rotation: usize) -> impl Iterator<Item = Coord> + '_ {
        let grid = &self.rotations[rotation % self.rotations.len()];
        grid.coordinates()
            .filter(move |c| grid.get(c.x, c.y).contains(CellState::SOLID))
    }
}

/// Read-only registry of the seven piece descriptors, indexed by [`PieceKind`].
///
/// Built once and shared by reference; nothing mutates it after construction.
#[derive(Debug, Clone)]
pub struct PieceCatalog {
    pieces: [PieceDescriptor; PieceKind::LEN],
}

impl Default for PieceCatalog {
    fn default() -> Self {
        Self::standard()
    }
}

impl PieceCatalog {
    /// Builds a catalog from custom descriptors.
    ///
    /// `pieces[i]` must describe `PieceKind::ALL[i]`.
    pub fn new(pieces: [PieceDescriptor; PieceKind::LEN]) -> Result<Self, PieceDefinitionError> {
        for (slot, piece) in pieces.iter().enumerate() {
            if piece.kind().index() != slot {
                return Err(PieceDefinitionError::MisplacedPiece {
                    slot,
                    kind: piece.kind(),
                });
            }
        }
        Ok(Self { pieces })
    }

    /// The standard seven tetrominoes.
    ///
    /// # Panics
    ///
    /// Panics if the built-in piece data is malformed, which is a defect in
    /// this crate rather than a runtime condition.
    #[must_use]
    pub fn standard() -> Self {
        match Self::try_standard() {
            Ok(catalog) => catalog,
            Err(e) => panic!("built-in piece data is malformed: {e}"),
        }
    }

    fn try_standard() -> Result<Self, PieceDefinitionError> {
        let jlstz = KickTable::from_transitions(&JLSTZ_KICKS)?;
        let i_kicks = KickTable::from_transitions(&I_KICKS)?;
        let o_kicks = KickTable::from_transitions(&O_KICKS)?;

        let table_for = |kind| match kind {
            PieceKind::I => i_kicks.clone(),
            PieceKind::O => o_kicks.clone(),
            _ => jlstz.clone(),
        };
        let [i, o, s, z, j, l, t] = PieceKind::ALL.map(|kind| {
            let (color, shapes) = standard_shape(kind);
            PieceDescriptor::new(kind, color, table_for(kind), shapes)
        });
        Self::new([i?, o?, s?, z?, j?, l?, t?])
    }

    #[must_use]
    pub fn get(&self, kind: PieceKind) -> &PieceDescriptor {
        &self.pieces[kind.index()]
    }

    pub fn iter(&self) -> impl Iterator<Item = &PieceDescriptor> {
        self.pieces.iter()
    }
}

type ShapeLiteral = &'static [&'static [&'static str]];

fn standard_shape(kind: PieceKind) -> (BlockColor, ShapeLiteral) {
    match kind {
        PieceKind::I => (BlockColor::Cyan, I_SHAPE),
        PieceKind::O => (BlockColor::Yellow, O_SHAPE),
        PieceKind::S => (BlockColor::Green, S_SHAPE),
        PieceKind::Z => (BlockColor::Red, Z_SHAPE),
        PieceKind::J => (BlockColor::Blue, J_SHAPE),
        PieceKind::L => (BlockColor::Orange, L_SHAPE),
        PieceKind::T => (BlockColor::Magenta, T_SHAPE),
    }
}

#[rustfmt::skip]
const I_SHAPE: ShapeLiteral = &[
    &["    ", "XXXX", "    ", "    "],
    &["  X ", "  X ", "  X ", "  X "],
    &["    ", "    ", "XXXX", "    "],
    &[" X  ", " X  ", " X  ", " X  "],
];

#[rustfmt::skip]
const O_SHAPE: ShapeLiteral = &[
    &["XX", "XX"],
];

#[rustfmt::skip]
const S_SHAPE: ShapeLiteral = &[
    &[" XX", "XX ", "   "],
    &[" X ", " XX", "  X"],
    &["   ", " XX", "XX "],
    &["X  ", "XX ", " X "],
];

#[rustfmt::skip]
const Z_SHAPE: ShapeLiteral = &[
    &["XX ", " XX", "   "],
    &["  X", " XX", " X "],
    &["   ", "XX ", " XX"],
    &[" X ", "XX ", "X  "],
];

#[rustfmt::skip]
const J_SHAPE: ShapeLiteral = &[
    &["X  ", "XXX", "   "],
    &[" XX", " X ", " X "],
    &["   ", "XXX", "  X"],
    &[" X ", " X ", "XX "],
];

#[rustfmt::skip]
const L_SHAPE: ShapeLiteral = &[
    &["  X", "XXX", "   "],
    &[" X ", " X ", " XX"],
    &["   ", "XXX", "X  "],
    &["XX ", " X ", " X "],
];

#[rustfmt::skip]
const T_SHAPE: ShapeLiteral = &[
    &[" X ", "XXX", "   "],
    &[" X ", " XX", " X "],
    &["   ", "XXX", " X "],
    &[" X ", "XX ", " X "],
];
