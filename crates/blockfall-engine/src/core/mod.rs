pub use self::{coord::*, grid::*, kick::*, piece::*, playfield::*};

pub(crate) mod coord;
pub(crate) mod grid;
pub(crate) mod kick;
pub(crate) mod piece;
pub(crate) mod playfield;
