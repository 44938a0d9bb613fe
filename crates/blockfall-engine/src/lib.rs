pub use self::{core::*, engine::*};

pub mod core;
pub mod engine;

/// Malformed piece or kick-table data supplied at construction time.
///
/// Built-in data never produces these; they exist so that custom catalogs
/// fail at startup instead of misbehaving mid-game.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum PieceDefinitionError {
    #[display("piece {kind:?} has {count} rotation states, expected 1, 2 or 4")]
    InvalidRotationCount { kind: PieceKind, count: usize },
    #[display("piece {kind:?} rotation {rotation} has no solid cells")]
    EmptyShape { kind: PieceKind, rotation: usize },
    #[display("piece {kind:?} rotation {rotation} does not match the {width}x{height} bounding box")]
    MismatchedDimensions {
        kind: PieceKind,
        rotation: usize,
        width: usize,
        height: usize,
    },
    #[display("piece {kind:?} rotation {rotation} contains unknown cell symbol {symbol:?}")]
    InvalidCell {
        kind: PieceKind,
        rotation: usize,
        symbol: char,
    },
    #[display("kick transition {from} -> {to} is outside the rotation range")]
    InvalidKickTransition { from: usize, to: usize },
    #[display("kick transition {from} -> {to} is defined more than once")]
    DuplicateKickTransition { from: usize, to: usize },
    #[display("kick transition {from} -> {to} has {count} offsets, expected 1..={max}")]
    KickCount {
        from: usize,
        to: usize,
        count: usize,
        max: usize,
    },
    #[display("catalog slot {slot} holds piece {kind:?}")]
    MisplacedPiece { slot: usize, kind: PieceKind },
}

/// Rejected engine configuration.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum ConfigError {
    #[display("playfield {width}x{height} is too small, need at least 4x4")]
    FieldTooSmall { width: i32, height: i32 },
    #[display("playfield {width}x{height} is too large, at most {max}x{max} is allowed")]
    FieldTooLarge { width: i32, height: i32, max: i32 },
    #[display("drop duration range is empty: min {min}ms > max {max}ms")]
    DropDurationRange { min: u32, max: u32 },
    #[display("durations must be at least 1ms")]
    ZeroDuration,
    #[display("max level must be at least 1")]
    ZeroMaxLevel,
}
