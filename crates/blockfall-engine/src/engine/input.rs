use rand::{Rng, distr::StandardUniform, prelude::Distribution};
use serde::{Deserialize, Serialize};

/// A discrete player action fed to [`Game::handle_input`](super::Game::handle_input).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub enum InputEvent {
    MoveLeft,
    MoveRight,
    /// Make the next update tick immediately.
    SoftDrop,
    /// Move the piece onto its shadow and lock out further input until it locks.
    HardDrop,
    RotateCw,
    RotateCcw,
    Hold,
}

impl InputEvent {
    pub const LEN: usize = 7;

    pub const ALL: [Self; Self::LEN] = [
        Self::MoveLeft,
        Self::MoveRight,
        Self::SoftDrop,
        Self::HardDrop,
        Self::RotateCw,
        Self::RotateCcw,
        Self::Hold,
    ];
}

/// Allows generating random input events using the standard random distribution.
impl Distribution<InputEvent> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> InputEvent {
        InputEvent::ALL[rng.random_range(0..InputEvent::LEN)]
    }
}
