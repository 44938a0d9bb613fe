use std::{sync::Arc, time::Duration};

use serde::Serialize;

use crate::{
    ConfigError,
    core::{BlockColor, Coord, PieceCatalog, PieceDescriptor, PieceKind, Playfield},
};

use super::{GameConfig, GameStats, InputEvent, PieceQueue, PieceSeed};

/// Final result of a game, reported once when it ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GameOver {
    pub score: u64,
    pub level: u32,
    pub lines: usize,
    pub pieces: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, derive_more::IsVariant)]
pub enum SessionState {
    Playing,
    /// Terminal: updates and inputs are ignored from here on.
    GameOver(GameOver),
}

/// The falling piece: which kind, which rotation, and where its bounding box
/// sits on the field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActivePiece {
    kind: PieceKind,
    rotation: usize,
    position: Coord,
}

impl ActivePiece {
    #[must_use]
    pub fn kind(&self) -> PieceKind {
        self.kind
    }

    /// Rotation state, always in `0..4`.
    #[must_use]
    pub fn rotation(&self) -> usize {
        self.rotation
    }

    /// Field coordinate of the bounding box's top-left corner.
    #[must_use]
    pub fn position(&self) -> Coord {
        self.position
    }

    /// Field coordinates of the piece's solid cells.
    ///
    /// `descriptor` must describe this piece's kind.
    pub fn cells(self, descriptor: &PieceDescriptor) -> impl Iterator<Item = Coord> + '_ {
        debug_assert_eq!(descriptor.kind(), self.kind);
        descriptor
            .solid_cells(self.rotation)
            .map(move |cell| self.position + cell)
    }

    fn moved(self, dx: i32, dy: i32) -> Self {
        Self {
            position: self.position.offset(dx, dy),
            ..self
        }
    }
}

/// Gravity timer. `time_ms` counts down; each time it drops below zero a tick
/// fires and `duration_ms` is added back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct DropTimer {
    duration_ms: i64,
    time_ms: i64,
    in_grace: bool,
}

/// A single-player falling-block game.
///
/// The game is advanced cooperatively by [`update`](Self::update) (elapsed
/// time) and [`handle_input`](Self::handle_input) (player actions). Nothing
/// happens between calls, and given the same seed, config and call sequence
/// every game plays out identically.
///
/// # Lifecycle of a piece
///
/// ```text
/// spawn -> Falling --(tick, cannot fall)--> Grace --(tick, cannot fall)--> lock
///             ^                               |
///             +---(accepted move/rotate, -----+
///                  or tick that can fall)
/// ```
///
/// Locking merges the piece into the playfield, clears full rows, scores and
/// spawns the next piece. A lock with any cell above the field ends the game
/// instead; the field is left untouched.
#[derive(Debug, Clone)]
pub struct Game {
    config: GameConfig,
    catalog: Arc<PieceCatalog>,
    playfield: Playfield,
    queue: PieceQueue,
    active: ActivePiece,
    timer: DropTimer,
    can_hold: bool,
    did_hard_drop: bool,
    stats: GameStats,
    state: SessionState,
    elapsed: Duration,
    /// Fraction of a millisecond not yet taken off the timer.
    sub_ms: Duration,
}

impl Game {
    /// Starts a game with the standard pieces.
    pub fn new(config: GameConfig, seed: PieceSeed) -> Result<Self, ConfigError> {
        Self::with_catalog(config, Arc::new(PieceCatalog::standard()), seed)
    }

    /// Starts a game with a custom piece catalog, shared with the caller.
    pub fn with_catalog(
        config: GameConfig,
        catalog: Arc<PieceCatalog>,
        seed: PieceSeed,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let mut queue = PieceQueue::with_seed(seed);
        let first = queue.pop_next();
        let mut game = Self {
            playfield: Playfield::new(config.width, config.height),
            timer: DropTimer {
                duration_ms: config.drop_duration_ms(0),
                time_ms: 0,
                in_grace: false,
            },
            config,
            catalog,
            queue,
            active: ActivePiece {
                kind: first,
                rotation: 0,
                position: Coord::ZERO,
            },
            can_hold: true,
            did_hard_drop: false,
            stats: GameStats::new(),
            state: SessionState::Playing,
            elapsed: Duration::ZERO,
            sub_ms: Duration::ZERO,
        };
        game.spawn(first);
        Ok(game)
    }

    #[must_use]
    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    #[must_use]
    pub fn catalog(&self) -> &PieceCatalog {
        &self.catalog
    }

    #[must_use]
    pub fn playfield(&self) -> &Playfield {
        &self.playfield
    }

    /// Whether the field cell at `(x, y)` is solid. Walls and floor are solid.
    #[must_use]
    pub fn is_block_solid(&self, x: i32, y: i32) -> bool {
        self.playfield.is_block_solid(x, y)
    }

    #[must_use]
    pub fn color(&self, x: i32, y: i32) -> BlockColor {
        self.playfield.color(x, y)
    }

    #[must_use]
    pub fn active_piece(&self) -> ActivePiece {
        self.active
    }

    /// Descriptor of the falling piece.
    #[must_use]
    pub fn active_descriptor(&self) -> &PieceDescriptor {
        self.catalog.get(self.active.kind)
    }

    /// Field coordinates of the falling piece's solid cells.
    pub fn active_cells(&self) -> impl Iterator<Item = Coord> + '_ {
        self.active.cells(self.active_descriptor())
    }

    /// Where the falling piece would land if hard-dropped now.
    #[must_use]
    pub fn ghost_position(&self) -> Coord {
        self.active.position.offset(0, self.shadow_distance())
    }

    #[must_use]
    pub fn held_piece(&self) -> Option<PieceKind> {
        self.queue.held_piece()
    }

    /// Upcoming pieces, limited to [`GameConfig::next_preview`].
    pub fn next_pieces(&self) -> impl Iterator<Item = PieceKind> + '_ {
        self.queue.next_pieces().take(self.config.next_preview)
    }

    #[must_use]
    pub fn can_hold(&self) -> bool {
        self.can_hold
    }

    /// Whether the falling piece has touched down and will lock on the next tick.
    #[must_use]
    pub fn is_in_grace(&self) -> bool {
        self.timer.in_grace
    }

    /// Whether input is ignored until the hard-dropped piece locks.
    #[must_use]
    pub fn is_input_locked(&self) -> bool {
        self.did_hard_drop
    }

    #[must_use]
    pub fn score(&self) -> u64 {
        self.stats.score()
    }

    #[must_use]
    pub fn level(&self) -> u32 {
        self.stats.level()
    }

    #[must_use]
    pub fn level_line_count(&self) -> u32 {
        self.stats.level_line_count()
    }

    #[must_use]
    pub fn stats(&self) -> &GameStats {
        &self.stats
    }

    #[must_use]
    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// Total time fed to [`update`](Self::update) while the game was running.
    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// Advances the drop timer by `delta`, running every tick it implies.
    ///
    /// The timer counts whole milliseconds. Sub-millisecond parts of `delta`
    /// are carried over to later calls, so short frames still add up.
    ///
    /// Returns the final result from the call in which the game ends, and
    /// `None` otherwise, including every call after the game is over.
    pub fn update(&mut self, delta: Duration) -> Option<GameOver> {
        if self.state.is_game_over() {
            return None;
        }
        self.elapsed += delta;
        let pending = self.sub_ms.saturating_add(delta);
        let whole_ms = pending.as_millis();
        self.sub_ms = Duration::from_nanos(u64::from(pending.subsec_nanos() % 1_000_000));
        let delta_ms = i64::try_from(whole_ms).unwrap_or(i64::MAX);
        self.timer.time_ms = self.timer.time_ms.saturating_sub(delta_ms);
        while self.timer.time_ms < 0 {
            self.tick();
            if let SessionState::GameOver(over) = self.state {
                return Some(over);
            }
            self.timer.time_ms += self.timer.duration_ms;
        }
        None
    }

    /// Applies a player action. Returns whether it was accepted.
    ///
    /// Every action is ignored after game over and while a hard-dropped
    /// piece waits to lock.
    pub fn handle_input(&mut self, event: InputEvent) -> bool {
        if self.state.is_game_over() || self.did_hard_drop {
            return false;
        }
        match event {
            InputEvent::MoveLeft => self.shift(-1),
            InputEvent::MoveRight => self.shift(1),
            InputEvent::SoftDrop => self.soft_drop(),
            InputEvent::HardDrop => self.hard_drop(),
            InputEvent::RotateCw => self.rotate((self.active.rotation + 1) % 4),
            InputEvent::RotateCcw => self.rotate((self.active.rotation + 3) % 4),
            InputEvent::Hold => self.hold(),
        }
    }

    /// Translates the falling piece if the target position is free.
    ///
    /// An obstructed move leaves the piece where it was and returns `false`.
    pub fn try_move(&mut self, dx: i32, dy: i32) -> bool {
        let candidate = self.active.moved(dx, dy);
        if self.is_obstructed(candidate) {
            return false;
        }
        self.active = candidate;
        true
    }

    /// Rotates the falling piece to `rotation`, trying each wall kick in order.
    ///
    /// The first unobstructed kick wins. If all are obstructed, or the
    /// transition has no kicks, the piece is left unchanged.
    pub fn try_rotate(&mut self, rotation: usize) -> bool {
        let rotation = rotation % 4;
        let descriptor = self.catalog.get(self.active.kind);
        let found = descriptor
            .kicks()
            .offsets(self.active.rotation, rotation)
            .iter()
            .map(|&kick| ActivePiece {
                rotation,
                position: self.active.position + kick,
                ..self.active
            })
            .find(|candidate| !self.is_obstructed(*candidate));
        let Some(candidate) = found else {
            return false;
        };
        self.active = candidate;
        true
    }

    /// How many rows the falling piece can drop before it rests on the stack.
    ///
    /// Measured from the lowest cell of each column of the piece. A piece that
    /// overlaps the stack after a kick reports 0.
    #[must_use]
    pub fn shadow_distance(&self) -> i32 {
        let descriptor = self.active_descriptor();
        let ActivePiece {
            rotation, position, ..
        } = self.active;
        descriptor
            .solid_cells(rotation)
            .filter(|cell| descriptor.is_shadow_block(cell.x, cell.y, rotation))
            .map(|cell| {
                let Coord { x, y } = position + cell;
                let dist = self.playfield.cast_down(x, y, true) - 1 - y;
                if dist < 0 {
                    self.playfield.cast_up(x, y, false) - y
                } else {
                    dist
                }
            })
            .fold(self.playfield.height(), i32::min)
            .max(0)
    }

    fn is_obstructed(&self, piece: ActivePiece) -> bool {
        piece
            .cells(self.catalog.get(piece.kind))
            .any(|cell| self.playfield.is_block_solid(cell.x, cell.y))
    }

    fn shift(&mut self, dx: i32) -> bool {
        if !self.try_move(dx, 0) {
            return false;
        }
        self.timer.in_grace = false;
        true
    }

    fn rotate(&mut self, rotation: usize) -> bool {
        if !self.try_rotate(rotation) {
            return false;
        }
        self.timer.in_grace = false;
        true
    }

    fn soft_drop(&mut self) -> bool {
        if self.shadow_distance() <= 0 {
            return false;
        }
        self.timer.time_ms = 0;
        true
    }

    fn hard_drop(&mut self) -> bool {
        let distance = self.shadow_distance();
        if distance <= 0 {
            return false;
        }
        self.active.position.y += distance;
        self.did_hard_drop = true;
        self.timer.time_ms = 0;
        true
    }

    fn hold(&mut self) -> bool {
        if !self.can_hold {
            return false;
        }
        let current = self.active.kind;
        let next = self.queue.hold(current);
        log::trace!("hold {current:?}, playing {next:?}");
        self.spawn(next);
        self.can_hold = false;
        true
    }

    /// One gravity step.
    fn tick(&mut self) {
        if self.try_move(0, 1) {
            if self.timer.in_grace {
                self.timer.in_grace = false;
                self.reset_drop_timer(self.config.drop_duration_ms(self.stats.level()));
            }
        } else if self.timer.in_grace {
            self.timer.in_grace = false;
            self.lock();
        } else {
            log::debug!("touch at {:?}", self.active.position);
            self.timer.in_grace = true;
            self.reset_drop_timer(self.config.grace_duration_ms());
        }
    }

    fn reset_drop_timer(&mut self, duration_ms: i64) {
        self.timer.duration_ms = duration_ms;
        self.timer.time_ms = duration_ms;
    }

    fn lock(&mut self) {
        let descriptor = self.catalog.get(self.active.kind);
        if self.active.cells(descriptor).any(|cell| cell.y < 0) {
            let over = GameOver {
                score: self.stats.score(),
                level: self.stats.level(),
                lines: self.stats.total_cleared_lines(),
                pieces: self.stats.completed_pieces(),
            };
            log::info!(
                "game over: score {}, level {}, {} lines",
                over.score,
                over.level,
                over.lines
            );
            self.state = SessionState::GameOver(over);
            return;
        }

        let color = descriptor.color();
        for cell in self.active.cells(descriptor) {
            self.playfield.place_block(cell.x, cell.y, color);
        }

        let rows: Vec<i32> = self.playfield.detect_clears().collect();
        for &row in &rows {
            self.playfield.clear_row(row);
        }
        log::debug!(
            "locked {:?} at {:?}, cleared rows {rows:?}",
            self.active.kind,
            self.active.position
        );

        let level_up = self
            .stats
            .complete_piece_drop(rows.len(), self.did_hard_drop, &self.config);
        if level_up {
            log::info!("level up: {}", self.stats.level());
        }

        let next = self.queue.pop_next();
        self.spawn(next);
        self.did_hard_drop = false;
        self.can_hold = true;
    }

    /// Puts `kind` at the top center in rotation 0 with a fresh drop timer.
    ///
    /// The timer starts empty, so the next update ticks right away, and the
    /// grace flag is cleared.
    fn spawn(&mut self, kind: PieceKind) {
        let width = self.catalog.get(kind).width();
        self.active = ActivePiece {
            kind,
            rotation: 0,
            position: Coord::new((self.playfield.width() - width) / 2, -1),
        };
        self.timer = DropTimer {
            duration_ms: self.config.drop_duration_ms(self.stats.level()),
            time_ms: 0,
            in_grace: false,
        };
        log::trace!("spawn {kind:?} at {:?}", self.active.position);
    }
}
