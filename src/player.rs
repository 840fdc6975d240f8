//! One player's board and the command handling around it
//!
//! A `PlayerBoard` is an owned value. Nothing here touches the opponent:
//! garbage earned leaves as an event, and garbage received is queued with
//! [`PlayerBoard::receive_garbage`] and applied by this board itself.

use crate::chain::lock_and_resolve;
use crate::color::Color;
use crate::config::EngineConfig;
use crate::event::{Command, Event, PlayerId};
use crate::garbage::inject_garbage;
use crate::grid::Grid;
use crate::piece::{Piece, hard_drop, move_down, move_left, move_right, rotate};
use crate::queue::PieceQueue;
use crate::score::Score;
use tracing::info;

/// Player state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerState {
    Playing,
    GameOver,
}

/// A player's grid, pieces, and score
#[derive(Debug, Clone)]
pub struct PlayerBoard {
    id: PlayerId,
    config: EngineConfig,
    grid: Grid,
    /// Current falling piece
    current: Option<Piece>,
    /// Upcoming piece, already at the spawn position
    next: Piece,
    queue: PieceQueue,
    /// Garbage rows waiting to land on this grid
    pending_garbage: u32,
    /// Score tracking
    pub score: Score,
    pub state: PlayerState,
    pub pieces_locked: u32,
}

impl PlayerBoard {
    /// Create a board with an empty grid
    pub fn new(id: PlayerId, config: EngineConfig, seed: u64) -> Self {
        let grid = Grid::from_config(&config);
        Self::with_grid(id, config, seed, grid)
    }

    /// Create a board starting from an existing grid
    pub fn with_grid(id: PlayerId, config: EngineConfig, seed: u64, grid: Grid) -> Self {
        let mut queue = PieceQueue::with_seed(seed, config.palette_size);
        let current = Piece::spawn(queue.next_pair(), &grid);
        let next = Piece::spawn(queue.next_pair(), &grid);

        Self {
            id,
            config,
            grid,
            current: Some(current),
            next,
            queue,
            pending_garbage: 0,
            score: Score::new(),
            state: PlayerState::Playing,
            pieces_locked: 0,
        }
    }

    pub fn id(&self) -> PlayerId {
        self.id
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// The falling piece; None once the game is over
    pub fn current(&self) -> Option<Piece> {
        self.current
    }

    pub fn next(&self) -> Piece {
        self.next
    }

    /// Pairs after `next`
    pub fn preview(&self, count: usize) -> impl Iterator<Item = &[Color; 2]> {
        self.queue.preview(count)
    }

    pub fn pending_garbage(&self) -> u32 {
        self.pending_garbage
    }

    pub fn is_game_over(&self) -> bool {
        self.state == PlayerState::GameOver
    }

    /// Queue garbage sent by the opponent
    pub fn receive_garbage(&mut self, rows: u32) {
        self.pending_garbage = self.pending_garbage.saturating_add(rows);
    }

    /// Apply one command and report what happened
    pub fn process_command(&mut self, command: Command) -> Vec<Event> {
        let mut events = Vec::new();
        if self.state == PlayerState::GameOver {
            return events;
        }
        let Some(piece) = self.current else {
            return events;
        };

        match command {
            Command::MoveLeft => self.shift(piece, move_left(&self.grid, piece), &mut events),
            Command::MoveRight => self.shift(piece, move_right(&self.grid, piece), &mut events),
            Command::SoftDrop => self.shift(piece, move_down(&self.grid, piece), &mut events),
            Command::Rotate => match rotate(&self.grid, piece) {
                Some(rotated) => self.shift(piece, rotated, &mut events),
                None => events.push(Event::RotationRejected { player: self.id }),
            },
            Command::HardDrop => {
                let (landed, _) = hard_drop(&self.grid, piece);
                self.shift(piece, landed, &mut events);
                self.lock(landed, &mut events);
            }
            Command::Lock => self.lock(piece, &mut events),
        }
        events
    }

    fn shift(&mut self, before: Piece, after: Piece, events: &mut Vec<Event>) {
        if after != before {
            self.current = Some(after);
            events.push(Event::PieceMoved {
                player: self.id,
                piece: after,
            });
        }
    }

    /// Lock the piece, resolve chains, settle garbage, and spawn the next piece
    fn lock(&mut self, piece: Piece, events: &mut Vec<Event>) {
        self.current = None;
        self.pieces_locked += 1;

        let result = lock_and_resolve(&self.grid, &piece, &self.config);
        let depth = result.cascade_depth;
        let points = result.score;
        let earned = result.garbage_rows;
        let action = self.score.add_chain(depth, points, result.cells_cleared());
        self.grid = result.grid;

        if depth > 0 {
            // Outgoing garbage cancels our own pending garbage first
            let offset = earned.min(self.pending_garbage);
            self.pending_garbage -= offset;
            let net = earned - offset;
            self.score.garbage_sent += net;

            info!(player = ?self.id, depth, points, earned, net, "{action}");
            events.push(Event::ChainResolved {
                player: self.id,
                cascade_depth: depth,
                score_delta: points,
                garbage_rows_for_opponent: net,
            });
        } else if self.pending_garbage > 0 {
            let rows = std::mem::take(&mut self.pending_garbage);
            let (grid, injection) = inject_garbage(&self.grid, rows);
            self.grid = grid;
            self.score.garbage_received += rows;
            events.push(Event::GarbageInjected {
                player: self.id,
                rows,
                overflow: injection.overflow,
            });
        }

        // Spawn next piece
        let upcoming = Piece::spawn(self.queue.next_pair(), &self.grid);
        let incoming = std::mem::replace(&mut self.next, upcoming);

        // Check for top out
        if self.grid.is_top_row_blocked() || !self.grid.can_place(&incoming) {
            info!(player = ?self.id, points = self.score.points, "game over");
            self.state = PlayerState::GameOver;
            events.push(Event::GameOver { player: self.id });
            return;
        }

        self.current = Some(incoming);
        events.push(Event::PieceSpawned {
            player: self.id,
            piece: incoming,
        });
    }
}
