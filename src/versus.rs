//! Two-player match host
//!
//! Owns both boards, routes garbage between them, and drives computer
//! players one command per tick. Everything is tick based; the caller
//! decides how fast ticks happen.

use crate::ai::choose_move;
use crate::config::EngineConfig;
use crate::event::{Command, Event, Input, PlayerId};
use crate::piece::{Piece, is_grounded};
use crate::player::PlayerBoard;
use crate::score::Score;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Computer opponent strength
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    #[default]
    Normal,
    Hard,
}

impl Difficulty {
    /// Ticks to wait before planning a new piece
    pub fn think_interval(&self) -> u32 {
        match self {
            Difficulty::Easy => 30,
            Difficulty::Normal => 12,
            Difficulty::Hard => 4,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Normal => "Normal",
            Difficulty::Hard => "Hard",
        }
    }
}

/// Match setup
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VersusSettings {
    pub player_one: Difficulty,
    pub player_two: Difficulty,
    /// Shared pair seed; random when unset
    pub seed: Option<u64>,
    /// Match length limit
    pub max_ticks: u64,
    /// Ticks between gravity steps, 0 disables gravity
    pub gravity_interval: u64,
}

impl Default for VersusSettings {
    fn default() -> Self {
        Self {
            player_one: Difficulty::Normal,
            player_two: Difficulty::Normal,
            seed: None,
            max_ticks: 20_000,
            gravity_interval: 20,
        }
    }
}

impl VersusSettings {
    pub fn difficulty(&self, player: PlayerId) -> Difficulty {
        match player {
            PlayerId::One => self.player_one,
            PlayerId::Two => self.player_two,
        }
    }
}

/// Turns the evaluator's landing pose into commands
#[derive(Debug, Clone)]
pub struct AiDriver {
    difficulty: Difficulty,
    cooldown: u32,
    target: Option<Piece>,
    /// Last move was refused; drop where we are
    blocked: bool,
}

impl AiDriver {
    pub fn new(difficulty: Difficulty) -> Self {
        Self {
            difficulty,
            cooldown: difficulty.think_interval(),
            target: None,
            blocked: false,
        }
    }

    pub fn target(&self) -> Option<Piece> {
        self.target
    }

    /// At most one command for this tick
    pub fn next_command(&mut self, board: &PlayerBoard) -> Option<Command> {
        let piece = board.current()?;
        if self.blocked {
            return Some(Command::HardDrop);
        }

        let target = match self.target {
            Some(target) => target,
            None => {
                if self.cooldown > 0 {
                    self.cooldown -= 1;
                    return None;
                }
                let target = choose_move(board.grid(), piece, board.config());
                self.target = Some(target);
                target
            }
        };

        let command = if piece.layout != target.layout {
            Command::Rotate
        } else if piece.col > target.col {
            Command::MoveLeft
        } else if piece.col < target.col {
            Command::MoveRight
        } else {
            Command::HardDrop
        };
        Some(command)
    }

    /// Update from the events a command produced
    pub fn observe(&mut self, command: Command, events: &[Event]) {
        let respawned = events
            .iter()
            .any(|e| matches!(e, Event::PieceSpawned { .. } | Event::GameOver { .. }));
        if respawned {
            self.target = None;
            self.blocked = false;
            self.cooldown = self.difficulty.think_interval();
            return;
        }

        let rejected = events
            .iter()
            .any(|e| matches!(e, Event::RotationRejected { .. }));
        if rejected || events.is_empty() {
            debug!(?command, "path to target blocked");
            self.blocked = true;
        }
    }
}

/// Final match summary
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchOutcome {
    /// None on a draw
    pub winner: Option<PlayerId>,
    pub ticks: u64,
    pub scores: [Score; 2],
    pub game_over: [bool; 2],
}

/// A two-player match
#[derive(Debug, Clone)]
pub struct Match {
    players: [PlayerBoard; 2],
    drivers: [AiDriver; 2],
    tick: u64,
    max_ticks: u64,
    gravity_interval: u64,
}

impl Match {
    /// Both players share `seed`, so they are dealt the same pairs
    pub fn new(config: EngineConfig, settings: &VersusSettings, seed: u64) -> Self {
        let players = PlayerId::all().map(|id| PlayerBoard::new(id, config.clone(), seed));
        Self::from_players(players, settings)
    }

    /// Start from prepared boards, indexed by `PlayerId::index`
    pub fn from_players(players: [PlayerBoard; 2], settings: &VersusSettings) -> Self {
        assert!(
            PlayerId::all()
                .iter()
                .all(|id| players[id.index()].id() == *id),
            "boards out of order"
        );
        info!(
            one = settings.player_one.name(),
            two = settings.player_two.name(),
            max_ticks = settings.max_ticks,
            "match starting"
        );
        Self {
            players,
            drivers: PlayerId::all().map(|id| AiDriver::new(settings.difficulty(id))),
            tick: 0,
            max_ticks: settings.max_ticks,
            gravity_interval: settings.gravity_interval,
        }
    }

    pub fn player(&self, id: PlayerId) -> &PlayerBoard {
        &self.players[id.index()]
    }

    pub fn tick(&self) -> u64 {
        self.tick
    }

    /// Apply a command to one player and forward any garbage it earned
    pub fn submit(&mut self, input: Input) -> Vec<Event> {
        let events = self.players[input.player.index()].process_command(input.command);
        for event in &events {
            if let Event::ChainResolved {
                player,
                garbage_rows_for_opponent,
                ..
            } = *event
            {
                if garbage_rows_for_opponent > 0 {
                    let target = player.opponent();
                    let rows = garbage_rows_for_opponent;
                    info!(from = ?player, to = ?target, rows, "garbage sent");
                    self.players[target.index()].receive_garbage(garbage_rows_for_opponent);
                }
            }
        }
        events
    }

    /// Advance one tick, issuing at most one command per player
    ///
    /// On a gravity tick gravity takes the player's turn and the driver
    /// waits for the next tick.
    pub fn step(&mut self) -> Vec<Event> {
        let mut events = Vec::new();
        if self.is_over() {
            return events;
        }
        self.tick += 1;
        let gravity_due = self.gravity_interval > 0 && self.tick % self.gravity_interval == 0;

        for id in PlayerId::all() {
            let i = id.index();
            let board = &self.players[i];
            let command = match board.current() {
                Some(piece) if gravity_due => Some(if is_grounded(board.grid(), piece) {
                    Command::Lock
                } else {
                    Command::SoftDrop
                }),
                _ => self.drivers[i].next_command(board),
            };
            if let Some(command) = command {
                events.extend(self.drive(id, command));
            }
        }
        events
    }

    fn drive(&mut self, player: PlayerId, command: Command) -> Vec<Event> {
        let events = self.submit(Input { player, command });
        self.drivers[player.index()].observe(command, &events);
        events
    }

    pub fn is_over(&self) -> bool {
        self.tick >= self.max_ticks || self.players.iter().any(|p| p.is_game_over())
    }

    /// Survivor, else the higher score; None while undecided or on a tie
    pub fn winner(&self) -> Option<PlayerId> {
        let [one, two] = &self.players;
        match (one.is_game_over(), two.is_game_over()) {
            (false, true) => Some(PlayerId::One),
            (true, false) => Some(PlayerId::Two),
            (false, false) if !self.is_over() => None,
            _ => match one.score.points.cmp(&two.score.points) {
                std::cmp::Ordering::Greater => Some(PlayerId::One),
                std::cmp::Ordering::Less => Some(PlayerId::Two),
                std::cmp::Ordering::Equal => None,
            },
        }
    }

    /// Step until the match is over
    pub fn run(&mut self) -> MatchOutcome {
        while !self.is_over() {
            self.step();
        }
        let outcome = self.outcome();
        info!(winner = ?outcome.winner, ticks = outcome.ticks, "match finished");
        outcome
    }

    pub fn outcome(&self) -> MatchOutcome {
        MatchOutcome {
            winner: self.winner(),
            ticks: self.tick,
            scores: self.players.clone().map(|p| p.score),
            game_over: self.players.each_ref().map(|p| p.is_game_over()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::Grid;

    fn quick() -> VersusSettings {
        VersusSettings {
            player_one: Difficulty::Hard,
            player_two: Difficulty::Hard,
            seed: Some(7),
            max_ticks: 400,
            gravity_interval: 10,
        }
    }

    fn padded(bottom: &[String]) -> Grid {
        let mut rows: Vec<&str> = vec!["......"; 12 - bottom.len()];
        rows.extend(bottom.iter().map(String::as_str));
        Grid::from_rows(&rows).unwrap()
    }

    #[test]
    fn test_difficulty_intervals() {
        assert_eq!(Difficulty::Easy.think_interval(), 30);
        assert_eq!(Difficulty::Normal.think_interval(), 12);
        assert_eq!(Difficulty::Hard.think_interval(), 4);
    }

    #[test]
    fn test_settings_toml() {
        let settings: VersusSettings = toml::from_str("player_two = \"hard\"\nseed = 3\n").unwrap();
        assert_eq!(settings.player_one, Difficulty::Normal);
        assert_eq!(settings.difficulty(PlayerId::Two), Difficulty::Hard);
        assert_eq!(settings.seed, Some(3));
        assert_eq!(settings.max_ticks, 20_000);
    }

    #[test]
    fn test_driver_thinks_then_walks_to_target() {
        let mut board = PlayerBoard::new(PlayerId::One, EngineConfig::default(), 1);
        let mut driver = AiDriver::new(Difficulty::Hard);
        for _ in 0..4 {
            assert_eq!(driver.next_command(&board), None);
        }

        // Empty board: every column ties, the leftmost wins
        let mut issued = Vec::new();
        loop {
            let command = driver.next_command(&board).unwrap();
            issued.push(command);
            let events = board.process_command(command);
            driver.observe(command, &events);
            if command == Command::HardDrop {
                break;
            }
        }
        assert_eq!(
            issued,
            vec![Command::MoveLeft, Command::MoveLeft, Command::HardDrop]
        );
        assert_eq!(board.grid().column_height(0), 2);
        assert_eq!(driver.target(), None);
    }

    #[test]
    fn test_driver_drops_when_blocked() {
        let board = PlayerBoard::new(PlayerId::One, EngineConfig::default(), 1);
        let mut driver = AiDriver::new(Difficulty::Hard);
        driver.observe(Command::MoveLeft, &[]);
        assert_eq!(driver.next_command(&board), Some(Command::HardDrop));
    }

    #[test]
    fn test_chain_garbage_reaches_opponent() {
        let config = EngineConfig::default();
        let probe = PlayerBoard::new(PlayerId::One, config.clone(), 5);
        let color = probe.current().unwrap().colors[0].symbol();
        let row: String = std::iter::repeat_n(color, 3).chain("...".chars()).collect();

        let one = PlayerBoard::with_grid(PlayerId::One, config.clone(), 5, padded(&[row]));
        let two = PlayerBoard::new(PlayerId::Two, config, 5);
        let mut versus = Match::from_players([one, two], &quick());

        versus.submit(Input {
            player: PlayerId::One,
            command: Command::MoveRight,
        });
        let events = versus.submit(Input {
            player: PlayerId::One,
            command: Command::HardDrop,
        });
        let sent = events
            .iter()
            .find_map(|e| match e {
                Event::ChainResolved {
                    garbage_rows_for_opponent,
                    ..
                } => Some(*garbage_rows_for_opponent),
                _ => None,
            })
            .unwrap();
        assert!(sent > 0);
        assert_eq!(versus.player(PlayerId::Two).pending_garbage(), sent);
        assert_eq!(versus.player(PlayerId::One).score.garbage_sent, sent);
    }

    #[test]
    fn test_survivor_wins() {
        let config = EngineConfig::default();
        let column: Vec<String> = "RGBYRGBYRG"
            .chars()
            .map(|c| format!("..{c}..."))
            .collect();
        let one = PlayerBoard::new(PlayerId::One, config.clone(), 9);
        let two = PlayerBoard::with_grid(PlayerId::Two, config, 9, padded(&column));
        let mut versus = Match::from_players([one, two], &quick());
        assert_eq!(versus.winner(), None);

        let events = versus.submit(Input {
            player: PlayerId::Two,
            command: Command::Lock,
        });
        assert!(events.contains(&Event::GameOver {
            player: PlayerId::Two
        }));
        assert!(versus.is_over());
        assert_eq!(versus.winner(), Some(PlayerId::One));
        assert!(versus.step().is_empty());
    }

    #[test]
    fn test_one_command_per_player_per_tick() {
        for gravity_interval in [1, 3] {
            let settings = VersusSettings {
                gravity_interval,
                ..quick()
            };
            let mut versus = Match::new(EngineConfig::default(), &settings, 7);
            while !versus.is_over() {
                let events = versus.step();
                for id in PlayerId::all() {
                    let mine: Vec<_> = events.iter().filter(|e| e.player() == id).collect();
                    let moved = mine
                        .iter()
                        .filter(|e| matches!(e, Event::PieceMoved { .. }))
                        .count();
                    let rejected = mine
                        .iter()
                        .filter(|e| matches!(e, Event::RotationRejected { .. }))
                        .count();
                    let locked = mine
                        .iter()
                        .filter(|e| {
                            matches!(e, Event::PieceSpawned { .. } | Event::GameOver { .. })
                        })
                        .count();
                    assert!(moved <= 1, "{moved} moves at tick {}", versus.tick());
                    assert!(moved + rejected <= 1, "move and rotation in one tick");
                    assert!(locked <= 1, "{locked} locks at tick {}", versus.tick());
                }
            }
        }
    }

    #[test]
    fn test_gravity_tick_replaces_driver_command() {
        let settings = VersusSettings {
            gravity_interval: 1,
            ..quick()
        };
        let mut versus = Match::new(EngineConfig::default(), &settings, 7);
        let before = versus.player(PlayerId::One).current().unwrap();
        let events = versus.step();
        let after = versus.player(PlayerId::One).current().unwrap();
        assert_eq!(after.row, before.row + 1);
        assert_eq!(after.col, before.col);
        let moves = events
            .iter()
            .filter(|e| matches!(e, Event::PieceMoved { player: PlayerId::One, .. }))
            .count();
        assert_eq!(moves, 1);
    }

    #[test]
    fn test_run_is_bounded_and_deterministic() {
        let settings = quick();
        let mut a = Match::new(EngineConfig::default(), &settings, 7);
        let mut b = Match::new(EngineConfig::default(), &settings, 7);
        let first = a.run();
        let second = b.run();
        assert!(first.ticks <= settings.max_ticks);
        assert_eq!(first, second);
        assert!(first.game_over.contains(&true) || first.ticks == settings.max_ticks);
        assert!(a.is_over());
        assert!(a.player(PlayerId::One).pieces_locked > 0);
    }
}
