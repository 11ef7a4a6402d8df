use tracing::{debug, info};

use crate::board::{Board, LegalMove};
use crate::config::{GameConfig, PassPolicy};
use crate::error::{GameError, GameResult};
use crate::history::{History, HistoryEntry};
use crate::types::{GameSnapshot, LastAction, Outcome, Player, Position, Score};

/// The live state of a game. Replaced wholesale by each transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameState {
    pub board: Board,
    pub current_player: Player,
    pub last_move: Option<Position>,
    pub last_action: LastAction,
    pub is_terminal: bool,
}

impl GameState {
    fn initial() -> Self {
        Self {
            board: Board::new(),
            current_player: Player::Black,
            last_move: None,
            last_action: LastAction::Start,
            is_terminal: false,
        }
    }

    fn to_entry(self) -> HistoryEntry {
        HistoryEntry {
            board: self.board,
            current_player: self.current_player,
            last_move: self.last_move,
            last_action: self.last_action,
        }
    }

    fn from_entry(entry: HistoryEntry) -> Self {
        Self {
            board: entry.board,
            current_player: entry.current_player,
            last_move: entry.last_move,
            last_action: entry.last_action,
            is_terminal: entry.board.is_terminal(),
        }
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::initial()
    }
}

/// Owns the live game state and its undo history.
///
/// Every command either applies fully or returns an error with the state
/// untouched.
#[derive(Debug, Clone, Default)]
pub struct Game {
    state: GameState,
    history: History,
    config: GameConfig,
}

impl Game {
    pub fn new(config: GameConfig) -> Self {
        Self {
            state: GameState::initial(),
            history: History::new(),
            config,
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn board(&self) -> &Board {
        &self.state.board
    }

    pub fn current_player(&self) -> Player {
        self.state.current_player
    }

    /// Legal moves for the player on turn. Empty when they must pass or the
    /// game is over.
    pub fn legal_moves(&self) -> Vec<LegalMove> {
        self.state.board.legal_moves(self.state.current_player)
    }

    pub fn score(&self) -> Score {
        self.state.board.count()
    }

    pub fn is_game_over(&self) -> bool {
        self.state.is_terminal
    }

    /// `None` while the game is still running.
    pub fn winner(&self) -> Option<Outcome> {
        self.state.is_terminal.then(|| self.score().outcome())
    }

    pub fn last_move(&self) -> Option<Position> {
        self.state.last_move
    }

    pub fn last_action(&self) -> LastAction {
        self.state.last_action
    }

    pub fn can_undo(&self) -> bool {
        !self.history.is_empty()
    }

    pub fn config(&self) -> GameConfig {
        self.config
    }

    /// Places a disc for the current player.
    pub fn try_move(&mut self, row: u8, col: u8) -> GameResult<()> {
        let pos = Position::new(row, col)?;
        let player = self.state.current_player;
        let (board, flipped) = self.state.board.apply_move(pos, player)?;

        let opponent = player.opponent();
        let is_terminal = board.is_terminal();
        let opponent_passed = !is_terminal
            && self.config.pass_policy == PassPolicy::Auto
            && !board.has_legal_move(opponent);

        let next = GameState {
            board,
            current_player: if opponent_passed { player } else { opponent },
            last_move: Some(pos),
            last_action: LastAction::Move {
                player,
                position: pos,
                flipped,
                opponent_passed,
            },
            is_terminal,
        };

        self.history.push(self.state.to_entry());
        self.state = next;

        debug!(
            %player,
            row,
            col,
            flipped = flipped.len(),
            opponent_passed,
            "move applied"
        );
        if is_terminal {
            self.log_game_over();
        }
        Ok(())
    }

    /// Forfeits the turn. Only allowed while the game is running and the
    /// current player has no legal move.
    pub fn pass(&mut self) -> GameResult<()> {
        let player = self.state.current_player;
        if self.state.is_terminal || self.state.board.has_legal_move(player) {
            return Err(GameError::InvalidPass);
        }

        let next = GameState {
            current_player: player.opponent(),
            last_action: LastAction::Pass { player },
            is_terminal: self.state.board.is_terminal(),
            ..self.state
        };

        self.history.push(self.state.to_entry());
        self.state = next;

        debug!(%player, "pass");
        Ok(())
    }

    /// Restores the state from before the most recent move or pass.
    pub fn undo(&mut self) -> GameResult<()> {
        let entry = self.history.pop()?;
        self.state = GameState::from_entry(entry);

        debug!(
            current_player = %self.state.current_player,
            remaining = self.history.len(),
            "undo"
        );
        Ok(())
    }

    /// Back to the opening position with an empty history. The configuration
    /// is kept.
    pub fn reset(&mut self) {
        self.state = GameState::initial();
        self.history.clear();
        debug!("reset");
    }

    pub fn snapshot(&self) -> GameSnapshot {
        let score = self.score();
        GameSnapshot {
            cells: self.state.board.cells().to_vec(),
            current_player: self.state.current_player,
            black_count: score.black,
            white_count: score.white,
            is_game_over: self.state.is_terminal,
            is_pass: self.state.last_action.is_pass(),
            flipped: self.state.last_action.flipped().iter().collect(),
            last_move: self.state.last_move,
            legal_moves: self.legal_moves().iter().map(|m| m.position).collect(),
            can_undo: self.can_undo(),
            outcome: self.winner(),
        }
    }

    fn log_game_over(&self) {
        let score = self.score();
        info!(
            black = score.black,
            white = score.white,
            outcome = ?score.outcome(),
            "game over"
        );
    }

    #[cfg(test)]
    fn set_board_for_test(&mut self, board: Board, current_player: Player) {
        self.state = GameState {
            board,
            current_player,
            last_move: None,
            last_action: LastAction::Start,
            is_terminal: board.is_terminal(),
        };
        self.history.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Cell;

    const FULL_BOARD: u64 = u64::MAX;

    fn bit(row: usize, col: usize) -> u64 {
        1u64 << (row * 8 + col)
    }

    fn pos(row: u8, col: u8) -> Position {
        Position::new(row, col).unwrap()
    }

    /// Black to move; after Black takes (0,2) White is left without a reply
    /// while Black can still capture at (7,2).
    fn stranding_board() -> Board {
        "BW......
         ........
         ........
         ........
         ........
         ........
         ........
         BW......"
            .parse()
            .unwrap()
    }

    fn game_at(board: Board, current_player: Player, pass_policy: PassPolicy) -> Game {
        let mut game = Game::new(GameConfig::default().with_pass_policy(pass_policy));
        game.set_board_for_test(board, current_player);
        game
    }

    #[test]
    fn initial_state_is_correct() {
        let game = Game::default();
        let snapshot = game.snapshot();

        assert_eq!(snapshot.current_player, Player::Black);
        assert_eq!(snapshot.black_count, 2);
        assert_eq!(snapshot.white_count, 2);
        assert_eq!(snapshot.cells.len(), 64);
        assert!(!snapshot.is_game_over);
        assert!(!snapshot.is_pass);
        assert!(!snapshot.can_undo);
        assert!(snapshot.flipped.is_empty());
        assert_eq!(snapshot.last_move, None);
        assert_eq!(snapshot.outcome, None);
        assert_eq!(game.legal_moves().len(), 4);
    }

    #[test]
    fn illegal_move_returns_error_and_keeps_state() {
        let mut game = Game::default();
        let before = *game.state();

        assert_eq!(
            game.try_move(0, 0),
            Err(GameError::IllegalMove { row: 0, col: 0 })
        );
        assert_eq!(
            game.try_move(3, 3),
            Err(GameError::IllegalMove { row: 3, col: 3 })
        );
        assert_eq!(*game.state(), before);
        assert!(!game.can_undo());
    }

    #[test]
    fn out_of_range_move_is_rejected() {
        let mut game = Game::default();

        assert_eq!(
            game.try_move(8, 2),
            Err(GameError::OutOfBounds { row: 8, col: 2 })
        );
        assert_eq!(*game.state(), GameState::initial());
    }

    #[test]
    fn opening_move_hands_turn_to_white() {
        let mut game = Game::default();

        game.try_move(2, 3).unwrap();

        assert_eq!(game.score(), Score { black: 4, white: 1 });
        assert_eq!(game.board().empty_count(), 59);
        assert_eq!(game.current_player(), Player::White);
        assert_eq!(game.last_move(), Some(pos(2, 3)));
        assert!(game.legal_moves().iter().any(|m| m.position == pos(2, 2)));

        let snapshot = game.snapshot();
        assert_eq!(snapshot.flipped, vec![pos(3, 3)]);
        assert!(!snapshot.is_pass);
        assert!(snapshot.can_undo);
    }

    #[test]
    fn pass_with_legal_moves_is_rejected() {
        let mut game = Game::default();

        assert_eq!(game.pass(), Err(GameError::InvalidPass));
        assert_eq!(*game.state(), GameState::initial());
    }

    #[test]
    fn explicit_pass_switches_turn() {
        let black = bit(0, 1);
        let white = FULL_BOARD ^ bit(0, 0) ^ black;
        let board = Board::from_bitboards(black, white).unwrap();
        let mut game = game_at(board, Player::Black, PassPolicy::Explicit);

        assert!(game.legal_moves().is_empty());
        assert!(!game.is_game_over());
        game.pass().unwrap();

        assert_eq!(game.current_player(), Player::White);
        assert_eq!(
            game.last_action(),
            LastAction::Pass {
                player: Player::Black
            }
        );
        assert!(game.snapshot().is_pass);
        assert!(game.snapshot().flipped.is_empty());
        assert!(!game.is_game_over());
        assert!(!game.legal_moves().is_empty());
    }

    #[test]
    fn explicit_policy_leaves_stuck_player_on_turn() {
        let mut game = game_at(stranding_board(), Player::Black, PassPolicy::Explicit);

        game.try_move(0, 2).unwrap();

        assert_eq!(game.current_player(), Player::White);
        assert!(game.legal_moves().is_empty());
        assert!(!game.is_game_over());

        game.pass().unwrap();
        assert_eq!(game.current_player(), Player::Black);
        game.try_move(7, 2).unwrap();

        assert!(game.is_game_over());
        assert_eq!(game.winner(), Some(Outcome::Win(Player::Black)));
    }

    #[test]
    fn auto_policy_skips_stuck_opponent() {
        let mut game = game_at(stranding_board(), Player::Black, PassPolicy::Auto);

        game.try_move(0, 2).unwrap();

        assert_eq!(game.current_player(), Player::Black);
        assert!(!game.is_game_over());
        assert!(game.snapshot().is_pass);
        assert_eq!(game.snapshot().flipped, vec![pos(0, 1)]);
        assert_eq!(game.pass(), Err(GameError::InvalidPass));

        game.try_move(7, 2).unwrap();

        assert!(game.is_game_over());
        assert_eq!(game.score(), Score { black: 6, white: 0 });
        assert_eq!(game.winner(), Some(Outcome::Win(Player::Black)));
    }

    #[test]
    fn full_board_after_move_ends_game() {
        let black = bit(0, 1);
        let white = FULL_BOARD ^ bit(0, 0) ^ black;
        let board = Board::from_bitboards(black, white).unwrap();
        let mut game = game_at(board, Player::White, PassPolicy::Explicit);

        game.try_move(0, 0).unwrap();
        let snapshot = game.snapshot();

        assert!(snapshot.is_game_over);
        assert_eq!(snapshot.black_count, 0);
        assert_eq!(snapshot.white_count, 64);
        assert_eq!(snapshot.flipped, vec![pos(0, 1)]);
        assert_eq!(snapshot.outcome, Some(Outcome::Win(Player::White)));
        assert!(snapshot.legal_moves.is_empty());
    }

    #[test]
    fn commands_after_game_over_are_rejected() {
        let board: Board = ".BBBBBBB
                            BBBBBBBB
                            BBBBBBBB
                            BBBBBBBB
                            BBBBBBBB
                            BBBBBBBB
                            BBBBBBBB
                            BBBBBBWB"
            .parse()
            .unwrap();
        let mut game = game_at(board, Player::Black, PassPolicy::Explicit);

        assert!(game.is_game_over());
        assert_eq!(game.winner(), Some(Outcome::Win(Player::Black)));
        assert_eq!(
            game.try_move(0, 0),
            Err(GameError::IllegalMove { row: 0, col: 0 })
        );
        assert_eq!(game.pass(), Err(GameError::InvalidPass));
        assert!(!game.can_undo());
    }

    #[test]
    fn undo_restores_previous_board_and_player() {
        let mut game = Game::default();
        game.try_move(2, 3).unwrap();
        game.try_move(2, 2).unwrap();

        game.undo().unwrap();
        assert_eq!(game.current_player(), Player::White);
        assert_eq!(game.board().get(pos(2, 2)), Cell::Empty);
        assert_eq!(game.board().get(pos(2, 3)), Cell::from(Player::Black));
        assert_eq!(game.last_move(), Some(pos(2, 3)));

        game.undo().unwrap();
        assert_eq!(*game.state(), GameState::initial());
        assert_eq!(game.undo(), Err(GameError::NoHistory));
        assert_eq!(*game.state(), GameState::initial());
    }

    #[test]
    fn undo_recomputes_terminal_flag() {
        let black = bit(0, 1);
        let white = FULL_BOARD ^ bit(0, 0) ^ black;
        let board = Board::from_bitboards(black, white).unwrap();
        let mut game = game_at(board, Player::White, PassPolicy::Explicit);

        game.try_move(0, 0).unwrap();
        assert!(game.is_game_over());

        game.undo().unwrap();
        assert!(!game.is_game_over());
        assert_eq!(game.winner(), None);
        assert_eq!(*game.board(), board);
    }

    #[test]
    fn undo_reverts_explicit_pass() {
        let mut game = game_at(stranding_board(), Player::Black, PassPolicy::Explicit);
        game.try_move(0, 2).unwrap();
        game.pass().unwrap();

        game.undo().unwrap();

        assert_eq!(game.current_player(), Player::White);
        assert!(!game.last_action().is_pass());
    }

    #[test]
    fn reset_returns_to_opening_and_keeps_config() {
        let config = GameConfig::default().with_pass_policy(PassPolicy::Auto);
        let mut game = Game::new(config);
        game.try_move(2, 3).unwrap();
        game.try_move(2, 2).unwrap();

        game.reset();

        assert_eq!(*game.state(), GameState::initial());
        assert_eq!(*game.board(), Board::new());
        assert!(!game.can_undo());
        assert_eq!(game.config(), config);
    }

    #[test]
    fn snapshot_serializes_with_camel_case_fields() {
        let mut game = Game::default();
        game.try_move(2, 3).unwrap();

        let json = serde_json::to_value(game.snapshot()).unwrap();

        assert_eq!(json["currentPlayer"], "white");
        assert_eq!(json["blackCount"], 4);
        assert_eq!(json["lastMove"]["row"], 2);
        assert_eq!(json["flipped"][0]["col"], 3);
        assert_eq!(json["canUndo"], true);
        assert!(json["outcome"].is_null());
    }
}
