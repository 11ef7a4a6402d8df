use wasm_bindgen::prelude::*;

pub mod board;
pub mod config;
pub mod error;
pub mod game;
pub mod history;
pub mod types;
pub mod wasm;

pub use board::{Board, FlipSet, LegalMove};
pub use config::{GameConfig, PassPolicy};
pub use error::{GameError, GameResult};
pub use game::{Game, GameState};
pub use history::{History, HistoryEntry};
pub use types::{Cell, GameSnapshot, LastAction, Outcome, Player, Position, Score};

#[wasm_bindgen]
pub fn wasm_ready() -> bool {
    true
}
