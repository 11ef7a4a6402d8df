//! Browser entry points. Thin wrappers over [`Game`]; errors surface in JS
//! as thrown `Error` objects carrying the `GameError` message.

use wasm_bindgen::prelude::*;

use crate::config::GameConfig;
use crate::game::Game;
use crate::types::Position;

#[wasm_bindgen]
pub struct WasmGame {
    inner: Game,
}

#[wasm_bindgen]
impl WasmGame {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self {
            inner: Game::default(),
        }
    }

    /// Builds a game from a (possibly partial) `{ passPolicy }` object.
    #[wasm_bindgen(js_name = withConfig)]
    pub fn with_config(config: JsValue) -> Result<WasmGame, JsError> {
        let config: GameConfig = serde_wasm_bindgen::from_value(config)?;
        Ok(Self {
            inner: Game::new(config),
        })
    }

    #[wasm_bindgen(js_name = tryMove)]
    pub fn try_move(&mut self, row: u8, col: u8) -> Result<(), JsError> {
        self.inner.try_move(row, col)?;
        Ok(())
    }

    pub fn pass(&mut self) -> Result<(), JsError> {
        self.inner.pass()?;
        Ok(())
    }

    pub fn undo(&mut self) -> Result<(), JsError> {
        self.inner.undo()?;
        Ok(())
    }

    pub fn reset(&mut self) {
        self.inner.reset();
    }

    pub fn snapshot(&self) -> Result<JsValue, JsError> {
        Ok(serde_wasm_bindgen::to_value(&self.inner.snapshot())?)
    }

    #[wasm_bindgen(js_name = legalMoves)]
    pub fn legal_moves(&self) -> Result<JsValue, JsError> {
        let moves: Vec<Position> = self
            .inner
            .legal_moves()
            .into_iter()
            .map(|m| m.position)
            .collect();
        Ok(serde_wasm_bindgen::to_value(&moves)?)
    }

    #[wasm_bindgen(js_name = isGameOver)]
    pub fn is_game_over(&self) -> bool {
        self.inner.is_game_over()
    }

    #[wasm_bindgen(js_name = canUndo)]
    pub fn can_undo(&self) -> bool {
        self.inner.can_undo()
    }
}

impl Default for WasmGame {
    fn default() -> Self {
        Self::new()
    }
}
