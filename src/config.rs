//! Game configuration.
//!
//! A configuration is fixed when a [`Game`](crate::game::Game) is built and
//! survives `reset()`. Unknown or missing fields fall back to defaults, so a
//! presentation layer can send a partial object.

use serde::{Deserialize, Serialize};

/// Rule for handing over the turn when the next player cannot move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PassPolicy {
    /// The stuck player stays on turn and must call `pass()` themselves.
    #[default]
    Explicit,
    /// The engine skips the stuck player and records the pass.
    Auto,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GameConfig {
    pub pass_policy: PassPolicy,
}

impl GameConfig {
    #[must_use]
    pub fn with_pass_policy(mut self, pass_policy: PassPolicy) -> Self {
        self.pass_policy = pass_policy;
        self
    }
}
