//! # Board Service
//!
//! Glue between an `ActionStore` and the reducer. Callers hold one of these
//! for the lifetime of the process instead of reaching for a global store.

use std::sync::Arc;

use crate::error::Result;
use crate::models::{Action, BoardId, BoardState};
use crate::reducer;
use crate::traits::ActionStore;

#[derive(Clone)]
pub struct BoardService {
    store: Arc<dyn ActionStore>,
}

impl BoardService {
    pub fn new(store: Arc<dyn ActionStore>) -> Self {
        Self { store }
    }

    /// Current state: the whole log folded from the empty board.
    pub async fn load(&self, board_id: &BoardId) -> Result<BoardState> {
        let actions = self.store.get_actions(board_id).await?;
        tracing::debug!(board_id = %board_id, actions = actions.len(), "replaying board");
        Ok(reducer::fold_all(&actions))
    }

    /// State after only the first `upto` records, for auditing history.
    pub async fn state_at(&self, board_id: &BoardId, upto: usize) -> Result<BoardState> {
        let actions = self.store.get_actions(board_id).await?;
        Ok(reducer::fold_all(actions.iter().take(upto)))
    }

    pub async fn history(&self, board_id: &BoardId) -> Result<Vec<Action>> {
        self.store.get_actions(board_id).await
    }

    /// Persists `action`, then folds it onto `state` for immediate feedback.
    /// Nothing is folded when the append fails.
    pub async fn commit(
        &self,
        board_id: &BoardId,
        state: &BoardState,
        action: Action,
    ) -> Result<BoardState> {
        self.store.append(board_id, &action).await?;
        tracing::info!(
            board_id = %board_id,
            kind = action.kind(),
            block_id = action.block_id().unwrap_or_default(),
            "action committed"
        );
        Ok(reducer::apply(state, &action))
    }
}
