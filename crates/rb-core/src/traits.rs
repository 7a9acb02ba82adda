//! # Core Traits (Ports)
//!
//! Any storage plugin must implement these traits to be used by the binary.

use async_trait::async_trait;

use crate::error::Result;
use crate::models::{Action, BoardId};

/// Durable, append-only action log, one log per board.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait ActionStore: Send + Sync {
    /// Durably adds `action` as the last record of the board's log.
    /// Appends to the same board are serialized; other boards are unaffected.
    /// Actions failing [`Action::validate`] are refused with `InvalidAction`.
    ///
    /// An `Io` error does not prove the record is absent: a failed flush to
    /// disk can follow a complete write. Callers that retry may record the
    /// action twice.
    async fn append(&self, board_id: &BoardId, action: &Action) -> Result<()>;

    /// Every completed record of the board's log, in append order.
    /// A board that has never been written to yields an empty list.
    async fn get_actions(&self, board_id: &BoardId) -> Result<Vec<Action>>;
}
