//! # Domain Models
//!
//! These types represent the board canvas and the actions that mutate it.
//! Actions are the only thing ever persisted; `BoardState` is always derived.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Key naming one independent action log (e.g. "2024.3.9").
///
/// The key doubles as the log file name, so only ASCII letters, digits,
/// `.`, `_` and `-` are accepted.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct BoardId(String);

impl BoardId {
    pub fn new(raw: impl Into<String>) -> Result<Self, AppError> {
        let raw = raw.into();
        let valid_chars = raw
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'));
        if raw.is_empty() || raw == "." || raw == ".." || !valid_chars {
            return Err(AppError::InvalidBoardId(raw));
        }
        Ok(Self(raw))
    }

    /// The board for one calendar day: "{year}.{month}.{day}", unpadded.
    pub fn for_date(date: NaiveDate) -> Self {
        Self(format!("{}.{}.{}", date.year(), date.month(), date.day()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BoardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for BoardId {
    type Error = AppError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<BoardId> for String {
    fn from(id: BoardId) -> Self {
        id.0
    }
}

impl std::str::FromStr for BoardId {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

/// Content placed on a board. The `id` is chosen by whoever creates the
/// `add-block` action and never changes afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Block {
    Text { id: String, text: String },
    Image { id: String, url: String },
    /// A block type this build does not know. Never placed on a board.
    #[serde(other)]
    Unknown,
}

impl Block {
    pub fn id(&self) -> Option<&str> {
        match self {
            Block::Text { id, .. } | Block::Image { id, .. } => Some(id),
            Block::Unknown => None,
        }
    }
}

/// One immutable mutation of a board, stored as one JSON line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case", rename_all_fields = "camelCase")]
pub enum Action {
    AddBlock {
        block: Block,
        position: Position,
        width: f64,
        height: f64,
    },
    Remove {
        block_id: String,
    },
    SetText {
        block_id: String,
        text: String,
    },
    Move {
        block_id: String,
        position: Position,
    },
    Resize {
        block_id: String,
        size: Size,
    },
    BringToFront {
        block_id: String,
    },
    BringToBack {
        block_id: String,
    },
    /// Any record whose `type` tag this build does not know.
    #[serde(other)]
    Unknown,
}

impl Action {
    /// The wire tag, for logging.
    pub fn kind(&self) -> &'static str {
        match self {
            Action::AddBlock { .. } => "add-block",
            Action::Remove { .. } => "remove",
            Action::SetText { .. } => "set-text",
            Action::Move { .. } => "move",
            Action::Resize { .. } => "resize",
            Action::BringToFront { .. } => "bring-to-front",
            Action::BringToBack { .. } => "bring-to-back",
            Action::Unknown => "unknown",
        }
    }

    /// Checks that the action survives a trip through the log unchanged.
    /// JSON has no NaN or infinity, and unknown types carry no payload.
    pub fn validate(&self) -> Result<(), &'static str> {
        let finite = |values: &[f64]| values.iter().all(|v| v.is_finite());
        match self {
            Action::AddBlock {
                block: Block::Unknown,
                ..
            } => Err("unknown block type"),
            Action::AddBlock {
                position,
                width,
                height,
                ..
            } if !finite(&[position.x, position.y, *width, *height]) => {
                Err("non-finite position or size")
            }
            Action::Move { position, .. } if !finite(&[position.x, position.y]) => {
                Err("non-finite position")
            }
            Action::Resize { size, .. } if !finite(&[size.width, size.height]) => {
                Err("non-finite size")
            }
            Action::Unknown => Err("unknown action type"),
            _ => Ok(()),
        }
    }

    /// The block this action targets, if any.
    pub fn block_id(&self) -> Option<&str> {
        match self {
            Action::AddBlock { block, .. } => block.id(),
            Action::Remove { block_id }
            | Action::SetText { block_id, .. }
            | Action::Move { block_id, .. }
            | Action::Resize { block_id, .. }
            | Action::BringToFront { block_id }
            | Action::BringToBack { block_id } => Some(block_id),
            Action::Unknown => None,
        }
    }
}

/// A block together with where it sits on the canvas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacedBlock {
    pub block: Block,
    pub position: Position,
    pub size: Size,
}

/// Derived snapshot of a board. Never persisted.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardState {
    pub blocks: BTreeMap<String, PlacedBlock>,
    /// Draw order: later entries paint above earlier ones.
    pub block_ids: Vec<String>,
}

impl BoardState {
    /// The canonical empty board.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Blocks in draw order, bottom first.
    pub fn ordered_blocks(&self) -> impl Iterator<Item = (&str, &PlacedBlock)> + '_ {
        self.block_ids
            .iter()
            .filter_map(|id| self.blocks.get(id).map(|placed| (id.as_str(), placed)))
    }

    /// True when `block_ids` is a duplicate-free permutation of the keys of `blocks`.
    pub fn check_invariants(&self) -> bool {
        if self.block_ids.len() != self.blocks.len() {
            return false;
        }
        let mut seen = std::collections::BTreeSet::new();
        self.block_ids
            .iter()
            .all(|id| self.blocks.contains_key(id) && seen.insert(id.as_str()))
    }
}
