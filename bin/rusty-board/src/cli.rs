//! Command-line surface of the `rusty-board` operator tool.

use anyhow::Context;
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use rb_core::models::{Action, Block, BoardId, Position};

#[derive(Parser, Debug)]
#[command(name = "rusty-board", version, about = "Inspect and edit event-sourced day boards")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print the current state of a board
    Show(BoardArg),
    /// Print every stored action, one JSON object per line
    Log(BoardArg),
    /// Print the state after the first N actions
    Replay {
        #[command(flatten)]
        board: BoardArg,
        #[arg(long)]
        upto: usize,
    },
    /// Append a raw JSON action
    Append {
        #[command(flatten)]
        board: BoardArg,
        /// e.g. '{"type":"remove","blockId":"b1"}'
        action: String,
    },
    /// Place a new text block on top of the board
    AddText {
        #[command(flatten)]
        board: BoardArg,
        #[arg(long)]
        text: String,
        #[command(flatten)]
        placement: Placement,
    },
    /// Place a new image block on top of the board
    AddImage {
        #[command(flatten)]
        board: BoardArg,
        #[arg(long)]
        url: String,
        #[command(flatten)]
        placement: Placement,
    },
}

#[derive(Args, Debug)]
#[group(required = true, multiple = false)]
pub struct BoardArg {
    /// Board key, e.g. 2024.3.9
    #[arg(short, long)]
    pub board: Option<String>,
    /// Calendar day, e.g. 2024-03-09
    #[arg(long)]
    pub date: Option<NaiveDate>,
}

impl BoardArg {
    pub fn resolve(&self) -> anyhow::Result<BoardId> {
        match (&self.board, self.date) {
            (_, Some(date)) => Ok(BoardId::for_date(date)),
            (Some(raw), None) => BoardId::new(raw.as_str()).context("bad --board"),
            (None, None) => anyhow::bail!("either --board or --date is required"),
        }
    }
}

#[derive(Args, Debug, Clone, Copy)]
pub struct Placement {
    #[arg(long, default_value_t = 0.0)]
    pub x: f64,
    #[arg(long, default_value_t = 0.0)]
    pub y: f64,
    #[arg(long, default_value_t = 200.0)]
    pub width: f64,
    #[arg(long, default_value_t = 100.0)]
    pub height: f64,
}

impl Placement {
    pub fn add_block(self, block: Block) -> Action {
        Action::AddBlock {
            block,
            position: Position {
                x: self.x,
                y: self.y,
            },
            width: self.width,
            height: self.height,
        }
    }
}

/// Rejects actions the log could not read back, before touching the store.
pub fn check_action(action: &Action) -> anyhow::Result<()> {
    action
        .validate()
        .map_err(|reason| anyhow::anyhow!("refusing to append {}: {reason}", action.kind()))
}
