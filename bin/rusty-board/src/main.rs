//! # Rusty-Board Binary
//!
//! Operator tool that assembles the board service from compile-time features
//! and replays or extends day boards from the command line.

mod cli;

use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use configs::{LogFormat, Settings};
use rb_core::models::{Action, Block};
use rb_core::traits::ActionStore;
use rb_core::BoardService;
use tracing_subscriber::EnvFilter;

#[cfg(feature = "store-jsonl")]
use rb_store_jsonl::JsonlActionStore;

#[cfg(not(feature = "store-jsonl"))]
compile_error!("rusty-board needs a storage plugin; enable the `store-jsonl` feature");

use cli::{Cli, Command};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = Settings::from_env().context("failed to load settings")?;
    init_tracing(settings.log_format);
    let cli = Cli::parse();

    // 1. Initialize Storage Implementation
    #[cfg(feature = "store-jsonl")]
    let store: Arc<dyn ActionStore> = Arc::new(JsonlActionStore::new(settings.data_dir.clone()));

    tracing::debug!(data_dir = %settings.data_dir.display(), "action store ready");

    // 2. Hand the store to the service explicitly; there is no global instance
    let service = BoardService::new(store);
    run(&service, cli.command).await
}

fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    match format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Pretty => builder.init(),
    }
}

async fn run(service: &BoardService, command: Command) -> anyhow::Result<()> {
    match command {
        Command::Show(board) => {
            let state = service.load(&board.resolve()?).await?;
            println!("{}", serde_json::to_string_pretty(&state)?);
        }
        Command::Log(board) => {
            for action in service.history(&board.resolve()?).await? {
                println!("{}", serde_json::to_string(&action)?);
            }
        }
        Command::Replay { board, upto } => {
            let state = service.state_at(&board.resolve()?, upto).await?;
            println!("{}", serde_json::to_string_pretty(&state)?);
        }
        Command::Append { board, action } => {
            let action: Action = serde_json::from_str(&action)
                .context("action is not valid JSON for any known type")?;
            commit(service, &board, action).await?;
        }
        Command::AddText {
            board,
            text,
            placement,
        } => {
            let block = Block::Text {
                id: uuid::Uuid::new_v4().to_string(),
                text,
            };
            commit(service, &board, placement.add_block(block)).await?;
        }
        Command::AddImage {
            board,
            url,
            placement,
        } => {
            let block = Block::Image {
                id: uuid::Uuid::new_v4().to_string(),
                url,
            };
            commit(service, &board, placement.add_block(block)).await?;
        }
    }
    Ok(())
}

async fn commit(
    service: &BoardService,
    board: &cli::BoardArg,
    action: Action,
) -> anyhow::Result<()> {
    cli::check_action(&action)?;
    let board_id = board.resolve()?;
    let state = service.load(&board_id).await?;
    let next = service.commit(&board_id, &state, action).await?;
    println!("{}", serde_json::to_string_pretty(&next)?);
    Ok(())
}
