//! # rb-store-jsonl
//! rusty-board/crates/rb-plugins/rb-store-jsonl/src/lib.rs
//! Local filesystem implementation of `ActionStore`.
//! Layout: one `<board_id>.jsonl` file per board, one JSON action per line.
//!
//! A record only counts once its terminating newline is on disk. Bytes after
//! the last newline belong to an append that never finished: readers ignore
//! them and the next append truncates them away before writing.

use std::io::{ErrorKind, SeekFrom};
use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use dashmap::DashMap;
use rb_core::error::{AppError, Result};
use rb_core::models::{Action, BoardId};
use rb_core::traits::ActionStore;
use tokio::fs::{self, File, OpenOptions};
use tokio::io::{AsyncReadExt, AsyncSeekExt, AsyncWriteExt};
use tokio::sync::Mutex;

pub struct JsonlActionStore {
    /// Directory holding every board log (e.g., "./data")
    root_path: PathBuf,
    /// Per-board append lock; boards never contend with each other.
    /// Entries live only while an append on that board is in flight.
    write_locks: DashMap<BoardId, Arc<Mutex<()>>>,
}

impl JsonlActionStore {
    pub fn new(root: PathBuf) -> Self {
        Self {
            root_path: root,
            write_locks: DashMap::new(),
        }
    }

    pub fn log_path(&self, board_id: &BoardId) -> PathBuf {
        self.root_path.join(format!("{board_id}.jsonl"))
    }

    fn lock_for(&self, board_id: &BoardId) -> Arc<Mutex<()>> {
        self.write_locks.entry(board_id.clone()).or_default().clone()
    }

    /// Drops the board's lock once no append holds or awaits it, so the map
    /// only ever holds boards with appends in flight.
    fn release_lock(&self, board_id: &BoardId) {
        self.write_locks.remove_if(board_id, |_, lock| Arc::strong_count(lock) == 1);
    }

    /// Must run under the board's lock. Returns how many bytes of an
    /// unfinished earlier record were cut away.
    ///
    /// If `sync_data` fails the line may already be in the file; the caller
    /// still sees an error.
    async fn write_record(&self, board_id: &BoardId, line: &[u8]) -> std::io::Result<Option<u64>> {
        fs::create_dir_all(&self.root_path).await?;
        let mut file = OpenOptions::new()
            .create(true)
            .read(true)
            .append(true)
            .open(self.log_path(board_id))
            .await?;

        let dropped = discard_partial_tail(&mut file).await?;
        file.write_all(line).await?;
        file.flush().await?;
        file.sync_data().await?;
        Ok(dropped)
    }

    #[cfg(test)]
    fn tracked_locks(&self) -> usize {
        self.write_locks.len()
    }
}

#[async_trait]
impl ActionStore for JsonlActionStore {
    async fn append(&self, board_id: &BoardId, action: &Action) -> Result<()> {
        action.validate().map_err(|reason| AppError::InvalidAction {
            board_id: board_id.to_string(),
            reason,
        })?;
        let mut line = serde_json::to_vec(action).map_err(|source| AppError::Encode {
            board_id: board_id.to_string(),
            source,
        })?;
        line.push(b'\n');

        let lock = self.lock_for(board_id);
        let written = {
            let _guard = lock.lock().await;
            self.write_record(board_id, &line).await
        };
        drop(lock);
        self.release_lock(board_id);

        let dropped = written.map_err(|source| AppError::Io {
            board_id: board_id.to_string(),
            source,
        })?;
        if let Some(bytes) = dropped {
            tracing::warn!(
                board_id = %board_id,
                bytes,
                "truncated incomplete trailing record before append"
            );
        }
        tracing::debug!(board_id = %board_id, kind = action.kind(), "action appended");
        Ok(())
    }

    async fn get_actions(&self, board_id: &BoardId) -> Result<Vec<Action>> {
        let bytes = match fs::read(self.log_path(board_id)).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(source) => {
                return Err(AppError::Io {
                    board_id: board_id.to_string(),
                    source,
                })
            }
        };
        decode_log(board_id, &bytes)
    }
}

/// Cuts the file back to its last newline. Returns how many bytes went.
async fn discard_partial_tail(file: &mut File) -> std::io::Result<Option<u64>> {
    let len = file.metadata().await?.len();
    if len == 0 {
        return Ok(None);
    }

    let mut last = [0u8; 1];
    file.seek(SeekFrom::Start(len - 1)).await?;
    file.read_exact(&mut last).await?;
    if last[0] == b'\n' {
        return Ok(None);
    }

    let mut contents = Vec::new();
    file.seek(SeekFrom::Start(0)).await?;
    file.read_to_end(&mut contents).await?;
    let keep = contents
        .iter()
        .rposition(|b| *b == b'\n')
        .map_or(0, |end| end as u64 + 1);
    file.set_len(keep).await?;
    Ok(Some(len - keep))
}

/// Parses every newline-terminated record. Blank lines are skipped and the
/// unterminated tail, if any, is left out.
fn decode_log(board_id: &BoardId, bytes: &[u8]) -> Result<Vec<Action>> {
    let complete = match bytes.iter().rposition(|b| *b == b'\n') {
        Some(end) => &bytes[..=end],
        None => &bytes[..0],
    };
    if complete.len() < bytes.len() {
        tracing::debug!(
            board_id = %board_id,
            bytes = bytes.len() - complete.len(),
            "ignoring incomplete trailing record"
        );
    }

    complete
        .split(|b| *b == b'\n')
        .enumerate()
        .filter(|(_, line)| !line.iter().all(u8::is_ascii_whitespace))
        .map(|(index, line)| {
            serde_json::from_slice(line).map_err(|source| AppError::CorruptLog {
                board_id: board_id.to_string(),
                position: index + 1,
                source,
            })
        })
        .collect()
}
