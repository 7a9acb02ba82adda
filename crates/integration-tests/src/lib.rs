//! Shared fixtures for the end-to-end board tests.

use std::sync::Arc;

use rb_core::models::{Action, Block, Position, Size};
use rb_core::BoardService;
use rb_store_jsonl::JsonlActionStore;
use tempfile::TempDir;

/// A service backed by a fresh on-disk store. Keep the `TempDir` alive.
pub fn disk_service() -> (TempDir, Arc<JsonlActionStore>, BoardService) {
    let dir = TempDir::new().expect("tempdir");
    let store = Arc::new(JsonlActionStore::new(dir.path().to_path_buf()));
    let service = BoardService::new(store.clone());
    (dir, store, service)
}

pub fn text_block(id: &str, text: &str, x: f64, y: f64) -> Action {
    Action::AddBlock {
        block: Block::Text {
            id: id.into(),
            text: text.into(),
        },
        position: Position { x, y },
        width: 100.0,
        height: 50.0,
    }
}

pub fn image_block(id: &str, url: &str) -> Action {
    Action::AddBlock {
        block: Block::Image {
            id: id.into(),
            url: url.into(),
        },
        position: Position::default(),
        width: 320.0,
        height: 240.0,
    }
}

pub fn resize(id: &str, width: f64, height: f64) -> Action {
    Action::Resize {
        block_id: id.into(),
        size: Size { width, height },
    }
}
