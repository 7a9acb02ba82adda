//! rusty-board/crates/rb-core/src/lib.rs
//!
//! The event-sourcing core of Rusty-Board: board/action models, the pure
//! reducer that derives board state, and the storage port for action logs.

pub mod error;
pub mod models;
pub mod reducer;
pub mod service;
pub mod traits;

// Re-exporting for easier access in other crates
pub use error::*;
pub use models::*;
pub use reducer::{apply, fold_all};
pub use service::BoardService;
pub use traits::*;
