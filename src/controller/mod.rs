//! Input handling and the update loop.
//!
//! [`MatchController`] turns pointer and key events into Board operations
//! and hands animation completions back to the Board. It owns the pause
//! flag: while the pause overlay is up, pointer input is ignored but
//! animations keep running.

mod input;

pub use input::{Cursor, InputEvent, MatchController};
