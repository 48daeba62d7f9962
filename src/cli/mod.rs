//! Interactive Host Module
//!
//! Line-oriented commands for driving a cache from stdin.
//!
//! # Commands
//! - `ADD <key> <value> [ttl_ms]` - Store a value, optionally with its own TTL
//! - `GET <key>` - Retrieve a live value
//! - `DEL <key>` - Remove a key
//! - `TTL <key>` - Remaining lifetime in ms, -1 if it never expires
//! - `CLEAR` - Drop every entry
//! - `CLEAN` - Run the expiry scan now
//! - `LEN` - Raw entry count
//! - `STATS` - Statistics as JSON

pub mod command;
pub mod handler;
pub mod input;

pub use command::{Command, CommandError};
pub use handler::{execute, execute_line, HostCache, Reply, StatsReport, HELP_TEXT};
pub use input::spawn_line_reader;
