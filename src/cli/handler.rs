//! Command Handlers
//!
//! Executes parsed commands against a shared cache and renders replies.

use std::fmt;

use serde::Serialize;
use tracing::debug;

use crate::cache::{Cache, CacheStats};
use crate::cli::Command;

pub const HELP_TEXT: &str = "commands: ADD <key> <value> [ttl_ms] | GET <key> | DEL <key> | TTL <key> | CLEAR | CLEAN | LEN | STATS | HELP | QUIT";

/// Cache type driven by the interactive host.
pub type HostCache = Cache<String, String>;

/// One reply line for a command.
#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    Ok,
    Value(String),
    Nil,
    Integer(i64),
    Json(String),
    Text(&'static str),
    Error(String),
    Quit,
}

impl fmt::Display for Reply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reply::Ok => f.write_str("OK"),
            Reply::Value(value) => f.write_str(value),
            Reply::Nil => f.write_str("(nil)"),
            Reply::Integer(n) => write!(f, "{}", n),
            Reply::Json(body) => f.write_str(body),
            Reply::Text(text) => f.write_str(text),
            Reply::Error(msg) => write!(f, "ERR {}", msg),
            Reply::Quit => f.write_str("BYE"),
        }
    }
}

/// Body of the STATS reply.
#[derive(Debug, Clone, Serialize)]
pub struct StatsReport {
    #[serde(flatten)]
    pub stats: CacheStats,
    /// Hit rate as a fraction (0.0 - 1.0)
    pub hit_rate: f64,
    pub max_entries: usize,
    /// Global TTL in milliseconds, absent when entries never expire by default
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_ttl_ms: Option<u64>,
}

impl StatsReport {
    pub fn from_cache(cache: &HostCache) -> Self {
        let stats = cache.stats();
        Self {
            hit_rate: stats.hit_rate(),
            stats,
            max_entries: cache.max_entries(),
            default_ttl_ms: cache.global_ttl().map(|ttl| ttl.as_millis() as u64),
        }
    }
}

/// Runs one command against the cache.
pub fn execute(cache: &HostCache, command: Command) -> Reply {
    debug!(?command, "Executing command");

    match command {
        Command::Add { key, value, ttl } => match cache.add_with_ttl(key, value, ttl) {
            Ok(()) => Reply::Ok,
            Err(err) => Reply::Error(err.to_string()),
        },
        Command::Get { key } => cache.get(&key).map_or(Reply::Nil, Reply::Value),
        Command::Del { key } => {
            cache.remove(&key);
            Reply::Ok
        }
        Command::Clear => {
            cache.clear();
            Reply::Ok
        }
        Command::Ttl { key } => match cache.time_to_live(&key) {
            Some(Some(remaining)) => Reply::Integer(remaining.as_millis() as i64),
            // Live but never expires
            Some(None) => Reply::Integer(-1),
            None => Reply::Nil,
        },
        Command::Clean => Reply::Integer(cache.clean() as i64),
        Command::Len => Reply::Integer(cache.len() as i64),
        Command::Stats => match serde_json::to_string(&StatsReport::from_cache(cache)) {
            Ok(body) => Reply::Json(body),
            Err(err) => Reply::Error(err.to_string()),
        },
        Command::Help => Reply::Text(HELP_TEXT),
        Command::Quit => Reply::Quit,
    }
}

/// Parses and runs one input line. Blank lines produce no reply.
pub fn execute_line(cache: &HostCache, line: &str) -> Option<Reply> {
    if line.trim().is_empty() {
        return None;
    }

    Some(match line.parse::<Command>() {
        Ok(command) => execute(cache, command),
        Err(err) => Reply::Error(err.to_string()),
    })
}
