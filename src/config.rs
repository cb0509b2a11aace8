//! Configuration Module
//!
//! Handles loading runtime configuration from environment variables.

use std::env;
use std::str::FromStr;

/// Capacity used by the HTTP front-end when none is configured
pub const DEFAULT_CAPACITY: usize = 1000;

// == Front-end Selection ==
/// Which front-end the binary runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Frontend {
    /// Line-oriented prompt on stdin/stdout
    #[default]
    Repl,
    /// REST server
    Http,
}

impl FromStr for Frontend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "repl" | "interactive" => Ok(Frontend::Repl),
            "http" | "server" => Ok(Frontend::Http),
            other => Err(format!("unknown frontend '{}'", other)),
        }
    }
}

/// Runtime configuration.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Front-end to run
    pub frontend: Frontend,
    /// Preset cache capacity; the REPL asks for one when unset
    pub capacity: Option<usize>,
    /// HTTP server port
    pub server_port: u16,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `CACHE_FRONTEND` - `repl` or `http` (default: repl)
    /// - `CACHE_CAPACITY` - Cache capacity (default: unset)
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            frontend: parse_var("CACHE_FRONTEND").unwrap_or(defaults.frontend),
            capacity: parse_var("CACHE_CAPACITY").or(defaults.capacity),
            server_port: parse_var("SERVER_PORT").unwrap_or(defaults.server_port),
        }
    }

    /// Capacity for front-ends that cannot ask interactively.
    pub fn capacity_or_default(&self) -> usize {
        self.capacity.unwrap_or(DEFAULT_CAPACITY)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            frontend: Frontend::Repl,
            capacity: None,
            server_port: 3000,
        }
    }
}

fn parse_var<T: FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|v| v.trim().parse().ok())
}
