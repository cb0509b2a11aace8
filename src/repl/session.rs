//! REPL Session
//!
//! State machine behind the interactive prompt. Each input line advances the
//! session by one step and may produce one line of output.

use std::mem;

use tracing::debug;

use crate::cache::LruCache;

// == Prompts ==
pub const CAPACITY_PROMPT: &str = "\nEnter Cache Size: ";
pub const COMMAND_PROMPT: &str = "\nEnter command ((s)et/(g)et/(d)elete/(i)nfo/(q)uit): ";
pub const KEY_PROMPT: &str = "Enter key: ";
pub const VALUE_PROMPT: &str = "Enter value: ";

/// Data command waiting for its key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Set,
    Get,
    Delete,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Selector {
    Data(Command),
    Info,
    Quit,
}

impl Selector {
    fn parse(input: &str) -> Option<Self> {
        match input {
            "s" | "set" => Some(Selector::Data(Command::Set)),
            "g" | "get" => Some(Selector::Data(Command::Get)),
            "d" | "delete" => Some(Selector::Data(Command::Delete)),
            "i" | "info" => Some(Selector::Info),
            "q" | "quit" => Some(Selector::Quit),
            _ => None,
        }
    }
}

// == State ==
/// The cache is created by the capacity step and then carried from state to
/// state until the session closes.
#[derive(Debug)]
enum State {
    AwaitingCapacity,
    AwaitingCommand(LruCache),
    AwaitingKey(LruCache, Command),
    AwaitingValue(LruCache, String),
    Closed,
}

// == Session ==
#[derive(Debug)]
pub struct Session {
    state: State,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    /// Starts by asking for a capacity.
    pub fn new() -> Self {
        Self {
            state: State::AwaitingCapacity,
        }
    }

    /// Starts at the command prompt with an existing cache.
    pub fn with_cache(cache: LruCache) -> Self {
        Self {
            state: State::AwaitingCommand(cache),
        }
    }

    /// Prompt for the next line, or None once the session is closed.
    pub fn prompt(&self) -> Option<&'static str> {
        match self.state {
            State::AwaitingCapacity => Some(CAPACITY_PROMPT),
            State::AwaitingCommand(_) => Some(COMMAND_PROMPT),
            State::AwaitingKey(..) => Some(KEY_PROMPT),
            State::AwaitingValue(..) => Some(VALUE_PROMPT),
            State::Closed => None,
        }
    }

    pub fn is_closed(&self) -> bool {
        matches!(self.state, State::Closed)
    }

    /// The session's cache, once one has been created.
    pub fn cache(&self) -> Option<&LruCache> {
        match &self.state {
            State::AwaitingCommand(cache)
            | State::AwaitingKey(cache, _)
            | State::AwaitingValue(cache, _) => Some(cache),
            State::AwaitingCapacity | State::Closed => None,
        }
    }

    // == Advance ==
    /// Feeds one input line and returns the reply to print, if any.
    ///
    /// Capacities and command selectors are trimmed. Keys and values only
    /// lose their line terminator, so they may carry spaces.
    pub fn advance(&mut self, line: &str) -> Option<String> {
        let raw = line.trim_end_matches(&['\r', '\n'][..]);

        let (next, reply) = match mem::replace(&mut self.state, State::Closed) {
            State::AwaitingCapacity => on_capacity(raw.trim()),
            State::AwaitingCommand(cache) => on_command(cache, raw.trim()),
            State::AwaitingKey(cache, command) => on_key(cache, command, raw),
            State::AwaitingValue(cache, key) => {
                let reply = if cache.set(key, raw) {
                    "Value updated successfully"
                } else {
                    "Value set successfully"
                };
                (State::AwaitingCommand(cache), Some(reply.to_string()))
            }
            State::Closed => (State::Closed, None),
        };

        self.state = next;
        reply
    }
}

fn on_capacity(input: &str) -> (State, Option<String>) {
    let requested: i64 = match input.parse() {
        Ok(n) => n,
        Err(_) => {
            return (
                State::AwaitingCapacity,
                Some(format!("{} is not a number!", input)),
            )
        }
    };

    match LruCache::with_requested_capacity(requested) {
        Ok(cache) => {
            debug!(capacity = requested, "session cache created");
            (State::AwaitingCommand(cache), None)
        }
        Err(err) => (
            State::AwaitingCapacity,
            Some(format!("Error Creating Cache: {}", err)),
        ),
    }
}

fn on_command(cache: LruCache, input: &str) -> (State, Option<String>) {
    match Selector::parse(input) {
        Some(Selector::Data(command)) => (State::AwaitingKey(cache, command), None),
        Some(Selector::Info) => {
            let reply = format!("Entries: {}/{}", cache.len(), cache.capacity());
            (State::AwaitingCommand(cache), Some(reply))
        }
        Some(Selector::Quit) => (State::Closed, None),
        None => (
            State::AwaitingCommand(cache),
            Some("Unknown command".to_string()),
        ),
    }
}

fn on_key(cache: LruCache, command: Command, key: &str) -> (State, Option<String>) {
    let reply = match command {
        Command::Set => return (State::AwaitingValue(cache, key.to_string()), None),
        Command::Get => match cache.get(key) {
            Some(value) => format!("Value: {}", value),
            None => "Key not found".to_string(),
        },
        Command::Delete => {
            if cache.delete(key) {
                "Key deleted successfully".to_string()
            } else {
                "Key not found".to_string()
            }
        }
    };
    (State::AwaitingCommand(cache), Some(reply))
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    /// Feeds lines and collects every reply.
    fn feed(session: &mut Session, lines: &[&str]) -> Vec<String> {
        lines
            .iter()
            .filter_map(|line| session.advance(line))
            .collect()
    }

    #[test]
    fn test_starts_awaiting_capacity() {
        let session = Session::new();
        assert_eq!(session.prompt(), Some(CAPACITY_PROMPT));
        assert!(session.cache().is_none());
        assert!(!session.is_closed());
    }

    #[test]
    fn test_rejects_non_numeric_capacity() {
        let mut session = Session::new();
        let reply = session.advance("abc\n");

        assert_eq!(reply.as_deref(), Some("abc is not a number!"));
        assert_eq!(session.prompt(), Some(CAPACITY_PROMPT));
    }

    #[test]
    fn test_rejects_non_positive_capacity() {
        let mut session = Session::new();

        let reply = session.advance("0").unwrap();
        assert!(reply.starts_with("Error Creating Cache:"), "{}", reply);
        let reply = session.advance("-4").unwrap();
        assert!(reply.contains("-4"), "{}", reply);
        assert_eq!(session.prompt(), Some(CAPACITY_PROMPT));
    }

    #[test]
    fn test_valid_capacity_moves_to_commands() {
        let mut session = Session::new();
        assert_eq!(session.advance(" 3 \n"), None);

        assert_eq!(session.prompt(), Some(COMMAND_PROMPT));
        assert_eq!(session.cache().map(LruCache::capacity), Some(3));
    }

    #[test]
    fn test_set_get_delete_flow() {
        let mut session = Session::new();
        let replies = feed(
            &mut session,
            &[
                "2", "s", "greeting", "hello world", "g", "greeting", "s", "greeting", "hi", "d",
                "greeting", "g", "greeting", "d", "greeting",
            ],
        );

        assert_eq!(
            replies,
            vec![
                "Value set successfully",
                "Value: hello world",
                "Value updated successfully",
                "Key deleted successfully",
                "Key not found",
                "Key not found",
            ]
        );
    }

    #[test]
    fn test_prompts_follow_command() {
        let mut session = Session::with_cache(LruCache::new(1).unwrap());

        session.advance("set");
        assert_eq!(session.prompt(), Some(KEY_PROMPT));
        session.advance("k");
        assert_eq!(session.prompt(), Some(VALUE_PROMPT));
        session.advance("v");
        assert_eq!(session.prompt(), Some(COMMAND_PROMPT));
    }

    #[test]
    fn test_info_and_unknown_command() {
        let mut session = Session::with_cache(LruCache::new(4).unwrap());
        let replies = feed(&mut session, &["s", "a", "1", "i", "x"]);

        assert_eq!(
            replies,
            vec!["Value set successfully", "Entries: 1/4", "Unknown command"]
        );
    }

    #[test]
    fn test_session_cache_evicts() {
        let mut session = Session::with_cache(LruCache::new(1).unwrap());
        feed(&mut session, &["s", "a", "1", "s", "b", "2"]);

        let cache = session.cache().unwrap();
        assert_eq!(cache.get("a"), None);
        assert_eq!(cache.get("b").as_deref(), Some("2"));
    }

    #[test]
    fn test_quit_closes_session() {
        let mut session = Session::with_cache(LruCache::new(1).unwrap());

        assert_eq!(session.advance("q"), None);
        assert!(session.is_closed());
        assert_eq!(session.prompt(), None);
        assert!(session.cache().is_none());
        assert_eq!(session.advance("s"), None);
    }
}
