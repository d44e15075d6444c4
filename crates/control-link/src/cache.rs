//! Per-Command Response Cache

use crate::Response;
use std::collections::HashMap;
use std::time::{Duration, Instant};

/// Remembers the most recent response to each command, with its age.
#[derive(Debug, Default)]
pub(crate) struct ResponseCache {
    entries: HashMap<String, (Instant, Response)>,
}

impl ResponseCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// A cached response for `command` no older than `max_age`, if any.
    pub fn get(&self, command: &str, max_age: Duration) -> Option<&Response> {
        let (at, response) = self.entries.get(command)?;
        (at.elapsed() <= max_age).then_some(response)
    }

    /// Store a fresh response for `command`.
    pub fn insert(&mut self, command: &str, response: Response) {
        self.entries
            .insert(command.to_string(), (Instant::now(), response));
    }
}
