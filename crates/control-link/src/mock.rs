//! Scripted Mock Channel for Hardware-Free Tests

use crate::serial::parse_response;
use crate::{ControlLink, LinkError, Response};
use std::collections::{HashMap, VecDeque};
use std::time::Duration;

/// A [`ControlLink`] backed by scripted responses instead of hardware.
///
/// Responses are queued per command and consumed in order; the final queued
/// response keeps repeating once the queue drains, so a test can script a
/// device that "settles" into a steady state. Every `send` and every
/// `(command, max_age)` query is recorded for assertions.
#[derive(Debug, Default)]
pub struct MockLink {
    scripts: HashMap<String, VecDeque<Response>>,
    sent: Vec<String>,
    queries: Vec<(String, Option<Duration>)>,
}

impl MockLink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a response for `command`.
    pub fn script(&mut self, command: &str, response: Response) {
        self.scripts
            .entry(command.to_string())
            .or_default()
            .push_back(response);
    }

    /// Queue a response for `command` given as raw protocol text.
    pub fn script_text(&mut self, command: &str, text: &str) {
        self.script(command, parse_response(command, text));
    }

    /// Commands fired through [`ControlLink::send`], in order.
    pub fn sent(&self) -> &[String] {
        &self.sent
    }

    /// Queries issued so far, with the staleness bound each carried.
    pub fn queries(&self) -> &[(String, Option<Duration>)] {
        &self.queries
    }

    /// How many times `command` was queried.
    pub fn query_count(&self, command: &str) -> usize {
        self.queries.iter().filter(|(c, _)| c == command).count()
    }
}

impl ControlLink for MockLink {
    fn send(&mut self, command: &str) -> Result<(), LinkError> {
        self.sent.push(command.to_string());
        Ok(())
    }

    fn query(&mut self, command: &str, max_age: Option<Duration>) -> Result<Response, LinkError> {
        self.queries.push((command.to_string(), max_age));

        let queue = self
            .scripts
            .get_mut(command)
            .ok_or_else(|| LinkError::NoResponse(command.to_string()))?;

        let response = if queue.len() > 1 {
            queue.pop_front()
        } else {
            queue.front().cloned()
        };
        response.ok_or_else(|| LinkError::NoResponse(command.to_string()))
    }
}
