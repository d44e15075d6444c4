//! Channel Trait

use crate::{LinkError, Response};
use std::time::Duration;

/// A command/response channel to the robot main board.
///
/// Implementations own the transport and any response caching; consumers
/// never see raw bytes or framing. All calls are blocking.
pub trait ControlLink: Send {
    /// Fire a named command and discard the response body.
    ///
    /// Transport failures (unreachable device, I/O errors) propagate to the
    /// caller; nothing is retried here.
    fn send(&mut self, command: &str) -> Result<(), LinkError>;

    /// Issue a named command and return its keyed response.
    ///
    /// With `max_age`, a cached response no older than that bound is
    /// returned without a device round-trip; otherwise (and always when
    /// `max_age` is `None`) a fresh request is issued. Fresh responses
    /// refresh the cache.
    fn query(&mut self, command: &str, max_age: Option<Duration>) -> Result<Response, LinkError>;
}
