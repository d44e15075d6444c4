//! Serial Channel Implementation
//!
//! Speaks the main board's line protocol: the command goes out followed by a
//! newline, the response comes back as comma-separated lines and ends with a
//! 0x1A terminator byte. The first response line echoes the command.

use crate::cache::ResponseCache;
use crate::{ControlLink, LinkError, Response, Value};
use serde::{Deserialize, Serialize};
use std::io::{Read, Write};
use std::time::{Duration, Instant};
use tracing::debug;

/// End-of-response marker sent by the firmware
const TERMINATOR: u8 = 0x1a;

/// Serial channel configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinkConfig {
    /// Serial device path (e.g., "/dev/ttyACM0")
    pub device: String,
    /// Baud rate for serial communication
    pub baud_rate: u32,
    /// How long to wait for a complete response (milliseconds)
    pub response_timeout_ms: u64,
}

impl Default for LinkConfig {
    fn default() -> Self {
        Self {
            device: "/dev/ttyACM0".to_string(),
            baud_rate: 115_200,
            response_timeout_ms: 500,
        }
    }
}

/// Command/response channel over a serial port, with a per-command response
/// cache backing the staleness contract of [`ControlLink::query`].
pub struct SerialLink {
    port: Box<dyn serialport::SerialPort>,
    cache: ResponseCache,
    timeout: Duration,
}

impl SerialLink {
    /// Open the serial device described by `config`.
    pub fn open(config: &LinkConfig) -> Result<Self, LinkError> {
        let port = serialport::new(&config.device, config.baud_rate)
            .timeout(Duration::from_millis(50))
            .open()
            .map_err(|source| LinkError::Open {
                device: config.device.clone(),
                source,
            })?;

        debug!("opened control link on {}", config.device);

        Ok(Self {
            port,
            cache: ResponseCache::new(),
            timeout: Duration::from_millis(config.response_timeout_ms),
        })
    }

    /// Write a command and collect its complete response text.
    fn round_trip(&mut self, command: &str) -> Result<String, LinkError> {
        self.port.write_all(command.as_bytes())?;
        self.port.write_all(b"\n")?;
        self.port.flush()?;
        self.read_response(command)
    }

    /// Read until the terminator byte or the response deadline.
    fn read_response(&mut self, command: &str) -> Result<String, LinkError> {
        let deadline = Instant::now() + self.timeout;
        let mut buf = Vec::new();
        let mut chunk = [0u8; 256];

        loop {
            match self.port.read(&mut chunk) {
                Ok(n) => {
                    buf.extend_from_slice(&chunk[..n]);
                    if let Some(end) = buf.iter().position(|&b| b == TERMINATOR) {
                        buf.truncate(end);
                        return Ok(String::from_utf8_lossy(&buf).into_owned());
                    }
                }
                Err(e) if e.kind() == std::io::ErrorKind::TimedOut => {}
                Err(e) => return Err(e.into()),
            }

            if Instant::now() >= deadline {
                return Err(LinkError::Timeout(command.to_string()));
            }
        }
    }
}

impl ControlLink for SerialLink {
    fn send(&mut self, command: &str) -> Result<(), LinkError> {
        // The board answers every command; drain the response so the next
        // round trip starts on a clean stream.
        self.round_trip(command)?;
        Ok(())
    }

    fn query(&mut self, command: &str, max_age: Option<Duration>) -> Result<Response, LinkError> {
        if let Some(age) = max_age {
            if let Some(hit) = self.cache.get(command, age) {
                debug!("cache hit for `{}`", command);
                return Ok(hit.clone());
            }
        }

        let text = self.round_trip(command)?;
        let response = parse_response(command, &text);
        self.cache.insert(command, response.clone());
        Ok(response)
    }
}

/// Turn raw response text into a keyed [`Response`].
///
/// Each non-empty line is comma-separated; the first field is the key, a
/// single trailing field becomes a scalar and several become a list. The
/// leading command echo is dropped.
pub(crate) fn parse_response(command: &str, text: &str) -> Response {
    let mut response = Response::new();
    let mut first = true;

    for raw_line in text.lines() {
        let line = raw_line.trim();
        if line.is_empty() {
            continue;
        }
        if first {
            first = false;
            if line == command {
                continue;
            }
        }

        let mut parts = line.split(',');
        let Some(key) = parts.next() else { continue };
        let rest: Vec<&str> = parts.collect();
        match rest.len() {
            0 => continue,
            1 => response.insert(key.to_string(), Value::from(rest[0])),
            _ => response.insert(key.to_string(), Value::from(rest)),
        };
    }

    response
}
