//! Sensor Context
//!
//! One context object, constructed at process startup and passed by
//! reference to every component that needs sensor access. It replaces the
//! shared-singleton shape of earlier firmware tooling with explicit,
//! single-instance ownership of the channel and the PRU gateway.

use crate::analog::Analog;
use crate::digital::Digital;
use crate::error::SensorError;
use crate::lds::{self, Lds};
use control_link::ControlLink;
use pru_gateway::Pru;
use std::sync::{Arc, Mutex};

/// Shared entry point to the sensor layer.
pub struct SensorContext<L: ControlLink> {
    link: Arc<Mutex<L>>,
    pru: Pru,
}

impl<L: ControlLink> SensorContext<L> {
    /// Bring up the sensor layer over `link`.
    ///
    /// Initializes the PRU gateway (idempotent across contexts sharing one
    /// process). If that fails, no sensor functionality can proceed and
    /// construction fails.
    pub fn new(link: L) -> Result<Self, SensorError> {
        pru_gateway::init()?;
        let pru = Pru::new()?;
        Ok(Self {
            link: Arc::new(Mutex::new(link)),
            pru,
        })
    }

    /// A per-query analog reader.
    pub fn analog(&self) -> Analog<'_, L, Pru> {
        Analog::new(&self.link, &self.pru)
    }

    /// A per-query digital reader.
    pub fn digital(&self) -> Digital<'_, L> {
        Digital::new(&self.link)
    }

    /// A new rangefinder handle. The device starts rotating immediately and
    /// stops when the handle is dropped; keep at most one handle live.
    pub fn lds(&self) -> Result<Lds<L>, SensorError> {
        Lds::new(Arc::clone(&self.link))
    }

    /// Standalone rangefinder liveness check; needs no handle and no
    /// spin-up state.
    pub fn lds_active(&self) -> Result<bool, SensorError> {
        lds::is_active(&self.link)
    }

    /// The shared channel, for wiring additional consumers.
    pub fn link(&self) -> &Arc<Mutex<L>> {
        &self.link
    }
}
