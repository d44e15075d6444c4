//! Laser Distance Sensor: Handle and Spin-Up Synchronization

use crate::error::SensorError;
use crate::fields;
use crate::lock;
use crate::scan::{parse_scan, LaserScan, ParsedScan};
use control_link::{cmd, ControlLink};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing::{info, warn};

/// Laser supply voltage field in the `GetMotors` response
const LASER_VOLTAGE_KEY: &str = "Laser_mVolts";

/// Minimum interval between spin-up poll attempts
const SPINUP_POLL: Duration = Duration::from_millis(10);

/// Handle to the rotating laser distance sensor.
///
/// Constructing the handle commands the device to rotate; dropping it
/// commands the device to stop, on every exit path. Only one handle should
/// own the device's power state at a time: a second live handle leaves the
/// device commanded on by both, and dropping either turns it off.
pub struct Lds<L: ControlLink> {
    link: Arc<Mutex<L>>,
    ready: bool,
    poll: Duration,
    on_error: Option<Box<dyn FnMut(u16, u32) + Send>>,
}

impl<L: ControlLink> Lds<L> {
    /// Start the device rotating and return its handle.
    pub fn new(link: Arc<Mutex<L>>) -> Result<Self, SensorError> {
        lock(&link).send(cmd::SET_LDS_ROTATION_ON)?;
        Ok(Self {
            link,
            ready: false,
            poll: SPINUP_POLL,
            on_error: None,
        })
    }

    /// Override the spin-up poll interval (mainly for tests).
    pub fn poll_interval(mut self, poll: Duration) -> Self {
        self.poll = poll;
        self
    }

    /// Install a diagnostic hook invoked with `(raw_angle, error_code)` for
    /// every reading the parser drops.
    pub fn with_error_hook(mut self, hook: impl FnMut(u16, u32) + Send + 'static) -> Self {
        self.on_error = Some(Box::new(hook));
        self
    }

    /// Whether the spin-up monitor has already seen a valid multi-point scan
    pub fn is_ready(&self) -> bool {
        self.ready
    }

    /// A parsed, angle-normalized scan.
    ///
    /// The first call blocks until the device produces a valid multi-point
    /// scan. There is no internal timeout: a sensor that never spins can
    /// never serve meaningful data, so callers needing bounded latency must
    /// run this on a worker they can abandon. Once ready, calls return at
    /// protocol speed. `max_age` bounds how stale a cached response may be;
    /// omit it to force a device round-trip.
    pub fn get_scan(&mut self, max_age: Option<Duration>) -> Result<LaserScan, SensorError> {
        self.spin_up()?;
        Ok(self.fetch(max_age)?.scan)
    }

    /// The rotation speed reported by the device, or 0.0 while the
    /// rangefinder is inactive. Does not wait for spin-up.
    pub fn rotation_speed(&mut self) -> Result<f64, SensorError> {
        if !is_active(&self.link)? {
            return Ok(0.0);
        }
        Ok(self.fetch(None)?.rotation_speed)
    }

    /// Block until the device has produced at least one valid multi-point
    /// scan, then remember readiness for the lifetime of the handle.
    fn spin_up(&mut self) -> Result<(), SensorError> {
        if self.ready {
            return Ok(());
        }

        info!("waiting for LDS spin-up");
        loop {
            std::thread::sleep(self.poll);

            // Readiness needs a fresh look at the device, never the cache.
            let parsed = self.fetch(None)?;
            if parsed.scan.len() > 1 {
                break;
            }
        }
        self.ready = true;
        info!("LDS ready");
        Ok(())
    }

    fn fetch(&mut self, max_age: Option<Duration>) -> Result<ParsedScan, SensorError> {
        let raw = lock(&self.link).query(cmd::GET_LDS_SCAN, max_age)?;
        match self.on_error.as_mut() {
            Some(hook) => parse_scan(&raw, |angle, code| hook(angle, code)),
            None => parse_scan(&raw, |_, _| {}),
        }
    }
}

impl<L: ControlLink> Drop for Lds<L> {
    fn drop(&mut self) {
        if let Err(e) = lock(&self.link).send(cmd::SET_LDS_ROTATION_OFF) {
            warn!("failed to stop LDS rotation: {}", e);
        }
    }
}

/// Whether the rangefinder is powered and transmitting, judged from the
/// laser supply voltage in the motor status block.
///
/// Standalone on purpose: it needs no [`Lds`] handle and no spin-up state.
pub fn is_active<L: ControlLink>(link: &Mutex<L>) -> Result<bool, SensorError> {
    let motors = lock(link).query(cmd::GET_MOTORS, None)?;
    let mvolts = fields::scalar_u32(&motors, cmd::GET_MOTORS, LASER_VOLTAGE_KEY)?;
    Ok(mvolts != 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use control_link::MockLink;

    const EMPTY_SCAN: &str = "GetLDSScan\n\
                              AngleInDegrees,DistInMM,Intensity,Quality,ErrorCode\n\
                              ROTATION_SPEED,2.40\n";
    const ONE_POINT_SCAN: &str = "GetLDSScan\n\
                                  ROTATION_SPEED,4.10\n\
                                  0,1000,40,0,0\n";
    const TWO_POINT_SCAN: &str = "GetLDSScan\n\
                                  ROTATION_SPEED,5.12\n\
                                  0,1000,40,0,0\n\
                                  180,750,35,0,0\n";

    fn shared(link: MockLink) -> Arc<Mutex<MockLink>> {
        Arc::new(Mutex::new(link))
    }

    fn fast(lds: Lds<MockLink>) -> Lds<MockLink> {
        lds.poll_interval(Duration::from_millis(1))
    }

    #[test]
    fn test_new_sends_rotation_on() {
        let link = shared(MockLink::new());
        let _lds = Lds::new(Arc::clone(&link)).unwrap();
        assert_eq!(lock(&link).sent(), [cmd::SET_LDS_ROTATION_ON.to_string()]);
    }

    #[test]
    fn test_drop_sends_rotation_off() {
        let link = shared(MockLink::new());
        let lds = Lds::new(Arc::clone(&link)).unwrap();
        drop(lds);
        assert_eq!(
            lock(&link).sent(),
            [
                cmd::SET_LDS_ROTATION_ON.to_string(),
                cmd::SET_LDS_ROTATION_OFF.to_string(),
            ]
        );
    }

    #[test]
    fn test_spin_up_waits_for_multi_point_scan() {
        let mut mock = MockLink::new();
        mock.script_text(cmd::GET_LDS_SCAN, EMPTY_SCAN);
        mock.script_text(cmd::GET_LDS_SCAN, ONE_POINT_SCAN);
        mock.script_text(cmd::GET_LDS_SCAN, TWO_POINT_SCAN);
        let link = shared(mock);

        let mut lds = fast(Lds::new(Arc::clone(&link)).unwrap());
        assert!(!lds.is_ready());

        let scan = lds.get_scan(Some(Duration::from_secs(60))).unwrap();
        assert!(lds.is_ready());
        assert_eq!(scan.len(), 2);
        assert!(scan.get(90).is_some());

        // Three fresh spin-up polls, then the caller's staleness-bounded
        // fetch.
        let guard = lock(&link);
        let queries = guard.queries();
        assert_eq!(guard.query_count(cmd::GET_LDS_SCAN), 4);
        assert!(queries[..3].iter().all(|(_, age)| age.is_none()));
        assert_eq!(queries[3].1, Some(Duration::from_secs(60)));
    }

    #[test]
    fn test_ready_is_memoized_even_for_empty_scans() {
        let mut mock = MockLink::new();
        mock.script_text(cmd::GET_LDS_SCAN, TWO_POINT_SCAN);
        mock.script_text(cmd::GET_LDS_SCAN, EMPTY_SCAN);
        let link = shared(mock);

        let mut lds = fast(Lds::new(Arc::clone(&link)).unwrap());
        lds.get_scan(None).unwrap();
        assert!(lds.is_ready());

        // The device momentarily reports nothing valid; the call must still
        // return immediately with an empty scan instead of re-entering the
        // wait loop.
        let scan = lds.get_scan(None).unwrap();
        assert!(scan.is_empty());
        assert!(lds.is_ready());
        assert_eq!(lock(&link).query_count(cmd::GET_LDS_SCAN), 3);
    }

    #[test]
    fn test_spin_up_propagates_channel_errors() {
        let link = shared(MockLink::new());
        let mut lds = fast(Lds::new(Arc::clone(&link)).unwrap());
        let err = lds.get_scan(None).unwrap_err();
        assert!(matches!(err, SensorError::Channel(_)));
    }

    #[test]
    fn test_error_hook_sees_dropped_angles() {
        let mut mock = MockLink::new();
        mock.script_text(
            cmd::GET_LDS_SCAN,
            "GetLDSScan\n\
             ROTATION_SPEED,5.12\n\
             0,1000,40,0,0\n\
             1,0,0,0,8021\n\
             2,990,39,0,0\n",
        );
        let link = shared(mock);

        let dropped = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&dropped);
        let mut lds = fast(
            Lds::new(Arc::clone(&link))
                .unwrap()
                .with_error_hook(move |angle, code| lock(&sink).push((angle, code))),
        );

        lds.get_scan(None).unwrap();
        assert_eq!(*lock(&dropped), [(1, 8021)]);
    }

    #[test]
    fn test_rotation_speed_zero_when_inactive() {
        let mut mock = MockLink::new();
        mock.script_text(cmd::GET_MOTORS, "GetMotors\nLaser_mVolts,0\n");
        let link = shared(mock);

        let mut lds = Lds::new(Arc::clone(&link)).unwrap();
        assert_eq!(lds.rotation_speed().unwrap(), 0.0);
        // Inactive means no scan query at all.
        assert_eq!(lock(&link).query_count(cmd::GET_LDS_SCAN), 0);
    }

    #[test]
    fn test_rotation_speed_when_active() {
        let mut mock = MockLink::new();
        mock.script_text(cmd::GET_MOTORS, "GetMotors\nLaser_mVolts,1200\n");
        mock.script_text(cmd::GET_LDS_SCAN, TWO_POINT_SCAN);
        let link = shared(mock);

        let mut lds = Lds::new(Arc::clone(&link)).unwrap();
        assert_eq!(lds.rotation_speed().unwrap(), 5.12);
        // The speed query bypasses the spin-up monitor.
        assert!(!lds.is_ready());
    }

    #[test]
    fn test_is_active_standalone() {
        let mut mock = MockLink::new();
        mock.script_text(cmd::GET_MOTORS, "GetMotors\nLaser_mVolts,0\n");
        mock.script_text(cmd::GET_MOTORS, "GetMotors\nLaser_mVolts,1200\n");
        let link = Mutex::new(mock);

        assert!(!is_active(&link).unwrap());
        assert!(is_active(&link).unwrap());
    }
}
