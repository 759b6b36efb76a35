//! Native pointer source backed by `device_query`.
//!
//! `device_query` reads the global cursor position and button state directly
//! from the OS (X11, Win32, or CoreGraphics) without installing hooks or
//! owning a window.  A dedicated thread polls it at a fixed cadence and
//! diffs consecutive readings into [`RawInputEvent`]s:
//!
//! - position changed → `MouseMove`
//! - a button flipped → `MouseButtonDown` / `MouseButtonUp` at the current position
//!
//! Buttons that flip and flip back between two polls are not observed; the
//! default 8 ms cadence is well below the duration of a human click.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Sender};
use std::sync::{Arc, Mutex, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use device_query::{DeviceQuery, DeviceState, MouseState};
use tracing::{debug, info, warn};

use super::{CaptureError, InputSource, MouseButton, RawInputEvent};

/// Polling interval used when none is configured.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(8);

/// One reading of the global pointer.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub(crate) struct PointerReading {
    pub coords: (i32, i32),
    /// Indexed by platform button number; index 0 is unused.
    pub buttons: Vec<bool>,
}

impl From<MouseState> for PointerReading {
    fn from(state: MouseState) -> Self {
        Self {
            coords: state.coords,
            buttons: state.button_pressed,
        }
    }
}

/// Appends the events that explain the change from `prev` to `next`.
///
/// The move (if any) comes first so that a click is reported at the position
/// the pointer had when the button changed.
pub(crate) fn diff_readings(prev: &PointerReading, next: &PointerReading, out: &mut Vec<RawInputEvent>) {
    let (x, y) = next.coords;
    if prev.coords != next.coords {
        out.push(RawInputEvent::MouseMove { x, y });
    }

    for (number, &pressed) in next.buttons.iter().enumerate() {
        let was_pressed = prev.buttons.get(number).copied().unwrap_or(false);
        if pressed == was_pressed {
            continue;
        }
        let Some(button) = MouseButton::from_number(number) else {
            continue;
        };
        out.push(if pressed {
            RawInputEvent::MouseButtonDown { button, x, y }
        } else {
            RawInputEvent::MouseButtonUp { button, x, y }
        });
    }
}

/// Something that can be asked for the current pointer reading.
pub(crate) trait PointerDevice {
    fn read(&self) -> PointerReading;
}

impl PointerDevice for DeviceState {
    fn read(&self) -> PointerReading {
        PointerReading::from(self.get_mouse())
    }
}

/// Polling pointer source.
///
/// `stop()` clears the running flag and joins the polling thread, so when it
/// returns the thread has exited and the event channel is closed.
pub struct DeviceQueryInputSource {
    poll_interval: Duration,
    running: Arc<AtomicBool>,
    worker: Mutex<Option<JoinHandle<()>>>,
}

impl DeviceQueryInputSource {
    /// Creates an unstarted source that polls every `poll_interval`.
    pub fn new(poll_interval: Duration) -> Self {
        Self {
            poll_interval,
            running: Arc::new(AtomicBool::new(false)),
            worker: Mutex::new(None),
        }
    }

    /// Starts polling a device produced by `open` on the polling thread.
    ///
    /// Returns only after the thread has reported whether `open` succeeded,
    /// so an unusable device is an error here rather than a silently closed
    /// channel later.
    pub(crate) fn start_with<D, F>(
        &self,
        open: F,
    ) -> Result<mpsc::Receiver<RawInputEvent>, CaptureError>
    where
        D: PointerDevice,
        F: FnOnce() -> Option<D> + Send + 'static,
    {
        let mut worker = self.worker.lock().unwrap_or_else(PoisonError::into_inner);
        if worker.is_some() {
            return Err(CaptureError::AlreadyStarted);
        }

        let (tx, rx) = mpsc::channel();
        let (ready_tx, ready_rx) = mpsc::sync_channel::<bool>(1);
        self.running.store(true, Ordering::SeqCst);

        let running = Arc::clone(&self.running);
        let interval = self.poll_interval;
        let handle = thread::Builder::new()
            .name("karbon-pointer-poll".to_string())
            .spawn(move || {
                // The platform connection stays on the thread that uses it.
                let Some(device) = open() else {
                    let _ = ready_tx.send(false);
                    return;
                };
                let _ = ready_tx.send(true);
                run_poll_loop(&device, tx, running, interval);
            })
            .map_err(|e| {
                self.running.store(false, Ordering::SeqCst);
                CaptureError::SpawnFailed(e)
            })?;

        // A closed handshake channel means `open` panicked.
        if !ready_rx.recv().unwrap_or(false) {
            self.running.store(false, Ordering::SeqCst);
            let _ = handle.join();
            warn!("global pointer state is unavailable");
            return Err(CaptureError::Unavailable);
        }

        *worker = Some(handle);
        info!("pointer capture started (poll interval {:?})", interval);
        Ok(rx)
    }
}

impl Default for DeviceQueryInputSource {
    fn default() -> Self {
        Self::new(DEFAULT_POLL_INTERVAL)
    }
}

impl InputSource for DeviceQueryInputSource {
    fn start(&self) -> Result<mpsc::Receiver<RawInputEvent>, CaptureError> {
        self.start_with(DeviceState::checked_new)
    }

    fn stop(&self) {
        self.running.store(false, Ordering::SeqCst);
        let handle = self
            .worker
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(handle) = handle {
            if handle.join().is_err() {
                warn!("pointer polling thread panicked");
            }
            info!("pointer capture stopped");
        }
    }
}

impl Drop for DeviceQueryInputSource {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Body of the polling thread once the device is open.
fn run_poll_loop<D: PointerDevice>(
    device: &D,
    tx: Sender<RawInputEvent>,
    running: Arc<AtomicBool>,
    interval: Duration,
) {
    let mut last = device.read();
    let mut pending = Vec::with_capacity(4);

    while running.load(Ordering::SeqCst) {
        thread::sleep(interval);

        let current = device.read();
        diff_readings(&last, &current, &mut pending);
        last = current;

        for event in pending.drain(..) {
            if tx.send(event).is_err() {
                debug!("pointer event receiver dropped; polling thread exiting");
                return;
            }
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn reading(x: i32, y: i32, pressed: &[usize]) -> PointerReading {
        let mut buttons = vec![false; 6];
        for &n in pressed {
            buttons[n] = true;
        }
        PointerReading {
            coords: (x, y),
            buttons,
        }
    }

    #[test]
    fn test_diff_identical_readings_emits_nothing() {
        let mut out = Vec::new();
        diff_readings(&reading(5, 5, &[]), &reading(5, 5, &[]), &mut out);
        assert!(out.is_empty());
    }

    #[test]
    fn test_diff_position_change_emits_move() {
        let mut out = Vec::new();
        diff_readings(&reading(5, 5, &[]), &reading(-20, 7, &[]), &mut out);
        assert_eq!(out, vec![RawInputEvent::MouseMove { x: -20, y: 7 }]);
    }

    #[test]
    fn test_diff_left_press_emits_button_down_at_current_position() {
        let mut out = Vec::new();
        diff_readings(&reading(5, 5, &[]), &reading(5, 5, &[1]), &mut out);
        assert_eq!(
            out,
            vec![RawInputEvent::MouseButtonDown {
                button: MouseButton::Left,
                x: 5,
                y: 5
            }]
        );
    }

    #[test]
    fn test_diff_move_and_release_orders_move_first() {
        // Arrange
        let prev = reading(0, 0, &[2]);
        let next = reading(10, 10, &[]);
        let mut out = Vec::new();

        // Act
        diff_readings(&prev, &next, &mut out);

        // Assert
        assert_eq!(
            out,
            vec![
                RawInputEvent::MouseMove { x: 10, y: 10 },
                RawInputEvent::MouseButtonUp {
                    button: MouseButton::Right,
                    x: 10,
                    y: 10
                },
            ]
        );
    }

    #[test]
    fn test_diff_ignores_unknown_button_numbers() {
        let mut prev = reading(0, 0, &[]);
        prev.buttons.push(false);
        let mut next = prev.clone();
        next.buttons[6] = true;

        let mut out = Vec::new();
        diff_readings(&prev, &next, &mut out);

        assert!(out.is_empty());
    }

    #[test]
    fn test_diff_handles_shorter_previous_button_vector() {
        let prev = PointerReading {
            coords: (1, 1),
            buttons: Vec::new(),
        };
        let mut out = Vec::new();
        diff_readings(&prev, &reading(1, 1, &[3]), &mut out);
        assert_eq!(
            out,
            vec![RawInputEvent::MouseButtonDown {
                button: MouseButton::Middle,
                x: 1,
                y: 1
            }]
        );
    }

    /// Replays fixed readings, then repeats the last one.
    struct ScriptedDevice {
        readings: Mutex<Vec<PointerReading>>,
    }

    impl ScriptedDevice {
        fn new(mut readings: Vec<PointerReading>) -> Self {
            readings.reverse();
            Self {
                readings: Mutex::new(readings),
            }
        }
    }

    impl PointerDevice for ScriptedDevice {
        fn read(&self) -> PointerReading {
            let mut readings = self.readings.lock().unwrap();
            if readings.len() > 1 {
                readings.pop().unwrap()
            } else {
                readings.last().cloned().unwrap_or_default()
            }
        }
    }

    #[test]
    fn test_start_reports_unavailable_device_as_error() {
        // Arrange
        let source = DeviceQueryInputSource::new(Duration::from_millis(1));

        // Act
        let result = source.start_with(|| None::<ScriptedDevice>);

        // Assert
        assert!(matches!(result, Err(CaptureError::Unavailable)));
        assert!(!source.running.load(Ordering::SeqCst));
    }

    #[test]
    fn test_start_reports_panicking_device_as_unavailable() {
        let source = DeviceQueryInputSource::new(Duration::from_millis(1));

        let result = source.start_with(|| -> Option<ScriptedDevice> { panic!("no display") });

        assert!(matches!(result, Err(CaptureError::Unavailable)));
    }

    #[test]
    fn test_failed_start_can_be_retried() {
        // Arrange
        let source = DeviceQueryInputSource::new(Duration::from_millis(1));
        let _ = source.start_with(|| None::<ScriptedDevice>);

        // Act
        let rx = source
            .start_with(|| Some(ScriptedDevice::new(vec![reading(0, 0, &[])])))
            .expect("retry after an unavailable device should start");
        source.stop();

        // Assert
        assert!(rx.recv_timeout(Duration::from_secs(1)).is_err());
    }

    #[test]
    fn test_started_source_emits_diffed_events_until_stopped() {
        // Arrange
        let source = DeviceQueryInputSource::new(Duration::from_millis(1));
        let script = vec![
            reading(0, 0, &[]),
            reading(3, 4, &[]),
            reading(3, 4, &[1]),
        ];

        // Act
        let rx = source
            .start_with(move || Some(ScriptedDevice::new(script)))
            .expect("scripted device should start");
        let first = rx.recv_timeout(Duration::from_secs(1));
        let second = rx.recv_timeout(Duration::from_secs(1));
        source.stop();

        // Assert
        assert_eq!(first, Ok(RawInputEvent::MouseMove { x: 3, y: 4 }));
        assert_eq!(
            second,
            Ok(RawInputEvent::MouseButtonDown {
                button: MouseButton::Left,
                x: 3,
                y: 4
            })
        );
        assert!(matches!(
            source.start_with(|| None::<ScriptedDevice>),
            Err(CaptureError::Unavailable)
        ));
    }

    #[test]
    fn test_unavailable_error_message_names_the_cause() {
        let message = CaptureError::Unavailable.to_string();
        assert!(message.contains("unavailable"));
        assert!(message.contains("permission"));
    }

    #[test]
    fn test_stop_without_start_is_noop() {
        let source = DeviceQueryInputSource::default();
        source.stop();
        source.stop();
    }
}
