//! Controller Handle - owns the tick loop that turns gamepad samples into active keys
//!
//! Each tick the loop polls the [`SampleSource`], reads the current mapping and
//! the physically held keys and publishes a [`ControllerFrame`]. The loop runs on
//! a dedicated thread because the gilrs context must stay on the thread that
//! created it.

use super::event_collector::{CollectorError, GamepadCollector};
use super::sample::{ControllerSample, SampleSource};
use crate::mapping::manager::MappingReceiver;
use crate::mapping::model::ActiveKeySet;
use crate::mapping::translator::compute_active_keys;
use std::thread::JoinHandle;
use std::time::{Duration, Instant};
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, trace, warn};

/// Configuration settings for the controller tick loop
#[derive(Clone, Debug)]
pub struct ControllerSettings {
    /// Tick period in milliseconds, one sample per tick
    pub tick_interval_ms: u64,

    /// Which connected gamepad to read, in connection order
    pub gamepad_index: usize,
}

impl Default for ControllerSettings {
    fn default() -> Self {
        Self {
            tick_interval_ms: 16, // roughly one display frame
            gamepad_index: 0,
        }
    }
}

/// Errors that can occur while starting the controller subsystem
#[derive(Debug, thiserror::Error)]
pub enum ControllerError {
    /// The tick thread could not be started
    #[error("Initialization error: {0}")]
    InitializationError(String),
}

/// Result of one tick
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ControllerFrame {
    /// Latest gamepad sample, `None` when no controller is available
    pub sample: Option<ControllerSample>,

    /// Physically held keys plus every key the controller activates
    pub active_keys: ActiveKeySet,
}

impl ControllerFrame {
    /// Same keys and controller state; sample timestamps are not compared
    pub fn same_state(&self, other: &ControllerFrame) -> bool {
        let same_sample = match (&self.sample, &other.sample) {
            (Some(a), Some(b)) => a.same_input(b),
            (None, None) => true,
            _ => false,
        };
        same_sample && self.active_keys == other.active_keys
    }
}

/// Handle for the running tick loop
///
/// Dropping the handle stops the loop.
pub struct ControllerHandle {
    frame_rx: watch::Receiver<ControllerFrame>,
    cancel: CancellationToken,
    thread: Option<JoinHandle<()>>,
}

impl ControllerHandle {
    /// Spawns the tick loop reading from the configured gilrs gamepad
    ///
    /// Without a usable gilrs backend the loop still runs and only publishes
    /// the physically held keys.
    pub fn spawn_gilrs(
        settings: ControllerSettings,
        mapping_rx: MappingReceiver,
        held_rx: watch::Receiver<ActiveKeySet>,
    ) -> Result<Self, ControllerError> {
        let gamepad_index = settings.gamepad_index;
        Self::spawn(
            settings,
            move || Ok(GamepadCollector::create(gamepad_index)?.initialize()),
            mapping_rx,
            held_rx,
        )
    }

    /// Spawns the tick loop with a custom sample source
    ///
    /// `make_source` runs on the tick thread. If it fails, the loop runs
    /// without a controller.
    pub fn spawn<S, F>(
        settings: ControllerSettings,
        make_source: F,
        mapping_rx: MappingReceiver,
        held_rx: watch::Receiver<ActiveKeySet>,
    ) -> Result<Self, ControllerError>
    where
        S: SampleSource,
        F: FnOnce() -> Result<S, CollectorError> + Send + 'static,
    {
        info!("Initializing controller tick loop with settings: {:?}", settings);

        let (frame_tx, frame_rx) = watch::channel(ControllerFrame::default());
        let cancel = CancellationToken::new();
        let interval = Duration::from_millis(settings.tick_interval_ms.max(1));

        let thread_cancel = cancel.clone();
        let thread = std::thread::Builder::new()
            .name("controller-tick".to_string())
            .spawn(move || {
                let mut source = match make_source() {
                    Ok(source) => Some(source),
                    Err(e) => {
                        warn!("No controller input available: {}", e);
                        None
                    }
                };

                run_tick_loop(
                    &mut source,
                    interval,
                    &mapping_rx,
                    &held_rx,
                    &frame_tx,
                    &thread_cancel,
                );
                info!("Controller tick loop stopped");
            })
            .map_err(|e| ControllerError::InitializationError(e.to_string()))?;

        info!("Controller tick loop spawned");
        Ok(Self {
            frame_rx,
            cancel,
            thread: Some(thread),
        })
    }

    pub fn subscribe(&self) -> watch::Receiver<ControllerFrame> {
        self.frame_rx.clone()
    }

    /// Latest published frame
    pub fn frame(&self) -> ControllerFrame {
        self.frame_rx.borrow().clone()
    }

    pub fn is_running(&self) -> bool {
        self.thread.as_ref().is_some_and(|thread| !thread.is_finished())
    }

    /// Stops the loop and waits for the thread; calling it again does nothing
    pub fn stop(&mut self) {
        self.cancel.cancel();
        if let Some(thread) = self.thread.take() {
            debug!("Waiting for controller tick thread");
            if thread.join().is_err() {
                error!("Controller tick thread panicked");
            }
        }
    }
}

impl Drop for ControllerHandle {
    fn drop(&mut self) {
        self.stop();
    }
}

fn run_tick_loop<S: SampleSource>(
    source: &mut Option<S>,
    interval: Duration,
    mapping_rx: &MappingReceiver,
    held_rx: &watch::Receiver<ActiveKeySet>,
    frame_tx: &watch::Sender<ControllerFrame>,
    cancel: &CancellationToken,
) {
    info!("Starting controller tick loop ({:?} per tick)", interval);

    while !cancel.is_cancelled() {
        let tick_start = Instant::now();

        let sample = source.as_mut().and_then(|source| source.sample());
        let mapping = mapping_rx.borrow().clone();
        let active_keys =
            compute_active_keys(sample.as_ref(), mapping.as_deref(), &held_rx.borrow());

        let frame = ControllerFrame {
            sample,
            active_keys,
        };
        let changed = frame_tx.send_if_modified(|current| {
            if current.same_state(&frame) {
                return false;
            }
            *current = frame;
            true
        });
        if changed {
            trace!("Published new controller frame");
        }

        std::thread::sleep(interval.saturating_sub(tick_start.elapsed()));
    }
}
