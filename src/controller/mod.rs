//! Controller subsystem for gamepad input handling
//!
//! 1. [`event_collector`] - Reads the selected gamepad into samples
//! 2. [`controller_handle`] - Tick loop and lifecycle management
//! 3. [`physical_keys`] - Keys held on the real keyboard
//!
//! # Architecture
//!
//! ```text
//! Gamepad ──► Collector ──► Tick loop ──► ControllerFrame
//!                            ▲      ▲
//!                      Mapping      PhysicalKeys
//! ```

pub mod controller_handle;
pub mod event_collector;
pub mod physical_keys;
pub mod sample;

pub use controller_handle::{ControllerError, ControllerFrame, ControllerHandle, ControllerSettings};
pub use event_collector::{CollectorError, GamepadCollector};
pub use physical_keys::{KeySource, PhysicalKeys};
pub use sample::{ControllerSample, SampleSource};
