//! Controller sample - one immutable snapshot of a gamepad per tick

use serde::{Deserialize, Serialize};

/// Snapshot of a gamepad in the standard 17-button layout
///
/// Buttons and axes are index-addressed. Axes are in `-1.0..=1.0` with up and
/// left negative. A new value is produced every tick; samples are never mutated.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ControllerSample {
    pub id: String,
    pub connected: bool,
    pub buttons: Vec<bool>,
    pub axes: Vec<f32>,
    /// Milliseconds since the sampler started
    pub timestamp: f64,
}

impl ControllerSample {
    /// Pressed state of a button; out-of-range indices read as released
    pub fn button(&self, index: usize) -> bool {
        self.buttons.get(index).copied().unwrap_or(false)
    }

    /// Axis value, `None` for out-of-range indices
    pub fn axis(&self, index: usize) -> Option<f32> {
        self.axes.get(index).copied()
    }

    /// Same pad and input state, ignoring the timestamp
    pub fn same_input(&self, other: &ControllerSample) -> bool {
        self.id == other.id
            && self.connected == other.connected
            && self.buttons == other.buttons
            && self.axes == other.axes
    }

    pub fn pressed_count(&self) -> usize {
        self.buttons.iter().filter(|pressed| **pressed).count()
    }
}

/// Source of controller samples, polled once per tick
///
/// `None` means no controller is available right now.
pub trait SampleSource {
    fn sample(&mut self) -> Option<ControllerSample>;
}

impl<F> SampleSource for F
where
    F: FnMut() -> Option<ControllerSample>,
{
    fn sample(&mut self) -> Option<ControllerSample> {
        self()
    }
}
