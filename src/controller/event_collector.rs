//! Gamepad collector - reads the selected gilrs gamepad into [`ControllerSample`]s
//!
//! The collector is a statum state machine: it is created in `Initializing`,
//! picks a gamepad and transitions into `Collecting`, where it can be polled.
//! The gilrs context is bound to the thread that creates it, so the collector
//! is always constructed on the tick thread.

use super::sample::{ControllerSample, SampleSource};
use gilrs::{Axis, Button, Event, EventType, GamepadId, Gilrs};
use statum::{machine, state};
use std::time::Instant;
use tracing::{debug, error, info, warn};

/// Buttons in standard layout order; the position is the button index
const STANDARD_BUTTONS: [Button; 17] = [
    Button::South,
    Button::East,
    Button::West,
    Button::North,
    Button::LeftTrigger,
    Button::RightTrigger,
    Button::LeftTrigger2,
    Button::RightTrigger2,
    Button::Select,
    Button::Start,
    Button::LeftThumb,
    Button::RightThumb,
    Button::DPadUp,
    Button::DPadDown,
    Button::DPadLeft,
    Button::DPadRight,
    Button::Mode,
];

// Axes in standard layout order, with a flag for inverting the gilrs value.
// gilrs reports "up" as positive, the standard layout has up negative.
const STANDARD_AXES: [(Axis, bool); 4] = [
    (Axis::LeftStickX, false),
    (Axis::LeftStickY, true),
    (Axis::RightStickX, false),
    (Axis::RightStickY, true),
];

// Collector errors
#[derive(Debug, thiserror::Error)]
pub enum CollectorError {
    #[error("Failed to initialize collector: {0}")]
    InitializationError(String),
}

// Define collector states using statum's state macro
#[state]
#[derive(Debug, Clone)]
pub enum CollectionState {
    Initializing,
    Collecting,
}

#[machine]
#[derive(Debug)]
pub struct GamepadCollector<S: CollectionState> {
    // Gilrs context
    gilrs: Gilrs,

    // Active gamepad
    active_gamepad: Option<GamepadId>,

    // Position of the gamepad to use among the connected ones
    gamepad_index: usize,

    // Reference point for sample timestamps
    started: Instant,
}

// Implementation of methods available in all states
impl<S: CollectionState> GamepadCollector<S> {
    // Picks the configured gamepad, falling back to the first connected one
    fn select_gamepad(&mut self) {
        let connected: Vec<GamepadId> = self.gilrs.gamepads().map(|(id, _)| id).collect();

        if connected.is_empty() {
            if self.active_gamepad.take().is_some() {
                warn!("No gamepad connected, continuing in idle mode");
            }
            return;
        }

        let id = match connected.get(self.gamepad_index) {
            Some(id) => *id,
            None => {
                warn!(
                    "Gamepad index {} not available ({} connected), using first gamepad",
                    self.gamepad_index,
                    connected.len()
                );
                connected[0]
            }
        };

        if self.active_gamepad != Some(id) {
            let gamepad = self.gilrs.gamepad(id);
            info!("Selected gamepad: {} ({})", gamepad.name(), id);
            self.active_gamepad = Some(id);
        }
    }
}

// Implementation for Initializing state
impl GamepadCollector<Initializing> {
    pub fn create(gamepad_index: usize) -> Result<Self, CollectorError> {
        info!("Initializing gilrs controller interface");
        let gilrs = match Gilrs::new() {
            Ok(g) => {
                info!("Successfully initialized gilrs");
                g
            }
            Err(e) => {
                error!("Failed to initialize gilrs: {}", e);
                return Err(CollectorError::InitializationError(e.to_string()));
            }
        };

        debug!("Creating new GamepadCollector instance");
        Ok(Self::new(gilrs, None, gamepad_index, Instant::now()))
    }

    // Select the gamepad and transition to Collecting state
    pub fn initialize(mut self) -> GamepadCollector<Collecting> {
        let count = self.gilrs.gamepads().count();
        info!("Found {} gamepads", count);
        for (idx, (id, gamepad)) in self.gilrs.gamepads().enumerate() {
            info!("  [{}] ID: {}, Name: {}", idx, id, gamepad.name());
        }

        self.select_gamepad();
        if self.active_gamepad.is_none() {
            warn!("No gamepad connected, continuing in idle mode");
        }

        info!("Gamepad collector initialized, transitioning to Collecting state");
        self.transition()
    }
}

// Implementation for Collecting state
impl GamepadCollector<Collecting> {
    /// Builds the sample of the active gamepad, `None` when none is connected
    pub fn poll(&mut self) -> Option<ControllerSample> {
        let mut reselect = false;
        while let Some(Event { id, event, .. }) = self.gilrs.next_event() {
            match event {
                EventType::Connected => {
                    info!("Gamepad {} connected", id);
                    reselect = true;
                }
                EventType::Disconnected => {
                    info!("Gamepad {} disconnected", id);
                    reselect = true;
                }
                _ => {}
            }
        }
        if reselect || self.active_gamepad.is_none() {
            self.select_gamepad();
        }

        let id = self.active_gamepad?;
        let gamepad = self.gilrs.connected_gamepad(id)?;

        let buttons = STANDARD_BUTTONS
            .iter()
            .map(|button| gamepad.is_pressed(*button))
            .collect();
        let axes = STANDARD_AXES
            .iter()
            .map(|(axis, inverted)| {
                let value = gamepad.value(*axis);
                if *inverted {
                    -value
                } else {
                    value
                }
            })
            .collect();

        Some(ControllerSample {
            id: gamepad.name().to_string(),
            connected: gamepad.is_connected(),
            buttons,
            axes,
            timestamp: self.started.elapsed().as_secs_f64() * 1000.0,
        })
    }
}

impl SampleSource for GamepadCollector<Collecting> {
    fn sample(&mut self) -> Option<ControllerSample> {
        self.poll()
    }
}
