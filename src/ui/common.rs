//! # UI Common Components and Utilities
//!
//! Shared styling and small state types for the padmapper views.

use chrono::{DateTime, Local};
use egui::{self, Color32, Frame, Stroke};

/// Creates a styled frame with consistent visual parameters.
pub fn create_frame(bg_color: Color32, border_color: Color32) -> Frame {
    Frame::new()
        .stroke(Stroke::new(1.0, border_color))
        .fill(bg_color)
        .inner_margin(4)
        .outer_margin(2)
}

/// Centralized color palette for the dark theme.
pub struct UiColors;

impl UiColors {
    /// Primary background color for main content areas (RGB: 30, 30, 30)
    pub const MAIN_BG: Color32 = Color32::from_rgb(30, 30, 30);

    /// Secondary background color for nested components (RGB: 25, 25, 25)
    pub const INNER_BG: Color32 = Color32::from_rgb(25, 25, 25);

    /// Deepest background color, used for idle keys (RGB: 20, 20, 20)
    pub const EXTREME_BG: Color32 = Color32::from_rgb(20, 20, 20);

    /// Border color for component separation (RGB: 60, 60, 60)
    pub const BORDER: Color32 = Color32::from_rgb(60, 60, 60);

    /// Pressed keys, pressed buttons, connected controller - Green
    pub const ACTIVE: Color32 = Color32::from_rgb(50, 200, 20);

    /// Errors and unresolved entries - Red
    pub const INACTIVE: Color32 = Color32::from_rgb(200, 50, 20);

    /// Badges naming the controls bound to a key
    pub const BADGE: Color32 = Color32::from_rgb(120, 170, 255);
}

/// One-line status shown below the import controls
#[derive(Clone, Debug)]
pub struct StatusMessage {
    pub text: String,
    pub is_error: bool,
    pub at: DateTime<Local>,
}

impl StatusMessage {
    pub fn info(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_error: false,
            at: Local::now(),
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_error: true,
            at: Local::now(),
        }
    }

    pub fn show(&self, ui: &mut egui::Ui) {
        let color = if self.is_error {
            UiColors::INACTIVE
        } else {
            ui.visuals().text_color()
        };
        ui.colored_label(
            color,
            format!("[{}] {}", self.at.format("%H:%M:%S"), self.text),
        );
    }
}
