//! On-screen keyboard showing the active key set
//!
//! Every key that is active (physically held, clicked, or triggered by the
//! controller) is highlighted. Keys bound in the mapping carry small badges
//! naming the controls that trigger them.

use super::common::UiColors;
use crate::controller::{KeySource, PhysicalKeys};
use crate::mapping::keyboard::{key_label, key_width, ARROW_KEYS, KEYBOARD_ROWS};
use crate::mapping::model::{ActiveKeySet, KeyCode};
use egui::{self, vec2, Button, RichText, Ui};
use std::collections::HashMap;
use tracing::debug;

/// Widest row measured in key units, plus room for spacing
const ROW_UNITS: f32 = 16.0;
const KEY_HEIGHT: f32 = 42.0;

#[derive(Default)]
pub struct KeyboardView {
    // Key currently held down with the mouse, tracked apart from the real keyboard
    mouse_key: Option<KeyCode>,
}

impl KeyboardView {
    pub fn render(
        &mut self,
        ui: &mut Ui,
        active: &ActiveKeySet,
        labels: &HashMap<KeyCode, Vec<String>>,
        physical_keys: &PhysicalKeys,
    ) {
        let unit = (ui.available_width() / ROW_UNITS).max(18.0);
        let mut pressed_now: Option<KeyCode> = None;

        ui.vertical(|ui| {
            for row in KEYBOARD_ROWS {
                ui.horizontal(|ui| {
                    for code in row {
                        if self.key(ui, code, unit, active, labels) {
                            pressed_now = Some(KeyCode::from(*code));
                        }
                    }
                });
            }

            ui.add_space(6.0);
            ui.horizontal(|ui| {
                for code in ARROW_KEYS {
                    if self.key(ui, code, unit, active, labels) {
                        pressed_now = Some(KeyCode::from(code));
                    }
                }
            });
        });

        self.update_mouse_key(pressed_now, physical_keys);
    }

    // Draws one key; returns true while the mouse holds it down
    fn key(
        &self,
        ui: &mut Ui,
        code: &str,
        unit: f32,
        active: &ActiveKeySet,
        labels: &HashMap<KeyCode, Vec<String>>,
    ) -> bool {
        let is_active = active.contains(code);
        let badges = labels.get(code).filter(|badges| !badges.is_empty());

        let mut text = RichText::new(key_label(code));
        if is_active {
            text = text.color(egui::Color32::BLACK).strong();
        }

        let fill = if is_active {
            UiColors::ACTIVE
        } else {
            UiColors::EXTREME_BG
        };

        let size = vec2(unit * key_width(code) - 4.0, KEY_HEIGHT);
        let response = ui
            .vertical(|ui| {
                let response = ui.add(Button::new(text).fill(fill).min_size(size));
                let badge_text = badges.map(|b| b.join(" ")).unwrap_or_default();
                ui.add_sized(
                    vec2(size.x, 12.0),
                    egui::Label::new(RichText::new(badge_text).small().color(UiColors::BADGE))
                        .truncate(),
                );
                response
            })
            .inner;

        response.is_pointer_button_down_on()
    }

    fn update_mouse_key(&mut self, pressed_now: Option<KeyCode>, physical_keys: &PhysicalKeys) {
        if self.mouse_key == pressed_now {
            return;
        }
        if let Some(previous) = self.mouse_key.take() {
            debug!("Mouse released key {}", previous);
            physical_keys.key_up(KeySource::Mouse, &previous);
        }
        if let Some(code) = pressed_now {
            debug!("Mouse pressed key {}", code);
            physical_keys.key_down(KeySource::Mouse, code.clone());
            self.mouse_key = Some(code);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mouse_release_does_not_drop_keyboard_key() {
        let keys = PhysicalKeys::new();
        let mut view = KeyboardView::default();

        keys.key_down(KeySource::Keyboard, KeyCode::from("KeyW"));
        view.update_mouse_key(Some(KeyCode::from("KeyW")), &keys);
        view.update_mouse_key(None, &keys);

        assert!(keys.snapshot().contains("KeyW"));
        assert_eq!(view.mouse_key, None);
    }

    #[test]
    fn mouse_press_moves_between_keys() {
        let keys = PhysicalKeys::new();
        let mut view = KeyboardView::default();

        view.update_mouse_key(Some(KeyCode::from("ShiftLeft")), &keys);
        view.update_mouse_key(Some(KeyCode::from("ShiftLeft")), &keys);
        assert!(keys.snapshot().contains("ShiftLeft"));

        view.update_mouse_key(Some(KeyCode::from("KeyQ")), &keys);
        let held = keys.snapshot();
        assert!(held.contains("KeyQ") && !held.contains("ShiftLeft"));

        view.update_mouse_key(None, &keys);
        assert!(keys.snapshot().is_empty());
    }
}
