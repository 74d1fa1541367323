//! Live view of the current controller sample

use super::common::UiColors;
use crate::controller::ControllerSample;
use crate::mapping::model::BUTTON_NAMES;
use crate::mapping::translator::DEADZONE;
use egui::{self, pos2, vec2, Color32, Grid, Sense, Stroke, Ui};

const STICK_SIZE: f32 = 90.0;

pub fn render(ui: &mut Ui, sample: Option<&ControllerSample>) {
    let Some(sample) = sample else {
        ui.colored_label(UiColors::INACTIVE, "No controller connected");
        ui.label("Press any button on the gamepad to wake it up.");
        return;
    };

    ui.horizontal(|ui| {
        let status = if sample.connected {
            UiColors::ACTIVE
        } else {
            UiColors::INACTIVE
        };
        ui.colored_label(status, "●");
        ui.strong(&sample.id);
    });
    ui.label(format!(
        "{} buttons, {} axes, {} pressed, t = {:.0} ms",
        sample.buttons.len(),
        sample.axes.len(),
        sample.pressed_count(),
        sample.timestamp
    ));

    ui.add_space(6.0);
    ui.horizontal(|ui| {
        stick(ui, "L", sample.axis(0), sample.axis(1));
        stick(ui, "R", sample.axis(2), sample.axis(3));
    });

    ui.add_space(6.0);
    Grid::new("controller_buttons")
        .num_columns(6)
        .spacing(vec2(8.0, 4.0))
        .show(ui, |ui| {
            for index in 0..sample.buttons.len().max(BUTTON_NAMES.len()) {
                let name = BUTTON_NAMES
                    .get(index)
                    .map(|name| name.to_string())
                    .unwrap_or_else(|| format!("Btn{}", index));
                let color = if sample.button(index) {
                    UiColors::ACTIVE
                } else {
                    UiColors::BORDER
                };
                ui.colored_label(color, name);
                if index % 6 == 5 {
                    ui.end_row();
                }
            }
        });

    if sample.axes.len() > 4 {
        ui.add_space(6.0);
        for (index, value) in sample.axes.iter().enumerate().skip(4) {
            ui.label(format!("Axis {}: {:+.2}", index, value));
        }
    }
}

// Draws a stick as a circle with its deadzone and the current position
fn stick(ui: &mut Ui, name: &str, x: Option<f32>, y: Option<f32>) {
    ui.vertical(|ui| {
        let (response, painter) = ui.allocate_painter(vec2(STICK_SIZE, STICK_SIZE), Sense::hover());
        let rect = response.rect;
        let center = rect.center();
        let radius = STICK_SIZE / 2.0 - 4.0;

        painter.circle_filled(center, radius, UiColors::INNER_BG);
        painter.circle_stroke(center, radius, Stroke::new(1.0, UiColors::BORDER));
        painter.circle_stroke(center, radius * DEADZONE, Stroke::new(1.0, UiColors::BORDER));

        let x = x.unwrap_or(0.0).clamp(-1.0, 1.0);
        let y = y.unwrap_or(0.0).clamp(-1.0, 1.0);
        let knob = pos2(center.x + x * radius, center.y + y * radius);
        let outside = x.abs() > DEADZONE || y.abs() > DEADZONE;
        let color = if outside {
            UiColors::ACTIVE
        } else {
            Color32::GRAY
        };
        painter.line_segment([center, knob], Stroke::new(1.0, color));
        painter.circle_filled(knob, 6.0, color);

        ui.label(egui::RichText::new(format!("{} {:+.2} {:+.2}", name, x, y)).small());
    });
}
