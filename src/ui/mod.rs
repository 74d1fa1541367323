//! # padmapper User Interface Module
//!
//! Renders the controller state, the on-screen keyboard with the active key
//! set and the import controls. The UI only reads: controller frames and the
//! mapping come in through `watch` channels, and the only things it writes are
//! physically held keys and import requests.
//!
//! Layout:
//! - **Top Panel**: mapping import and status line
//! - **Left Panel**: controller view and the loaded mapping entries
//! - **Central Panel**: keyboard

pub mod common;
pub mod controller_view;
pub mod keyboard_view;

use crate::controller::{
    ControllerFrame, ControllerHandle, ControllerSample, KeySource, PhysicalKeys,
};
use crate::mapping::keyboard::{code_for_key_name, is_displayed};
use crate::mapping::manager::{MappingManager, MappingReceiver, MappingSource};
use crate::mapping::model::{KeyCode, Mapping};
use crate::mapping::MappingError;
use egui::{Event, Modifiers, ScrollArea, TextEdit};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::sync::{mpsc, watch};
use tracing::{debug, error, info, warn};

use self::common::{create_frame, StatusMessage, UiColors};
use self::keyboard_view::KeyboardView;

/// Modifier flags reported by egui and the key codes they hold
const MODIFIER_KEYS: [&str; 4] = ["ShiftLeft", "ControlLeft", "AltLeft", "MetaLeft"];

// Result of an import running on the tokio runtime
struct ImportOutcome {
    path: PathBuf,
    result: Result<usize, MappingError>,
}

pub struct PadMapperUI {
    /// Tick loop, stopped when the UI is dropped
    controller: ControllerHandle,

    /// Latest tick result
    frame_rx: watch::Receiver<ControllerFrame>,

    mapping_rx: MappingReceiver,
    manager: Arc<MappingManager>,
    physical_keys: Arc<PhysicalKeys>,

    /// Runtime for file imports, the UI thread itself is not async
    runtime: Handle,
    import_tx: mpsc::Sender<ImportOutcome>,
    import_rx: mpsc::Receiver<ImportOutcome>,
    import_path: String,

    status: Option<StatusMessage>,
    keyboard_view: KeyboardView,

    /// Badge labels of the mapping they were built from
    labels: Option<(Arc<Mapping>, HashMap<KeyCode, Vec<String>>)>,
}

impl PadMapperUI {
    pub fn new(
        cc: &eframe::CreationContext<'_>,
        controller: ControllerHandle,
        manager: Arc<MappingManager>,
        physical_keys: Arc<PhysicalKeys>,
        runtime: Handle,
        initial_source: Option<MappingSource>,
    ) -> Self {
        cc.egui_ctx.set_theme(egui::Theme::Dark);

        let status = match &initial_source {
            Some(source) => StatusMessage::info(format!("Loaded mapping from {}", source)),
            None => StatusMessage::error("No mapping loaded, import one to get started"),
        };
        let (import_tx, import_rx) = mpsc::channel(8);

        Self {
            frame_rx: controller.subscribe(),
            controller,
            mapping_rx: manager.subscribe(),
            manager,
            physical_keys,
            runtime,
            import_tx,
            import_rx,
            import_path: String::new(),
            status: Some(status),
            keyboard_view: KeyboardView::default(),
            labels: None,
        }
    }

    /// Forwards window key events to the physical key set
    fn forward_physical_keys(&self, ctx: &egui::Context) {
        let typing = ctx.wants_keyboard_input();

        ctx.input(|input| {
            for event in &input.events {
                match event {
                    Event::Key {
                        key,
                        pressed,
                        repeat: false,
                        ..
                    } => {
                        let Some(code) = code_for_key_name(key.name()) else {
                            continue;
                        };
                        if !*pressed {
                            self.physical_keys.key_up(KeySource::Keyboard, &code);
                        } else if !typing {
                            self.physical_keys.key_down(KeySource::Keyboard, code);
                        }
                    }
                    Event::WindowFocused(false) => {
                        debug!("Window lost focus, releasing held keys");
                        self.physical_keys.release_all(KeySource::Keyboard);
                    }
                    _ => {}
                }
            }

            sync_modifiers(&self.physical_keys, input.modifiers, typing);
        });
    }

    fn start_import(&mut self) {
        let path = PathBuf::from(self.import_path.trim());
        if path.as_os_str().is_empty() {
            self.status = Some(StatusMessage::error("Enter the path of a mapping file"));
            return;
        }

        info!("Requesting import of {}", path.display());
        let manager = self.manager.clone();
        let tx = self.import_tx.clone();
        self.runtime.spawn(async move {
            let result = manager.import_file(&path).await.map(|mapping| mapping.len());
            if tx.send(ImportOutcome { path, result }).await.is_err() {
                error!("Failed to report import result, UI is gone");
            }
        });
    }

    fn forget_import(&mut self) {
        let manager = self.manager.clone();
        self.runtime.spawn(async move {
            manager.forget_import().await;
        });
        self.status = Some(StatusMessage::info(
            "Saved import removed, the next start uses the configured mapping file",
        ));
    }

    fn poll_imports(&mut self) {
        while let Ok(outcome) = self.import_rx.try_recv() {
            self.status = Some(match outcome.result {
                Ok(count) => StatusMessage::info(format!(
                    "Imported {} ({} entries)",
                    MappingSource::Imported(outcome.path),
                    count
                )),
                Err(e) => {
                    warn!("Import failed: {}", e);
                    StatusMessage::error(format!(
                        "Import of {} failed, keeping current mapping: {}",
                        outcome.path.display(),
                        e
                    ))
                }
            });
        }
    }

    fn current_labels(
        &mut self,
        mapping: Option<&Arc<Mapping>>,
    ) -> HashMap<KeyCode, Vec<String>> {
        let Some(mapping) = mapping else {
            self.labels = None;
            return HashMap::new();
        };

        if let Some((built_from, labels)) = &self.labels {
            if Arc::ptr_eq(built_from, mapping) {
                return labels.clone();
            }
        }

        let labels = mapping.labels_by_key();
        self.labels = Some((mapping.clone(), labels.clone()));
        labels
    }

    fn render_import(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            ui.heading("padmapper");
            ui.add(
                TextEdit::singleline(&mut self.import_path)
                    .hint_text("path/to/mapping.json")
                    .desired_width(320.0),
            );
            if ui.button("Import").clicked() {
                self.start_import();
            }
            if ui.button("Forget import").clicked() {
                self.forget_import();
            }
        });
        if let Some(status) = &self.status {
            status.show(ui);
        }
    }

    fn render_mapping(
        ui: &mut egui::Ui,
        mapping: Option<&Arc<Mapping>>,
        sample: Option<&ControllerSample>,
    ) {
        let Some(mapping) = mapping else {
            ui.label("No mapping loaded");
            return;
        };

        ui.label(format!("{} entries", mapping.len()));
        ScrollArea::vertical().show(ui, |ui| {
            egui::Grid::new("mapping_entries")
                .striped(true)
                .num_columns(3)
                .show(ui, |ui| {
                    for entry in mapping.entries() {
                        match entry.gamepad.resolve() {
                            Some(control) => {
                                let text = format!("{} ({})", entry.gamepad, control.badge());
                                if sample.is_some_and(|sample| control.is_active(sample)) {
                                    ui.colored_label(UiColors::ACTIVE, text)
                                } else {
                                    ui.label(text)
                                }
                            }
                            None => ui.colored_label(
                                UiColors::INACTIVE,
                                format!("{} ?", entry.gamepad),
                            ),
                        };
                        if is_displayed(entry.keyboard.as_str()) {
                            ui.label(entry.keyboard.as_str());
                        } else {
                            ui.label(format!("{} (not on keyboard)", entry.keyboard))
                                .on_hover_text("This key has no place on the on-screen keyboard");
                        }
                        ui.label(entry.action.as_deref().unwrap_or(""));
                        ui.end_row();
                    }
                });
        });
    }
}

impl eframe::App for PadMapperUI {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        ctx.request_repaint_after(Duration::from_millis(16));

        self.forward_physical_keys(ctx);
        self.poll_imports();

        let frame = self.frame_rx.borrow().clone();
        let mapping = self.mapping_rx.borrow().clone();
        let labels = self.current_labels(mapping.as_ref());

        egui::TopBottomPanel::top("top_panel")
            .frame(create_frame(UiColors::MAIN_BG, UiColors::BORDER))
            .show(ctx, |ui| self.render_import(ui));

        egui::SidePanel::left("controller_panel")
            .resizable(true)
            .default_width(300.0)
            .frame(create_frame(UiColors::INNER_BG, UiColors::BORDER))
            .show(ctx, |ui| {
                ui.heading("Controller");
                if !self.controller.is_running() {
                    ui.colored_label(UiColors::INACTIVE, "Controller loop stopped");
                }
                controller_view::render(ui, frame.sample.as_ref());
                ui.separator();
                ui.heading("Mapping");
                Self::render_mapping(ui, mapping.as_ref(), frame.sample.as_ref());
            });

        egui::CentralPanel::default()
            .frame(create_frame(UiColors::MAIN_BG, UiColors::BORDER))
            .show(ctx, |ui| {
                ui.heading("Keyboard");
                self.keyboard_view
                    .render(ui, &frame.active_keys, &labels, &self.physical_keys);
            });
    }
}

/// Mirrors egui's modifier flags into the keyboard-held keys
///
/// Only the keyboard set is touched, so modifiers held with the mouse on the
/// on-screen keyboard stay down.
fn sync_modifiers(physical_keys: &PhysicalKeys, modifiers: Modifiers, typing: bool) {
    let flags = [modifiers.shift, modifiers.ctrl, modifiers.alt, modifiers.mac_cmd];
    for (code, held) in MODIFIER_KEYS.into_iter().zip(flags) {
        if held && !typing {
            physical_keys.key_down(KeySource::Keyboard, KeyCode::from(code));
        } else if !held {
            physical_keys.key_up(KeySource::Keyboard, &KeyCode::from(code));
        }
    }
}
