use crate::debug::{DebugCommand, DebugObserver};
use crate::settings::{DisplaySettings, UiSettings};
use std::collections::BTreeMap;

#[derive(Debug, Default)]
struct FolderState {
    actions: Vec<String>,
    current: Option<String>,
}

/// Debug overlay: one window per folder with a play button per action.
/// Clicks are queued as commands for the engine to apply.
#[derive(Debug, Default)]
pub struct DebugPanel {
    folders: BTreeMap<String, FolderState>,
    commands: Vec<DebugCommand>,
    clipboard: Option<String>,
}

impl DebugPanel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn actions(&self, folder: &str) -> &[String] {
        self.folders
            .get(folder)
            .map(|f| f.actions.as_slice())
            .unwrap_or_default()
    }

    pub fn current(&self, folder: &str) -> Option<&str> {
        self.folders.get(folder)?.current.as_deref()
    }

    pub fn request_play(&mut self, folder: &str, name: &str) {
        self.commands.push(DebugCommand::Play {
            folder: folder.to_string(),
            name: name.to_string(),
        });
    }

    pub fn request_camera_reset(&mut self) {
        self.commands.push(DebugCommand::ResetCamera);
    }

    pub fn take_commands(&mut self) -> Vec<DebugCommand> {
        std::mem::take(&mut self.commands)
    }

    /// Queues `text` for the system clipboard; it is handed to egui on the next `show`.
    pub fn copy_to_clipboard(&mut self, text: String) {
        self.clipboard = Some(text);
    }

    pub fn show(
        &mut self,
        ctx: &egui::Context,
        ui_settings: &mut UiSettings,
        display: &mut DisplaySettings,
    ) {
        if let Some(text) = self.clipboard.take() {
            ctx.copy_text(text);
        }

        egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
            ui.horizontal_wrapped(|ui| {
                ui.label("📋 Windows:");
                if ui
                    .button(if ui_settings.show_fox_panel {
                        "✅ Fox"
                    } else {
                        "⬜ Fox"
                    })
                    .clicked()
                {
                    ui_settings.show_fox_panel = !ui_settings.show_fox_panel;
                    ui_settings.save();
                }

                ui.separator();
                ui.label("👁 Show:");
                let mut changed = false;
                changed |= ui.checkbox(&mut display.show_grid, "Grid").changed();
                changed |= ui.checkbox(&mut display.show_bounding_box, "Bounds").changed();
                changed |= ui.checkbox(&mut display.show_sun, "Sun").changed();
                if changed {
                    display.save();
                }

                ui.separator();
                if ui.button("🎥 Reset camera").clicked() {
                    self.commands.push(DebugCommand::ResetCamera);
                }
            });
        });

        let mut requested = Vec::new();
        let was_open = ui_settings.show_fox_panel;

        for (folder, state) in &self.folders {
            egui::Window::new(format!("🦊 {}", folder))
                .id(egui::Id::new(("debug_folder", folder.as_str())))
                .default_width(220.0)
                .resizable(true)
                .open(&mut ui_settings.show_fox_panel)
                .show(ctx, |ui| {
                    ui.horizontal(|ui| {
                        ui.label("Current:");
                        ui.label(
                            egui::RichText::new(state.current.as_deref().unwrap_or("-")).strong(),
                        );
                    });
                    ui.separator();

                    for name in &state.actions {
                        let is_current = state.current.as_deref() == Some(name.as_str());
                        if ui
                            .add_enabled(!is_current, egui::Button::new(format!("▶ {}", name)))
                            .clicked()
                        {
                            requested.push(DebugCommand::Play {
                                folder: folder.clone(),
                                name: name.clone(),
                            });
                        }
                    }

                    ui.separator();
                    if ui
                        .button("📋 JSON")
                        .on_hover_text("Copy animation state")
                        .clicked()
                    {
                        requested.push(DebugCommand::CopySnapshot {
                            folder: folder.clone(),
                        });
                    }
                });
        }

        if was_open && !ui_settings.show_fox_panel {
            ui_settings.save();
        }
        self.commands.extend(requested);
    }
}

impl DebugObserver for DebugPanel {
    fn actions_available(&mut self, folder: &str, names: &[String]) {
        let state = self.folders.entry(folder.to_string()).or_default();
        state.actions = names.to_vec();
    }

    fn current_changed(&mut self, folder: &str, name: &str) {
        let state = self.folders.entry(folder.to_string()).or_default();
        state.current = Some(name.to_string());
    }
}
