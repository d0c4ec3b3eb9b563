use eframe::egui;
use egui::{Context, RichText, Ui};

use super::state::TagDraft;

/// What the user asked for this frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorAction {
    None,
    AddTag,
    Save,
    Cancel,
}

/// Modal window for editing one resource's tags.
#[derive(Default)]
pub struct TagEditorWindow;

impl TagEditorWindow {
    pub fn new() -> Self {
        Self
    }

    pub fn show(&mut self, ctx: &Context, draft: &mut TagDraft) -> EditorAction {
        let mut action = EditorAction::None;

        let central_panel_size = ctx.available_rect().size();
        let window_width = (central_panel_size.x * 0.5).max(360.0);

        // Dim everything behind the editor
        egui::Area::new(egui::Id::new("tag_editor_backdrop"))
            .order(egui::Order::Middle)
            .fixed_pos(egui::Pos2::ZERO)
            .show(ctx, |ui| {
                let screen = ctx.screen_rect();
                ui.painter()
                    .rect_filled(screen, 0.0, egui::Color32::from_black_alpha(128));
                ui.allocate_rect(screen, egui::Sense::click());
            });

        egui::Window::new(format!("Edit Tags for {}", draft.resource.name))
            .id(egui::Id::new("tag_editor_window"))
            .default_width(window_width)
            .anchor(egui::Align2::CENTER_CENTER, egui::Vec2::ZERO)
            .resizable(false)
            .collapsible(false)
            .order(egui::Order::Foreground)
            .show(ctx, |ui| {
                action = self.ui_content(ui, draft);
            });

        if ctx.input(|i| i.key_pressed(egui::Key::Escape)) && !draft.saving {
            action = EditorAction::Cancel;
        }

        action
    }

    fn ui_content(&mut self, ui: &mut Ui, draft: &mut TagDraft) -> EditorAction {
        let mut action = EditorAction::None;

        ui.add_space(5.0);
        ui.label(RichText::new("Current Tags:").strong());
        egui::ScrollArea::vertical()
            .max_height(240.0)
            .show(ui, |ui| {
                if draft.tags.is_empty() {
                    ui.weak("None");
                }
                for (key, value) in &draft.tags {
                    ui.horizontal(|ui| {
                        ui.label(RichText::new(format!("{}:", key)).strong());
                        ui.label(value.as_str());
                    });
                }
            });

        ui.add_space(10.0);
        ui.label(RichText::new("Add New Tag:").strong());
        let input = ui.add(
            egui::TextEdit::singleline(&mut draft.pending_input)
                .hint_text("Enter tag in key:value format")
                .desired_width(f32::INFINITY),
        );
        let submitted = input.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
        if ui.button("Add Tag").clicked() || submitted {
            action = EditorAction::AddTag;
        }

        ui.add_space(10.0);
        ui.separator();
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            let save = ui.add_enabled(!draft.saving, egui::Button::new("Save"));
            if save.clicked() {
                action = EditorAction::Save;
            }
            if ui
                .add_enabled(!draft.saving, egui::Button::new("Cancel"))
                .clicked()
            {
                action = EditorAction::Cancel;
            }
            if draft.saving {
                ui.spinner();
            }
        });

        action
    }
}
