use egui::{Color32, RichText, Ui};

use crate::app::azure::{Account, Hierarchy, Resource, ResourceGroup};

const TAGGED_LIGHT: Color32 = Color32::from_rgb(220, 252, 231);
const UNTAGGED_LIGHT: Color32 = Color32::from_rgb(254, 226, 226);
const TAGGED_DARK: Color32 = Color32::from_rgb(22, 64, 38);
const UNTAGGED_DARK: Color32 = Color32::from_rgb(76, 28, 28);

/// Renders the hierarchy as nested CollapsingHeaders: account → group → resource rows.
///
/// Clicking "Edit Tags" on a row queues the resource; the app drains the queue
/// with [`HierarchyRenderer::take_edit_request`] after the frame is drawn.
#[derive(Default)]
pub struct HierarchyRenderer {
    pending_edit: Option<Resource>,
}

impl HierarchyRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn take_edit_request(&mut self) -> Option<Resource> {
        self.pending_edit.take()
    }

    pub fn render(&mut self, ui: &mut Ui, hierarchy: &Hierarchy) {
        if hierarchy.is_empty() {
            ui.label("No subscriptions visible to this token.");
            return;
        }

        for account in hierarchy {
            self.render_account(ui, account);
            ui.add_space(4.0);
        }
    }

    fn render_account(&mut self, ui: &mut Ui, account: &Account) {
        // Subscription ids are unique; display names are not
        egui::CollapsingHeader::new(RichText::new(&account.display_name).heading())
            .id_salt(("account", &account.subscription_id))
            .default_open(false)
            .show(ui, |ui| {
                for group in &account.resource_groups {
                    self.render_group(ui, &account.subscription_id, group);
                }
            })
            .header_response
            .on_hover_text(account.subscription_id.as_str());
    }

    fn render_group(&mut self, ui: &mut Ui, subscription_id: &str, group: &ResourceGroup) {
        egui::CollapsingHeader::new(RichText::new(&group.name).strong())
            .id_salt(("group", subscription_id, &group.name))
            .default_open(false)
            .show(ui, |ui| {
                if group.resources.is_empty() {
                    ui.weak("No resources");
                }
                for resource in &group.resources {
                    self.render_resource(ui, resource);
                    ui.add_space(2.0);
                }
            });
    }

    fn render_resource(&mut self, ui: &mut Ui, resource: &Resource) {
        let light = is_light_background(ui.visuals().window_fill);
        let fill = resource_fill(resource.is_tagged(), light);

        egui::Frame::new()
            .fill(fill)
            .corner_radius(4.0)
            .inner_margin(6.0)
            .show(ui, |ui| {
                ui.horizontal(|ui| {
                    ui.label(RichText::new(&resource.name).strong());
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if ui.button("Edit Tags").clicked() {
                            self.pending_edit = Some(resource.clone());
                        }
                    });
                });
                ui.label(format!("Tags: {}", resource.tags_display()))
                    .on_hover_text(resource.id.as_str());
            });
    }
}

/// Row background: green for tagged resources, red for untagged ones
pub fn resource_fill(is_tagged: bool, light_theme: bool) -> Color32 {
    match (is_tagged, light_theme) {
        (true, true) => TAGGED_LIGHT,
        (false, true) => UNTAGGED_LIGHT,
        (true, false) => TAGGED_DARK,
        (false, false) => UNTAGGED_DARK,
    }
}

/// Relative luminance test used to pick light or dark row colors
pub fn is_light_background(bg_color: Color32) -> bool {
    let linear = |c: u8| {
        let c = c as f32 / 255.0;
        if c <= 0.03928 {
            c / 12.92
        } else {
            ((c + 0.055) / 1.055).powf(2.4)
        }
    };

    let luminosity = 0.2126 * linear(bg_color.r())
        + 0.7152 * linear(bg_color.g())
        + 0.0722 * linear(bg_color.b());
    luminosity > 0.5
}
