use eframe::egui;
use egui::{Context, RichText};
use std::sync::mpsc::{self, Receiver, Sender};

use super::client::{BackendClient, ViewerError};
use super::notifications::{Notification, NotificationManager};
use super::state::{DraftState, HierarchyState};
use super::tag_editor::{EditorAction, TagEditorWindow};
use super::tree::HierarchyRenderer;
use crate::app::api_models::{UpdateTagsResponse, TAGS_UPDATE_FAILED};
use crate::app::azure::Hierarchy;
use crate::app::config::ViewerConfig;

pub const TAGS_SAVED_NOTICE: &str = "Tags updated successfully!";

/// Results delivered from background requests to the UI thread
#[derive(Debug)]
pub enum ViewerEvent {
    HierarchyLoaded(Result<Hierarchy, ViewerError>),
    TagsSaved(Result<UpdateTagsResponse, ViewerError>),
}

/// What the UI draws from. Background results only change it through
/// [`ViewState::apply_event`].
#[derive(Default)]
pub struct ViewState {
    pub hierarchy: HierarchyState,
    pub draft: DraftState,
    pub notifications: NotificationManager,
}

impl ViewState {
    pub fn apply_event(&mut self, event: ViewerEvent) {
        match event {
            ViewerEvent::HierarchyLoaded(result) => {
                if let Ok(hierarchy) = &result {
                    log_info!("Loaded {} accounts", hierarchy.len());
                }
                self.hierarchy.finish(result);
            }
            // The loaded hierarchy is left as-is; saved tags appear after a reload
            ViewerEvent::TagsSaved(result) => {
                let outcome = result.map(|_| ());
                self.draft.finish_save(&outcome);
                match outcome {
                    Ok(()) => self.notifications.push(Notification::new_success(TAGS_SAVED_NOTICE)),
                    Err(e) => {
                        log_warn!("Saving tags failed: {}", e);
                        self.notifications.push(Notification::new_error(TAGS_UPDATE_FAILED));
                    }
                }
            }
        }
    }
}

/// Main viewer application
pub struct ViewerApp {
    client: BackendClient,
    runtime: tokio::runtime::Runtime,
    events_tx: Sender<ViewerEvent>,
    events_rx: Receiver<ViewerEvent>,
    state: ViewState,
    renderer: HierarchyRenderer,
    editor: TagEditorWindow,
}

impl ViewerApp {
    pub fn new(cc: &eframe::CreationContext<'_>, config: ViewerConfig) -> anyhow::Result<Self> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .thread_name("aztags-viewer-io")
            .enable_all()
            .build()?;
        let client = BackendClient::new(&config.api_url)?;
        let (events_tx, events_rx) = mpsc::channel();

        log_info!("Viewer using backend at {}", client.base_url());

        let mut app = Self {
            client,
            runtime,
            events_tx,
            events_rx,
            state: ViewState::default(),
            renderer: HierarchyRenderer::new(),
            editor: TagEditorWindow::new(),
        };
        app.request_hierarchy(&cc.egui_ctx);
        Ok(app)
    }

    /// Enter `Loading` and fetch the hierarchy in the background
    fn request_hierarchy(&mut self, ctx: &Context) {
        self.state.hierarchy.begin_reload();

        let client = self.client.clone();
        let tx = self.events_tx.clone();
        let ctx = ctx.clone();
        self.runtime.spawn(async move {
            let result = client.fetch_hierarchy().await;
            let _ = tx.send(ViewerEvent::HierarchyLoaded(result));
            ctx.request_repaint();
        });
    }

    fn request_save(&mut self, ctx: &Context) {
        // None while a save is already in flight
        let Some(request) = self.state.draft.begin_save() else {
            return;
        };

        let client = self.client.clone();
        let tx = self.events_tx.clone();
        let ctx = ctx.clone();
        self.runtime.spawn(async move {
            let result = client.update_tags(&request).await;
            let _ = tx.send(ViewerEvent::TagsSaved(result));
            ctx.request_repaint();
        });
    }

    fn process_events(&mut self) {
        while let Ok(event) = self.events_rx.try_recv() {
            self.state.apply_event(event);
        }
    }

    fn show_editor(&mut self, ctx: &Context) {
        let action = match self.state.draft.draft_mut() {
            Some(draft) => self.editor.show(ctx, draft),
            None => return,
        };

        match action {
            EditorAction::None => {}
            EditorAction::AddTag => {
                if let Err(e) = self.state.draft.add_pending_tag() {
                    log_debug!("Rejected tag input: {}", e);
                    self.state.notifications.push(Notification::new_warning(e.user_message()));
                }
            }
            EditorAction::Save => self.request_save(ctx),
            EditorAction::Cancel => self.state.draft.cancel(),
        }
    }
}

impl eframe::App for ViewerApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        self.process_events();

        let mut reload_clicked = false;
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.heading(RichText::new("Azure Resources Hierarchy").strong());
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    let enabled = !self.state.hierarchy.is_loading() && !self.state.draft.is_open();
                    if ui.add_enabled(enabled, egui::Button::new("Reload")).clicked() {
                        reload_clicked = true;
                    }
                    ui.weak(self.client.base_url());
                });
            });
        });

        egui::CentralPanel::default().show(ctx, |ui| match &self.state.hierarchy {
            HierarchyState::Loading => {
                ui.horizontal(|ui| {
                    ui.spinner();
                    ui.label("Loading...");
                });
            }
            HierarchyState::Failed(message) => {
                ui.label(RichText::new(message.as_str()).color(ui.visuals().error_fg_color));
            }
            HierarchyState::Loaded(hierarchy) => {
                egui::ScrollArea::vertical()
                    .auto_shrink([false, false])
                    .show(ui, |ui| self.renderer.render(ui, hierarchy));
            }
        });

        if reload_clicked {
            self.request_hierarchy(ctx);
        }

        // One draft at a time
        if let Some(resource) = self.renderer.take_edit_request() {
            if !self.state.draft.is_open() {
                self.state.draft.open(&resource);
            }
        }

        self.show_editor(ctx);
        self.state.notifications.show(ctx);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::azure::{Account, Resource, ResourceGroup};
    use crate::app::viewer::notifications::NotificationType;

    fn loaded_state() -> (ViewState, Resource) {
        let resource = Resource {
            id: "/sub1/rg1/res1".to_string(),
            name: "res1".to_string(),
            tags: Some([("env".to_string(), "prod".to_string())].into_iter().collect()),
        };
        let hierarchy = vec![Account {
            subscription_id: "sub1".to_string(),
            display_name: "Production".to_string(),
            resource_groups: vec![ResourceGroup {
                name: "rg1".to_string(),
                resources: vec![resource.clone()],
            }],
        }];

        let mut state = ViewState::default();
        state.apply_event(ViewerEvent::HierarchyLoaded(Ok(hierarchy)));
        (state, resource)
    }

    fn saved_response() -> UpdateTagsResponse {
        UpdateTagsResponse {
            message: "Tags updated successfully".to_string(),
            data: serde_json::json!({ "properties": { "tags": { "env": "staging" } } }),
        }
    }

    #[test]
    fn test_successful_save_closes_editor_and_keeps_hierarchy() {
        let (mut state, resource) = loaded_state();
        let before = state.hierarchy.clone();

        state.draft.open(&resource);
        state.draft.draft_mut().unwrap().pending_input = "env:staging".to_string();
        state.draft.add_pending_tag().unwrap();
        assert!(state.draft.begin_save().is_some());

        state.apply_event(ViewerEvent::TagsSaved(Ok(saved_response())));

        assert!(!state.draft.is_open());
        assert_eq!(state.hierarchy, before);
        let env = state
            .hierarchy
            .find_resource("/sub1/rg1/res1")
            .and_then(|r| r.tags.as_ref())
            .and_then(|t| t.get("env"))
            .cloned();
        assert_eq!(env.as_deref(), Some("prod"));

        let notices = state.notifications.notifications();
        assert_eq!(notices.len(), 1);
        assert_eq!(notices[0].notification_type, NotificationType::Success);
        assert_eq!(notices[0].message, TAGS_SAVED_NOTICE);
    }

    #[test]
    fn test_failed_save_keeps_draft_and_reports_error() {
        let (mut state, resource) = loaded_state();
        state.draft.open(&resource);
        state.draft.draft_mut().unwrap().pending_input = "team:web".to_string();
        state.draft.add_pending_tag().unwrap();
        state.draft.begin_save().unwrap();

        let failure = ViewerError::Status {
            status: reqwest::StatusCode::INTERNAL_SERVER_ERROR,
            body: r#"{"error":"Failed to update tags"}"#.to_string(),
        };
        state.apply_event(ViewerEvent::TagsSaved(Err(failure)));

        let draft = state.draft.draft().unwrap();
        assert!(!draft.saving);
        assert_eq!(draft.tags.get("team").map(String::as_str), Some("web"));

        let notices = state.notifications.notifications();
        assert_eq!(notices.len(), 1);
        assert_eq!(notices[0].notification_type, NotificationType::Error);
        assert_eq!(notices[0].message, TAGS_UPDATE_FAILED);
    }

    #[test]
    fn test_failed_load_shows_fixed_message() {
        let mut state = ViewState::default();
        assert!(state.hierarchy.is_loading());

        let failure = ViewerError::Status {
            status: reqwest::StatusCode::INTERNAL_SERVER_ERROR,
            body: String::new(),
        };
        state.apply_event(ViewerEvent::HierarchyLoaded(Err(failure)));

        assert_eq!(
            state.hierarchy,
            HierarchyState::Failed("Failed to fetch hierarchy".to_string())
        );
    }
}
