//! Viewer widgets driven through egui_kittest.

use egui_kittest::kittest::Queryable;
use egui_kittest::Harness;
use pretty_assertions::assert_eq;
use std::sync::{Arc, Mutex};

use aztags::app::azure::{Account, Resource, ResourceGroup, TagMap};
use aztags::app::viewer::tag_editor::{EditorAction, TagEditorWindow};
use aztags::app::viewer::tree::HierarchyRenderer;
use aztags::app::viewer::{DraftState, TagDraft};

fn tagged_resource() -> Resource {
    let tags: TagMap = [("env".to_string(), "prod".to_string())].into_iter().collect();
    Resource {
        id: "/sub1/rg1/res1".to_string(),
        name: "res1".to_string(),
        tags: Some(tags),
    }
}

fn editor_harness(draft: Arc<Mutex<TagDraft>>, last_action: Arc<Mutex<EditorAction>>) -> Harness<'static> {
    let mut editor = TagEditorWindow::new();
    Harness::new(move |ctx| {
        let mut draft = draft.lock().unwrap();
        let action = editor.show(ctx, &mut draft);
        if action != EditorAction::None {
            *last_action.lock().unwrap() = action;
        }
    })
}

#[test]
fn test_editor_lists_current_tags() {
    let draft = Arc::new(Mutex::new(TagDraft::for_resource(&tagged_resource())));
    let last_action = Arc::new(Mutex::new(EditorAction::None));
    let mut harness = editor_harness(draft, last_action.clone());

    harness.run();

    harness.get_by_label("env:");
    harness.get_by_label("prod");
    assert_eq!(*last_action.lock().unwrap(), EditorAction::None);
}

#[test]
fn test_editor_add_tag_button_requests_add() {
    let draft = Arc::new(Mutex::new(TagDraft::for_resource(&tagged_resource())));
    draft.lock().unwrap().pending_input = "team:web".to_string();
    let last_action = Arc::new(Mutex::new(EditorAction::None));
    let mut harness = editor_harness(draft.clone(), last_action.clone());
    harness.run();

    harness.get_by_label("Add Tag").click();
    harness.run();

    assert_eq!(*last_action.lock().unwrap(), EditorAction::AddTag);
}

#[test]
fn test_editor_cancel_button_requests_cancel() {
    let draft = Arc::new(Mutex::new(TagDraft::for_resource(&tagged_resource())));
    let last_action = Arc::new(Mutex::new(EditorAction::None));
    let mut harness = editor_harness(draft, last_action.clone());
    harness.run();

    harness.get_by_label("Cancel").click();
    harness.run();

    assert_eq!(*last_action.lock().unwrap(), EditorAction::Cancel);
}

#[test]
fn test_add_then_cancel_round_trip_through_draft_state() {
    let resource = tagged_resource();
    let mut state = DraftState::Closed;
    state.open(&resource);

    if let Some(draft) = state.draft_mut() {
        draft.pending_input = "env:staging".to_string();
    }
    state.add_pending_tag().unwrap();
    assert_eq!(
        state.draft().and_then(|d| d.tags.get("env")).map(String::as_str),
        Some("staging")
    );

    state.cancel();
    state.open(&resource);
    assert_eq!(
        state.draft().and_then(|d| d.tags.get("env")).map(String::as_str),
        Some("prod")
    );
}

#[test]
fn test_tree_edit_button_queues_resource() {
    let hierarchy = vec![Account {
        subscription_id: "sub1".to_string(),
        display_name: "Production".to_string(),
        resource_groups: vec![ResourceGroup {
            name: "rg1".to_string(),
            resources: vec![tagged_resource()],
        }],
    }];
    let renderer = Arc::new(Mutex::new(HierarchyRenderer::new()));

    let mut harness = Harness::new_ui({
        let renderer = renderer.clone();
        move |ui| renderer.lock().unwrap().render(ui, &hierarchy)
    });
    harness.run();

    // Sections start collapsed
    harness.get_by_label("Production").click();
    harness.run();
    harness.get_by_label("rg1").click();
    harness.run();

    harness.get_by_label("Edit Tags").click();
    harness.run();

    let requested = renderer.lock().unwrap().take_edit_request();
    assert_eq!(requested.map(|r| r.id), Some("/sub1/rg1/res1".to_string()));
    assert!(renderer.lock().unwrap().take_edit_request().is_none());
}
