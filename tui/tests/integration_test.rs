//! Integration Tests for TUI + Lookup Controller
//!
//! Drives the [`App`] with synthetic key presses against an in-memory
//! registry and checks both the display state and the composited screen.
//!
//! # Test Coverage
//!
//! 1. **Search flow**: typing, submitting, rendering each result shape
//! 2. **List navigation**: cursor, paging keys, drill-down and back
//! 3. **Notices**: toast rendering and the dismiss key
//! 4. **Lifecycle**: quitting and the goodbye message

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use pretty_assertions::assert_eq;
use ratatui::layout::Rect;
use serde_json::{json, Value};
use tokio::time::timeout;

use bizlookup_core::{
    LookupError, ReducerConfig, RegistryBackend, SearchMode, SearchQuery, View,
};
use bizlookup_tui::{App, Focus, LookupClient};

// ============================================================================
// Mock Registry
// ============================================================================

/// Registry answering by search text; anything unscripted is a 404
#[derive(Clone, Default)]
struct MockRegistry {
    responses: HashMap<String, Result<Value, LookupError>>,
    calls: Arc<AtomicUsize>,
}

impl MockRegistry {
    fn respond(mut self, text: &str, outcome: Result<Value, LookupError>) -> Self {
        self.responses.insert(text.to_string(), outcome);
        self
    }
}

#[async_trait]
impl RegistryBackend for MockRegistry {
    fn name(&self) -> &'static str {
        "Mock"
    }

    async fn health_check(&self) -> bool {
        true
    }

    async fn search(&self, query: &SearchQuery) -> Result<Value, LookupError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.responses
            .get(query.text())
            .cloned()
            .unwrap_or(Err(LookupError::NotFound))
    }
}

// ============================================================================
// Helpers
// ============================================================================

fn company(uen: &str, name: &str) -> Value {
    json!({
        "UEN": uen,
        "ENTITY_NAME": name,
        "ENTITY_TYPE_DESC": "Local Company",
        "PRIMARY_SSIC_CODE": "62010",
        "ENTITY_STATUS_DESC": "Live Company",
        "REGISTRATION_INCORPORATION_DATE": "2019-04-01"
    })
}

fn single(uen: &str, name: &str) -> Value {
    let mut payload = company(uen, name);
    payload["DATA_TYPE"] = json!("X");
    payload
}

fn acme_list(n: usize) -> Value {
    let rows: Vec<Value> = (1..=n)
        .map(|i| company(&format!("U{i:03}"), &format!("Acme {i}")))
        .collect();
    json!({ "DATA_TYPE": "MULTIPLE_COM", "COMPANY_LIST": rows })
}

/// Registry with a 25-row name search and detail records for each row
fn list_registry() -> MockRegistry {
    let mut registry = MockRegistry::default().respond("acme", Ok(acme_list(25)));
    for i in 1..=25 {
        let uen = format!("U{i:03}");
        registry = registry.respond(&uen, Ok(single(&uen, &format!("Acme {i}"))));
    }
    registry
}

async fn app_with(registry: MockRegistry, show_disclaimer: bool) -> App<MockRegistry> {
    let mut client = LookupClient::new(registry, ReducerConfig::default());
    client.connect().await.unwrap();
    let mut app = App::new(client, Rect::new(0, 0, 100, 30), show_disclaimer);
    app.process_messages();
    app
}

async fn press(app: &mut App<MockRegistry>, code: KeyCode) {
    press_with(app, code, KeyModifiers::NONE).await;
}

async fn press_with(app: &mut App<MockRegistry>, code: KeyCode, modifiers: KeyModifiers) {
    app.handle_key(KeyEvent::new(code, modifiers)).await.unwrap();
    app.process_messages();
}

async fn type_text(app: &mut App<MockRegistry>, text: &str) {
    for c in text.chars() {
        press(app, KeyCode::Char(c)).await;
    }
}

/// Wait for the in-flight request to finish and apply its messages
async fn settle(app: &mut App<MockRegistry>) {
    timeout(Duration::from_secs(5), app.client_mut().next_response())
        .await
        .expect("request did not complete");
    app.process_messages();
}

/// Composite the screen into plain text, one line per row
fn screen(app: &mut App<MockRegistry>) -> String {
    let buf = app.render_frame();
    let mut out = String::new();
    for y in 0..buf.area.height {
        for x in 0..buf.area.width {
            out.push_str(buf.cell((x, y)).map_or(" ", |c| c.symbol()));
        }
        out.push('\n');
    }
    out
}

// ============================================================================
// Search Flow
// ============================================================================

#[tokio::test]
async fn test_identifier_search_renders_record() {
    let registry =
        MockRegistry::default().respond("201912345A", Ok(single("201912345A", "Acme Pte Ltd")));
    let mut app = app_with(registry, false).await;

    type_text(&mut app, "201912345A").await;
    press(&mut app, KeyCode::Enter).await;
    assert!(app.display().snapshot.is_loading());
    assert!(screen(&mut app).contains("Searching the registry for \"201912345A\"..."));

    settle(&mut app).await;

    let text = screen(&mut app);
    assert!(text.contains("Company Details"));
    assert!(text.contains("Acme Pte Ltd"));
    assert!(text.contains("Registration Date"));
    assert!(text.contains("Notice"));
}

#[tokio::test]
async fn test_mode_keys_switch_search_type() {
    let registry = MockRegistry::default().respond(
        "62010",
        Ok(json!({ "SSIC": "62010", "TOTAL_COUNT": 42 })),
    );
    let mut app = app_with(registry, false).await;

    press(&mut app, KeyCode::Tab).await;
    assert_eq!(app.display().snapshot.mode, SearchMode::Name);
    press(&mut app, KeyCode::BackTab).await;
    assert_eq!(app.display().snapshot.mode, SearchMode::Uen);
    press(&mut app, KeyCode::F(3)).await;
    assert_eq!(app.display().snapshot.mode, SearchMode::Ssic);

    type_text(&mut app, "62010").await;
    press(&mut app, KeyCode::Enter).await;
    settle(&mut app).await;

    let text = screen(&mut app);
    assert!(text.contains("Industry Summary"));
    assert!(text.contains("42"));
}

#[tokio::test]
async fn test_blank_submit_shows_validation_error() {
    let registry = MockRegistry::default();
    let calls = Arc::clone(&registry.calls);
    let mut app = app_with(registry, false).await;

    type_text(&mut app, "   ").await;
    press(&mut app, KeyCode::Enter).await;

    assert_eq!(
        app.display().snapshot.view,
        View::Error("Please enter a search term.".to_string())
    );
    assert!(screen(&mut app).contains("Please enter a search term."));
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_not_found_message_on_screen() {
    let mut app = app_with(MockRegistry::default(), false).await;

    type_text(&mut app, "nothing").await;
    press(&mut app, KeyCode::Enter).await;
    settle(&mut app).await;

    assert!(screen(&mut app).contains("No Live Company Found"));
}

#[tokio::test]
async fn test_backspace_edits_input() {
    let mut app = app_with(MockRegistry::default(), false).await;

    type_text(&mut app, "acmex").await;
    press(&mut app, KeyCode::Backspace).await;

    assert_eq!(app.display().snapshot.input, "acme");
    assert!(screen(&mut app).contains("acme_"));
}

// ============================================================================
// List Navigation
// ============================================================================

/// Run a name search for "acme" and move focus into the list
async fn open_list(app: &mut App<MockRegistry>) {
    press(app, KeyCode::F(2)).await;
    type_text(app, "acme").await;
    press(app, KeyCode::Enter).await;
    settle(app).await;
    press(app, KeyCode::Down).await;
    assert_eq!(app.focus(), Focus::Results);
}

#[tokio::test]
async fn test_list_drill_down_and_back() {
    let mut app = app_with(list_registry(), false).await;
    open_list(&mut app).await;

    let text = screen(&mut app);
    assert!(text.contains("Matching Companies (25)"));
    assert!(text.contains("Page 1 of 3"));

    press(&mut app, KeyCode::Down).await;
    press(&mut app, KeyCode::Down).await;
    press(&mut app, KeyCode::Enter).await;
    assert!(screen(&mut app).contains("Loading details for U003..."));

    settle(&mut app).await;
    let text = screen(&mut app);
    assert!(text.contains("Company Details"));
    assert!(text.contains("Acme 3"));
    assert!(text.contains("Esc: back to the list"));

    press(&mut app, KeyCode::Esc).await;
    assert!(app.display().list_visible());
    assert_eq!(app.display().selected_index(), Some(2));
    assert_eq!(app.focus(), Focus::Results);
}

#[tokio::test]
async fn test_paging_keys() {
    let mut app = app_with(list_registry(), false).await;
    open_list(&mut app).await;

    press(&mut app, KeyCode::Char(']')).await;
    assert_eq!(app.display().snapshot.pagination.current_page(), 2);
    assert!(screen(&mut app).contains("Acme 11"));

    press(&mut app, KeyCode::Left).await;
    assert_eq!(app.display().snapshot.pagination.current_page(), 1);

    press(&mut app, KeyCode::Char('3')).await;
    assert_eq!(app.display().snapshot.pagination.current_page(), 3);
    assert_eq!(app.display().page_rows().len(), 5);

    // Past the last page is ignored
    press(&mut app, KeyCode::Right).await;
    assert_eq!(app.display().snapshot.pagination.current_page(), 3);

    // Drill-down from a later page uses the absolute row
    press(&mut app, KeyCode::Enter).await;
    settle(&mut app).await;
    assert!(screen(&mut app).contains("U021"));
}

#[tokio::test]
async fn test_up_from_first_row_returns_to_input() {
    let mut app = app_with(list_registry(), false).await;
    open_list(&mut app).await;

    press(&mut app, KeyCode::Up).await;
    assert_eq!(app.focus(), Focus::Input);

    // Typing goes to the search box again
    type_text(&mut app, "x").await;
    assert_eq!(app.display().snapshot.input, "acmex");
}

// ============================================================================
// Notices
// ============================================================================

#[tokio::test]
async fn test_dismiss_key_hides_toast() {
    let mut app = app_with(list_registry(), false).await;
    open_list(&mut app).await;
    assert!(app.display().toast.is_some());
    assert!(screen(&mut app).contains("x: dismiss"));

    press(&mut app, KeyCode::Char('x')).await;

    assert!(app.display().toast.is_none());
    assert!(!screen(&mut app).contains("x: dismiss"));
}

#[tokio::test]
async fn test_ctrl_o_follows_link_from_input() {
    let registry = MockRegistry::default().respond("acme", Ok(acme_list(3)));
    let config = ReducerConfig {
        notice_link: Some("https://registry.example/terms".to_string()),
        ..ReducerConfig::default()
    };
    let mut client = LookupClient::new(registry, config);
    client.connect().await.unwrap();
    let mut app = App::new(client, Rect::new(0, 0, 100, 30), false);

    press(&mut app, KeyCode::F(2)).await;
    type_text(&mut app, "acme").await;
    press(&mut app, KeyCode::Enter).await;
    settle(&mut app).await;
    assert!(screen(&mut app).contains("o: open https://registry.example/terms"));

    press_with(&mut app, KeyCode::Char('o'), KeyModifiers::CONTROL).await;
    assert!(app.display().toast.is_none());
    // The shortcut does not type into the search box
    assert_eq!(app.display().snapshot.input, "acme");
}

#[tokio::test]
async fn test_disclaimer_panel() {
    let mut with_panel = app_with(MockRegistry::default(), true).await;
    let mut without_panel = app_with(MockRegistry::default(), false).await;

    assert!(screen(&mut with_panel).contains("Registry data is provided as published"));
    assert!(!screen(&mut without_panel).contains("Registry data is provided as published"));
}

// ============================================================================
// Lifecycle
// ============================================================================

#[tokio::test]
async fn test_escape_quits() {
    let mut app = app_with(MockRegistry::default(), false).await;
    assert!(app.is_running());

    press(&mut app, KeyCode::Esc).await;

    assert!(!app.is_running());
    assert_eq!(app.goodbye(), Some("Goodbye!"));
}

#[tokio::test]
async fn test_ctrl_c_quits_from_results() {
    let mut app = app_with(list_registry(), false).await;
    open_list(&mut app).await;

    press_with(&mut app, KeyCode::Char('c'), KeyModifiers::CONTROL).await;
    assert!(!app.is_running());
}
