//! TUI Application
//!
//! Owns the registry, the progress tracker and the wizard, and turns key
//! presses into wizard actions, list changes and copy actions. The wizard and
//! the list write through the same tracker so both views always agree.

use std::sync::Arc;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use log::{debug, warn};

use super::state::{InteractionMode, ListState, View};
use crate::clipboard::{Clipboard, copy_with_notice};
use crate::error::Result;
use crate::export::TypeLabels;
use crate::notice::Notice;
use crate::progress::ProgressTracker;
use crate::tools::{CopyField, Tool, ToolCard, ToolRegistry};
use crate::wizard::{Wizard, WizardAction};

/// Ticks a notice stays on screen
const NOTICE_TICKS: u32 = 12;

/// Main TUI application
pub struct App {
    registry: Arc<ToolRegistry>,
    tracker: ProgressTracker,
    wizard: Option<Wizard>,
    labels: TypeLabels,
    clipboard: Arc<dyn Clipboard>,
    pub view: View,
    pub mode: InteractionMode,
    pub list: ListState,
    notice: Option<(Notice, u32)>,
    pub should_quit: bool,
}

impl App {
    /// Create the app, resuming the wizard at the saved position
    pub fn new(
        registry: Arc<ToolRegistry>,
        tracker: ProgressTracker,
        clipboard: Arc<dyn Clipboard>,
        labels: TypeLabels,
    ) -> Self {
        let wizard = Wizard::resume(registry.clone(), &tracker);
        Self {
            registry,
            tracker,
            wizard,
            labels,
            clipboard,
            view: View::default(),
            mode: InteractionMode::default(),
            list: ListState::default(),
            notice: None,
            should_quit: false,
        }
    }

    pub fn registry(&self) -> &ToolRegistry {
        &self.registry
    }

    pub fn tracker(&self) -> &ProgressTracker {
        &self.tracker
    }

    pub fn wizard(&self) -> Option<&Wizard> {
        self.wizard.as_ref()
    }

    /// Notice currently on screen
    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref().map(|(n, _)| n)
    }

    /// `(configured, total)` over registry tools
    pub fn progress(&self) -> (usize, usize) {
        (self.tracker.configured_count(&self.registry), self.registry.total_count())
    }

    fn show(&mut self, notice: Notice) {
        debug!("Notice: {}", notice);
        self.notice = Some((notice, NOTICE_TICKS));
    }

    fn show_all(&mut self, notices: Vec<Notice>) {
        // Only the last one stays visible
        if let Some(last) = notices.into_iter().last() {
            self.show(last);
        }
    }

    fn show_error(&mut self, context: &str, result: Result<()>) {
        if let Err(e) = result {
            warn!("{}: {}", context, e);
            self.show(Notice::error(format!("{}: {}", context, e)));
        }
    }

    /// Age the current notice by one tick
    pub fn tick(&mut self) {
        if let Some((_, remaining)) = &mut self.notice {
            *remaining = remaining.saturating_sub(1);
            if *remaining == 0 {
                self.notice = None;
            }
        }
    }

    /// Handle a key press. Returns `true` when the app should quit.
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.should_quit = true;
            return true;
        }

        match self.mode {
            InteractionMode::Search => self.handle_search_key(key),
            InteractionMode::Help => {
                if matches!(key.code, KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q')) {
                    self.mode = InteractionMode::Normal;
                }
            }
            InteractionMode::Normal => match key.code {
                KeyCode::Char('q') => self.should_quit = true,
                KeyCode::Tab => self.view = self.view.next(),
                KeyCode::Char('?') => self.mode = InteractionMode::Help,
                _ => match self.view {
                    View::Wizard => self.handle_wizard_key(key),
                    View::Tools => self.handle_tools_key(key),
                },
            },
        }
        self.should_quit
    }

    fn handle_wizard_key(&mut self, key: KeyEvent) {
        let action = match key.code {
            KeyCode::Char('n') | KeyCode::Right => WizardAction::Next,
            KeyCode::Char('p') | KeyCode::Left => WizardAction::Previous,
            KeyCode::Char('m') => WizardAction::MarkAndNext,
            KeyCode::Char('s') => WizardAction::SkipToNextUnconfigured,
            KeyCode::Char('c') => {
                let name = self.wizard.as_ref().map(|w| w.current().name.clone());
                if let Some(name) = name {
                    self.copy_tool(&name, CopyField::Full);
                }
                return;
            }
            KeyCode::Char('y') => {
                let name = self.wizard.as_ref().map(|w| w.current().name.clone());
                if let Some(name) = name {
                    self.copy_tool(&name, CopyField::Name);
                }
                return;
            }
            _ => return,
        };
        self.dispatch(action);
    }

    fn dispatch(&mut self, action: WizardAction) {
        let Some(wizard) = self.wizard.as_mut() else {
            self.show(Notice::info("No tools in the registry"));
            return;
        };
        match wizard.dispatch(action, &mut self.tracker) {
            Ok(notices) => self.show_all(notices),
            Err(e) => self.show_error("Failed to save progress", Err(e)),
        }
    }

    fn handle_tools_key(&mut self, key: KeyEvent) {
        let visible_len = self.list.visible(&self.registry).len();
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => self.list.move_up(),
            KeyCode::Down | KeyCode::Char('j') => self.list.move_down(visible_len),
            KeyCode::Char('/') => self.mode = InteractionMode::Search,
            KeyCode::Char('f') => {
                let categories = self.registry.categories();
                self.list.cycle_category(&categories);
            }
            KeyCode::Enter => {
                if let Some(name) = self.selected_name() {
                    self.list.toggle_expanded(&name);
                }
            }
            KeyCode::Char(' ') => {
                if let Some(name) = self.selected_name() {
                    let result = self.tracker.toggle_configured(&name).map(|_| ());
                    self.show_error("Failed to save progress", result);
                }
            }
            KeyCode::Char('c') => {
                if let Some(name) = self.selected_name() {
                    self.copy_tool(&name, CopyField::Full);
                }
            }
            KeyCode::Char('y') => {
                if let Some(name) = self.selected_name() {
                    self.copy_tool(&name, CopyField::Name);
                }
            }
            KeyCode::Char('w') => self.open_in_wizard(),
            _ => {}
        }
    }

    fn handle_search_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Enter => self.mode = InteractionMode::Normal,
            KeyCode::Esc => {
                self.list.query.clear();
                self.mode = InteractionMode::Normal;
            }
            KeyCode::Backspace => {
                self.list.query.pop();
            }
            KeyCode::Char(c) => self.list.query.push(c),
            _ => {}
        }
        let visible_len = self.list.visible(&self.registry).len();
        self.list.clamp(visible_len);
    }

    fn selected_name(&self) -> Option<String> {
        self.list.selected_tool(&self.registry).map(|t| t.name.clone())
    }

    fn open_in_wizard(&mut self) {
        let Some(index) = self.selected_name().and_then(|name| self.registry.position(&name)) else {
            return;
        };
        self.dispatch(WizardAction::JumpTo(index));
        self.view = View::Wizard;
    }

    fn copy_tool(&mut self, name: &str, field: CopyField) {
        let Some(tool) = self.registry.get(name) else {
            return;
        };
        let text = ToolCard::new(tool, self.tracker.is_configured(name)).copy_text(field, &self.labels);
        let notice = match text {
            Ok(text) => copy_with_notice(self.clipboard.as_ref(), &text, field.label()),
            Err(e) => {
                warn!("Failed to format {}: {}", name, e);
                Notice::error(format!("Failed to copy {}", name))
            }
        };
        self.show(notice);
    }

    /// Card for a tool with its current configured and expanded state
    pub fn card<'a>(&self, tool: &'a Tool) -> ToolCard<'a> {
        ToolCard::new(tool, self.tracker.is_configured(&tool.name)).expanded(self.list.is_expanded(&tool.name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clipboard::MemoryClipboard;
    use crate::notice::NoticeLevel;
    use crate::settings::MemorySettingsStore;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn app_with(names: &[&str]) -> (App, Arc<MemorySettingsStore>, Arc<MemoryClipboard>) {
        let registry = Arc::new(
            ToolRegistry::new(
                names
                    .iter()
                    .map(|n| Tool::new(*n, format!("{} tool", n)).with_category("Test"))
                    .collect(),
            )
            .unwrap(),
        );
        let store = Arc::new(MemorySettingsStore::new());
        let tracker = ProgressTracker::load(store.clone(), &registry).unwrap();
        let clipboard = Arc::new(MemoryClipboard::new());
        let app = App::new(registry, tracker, clipboard.clone(), TypeLabels::default());
        (app, store, clipboard)
    }

    #[test]
    fn test_quit_keys() {
        let (mut app, _, _) = app_with(&["a"]);
        assert!(app.handle_key(key(KeyCode::Char('q'))));

        let (mut app, _, _) = app_with(&["a"]);
        assert!(app.handle_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)));
    }

    #[test]
    fn test_tab_switches_view() {
        let (mut app, _, _) = app_with(&["a"]);
        assert_eq!(app.view, View::Wizard);
        app.handle_key(key(KeyCode::Tab));
        assert_eq!(app.view, View::Tools);
    }

    #[test]
    fn test_wizard_keys() {
        let (mut app, _, _) = app_with(&["a", "b", "c"]);
        app.handle_key(key(KeyCode::Char('n')));
        assert_eq!(app.wizard().unwrap().index(), 1);
        app.handle_key(key(KeyCode::Left));
        assert_eq!(app.wizard().unwrap().index(), 0);

        app.handle_key(key(KeyCode::Char('m')));
        assert!(app.tracker().is_configured("a"));
        assert_eq!(app.wizard().unwrap().index(), 1);
        assert_eq!(app.notice().unwrap().level, NoticeLevel::Success);
        assert_eq!(app.progress(), (1, 3));
    }

    #[test]
    fn test_list_toggle_shows_in_wizard() {
        let (mut app, _, _) = app_with(&["a", "b"]);
        app.handle_key(key(KeyCode::Tab));
        app.handle_key(key(KeyCode::Down));
        app.handle_key(key(KeyCode::Char(' ')));
        assert!(app.tracker().is_configured("b"));

        // Wizard skip sees the list's change
        app.handle_key(key(KeyCode::Tab));
        app.handle_key(key(KeyCode::Char('s')));
        assert_eq!(app.wizard().unwrap().index(), 0);
        assert_eq!(app.notice().unwrap().message, "No other unconfigured tools");

        app.handle_key(key(KeyCode::Tab));
        app.handle_key(key(KeyCode::Char(' ')));
        assert!(!app.tracker().is_configured("b"));
    }

    #[test]
    fn test_search_mode() {
        let (mut app, _, _) = app_with(&["navigate_to", "go_home", "go_back"]);
        app.handle_key(key(KeyCode::Tab));
        app.handle_key(key(KeyCode::Char('/')));
        assert_eq!(app.mode, InteractionMode::Search);
        for c in "GO_".chars() {
            app.handle_key(key(KeyCode::Char(c)));
        }
        assert_eq!(app.list.visible(app.registry()).len(), 2);

        // 'q' is text while searching
        assert!(!app.handle_key(key(KeyCode::Char('q'))));
        app.handle_key(key(KeyCode::Backspace));
        app.handle_key(key(KeyCode::Esc));
        assert_eq!(app.mode, InteractionMode::Normal);
        assert!(app.list.query.is_empty());
    }

    #[test]
    fn test_open_in_wizard() {
        let (mut app, _, _) = app_with(&["a", "b", "c"]);
        app.handle_key(key(KeyCode::Tab));
        app.handle_key(key(KeyCode::Down));
        app.handle_key(key(KeyCode::Down));
        app.handle_key(key(KeyCode::Char('w')));
        assert_eq!(app.view, View::Wizard);
        assert_eq!(app.wizard().unwrap().current().name, "c");
        assert_eq!(app.tracker().last_index(), 2);
    }

    #[test]
    fn test_copy_name_and_full() {
        let (mut app, _, clipboard) = app_with(&["a"]);
        app.handle_key(key(KeyCode::Char('y')));
        assert_eq!(clipboard.contents().as_deref(), Some("a"));
        app.handle_key(key(KeyCode::Char('c')));
        assert!(clipboard.contents().unwrap().starts_with("Tool: a"));
        assert_eq!(app.notice().unwrap().message, "Tool definition copied to clipboard");
    }

    #[test]
    fn test_storage_failure_becomes_notice() {
        let (mut app, store, _) = app_with(&["a", "b"]);
        store.set_fail_writes(true);
        assert!(!app.handle_key(key(KeyCode::Char('m'))));
        assert!(app.notice().unwrap().is_error());
        assert!(!app.tracker().is_configured("a"));
        assert_eq!(app.wizard().unwrap().index(), 0);
    }

    #[test]
    fn test_notice_expires() {
        let (mut app, _, _) = app_with(&["a"]);
        app.handle_key(key(KeyCode::Char('y')));
        assert!(app.notice().is_some());
        for _ in 0..NOTICE_TICKS {
            app.tick();
        }
        assert!(app.notice().is_none());
    }

    #[test]
    fn test_empty_registry() {
        let (mut app, _, _) = app_with(&[]);
        assert!(app.wizard().is_none());
        app.handle_key(key(KeyCode::Char('n')));
        assert_eq!(app.notice().unwrap().level, NoticeLevel::Info);
        assert_eq!(app.progress(), (0, 0));
    }

    #[test]
    fn test_help_overlay() {
        let (mut app, _, _) = app_with(&["a"]);
        app.handle_key(key(KeyCode::Char('?')));
        assert_eq!(app.mode, InteractionMode::Help);
        assert!(!app.handle_key(key(KeyCode::Char('q'))));
        assert_eq!(app.mode, InteractionMode::Normal);
    }
}
