use std::path::PathBuf;
use std::time::{Duration, Instant};

use crate::config::Config;
use crate::exam::{self, PARTS, Section, TOTAL_QUESTIONS};
use crate::sheet::choice::Choice;
use crate::sheet::state::{Action, Dirty, SheetState};
use crate::store::json_store::JsonStore;
use crate::ui::theme::Theme;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AppScreen {
    Sheet,
    Summary,
}

/// Destructive operations held behind a y/n prompt.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Confirm {
    ClearSection,
    ClearAll,
    Reset,
}

impl Confirm {
    pub fn message(self, section: Section, key_mode: bool) -> String {
        let store_name = if key_mode { "answer key" } else { "answers" };
        match self {
            Confirm::ClearSection => {
                let (start, end) = section.bounds();
                format!("Clear {store_name} for Q{start}-{end}?")
            }
            Confirm::ClearAll => format!("Clear all {store_name}?"),
            Confirm::Reset => "Reset everything (answers, key, and mode)?".to_string(),
        }
    }
}

pub struct App {
    pub screen: AppScreen,
    pub sheet: SheetState,
    pub cursor: u16,
    pub config: Config,
    pub theme: &'static Theme,
    pub store: Option<JsonStore>,
    pub pending_confirm: Option<Confirm>,
    pub last_saved: Option<Instant>,
    pub should_quit: bool,
}

impl App {
    pub fn new(data_dir: Option<PathBuf>, theme_override: Option<String>) -> Self {
        let mut config = Config::load().unwrap_or_default();
        config.validate();
        let theme = resolve_theme(theme_override, &config.theme);

        let store = match data_dir {
            Some(dir) => JsonStore::with_base_dir(dir),
            None => JsonStore::new(),
        };
        let store = store
            .map_err(|e| tracing::warn!("persistence disabled: {e:#}"))
            .ok();

        Self::from_parts(config, theme, store)
    }

    /// Assemble an app from already-built pieces. Startup state comes from
    /// the store; each record falls back independently when corrupt.
    pub fn from_parts(config: Config, theme: &'static Theme, store: Option<JsonStore>) -> Self {
        let persisted = store.as_ref().map(|s| s.load_all()).unwrap_or_default();

        Self {
            screen: AppScreen::Sheet,
            sheet: SheetState {
                answers: persisted.answers,
                key: persisted.key,
                key_mode: persisted.key_mode,
            },
            cursor: 1,
            config,
            theme,
            store,
            pending_confirm: None,
            last_saved: None,
            should_quit: false,
        }
    }

    pub fn select(&mut self, choice: Choice) {
        self.apply_and_persist(Action::Select {
            question: self.cursor,
            choice,
        });
    }

    pub fn toggle_mode(&mut self) {
        self.apply_and_persist(Action::ToggleMode);
    }

    pub fn request_confirm(&mut self, confirm: Confirm) {
        self.pending_confirm = Some(confirm);
    }

    pub fn cancel_confirm(&mut self) {
        self.pending_confirm = None;
    }

    pub fn run_confirmed(&mut self) {
        let Some(confirm) = self.pending_confirm.take() else {
            return;
        };
        match confirm {
            Confirm::ClearSection => {
                let (start, end) = self.cursor_section().bounds();
                self.apply_and_persist(Action::ClearSection { start, end });
            }
            Confirm::ClearAll => self.apply_and_persist(Action::ClearAll),
            Confirm::Reset => self.apply_and_persist(Action::Reset),
        }
    }

    fn apply_and_persist(&mut self, action: Action) {
        let dirty = self.sheet.apply(action);
        if !dirty.any() {
            return;
        }
        // Clearing a whole store deletes its record; everything else rewrites.
        let removal = matches!(action, Action::ClearAll | Action::Reset);
        self.persist(dirty, removal);
    }

    /// Best-effort synchronous save of exactly the records the action
    /// touched. A failed write is logged and the in-memory state stands.
    fn persist(&mut self, dirty: Dirty, removal: bool) {
        let Some(ref store) = self.store else {
            return;
        };
        let mut ok = true;

        if dirty.answers {
            let res = if removal {
                store.remove_answers()
            } else {
                store.save_answers(&self.sheet.answers)
            };
            if let Err(e) = res {
                tracing::warn!("failed to persist answers: {e:#}");
                ok = false;
            }
        }
        if dirty.key {
            let res = if removal {
                store.remove_key()
            } else {
                store.save_key(&self.sheet.key)
            };
            if let Err(e) = res {
                tracing::warn!("failed to persist answer key: {e:#}");
                ok = false;
            }
        }
        if dirty.mode {
            let res = if removal {
                store.remove_mode()
            } else {
                store.save_mode(self.sheet.key_mode)
            };
            if let Err(e) = res {
                tracing::warn!("failed to persist mode: {e:#}");
                ok = false;
            }
        }

        if ok {
            self.last_saved = Some(Instant::now());
        }
    }

    /// Whether the "saved" indicator should still show.
    pub fn save_flash(&self) -> bool {
        self.last_saved
            .is_some_and(|t| t.elapsed() < Duration::from_secs(2))
    }

    pub fn cursor_section(&self) -> Section {
        exam::section_for(self.cursor).unwrap_or(Section::Listening)
    }

    pub fn move_next(&mut self) {
        if self.cursor < TOTAL_QUESTIONS {
            self.cursor += 1;
        }
    }

    pub fn move_prev(&mut self) {
        if self.cursor > 1 {
            self.cursor -= 1;
        }
    }

    pub fn move_column_forward(&mut self) {
        self.cursor = (self.cursor + self.config.questions_per_column).min(TOTAL_QUESTIONS);
    }

    pub fn move_column_back(&mut self) {
        self.cursor = self
            .cursor
            .saturating_sub(self.config.questions_per_column)
            .max(1);
    }

    pub fn jump_first(&mut self) {
        self.cursor = 1;
    }

    pub fn jump_last(&mut self) {
        self.cursor = TOTAL_QUESTIONS;
    }

    /// Jump to the start of the next part, wrapping past part 7 to part 1.
    pub fn next_part(&mut self) {
        let next = PARTS.iter().find(|p| p.start > self.cursor);
        self.cursor = next.unwrap_or(&PARTS[0]).start;
    }

    /// Jump to the start of the current part, or the previous one when
    /// already there, wrapping before part 1 to part 7.
    pub fn prev_part(&mut self) {
        let prev = PARTS.iter().rev().find(|p| p.start < self.cursor);
        self.cursor = prev.unwrap_or(&PARTS[PARTS.len() - 1]).start;
    }

    pub fn go_to_summary(&mut self) {
        self.screen = AppScreen::Summary;
    }

    pub fn go_to_sheet(&mut self) {
        self.screen = AppScreen::Sheet;
    }
}

/// Pick the session theme once: CLI override wins over the config, and an
/// unknown name warns before falling back to the default. Leaked because the
/// theme lives as long as the process and widgets borrow it everywhere.
fn resolve_theme(override_name: Option<String>, config_name: &str) -> &'static Theme {
    let name = override_name.as_deref().unwrap_or(config_name);
    let theme = Theme::load(name).unwrap_or_else(|| {
        tracing::warn!("theme {name:?} not found, falling back to the default");
        Theme::default()
    });
    Box::leak(Box::new(theme))
}
