// Emoji autocomplete
// Typing `:gri` in the composer opens a menu of matching emoji; arrows move the selection,
// Enter or a click inserts the glyph, Escape dismisses the menu.

use crate::models::picker::{EmojiMenu, PickerKey, PickerState};
use crate::models::settings::AutocompleteSettings;
use crate::services::emoji_index::EmojiIndex;
use crate::utils::debounce::Debouncer;
use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

static SHORTCODE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(:[A-Za-z0-9_+\-]+)").expect("valid shortcode pattern"));

/// The host's message composer
pub trait ComposerSurface: Send {
    /// Current content of the input field
    fn text(&self) -> String;

    /// Replaces the first occurrence of `from` in the document text. False if it was not found.
    fn replace_first(&mut self, from: &str, to: &str) -> bool;
}

/// Last whitespace-delimited token of the input; empty when the input ends in whitespace
pub fn last_token(text: &str) -> &str {
    text.rsplit(char::is_whitespace).next().unwrap_or("")
}

/// Shortcode being typed in `token`, without colons (`:gri` -> `gri`)
pub fn extract_query(token: &str) -> Option<String> {
    SHORTCODE_PATTERN
        .find_iter(token)
        .last()
        .map(|found| found.as_str().replace(':', ""))
}

/// Picker state machine: closed, or open with a candidate list
pub struct AutocompletePicker {
    state: Option<PickerState>,
    max_candidates: Option<usize>,
}

impl AutocompletePicker {
    pub fn new(max_candidates: Option<usize>) -> Self {
        Self {
            state: None,
            max_candidates,
        }
    }

    pub fn is_open(&self) -> bool {
        self.state.is_some()
    }

    pub fn state(&self) -> Option<&PickerState> {
        self.state.as_ref()
    }

    pub fn menu(&self) -> Option<EmojiMenu> {
        self.state.as_ref().map(PickerState::to_menu)
    }

    /// Re-runs the search for the input's last token. Returns whether the menu is open.
    /// A failed or empty match closes the menu so nothing stale stays on screen.
    pub fn evaluate(&mut self, text: &str, index: &EmojiIndex) -> bool {
        let token = last_token(text);

        self.state = extract_query(token).and_then(|query| {
            let mut candidates = index.search(&query);
            if let Some(max) = self.max_candidates {
                candidates.truncate(max);
            }
            PickerState::open(token, candidates)
        });

        if let Some(state) = &self.state {
            debug!(
                "[Autocomplete] {} candidates for {:?}",
                state.candidates.len(),
                state.query_text
            );
        }

        self.is_open()
    }

    /// Keyboard handling while the menu is open. Returns true when the key was consumed.
    pub fn handle_key(&mut self, key: &PickerKey, surface: &mut dyn ComposerSurface) -> bool {
        let Some(state) = self.state.as_mut() else {
            return false;
        };

        match key {
            PickerKey::ArrowRight => {
                state.select_next();
                true
            }
            PickerKey::ArrowLeft => {
                state.select_previous();
                true
            }
            PickerKey::Enter => {
                let active = state.active_index;
                self.commit(active, surface)
            }
            PickerKey::Escape => {
                self.close();
                true
            }
            PickerKey::Other(_) => false,
        }
    }

    /// Commits the clicked candidate regardless of the active one
    pub fn click(&mut self, candidate: usize, surface: &mut dyn ComposerSurface) -> bool {
        self.commit(candidate, surface)
    }

    pub fn close(&mut self) {
        self.state = None;
    }

    fn commit(&mut self, candidate: usize, surface: &mut dyn ComposerSurface) -> bool {
        let Some(state) = self.state.as_ref() else {
            return false;
        };
        let Some(entry) = state.candidates.get(candidate) else {
            return false;
        };

        let replacement = format!("{} ", entry.glyph);
        if !surface.replace_first(&state.query_text, &replacement) {
            debug!(
                "[Autocomplete] {:?} no longer in the composer",
                state.query_text
            );
        }

        self.close();
        true
    }
}

type MenuListener = dyn Fn(Option<EmojiMenu>) + Send + Sync;

/// A picker bound to one composer, with debounced search on key-up
pub struct AutocompleteSession<S: ComposerSurface + 'static> {
    picker: Arc<Mutex<AutocompletePicker>>,
    surface: Arc<Mutex<S>>,
    debouncer: Debouncer<()>,
    on_menu_change: Arc<MenuListener>,
}

impl<S: ComposerSurface + 'static> AutocompleteSession<S> {
    /// Binds autocomplete to `surface`. `None` when there is no composer or the feature
    /// is disabled. Must be called from within a tokio runtime.
    pub fn attach<F>(
        surface: Option<S>,
        settings: &AutocompleteSettings,
        on_menu_change: F,
    ) -> Option<Self>
    where
        F: Fn(Option<EmojiMenu>) + Send + Sync + 'static,
    {
        if !settings.enabled {
            return None;
        }
        let Some(surface) = surface else {
            debug!("[Autocomplete] No composer found, autocomplete disabled");
            return None;
        };

        let index = EmojiIndex::global();
        index.load();

        let picker = Arc::new(Mutex::new(AutocompletePicker::new(settings.max_candidates)));
        let surface = Arc::new(Mutex::new(surface));
        let on_menu_change: Arc<MenuListener> = Arc::new(on_menu_change);

        let debouncer = Debouncer::spawn(Duration::from_millis(settings.debounce_ms), {
            let picker = picker.clone();
            let surface = surface.clone();
            let on_menu_change = on_menu_change.clone();
            move |()| {
                // Read the composer at settle time, not when the key was pressed
                let text = lock(&surface).text();
                let menu = {
                    let mut picker = lock(&picker);
                    picker.evaluate(&text, index);
                    picker.menu()
                };
                on_menu_change(menu);
            }
        });

        Some(Self {
            picker,
            surface,
            debouncer,
            on_menu_change,
        })
    }

    pub fn on_key_up(&self, key: &PickerKey) {
        if key.is_control() {
            return;
        }
        self.debouncer.push(());
    }

    /// Returns true when the key was consumed and the host should prevent its default action
    pub fn on_key_down(&self, key: &PickerKey) -> bool {
        let (handled, menu) = {
            let mut picker = lock(&self.picker);
            let handled = picker.handle_key(key, &mut *lock(&self.surface));
            (handled, picker.menu())
        };

        if handled {
            (self.on_menu_change)(menu);
        }
        handled
    }

    pub fn on_candidate_click(&self, candidate: usize) -> bool {
        let committed = lock(&self.picker).click(candidate, &mut *lock(&self.surface));
        if committed {
            (self.on_menu_change)(None);
        }
        committed
    }

    /// Click outside the menu
    pub fn dismiss(&self) {
        let was_open = {
            let mut picker = lock(&self.picker);
            let was_open = picker.is_open();
            picker.close();
            was_open
        };
        if was_open {
            (self.on_menu_change)(None);
        }
    }

    pub fn menu(&self) -> Option<EmojiMenu> {
        lock(&self.picker).menu()
    }

    /// Runs `f` against the bound composer
    pub fn with_surface<R>(&self, f: impl FnOnce(&mut S) -> R) -> R {
        f(&mut lock(&self.surface))
    }
}

impl<S: ComposerSurface + 'static> Drop for AutocompleteSession<S> {
    fn drop(&mut self) {
        self.debouncer.cancel();
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|e| e.into_inner())
}
