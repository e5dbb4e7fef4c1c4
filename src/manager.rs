//! The localization context: available languages, the active table, and change observers.
//!
//! A [`LocalizationManager`] is an ordinary value owned by the application's composition
//! root and shared (usually behind an `Arc`) with whatever needs strings. Lookups never
//! fail; every switching operation reports success as a `bool` and leaves the previous
//! state in place when it fails.

use std::{
    collections::HashSet,
    path::{Path, PathBuf},
    sync::{
        Arc, RwLock, RwLockReadGuard, RwLockWriteGuard,
        atomic::{AtomicBool, AtomicU64, Ordering},
    },
};

use tracing::{debug, warn};

use crate::{
    discovery::discover,
    error::Error,
    language::Language,
    locale::system_locale,
    observer::{LanguageObserver, ObserverRegistry, Subscription},
    options::LocalizationOptions,
    table::TranslationTable,
    traits::Parser,
};

#[derive(Debug)]
struct State {
    available: HashSet<Language>,
    available_ticket: u64,
    current_language: Language,
    current_table: Arc<TranslationTable>,
    current_ticket: u64,
}

/// Monotonic ticket source. A result is only committed when its ticket is newer than the
/// last committed one, so a slow call can never overwrite the outcome of a later call.
#[derive(Debug, Default)]
struct Generation(AtomicU64);

impl Generation {
    fn next(&self) -> u64 {
        self.0.fetch_add(1, Ordering::SeqCst) + 1
    }
}

/// Owns the localization state of an application.
#[derive(Debug)]
pub struct LocalizationManager {
    options: LocalizationOptions,
    diagnostic_mode: AtomicBool,
    state: RwLock<State>,
    observers: ObserverRegistry,
    discovery_generation: Generation,
    switch_generation: Generation,
}

impl Default for LocalizationManager {
    fn default() -> Self {
        Self::new(LocalizationOptions::default())
    }
}

impl LocalizationManager {
    /// Creates a manager with only the built-in language available and active.
    pub fn new(options: LocalizationOptions) -> Self {
        let builtin = Language::builtin().clone();
        Self {
            diagnostic_mode: AtomicBool::new(options.diagnostic_mode),
            options,
            state: RwLock::new(State {
                available: HashSet::from([builtin.clone()]),
                available_ticket: 0,
                current_language: builtin,
                current_table: TranslationTable::builtin(),
                current_ticket: 0,
            }),
            observers: ObserverRegistry::new(),
            discovery_generation: Generation::default(),
            switch_generation: Generation::default(),
        }
    }

    pub fn options(&self) -> &LocalizationOptions {
        &self.options
    }

    pub fn diagnostic_mode(&self) -> bool {
        self.diagnostic_mode.load(Ordering::Relaxed)
    }

    /// Switches between diagnostic placeholders and bare keys for missing strings.
    pub fn set_diagnostic_mode(&self, enabled: bool) {
        self.diagnostic_mode.store(enabled, Ordering::Relaxed);
    }

    /// Snapshot of the languages found by the last discovery (always includes the built-in).
    pub fn available_languages(&self) -> HashSet<Language> {
        self.read().available.clone()
    }

    pub fn current_language(&self) -> Language {
        self.read().current_language.clone()
    }

    /// The active table. The returned `Arc` stays valid across later switches.
    pub fn current_localization(&self) -> Arc<TranslationTable> {
        Arc::clone(&self.read().current_table)
    }

    /// Rescans the language directory and replaces the available set with the result.
    ///
    /// Returns the installed set. When a discovery that started later has already
    /// committed, this call's result is dropped and the newer set is returned.
    pub fn discover_languages(&self) -> HashSet<Language> {
        let ticket = self.discovery_generation.next();
        let found = discover(
            &self.options.language_dir,
            self.options.normalized_extension(),
            &self.options.reserved_file_name,
        );

        let mut state = self.write();
        if ticket > state.available_ticket {
            state.available = found;
            state.available_ticket = ticket;
        } else {
            debug!("discovery #{} superseded, keeping newer result", ticket);
        }
        state.available.clone()
    }

    /// Activates `language`.
    ///
    /// The built-in language (recognized by its file name token) always succeeds. Any other
    /// language fails when its file is gone or cannot be parsed; the previous language
    /// then stays active. Observers are notified after every successful switch.
    pub fn set_language(&self, language: &Language) -> bool {
        let ticket = self.switch_generation.next();
        let result = if language.is_builtin() {
            self.install(
                ticket,
                Language::builtin().clone(),
                TranslationTable::builtin(),
            )
        } else {
            load_table(language.file_path())
                .and_then(|table| self.install(ticket, language.clone(), table))
        };
        report(language.file_path(), result)
    }

    /// Activates the language file at `path`, which need not have been discovered.
    ///
    /// The display name is taken from the file's own `LanguageName` entry.
    pub fn set_language_from_file<P: AsRef<Path>>(&self, path: P) -> bool {
        let path = path.as_ref();
        let ticket = self.switch_generation.next();
        let result = load_table(path).and_then(|table| {
            let name = table.language_name().unwrap_or_default().to_string();
            self.install(ticket, Language::new(name, path), table)
        });
        report(path, result)
    }

    /// Activates the available language matching the system locale.
    pub fn match_current_locale(&self) -> bool {
        match system_locale() {
            Some(locale) => {
                debug!("current locale is {}", locale);
                self.match_locale(&locale)
            }
            None => {
                debug!("no system locale configured");
                false
            }
        }
    }

    /// Activates the available language whose display string contains `locale`,
    /// ignoring case. Among several matches the one with the smallest path wins.
    pub fn match_locale(&self, locale: &str) -> bool {
        let needle = locale.trim().to_lowercase();
        if needle.is_empty() {
            return false;
        }

        let candidate = self
            .read()
            .available
            .iter()
            .filter(|language| language.to_string().to_lowercase().contains(&needle))
            .min_by(|a, b| a.file_path().cmp(b.file_path()))
            .cloned();

        match candidate {
            Some(language) => self.set_language(&language),
            None => {
                debug!("no available language matches locale {}", locale);
                false
            }
        }
    }

    /// Resolves `key` against the active table, then the built-in table.
    ///
    /// A key missing from both renders as `|"<current file>":<key>|` in diagnostic mode and
    /// as the bare key otherwise.
    pub fn get_localized_string(&self, key: &str) -> String {
        let state = self.read();
        if let Some(value) = state.current_table.get(key) {
            return value.to_string();
        }
        if let Some(value) = TranslationTable::builtin().get(key) {
            return value.to_string();
        }
        if self.diagnostic_mode() {
            format!(
                "|\"{}\":{}|",
                state.current_language.file_path().display(),
                key
            )
        } else {
            key.to_string()
        }
    }

    /// Registers an observer; it is notified once right away and after every switch.
    pub fn subscribe(&self, observer: Arc<dyn LanguageObserver>) -> Subscription {
        self.observers.subscribe(observer)
    }

    pub fn observers(&self) -> &ObserverRegistry {
        &self.observers
    }

    /// Writes the built-in table as a template for translators under the reserved file
    /// name, creating the language directory if needed. Returns the written path.
    pub fn save_builtin_localization(&self) -> Result<PathBuf, Error> {
        self.options.validate()?;
        std::fs::create_dir_all(&self.options.language_dir)?;
        let path = self.options.builtin_file_path();
        TranslationTable::builtin().write_to(&path)?;
        debug!("built-in localization written to {}", path.display());
        Ok(path)
    }

    fn install(
        &self,
        ticket: u64,
        language: Language,
        table: Arc<TranslationTable>,
    ) -> Result<(), Error> {
        {
            let mut state = self.write();
            if ticket <= state.current_ticket {
                return Err(Error::Superseded);
            }
            state.current_language = language;
            state.current_table = table;
            state.current_ticket = ticket;
            debug!("language changed to \"{}\"", state.current_language);
        }
        self.observers.notify_all();
        Ok(())
    }

    // No code panics while holding the lock (observers run after release), so a poisoned
    // lock still guards a consistent state.
    fn read(&self) -> RwLockReadGuard<'_, State> {
        self.state.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, State> {
        self.state
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

fn load_table(path: &Path) -> Result<Arc<TranslationTable>, Error> {
    if !path.is_file() {
        return Err(Error::MissingFile(path.to_path_buf()));
    }
    TranslationTable::read_from(path).map(Arc::new)
}

fn report(path: &Path, result: Result<(), Error>) -> bool {
    match result {
        Ok(()) => true,
        Err(Error::Superseded) => {
            debug!("switch to {} superseded by a newer switch", path.display());
            false
        }
        Err(e) => {
            warn!("cannot switch language to {}: {}", path.display(), e);
            false
        }
    }
}
