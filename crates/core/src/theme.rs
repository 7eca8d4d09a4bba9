//! Theme store
//!
//! Holds the light/dark preference. An explicit choice is persisted under
//! `theme`; without one the store follows the system color scheme.

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::sync::Arc;
use tracing::warn;

use crate::error::Error;
use crate::observable::{Observable, Subscription};
use crate::storage::KeyValueStorage;

/// Storage key of the theme preference
pub const THEME_KEY: &str = "theme";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    #[default]
    Dark,
}

impl Theme {
    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}

impl std::fmt::Display for Theme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Theme {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            other => Err(Error::InvalidInput(format!("Unknown theme: {}", other))),
        }
    }
}

#[derive(Clone)]
pub struct ThemeStore {
    value: Observable<Theme>,
    storage: Arc<dyn KeyValueStorage>,
}

impl ThemeStore {
    /// Resolve the initial theme: stored choice, then system preference, then dark
    pub fn load(storage: Arc<dyn KeyValueStorage>, system_prefers_light: bool) -> Self {
        let initial = Self::stored(storage.as_ref()).unwrap_or(if system_prefers_light {
            Theme::Light
        } else {
            Theme::Dark
        });

        Self {
            value: Observable::new(initial),
            storage,
        }
    }

    pub fn get(&self) -> Theme {
        self.value.get()
    }

    /// Set an explicit preference and persist it
    pub fn set(&self, theme: Theme) {
        self.persist(theme);
        self.value.set(theme);
    }

    /// Flip between light and dark, returning the new theme
    pub fn toggle(&self) -> Theme {
        let next = self.value.update(|current| current.toggled());
        self.persist(next);
        next
    }

    /// React to a change of the system color scheme
    ///
    /// Ignored once the user has made an explicit choice.
    pub fn system_preference_changed(&self, prefers_dark: bool) {
        if Self::stored(self.storage.as_ref()).is_some() {
            return;
        }
        let theme = if prefers_dark { Theme::Dark } else { Theme::Light };
        self.value.set(theme);
    }

    pub fn subscribe(&self, callback: impl Fn(Theme) + Send + Sync + 'static) -> Subscription {
        self.value.subscribe(move |theme| callback(*theme))
    }

    fn stored(storage: &dyn KeyValueStorage) -> Option<Theme> {
        match storage.get(THEME_KEY) {
            Ok(value) => value.and_then(|raw| raw.parse().ok()),
            Err(e) => {
                warn!("Failed to read stored theme: {}", e);
                None
            }
        }
    }

    fn persist(&self, theme: Theme) {
        if let Err(e) = self.storage.set(THEME_KEY, theme.as_str()) {
            warn!("Failed to persist theme: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;

    #[test]
    fn test_initial_theme_resolution() {
        let storage = Arc::new(MemoryStorage::new());
        assert_eq!(ThemeStore::load(storage.clone(), false).get(), Theme::Dark);
        assert_eq!(ThemeStore::load(storage.clone(), true).get(), Theme::Light);

        storage.set(THEME_KEY, "dark").unwrap();
        assert_eq!(ThemeStore::load(storage.clone(), true).get(), Theme::Dark);

        storage.set(THEME_KEY, "purple").unwrap();
        assert_eq!(ThemeStore::load(storage, false).get(), Theme::Dark);
    }

    #[test]
    fn test_toggle_flips_and_persists() {
        let storage = Arc::new(MemoryStorage::new());
        let store = ThemeStore::load(storage.clone(), false);

        assert_eq!(store.toggle(), Theme::Light);
        assert_eq!(store.get(), Theme::Light);
        assert_eq!(storage.get(THEME_KEY).unwrap(), Some("light".to_string()));

        assert_eq!(store.toggle(), Theme::Dark);
        assert_eq!(store.get(), Theme::Dark);
        assert_eq!(storage.get(THEME_KEY).unwrap(), Some("dark".to_string()));
    }

    #[test]
    fn test_system_change_only_without_explicit_choice() {
        let storage = Arc::new(MemoryStorage::new());
        let store = ThemeStore::load(storage.clone(), false);

        store.system_preference_changed(false);
        assert_eq!(store.get(), Theme::Light);

        store.set(Theme::Dark);
        store.system_preference_changed(false);
        assert_eq!(store.get(), Theme::Dark);
    }

    #[test]
    fn test_theme_parse_and_display() {
        assert_eq!("light".parse::<Theme>().unwrap(), Theme::Light);
        assert!("blue".parse::<Theme>().is_err());
        assert_eq!(Theme::Dark.to_string(), "dark");
    }
}
