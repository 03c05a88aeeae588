use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use serde::{Deserialize, Serialize};
use tracing::warn;

pub const THEME_FILE: &str = "theme_prefs.json";

#[derive(Default, Serialize, Deserialize)]
struct StoredTheme {
    #[serde(default)]
    is_dark_theme: bool,
}

/// The persisted light/dark flag. Read once at startup, rewritten on toggle.
pub struct ThemePreferences {
    path: PathBuf,
    is_dark: Mutex<bool>,
}

impl ThemePreferences {
    /// A missing or unreadable file means the light theme.
    pub fn load(path: PathBuf) -> Self {
        let stored = match fs::read(&path) {
            Ok(bytes) => serde_json::from_slice::<StoredTheme>(&bytes).unwrap_or_else(|e| {
                warn!(path = %path.display(), "ignoring malformed theme preferences: {e}");
                StoredTheme::default()
            }),
            Err(e) if e.kind() == io::ErrorKind::NotFound => StoredTheme::default(),
            Err(e) => {
                warn!(path = %path.display(), "failed to read theme preferences: {e}");
                StoredTheme::default()
            }
        };

        Self {
            path,
            is_dark: Mutex::new(stored.is_dark_theme),
        }
    }

    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        Self::load(dir.as_ref().join(THEME_FILE))
    }

    pub fn is_dark(&self) -> bool {
        *self.is_dark.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Flip the flag and persist it. On a write failure the flag is unchanged.
    pub fn toggle(&self) -> io::Result<bool> {
        let mut is_dark = self.is_dark.lock().unwrap_or_else(PoisonError::into_inner);
        let next = !*is_dark;

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let bytes = serde_json::to_vec(&StoredTheme {
            is_dark_theme: next,
        })?;
        fs::write(&self.path, bytes)?;

        *is_dark = next;
        Ok(next)
    }
}
