//! Theme store: mode, accent colour and the palette derived from them.
//!
//! Transitions are pure `(ThemeState, ThemeAction) -> ThemeState`. The app
//! actor owns the only live instance and hands copies to the UI.

use serde::{Deserialize, Serialize};

use crate::storage::{KeyValueStorage, StorageError, THEME_STORAGE_KEY};

pub const DEFAULT_ACCENT: &str = "#1DB954";

#[derive(uniffi::Enum, Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    Light,
    Dark,
    Custom,
}

#[derive(uniffi::Record, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Palette {
    pub background: String,
    pub card: String,
    pub text: String,
    pub muted: String,
    pub accent: String,
}

impl Palette {
    pub fn light(accent: &str) -> Self {
        Self {
            background: "#FFFFFF".into(),
            card: "#F5F5F5".into(),
            text: "#0B0B0B".into(),
            muted: "#8A8A8E".into(),
            accent: accent.into(),
        }
    }

    pub fn dark(accent: &str) -> Self {
        Self {
            background: "#0B0B0B".into(),
            card: "#151515".into(),
            text: "#FFFFFF".into(),
            muted: "#8A8A8E".into(),
            accent: accent.into(),
        }
    }
}

/// Partial palette override for [`ThemeAction::SetCustomPalette`].
#[derive(uniffi::Record, Clone, Debug, Default, PartialEq, Eq)]
pub struct PalettePatch {
    pub background: Option<String>,
    pub card: Option<String>,
    pub text: Option<String>,
    pub muted: Option<String>,
}

#[derive(uniffi::Record, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThemeState {
    pub mode: ThemeMode,
    pub accent: String,
    pub colors: Palette,
}

impl Default for ThemeState {
    fn default() -> Self {
        Self {
            mode: ThemeMode::Light,
            accent: DEFAULT_ACCENT.into(),
            colors: Palette::light(DEFAULT_ACCENT),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ThemeAction {
    SetMode(ThemeMode),
    ToggleMode,
    SetAccent(String),
    SetCustomPalette(PalettePatch),
    SetPreset(ThemeMode),
}

impl ThemeState {
    pub fn reduce(mut self, action: ThemeAction) -> Self {
        match action {
            ThemeAction::SetMode(mode) | ThemeAction::SetPreset(mode) => {
                self.mode = mode;
                // Custom keeps whatever palette is already there.
                if let Some(palette) = self.derived_palette() {
                    self.colors = palette;
                }
            }
            ThemeAction::ToggleMode => {
                self.mode = match self.mode {
                    ThemeMode::Dark => ThemeMode::Light,
                    ThemeMode::Light | ThemeMode::Custom => ThemeMode::Dark,
                };
                if let Some(palette) = self.derived_palette() {
                    self.colors = palette;
                }
            }
            ThemeAction::SetAccent(accent) => {
                self.accent = accent;
                match self.derived_palette() {
                    Some(palette) => self.colors = palette,
                    None => self.colors.accent = self.accent.clone(),
                }
            }
            ThemeAction::SetCustomPalette(patch) => {
                self.mode = ThemeMode::Custom;
                let PalettePatch {
                    background,
                    card,
                    text,
                    muted,
                } = patch;
                if let Some(v) = background {
                    self.colors.background = v;
                }
                if let Some(v) = card {
                    self.colors.card = v;
                }
                if let Some(v) = text {
                    self.colors.text = v;
                }
                if let Some(v) = muted {
                    self.colors.muted = v;
                }
                self.colors.accent = self.accent.clone();
            }
        }
        self
    }

    fn derived_palette(&self) -> Option<Palette> {
        match self.mode {
            ThemeMode::Light => Some(Palette::light(&self.accent)),
            ThemeMode::Dark => Some(Palette::dark(&self.accent)),
            ThemeMode::Custom => None,
        }
    }
}

pub fn read_theme(storage: &dyn KeyValueStorage) -> Result<Option<ThemeState>, StorageError> {
    match storage.get_item(THEME_STORAGE_KEY)? {
        Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
        None => Ok(None),
    }
}

pub fn write_theme(storage: &dyn KeyValueStorage, theme: &ThemeState) -> Result<(), StorageError> {
    let json = serde_json::to_string(theme)?;
    storage.set_item(THEME_STORAGE_KEY, &json)
}
