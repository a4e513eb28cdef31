use crate::theme::{PalettePatch, ThemeMode};

#[derive(uniffi::Enum, Debug, Clone, PartialEq)]
pub enum AppAction {
    // Playlist
    AddSong { title: String },
    RemoveSong { id: String },
    ClearPlaylist,
    Undo,
    Redo,

    // Theme
    SetThemeMode { mode: ThemeMode },
    ToggleThemeMode,
    SetAccent { accent: String },
    SetCustomPalette { patch: PalettePatch },
    SetThemePreset { mode: ThemeMode },

    // UI
    ClearToast,
}

impl AppAction {
    /// Log-safe action tag (never includes user-entered text).
    pub fn tag(&self) -> &'static str {
        match self {
            // Playlist
            AppAction::AddSong { .. } => "AddSong",
            AppAction::RemoveSong { .. } => "RemoveSong",
            AppAction::ClearPlaylist => "ClearPlaylist",
            AppAction::Undo => "Undo",
            AppAction::Redo => "Redo",

            // Theme
            AppAction::SetThemeMode { .. } => "SetThemeMode",
            AppAction::ToggleThemeMode => "ToggleThemeMode",
            AppAction::SetAccent { .. } => "SetAccent",
            AppAction::SetCustomPalette { .. } => "SetCustomPalette",
            AppAction::SetThemePreset { .. } => "SetThemePreset",

            // UI
            AppAction::ClearToast => "ClearToast",
        }
    }
}
