use crate::playlist::{PlaylistState, Song};
use crate::theme::ThemeState;

/// Number of history entries surfaced for the "Recent" card.
pub const RECENT_HISTORY_LEN: usize = 4;

#[derive(uniffi::Record, Clone, Debug, PartialEq)]
pub struct AppState {
    pub rev: u64,
    pub playlist: PlaylistViewState,
    pub theme: ThemeState,
    pub toast: Option<String>,
}

impl AppState {
    pub fn empty() -> Self {
        Self {
            rev: 0,
            playlist: PlaylistViewState::empty(),
            theme: ThemeState::default(),
            toast: None,
        }
    }
}

/// What the playlist screen renders. The undo/redo stacks themselves stay
/// inside the actor; the UI only needs to know whether they are non-empty.
#[derive(uniffi::Record, Clone, Debug, PartialEq, Eq)]
pub struct PlaylistViewState {
    pub songs: Vec<Song>,
    pub can_undo: bool,
    pub can_redo: bool,
    pub history: Vec<String>,
    pub recent_history: Vec<String>,
}

impl PlaylistViewState {
    pub fn empty() -> Self {
        Self::from_playlist(&PlaylistState::empty())
    }

    pub fn from_playlist(playlist: &PlaylistState) -> Self {
        Self {
            songs: playlist.present.clone(),
            can_undo: playlist.can_undo(),
            can_redo: playlist.can_redo(),
            history: playlist.history.clone(),
            recent_history: playlist
                .history
                .iter()
                .take(RECENT_HISTORY_LEN)
                .cloned()
                .collect(),
        }
    }

    pub fn has_items(&self) -> bool {
        !self.songs.is_empty()
    }
}
