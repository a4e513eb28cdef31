//! Playlist store with linear undo/redo and a bounded action log.
//!
//! `present` is the visible playlist (newest first). Every mutating action
//! pushes the previous `present` onto `past` and drops `future`; `Undo` and
//! `Redo` shuttle owned snapshots between the three. `history` is a
//! human-readable log of what happened, newest first.

use std::time::{SystemTime, UNIX_EPOCH};

use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::storage::{KeyValueStorage, StorageError, PLAYLIST_STORAGE_KEY};

/// Maximum number of entries kept in [`PlaylistState::history`].
pub const HISTORY_LIMIT: usize = 50;

#[derive(uniffi::Record, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Song {
    pub id: String,
    pub title: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaylistState {
    pub past: Vec<Vec<Song>>,
    pub present: Vec<Song>,
    pub future: Vec<Vec<Song>>,
    #[serde(default)]
    pub history: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PlaylistAction {
    Add { title: String },
    Remove { id: String },
    Clear,
    Undo,
    Redo,
    /// Replace the whole state. Callers validate first (see
    /// [`PlaylistState::from_persisted`]).
    Restore(PlaylistState),
}

impl PlaylistAction {
    pub fn tag(&self) -> &'static str {
        match self {
            PlaylistAction::Add { .. } => "Add",
            PlaylistAction::Remove { .. } => "Remove",
            PlaylistAction::Clear => "Clear",
            PlaylistAction::Undo => "Undo",
            PlaylistAction::Redo => "Redo",
            PlaylistAction::Restore(_) => "Restore",
        }
    }
}

#[derive(Debug, Error)]
pub enum RestoreError {
    #[error("persisted playlist is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("persisted playlist is not a JSON object")]
    NotAnObject,

    #[error("persisted playlist is missing `{field}`")]
    MissingField { field: &'static str },

    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl PlaylistState {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn can_undo(&self) -> bool {
        !self.past.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.future.is_empty()
    }

    pub fn has_items(&self) -> bool {
        !self.present.is_empty()
    }

    pub fn len(&self) -> usize {
        self.present.len()
    }

    pub fn is_empty(&self) -> bool {
        self.present.is_empty()
    }

    /// Pure form of [`PlaylistState::apply`].
    pub fn reduce(mut self, action: PlaylistAction) -> Self {
        self.apply(action);
        self
    }

    /// Apply `action` in place. Returns `false` when the action was a no-op
    /// and the state is exactly what it was before.
    pub fn apply(&mut self, action: PlaylistAction) -> bool {
        match action {
            PlaylistAction::Add { title } => {
                let title = title.trim();
                if title.is_empty() {
                    return false;
                }
                let song = Song {
                    id: self.fresh_id(),
                    title: title.to_string(),
                };
                let mut next = Vec::with_capacity(self.present.len() + 1);
                next.push(song);
                next.extend(self.present.iter().cloned());
                self.commit(next);
                self.log(format!("Added “{title}”"));
                true
            }
            PlaylistAction::Remove { id } => {
                let next: Vec<Song> = self
                    .present
                    .iter()
                    .filter(|s| s.id != id)
                    .cloned()
                    .collect();
                let removed = self
                    .present
                    .iter()
                    .find(|s| s.id == id)
                    .map(|s| s.title.clone());
                // An unknown id still records an undo point, it just isn't logged.
                self.commit(next);
                if let Some(title) = removed {
                    self.log(format!("Removed “{title}”"));
                }
                true
            }
            PlaylistAction::Clear => {
                if self.present.is_empty() {
                    return false;
                }
                self.commit(Vec::new());
                self.log("Cleared playlist");
                true
            }
            PlaylistAction::Undo => {
                let Some(previous) = self.past.pop() else {
                    return false;
                };
                let current = std::mem::replace(&mut self.present, previous);
                self.future.insert(0, current);
                self.log("Undo");
                true
            }
            PlaylistAction::Redo => {
                if self.future.is_empty() {
                    return false;
                }
                let next = self.future.remove(0);
                let current = std::mem::replace(&mut self.present, next);
                self.past.push(current);
                self.log("Redo");
                true
            }
            PlaylistAction::Restore(state) => {
                *self = state;
                true
            }
        }
    }

    /// Parse a persisted record. `present`, `past` and `future` must all be
    /// present; `history` may be absent. Nothing is applied on failure.
    pub fn from_persisted(raw: &str) -> Result<Self, RestoreError> {
        let value: serde_json::Value = serde_json::from_str(raw)?;
        let Some(obj) = value.as_object() else {
            return Err(RestoreError::NotAnObject);
        };
        for field in ["present", "past", "future"] {
            if obj.get(field).is_none_or(serde_json::Value::is_null) {
                return Err(RestoreError::MissingField { field });
            }
        }
        let mut state: PlaylistState = serde_json::from_value(value)?;
        state.history.truncate(HISTORY_LIMIT);
        Ok(state)
    }

    fn commit(&mut self, next: Vec<Song>) {
        let previous = std::mem::replace(&mut self.present, next);
        self.past.push(previous);
        self.future.clear();
    }

    fn log(&mut self, entry: impl Into<String>) {
        self.history.insert(0, entry.into());
        self.history.truncate(HISTORY_LIMIT);
    }

    fn fresh_id(&self) -> String {
        loop {
            let id = new_song_id();
            if !self.present.iter().any(|s| s.id == id) {
                return id;
            }
        }
    }
}

/// Millisecond timestamp in base 36, a dash, then six random base-36 digits.
pub fn new_song_id() -> String {
    let millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64;
    let mut rng = rand::thread_rng();
    let suffix: String = (0..6)
        .map(|_| char::from_digit(rng.gen_range(0..36), 36).unwrap_or('0'))
        .collect();
    format!("{}-{suffix}", to_base36(millis))
}

fn to_base36(mut n: u64) -> String {
    if n == 0 {
        return "0".into();
    }
    let mut digits = Vec::new();
    while n > 0 {
        digits.push(char::from_digit((n % 36) as u32, 36).unwrap_or('0'));
        n /= 36;
    }
    digits.iter().rev().collect()
}

/// Read the persisted playlist. `Ok(None)` when nothing was ever saved.
pub fn read_playlist(storage: &dyn KeyValueStorage) -> Result<Option<PlaylistState>, RestoreError> {
    match storage.get_item(PLAYLIST_STORAGE_KEY)? {
        Some(raw) => PlaylistState::from_persisted(&raw).map(Some),
        None => Ok(None),
    }
}

pub fn write_playlist(
    storage: &dyn KeyValueStorage,
    state: &PlaylistState,
) -> Result<(), StorageError> {
    let json = serde_json::to_string(state)?;
    storage.set_item(PLAYLIST_STORAGE_KEY, &json)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn add(state: PlaylistState, title: &str) -> PlaylistState {
        state.reduce(PlaylistAction::Add {
            title: title.into(),
        })
    }

    fn titles(songs: &[Song]) -> Vec<&str> {
        songs.iter().map(|s| s.title.as_str()).collect()
    }

    #[test]
    fn add_prepends_and_logs() {
        let s = add(PlaylistState::empty(), "Song A");
        assert_eq!(titles(&s.present), vec!["Song A"]);
        assert_eq!(s.history[0], "Added “Song A”");

        let s = add(s, "Song B");
        assert_eq!(titles(&s.present), vec!["Song B", "Song A"]);
        assert_eq!(s.past.len(), 2);
        assert!(s.future.is_empty());
    }

    #[test]
    fn add_trims_title() {
        let s = add(PlaylistState::empty(), "  Hey Jude \n");
        assert_eq!(s.present[0].title, "Hey Jude");
        assert_eq!(s.history[0], "Added “Hey Jude”");
    }

    #[test]
    fn blank_add_is_a_noop() {
        let before = add(PlaylistState::empty(), "Song A");
        for blank in ["", "   ", "\t\n"] {
            let mut s = before.clone();
            assert!(!s.apply(PlaylistAction::Add {
                title: blank.into()
            }));
            assert_eq!(s, before);
        }
    }

    #[test]
    fn undo_and_redo_walk_the_snapshots() {
        let s = add(PlaylistState::empty(), "Song A");
        let after_a = s.present.clone();
        let s = add(s, "Song B");
        let after_b = s.present.clone();

        let s = s.reduce(PlaylistAction::Undo);
        assert_eq!(s.present, after_a);
        assert_eq!(s.future, vec![after_b.clone()]);
        assert_eq!(s.history[0], "Undo");

        let s = s.reduce(PlaylistAction::Redo);
        assert_eq!(s.present, after_b);
        assert!(s.future.is_empty());
        assert_eq!(s.history[0], "Redo");
    }

    #[test]
    fn undo_restores_exact_ids_and_order() {
        let s = add(add(PlaylistState::empty(), "x"), "y");
        let before = s.present.clone();
        let s = add(s, "z");
        let after = s.present.clone();
        let s = s.reduce(PlaylistAction::Undo);
        assert_eq!(s.present, before);
        let s = s.reduce(PlaylistAction::Redo);
        assert_eq!(s.present, after);
    }

    #[test]
    fn redo_pops_one_future_entry_at_a_time() {
        let s = add(add(add(PlaylistState::empty(), "a"), "b"), "c");
        let s = s.reduce(PlaylistAction::Undo).reduce(PlaylistAction::Undo);
        assert_eq!(s.future.len(), 2);
        let s = s.reduce(PlaylistAction::Redo);
        assert_eq!(s.future.len(), 1);
        assert_eq!(titles(&s.present), vec!["b", "a"]);
    }

    #[test]
    fn new_mutation_drops_redo_stack() {
        let s = add(add(PlaylistState::empty(), "a"), "b");
        let s = s.reduce(PlaylistAction::Undo);
        assert!(s.can_redo());
        let s = add(s, "c");
        assert!(!s.can_redo());
    }

    #[test]
    fn undo_redo_on_empty_stacks_are_noops() {
        let mut s = PlaylistState::empty();
        assert!(!s.apply(PlaylistAction::Undo));
        assert!(!s.apply(PlaylistAction::Redo));
        assert_eq!(s, PlaylistState::empty());
    }

    #[test]
    fn remove_logs_the_removed_title() {
        let s = add(add(PlaylistState::empty(), "a"), "b");
        let id = s.present[1].id.clone();
        let s = s.reduce(PlaylistAction::Remove { id });
        assert_eq!(titles(&s.present), vec!["b"]);
        assert_eq!(s.history[0], "Removed “a”");
        assert_eq!(s.past.len(), 3);
    }

    #[test]
    fn remove_unknown_id_records_undo_point_without_logging() {
        let s = add(PlaylistState::empty(), "a");
        let history = s.history.clone();
        let present = s.present.clone();

        let mut s = s;
        assert!(s.apply(PlaylistAction::Remove {
            id: "missing".into()
        }));
        assert_eq!(s.history, history);
        assert_eq!(s.present, present);
        assert_eq!(s.past.len(), 2);

        let s = s.reduce(PlaylistAction::Undo);
        assert_eq!(s.present, present);
    }

    #[test]
    fn clear_on_empty_is_a_full_noop() {
        let mut s = PlaylistState::empty();
        assert!(!s.apply(PlaylistAction::Clear));
        assert_eq!(s, PlaylistState::empty());
    }

    #[test]
    fn clear_empties_and_can_be_undone() {
        let s = add(add(PlaylistState::empty(), "a"), "b");
        let before = s.present.clone();
        let s = s.reduce(PlaylistAction::Clear);
        assert!(s.present.is_empty());
        assert_eq!(s.history[0], "Cleared playlist");
        let s = s.reduce(PlaylistAction::Undo);
        assert_eq!(s.present, before);
    }

    #[test]
    fn history_is_capped() {
        let mut s = PlaylistState::empty();
        for i in 0..120 {
            let action = match i % 4 {
                0 | 1 => PlaylistAction::Add {
                    title: format!("song {i}"),
                },
                2 => PlaylistAction::Remove {
                    id: s.present.first().map(|x| x.id.clone()).unwrap_or_default(),
                },
                _ => PlaylistAction::Clear,
            };
            s.apply(action);
            assert!(s.history.len() <= HISTORY_LIMIT);
        }
        assert_eq!(s.history.len(), HISTORY_LIMIT);
    }

    #[test]
    fn ids_stay_unique() {
        let mut s = PlaylistState::empty();
        for i in 0..200 {
            s.apply(PlaylistAction::Add {
                title: format!("t{i}"),
            });
        }
        let mut ids: Vec<&str> = s.present.iter().map(|x| x.id.as_str()).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), 200);
    }

    #[test]
    fn song_id_shape() {
        let id = new_song_id();
        let (ts, suffix) = id.split_once('-').unwrap();
        assert!(!ts.is_empty());
        assert_eq!(suffix.len(), 6);
        assert!(id
            .chars()
            .all(|c| c == '-' || c.is_ascii_digit() || c.is_ascii_lowercase()));
    }

    #[test]
    fn base36_matches_known_values() {
        assert_eq!(to_base36(0), "0");
        assert_eq!(to_base36(35), "z");
        assert_eq!(to_base36(36), "10");
        assert_eq!(to_base36(1_700_000_000_000), "loyw3v28");
    }

    #[test]
    fn from_persisted_accepts_full_record() {
        let s = add(add(PlaylistState::empty(), "a"), "b").reduce(PlaylistAction::Undo);
        let json = serde_json::to_string(&s).unwrap();
        assert_eq!(PlaylistState::from_persisted(&json).unwrap(), s);
    }

    #[test]
    fn from_persisted_defaults_missing_history() {
        let raw = r#"{"past":[],"present":[{"id":"1","title":"a"}],"future":[]}"#;
        let s = PlaylistState::from_persisted(raw).unwrap();
        assert_eq!(s.present.len(), 1);
        assert!(s.history.is_empty());
    }

    #[test]
    fn from_persisted_rejects_missing_future() {
        let raw = r#"{"past":[],"present":[]}"#;
        let err = PlaylistState::from_persisted(raw).unwrap_err();
        assert!(matches!(err, RestoreError::MissingField { field: "future" }));
    }

    #[test]
    fn from_persisted_rejects_null_and_garbage() {
        assert!(matches!(
            PlaylistState::from_persisted(r#"{"past":null,"present":[],"future":[]}"#),
            Err(RestoreError::MissingField { field: "past" })
        ));
        assert!(matches!(
            PlaylistState::from_persisted("[1,2]"),
            Err(RestoreError::NotAnObject)
        ));
        assert!(matches!(
            PlaylistState::from_persisted("{not json"),
            Err(RestoreError::Json(_))
        ));
        assert!(matches!(
            PlaylistState::from_persisted(r#"{"past":[],"present":"x","future":[]}"#),
            Err(RestoreError::Json(_))
        ));
    }

    #[test]
    fn failed_restore_leaves_prior_state() {
        let prior = add(PlaylistState::empty(), "keep me");
        let mut s = prior.clone();
        if let Ok(restored) = PlaylistState::from_persisted(r#"{"past":[],"present":[]}"#) {
            s.apply(PlaylistAction::Restore(restored));
        }
        assert_eq!(s, prior);
    }
}
