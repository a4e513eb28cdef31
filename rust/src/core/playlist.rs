// Playlist store wiring: startup restore, reducer dispatch, debounced save.

use super::*;

use crate::playlist::{read_playlist, RestoreError};
use crate::state::PlaylistViewState;

pub(super) const RESTORE_FAILED_TOAST: &str = "Couldn't restore previous playlist.";

impl AppCore {
    pub(super) fn restore_playlist_from_storage(&mut self) {
        match read_playlist(self.storage.as_ref()) {
            Ok(Some(restored)) => {
                tracing::info!(
                    songs = restored.present.len(),
                    undo_depth = restored.past.len(),
                    redo_depth = restored.future.len(),
                    "restored playlist"
                );
                self.playlist.apply(PlaylistAction::Restore(restored));
                self.sync_playlist_view();
            }
            Ok(None) => tracing::debug!("no persisted playlist"),
            Err(e) => {
                match &e {
                    RestoreError::Storage(_) => tracing::warn!(%e, "playlist read failed"),
                    _ => tracing::warn!(%e, "persisted playlist is malformed; starting empty"),
                }
                // Startup: nobody is listening yet, the initial snapshot carries the notice.
                self.state.toast = Some(RESTORE_FAILED_TOAST.into());
            }
        }
    }

    pub(super) fn apply_playlist(&mut self, action: PlaylistAction) {
        let tag = action.tag();
        if !self.playlist.apply(action) {
            tracing::debug!(action = tag, "playlist unchanged");
            return;
        }
        self.sync_playlist_view();
        self.emit_playlist();
        self.schedule_playlist_write();
    }

    fn sync_playlist_view(&mut self) {
        self.state.playlist = PlaylistViewState::from_playlist(&self.playlist);
    }

    fn schedule_playlist_write(&mut self) {
        let json = match serde_json::to_string(&self.playlist) {
            Ok(json) => json,
            Err(e) => {
                tracing::warn!(%e, "failed to encode playlist; skipping save");
                return;
            }
        };
        let on_done = self.write_finished_callback(PLAYLIST_STORAGE_KEY, json.len());
        self.playlist_writer.schedule(
            self.runtime.handle(),
            self.storage.clone(),
            json,
            on_done,
        );
    }
}
