// Theme store wiring.

use super::*;

use crate::theme::read_theme;

impl AppCore {
    pub(super) fn restore_theme_from_storage(&mut self) {
        match read_theme(self.storage.as_ref()) {
            Ok(Some(theme)) => {
                tracing::debug!(mode = ?theme.mode, "restored theme");
                self.state.theme = theme;
            }
            Ok(None) => {}
            // Theme is cosmetic; a bad record just means defaults.
            Err(e) => tracing::warn!(%e, "ignoring persisted theme"),
        }
    }

    pub(super) fn apply_theme(&mut self, action: ThemeAction) {
        let next = self.state.theme.clone().reduce(action);
        if next == self.state.theme {
            return;
        }
        self.state.theme = next;
        self.emit_theme();

        let json = match serde_json::to_string(&self.state.theme) {
            Ok(json) => json,
            Err(e) => {
                tracing::warn!(%e, "failed to encode theme; skipping save");
                return;
            }
        };
        let on_done = self.write_finished_callback(THEME_STORAGE_KEY, json.len());
        self.theme_writer
            .schedule(self.runtime.handle(), self.storage.clone(), json, on_done);
    }
}
