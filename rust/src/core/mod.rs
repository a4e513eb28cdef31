mod config;
mod persist;
mod playlist;
mod theme;

use std::sync::{Arc, RwLock};

use flume::Sender;

use crate::actions::AppAction;
use crate::playlist::{PlaylistAction, PlaylistState};
use crate::state::AppState;
use crate::storage::{
    FileStorage, MemoryStorage, SharedStorage, StorageError, PLAYLIST_STORAGE_KEY,
    THEME_STORAGE_KEY,
};
use crate::theme::ThemeAction;
use crate::updates::{AppUpdate, CoreMsg, InternalEvent};

pub(crate) use config::default_app_config_json;

use config::AppConfig;
use persist::DebouncedWriter;

pub struct AppCore {
    pub state: AppState,
    rev: u64,

    update_sender: Sender<AppUpdate>,
    core_sender: Sender<CoreMsg>,
    shared_state: Arc<RwLock<AppState>>,

    runtime: tokio::runtime::Runtime,
    storage: SharedStorage,

    // Source of truth for the playlist; `state.playlist` is a view of it.
    playlist: PlaylistState,
    playlist_writer: DebouncedWriter,
    theme_writer: DebouncedWriter,
}

impl AppCore {
    pub fn new(
        update_sender: Sender<AppUpdate>,
        core_sender: Sender<CoreMsg>,
        data_dir: String,
        shared_state: Arc<RwLock<AppState>>,
    ) -> Self {
        let config = config::load_app_config(&data_dir);
        let storage: SharedStorage = if config.persistence_enabled() {
            Arc::new(FileStorage::new(&data_dir))
        } else {
            tracing::info!("persistence disabled; using in-memory storage");
            Arc::new(MemoryStorage::new())
        };
        Self::with_storage(update_sender, core_sender, config, storage, shared_state)
    }

    fn with_storage(
        update_sender: Sender<AppUpdate>,
        core_sender: Sender<CoreMsg>,
        config: AppConfig,
        storage: SharedStorage,
        shared_state: Arc<RwLock<AppState>>,
    ) -> Self {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .thread_name("spotlite-persist")
            .enable_time()
            .build()
            .expect("tokio runtime");

        let debounce = config.persist_debounce();
        let mut this = Self {
            state: AppState::empty(),
            rev: 0,
            update_sender,
            core_sender,
            shared_state,
            runtime,
            storage,
            playlist: PlaylistState::empty(),
            playlist_writer: DebouncedWriter::new(PLAYLIST_STORAGE_KEY, debounce),
            theme_writer: DebouncedWriter::new(THEME_STORAGE_KEY, debounce),
        };

        // Exactly one read per store at startup.
        this.restore_playlist_from_storage();
        this.restore_theme_from_storage();

        // Ensure FfiApp.state() has an immediately-available snapshot.
        let snapshot = this.state.clone();
        this.commit_state_snapshot(&snapshot);
        this
    }

    fn next_rev(&mut self) -> u64 {
        self.rev += 1;
        self.state.rev = self.rev;
        self.rev
    }

    fn commit_state_snapshot(&self, snapshot: &AppState) {
        match self.shared_state.write() {
            Ok(mut g) => *g = snapshot.clone(),
            Err(poison) => *poison.into_inner() = snapshot.clone(),
        }
    }

    fn emit_state(&mut self) {
        self.next_rev();
        let snapshot = self.state.clone();
        self.commit_state_snapshot(&snapshot);
        let _ = self.update_sender.send(AppUpdate::FullState(snapshot));
    }

    fn emit_playlist(&mut self) {
        self.emit_state();
    }

    fn emit_theme(&mut self) {
        self.emit_state();
    }

    fn emit_toast(&mut self) {
        self.emit_state();
    }

    pub fn handle_message(&mut self, msg: CoreMsg) {
        match msg {
            CoreMsg::Action(ref action) => {
                // Never log `?action` directly: titles are user-entered text.
                tracing::info!(action = action.tag(), "dispatch");
                self.handle_action(action.clone());
            }
            CoreMsg::Internal(internal) => self.handle_internal(*internal),
        }
    }

    fn handle_internal(&mut self, internal: InternalEvent) {
        match internal {
            InternalEvent::StorageWriteFinished { key, bytes, error } => match error {
                None => tracing::debug!(key, bytes, "persisted"),
                Some(error) => tracing::warn!(key, %error, "persist failed; dropping write"),
            },
        }
    }

    fn handle_action(&mut self, action: AppAction) {
        match action {
            // Playlist
            AppAction::AddSong { title } => self.apply_playlist(PlaylistAction::Add { title }),
            AppAction::RemoveSong { id } => self.apply_playlist(PlaylistAction::Remove { id }),
            AppAction::ClearPlaylist => self.apply_playlist(PlaylistAction::Clear),
            AppAction::Undo => self.apply_playlist(PlaylistAction::Undo),
            AppAction::Redo => self.apply_playlist(PlaylistAction::Redo),

            // Theme
            AppAction::SetThemeMode { mode } => self.apply_theme(ThemeAction::SetMode(mode)),
            AppAction::ToggleThemeMode => self.apply_theme(ThemeAction::ToggleMode),
            AppAction::SetAccent { accent } => self.apply_theme(ThemeAction::SetAccent(accent)),
            AppAction::SetCustomPalette { patch } => {
                self.apply_theme(ThemeAction::SetCustomPalette(patch))
            }
            AppAction::SetThemePreset { mode } => self.apply_theme(ThemeAction::SetPreset(mode)),

            // UI
            AppAction::ClearToast => {
                if self.state.toast.take().is_some() {
                    self.emit_toast();
                }
            }
        }
    }

    /// Reports a finished write back to the actor so it is logged on the core thread.
    fn write_finished_callback(
        &self,
        key: &'static str,
        bytes: usize,
    ) -> impl FnOnce(Result<(), StorageError>) + Send + 'static {
        let core_sender = self.core_sender.clone();
        move |result| {
            let _ = core_sender.send(CoreMsg::Internal(Box::new(
                InternalEvent::StorageWriteFinished {
                    key,
                    bytes,
                    error: result.err().map(|e| e.to_string()),
                },
            )));
        }
    }
}
