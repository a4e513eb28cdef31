mod output;

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use spotlite_core::playlist::{read_playlist, write_playlist};
use spotlite_core::theme::{read_theme, write_theme};
use spotlite_core::{
    FileStorage, KeyValueStorage, PlaylistAction, PlaylistState, ThemeAction, ThemeMode,
    ThemeState, PLAYLIST_STORAGE_KEY, THEME_STORAGE_KEY,
};

#[derive(Debug, Parser)]
#[command(name = "spotlite")]
#[command(about = "Inspect and edit the spotlite playlist and theme stores")]
struct Cli {
    /// Data directory (same layout the app core persists into)
    #[arg(long, env = "SPOTLITE_DATA_DIR", default_value = ".spotlite")]
    data_dir: PathBuf,

    /// Print JSON instead of human-readable text
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Show the current playlist
    Show,

    /// Add a song to the top of the playlist
    Add {
        /// Song title (surrounding whitespace is trimmed)
        title: String,
    },

    /// Remove a song by id
    Remove {
        /// Song id as printed by `show`
        id: String,
    },

    /// Remove every song
    Clear,

    /// Undo the last playlist change
    Undo,

    /// Redo the last undone change
    Redo,

    /// Print the action log, newest first
    History {
        /// Max entries to print
        #[arg(long, default_value_t = 10)]
        limit: usize,
    },

    /// Inspect or change the theme
    Theme {
        #[command(subcommand)]
        cmd: ThemeCommand,
    },

    /// Delete all persisted state
    Reset,
}

#[derive(Debug, Subcommand)]
enum ThemeCommand {
    /// Show the current theme
    Show,

    /// Switch mode (custom keeps the current palette)
    Mode { mode: ModeArg },

    /// Apply a preset
    Preset { mode: ModeArg },

    /// Flip between light and dark
    Toggle,

    /// Set the accent colour, e.g. "#1DB954"
    Accent { accent: String },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ModeArg {
    Light,
    Dark,
    Custom,
}

impl From<ModeArg> for ThemeMode {
    fn from(m: ModeArg) -> Self {
        match m {
            ModeArg::Light => ThemeMode::Light,
            ModeArg::Dark => ThemeMode::Dark,
            ModeArg::Custom => ThemeMode::Custom,
        }
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    std::fs::create_dir_all(&cli.data_dir)
        .with_context(|| format!("create data dir {}", cli.data_dir.display()))?;
    let storage = FileStorage::new(&cli.data_dir);

    match &cli.cmd {
        Command::Show => cmd_show(&cli, &storage),
        Command::Add { title } => cmd_playlist(
            &cli,
            &storage,
            PlaylistAction::Add {
                title: title.clone(),
            },
        ),
        Command::Remove { id } => {
            cmd_playlist(&cli, &storage, PlaylistAction::Remove { id: id.clone() })
        }
        Command::Clear => cmd_playlist(&cli, &storage, PlaylistAction::Clear),
        Command::Undo => cmd_playlist(&cli, &storage, PlaylistAction::Undo),
        Command::Redo => cmd_playlist(&cli, &storage, PlaylistAction::Redo),
        Command::History { limit } => cmd_history(&cli, &storage, *limit),
        Command::Theme { cmd } => cmd_theme(&cli, &storage, cmd),
        Command::Reset => cmd_reset(&storage),
    }
}

fn load_playlist(storage: &FileStorage) -> PlaylistState {
    match read_playlist(storage) {
        Ok(Some(state)) => state,
        Ok(None) => PlaylistState::empty(),
        Err(e) => {
            // Same fallback as the app: keep going with an empty playlist.
            eprintln!("warning: couldn't restore previous playlist ({e}); starting empty");
            PlaylistState::empty()
        }
    }
}

fn load_theme(storage: &FileStorage) -> ThemeState {
    match read_theme(storage) {
        Ok(Some(theme)) => theme,
        Ok(None) => ThemeState::default(),
        Err(e) => {
            tracing::warn!(%e, "ignoring persisted theme");
            ThemeState::default()
        }
    }
}

fn cmd_show(cli: &Cli, storage: &FileStorage) -> anyhow::Result<()> {
    let state = load_playlist(storage);
    output::print_playlist(&state, cli.json)
}

fn cmd_playlist(cli: &Cli, storage: &FileStorage, action: PlaylistAction) -> anyhow::Result<()> {
    let mut state = load_playlist(storage);
    let tag = action.tag();
    if state.apply(action) {
        write_playlist(storage, &state).context("save playlist")?;
        tracing::info!(action = tag, songs = state.len(), "playlist saved");
    } else if !cli.json {
        eprintln!("nothing to {}", tag.to_ascii_lowercase());
    }
    output::print_playlist(&state, cli.json)
}

fn cmd_history(cli: &Cli, storage: &FileStorage, limit: usize) -> anyhow::Result<()> {
    let state = load_playlist(storage);
    output::print_history(&state.history, limit, cli.json)
}

fn cmd_theme(cli: &Cli, storage: &FileStorage, cmd: &ThemeCommand) -> anyhow::Result<()> {
    let theme = load_theme(storage);
    let action = match cmd {
        ThemeCommand::Show => return output::print_theme(&theme, cli.json),
        ThemeCommand::Mode { mode } => ThemeAction::SetMode((*mode).into()),
        ThemeCommand::Preset { mode } => ThemeAction::SetPreset((*mode).into()),
        ThemeCommand::Toggle => ThemeAction::ToggleMode,
        ThemeCommand::Accent { accent } => ThemeAction::SetAccent(accent.trim().to_string()),
    };
    let next = theme.clone().reduce(action);
    if next != theme {
        write_theme(storage, &next).context("save theme")?;
    }
    output::print_theme(&next, cli.json)
}

fn cmd_reset(storage: &FileStorage) -> anyhow::Result<()> {
    for key in [PLAYLIST_STORAGE_KEY, THEME_STORAGE_KEY] {
        storage
            .remove_item(key)
            .with_context(|| format!("remove {key}"))?;
    }
    eprintln!("reset");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_add_with_global_json_flag() {
        let cli = Cli::try_parse_from(["spotlite", "--data-dir", "/tmp/x", "add", "Song A", "--json"])
            .unwrap();
        assert!(cli.json);
        assert!(matches!(cli.cmd, Command::Add { ref title } if title == "Song A"));
    }

    #[test]
    fn parses_theme_mode() {
        let cli = Cli::try_parse_from(["spotlite", "theme", "mode", "dark"]).unwrap();
        let Command::Theme {
            cmd: ThemeCommand::Mode { mode },
        } = cli.cmd
        else {
            panic!("expected theme mode");
        };
        assert_eq!(ThemeMode::from(mode), ThemeMode::Dark);
    }

    #[test]
    fn playlist_commands_persist_between_runs() {
        let dir = tempfile::tempdir().unwrap();
        let cli = Cli::try_parse_from(["spotlite", "--json", "show"]).unwrap();
        let storage = FileStorage::new(dir.path());

        cmd_playlist(&cli, &storage, PlaylistAction::Add { title: "a".into() }).unwrap();
        cmd_playlist(&cli, &storage, PlaylistAction::Add { title: "b".into() }).unwrap();
        cmd_playlist(&cli, &storage, PlaylistAction::Undo).unwrap();

        let state = load_playlist(&storage);
        assert_eq!(state.present.len(), 1);
        assert_eq!(state.future.len(), 1);
        assert_eq!(state.history[0], "Undo");
    }

    #[test]
    fn malformed_playlist_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(dir.path());
        storage.set_item(PLAYLIST_STORAGE_KEY, "{\"present\":[]}").unwrap();
        assert_eq!(load_playlist(&storage), PlaylistState::empty());
    }

    #[test]
    fn reset_removes_both_records() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(dir.path());
        write_playlist(&storage, &PlaylistState::empty()).unwrap();
        write_theme(&storage, &ThemeState::default()).unwrap();
        cmd_reset(&storage).unwrap();
        assert_eq!(storage.get_item(PLAYLIST_STORAGE_KEY).unwrap(), None);
        assert_eq!(storage.get_item(THEME_STORAGE_KEY).unwrap(), None);
    }
}
