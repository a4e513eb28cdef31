use serde_json::json;
use spotlite_core::{PlaylistState, ThemeMode, ThemeState};

pub fn print_playlist(state: &PlaylistState, as_json: bool) -> anyhow::Result<()> {
    if as_json {
        let v = json!({
            "songs": state.present,
            "can_undo": state.can_undo(),
            "can_redo": state.can_redo(),
            "history": state.history,
        });
        println!("{}", serde_json::to_string_pretty(&v)?);
        return Ok(());
    }

    if state.is_empty() {
        println!("Your playlist is empty");
    } else {
        println!("My Playlist ({} songs)", state.len());
        for (i, song) in state.present.iter().enumerate() {
            println!("{:>3}. {}  [{}]", i + 1, song.title, song.id);
        }
    }
    let flags = [
        (state.can_undo(), "undo"),
        (state.can_redo(), "redo"),
    ]
    .iter()
    .filter(|(on, _)| *on)
    .map(|(_, name)| *name)
    .collect::<Vec<_>>();
    if !flags.is_empty() {
        println!("available: {}", flags.join(", "));
    }
    Ok(())
}

pub fn print_history(history: &[String], limit: usize, as_json: bool) -> anyhow::Result<()> {
    let entries: Vec<&String> = history.iter().take(limit).collect();
    if as_json {
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }
    if entries.is_empty() {
        println!("no history");
    }
    for entry in entries {
        println!("• {entry}");
    }
    Ok(())
}

pub fn print_theme(theme: &ThemeState, as_json: bool) -> anyhow::Result<()> {
    if as_json {
        println!("{}", serde_json::to_string_pretty(theme)?);
        return Ok(());
    }
    let mode = match theme.mode {
        ThemeMode::Light => "light",
        ThemeMode::Dark => "dark",
        ThemeMode::Custom => "custom",
    };
    println!("mode:       {mode}");
    println!("accent:     {}", theme.accent);
    println!("background: {}", theme.colors.background);
    println!("card:       {}", theme.colors.card);
    println!("text:       {}", theme.colors.text);
    println!("muted:      {}", theme.colors.muted);
    Ok(())
}
