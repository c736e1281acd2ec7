//! Interactive line menu over the curated channel state.

mod handler;
mod view;

use std::io::{BufRead, Write};
use std::path::PathBuf;

pub use handler::{parse_menu_choice, parse_pick, MenuAction, Pick};
pub use view::render_channel_list;

use crate::app::{App, Command, CommandOutcome};
use crate::error::Result;
use crate::models::ChannelView;

/// Runs the menu until the user quits or `input` reaches end of file.
pub async fn run_menu<R: BufRead, W: Write>(app: &App, input: &mut R, out: &mut W) -> Result<()> {
    loop {
        writeln!(out, "{}", view::render_main_menu())?;
        let Some(line) = prompt(input, out, "Choose an option: ")? else {
            return Ok(());
        };

        let action = match parse_menu_choice(&line) {
            Ok(action) => action,
            Err(e) => {
                writeln!(out, "{}", e)?;
                continue;
            }
        };

        let result = match action {
            MenuAction::Quit => return Ok(()),
            MenuAction::ToggleChannels => toggle_channels(app, input, out).await,
            MenuAction::EnableAll => set_all(app, out, true).await,
            MenuAction::DisableAll => set_all(app, out, false).await,
            MenuAction::ChangeSource => change_source(app, input, out).await,
            MenuAction::Export => export(app, out).await,
        };

        match result {
            Err(e) if !e.is_repository() => writeln!(out, "{}", e)?,
            other => other?,
        }
    }
}

/// Prints `text` and reads one trimmed line; `None` at end of input.
fn prompt<R: BufRead, W: Write>(input: &mut R, out: &mut W, text: &str) -> Result<Option<String>> {
    write!(out, "{}", text)?;
    out.flush()?;

    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}

/// Prompts for a position in a list of `len` items until a valid one (or `q`) is given.
fn prompt_pick<R: BufRead, W: Write>(
    input: &mut R,
    out: &mut W,
    text: &str,
    len: usize,
) -> Result<Pick> {
    loop {
        let Some(line) = prompt(input, out, text)? else {
            return Ok(Pick::Back);
        };
        match parse_pick(&line, len) {
            Ok(pick) => return Ok(pick),
            Err(e) => writeln!(out, "{}", e)?,
        }
    }
}

async fn toggle_channels<R: BufRead, W: Write>(app: &App, input: &mut R, out: &mut W) -> Result<()> {
    loop {
        let views = app.channel_views().await?;
        if views.is_empty() {
            writeln!(out, "No channels imported yet.")?;
            return Ok(());
        }

        write!(out, "{}", render_channel_list(&views))?;
        let Pick::Index(i) = prompt_pick(
            input,
            out,
            "Select a channel by number (q to go back): ",
            views.len(),
        )?
        else {
            return Ok(());
        };

        app.apply(Command::ToggleChannel(views[i].channel.id.clone()))
            .await?;
    }
}

async fn set_all<W: Write>(app: &App, out: &mut W, enabled: bool) -> Result<()> {
    if let CommandOutcome::ChannelsUpdated(count) =
        app.apply(Command::SetAllChannelsEnabled(enabled)).await?
    {
        let verb = if enabled { "Enabled" } else { "Disabled" };
        writeln!(out, "{} {} channels.", verb, count)?;
    }
    Ok(())
}

async fn change_source<R: BufRead, W: Write>(app: &App, input: &mut R, out: &mut W) -> Result<()> {
    let views = app.channel_views().await?;
    let enabled: Vec<&ChannelView> = views.iter().filter(|v| v.channel.enabled).collect();
    if enabled.is_empty() {
        writeln!(out, "No enabled channels.")?;
        return Ok(());
    }

    write!(out, "{}", view::render_enabled_channels(&enabled))?;
    let Pick::Index(i) = prompt_pick(
        input,
        out,
        "Select a channel by number (q to go back): ",
        enabled.len(),
    )?
    else {
        return Ok(());
    };

    let channel = enabled[i];
    if channel.sources.is_empty() {
        writeln!(out, "{} has no sources.", channel.channel.id)?;
        return Ok(());
    }

    write!(out, "{}", view::render_sources(channel))?;
    let Pick::Index(j) = prompt_pick(
        input,
        out,
        "Select the new source (q to go back): ",
        channel.sources.len(),
    )?
    else {
        return Ok(());
    };

    app.apply(Command::SelectSource {
        channel_id: channel.channel.id.clone(),
        source_id: channel.sources[j].id,
    })
    .await?;
    writeln!(out, "Source for {} updated.", channel.channel.id)?;
    Ok(())
}

async fn export<W: Write>(app: &App, out: &mut W) -> Result<()> {
    let path = PathBuf::from(&app.config().output_path);
    if let CommandOutcome::Exported { path, records } = app.apply(Command::Export(path)).await? {
        writeln!(out, "Wrote {} channels to {}", records, path.display())?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;
    use crate::config::Config;
    use crate::db::Repository;

    const PLAYLIST: &str = "#EXTM3U\n\
        #EXTINF:-1 tvg-id=\"cnn\",CNN HD\n\
        http://a/1\n\
        #EXTINF:-1 tvg-id=\"cnn\",CNN SD\n\
        http://a/2\n\
        #EXTINF:-1 tvg-id=\"bbc\",BBC\n\
        http://b/1\n";

    async fn app_with(output_path: String) -> App {
        let dir = tempfile::tempdir().unwrap();
        let repository = Repository::open_in_memory().await.unwrap();
        let config = Config {
            output_path,
            ..Config::in_dir(dir.path())
        };
        let app = App::with_repository(repository, &config).unwrap();
        app.import_text(PLAYLIST).await.unwrap();
        app
    }

    async fn run(app: &App, script: &str) -> String {
        let mut input = Cursor::new(script.as_bytes().to_vec());
        let mut out = Vec::new();
        run_menu(app, &mut input, &mut out).await.unwrap();
        String::from_utf8(out).unwrap()
    }

    #[tokio::test]
    async fn toggling_a_channel_from_the_list() {
        let app = app_with("unused.m3u".into()).await;

        // channels are listed by id: 1 = bbc, 2 = cnn
        let out = run(&app, "1\n2\nq\nq\n").await;
        assert!(out.contains("2. cnn [disabled]"));
        assert!(out.contains("2. cnn [enabled]"));

        let views = app.channel_views().await.unwrap();
        assert!(!views[0].channel.enabled);
        assert!(views[1].channel.enabled);
    }

    #[tokio::test]
    async fn invalid_input_is_reported_and_loop_continues() {
        let app = app_with("unused.m3u".into()).await;
        let out = run(&app, "7\n1\n9\nq\nq\n").await;
        assert!(out.contains("Invalid selection: unknown option '7'"));
        assert!(out.contains("Invalid selection: 9 is not between 1 and 2"));
        assert!(app
            .channel_views()
            .await
            .unwrap()
            .iter()
            .all(|v| !v.channel.enabled));
    }

    #[tokio::test]
    async fn change_source_requires_enabled_channels() {
        let app = app_with("unused.m3u".into()).await;
        let out = run(&app, "4\nq\n").await;
        assert!(out.contains("No enabled channels."));
    }

    #[tokio::test]
    async fn full_session_writes_filtered_playlist() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("filtered.m3u");
        let app = app_with(output.to_string_lossy().to_string()).await;

        // enable all, pick cnn's second source, disable bbc, export
        let script = "2\n4\n2\n2\n1\n1\nq\n5\nq\n";
        let out = run(&app, script).await;
        assert!(out.contains("Enabled 2 channels."));
        assert!(out.contains("2. CNN SD http://a/2"));
        assert!(out.contains("Source for cnn updated."));
        assert!(out.contains("Wrote 1 channels to"));

        let written = std::fs::read_to_string(&output).unwrap();
        assert_eq!(written, "#EXTM3U\n#EXTINF:-1 tvg-id=\"cnn\",CNN SD\nhttp://a/2\n");
    }

    #[test]
    fn end_of_input_quits() {
        tokio_test::block_on(async {
            let app = app_with("unused.m3u".into()).await;
            let out = run(&app, "").await;
            assert!(out.contains("--- MENU ---"));
        });
    }
}
