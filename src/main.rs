use std::io;
use std::path::PathBuf;

use m3u_curator::app::{App, Command, CommandOutcome};
use m3u_curator::config::Config;
use m3u_curator::engine::ReconcileReport;
use m3u_curator::error::Result;
use m3u_curator::menu::{render_channel_list, run_menu};

const USAGE: &str = "Usage: m3u-curator [--db PATH] [--output PATH] [--export] [--list] [FILE_OR_URL...]";

#[derive(Debug, Default)]
struct CliArgs {
    db_path: Option<String>,
    output_path: Option<String>,
    export: bool,
    list: bool,
    inputs: Vec<String>,
}

fn parse_args(args: impl IntoIterator<Item = String>) -> std::result::Result<CliArgs, String> {
    let mut cli = CliArgs::default();
    let mut args = args.into_iter();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--db" => cli.db_path = Some(args.next().ok_or("--db needs a path")?),
            "--output" => cli.output_path = Some(args.next().ok_or("--output needs a path")?),
            "--export" => cli.export = true,
            "--list" => cli.list = true,
            "-h" | "--help" => return Err(USAGE.to_string()),
            flag if flag.starts_with("--") => return Err(format!("Unknown flag {}", flag)),
            _ => cli.inputs.push(arg),
        }
    }

    Ok(cli)
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging (only show warnings and errors by default)
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = match parse_args(std::env::args().skip(1)) {
        Ok(cli) => cli,
        Err(message) => {
            eprintln!("{}\n{}", message, USAGE);
            std::process::exit(1);
        }
    };

    // Load configuration, command line wins
    let mut config = Config::load()?;
    if let Some(db_path) = cli.db_path {
        config.db_path = db_path;
    }
    if let Some(output_path) = cli.output_path {
        config.output_path = output_path;
    }

    let app = App::new(&config).await?;

    if !cli.inputs.is_empty() {
        let report = app.import(&cli.inputs).await?;
        print_report(&report);
    }

    if cli.list {
        let views = app.channel_views().await?;
        print!("{}", render_channel_list(&views));
        return Ok(());
    }

    if cli.export {
        let path = PathBuf::from(&config.output_path);
        if let CommandOutcome::Exported { path, records } = app.apply(Command::Export(path)).await? {
            println!("Wrote {} channels to {}", records, path.display());
        }
        return Ok(());
    }

    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut stdout = io::stdout();
    run_menu(&app, &mut input, &mut stdout).await
}

fn print_report(report: &ReconcileReport) {
    println!(
        "Imported: {} new channels, {} new sources, {} refreshed, {} stale removed, {} duplicates merged",
        report.channels_created,
        report.sources_inserted,
        report.sources_refreshed,
        report.sources_pruned,
        report.duplicates_collapsed
    );
    if report.activations_repaired > 0 {
        println!(
            "Cleared {} extra source selections",
            report.activations_repaired
        );
    }
    if report.skipped_count() > 0 {
        println!("Skipped {} malformed entries:", report.skipped_count());
        for err in &report.skipped {
            println!("  {}", err);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn parses_flags_and_inputs() {
        let cli = parse_args(args(&[
            "--db",
            "x.db",
            "a.m3u",
            "--export",
            "http://host/b.m3u",
        ]))
        .unwrap();
        assert_eq!(cli.db_path.as_deref(), Some("x.db"));
        assert!(cli.export);
        assert!(!cli.list);
        assert_eq!(cli.inputs, ["a.m3u", "http://host/b.m3u"]);
    }

    #[test]
    fn rejects_unknown_flag_and_missing_value() {
        assert!(parse_args(args(&["--bogus"])).is_err());
        assert!(parse_args(args(&["--output"])).is_err());
    }
}
