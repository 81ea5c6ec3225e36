use std::io::Write;

use anyhow::{anyhow, Context, Result};
use clap::Parser;

use rowgrid::cli::{CliArgs, Command, ReplayArgs};
use rowgrid::clipboard::SystemClipboard;
use rowgrid::config::GridConfig;
use rowgrid::config_paths;
use rowgrid::host::SubmitPolicy;
use rowgrid::replay::{Replay, Script, Table};

fn main() -> Result<()> {
    let args = CliArgs::parse();
    rowgrid::tracing::init();

    match args.command {
        Command::Replay(replay) => run_replay(replay),
        Command::Config { init } => show_config(init),
    }
}

fn run_replay(args: ReplayArgs) -> Result<()> {
    let config = args.grid_config().map_err(|e| anyhow!(e))?;
    let table = Table::load(&args.rows)
        .with_context(|| format!("Failed to load rows from {}", args.rows.display()))?;
    let script = Script::load(&args.script)
        .with_context(|| format!("Failed to load script {}", args.script.display()))?;

    let policy = if args.reject_submits {
        SubmitPolicy::Reject
    } else {
        SubmitPolicy::Accept
    };

    let required = script.required.clone();
    let mut replay = Replay::new(table, &required, config.options(), policy);
    if args.system_clipboard {
        replay = replay.with_clipboard(SystemClipboard::new());
    }

    replay.run(script).context("Replay failed")?;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    replay
        .table()
        .write(&mut out)
        .context("Failed to write rows")?;

    if args.json {
        let log = serde_json::to_string_pretty(replay.log()).context("Failed to encode event log")?;
        writeln!(out, "{}", log)?;
    }
    Ok(())
}

fn show_config(init: bool) -> Result<()> {
    let path = config_paths::config_file().ok_or_else(|| anyhow!("No config directory available"))?;

    if init && !path.exists() {
        GridConfig::default().save().map_err(|e| anyhow!(e))?;
        println!("Wrote default config to {}", path.display());
    } else {
        println!("Config file: {}", path.display());
    }

    let config = GridConfig::load();
    let yaml = serde_yaml::to_string(&config).context("Failed to encode config")?;
    print!("{}", yaml);
    Ok(())
}
