use clap::Parser;
use config::Config;
use orchestrator::{CommandRestarter, Engine, Mode, ProcfsScanner, Services};
use pmr::{cli::Cli, report};
use std::io::{self, Write};
use tracing::{debug, trace, warn};
use tracing_subscriber::{
    EnvFilter, filter::LevelFilter, layer::SubscriberExt, util::SubscriberInitExt,
};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // NOTE: `PMR_LOG` takes regular `EnvFilter` directives, e.g.
    // `PMR_LOG=orchestrator=debug`. Without it, `--verbose` logs at info
    // level and the default is warn. Logs go to stderr so the report on
    // stdout stays clean.
    let default_level = if cli.verbose {
        LevelFilter::INFO
    } else {
        LevelFilter::WARN
    };
    let env_filter = EnvFilter::builder()
        .with_default_directive(default_level.into())
        .with_env_var("PMR_LOG")
        .from_env()?;

    let layer = tracing_subscriber::fmt::layer()
        .with_writer(io::stderr)
        .with_level(true)
        .with_file(false)
        .with_line_number(false);

    tracing_subscriber::registry()
        .with(layer)
        .with(env_filter)
        .init();

    // load config
    let config = match &cli.config {
        Some(path) => Config::load(path)?,
        _ => {
            let mut candidates = glob::glob("/etc/pmr/config.d/*.toml")?
                .filter_map(Result::ok)
                .collect::<Vec<_>>();
            candidates.sort();
            candidates.insert(0, "/etc/pmr/config.toml".into());
            trace!(?candidates, "config file candidates");
            Config::load_multiple(candidates)?
        }
    };
    debug!(?config, ?cli);

    if !nix::unistd::geteuid().is_root() {
        warn!("not running as root, memory maps of other users' processes cannot be read");
    }

    let services = Services {
        scanner: Box::new(ProcfsScanner::new(&config)),
        restarter: Box::new(CommandRestarter::new(&config.restart)?),
    };
    let mode = if cli.dry_run {
        Mode::DryRun
    } else {
        Mode::Live
    };

    let mut engine = Engine::new(&config, services, mode)?;
    let run = engine.run().await?;

    // Failed restarts are part of the report, not of the exit status.
    let mut stdout = io::stdout().lock();
    report::render(&mut stdout, &run, cli.verbose)?;
    stdout.flush()?;

    Ok(())
}
