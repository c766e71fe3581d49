use agribot_core::Event;
use agribot_remote::{
    config::AppConfig,
    http_client::{DeviceClient, RoverClient},
    input::{HELP, Input},
    shell::{Shell, status_line, write_snapshot},
};
use anyhow::{Context, Result};
use env_logger::{Builder, Env, Target};
use log::{debug, error, info};
use std::{io::Write, path::Path};
use tokio::{
    io::{AsyncBufReadExt, BufReader},
    signal::unix::{SignalKind, signal},
    time::{Instant, Interval, MissedTickBehavior},
};

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!("application error: {e:#}");
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    initialize();

    let config = AppConfig::load().context("failed to load configuration")?;
    info!("command endpoint: {}", config.device.command_url);
    if let Some(image_url) = &config.device.image_url {
        info!("image endpoint override: {image_url}");
    }

    let client = RoverClient::new(config.device.clone())?;
    let (mut shell, mut completions) = Shell::new(client);

    let mut sigterm =
        signal(SignalKind::terminate()).context("failed to install SIGTERM handler")?;
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut poll = config.poll.image_interval.map(|period| {
        info!("refreshing camera every {}s", period.as_secs());
        let mut interval = tokio::time::interval_at(Instant::now() + period, period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
        interval
    });

    println!("{HELP}");
    shell.dispatch(Event::Initialize);

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line.context("failed to read from stdin")? else {
                    debug!("stdin closed");
                    break;
                };
                if !handle_line(&mut shell, &line, &config.snapshot.dir).await {
                    break;
                }
            }
            Some(completion) = completions.recv() => shell.complete(completion),
            _ = tick(&mut poll) => shell.dispatch(Event::FetchImage),
            _ = tokio::signal::ctrl_c() => {
                debug!("ctrl-c received");
                break;
            }
            _ = sigterm.recv() => {
                debug!("SIGTERM received");
                break;
            }
        }
    }

    info!(
        "shutting down, abandoning {} request(s) in flight",
        shell.in_flight()
    );

    Ok(())
}

fn initialize() {
    log_panics::init();

    let mut builder = if cfg!(debug_assertions) {
        Builder::from_env(Env::default().default_filter_or("debug"))
    } else {
        Builder::from_env(Env::default().default_filter_or("info"))
    };

    // stdout belongs to the control screen
    builder.format(|f, record| writeln!(f, "[{}] {}", record.level(), record.args()));
    builder.target(Target::Stderr).init();

    info!("agribot-remote version: {}", env!("CARGO_PKG_VERSION"));
}

/// Returns `false` when the user asked to quit.
async fn handle_line<C>(shell: &mut Shell<C>, line: &str, snapshot_dir: &Path) -> bool
where
    C: DeviceClient + Send + Sync + 'static,
{
    if line.trim().is_empty() {
        return true;
    }

    match Input::parse(line) {
        Ok(Input::Core(event)) => shell.dispatch(event),
        Ok(Input::AcknowledgeAlert) => {
            if !shell.acknowledge_alert() {
                println!("no alert to dismiss");
            }
        }
        Ok(Input::Snapshot) => match write_snapshot(&shell.view(), snapshot_dir).await {
            Ok(path) => println!("saved {}", path.display()),
            Err(e) => println!("{e:#}"),
        },
        Ok(Input::Status) => println!("{}", status_line(&shell.view())),
        Ok(Input::Help) => println!("{HELP}"),
        Ok(Input::Quit) => return false,
        Err(e) => println!("{e}"),
    }

    true
}

async fn tick(poll: &mut Option<Interval>) {
    match poll {
        Some(interval) => {
            interval.tick().await;
        }
        None => std::future::pending().await,
    }
}
