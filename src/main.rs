use std::path::PathBuf;

use clap::Parser;
use color_eyre::Result;
use tokio::sync::mpsc;

use pulsetop::app::App;
use pulsetop::config::{self, load_config, load_config_from_path};
use pulsetop::event::{Event, EventHandler};
use pulsetop::logging;
use pulsetop::system::collector::Collector;
use pulsetop::system::dns::{DnsCache, SystemResolver};
use pulsetop::system::scheduler::{Sampler, spawn_scheduler};
use pulsetop::ui;

#[derive(Parser)]
#[command(
    name = "pulsetop",
    about = "Live dashboard for CPU, memory, network, processes and connections"
)]
struct Cli {
    /// Path to config file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Maximum number of processes shown in the table
    #[arg(long)]
    limit: Option<usize>,

    /// Refresh rate in milliseconds
    #[arg(long)]
    refresh_rate: Option<u64>,

    /// Write JSON logs to this file
    #[arg(long)]
    log_file: Option<PathBuf>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    let config = load_config_for_cli(&cli);

    if let Some(path) = &config.logging.file {
        logging::init_file_logging(path, &config.logging.level)?;
    }

    let mut terminal = ratatui::init();

    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        ratatui::restore();
        original_hook(panic_info);
    }));

    let result = run(&mut terminal, config).await;

    ratatui::restore();

    result
}

async fn run(terminal: &mut ratatui::DefaultTerminal, config: config::Config) -> Result<()> {
    let (dns, resolver) = DnsCache::new();
    resolver.spawn(SystemResolver)?;

    let sampler = Sampler::new(
        Collector::new(),
        dns.clone(),
        config.general.refresh_interval(),
    );
    let (snapshot_tx, snapshot_rx) = mpsc::unbounded_channel();
    let _scheduler = spawn_scheduler(sampler, snapshot_tx);

    let mut app = App::new(config, dns);
    let mut events = EventHandler::new(snapshot_rx);

    terminal.draw(|frame| ui::draw(frame, &mut app))?;

    while app.running {
        let Some(event) = events.next().await else {
            break;
        };
        match event {
            Event::Key(key) => {
                if key.kind != crossterm::event::KeyEventKind::Press {
                    continue;
                }
                let action = app.map_key(key);
                app.dispatch(action);
            }
            Event::Snapshot(snapshot) => app.apply_snapshot(*snapshot),
            Event::Resize => {}
        }
        terminal.draw(|frame| ui::draw(frame, &mut app))?;
    }

    Ok(())
}

fn load_config_for_cli(cli: &Cli) -> config::Config {
    let mut config = match &cli.config {
        Some(path) => load_config_from_path(path),
        None => load_config(),
    };

    if let Some(limit) = cli.limit {
        config.general.process_limit = limit;
    }
    if let Some(rate) = cli.refresh_rate {
        config.general.refresh_rate_ms = rate;
    }
    if let Some(ref path) = cli.log_file {
        config.logging.file = Some(path.clone());
    }

    config
}
