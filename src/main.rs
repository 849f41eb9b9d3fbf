use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use nfq_dns_firewall::config::{CliOverrides, Config};
use nfq_dns_firewall::queue::{self, NfqueueSource};
use nfq_dns_firewall::{PacketFilter, Shutdown};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "dns-firewall")]
#[command(version)]
#[command(about = "DNS-aware NFQUEUE firewall: accepts or drops UDP DNS packets by rule")]
struct Cli {
    /// Configuration file path
    #[arg(short = 'c', long, value_name = "FILE")]
    config: Option<String>,

    /// NFQUEUE number to bind
    #[arg(short = 'q', long)]
    queue_num: Option<u16>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,

    /// Load and validate the configuration, print the rules, then exit
    #[arg(long)]
    check: bool,
}

fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let overrides = CliOverrides {
        queue_num: cli.queue_num,
        log_level: cli.log_level.clone(),
    };
    let config = Config::load(cli.config.as_deref(), overrides).context("Failed to load configuration")?;

    init_logging(&config.logging.level);

    let ruleset = config.ruleset();

    if cli.check {
        println!("Configuration OK: {} rule(s)", ruleset.len());
        for (index, rule) in ruleset.rules().iter().enumerate() {
            let spec = rule.spec();
            let line = toml::to_string(&spec).context("Failed to render rule")?;
            println!("[{}] {}", index, line.trim_end().replace('\n', ", "));
        }
        return Ok(());
    }

    info!("Starting DNS firewall v{}", env!("CARGO_PKG_VERSION"));
    info!(
        rules = ruleset.len(),
        queue_num = config.queue.num,
        dns_port = config.filter.dns_port,
        "Configuration loaded"
    );

    let shutdown = Shutdown::new();
    shutdown.install_signal_handler()?;

    let filter = PacketFilter::new(ruleset, config.filter.dns_port);
    let mut source = NfqueueSource::bind(config.queue.num)
        .with_context(|| format!("Failed to bind NFQUEUE {}", config.queue.num))?;

    queue::serve(
        &mut source,
        &filter,
        &shutdown,
        Duration::from_millis(config.queue.poll_interval_ms),
    )?;

    info!("DNS firewall stopped");
    Ok(())
}
