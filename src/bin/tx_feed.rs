//! Live unconfirmed-transaction feed
//!
//! Streams blockchain.info unconfirmed transactions into a 20-entry ledger
//! and logs a summary of the window on a fixed interval.
//!
//! Usage:
//!   cargo run --bin tx_feed
//!
//! Type `start`, `stop`, `reset`, `status` or `quit` on stdin.
//!
//! Environment:
//!   FEEDBOARD_CONFIG_PATH - YAML config (default config/feedboard.yaml)
//!   RUST_LOG - overrides the configured log level

use anyhow::Result;
use feedboard::{init_tracing, log_client_event, Heartbeat, ShutdownManager, TransactionFeed};
use feedboard_app::bin_common::{load_config, BinaryRunner, ConfigType, FeedCommand, RunConfig};
use std::io::BufRead;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{info, warn};

const POLL_INTERVAL: Duration = Duration::from_millis(200);

struct FeedConsole {
    config: RunConfig,
    feed: TransactionFeed,
    shutdown: ShutdownManager,
    heartbeat: Heartbeat,
}

impl FeedConsole {
    /// Summary cadence comes from the run config
    fn new(config: RunConfig, feed: TransactionFeed) -> Self {
        let heartbeat = Heartbeat::new(config.heartbeat_interval_secs);
        Self {
            config,
            feed,
            shutdown: ShutdownManager::new(),
            heartbeat,
        }
    }

    fn print_status(&self) {
        let snapshot = self.feed.snapshot();

        println!();
        println!(
            "state: {}   transactions: {}   total: {} BTC",
            self.feed.state(),
            snapshot.records.len(),
            snapshot.total
        );
        println!("{:<20} {:<36} {:<36} {:>16}", "received", "from", "to", "BTC");
        for record in &snapshot.records {
            println!(
                "{:<20} {:<36} {:<36} {:>16}",
                record.received_at.format("%H:%M:%S%.3f"),
                record.source,
                record.destination,
                record.amount.to_string()
            );
        }
        println!();
    }

    async fn handle(&mut self, command: FeedCommand) -> Result<()> {
        match command {
            FeedCommand::Start => {
                if !self.feed.start().await? {
                    info!("Feed already {}", self.feed.state());
                }
            }
            FeedCommand::Stop => {
                if !self.feed.stop().await? {
                    info!("Feed is not running");
                }
            }
            FeedCommand::Reset => self.feed.reset().await?,
            FeedCommand::Status => self.print_status(),
            FeedCommand::Help => println!("{}", FeedCommand::HELP),
            FeedCommand::Quit => self.shutdown.trigger(),
        }
        Ok(())
    }

    fn drain_events(&self) {
        while let Some(event) = self.feed.try_recv_event() {
            if !log_client_event(&event) {
                info!("Type `start` to reconnect");
            }
        }
    }

    fn log_summary(&self) {
        let ledger = self.feed.ledger();
        let ledger = ledger.read();
        info!(
            "[{}] {} | {} transactions in window | total {} BTC",
            self.config.name,
            self.feed.state(),
            ledger.len(),
            ledger.running_total()
        );
    }
}

impl BinaryRunner for FeedConsole {
    async fn run(&mut self) -> Result<()> {
        self.shutdown.spawn_signal_handler();
        let mut commands = spawn_stdin_reader();
        let mut stdin_open = true;
        let mut poll = tokio::time::interval(POLL_INTERVAL);

        self.feed.start().await?;
        println!("{}", FeedCommand::HELP);

        while self.shutdown.is_running() {
            tokio::select! {
                line = commands.recv(), if stdin_open => match line {
                    Some(line) => match line.parse::<FeedCommand>() {
                        Ok(command) => self.handle(command).await?,
                        Err(e) => warn!("{}", e),
                    },
                    None => {
                        info!("stdin closed, streaming until Ctrl+C");
                        stdin_open = false;
                    }
                },
                _ = poll.tick() => {
                    self.drain_events();
                    if self.heartbeat.tick() {
                        self.log_summary();
                    }
                }
            }
        }

        self.feed.stop().await?;
        Ok(())
    }

    fn config(&self) -> &RunConfig {
        &self.config
    }

    fn final_stats(&self) -> Option<String> {
        let snapshot = self.feed.snapshot();
        Some(format!(
            "{} transactions in window, total {} BTC",
            snapshot.records.len(),
            snapshot.total
        ))
    }
}

/// Read stdin on a plain thread so a pending read never holds up exit
fn spawn_stdin_reader() -> mpsc::UnboundedReceiver<String> {
    let (tx, rx) = mpsc::unbounded_channel();
    std::thread::spawn(move || {
        for line in std::io::stdin().lock().lines() {
            let Ok(line) = line else { break };
            if tx.send(line).is_err() {
                break;
            }
        }
    });
    rx
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();

    let config = load_config(ConfigType::Feedboard)?;
    init_tracing(&config.log_level);

    let run_config = RunConfig::new("tx_feed").with_heartbeat(config.feed.summary_interval_secs);
    let mut console = FeedConsole::new(run_config, TransactionFeed::from_config(&config.feed));

    console.execute().await
}
