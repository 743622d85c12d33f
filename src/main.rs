use std::sync::Arc;

use blinkwatch::{
    clock::MonotonicClock,
    cmd::{ReplayArgs, replay},
    config::AppConfig,
    detector::StdinBlinkSource,
    supervisor::Supervisor,
};
use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Runs the blink-rate monitoring supervisor.
    Run,
    /// Replays a recorded blink log through the engine and reports triggers.
    Replay(ReplayArgs),
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing subscriber
    let subscriber =
        FmtSubscriber::builder().with_env_filter(EnvFilter::from_default_env()).finish();
    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    let cli = Cli::parse();

    match cli.command {
        Commands::Run => run_supervisor().await?,
        Commands::Replay(args) => replay::execute(args).await?,
    }

    Ok(())
}

async fn run_supervisor() -> Result<(), Box<dyn std::error::Error>> {
    tracing::debug!("Loading application configuration...");
    let config = AppConfig::new(None)?;
    tracing::debug!(
        window = ?config.window_duration_minutes,
        threshold_bpm = config.policy.threshold_bpm,
        sampling_interval = ?config.sampling_interval_ms,
        "Configuration loaded."
    );

    // One clock per monitoring session; the detector boundary and the sampling
    // bridge share it so their timestamps agree.
    let clock = Arc::new(MonotonicClock::new());
    let source = Arc::new(StdinBlinkSource::new(clock.clone()));

    let supervisor =
        Supervisor::builder().config(config).source(source).clock(clock).build()?;

    tracing::info!("Supervisor initialized, starting monitoring session...");

    supervisor.run().await?;

    Ok(())
}
