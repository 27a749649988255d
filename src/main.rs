use std::sync::Arc;
use std::time::Duration;

use tokio::signal;
use tracing::{error, info};

use ballrush::adapter::{PaperVenue, SimFeed};
use ballrush::app::{GameOrchestrator, GameSettings};
use ballrush::config::Config;
use ballrush::error::Result;

#[tokio::main]
async fn main() {
    let config = match Config::load("config.toml") {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load config: {e}");
            std::process::exit(1);
        }
    };

    config.init_logging();
    info!("ballrush starting");

    tokio::select! {
        result = run_demo_game(&config) => {
            if let Err(e) = result {
                error!(error = %e, "Fatal error");
                std::process::exit(1);
            }
        }
        _ = signal::ctrl_c() => {
            info!("Shutdown signal received");
        }
    }

    info!("ballrush stopped");
}

/// Run one fully simulated game: force-start against the paper venue and
/// report the projected status until settlement.
async fn run_demo_game(config: &Config) -> Result<()> {
    let feed = Arc::new(SimFeed::new(config.sim.start_price, config.sim.volatility));
    let venue = Arc::new(PaperVenue::new(Arc::clone(&feed)));
    let settings: GameSettings = config.game.settings();
    let orchestrator = GameOrchestrator::new(feed, venue, settings);

    let outcome = orchestrator.force_start().await?;
    info!(
        participants = outcome.total_participants,
        status = %outcome.status,
        "demo game started"
    );

    loop {
        tokio::time::sleep(Duration::from_secs(1)).await;
        let view = orchestrator.project();
        info!(
            status = view.status,
            price = %view.realtime_price,
            "game progress"
        );
        if view.status == 2 {
            info!(
                winner = %view.winner,
                final_price = %view.final_price,
                "game settled"
            );
            break;
        }
    }

    Ok(())
}
