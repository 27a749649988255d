//! Tunable parameters of the game lifecycle.

use std::time::Duration;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Orchestrator timing and pricing parameters.
///
/// Defaults match the production game: 20 participants, 30 second draw,
/// 1 second price polling, a 2-unit display step and a 1-unit execution step.
#[derive(Debug, Clone)]
pub struct GameSettings {
    /// Number of participants that fills a game and triggers the draw.
    pub capacity: usize,
    /// Delay between the drawing transition and order execution.
    pub draw_duration: Duration,
    /// Interval of the reference-price polling loop.
    pub poll_interval: Duration,
    /// Price gap between adjacent display-stage targets.
    pub display_step: Decimal,
    /// Price gap between adjacent execution-stage limit prices.
    pub execution_step: Decimal,
    /// Notional value of each hedge order; size = notional / limit price.
    pub order_notional: Decimal,
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            capacity: 20,
            draw_duration: Duration::from_secs(30),
            poll_interval: Duration::from_secs(1),
            display_step: dec!(2),
            execution_step: dec!(1),
            order_notional: dec!(10.3),
        }
    }
}
