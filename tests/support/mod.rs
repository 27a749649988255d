//! Shared fixtures for integration tests.
#![allow(dead_code)]

use std::time::Duration;

use ballrush::app::{GameOrchestrator, GameSettings};
use ballrush::domain::BallName;
use ballrush::domain::ParticipantId;

/// Settings that run the whole draw in a few hundred milliseconds.
pub fn quick_settings() -> GameSettings {
    GameSettings {
        draw_duration: Duration::from_millis(100),
        poll_interval: Duration::from_millis(20),
        ..GameSettings::default()
    }
}

/// Settings whose execution timer never fires within a test.
pub fn slow_settings() -> GameSettings {
    GameSettings {
        draw_duration: Duration::from_secs(60),
        poll_interval: Duration::from_millis(20),
        ..GameSettings::default()
    }
}

/// Join participants `p1..=pn`, returning the assigned ball per participant.
pub async fn join_players(
    orchestrator: &GameOrchestrator,
    n: usize,
) -> Vec<(ParticipantId, BallName)> {
    let mut assigned = Vec::with_capacity(n);
    for i in 1..=n {
        let participant = ParticipantId::new(format!("p{i}"));
        let ball = orchestrator
            .join(participant.clone())
            .await
            .unwrap_or_else(|e| panic!("join p{i} failed: {e}"));
        assigned.push((participant, ball));
    }
    assigned
}

/// Expected display-stage target for a ball name at reference price 50000
/// with the default step of 2.
pub fn expected_target_at_50000(name: &str) -> rust_decimal::Decimal {
    use rust_decimal::Decimal;
    let index: u32 = name[1..].parse().unwrap();
    let offset = Decimal::from((index + 1) * 2);
    match name.as_bytes()[0] {
        b'B' => Decimal::from(50000) + offset,
        b'S' => Decimal::from(50000) - offset,
        _ => panic!("unexpected ball name {name}"),
    }
}
