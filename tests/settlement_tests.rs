//! Integration tests for the execution trigger, fill settlement, the
//! fallback winner path, and cancellation on reset.

use std::sync::Arc;
use std::time::Duration;

use rust_decimal_macros::dec;

use ballrush::app::{GameOrchestrator, GameSettings};
use ballrush::domain::{GameStatus, ParticipantId, Side};
use ballrush::error::{FeedError, VenueError};
use ballrush::port::OrderVenue;
use ballrush::testkit::{ScriptedFeed, ScriptedVenue, StaticFeed};
use tokio::time::sleep;

mod support;
use support::{join_players, quick_settings};

/// Long enough for a 100ms draw timer to fire and placements to land.
const EXECUTION_GRACE: Duration = Duration::from_millis(300);
/// Long enough for a delivered fill to settle the game.
const SETTLE_GRACE: Duration = Duration::from_millis(150);

#[tokio::test]
async fn first_fill_determines_winner_and_cancels_leftovers() {
    let feed = Arc::new(StaticFeed::new(dec!(50000)));
    let (venue, script) = ScriptedVenue::new();
    let venue = Arc::new(venue);
    let orchestrator = GameOrchestrator::new(feed, Arc::clone(&venue) as Arc<dyn OrderVenue>, quick_settings());

    join_players(&orchestrator, 20).await;
    sleep(EXECUTION_GRACE).await;

    // execution fired: all 20 orders rest, game still drawing
    let placed = venue.placed();
    assert_eq!(placed.len(), 20);
    assert_eq!(orchestrator.project().status, 1);
    let game = orchestrator.current_game().unwrap();
    assert_eq!(game.placed_orders().len(), 20);

    // execution-stage pricing: inverted direction, 1-unit step off the market
    for (request, _) in &placed {
        let offset = dec!(1) * rust_decimal::Decimal::from(request.ball.family_index() + 1);
        match request.side {
            Side::Long => assert_eq!(request.price, dec!(50000) - offset),
            Side::Short => assert_eq!(request.price, dec!(50000) + offset),
        }
    }
    // display-stage targets are not overwritten by execution pricing
    for ball in game.balls() {
        let offset = dec!(2) * rust_decimal::Decimal::from(ball.name().family_index() + 1);
        match ball.side() {
            Side::Long => assert_eq!(ball.target_price(), dec!(50000) + offset),
            Side::Short => assert_eq!(ball.target_price(), dec!(50000) - offset),
        }
    }

    let (winner_request, winner_order) = placed[7].clone();
    script.fill(winner_order.clone());
    sleep(SETTLE_GRACE).await;

    let view = orchestrator.project();
    assert_eq!(view.status, 2);
    assert_eq!(view.winner, winner_request.ball.to_string());
    assert_eq!(view.final_price, dec!(50000));

    // the other 19 orders were cancelled, the filled one was not
    let cancelled = venue.cancelled();
    assert_eq!(cancelled.len(), 19);
    assert!(!cancelled.contains(&winner_order));
}

#[tokio::test]
async fn rejected_placements_settle_via_price_proximity_fallback() {
    let feed = Arc::new(StaticFeed::new(dec!(50000)));
    let (venue, _script) = ScriptedVenue::new();
    venue.script_placements(vec![Err(VenueError::Rejected("margin".into())); 20]);
    let venue = Arc::new(venue);
    let orchestrator = GameOrchestrator::new(feed, Arc::clone(&venue) as Arc<dyn OrderVenue>, quick_settings());

    join_players(&orchestrator, 20).await;
    sleep(EXECUTION_GRACE).await;

    let view = orchestrator.project();
    assert_eq!(view.status, 2);
    assert!(!view.winner.is_empty());

    // the fallback winner is owned and closest to the last price
    let game = orchestrator.current_game().unwrap();
    let winner = game
        .balls()
        .iter()
        .find(|b| b.name().to_string() == view.winner)
        .unwrap();
    assert!(winner.owner().is_some());
    assert_eq!((winner.target_price() - dec!(50000)).abs(), dec!(2));

    assert!(venue.placed().is_empty());
    assert!(venue.cancelled().is_empty());
}

#[tokio::test]
async fn fill_monitor_failure_settles_via_fallback_and_cancels_orders() {
    let feed = Arc::new(StaticFeed::new(dec!(50000)));
    let (venue, script) = ScriptedVenue::new();
    let venue = Arc::new(venue);
    let orchestrator = GameOrchestrator::new(feed, Arc::clone(&venue) as Arc<dyn OrderVenue>, quick_settings());

    join_players(&orchestrator, 20).await;
    sleep(EXECUTION_GRACE).await;
    assert_eq!(venue.placed().len(), 20);

    script.fail("subscription dropped");
    sleep(SETTLE_GRACE).await;

    let view = orchestrator.project();
    assert_eq!(view.status, 2);
    assert!(!view.winner.is_empty());
    // every resting order was abandoned
    assert_eq!(venue.cancelled().len(), 20);
}

#[tokio::test]
async fn execution_price_fetch_failure_skips_placement_and_falls_back() {
    // the first fetch seeds the drawing transition, everything after fails
    let feed = Arc::new(ScriptedFeed::new(vec![
        Ok(dec!(50000)),
        Err(FeedError::Unavailable("downstream".into())),
    ]));
    let (venue, _script) = ScriptedVenue::new();
    let venue = Arc::new(venue);
    let orchestrator = GameOrchestrator::new(feed, Arc::clone(&venue) as Arc<dyn OrderVenue>, quick_settings());

    join_players(&orchestrator, 20).await;
    sleep(EXECUTION_GRACE).await;

    let view = orchestrator.project();
    assert_eq!(view.status, 2);
    assert!(!view.winner.is_empty());
    assert!(venue.placed().is_empty());
}

#[tokio::test]
async fn polling_loop_tracks_the_latest_price() {
    let feed = Arc::new(ScriptedFeed::new(vec![
        Ok(dec!(50000)),
        Ok(dec!(50010)),
        Ok(dec!(50020)),
    ]));
    let (venue, _script) = ScriptedVenue::new();
    let settings = GameSettings {
        draw_duration: Duration::from_secs(60),
        poll_interval: Duration::from_millis(20),
        ..GameSettings::default()
    };
    let orchestrator = GameOrchestrator::new(feed, Arc::new(venue), settings);

    join_players(&orchestrator, 20).await;
    sleep(Duration::from_millis(200)).await;

    let view = orchestrator.project();
    assert_eq!(view.status, 1);
    assert_eq!(view.realtime_price, dec!(50020));
    assert_eq!(view.p0, dec!(50000));
}

#[tokio::test]
async fn reset_before_execution_cancels_the_timer() {
    let feed = Arc::new(StaticFeed::new(dec!(50000)));
    let (venue, _script) = ScriptedVenue::new();
    let venue = Arc::new(venue);
    let settings = GameSettings {
        draw_duration: Duration::from_millis(200),
        poll_interval: Duration::from_millis(20),
        ..GameSettings::default()
    };
    let orchestrator = GameOrchestrator::new(feed, Arc::clone(&venue) as Arc<dyn OrderVenue>, settings);

    join_players(&orchestrator, 20).await;
    sleep(Duration::from_millis(50)).await;
    orchestrator.reset();

    assert_eq!(orchestrator.project().status, 0);
    sleep(Duration::from_millis(400)).await;
    // the timer never ran against the discarded game
    assert!(venue.placed().is_empty());
    assert!(orchestrator.current_game().is_none());
}

#[tokio::test]
async fn reset_during_fill_wait_abandons_all_resting_orders() {
    let feed = Arc::new(StaticFeed::new(dec!(50000)));
    let (venue, _script) = ScriptedVenue::new();
    let venue = Arc::new(venue);
    let orchestrator = GameOrchestrator::new(feed, Arc::clone(&venue) as Arc<dyn OrderVenue>, quick_settings());

    join_players(&orchestrator, 20).await;
    sleep(EXECUTION_GRACE).await;
    assert_eq!(venue.placed().len(), 20);

    orchestrator.reset();
    sleep(SETTLE_GRACE).await;

    assert_eq!(orchestrator.project().status, 0);
    assert_eq!(venue.cancelled().len(), 20);

    // a new game is unaffected by the old one's outstanding state
    orchestrator.join(ParticipantId::new("fresh")).await.unwrap();
    assert_eq!(orchestrator.project().status, 0);
    assert_eq!(orchestrator.project().balls.len(), 1);
}

#[tokio::test]
async fn settled_game_rejects_further_joins() {
    let feed = Arc::new(StaticFeed::new(dec!(50000)));
    let (venue, script) = ScriptedVenue::new();
    let venue = Arc::new(venue);
    let orchestrator = GameOrchestrator::new(feed, Arc::clone(&venue) as Arc<dyn OrderVenue>, quick_settings());

    join_players(&orchestrator, 20).await;
    sleep(EXECUTION_GRACE).await;
    let (_, order) = venue.placed()[0].clone();
    script.fill(order);
    sleep(SETTLE_GRACE).await;
    assert_eq!(orchestrator.project().status, 2);

    let err = orchestrator.join(ParticipantId::new("late")).await.unwrap_err();
    assert!(matches!(
        err,
        ballrush::error::GameError::InvalidState {
            status: GameStatus::Done
        }
    ));
}
