//! Slot generation and target-price computation.
//!
//! Two pricing stages exist and are deliberately kept apart:
//!
//! - The **display-stage** target (`compute_targets`) offsets from the price
//!   recorded at game start: long balls rest above it, short balls below, in
//!   strictly increasing magnitude by family index. This is what participants
//!   see and what settlement proximity checks use.
//! - The **execution-stage** price (`execution_price`) offsets from a fresh
//!   market price immediately before order placement, with a smaller step and
//!   inverted direction so the hedge orders rest near the touch.

use rand::seq::SliceRandom;
use rand::Rng;
use rust_decimal::Decimal;

use super::ball::{Ball, BallName, Side};

/// Generate the 20 unclaimed slots in a uniformly random order.
///
/// The permutation decorrelates join order from ball identity. Callers are
/// responsible for invoking this at most once per game (guarded by checking
/// that the game has no slots yet).
pub fn generate_slots<R: Rng + ?Sized>(rng: &mut R) -> Vec<Ball> {
    let mut balls: Vec<Ball> = BallName::all().map(Ball::unassigned).collect();
    balls.shuffle(rng);
    balls
}

/// Compute display-stage targets: for family index `i`, long balls get
/// `reference + (i+1)*step` and short balls `reference - (i+1)*step`.
pub fn compute_targets(balls: &mut [Ball], reference: Decimal, step: Decimal) {
    for ball in balls {
        let offset = Decimal::from(ball.name().family_index() + 1) * step;
        let target = match ball.side() {
            Side::Long => reference + offset,
            Side::Short => reference - offset,
        };
        ball.set_target_price(target);
    }
}

/// Execution-stage limit price for one ball against a fresh market price.
///
/// Direction is inverted relative to the display stage: long balls bid below
/// the market, short balls offer above it.
#[must_use]
pub fn execution_price(name: BallName, market: Decimal, step: Decimal) -> Decimal {
    let offset = Decimal::from(name.family_index() + 1) * step;
    match name.side() {
        Side::Long => market - offset,
        Side::Short => market + offset,
    }
}

/// Find the ball whose target price is closest to `price`.
///
/// Ties break to the first occurrence in iteration order. Returns `None`
/// for an empty set.
pub fn closest_ball_to_price<'a, I>(balls: I, price: Decimal) -> Option<BallName>
where
    I: IntoIterator<Item = &'a Ball>,
{
    let mut best: Option<(BallName, Decimal)> = None;
    for ball in balls {
        let distance = (ball.target_price() - price).abs();
        match best {
            Some((_, best_distance)) if distance >= best_distance => {}
            _ => best = Some((ball.name(), distance)),
        }
    }
    best.map(|(name, _)| name)
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use rust_decimal_macros::dec;

    use super::*;
    use crate::domain::ball::BALL_COUNT;

    fn slots() -> Vec<Ball> {
        generate_slots(&mut rand::thread_rng())
    }

    #[test]
    fn generate_slots_yields_all_twenty_names_once() {
        let balls = slots();
        assert_eq!(balls.len(), BALL_COUNT);
        let names: HashSet<String> = balls.iter().map(|b| b.name().to_string()).collect();
        assert_eq!(names.len(), BALL_COUNT);
        assert!(names.contains("B0"));
        assert!(names.contains("S9"));
    }

    #[test]
    fn generate_slots_starts_unclaimed_and_unpriced() {
        for ball in slots() {
            assert!(ball.owner().is_none());
            assert_eq!(ball.target_price(), Decimal::ZERO);
        }
    }

    #[test]
    fn display_targets_follow_step_formula() {
        let mut balls = slots();
        compute_targets(&mut balls, dec!(50000), dec!(2));

        let target_of = |name: &str| {
            balls
                .iter()
                .find(|b| b.name().to_string() == name)
                .unwrap()
                .target_price()
        };
        assert_eq!(target_of("B0"), dec!(50002));
        assert_eq!(target_of("B9"), dec!(50020));
        assert_eq!(target_of("S0"), dec!(49998));
        assert_eq!(target_of("S9"), dec!(49980));
    }

    #[test]
    fn execution_price_inverts_direction_with_smaller_step() {
        let long = BallName::new(Side::Long, 2).unwrap();
        let short = BallName::new(Side::Short, 4).unwrap();
        assert_eq!(execution_price(long, dec!(50000), dec!(1)), dec!(49997));
        assert_eq!(execution_price(short, dec!(50000), dec!(1)), dec!(50005));
    }

    #[test]
    fn closest_ball_picks_minimum_distance() {
        let mut balls: Vec<Ball> = BallName::all().take(3).map(Ball::unassigned).collect();
        balls[0].set_target_price(dec!(48));
        balls[1].set_target_price(dec!(52));
        balls[2].set_target_price(dec!(55));

        let winner = closest_ball_to_price(&balls, dec!(53)).unwrap();
        assert_eq!(winner, balls[1].name());
    }

    #[test]
    fn closest_ball_tie_breaks_to_first_occurrence() {
        let mut balls: Vec<Ball> = BallName::all().take(2).map(Ball::unassigned).collect();
        balls[0].set_target_price(dec!(51));
        balls[1].set_target_price(dec!(49));

        // both are distance 1 from 50
        let winner = closest_ball_to_price(&balls, dec!(50)).unwrap();
        assert_eq!(winner, balls[0].name());
    }

    #[test]
    fn closest_ball_on_empty_set_is_none() {
        let balls: Vec<Ball> = Vec::new();
        assert_eq!(closest_ball_to_price(&balls, dec!(50)), None);
    }
}
