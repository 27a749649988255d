//! Ball identity and assignment state.

use std::fmt;

use rust_decimal::Decimal;

use super::id::{OrderId, ParticipantId};

/// Number of balls per family (long and short).
pub const FAMILY_SIZE: u8 = 10;

/// Total number of balls in a game.
pub const BALL_COUNT: usize = (FAMILY_SIZE as usize) * 2;

/// Which direction a ball's hedge order trades.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Long,
    Short,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Long => write!(f, "long"),
            Self::Short => write!(f, "short"),
        }
    }
}

/// One of the 20 fixed ball symbols: `B0`..`B9` (long family) or
/// `S0`..`S9` (short family).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BallName {
    side: Side,
    index: u8,
}

impl BallName {
    /// Create a ball name from its family and index.
    ///
    /// Returns `None` if `index` is outside `0..10`.
    #[must_use]
    pub fn new(side: Side, index: u8) -> Option<Self> {
        (index < FAMILY_SIZE).then_some(Self { side, index })
    }

    /// The family this ball belongs to.
    #[must_use]
    pub const fn side(&self) -> Side {
        self.side
    }

    /// Position within the family, `0..10`.
    #[must_use]
    pub const fn family_index(&self) -> u8 {
        self.index
    }

    /// All 20 ball names in family order: `B0..B9` then `S0..S9`.
    pub fn all() -> impl Iterator<Item = Self> {
        let longs = (0..FAMILY_SIZE).map(|i| Self {
            side: Side::Long,
            index: i,
        });
        let shorts = (0..FAMILY_SIZE).map(|i| Self {
            side: Side::Short,
            index: i,
        });
        longs.chain(shorts)
    }
}

impl fmt::Display for BallName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let prefix = match self.side {
            Side::Long => 'B',
            Side::Short => 'S',
        };
        write!(f, "{}{}", prefix, self.index)
    }
}

/// A claimable slot with a computed target price.
///
/// Identity (`name`) is immutable; the owner is set at most once when a
/// participant claims the ball and never reassigned.
#[derive(Debug, Clone)]
pub struct Ball {
    name: BallName,
    target_price: Decimal,
    owner: Option<ParticipantId>,
    order_id: Option<OrderId>,
}

impl Ball {
    /// Create an unclaimed ball with no target price.
    #[must_use]
    pub(crate) fn unassigned(name: BallName) -> Self {
        Self {
            name,
            target_price: Decimal::ZERO,
            owner: None,
            order_id: None,
        }
    }

    #[must_use]
    pub const fn name(&self) -> BallName {
        self.name
    }

    #[must_use]
    pub const fn side(&self) -> Side {
        self.name.side()
    }

    #[must_use]
    pub const fn target_price(&self) -> Decimal {
        self.target_price
    }

    #[must_use]
    pub fn owner(&self) -> Option<&ParticipantId> {
        self.owner.as_ref()
    }

    #[must_use]
    pub fn order_id(&self) -> Option<&OrderId> {
        self.order_id.as_ref()
    }

    pub(crate) fn set_target_price(&mut self, price: Decimal) {
        self.target_price = price;
    }

    /// Claim the ball for a participant. Ownership never changes once set.
    pub(crate) fn claim(&mut self, owner: ParticipantId) {
        debug_assert!(self.owner.is_none(), "ball {} claimed twice", self.name);
        self.owner = Some(owner);
    }

    pub(crate) fn set_order_id(&mut self, order_id: OrderId) {
        self.order_id = Some(order_id);
    }
}
