//! Typed stock movement deltas.
//!
//! A movement's direction lives in its signed quantity, not in a side
//! convention on an unsigned magnitude. [`StockDelta`] can only be built
//! through constructors that apply the kind's fixed sign, so a sales
//! movement that adds stock is unrepresentable.

use serde::{Deserialize, Serialize};

use super::error::StockError;

/// Classification of a stock movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MovementKind {
    /// Goods produced into the warehouse.
    ProductionIn,
    /// Goods shipped out against a delivery.
    SalesOut,
    /// Goods returned to the warehouse from a cancelled or returned delivery.
    ReturnIn,
    /// Manual adjustment adding stock.
    AdjustmentIn,
    /// Manual adjustment removing stock.
    AdjustmentOut,
    /// Correction applied from a reconciled stock opname (either direction).
    OpnameAdjustment,
}

/// Direction of a stock movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    /// Increases stock on hand.
    Inbound,
    /// Decreases stock on hand.
    Outbound,
}

impl MovementKind {
    /// Returns the fixed direction of this kind, or `None` for opname
    /// adjustments, which carry the direction in their signed difference.
    #[must_use]
    pub const fn fixed_direction(self) -> Option<Direction> {
        match self {
            Self::ProductionIn | Self::ReturnIn | Self::AdjustmentIn => Some(Direction::Inbound),
            Self::SalesOut | Self::AdjustmentOut => Some(Direction::Outbound),
            Self::OpnameAdjustment => None,
        }
    }

    /// Returns true if a stored signed quantity is consistent with this kind.
    ///
    /// Used when replaying persisted movement rows.
    #[must_use]
    pub const fn is_consistent(self, delta: i64) -> bool {
        match self.fixed_direction() {
            Some(Direction::Inbound) => delta > 0,
            Some(Direction::Outbound) => delta < 0,
            None => delta != 0,
        }
    }
}

/// A validated stock movement delta: a kind plus a signed quantity whose
/// sign matches the kind's direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StockDelta {
    kind: MovementKind,
    delta: i64,
}

impl StockDelta {
    /// Builds a delta for a fixed-direction kind from an unsigned magnitude.
    ///
    /// # Errors
    ///
    /// Returns `StockError::ZeroQuantity` for a zero magnitude, and
    /// `StockError::FixedDirectionKind` when called with
    /// `MovementKind::OpnameAdjustment` (use [`StockDelta::opname`]).
    pub fn new(kind: MovementKind, magnitude: u32) -> Result<Self, StockError> {
        if magnitude == 0 {
            return Err(StockError::ZeroQuantity);
        }
        let Some(direction) = kind.fixed_direction() else {
            return Err(StockError::FixedDirectionKind(kind));
        };
        let delta = match direction {
            Direction::Inbound => i64::from(magnitude),
            Direction::Outbound => -i64::from(magnitude),
        };
        Ok(Self { kind, delta })
    }

    /// Builds an opname adjustment from a signed difference
    /// (physical minus system count).
    ///
    /// # Errors
    ///
    /// Returns `StockError::ZeroQuantity` for a zero difference - an opname
    /// item without discrepancy has nothing to apply.
    pub fn opname(difference: i64) -> Result<Self, StockError> {
        if difference == 0 {
            return Err(StockError::ZeroQuantity);
        }
        Ok(Self {
            kind: MovementKind::OpnameAdjustment,
            delta: difference,
        })
    }

    /// The movement classification.
    #[must_use]
    pub const fn kind(self) -> MovementKind {
        self.kind
    }

    /// The signed quantity. Positive adds stock, negative removes it.
    #[must_use]
    pub const fn delta(self) -> i64 {
        self.delta
    }

    /// The direction implied by the signed quantity.
    #[must_use]
    pub const fn direction(self) -> Direction {
        if self.delta > 0 {
            Direction::Inbound
        } else {
            Direction::Outbound
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_inbound_kinds_produce_positive_delta() {
        for kind in [
            MovementKind::ProductionIn,
            MovementKind::ReturnIn,
            MovementKind::AdjustmentIn,
        ] {
            let d = StockDelta::new(kind, 5).unwrap();
            assert_eq!(d.delta(), 5);
            assert_eq!(d.direction(), Direction::Inbound);
        }
    }

    #[test]
    fn test_outbound_kinds_produce_negative_delta() {
        for kind in [MovementKind::SalesOut, MovementKind::AdjustmentOut] {
            let d = StockDelta::new(kind, 5).unwrap();
            assert_eq!(d.delta(), -5);
            assert_eq!(d.direction(), Direction::Outbound);
        }
    }

    #[test]
    fn test_zero_magnitude_rejected() {
        assert_eq!(
            StockDelta::new(MovementKind::SalesOut, 0),
            Err(StockError::ZeroQuantity)
        );
    }

    #[test]
    fn test_opname_kind_needs_signed_constructor() {
        assert_eq!(
            StockDelta::new(MovementKind::OpnameAdjustment, 5),
            Err(StockError::FixedDirectionKind(MovementKind::OpnameAdjustment))
        );
    }

    #[test]
    fn test_opname_delta_keeps_sign() {
        assert_eq!(StockDelta::opname(-8).unwrap().delta(), -8);
        assert_eq!(StockDelta::opname(12).unwrap().delta(), 12);
        assert_eq!(StockDelta::opname(0), Err(StockError::ZeroQuantity));
    }

    #[test]
    fn test_is_consistent() {
        assert!(MovementKind::SalesOut.is_consistent(-3));
        assert!(!MovementKind::SalesOut.is_consistent(3));
        assert!(MovementKind::ReturnIn.is_consistent(3));
        assert!(!MovementKind::ReturnIn.is_consistent(-3));
        assert!(MovementKind::OpnameAdjustment.is_consistent(-1));
        assert!(MovementKind::OpnameAdjustment.is_consistent(1));
        assert!(!MovementKind::OpnameAdjustment.is_consistent(0));
    }

    fn kind_strategy() -> impl Strategy<Value = MovementKind> {
        prop_oneof![
            Just(MovementKind::ProductionIn),
            Just(MovementKind::SalesOut),
            Just(MovementKind::ReturnIn),
            Just(MovementKind::AdjustmentIn),
            Just(MovementKind::AdjustmentOut),
        ]
    }

    proptest! {
        /// **Property: constructed deltas are always consistent with their kind**
        #[test]
        fn prop_constructed_delta_consistent(
            kind in kind_strategy(),
            magnitude in 1u32..1_000_000,
        ) {
            let d = StockDelta::new(kind, magnitude).unwrap();
            prop_assert!(d.kind().is_consistent(d.delta()));
            prop_assert_eq!(d.delta().unsigned_abs(), u64::from(magnitude));
        }

        /// **Property: opname deltas preserve the signed difference**
        #[test]
        fn prop_opname_preserves_difference(difference in -1_000_000i64..1_000_000) {
            prop_assume!(difference != 0);
            let d = StockDelta::opname(difference).unwrap();
            prop_assert_eq!(d.delta(), difference);
            prop_assert!(d.kind().is_consistent(d.delta()));
        }
    }
}
