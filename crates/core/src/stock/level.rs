//! Stock level application with snapshot tracking.
//!
//! A [`StockLevel`] is the running balance a product carries. Applying a
//! [`StockDelta`] produces a [`BalanceChange`] holding both the previous
//! and the new level, so the caller can stamp the full snapshot onto the
//! movement record and keep history reconstructable.

use serde::{Deserialize, Serialize};

use super::error::StockError;
use super::movement::StockDelta;

/// A product's stock on hand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockLevel {
    on_hand: i64,
}

/// The before/after snapshot of a single balance mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceChange {
    /// Stock on hand before the movement.
    pub previous: i64,
    /// Stock on hand after the movement.
    pub new: i64,
}

impl StockLevel {
    /// Creates a stock level. Negative inputs are clamped to zero - a
    /// persisted level can never legitimately be negative.
    #[must_use]
    pub const fn new(on_hand: i64) -> Self {
        Self {
            on_hand: if on_hand < 0 { 0 } else { on_hand },
        }
    }

    /// Current stock on hand.
    #[must_use]
    pub const fn on_hand(self) -> i64 {
        self.on_hand
    }

    /// Applies a delta, returning the before/after snapshot.
    ///
    /// # Errors
    ///
    /// Returns `StockError::InsufficientStock` when the delta would take
    /// the level below zero, and `StockError::Overflow` on arithmetic
    /// overflow. In either case the level is unchanged.
    pub fn apply(&mut self, delta: StockDelta) -> Result<BalanceChange, StockError> {
        let previous = self.on_hand;
        let new = previous
            .checked_add(delta.delta())
            .ok_or(StockError::Overflow)?;

        if new < 0 {
            return Err(StockError::InsufficientStock {
                on_hand: previous,
                requested: delta.delta().unsigned_abs().try_into().unwrap_or(i64::MAX),
            });
        }

        self.on_hand = new;
        Ok(BalanceChange { previous, new })
    }

    /// Replays a sequence of signed movement quantities from zero.
    ///
    /// The audit invariant: a product's stock on hand equals the sum of
    /// all signed movement quantities ever applied to it.
    #[must_use]
    pub fn replay(deltas: &[i64]) -> i64 {
        deltas.iter().copied().sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stock::movement::MovementKind;
    use proptest::prelude::*;

    #[test]
    fn test_apply_inbound() {
        let mut level = StockLevel::new(10);
        let change = level
            .apply(StockDelta::new(MovementKind::ProductionIn, 5).unwrap())
            .unwrap();
        assert_eq!(change.previous, 10);
        assert_eq!(change.new, 15);
        assert_eq!(level.on_hand(), 15);
    }

    #[test]
    fn test_apply_outbound() {
        let mut level = StockLevel::new(10);
        let change = level
            .apply(StockDelta::new(MovementKind::SalesOut, 4).unwrap())
            .unwrap();
        assert_eq!(change.previous, 10);
        assert_eq!(change.new, 6);
    }

    #[test]
    fn test_insufficient_stock_leaves_level_unchanged() {
        let mut level = StockLevel::new(3);
        let err = level
            .apply(StockDelta::new(MovementKind::SalesOut, 5).unwrap())
            .unwrap_err();
        assert_eq!(
            err,
            StockError::InsufficientStock {
                on_hand: 3,
                requested: 5,
            }
        );
        assert_eq!(level.on_hand(), 3);
    }

    #[test]
    fn test_exact_drain_to_zero_allowed() {
        let mut level = StockLevel::new(5);
        let change = level
            .apply(StockDelta::new(MovementKind::SalesOut, 5).unwrap())
            .unwrap();
        assert_eq!(change.new, 0);
    }

    #[test]
    fn test_negative_opname_adjustment() {
        let mut level = StockLevel::new(100);
        let change = level.apply(StockDelta::opname(-8).unwrap()).unwrap();
        assert_eq!(change.previous, 100);
        assert_eq!(change.new, 92);
    }

    #[test]
    fn test_new_clamps_negative() {
        assert_eq!(StockLevel::new(-5).on_hand(), 0);
    }

    // ========================================================================
    // Property: replay consistency
    // ========================================================================

    fn delta_strategy() -> impl Strategy<Value = StockDelta> {
        (1u32..1000).prop_flat_map(|magnitude| {
            prop_oneof![
                Just(StockDelta::new(MovementKind::ProductionIn, magnitude).unwrap()),
                Just(StockDelta::new(MovementKind::SalesOut, magnitude).unwrap()),
                Just(StockDelta::new(MovementKind::ReturnIn, magnitude).unwrap()),
                Just(StockDelta::new(MovementKind::AdjustmentIn, magnitude).unwrap()),
                Just(StockDelta::new(MovementKind::AdjustmentOut, magnitude).unwrap()),
            ]
        })
    }

    proptest! {
        /// **Property: stock on hand equals the sum of applied signed deltas**
        ///
        /// Rejected deltas must contribute nothing.
        #[test]
        fn prop_level_equals_sum_of_applied_deltas(
            deltas in prop::collection::vec(delta_strategy(), 0..50),
        ) {
            let mut level = StockLevel::new(0);
            let mut applied = Vec::new();

            for delta in deltas {
                if level.apply(delta).is_ok() {
                    applied.push(delta.delta());
                }
            }

            prop_assert_eq!(level.on_hand(), StockLevel::replay(&applied));
        }

        /// **Property: the level never goes negative**
        #[test]
        fn prop_level_never_negative(
            start in 0i64..10_000,
            deltas in prop::collection::vec(delta_strategy(), 0..50),
        ) {
            let mut level = StockLevel::new(start);
            for delta in deltas {
                let _ = level.apply(delta);
                prop_assert!(level.on_hand() >= 0);
            }
        }

        /// **Property: every successful apply snapshots a contiguous chain**
        ///
        /// `change.previous` of movement N equals `change.new` of movement N-1.
        #[test]
        fn prop_snapshot_chain_contiguous(
            start in 0i64..10_000,
            deltas in prop::collection::vec(delta_strategy(), 1..50),
        ) {
            let mut level = StockLevel::new(start);
            let mut last_new = start;

            for delta in deltas {
                if let Ok(change) = level.apply(delta) {
                    prop_assert_eq!(change.previous, last_new);
                    prop_assert_eq!(change.new, change.previous + delta.delta());
                    last_new = change.new;
                }
            }
        }
    }
}
