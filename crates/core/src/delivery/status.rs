//! Delivery status values and transition rules.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::error::DeliveryError;

/// Lifecycle status of a delivery.
///
/// Allowed transitions:
///
/// ```text
/// PENDING ----> IN_TRANSIT ----> DELIVERED
///    |              |
///    v              v
/// CANCELLED      RETURNED
/// ```
///
/// `DELIVERED`, `CANCELLED` and `RETURNED` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DeliveryStatus {
    /// Created, stock already deducted, not yet shipped.
    Pending,
    /// Goods have left the warehouse.
    InTransit,
    /// Goods accepted by the customer.
    Delivered,
    /// Aborted before shipping; stock is restored.
    Cancelled,
    /// Came back after shipping; stock is restored.
    Returned,
}

impl DeliveryStatus {
    /// Whether no further transitions are allowed from this status.
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Delivered | Self::Cancelled | Self::Returned)
    }

    /// Whether entering this status puts the deducted stock back.
    #[must_use]
    pub fn restores_stock(self) -> bool {
        matches!(self, Self::Cancelled | Self::Returned)
    }

    /// Validates a transition from `self` to `to`.
    ///
    /// # Errors
    ///
    /// Returns `DeliveryError::Terminal` when `self` is terminal and
    /// `DeliveryError::InvalidTransition` for any other disallowed move.
    pub fn transition_to(self, to: Self) -> Result<Self, DeliveryError> {
        if self.is_terminal() {
            return Err(DeliveryError::Terminal(self));
        }
        let allowed = matches!(
            (self, to),
            (Self::Pending, Self::InTransit | Self::Cancelled)
                | (Self::InTransit, Self::Delivered | Self::Returned)
        );
        if allowed {
            Ok(to)
        } else {
            Err(DeliveryError::InvalidTransition { from: self, to })
        }
    }

    /// Database string representation.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::InTransit => "IN_TRANSIT",
            Self::Delivered => "DELIVERED",
            Self::Cancelled => "CANCELLED",
            Self::Returned => "RETURNED",
        }
    }

    /// Parses the database string representation.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "PENDING" => Some(Self::Pending),
            "IN_TRANSIT" => Some(Self::InTransit),
            "DELIVERED" => Some(Self::Delivered),
            "CANCELLED" => Some(Self::Cancelled),
            "RETURNED" => Some(Self::Returned),
            _ => None,
        }
    }
}

impl fmt::Display for DeliveryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const ALL: [DeliveryStatus; 5] = [
        DeliveryStatus::Pending,
        DeliveryStatus::InTransit,
        DeliveryStatus::Delivered,
        DeliveryStatus::Cancelled,
        DeliveryStatus::Returned,
    ];

    #[test]
    fn test_happy_path_transitions() {
        let status = DeliveryStatus::Pending;
        let status = status.transition_to(DeliveryStatus::InTransit).unwrap();
        let status = status.transition_to(DeliveryStatus::Delivered).unwrap();
        assert!(status.is_terminal());
    }

    #[test]
    fn test_cancel_only_from_pending() {
        assert!(DeliveryStatus::Pending
            .transition_to(DeliveryStatus::Cancelled)
            .is_ok());
        assert_eq!(
            DeliveryStatus::InTransit.transition_to(DeliveryStatus::Cancelled),
            Err(DeliveryError::InvalidTransition {
                from: DeliveryStatus::InTransit,
                to: DeliveryStatus::Cancelled,
            })
        );
    }

    #[test]
    fn test_return_only_from_in_transit() {
        assert!(DeliveryStatus::InTransit
            .transition_to(DeliveryStatus::Returned)
            .is_ok());
        assert_eq!(
            DeliveryStatus::Pending.transition_to(DeliveryStatus::Returned),
            Err(DeliveryError::InvalidTransition {
                from: DeliveryStatus::Pending,
                to: DeliveryStatus::Returned,
            })
        );
    }

    #[test]
    fn test_no_skipping_in_transit() {
        assert!(DeliveryStatus::Pending
            .transition_to(DeliveryStatus::Delivered)
            .is_err());
    }

    #[test]
    fn test_stock_restoring_statuses() {
        assert!(DeliveryStatus::Cancelled.restores_stock());
        assert!(DeliveryStatus::Returned.restores_stock());
        assert!(!DeliveryStatus::Delivered.restores_stock());
        assert!(!DeliveryStatus::Pending.restores_stock());
    }

    #[test]
    fn test_parse_roundtrip() {
        for status in ALL {
            assert_eq!(DeliveryStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(DeliveryStatus::parse("SHIPPED"), None);
    }

    // ========================================================================
    // Property: terminal statuses accept no transitions
    // ========================================================================

    fn any_status() -> impl Strategy<Value = DeliveryStatus> {
        prop::sample::select(ALL.as_slice())
    }

    proptest! {
        /// **Property: no transition ever leaves a terminal status**
        #[test]
        fn prop_terminal_statuses_are_final(from in any_status(), to in any_status()) {
            if from.is_terminal() {
                prop_assert_eq!(from.transition_to(to), Err(DeliveryError::Terminal(from)));
            }
        }

        /// **Property: every allowed transition moves forward or terminates**
        #[test]
        fn prop_transitions_never_return_to_pending(from in any_status(), to in any_status()) {
            if let Ok(next) = from.transition_to(to) {
                prop_assert_ne!(next, DeliveryStatus::Pending);
            }
        }
    }
}
