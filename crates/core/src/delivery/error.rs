//! Delivery state machine errors.

use thiserror::Error;

use super::status::DeliveryStatus;

/// Errors from delivery status transitions.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DeliveryError {
    /// The requested transition is not allowed from the current status.
    #[error("cannot transition delivery from {from} to {to}")]
    InvalidTransition {
        /// Current status.
        from: DeliveryStatus,
        /// Requested status.
        to: DeliveryStatus,
    },

    /// The delivery is in a terminal status and cannot change again.
    #[error("delivery is already {0} and cannot be modified")]
    Terminal(DeliveryStatus),
}

impl DeliveryError {
    /// Stable machine-readable error code.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidTransition { .. } => "INVALID_STATUS_TRANSITION",
            Self::Terminal(_) => "DELIVERY_TERMINAL",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes_are_stable() {
        let err = DeliveryError::InvalidTransition {
            from: DeliveryStatus::Pending,
            to: DeliveryStatus::Delivered,
        };
        assert_eq!(err.error_code(), "INVALID_STATUS_TRANSITION");
        assert_eq!(
            DeliveryError::Terminal(DeliveryStatus::Cancelled).error_code(),
            "DELIVERY_TERMINAL"
        );
    }

    #[test]
    fn test_error_display_names_statuses() {
        let err = DeliveryError::InvalidTransition {
            from: DeliveryStatus::InTransit,
            to: DeliveryStatus::Pending,
        };
        assert_eq!(
            err.to_string(),
            "cannot transition delivery from IN_TRANSIT to PENDING"
        );
    }
}
