//! Error types for stock operations.

use thiserror::Error;

use super::movement::MovementKind;

/// Errors that can occur during stock operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StockError {
    /// A movement quantity must be non-zero.
    #[error("Movement quantity must be non-zero")]
    ZeroQuantity,

    /// Fixed-direction kinds take an unsigned magnitude; only opname
    /// adjustments carry a signed difference.
    #[error("Movement kind {0:?} has a fixed direction and takes a magnitude")]
    FixedDirectionKind(MovementKind),

    /// Applying the delta would take the stock level below zero.
    #[error("Insufficient stock: on hand {on_hand}, requested {requested}")]
    InsufficientStock {
        /// Stock on hand before the movement.
        on_hand: i64,
        /// The outbound quantity requested.
        requested: i64,
    },

    /// The stock level would overflow.
    #[error("Stock level overflow")]
    Overflow,
}

impl StockError {
    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::ZeroQuantity => "ZERO_QUANTITY",
            Self::FixedDirectionKind(_) => "FIXED_DIRECTION_KIND",
            Self::InsufficientStock { .. } => "INSUFFICIENT_STOCK",
            Self::Overflow => "STOCK_OVERFLOW",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(StockError::ZeroQuantity.error_code(), "ZERO_QUANTITY");
        assert_eq!(
            StockError::InsufficientStock {
                on_hand: 3,
                requested: 5,
            }
            .error_code(),
            "INSUFFICIENT_STOCK"
        );
    }

    #[test]
    fn test_insufficient_stock_display() {
        let err = StockError::InsufficientStock {
            on_hand: 3,
            requested: 5,
        };
        assert_eq!(err.to_string(), "Insufficient stock: on hand 3, requested 5");
    }
}
