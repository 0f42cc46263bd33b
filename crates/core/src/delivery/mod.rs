//! Delivery lifecycle state machine.
//!
//! Transitions are validated here; the database layer performs the stock
//! restoration that some transitions trigger.

pub mod error;
pub mod status;

pub use error::DeliveryError;
pub use status::DeliveryStatus;
