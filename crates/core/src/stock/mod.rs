//! Stock movements, balance application, and opname derivation.
//!
//! Every stock mutation in Gudang flows through this module:
//! - A [`StockDelta`] pairs a movement kind with a signed quantity whose
//!   sign is fixed by the kind, so direction can never be mismatched.
//! - A [`StockLevel`] applies deltas and refuses to go negative.
//! - Opname counts derive their status from per-item differences.

pub mod error;
pub mod level;
pub mod movement;
pub mod opname;

pub use error::StockError;
pub use level::{BalanceChange, StockLevel};
pub use movement::{Direction, MovementKind, StockDelta};
pub use opname::{OpnameCount, OpnameStatus, opname_status};
