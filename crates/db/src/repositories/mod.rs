//! Repository abstractions for data access.
//!
//! Each repository wraps its balance mutation in one database transaction:
//! reads happen inside the transaction under row locks, the pure domain
//! functions from `gudang-core` decide the outcome, and any error rolls
//! the whole mutation back.

pub mod adjustment;
pub mod delivery;
pub mod invoice;
pub mod opname;
pub mod payment;
pub mod product;
pub mod production;
pub mod stock;

pub use adjustment::{
    AdjustmentError, AdjustmentRepository, CreateAdjustmentInput, ManualDirection,
};
pub use delivery::{
    CreateDeliveryInput, CreateDeliveryItemInput, DeliveryError, DeliveryRepository,
    DeliveryWithItems,
};
pub use invoice::{
    CreateInvoiceInput, CreateInvoiceItemInput, InvoiceError, InvoiceRepository, InvoiceWithItems,
};
pub use opname::{
    CreateOpnameInput, OpnameError, OpnameItemInput, OpnameRepository, OpnameWithItems,
};
pub use payment::{CreatePaymentInput, PaymentError, PaymentRepository};
pub use product::{CreateProductInput, ProductError, ProductRepository};
pub use production::{CreateProductionInput, ProductionError, ProductionRepository};
pub use stock::{MovementContext, StockApplyError};
