//! `SeaORM` entity definitions.
//!
//! One module per table, plus the Postgres enum mappings in
//! [`sea_orm_active_enums`].

pub mod deliveries;
pub mod delivery_items;
pub mod invoice_items;
pub mod invoices;
pub mod payments;
pub mod production_logs;
pub mod products;
pub mod sea_orm_active_enums;
pub mod stock_adjustments;
pub mod stock_movements;
pub mod stock_opname_items;
pub mod stock_opnames;
pub mod users;
