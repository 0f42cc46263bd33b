//! Core business logic for Gudang.
//!
//! This crate contains pure business logic with ZERO web or database dependencies.
//! All domain types, validation rules, and calculations live here.
//!
//! # Modules
//!
//! - `stock` - Stock movements, balance application, and opname derivation
//! - `billing` - Invoice payment aggregates and status derivation
//! - `delivery` - Delivery status state machine

pub mod billing;
pub mod delivery;
pub mod stock;
