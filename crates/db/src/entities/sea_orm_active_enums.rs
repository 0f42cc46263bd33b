//! Postgres enum mappings.
//!
//! Each type mirrors a `CREATE TYPE ... AS ENUM` from the initial migration.
//! Conversions to and from the pure domain types in `gudang-core` live here
//! so repositories never match on raw strings.

use gudang_core::billing::{InvoicePaymentStatus, PaymentState as CorePaymentState};
use gudang_core::delivery::DeliveryStatus as CoreDeliveryStatus;
use gudang_core::stock::{MovementKind as CoreMovementKind, OpnameStatus as CoreOpnameStatus};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Classification of a stock movement.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "movement_kind")]
#[serde(rename_all = "snake_case")]
pub enum MovementKind {
    /// Finished goods entering stock.
    #[sea_orm(string_value = "production_in")]
    ProductionIn,
    /// Goods leaving stock for a delivery.
    #[sea_orm(string_value = "sales_out")]
    SalesOut,
    /// Goods coming back from a cancelled or returned delivery.
    #[sea_orm(string_value = "return_in")]
    ReturnIn,
    /// Manual inbound correction.
    #[sea_orm(string_value = "adjustment_in")]
    AdjustmentIn,
    /// Manual outbound correction.
    #[sea_orm(string_value = "adjustment_out")]
    AdjustmentOut,
    /// Reconciliation of a counted opname difference.
    #[sea_orm(string_value = "opname_adjustment")]
    OpnameAdjustment,
}

impl From<CoreMovementKind> for MovementKind {
    fn from(kind: CoreMovementKind) -> Self {
        match kind {
            CoreMovementKind::ProductionIn => Self::ProductionIn,
            CoreMovementKind::SalesOut => Self::SalesOut,
            CoreMovementKind::ReturnIn => Self::ReturnIn,
            CoreMovementKind::AdjustmentIn => Self::AdjustmentIn,
            CoreMovementKind::AdjustmentOut => Self::AdjustmentOut,
            CoreMovementKind::OpnameAdjustment => Self::OpnameAdjustment,
        }
    }
}

/// What an invoice bills for.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "invoice_kind")]
#[serde(rename_all = "snake_case")]
pub enum InvoiceKind {
    /// Bills physical goods; deliverable.
    #[sea_orm(string_value = "product")]
    Product,
    /// Bills services; never delivered.
    #[sea_orm(string_value = "service")]
    Service,
}

/// Document status of an invoice.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "invoice_status")]
#[serde(rename_all = "snake_case")]
pub enum InvoiceStatus {
    /// Editable, not yet sent to the customer.
    #[sea_orm(string_value = "draft")]
    Draft,
    /// Sent; eligible for payments and deliveries.
    #[sea_orm(string_value = "sent")]
    Sent,
}

/// Derived payment status of an invoice.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "payment_status")]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    /// No cleared or pending money yet.
    #[sea_orm(string_value = "unpaid")]
    Unpaid,
    /// Partially covered.
    #[sea_orm(string_value = "partially_paid")]
    PartiallyPaid,
    /// Fully covered.
    #[sea_orm(string_value = "paid")]
    Paid,
}

impl From<InvoicePaymentStatus> for PaymentStatus {
    fn from(status: InvoicePaymentStatus) -> Self {
        match status {
            InvoicePaymentStatus::Unpaid => Self::Unpaid,
            InvoicePaymentStatus::PartiallyPaid => Self::PartiallyPaid,
            InvoicePaymentStatus::Paid => Self::Paid,
        }
    }
}

/// Lifecycle state of a single payment.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "payment_state")]
#[serde(rename_all = "snake_case")]
pub enum PaymentState {
    /// Recorded, not yet cleared.
    #[sea_orm(string_value = "pending")]
    Pending,
    /// Funds confirmed.
    #[sea_orm(string_value = "cleared")]
    Cleared,
    /// Cancelled; excluded from aggregates.
    #[sea_orm(string_value = "canceled")]
    Canceled,
}

impl From<CorePaymentState> for PaymentState {
    fn from(state: CorePaymentState) -> Self {
        match state {
            CorePaymentState::Pending => Self::Pending,
            CorePaymentState::Cleared => Self::Cleared,
            CorePaymentState::Canceled => Self::Canceled,
        }
    }
}

impl From<PaymentState> for CorePaymentState {
    fn from(state: PaymentState) -> Self {
        match state {
            PaymentState::Pending => Self::Pending,
            PaymentState::Cleared => Self::Cleared,
            PaymentState::Canceled => Self::Canceled,
        }
    }
}

/// Lifecycle status of a delivery.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "delivery_status")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DeliveryStatus {
    /// Stock deducted, not yet shipped.
    #[sea_orm(string_value = "PENDING")]
    Pending,
    /// Left the warehouse.
    #[sea_orm(string_value = "IN_TRANSIT")]
    InTransit,
    /// Accepted by the customer.
    #[sea_orm(string_value = "DELIVERED")]
    Delivered,
    /// Aborted before shipping.
    #[sea_orm(string_value = "CANCELLED")]
    Cancelled,
    /// Came back after shipping.
    #[sea_orm(string_value = "RETURNED")]
    Returned,
}

impl From<CoreDeliveryStatus> for DeliveryStatus {
    fn from(status: CoreDeliveryStatus) -> Self {
        match status {
            CoreDeliveryStatus::Pending => Self::Pending,
            CoreDeliveryStatus::InTransit => Self::InTransit,
            CoreDeliveryStatus::Delivered => Self::Delivered,
            CoreDeliveryStatus::Cancelled => Self::Cancelled,
            CoreDeliveryStatus::Returned => Self::Returned,
        }
    }
}

impl From<DeliveryStatus> for CoreDeliveryStatus {
    fn from(status: DeliveryStatus) -> Self {
        match status {
            DeliveryStatus::Pending => Self::Pending,
            DeliveryStatus::InTransit => Self::InTransit,
            DeliveryStatus::Delivered => Self::Delivered,
            DeliveryStatus::Cancelled => Self::Cancelled,
            DeliveryStatus::Returned => Self::Returned,
        }
    }
}

/// Outcome of a stock opname count.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "opname_status")]
#[serde(rename_all = "snake_case")]
pub enum OpnameStatus {
    /// All counts matched the system, or differences have been applied.
    #[sea_orm(string_value = "completed")]
    Completed,
    /// At least one count differs; awaiting a reconciling adjustment.
    #[sea_orm(string_value = "reconciled")]
    Reconciled,
}

impl From<CoreOpnameStatus> for OpnameStatus {
    fn from(status: CoreOpnameStatus) -> Self {
        match status {
            CoreOpnameStatus::Completed => Self::Completed,
            CoreOpnameStatus::Reconciled => Self::Reconciled,
        }
    }
}

/// Direction of a manual stock adjustment.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "adjustment_direction")]
#[serde(rename_all = "snake_case")]
pub enum AdjustmentDirection {
    /// Adds stock.
    #[sea_orm(string_value = "in")]
    In,
    /// Removes stock.
    #[sea_orm(string_value = "out")]
    Out,
    /// Carries the signed difference of an opname item.
    #[sea_orm(string_value = "opname_adjustment")]
    OpnameAdjustment,
}
