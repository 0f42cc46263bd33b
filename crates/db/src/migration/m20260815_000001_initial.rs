//! Initial database migration.
//!
//! Creates all enums, tables and indexes for the warehouse ledger.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();

        // ============================================================
        // PART 1: ENUMS
        // ============================================================
        db.execute_unprepared(ENUMS_SQL).await?;

        // ============================================================
        // PART 2: CORE TABLES
        // ============================================================
        db.execute_unprepared(USERS_SQL).await?;
        db.execute_unprepared(PRODUCTS_SQL).await?;

        // ============================================================
        // PART 3: BILLING
        // ============================================================
        db.execute_unprepared(INVOICES_SQL).await?;
        db.execute_unprepared(INVOICE_ITEMS_SQL).await?;
        db.execute_unprepared(PAYMENTS_SQL).await?;

        // ============================================================
        // PART 4: DELIVERIES
        // ============================================================
        db.execute_unprepared(DELIVERIES_SQL).await?;
        db.execute_unprepared(DELIVERY_ITEMS_SQL).await?;

        // ============================================================
        // PART 5: OPNAME, PRODUCTION, ADJUSTMENTS
        // ============================================================
        db.execute_unprepared(STOCK_OPNAMES_SQL).await?;
        db.execute_unprepared(STOCK_OPNAME_ITEMS_SQL).await?;
        db.execute_unprepared(PRODUCTION_LOGS_SQL).await?;
        db.execute_unprepared(STOCK_ADJUSTMENTS_SQL).await?;

        // ============================================================
        // PART 6: MOVEMENT LEDGER
        // ============================================================
        db.execute_unprepared(STOCK_MOVEMENTS_SQL).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(DROP_ALL_SQL).await?;
        Ok(())
    }
}

// ============================================================
// SQL CONSTANTS
// ============================================================

const ENUMS_SQL: &str = r"
-- Stock movement classification
CREATE TYPE movement_kind AS ENUM (
    'production_in',
    'sales_out',
    'return_in',
    'adjustment_in',
    'adjustment_out',
    'opname_adjustment'
);

-- Invoice kind
CREATE TYPE invoice_kind AS ENUM ('product', 'service');

-- Invoice document status
CREATE TYPE invoice_status AS ENUM ('draft', 'sent');

-- Derived invoice payment status
CREATE TYPE payment_status AS ENUM ('unpaid', 'partially_paid', 'paid');

-- Individual payment state
CREATE TYPE payment_state AS ENUM ('pending', 'cleared', 'canceled');

-- Delivery lifecycle status
CREATE TYPE delivery_status AS ENUM (
    'PENDING',
    'IN_TRANSIT',
    'DELIVERED',
    'CANCELLED',
    'RETURNED'
);

-- Stock opname outcome
CREATE TYPE opname_status AS ENUM ('completed', 'reconciled');

-- Manual adjustment direction
CREATE TYPE adjustment_direction AS ENUM ('in', 'out', 'opname_adjustment');
";

const USERS_SQL: &str = r"
CREATE TABLE users (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    email VARCHAR(255) NOT NULL UNIQUE,
    full_name VARCHAR(255) NOT NULL,
    role VARCHAR(50) NOT NULL DEFAULT 'staff',
    is_active BOOLEAN NOT NULL DEFAULT true,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE INDEX idx_users_email ON users(email) WHERE is_active = true;
";

const PRODUCTS_SQL: &str = r"
CREATE TABLE products (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    sku VARCHAR(50) NOT NULL UNIQUE,
    name VARCHAR(255) NOT NULL,
    unit VARCHAR(20) NOT NULL DEFAULT 'pcs',
    current_stock BIGINT NOT NULL DEFAULT 0,
    min_stock BIGINT NOT NULL DEFAULT 0,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT chk_stock_non_negative CHECK (current_stock >= 0),
    CONSTRAINT chk_min_stock_non_negative CHECK (min_stock >= 0)
);

CREATE INDEX idx_products_sku ON products(sku);
";

const INVOICES_SQL: &str = r"
CREATE TABLE invoices (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    number VARCHAR(50) NOT NULL UNIQUE,
    customer_name VARCHAR(255) NOT NULL,
    invoice_kind invoice_kind NOT NULL,
    status invoice_status NOT NULL DEFAULT 'draft',
    total_amount NUMERIC(19, 4) NOT NULL,
    paid_amount NUMERIC(19, 4) NOT NULL DEFAULT 0,
    remaining_amount NUMERIC(19, 4) NOT NULL,
    payment_status payment_status NOT NULL DEFAULT 'unpaid',
    created_by UUID NOT NULL REFERENCES users(id),
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT chk_total_non_negative CHECK (total_amount >= 0),
    CONSTRAINT chk_paid_non_negative CHECK (paid_amount >= 0),
    CONSTRAINT chk_remaining_consistent CHECK (remaining_amount = total_amount - paid_amount)
);

CREATE INDEX idx_invoices_number ON invoices(number);
CREATE INDEX idx_invoices_payment_status ON invoices(payment_status);
";

const INVOICE_ITEMS_SQL: &str = r"
CREATE TABLE invoice_items (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    invoice_id UUID NOT NULL REFERENCES invoices(id) ON DELETE CASCADE,
    product_id UUID REFERENCES products(id),
    description VARCHAR(500) NOT NULL,
    quantity BIGINT NOT NULL,
    unit_price NUMERIC(19, 4) NOT NULL,
    subtotal NUMERIC(19, 4) NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT chk_item_quantity_positive CHECK (quantity > 0),
    CONSTRAINT chk_item_subtotal CHECK (subtotal = unit_price * quantity)
);

CREATE INDEX idx_invoice_items_invoice ON invoice_items(invoice_id);
";

const PAYMENTS_SQL: &str = r"
CREATE TABLE payments (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    invoice_id UUID NOT NULL REFERENCES invoices(id) ON DELETE CASCADE,
    amount NUMERIC(19, 4) NOT NULL,
    status payment_state NOT NULL DEFAULT 'pending',
    proof_url VARCHAR(500),
    created_by UUID NOT NULL REFERENCES users(id),
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT chk_payment_amount_positive CHECK (amount > 0)
);

CREATE INDEX idx_payments_invoice ON payments(invoice_id);
";

const DELIVERIES_SQL: &str = r"
CREATE TABLE deliveries (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    invoice_id UUID NOT NULL REFERENCES invoices(id),
    status delivery_status NOT NULL DEFAULT 'PENDING',
    stock_restored_at TIMESTAMPTZ,
    created_by UUID NOT NULL REFERENCES users(id),
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE INDEX idx_deliveries_invoice ON deliveries(invoice_id);
CREATE INDEX idx_deliveries_status ON deliveries(status);
";

const DELIVERY_ITEMS_SQL: &str = r"
CREATE TABLE delivery_items (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    delivery_id UUID NOT NULL REFERENCES deliveries(id) ON DELETE CASCADE,
    product_id UUID NOT NULL REFERENCES products(id),
    quantity BIGINT NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT chk_delivery_quantity_positive CHECK (quantity > 0)
);

CREATE INDEX idx_delivery_items_delivery ON delivery_items(delivery_id);
";

const STOCK_OPNAMES_SQL: &str = r"
CREATE TABLE stock_opnames (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    number VARCHAR(50) NOT NULL UNIQUE,
    status opname_status NOT NULL,
    applied_at TIMESTAMPTZ,
    created_by UUID NOT NULL REFERENCES users(id),
    created_at TIMESTAMPTZ NOT NULL DEFAULT now()
);
";

const STOCK_OPNAME_ITEMS_SQL: &str = r"
CREATE TABLE stock_opname_items (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    opname_id UUID NOT NULL REFERENCES stock_opnames(id) ON DELETE CASCADE,
    product_id UUID NOT NULL REFERENCES products(id),
    system_stock BIGINT NOT NULL,
    physical_stock BIGINT NOT NULL,
    difference BIGINT NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT chk_counts_non_negative CHECK (system_stock >= 0 AND physical_stock >= 0),
    CONSTRAINT chk_difference_consistent CHECK (difference = physical_stock - system_stock),
    UNIQUE (opname_id, product_id)
);

CREATE INDEX idx_opname_items_opname ON stock_opname_items(opname_id);
";

const PRODUCTION_LOGS_SQL: &str = r"
CREATE TABLE production_logs (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    product_id UUID NOT NULL REFERENCES products(id),
    quantity BIGINT NOT NULL,
    batch_code VARCHAR(50) NOT NULL,
    reversed_at TIMESTAMPTZ,
    created_by UUID NOT NULL REFERENCES users(id),
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT chk_production_quantity_positive CHECK (quantity > 0)
);

CREATE INDEX idx_production_logs_product ON production_logs(product_id);
";

const STOCK_ADJUSTMENTS_SQL: &str = r"
CREATE TABLE stock_adjustments (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    product_id UUID NOT NULL REFERENCES products(id),
    direction adjustment_direction NOT NULL,
    quantity BIGINT NOT NULL,
    reason VARCHAR(500) NOT NULL,
    opname_id UUID REFERENCES stock_opnames(id),
    created_by UUID NOT NULL REFERENCES users(id),
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT chk_adjustment_quantity CHECK (
        (direction = 'opname_adjustment' AND quantity <> 0)
        OR (direction <> 'opname_adjustment' AND quantity > 0)
    )
);

CREATE INDEX idx_adjustments_product ON stock_adjustments(product_id);
CREATE INDEX idx_adjustments_opname ON stock_adjustments(opname_id) WHERE opname_id IS NOT NULL;
";

const STOCK_MOVEMENTS_SQL: &str = r"
CREATE TABLE stock_movements (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    product_id UUID NOT NULL REFERENCES products(id),
    movement_kind movement_kind NOT NULL,
    quantity BIGINT NOT NULL,
    previous_stock BIGINT NOT NULL,
    new_stock BIGINT NOT NULL,
    reference VARCHAR(255) NOT NULL,
    actor_id UUID NOT NULL REFERENCES users(id),
    delivery_id UUID REFERENCES deliveries(id) ON DELETE CASCADE,
    production_log_id UUID REFERENCES production_logs(id) ON DELETE CASCADE,
    opname_item_id UUID REFERENCES stock_opname_items(id),
    adjustment_id UUID REFERENCES stock_adjustments(id),
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT chk_quantity_nonzero CHECK (quantity <> 0),
    CONSTRAINT chk_snapshot_chain CHECK (new_stock = previous_stock + quantity),
    CONSTRAINT chk_snapshot_non_negative CHECK (new_stock >= 0),
    CONSTRAINT chk_kind_sign_consistent CHECK (
        (movement_kind IN ('production_in', 'return_in', 'adjustment_in') AND quantity > 0)
        OR (movement_kind IN ('sales_out', 'adjustment_out') AND quantity < 0)
        OR (movement_kind = 'opname_adjustment')
    )
);

CREATE INDEX idx_movements_product ON stock_movements(product_id, created_at);
CREATE INDEX idx_movements_delivery ON stock_movements(delivery_id) WHERE delivery_id IS NOT NULL;
CREATE INDEX idx_movements_production ON stock_movements(production_log_id) WHERE production_log_id IS NOT NULL;
";

const DROP_ALL_SQL: &str = r"
-- Order matters due to foreign key constraints
DROP TABLE IF EXISTS stock_movements CASCADE;
DROP TABLE IF EXISTS stock_adjustments CASCADE;
DROP TABLE IF EXISTS production_logs CASCADE;
DROP TABLE IF EXISTS stock_opname_items CASCADE;
DROP TABLE IF EXISTS stock_opnames CASCADE;
DROP TABLE IF EXISTS delivery_items CASCADE;
DROP TABLE IF EXISTS deliveries CASCADE;
DROP TABLE IF EXISTS payments CASCADE;
DROP TABLE IF EXISTS invoice_items CASCADE;
DROP TABLE IF EXISTS invoices CASCADE;
DROP TABLE IF EXISTS products CASCADE;
DROP TABLE IF EXISTS users CASCADE;

DROP TYPE IF EXISTS adjustment_direction CASCADE;
DROP TYPE IF EXISTS opname_status CASCADE;
DROP TYPE IF EXISTS delivery_status CASCADE;
DROP TYPE IF EXISTS payment_state CASCADE;
DROP TYPE IF EXISTS payment_status CASCADE;
DROP TYPE IF EXISTS invoice_status CASCADE;
DROP TYPE IF EXISTS invoice_kind CASCADE;
DROP TYPE IF EXISTS movement_kind CASCADE;
";
