//! Database seeder for Gudang development and testing.
//!
//! Seeds a test user, a handful of products, and a sample invoice, then
//! prints a bearer token for the test user so the API can be exercised
//! immediately.
//!
//! Usage: cargo run --bin seeder

use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, Set};
use std::str::FromStr;
use uuid::Uuid;

use gudang_db::entities::{
    invoice_items, invoices, products,
    sea_orm_active_enums::{InvoiceKind, InvoiceStatus, PaymentStatus},
    users,
};
use gudang_db::repositories::product::{CreateProductInput, ProductError, ProductRepository};
use gudang_shared::{AuthConfig, TokenService};

/// Test user ID (consistent for all seeds)
const TEST_USER_ID: &str = "00000000-0000-0000-0000-000000000001";
/// Sample invoice ID (consistent for all seeds)
const TEST_INVOICE_ID: &str = "00000000-0000-0000-0000-000000000002";

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let database_url =
        std::env::var("DATABASE_URL").expect("DATABASE_URL must be set in environment");

    println!("Connecting to database...");
    let db = gudang_db::connect(&database_url)
        .await
        .expect("Failed to connect to database");

    println!("Seeding test user...");
    seed_test_user(&db).await;

    println!("Seeding products...");
    seed_products(&db).await;

    println!("Seeding sample invoice...");
    seed_sample_invoice(&db).await;

    print_token();

    println!("Seeding complete!");
}

fn test_user_id() -> Uuid {
    Uuid::parse_str(TEST_USER_ID).unwrap()
}

fn test_invoice_id() -> Uuid {
    Uuid::parse_str(TEST_INVOICE_ID).unwrap()
}

/// Seeds a test user for development.
async fn seed_test_user(db: &DatabaseConnection) {
    if users::Entity::find_by_id(test_user_id())
        .one(db)
        .await
        .ok()
        .flatten()
        .is_some()
    {
        println!("  Test user already exists, skipping...");
        return;
    }

    let user = users::ActiveModel {
        id: Set(test_user_id()),
        email: Set("admin@gudang.dev".to_string()),
        full_name: Set("Warehouse Admin".to_string()),
        role: Set("admin".to_string()),
        is_active: Set(true),
        created_at: Set(Utc::now().into()),
        updated_at: Set(Utc::now().into()),
    };

    if let Err(e) = user.insert(db).await {
        eprintln!("Failed to insert test user: {e}");
    } else {
        println!("  Created test user: admin@gudang.dev");
    }
}

/// Seeds a handful of finished-goods products with opening stock.
///
/// Goes through the repository so the opening stock lands in the movement
/// ledger like any other balance change.
async fn seed_products(db: &DatabaseConnection) {
    let catalog = [
        ("TB-OAK-120", "Oak Table 120cm", "pcs", 40_u32, 5_i64),
        ("CH-OAK-STD", "Oak Chair", "pcs", 160, 20),
        ("SH-PINE-80", "Pine Shelf 80cm", "pcs", 75, 10),
        ("BD-TEAK-Q", "Teak Bed Queen", "pcs", 12, 2),
        ("CB-PINE-2D", "Pine Cabinet 2-Door", "pcs", 30, 4),
    ];

    let repo = ProductRepository::new(db.clone());
    let mut inserted = 0;
    for (sku, name, unit, initial_stock, min_stock) in catalog {
        match repo
            .create_product(CreateProductInput {
                sku: sku.to_string(),
                name: name.to_string(),
                unit: unit.to_string(),
                initial_stock,
                min_stock,
                created_by: test_user_id(),
            })
            .await
        {
            Ok(_) => inserted += 1,
            Err(ProductError::DuplicateSku(_)) => {}
            Err(e) => eprintln!("Failed to insert product {sku}: {e}"),
        }
    }

    println!("  Inserted {inserted} products");
}

/// Seeds a sent product invoice with two lines, ready for payments.
async fn seed_sample_invoice(db: &DatabaseConnection) {
    use sea_orm::{ColumnTrait, QueryFilter};

    if invoices::Entity::find_by_id(test_invoice_id())
        .one(db)
        .await
        .ok()
        .flatten()
        .is_some()
    {
        println!("  Sample invoice already exists, skipping...");
        return;
    }

    let table = products::Entity::find()
        .filter(products::Column::Sku.eq("TB-OAK-120"))
        .one(db)
        .await
        .ok()
        .flatten();
    let chair = products::Entity::find()
        .filter(products::Column::Sku.eq("CH-OAK-STD"))
        .one(db)
        .await
        .ok()
        .flatten();

    let (Some(table), Some(chair)) = (table, chair) else {
        eprintln!("Seed products missing, skipping sample invoice");
        return;
    };

    let table_price = Decimal::from_str("1500000").unwrap();
    let chair_price = Decimal::from_str("350000").unwrap();
    let total = table_price * Decimal::from(2) + chair_price * Decimal::from(8);

    let invoice = invoices::ActiveModel {
        id: Set(test_invoice_id()),
        number: Set("INV-2026-0001".to_string()),
        customer_name: Set("Toko Mebel Sejahtera".to_string()),
        invoice_kind: Set(InvoiceKind::Product),
        status: Set(InvoiceStatus::Sent),
        total_amount: Set(total),
        paid_amount: Set(Decimal::ZERO),
        remaining_amount: Set(total),
        payment_status: Set(PaymentStatus::Unpaid),
        created_by: Set(test_user_id()),
        created_at: Set(Utc::now().into()),
        updated_at: Set(Utc::now().into()),
    };

    if let Err(e) = invoice.insert(db).await {
        eprintln!("Failed to insert sample invoice: {e}");
        return;
    }

    let lines = [
        (Some(table.id), "Oak Table 120cm", 2_i64, table_price),
        (Some(chair.id), "Oak Chair", 8, chair_price),
    ];

    for (product_id, description, quantity, unit_price) in lines {
        let item = invoice_items::ActiveModel {
            id: Set(Uuid::new_v4()),
            invoice_id: Set(test_invoice_id()),
            product_id: Set(product_id),
            description: Set(description.to_string()),
            quantity: Set(quantity),
            unit_price: Set(unit_price),
            subtotal: Set(unit_price * Decimal::from(quantity)),
            created_at: Set(Utc::now().into()),
        };

        if let Err(e) = item.insert(db).await {
            eprintln!("Failed to insert invoice item {description}: {e}");
        }
    }

    println!("  Created sample invoice INV-2026-0001");
}

/// Issues and prints a bearer token for the test user.
fn print_token() {
    let Ok(secret) = std::env::var("GUDANG__AUTH__SECRET") else {
        println!("GUDANG__AUTH__SECRET not set, skipping token");
        return;
    };

    let tokens = TokenService::new(&AuthConfig {
        secret,
        token_expiry_secs: 28_800,
    });

    match tokens.issue(test_user_id(), "admin") {
        Ok(token) => println!("Bearer token for admin@gudang.dev:\n  {token}"),
        Err(e) => eprintln!("Failed to issue token: {e}"),
    }
}
