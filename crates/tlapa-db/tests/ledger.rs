//! Ledger integration tests against a real PostgreSQL.
//!
//! Run with a disposable database:
//! ```bash
//! DATABASE_URL=postgres://localhost/tlapa_test cargo test -p tlapa-db -- --ignored
//! ```

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use tlapa_core::{
    CoreError, ErrorKind, LineRequest, Money, NewProduct, ProductPatch, QuotationInput, ReceiptEntry,
};
use tlapa_db::migrations::migration_status;
use tlapa_db::transaction::{quotation, receipt, sale};
use tlapa_db::{Database, DbConfig, DbError};

static COUNTER: AtomicUsize = AtomicUsize::new(0);

async fn connect() -> Database {
    dotenvy::dotenv().ok();
    let url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set for ignored tests");
    Database::new(DbConfig::new(url).max_connections(8))
        .await
        .expect("connect to test database")
}

fn unique(prefix: &str) -> String {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    format!("{prefix}-{nanos}-{}", COUNTER.fetch_add(1, Ordering::SeqCst))
}

async fn cashier(db: &Database) -> i64 {
    sqlx::query_scalar("INSERT INTO users (username, full_name) VALUES ($1, 'Cajero Prueba') RETURNING id")
        .bind(unique("caja"))
        .fetch_one(db.pool())
        .await
        .unwrap()
}

async fn product(db: &Database, stock: i64, sale_cents: i64) -> i64 {
    db.products()
        .insert(&NewProduct {
            code: unique("T"),
            description: unique("Producto"),
            stock,
            max_stock: 100,
            purchase_price: Money::from_cents(sale_cents / 2),
            sale_price: Money::from_cents(sale_cents),
            ..Default::default()
        })
        .await
        .unwrap()
        .id
}

async fn stock_of(db: &Database, id: i64) -> i64 {
    db.products().get_by_id(id).await.unwrap().unwrap().stock
}

// =============================================================================
// Sales
// =============================================================================

#[tokio::test]
#[ignore = "requires DATABASE_URL"]
async fn test_sale_total_matches_lines_and_decrements_stock() {
    let db = connect().await;
    let user = cashier(&db).await;
    let a = product(&db, 10, 1099).await;
    let b = product(&db, 10, 250).await;

    let receipt = sale::record_sale(&db, user, " Efectivo ", &[LineRequest::new(a, 3), LineRequest::new(b, 2)])
        .await
        .unwrap();

    assert_eq!(receipt.total.cents(), 3 * 1099 + 2 * 250);
    assert_eq!(receipt.payment_method, "Efectivo");
    assert_eq!(receipt.items_count, 2);

    let detail = db.sales().get(receipt.sale_id).await.unwrap().unwrap();
    let sum: Money = detail.lines.iter().map(|l| l.subtotal).sum();
    assert_eq!(detail.sale.total, sum);
    assert!(detail.lines.iter().all(|l| l.subtotal == l.unit_price * l.quantity));

    assert_eq!(stock_of(&db, a).await, 7);
    assert_eq!(stock_of(&db, b).await, 8);
}

#[tokio::test]
#[ignore = "requires DATABASE_URL"]
async fn test_repeated_lines_become_one_line() {
    let db = connect().await;
    let user = cashier(&db).await;
    let a = product(&db, 10, 100).await;

    let receipt = sale::record_sale(&db, user, "Tarjeta", &[LineRequest::new(a, 2), LineRequest::new(a, 3)])
        .await
        .unwrap();

    let detail = db.sales().get(receipt.sale_id).await.unwrap().unwrap();
    assert_eq!(detail.lines.len(), 1);
    assert_eq!(detail.lines[0].quantity, 5);
    assert_eq!(stock_of(&db, a).await, 5);
}

#[tokio::test]
#[ignore = "requires DATABASE_URL"]
async fn test_insufficient_stock_changes_nothing() {
    let db = connect().await;
    let user = cashier(&db).await;
    let a = product(&db, 10, 100).await;
    let b = product(&db, 1, 100).await;

    let err = sale::record_sale(&db, user, "Efectivo", &[LineRequest::new(a, 2), LineRequest::new(b, 2)])
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Conflict);
    assert!(matches!(
        err,
        DbError::Domain(CoreError::InsufficientStock { available: 1, requested: 2, .. })
    ));
    assert_eq!(stock_of(&db, a).await, 10);
    assert_eq!(stock_of(&db, b).await, 1);
}

#[tokio::test]
#[ignore = "requires DATABASE_URL"]
async fn test_unknown_and_inactive_products() {
    let db = connect().await;
    let user = cashier(&db).await;
    let a = product(&db, 10, 100).await;

    let err = sale::record_sale(&db, user, "Efectivo", &[LineRequest::new(a, 1), LineRequest::new(i64::MAX, 1)])
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
    assert_eq!(stock_of(&db, a).await, 10);

    db.products().deactivate(a).await.unwrap();
    let err = sale::record_sale(&db, user, "Efectivo", &[LineRequest::new(a, 1)])
        .await
        .unwrap_err();
    assert!(matches!(err, DbError::Domain(CoreError::ProductInactive { .. })));
}

#[tokio::test]
#[ignore = "requires DATABASE_URL"]
async fn test_validation_happens_before_any_write() {
    let db = connect().await;
    let user = cashier(&db).await;
    let a = product(&db, 10, 100).await;

    let err = sale::record_sale(&db, user, "   ", &[LineRequest::new(a, 1)]).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);

    let err = sale::record_sale(&db, user, "Efectivo", &[]).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);

    assert_eq!(stock_of(&db, a).await, 10);
}

#[tokio::test]
#[ignore = "requires DATABASE_URL"]
async fn test_concurrent_sales_exactly_one_wins() {
    let db = connect().await;
    let user = cashier(&db).await;
    let a = product(&db, 5, 100).await;

    let lines = [LineRequest::new(a, 3)];
    let (first, second) = tokio::join!(
        sale::record_sale(&db, user, "Efectivo", &lines),
        sale::record_sale(&db, user, "Efectivo", &lines),
    );

    let results = [first, second];
    assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
    assert!(results.iter().any(|r| matches!(
        r,
        Err(DbError::Domain(CoreError::InsufficientStock { available: 2, .. }))
    )));
    assert_eq!(stock_of(&db, a).await, 2);
}

#[tokio::test]
#[ignore = "requires DATABASE_URL"]
async fn test_overlapping_sales_in_opposite_order_do_not_deadlock() {
    let db = connect().await;
    let user = cashier(&db).await;
    let a = product(&db, 50, 100).await;
    let b = product(&db, 50, 100).await;

    let forward = [LineRequest::new(a, 1), LineRequest::new(b, 1)];
    let backward = [LineRequest::new(b, 1), LineRequest::new(a, 1)];

    let mut handles = Vec::new();
    for i in 0..10 {
        let db = db.clone();
        let lines = if i % 2 == 0 { forward } else { backward };
        handles.push(tokio::spawn(async move {
            sale::record_sale(&db, user, "Efectivo", &lines).await
        }));
    }
    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    assert_eq!(stock_of(&db, a).await, 40);
    assert_eq!(stock_of(&db, b).await, 40);
}

#[tokio::test]
#[ignore = "requires DATABASE_URL"]
async fn test_sold_lines_keep_their_price_after_repricing() {
    let db = connect().await;
    let user = cashier(&db).await;
    let a = product(&db, 10, 1000).await;

    let receipt = sale::record_sale(&db, user, "Efectivo", &[LineRequest::new(a, 2)]).await.unwrap();

    db.products()
        .update(
            a,
            &ProductPatch {
                sale_price: Some(Money::from_cents(9999)),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    receipt::apply_receipt(&db, &[ReceiptEntry::new(a, 1).with_prices(None, Some(Money::from_cents(12_000)))])
        .await
        .unwrap();

    let detail = db.sales().get(receipt.sale_id).await.unwrap().unwrap();
    assert_eq!(detail.lines[0].unit_price, Money::from_cents(1000));
    assert_eq!(detail.lines[0].subtotal, Money::from_cents(2000));
    assert_eq!(detail.sale.total, Money::from_cents(2000));
}

// =============================================================================
// Receipts
// =============================================================================

#[tokio::test]
#[ignore = "requires DATABASE_URL"]
async fn test_receipt_adds_stock_and_keeps_prices() {
    let db = connect().await;
    let a = product(&db, 4, 1000).await;

    let updated = receipt::apply_receipt(&db, &[ReceiptEntry::new(a, 10)]).await.unwrap();

    assert_eq!(updated.len(), 1);
    assert_eq!(updated[0].stock, 14);
    assert_eq!(updated[0].sale_price, Money::from_cents(1000));
    assert_eq!(updated[0].purchase_price, Money::from_cents(500));
}

#[tokio::test]
#[ignore = "requires DATABASE_URL"]
async fn test_receipt_price_override_and_merge() {
    let db = connect().await;
    let a = product(&db, 0, 1000).await;

    let updated = receipt::apply_receipt(
        &db,
        &[
            ReceiptEntry::new(a, 2).with_prices(Some(Money::from_cents(700)), None),
            ReceiptEntry::new(a, 3).with_prices(None, Some(Money::from_cents(1235))),
        ],
    )
    .await
    .unwrap();

    assert_eq!(updated.len(), 1);
    assert_eq!(updated[0].stock, 5);
    assert_eq!(updated[0].purchase_price, Money::from_cents(700));
    assert_eq!(updated[0].sale_price, Money::from_cents(1235));
}

#[tokio::test]
#[ignore = "requires DATABASE_URL"]
async fn test_failed_receipt_changes_nothing() {
    let db = connect().await;
    let a = product(&db, 4, 1000).await;
    let inactive = product(&db, 4, 1000).await;
    db.products().deactivate(inactive).await.unwrap();

    let err = receipt::apply_receipt(
        &db,
        &[
            ReceiptEntry::new(a, 10).with_prices(None, Some(Money::from_cents(1))),
            ReceiptEntry::new(inactive, 1),
        ],
    )
    .await
    .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::NotFound);
    let row = db.products().get_by_id(a).await.unwrap().unwrap();
    assert_eq!(row.stock, 4);
    assert_eq!(row.sale_price, Money::from_cents(1000));
    assert_eq!(stock_of(&db, inactive).await, 4);
}

#[tokio::test]
#[ignore = "requires DATABASE_URL"]
async fn test_receipt_past_stock_range_is_rejected() {
    let db = connect().await;
    let a = product(&db, 4, 1000).await;

    let err = receipt::apply_receipt(&db, &[ReceiptEntry::new(a, i64::MAX)]).await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Validation);
    assert_eq!(stock_of(&db, a).await, 4);
}

// =============================================================================
// Quotations
// =============================================================================

#[tokio::test]
#[ignore = "requires DATABASE_URL"]
async fn test_quotation_snapshot_and_replace() {
    let db = connect().await;
    let user = cashier(&db).await;
    let a = product(&db, 3, 500).await;
    let b = product(&db, 3, 200).await;

    let created = quotation::create_quotation(
        &db,
        user,
        &QuotationInput {
            client: None,
            payment_method: None,
            lines: vec![LineRequest::new(a, 2), LineRequest::new(a, 0), LineRequest::new(b, 50)],
        },
    )
    .await
    .unwrap();

    // Quantities above stock are fine, zero is quoted as one, stock untouched
    assert_eq!(created.total.cents(), 2 * 500 + 500 + 50 * 200);
    assert_eq!(stock_of(&db, a).await, 3);

    let detail = db.quotations().get(created.quotation_id).await.unwrap().unwrap();
    assert_eq!(detail.quotation.client, "Público General");
    assert_eq!(detail.quotation.payment_method, "Efectivo");
    assert_eq!(detail.lines.len(), 3);

    let updated = quotation::update_quotation(
        &db,
        created.quotation_id,
        &QuotationInput {
            client: Some("Constructora Sur".to_string()),
            payment_method: Some("Transferencia".to_string()),
            lines: vec![LineRequest::new(b, 1)],
        },
    )
    .await
    .unwrap();
    assert_eq!(updated.total.cents(), 200);

    let detail = db.quotations().get(created.quotation_id).await.unwrap().unwrap();
    assert_eq!(detail.quotation.client, "Constructora Sur");
    assert_eq!(detail.quotation.total.cents(), 200);
    assert_eq!(detail.lines.len(), 1);
    assert_eq!(detail.lines[0].product_id, b);
}

#[tokio::test]
#[ignore = "requires DATABASE_URL"]
async fn test_quotation_not_found_and_delete() {
    let db = connect().await;
    let user = cashier(&db).await;
    let a = product(&db, 3, 500).await;

    let input = QuotationInput {
        lines: vec![LineRequest::new(a, 1)],
        ..Default::default()
    };

    let err = quotation::update_quotation(&db, i64::MAX, &input).await.unwrap_err();
    assert!(matches!(err, DbError::Domain(CoreError::QuotationNotFound(_))));

    let created = quotation::create_quotation(&db, user, &input).await.unwrap();
    quotation::delete_quotation(&db, created.quotation_id).await.unwrap();
    assert!(db.quotations().get(created.quotation_id).await.unwrap().is_none());

    let lines: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM quotation_lines WHERE quotation_id = $1")
        .bind(created.quotation_id)
        .fetch_one(db.pool())
        .await
        .unwrap();
    assert_eq!(lines, 0);

    let err = quotation::delete_quotation(&db, created.quotation_id).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[tokio::test]
#[ignore = "requires DATABASE_URL"]
async fn test_update_of_missing_quotation_reports_the_quotation() {
    let db = connect().await;

    let input = QuotationInput {
        lines: vec![LineRequest::new(i64::MAX - 1, 1)],
        ..Default::default()
    };

    let err = quotation::update_quotation(&db, i64::MAX, &input).await.unwrap_err();
    assert!(matches!(err, DbError::Domain(CoreError::QuotationNotFound(id)) if id == i64::MAX));
}

#[tokio::test]
#[ignore = "requires DATABASE_URL"]
async fn test_quotation_reads_show_seller_and_live_stock() {
    let db = connect().await;
    let user = cashier(&db).await;
    let a = product(&db, 3, 500).await;

    let created = quotation::create_quotation(
        &db,
        user,
        &QuotationInput {
            lines: vec![LineRequest::new(a, 5)],
            ..Default::default()
        },
    )
    .await
    .unwrap();

    sale::record_sale(&db, user, "Efectivo", &[LineRequest::new(a, 2)]).await.unwrap();

    let detail = db.quotations().get(created.quotation_id).await.unwrap().unwrap();
    assert_eq!(detail.quotation.seller_name.as_deref(), Some("Cajero Prueba"));
    assert_eq!(detail.lines[0].quantity, 5);
    assert_eq!(detail.lines[0].current_stock, Some(1));

    let listed = db.quotations().list(1_000).await.unwrap();
    let row = listed.iter().find(|q| q.id == created.quotation_id).unwrap();
    assert_eq!(row.seller_name.as_deref(), Some("Cajero Prueba"));
}

#[tokio::test]
#[ignore = "requires DATABASE_URL"]
async fn test_quotation_past_amount_range_is_rejected() {
    let db = connect().await;
    let user = cashier(&db).await;
    let a = product(&db, 3, 1000).await;

    let err = quotation::create_quotation(
        &db,
        user,
        &QuotationInput {
            lines: vec![LineRequest::new(a, 10_000_000_000)],
            ..Default::default()
        },
    )
    .await
    .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Validation);
}

// =============================================================================
// Catalog
// =============================================================================

#[tokio::test]
#[ignore = "requires DATABASE_URL"]
async fn test_duplicate_code_is_conflict_and_patch_writes_only_supplied_fields() {
    let db = connect().await;
    let code = unique("DUP");

    let created = db
        .products()
        .insert(&NewProduct {
            code: code.clone(),
            description: "Brocha 2\"".to_string(),
            location: Some("Pasillo 3".to_string()),
            sale_price: Money::from_cents(4500),
            ..Default::default()
        })
        .await
        .unwrap();

    let err = db
        .products()
        .insert(&NewProduct {
            code,
            description: "Otra".to_string(),
            ..Default::default()
        })
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Conflict);

    let patched = db
        .products()
        .update(
            created.id,
            &ProductPatch {
                sale_price: Some(Money::from_cents(0)),
                location: Some(None),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(patched.sale_price, Money::zero());
    assert_eq!(patched.location, None);
    assert_eq!(patched.description, "Brocha 2\"");
}

/// A = 5; sale 3 → 2; sale 3 fails with available 2; receipt 4 → 6.
#[tokio::test]
#[ignore = "requires DATABASE_URL"]
async fn test_stock_walkthrough() {
    let db = connect().await;
    let user = cashier(&db).await;
    let a = product(&db, 5, 100).await;

    sale::record_sale(&db, user, "Efectivo", &[LineRequest::new(a, 3)]).await.unwrap();
    assert_eq!(stock_of(&db, a).await, 2);

    let err = sale::record_sale(&db, user, "Efectivo", &[LineRequest::new(a, 3)])
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        DbError::Domain(CoreError::InsufficientStock { available: 2, requested: 3, .. })
    ));

    let updated = receipt::apply_receipt(&db, &[ReceiptEntry::new(a, 4)]).await.unwrap();
    assert_eq!(updated[0].stock, 6);
}

// =============================================================================
// Pool
// =============================================================================

#[tokio::test]
#[ignore = "requires DATABASE_URL"]
async fn test_health_and_migration_status() {
    let db = connect().await;

    assert!(db.health_check().await);

    let (total, applied) = migration_status(db.pool()).await.unwrap();
    assert!(total >= 1);
    assert_eq!(applied, total);

    db.close().await;
    assert!(!db.health_check().await);
}
