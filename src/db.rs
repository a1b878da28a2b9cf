use anyhow::Context;
use chrono::NaiveDate;
use sqlx::{PgPool, Row};

use crate::models::{MonthlyKpi, SaleRecord, NO_BRAND};

/// Fixed filters carried over from the source ERP: one company, the
/// e-commerce segment, and the operation codes that must never count as
/// sales (transfers, internal movements, write-offs).
const COMPANY_ID: i32 = 1;
const SEGMENT_ID: i32 = 3;
const EXCLUDED_OPERATIONS: [i32; 15] = [
    216, 251, 801, 809, 815, 820, 822, 823, 955, 802, 811, 805, 206, 850, 922,
];

pub async fn init_db(pool: &PgPool) -> anyhow::Result<()> {
    sqlx::migrate!("./migrations").run(pool).await?;
    Ok(())
}

/// Brand x month rollup over the trailing window, one row per (brand,
/// month) pair, months ascending and net value descending within each
/// month. Products without a brand fall into the "* SEM MARCA *" bucket.
pub async fn fetch_detailed(pool: &PgPool, since: NaiveDate) -> anyhow::Result<Vec<SaleRecord>> {
    let query = format!(
        r#"
        SELECT
            COALESCE(p.brand, '{NO_BRAND}') AS brand,
            to_char(s.sold_at, 'YYYY-MM') AS month,
            COUNT(DISTINCT s.document_number) AS order_count,
            COUNT(DISTINCT s.customer_id) AS customer_count,
            SUM(s.item_value - s.returned_value
                + COALESCE(s.tax_refund, 0)
                - COALESCE(s.tax_refund_reversal, 0)) AS net_value,
            SUM(s.quantity - s.returned_quantity) AS net_quantity
        FROM sales_report.sale_items s
        JOIN sales_report.products p ON p.id = s.product_id
        WHERE s.sold_at >= $1
          AND s.company_id = $2
          AND s.segment_id = $3
          AND s.operation_code <> ALL($4)
        GROUP BY COALESCE(p.brand, '{NO_BRAND}'), to_char(s.sold_at, 'YYYY-MM')
        ORDER BY month, net_value DESC
        "#
    );
    let rows = sqlx::query(&query)
        .bind(since)
        .bind(COMPANY_ID)
        .bind(SEGMENT_ID)
        .bind(&EXCLUDED_OPERATIONS[..])
        .fetch_all(pool)
        .await
        .context("detailed sales query failed")?;

    let mut records = Vec::with_capacity(rows.len());
    for row in rows {
        records.push(SaleRecord {
            brand: row.get("brand"),
            month: row.get("month"),
            order_count: row.get("order_count"),
            customer_count: row.get("customer_count"),
            net_value: row.get("net_value"),
            net_quantity: row.get("net_quantity"),
        });
    }

    Ok(records)
}

/// Month-only KPI rollup over the same window and filters. The average
/// ticket divides by NULLIF(customers, 0) so a month without distinct
/// customers comes back as NULL rather than failing the whole query.
pub async fn fetch_monthly_kpis(
    pool: &PgPool,
    since: NaiveDate,
) -> anyhow::Result<Vec<MonthlyKpi>> {
    let rows = sqlx::query(
        r#"
        SELECT
            to_char(s.sold_at, 'YYYY-MM') AS month,
            COUNT(DISTINCT s.document_number) AS order_count,
            COUNT(DISTINCT s.customer_id) AS customer_count,
            SUM(s.item_value - s.returned_value
                + COALESCE(s.tax_refund, 0)
                - COALESCE(s.tax_refund_reversal, 0)) AS net_value,
            SUM(s.item_value - s.returned_value
                + COALESCE(s.tax_refund, 0)
                - COALESCE(s.tax_refund_reversal, 0))
                / NULLIF(COUNT(DISTINCT s.customer_id), 0) AS average_ticket
        FROM sales_report.sale_items s
        WHERE s.sold_at >= $1
          AND s.company_id = $2
          AND s.segment_id = $3
          AND s.operation_code <> ALL($4)
        GROUP BY to_char(s.sold_at, 'YYYY-MM')
        ORDER BY month
        "#,
    )
    .bind(since)
    .bind(COMPANY_ID)
    .bind(SEGMENT_ID)
    .bind(&EXCLUDED_OPERATIONS[..])
    .fetch_all(pool)
    .await
    .context("monthly KPI query failed")?;

    let mut kpis = Vec::with_capacity(rows.len());
    for row in rows {
        kpis.push(MonthlyKpi {
            month: row.get("month"),
            order_count: row.get("order_count"),
            customer_count: row.get("customer_count"),
            net_value: row.get("net_value"),
            average_ticket: row.get("average_ticket"),
        });
    }

    Ok(kpis)
}

pub async fn seed(pool: &PgPool) -> anyhow::Result<()> {
    let products = vec![
        ("Cafeteira Elétrica 127V", Some("Mondial")),
        ("Liquidificador Turbo 900W", Some("Mondial")),
        ("Fone Bluetooth TWS", Some("Philco")),
        ("Panela de Pressão 4.5L", Some("Clock")),
        ("Garrafa Térmica 1L", None),
    ];

    let mut product_ids = Vec::new();
    for (name, brand) in products {
        let id: i64 = sqlx::query(
            r#"
            INSERT INTO sales_report.products (name, brand)
            VALUES ($1, $2)
            ON CONFLICT (name) DO UPDATE SET brand = EXCLUDED.brand
            RETURNING id
            "#,
        )
        .bind(name)
        .bind(brand)
        .fetch_one(pool)
        .await?
        .get("id");
        product_ids.push(id);
    }

    let today = chrono::Utc::now().date_naive();
    let days_ago = |days: i64| today - chrono::Duration::days(days);

    // (document, customer, product index, sold_at, value, returned, qty, qty returned)
    let items: Vec<(i64, i64, usize, NaiveDate, f64, f64, i32, i32)> = vec![
        (90_001, 501, 0, days_ago(70), 189.90, 0.0, 1, 0),
        (90_001, 501, 4, days_ago(70), 49.90, 0.0, 2, 0),
        (90_002, 502, 1, days_ago(68), 259.80, 129.90, 2, 1),
        (90_003, 503, 2, days_ago(41), 99.90, 0.0, 1, 0),
        (90_004, 501, 2, days_ago(39), 199.80, 0.0, 2, 0),
        (90_005, 504, 3, days_ago(38), 159.90, 0.0, 1, 0),
        (90_006, 505, 0, days_ago(9), 189.90, 0.0, 1, 0),
        (90_007, 502, 3, days_ago(8), 319.80, 0.0, 2, 0),
        (90_008, 506, 4, days_ago(6), 99.80, 49.90, 2, 1),
    ];

    for (document, customer, product_idx, sold_at, value, returned, qty, qty_returned) in items {
        sqlx::query(
            r#"
            INSERT INTO sales_report.sale_items
            (document_number, customer_id, product_id, sold_at,
             item_value, returned_value, tax_refund, tax_refund_reversal,
             quantity, returned_quantity, company_id, segment_id, operation_code)
            VALUES ($1, $2, $3, $4, $5, $6, 0, 0, $7, $8, $9, $10, 101)
            ON CONFLICT (document_number, product_id) DO NOTHING
            "#,
        )
        .bind(document)
        .bind(customer)
        .bind(product_ids[product_idx])
        .bind(sold_at)
        .bind(value)
        .bind(returned)
        .bind(qty)
        .bind(qty_returned)
        .bind(COMPANY_ID)
        .bind(SEGMENT_ID)
        .execute(pool)
        .await?;
    }

    Ok(())
}

pub async fn import_csv(pool: &PgPool, csv_path: &std::path::Path) -> anyhow::Result<usize> {
    #[derive(serde::Deserialize)]
    struct CsvRow {
        sold_at: NaiveDate,
        document_number: i64,
        customer_id: i64,
        product: String,
        brand: Option<String>,
        item_value: f64,
        returned_value: f64,
        tax_refund: Option<f64>,
        tax_refund_reversal: Option<f64>,
        quantity: i32,
        returned_quantity: i32,
        operation_code: i32,
    }

    let mut reader = csv::Reader::from_path(csv_path)
        .with_context(|| format!("cannot open {}", csv_path.display()))?;
    let mut inserted = 0usize;

    for result in reader.deserialize::<CsvRow>() {
        let row = result?;
        let product_id: i64 = sqlx::query(
            r#"
            INSERT INTO sales_report.products (name, brand)
            VALUES ($1, $2)
            ON CONFLICT (name) DO UPDATE SET brand = EXCLUDED.brand
            RETURNING id
            "#,
        )
        .bind(&row.product)
        .bind(&row.brand)
        .fetch_one(pool)
        .await?
        .get("id");

        let result = sqlx::query(
            r#"
            INSERT INTO sales_report.sale_items
            (document_number, customer_id, product_id, sold_at,
             item_value, returned_value, tax_refund, tax_refund_reversal,
             quantity, returned_quantity, company_id, segment_id, operation_code)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            ON CONFLICT (document_number, product_id) DO NOTHING
            "#,
        )
        .bind(row.document_number)
        .bind(row.customer_id)
        .bind(product_id)
        .bind(row.sold_at)
        .bind(row.item_value)
        .bind(row.returned_value)
        .bind(row.tax_refund.unwrap_or(0.0))
        .bind(row.tax_refund_reversal.unwrap_or(0.0))
        .bind(row.quantity)
        .bind(row.returned_quantity)
        .bind(COMPANY_ID)
        .bind(SEGMENT_ID)
        .bind(row.operation_code)
        .execute(pool)
        .await?;

        if result.rows_affected() > 0 {
            inserted += 1;
        }
    }

    Ok(inserted)
}
