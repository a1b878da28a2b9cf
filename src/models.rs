use serde::{Deserialize, Serialize};

/// Brand label used when a product has no brand assigned, matching the
/// label stored upstream in the ERP exports.
pub const NO_BRAND: &str = "* SEM MARCA *";

/// One row of the detailed rollup: sales aggregated by (brand, month).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaleRecord {
    pub brand: String,
    /// Calendar month in "YYYY-MM" form.
    pub month: String,
    pub order_count: i64,
    pub customer_count: i64,
    /// Net revenue after returns and tax-substitution adjustments.
    /// May be negative when returns exceed sales.
    pub net_value: f64,
    pub net_quantity: i64,
}

/// One row of the monthly KPI rollup (no brand dimension).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonthlyKpi {
    pub month: String,
    pub order_count: i64,
    pub customer_count: i64,
    pub net_value: f64,
    /// Net value per distinct customer; `None` when the month had no
    /// distinct customers.
    pub average_ticket: Option<f64>,
}

/// Net value re-aggregated by (month, brand), the input to the
/// top/bottom brand rankings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BrandTotal {
    pub month: String,
    pub brand: String,
    pub net_value: f64,
}

/// MonthlyKpi extended with month-over-month percentage changes.
/// A change is `None` for the first month of the series or when the
/// previous month's value was zero.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KpiGrowth {
    pub month: String,
    pub order_count: i64,
    pub customer_count: i64,
    pub net_value: f64,
    pub average_ticket: Option<f64>,
    pub net_value_change: Option<f64>,
    pub customer_change: Option<f64>,
}

/// Whole-window totals shown at the top of the report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportTotals {
    pub orders: i64,
    pub customers: i64,
    pub net_value: f64,
    pub mean_ticket: Option<f64>,
}
