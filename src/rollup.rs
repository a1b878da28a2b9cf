use std::collections::HashMap;

use crate::models::{BrandTotal, MonthlyKpi, ReportTotals, SaleRecord};

/// Re-aggregate the detailed rollup into net value by (month, brand).
/// Output keeps first-seen order so later rankings can tie-break by the
/// original row order.
pub fn brand_month_totals(records: &[SaleRecord]) -> Vec<BrandTotal> {
    let mut index: HashMap<(String, String), usize> = HashMap::new();
    let mut totals: Vec<BrandTotal> = Vec::new();

    for record in records {
        let key = (record.month.clone(), record.brand.clone());
        match index.get(&key) {
            Some(&i) => totals[i].net_value += record.net_value,
            None => {
                index.insert(key, totals.len());
                totals.push(BrandTotal {
                    month: record.month.clone(),
                    brand: record.brand.clone(),
                    net_value: record.net_value,
                });
            }
        }
    }

    totals
}

/// Highest-selling brands per month: up to `n` rows per month, net value
/// descending. Months with fewer than `n` brands return all of them.
pub fn top_brands(totals: &[BrandTotal], n: usize) -> Vec<BrandTotal> {
    rank_per_month(totals, n, true)
}

/// Lowest-selling brands per month, net value ascending.
pub fn bottom_brands(totals: &[BrandTotal], n: usize) -> Vec<BrandTotal> {
    rank_per_month(totals, n, false)
}

fn rank_per_month(totals: &[BrandTotal], n: usize, descending: bool) -> Vec<BrandTotal> {
    let mut months: Vec<&str> = Vec::new();
    for total in totals {
        if !months.contains(&total.month.as_str()) {
            months.push(&total.month);
        }
    }
    months.sort_unstable();

    let mut ranked = Vec::new();
    for month in months {
        let mut in_month: Vec<BrandTotal> = totals
            .iter()
            .filter(|t| t.month == month)
            .cloned()
            .collect();
        // Stable sort keeps the original relative order for equal values.
        in_month.sort_by(|a, b| {
            let ord = a
                .net_value
                .partial_cmp(&b.net_value)
                .unwrap_or(std::cmp::Ordering::Equal);
            if descending {
                ord.reverse()
            } else {
                ord
            }
        });
        ranked.extend(in_month.into_iter().take(n));
    }

    ranked
}

/// Whole-window totals for the report header. The mean ticket averages
/// only the months where the ticket is defined.
pub fn report_totals(kpis: &[MonthlyKpi]) -> ReportTotals {
    let tickets: Vec<f64> = kpis.iter().filter_map(|k| k.average_ticket).collect();
    ReportTotals {
        orders: kpis.iter().map(|k| k.order_count).sum(),
        customers: kpis.iter().map(|k| k.customer_count).sum(),
        net_value: kpis.iter().map(|k| k.net_value).sum(),
        mean_ticket: if tickets.is_empty() {
            None
        } else {
            Some(tickets.iter().sum::<f64>() / tickets.len() as f64)
        },
    }
}
