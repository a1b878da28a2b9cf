use std::fmt::Write;

use chrono::NaiveDate;

use crate::models::{BrandTotal, KpiGrowth, ReportTotals};

pub fn money(value: f64) -> String {
    format!("R$ {:.2}", value)
}

pub fn opt_money(value: Option<f64>) -> String {
    value.map(money).unwrap_or_else(|| "—".to_string())
}

pub fn opt_pct(value: Option<f64>) -> String {
    value
        .map(|v| format!("{:.2}%", v))
        .unwrap_or_else(|| "—".to_string())
}

pub fn build_report(
    window_start: NaiveDate,
    totals: &ReportTotals,
    kpis: &[KpiGrowth],
    top: &[BrandTotal],
    bottom: &[BrandTotal],
) -> String {
    let mut output = String::new();

    let _ = writeln!(output, "# E-commerce Sales Report");
    let _ = writeln!(output, "Sales since {}", window_start);
    let _ = writeln!(output);

    let _ = writeln!(output, "## Window Totals");
    let _ = writeln!(output, "- Orders: {}", totals.orders);
    let _ = writeln!(output, "- Customers: {}", totals.customers);
    let _ = writeln!(output, "- Net value: {}", money(totals.net_value));
    let _ = writeln!(output, "- Mean ticket: {}", opt_money(totals.mean_ticket));
    let _ = writeln!(output);

    let _ = writeln!(output, "## Monthly KPIs");
    if kpis.is_empty() {
        let _ = writeln!(output, "No sales recorded in this window.");
    } else {
        let _ = writeln!(
            output,
            "| Month | Orders | Customers | Net value | Avg ticket | Net value Δ | Customers Δ |"
        );
        let _ = writeln!(output, "|---|---|---|---|---|---|---|");
        for kpi in kpis {
            let _ = writeln!(
                output,
                "| {} | {} | {} | {} | {} | {} | {} |",
                kpi.month,
                kpi.order_count,
                kpi.customer_count,
                money(kpi.net_value),
                opt_money(kpi.average_ticket),
                opt_pct(kpi.net_value_change),
                opt_pct(kpi.customer_change),
            );
        }
    }
    let _ = writeln!(output);

    let _ = writeln!(output, "## Top 3 Brands per Month");
    write_ranking(&mut output, top);
    let _ = writeln!(output);

    let _ = writeln!(output, "## Bottom 3 Brands per Month");
    write_ranking(&mut output, bottom);

    output
}

fn write_ranking(output: &mut String, ranking: &[BrandTotal]) {
    if ranking.is_empty() {
        let _ = writeln!(output, "No brand sales in this window.");
        return;
    }

    let mut current_month = "";
    for total in ranking {
        if total.month != current_month {
            current_month = &total.month;
            let _ = writeln!(output, "### {}", total.month);
        }
        let _ = writeln!(output, "- {}: {}", total.brand, money(total.net_value));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{MonthlyKpi, ReportTotals};
    use crate::{metrics, rollup};

    fn kpi(month: &str, customers: i64, net_value: f64) -> MonthlyKpi {
        MonthlyKpi {
            month: month.to_string(),
            order_count: 4,
            customer_count: customers,
            net_value,
            average_ticket: metrics::average_ticket(net_value, customers),
        }
    }

    fn total(month: &str, brand: &str, net_value: f64) -> BrandTotal {
        BrandTotal {
            month: month.to_string(),
            brand: brand.to_string(),
            net_value,
        }
    }

    fn sample_report() -> String {
        let kpis = vec![kpi("2024-01", 10, 1000.0), kpi("2024-02", 0, 1100.0)];
        let totals = rollup::report_totals(&kpis);
        let growth = metrics::with_growth(&kpis);
        let top = vec![
            total("2024-01", "C", 200.0),
            total("2024-01", "A", 100.0),
            total("2024-01", "B", 50.0),
        ];
        let bottom = vec![
            total("2024-01", "B", 50.0),
            total("2024-01", "A", 100.0),
            total("2024-01", "C", 200.0),
        ];
        let start = NaiveDate::from_ymd_opt(2023, 7, 1).unwrap();
        build_report(start, &totals, &growth, &top, &bottom)
    }

    #[test]
    fn report_names_every_section() {
        let report = sample_report();
        assert!(report.contains("## Window Totals"));
        assert!(report.contains("## Monthly KPIs"));
        assert!(report.contains("## Top 3 Brands per Month"));
        assert!(report.contains("## Bottom 3 Brands per Month"));
    }

    #[test]
    fn growth_and_undefined_values_are_formatted() {
        let report = sample_report();
        assert!(report.contains("10.00%"));
        // Zero-customer month renders its ticket as a dash, and the first
        // month has no growth at all.
        assert!(report.contains("| 2024-02 | 4 | 0 | R$ 1100.00 | — | 10.00% | -100.00% |"));
        assert!(report.contains("| 2024-01 | 4 | 10 | R$ 1000.00 | R$ 100.00 | — | — |"));
    }

    #[test]
    fn rankings_keep_their_order_under_a_month_heading() {
        let report = sample_report();
        let top_at = report.find("## Top 3").unwrap();
        let bottom_at = report.find("## Bottom 3").unwrap();
        let top_section = &report[top_at..bottom_at];
        let c = top_section.find("- C:").unwrap();
        let a = top_section.find("- A:").unwrap();
        let b = top_section.find("- B:").unwrap();
        assert!(c < a && a < b);
        assert!(top_section.contains("### 2024-01"));
    }

    #[test]
    fn empty_tables_say_so() {
        let start = NaiveDate::from_ymd_opt(2023, 7, 1).unwrap();
        let totals = ReportTotals {
            orders: 0,
            customers: 0,
            net_value: 0.0,
            mean_ticket: None,
        };
        let report = build_report(start, &totals, &[], &[], &[]);
        assert!(report.contains("No sales recorded in this window."));
        assert!(report.contains("No brand sales in this window."));
    }
}
