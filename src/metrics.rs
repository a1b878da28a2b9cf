use crate::models::{KpiGrowth, MonthlyKpi};

/// Month-over-month percentage changes over the KPI series, computed
/// independently for net value and customer count. The first month and
/// any month whose predecessor is zero get `None` instead of a value.
pub fn with_growth(kpis: &[MonthlyKpi]) -> Vec<KpiGrowth> {
    let mut sorted = kpis.to_vec();
    sorted.sort_by(|a, b| a.month.cmp(&b.month));

    let mut rows = Vec::with_capacity(sorted.len());
    for (i, kpi) in sorted.iter().enumerate() {
        let previous = if i == 0 { None } else { sorted.get(i - 1) };
        rows.push(KpiGrowth {
            month: kpi.month.clone(),
            order_count: kpi.order_count,
            customer_count: kpi.customer_count,
            net_value: kpi.net_value,
            average_ticket: kpi.average_ticket,
            net_value_change: previous.and_then(|p| pct_change(kpi.net_value, p.net_value)),
            customer_change: previous
                .and_then(|p| pct_change(kpi.customer_count as f64, p.customer_count as f64)),
        });
    }

    rows
}

pub fn pct_change(current: f64, previous: f64) -> Option<f64> {
    if previous == 0.0 {
        None
    } else {
        Some((current - previous) / previous * 100.0)
    }
}

pub fn average_ticket(net_value: f64, customer_count: i64) -> Option<f64> {
    if customer_count == 0 {
        None
    } else {
        Some(net_value / customer_count as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kpi(month: &str, customers: i64, net_value: f64) -> MonthlyKpi {
        MonthlyKpi {
            month: month.to_string(),
            order_count: 5,
            customer_count: customers,
            net_value,
            average_ticket: average_ticket(net_value, customers),
        }
    }

    #[test]
    fn first_month_has_no_change() {
        let rows = with_growth(&[kpi("2024-01", 3, 1000.0)]);
        assert!(rows[0].net_value_change.is_none());
        assert!(rows[0].customer_change.is_none());
    }

    #[test]
    fn ten_percent_growth_between_consecutive_months() {
        let rows = with_growth(&[kpi("2024-01", 10, 1000.0), kpi("2024-02", 10, 1100.0)]);
        let change = rows[1].net_value_change.unwrap();
        assert!((change - 10.0).abs() < 1e-9);
        assert_eq!(rows[1].customer_change, Some(0.0));
    }

    #[test]
    fn declines_come_out_negative() {
        let rows = with_growth(&[kpi("2024-01", 10, 1000.0), kpi("2024-02", 5, 800.0)]);
        assert!(rows[1].net_value_change.unwrap() < 0.0);
        assert_eq!(rows[1].customer_change, Some(-50.0));
    }

    #[test]
    fn zero_previous_value_leaves_change_undefined() {
        let rows = with_growth(&[kpi("2024-01", 0, 0.0), kpi("2024-02", 4, 400.0)]);
        assert!(rows[1].net_value_change.is_none());
        assert!(rows[1].customer_change.is_none());
        // The zero month itself still aggregates; only its ratio is undefined.
        assert!(rows[0].average_ticket.is_none());
        assert_eq!(rows[1].average_ticket, Some(100.0));
    }

    #[test]
    fn growth_sorts_months_before_differencing() {
        let rows = with_growth(&[kpi("2024-02", 10, 1100.0), kpi("2024-01", 10, 1000.0)]);
        assert_eq!(rows[0].month, "2024-01");
        assert!(rows[0].net_value_change.is_none());
        assert!((rows[1].net_value_change.unwrap() - 10.0).abs() < 1e-9);
    }

    #[test]
    fn ticket_is_net_value_over_customers() {
        assert_eq!(average_ticket(300.0, 3), Some(100.0));
        assert_eq!(average_ticket(300.0, 0), None);
        // Negative net value (returns exceeded sales) is not clamped.
        assert_eq!(average_ticket(-50.0, 2), Some(-25.0));
    }
}
