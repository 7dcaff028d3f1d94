//! Daily statistics over watering-schedule history.

use std::collections::BTreeMap;

use cocofarm_client::models::{WateringSchedule, WateringStatus};
use cocofarm_client::utils::normalize_date_str;

use crate::types::{ChartMetric, ChartPoint, DailyWateringStat, WateringSummary};

/// Chart series are capped to the most recent days to bound display size.
/// Summary totals are never windowed.
pub const CHART_WINDOW_DAYS: usize = 7;

/// Planned value substitutes for a missing actual.
fn water_amount(record: &WateringSchedule) -> f64 {
    record.actual_amount.unwrap_or(record.recommended_amount)
}

/// Per-record efficiency term, clamped to [0, 100]. Only completed records
/// with a recorded actual and a positive recommendation qualify.
fn efficiency_term(record: &WateringSchedule) -> Option<f64> {
    if record.status != WateringStatus::Completed {
        return None;
    }
    let actual = record.actual_amount?;
    if record.recommended_amount <= 0.0 {
        return None;
    }
    let term =
        100.0 - (actual - record.recommended_amount).abs() / record.recommended_amount * 100.0;
    Some(term.clamp(0.0, 100.0))
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}

/// Group schedule records by calendar day, oldest first. Time-of-day in the
/// record's date is ignored; records with unparseable dates are dropped.
pub fn group_daily(records: &[WateringSchedule]) -> Vec<DailyWateringStat> {
    let mut days: BTreeMap<String, Vec<&WateringSchedule>> = BTreeMap::new();
    for record in records {
        let Some(day) = normalize_date_str(&record.date) else {
            tracing::debug!(date = %record.date, "skipping record with unparseable date");
            continue;
        };
        days.entry(day).or_default().push(record);
    }

    days.into_iter()
        .map(|(date, day_records)| {
            let terms: Vec<f64> = day_records
                .iter()
                .filter_map(|r| efficiency_term(r))
                .collect();
            DailyWateringStat {
                date,
                total_water: day_records.iter().map(|r| water_amount(r)).sum(),
                efficiency: mean(&terms),
                frequency: day_records.len(),
                qualifying_records: terms.len(),
            }
        })
        .collect()
}

/// Totals over the entire filtered range, independent of any chart window.
pub fn summarize(records: &[WateringSchedule]) -> WateringSummary {
    let total_water: f64 = records.iter().map(water_amount).sum();
    let terms: Vec<f64> = records.iter().filter_map(efficiency_term).collect();
    WateringSummary {
        total_water,
        average_per_schedule: if records.is_empty() {
            0.0
        } else {
            total_water / records.len() as f64
        },
        completed_count: records
            .iter()
            .filter(|r| r.status == WateringStatus::Completed)
            .count(),
        average_efficiency: mean(&terms),
        schedule_count: records.len(),
    }
}

/// The last [`CHART_WINDOW_DAYS`] grouped points for the selected metric.
/// Older points drop out of the chart only, not out of the summary.
pub fn chart_series(daily: &[DailyWateringStat], metric: ChartMetric) -> Vec<ChartPoint> {
    let start = daily.len().saturating_sub(CHART_WINDOW_DAYS);
    daily[start..]
        .iter()
        .map(|day| ChartPoint {
            date: day.date.clone(),
            value: match metric {
                ChartMetric::WaterAmount => day.total_water,
                ChartMetric::Efficiency => day.efficiency,
                ChartMetric::Frequency => day.frequency as f64,
            },
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(
        date: &str,
        recommended: f64,
        actual: Option<f64>,
        status: WateringStatus,
    ) -> WateringSchedule {
        WateringSchedule {
            id: None,
            location_id: "loc1".into(),
            date: date.into(),
            recommended_amount: recommended,
            actual_amount: actual,
            status,
        }
    }

    #[test]
    fn daily_amount_falls_back_to_recommended() {
        let records = vec![
            record("2024-01-01", 10.0, Some(8.0), WateringStatus::Completed),
            record("2024-01-01", 5.0, None, WateringStatus::Pending),
        ];
        let daily = group_daily(&records);
        assert_eq!(daily.len(), 1);
        assert_eq!(daily[0].total_water, 13.0);
        assert_eq!(daily[0].frequency, 2);
        // Only the completed record with an actual qualifies:
        // 100 - |8-10|/10*100 = 80.
        assert_eq!(daily[0].qualifying_records, 1);
        assert!((daily[0].efficiency - 80.0).abs() < 1e-9);
    }

    #[test]
    fn days_without_qualifying_records_default_to_zero_efficiency() {
        let records = vec![
            record("2024-01-02", 5.0, None, WateringStatus::Pending),
            record("2024-01-02", 7.0, None, WateringStatus::Skipped),
        ];
        let daily = group_daily(&records);
        assert_eq!(daily[0].efficiency, 0.0);
        assert_eq!(daily[0].qualifying_records, 0);
        assert_eq!(daily[0].total_water, 12.0);
    }

    #[test]
    fn efficiency_terms_are_clamped_before_averaging() {
        // Actual of 25 against recommended 10 is 150% off; the term clamps
        // to 0 instead of dragging the average negative.
        let records = vec![
            record("2024-01-03", 10.0, Some(25.0), WateringStatus::Completed),
            record("2024-01-03", 10.0, Some(10.0), WateringStatus::Completed),
        ];
        let daily = group_daily(&records);
        assert!((daily[0].efficiency - 50.0).abs() < 1e-9);
    }

    #[test]
    fn grouping_ignores_time_of_day_and_sorts_ascending() {
        let records = vec![
            record("2024-01-02T06:00:00", 4.0, None, WateringStatus::Pending),
            record("2024-01-01T18:30:00", 3.0, None, WateringStatus::Pending),
            record("2024-01-01", 2.0, None, WateringStatus::Pending),
        ];
        let daily = group_daily(&records);
        assert_eq!(daily.len(), 2);
        assert_eq!(daily[0].date, "2024-01-01");
        assert_eq!(daily[0].total_water, 5.0);
        assert_eq!(daily[1].date, "2024-01-02");
    }

    #[test]
    fn chart_keeps_only_the_last_seven_days() {
        let records: Vec<WateringSchedule> = (1..=10)
            .map(|d| {
                record(
                    &format!("2024-01-{d:02}"),
                    d as f64,
                    None,
                    WateringStatus::Pending,
                )
            })
            .collect();
        let daily = group_daily(&records);
        assert_eq!(daily.len(), 10);

        let series = chart_series(&daily, ChartMetric::WaterAmount);
        assert_eq!(series.len(), 7);
        assert_eq!(series[0].date, "2024-01-04");
        assert_eq!(series[6].date, "2024-01-10");

        // The summary still covers all ten days.
        let summary = summarize(&records);
        assert_eq!(summary.schedule_count, 10);
        assert_eq!(summary.total_water, 55.0);
    }

    #[test]
    fn summary_covers_whole_range() {
        let records = vec![
            record("2024-01-01", 10.0, Some(8.0), WateringStatus::Completed),
            record("2024-01-01", 5.0, None, WateringStatus::Pending),
            record("2024-01-05", 10.0, Some(12.0), WateringStatus::Completed),
            record("2024-01-06", 6.0, None, WateringStatus::Cancelled),
        ];
        let summary = summarize(&records);
        assert_eq!(summary.schedule_count, 4);
        assert_eq!(summary.completed_count, 2);
        assert_eq!(summary.total_water, 8.0 + 5.0 + 12.0 + 6.0);
        assert!((summary.average_per_schedule - summary.total_water / 4.0).abs() < 1e-9);
        // Terms: 80 for (8 vs 10), 80 for (12 vs 10).
        assert!((summary.average_efficiency - 80.0).abs() < 1e-9);
    }

    #[test]
    fn empty_range_is_all_zeros() {
        let summary = summarize(&[]);
        assert_eq!(summary.total_water, 0.0);
        assert_eq!(summary.average_per_schedule, 0.0);
        assert_eq!(summary.average_efficiency, 0.0);
        assert!(group_daily(&[]).is_empty());
    }

    #[test]
    fn frequency_metric_counts_records() {
        let records = vec![
            record("2024-01-01", 1.0, None, WateringStatus::Pending),
            record("2024-01-01", 1.0, None, WateringStatus::Pending),
            record("2024-01-02", 1.0, None, WateringStatus::Pending),
        ];
        let daily = group_daily(&records);
        let series = chart_series(&daily, ChartMetric::Frequency);
        assert_eq!(series[0].value, 2.0);
        assert_eq!(series[1].value, 1.0);
    }
}
