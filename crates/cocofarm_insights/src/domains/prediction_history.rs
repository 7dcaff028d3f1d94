//! Comparative analytics across a user's stored yield predictions.

use cocofarm_client::models::YieldPredictionHistory;

use crate::error::{InsightsError, InsightsResult};
use crate::types::{AccuracyReport, Direction, Trend, YearComparison, YearOverYear, YearlyAverage};

/// End-to-end changes below this magnitude count as stable.
const STABLE_BAND_PERCENT: f64 = 5.0;

/// All predictions for a location, year ascending.
pub fn yearly_series(
    history: &[YieldPredictionHistory],
    location_id: &str,
) -> Vec<YearlyAverage> {
    let mut series: Vec<YearlyAverage> = history
        .iter()
        .filter(|p| p.location_id == location_id)
        .map(|p| YearlyAverage {
            year: p.year,
            average_prediction: p.average_prediction,
            prediction_id: p.id.clone(),
        })
        .collect();
    series.sort_by_key(|entry| entry.year);
    series
}

/// Compare a location's prediction for `year` against the previous year.
///
/// With a usable previous year the percent change is returned; without one
/// the caller gets the full sorted series for trend display instead of a
/// fabricated delta. A zero previous-year average carries no baseline and is
/// treated like a missing year.
pub fn compare_year_over_year(
    history: &[YieldPredictionHistory],
    location_id: &str,
    year: i32,
) -> InsightsResult<YearComparison> {
    let current = history
        .iter()
        .find(|p| p.location_id == location_id && p.year == year)
        .ok_or_else(|| {
            InsightsError::NotFound(format!("no prediction for location {location_id} in {year}"))
        })?;
    let previous = history
        .iter()
        .find(|p| p.location_id == location_id && p.year == year - 1);

    match previous {
        Some(prev) if prev.average_prediction != 0.0 => {
            let percent_change = (current.average_prediction - prev.average_prediction)
                / prev.average_prediction
                * 100.0;
            Ok(YearComparison::Delta(YearOverYear {
                location_id: location_id.to_string(),
                year,
                previous_year: year - 1,
                current_average: current.average_prediction,
                previous_average: prev.average_prediction,
                percent_change,
            }))
        }
        _ => Ok(YearComparison::Series {
            series: yearly_series(history, location_id),
        }),
    }
}

/// Classify an ordered series of yield values by its first-to-last change.
pub fn classify_trend(values: &[f64]) -> Trend {
    if values.len() < 2 {
        return Trend::InsufficientData;
    }
    let first = values[0];
    let last = values[values.len() - 1];
    if first == 0.0 {
        // No baseline to divide by.
        return Trend::InsufficientData;
    }
    let percent_change = (last - first) / first * 100.0;
    if percent_change.abs() < STABLE_BAND_PERCENT {
        Trend::Stable { percent_change }
    } else if percent_change > 0.0 {
        Trend::Increasing { percent_change }
    } else {
        Trend::Decreasing { percent_change }
    }
}

/// How close a prediction came to the measured yield.
pub fn accuracy_report(predicted: f64, actual: f64) -> InsightsResult<AccuracyReport> {
    if actual == 0.0 {
        return Err(InsightsError::Validation(
            "actual yield must be non-zero for accuracy comparison".into(),
        ));
    }
    let percent_difference = (predicted - actual) / actual * 100.0;
    let accuracy = (100.0 - percent_difference.abs()).max(0.0);
    let direction = if percent_difference > 0.0 {
        Direction::Overestimated
    } else if percent_difference < 0.0 {
        Direction::Underestimated
    } else {
        Direction::Exact
    };
    Ok(AccuracyReport {
        predicted,
        actual,
        percent_difference,
        accuracy,
        direction,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn prediction(id: &str, location_id: &str, year: i32, avg: f64) -> YieldPredictionHistory {
        YieldPredictionHistory {
            id: Some(id.into()),
            year,
            location_id: location_id.into(),
            user_id: None,
            average_prediction: avg,
            monthly_predictions: vec![],
            actual_yield: None,
        }
    }

    #[test]
    fn year_over_year_computes_signed_delta() {
        let history = vec![
            prediction("p1", "loc1", 2023, 100.0),
            prediction("p2", "loc1", 2024, 120.0),
        ];
        let out = compare_year_over_year(&history, "loc1", 2024).unwrap();
        let YearComparison::Delta(delta) = out else {
            panic!("expected delta");
        };
        assert_eq!(delta.previous_year, 2023);
        assert!((delta.percent_change - 20.0).abs() < 1e-9);
    }

    #[test]
    fn missing_previous_year_falls_back_to_series() {
        let history = vec![
            prediction("p1", "loc1", 2022, 90.0),
            prediction("p2", "loc1", 2024, 120.0),
            prediction("p3", "loc2", 2023, 50.0),
        ];
        let out = compare_year_over_year(&history, "loc1", 2024).unwrap();
        let YearComparison::Series { series } = out else {
            panic!("expected series fallback");
        };
        // Only loc1, year ascending.
        assert_eq!(series.len(), 2);
        assert_eq!(series[0].year, 2022);
        assert_eq!(series[1].year, 2024);
    }

    #[test]
    fn zero_previous_average_falls_back_to_series() {
        let history = vec![
            prediction("p1", "loc1", 2023, 0.0),
            prediction("p2", "loc1", 2024, 120.0),
        ];
        let out = compare_year_over_year(&history, "loc1", 2024).unwrap();
        assert!(matches!(out, YearComparison::Series { .. }));
    }

    #[test]
    fn unknown_target_year_is_not_found() {
        let history = vec![prediction("p1", "loc1", 2023, 100.0)];
        let err = compare_year_over_year(&history, "loc1", 2025).unwrap_err();
        assert!(matches!(err, InsightsError::NotFound(_)));
    }

    #[test]
    fn trend_stable_within_five_percent() {
        let Trend::Stable { percent_change } = classify_trend(&[100.0, 101.0, 99.0]) else {
            panic!("expected stable");
        };
        assert!((percent_change + 1.0).abs() < 1e-9);
    }

    #[test]
    fn trend_decreasing_by_twenty_percent() {
        let Trend::Decreasing { percent_change } = classify_trend(&[100.0, 80.0]) else {
            panic!("expected decreasing");
        };
        assert!((percent_change + 20.0).abs() < 1e-9);
    }

    #[test]
    fn trend_single_point_is_insufficient() {
        assert_eq!(classify_trend(&[100.0]), Trend::InsufficientData);
        assert_eq!(classify_trend(&[]), Trend::InsufficientData);
        assert_eq!(classify_trend(&[0.0, 50.0]), Trend::InsufficientData);
    }

    #[test]
    fn accuracy_overestimate() {
        let report = accuracy_report(110.0, 100.0).unwrap();
        assert!((report.percent_difference - 10.0).abs() < 1e-9);
        assert!((report.accuracy - 90.0).abs() < 1e-9);
        assert_eq!(report.direction, Direction::Overestimated);
    }

    #[test]
    fn accuracy_clamps_to_zero() {
        // More than 100% off: score floors at 0, never negative.
        let report = accuracy_report(250.0, 100.0).unwrap();
        assert_eq!(report.accuracy, 0.0);
    }

    #[test]
    fn accuracy_underestimate_and_exact() {
        let report = accuracy_report(90.0, 100.0).unwrap();
        assert_eq!(report.direction, Direction::Underestimated);
        let report = accuracy_report(100.0, 100.0).unwrap();
        assert_eq!(report.direction, Direction::Exact);
        assert_eq!(report.accuracy, 100.0);
    }

    #[test]
    fn accuracy_requires_nonzero_actual() {
        assert!(matches!(
            accuracy_report(110.0, 0.0),
            Err(InsightsError::Validation(_))
        ));
    }
}
