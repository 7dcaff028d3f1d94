use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Whether a prediction over- or under-shot the measured value.
#[derive(Clone, Copy, Debug, Serialize, PartialEq, Eq, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Overestimated,
    Underestimated,
    Exact,
}

#[derive(Clone, Debug, Serialize, PartialEq, JsonSchema)]
pub struct AccuracyReport {
    pub predicted: f64,
    pub actual: f64,
    /// Signed, in percent of the actual value.
    pub percent_difference: f64,
    /// `max(0, 100 - |percent_difference|)`.
    pub accuracy: f64,
    pub direction: Direction,
}

#[derive(Clone, Debug, Serialize, PartialEq, JsonSchema)]
#[serde(tag = "trend", rename_all = "snake_case")]
pub enum Trend {
    Increasing { percent_change: f64 },
    Decreasing { percent_change: f64 },
    Stable { percent_change: f64 },
    InsufficientData,
}

#[derive(Clone, Debug, Serialize, PartialEq, JsonSchema)]
pub struct YearlyAverage {
    pub year: i32,
    pub average_prediction: f64,
    pub prediction_id: Option<String>,
}

#[derive(Clone, Debug, Serialize, PartialEq, JsonSchema)]
pub struct YearOverYear {
    pub location_id: String,
    pub year: i32,
    pub previous_year: i32,
    pub current_average: f64,
    pub previous_average: f64,
    /// Signed; positive means the newer prediction is higher.
    pub percent_change: f64,
}

/// Either a computed delta against the previous year, or, when no previous
/// year exists, the full series for trend display. Absence of data is
/// surfaced, never interpolated.
#[derive(Clone, Debug, Serialize, PartialEq, JsonSchema)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum YearComparison {
    Delta(YearOverYear),
    Series { series: Vec<YearlyAverage> },
}

#[derive(Clone, Debug, Serialize, PartialEq, JsonSchema)]
pub struct DailyWateringStat {
    /// `YYYY-MM-DD`.
    pub date: String,
    pub total_water: f64,
    /// 0-100; 0 when no record qualifies.
    pub efficiency: f64,
    pub frequency: usize,
    /// Completed records with a recorded actual amount. An efficiency of 0
    /// alongside a zero count means "no data", not "bad watering".
    pub qualifying_records: usize,
}

#[derive(Clone, Debug, Serialize, PartialEq, JsonSchema)]
pub struct WateringSummary {
    pub total_water: f64,
    pub average_per_schedule: f64,
    pub completed_count: usize,
    pub average_efficiency: f64,
    pub schedule_count: usize,
}

#[derive(Clone, Copy, Debug, Deserialize, Serialize, PartialEq, Eq, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ChartMetric {
    WaterAmount,
    Efficiency,
    Frequency,
}

#[derive(Clone, Debug, Serialize, PartialEq, JsonSchema)]
pub struct ChartPoint {
    pub date: String,
    pub value: f64,
}
