//! Analytics layer for the CocoFarm mobile client.
//!
//! Everything here sits between the API client and the presentation tier:
//! prediction-history aggregation, watering statistics, and the services
//! that keep a screen's copy of fetched data consistent with the backend.

pub mod domains;
pub mod error;
pub mod services;
pub mod types;

pub use error::{InsightsError, InsightsResult};
pub use services::{PredictionHistoryService, RequestSequencer, watering_overview};
pub use types::{
    AccuracyReport, ChartMetric, ChartPoint, DailyWateringStat, Direction, Trend, WateringSummary,
    YearComparison, YearOverYear, YearlyAverage,
};
