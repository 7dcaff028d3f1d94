//! Screen-facing services: shared prediction-history state with optimistic
//! deletion, and sequencing for overlapping refreshes.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::Mutex;

use cocofarm_client::FarmClient;
use cocofarm_client::models::{ActualYield, YieldPredictionHistory};
use cocofarm_client::observability::ROLLBACKS;
use cocofarm_client::retry::RetryPolicy;

use crate::domains::{prediction_history, watering_stats};
use crate::error::{InsightsError, InsightsResult};
use crate::types::{AccuracyReport, DailyWateringStat, Trend, WateringSummary, YearComparison};

/// Generation counter for overlapping in-flight fetches.
///
/// Each refresh takes a generation before calling out; a result is only
/// committed while its generation is still the newest, so a stale response
/// can never overwrite fresher data.
#[derive(Debug, Default)]
pub struct RequestSequencer {
    generation: AtomicU64,
}

impl RequestSequencer {
    pub fn begin(&self) -> u64 {
        self.generation.fetch_add(1, Ordering::SeqCst) + 1
    }

    pub fn is_current(&self, token: u64) -> bool {
        self.generation.load(Ordering::SeqCst) == token
    }
}

/// Holds the prediction-history screen's copy of fetched data and keeps it
/// consistent with the backend across deletes and refreshes.
#[derive(Clone)]
pub struct PredictionHistoryService {
    client: Arc<dyn FarmClient>,
    history: Arc<Mutex<Vec<YieldPredictionHistory>>>,
    sequencer: Arc<RequestSequencer>,
    retry: Arc<RetryPolicy>,
}

impl PredictionHistoryService {
    pub fn new(client: Arc<dyn FarmClient>) -> Self {
        Self {
            client,
            history: Arc::new(Mutex::new(Vec::new())),
            sequencer: Arc::new(RequestSequencer::default()),
            retry: Arc::new(RetryPolicy::default()),
        }
    }

    /// Fetch the user's predictions and replace local state. Returns `false`
    /// when a newer refresh superseded this one while it was in flight; the
    /// stale result is dropped.
    pub async fn refresh(&self) -> InsightsResult<bool> {
        let token = self.sequencer.begin();
        let client = self.client.clone();
        let fetched = self
            .retry
            .retry_transport(move || {
                let client = client.clone();
                async move { client.get_yield_predictions().await }
            })
            .await?;
        if !self.sequencer.is_current(token) {
            tracing::debug!("dropping stale prediction refresh");
            return Ok(false);
        }
        *self.history.lock().await = fetched;
        Ok(true)
    }

    pub async fn snapshot(&self) -> Vec<YieldPredictionHistory> {
        self.history.lock().await.clone()
    }

    /// Remove the prediction locally, then delete it on the backend. On
    /// failure the entry is restored at its original position and the error
    /// is surfaced; the list is never left inconsistent with the backend.
    pub async fn delete(&self, prediction_id: &str) -> InsightsResult<()> {
        let (index, removed) = {
            let mut history = self.history.lock().await;
            let index = history
                .iter()
                .position(|p| p.id.as_deref() == Some(prediction_id))
                .ok_or_else(|| {
                    InsightsError::NotFound(format!(
                        "prediction {prediction_id} is not in the local history"
                    ))
                })?;
            (index, history.remove(index))
        };

        if let Err(e) = self.client.delete_yield_prediction(prediction_id).await {
            let mut history = self.history.lock().await;
            let index = index.min(history.len());
            history.insert(index, removed);
            tracing::warn!(error = %e, prediction_id, "delete failed, restored prediction");
            metrics::counter!(ROLLBACKS).increment(1);
            return Err(e.into());
        }
        Ok(())
    }

    /// Year-over-year comparison against the locally held history.
    pub async fn compare(&self, location_id: &str, year: i32) -> InsightsResult<YearComparison> {
        let history = self.history.lock().await;
        prediction_history::compare_year_over_year(&history, location_id, year)
    }

    /// Long-run trend of the location's yearly averages.
    pub async fn trend(&self, location_id: &str) -> Trend {
        let history = self.history.lock().await;
        let series = prediction_history::yearly_series(&history, location_id);
        let values: Vec<f64> = series.iter().map(|e| e.average_prediction).collect();
        prediction_history::classify_trend(&values)
    }

    /// Record a measured yield for a prediction and report how close the
    /// prediction came. The prediction itself is never mutated.
    pub async fn attach_actual(&self, actual: &ActualYield) -> InsightsResult<AccuracyReport> {
        let predicted = self.predicted_average(&actual.prediction_id).await?;
        let recorded = self.client.record_actual_yield(actual).await?;
        prediction_history::accuracy_report(predicted, recorded.actual_yield)
    }

    /// Accuracy for a prediction whose actual yield was recorded earlier.
    pub async fn accuracy_for(&self, prediction_id: &str) -> InsightsResult<AccuracyReport> {
        let predicted = self.predicted_average(prediction_id).await?;
        let actual = self.client.get_actual_yield(prediction_id).await?;
        prediction_history::accuracy_report(predicted, actual.actual_yield)
    }

    async fn predicted_average(&self, prediction_id: &str) -> InsightsResult<f64> {
        let history = self.history.lock().await;
        history
            .iter()
            .find(|p| p.id.as_deref() == Some(prediction_id))
            .map(|p| p.average_prediction)
            .ok_or_else(|| {
                InsightsError::NotFound(format!(
                    "prediction {prediction_id} is not in the local history"
                ))
            })
    }
}

/// Fetch a location's watering history and compute the daily breakdown plus
/// the whole-range summary in one step.
pub async fn watering_overview(
    client: &dyn FarmClient,
    location_id: &str,
    from: &str,
    to: &str,
) -> InsightsResult<(Vec<DailyWateringStat>, WateringSummary)> {
    let records = client.get_watering_history(location_id, from, to).await?;
    Ok((
        watering_stats::group_daily(&records),
        watering_stats::summarize(&records),
    ))
}
