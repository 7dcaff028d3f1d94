//! Minimal `FarmClient` trait and reqwest-based implementation for the
//! CocoFarm backend and its ML prediction endpoints.

use async_trait::async_trait;
use thiserror::Error;

pub mod config;
pub mod envelope;
pub mod http_client;
pub mod models;
pub mod observability;
pub mod requests;
pub mod retry;
pub mod utils;

pub use models::{
    ActualYield, Device, Location, PricePrediction, PricePredictionRequest, WateringSchedule,
    YieldPredictionHistory, YieldPredictionRequest,
};

#[derive(Debug, Error)]
pub enum FarmError {
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("configuration error: {0}")]
    Config(String),
    #[error("authentication rejected: {0}")]
    Auth(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("malformed response: {0}")]
    MalformedResponse(String),
    #[error("backend rejected request ({status}): {message}")]
    Api { status: u16, message: String },
}

impl FarmError {
    /// Map an HTTP status to the matching error variant.
    pub fn from_status(status: u16, message: String) -> Self {
        match status {
            404 => FarmError::NotFound(message),
            401 | 403 => FarmError::Auth(message),
            400 | 422 => FarmError::InvalidInput(message),
            _ => FarmError::Api { status, message },
        }
    }

    /// Transport-class failures are the only ones worth retrying; everything
    /// else is deterministic and surfaces immediately.
    pub fn is_transport(&self) -> bool {
        matches!(self, FarmError::Http(_))
    }
}

#[async_trait]
pub trait FarmClient: Send + Sync + 'static {
    // === Devices ===

    async fn register_device(&self, device: &Device) -> Result<Device, FarmError>;
    async fn get_devices(&self) -> Result<Vec<Device>, FarmError>;
    async fn get_device(&self, device_id: &str) -> Result<Device, FarmError>;
    async fn update_device(
        &self,
        device_id: &str,
        fields: &serde_json::Value,
    ) -> Result<Device, FarmError>;
    async fn delete_device(&self, device_id: &str) -> Result<(), FarmError>;

    /// Ingest a sensor reading for a device; returns the updated device.
    async fn submit_reading(
        &self,
        device_id: &str,
        reading: &models::MoistureReading,
    ) -> Result<Device, FarmError>;

    async fn get_device_history(
        &self,
        device_id: &str,
        limit: Option<u32>,
    ) -> Result<serde_json::Value, FarmError>;

    // === Locations ===

    async fn create_location(&self, location: &Location) -> Result<Location, FarmError>;
    async fn get_locations(&self) -> Result<Vec<Location>, FarmError>;
    async fn get_location(&self, location_id: &str) -> Result<Location, FarmError>;
    async fn update_location(
        &self,
        location_id: &str,
        fields: &serde_json::Value,
    ) -> Result<Location, FarmError>;
    async fn delete_location(&self, location_id: &str) -> Result<(), FarmError>;

    /// Point a location at a device. The backend rejects the call when the
    /// device is already assigned elsewhere.
    async fn assign_device(
        &self,
        location_id: &str,
        device_id: &str,
    ) -> Result<Location, FarmError>;
    async fn remove_device(&self, location_id: &str) -> Result<Location, FarmError>;
    async fn get_location_by_device(&self, device_id: &str) -> Result<Location, FarmError>;

    // === Yield predictions ===

    async fn predict_yield(
        &self,
        request: &YieldPredictionRequest,
    ) -> Result<YieldPredictionHistory, FarmError>;
    async fn get_yield_predictions(&self) -> Result<Vec<YieldPredictionHistory>, FarmError>;
    async fn delete_yield_prediction(&self, prediction_id: &str) -> Result<(), FarmError>;

    // === Actual yield ===

    async fn record_actual_yield(&self, actual: &ActualYield) -> Result<ActualYield, FarmError>;
    async fn get_actual_yield(&self, prediction_id: &str) -> Result<ActualYield, FarmError>;

    // === Price prediction ===

    async fn predict_price(
        &self,
        request: &PricePredictionRequest,
    ) -> Result<PricePrediction, FarmError>;

    // === Watering history ===

    /// Read-only schedule history for a location within an ISO date range,
    /// the input to the watering statistics.
    async fn get_watering_history(
        &self,
        location_id: &str,
        from: &str,
        to: &str,
    ) -> Result<Vec<WateringSchedule>, FarmError>;
}
