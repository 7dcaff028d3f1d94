//! HTTP client implementation for the CocoFarm backend.
//!
//! This module provides a reqwest-based implementation of the [`FarmClient`](crate::FarmClient) trait.

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};

use crate::envelope::decode_payload;
use crate::models::{
    ActualYield, Device, Location, MoistureReading, PricePrediction, PricePredictionRequest,
    WateringSchedule, YieldPredictionHistory, YieldPredictionRequest,
};
use crate::observability::{API_FAILURES, API_REQUESTS};
use crate::requests::validate_price_request;
use crate::{FarmClient, FarmError};

/// Client for the CocoFarm backend using reqwest.
#[derive(Clone, Debug)]
pub struct ReqwestFarmClient {
    base_url: String,
    api_token: SecretString,
    client: reqwest::Client,
}

impl ReqwestFarmClient {
    /// Create a new client instance.
    ///
    /// # Arguments
    /// * `base_url` - The base URL of the CocoFarm backend (e.g., "https://api.cocofarm.io")
    /// * `api_token` - The bearer token identifying the user
    pub fn new(base_url: &str, api_token: SecretString) -> Self {
        let client = reqwest::Client::builder()
            .build()
            .expect("reqwest client build should not fail");
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_token,
            client,
        }
    }

    /// Build an authenticated GET request.
    fn get_request(&self, url: &str) -> reqwest::RequestBuilder {
        self.client
            .get(url)
            .bearer_auth(self.api_token.expose_secret())
    }

    /// Build an authenticated POST request.
    fn post_request(&self, url: &str) -> reqwest::RequestBuilder {
        self.client
            .post(url)
            .bearer_auth(self.api_token.expose_secret())
    }

    /// Build an authenticated PUT request.
    fn put_request(&self, url: &str) -> reqwest::RequestBuilder {
        self.client
            .put(url)
            .bearer_auth(self.api_token.expose_secret())
    }

    /// Build an authenticated DELETE request.
    fn delete_request(&self, url: &str) -> reqwest::RequestBuilder {
        self.client
            .delete(url)
            .bearer_auth(self.api_token.expose_secret())
    }

    /// Execute a request and decode the enveloped JSON response.
    async fn execute_json<T: serde::de::DeserializeOwned>(
        &self,
        endpoint: &'static str,
        request: reqwest::RequestBuilder,
    ) -> Result<T, FarmError> {
        metrics::counter!(API_REQUESTS, "endpoint" => endpoint).increment(1);
        let resp = request.send().await?;
        if !resp.status().is_success() {
            metrics::counter!(API_FAILURES, "endpoint" => endpoint).increment(1);
            return Err(self.error_from_response(resp).await);
        }
        let body: serde_json::Value = resp.json().await?;
        decode_payload(body)
    }

    /// Execute a request with no expected response body.
    async fn execute_empty(
        &self,
        endpoint: &'static str,
        request: reqwest::RequestBuilder,
    ) -> Result<(), FarmError> {
        metrics::counter!(API_REQUESTS, "endpoint" => endpoint).increment(1);
        let resp = request.send().await?;
        if !resp.status().is_success() {
            metrics::counter!(API_FAILURES, "endpoint" => endpoint).increment(1);
            return Err(self.error_from_response(resp).await);
        }
        Ok(())
    }

    /// Extract error information from a failed response.
    async fn error_from_response(&self, resp: reqwest::Response) -> FarmError {
        let status = resp.status().as_u16();
        let body = resp.text().await.unwrap_or_default();
        let body_snippet: String = body.chars().take(256).collect();
        tracing::debug!(status, "backend returned error response");
        FarmError::from_status(status, body_snippet)
    }
}

#[async_trait]
impl FarmClient for ReqwestFarmClient {
    async fn register_device(&self, device: &Device) -> Result<Device, FarmError> {
        device.validate()?;
        let url = format!("{}/devices/register", self.base_url);
        self.execute_json("devices", self.post_request(&url).json(device))
            .await
    }

    async fn get_devices(&self) -> Result<Vec<Device>, FarmError> {
        let url = format!("{}/devices", self.base_url);
        self.execute_json("devices", self.get_request(&url)).await
    }

    async fn get_device(&self, device_id: &str) -> Result<Device, FarmError> {
        let url = format!("{}/devices/{}", self.base_url, device_id);
        self.execute_json("devices", self.get_request(&url)).await
    }

    async fn update_device(
        &self,
        device_id: &str,
        fields: &serde_json::Value,
    ) -> Result<Device, FarmError> {
        let url = format!("{}/devices/{}", self.base_url, device_id);
        self.execute_json("devices", self.put_request(&url).json(fields))
            .await
    }

    async fn delete_device(&self, device_id: &str) -> Result<(), FarmError> {
        let url = format!("{}/devices/{}", self.base_url, device_id);
        self.execute_empty("devices", self.delete_request(&url))
            .await
    }

    async fn submit_reading(
        &self,
        device_id: &str,
        reading: &MoistureReading,
    ) -> Result<Device, FarmError> {
        let url = format!("{}/devices/{}/readings", self.base_url, device_id);
        self.execute_json("devices", self.post_request(&url).json(reading))
            .await
    }

    async fn get_device_history(
        &self,
        device_id: &str,
        limit: Option<u32>,
    ) -> Result<serde_json::Value, FarmError> {
        let url = format!("{}/devices/{}/history", self.base_url, device_id);
        let mut pairs: Vec<(&str, String)> = Vec::new();
        if let Some(l) = limit {
            pairs.push(("limit", l.to_string()));
        }
        let qp: Vec<(&str, &str)> = pairs.iter().map(|(k, v)| (*k, v.as_str())).collect();
        self.execute_json("devices", self.get_request(&url).query(&qp))
            .await
    }

    async fn create_location(&self, location: &Location) -> Result<Location, FarmError> {
        location.validate()?;
        let url = format!("{}/locations", self.base_url);
        self.execute_json("locations", self.post_request(&url).json(location))
            .await
    }

    async fn get_locations(&self) -> Result<Vec<Location>, FarmError> {
        let url = format!("{}/locations", self.base_url);
        self.execute_json("locations", self.get_request(&url))
            .await
    }

    async fn get_location(&self, location_id: &str) -> Result<Location, FarmError> {
        let url = format!("{}/locations/{}", self.base_url, location_id);
        self.execute_json("locations", self.get_request(&url))
            .await
    }

    async fn update_location(
        &self,
        location_id: &str,
        fields: &serde_json::Value,
    ) -> Result<Location, FarmError> {
        let url = format!("{}/locations/{}", self.base_url, location_id);
        self.execute_json("locations", self.put_request(&url).json(fields))
            .await
    }

    async fn delete_location(&self, location_id: &str) -> Result<(), FarmError> {
        let url = format!("{}/locations/{}", self.base_url, location_id);
        self.execute_empty("locations", self.delete_request(&url))
            .await
    }

    async fn assign_device(
        &self,
        location_id: &str,
        device_id: &str,
    ) -> Result<Location, FarmError> {
        let url = format!("{}/locations/{}/assign-device", self.base_url, location_id);
        let body = serde_json::json!({ "deviceId": device_id });
        self.execute_json("locations", self.put_request(&url).json(&body))
            .await
    }

    async fn remove_device(&self, location_id: &str) -> Result<Location, FarmError> {
        let url = format!("{}/locations/{}/remove-device", self.base_url, location_id);
        self.execute_json("locations", self.put_request(&url))
            .await
    }

    async fn get_location_by_device(&self, device_id: &str) -> Result<Location, FarmError> {
        let url = format!("{}/locations/by-device/{}", self.base_url, device_id);
        self.execute_json("locations", self.get_request(&url))
            .await
    }

    async fn predict_yield(
        &self,
        request: &YieldPredictionRequest,
    ) -> Result<YieldPredictionHistory, FarmError> {
        request.validate()?;
        let url = format!("{}/yield/yield-prediction", self.base_url);
        self.execute_json("yield", self.post_request(&url).json(request))
            .await
    }

    async fn get_yield_predictions(&self) -> Result<Vec<YieldPredictionHistory>, FarmError> {
        let url = format!("{}/yield/user/yield-predictions", self.base_url);
        self.execute_json("yield", self.get_request(&url)).await
    }

    async fn delete_yield_prediction(&self, prediction_id: &str) -> Result<(), FarmError> {
        let url = format!("{}/yield/yield-prediction/{}", self.base_url, prediction_id);
        self.execute_empty("yield", self.delete_request(&url)).await
    }

    async fn record_actual_yield(&self, actual: &ActualYield) -> Result<ActualYield, FarmError> {
        if !(1..=12).contains(&actual.month) {
            return Err(FarmError::InvalidInput(format!(
                "invalid month: {}",
                actual.month
            )));
        }
        let url = format!("{}/actual-yield/actual-yield", self.base_url);
        self.execute_json("actual_yield", self.post_request(&url).json(actual))
            .await
    }

    async fn get_actual_yield(&self, prediction_id: &str) -> Result<ActualYield, FarmError> {
        let url = format!(
            "{}/actual-yield/actual-yield-byPrediction/{}",
            self.base_url, prediction_id
        );
        self.execute_json("actual_yield", self.get_request(&url))
            .await
    }

    async fn predict_price(
        &self,
        request: &PricePredictionRequest,
    ) -> Result<PricePrediction, FarmError> {
        validate_price_request(request)?;
        let url = format!("{}/price/price-prediction", self.base_url);
        self.execute_json("price", self.post_request(&url).json(request))
            .await
    }

    async fn get_watering_history(
        &self,
        location_id: &str,
        from: &str,
        to: &str,
    ) -> Result<Vec<WateringSchedule>, FarmError> {
        let from = crate::utils::normalize_date_str(from)
            .ok_or_else(|| FarmError::InvalidInput(format!("invalid range start: {from}")))?;
        let to = crate::utils::normalize_date_str(to)
            .ok_or_else(|| FarmError::InvalidInput(format!("invalid range end: {to}")))?;
        if from > to {
            return Err(FarmError::InvalidInput(format!(
                "range start {from} is after range end {to}"
            )));
        }
        let url = format!("{}/watering/schedules", self.base_url);
        let pairs = [
            ("locationId", location_id),
            ("from", from.as_str()),
            ("to", to.as_str()),
        ];
        self.execute_json("watering", self.get_request(&url).query(&pairs))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::ReqwestFarmClient;
    use secrecy::SecretString;

    #[tokio::test]
    async fn client_new_and_basic() {
        let client = ReqwestFarmClient::new("http://localhost/", SecretString::new("tok".into()));
        let _ = client;
    }
}
