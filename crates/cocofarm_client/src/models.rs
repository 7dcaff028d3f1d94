//! Wire types for the CocoFarm backend.
//!
//! All dates travel as ISO-8601 `YYYY-MM-DD` strings. Identifiers are
//! decoded tolerantly because the backend returns them as strings on some
//! endpoints and as numbers on others.

use schemars::JsonSchema;
use serde::{Deserialize, Deserializer, Serialize};

use crate::FarmError;

fn deserialize_opt_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;
    let value: Option<serde_json::Value> = Option::deserialize(deserializer)?;
    match value {
        None => Ok(None),
        Some(serde_json::Value::String(s)) => Ok(Some(s)),
        Some(serde_json::Value::Number(n)) => Ok(n.to_string().into()),
        Some(other) => Err(D::Error::custom(format!(
            "expected string or number, got {other}"
        ))),
    }
}

#[derive(Clone, Copy, Debug, Deserialize, Serialize, PartialEq, Eq, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum DeviceType {
    SoilSensor,
    WeatherStation,
    IrrigationController,
    #[serde(other)]
    Unknown,
}

#[derive(Clone, Copy, Debug, Deserialize, Serialize, PartialEq, Eq, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum DeviceStatus {
    Active,
    Inactive,
    Maintenance,
    #[serde(other)]
    Unknown,
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, JsonSchema)]
pub struct AlertThresholds {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub moisture: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub humidity: Option<f64>,
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, JsonSchema)]
pub struct DeviceSettings {
    /// Seconds between sensor reads.
    pub reading_interval: u32,
    /// Seconds between uploads to the backend.
    pub reporting_interval: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thresholds: Option<AlertThresholds>,
}

/// Soil moisture at the three probe depths, plus when it was taken.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, JsonSchema)]
pub struct MoistureReading {
    pub moisture_10cm: f64,
    pub moisture_30cm: f64,
    pub moisture_60cm: f64,
    pub recorded_at: String,
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, JsonSchema)]
pub struct Device {
    #[serde(default, deserialize_with = "deserialize_opt_string")]
    pub id: Option<String>,
    #[serde(rename = "type")]
    pub device_type: DeviceType,
    pub status: DeviceStatus,
    pub settings: DeviceSettings,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_reading: Option<MoistureReading>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub battery_level: Option<f64>,
    /// Back-reference to the location the device is assigned to, if any.
    #[serde(
        default,
        deserialize_with = "deserialize_opt_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub location_id: Option<String>,
}

impl Device {
    pub fn validate(&self) -> Result<(), FarmError> {
        if self.settings.reading_interval == 0 || self.settings.reporting_interval == 0 {
            return Err(FarmError::InvalidInput(
                "device intervals must be positive".into(),
            ));
        }
        if let Some(level) = self.battery_level
            && !(0.0..=100.0).contains(&level)
        {
            return Err(FarmError::InvalidInput(format!(
                "battery level out of range: {level}"
            )));
        }
        Ok(())
    }
}

/// The five soil categories the ML service was trained on. Anything else
/// decodes as `Unknown` and maps to the Sandy Loam code.
#[derive(Clone, Copy, Debug, Deserialize, Serialize, PartialEq, Eq, JsonSchema)]
pub enum SoilType {
    Lateritic,
    #[serde(rename = "Sandy Loam")]
    SandyLoam,
    #[serde(rename = "Cinnamon Sand")]
    CinnamonSand,
    #[serde(rename = "Red Yellow Podzolic")]
    RedYellowPodzolic,
    Alluvial,
    #[serde(other)]
    Unknown,
}

impl SoilType {
    /// Numeric code the prediction service expects.
    pub fn code(self) -> u8 {
        match self {
            SoilType::Lateritic => 1,
            SoilType::SandyLoam => 2,
            SoilType::CinnamonSand => 3,
            SoilType::RedYellowPodzolic => 4,
            SoilType::Alluvial => 5,
            SoilType::Unknown => 2,
        }
    }
}

#[derive(Clone, Copy, Debug, Deserialize, Serialize, PartialEq, Eq, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum AreaUnit {
    Hectares,
    Acres,
}

#[derive(Clone, Copy, Debug, Default, Deserialize, Serialize, PartialEq, Eq, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum LocationStatus {
    #[default]
    Active,
    Inactive,
    #[serde(other)]
    Unknown,
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, JsonSchema)]
pub struct Location {
    #[serde(default, deserialize_with = "deserialize_opt_string")]
    pub id: Option<String>,
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub area: f64,
    pub area_unit: AreaUnit,
    pub soil_type: SoilType,
    pub total_trees: u32,
    /// `YYYY-MM-DD`.
    pub plantation_date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(
        default,
        deserialize_with = "deserialize_opt_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub device_id: Option<String>,
    #[serde(default)]
    pub status: LocationStatus,
}

impl Location {
    pub fn validate(&self) -> Result<(), FarmError> {
        if self.name.trim().is_empty() {
            return Err(FarmError::InvalidInput("location name is empty".into()));
        }
        if !(-90.0..=90.0).contains(&self.latitude) {
            return Err(FarmError::InvalidInput(format!(
                "latitude out of range: {}",
                self.latitude
            )));
        }
        if !(-180.0..=180.0).contains(&self.longitude) {
            return Err(FarmError::InvalidInput(format!(
                "longitude out of range: {}",
                self.longitude
            )));
        }
        if self.area <= 0.0 {
            return Err(FarmError::InvalidInput(format!(
                "area must be positive, got {}",
                self.area
            )));
        }
        if self.total_trees == 0 {
            return Err(FarmError::InvalidInput(
                "total tree count must be positive".into(),
            ));
        }
        if crate::utils::parse_iso_date(&self.plantation_date).is_none() {
            return Err(FarmError::InvalidInput(format!(
                "invalid plantation date: {}",
                self.plantation_date
            )));
        }
        Ok(())
    }
}

#[derive(Clone, Copy, Debug, Deserialize, Serialize, PartialEq, Eq, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum WateringStatus {
    Pending,
    InProgress,
    Completed,
    Skipped,
    Cancelled,
    #[serde(other)]
    Unknown,
}

/// Historical schedule record; read-only input to the watering statistics.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, JsonSchema)]
pub struct WateringSchedule {
    #[serde(default, deserialize_with = "deserialize_opt_string")]
    pub id: Option<String>,
    pub location_id: String,
    /// Date or datetime; statistics group by the calendar day.
    pub date: String,
    pub recommended_amount: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actual_amount: Option<f64>,
    pub status: WateringStatus,
}

/// One month of model inputs inside a yield prediction request.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, JsonSchema)]
pub struct MonthlyYieldInput {
    pub month: u8,
    pub soil_moisture_10cm: f64,
    pub soil_moisture_30cm: f64,
    pub soil_moisture_60cm: f64,
    pub plant_age: u32,
    #[serde(rename = "soil_type")]
    pub soil_type_code: u8,
    pub temperature: f64,
    pub humidity: f64,
    pub rainfall: f64,
    pub weather_description: String,
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, JsonSchema)]
pub struct YieldPredictionRequest {
    pub year: i32,
    pub location_id: String,
    pub monthly_data: Vec<MonthlyYieldInput>,
}

impl YieldPredictionRequest {
    /// Every record must carry a calendar month.
    pub fn validate(&self) -> Result<(), FarmError> {
        if self.monthly_data.is_empty() {
            return Err(FarmError::InvalidInput(
                "yield prediction request has no monthly data".into(),
            ));
        }
        for record in &self.monthly_data {
            if !(1..=12).contains(&record.month) {
                return Err(FarmError::InvalidInput(format!(
                    "invalid month: {}",
                    record.month
                )));
            }
        }
        Ok(())
    }

    /// Full validation against the owning location's soil type.
    pub fn validate_for(&self, soil_type: SoilType) -> Result<(), FarmError> {
        self.validate()?;
        for record in &self.monthly_data {
            if record.soil_type_code != soil_type.code() {
                return Err(FarmError::InvalidInput(format!(
                    "soil code {} does not match location soil type {:?}",
                    record.soil_type_code, soil_type
                )));
            }
        }
        Ok(())
    }
}

/// One month of model output inside a stored prediction.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, JsonSchema)]
pub struct MonthlyPrediction {
    pub month: u8,
    pub ensemble_prediction: f64,
    pub seasonal_prediction: f64,
    pub seasonal_factor: f64,
    /// 0-100.
    pub confidence_score: f64,
    pub input_data: MonthlyYieldInput,
}

/// A persisted prediction result. Immutable once created; the only later
/// addition is the user-supplied actual yield used for accuracy comparison.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, JsonSchema)]
pub struct YieldPredictionHistory {
    #[serde(default, deserialize_with = "deserialize_opt_string")]
    pub id: Option<String>,
    pub year: i32,
    pub location_id: String,
    #[serde(
        default,
        deserialize_with = "deserialize_opt_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub user_id: Option<String>,
    pub average_prediction: f64,
    #[serde(default)]
    pub monthly_predictions: Vec<MonthlyPrediction>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actual_yield: Option<f64>,
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, JsonSchema)]
pub struct ActualYield {
    #[serde(default, deserialize_with = "deserialize_opt_string")]
    pub id: Option<String>,
    pub prediction_id: String,
    pub year: i32,
    pub month: u8,
    pub actual_yield: f64,
}

/// Historical prices keyed by how many months before the prediction date
/// they refer to.
#[derive(Clone, Copy, Debug, Default, Deserialize, Serialize, PartialEq, JsonSchema)]
pub struct PreviousPrices {
    #[serde(rename = "1", default)]
    pub lag_1: f64,
    #[serde(rename = "3", default)]
    pub lag_3: f64,
    #[serde(rename = "6", default)]
    pub lag_6: f64,
    #[serde(rename = "12", default)]
    pub lag_12: f64,
}

impl PreviousPrices {
    pub fn any_recorded(&self) -> bool {
        [self.lag_1, self.lag_3, self.lag_6, self.lag_12]
            .iter()
            .any(|v| *v > 0.0)
    }
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, JsonSchema)]
pub struct PricePredictionRequest {
    /// Total yield in millions of nuts.
    pub yield_nuts: f64,
    pub export_volume: f64,
    pub domestic_consumption: f64,
    /// Percent.
    pub inflation_rate: f64,
    /// `YYYY-MM-DD`.
    pub prediction_date: String,
    /// Omitted from the wire entirely when no lag has a recorded price.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previous_prices: Option<PreviousPrices>,
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, JsonSchema)]
pub struct PricePrediction {
    pub predicted_price: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prediction_date: Option<String>,
}
