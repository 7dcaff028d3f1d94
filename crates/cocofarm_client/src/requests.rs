//! Request assembly for the yield and price prediction endpoints.
//!
//! The builders derive every field the ML service expects from the location
//! record and a live weather snapshot, so screens submit a complete request
//! without re-deriving plant age, soil codes or the target year.

use chrono::{Datelike, NaiveDate, Utc};

use crate::FarmError;
use crate::models::{
    Location, MonthlyYieldInput, PreviousPrices, PricePredictionRequest, YieldPredictionRequest,
};
use crate::utils::parse_iso_date;

/// Soil-moisture values assumed at the three probe depths when no sensor
/// reading is available for the location.
#[derive(Clone, Copy, Debug)]
pub struct SoilMoistureDefaults {
    pub depth_10cm: f64,
    pub depth_30cm: f64,
    pub depth_60cm: f64,
}

impl Default for SoilMoistureDefaults {
    fn default() -> Self {
        Self {
            depth_10cm: 40.0,
            depth_30cm: 45.0,
            depth_60cm: 50.0,
        }
    }
}

/// Live weather for the target month. Missing numeric fields fall back to 0
/// and a missing description to the literal `"NaN"` the ML service expects;
/// these are defined fallbacks, not failures.
#[derive(Clone, Debug, Default)]
pub struct WeatherSnapshot {
    pub temperature: Option<f64>,
    pub humidity: Option<f64>,
    pub rainfall: Option<f64>,
    pub description: Option<String>,
}

/// Whole years since the plantation date, floored. Dates in the future
/// clamp to 0.
pub fn plant_age_years(plantation_date: &str, today: NaiveDate) -> Result<u32, FarmError> {
    let planted = parse_iso_date(plantation_date).ok_or_else(|| {
        FarmError::InvalidInput(format!("invalid plantation date: {plantation_date}"))
    })?;
    let days = (today - planted).num_days();
    Ok((days / 365).max(0) as u32)
}

/// Next occurrence of `month`: months already past this calendar year roll
/// over to the next one.
pub fn prediction_year(month: u8, today: NaiveDate) -> i32 {
    if u32::from(month) < today.month() {
        today.year() + 1
    } else {
        today.year()
    }
}

pub fn build_yield_request(
    location: &Location,
    month: u8,
    weather: &WeatherSnapshot,
    moisture: &SoilMoistureDefaults,
) -> Result<YieldPredictionRequest, FarmError> {
    build_yield_request_at(location, month, weather, moisture, Utc::now().date_naive())
}

/// Clock-injectable variant of [`build_yield_request`].
pub fn build_yield_request_at(
    location: &Location,
    month: u8,
    weather: &WeatherSnapshot,
    moisture: &SoilMoistureDefaults,
    today: NaiveDate,
) -> Result<YieldPredictionRequest, FarmError> {
    if !(1..=12).contains(&month) {
        return Err(FarmError::InvalidInput(format!("invalid month: {month}")));
    }
    let location_id = location
        .id
        .clone()
        .ok_or_else(|| FarmError::InvalidInput("location has no id".into()))?;
    let record = MonthlyYieldInput {
        month,
        soil_moisture_10cm: moisture.depth_10cm,
        soil_moisture_30cm: moisture.depth_30cm,
        soil_moisture_60cm: moisture.depth_60cm,
        plant_age: plant_age_years(&location.plantation_date, today)?,
        soil_type_code: location.soil_type.code(),
        temperature: weather.temperature.unwrap_or(0.0),
        humidity: weather.humidity.unwrap_or(0.0),
        rainfall: weather.rainfall.unwrap_or(0.0),
        weather_description: weather
            .description
            .clone()
            .unwrap_or_else(|| "NaN".to_string()),
    };
    let request = YieldPredictionRequest {
        year: prediction_year(month, today),
        location_id,
        monthly_data: vec![record],
    };
    request.validate_for(location.soil_type)?;
    Ok(request)
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Default export/domestic split for a yield value: one third exported, two
/// thirds consumed domestically, both rounded to one decimal. The split is a
/// form convenience; the two values stay independently editable afterwards.
pub fn split_yield_volumes(yield_nuts: f64) -> (f64, f64) {
    (round1(yield_nuts / 3.0), round1(yield_nuts * 2.0 / 3.0))
}

/// Slack allowed when checking the export/domestic identity; covers float
/// noise from one-decimal arithmetic, nothing more.
pub const VOLUME_TOLERANCE: f64 = 1e-6;

/// The identity `export + domestic == yield` must hold before a price
/// request leaves the client; a violation never reaches the network layer.
pub fn validate_price_request(request: &PricePredictionRequest) -> Result<(), FarmError> {
    let sum = request.export_volume + request.domestic_consumption;
    if (sum - request.yield_nuts).abs() > VOLUME_TOLERANCE {
        return Err(FarmError::InvalidInput(format!(
            "export volume ({}) plus domestic consumption ({}) must equal total yield ({})",
            request.export_volume, request.domestic_consumption, request.yield_nuts
        )));
    }
    if parse_iso_date(&request.prediction_date).is_none() {
        return Err(FarmError::InvalidInput(format!(
            "invalid prediction date: {}",
            request.prediction_date
        )));
    }
    Ok(())
}

/// Assemble a price request from a yield value using the default split.
/// Previous prices are attached only when at least one lag has a recorded
/// value; otherwise the field is omitted from the wire entirely.
pub fn build_price_request(
    yield_nuts: f64,
    inflation_rate: f64,
    prediction_date: &str,
    previous_prices: Option<PreviousPrices>,
) -> Result<PricePredictionRequest, FarmError> {
    let (export_volume, domestic_consumption) = split_yield_volumes(yield_nuts);
    let request = PricePredictionRequest {
        yield_nuts,
        export_volume,
        domestic_consumption,
        inflation_rate,
        prediction_date: prediction_date.to_string(),
        previous_prices: previous_prices.filter(PreviousPrices::any_recorded),
    };
    validate_price_request(&request)?;
    Ok(request)
}
