use cocofarm_client::envelope::decode_payload;
use cocofarm_client::models::YieldPredictionHistory;
use criterion::{Criterion, criterion_group, criterion_main};

fn full_year_payload() -> serde_json::Value {
    let months: Vec<serde_json::Value> = (1..=12)
        .map(|m| {
            serde_json::json!({
                "month": m,
                "ensemble_prediction": 118.0 + m as f64,
                "seasonal_prediction": 116.0 + m as f64,
                "seasonal_factor": 1.02,
                "confidence_score": 88.5,
                "input_data": {
                    "month": m,
                    "soil_moisture_10cm": 40.0,
                    "soil_moisture_30cm": 45.0,
                    "soil_moisture_60cm": 50.0,
                    "plant_age": 7,
                    "soil_type": 1,
                    "temperature": 30.5,
                    "humidity": 81.0,
                    "rainfall": 140.0,
                    "weather_description": "light rain"
                }
            })
        })
        .collect();
    serde_json::json!({
        "status": "success",
        "data": {
            "id": 101,
            "year": 2026,
            "location_id": "loc1",
            "user_id": "u1",
            "average_prediction": 121.3,
            "monthly_predictions": months
        }
    })
}

fn bench_decode_prediction(c: &mut Criterion) {
    let payload = full_year_payload();
    c.bench_function("decode_prediction_envelope", |b| {
        b.iter(|| {
            let decoded: YieldPredictionHistory =
                decode_payload(payload.clone()).expect("decode");
            decoded
        })
    });
}

criterion_group!(benches, bench_decode_prediction);
criterion_main!(benches);
