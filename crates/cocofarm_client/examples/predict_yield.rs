use cocofarm_client::requests::{SoilMoistureDefaults, WeatherSnapshot, build_yield_request};
use cocofarm_client::{FarmClient, config::Config, http_client::ReqwestFarmClient};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut args = std::env::args().skip(1);
    let location_id = args.next().unwrap_or_else(|| "loc1".into());
    let month: u8 = args.next().and_then(|m| m.parse().ok()).unwrap_or(6);

    let cfg = match Config::from_env() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("config error: {}", e);
            return Ok(());
        }
    };
    let client = ReqwestFarmClient::new(&cfg.base_url, cfg.api_token);

    let location = client.get_location(&location_id).await?;
    let request = build_yield_request(
        &location,
        month,
        &WeatherSnapshot::default(),
        &SoilMoistureDefaults::default(),
    )?;
    let prediction = client.predict_yield(&request).await?;
    println!(
        "Predicted {} nuts on average for {} in {}",
        prediction.average_prediction, location.name, prediction.year
    );
    Ok(())
}
