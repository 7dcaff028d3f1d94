use cocofarm_client::{FarmClient, config::Config, http_client::ReqwestFarmClient};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Example: expects COCOFARM_API_TOKEN in env
    let cfg = match Config::from_env() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("config error: {}", e);
            return Ok(());
        }
    };
    let client = ReqwestFarmClient::new(&cfg.base_url, cfg.api_token);
    let locations = client.get_locations().await?;
    for location in locations {
        println!(
            "{} ({} trees, {:?})",
            location.name, location.total_trees, location.soil_type
        );
    }
    Ok(())
}
