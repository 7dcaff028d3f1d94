use cocofarm_insights::{ChartMetric, domains::watering_stats, watering_overview};
use secrecy::SecretString;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn overview_combines_daily_stats_and_range_summary() {
    let server = MockServer::start().await;
    let body = serde_json::json!({
        "status": "success",
        "data": [
            {"id": 1, "location_id": "loc1", "date": "2024-01-01",
             "recommended_amount": 10.0, "actual_amount": 8.0, "status": "completed"},
            {"id": 2, "location_id": "loc1", "date": "2024-01-01",
             "recommended_amount": 5.0, "status": "pending"},
            {"id": 3, "location_id": "loc1", "date": "2024-01-04T07:00:00",
             "recommended_amount": 10.0, "actual_amount": 11.0, "status": "completed"}
        ]
    });
    Mock::given(method("GET"))
        .and(path("/watering/schedules"))
        .and(query_param("locationId", "loc1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&server)
        .await;

    let client = cocofarm_client::http_client::ReqwestFarmClient::new(
        &server.uri(),
        SecretString::new("tok".into()),
    );
    let (daily, summary) = watering_overview(&client, "loc1", "2024-01-01", "2024-01-31")
        .await
        .expect("overview");

    assert_eq!(daily.len(), 2);
    assert_eq!(daily[0].date, "2024-01-01");
    assert_eq!(daily[0].total_water, 13.0);
    assert!((daily[0].efficiency - 80.0).abs() < 1e-9);
    assert_eq!(daily[1].date, "2024-01-04");
    assert!((daily[1].efficiency - 90.0).abs() < 1e-9);

    assert_eq!(summary.schedule_count, 3);
    assert_eq!(summary.completed_count, 2);
    assert_eq!(summary.total_water, 8.0 + 5.0 + 11.0);
    assert!((summary.average_efficiency - 85.0).abs() < 1e-9);

    let series = watering_stats::chart_series(&daily, ChartMetric::Efficiency);
    assert_eq!(series.len(), 2);
    assert_eq!(series[1].value, daily[1].efficiency);
}
