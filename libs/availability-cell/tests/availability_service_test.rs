// libs/availability-cell/tests/availability_service_test.rs

use chrono::{TimeZone, Utc};
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use availability_cell::services::availability::AvailabilityService;
use availability_cell::services::blocks::BlockAdminService;
use availability_cell::models::CreateBlockedRangeRequest;
use shared_utils::test_utils::TestConfig;

struct TestSetup {
    mock_server: MockServer,
    service: AvailabilityService,
    blocks: BlockAdminService,
}

impl TestSetup {
    async fn new() -> Self {
        let mock_server = MockServer::start().await;
        let config = TestConfig::with_base_url(&mock_server.uri()).to_app_config();

        Self {
            service: AvailabilityService::new(&config),
            blocks: BlockAdminService::new(&config),
            mock_server,
        }
    }
}

#[tokio::test]
async fn slots_exclude_confirmed_citas_and_blocks() {
    let setup = TestSetup::new().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/citas"))
        .respond_with(ResponseTemplate::new(200).set_body_json(vec![
            json!({ "fecha_hora_cita": "2024-01-01T14:00:00Z" }),
        ]))
        .mount(&setup.mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/bloqueos_disponibilidad"))
        .respond_with(ResponseTemplate::new(200).set_body_json(vec![json!({
            "id": 7,
            "fecha_hora_inicio": "2024-01-01T12:00:00Z",
            "fecha_hora_fin": "2024-01-01T13:00:00Z",
            "motivo": "mantenimiento"
        })]))
        .mount(&setup.mock_server)
        .await;

    let now = Utc.with_ymd_and_hms(2024, 1, 1, 9, 0, 0).unwrap();
    let slots = setup.service.get_available_slots(now).await.unwrap();

    assert!(!slots.is_empty());
    assert!(!slots.contains(&Utc.with_ymd_and_hms(2024, 1, 1, 14, 0, 0).unwrap()));
    assert!(!slots.contains(&Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap()));
    assert!(slots.contains(&Utc.with_ymd_and_hms(2024, 1, 1, 10, 0, 0).unwrap()));
    assert!(slots.contains(&Utc.with_ymd_and_hms(2024, 1, 1, 16, 0, 0).unwrap()));
}

#[tokio::test]
async fn read_failure_propagates_without_partial_result() {
    let setup = TestSetup::new().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/citas"))
        .respond_with(ResponseTemplate::new(500).set_body_string("storage unavailable"))
        .mount(&setup.mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/bloqueos_disponibilidad"))
        .respond_with(ResponseTemplate::new(200).set_body_json(Vec::<serde_json::Value>::new()))
        .mount(&setup.mock_server)
        .await;

    let now = Utc.with_ymd_and_hms(2024, 1, 1, 9, 0, 0).unwrap();
    let result = setup.service.get_available_slots(now).await;

    assert!(result.is_err());
}

#[tokio::test]
async fn create_block_rejects_inverted_range() {
    let setup = TestSetup::new().await;

    let request = CreateBlockedRangeRequest {
        fecha_hora_inicio: Utc.with_ymd_and_hms(2024, 1, 2, 15, 0, 0).unwrap(),
        fecha_hora_fin: Utc.with_ymd_and_hms(2024, 1, 2, 12, 0, 0).unwrap(),
        motivo: None,
    };

    let result = setup.blocks.create_block(request, "token").await;
    assert!(result.is_err());
}

#[tokio::test]
async fn create_block_returns_stored_row() {
    let setup = TestSetup::new().await;

    Mock::given(method("POST"))
        .and(path("/rest/v1/bloqueos_disponibilidad"))
        .respond_with(ResponseTemplate::new(201).set_body_json(vec![json!({
            "id": 3,
            "fecha_hora_inicio": "2024-01-02T12:00:00Z",
            "fecha_hora_fin": "2024-01-02T15:00:00Z",
            "motivo": "evento privado"
        })]))
        .mount(&setup.mock_server)
        .await;

    let request = CreateBlockedRangeRequest {
        fecha_hora_inicio: Utc.with_ymd_and_hms(2024, 1, 2, 12, 0, 0).unwrap(),
        fecha_hora_fin: Utc.with_ymd_and_hms(2024, 1, 2, 15, 0, 0).unwrap(),
        motivo: Some("evento privado".to_string()),
    };

    let block = setup.blocks.create_block(request, "token").await.unwrap();
    assert_eq!(block.id, 3);
    assert_eq!(block.motivo.as_deref(), Some("evento privado"));
}

#[tokio::test]
async fn delete_missing_block_is_not_found() {
    let setup = TestSetup::new().await;

    Mock::given(method("DELETE"))
        .and(path("/rest/v1/bloqueos_disponibilidad"))
        .respond_with(ResponseTemplate::new(200).set_body_json(Vec::<serde_json::Value>::new()))
        .mount(&setup.mock_server)
        .await;

    let result = setup.blocks.delete_block(99, "token").await;
    assert!(result.is_err());
}
