// libs/appointment-cell/tests/booking_test.rs

use chrono::{TimeZone, Utc};
use serde_json::json;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use appointment_cell::models::{
    CitaServicioItem, CreateCitaRequest, EstadoCita, UpdateEstadoRequest,
};
use appointment_cell::services::booking::CitaBookingService;
use shared_utils::test_utils::TestConfig;

struct TestSetup {
    mock_server: MockServer,
    service: CitaBookingService,
}

impl TestSetup {
    async fn new() -> Self {
        let mock_server = MockServer::start().await;
        let config = TestConfig::with_base_url(&mock_server.uri()).to_app_config();

        Self {
            service: CitaBookingService::new(&config),
            mock_server,
        }
    }
}

fn create_request() -> CreateCitaRequest {
    CreateCitaRequest {
        usuario_id: 12,
        direccion_id: 3,
        fecha_hora_cita: Utc.with_ymd_and_hms(2024, 1, 8, 10, 0, 0).unwrap(),
        precio_total: 80000.0,
        servicios: vec![
            CitaServicioItem {
                id: 100,
                cantidad: 1,
                precio: 35000.0,
            },
            CitaServicioItem {
                id: 101,
                cantidad: 1,
                precio: 45000.0,
            },
        ],
    }
}

#[tokio::test]
async fn create_cita_books_through_atomic_rpc() {
    let setup = TestSetup::new().await;

    Mock::given(method("POST"))
        .and(path("/rest/v1/rpc/crear_cita"))
        .and(body_partial_json(json!({ "p_usuario_id": 12 })))
        .respond_with(ResponseTemplate::new(200).set_body_json(57))
        .mount(&setup.mock_server)
        .await;

    let cita_id = setup
        .service
        .create_cita(create_request(), None)
        .await
        .unwrap();

    assert_eq!(cita_id, 57);
}

#[tokio::test]
async fn create_cita_requires_line_items() {
    let setup = TestSetup::new().await;

    let mut request = create_request();
    request.servicios.clear();

    let result = setup.service.create_cita(request, None).await;
    assert!(result.is_err());
}

#[tokio::test]
async fn admin_listing_joins_service_names() {
    let setup = TestSetup::new().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/citas"))
        .respond_with(ResponseTemplate::new(200).set_body_json(vec![json!({
            "id": 57,
            "fecha_hora_cita": "2024-01-08T10:00:00Z",
            "precio_total": 80000.0,
            "estado": "confirmada",
            "usuarios": { "nombre_completo": "Ana Pérez" },
            "direcciones": { "direccion_calle": "Calle 10 #4-32" }
        })]))
        .mount(&setup.mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/citas_servicios"))
        .respond_with(ResponseTemplate::new(200).set_body_json(vec![json!({
            "cita_id": 57,
            "opcion_variaciones": {
                "nombre": "Automóvil",
                "servicio_opciones": {
                    "servicios": { "nombre": "Lavado Básico" }
                }
            }
        })]))
        .mount(&setup.mock_server)
        .await;

    let citas = setup.service.list_all("token").await.unwrap();

    assert_eq!(citas.len(), 1);
    assert_eq!(citas[0].cliente_nombre, "Ana Pérez");
    assert_eq!(citas[0].servicios, vec!["Lavado Básico (Automóvil)"]);
    assert_eq!(citas[0].estado, EstadoCita::Confirmada);
}

#[tokio::test]
async fn get_cita_not_owned_is_not_found() {
    let setup = TestSetup::new().await;

    // Ownership filter is part of the query: nothing comes back.
    Mock::given(method("GET"))
        .and(path("/rest/v1/citas"))
        .respond_with(ResponseTemplate::new(200).set_body_json(Vec::<serde_json::Value>::new()))
        .mount(&setup.mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/citas_servicios"))
        .respond_with(ResponseTemplate::new(200).set_body_json(Vec::<serde_json::Value>::new()))
        .mount(&setup.mock_server)
        .await;

    let result = setup.service.get_cita(57, 99, "token").await;
    assert!(result.is_err());
}

#[tokio::test]
async fn estado_cannot_be_reset_to_pendiente() {
    let setup = TestSetup::new().await;

    let result = setup
        .service
        .update_estado(
            57,
            UpdateEstadoRequest {
                estado: EstadoCita::Pendiente,
            },
            "token",
        )
        .await;

    assert!(result.is_err());
}

#[tokio::test]
async fn update_estado_of_missing_cita_is_not_found() {
    let setup = TestSetup::new().await;

    Mock::given(method("PATCH"))
        .and(path("/rest/v1/citas"))
        .respond_with(ResponseTemplate::new(200).set_body_json(Vec::<serde_json::Value>::new()))
        .mount(&setup.mock_server)
        .await;

    let result = setup
        .service
        .update_estado(
            99,
            UpdateEstadoRequest {
                estado: EstadoCita::Confirmada,
            },
            "token",
        )
        .await;

    assert!(result.is_err());
}

#[tokio::test]
async fn update_estado_reports_new_estado() {
    let setup = TestSetup::new().await;

    Mock::given(method("PATCH"))
        .and(path("/rest/v1/citas"))
        .and(body_partial_json(json!({ "estado": "completada" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(vec![json!({ "id": 57 })]))
        .mount(&setup.mock_server)
        .await;

    let estado = setup
        .service
        .update_estado(
            57,
            UpdateEstadoRequest {
                estado: EstadoCita::Completada,
            },
            "token",
        )
        .await
        .unwrap();

    assert_eq!(estado, EstadoCita::Completada);
}
