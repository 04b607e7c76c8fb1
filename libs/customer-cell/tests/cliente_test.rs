// libs/customer-cell/tests/cliente_test.rs

use serde_json::json;
use wiremock::matchers::{body_partial_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use customer_cell::models::{
    AddDireccionRequest, CreateResenaRequest, UpdatePerfilRequest,
};
use customer_cell::services::citas::ClienteCitaService;
use customer_cell::services::clients::ClienteAdminService;
use customer_cell::services::profile::ProfileService;
use shared_utils::test_utils::TestConfig;

struct TestSetup {
    mock_server: MockServer,
    profile: ProfileService,
    citas: ClienteCitaService,
    admin: ClienteAdminService,
}

impl TestSetup {
    async fn new() -> Self {
        let mock_server = MockServer::start().await;
        let config = TestConfig::with_base_url(&mock_server.uri()).to_app_config();

        Self {
            profile: ProfileService::new(&config),
            citas: ClienteCitaService::new(&config),
            admin: ClienteAdminService::new(&config),
            mock_server,
        }
    }
}

#[tokio::test]
async fn perfil_includes_saved_direcciones() {
    let setup = TestSetup::new().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/usuarios"))
        .respond_with(ResponseTemplate::new(200).set_body_json(vec![json!({
            "id": 12,
            "nombre_completo": "Ana Pérez",
            "email": "ana@example.com",
            "telefono": "3001234567"
        })]))
        .mount(&setup.mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/direcciones"))
        .respond_with(ResponseTemplate::new(200).set_body_json(vec![json!({
            "id": 3,
            "usuario_id": 12,
            "direccion_calle": "Calle 10 #4-32",
            "ciudad": "Medellín",
            "detalles": null
        })]))
        .mount(&setup.mock_server)
        .await;

    let perfil = setup.profile.get_perfil(12, "token").await.unwrap();

    assert_eq!(perfil.nombre_completo, "Ana Pérez");
    assert_eq!(perfil.direcciones.len(), 1);
    assert_eq!(perfil.direcciones[0].ciudad, "Medellín");
}

#[tokio::test]
async fn perfil_of_missing_usuario_is_not_found() {
    let setup = TestSetup::new().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/usuarios"))
        .respond_with(ResponseTemplate::new(200).set_body_json(Vec::<serde_json::Value>::new()))
        .mount(&setup.mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/direcciones"))
        .respond_with(ResponseTemplate::new(200).set_body_json(Vec::<serde_json::Value>::new()))
        .mount(&setup.mock_server)
        .await;

    let result = setup.profile.get_perfil(99, "token").await;
    assert!(result.is_err());
}

#[tokio::test]
async fn update_perfil_requires_at_least_one_field() {
    let setup = TestSetup::new().await;

    let result = setup
        .profile
        .update_perfil(
            12,
            UpdatePerfilRequest {
                nombre_completo: None,
                telefono: None,
            },
            "token",
        )
        .await;

    assert!(result.is_err());
}

#[tokio::test]
async fn update_perfil_patches_only_given_fields() {
    let setup = TestSetup::new().await;

    Mock::given(method("PATCH"))
        .and(path("/rest/v1/usuarios"))
        .and(query_param("id", "eq.12"))
        .and(body_partial_json(json!({ "telefono": "3009876543" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(vec![json!({ "id": 12 })]))
        .mount(&setup.mock_server)
        .await;

    setup
        .profile
        .update_perfil(
            12,
            UpdatePerfilRequest {
                nombre_completo: None,
                telefono: Some("3009876543".to_string()),
            },
            "token",
        )
        .await
        .unwrap();
}

#[tokio::test]
async fn add_direccion_requires_calle_and_ciudad() {
    let setup = TestSetup::new().await;

    let result = setup
        .profile
        .add_direccion(
            12,
            AddDireccionRequest {
                direccion_calle: "  ".to_string(),
                ciudad: "Medellín".to_string(),
                detalles: None,
            },
            "token",
        )
        .await;

    assert!(result.is_err());
}

#[tokio::test]
async fn mis_citas_carry_servicios_and_calificacion() {
    let setup = TestSetup::new().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/citas"))
        .respond_with(ResponseTemplate::new(200).set_body_json(vec![json!({
            "id": 57,
            "fecha_hora_cita": "2024-01-08T10:00:00Z",
            "precio_total": 80000.0,
            "estado": "completada",
            "direcciones": { "direccion_calle": "Calle 10 #4-32", "ciudad": "Medellín" },
            "resenas": [{ "calificacion": 5 }]
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

    let citas = setup.citas.get_mis_citas(12, "token").await.unwrap();

    assert_eq!(citas.len(), 1);
    assert_eq!(citas[0].servicios, vec!["Lavado Básico (Automóvil)"]);
    assert_eq!(citas[0].calificacion, Some(5));
}

#[tokio::test]
async fn cancelling_a_foreign_cita_is_not_found() {
    let setup = TestSetup::new().await;

    // Ownership and estado filters strip the row: nothing gets patched.
    Mock::given(method("PATCH"))
        .and(path("/rest/v1/citas"))
        .respond_with(ResponseTemplate::new(200).set_body_json(Vec::<serde_json::Value>::new()))
        .mount(&setup.mock_server)
        .await;

    let result = setup.citas.cancelar_cita(57, 99, "token").await;
    assert!(result.is_err());
}

#[tokio::test]
async fn cancelling_sets_estado_cancelada() {
    let setup = TestSetup::new().await;

    Mock::given(method("PATCH"))
        .and(path("/rest/v1/citas"))
        .and(body_partial_json(json!({ "estado": "cancelada" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(vec![json!({ "id": 57 })]))
        .mount(&setup.mock_server)
        .await;

    setup.citas.cancelar_cita(57, 12, "token").await.unwrap();
}

#[tokio::test]
async fn resena_requires_completed_cita() {
    let setup = TestSetup::new().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/citas"))
        .respond_with(ResponseTemplate::new(200).set_body_json(vec![json!({
            "id": 57,
            "estado": "confirmada"
        })]))
        .mount(&setup.mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/resenas"))
        .respond_with(ResponseTemplate::new(200).set_body_json(Vec::<serde_json::Value>::new()))
        .mount(&setup.mock_server)
        .await;

    let result = setup
        .citas
        .crear_resena(
            12,
            CreateResenaRequest {
                cita_id: 57,
                calificacion: 5,
                comentario: None,
            },
            "token",
        )
        .await;

    assert!(result.is_err());
}

#[tokio::test]
async fn second_resena_for_same_cita_is_rejected() {
    let setup = TestSetup::new().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/citas"))
        .respond_with(ResponseTemplate::new(200).set_body_json(vec![json!({
            "id": 57,
            "estado": "completada"
        })]))
        .mount(&setup.mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/resenas"))
        .respond_with(ResponseTemplate::new(200).set_body_json(vec![json!({ "id": 4 })]))
        .mount(&setup.mock_server)
        .await;

    let result = setup
        .citas
        .crear_resena(
            12,
            CreateResenaRequest {
                cita_id: 57,
                calificacion: 4,
                comentario: Some("Muy bueno".to_string()),
            },
            "token",
        )
        .await;

    assert!(result.is_err());
}

#[tokio::test]
async fn resena_is_stored_unapproved() {
    let setup = TestSetup::new().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/citas"))
        .respond_with(ResponseTemplate::new(200).set_body_json(vec![json!({
            "id": 57,
            "estado": "completada"
        })]))
        .mount(&setup.mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/resenas"))
        .respond_with(ResponseTemplate::new(200).set_body_json(Vec::<serde_json::Value>::new()))
        .mount(&setup.mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/rest/v1/resenas"))
        .and(body_partial_json(json!({ "esta_aprobada": false, "calificacion": 5 })))
        .respond_with(ResponseTemplate::new(201).set_body_json(vec![json!({ "id": 9 })]))
        .mount(&setup.mock_server)
        .await;

    setup
        .citas
        .crear_resena(
            12,
            CreateResenaRequest {
                cita_id: 57,
                calificacion: 5,
                comentario: None,
            },
            "token",
        )
        .await
        .unwrap();
}

#[tokio::test]
async fn resena_rating_must_be_one_to_five() {
    let setup = TestSetup::new().await;

    let result = setup
        .citas
        .crear_resena(
            12,
            CreateResenaRequest {
                cita_id: 57,
                calificacion: 6,
                comentario: None,
            },
            "token",
        )
        .await;

    assert!(result.is_err());
}

#[tokio::test]
async fn admin_listing_only_returns_clientes() {
    let setup = TestSetup::new().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/usuarios"))
        .and(query_param("rol", "eq.cliente"))
        .respond_with(ResponseTemplate::new(200).set_body_json(vec![json!({
            "id": 12,
            "nombre_completo": "Ana Pérez",
            "email": "ana@example.com",
            "telefono": null,
            "fecha_creacion": "2024-01-01T08:00:00Z"
        })]))
        .mount(&setup.mock_server)
        .await;

    let clientes = setup.admin.list_clientes("token").await.unwrap();

    assert_eq!(clientes.len(), 1);
    assert_eq!(clientes[0].email, "ana@example.com");
}

#[tokio::test]
async fn deleting_cliente_with_citas_is_a_conflict() {
    let setup = TestSetup::new().await;

    Mock::given(method("DELETE"))
        .and(path("/rest/v1/usuarios"))
        .respond_with(ResponseTemplate::new(409).set_body_string("foreign key violation"))
        .mount(&setup.mock_server)
        .await;

    let result = setup.admin.delete_cliente(12, "token").await;
    assert!(result.is_err());
}

#[tokio::test]
async fn deleting_missing_cliente_is_not_found() {
    let setup = TestSetup::new().await;

    Mock::given(method("DELETE"))
        .and(path("/rest/v1/usuarios"))
        .respond_with(ResponseTemplate::new(200).set_body_json(Vec::<serde_json::Value>::new()))
        .mount(&setup.mock_server)
        .await;

    let result = setup.admin.delete_cliente(99, "token").await;
    assert!(result.is_err());
}
