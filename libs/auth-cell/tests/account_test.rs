// libs/auth-cell/tests/account_test.rs

use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use auth_cell::models::{LoginRequest, RegisterRequest};
use auth_cell::services::account::AccountService;
use auth_cell::services::password::hash_password;
use shared_utils::jwt::validate_token;
use shared_utils::test_utils::TestConfig;

struct TestSetup {
    mock_server: MockServer,
    service: AccountService,
    config: TestConfig,
}

impl TestSetup {
    async fn new() -> Self {
        let mock_server = MockServer::start().await;
        let config = TestConfig::with_base_url(&mock_server.uri());
        let service = AccountService::new(&config.to_app_config());

        Self {
            mock_server,
            service,
            config,
        }
    }
}

fn register_request() -> RegisterRequest {
    RegisterRequest {
        nombre_completo: "Ana Pérez".to_string(),
        email: "ana@example.com".to_string(),
        telefono: Some("3001234567".to_string()),
        contrasena: "espuma-y-cera-42".to_string(),
    }
}

#[tokio::test]
async fn register_creates_cliente_account() {
    let setup = TestSetup::new().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/usuarios"))
        .respond_with(ResponseTemplate::new(200).set_body_json(Vec::<serde_json::Value>::new()))
        .mount(&setup.mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/rest/v1/usuarios"))
        .respond_with(ResponseTemplate::new(201).set_body_json(vec![json!({ "id": 12 })]))
        .mount(&setup.mock_server)
        .await;

    let id = setup.service.register(register_request()).await.unwrap();
    assert_eq!(id, 12);
}

#[tokio::test]
async fn register_rejects_taken_email() {
    let setup = TestSetup::new().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/usuarios"))
        .respond_with(ResponseTemplate::new(200).set_body_json(vec![json!({ "id": 1 })]))
        .mount(&setup.mock_server)
        .await;

    let result = setup.service.register(register_request()).await;
    assert!(result.is_err());
}

#[tokio::test]
async fn register_rejects_empty_credentials() {
    let setup = TestSetup::new().await;

    let mut request = register_request();
    request.contrasena = String::new();

    let result = setup.service.register(request).await;
    assert!(result.is_err());
}

#[tokio::test]
async fn login_issues_validatable_token() {
    let setup = TestSetup::new().await;
    let hash = hash_password("espuma-y-cera-42").unwrap();

    Mock::given(method("GET"))
        .and(path("/rest/v1/usuarios"))
        .respond_with(ResponseTemplate::new(200).set_body_json(vec![json!({
            "id": 12,
            "contrasena_hash": hash,
            "rol": "cliente"
        })]))
        .mount(&setup.mock_server)
        .await;

    let response = setup
        .service
        .login(LoginRequest {
            email: "ana@example.com".to_string(),
            contrasena: "espuma-y-cera-42".to_string(),
        })
        .await
        .unwrap();

    assert_eq!(response.rol, "cliente");

    let user = validate_token(&response.token, &setup.config.jwt_secret).unwrap();
    assert_eq!(user.id, "12");
    assert_eq!(user.rol, "cliente");
}

#[tokio::test]
async fn login_rejects_wrong_password() {
    let setup = TestSetup::new().await;
    let hash = hash_password("espuma-y-cera-42").unwrap();

    Mock::given(method("GET"))
        .and(path("/rest/v1/usuarios"))
        .respond_with(ResponseTemplate::new(200).set_body_json(vec![json!({
            "id": 12,
            "contrasena_hash": hash,
            "rol": "cliente"
        })]))
        .mount(&setup.mock_server)
        .await;

    let result = setup
        .service
        .login(LoginRequest {
            email: "ana@example.com".to_string(),
            contrasena: "otra-clave".to_string(),
        })
        .await;

    assert!(result.is_err());
}

#[tokio::test]
async fn login_rejects_unknown_email() {
    let setup = TestSetup::new().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/usuarios"))
        .respond_with(ResponseTemplate::new(200).set_body_json(Vec::<serde_json::Value>::new()))
        .mount(&setup.mock_server)
        .await;

    let result = setup
        .service
        .login(LoginRequest {
            email: "nadie@example.com".to_string(),
            contrasena: "x".to_string(),
        })
        .await;

    assert!(result.is_err());
}
