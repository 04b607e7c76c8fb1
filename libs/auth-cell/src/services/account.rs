use anyhow::Result;
use chrono::Duration;
use reqwest::Method;
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, info};

use shared_config::AppConfig;
use shared_database::supabase::SupabaseClient;
use shared_utils::jwt::sign_token;

use crate::models::{AuthError, LoginRequest, LoginResponse, RegisterRequest};
use crate::services::password::{hash_password, verify_password};

const TOKEN_TTL_HOURS: i64 = 1;

#[derive(Debug, Deserialize)]
struct UsuarioRow {
    id: i64,
    contrasena_hash: String,
    rol: String,
}

#[derive(Debug, Deserialize)]
struct InsertedUsuario {
    id: i64,
}

pub struct AccountService {
    supabase: SupabaseClient,
    jwt_secret: String,
}

impl AccountService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            supabase: SupabaseClient::new(config),
            jwt_secret: config.jwt_secret.clone(),
        }
    }

    /// Register a new customer account. New accounts always get the
    /// `cliente` role; admins are provisioned out of band.
    pub async fn register(&self, request: RegisterRequest) -> Result<i64> {
        if request.email.is_empty() || request.contrasena.is_empty() {
            return Err(AuthError::ValidationError(
                "email and password are required".to_string(),
            )
            .into());
        }

        debug!("Registering account for {}", request.email);

        let existing: Vec<InsertedUsuario> = self
            .supabase
            .request(
                Method::GET,
                &format!("/rest/v1/usuarios?select=id&email=eq.{}", request.email),
                None,
                None,
            )
            .await?;

        if !existing.is_empty() {
            return Err(AuthError::EmailTaken.into());
        }

        let contrasena_hash = hash_password(&request.contrasena)
            .map_err(|e| AuthError::HashingError(e.to_string()))?;

        let usuario_data = json!({
            "nombre_completo": request.nombre_completo,
            "email": request.email,
            "telefono": request.telefono,
            "contrasena_hash": contrasena_hash,
            "rol": "cliente",
        });

        let result: Vec<InsertedUsuario> = self
            .supabase
            .insert("usuarios", None, usuario_data)
            .await?;

        let usuario = result
            .into_iter()
            .next()
            .ok_or_else(|| AuthError::DatabaseError("insert returned no row".to_string()))?;

        info!("Registered new cliente with id {}", usuario.id);
        Ok(usuario.id)
    }

    pub async fn login(&self, request: LoginRequest) -> Result<LoginResponse> {
        debug!("Login attempt for {}", request.email);

        let rows: Vec<UsuarioRow> = self
            .supabase
            .request(
                Method::GET,
                &format!(
                    "/rest/v1/usuarios?select=id,contrasena_hash,rol&email=eq.{}",
                    request.email
                ),
                None,
                None,
            )
            .await?;

        let usuario = rows
            .into_iter()
            .next()
            .ok_or(AuthError::InvalidCredentials)?;

        let matches = verify_password(&request.contrasena, &usuario.contrasena_hash)
            .map_err(|e| AuthError::HashingError(e.to_string()))?;
        if !matches {
            return Err(AuthError::InvalidCredentials.into());
        }

        let token = sign_token(
            &usuario.id.to_string(),
            &usuario.rol,
            &self.jwt_secret,
            Duration::hours(TOKEN_TTL_HOURS),
        )
        .map_err(AuthError::TokenError)?;

        Ok(LoginResponse {
            message: "Inicio de sesión exitoso".to_string(),
            token,
            rol: usuario.rol,
        })
    }
}
