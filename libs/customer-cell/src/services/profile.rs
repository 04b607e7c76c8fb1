use anyhow::Result;
use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::Method;
use serde::Deserialize;
use serde_json::{json, Map, Value};
use tracing::debug;

use shared_config::AppConfig;
use shared_database::supabase::SupabaseClient;

use crate::models::{AddDireccionRequest, ClienteError, Direccion, Perfil, UpdatePerfilRequest};

#[derive(Debug, Deserialize)]
struct UsuarioRow {
    id: i64,
    nombre_completo: String,
    email: String,
    telefono: Option<String>,
}

pub struct ProfileService {
    supabase: SupabaseClient,
}

impl ProfileService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            supabase: SupabaseClient::new(config),
        }
    }

    /// Profile plus every saved address, fetched concurrently.
    pub async fn get_perfil(&self, usuario_id: i64, auth_token: &str) -> Result<Perfil> {
        let usuario_path = format!(
            "/rest/v1/usuarios?select=id,nombre_completo,email,telefono&id=eq.{}",
            usuario_id
        );
        let direcciones_path = format!(
            "/rest/v1/direcciones?select=*&usuario_id=eq.{}&order=id.asc",
            usuario_id
        );

        let (usuarios, direcciones): (Vec<UsuarioRow>, Vec<Direccion>) = tokio::try_join!(
            self.supabase
                .request(Method::GET, &usuario_path, Some(auth_token), None),
            self.supabase
                .request(Method::GET, &direcciones_path, Some(auth_token), None),
        )?;

        let usuario = usuarios
            .into_iter()
            .next()
            .ok_or(ClienteError::UsuarioNotFound)?;

        Ok(Perfil {
            id: usuario.id,
            nombre_completo: usuario.nombre_completo,
            email: usuario.email,
            telefono: usuario.telefono,
            direcciones,
        })
    }

    /// Partial update of the profile fields a client may edit. Email and
    /// password changes go through other flows.
    pub async fn update_perfil(
        &self,
        usuario_id: i64,
        request: UpdatePerfilRequest,
        auth_token: &str,
    ) -> Result<()> {
        let mut fields = Map::new();
        if let Some(nombre) = request.nombre_completo {
            if nombre.trim().is_empty() {
                return Err(ClienteError::ValidationError(
                    "nombre_completo cannot be empty".to_string(),
                )
                .into());
            }
            fields.insert("nombre_completo".to_string(), Value::String(nombre));
        }
        if let Some(telefono) = request.telefono {
            fields.insert("telefono".to_string(), Value::String(telefono));
        }

        if fields.is_empty() {
            return Err(ClienteError::ValidationError(
                "no fields to update".to_string(),
            )
            .into());
        }

        debug!("Updating perfil for usuario {}", usuario_id);

        let path = format!("/rest/v1/usuarios?id=eq.{}", usuario_id);
        let mut headers = HeaderMap::new();
        headers.insert("Prefer", HeaderValue::from_static("return=representation"));

        let updated: Vec<Value> = self
            .supabase
            .request_with_headers(
                Method::PATCH,
                &path,
                Some(auth_token),
                Some(Value::Object(fields)),
                Some(headers),
            )
            .await?;

        if updated.is_empty() {
            return Err(ClienteError::UsuarioNotFound.into());
        }

        Ok(())
    }

    pub async fn add_direccion(
        &self,
        usuario_id: i64,
        request: AddDireccionRequest,
        auth_token: &str,
    ) -> Result<Direccion> {
        if request.direccion_calle.trim().is_empty() || request.ciudad.trim().is_empty() {
            return Err(ClienteError::ValidationError(
                "direccion_calle and ciudad are required".to_string(),
            )
            .into());
        }

        let body = json!({
            "usuario_id": usuario_id,
            "direccion_calle": request.direccion_calle,
            "ciudad": request.ciudad,
            "detalles": request.detalles,
        });

        let inserted: Vec<Direccion> = self
            .supabase
            .insert("direcciones", Some(auth_token), body)
            .await?;

        inserted
            .into_iter()
            .next()
            .ok_or_else(|| ClienteError::DatabaseError("insert returned no row".to_string()).into())
    }
}
