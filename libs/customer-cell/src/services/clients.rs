use anyhow::Result;
use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::Method;
use tracing::info;

use shared_config::AppConfig;
use shared_database::supabase::SupabaseClient;

use crate::models::{Cliente, ClienteError};

pub struct ClienteAdminService {
    supabase: SupabaseClient,
}

impl ClienteAdminService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            supabase: SupabaseClient::new(config),
        }
    }

    /// Every registered client, newest first. Admin accounts are not listed.
    pub async fn list_clientes(&self, auth_token: &str) -> Result<Vec<Cliente>> {
        let path = "/rest/v1/usuarios?select=id,nombre_completo,email,telefono,fecha_creacion&rol=eq.cliente&order=fecha_creacion.desc";

        let clientes: Vec<Cliente> = self
            .supabase
            .request(Method::GET, path, Some(auth_token), None)
            .await?;

        Ok(clientes)
    }

    /// Delete a client account. The rol filter keeps admin accounts out of
    /// reach of this endpoint.
    pub async fn delete_cliente(&self, usuario_id: i64, auth_token: &str) -> Result<()> {
        let path = format!("/rest/v1/usuarios?id=eq.{}&rol=eq.cliente", usuario_id);
        let mut headers = HeaderMap::new();
        headers.insert("Prefer", HeaderValue::from_static("return=representation"));

        let deleted: Vec<serde_json::Value> = self
            .supabase
            .request_with_headers(Method::DELETE, &path, Some(auth_token), None, Some(headers))
            .await
            .map_err(|e| {
                // foreign-key violation surfaces as a conflict from PostgREST
                if e.to_string().starts_with("Conflict") {
                    anyhow::Error::from(ClienteError::ClienteHasCitas)
                } else {
                    e
                }
            })?;

        if deleted.is_empty() {
            return Err(ClienteError::ClienteNotFound.into());
        }

        info!("Cliente {} deleted", usuario_id);
        Ok(())
    }
}
