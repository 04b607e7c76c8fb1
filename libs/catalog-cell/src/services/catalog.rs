use anyhow::Result;
use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::Method;
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use shared_config::AppConfig;
use shared_database::supabase::SupabaseClient;

use crate::models::{
    AddOpcionRequest, AddVariacionRequest, CatalogError, CreateServicioRequest,
    OpcionConVariaciones, OpcionVariacion, Servicio, ServicioConOpciones, ServicioOpcion,
    UpdateServicioRequest,
};

#[derive(Debug, Deserialize)]
struct InsertedRow {
    id: i64,
}

/// Group the three flat catalog tables into the nested shape the frontend
/// consumes. Plain foreign-key grouping, nothing fancier.
pub fn assemble_catalog(
    servicios: Vec<Servicio>,
    opciones: Vec<ServicioOpcion>,
    variaciones: Vec<OpcionVariacion>,
) -> Vec<ServicioConOpciones> {
    servicios
        .into_iter()
        .map(|servicio| {
            let opciones_del_servicio = opciones
                .iter()
                .filter(|opcion| opcion.servicio_id == servicio.id)
                .map(|opcion| OpcionConVariaciones {
                    variaciones: variaciones
                        .iter()
                        .filter(|variacion| variacion.opcion_id == opcion.id)
                        .cloned()
                        .collect(),
                    opcion: opcion.clone(),
                })
                .collect();

            ServicioConOpciones {
                servicio,
                opciones: opciones_del_servicio,
            }
        })
        .collect()
}

pub struct CatalogService {
    supabase: SupabaseClient,
}

impl CatalogService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            supabase: SupabaseClient::new(config),
        }
    }

    async fn fetch_catalog(&self, servicios_path: &str) -> Result<Vec<ServicioConOpciones>> {
        let (servicios, opciones, variaciones): (
            Vec<Servicio>,
            Vec<ServicioOpcion>,
            Vec<OpcionVariacion>,
        ) = tokio::try_join!(
            self.supabase.request(Method::GET, servicios_path, None, None),
            self.supabase
                .request(Method::GET, "/rest/v1/servicio_opciones?select=*", None, None),
            self.supabase
                .request(Method::GET, "/rest/v1/opcion_variaciones?select=*", None, None),
        )?;

        Ok(assemble_catalog(servicios, opciones, variaciones))
    }

    /// Public catalog: active services only.
    pub async fn list_active(&self) -> Result<Vec<ServicioConOpciones>> {
        debug!("Fetching active service catalog");
        self.fetch_catalog("/rest/v1/servicios?select=*&esta_activo=eq.true")
            .await
    }

    /// Admin catalog: every service, active or not.
    pub async fn list_all(&self, _auth_token: &str) -> Result<Vec<ServicioConOpciones>> {
        debug!("Fetching full service catalog");
        self.fetch_catalog("/rest/v1/servicios?select=*&order=categoria.asc,nombre.asc")
            .await
    }

    pub async fn create_servicio(
        &self,
        request: CreateServicioRequest,
        auth_token: &str,
    ) -> Result<i64> {
        if request.nombre.is_empty() {
            return Err(CatalogError::ValidationError("nombre is required".to_string()).into());
        }

        let servicio_data = json!({
            "nombre": request.nombre,
            "descripcion": request.descripcion,
            "categoria": request.categoria,
        });

        let result: Vec<InsertedRow> = self
            .supabase
            .insert("servicios", Some(auth_token), servicio_data)
            .await?;

        result
            .into_iter()
            .next()
            .map(|row| row.id)
            .ok_or_else(|| CatalogError::DatabaseError("insert returned no row".to_string()).into())
    }

    pub async fn update_servicio(
        &self,
        servicio_id: i64,
        request: UpdateServicioRequest,
        auth_token: &str,
    ) -> Result<()> {
        let mut update_data = serde_json::Map::new();

        if let Some(nombre) = request.nombre {
            update_data.insert("nombre".to_string(), json!(nombre));
        }
        if let Some(descripcion) = request.descripcion {
            update_data.insert("descripcion".to_string(), json!(descripcion));
        }
        if let Some(categoria) = request.categoria {
            update_data.insert("categoria".to_string(), json!(categoria));
        }
        if let Some(esta_activo) = request.esta_activo {
            update_data.insert("esta_activo".to_string(), json!(esta_activo));
        }

        if update_data.is_empty() {
            return Err(
                CatalogError::ValidationError("no fields to update".to_string()).into(),
            );
        }

        let path = format!("/rest/v1/servicios?id=eq.{}", servicio_id);
        let mut headers = HeaderMap::new();
        headers.insert("Prefer", HeaderValue::from_static("return=representation"));

        let updated: Vec<Servicio> = self
            .supabase
            .request_with_headers(
                Method::PATCH,
                &path,
                Some(auth_token),
                Some(serde_json::Value::Object(update_data)),
                Some(headers),
            )
            .await?;

        if updated.is_empty() {
            return Err(CatalogError::ServiceNotFound.into());
        }

        Ok(())
    }

    /// Soft delete: the service disappears from the public catalog but keeps
    /// its history.
    pub async fn deactivate_servicio(&self, servicio_id: i64, auth_token: &str) -> Result<()> {
        debug!("Deactivating servicio {}", servicio_id);
        self.update_servicio(
            servicio_id,
            UpdateServicioRequest {
                esta_activo: Some(false),
                ..UpdateServicioRequest::default()
            },
            auth_token,
        )
        .await
    }

    pub async fn delete_servicio(&self, servicio_id: i64, auth_token: &str) -> Result<()> {
        debug!("Permanently deleting servicio {}", servicio_id);

        let path = format!("/rest/v1/servicios?id=eq.{}", servicio_id);
        let mut headers = HeaderMap::new();
        headers.insert("Prefer", HeaderValue::from_static("return=representation"));

        let deleted: Vec<Servicio> = self
            .supabase
            .request_with_headers(Method::DELETE, &path, Some(auth_token), None, Some(headers))
            .await
            .map_err(|e| {
                // foreign-key violation surfaces as a conflict from PostgREST
                if e.to_string().starts_with("Conflict") {
                    anyhow::Error::from(CatalogError::ServiceInUse)
                } else {
                    e
                }
            })?;

        if deleted.is_empty() {
            return Err(CatalogError::ServiceNotFound.into());
        }

        Ok(())
    }

    pub async fn add_opcion(
        &self,
        servicio_id: i64,
        request: AddOpcionRequest,
        auth_token: &str,
    ) -> Result<i64> {
        if request.nombre.is_empty() {
            return Err(CatalogError::ValidationError("nombre is required".to_string()).into());
        }

        let opcion_data = json!({
            "servicio_id": servicio_id,
            "nombre": request.nombre,
        });

        let result: Vec<InsertedRow> = self
            .supabase
            .insert("servicio_opciones", Some(auth_token), opcion_data)
            .await?;

        result
            .into_iter()
            .next()
            .map(|row| row.id)
            .ok_or_else(|| CatalogError::DatabaseError("insert returned no row".to_string()).into())
    }

    pub async fn add_variacion(
        &self,
        opcion_id: i64,
        request: AddVariacionRequest,
        auth_token: &str,
    ) -> Result<i64> {
        if request.nombre.is_empty() {
            return Err(CatalogError::ValidationError("nombre is required".to_string()).into());
        }
        if request.precio <= 0.0 {
            return Err(
                CatalogError::ValidationError("precio must be positive".to_string()).into(),
            );
        }

        let variacion_data = json!({
            "opcion_id": opcion_id,
            "nombre": request.nombre,
            "precio": request.precio,
        });

        let result: Vec<InsertedRow> = self
            .supabase
            .insert("opcion_variaciones", Some(auth_token), variacion_data)
            .await?;

        result
            .into_iter()
            .next()
            .map(|row| row.id)
            .ok_or_else(|| CatalogError::DatabaseError("insert returned no row".to_string()).into())
    }
}
