use std::collections::HashMap;

use anyhow::Result;
use chrono::{DateTime, Utc};
use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::Method;
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, info};

use shared_config::AppConfig;
use shared_database::supabase::SupabaseClient;

use crate::models::{
    CitaAdminView, CitaDetalle, CitaError, CreateCitaRequest, EstadoCita, UpdateEstadoRequest,
};

// ==============================================================================
// JOIN ROW SHAPES (PostgREST embedded selects)
// ==============================================================================

#[derive(Debug, Deserialize)]
struct NombreRow {
    nombre_completo: String,
}

#[derive(Debug, Deserialize)]
struct CalleRow {
    direccion_calle: String,
}

#[derive(Debug, Deserialize)]
struct CitaJoinRow {
    id: i64,
    fecha_hora_cita: DateTime<Utc>,
    precio_total: f64,
    estado: EstadoCita,
    usuarios: Option<NombreRow>,
    direcciones: Option<CalleRow>,
}

#[derive(Debug, Deserialize)]
struct ServicioNombreRow {
    nombre: String,
}

#[derive(Debug, Deserialize)]
struct OpcionJoinRow {
    servicios: Option<ServicioNombreRow>,
}

#[derive(Debug, Deserialize)]
struct VariacionJoinRow {
    nombre: String,
    servicio_opciones: Option<OpcionJoinRow>,
}

#[derive(Debug, Deserialize)]
struct LineaJoinRow {
    cita_id: i64,
    opcion_variaciones: Option<VariacionJoinRow>,
}

#[derive(Debug, Deserialize)]
struct CitaContactoRow {
    id: i64,
    fecha_hora_cita: DateTime<Utc>,
    precio_total: f64,
    estado: EstadoCita,
    usuarios: Option<ContactoRow>,
    direcciones: Option<CalleRow>,
}

#[derive(Debug, Deserialize)]
struct ContactoRow {
    nombre_completo: String,
    email: String,
    telefono: Option<String>,
}

/// "Lavado Básico (Automóvil)"
fn format_servicio(variacion: &VariacionJoinRow) -> String {
    let servicio_nombre = variacion
        .servicio_opciones
        .as_ref()
        .and_then(|o| o.servicios.as_ref())
        .map(|s| s.nombre.as_str())
        .unwrap_or("Servicio");
    format!("{} ({})", servicio_nombre, variacion.nombre)
}

fn group_servicio_names(lineas: Vec<LineaJoinRow>) -> HashMap<i64, Vec<String>> {
    let mut names: HashMap<i64, Vec<String>> = HashMap::new();
    for linea in lineas {
        if let Some(variacion) = linea.opcion_variaciones {
            names
                .entry(linea.cita_id)
                .or_default()
                .push(format_servicio(&variacion));
        }
    }
    names
}

const LINEAS_SELECT: &str =
    "cita_id,opcion_variaciones(nombre,servicio_opciones(servicios(nombre)))";

pub struct CitaBookingService {
    supabase: SupabaseClient,
}

impl CitaBookingService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            supabase: SupabaseClient::new(config),
        }
    }

    /// Book a cita with its line items. The insert goes through a single
    /// Postgres function so the cita and its items commit or roll back
    /// together.
    pub async fn create_cita(
        &self,
        request: CreateCitaRequest,
        auth_token: Option<&str>,
    ) -> Result<i64> {
        if request.servicios.is_empty() {
            return Err(CitaError::ValidationError(
                "at least one servicio is required".to_string(),
            )
            .into());
        }

        debug!(
            "Booking cita for usuario {} at {}",
            request.usuario_id, request.fecha_hora_cita
        );

        let servicios: Vec<_> = request
            .servicios
            .iter()
            .map(|item| {
                json!({
                    "opcion_variacion_id": item.id,
                    "cantidad": item.cantidad,
                    "precio_reserva": item.precio,
                })
            })
            .collect();

        let args = json!({
            "p_usuario_id": request.usuario_id,
            "p_direccion_id": request.direccion_id,
            "p_fecha_hora_cita": request.fecha_hora_cita,
            "p_precio_total": request.precio_total,
            "p_servicios": servicios,
        });

        let cita_id: i64 = self.supabase.rpc("crear_cita", auth_token, args).await?;

        info!("Cita {} created", cita_id);
        Ok(cita_id)
    }

    /// Every cita with client name, address and formatted service names,
    /// newest first. Two reads joined in memory instead of one query per
    /// cita.
    pub async fn list_all(&self, auth_token: &str) -> Result<Vec<CitaAdminView>> {
        let citas_path = "/rest/v1/citas?select=id,fecha_hora_cita,precio_total,estado,usuarios(nombre_completo),direcciones(direccion_calle)&order=fecha_hora_cita.desc";
        let lineas_path = format!("/rest/v1/citas_servicios?select={}", LINEAS_SELECT);

        let (citas, lineas): (Vec<CitaJoinRow>, Vec<LineaJoinRow>) = tokio::try_join!(
            self.supabase
                .request(Method::GET, citas_path, Some(auth_token), None),
            self.supabase
                .request(Method::GET, &lineas_path, Some(auth_token), None),
        )?;

        let mut names = group_servicio_names(lineas);

        let views = citas
            .into_iter()
            .map(|cita| CitaAdminView {
                servicios: names.remove(&cita.id).unwrap_or_default(),
                id: cita.id,
                fecha_hora_cita: cita.fecha_hora_cita,
                precio_total: cita.precio_total,
                estado: cita.estado,
                cliente_nombre: cita
                    .usuarios
                    .map(|u| u.nombre_completo)
                    .unwrap_or_default(),
                direccion: cita
                    .direcciones
                    .map(|d| d.direccion_calle)
                    .unwrap_or_default(),
            })
            .collect();

        Ok(views)
    }

    /// Single cita with contact info, visible to its owner only. The
    /// ownership check is part of the query, so a foreign cita looks exactly
    /// like a missing one.
    pub async fn get_cita(
        &self,
        cita_id: i64,
        usuario_id: i64,
        auth_token: &str,
    ) -> Result<CitaDetalle> {
        let cita_path = format!(
            "/rest/v1/citas?select=id,fecha_hora_cita,precio_total,estado,usuarios(nombre_completo,email,telefono),direcciones(direccion_calle)&id=eq.{}&usuario_id=eq.{}",
            cita_id, usuario_id
        );
        let lineas_path = format!(
            "/rest/v1/citas_servicios?select={}&cita_id=eq.{}",
            LINEAS_SELECT, cita_id
        );

        let (citas, lineas): (Vec<CitaContactoRow>, Vec<LineaJoinRow>) = tokio::try_join!(
            self.supabase
                .request(Method::GET, &cita_path, Some(auth_token), None),
            self.supabase
                .request(Method::GET, &lineas_path, Some(auth_token), None),
        )?;

        let cita = citas.into_iter().next().ok_or(CitaError::NotFound)?;
        let servicios = group_servicio_names(lineas)
            .remove(&cita.id)
            .unwrap_or_default();

        let contacto = cita.usuarios.ok_or_else(|| {
            CitaError::DatabaseError("cita without usuario".to_string())
        })?;

        Ok(CitaDetalle {
            id: cita.id,
            fecha_hora_cita: cita.fecha_hora_cita,
            precio_total: cita.precio_total,
            estado: cita.estado,
            cliente_nombre: contacto.nombre_completo,
            cliente_email: contacto.email,
            cliente_telefono: contacto.telefono,
            direccion_calle: cita
                .direcciones
                .map(|d| d.direccion_calle)
                .unwrap_or_default(),
            servicios,
        })
    }

    /// Admin status transition. Only confirmada/completada/cancelada may be
    /// set through this path; pendiente is the insert-time default.
    pub async fn update_estado(
        &self,
        cita_id: i64,
        request: UpdateEstadoRequest,
        auth_token: &str,
    ) -> Result<EstadoCita> {
        if request.estado == EstadoCita::Pendiente {
            return Err(CitaError::InvalidEstado(request.estado.to_string()).into());
        }

        debug!("Setting cita {} to {}", cita_id, request.estado);

        let path = format!("/rest/v1/citas?id=eq.{}", cita_id);
        let mut headers = HeaderMap::new();
        headers.insert("Prefer", HeaderValue::from_static("return=representation"));

        let updated: Vec<serde_json::Value> = self
            .supabase
            .request_with_headers(
                Method::PATCH,
                &path,
                Some(auth_token),
                Some(json!({ "estado": request.estado })),
                Some(headers),
            )
            .await?;

        if updated.is_empty() {
            return Err(CitaError::NotFound.into());
        }

        Ok(request.estado)
    }
}
