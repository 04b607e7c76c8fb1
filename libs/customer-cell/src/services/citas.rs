use std::collections::HashMap;

use anyhow::Result;
use chrono::{DateTime, Utc};
use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::Method;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, info};

use appointment_cell::models::EstadoCita;
use shared_config::AppConfig;
use shared_database::supabase::SupabaseClient;

use crate::models::{ClienteError, CreateResenaRequest, MiCita};

// Row shapes for the PostgREST embedded selects used below.

#[derive(Debug, Deserialize)]
struct DireccionRow {
    direccion_calle: String,
    ciudad: String,
}

#[derive(Debug, Deserialize)]
struct CalificacionRow {
    calificacion: i32,
}

#[derive(Debug, Deserialize)]
struct MiCitaRow {
    id: i64,
    fecha_hora_cita: DateTime<Utc>,
    precio_total: f64,
    estado: EstadoCita,
    direcciones: Option<DireccionRow>,
    resenas: Vec<CalificacionRow>,
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
struct CitaEstadoRow {
    id: i64,
    estado: EstadoCita,
}

#[derive(Debug, Deserialize)]
struct ResenaIdRow {
    #[allow(dead_code)]
    id: i64,
}

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

pub struct ClienteCitaService {
    supabase: SupabaseClient,
}

impl ClienteCitaService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            supabase: SupabaseClient::new(config),
        }
    }

    /// Booking history for one client: cita, address, formatted service
    /// names and the review rating when the cita already has one. Two reads
    /// joined in memory.
    pub async fn get_mis_citas(&self, usuario_id: i64, auth_token: &str) -> Result<Vec<MiCita>> {
        let citas_path = format!(
            "/rest/v1/citas?select=id,fecha_hora_cita,precio_total,estado,direcciones(direccion_calle,ciudad),resenas(calificacion)&usuario_id=eq.{}&order=fecha_hora_cita.desc",
            usuario_id
        );
        // The inner join restricts line items to this client's citas.
        let lineas_path = format!(
            "/rest/v1/citas_servicios?select=cita_id,opcion_variaciones(nombre,servicio_opciones(servicios(nombre))),citas!inner(usuario_id)&citas.usuario_id=eq.{}",
            usuario_id
        );

        let (citas, lineas): (Vec<MiCitaRow>, Vec<LineaJoinRow>) = tokio::try_join!(
            self.supabase
                .request(Method::GET, &citas_path, Some(auth_token), None),
            self.supabase
                .request(Method::GET, &lineas_path, Some(auth_token), None),
        )?;

        let mut names = group_servicio_names(lineas);

        let views = citas
            .into_iter()
            .map(|cita| MiCita {
                servicios: names.remove(&cita.id).unwrap_or_default(),
                calificacion: cita.resenas.first().map(|r| r.calificacion),
                id: cita.id,
                fecha_hora_cita: cita.fecha_hora_cita,
                precio_total: cita.precio_total,
                estado: cita.estado,
                direccion_calle: cita
                    .direcciones
                    .as_ref()
                    .map(|d| d.direccion_calle.clone())
                    .unwrap_or_default(),
                ciudad: cita.direcciones.map(|d| d.ciudad).unwrap_or_default(),
            })
            .collect();

        Ok(views)
    }

    /// Client-side cancellation. Ownership and the allowed starting states
    /// are both part of the filter, so a completed or foreign cita looks the
    /// same as a missing one.
    pub async fn cancelar_cita(
        &self,
        cita_id: i64,
        usuario_id: i64,
        auth_token: &str,
    ) -> Result<()> {
        debug!("Usuario {} cancelling cita {}", usuario_id, cita_id);

        let path = format!(
            "/rest/v1/citas?id=eq.{}&usuario_id=eq.{}&estado=in.(pendiente,confirmada)",
            cita_id, usuario_id
        );
        let mut headers = HeaderMap::new();
        headers.insert("Prefer", HeaderValue::from_static("return=representation"));

        let updated: Vec<Value> = self
            .supabase
            .request_with_headers(
                Method::PATCH,
                &path,
                Some(auth_token),
                Some(json!({ "estado": EstadoCita::Cancelada })),
                Some(headers),
            )
            .await?;

        if updated.is_empty() {
            return Err(ClienteError::CitaNotFound.into());
        }

        info!("Cita {} cancelled by usuario {}", cita_id, usuario_id);
        Ok(())
    }

    /// One review per completed cita, pending moderation until an admin
    /// approves it.
    pub async fn crear_resena(
        &self,
        usuario_id: i64,
        request: CreateResenaRequest,
        auth_token: &str,
    ) -> Result<()> {
        if !(1..=5).contains(&request.calificacion) {
            return Err(ClienteError::ValidationError(
                "calificacion must be between 1 and 5".to_string(),
            )
            .into());
        }

        let cita_path = format!(
            "/rest/v1/citas?select=id,estado&id=eq.{}&usuario_id=eq.{}",
            request.cita_id, usuario_id
        );
        let resena_path = format!("/rest/v1/resenas?select=id&cita_id=eq.{}", request.cita_id);

        let (citas, resenas): (Vec<CitaEstadoRow>, Vec<ResenaIdRow>) = tokio::try_join!(
            self.supabase
                .request(Method::GET, &cita_path, Some(auth_token), None),
            self.supabase
                .request(Method::GET, &resena_path, Some(auth_token), None),
        )?;

        let cita = citas.into_iter().next().ok_or(ClienteError::CitaNotFound)?;
        if cita.estado != EstadoCita::Completada {
            return Err(ClienteError::CitaNotCompleted.into());
        }
        if !resenas.is_empty() {
            return Err(ClienteError::AlreadyReviewed.into());
        }

        let body = json!({
            "cita_id": request.cita_id,
            "usuario_id": usuario_id,
            "calificacion": request.calificacion,
            "comentario": request.comentario,
            "esta_aprobada": false,
        });

        let _: Vec<Value> = self.supabase.insert("resenas", Some(auth_token), body).await?;

        info!("Resena created for cita {}", request.cita_id);
        Ok(())
    }
}
