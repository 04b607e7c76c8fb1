use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

// ==============================================================================
// CORE CITA MODELS
// ==============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cita {
    pub id: i64,
    pub usuario_id: i64,
    pub direccion_id: i64,
    pub fecha_hora_cita: DateTime<Utc>,
    pub precio_total: f64,
    pub estado: EstadoCita,
}

/// Lifecycle of a cita. Only `confirmada` occupies the schedule for
/// availability purposes.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum EstadoCita {
    Pendiente,
    Confirmada,
    Completada,
    Cancelada,
}

impl fmt::Display for EstadoCita {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EstadoCita::Pendiente => write!(f, "pendiente"),
            EstadoCita::Confirmada => write!(f, "confirmada"),
            EstadoCita::Completada => write!(f, "completada"),
            EstadoCita::Cancelada => write!(f, "cancelada"),
        }
    }
}

// ==============================================================================
// REQUEST/RESPONSE MODELS
// ==============================================================================

/// One booked line item: a price variation plus quantity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CitaServicioItem {
    pub id: i64,
    pub cantidad: i32,
    pub precio: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateCitaRequest {
    pub usuario_id: i64,
    pub direccion_id: i64,
    pub fecha_hora_cita: DateTime<Utc>,
    pub precio_total: f64,
    pub servicios: Vec<CitaServicioItem>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateEstadoRequest {
    pub estado: EstadoCita,
}

/// Admin listing row: cita joined with client name, address and the
/// formatted service names.
#[derive(Debug, Clone, Serialize)]
pub struct CitaAdminView {
    pub id: i64,
    pub fecha_hora_cita: DateTime<Utc>,
    pub precio_total: f64,
    pub estado: EstadoCita,
    pub cliente_nombre: String,
    pub direccion: String,
    pub servicios: Vec<String>,
}

/// Single-cita detail for the owning customer.
#[derive(Debug, Clone, Serialize)]
pub struct CitaDetalle {
    pub id: i64,
    pub fecha_hora_cita: DateTime<Utc>,
    pub precio_total: f64,
    pub estado: EstadoCita,
    pub cliente_nombre: String,
    pub cliente_email: String,
    pub cliente_telefono: Option<String>,
    pub direccion_calle: String,
    pub servicios: Vec<String>,
}

// ==============================================================================
// ERRORS
// ==============================================================================

#[derive(Error, Debug)]
pub enum CitaError {
    #[error("Cita no encontrada")]
    NotFound,

    #[error("Estado no válido: {0}")]
    InvalidEstado(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Database error: {0}")]
    DatabaseError(String),
}
