use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use appointment_cell::models::EstadoCita;

// ==============================================================================
// PROFILE & ADDRESSES
// ==============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Direccion {
    pub id: i64,
    pub usuario_id: i64,
    pub direccion_calle: String,
    pub ciudad: String,
    pub detalles: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Perfil {
    pub id: i64,
    pub nombre_completo: String,
    pub email: String,
    pub telefono: Option<String>,
    pub direcciones: Vec<Direccion>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdatePerfilRequest {
    pub nombre_completo: Option<String>,
    pub telefono: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AddDireccionRequest {
    pub direccion_calle: String,
    pub ciudad: String,
    pub detalles: Option<String>,
}

// ==============================================================================
// OWN CITAS & REVIEWS
// ==============================================================================

/// One row of the customer's booking history: cita, address, formatted
/// service names and the review rating when one exists.
#[derive(Debug, Clone, Serialize)]
pub struct MiCita {
    pub id: i64,
    pub fecha_hora_cita: DateTime<Utc>,
    pub precio_total: f64,
    pub estado: EstadoCita,
    pub direccion_calle: String,
    pub ciudad: String,
    pub servicios: Vec<String>,
    pub calificacion: Option<i32>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateResenaRequest {
    pub cita_id: i64,
    pub calificacion: i32,
    pub comentario: Option<String>,
}

// ==============================================================================
// ADMIN CLIENT MANAGEMENT
// ==============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cliente {
    pub id: i64,
    pub nombre_completo: String,
    pub email: String,
    pub telefono: Option<String>,
    pub fecha_creacion: DateTime<Utc>,
}

// ==============================================================================
// ERRORS
// ==============================================================================

#[derive(Error, Debug)]
pub enum ClienteError {
    #[error("Usuario no encontrado")]
    UsuarioNotFound,

    #[error("Cita no encontrada o no pertenece al usuario")]
    CitaNotFound,

    #[error("Solo se pueden reseñar citas completadas")]
    CitaNotCompleted,

    #[error("Esta cita ya ha sido reseñada")]
    AlreadyReviewed,

    #[error("Cliente no encontrado")]
    ClienteNotFound,

    #[error("El cliente tiene citas asociadas")]
    ClienteHasCitas,

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Database error: {0}")]
    DatabaseError(String),
}
