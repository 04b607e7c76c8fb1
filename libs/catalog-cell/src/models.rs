use serde::{Deserialize, Serialize};
use thiserror::Error;

// ==============================================================================
// CATALOG ROWS
// ==============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Servicio {
    pub id: i64,
    pub nombre: String,
    pub descripcion: Option<String>,
    pub categoria: Option<String>,
    pub esta_activo: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServicioOpcion {
    pub id: i64,
    pub servicio_id: i64,
    pub nombre: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpcionVariacion {
    pub id: i64,
    pub opcion_id: i64,
    pub nombre: String,
    pub precio: f64,
}

// ==============================================================================
// NESTED CATALOG SHAPE (servicio -> opciones -> variaciones)
// ==============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct OpcionConVariaciones {
    #[serde(flatten)]
    pub opcion: ServicioOpcion,
    pub variaciones: Vec<OpcionVariacion>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ServicioConOpciones {
    #[serde(flatten)]
    pub servicio: Servicio,
    pub opciones: Vec<OpcionConVariaciones>,
}

// ==============================================================================
// REQUESTS
// ==============================================================================

#[derive(Debug, Clone, Deserialize)]
pub struct CreateServicioRequest {
    pub nombre: String,
    pub descripcion: Option<String>,
    pub categoria: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateServicioRequest {
    pub nombre: Option<String>,
    pub descripcion: Option<String>,
    pub categoria: Option<String>,
    pub esta_activo: Option<bool>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AddOpcionRequest {
    pub nombre: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AddVariacionRequest {
    pub nombre: String,
    pub precio: f64,
}

// ==============================================================================
// ERRORS
// ==============================================================================

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Servicio no encontrado")]
    ServiceNotFound,

    #[error("El servicio está asociado a citas existentes")]
    ServiceInUse,

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Database error: {0}")]
    DatabaseError(String),
}
