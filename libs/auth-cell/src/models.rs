use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Deserialize)]
pub struct RegisterRequest {
    pub nombre_completo: String,
    pub email: String,
    pub telefono: Option<String>,
    pub contrasena: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub contrasena: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub message: String,
    pub token: String,
    pub rol: String,
}

#[derive(Error, Debug)]
pub enum AuthError {
    // one message for unknown email and wrong password alike
    #[error("Credenciales inválidas")]
    InvalidCredentials,

    #[error("Email already registered")]
    EmailTaken,

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Password hashing failed: {0}")]
    HashingError(String),

    #[error("Token signing failed: {0}")]
    TokenError(String),

    #[error("Database error: {0}")]
    DatabaseError(String),
}
