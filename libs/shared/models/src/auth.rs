use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
pub struct JwtClaims {
    pub sub: String,
    pub rol: String,
    pub exp: u64,
    pub iat: u64,
}

/// Authenticated caller, attached to the request by the auth middleware.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub rol: String,
}

impl User {
    pub fn is_admin(&self) -> bool {
        self.rol == "admin"
    }
}
