use std::sync::Arc;

use chrono::Duration;

use shared_config::AppConfig;
use shared_models::auth::User;

use crate::jwt::sign_token;

pub struct TestConfig {
    pub jwt_secret: String,
    pub supabase_url: String,
    pub supabase_anon_key: String,
}

impl Default for TestConfig {
    fn default() -> Self {
        Self {
            jwt_secret: "test-secret-key-for-jwt-validation-must-be-long-enough".to_string(),
            supabase_url: "http://localhost:54321".to_string(),
            supabase_anon_key: "test-anon-key".to_string(),
        }
    }
}

impl TestConfig {
    /// Config whose Supabase base URL points at a mock server.
    pub fn with_base_url(base_url: &str) -> Self {
        Self {
            supabase_url: base_url.to_string(),
            ..Self::default()
        }
    }

    pub fn to_app_config(&self) -> AppConfig {
        AppConfig {
            supabase_url: self.supabase_url.clone(),
            supabase_anon_key: self.supabase_anon_key.clone(),
            jwt_secret: self.jwt_secret.clone(),
        }
    }

    pub fn to_arc(&self) -> Arc<AppConfig> {
        Arc::new(self.to_app_config())
    }

    pub fn make_token(&self, user: &User) -> String {
        sign_token(&user.id, &user.rol, &self.jwt_secret, Duration::hours(1))
            .expect("failed to sign test token")
    }
}

pub fn test_cliente(id: &str) -> User {
    User {
        id: id.to_string(),
        rol: "cliente".to_string(),
    }
}

pub fn test_admin(id: &str) -> User {
    User {
        id: id.to_string(),
        rol: "admin".to_string(),
    }
}
