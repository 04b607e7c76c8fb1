use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use chrono::{Duration, Utc};
use hmac::{Hmac, Mac};
use sha2::Sha256;
use tracing::debug;

use shared_models::auth::{JwtClaims, User};

type HmacSha256 = Hmac<Sha256>;

/// Sign an HS256 token for the given user. Tokens carry the user id and role
/// and expire after `ttl`.
pub fn sign_token(user_id: &str, rol: &str, jwt_secret: &str, ttl: Duration) -> Result<String, String> {
    if jwt_secret.is_empty() {
        return Err("JWT secret is not set".to_string());
    }

    let now = Utc::now().timestamp() as u64;
    let claims = JwtClaims {
        sub: user_id.to_string(),
        rol: rol.to_string(),
        iat: now,
        exp: now.wrapping_add(ttl.num_seconds() as u64),
    };

    let header_b64 = URL_SAFE_NO_PAD.encode(r#"{"alg":"HS256","typ":"JWT"}"#);
    let claims_json = serde_json::to_string(&claims)
        .map_err(|e| format!("Failed to serialize claims: {}", e))?;
    let claims_b64 = URL_SAFE_NO_PAD.encode(claims_json);

    let signing_input = format!("{}.{}", header_b64, claims_b64);

    let mut mac = HmacSha256::new_from_slice(jwt_secret.as_bytes())
        .map_err(|_| "Failed to create HMAC".to_string())?;
    mac.update(signing_input.as_bytes());
    let signature_b64 = URL_SAFE_NO_PAD.encode(mac.finalize().into_bytes());

    Ok(format!("{}.{}", signing_input, signature_b64))
}

pub fn validate_token(token: &str, jwt_secret: &str) -> Result<User, String> {
    if jwt_secret.is_empty() {
        return Err("JWT secret is not set".to_string());
    }

    // Split token into parts
    let parts: Vec<&str> = token.split('.').collect();
    if parts.len() != 3 {
        return Err("Invalid token format".to_string());
    }

    let header_b64 = parts[0];
    let claims_b64 = parts[1];
    let signature_b64 = parts[2];

    let signature = match URL_SAFE_NO_PAD.decode(signature_b64) {
        Ok(sig) => sig,
        Err(e) => {
            debug!("Failed to decode signature: {}", e);
            return Err("Invalid signature encoding".to_string());
        }
    };

    let signing_input = format!("{}.{}", header_b64, claims_b64);

    let mut mac = match HmacSha256::new_from_slice(jwt_secret.as_bytes()) {
        Ok(m) => m,
        Err(_) => return Err("Failed to create HMAC".to_string()),
    };

    mac.update(signing_input.as_bytes());

    if mac.verify_slice(&signature).is_err() {
        debug!("Token signature verification failed");
        return Err("Invalid token signature".to_string());
    }

    // Decode claims
    let claims_json = match URL_SAFE_NO_PAD.decode(claims_b64) {
        Ok(bytes) => match String::from_utf8(bytes) {
            Ok(json_str) => json_str,
            Err(_) => return Err("Invalid claims encoding".to_string()),
        },
        Err(_) => return Err("Invalid claims encoding".to_string()),
    };

    let claims: JwtClaims = match serde_json::from_str(&claims_json) {
        Ok(c) => c,
        Err(e) => {
            debug!("Failed to parse claims: {}", e);
            return Err("Invalid claims format".to_string());
        },
    };

    // Check expiration
    let now = Utc::now().timestamp() as u64;
    if claims.exp < now {
        debug!("Token expired at {} (now: {})", claims.exp, now);
        return Err("Token expired".to_string());
    }

    let user = User {
        id: claims.sub,
        rol: claims.rol,
    };

    debug!("Token validated successfully for user: {}", user.id);
    Ok(user)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret-key-for-jwt-validation-must-be-long-enough";

    #[test]
    fn signed_token_round_trips() {
        let token = sign_token("42", "cliente", SECRET, Duration::hours(1)).unwrap();
        let user = validate_token(&token, SECRET).unwrap();
        assert_eq!(user.id, "42");
        assert_eq!(user.rol, "cliente");
        assert!(!user.is_admin());
    }

    #[test]
    fn tampered_token_is_rejected() {
        let token = sign_token("42", "cliente", SECRET, Duration::hours(1)).unwrap();
        let forged = format!("{}x", token);
        assert!(validate_token(&forged, SECRET).is_err());
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let token = sign_token("42", "admin", SECRET, Duration::hours(1)).unwrap();
        assert!(validate_token(&token, "another-secret").is_err());
    }

    #[test]
    fn expired_token_is_rejected() {
        let token = sign_token("42", "cliente", SECRET, Duration::hours(-1)).unwrap();
        let err = validate_token(&token, SECRET).unwrap_err();
        assert_eq!(err, "Token expired");
    }
}
