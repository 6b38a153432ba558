use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::database::models::Role;

pub mod password;

/// Identity claims carried in the bearer token: `{id, email, role}` plus the
/// standard expiry/issued-at pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub id: Uuid,
    pub email: String,
    pub role: Role,
    pub exp: i64,
    pub iat: i64,
}

impl Claims {
    pub fn new(id: Uuid, email: String, role: Role, expiry_days: u64) -> Self {
        let now = Utc::now();
        let exp = (now + Duration::days(expiry_days as i64)).timestamp();

        Self {
            id,
            email,
            role,
            exp,
            iat: now.timestamp(),
        }
    }
}

#[derive(Debug)]
pub enum JwtError {
    TokenGeneration(String),
    InvalidSecret,
    /// Missing signature match, malformed structure and past expiry all land
    /// here; callers see a single 401 condition either way.
    InvalidToken,
}

impl std::fmt::Display for JwtError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            JwtError::TokenGeneration(msg) => write!(f, "JWT generation error: {}", msg),
            JwtError::InvalidSecret => write!(f, "Invalid JWT secret"),
            JwtError::InvalidToken => write!(f, "Invalid or expired token"),
        }
    }
}

impl std::error::Error for JwtError {}

pub fn generate_jwt(claims: &Claims, secret: &str) -> Result<String, JwtError> {
    if secret.is_empty() {
        return Err(JwtError::InvalidSecret);
    }

    let encoding_key = EncodingKey::from_secret(secret.as_bytes());
    let header = Header::default();

    encode(&header, claims, &encoding_key).map_err(|e| JwtError::TokenGeneration(e.to_string()))
}

pub fn verify_jwt(token: &str, secret: &str) -> Result<Claims, JwtError> {
    if secret.is_empty() {
        return Err(JwtError::InvalidSecret);
    }

    let decoding_key = DecodingKey::from_secret(secret.as_bytes());
    let validation = Validation::default();

    let token_data =
        decode::<Claims>(token, &decoding_key, &validation).map_err(|_| JwtError::InvalidToken)?;

    Ok(token_data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "unit-test-secret";

    fn sample_claims() -> Claims {
        Claims::new(
            Uuid::new_v4(),
            "alice@csub.edu".to_string(),
            Role::Candidate,
            7,
        )
    }

    #[test]
    fn verify_recovers_issued_identity() {
        let claims = sample_claims();
        let token = generate_jwt(&claims, SECRET).unwrap();

        let decoded = verify_jwt(&token, SECRET).unwrap();
        assert_eq!(decoded.id, claims.id);
        assert_eq!(decoded.email, claims.email);
        assert_eq!(decoded.role, Role::Candidate);
        assert_eq!(decoded.exp, claims.exp);
    }

    #[test]
    fn expiry_is_seven_days_out() {
        let claims = sample_claims();
        let lifetime = claims.exp - claims.iat;
        assert_eq!(lifetime, 7 * 24 * 3600);
    }

    #[test]
    fn expired_token_is_rejected() {
        let mut claims = sample_claims();
        // jsonwebtoken's default validation allows 60s of leeway
        claims.exp = (Utc::now() - Duration::hours(1)).timestamp();
        let token = generate_jwt(&claims, SECRET).unwrap();

        assert!(matches!(verify_jwt(&token, SECRET), Err(JwtError::InvalidToken)));
    }

    #[test]
    fn tampered_token_is_rejected() {
        let token = generate_jwt(&sample_claims(), SECRET).unwrap();

        // Flip a character in the payload segment
        let mut bytes = token.into_bytes();
        let mid = bytes.len() / 2;
        bytes[mid] = if bytes[mid] == b'a' { b'b' } else { b'a' };
        let tampered = String::from_utf8(bytes).unwrap();

        assert!(matches!(verify_jwt(&tampered, SECRET), Err(JwtError::InvalidToken)));
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let token = generate_jwt(&sample_claims(), SECRET).unwrap();
        assert!(matches!(
            verify_jwt(&token, "some-other-secret"),
            Err(JwtError::InvalidToken)
        ));
    }

    #[test]
    fn empty_secret_is_rejected() {
        assert!(matches!(
            generate_jwt(&sample_claims(), ""),
            Err(JwtError::InvalidSecret)
        ));
        assert!(matches!(verify_jwt("whatever", ""), Err(JwtError::InvalidSecret)));
    }

    #[test]
    fn garbage_token_is_rejected() {
        assert!(matches!(
            verify_jwt("not.a.token", SECRET),
            Err(JwtError::InvalidToken)
        ));
    }
}
