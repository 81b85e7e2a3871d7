//! JWT-backed `SessionVerifier`.
//!
//! Sessions are HS256 tokens minted by the identity layer after .edu
//! verification; the board only validates and unpacks them. Token issuance
//! lives here too so the seed utility and the test suites can mint sessions
//! against the same claims shape.

use chrono::{Duration, Utc};
use domains::{AppError, AuthenticatedUser, Result, SessionVerifier};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

const SESSION_TTL_HOURS: i64 = 24 * 7;

#[derive(Debug, Serialize, Deserialize)]
struct SessionClaims {
    /// User id.
    sub: Uuid,
    campus: String,
    name: String,
    iat: i64,
    exp: i64,
}

pub struct JwtSessions {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl JwtSessions {
    pub fn new(secret: &SecretString) -> Self {
        let bytes = secret.expose_secret().as_bytes();
        Self {
            encoding: EncodingKey::from_secret(bytes),
            decoding: DecodingKey::from_secret(bytes),
        }
    }

    /// Mints a session token for an already-verified user.
    pub fn issue(&self, user: &AuthenticatedUser) -> Result<String> {
        let now = Utc::now();
        let claims = SessionClaims {
            sub: user.id,
            campus: user.campus.clone(),
            name: user.display_name.clone(),
            iat: now.timestamp(),
            exp: (now + Duration::hours(SESSION_TTL_HOURS)).timestamp(),
        };
        encode(&Header::default(), &claims, &self.encoding)
            .map_err(|e| AppError::Unauthorized(format!("could not issue session: {e}")))
    }
}

impl SessionVerifier for JwtSessions {
    fn verify(&self, token: &str) -> Result<AuthenticatedUser> {
        let data = decode::<SessionClaims>(token, &self.decoding, &Validation::default())
            .map_err(|e| {
                tracing::debug!(error = %e, "session token rejected");
                AppError::Unauthorized("invalid or expired session".into())
            })?;
        Ok(AuthenticatedUser {
            id: data.claims.sub,
            campus: data.claims.campus,
            display_name: data.claims.name,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user() -> AuthenticatedUser {
        AuthenticatedUser {
            id: Uuid::now_v7(),
            campus: "umich.edu".into(),
            display_name: "Ada".into(),
        }
    }

    #[test]
    fn issued_token_verifies_back_to_same_principal() {
        let sessions = JwtSessions::new(&SecretString::from("test-secret"));
        let u = user();
        let token = sessions.issue(&u).unwrap();
        let verified = sessions.verify(&token).unwrap();
        assert_eq!(verified.id, u.id);
        assert_eq!(verified.campus, u.campus);
        assert_eq!(verified.display_name, u.display_name);
    }

    #[test]
    fn token_from_other_secret_is_rejected() {
        let minter = JwtSessions::new(&SecretString::from("secret-a"));
        let verifier = JwtSessions::new(&SecretString::from("secret-b"));
        let token = minter.issue(&user()).unwrap();
        assert!(matches!(
            verifier.verify(&token).unwrap_err(),
            AppError::Unauthorized(_)
        ));
    }

    #[test]
    fn garbage_token_is_rejected() {
        let sessions = JwtSessions::new(&SecretString::from("test-secret"));
        assert!(sessions.verify("not-a-jwt").is_err());
    }
}
