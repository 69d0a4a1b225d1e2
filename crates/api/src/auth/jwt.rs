//! HS256 access tokens.
//!
//! There are no refresh tokens or server-side sessions: a client logs in
//! again when its token expires. The role travels in the token as the closed
//! [`Role`] enum, so a token carrying an unknown role fails to decode.

use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use sponnect_core::roles::Role;
use sponnect_core::types::DbId;
use uuid::Uuid;

use crate::config::{parsed_or, required, ConfigError};

/// Shortest signing secret accepted at startup.
pub const MIN_SECRET_BYTES: usize = 32;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User id.
    pub sub: DbId,
    pub role: Role,
    pub exp: i64,
    pub iat: i64,
    /// Random token id, logged on login.
    pub jti: String,
}

/// A freshly signed token and its lifetime in seconds.
#[derive(Debug, Clone)]
pub struct AccessToken {
    pub token: String,
    pub jti: String,
    pub expires_in: i64,
}

#[derive(Debug, Clone)]
pub struct JwtConfig {
    pub secret: String,
    pub access_token_expiry_mins: i64,
}

impl JwtConfig {
    /// `JWT_SECRET` (required, at least [`MIN_SECRET_BYTES`]) and
    /// `JWT_ACCESS_EXPIRY_MINS` (default `60`).
    pub fn from_env() -> Result<Self, ConfigError> {
        let secret = required("JWT_SECRET")?;
        if secret.len() < MIN_SECRET_BYTES {
            return Err(ConfigError::TooShort {
                name: "JWT_SECRET",
                min: MIN_SECRET_BYTES,
            });
        }
        let access_token_expiry_mins = parsed_or("JWT_ACCESS_EXPIRY_MINS", 60)?;
        if access_token_expiry_mins <= 0 {
            return Err(ConfigError::Invalid {
                name: "JWT_ACCESS_EXPIRY_MINS",
                value: access_token_expiry_mins.to_string(),
            });
        }

        Ok(Self {
            secret,
            access_token_expiry_mins,
        })
    }

    pub fn expiry_secs(&self) -> i64 {
        self.access_token_expiry_mins * 60
    }

    /// Sign a token for `user_id` acting as `role`.
    pub fn issue(&self, user_id: DbId, role: Role) -> Result<AccessToken, jsonwebtoken::errors::Error> {
        let iat = chrono::Utc::now().timestamp();
        let claims = Claims {
            sub: user_id,
            role,
            exp: iat + self.expiry_secs(),
            iat,
            jti: Uuid::new_v4().to_string(),
        };

        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )?;

        Ok(AccessToken {
            token,
            jti: claims.jti,
            expires_in: self.expiry_secs(),
        })
    }

    /// Check signature and expiry and return the claims.
    pub fn verify(&self, token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_required_spec_claims(&["exp", "sub"]);

        decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &validation,
        )
        .map(|data| data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(secret: &str) -> JwtConfig {
        JwtConfig {
            secret: secret.to_string(),
            access_token_expiry_mins: 60,
        }
    }

    fn sign(config: &JwtConfig, claims: &serde_json::Value) -> String {
        encode(
            &Header::new(Algorithm::HS256),
            claims,
            &EncodingKey::from_secret(config.secret.as_bytes()),
        )
        .unwrap()
    }

    #[test]
    fn test_issue_then_verify() {
        let config = config("test-secret-that-is-long-enough-for-hmac");
        let issued = config.issue(42, Role::Sponsor).unwrap();
        assert_eq!(issued.expires_in, 3600);

        let claims = config.verify(&issued.token).unwrap();
        assert_eq!(claims.sub, 42);
        assert_eq!(claims.role, Role::Sponsor);
        assert_eq!(claims.exp - claims.iat, 3600);
        assert_eq!(claims.jti, issued.jti);
    }

    #[test]
    fn test_expired_token_rejected() {
        let config = config("test-secret-that-is-long-enough-for-hmac");
        let now = chrono::Utc::now().timestamp();
        // Past the default 60 second leeway.
        let token = sign(
            &config,
            &serde_json::json!({
                "sub": 1, "role": "influencer", "exp": now - 300, "iat": now - 600, "jti": "x"
            }),
        );
        assert!(config.verify(&token).is_err());
    }

    #[test]
    fn test_unknown_role_rejected() {
        let config = config("test-secret-that-is-long-enough-for-hmac");
        let now = chrono::Utc::now().timestamp();
        let token = sign(
            &config,
            &serde_json::json!({
                "sub": 1, "role": "superuser", "exp": now + 300, "iat": now, "jti": "x"
            }),
        );
        assert!(config.verify(&token).is_err());
    }

    #[test]
    fn test_foreign_secret_rejected() {
        let token = config("secret-alpha-secret-alpha-secret-alpha")
            .issue(1, Role::Influencer)
            .unwrap();
        assert!(config("secret-bravo-secret-bravo-secret-bravo")
            .verify(&token.token)
            .is_err());
    }
}
