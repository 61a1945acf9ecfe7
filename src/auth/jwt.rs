use std::time::Duration;

use axum::extract::FromRef;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use time::{Duration as TimeDuration, OffsetDateTime};
use tracing::debug;

use crate::auth::error::AuthError;
use crate::config::JwtConfig;
use crate::state::AppState;

/// JWT payload used for authentication.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: i64,         // user ID
    pub username: String, // username at issue time
    pub iat: usize,       // issued at (unix timestamp)
    pub exp: usize,       // expires at (unix timestamp)
    pub iss: String,      // issuer
    pub aud: String,      // audience
}

/// Holds JWT signing and verification keys with config data.
#[derive(Clone)]
pub struct JwtKeys {
    pub encoding: EncodingKey,
    pub decoding: DecodingKey,
    pub issuer: String,
    pub audience: String,
    pub ttl: Duration,
}

impl FromRef<AppState> for JwtKeys {
    fn from_ref(state: &AppState) -> Self {
        Self::from_config(&state.config.jwt)
    }
}

impl JwtKeys {
    pub fn from_config(cfg: &JwtConfig) -> Self {
        Self {
            encoding: EncodingKey::from_secret(cfg.secret.as_bytes()),
            decoding: DecodingKey::from_secret(cfg.secret.as_bytes()),
            issuer: cfg.issuer.clone(),
            audience: cfg.audience.clone(),
            ttl: Duration::from_secs((cfg.ttl_minutes as u64) * 60),
        }
    }

    pub fn sign(&self, user_id: i64, username: &str) -> Result<String, AuthError> {
        let now = OffsetDateTime::now_utc();
        let exp = now + TimeDuration::seconds(self.ttl.as_secs() as i64);
        let claims = Claims {
            sub: user_id,
            username: username.to_string(),
            iat: now.unix_timestamp() as usize,
            exp: exp.unix_timestamp() as usize,
            iss: self.issuer.clone(),
            aud: self.audience.clone(),
        };
        let token = encode(&Header::default(), &claims, &self.encoding)
            .map_err(|e| AuthError::Internal(e.to_string()))?;
        debug!(user_id, "jwt signed");
        Ok(token)
    }

    /// Fails closed: missing, malformed, tampered, expired, or mis-addressed
    /// tokens all collapse into `Unauthorized`.
    pub fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        let mut validation = Validation::default();
        validation.leeway = 0;
        validation.set_audience(std::slice::from_ref(&self.audience));
        validation.set_issuer(std::slice::from_ref(&self.issuer));
        let data = decode::<Claims>(token, &self.decoding, &validation).map_err(|e| {
            debug!(error = %e, "jwt rejected");
            AuthError::Unauthorized
        })?;
        Ok(data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_keys(secret: &str) -> JwtKeys {
        let cfg = JwtConfig {
            secret: secret.into(),
            issuer: "test-issuer".into(),
            audience: "test-aud".into(),
            ttl_minutes: 5,
        };
        JwtKeys::from_config(&cfg)
    }

    #[test]
    fn sign_and_verify_roundtrip() {
        let keys = make_keys("dev-secret");
        let token = keys.sign(1, "alice").expect("sign");
        let claims = keys.verify(&token).expect("verify token");
        assert_eq!(claims.sub, 1);
        assert_eq!(claims.username, "alice");
        assert_eq!(claims.iss, "test-issuer");
        assert_eq!(claims.aud, "test-aud");
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn verify_rejects_garbage() {
        let keys = make_keys("dev-secret");
        assert!(matches!(
            keys.verify("not.a.jwt").unwrap_err(),
            AuthError::Unauthorized
        ));
        assert!(matches!(keys.verify("").unwrap_err(), AuthError::Unauthorized));
    }

    #[test]
    fn verify_rejects_tampered_token() {
        let keys = make_keys("dev-secret");
        let token = keys.sign(7, "mallory").expect("sign");
        let mut tampered = token.clone();
        tampered.pop();
        tampered.push(if token.ends_with('A') { 'B' } else { 'A' });
        assert!(keys.verify(&tampered).is_err());
    }

    #[test]
    fn verify_rejects_wrong_secret() {
        let good = make_keys("secret-one");
        let bad = make_keys("secret-two");
        let token = good.sign(2, "bob").expect("sign");
        assert!(bad.verify(&token).is_err());
    }

    #[test]
    fn verify_rejects_wrong_issuer_or_audience() {
        let signer = make_keys("same-secret");
        let mut other = make_keys("same-secret");
        other.issuer = "other-issuer".into();
        other.audience = "other-aud".into();
        let token = signer.sign(3, "carol").expect("sign");
        assert!(other.verify(&token).is_err());
    }

    #[test]
    fn token_expires_after_ttl() {
        let mut keys = make_keys("dev-secret");
        keys.ttl = Duration::from_secs(1);
        let token = keys.sign(4, "dave").expect("sign");
        assert!(keys.verify(&token).is_ok());
        std::thread::sleep(Duration::from_secs(2));
        assert!(matches!(
            keys.verify(&token).unwrap_err(),
            AuthError::Unauthorized
        ));
    }
}
