use anyhow::Result;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::domain::entities::user::{AuthToken, Session};

const PURPOSE_SESSION: &str = "session";
const PURPOSE_RESET: &str = "password_reset";

/// Default reset-token lifetime, in seconds.
pub const DEFAULT_RESET_TOKEN_TTL_SECS: i64 = 1800;

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: String,
    purpose: String,
    exp: i64,
    iat: i64,
}

/// Issues and verifies the two kinds of signed tokens the system uses:
/// session tokens and password-reset tokens. The `purpose` claim keeps
/// them from being interchangeable. Verification fails closed: anything
/// malformed, tampered with, expired, or carrying the wrong purpose
/// yields no account at all.
pub struct TokenService {
    secret: String,
    reset_ttl: Duration,
    session_ttl: Duration,
    remember_ttl: Duration,
}

impl TokenService {
    pub fn new(
        secret: String,
        reset_ttl: Duration,
        session_ttl: Duration,
        remember_ttl: Duration,
    ) -> Self {
        Self {
            secret,
            reset_ttl,
            session_ttl,
            remember_ttl,
        }
    }

    fn issue(&self, user_id: i64, purpose: &str, ttl: Duration) -> Result<AuthToken> {
        let now = Utc::now();
        let expires_at = now + ttl;
        let claims = Claims {
            sub: user_id.to_string(),
            purpose: purpose.to_string(),
            exp: expires_at.timestamp(),
            iat: now.timestamp(),
        };

        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )?;

        Ok(AuthToken { token, expires_at })
    }

    fn verify(&self, token: &str, purpose: &str) -> Option<i64> {
        let mut validation = Validation::default();
        validation.leeway = 0;

        let data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &validation,
        )
        .ok()?;

        if data.claims.purpose != purpose {
            return None;
        }
        data.claims.sub.parse::<i64>().ok()
    }

    pub fn issue_session(&self, user_id: i64, remember: bool) -> Result<AuthToken> {
        let ttl = if remember {
            self.remember_ttl
        } else {
            self.session_ttl
        };
        self.issue(user_id, PURPOSE_SESSION, ttl)
    }

    pub fn verify_session(&self, token: &str) -> Option<Session> {
        self.verify(token, PURPOSE_SESSION)
            .map(|user_id| Session { user_id })
    }

    pub fn issue_reset(&self, user_id: i64) -> Result<AuthToken> {
        self.issue(user_id, PURPOSE_RESET, self.reset_ttl)
    }

    pub fn verify_reset(&self, token: &str) -> Option<i64> {
        self.verify(token, PURPOSE_RESET)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> TokenService {
        TokenService::new(
            "test-secret".to_string(),
            Duration::seconds(DEFAULT_RESET_TOKEN_TTL_SECS),
            Duration::hours(24),
            Duration::days(30),
        )
    }

    #[test]
    fn session_token_roundtrip() {
        let svc = service();
        let token = svc.issue_session(7, false).unwrap();
        assert_eq!(svc.verify_session(&token.token), Some(Session { user_id: 7 }));
    }

    #[test]
    fn reset_token_roundtrip() {
        let svc = service();
        let token = svc.issue_reset(42).unwrap();
        assert_eq!(svc.verify_reset(&token.token), Some(42));
    }

    #[test]
    fn purposes_are_not_interchangeable() {
        let svc = service();
        let reset = svc.issue_reset(1).unwrap();
        let session = svc.issue_session(1, false).unwrap();
        assert_eq!(svc.verify_session(&reset.token), None);
        assert_eq!(svc.verify_reset(&session.token), None);
    }

    #[test]
    fn expired_token_is_rejected() {
        let svc = TokenService::new(
            "test-secret".to_string(),
            Duration::seconds(-120),
            Duration::hours(24),
            Duration::days(30),
        );
        let token = svc.issue_reset(5).unwrap();
        assert_eq!(svc.verify_reset(&token.token), None);
    }

    #[test]
    fn tampered_token_is_rejected() {
        let svc = service();
        let token = svc.issue_reset(5).unwrap();
        let mut tampered = token.token.clone();
        tampered.pop();
        tampered.push('A');
        assert_eq!(svc.verify_reset(&tampered), None);
    }

    #[test]
    fn token_signed_with_other_secret_is_rejected() {
        let svc = service();
        let other = TokenService::new(
            "other-secret".to_string(),
            Duration::seconds(DEFAULT_RESET_TOKEN_TTL_SECS),
            Duration::hours(24),
            Duration::days(30),
        );
        let token = other.issue_reset(5).unwrap();
        assert_eq!(svc.verify_reset(&token.token), None);
    }

    #[test]
    fn garbage_is_rejected() {
        let svc = service();
        assert_eq!(svc.verify_reset("not-a-token"), None);
        assert_eq!(svc.verify_session(""), None);
    }

    #[test]
    fn remember_extends_expiry() {
        let svc = service();
        let short = svc.issue_session(1, false).unwrap();
        let long = svc.issue_session(1, true).unwrap();
        assert!(long.expires_at > short.expires_at);
    }
}
