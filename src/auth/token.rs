use anyhow::{Context, Result};
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::debug;

use crate::config::config_model::Jwt;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TokenError {
    #[error("missing bearer token")]
    MissingToken,
    #[error("invalid token")]
    InvalidSignature,
    #[error("token has expired")]
    Expired,
    #[error("token has no subject")]
    MissingSubject,
    #[error("token subject does not match any user")]
    UnknownSubject,
}

/// Caller-supplied claims. `sub` names the user; anything else rides along in `extra`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Claims {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Claims {
    pub fn for_subject(subject: impl Into<String>) -> Self {
        Self {
            sub: Some(subject.into()),
            extra: Map::new(),
        }
    }
}

/// Claims as they travel inside a signed token.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TokenClaims {
    #[serde(flatten)]
    pub claims: Claims,
    pub iat: i64,
    pub exp: i64,
}

impl TokenClaims {
    pub fn subject(&self) -> &str {
        self.claims.sub.as_deref().unwrap_or_default()
    }
}

/// Signs and verifies bearer tokens with a shared secret. Holds no mutable state;
/// the clock is a parameter of the `_at` variants.
#[derive(Clone)]
pub struct TokenIssuer {
    algorithm: Algorithm,
    ttl: Duration,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl TokenIssuer {
    pub fn new(config: &Jwt) -> Self {
        let mut validation = Validation::new(config.algorithm);
        // Expiry is checked against the caller's clock with zero leeway.
        validation.validate_exp = false;
        validation.validate_aud = false;
        validation.set_required_spec_claims(&["exp"]);

        Self {
            algorithm: config.algorithm,
            ttl: Duration::minutes(config.ttl_minutes),
            encoding_key: EncodingKey::from_secret(config.secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.secret.as_bytes()),
            validation,
        }
    }

    pub fn ttl_seconds(&self) -> i64 {
        self.ttl.num_seconds()
    }

    pub fn issue(&self, claims: Claims) -> Result<String> {
        self.issue_at(claims, Utc::now())
    }

    pub fn issue_at(&self, claims: Claims, now: DateTime<Utc>) -> Result<String> {
        let token_claims = TokenClaims {
            claims,
            iat: now.timestamp(),
            exp: (now + self.ttl).timestamp(),
        };

        encode(&Header::new(self.algorithm), &token_claims, &self.encoding_key)
            .context("failed to sign token")
    }

    pub fn verify(&self, token: &str) -> Result<TokenClaims, TokenError> {
        self.verify_at(token, Utc::now())
    }

    pub fn verify_at(&self, token: &str, now: DateTime<Utc>) -> Result<TokenClaims, TokenError> {
        let token_data = decode::<TokenClaims>(token, &self.decoding_key, &self.validation)
            .map_err(|err| {
                debug!(error = %err, "token: rejected token");
                TokenError::InvalidSignature
            })?;

        let token_claims = token_data.claims;
        if token_claims.exp < now.timestamp() {
            return Err(TokenError::Expired);
        }

        match token_claims.claims.sub.as_deref() {
            Some(subject) if !subject.trim().is_empty() => Ok(token_claims),
            _ => Err(TokenError::MissingSubject),
        }
    }
}
