//! JWT service for access token generation and validation
//!
//! Tokens are signed with a shared secret using one of the HMAC algorithms
//! and carry the user id in `sub` plus an absolute `exp`. Validation is
//! stateless: a token stays authoritative until it expires.

use anyhow::Result;
use jsonwebtoken::{
    Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode, errors::ErrorKind,
};
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};
use thiserror::Error;
use uuid::Uuid;

/// Default access token lifetime in minutes
pub const DEFAULT_ACCESS_TOKEN_EXPIRY_MINUTES: u64 = 30;

/// Longest accepted access token lifetime in seconds (one year)
pub const MAX_ACCESS_TOKEN_EXPIRY_SECS: u64 = 365 * 24 * 60 * 60;

/// JWT configuration
#[derive(Clone)]
pub struct JwtConfig {
    /// Shared secret used to sign and verify tokens
    pub secret: String,
    /// Signing algorithm, restricted to the HMAC family
    pub algorithm: Algorithm,
    /// Access token expiration time in seconds
    pub access_token_expiry: u64,
}

impl std::fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtConfig")
            .field("secret", &"<redacted>")
            .field("algorithm", &self.algorithm)
            .field("access_token_expiry", &self.access_token_expiry)
            .finish()
    }
}

impl JwtConfig {
    /// Create a new JwtConfig from environment variables
    ///
    /// # Environment Variables
    /// - `JWT_SECRET`: Shared signing secret (required)
    /// - `JWT_ALGORITHM`: `HS256`, `HS384` or `HS512` (default: `HS256`)
    /// - `JWT_ACCESS_TOKEN_EXPIRY_MINUTES`: Token lifetime in minutes (default: 30)
    pub fn from_env() -> Result<Self> {
        let secret = std::env::var("JWT_SECRET")
            .map_err(|_| anyhow::anyhow!("JWT_SECRET environment variable not set"))?;

        let algorithm = std::env::var("JWT_ALGORITHM").unwrap_or_else(|_| "HS256".to_string());
        let algorithm = parse_algorithm(&algorithm)?;

        let expiry_minutes = std::env::var("JWT_ACCESS_TOKEN_EXPIRY_MINUTES")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or(DEFAULT_ACCESS_TOKEN_EXPIRY_MINUTES);

        let expiry = expiry_minutes.checked_mul(60).ok_or_else(|| {
            anyhow::anyhow!("JWT_ACCESS_TOKEN_EXPIRY_MINUTES is out of range: {}", expiry_minutes)
        })?;

        Self::new(secret, algorithm, expiry)
    }

    /// Build a configuration, rejecting empty secrets and non-HMAC algorithms
    pub fn new(secret: String, algorithm: Algorithm, access_token_expiry: u64) -> Result<Self> {
        if secret.is_empty() {
            anyhow::bail!("JWT secret must not be empty");
        }

        if !matches!(algorithm, Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512) {
            anyhow::bail!("Unsupported JWT algorithm {:?}: expected HS256, HS384 or HS512", algorithm);
        }

        if access_token_expiry == 0 {
            anyhow::bail!("JWT access token expiry must be positive");
        }

        if access_token_expiry > MAX_ACCESS_TOKEN_EXPIRY_SECS {
            anyhow::bail!(
                "JWT access token expiry of {}s exceeds the maximum of {}s",
                access_token_expiry,
                MAX_ACCESS_TOKEN_EXPIRY_SECS
            );
        }

        Ok(JwtConfig {
            secret,
            algorithm,
            access_token_expiry,
        })
    }
}

fn parse_algorithm(value: &str) -> Result<Algorithm> {
    value
        .trim()
        .to_ascii_uppercase()
        .parse::<Algorithm>()
        .map_err(|e| anyhow::anyhow!("Invalid JWT_ALGORITHM {:?}: {}", value, e))
}

/// JWT claims structure
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// User ID
    pub sub: Uuid,
    /// Issued at time
    pub iat: u64,
    /// Expiration time
    pub exp: u64,
}

/// Reasons a presented token is rejected
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenError {
    /// Bad signature, malformed structure, wrong algorithm or missing claims
    #[error("invalid token")]
    InvalidToken,

    /// The expiry instant has passed
    #[error("token expired")]
    TokenExpired,
}

impl From<jsonwebtoken::errors::Error> for TokenError {
    fn from(error: jsonwebtoken::errors::Error) -> Self {
        match error.kind() {
            ErrorKind::ExpiredSignature => TokenError::TokenExpired,
            _ => TokenError::InvalidToken,
        }
    }
}

/// JWT service
#[derive(Clone)]
pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    config: JwtConfig,
}

impl JwtService {
    /// Initialize a new JWT service
    pub fn new(config: JwtConfig) -> Self {
        let encoding_key = EncodingKey::from_secret(config.secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.secret.as_bytes());

        let mut validation = Validation::new(config.algorithm);
        validation.validate_exp = true;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        JwtService {
            encoding_key,
            decoding_key,
            validation,
            config,
        }
    }

    /// Generate an access token for a user
    pub fn issue(&self, user_id: Uuid) -> Result<String> {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_err(|e| anyhow::anyhow!("Failed to get current time: {}", e))?
            .as_secs();

        let claims = Claims {
            sub: user_id,
            iat: now,
            exp: now
                .checked_add(self.config.access_token_expiry)
                .ok_or_else(|| anyhow::anyhow!("Token expiry overflows the clock"))?,
        };

        self.sign(&claims)
    }

    /// Sign arbitrary claims with the configured key and algorithm
    pub fn sign(&self, claims: &Claims) -> Result<String> {
        let token = encode(&Header::new(self.config.algorithm), claims, &self.encoding_key)?;
        Ok(token)
    }

    /// Validate a token and return the user id it was issued for
    pub fn verify(&self, token: &str) -> Result<Uuid, TokenError> {
        let token_data = decode::<Claims>(token, &self.decoding_key, &self.validation)?;
        Ok(token_data.claims.sub)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    const SECRET: &str = "test-secret-key-that-is-long-enough";

    fn service() -> JwtService {
        JwtService::new(JwtConfig::new(SECRET.to_string(), Algorithm::HS256, 900).unwrap())
    }

    fn unix_now() -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_secs()
    }

    #[test]
    fn test_issue_then_verify_returns_subject() {
        let service = service();
        let user_id = Uuid::new_v4();

        let token = service.issue(user_id).unwrap();
        assert_eq!(service.verify(&token), Ok(user_id));
    }

    #[test]
    fn test_expired_token_is_rejected() {
        let service = service();
        let now = unix_now();
        let claims = Claims {
            sub: Uuid::new_v4(),
            iat: now - 120,
            exp: now - 60,
        };

        let token = service.sign(&claims).unwrap();
        assert_eq!(service.verify(&token), Err(TokenError::TokenExpired));
    }

    #[test]
    fn test_token_signed_with_other_secret_is_invalid() {
        let other = JwtService::new(
            JwtConfig::new("another-secret-entirely".to_string(), Algorithm::HS256, 900).unwrap(),
        );
        let token = other.issue(Uuid::new_v4()).unwrap();

        assert_eq!(service().verify(&token), Err(TokenError::InvalidToken));
    }

    #[test]
    fn test_token_signed_with_other_algorithm_is_invalid() {
        let other =
            JwtService::new(JwtConfig::new(SECRET.to_string(), Algorithm::HS512, 900).unwrap());
        let token = other.issue(Uuid::new_v4()).unwrap();

        assert_eq!(service().verify(&token), Err(TokenError::InvalidToken));
    }

    #[test]
    fn test_malformed_token_is_invalid() {
        let service = service();
        assert_eq!(service.verify("not-a-valid-jwt"), Err(TokenError::InvalidToken));
        assert_eq!(service.verify(""), Err(TokenError::InvalidToken));
    }

    #[test]
    fn test_tampered_payload_is_invalid() {
        let service = service();
        let token = service.issue(Uuid::new_v4()).unwrap();
        let forged = service.issue(Uuid::new_v4()).unwrap();

        let mut parts: Vec<&str> = token.split('.').collect();
        let forged_parts: Vec<&str> = forged.split('.').collect();
        parts[1] = forged_parts[1];
        let spliced = parts.join(".");

        assert_eq!(service.verify(&spliced), Err(TokenError::InvalidToken));
    }

    #[test]
    fn test_config_rejects_empty_secret_and_asymmetric_algorithms() {
        assert!(JwtConfig::new(String::new(), Algorithm::HS256, 900).is_err());
        assert!(JwtConfig::new(SECRET.to_string(), Algorithm::RS256, 900).is_err());
        assert!(JwtConfig::new(SECRET.to_string(), Algorithm::HS256, 0).is_err());
    }

    #[test]
    fn test_config_bounds_token_lifetime() {
        assert!(JwtConfig::new(SECRET.to_string(), Algorithm::HS256, u64::MAX).is_err());
        assert!(
            JwtConfig::new(
                SECRET.to_string(),
                Algorithm::HS256,
                MAX_ACCESS_TOKEN_EXPIRY_SECS + 1
            )
            .is_err()
        );

        let longest = JwtService::new(
            JwtConfig::new(SECRET.to_string(), Algorithm::HS256, MAX_ACCESS_TOKEN_EXPIRY_SECS)
                .unwrap(),
        );
        let user_id = Uuid::new_v4();
        let token = longest.issue(user_id).unwrap();
        assert_eq!(longest.verify(&token), Ok(user_id));
    }

    #[test]
    #[serial]
    fn test_jwt_config_rejects_oversized_expiry_minutes() {
        unsafe {
            std::env::set_var("JWT_SECRET", SECRET);
            std::env::set_var("JWT_ACCESS_TOKEN_EXPIRY_MINUTES", u64::MAX.to_string());
        }

        assert!(JwtConfig::from_env().is_err());

        unsafe {
            std::env::set_var("JWT_ACCESS_TOKEN_EXPIRY_MINUTES", "1000000000");
        }

        assert!(JwtConfig::from_env().is_err());

        unsafe {
            std::env::remove_var("JWT_SECRET");
            std::env::remove_var("JWT_ACCESS_TOKEN_EXPIRY_MINUTES");
        }
    }

    #[test]
    fn test_config_debug_redacts_secret() {
        let config = JwtConfig::new(SECRET.to_string(), Algorithm::HS256, 900).unwrap();
        let rendered = format!("{:?}", config);
        assert!(!rendered.contains(SECRET));
        assert!(rendered.contains("<redacted>"));
    }

    #[test]
    #[serial]
    fn test_jwt_config_from_env() {
        unsafe {
            std::env::set_var("JWT_SECRET", SECRET);
            std::env::set_var("JWT_ALGORITHM", "hs384");
            std::env::set_var("JWT_ACCESS_TOKEN_EXPIRY_MINUTES", "5");
        }

        let config = JwtConfig::from_env().unwrap();
        assert_eq!(config.secret, SECRET);
        assert_eq!(config.algorithm, Algorithm::HS384);
        assert_eq!(config.access_token_expiry, 300);

        unsafe {
            std::env::remove_var("JWT_SECRET");
            std::env::remove_var("JWT_ALGORITHM");
            std::env::remove_var("JWT_ACCESS_TOKEN_EXPIRY_MINUTES");
        }
    }

    #[test]
    #[serial]
    fn test_jwt_config_requires_secret() {
        unsafe {
            std::env::remove_var("JWT_SECRET");
        }

        assert!(JwtConfig::from_env().is_err());
    }
}
