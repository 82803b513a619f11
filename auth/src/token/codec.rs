use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;
use jsonwebtoken::decode;
use jsonwebtoken::encode;
use jsonwebtoken::Algorithm;
use jsonwebtoken::DecodingKey;
use jsonwebtoken::EncodingKey;
use jsonwebtoken::Header;
use jsonwebtoken::Validation;

use super::claims::Claims;
use super::claims::Identity;
use super::claims::Role;
use super::errors::TokenError;

/// Token lifetime. Fixed at issue time, not configurable.
pub const TOKEN_TTL_HOURS: i64 = 24;

/// Issues and verifies bearer tokens.
///
/// Uses HS256 (HMAC with SHA-256) with a single shared secret. Verification
/// is pure: it reads nothing but the token, the secret and the clock passed
/// in by the caller, so there is no way to revoke an issued token before it
/// expires.
pub struct TokenCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    algorithm: Algorithm,
}

impl TokenCodec {
    /// Create a new codec from the shared secret.
    ///
    /// The secret should be at least 256 bits (32 bytes) for HS256 and
    /// supplied through process configuration, never hardcoded.
    pub fn new(secret: &[u8]) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            algorithm: Algorithm::HS256,
        }
    }

    /// Issue a signed token for `subject` expiring `TOKEN_TTL_HOURS` after
    /// `now`.
    pub fn issue(
        &self,
        subject: &str,
        role: Role,
        now: DateTime<Utc>,
    ) -> Result<String, TokenError> {
        let claims = Claims {
            sub: subject.to_string(),
            role,
            iat: now.timestamp(),
            exp: (now + Duration::hours(TOKEN_TTL_HOURS)).timestamp(),
        };

        encode(&Header::new(self.algorithm), &claims, &self.encoding_key)
            .map_err(|e| TokenError::EncodingFailed(e.to_string()))
    }

    /// Verify a token against the shared secret and the supplied clock.
    ///
    /// Rejects on bad signature, malformed payload, missing subject, or
    /// `exp <= now`. Expiry is compared here rather than inside
    /// jsonwebtoken: the library's own check tolerates 60 seconds of leeway
    /// and accepts a token at the exact expiry instant, and this contract
    /// allows neither.
    pub fn verify(&self, token: &str, now: DateTime<Utc>) -> Result<Identity, TokenError> {
        let mut validation = Validation::new(self.algorithm);
        validation.validate_exp = false;
        validation.required_spec_claims.clear();

        let data = decode::<Claims>(token, &self.decoding_key, &validation)
            .map_err(|e| TokenError::Malformed(e.to_string()))?;
        let claims = data.claims;

        if claims.sub.is_empty() {
            return Err(TokenError::MissingSubject);
        }
        if claims.exp <= now.timestamp() {
            return Err(TokenError::Expired);
        }

        Ok(Identity {
            subject: claims.sub,
            role: claims.role,
        })
    }
}
