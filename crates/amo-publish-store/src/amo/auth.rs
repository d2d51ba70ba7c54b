//! JWT credentials for the AMO API
//!
//! Every run signs a fresh token with the API key pair from the AMO
//! developer hub. See
//! <https://addons-server.readthedocs.io/en/latest/topics/api/auth.html#create-a-jwt-for-each-request>.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{PublishError, Result};

/// Lifetime of a signed token
pub const TOKEN_LIFETIME_SECS: i64 = 5 * 60;

/// Scheme used in the Authorization header
const AUTH_SCHEME: &str = "JWT";

/// JWT claims for the AMO API
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub iss: String,
    pub jti: String,
    pub iat: i64,
    pub exp: i64,
}

/// Signed, short-lived proof of identity
#[derive(Clone)]
pub struct Credential {
    token: String,
    issuer: String,
    expires_at: DateTime<Utc>,
}

impl Credential {
    /// The signed token
    pub fn token(&self) -> &str {
        &self.token
    }

    /// Issuer the token was signed for
    pub fn issuer(&self) -> &str {
        &self.issuer
    }

    /// Expiration time of the token
    pub fn expires_at(&self) -> DateTime<Utc> {
        self.expires_at
    }

    /// Value for the `Authorization` header
    pub fn authorization(&self) -> String {
        format!("{} {}", AUTH_SCHEME, self.token)
    }
}

impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credential")
            .field("issuer", &self.issuer)
            .field("expires_at", &self.expires_at)
            .field("token", &"<redacted>")
            .finish()
    }
}

/// Sign a new credential for `issuer` with `secret`
pub fn issue_credential(issuer: &str, secret: &str) -> Result<Credential> {
    issue_credential_at(issuer, secret, Utc::now())
}

pub(crate) fn issue_credential_at(
    issuer: &str,
    secret: &str,
    now: DateTime<Utc>,
) -> Result<Credential> {
    if issuer.is_empty() {
        return Err(PublishError::invalid_input("JWT issuer must not be empty"));
    }
    if secret.is_empty() {
        return Err(PublishError::invalid_input("JWT secret must not be empty"));
    }

    info!("Start to generate JWT token.");

    // Drop sub-second precision
    let issued_at = now.timestamp();
    let expires_at = issued_at + TOKEN_LIFETIME_SECS;

    let claims = Claims {
        iss: issuer.to_string(),
        jti: uuid::Uuid::new_v4().to_string(),
        iat: issued_at,
        exp: expires_at,
    };

    let token = encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )?;

    info!("JWT token generated.");

    Ok(Credential {
        token,
        issuer: issuer.to_string(),
        expires_at: DateTime::from_timestamp(expires_at, 0)
            .unwrap_or_else(|| now + Duration::seconds(TOKEN_LIFETIME_SECS)),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{decode, DecodingKey, Validation};

    const ISSUER: &str = "user:12345:67";
    const SECRET: &str = "test-jwt-secret";

    fn decode_claims(token: &str, check_exp: bool) -> Claims {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[ISSUER]);
        validation.validate_exp = check_exp;
        decode::<Claims>(token, &DecodingKey::from_secret(SECRET.as_bytes()), &validation)
            .unwrap()
            .claims
    }

    #[test]
    fn test_issue_credential_claims() {
        let credential = issue_credential(ISSUER, SECRET).unwrap();
        let claims = decode_claims(credential.token(), true);

        assert_eq!(claims.iss, ISSUER);
        assert_eq!(claims.exp - claims.iat, 300);
        assert!(!claims.jti.is_empty());
        assert_eq!(credential.issuer(), ISSUER);
    }

    #[test]
    fn test_issued_at_truncates_to_seconds() {
        let now = DateTime::from_timestamp(42, 999_000_000).unwrap();
        let credential = issue_credential_at(ISSUER, SECRET, now).unwrap();
        let claims = decode_claims(credential.token(), false);

        assert_eq!(claims.iat, 42);
        assert_eq!(claims.exp, 342);
        assert_eq!(credential.expires_at().timestamp(), 342);
    }

    #[test]
    fn test_nonce_differs_between_calls() {
        let first = decode_claims(issue_credential(ISSUER, SECRET).unwrap().token(), true);
        let second = decode_claims(issue_credential(ISSUER, SECRET).unwrap().token(), true);
        assert_ne!(first.jti, second.jti);
    }

    #[test]
    fn test_wrong_secret_is_rejected() {
        let credential = issue_credential(ISSUER, SECRET).unwrap();
        let validation = Validation::new(Algorithm::HS256);
        let result = decode::<Claims>(
            credential.token(),
            &DecodingKey::from_secret(b"other-secret"),
            &validation,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_empty_inputs_rejected() {
        assert!(matches!(
            issue_credential("", SECRET),
            Err(PublishError::InvalidInput(_))
        ));
        assert!(matches!(
            issue_credential(ISSUER, ""),
            Err(PublishError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_authorization_header_and_debug() {
        let credential = issue_credential(ISSUER, SECRET).unwrap();
        assert_eq!(
            credential.authorization(),
            format!("JWT {}", credential.token())
        );
        assert!(!format!("{:?}", credential).contains(credential.token()));
    }
}
