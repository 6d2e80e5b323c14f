//! HS256 bearer tokens carrying the caller's user id.

use axum::http::{header::AUTHORIZATION, HeaderMap};
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::Utc;
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;

use crate::constants::JWT_ALGORITHM;
use crate::error::AuthError;

type HmacSha256 = Hmac<Sha256>;
const MAX_TOKEN_LEN: usize = 4096;

#[derive(Debug, Serialize, Deserialize)]
struct TokenHeader {
    alg: String,
    #[serde(default)]
    typ: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub id: String,
    #[serde(default)]
    pub exp: Option<i64>,
}

/// Authenticated caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthUser {
    pub id: String,
}

fn sign(secret: &[u8], signing_input: &str) -> Result<Vec<u8>, AuthError> {
    let mut mac = HmacSha256::new_from_slice(secret).map_err(|_| AuthError::InvalidToken)?;
    mac.update(signing_input.as_bytes());
    Ok(mac.finalize().into_bytes().to_vec())
}

pub fn issue_token(user_id: &str, secret: &str, ttl: chrono::Duration) -> Result<String, AuthError> {
    let header = TokenHeader {
        alg: JWT_ALGORITHM.to_string(),
        typ: Some("JWT".to_string()),
    };
    let claims = Claims {
        id: user_id.to_string(),
        exp: Some((Utc::now() + ttl).timestamp()),
    };

    let header_part =
        URL_SAFE_NO_PAD.encode(serde_json::to_vec(&header).map_err(|_| AuthError::InvalidToken)?);
    let claims_part =
        URL_SAFE_NO_PAD.encode(serde_json::to_vec(&claims).map_err(|_| AuthError::InvalidToken)?);
    let signing_input = format!("{}.{}", header_part, claims_part);
    let signature = URL_SAFE_NO_PAD.encode(sign(secret.as_bytes(), &signing_input)?);

    Ok(format!("{}.{}", signing_input, signature))
}

pub fn verify_token(token: &str, secret: &str) -> Result<Claims, AuthError> {
    if token.len() > MAX_TOKEN_LEN {
        return Err(AuthError::InvalidToken);
    }
    let mut parts = token.split('.');
    let (Some(header_part), Some(claims_part), Some(sig_part), None) =
        (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        return Err(AuthError::InvalidToken);
    };

    let header: TokenHeader = URL_SAFE_NO_PAD
        .decode(header_part)
        .ok()
        .and_then(|bytes| serde_json::from_slice(&bytes).ok())
        .ok_or(AuthError::InvalidToken)?;
    if header.alg != JWT_ALGORITHM {
        return Err(AuthError::InvalidToken);
    }

    let expected = URL_SAFE_NO_PAD.decode(sig_part).map_err(|_| AuthError::InvalidToken)?;
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes()).map_err(|_| AuthError::InvalidToken)?;
    mac.update(header_part.as_bytes());
    mac.update(b".");
    mac.update(claims_part.as_bytes());
    mac.verify_slice(&expected).map_err(|_| AuthError::InvalidToken)?;

    let claims: Claims = URL_SAFE_NO_PAD
        .decode(claims_part)
        .ok()
        .and_then(|bytes| serde_json::from_slice(&bytes).ok())
        .ok_or(AuthError::InvalidToken)?;
    if claims.id.is_empty() {
        return Err(AuthError::InvalidToken);
    }
    if let Some(exp) = claims.exp {
        if exp <= Utc::now().timestamp() {
            return Err(AuthError::Expired);
        }
    }

    Ok(claims)
}

/// Resolve the caller from an `Authorization: Bearer <token>` header.
pub fn authenticate(headers: &HeaderMap, secret: &str) -> Result<AuthUser, AuthError> {
    let token = headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or(AuthError::MissingToken)?;

    let claims = verify_token(token, secret)?;
    Ok(AuthUser { id: claims.id })
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    const SECRET: &str = "test-secret";

    #[test]
    fn test_issue_then_verify() {
        let token = issue_token("u1", SECRET, chrono::Duration::days(1)).unwrap();
        let claims = verify_token(&token, SECRET).unwrap();
        assert_eq!(claims.id, "u1");
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let token = issue_token("u1", SECRET, chrono::Duration::days(1)).unwrap();
        assert_eq!(verify_token(&token, "other"), Err(AuthError::InvalidToken));
    }

    #[test]
    fn test_expired_rejected() {
        let token = issue_token("u1", SECRET, chrono::Duration::seconds(-10)).unwrap();
        assert_eq!(verify_token(&token, SECRET), Err(AuthError::Expired));
    }

    #[test]
    fn test_tampered_claims_rejected() {
        let token = issue_token("u1", SECRET, chrono::Duration::days(1)).unwrap();
        let forged = URL_SAFE_NO_PAD.encode(br#"{"id":"u2"}"#);
        let parts: Vec<&str> = token.split('.').collect();
        let tampered = format!("{}.{}.{}", parts[0], forged, parts[2]);
        assert_eq!(verify_token(&tampered, SECRET), Err(AuthError::InvalidToken));
    }

    #[test]
    fn test_authenticate_header() {
        let mut headers = HeaderMap::new();
        assert_eq!(authenticate(&headers, SECRET), Err(AuthError::MissingToken));

        headers.insert(AUTHORIZATION, HeaderValue::from_static("Basic abc"));
        assert_eq!(authenticate(&headers, SECRET), Err(AuthError::MissingToken));

        let token = issue_token("u9", SECRET, chrono::Duration::days(1)).unwrap();
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", token)).unwrap(),
        );
        assert_eq!(authenticate(&headers, SECRET).unwrap().id, "u9");
    }
}
