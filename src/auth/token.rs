//! Signed bearer tokens.
//!
//! Tokens are compact JWS (JWT) strings: `header.payload.signature`, each
//! segment base64url without padding, signed with an HMAC over the first two
//! segments using the shared secret.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use chrono::{DateTime, SecondsFormat, Utc};
use ring::hmac;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sha2::{Digest, Sha256};
use std::fmt;

/// HMAC algorithms accepted in the token header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SigningAlgorithm {
    #[default]
    HS256,
    HS384,
    HS512,
}

impl SigningAlgorithm {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "HS256" => Some(Self::HS256),
            "HS384" => Some(Self::HS384),
            "HS512" => Some(Self::HS512),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::HS256 => "HS256",
            Self::HS384 => "HS384",
            Self::HS512 => "HS512",
        }
    }

    fn hmac(&self) -> hmac::Algorithm {
        match self {
            Self::HS256 => hmac::HMAC_SHA256,
            Self::HS384 => hmac::HMAC_SHA384,
            Self::HS512 => hmac::HMAC_SHA512,
        }
    }
}

/// Secret shared by the token issuer and the verifier.
#[derive(Clone)]
pub struct SharedSecret(Vec<u8>);

impl SharedSecret {
    pub fn new(secret: impl AsRef<[u8]>) -> Self {
        Self(secret.as_ref().to_vec())
    }

    fn key(&self, algorithm: SigningAlgorithm) -> hmac::Key {
        hmac::Key::new(algorithm.hmac(), &self.0)
    }
}

impl fmt::Debug for SharedSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SharedSecret(<redacted>)")
    }
}

/// Subject identifier carried in `userId`; numbers and strings never compare equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SubjectId {
    Numeric(i64),
    Text(String),
}

impl fmt::Display for SubjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SubjectId::Numeric(id) => write!(f, "{}", id),
            SubjectId::Text(id) => f.write_str(id),
        }
    }
}

impl From<i64> for SubjectId {
    fn from(id: i64) -> Self {
        SubjectId::Numeric(id)
    }
}

impl From<&str> for SubjectId {
    fn from(id: &str) -> Self {
        SubjectId::Text(id.to_string())
    }
}

/// Decoded token payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenClaims {
    pub user_id: SubjectId,
    /// One-way hash of upstream data; opaque to the verifier
    pub auth_token: String,
    /// ISO-8601 issuance time, compared as a string
    pub time_stamp: String,
}

impl TokenClaims {
    /// Claims for `user_id`, hashing `upstream_data` and stamping the current time.
    pub fn new(user_id: impl Into<SubjectId>, upstream_data: &str) -> Self {
        Self::issued_at(user_id, upstream_data, Utc::now())
    }

    pub fn issued_at(user_id: impl Into<SubjectId>, upstream_data: &str, at: DateTime<Utc>) -> Self {
        Self {
            user_id: user_id.into(),
            auth_token: derive_auth_token(upstream_data),
            time_stamp: iso_timestamp(at),
        }
    }
}

/// SHA-256 hex digest used as the opaque `authToken` claim.
pub fn derive_auth_token(data: &str) -> String {
    hex::encode(Sha256::digest(data.as_bytes()))
}

/// `2023-10-01T12:00:00.000Z` style timestamp.
pub fn iso_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

#[derive(Debug, Serialize, Deserialize)]
struct TokenHeader {
    alg: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    typ: Option<String>,
}

/// Why a token could not be decoded. Internal detail only.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TokenError {
    #[error("token is empty")]
    Empty,
    #[error("expected 3 segments, found {0}")]
    Segments(usize),
    #[error("{0} segment is not valid base64url")]
    Encoding(&'static str),
    #[error("header is not valid JSON: {0}")]
    Header(String),
    #[error("unsupported algorithm '{0}'")]
    UnsupportedAlgorithm(String),
    #[error("signature mismatch")]
    Signature,
    #[error("payload is not valid claims: {0}")]
    Claims(String),
}

/// Sign `claims` into a token. An `iat` claim (epoch seconds) is added.
pub fn issue_token(
    claims: &TokenClaims,
    secret: &SharedSecret,
    algorithm: SigningAlgorithm,
) -> Result<String, TokenError> {
    let header = TokenHeader {
        alg: algorithm.as_str().to_string(),
        typ: Some("JWT".to_string()),
    };
    let mut payload =
        serde_json::to_value(claims).map_err(|e| TokenError::Claims(e.to_string()))?;
    if let Value::Object(fields) = &mut payload {
        fields.insert("iat".to_string(), Value::from(Utc::now().timestamp()));
    }

    let header_json = serde_json::to_vec(&header).map_err(|e| TokenError::Header(e.to_string()))?;
    let payload_json = serde_json::to_vec(&payload).map_err(|e| TokenError::Claims(e.to_string()))?;
    let signing_input = format!(
        "{}.{}",
        URL_SAFE_NO_PAD.encode(header_json),
        URL_SAFE_NO_PAD.encode(payload_json)
    );
    let tag = hmac::sign(&secret.key(algorithm), signing_input.as_bytes());
    Ok(format!("{}.{}", signing_input, URL_SAFE_NO_PAD.encode(tag.as_ref())))
}

/// Check the structure and signature of `token`, then decode its claims.
pub fn decode_verified(token: &str, secret: &SharedSecret) -> Result<TokenClaims, TokenError> {
    if token.is_empty() {
        return Err(TokenError::Empty);
    }
    let segments: Vec<&str> = token.split('.').collect();
    let [header_b64, payload_b64, signature_b64] = segments[..] else {
        return Err(TokenError::Segments(segments.len()));
    };

    let header_bytes = URL_SAFE_NO_PAD
        .decode(header_b64)
        .map_err(|_| TokenError::Encoding("header"))?;
    let header: TokenHeader =
        serde_json::from_slice(&header_bytes).map_err(|e| TokenError::Header(e.to_string()))?;
    let algorithm = SigningAlgorithm::from_name(&header.alg)
        .ok_or_else(|| TokenError::UnsupportedAlgorithm(header.alg.clone()))?;

    let signature = URL_SAFE_NO_PAD
        .decode(signature_b64)
        .map_err(|_| TokenError::Encoding("signature"))?;
    let signing_input = &token[..header_b64.len() + 1 + payload_b64.len()];
    hmac::verify(&secret.key(algorithm), signing_input.as_bytes(), &signature)
        .map_err(|_| TokenError::Signature)?;

    let payload = URL_SAFE_NO_PAD
        .decode(payload_b64)
        .map_err(|_| TokenError::Encoding("payload"))?;
    serde_json::from_slice(&payload).map_err(|e| TokenError::Claims(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn secret() -> SharedSecret {
        SharedSecret::new("test-secret")
    }

    fn claims() -> TokenClaims {
        let at = Utc.with_ymd_and_hms(2023, 10, 1, 12, 0, 0).unwrap();
        TokenClaims::issued_at(1_i64, "a hash data", at)
    }

    #[test]
    fn auth_token_is_sha256_hex() {
        assert_eq!(
            derive_auth_token("abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn timestamp_has_millis_and_z() {
        assert_eq!(claims().time_stamp, "2023-10-01T12:00:00.000Z");
    }

    #[test]
    fn issued_token_decodes_with_same_secret() {
        for algorithm in [SigningAlgorithm::HS256, SigningAlgorithm::HS384, SigningAlgorithm::HS512] {
            let token = issue_token(&claims(), &secret(), algorithm).unwrap();
            assert_eq!(token.split('.').count(), 3);
            assert_eq!(decode_verified(&token, &secret()).unwrap(), claims());
        }
    }

    #[test]
    fn other_secret_fails_signature() {
        let token = issue_token(&claims(), &SharedSecret::new("other"), SigningAlgorithm::HS256)
            .unwrap();
        assert_eq!(decode_verified(&token, &secret()), Err(TokenError::Signature));
    }

    #[test]
    fn tampered_payload_fails_signature() {
        let token = issue_token(&claims(), &secret(), SigningAlgorithm::HS256).unwrap();
        let parts: Vec<&str> = token.split('.').collect();
        let mut forged = claims();
        forged.user_id = SubjectId::Numeric(2);
        let forged_payload = URL_SAFE_NO_PAD.encode(serde_json::to_vec(&forged).unwrap());
        let forged_token = format!("{}.{}.{}", parts[0], forged_payload, parts[2]);
        assert_eq!(decode_verified(&forged_token, &secret()), Err(TokenError::Signature));
    }

    #[test]
    fn unsigned_algorithm_is_rejected() {
        let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"none","typ":"JWT"}"#);
        let payload = URL_SAFE_NO_PAD.encode(serde_json::to_vec(&claims()).unwrap());
        let token = format!("{}.{}.", header, payload);
        assert_eq!(
            decode_verified(&token, &secret()),
            Err(TokenError::UnsupportedAlgorithm("none".to_string()))
        );
    }

    #[test]
    fn structural_garbage_is_rejected() {
        assert_eq!(decode_verified("", &secret()), Err(TokenError::Empty));
        assert_eq!(decode_verified("abc", &secret()), Err(TokenError::Segments(1)));
        assert_eq!(decode_verified("a.b.c.d", &secret()), Err(TokenError::Segments(4)));
        assert_eq!(
            decode_verified("!!.e30.AA", &secret()),
            Err(TokenError::Encoding("header"))
        );
    }

    #[test]
    fn signed_payload_without_claims_is_rejected() {
        let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256"}"#);
        let payload = URL_SAFE_NO_PAD.encode(br#"{"sub":"someone"}"#);
        let input = format!("{}.{}", header, payload);
        let tag = hmac::sign(&secret().key(SigningAlgorithm::HS256), input.as_bytes());
        let token = format!("{}.{}", input, URL_SAFE_NO_PAD.encode(tag.as_ref()));
        assert!(matches!(
            decode_verified(&token, &secret()),
            Err(TokenError::Claims(_))
        ));
    }

    #[test]
    fn subject_ids_keep_their_json_type() {
        let numeric: SubjectId = serde_json::from_str("1").unwrap();
        let text: SubjectId = serde_json::from_str("\"1\"").unwrap();
        assert_eq!(numeric, SubjectId::Numeric(1));
        assert_eq!(text, SubjectId::Text("1".to_string()));
        assert_ne!(numeric, text);
    }

    #[test]
    fn secret_debug_is_redacted() {
        assert_eq!(format!("{:?}", secret()), "SharedSecret(<redacted>)");
    }
}
