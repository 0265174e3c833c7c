//! Bearer credential verification against the reference identity.

use super::auth_errors::AuthenticationError;
use super::token::{decode_verified, SharedSecret, SubjectId, TokenClaims};
use crate::error::{FlowGraphError, FlowGraphResult};
use crate::store::read_json_array;
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::path::Path;
use uuid::Uuid;

/// The single known-good identity that presented claims must equal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReferenceIdentity {
    pub user_id: SubjectId,
    pub auth_token: String,
    pub time_stamp: String,
}

impl ReferenceIdentity {
    /// Load the identity set from `path` and keep its first entry.
    ///
    /// An empty set is fatal. Entries after the first are ignored.
    pub fn load(path: &Path) -> FlowGraphResult<Self> {
        let mut identities = read_json_array::<ReferenceIdentity>(path)?;
        if identities.is_empty() {
            return Err(FlowGraphError::Identity(format!(
                "{} contains no identities",
                path.display()
            )));
        }
        if identities.len() > 1 {
            warn!(
                "{} holds {} identities; only the first is used",
                path.display(),
                identities.len()
            );
        }
        let identity = identities.swap_remove(0);
        info!("Reference identity loaded for user {}", identity.user_id);
        Ok(identity)
    }

    /// Names of the claims that differ from this identity.
    pub fn mismatched_fields(&self, claims: &TokenClaims) -> Vec<&'static str> {
        let mut fields = Vec::new();
        if claims.user_id != self.user_id {
            fields.push("userId");
        }
        if claims.auth_token != self.auth_token {
            fields.push("authToken");
        }
        if claims.time_stamp != self.time_stamp {
            fields.push("timeStamp");
        }
        fields
    }
}

impl From<TokenClaims> for ReferenceIdentity {
    fn from(claims: TokenClaims) -> Self {
        Self {
            user_id: claims.user_id,
            auth_token: claims.auth_token,
            time_stamp: claims.time_stamp,
        }
    }
}

/// Identity context of an authorized request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorizedIdentity {
    pub claims: TokenClaims,
}

impl AuthorizedIdentity {
    pub fn subject(&self) -> &SubjectId {
        &self.claims.user_id
    }
}

/// Strip the `Bearer ` scheme prefix. An absent header is an empty credential.
pub fn bearer_credential(header: Option<&str>) -> &str {
    match header {
        Some(value) => value.strip_prefix("Bearer ").unwrap_or(value),
        None => "",
    }
}

/// Verifies bearer credentials. Pure and shareable across workers.
#[derive(Debug, Clone)]
pub struct TokenVerifier {
    secret: SharedSecret,
    reference: ReferenceIdentity,
}

impl TokenVerifier {
    pub fn new(secret: SharedSecret, reference: ReferenceIdentity) -> Self {
        Self { secret, reference }
    }

    pub fn reference(&self) -> &ReferenceIdentity {
        &self.reference
    }

    /// Verify the raw `authorization` header value.
    pub fn verify_header(
        &self,
        header: Option<&str>,
    ) -> Result<AuthorizedIdentity, AuthenticationError> {
        self.verify(bearer_credential(header))
    }

    /// Verify a credential: signature first, then every claim against the
    /// reference identity. Any failure is a rejection.
    pub fn verify(&self, credential: &str) -> Result<AuthorizedIdentity, AuthenticationError> {
        let claims = decode_verified(credential, &self.secret).map_err(|e| {
            AuthenticationError::from_token_error(e, Uuid::new_v4().to_string())
        })?;

        let mismatched = self.reference.mismatched_fields(&claims);
        if !mismatched.is_empty() {
            return Err(AuthenticationError::IdentityMismatch {
                fields: mismatched.into_iter().map(str::to_string).collect(),
                correlation_id: Uuid::new_v4().to_string(),
            });
        }

        Ok(AuthorizedIdentity { claims })
    }
}
