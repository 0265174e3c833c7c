//! Authentication failures and the uniform rejection response.
//!
//! [`AuthenticationError`] keeps the real cause for the server log. Callers
//! only ever see [`AuthRejection`], whose body is identical for every cause.

use super::token::TokenError;
use actix_web::http::StatusCode;
use serde::Serialize;
use serde_json::{json, Value};

/// Message returned to callers for every authentication failure
pub const INVALID_TOKEN_MESSAGE: &str = "Invalid token";

/// Classification attached to the rejection body
pub const UNAUTHENTICATED_CODE: &str = "UNAUTHENTICATED";

/// Internal cause of a rejected credential
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum AuthenticationError {
    /// No authorization header, or an empty credential
    MissingCredential { correlation_id: String },
    /// Structure, encoding or payload could not be decoded
    MalformedToken {
        reason: String,
        correlation_id: String,
    },
    /// Header names an algorithm other than HS256/HS384/HS512
    UnsupportedAlgorithm {
        algorithm: String,
        correlation_id: String,
    },
    /// Signature does not match the shared secret
    SignatureMismatch { correlation_id: String },
    /// Signature is valid but the claims differ from the reference identity
    IdentityMismatch {
        fields: Vec<String>,
        correlation_id: String,
    },
}

impl AuthenticationError {
    pub fn from_token_error(error: TokenError, correlation_id: String) -> Self {
        match error {
            TokenError::Empty => Self::MissingCredential { correlation_id },
            TokenError::UnsupportedAlgorithm(algorithm) => Self::UnsupportedAlgorithm {
                algorithm,
                correlation_id,
            },
            TokenError::Signature => Self::SignatureMismatch { correlation_id },
            other => Self::MalformedToken {
                reason: other.to_string(),
                correlation_id,
            },
        }
    }

    pub fn correlation_id(&self) -> &str {
        match self {
            Self::MissingCredential { correlation_id } => correlation_id,
            Self::MalformedToken { correlation_id, .. } => correlation_id,
            Self::UnsupportedAlgorithm { correlation_id, .. } => correlation_id,
            Self::SignatureMismatch { correlation_id } => correlation_id,
            Self::IdentityMismatch { correlation_id, .. } => correlation_id,
        }
    }

    /// Error code for the server log
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::MissingCredential { .. } => "MISSING_CREDENTIAL",
            Self::MalformedToken { .. } => "MALFORMED_TOKEN",
            Self::UnsupportedAlgorithm { .. } => "UNSUPPORTED_ALGORITHM",
            Self::SignatureMismatch { .. } => "SIGNATURE_MISMATCH",
            Self::IdentityMismatch { .. } => "IDENTITY_MISMATCH",
        }
    }

    /// Detail for the server log. Never sent to the caller.
    pub fn internal_detail(&self) -> String {
        match self {
            Self::MissingCredential { .. } => "no bearer credential supplied".to_string(),
            Self::MalformedToken { reason, .. } => format!("malformed token: {}", reason),
            Self::UnsupportedAlgorithm { algorithm, .. } => {
                format!("unsupported algorithm '{}'", algorithm)
            }
            Self::SignatureMismatch { .. } => "signature does not match".to_string(),
            Self::IdentityMismatch { fields, .. } => {
                format!("claims differ from reference identity: {}", fields.join(", "))
            }
        }
    }

    /// Message for the caller; the same for every variant
    pub fn public_message(&self) -> &'static str {
        INVALID_TOKEN_MESSAGE
    }

    pub fn http_status_code(&self) -> StatusCode {
        StatusCode::UNAUTHORIZED
    }
}

impl std::fmt::Display for AuthenticationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.error_code(), self.internal_detail())
    }
}

impl std::error::Error for AuthenticationError {}

/// Body sent for every rejected request
pub fn rejection_body() -> Value {
    json!({
        "errors": [{
            "message": INVALID_TOKEN_MESSAGE,
            "extensions": { "code": UNAUTHENTICATED_CODE }
        }]
    })
}

/// Error returned from the middleware; renders the uniform 401 response
#[derive(Debug)]
pub struct AuthRejection {
    pub auth_error: AuthenticationError,
}

impl From<AuthenticationError> for AuthRejection {
    fn from(auth_error: AuthenticationError) -> Self {
        Self { auth_error }
    }
}

impl std::fmt::Display for AuthRejection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.auth_error.public_message())
    }
}

impl actix_web::ResponseError for AuthRejection {
    fn status_code(&self) -> StatusCode {
        self.auth_error.http_status_code()
    }

    fn error_response(&self) -> actix_web::HttpResponse {
        actix_web::HttpResponse::build(self.status_code()).json(rejection_body())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::ResponseError;

    fn all_causes() -> Vec<AuthenticationError> {
        let id = || "cid".to_string();
        vec![
            AuthenticationError::MissingCredential { correlation_id: id() },
            AuthenticationError::MalformedToken {
                reason: "bad json".to_string(),
                correlation_id: id(),
            },
            AuthenticationError::UnsupportedAlgorithm {
                algorithm: "none".to_string(),
                correlation_id: id(),
            },
            AuthenticationError::SignatureMismatch { correlation_id: id() },
            AuthenticationError::IdentityMismatch {
                fields: vec!["userId".to_string()],
                correlation_id: id(),
            },
        ]
    }

    #[test]
    fn every_cause_looks_the_same_to_the_caller() {
        for cause in all_causes() {
            let rejection = AuthRejection::from(cause);
            assert_eq!(rejection.to_string(), "Invalid token");
            assert_eq!(rejection.status_code(), StatusCode::UNAUTHORIZED);
        }
    }

    #[test]
    fn internal_detail_names_the_cause() {
        let causes = all_causes();
        assert!(causes[1].to_string().contains("bad json"));
        assert!(causes[4].internal_detail().contains("userId"));
        assert_eq!(causes[3].error_code(), "SIGNATURE_MISMATCH");
    }

    #[test]
    fn token_errors_map_to_causes() {
        let cid = || "c".to_string();
        assert!(matches!(
            AuthenticationError::from_token_error(TokenError::Empty, cid()),
            AuthenticationError::MissingCredential { .. }
        ));
        assert!(matches!(
            AuthenticationError::from_token_error(TokenError::Segments(2), cid()),
            AuthenticationError::MalformedToken { .. }
        ));
        assert!(matches!(
            AuthenticationError::from_token_error(TokenError::Signature, cid()),
            AuthenticationError::SignatureMismatch { .. }
        ));
    }

    #[test]
    fn rejection_body_shape() {
        let body = rejection_body();
        assert_eq!(body["errors"][0]["message"], "Invalid token");
        assert_eq!(body["errors"][0]["extensions"]["code"], "UNAUTHENTICATED");
    }
}
