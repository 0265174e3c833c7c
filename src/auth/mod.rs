//! Shared-secret bearer token authentication.
//!
//! A request is authorized when its token carries a valid HMAC signature
//! under the shared secret and its `userId`, `authToken` and `timeStamp`
//! claims all equal the reference identity. There are no sessions: every
//! request is verified on its own.

pub mod auth_errors;
pub mod auth_middleware;
pub mod token;
pub mod verifier;

pub use auth_errors::{AuthRejection, AuthenticationError, INVALID_TOKEN_MESSAGE};
pub use auth_middleware::BearerAuthMiddleware;
pub use token::{
    decode_verified, derive_auth_token, issue_token, SharedSecret, SigningAlgorithm, SubjectId,
    TokenClaims, TokenError,
};
pub use verifier::{bearer_credential, AuthorizedIdentity, ReferenceIdentity, TokenVerifier};
