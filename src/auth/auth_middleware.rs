//! Actix-Web middleware enforcing bearer token authentication.

use super::auth_errors::AuthRejection;
use super::verifier::TokenVerifier;
use actix_web::{
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    http::header::AUTHORIZATION,
    Error, HttpMessage,
};
use futures_util::future::LocalBoxFuture;
use log::{debug, warn};
use std::rc::Rc;
use std::sync::Arc;

/// Verifies the `authorization` header before the wrapped service runs.
///
/// On success the [`AuthorizedIdentity`](super::AuthorizedIdentity) is stored
/// in the request extensions. On failure the request never reaches the
/// wrapped service and the caller receives the uniform 401 rejection.
pub struct BearerAuthMiddleware {
    verifier: Arc<TokenVerifier>,
}

impl BearerAuthMiddleware {
    pub fn new(verifier: Arc<TokenVerifier>) -> Self {
        Self { verifier }
    }
}

impl<S, B> Transform<S, ServiceRequest> for BearerAuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Transform = BearerAuthService<S>;
    type InitError = ();
    type Future = std::future::Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        std::future::ready(Ok(BearerAuthService {
            service: Rc::new(service),
            verifier: self.verifier.clone(),
        }))
    }
}

pub struct BearerAuthService<S> {
    service: Rc<S>,
    verifier: Arc<TokenVerifier>,
}

impl<S, B> Service<ServiceRequest> for BearerAuthService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = self.service.clone();
        let verifier = self.verifier.clone();

        Box::pin(async move {
            let header = req
                .headers()
                .get(AUTHORIZATION)
                .and_then(|value| value.to_str().ok());

            match verifier.verify_header(header) {
                Ok(identity) => {
                    debug!(
                        "Authorized user {} on {} {}",
                        identity.subject(),
                        req.method(),
                        req.path()
                    );
                    req.extensions_mut().insert(identity);
                    service.call(req).await
                }
                Err(auth_error) => {
                    warn!(
                        "Authentication rejected on {} [{}]: {}",
                        req.path(),
                        auth_error.correlation_id(),
                        auth_error
                    );
                    Err(actix_web::Error::from(AuthRejection::from(auth_error)))
                }
            }
        })
    }
}
