use super::http_server::AppState;
use crate::auth::AuthorizedIdentity;
use actix_web::{web, HttpMessage, HttpRequest, HttpResponse, Responder};
use log::{debug, info};

/// Execute a GraphQL request for an already authorized caller.
///
/// The identity placed in the request extensions by the bearer middleware is
/// forwarded into the GraphQL context data.
pub async fn execute_graphql(
    http_request: HttpRequest,
    request: web::Json<async_graphql::Request>,
    state: web::Data<AppState>,
) -> impl Responder {
    let mut request = request.into_inner();
    debug!(
        "Received GraphQL request (operation: {})",
        request.operation_name.as_deref().unwrap_or("<anonymous>")
    );

    let identity = http_request.extensions().get::<AuthorizedIdentity>().cloned();
    if let Some(identity) = identity {
        request = request.data(identity);
    }

    let response = state.schema.execute(request).await;
    if response.is_ok() {
        info!("GraphQL request completed");
    } else {
        info!(
            "GraphQL request completed with {} error(s)",
            response.errors.len()
        );
    }

    HttpResponse::Ok().json(response)
}
