use super::{graphql_routes, system_routes};
use crate::auth::{BearerAuthMiddleware, TokenVerifier};
use crate::config::ServerConfig;
use crate::dispatcher::QueryDispatcher;
use crate::error::{FlowGraphError, FlowGraphResult};
use crate::graphql::{build_schema, FlowGraphSchema};
use crate::store::RecordStore;

use actix_cors::Cors;
use actix_web::{web, App, HttpServer as ActixHttpServer};
use log::info;
use std::sync::Arc;

/// HTTP server exposing the flow dataset over GraphQL.
///
/// The dataset and the token verifier are built before the server binds and
/// are shared read-only across workers.
pub struct FlowGraphHttpServer {
    /// Address the server binds to, e.g. "0.0.0.0:4000"
    bind_address: String,
    store: Arc<RecordStore>,
    verifier: Arc<TokenVerifier>,
}

/// Shared application state for the HTTP server.
pub struct AppState {
    pub schema: FlowGraphSchema,
    pub store: Arc<RecordStore>,
}

impl AppState {
    pub fn new(store: Arc<RecordStore>) -> Self {
        Self {
            schema: build_schema(QueryDispatcher::new(store.clone())),
            store,
        }
    }
}

impl FlowGraphHttpServer {
    pub fn new(config: &ServerConfig, store: Arc<RecordStore>, verifier: TokenVerifier) -> Self {
        Self {
            bind_address: config.bind_address(),
            store,
            verifier: Arc::new(verifier),
        }
    }

    pub fn bind_address(&self) -> &str {
        &self.bind_address
    }

    /// Run the HTTP server until it is shut down.
    ///
    /// # Errors
    ///
    /// Returns `FlowGraphError::Server` if the address cannot be bound or the
    /// server stops with an error.
    pub async fn run(&self) -> FlowGraphResult<()> {
        info!("HTTP server running on {}", self.bind_address);

        let app_state = web::Data::new(AppState::new(self.store.clone()));
        let verifier = self.verifier.clone();

        let server = ActixHttpServer::new(move || {
            let cors = Cors::default()
                .allow_any_origin()
                .allow_any_method()
                .allow_any_header()
                .max_age(3600);

            let verifier = verifier.clone();
            App::new()
                .wrap(cors)
                .app_data(app_state.clone())
                .configure(move |cfg| configure_routes(cfg, verifier))
        })
        .bind(&self.bind_address)
        .map_err(|e| FlowGraphError::Server(format!("Failed to bind HTTP server: {}", e)))?
        .run();

        server
            .await
            .map_err(|e| FlowGraphError::Server(format!("HTTP server error: {}", e)))?;

        Ok(())
    }
}

/// Register every route. The GraphQL endpoint sits behind the bearer check;
/// the health probe does not.
pub fn configure_routes(cfg: &mut web::ServiceConfig, verifier: Arc<TokenVerifier>) {
    cfg.route("/health", web::get().to(system_routes::get_health))
        .service(
            web::resource(vec!["/", "/graphql"])
                .route(web::post().to(graphql_routes::execute_graphql))
                .wrap(BearerAuthMiddleware::new(verifier)),
        );
}
