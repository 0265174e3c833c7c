//! HTTP surface: the authenticated GraphQL endpoint and a health probe.

pub mod graphql_routes;
pub mod http_server;
pub mod system_routes;

pub use http_server::{configure_routes, AppState, FlowGraphHttpServer};
