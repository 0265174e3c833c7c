//! # flowgraph
//!
//! Read-only GraphQL API over a conversation-flow dataset: nodes, triggers,
//! actions, responses and resource templates. Records are loaded once from JSON
//! files into an immutable [`store::RecordStore`]; relation fields are joined on
//! demand by the [`resolver::Resolver`] when a query selects them, and every
//! request is gated by the shared-secret bearer token check in [`auth`].

pub mod auth;
pub mod config;
pub mod dispatcher;
pub mod error;
pub mod graphql;
pub mod logging;
pub mod resolver;
pub mod server;
pub mod store;

pub use auth::{AuthorizedIdentity, ReferenceIdentity, SharedSecret, TokenClaims, TokenVerifier};
pub use config::{load_server_config, ServerConfig};
pub use dispatcher::{QueryDispatcher, Selection};
pub use error::{FlowGraphError, FlowGraphResult};
pub use resolver::{ActionWithTemplate, Resolver, TemplateOwner};
pub use server::FlowGraphHttpServer;
pub use store::{Action, EntityKind, Node, RecordId, RecordStore, ResourceTemplate, Response, Trigger};
