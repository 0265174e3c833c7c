//! GraphQL surface over the record store.
//!
//! Root fields dispatch to [`QueryDispatcher`](crate::dispatcher::QueryDispatcher)
//! and return shallow objects. Relation fields on those objects are separate
//! resolvers, so a join only runs when the query selects it.

pub mod queries;
pub mod scalars;
pub mod schema;
pub mod types;

pub use schema::{build_schema, FlowGraphSchema};
