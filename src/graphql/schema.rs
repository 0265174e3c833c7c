use async_graphql::{EmptyMutation, EmptySubscription, Schema};

use super::types::QueryRoot;
use crate::dispatcher::QueryDispatcher;

pub type FlowGraphSchema = Schema<QueryRoot, EmptyMutation, EmptySubscription>;

pub fn build_schema(dispatcher: QueryDispatcher) -> FlowGraphSchema {
    Schema::build(QueryRoot, EmptyMutation, EmptySubscription)
        .data(dispatcher)
        .finish()
}
