use async_graphql::{Context, Json, Object, Result, ID};
use serde_json::Value;
use std::sync::Arc;

use super::scalars::Long;
use crate::dispatcher::QueryDispatcher;
use crate::resolver::ActionWithTemplate;
use crate::store::{Action, Entity, Node, RecordId, ResourceTemplate, Response, Trigger};

fn dispatcher<'a>(ctx: &'a Context<'_>) -> Result<&'a QueryDispatcher> {
    ctx.data::<QueryDispatcher>()
}

fn single<T: Entity>(ctx: &Context<'_>, id: Option<ID>) -> Result<Option<Arc<T>>> {
    Ok(dispatcher(ctx)?
        .get::<T>(id.as_ref().map(|id| id.as_str()))
        .into_one())
}

fn all<T: Entity>(ctx: &Context<'_>) -> Result<Vec<Arc<T>>> {
    Ok(dispatcher(ctx)?.list::<T>())
}

fn to_id(id: &RecordId) -> ID {
    ID(id.to_string())
}

fn to_json(value: &Option<Value>) -> Option<Json<Value>> {
    value.clone().map(Json)
}

pub struct QueryRoot;

#[Object(name = "Query")]
impl QueryRoot {
    /// Node by id
    async fn node(&self, ctx: &Context<'_>, node_id: Option<ID>) -> Result<Option<NodeObject>> {
        Ok(single::<Node>(ctx, node_id)?.map(NodeObject))
    }

    async fn nodes(&self, ctx: &Context<'_>) -> Result<Vec<NodeObject>> {
        Ok(all::<Node>(ctx)?.into_iter().map(NodeObject).collect())
    }

    async fn trigger(
        &self,
        ctx: &Context<'_>,
        trigger_id: Option<ID>,
    ) -> Result<Option<TriggerObject>> {
        Ok(single::<Trigger>(ctx, trigger_id)?.map(TriggerObject))
    }

    async fn triggers(&self, ctx: &Context<'_>) -> Result<Vec<TriggerObject>> {
        Ok(all::<Trigger>(ctx)?.into_iter().map(TriggerObject).collect())
    }

    async fn action(&self, ctx: &Context<'_>, action_id: Option<ID>) -> Result<Option<ActionObject>> {
        Ok(single::<Action>(ctx, action_id)?.map(ActionObject::lazy))
    }

    async fn actions(&self, ctx: &Context<'_>) -> Result<Vec<ActionObject>> {
        Ok(all::<Action>(ctx)?.into_iter().map(ActionObject::lazy).collect())
    }

    async fn response(
        &self,
        ctx: &Context<'_>,
        response_id: Option<ID>,
    ) -> Result<Option<ResponseObject>> {
        Ok(single::<Response>(ctx, response_id)?.map(ResponseObject))
    }

    async fn responses(&self, ctx: &Context<'_>) -> Result<Vec<ResponseObject>> {
        Ok(all::<Response>(ctx)?.into_iter().map(ResponseObject).collect())
    }

    async fn resource_template(
        &self,
        ctx: &Context<'_>,
        resource_template_id: Option<ID>,
    ) -> Result<Option<ResourceTemplateObject>> {
        Ok(single::<ResourceTemplate>(ctx, resource_template_id)?.map(ResourceTemplateObject))
    }

    async fn resource_templates(&self, ctx: &Context<'_>) -> Result<Vec<ResourceTemplateObject>> {
        Ok(all::<ResourceTemplate>(ctx)?
            .into_iter()
            .map(ResourceTemplateObject)
            .collect())
    }
}

pub struct NodeObject(Arc<Node>);

#[Object(name = "NodeObject")]
impl NodeObject {
    #[graphql(name = "_id")]
    async fn id(&self) -> ID {
        to_id(&self.0.meta.id)
    }

    async fn created_at(&self) -> Long {
        Long(self.0.meta.created_at)
    }

    async fn updated_at(&self) -> Option<Long> {
        self.0.meta.updated_at.map(Long)
    }

    async fn name(&self) -> &str {
        &self.0.meta.name
    }

    async fn description(&self) -> Option<&str> {
        self.0.meta.description.as_deref()
    }

    async fn parents(&self) -> Option<Json<Value>> {
        to_json(&self.0.parents)
    }

    async fn parent_ids(&self) -> Option<Vec<ID>> {
        self.0
            .parent_ids
            .as_ref()
            .map(|ids| ids.iter().map(to_id).collect())
    }

    async fn root(&self) -> Option<bool> {
        self.0.root
    }

    async fn redirect(&self) -> Option<Json<Value>> {
        to_json(&self.0.redirect)
    }

    async fn analytics(&self) -> Option<&str> {
        self.0.analytics.as_deref()
    }

    async fn member_tagging(&self) -> Option<&str> {
        self.0.member_tagging.as_deref()
    }

    #[graphql(name = "type")]
    async fn node_type(&self) -> Option<&str> {
        self.0.node_type.as_deref()
    }

    async fn trigger(&self, ctx: &Context<'_>) -> Result<Option<TriggerObject>> {
        Ok(dispatcher(ctx)?
            .resolver()
            .resolve_trigger(&self.0)
            .map(TriggerObject))
    }

    async fn responses(&self, ctx: &Context<'_>) -> Result<Vec<ResponseObject>> {
        Ok(dispatcher(ctx)?
            .resolver()
            .resolve_responses(&self.0)
            .into_iter()
            .map(ResponseObject)
            .collect())
    }

    async fn actions(&self) -> Option<&str> {
        self.0.actions.as_deref()
    }

    /// `null` when the node has no postActions list, `[]` when it is empty
    async fn post_actions(&self, ctx: &Context<'_>) -> Result<Option<Vec<ActionObject>>> {
        Ok(dispatcher(ctx)?
            .resolver()
            .resolve_post_actions(&self.0)
            .map(|actions| actions.into_iter().map(ActionObject::attached).collect()))
    }

    async fn priority(&self) -> Option<f64> {
        self.0.priority
    }

    async fn position(&self) -> Option<Json<Value>> {
        to_json(&self.0.position)
    }

    async fn composite_id(&self) -> Option<ID> {
        self.0.composite_id.clone().map(ID)
    }

    async fn global(&self) -> Option<bool> {
        self.0.global
    }

    async fn colour(&self) -> Option<&str> {
        self.0.colour.as_deref()
    }
}

pub struct TriggerObject(Arc<Trigger>);

#[Object(name = "Trigger")]
impl TriggerObject {
    #[graphql(name = "_id")]
    async fn id(&self) -> ID {
        to_id(&self.0.meta.id)
    }

    async fn created_at(&self) -> Long {
        Long(self.0.meta.created_at)
    }

    async fn updated_at(&self) -> Option<Long> {
        self.0.meta.updated_at.map(Long)
    }

    async fn name(&self) -> &str {
        &self.0.meta.name
    }

    async fn description(&self) -> Option<&str> {
        self.0.meta.description.as_deref()
    }

    async fn params(&self) -> Option<Json<Value>> {
        to_json(&self.0.params)
    }

    async fn function_string(&self) -> Option<&str> {
        self.0.function_string.as_deref()
    }

    async fn resource_template_id(&self) -> Option<ID> {
        self.0.resource_template_id.as_ref().map(to_id)
    }

    async fn resource_template(&self, ctx: &Context<'_>) -> Result<Option<ResourceTemplateObject>> {
        Ok(dispatcher(ctx)?
            .resolver()
            .resolve_resource_template(self.0.as_ref())
            .map(ResourceTemplateObject))
    }
}

/// An action, optionally carrying a template already resolved by `postActions`.
pub struct ActionObject {
    action: Arc<Action>,
    template: Option<Option<Arc<ResourceTemplate>>>,
}

impl ActionObject {
    fn lazy(action: Arc<Action>) -> Self {
        Self {
            action,
            template: None,
        }
    }

    fn attached(resolved: ActionWithTemplate) -> Self {
        Self {
            action: resolved.action,
            template: Some(resolved.resource_template),
        }
    }
}

#[Object(name = "Action")]
impl ActionObject {
    #[graphql(name = "_id")]
    async fn id(&self) -> ID {
        to_id(&self.action.meta.id)
    }

    async fn created_at(&self) -> Long {
        Long(self.action.meta.created_at)
    }

    async fn updated_at(&self) -> Option<Long> {
        self.action.meta.updated_at.map(Long)
    }

    async fn name(&self) -> &str {
        &self.action.meta.name
    }

    async fn description(&self) -> Option<&str> {
        self.action.meta.description.as_deref()
    }

    async fn params(&self) -> Option<Json<Value>> {
        to_json(&self.action.params)
    }

    async fn function_string(&self) -> Option<&str> {
        self.action.function_string.as_deref()
    }

    async fn resource_template_id(&self) -> Option<ID> {
        self.action.resource_template_id.as_ref().map(to_id)
    }

    async fn resource_template(&self, ctx: &Context<'_>) -> Result<Option<ResourceTemplateObject>> {
        let template = match &self.template {
            Some(attached) => attached.clone(),
            None => dispatcher(ctx)?
                .resolver()
                .resolve_resource_template(self.action.as_ref()),
        };
        Ok(template.map(ResourceTemplateObject))
    }
}

pub struct ResponseObject(Arc<Response>);

#[Object(name = "Response")]
impl ResponseObject {
    #[graphql(name = "_id")]
    async fn id(&self) -> ID {
        to_id(&self.0.meta.id)
    }

    async fn created_at(&self) -> Long {
        Long(self.0.meta.created_at)
    }

    async fn updated_at(&self) -> Option<Long> {
        self.0.meta.updated_at.map(Long)
    }

    async fn name(&self) -> &str {
        &self.0.meta.name
    }

    async fn description(&self) -> Option<&str> {
        self.0.meta.description.as_deref()
    }

    async fn platforms(&self) -> Option<Json<Value>> {
        to_json(&self.0.platforms)
    }

    async fn tags(&self) -> Option<Json<Value>> {
        to_json(&self.0.tags)
    }
}

pub struct ResourceTemplateObject(Arc<ResourceTemplate>);

#[Object(name = "ResourceTemplate")]
impl ResourceTemplateObject {
    #[graphql(name = "_id")]
    async fn id(&self) -> ID {
        to_id(&self.0.meta.id)
    }

    async fn created_at(&self) -> Long {
        Long(self.0.meta.created_at)
    }

    async fn updated_at(&self) -> Option<Long> {
        self.0.meta.updated_at.map(Long)
    }

    async fn name(&self) -> &str {
        &self.0.meta.name
    }

    #[graphql(name = "type")]
    async fn template_type(&self) -> Option<&str> {
        self.0.template_type.as_deref()
    }

    async fn description(&self) -> Option<&str> {
        self.0.meta.description.as_deref()
    }

    async fn schema(&self) -> Option<Json<Value>> {
        to_json(&self.0.schema)
    }

    async fn requested_verification(&self) -> Option<bool> {
        self.0.requested_verification
    }

    async fn verified(&self) -> Option<bool> {
        self.0.verified
    }

    async fn published(&self) -> Option<bool> {
        self.0.published
    }

    async fn integration_id(&self) -> Option<&str> {
        self.0.integration_id.as_deref()
    }

    async fn function_string(&self) -> Option<&str> {
        self.0.function_string.as_deref()
    }

    async fn key(&self) -> Option<&str> {
        self.0.key.as_deref()
    }
}
