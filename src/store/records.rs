//! Typed records for the five collections.

use super::relation::{deserialize_reference, deserialize_reference_list, RecordId};
use super::{Collection, RecordStore};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// The five record kinds, each backed by one JSON file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EntityKind {
    Node,
    Trigger,
    Action,
    Response,
    ResourceTemplate,
}

impl EntityKind {
    pub const ALL: [EntityKind; 5] = [
        EntityKind::Node,
        EntityKind::Trigger,
        EntityKind::Action,
        EntityKind::Response,
        EntityKind::ResourceTemplate,
    ];

    /// Name of the backing file inside the data directory
    pub fn file_name(&self) -> &'static str {
        match self {
            EntityKind::Node => "node.json",
            EntityKind::Trigger => "trigger.json",
            EntityKind::Action => "action.json",
            EntityKind::Response => "response.json",
            EntityKind::ResourceTemplate => "resourceTemplate.json",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::Node => "node",
            EntityKind::Trigger => "trigger",
            EntityKind::Action => "action",
            EntityKind::Response => "response",
            EntityKind::ResourceTemplate => "resourceTemplate",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fields shared by every record kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordMeta {
    #[serde(rename = "_id")]
    pub id: RecordId,
    /// Epoch milliseconds
    #[serde(default)]
    pub created_at: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<i64>,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl RecordMeta {
    pub fn new(id: impl Into<RecordId>) -> Self {
        Self {
            id: id.into(),
            created_at: 0,
            updated_at: None,
            name: String::new(),
            description: None,
        }
    }
}

/// A record kind stored in its own collection of the [`RecordStore`].
pub trait Entity: Send + Sync + Sized + 'static {
    const KIND: EntityKind;

    fn meta(&self) -> &RecordMeta;

    /// The collection of this kind inside `store`
    fn collection(store: &RecordStore) -> &Collection<Self>;

    fn id(&self) -> &RecordId {
        &self.meta().id
    }
}

/// Primary flow unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    #[serde(flatten)]
    pub meta: RecordMeta,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parents: Option<Value>,
    #[serde(
        default,
        deserialize_with = "deserialize_reference_list",
        skip_serializing_if = "Option::is_none"
    )]
    pub parent_ids: Option<Vec<RecordId>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub root: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub redirect: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub analytics: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub member_tagging: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub node_type: Option<String>,
    #[serde(
        default,
        deserialize_with = "deserialize_reference",
        skip_serializing_if = "Option::is_none"
    )]
    pub trigger: Option<RecordId>,
    #[serde(
        default,
        deserialize_with = "deserialize_reference_list",
        skip_serializing_if = "Option::is_none"
    )]
    pub responses: Option<Vec<RecordId>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actions: Option<String>,
    #[serde(
        default,
        deserialize_with = "deserialize_reference_list",
        skip_serializing_if = "Option::is_none"
    )]
    pub post_actions: Option<Vec<RecordId>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub composite_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub global: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub colour: Option<String>,
}

impl Node {
    pub fn new(id: impl Into<RecordId>) -> Self {
        Self {
            meta: RecordMeta::new(id),
            parents: None,
            parent_ids: None,
            root: None,
            redirect: None,
            analytics: None,
            member_tagging: None,
            node_type: None,
            trigger: None,
            responses: None,
            actions: None,
            post_actions: None,
            priority: None,
            position: None,
            composite_id: None,
            global: None,
            colour: None,
        }
    }
}

/// Named condition that starts a node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Trigger {
    #[serde(flatten)]
    pub meta: RecordMeta,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub params: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub function_string: Option<String>,
    #[serde(
        default,
        deserialize_with = "deserialize_reference",
        skip_serializing_if = "Option::is_none"
    )]
    pub resource_template_id: Option<RecordId>,
}

impl Trigger {
    pub fn new(id: impl Into<RecordId>) -> Self {
        Self {
            meta: RecordMeta::new(id),
            params: None,
            function_string: None,
            resource_template_id: None,
        }
    }
}

/// Named operation run after a node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Action {
    #[serde(flatten)]
    pub meta: RecordMeta,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub params: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub function_string: Option<String>,
    #[serde(
        default,
        deserialize_with = "deserialize_reference",
        skip_serializing_if = "Option::is_none"
    )]
    pub resource_template_id: Option<RecordId>,
}

impl Action {
    pub fn new(id: impl Into<RecordId>) -> Self {
        Self {
            meta: RecordMeta::new(id),
            params: None,
            function_string: None,
            resource_template_id: None,
        }
    }
}

/// Payload sent back to the user, tagged per platform.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Response {
    #[serde(flatten)]
    pub meta: RecordMeta,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub platforms: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Value>,
}

impl Response {
    pub fn new(id: impl Into<RecordId>) -> Self {
        Self {
            meta: RecordMeta::new(id),
            platforms: None,
            tags: None,
        }
    }
}

/// Schema/template definition used by triggers and actions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceTemplate {
    #[serde(flatten)]
    pub meta: RecordMeta,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub template_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub requested_verification: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verified: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub integration_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub function_string: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
}

impl ResourceTemplate {
    pub fn new(id: impl Into<RecordId>) -> Self {
        Self {
            meta: RecordMeta::new(id),
            template_type: None,
            schema: None,
            requested_verification: None,
            verified: None,
            published: None,
            integration_id: None,
            function_string: None,
            key: None,
        }
    }
}

macro_rules! impl_entity {
    ($ty:ty, $kind:expr, $field:ident) => {
        impl Entity for $ty {
            const KIND: EntityKind = $kind;

            fn meta(&self) -> &RecordMeta {
                &self.meta
            }

            fn collection(store: &RecordStore) -> &Collection<Self> {
                &store.$field
            }
        }
    };
}

impl_entity!(Node, EntityKind::Node, nodes);
impl_entity!(Trigger, EntityKind::Trigger, triggers);
impl_entity!(Action, EntityKind::Action, actions);
impl_entity!(Response, EntityKind::Response, responses);
impl_entity!(ResourceTemplate, EntityKind::ResourceTemplate, resource_templates);

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn sparse_records_load_with_defaults() {
        let node: Node = serde_json::from_value(json!({ "_id": "n1" })).unwrap();
        assert_eq!(node.id().as_str(), "n1");
        assert_eq!(node.meta.name, "");
        assert_eq!(node.meta.created_at, 0);
        assert!(node.post_actions.is_none());
    }

    #[test]
    fn missing_id_is_malformed() {
        let result: Result<Response, _> = serde_json::from_value(json!({ "name": "hello" }));
        assert!(result.is_err());
    }

    #[test]
    fn node_reads_camel_case_fields() {
        let node: Node = serde_json::from_value(json!({
            "_id": "n1",
            "createdAt": 1696118400000_i64,
            "name": "Welcome",
            "type": "message",
            "trigger": "t1",
            "responses": ["r1", "r9"],
            "postActions": [],
            "parentIds": ["n0"],
            "memberTagging": "vip",
            "priority": 2,
            "position": { "x": 10, "y": 20 },
            "colour": "#ffaa00"
        }))
        .unwrap();

        assert_eq!(node.meta.created_at, 1696118400000);
        assert_eq!(node.node_type.as_deref(), Some("message"));
        assert_eq!(node.trigger, Some(RecordId::new("t1")));
        assert_eq!(node.responses.as_ref().map(Vec::len), Some(2));
        assert_eq!(node.post_actions, Some(vec![]));
        assert_eq!(node.member_tagging.as_deref(), Some("vip"));
        assert_eq!(node.priority, Some(2.0));
        assert_eq!(node.position, Some(json!({ "x": 10, "y": 20 })));
    }

    #[test]
    fn template_reads_flags() {
        let template: ResourceTemplate = serde_json::from_value(json!({
            "_id": "rt1",
            "type": "webhook",
            "requestedVerification": true,
            "verified": false,
            "integrationId": "int-7"
        }))
        .unwrap();
        assert_eq!(template.template_type.as_deref(), Some("webhook"));
        assert_eq!(template.requested_verification, Some(true));
        assert_eq!(template.verified, Some(false));
        assert!(template.published.is_none());
    }

    #[test]
    fn kinds_map_to_files() {
        let files: Vec<_> = EntityKind::ALL.iter().map(EntityKind::file_name).collect();
        assert_eq!(
            files,
            [
                "node.json",
                "trigger.json",
                "action.json",
                "response.json",
                "resourceTemplate.json"
            ]
        );
    }
}
