//! Relational resolution.
//!
//! Joins a record's relation fields against the other collections when a
//! caller asks for them. Nothing is pre-joined at load time, so a query that
//! never selects a relation never pays for it.
//!
//! Two policies apply throughout:
//!
//! * singular relations resolve to `None` when the id is absent or dangling;
//! * list relations drop ids with no match and keep the order of the rest.
//!
//! Neither ever fails.

use crate::store::{Action, Entity, Node, RecordId, RecordStore, ResourceTemplate, Response, Trigger};
use std::sync::Arc;

/// A record that may point at a [`ResourceTemplate`].
pub trait TemplateOwner {
    fn resource_template_id(&self) -> Option<&RecordId>;
}

impl TemplateOwner for Trigger {
    fn resource_template_id(&self) -> Option<&RecordId> {
        self.resource_template_id.as_ref()
    }
}

impl TemplateOwner for Action {
    fn resource_template_id(&self) -> Option<&RecordId> {
        self.resource_template_id.as_ref()
    }
}

/// An action paired with its resolved template.
///
/// The stored [`Action`] is shared, not copied or modified; the template is
/// carried alongside it.
#[derive(Debug, Clone)]
pub struct ActionWithTemplate {
    pub action: Arc<Action>,
    pub resource_template: Option<Arc<ResourceTemplate>>,
}

/// Read-only join functions over a [`RecordStore`].
#[derive(Debug, Clone, Copy)]
pub struct Resolver<'a> {
    store: &'a RecordStore,
}

impl<'a> Resolver<'a> {
    pub fn new(store: &'a RecordStore) -> Self {
        Self { store }
    }

    fn find<T: Entity>(&self, id: Option<&RecordId>) -> Option<Arc<T>> {
        id.and_then(|id| self.store.collection::<T>().get(id.as_str()))
            .cloned()
    }

    pub fn resolve_trigger(&self, node: &Node) -> Option<Arc<Trigger>> {
        self.find(node.trigger.as_ref())
    }

    pub fn resolve_responses(&self, node: &Node) -> Vec<Arc<Response>> {
        node.responses
            .iter()
            .flatten()
            .filter_map(|id| self.find(Some(id)))
            .collect()
    }

    /// `None` when the node carries no `postActions` list at all, which is
    /// distinct from an empty list.
    pub fn resolve_post_actions(&self, node: &Node) -> Option<Vec<ActionWithTemplate>> {
        let ids = node.post_actions.as_ref()?;
        Some(
            ids.iter()
                .filter_map(|id| self.find::<Action>(Some(id)))
                .map(|action| ActionWithTemplate {
                    resource_template: self.resolve_resource_template(action.as_ref()),
                    action,
                })
                .collect(),
        )
    }

    pub fn resolve_resource_template<O>(&self, owner: &O) -> Option<Arc<ResourceTemplate>>
    where
        O: TemplateOwner + ?Sized,
    {
        self.find(owner.resource_template_id())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(values: &[&str]) -> Option<Vec<RecordId>> {
        Some(values.iter().map(|&v| RecordId::from(v)).collect())
    }

    fn action(id: &str, template: Option<&str>) -> Action {
        let mut action = Action::new(id);
        action.resource_template_id = template.map(RecordId::from);
        action
    }

    fn trigger(id: &str, template: Option<&str>) -> Trigger {
        let mut trigger = Trigger::new(id);
        trigger.resource_template_id = template.map(RecordId::from);
        trigger
    }

    fn store() -> RecordStore {
        RecordStore::new(
            vec![],
            vec![trigger("t1", Some("rt1")), trigger("t2", Some("rt-missing"))],
            vec![action("a1", Some("rt1")), action("a2", None)],
            vec![Response::new("r1"), Response::new("r2")],
            vec![ResourceTemplate::new("rt1")],
        )
    }

    #[test]
    fn trigger_resolves_or_is_none() {
        let store = store();
        let resolver = Resolver::new(&store);

        let mut node = Node::new("n1");
        assert!(resolver.resolve_trigger(&node).is_none());

        node.trigger = Some(RecordId::new("t1"));
        assert_eq!(resolver.resolve_trigger(&node).unwrap().id().as_str(), "t1");

        node.trigger = Some(RecordId::new("t404"));
        assert!(resolver.resolve_trigger(&node).is_none());
    }

    #[test]
    fn responses_drop_unknown_ids_and_keep_order() {
        let store = store();
        let resolver = Resolver::new(&store);

        let mut node = Node::new("n1");
        node.responses = ids(&["r1", "r9"]);
        let resolved = resolver.resolve_responses(&node);
        assert_eq!(resolved.len(), 1);
        assert_eq!(resolved[0].id().as_str(), "r1");

        node.responses = ids(&["r2", "r1"]);
        let order: Vec<_> = resolver
            .resolve_responses(&node)
            .iter()
            .map(|r| r.id().to_string())
            .collect();
        assert_eq!(order, ["r2", "r1"]);
    }

    #[test]
    fn responses_absent_is_empty() {
        let store = store();
        let resolver = Resolver::new(&store);
        assert!(resolver.resolve_responses(&Node::new("n1")).is_empty());
    }

    #[test]
    fn post_actions_absent_differs_from_empty() {
        let store = store();
        let resolver = Resolver::new(&store);

        let mut node = Node::new("n1");
        assert!(resolver.resolve_post_actions(&node).is_none());

        node.post_actions = Some(vec![]);
        assert_eq!(resolver.resolve_post_actions(&node).map(|a| a.len()), Some(0));
    }

    #[test]
    fn post_actions_carry_templates_without_touching_the_action() {
        let store = store();
        let resolver = Resolver::new(&store);

        let mut node = Node::new("n1");
        node.post_actions = ids(&["a1", "a404", "a2"]);
        let resolved = resolver.resolve_post_actions(&node).unwrap();

        assert_eq!(resolved.len(), 2);
        assert_eq!(resolved[0].action.id().as_str(), "a1");
        assert_eq!(
            resolved[0].resource_template.as_ref().map(|t| t.id().as_str()),
            Some("rt1")
        );
        assert_eq!(resolved[1].action.id().as_str(), "a2");
        assert!(resolved[1].resource_template.is_none());

        let stored = store.actions().get("a1").unwrap();
        assert!(Arc::ptr_eq(stored, &resolved[0].action));
        assert_eq!(stored.resource_template_id, Some(RecordId::new("rt1")));
    }

    #[test]
    fn dangling_template_is_none() {
        let store = store();
        let resolver = Resolver::new(&store);

        let t2 = store.triggers().get("t2").unwrap();
        assert!(resolver.resolve_resource_template(t2.as_ref()).is_none());

        let t1 = store.triggers().get("t1").unwrap();
        assert_eq!(
            resolver
                .resolve_resource_template(t1.as_ref())
                .map(|t| t.id().to_string()),
            Some("rt1".to_string())
        );
    }
}
