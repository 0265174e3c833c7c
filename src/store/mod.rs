//! In-memory record store.
//!
//! Five immutable collections loaded once at startup and shared read-only
//! behind an `Arc` for the lifetime of the process.

mod loader;
mod records;
mod relation;

pub use loader::{load_collection, read_json_array};
pub use records::{
    Action, Entity, EntityKind, Node, RecordMeta, ResourceTemplate, Response, Trigger,
};
pub use relation::{deserialize_reference, deserialize_reference_list, RecordId};

use log::warn;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;

/// Ordered, read-only sequence of records with an id index.
///
/// Lookups behave like a linear scan returning the first record with the
/// requested id; the index only makes that cheaper.
#[derive(Debug)]
pub struct Collection<T> {
    records: Vec<Arc<T>>,
    index: HashMap<RecordId, usize>,
}

impl<T: Entity> Collection<T> {
    pub fn new(records: Vec<T>) -> Self {
        let records: Vec<Arc<T>> = records.into_iter().map(Arc::new).collect();
        let mut index = HashMap::with_capacity(records.len());
        for (position, record) in records.iter().enumerate() {
            if index.contains_key(record.id()) {
                warn!(
                    "Duplicate {} id '{}' at position {}; keeping the first occurrence",
                    T::KIND,
                    record.id(),
                    position
                );
                continue;
            }
            index.insert(record.id().clone(), position);
        }
        Self { records, index }
    }

    pub fn get(&self, id: &str) -> Option<&Arc<T>> {
        self.index.get(id).map(|&position| &self.records[position])
    }

    pub fn all(&self) -> &[Arc<T>] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl<T: Entity> Default for Collection<T> {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

/// Record counts per collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreCounts {
    pub nodes: usize,
    pub triggers: usize,
    pub actions: usize,
    pub responses: usize,
    pub resource_templates: usize,
}

/// The whole dataset.
#[derive(Debug, Default)]
pub struct RecordStore {
    nodes: Collection<Node>,
    triggers: Collection<Trigger>,
    actions: Collection<Action>,
    responses: Collection<Response>,
    resource_templates: Collection<ResourceTemplate>,
}

impl RecordStore {
    pub fn new(
        nodes: Vec<Node>,
        triggers: Vec<Trigger>,
        actions: Vec<Action>,
        responses: Vec<Response>,
        resource_templates: Vec<ResourceTemplate>,
    ) -> Self {
        Self {
            nodes: Collection::new(nodes),
            triggers: Collection::new(triggers),
            actions: Collection::new(actions),
            responses: Collection::new(responses),
            resource_templates: Collection::new(resource_templates),
        }
    }

    /// The collection holding records of kind `T`
    pub fn collection<T: Entity>(&self) -> &Collection<T> {
        T::collection(self)
    }

    pub fn nodes(&self) -> &Collection<Node> {
        &self.nodes
    }

    pub fn triggers(&self) -> &Collection<Trigger> {
        &self.triggers
    }

    pub fn actions(&self) -> &Collection<Action> {
        &self.actions
    }

    pub fn responses(&self) -> &Collection<Response> {
        &self.responses
    }

    pub fn resource_templates(&self) -> &Collection<ResourceTemplate> {
        &self.resource_templates
    }

    pub fn counts(&self) -> StoreCounts {
        StoreCounts {
            nodes: self.nodes.len(),
            triggers: self.triggers.len(),
            actions: self.actions.len(),
            responses: self.responses.len(),
            resource_templates: self.resource_templates.len(),
        }
    }
}
