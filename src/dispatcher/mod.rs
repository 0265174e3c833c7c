//! Query dispatch over the record store.
//!
//! Every entry point reduces to [`QueryDispatcher::get`]: with an id it looks
//! up one record, without one it lists the whole collection. Records are
//! returned shallow; relations are left for the [`Resolver`] to fill in when
//! a consumer asks for them.

use crate::resolver::Resolver;
use crate::store::{Entity, RecordStore};
use log::debug;
use std::sync::Arc;

/// Outcome of a dispatch.
#[derive(Debug, Clone)]
pub enum Selection<T> {
    /// Lookup by id; `None` means no record has that id
    One(Option<Arc<T>>),
    /// Full collection, in source order
    All(Vec<Arc<T>>),
}

impl<T> Selection<T> {
    /// The single record of a lookup. A listing yields `None`.
    pub fn into_one(self) -> Option<Arc<T>> {
        match self {
            Selection::One(record) => record,
            Selection::All(_) => None,
        }
    }

    /// Records of the selection as a list.
    pub fn into_all(self) -> Vec<Arc<T>> {
        match self {
            Selection::One(record) => record.into_iter().collect(),
            Selection::All(records) => records,
        }
    }
}

/// Entry point for queries, holding the injected dataset.
#[derive(Debug, Clone)]
pub struct QueryDispatcher {
    store: Arc<RecordStore>,
}

impl QueryDispatcher {
    pub fn new(store: Arc<RecordStore>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &RecordStore {
        &self.store
    }

    pub fn resolver(&self) -> Resolver<'_> {
        Resolver::new(&self.store)
    }

    pub fn get<T: Entity>(&self, id: Option<&str>) -> Selection<T> {
        match id {
            Some(id) => Selection::One(self.find(id)),
            None => Selection::All(self.list()),
        }
    }

    /// Lookup by id. A miss is `None`, never an error.
    pub fn find<T: Entity>(&self, id: &str) -> Option<Arc<T>> {
        let record = self.store.collection::<T>().get(id).cloned();
        if record.is_none() {
            debug!("No {} with id '{}'", T::KIND, id);
        }
        record
    }

    pub fn list<T: Entity>(&self) -> Vec<Arc<T>> {
        self.store.collection::<T>().all().to_vec()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{Action, Node, ResourceTemplate, Response, Trigger};

    fn dispatcher() -> QueryDispatcher {
        QueryDispatcher::new(Arc::new(RecordStore::new(
            vec![Node::new("n1"), Node::new("n2")],
            vec![Trigger::new("t1")],
            vec![Action::new("a1")],
            vec![Response::new("r1")],
            vec![ResourceTemplate::new("rt1")],
        )))
    }

    #[test]
    fn id_selects_one_record() {
        let dispatcher = dispatcher();
        match dispatcher.get::<Node>(Some("n2")) {
            Selection::One(Some(node)) => assert_eq!(node.meta.id.as_str(), "n2"),
            other => panic!("unexpected selection: {:?}", other),
        }
    }

    #[test]
    fn unknown_id_is_none_not_error() {
        let dispatcher = dispatcher();
        assert!(matches!(dispatcher.get::<Node>(Some("n404")), Selection::One(None)));
        assert!(dispatcher.find::<ResourceTemplate>("n1").is_none());
    }

    #[test]
    fn no_id_lists_the_collection() {
        let dispatcher = dispatcher();
        let all = dispatcher.get::<Node>(None).into_all();
        assert_eq!(all.len(), 2);
        assert_eq!(dispatcher.list::<Response>().len(), 1);
        assert!(dispatcher.get::<Trigger>(None).into_one().is_none());
    }

    #[test]
    fn lookups_share_stored_records() {
        let dispatcher = dispatcher();
        let first = dispatcher.find::<Action>("a1").unwrap();
        let second = dispatcher.get::<Action>(Some("a1")).into_one().unwrap();
        assert!(Arc::ptr_eq(&first, &second));
    }
}
