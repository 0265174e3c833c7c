use super::records::{Entity, EntityKind};
use super::RecordStore;
use crate::error::{FlowGraphError, FlowGraphResult};
use log::info;
use serde::de::DeserializeOwned;
use std::fs;
use std::path::Path;

/// Read a file holding a JSON array of objects.
///
/// A missing file, a non-array document or an element that does not match
/// `T` is a load failure naming the file.
pub fn read_json_array<T: DeserializeOwned>(path: &Path) -> FlowGraphResult<Vec<T>> {
    let contents =
        fs::read_to_string(path).map_err(|e| FlowGraphError::data_load(path, e))?;
    serde_json::from_str::<Vec<T>>(&contents).map_err(|e| FlowGraphError::data_load(path, e))
}

/// Load the collection of kind `T` from `data_dir`.
pub fn load_collection<T: Entity + DeserializeOwned>(data_dir: &Path) -> FlowGraphResult<Vec<T>> {
    let path = data_dir.join(T::KIND.file_name());
    let records = read_json_array::<T>(&path)?;
    info!("Loaded {} {} records from {}", records.len(), T::KIND, path.display());
    Ok(records)
}

impl RecordStore {
    /// Load all five collections from `data_dir`. Any failure is fatal.
    pub fn load(data_dir: &Path) -> FlowGraphResult<Self> {
        let store = Self::new(
            load_collection(data_dir)?,
            load_collection(data_dir)?,
            load_collection(data_dir)?,
            load_collection(data_dir)?,
            load_collection(data_dir)?,
        );
        info!(
            "Record store ready: {} collections from {}",
            EntityKind::ALL.len(),
            data_dir.display()
        );
        Ok(store)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{Node, Trigger};
    use tempfile::tempdir;

    fn write_all(dir: &Path) {
        for kind in EntityKind::ALL {
            fs::write(dir.join(kind.file_name()), "[]").unwrap();
        }
    }

    #[test]
    fn loads_every_collection() {
        let dir = tempdir().unwrap();
        write_all(dir.path());
        fs::write(
            dir.path().join("node.json"),
            r#"[{ "_id": "n1", "trigger": "t1" }, { "_id": "n2" }]"#,
        )
        .unwrap();
        fs::write(dir.path().join("trigger.json"), r#"[{ "_id": "t1" }]"#).unwrap();

        let store = RecordStore::load(dir.path()).unwrap();
        assert_eq!(store.nodes().len(), 2);
        assert_eq!(store.triggers().len(), 1);
        assert!(store.actions().is_empty());
    }

    #[test]
    fn missing_collection_is_fatal() {
        let dir = tempdir().unwrap();
        write_all(dir.path());
        fs::remove_file(dir.path().join("response.json")).unwrap();

        let err = RecordStore::load(dir.path()).unwrap_err();
        match err {
            FlowGraphError::DataLoad { path, .. } => assert!(path.ends_with("response.json")),
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn malformed_collection_is_fatal() {
        let dir = tempdir().unwrap();
        write_all(dir.path());
        fs::write(dir.path().join("trigger.json"), r#"{ "_id": "t1" }"#).unwrap();
        assert!(load_collection::<Trigger>(dir.path()).is_err());

        fs::write(dir.path().join("node.json"), r#"[{ "name": "no id" }]"#).unwrap();
        assert!(load_collection::<Node>(dir.path()).is_err());
    }
}
