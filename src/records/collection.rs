use treetracker_common::{Error, Record, RecordId, Result};

use crate::storage::KvStore;

/// Ordered, in-memory copy of one persisted collection.
#[derive(Debug, Clone, PartialEq)]
pub struct Collection<T> {
    items: Vec<T>,
}

impl<T> Default for Collection<T> {
    fn default() -> Self {
        Self { items: Vec::new() }
    }
}

impl<T: Record> Collection<T> {
    pub fn from_vec(items: Vec<T>) -> Self {
        Self { items }
    }

    /// Load the collection stored under `T::STORAGE_KEY`.
    ///
    /// A missing or blank value is an empty collection. Malformed JSON is an
    /// error, so that a later save cannot overwrite data that failed to load.
    pub fn load(store: &KvStore) -> Result<Self> {
        match store.get(T::STORAGE_KEY) {
            Some(json) if !json.trim().is_empty() => Self::decode(&json),
            _ => Ok(Self::default()),
        }
    }

    pub fn decode(json: &str) -> Result<Self> {
        Ok(Self::from_vec(serde_json::from_str(json)?))
    }

    pub fn encode(&self) -> Result<String> {
        Ok(serde_json::to_string(&self.items)?)
    }

    /// Write the whole collection back under `T::STORAGE_KEY`.
    pub fn persist(&self, store: &KvStore) -> Result<()> {
        let json = self.encode()?;
        if !store.set(T::STORAGE_KEY, &json) {
            tracing::error!(key = T::STORAGE_KEY, count = self.items.len(), "Collection was not saved");
        }
        Ok(())
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn find(&self, id: &RecordId) -> Option<&T> {
        self.items.iter().find(|item| item.id() == id)
    }

    /// Replace the record `edit_id` in place, or append a new one with a fresh
    /// identifier when `edit_id` is `None`. Returns the record's index.
    pub fn upsert(
        &mut self,
        edit_id: Option<&RecordId>,
        build: impl FnOnce(RecordId) -> T,
    ) -> Result<usize> {
        match edit_id {
            Some(id) => {
                let index = self
                    .items
                    .iter()
                    .position(|item| item.id() == id)
                    .ok_or_else(|| Error::not_found(format!("{} {}", T::KIND, id)))?;
                self.items[index] = build(id.clone());
                Ok(index)
            }
            None => {
                self.items.push(build(RecordId::new()));
                Ok(self.items.len() - 1)
            }
        }
    }

    /// Remove the record with `id`. Unknown identifiers are a no-op.
    pub fn remove(&mut self, id: &RecordId) -> bool {
        let before = self.items.len();
        self.items.retain(|item| item.id() != id);
        self.items.len() != before
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use treetracker_common::{PlotDraft, Plot};

    fn plot(name: &str) -> impl FnOnce(RecordId) -> Plot + '_ {
        move |id| {
            PlotDraft {
                name: name.to_string(),
                ..PlotDraft::default()
            }
            .into_record(id)
        }
    }

    #[test]
    fn test_upsert_appends_in_order() {
        let mut plots = Collection::<Plot>::default();
        plots.upsert(None, plot("North")).unwrap();
        plots.upsert(None, plot("South")).unwrap();

        let names: Vec<_> = plots.items().iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["North", "South"]);
        assert_ne!(plots.items()[0].id, plots.items()[1].id);
    }

    #[test]
    fn test_upsert_edit_keeps_id_and_position() {
        let mut plots = Collection::<Plot>::default();
        plots.upsert(None, plot("North")).unwrap();
        plots.upsert(None, plot("South")).unwrap();
        let id = plots.items()[0].id.clone();

        let index = plots.upsert(Some(&id), plot("North Terrace")).unwrap();
        assert_eq!(index, 0);
        assert_eq!(plots.len(), 2);
        assert_eq!(plots.items()[0].id, id);
        assert_eq!(plots.items()[0].name, "North Terrace");
    }

    #[test]
    fn test_upsert_unknown_id_is_not_found() {
        let mut plots = Collection::<Plot>::default();
        let err = plots
            .upsert(Some(&RecordId::from("missing")), plot("X"))
            .unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
        assert!(plots.is_empty());
    }

    #[test]
    fn test_remove_unknown_is_noop() {
        let mut plots = Collection::<Plot>::default();
        plots.upsert(None, plot("North")).unwrap();
        let before = plots.clone();

        assert!(!plots.remove(&RecordId::from("missing")));
        assert_eq!(plots, before);
    }

    #[test]
    fn test_encode_decode_preserves_order() {
        let mut plots = Collection::<Plot>::default();
        for name in ["C", "A", "B"] {
            plots.upsert(None, plot(name)).unwrap();
        }

        let decoded = Collection::<Plot>::decode(&plots.encode().unwrap()).unwrap();
        assert_eq!(decoded, plots);
    }

    #[test]
    fn test_load_blank_and_missing() {
        let store = KvStore::in_memory();
        assert!(Collection::<Plot>::load(&store).unwrap().is_empty());

        store.set("plots", "");
        assert!(Collection::<Plot>::load(&store).unwrap().is_empty());
    }

    #[test]
    fn test_load_malformed_is_an_error() {
        let store = KvStore::in_memory();
        store.set("plots", "[{\"id\":");
        assert!(matches!(
            Collection::<Plot>::load(&store),
            Err(Error::Serialization(_))
        ));
    }
}
