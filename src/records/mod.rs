//! In-memory record collections backed by the key-value store.
//!
//! The [`Tracker`] loads the three collections once at startup, applies each
//! create, edit, or delete to its in-memory copy, and writes the whole affected
//! collection back after every change.

mod collection;
mod display;

pub use collection::Collection;
pub use display::{format_cartons, tree_age};

use treetracker_common::{
    Plot, PlotDraft, ProductionDraft, ProductionRecord, RecordId, Result, Tree, TreeDraft,
};

use crate::storage::KvStore;

/// Owner of the tree, plot, and production collections.
pub struct Tracker {
    store: KvStore,
    trees: Collection<Tree>,
    plots: Collection<Plot>,
    productions: Collection<ProductionRecord>,
}

impl Tracker {
    /// Load all collections from `store`.
    pub fn load(store: KvStore) -> Result<Self> {
        let trees = Collection::load(&store)?;
        let plots = Collection::load(&store)?;
        let productions = Collection::load(&store)?;

        tracing::debug!(
            trees = trees.len(),
            plots = plots.len(),
            productions = productions.len(),
            "Loaded collections"
        );

        Ok(Self {
            store,
            trees,
            plots,
            productions,
        })
    }

    pub fn trees(&self) -> &[Tree] {
        self.trees.items()
    }

    pub fn plots(&self) -> &[Plot] {
        self.plots.items()
    }

    pub fn productions(&self) -> &[ProductionRecord] {
        self.productions.items()
    }

    pub fn find_tree(&self, id: &RecordId) -> Option<&Tree> {
        self.trees.find(id)
    }

    pub fn find_plot(&self, id: &RecordId) -> Option<&Plot> {
        self.plots.find(id)
    }

    pub fn find_production(&self, id: &RecordId) -> Option<&ProductionRecord> {
        self.productions.find(id)
    }

    /// Create a tree, or fully replace the tree `edit_id`.
    pub fn save_tree(&mut self, edit_id: Option<&RecordId>, draft: TreeDraft) -> Result<&Tree> {
        let index = self.trees.upsert(edit_id, |id| draft.into_record(id))?;
        self.trees.persist(&self.store)?;
        Ok(&self.trees.items()[index])
    }

    /// Delete a tree. Returns false if no tree had that identifier.
    pub fn delete_tree(&mut self, id: &RecordId) -> Result<bool> {
        if !self.trees.remove(id) {
            return Ok(false);
        }
        self.trees.persist(&self.store)?;
        Ok(true)
    }

    /// Create a plot, or fully replace the plot `edit_id`.
    pub fn save_plot(&mut self, edit_id: Option<&RecordId>, draft: PlotDraft) -> Result<&Plot> {
        let index = self.plots.upsert(edit_id, |id| draft.into_record(id))?;
        self.plots.persist(&self.store)?;
        Ok(&self.plots.items()[index])
    }

    /// Delete a plot. Trees and records naming it are left as they are.
    pub fn delete_plot(&mut self, id: &RecordId) -> Result<bool> {
        if !self.plots.remove(id) {
            return Ok(false);
        }
        self.plots.persist(&self.store)?;
        Ok(true)
    }

    /// Create a production record, or fully replace the record `edit_id`.
    /// The total is recomputed from the draft on every save.
    pub fn save_production(
        &mut self,
        edit_id: Option<&RecordId>,
        draft: ProductionDraft,
    ) -> Result<&ProductionRecord> {
        let index = self.productions.upsert(edit_id, |id| draft.into_record(id))?;
        self.productions.persist(&self.store)?;
        Ok(&self.productions.items()[index])
    }

    pub fn delete_production(&mut self, id: &RecordId) -> Result<bool> {
        if !self.productions.remove(id) {
            return Ok(false);
        }
        self.productions.persist(&self.store)?;
        Ok(true)
    }

    /// Number of trees whose plot name matches exactly.
    pub fn tree_count_for_plot(&self, plot_name: &str) -> usize {
        self.trees
            .items()
            .iter()
            .filter(|tree| tree.plot_name == plot_name)
            .count()
    }

    /// Whether a plot with this exact name exists.
    pub fn has_plot_named(&self, plot_name: &str) -> bool {
        self.plots.items().iter().any(|plot| plot.name == plot_name)
    }

    pub fn store(&self) -> &KvStore {
        &self.store
    }

    /// Release the store.
    pub fn close(self) {
        self.store.close();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use treetracker_common::{Error, Quarters, TreeCondition, TreeSize};

    use crate::config::StorageConfig;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn tree_draft(name: &str, plot: &str) -> TreeDraft {
        TreeDraft {
            name: name.to_string(),
            species: "Koroneiki".to_string(),
            plot_name: plot.to_string(),
            tree_number: "1".to_string(),
            size: TreeSize::Medium,
            plant_date: date(2018, 4, 2),
            condition: TreeCondition::Good,
            photo: String::new(),
            notes: String::new(),
        }
    }

    fn production_draft(cartons: u32, quarters: Quarters) -> ProductionDraft {
        ProductionDraft {
            date: date(2024, 11, 3),
            plot_name: "North".to_string(),
            cartons,
            quarters,
            notes: String::new(),
        }
    }

    #[test]
    fn test_empty_store_loads_empty() {
        let tracker = Tracker::load(KvStore::in_memory()).unwrap();
        assert!(tracker.trees().is_empty());
        assert!(tracker.plots().is_empty());
        assert!(tracker.productions().is_empty());
    }

    #[test]
    fn test_every_change_is_persisted() {
        let mut tracker = Tracker::load(KvStore::in_memory()).unwrap();
        let id = tracker.save_tree(None, tree_draft("A", "North")).unwrap().id.clone();

        let stored = tracker.store().get("trees").unwrap();
        let trees: Vec<Tree> = serde_json::from_str(&stored).unwrap();
        assert_eq!(trees.len(), 1);
        assert_eq!(trees[0].id, id);

        assert!(tracker.delete_tree(&id).unwrap());
        assert_eq!(tracker.store().get("trees").as_deref(), Some("[]"));
    }

    #[test]
    fn test_edit_replaces_whole_record() {
        let mut tracker = Tracker::load(KvStore::in_memory()).unwrap();
        let mut draft = tree_draft("A", "North");
        draft.notes = "pruned".to_string();
        let id = tracker.save_tree(None, draft).unwrap().id.clone();

        let mut replacement = tree_draft("A", "South");
        replacement.condition = TreeCondition::Rip;
        let edited = tracker.save_tree(Some(&id), replacement).unwrap();

        assert_eq!(edited.id, id);
        assert_eq!(edited.plot_name, "South");
        assert_eq!(edited.condition, TreeCondition::Rip);
        assert_eq!(edited.notes, "");
        assert_eq!(tracker.trees().len(), 1);
    }

    #[test]
    fn test_edit_unknown_id_fails_without_writing() {
        let mut tracker = Tracker::load(KvStore::in_memory()).unwrap();
        let err = tracker
            .save_plot(Some(&RecordId::from("nope")), PlotDraft::default())
            .unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
        assert_eq!(tracker.store().get("plots"), None);
    }

    #[test]
    fn test_production_total_computed_on_save() {
        let mut tracker = Tracker::load(KvStore::in_memory()).unwrap();
        let record = tracker
            .save_production(None, production_draft(10, Quarters::Quarter))
            .unwrap();
        assert_eq!(record.total, 10.25);
        let id = record.id.clone();

        let record = tracker
            .save_production(Some(&id), production_draft(4, Quarters::ThreeQuarters))
            .unwrap();
        assert_eq!(record.total, 4.75);
    }

    #[test]
    fn test_delete_unknown_is_noop() {
        let mut tracker = Tracker::load(KvStore::in_memory()).unwrap();
        tracker.save_plot(None, PlotDraft { name: "North".into(), ..PlotDraft::default() }).unwrap();
        let before = tracker.plots().to_vec();

        assert!(!tracker.delete_plot(&RecordId::from("missing")).unwrap());
        assert!(!tracker.delete_production(&RecordId::from("missing")).unwrap());
        assert_eq!(tracker.plots(), before.as_slice());
    }

    #[test]
    fn test_rapid_creates_get_distinct_ids() {
        let mut tracker = Tracker::load(KvStore::in_memory()).unwrap();
        for i in 0..200 {
            tracker.save_tree(None, tree_draft(&format!("T{i}"), "North")).unwrap();
        }
        let ids: std::collections::HashSet<_> = tracker.trees().iter().map(|t| &t.id).collect();
        assert_eq!(ids.len(), 200);
    }

    #[test]
    fn test_plot_references_are_free_text() {
        let mut tracker = Tracker::load(KvStore::in_memory()).unwrap();
        let plot_id = tracker
            .save_plot(None, PlotDraft { name: "North".into(), ..PlotDraft::default() })
            .unwrap()
            .id
            .clone();
        tracker.save_tree(None, tree_draft("A", "North")).unwrap();
        tracker.save_tree(None, tree_draft("B", "North")).unwrap();
        tracker.save_tree(None, tree_draft("C", "Nowhere")).unwrap();

        assert_eq!(tracker.tree_count_for_plot("North"), 2);
        assert!(!tracker.has_plot_named("Nowhere"));

        // Deleting the plot leaves dangling references in place
        tracker.delete_plot(&plot_id).unwrap();
        assert_eq!(tracker.tree_count_for_plot("North"), 2);
        assert_eq!(tracker.trees().len(), 3);
    }

    #[test]
    fn test_reload_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let config = StorageConfig {
            data_dir: dir.path().to_path_buf(),
            ..StorageConfig::default()
        };

        let tree_id = {
            let mut tracker = Tracker::load(KvStore::open(&config)).unwrap();
            tracker.save_plot(None, PlotDraft { name: "North".into(), ..PlotDraft::default() }).unwrap();
            tracker.save_production(None, production_draft(2, Quarters::Half)).unwrap();
            let id = tracker.save_tree(None, tree_draft("A", "North")).unwrap().id.clone();
            tracker.close();
            id
        };

        let tracker = Tracker::load(KvStore::open(&config)).unwrap();
        assert_eq!(tracker.find_tree(&tree_id).map(|t| t.name.as_str()), Some("A"));
        assert_eq!(tracker.plots().len(), 1);
        assert_eq!(tracker.productions()[0].total, 2.5);
    }

    #[test]
    fn test_corrupt_collection_refuses_to_load() {
        let store = KvStore::in_memory();
        store.set("productions", "{oops");
        assert!(matches!(Tracker::load(store), Err(Error::Serialization(_))));
    }
}
