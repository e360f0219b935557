//! Record models for the three tracked collections.
//!
//! Each collection is persisted as one JSON array. Field names are camelCase
//! so that arrays written by earlier releases deserialize unchanged.

use chrono::NaiveDate;
use serde::{de::DeserializeOwned, Deserialize, Serialize};

use crate::{Quarters, RecordId, TreeCondition, TreeSize};

/// Common behaviour of an entity stored in a keyed collection.
pub trait Record: Clone + Serialize + DeserializeOwned {
    /// Key under which the whole collection is stored.
    const STORAGE_KEY: &'static str;
    /// Singular name used in messages.
    const KIND: &'static str;

    /// The record's identifier.
    fn id(&self) -> &RecordId;
}

/// One tracked tree.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Tree {
    pub id: RecordId,
    pub name: String,
    pub species: String,
    /// Free-text reference to a plot name; not validated.
    pub plot_name: String,
    pub tree_number: String,
    #[serde(default)]
    pub size: TreeSize,
    pub plant_date: NaiveDate,
    #[serde(default)]
    pub condition: TreeCondition,
    /// Encoded image (`data:` URL) or empty.
    #[serde(default)]
    pub photo: String,
    #[serde(default)]
    pub notes: String,
}

impl Record for Tree {
    const STORAGE_KEY: &'static str = "trees";
    const KIND: &'static str = "tree";

    fn id(&self) -> &RecordId {
        &self.id
    }
}

/// Field values for creating or replacing a tree.
#[derive(Debug, Clone, PartialEq)]
pub struct TreeDraft {
    pub name: String,
    pub species: String,
    pub plot_name: String,
    pub tree_number: String,
    pub size: TreeSize,
    pub plant_date: NaiveDate,
    pub condition: TreeCondition,
    pub photo: String,
    pub notes: String,
}

impl TreeDraft {
    /// Attach an identifier, producing the stored record.
    pub fn into_record(self, id: RecordId) -> Tree {
        Tree {
            id,
            name: self.name,
            species: self.species,
            plot_name: self.plot_name,
            tree_number: self.tree_number,
            size: self.size,
            plant_date: self.plant_date,
            condition: self.condition,
            photo: self.photo,
            notes: self.notes,
        }
    }
}

impl From<Tree> for TreeDraft {
    fn from(tree: Tree) -> Self {
        Self {
            name: tree.name,
            species: tree.species,
            plot_name: tree.plot_name,
            tree_number: tree.tree_number,
            size: tree.size,
            plant_date: tree.plant_date,
            condition: tree.condition,
            photo: tree.photo,
            notes: tree.notes,
        }
    }
}

/// A named parcel of land.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Plot {
    pub id: RecordId,
    /// De-facto join key referenced by trees and production records.
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub photo: String,
}

impl Record for Plot {
    const STORAGE_KEY: &'static str = "plots";
    const KIND: &'static str = "plot";

    fn id(&self) -> &RecordId {
        &self.id
    }
}

/// Field values for creating or replacing a plot.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlotDraft {
    pub name: String,
    pub description: String,
    pub photo: String,
}

impl PlotDraft {
    /// Attach an identifier, producing the stored record.
    pub fn into_record(self, id: RecordId) -> Plot {
        Plot {
            id,
            name: self.name,
            description: self.description,
            photo: self.photo,
        }
    }
}

/// One harvest measurement for a plot on a date.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProductionRecord {
    pub id: RecordId,
    pub date: NaiveDate,
    pub plot_name: String,
    pub cartons: u32,
    #[serde(default)]
    pub quarters: Quarters,
    /// Snapshot of `cartons + quarters` taken when the record was saved.
    pub total: f64,
    #[serde(default)]
    pub notes: String,
}

impl ProductionRecord {
    /// Build a record, computing the total snapshot.
    pub fn new(
        id: RecordId,
        date: NaiveDate,
        plot_name: impl Into<String>,
        cartons: u32,
        quarters: Quarters,
        notes: impl Into<String>,
    ) -> Self {
        Self {
            id,
            date,
            plot_name: plot_name.into(),
            cartons,
            quarters,
            total: production_total(cartons, quarters),
            notes: notes.into(),
        }
    }
}

impl Record for ProductionRecord {
    const STORAGE_KEY: &'static str = "productions";
    const KIND: &'static str = "production record";

    fn id(&self) -> &RecordId {
        &self.id
    }
}

/// Field values for creating or replacing a production record.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductionDraft {
    pub date: NaiveDate,
    pub plot_name: String,
    pub cartons: u32,
    pub quarters: Quarters,
    pub notes: String,
}

impl ProductionDraft {
    /// Attach an identifier and compute the total.
    pub fn into_record(self, id: RecordId) -> ProductionRecord {
        ProductionRecord::new(
            id,
            self.date,
            self.plot_name,
            self.cartons,
            self.quarters,
            self.notes,
        )
    }
}

/// Total harvest in cartons.
pub fn production_total(cartons: u32, quarters: Quarters) -> f64 {
    f64::from(cartons) + quarters.value()
}
