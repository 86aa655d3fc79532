//! Core type definitions for model catalogs.
//!
//! This module contains the records a catalog scraper hands over and the row
//! payload stored in the catalog tree.

use std::{borrow::Cow, fmt};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    row::{Field, IntoField},
    tabular,
};

/// Which level of the catalog a row describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    Catalog,
    Family,
    Model,
}

impl EntryKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntryKind::Catalog => "catalog",
            EntryKind::Family => "family",
            EntryKind::Model => "model",
        }
    }
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl IntoField for EntryKind {
    fn to_field(&self) -> Field<'_> {
        Field::Tag(Cow::Borrowed(self.as_str()))
    }
}

/// A single model as harvested from a listing page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelRecord {
    /// Family the model belongs to, e.g. `llama3`
    pub family: String,
    /// Full model tag, e.g. `llama3:8b`
    pub name: String,
    /// Parameter size as listed, e.g. `8B`
    pub size: String,
    /// Number of pulls reported by the listing
    pub pulls: u64,
    /// When the listing last changed
    pub updated: DateTime<Utc>,
}

/// Payload of every node in a catalog tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogRow {
    pub name: String,
    pub kind: EntryKind,
    pub size: String,
    /// For families, the sum over their models
    pub pulls: u64,
    /// For families, the most recent update among their models
    pub updated: Option<DateTime<Utc>>,
}

tabular!(CatalogRow {
    name,
    kind,
    size,
    pulls,
    updated
});

impl CatalogRow {
    pub fn catalog(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: EntryKind::Catalog,
            size: String::new(),
            pulls: 0,
            updated: None,
        }
    }

    pub fn family(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: EntryKind::Family,
            ..Self::catalog("")
        }
    }

    pub fn model(record: &ModelRecord) -> Self {
        Self {
            name: record.name.clone(),
            kind: EntryKind::Model,
            size: record.size.clone(),
            pulls: record.pulls,
            updated: Some(record.updated),
        }
    }
}
