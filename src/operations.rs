//! Catalog assembly on top of the tree.
//!
//! Turns flat scraped model records into a catalog tree with one container
//! per family, and provides the orderings the renderer can apply to it.

use std::{collections::HashMap, fmt, str::FromStr};

use tracing::{debug, info};

use crate::{
    error::Result,
    tree::Node,
    types::{CatalogRow, ModelRecord},
};

/// Builds a catalog tree from scraped records.
///
/// The root holds one family container per distinct family, in the order the
/// families first appear, and each family holds its models in record order.
/// Family rows carry the summed pulls and the latest update of their models.
///
/// # Arguments
/// * `title` - Name shown on the root row
/// * `records` - Scraped model records
/// * `collapsed` - Whether family containers start closed
///
/// # Returns
/// * `Result<Node<CatalogRow>>` - The root of the catalog tree
pub fn build_catalog(
    title: &str,
    records: &[ModelRecord],
    collapsed: bool,
) -> Result<Node<CatalogRow>> {
    let root = Node::container("catalog", CatalogRow::catalog(title))?;
    let mut families: HashMap<&str, Node<CatalogRow>> = HashMap::new();

    for record in records {
        let family = match families.get(record.family.as_str()) {
            Some(family) => family.clone(),
            None => {
                let family = Node::container("family", CatalogRow::family(&record.family))?;
                family.set_open(!collapsed);
                root.add_child(&family)?;
                families.insert(record.family.as_str(), family.clone());
                family
            }
        };
        let model = family.insert_item(family.id(), CatalogRow::model(record))?;
        debug!(family = %record.family, model = %model.id(), "Catalogued model");
    }

    for family in root.children() {
        let (pulls, updated) = family
            .children()
            .iter()
            .fold((0u64, None), |(pulls, updated), model| {
                let row = model.payload();
                (pulls.saturating_add(row.pulls), updated.max(row.updated))
            });
        let mut row = family.payload_mut();
        row.pulls = pulls;
        row.updated = updated;
    }

    info!(
        families = root.child_count(),
        models = records.len(),
        "Built catalog"
    );
    Ok(root)
}

/// Ordering applied to every level of a catalog tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CatalogSort {
    /// Alphabetical by name
    #[default]
    Name,
    /// Most pulled first
    Pulls,
    /// Most recently updated first
    Updated,
}

impl CatalogSort {
    pub fn apply(&self, root: &Node<CatalogRow>) -> Result<()> {
        match self {
            CatalogSort::Name => root.sort_by(|a, b| a.name.cmp(&b.name)),
            CatalogSort::Pulls => root.sort_by(|a, b| b.pulls.cmp(&a.pulls)),
            CatalogSort::Updated => root.sort(|a, b| a.updated > b.updated),
        }
    }
}

impl FromStr for CatalogSort {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "name" => Ok(CatalogSort::Name),
            "pulls" => Ok(CatalogSort::Pulls),
            "updated" => Ok(CatalogSort::Updated),
            other => Err(format!(
                "unknown sort '{}', expected name, pulls or updated",
                other
            )),
        }
    }
}

impl fmt::Display for CatalogSort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CatalogSort::Name => "name",
            CatalogSort::Pulls => "pulls",
            CatalogSort::Updated => "updated",
        };
        f.write_str(name)
    }
}
