//! The exported feature catalog.

use std::sync::Arc;

use augur_core::types::DataType;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::extractors::FeatureExtractor;

/// One feature as presented to catalog consumers (UIs, dataset builders).
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CatalogEntry {
    pub name: String,
    pub group: String,
    /// Data type label derived from the extractor's declared default value.
    pub data_type: String,
    /// Resources that must be acquirable for this feature to be computed.
    pub resource_dependencies: Vec<String>,
}

/// Build catalog entries for every provided feature, sorted by group then
/// feature name.
pub fn build_catalog(extractors: &[Arc<dyn FeatureExtractor>]) -> Vec<CatalogEntry> {
    let mut entries = Vec::new();
    for extractor in extractors {
        let empties = extractor.empty_values();
        let mut resources = extractor.requires_resources();
        resources.sort_unstable();
        for name in extractor.provides() {
            let data_type = empties
                .get(&name)
                .map(|v| v.data_type())
                .unwrap_or(DataType::Mixed);
            entries.push(CatalogEntry {
                name,
                group: extractor.group().to_string(),
                data_type: data_type.name().to_string(),
                resource_dependencies: resources.clone(),
            });
        }
    }
    entries.sort_by(|a, b| a.group.cmp(&b.group).then_with(|| a.name.cmp(&b.name)));
    entries
}

/// JSON schema of a catalog entry, for consumers that validate the export.
pub fn catalog_entry_schema() -> schemars::schema::RootSchema {
    schemars::schema_for!(CatalogEntry)
}
