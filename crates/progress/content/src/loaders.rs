//! Content loaders for reading mission catalogs from files.
//!
//! Catalogs ship as RON lists of [`MissionSpec`]; loading validates the
//! entries through [`MissionCatalog::new`] so malformed content fails at
//! startup instead of mid-quiz.

use std::path::Path;

use anyhow::Context;

use crate::{MissionCatalog, MissionSpec};

/// Common result type for loaders.
pub type LoadResult<T> = anyhow::Result<T>;

/// Loader for mission catalogs from RON files.
pub struct CatalogLoader;

impl CatalogLoader {
    /// Load and validate a mission catalog from a RON file.
    pub fn load(path: &Path) -> LoadResult<MissionCatalog> {
        let content = read_file(path)?;
        Self::parse(&content)
            .with_context(|| format!("Failed to load mission catalog {}", path.display()))
    }

    /// Parse and validate a mission catalog from RON text.
    pub fn parse(content: &str) -> LoadResult<MissionCatalog> {
        let specs: Vec<MissionSpec> = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse mission catalog RON: {}", e))?;
        MissionCatalog::new(specs).map_err(Into::into)
    }
}

/// Helper function to read file contents.
fn read_file(path: &Path) -> LoadResult<String> {
    std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read file {}: {}", path.display(), e))
}
